use crate::comparator::Comparator;
use crate::element::Element;
use crate::transform::{Chain, Signature};
use crate::value::Value;
use std::fmt;

///
/// IndexerPattern
///
/// A transformation chain with no comparator: used to build unfiltered
/// lookups. `handles` only checks signature equality (spec §3).
///

#[derive(Clone, Debug, PartialEq)]
pub struct IndexerPattern {
    transformations: Chain,
}

impl IndexerPattern {
    #[must_use]
    pub fn new(transformations: Chain) -> Self {
        Self { transformations }
    }

    #[must_use]
    pub fn identity() -> Self {
        Self::new(Chain::identity())
    }

    #[must_use]
    pub fn transformations(&self) -> &Chain {
        &self.transformations
    }

    /// `true` unless the chain skips (spec §4.3: on skip an `IndexerPattern`
    /// simply doesn't match; it has no comparator to evaluate).
    #[must_use]
    pub fn matches<E: Element + ?Sized>(&self, element: &E) -> bool {
        self.transformations.apply(element).is_some()
    }

    #[must_use]
    pub fn handles(&self, query: &SearchPattern) -> bool {
        self.transformations.signature() == query.transformations.signature()
    }
}

impl fmt::Display for IndexerPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.transformations)
    }
}

///
/// SearchPattern
///
/// A transformation chain plus exactly one comparator: the shape of every
/// query, and of filtered lookups. `handles` requires equal signatures
/// *and* that this pattern's comparator covers the other's (spec §3).
///

#[derive(Clone, Debug, PartialEq)]
pub struct SearchPattern {
    transformations: Chain,
    comparator: Comparator,
}

impl SearchPattern {
    #[must_use]
    pub fn new(transformations: Chain, comparator: Comparator) -> Self {
        Self {
            transformations,
            comparator,
        }
    }

    #[must_use]
    pub fn transformations(&self) -> &Chain {
        &self.transformations
    }

    #[must_use]
    pub fn comparator(&self) -> &Comparator {
        &self.comparator
    }

    /// Apply the chain; on skip, the pattern does not match. Otherwise
    /// defer to the comparator (spec §4.3).
    #[must_use]
    pub fn matches<E: Element + ?Sized>(&self, element: &E) -> bool {
        match self.transformations.apply(element) {
            Some(value) => self.comparator.matches(&value),
            None => false,
        }
    }

    #[must_use]
    pub fn handles(&self, query: &Self) -> bool {
        self.transformations.signature() == query.transformations.signature()
            && self.comparator.covers(&query.comparator)
    }

    /// Resolve the transformed value of `element` against this pattern's
    /// chain, independent of the comparator. Used by `Lookup::build`/
    /// mutation glue, which need the derived key even when this pattern
    /// came from a filtered lookup.
    #[must_use]
    pub fn apply<E: Element + ?Sized>(&self, element: &E) -> Option<Value> {
        self.transformations.apply(element)
    }
}

impl fmt::Display for SearchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.transformations, self.comparator)
    }
}

///
/// Pattern
///
/// Either half of the pattern hierarchy, as stored on a `Lookup` (which
/// may be built from a bare `IndexerPattern` or a filtering
/// `SearchPattern`).
///

#[derive(Clone, Debug, PartialEq)]
pub enum Pattern {
    Indexer(IndexerPattern),
    Search(SearchPattern),
}

impl Pattern {
    #[must_use]
    pub fn signature(&self) -> Signature {
        match self {
            Self::Indexer(p) => p.transformations.signature(),
            Self::Search(p) => p.transformations.signature(),
        }
    }

    /// Resolve the derived key for `element`, honoring a filtering
    /// comparator if one is present. `None` means skip: the element is
    /// not indexable (keyed access failed) or, for a filtered lookup,
    /// doesn't satisfy the comparator.
    #[must_use]
    pub fn derive<E: Element + ?Sized>(&self, element: &E) -> Option<Value> {
        match self {
            Self::Indexer(p) => p.transformations.apply(element),
            Self::Search(p) => {
                let value = p.transformations.apply(element)?;
                p.comparator.matches(&value).then_some(value)
            }
        }
    }

    #[must_use]
    pub fn handles(&self, query: &SearchPattern) -> bool {
        match self {
            Self::Indexer(p) => p.handles(query),
            Self::Search(p) => p.handles(query),
        }
    }
}

impl From<IndexerPattern> for Pattern {
    fn from(p: IndexerPattern) -> Self {
        Self::Indexer(p)
    }
}

impl From<SearchPattern> for Pattern {
    fn from(p: SearchPattern) -> Self {
        Self::Search(p)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indexer(p) => write!(f, "{p}"),
            Self::Search(p) => write!(f, "{p}"),
        }
    }
}
