use crate::comparator::Comparator;
use crate::pattern::{IndexerPattern, SearchPattern};
use crate::transform::{Chain, Indexable};
use crate::value::Value;

///
/// Query
///
/// Capturing builder that records a transformation chain and terminates
/// it into either an `IndexerPattern` (`.indexer()`) or a `SearchPattern`
/// (`.eq()`/`.in_()`/`.gt()`/`.ge()`/`.lt()`/`.le()`) — the statically
/// typed counterpart of the source system's operator-overloading proxy
/// (spec §6.2/§9). Every `Query::new()` call starts an independent,
/// unshared builder.
///

#[derive(Clone, Debug, Default)]
pub struct Query {
    chain: Chain,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self {
            chain: Chain::identity(),
        }
    }

    /// Record a keyed-access step (`proxy[k]` in the source system).
    #[must_use]
    pub fn key(mut self, k: impl Into<Value>) -> Self {
        self.chain = self.chain.push_key(k.into());
        self
    }

    /// Record a registered indexable-function application
    /// (`fn(proxy)` in the source system).
    #[must_use]
    pub fn apply(mut self, f: Indexable) -> Self {
        self.chain = self.chain.push_fn(f);
        self
    }

    /// Terminate without a comparator, for building unfiltered lookups.
    #[must_use]
    pub fn indexer(self) -> IndexerPattern {
        IndexerPattern::new(self.chain)
    }

    #[must_use]
    pub fn eq(self, v: impl Into<Value>) -> SearchPattern {
        SearchPattern::new(self.chain, Comparator::Eq(v.into()))
    }

    #[must_use]
    pub fn in_<I, V>(self, values: I) -> SearchPattern
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        SearchPattern::new(self.chain, Comparator::In(values))
    }

    #[must_use]
    pub fn gt(self, v: impl Into<Value>) -> SearchPattern {
        SearchPattern::new(self.chain, Comparator::Gt(v.into()))
    }

    #[must_use]
    pub fn ge(self, v: impl Into<Value>) -> SearchPattern {
        SearchPattern::new(self.chain, Comparator::Ge(v.into()))
    }

    #[must_use]
    pub fn lt(self, v: impl Into<Value>) -> SearchPattern {
        SearchPattern::new(self.chain, Comparator::Lt(v.into()))
    }

    #[must_use]
    pub fn le(self, v: impl Into<Value>) -> SearchPattern {
        SearchPattern::new(self.chain, Comparator::Le(v.into()))
    }
}
