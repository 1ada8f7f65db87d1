use crate::element::Element;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

///
/// FnId
///
/// Stable identity token for a registered indexable function (spec §4.1).
/// Two `Indexable` values with the same `FnId` are treated as the same
/// transformation step for signature purposes, regardless of whether they
/// wrap distinct closures — callers are responsible for registering a
/// given function under one consistent id.
///

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FnId(pub String);

impl fmt::Display for FnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FnId {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}

///
/// Indexable
///
/// A pure, deterministic function registered with a stable identity token
/// so that chains built from separate call sites compare equal by
/// signature. Mirrors the `@Indexable` decorator in the system this was
/// ported from.
///

#[derive(Clone)]
pub struct Indexable {
    id: FnId,
    func: Arc<dyn Fn(&Value) -> Value + Send + Sync>,
}

impl Indexable {
    pub fn new(id: impl Into<FnId>, func: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Self {
            id: id.into(),
            func: Arc::new(func),
        }
    }

    #[must_use]
    pub fn id(&self) -> &FnId {
        &self.id
    }

    fn call(&self, value: &Value) -> Value {
        (self.func)(value)
    }
}

impl fmt::Debug for Indexable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Indexable").field("id", &self.id).finish()
    }
}

impl PartialEq for Indexable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

///
/// Step
///
/// One element of a transformation chain (spec §3: identity, keyed
/// access, function application).
///

#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Identity,
    Key(Value),
    Fn(Indexable),
}

impl Step {
    /// Apply this single step to `current`. Returns `None` ("skip") when a
    /// keyed access cannot resolve; function application is infallible.
    fn apply(&self, current: &Value) -> Option<Value> {
        match self {
            Self::Identity => Some(current.clone()),
            Self::Key(k) => current.get(k).cloned(),
            Self::Fn(f) => Some(f.call(current)),
        }
    }

    fn token(&self) -> StepToken {
        match self {
            Self::Identity => StepToken::Identity,
            Self::Key(k) => StepToken::Key(k.clone()),
            Self::Fn(f) => StepToken::Fn(f.id().clone()),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => Ok(()),
            Self::Key(k) => write!(f, "[{k}]"),
            Self::Fn(func) => write!(f, ".apply({})", func.id()),
        }
    }
}

///
/// StepToken
///
/// The signature-comparable fingerprint of one `Step`. `Fn` steps compare
/// only by `FnId`; `Key` steps compare by value equality.
///

#[derive(Clone, Debug, PartialEq)]
pub enum StepToken {
    Identity,
    Key(Value),
    Fn(FnId),
}

///
/// Signature
///
/// Ordered tuple of step tokens identifying a transformation chain.
/// Two chains are equivalent iff their signatures are equal (spec §3).
///

#[derive(Clone, Debug, PartialEq)]
pub struct Signature(Vec<StepToken>);

///
/// Chain
///
/// A finite ordered sequence of transformation steps, built incrementally
/// by a capturing proxy (`crate::query::Query`) and applied left-to-right
/// against an element.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Chain {
    steps: Vec<Step>,
}

impl Chain {
    #[must_use]
    pub fn identity() -> Self {
        Self { steps: Vec::new() }
    }

    #[must_use]
    pub fn push_key(mut self, key: Value) -> Self {
        self.steps.push(Step::Key(key));
        self
    }

    #[must_use]
    pub fn push_fn(mut self, f: Indexable) -> Self {
        self.steps.push(Step::Fn(f));
        self
    }

    /// Walk the chain left-to-right against `element`'s identity value.
    /// Returns `None` the moment any keyed access can't resolve (skip is
    /// first-class, distinct from an error — spec §3/§4.1).
    #[must_use]
    pub fn apply<E: Element + ?Sized>(&self, element: &E) -> Option<Value> {
        let mut current = element.as_value();
        for step in &self.steps {
            current = step.apply(&current)?;
        }
        Some(current)
    }

    #[must_use]
    pub fn signature(&self) -> Signature {
        Signature(self.steps.iter().map(Step::token).collect())
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item")?;
        for step in &self.steps {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}
