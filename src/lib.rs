//! An in-memory, ordered sequence with declarative secondary indexes and
//! a covers-based query planner.
//!
//! A host owns the storage (anything ordered and random-access); this
//! crate layers named [`lookup::Lookup`]s over it, each keyed by a
//! [`transform::Chain`] of keyed-access/function-application steps and,
//! optionally, a [`comparator::Comparator`] that pre-filters what the
//! lookup indexes. [`planner`] matches an incoming [`query::Query`]
//! against declared lookups by structural signature and comparator
//! coverage, falling back to a full [`ops::DataScan`] when nothing
//! matches. [`engine::SeqDex`] wires storage, lookups, and the planner
//! together into one facade.

pub mod comparator;
pub mod element;
pub mod engine;
pub mod error;
pub mod host;
pub mod lookup;
pub mod ops;
pub mod pattern;
pub mod plan;
pub mod planner;
pub mod query;
pub mod transform;
pub mod value;

/// The common vocabulary most callers need, in one place.
pub mod prelude {
    pub use crate::comparator::Comparator;
    pub use crate::element::Element;
    pub use crate::engine::SeqDex;
    pub use crate::error::CoreError;
    pub use crate::host::{HostSequence, VecHost};
    pub use crate::lookup::Lookup;
    pub use crate::pattern::{IndexerPattern, Pattern, SearchPattern};
    pub use crate::plan::QueryPlan;
    pub use crate::query::Query;
    pub use crate::transform::{Chain, Indexable};
    pub use crate::value::Value;
}
