use thiserror::Error as ThisError;

///
/// CoreError
///
/// Structured error surface for the planner, lookups, and host glue.
/// `Skip` is deliberately absent here: it is an internal transformation
/// signal caught at the pattern boundary and never surfaces (spec §7).
///

#[derive(Debug, ThisError)]
pub enum CoreError {
    #[error("unknown lookup: {name}")]
    UnknownLookup { name: String },

    #[error("lookup already registered: {name}")]
    DuplicateLookup { name: String },

    #[error(
        "key derived at position {position} for lookup {lookup} is not comparable to existing keys: {reason}"
    )]
    IncomparableKeys {
        lookup: String,
        position: usize,
        reason: String,
    },

    #[error("transformation step failed: {message}")]
    TransformationFailure { message: String },

    #[error("position out of range: {position} (len {len})")]
    OutOfRange { position: usize, len: usize },
}

impl CoreError {
    #[must_use]
    pub fn unknown_lookup(name: impl Into<String>) -> Self {
        Self::UnknownLookup { name: name.into() }
    }

    #[must_use]
    pub fn duplicate_lookup(name: impl Into<String>) -> Self {
        Self::DuplicateLookup { name: name.into() }
    }

    #[must_use]
    pub fn incomparable_keys(
        lookup: impl Into<String>,
        position: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::IncomparableKeys {
            lookup: lookup.into(),
            position,
            reason: reason.into(),
        }
    }
}
