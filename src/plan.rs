use crate::value::Value;
use serde_json::{json, Value as JsonValue};
use std::fmt;

///
/// PlanOp
///
/// One step of an executable query plan (spec §4.5/§6.4). Carries just
/// enough to both execute (via `crate::ops`) and describe itself.
///

#[derive(Debug, Clone)]
pub enum PlanOp {
    DataScan {
        pattern: String,
    },
    LookupSeek {
        lookup: String,
        definition: String,
        keys: Vec<Value>,
    },
    LookupRangeSeek {
        lookup: String,
        definition: String,
        start_key: Option<Value>,
        start_inclusive: bool,
    },
    Chain,
    FetchItemsByIndices,
}

impl PlanOp {
    #[must_use]
    pub fn operation_name(&self) -> &'static str {
        match self {
            Self::DataScan { .. } => "DataScan",
            Self::LookupSeek { .. } => "LookupSeek",
            Self::LookupRangeSeek { .. } => "LookupRangeSeek",
            Self::Chain => "Chain",
            Self::FetchItemsByIndices => "FetchItemsByIndices",
        }
    }

    /// Render this operation as a `{operation, source?, args?}` mapping
    /// (spec §6.4).
    #[must_use]
    pub fn describe(&self) -> JsonValue {
        let mut description = json!({ "operation": self.operation_name() });
        let map = description.as_object_mut().expect("object literal");

        match self {
            Self::DataScan { pattern } => {
                map.insert("args".into(), json!({ "pattern": pattern }));
            }
            Self::LookupSeek {
                lookup,
                definition,
                keys,
            } => {
                map.insert(
                    "source".into(),
                    json!({ "type": "lookup", "name": lookup, "definition": definition }),
                );
                let keys: Vec<String> = keys.iter().map(ToString::to_string).collect();
                map.insert("args".into(), json!({ "keys": keys }));
            }
            Self::LookupRangeSeek {
                lookup,
                definition,
                start_key,
                start_inclusive,
            } => {
                map.insert(
                    "source".into(),
                    json!({ "type": "lookup", "name": lookup, "definition": definition }),
                );
                map.insert(
                    "args".into(),
                    json!({
                        "start_key": start_key.as_ref().map(ToString::to_string),
                        "start_inclusive": start_inclusive,
                    }),
                );
            }
            Self::Chain | Self::FetchItemsByIndices => {}
        }

        description
    }
}

///
/// QueryPlan
///
/// An ordered list of streaming operations together with a description
/// of the query they serve (spec §4.6/§6.4). Building a plan never
/// executes it: `QueryPlan` is pure data, execution happens in
/// `crate::engine`.
///

#[derive(Debug, Clone)]
pub struct QueryPlan {
    query_description: String,
    operations: Vec<PlanOp>,
}

impl QueryPlan {
    #[must_use]
    pub fn new(query_description: String, operations: Vec<PlanOp>) -> Self {
        Self {
            query_description,
            operations,
        }
    }

    #[must_use]
    pub fn operations(&self) -> &[PlanOp] {
        &self.operations
    }

    /// `true` when this plan routes through a lookup rather than
    /// scanning (used by tests asserting S1/S3/S4-style op sequences).
    #[must_use]
    pub fn uses_lookup(&self) -> bool {
        self.operations
            .iter()
            .any(|op| matches!(op, PlanOp::LookupSeek { .. } | PlanOp::LookupRangeSeek { .. }))
    }

    #[must_use]
    pub fn describe(&self) -> JsonValue {
        json!({
            "query": self.query_description,
            "operations": self.operations.iter().map(PlanOp::describe).collect::<Vec<_>>(),
        })
    }
}

impl fmt::Display for QueryPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            serde_json::to_string_pretty(&self.describe()).map_err(|_| fmt::Error)?
        )
    }
}
