use crate::lookup::Lookup;
use crate::pattern::SearchPattern;
use crate::plan::{PlanOp, QueryPlan};

///
/// Planned
///
/// The result of running the query planner: a description (`QueryPlan`)
/// plus, when a lookup was chosen, a reference to it so the caller can
/// build the real executable iterator chain (`crate::engine`) without
/// re-running the match procedure.
///

pub struct Planned<'a> {
    pub plan: QueryPlan,
    pub lookup: Option<&'a Lookup>,
}

/// Select the first lookup (in declaration order) whose pattern handles
/// `query`, then describe either a seek-based plan or a full scan (spec
/// §4.6). This procedure is total: absent any matching lookup it falls
/// back to `DataScan` rather than failing.
#[must_use]
pub fn plan<'a>(query: &SearchPattern, lookups: &'a [Lookup]) -> Planned<'a> {
    let chosen = lookups.iter().find(|l| l.handles(query));

    let Some(lookup) = chosen else {
        let op = PlanOp::DataScan {
            pattern: query.to_string(),
        };
        return Planned {
            plan: QueryPlan::new(query.to_string(), vec![op]),
            lookup: None,
        };
    };

    let comparator = query.comparator();
    let seek_op = if comparator.is_range() {
        PlanOp::LookupRangeSeek {
            lookup: lookup.name().to_string(),
            definition: lookup.pattern().to_string(),
            start_key: comparator.start_key().cloned(),
            start_inclusive: comparator.start_inclusive(),
        }
    } else {
        PlanOp::LookupSeek {
            lookup: lookup.name().to_string(),
            definition: lookup.pattern().to_string(),
            keys: comparator.values(),
        }
    };

    let ops = vec![seek_op, PlanOp::Chain, PlanOp::FetchItemsByIndices];

    Planned {
        plan: QueryPlan::new(query.to_string(), ops),
        lookup: Some(lookup),
    }
}
