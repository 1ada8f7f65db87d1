use crate::value::Value;
use std::fmt;

///
/// KeyPosition
///
/// Bisection surface a range comparator needs to resolve its starting
/// index into an ordered key mapping, without `comparator.rs` depending on
/// the lookup module's concrete `OrderedMap` type.
///

pub trait KeyPosition {
    fn bisect_left(&self, key: &Value) -> usize;
    fn bisect_right(&self, key: &Value) -> usize;
}

///
/// Comparator
///
/// Value predicate with a partial order ("covers") over other
/// comparators. `Eq`/`In` are point comparators; the four range variants
/// carry a bound and an inclusivity flag (spec §3).
///

#[derive(Clone, Debug, PartialEq)]
pub enum Comparator {
    Eq(Value),
    In(Vec<Value>),
    Gt(Value),
    Ge(Value),
    Lt(Value),
    Le(Value),
}

impl Comparator {
    /// `true` for the four range variants, `false` for `Eq`/`In`.
    #[must_use]
    pub const fn is_range(&self) -> bool {
        matches!(self, Self::Gt(_) | Self::Ge(_) | Self::Lt(_) | Self::Le(_))
    }

    /// Values tuple used by `LookupSeek` (spec §4.2): the literal for
    /// `Eq`, the member set (in caller order) for `In`. Only meaningful
    /// for point comparators.
    #[must_use]
    pub fn values(&self) -> Vec<Value> {
        match self {
            Self::Eq(v) => vec![v.clone()],
            Self::In(values) => values.clone(),
            _ => Vec::new(),
        }
    }

    #[must_use]
    pub fn start_key(&self) -> Option<&Value> {
        match self {
            Self::Gt(s) | Self::Ge(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn end_key(&self) -> Option<&Value> {
        match self {
            Self::Lt(e) | Self::Le(e) => Some(e),
            _ => None,
        }
    }

    #[must_use]
    pub const fn start_inclusive(&self) -> bool {
        matches!(self, Self::Ge(_))
    }

    #[must_use]
    pub const fn end_inclusive(&self) -> bool {
        matches!(self, Self::Le(_))
    }

    /// Resolve the first index in an ordered key mapping that a range
    /// scan should begin at (spec §4.2): `0` when there is no start
    /// bound, otherwise `bisect_left`/`bisect_right` depending on
    /// inclusivity.
    #[must_use]
    pub fn start_position<M: KeyPosition>(&self, mapping: &M) -> usize {
        match self.start_key() {
            None => 0,
            Some(key) => {
                if self.start_inclusive() {
                    mapping.bisect_left(key)
                } else {
                    mapping.bisect_right(key)
                }
            }
        }
    }

    /// `true` iff `x` satisfies this comparator. Values that cannot be
    /// ordered against the comparator's bound (a different `Value`
    /// family) never match rather than erroring.
    #[must_use]
    pub fn matches(&self, x: &Value) -> bool {
        match self {
            Self::Eq(v) => x == v,
            Self::In(values) => values.contains(x),
            Self::Gt(s) => matches!(x.partial_cmp(s), Some(std::cmp::Ordering::Greater)),
            Self::Ge(s) => matches!(
                x.partial_cmp(s),
                Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal)
            ),
            Self::Lt(e) => matches!(x.partial_cmp(e), Some(std::cmp::Ordering::Less)),
            Self::Le(e) => matches!(
                x.partial_cmp(e),
                Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal)
            ),
        }
    }

    /// `true` iff every value satisfying `other` also satisfies `self`.
    /// Encodes the matrix from spec §3 directly as a tagged match — no
    /// type-keyed open dispatch (spec §9).
    #[must_use]
    pub fn covers(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Eq(v), Self::Eq(v2)) => v == v2,
            // Deliberately a singleton-equality check, not containment:
            // Eq(v).covers(In(V')) iff {v} == V'. See spec §9.
            (Self::Eq(v), Self::In(v2)) => v2.len() == 1 && &v2[0] == v,

            (Self::In(values), Self::Eq(v2)) => values.contains(v2),
            (Self::In(values), Self::In(v2)) => {
                v2.iter().all(|item| values.contains(item))
            }

            (Self::Gt(s), Self::Eq(v2)) => matches!(v2.partial_cmp(s), Some(std::cmp::Ordering::Greater)),
            (Self::Gt(s), Self::In(v2)) => v2
                .iter()
                .all(|item| matches!(item.partial_cmp(s), Some(std::cmp::Ordering::Greater))),
            (Self::Gt(s), Self::Gt(s2)) => matches!(
                s2.partial_cmp(s),
                Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal)
            ),
            (Self::Gt(s), Self::Ge(s2)) => matches!(s2.partial_cmp(s), Some(std::cmp::Ordering::Greater)),

            (Self::Ge(s), Self::Eq(v2)) => matches!(
                v2.partial_cmp(s),
                Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal)
            ),
            (Self::Ge(s), Self::In(v2)) => v2.iter().all(|item| {
                matches!(
                    item.partial_cmp(s),
                    Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal)
                )
            }),
            (Self::Ge(s), Self::Gt(s2)) => matches!(
                s2.partial_cmp(s),
                Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal)
            ),
            (Self::Ge(s), Self::Ge(s2)) => matches!(
                s2.partial_cmp(s),
                Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal)
            ),

            (Self::Lt(e), Self::Eq(v2)) => matches!(v2.partial_cmp(e), Some(std::cmp::Ordering::Less)),
            (Self::Lt(e), Self::In(v2)) => v2
                .iter()
                .all(|item| matches!(item.partial_cmp(e), Some(std::cmp::Ordering::Less))),
            (Self::Lt(e), Self::Lt(e2)) => matches!(
                e2.partial_cmp(e),
                Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal)
            ),
            (Self::Lt(e), Self::Le(e2)) => matches!(e2.partial_cmp(e), Some(std::cmp::Ordering::Less)),

            (Self::Le(e), Self::Eq(v2)) => matches!(
                v2.partial_cmp(e),
                Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal)
            ),
            (Self::Le(e), Self::In(v2)) => v2.iter().all(|item| {
                matches!(
                    item.partial_cmp(e),
                    Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal)
                )
            }),
            (Self::Le(e), Self::Lt(e2)) => matches!(
                e2.partial_cmp(e),
                Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal)
            ),
            (Self::Le(e), Self::Le(e2)) => matches!(
                e2.partial_cmp(e),
                Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal)
            ),

            // All remaining pairs (range-vs-range across Gt/Lt families,
            // any comparator against a bound it cannot be compared to)
            // are not covered.
            _ => false,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq(v) => write!(f, " == {v}"),
            Self::In(values) => {
                write!(f, ".in_(")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, ")")
            }
            Self::Gt(s) => write!(f, " > {s}"),
            Self::Ge(s) => write!(f, " >= {s}"),
            Self::Lt(e) => write!(f, " < {e}"),
            Self::Le(e) => write!(f, " <= {e}"),
        }
    }
}
