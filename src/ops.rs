use crate::lookup::Lookup;
use crate::pattern::SearchPattern;
use crate::value::Value;
use std::borrow::Cow;
use std::collections::BTreeSet;

///
/// Stream operations
///
/// Small composable, single-pass, pull-based iterators (spec §4.5). Each
/// is a plain `Iterator` so they chain with ordinary combinators; the
/// planner (`crate::planner`) picks which ones to compose for a given
/// query.
///

/// `DataScan`: yields every `(position, &element)` whose transformed
/// value matches `pattern`, in ascending position order. The fallback
/// when no lookup can serve a query. Owns `pattern` (rather than
/// borrowing it) so it composes with a query built and consumed in the
/// same call, without forcing the caller to keep a separate binding
/// alive.
pub struct DataScan<'a, E> {
    pattern: SearchPattern,
    host: &'a [E],
    next: usize,
}

impl<'a, E> DataScan<'a, E> {
    #[must_use]
    pub fn new(pattern: SearchPattern, host: &'a [E]) -> Self {
        Self {
            pattern,
            host,
            next: 0,
        }
    }
}

impl<'a, E: crate::element::Element> Iterator for DataScan<'a, E> {
    type Item = (usize, &'a E);

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.host.len() {
            let position = self.next;
            self.next += 1;
            let element = &self.host[position];
            if self.pattern.matches(element) {
                return Some((position, element));
            }
        }
        None
    }
}

/// `LookupSeek`: one position-set per key in `keys`, in that order.
/// Missing keys yield an empty set rather than erroring (spec §4.5).
pub struct LookupSeek<'a> {
    lookup: &'a Lookup,
    keys: std::vec::IntoIter<Value>,
}

impl<'a> LookupSeek<'a> {
    #[must_use]
    pub fn new(lookup: &'a Lookup, keys: Vec<Value>) -> Self {
        Self {
            lookup,
            keys: keys.into_iter(),
        }
    }
}

impl<'a> Iterator for LookupSeek<'a> {
    type Item = Cow<'a, BTreeSet<usize>>;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.keys.next()?;
        Some(match self.lookup.mapping().get(&key) {
            Some(set) => Cow::Borrowed(set),
            None => Cow::Owned(BTreeSet::new()),
        })
    }
}

/// `LookupRangeSeek`: walks mapping keys in ascending order starting at
/// the comparator's start position, yielding each key's position-set
/// while `match_func` holds, and stopping (not merely skipping) at the
/// first key it no longer matches — the short-circuit that makes bounded
/// ranges efficient and is how upper bounds are enforced (spec §4.5).
pub struct LookupRangeSeek<'a> {
    lookup: &'a Lookup,
    index: usize,
    match_func: Box<dyn Fn(&Value) -> bool + 'a>,
    done: bool,
}

impl<'a> LookupRangeSeek<'a> {
    #[must_use]
    pub fn new(
        lookup: &'a Lookup,
        start_index: usize,
        match_func: impl Fn(&Value) -> bool + 'a,
    ) -> Self {
        Self {
            lookup,
            index: start_index,
            match_func: Box::new(match_func),
            done: false,
        }
    }
}

impl<'a> Iterator for LookupRangeSeek<'a> {
    type Item = Cow<'a, BTreeSet<usize>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let (key, set) = self.lookup.mapping().range_from(self.index).next()?;
        if !(self.match_func)(key) {
            self.done = true;
            return None;
        }
        self.index += 1;
        Some(Cow::Borrowed(set))
    }
}

/// Flattens a stream of position-sets into a stream of positions. No
/// deduplication: within one lookup, each key's set is disjoint from
/// every other key's set (spec §4.5).
pub fn chain<'a>(
    sets: impl Iterator<Item = Cow<'a, BTreeSet<usize>>> + 'a,
) -> impl Iterator<Item = usize> + 'a {
    sets.flat_map(|set| set.into_owned().into_iter())
}

/// `FetchItemsByIndices`: maps a stream of positions to `(position,
/// &element)`, skipping positions no longer present in `host` (can occur
/// only if the caller mutates the host mid-stream, which the
/// concurrency contract disallows — spec §5).
pub struct FetchItemsByIndices<'a, E> {
    host: &'a [E],
    positions: Box<dyn Iterator<Item = usize> + 'a>,
}

impl<'a, E> FetchItemsByIndices<'a, E> {
    #[must_use]
    pub fn new(host: &'a [E], positions: impl Iterator<Item = usize> + 'a) -> Self {
        Self {
            host,
            positions: Box::new(positions),
        }
    }
}

impl<'a, E> Iterator for FetchItemsByIndices<'a, E> {
    type Item = (usize, &'a E);

    fn next(&mut self) -> Option<Self::Item> {
        for position in self.positions.by_ref() {
            if let Some(element) = self.host.get(position) {
                return Some((position, element));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::Comparator;
    use crate::transform::Chain as XChain;

    fn host_cycle(values: &[i64], len: usize) -> Vec<Value> {
        values
            .iter()
            .cycle()
            .take(len)
            .map(|v| Value::Int(*v))
            .collect()
    }

    #[test]
    fn data_scan_yields_ascending_matches() {
        let host = host_cycle(&[1, 2, 3, 4, 5, 6, 7], 20);
        let pattern = SearchPattern::new(
            XChain::identity(),
            Comparator::In(vec![Value::Int(4), Value::Int(7)]),
        );
        let found: Vec<usize> = DataScan::new(pattern, &host).map(|(p, _)| p).collect();
        assert_eq!(found, vec![3, 6, 10, 13, 17]);
    }

    #[test]
    fn range_seek_stops_at_first_nonmatch() {
        let mut lookup = Lookup::new("basic", None);
        let host = host_cycle(&[1, 2, 3, 4, 5, 6, 7], 20);
        lookup.build(&host).unwrap();

        let comparator = Comparator::Lt(Value::Int(3));
        let start = comparator.start_position(lookup.mapping());
        let seek = LookupRangeSeek::new(&lookup, start, move |k| comparator.matches(k));
        let positions: Vec<usize> = chain(seek).collect();
        let mut sorted = positions;
        sorted.sort_unstable();
        // Lt(3) matches keys 1 and 2, then stops before ever visiting key 3.
        assert_eq!(sorted, vec![0, 1, 7, 8, 14, 15]);
    }
}
