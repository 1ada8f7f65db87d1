use crate::comparator::KeyPosition;
use crate::value::Value;
use std::cmp::Ordering;
use std::collections::BTreeSet;

///
/// OrderedMap
///
/// Key-sorted mapping from a derived `Value` to the set of host positions
/// producing that key (spec §3 "mapping"). Backed by a sorted `Vec`
/// instead of `BTreeMap` because `Value`'s order is only partial: a
/// `BTreeMap` requires a total `Ord` and would panic or silently
/// misbehave the moment two incomparable keys (e.g. an `Int` and a
/// `Text`) were compared. Binary search here instead surfaces
/// incomparability as an explicit error at the call site.
///

#[derive(Debug, Default)]
pub struct OrderedMap {
    entries: Vec<(Value, BTreeSet<usize>)>,
}

impl OrderedMap {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&BTreeSet<usize>> {
        match self.locate(key) {
            Ok(Ok(idx)) => Some(&self.entries[idx].1),
            _ => None,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &BTreeSet<usize>)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Entries in ascending key order starting at `start_index`, i.e. the
    /// slice `LookupRangeSeek` walks (spec §4.5).
    pub fn range_from(&self, start_index: usize) -> impl Iterator<Item = (&Value, &BTreeSet<usize>)> {
        self.entries[start_index.min(self.entries.len())..]
            .iter()
            .map(|(k, v)| (k, v))
    }

    /// Insert `position` under `key`, creating the key's entry if absent.
    /// Returns `Err` (I4/`IncomparableKeys`, spec §7) if `key` cannot be
    /// ordered against an existing key already in the map.
    pub fn insert(&mut self, key: Value, position: usize) -> Result<(), IncomparableKeyError> {
        match self.locate(&key)? {
            Ok(idx) => {
                self.entries[idx].1.insert(position);
            }
            Err(idx) => {
                let mut set = BTreeSet::new();
                set.insert(position);
                self.entries.insert(idx, (key, set));
            }
        }
        Ok(())
    }

    /// Remove `position` from `key`'s entry; drops the entry entirely once
    /// its set is empty (I2, spec §3).
    pub fn remove(&mut self, key: &Value, position: usize) {
        if let Ok(Ok(idx)) = self.locate(key) {
            let set = &mut self.entries[idx].1;
            set.remove(&position);
            if set.is_empty() {
                self.entries.remove(idx);
            }
        }
    }

    /// Decrement every stored position greater than `deleted` by one, to
    /// preserve I3 after a host deletion at `deleted` (spec §4.4).
    pub fn renumber_after_delete(&mut self, deleted: usize) {
        for (_, set) in &mut self.entries {
            let shifted: BTreeSet<usize> = set
                .iter()
                .map(|&p| if p > deleted { p - 1 } else { p })
                .collect();
            *set = shifted;
        }
    }

    /// `Ok(Ok(idx))`: key found at `idx`. `Ok(Err(idx))`: key absent,
    /// `idx` is where it would be inserted to keep the vec sorted.
    /// `Err`: `key` is not comparable to the key already occupying the
    /// probed slot.
    fn locate(&self, key: &Value) -> Result<Result<usize, usize>, IncomparableKeyError> {
        let mut lo = 0usize;
        let mut hi = self.entries.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let existing = &self.entries[mid].0;
            match existing.partial_cmp(key) {
                Some(Ordering::Less) => lo = mid + 1,
                Some(Ordering::Greater) => hi = mid,
                Some(Ordering::Equal) => return Ok(Ok(mid)),
                None => {
                    return Err(IncomparableKeyError {
                        existing_family: existing.family(),
                        new_family: key.family(),
                    });
                }
            }
        }
        Ok(Err(lo))
    }
}

impl KeyPosition for OrderedMap {
    fn bisect_left(&self, key: &Value) -> usize {
        match self.locate(key) {
            Ok(Ok(idx)) => idx,
            Ok(Err(idx)) => idx,
            Err(_) => self.entries.len(),
        }
    }

    fn bisect_right(&self, key: &Value) -> usize {
        match self.locate(key) {
            Ok(Ok(idx)) => idx + 1,
            Ok(Err(idx)) => idx,
            Err(_) => self.entries.len(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IncomparableKeyError {
    pub existing_family: &'static str,
    pub new_family: &'static str,
}

impl std::fmt::Display for IncomparableKeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "key family {} is not comparable to existing key family {}",
            self.new_family, self.existing_family
        )
    }
}

impl std::error::Error for IncomparableKeyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get_roundtrip() {
        let mut map = OrderedMap::new();
        map.insert(Value::Int(5), 0).unwrap();
        map.insert(Value::Int(5), 1).unwrap();
        map.insert(Value::Int(3), 2).unwrap();

        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec![Value::Int(3), Value::Int(5)]);
        assert_eq!(map.get(&Value::Int(5)).unwrap().len(), 2);
    }

    #[test]
    fn incomparable_insert_is_rejected() {
        let mut map = OrderedMap::new();
        map.insert(Value::Int(1), 0).unwrap();
        let err = map.insert(Value::from("a"), 1).unwrap_err();
        assert_eq!(err.existing_family, "int");
        assert_eq!(err.new_family, "text");
    }

    #[test]
    fn remove_drops_empty_entry() {
        let mut map = OrderedMap::new();
        map.insert(Value::Int(1), 0).unwrap();
        map.remove(&Value::Int(1), 0);
        assert!(map.is_empty());
    }

    #[test]
    fn renumber_shifts_positions_after_delete() {
        let mut map = OrderedMap::new();
        map.insert(Value::Int(1), 0).unwrap();
        map.insert(Value::Int(1), 4).unwrap();
        map.insert(Value::Int(2), 5).unwrap();

        // Position 3 itself was already removed by the caller (Lookup::on_delete)
        // before renumbering; this only shifts survivors past it.
        map.renumber_after_delete(3);

        let at_one: Vec<_> = map.get(&Value::Int(1)).unwrap().iter().copied().collect();
        assert_eq!(at_one, vec![0, 3]);
        let at_two: Vec<_> = map.get(&Value::Int(2)).unwrap().iter().copied().collect();
        assert_eq!(at_two, vec![4]);
    }

    #[test]
    fn bisect_matches_sorted_dict_semantics() {
        let mut map = OrderedMap::new();
        for (k, p) in [(1, 0), (3, 1), (3, 2), (5, 3)] {
            map.insert(Value::Int(k), p).unwrap();
        }
        assert_eq!(map.bisect_left(&Value::Int(3)), 1);
        assert_eq!(map.bisect_right(&Value::Int(3)), 2);
        assert_eq!(map.bisect_left(&Value::Int(0)), 0);
        assert_eq!(map.bisect_left(&Value::Int(10)), 3);
    }
}
