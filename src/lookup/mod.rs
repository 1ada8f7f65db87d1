mod ordered_map;

pub use ordered_map::{IncomparableKeyError, OrderedMap};

use crate::element::Element;
use crate::error::CoreError;
use crate::pattern::{IndexerPattern, Pattern, SearchPattern};
use crate::value::Value;
use tracing::{debug, trace};

///
/// Lookup
///
/// A named secondary index: a key-sorted mapping from a pattern's derived
/// key to the set of host positions producing that key (spec §3/§4.4).
/// Created from either a bare `IndexerPattern` (unfiltered) or a
/// `SearchPattern` (filtered); defaults to an identity `IndexerPattern`
/// when no pattern is supplied (spec §6.3).
///

#[derive(Debug)]
pub struct Lookup {
    name: String,
    pattern: Pattern,
    mapping: OrderedMap,
}

impl Lookup {
    #[must_use]
    pub fn new(name: impl Into<String>, pattern: Option<Pattern>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.unwrap_or_else(|| IndexerPattern::identity().into()),
            mapping: OrderedMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    #[must_use]
    pub fn mapping(&self) -> &OrderedMap {
        &self.mapping
    }

    #[must_use]
    pub fn handles(&self, query: &SearchPattern) -> bool {
        self.pattern.handles(query)
    }

    /// Scan the host once, indexing every position whose derived key
    /// resolves (I1, spec §4.4). Replaces any prior contents.
    pub fn build<E: Element>(&mut self, host: &[E]) -> Result<(), CoreError> {
        self.mapping = OrderedMap::new();
        for (position, element) in host.iter().enumerate() {
            self.index_position(position, element)?;
        }
        debug!(lookup = %self.name, keys = self.mapping.len(), "lookup built");
        Ok(())
    }

    /// Index a newly appended element at `position` (spec §6.1
    /// `on_insert`).
    pub fn on_insert<E: Element>(&mut self, position: usize, element: &E) -> Result<(), CoreError> {
        self.index_position(position, element)
    }

    /// Remove `position` from the mapping, then renumber every stored
    /// position greater than it down by one, preserving I3 (spec §4.4).
    pub fn on_delete(&mut self, position: usize) {
        self.remove_position_without_renumber(position);
        self.mapping.renumber_after_delete(position);
        trace!(lookup = %self.name, position, "lookup position deleted");
    }

    /// Re-index `position` for its replacement element (spec §4.4
    /// `on_replace`). Inserts the new derived key before dropping the old
    /// one, so a rejected insert (`IncomparableKeys`) leaves the mapping
    /// exactly as it was before the call rather than with `position`
    /// indexed under neither key (spec §7).
    pub fn on_replace<E: Element>(
        &mut self,
        position: usize,
        new_element: &E,
    ) -> Result<(), CoreError> {
        let old_key = self
            .mapping
            .iter()
            .find(|(_, positions)| positions.contains(&position))
            .map(|(k, _)| k.clone());
        let new_key = self.pattern.derive(new_element);

        if old_key == new_key {
            return Ok(());
        }

        if let Some(key) = new_key {
            self.mapping
                .insert(key, position)
                .map_err(|e| CoreError::incomparable_keys(&self.name, position, e.to_string()))?;
        }
        if let Some(key) = old_key {
            self.mapping.remove(&key, position);
        }
        Ok(())
    }

    fn index_position<E: Element>(&mut self, position: usize, element: &E) -> Result<(), CoreError> {
        let Some(key) = self.pattern.derive(element) else {
            return Ok(());
        };
        self.mapping
            .insert(key, position)
            .map_err(|e| CoreError::incomparable_keys(&self.name, position, e.to_string()))
    }

    fn remove_position_without_renumber(&mut self, position: usize) {
        let key = self
            .mapping
            .iter()
            .find(|(_, positions)| positions.contains(&position))
            .map(|(k, _)| k.clone());
        if let Some(key) = key {
            self.mapping.remove(&key, position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::Comparator;
    use crate::transform::Chain;

    fn cycle(values: &[i64], len: usize) -> Vec<Value> {
        values
            .iter()
            .cycle()
            .take(len)
            .map(|v| Value::Int(*v))
            .collect()
    }

    #[test]
    fn build_indexes_every_position_under_identity() {
        let host = cycle(&[1, 2, 3], 15);
        let mut lookup = Lookup::new("sample", None);
        lookup.build(&host).unwrap();

        let mut found: Vec<_> = lookup
            .mapping()
            .get(&Value::Int(1))
            .unwrap()
            .iter()
            .copied()
            .collect();
        found.sort_unstable();
        assert_eq!(found, vec![0, 3, 6, 9, 12]);
    }

    #[test]
    fn filtered_lookup_skips_nonmatching_elements() {
        let host = cycle(&[1, 2, 3], 15);
        let pattern: Pattern =
            SearchPattern::new(Chain::identity(), Comparator::Eq(Value::Int(1))).into();
        let mut lookup = Lookup::new("sample", Some(pattern));
        lookup.build(&host).unwrap();

        assert_eq!(lookup.mapping().len(), 1);
        assert!(lookup.mapping().get(&Value::Int(2)).is_none());
    }

    #[test]
    fn delete_renumbers_positions() {
        let host = vec![
            Value::Int(95),
            Value::Int(96),
            Value::Int(97),
            Value::Int(98),
            Value::Int(99),
        ];
        let mut lookup = Lookup::new("basic", None);
        lookup.build(&host).unwrap();

        lookup.on_delete(3); // removes 98

        let mut keys: Vec<_> = lookup.mapping().keys().cloned().collect();
        keys.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(
            keys,
            vec![
                Value::Int(95),
                Value::Int(96),
                Value::Int(97),
                Value::Int(99)
            ]
        );
        let remaining: Vec<_> = lookup.mapping().get(&Value::Int(99)).unwrap().iter().copied().collect();
        assert_eq!(remaining, vec![3]);
    }

    #[test]
    fn dict_access_skips_elements_missing_key() {
        let a = Value::from("a");
        let host = vec![
            Value::Map(vec![(a.clone(), Value::Int(1)), (Value::from("b"), Value::Int(2))]),
            Value::Map(vec![(Value::from("b"), Value::Int(3))]),
            Value::Map(vec![(a.clone(), Value::Int(2)), (Value::from("b"), Value::Int(4))]),
            Value::Map(vec![(a, Value::Int(3)), (Value::from("b"), Value::Int(5))]),
        ];

        let pattern: Pattern = IndexerPattern::new(Chain::identity().push_key(Value::from("a"))).into();
        let mut lookup = Lookup::new("by_a", Some(pattern));
        lookup.build(&host).unwrap();

        assert_eq!(lookup.mapping().get(&Value::Int(1)).unwrap().iter().copied().collect::<Vec<_>>(), vec![0]);
        assert_eq!(lookup.mapping().get(&Value::Int(2)).unwrap().iter().copied().collect::<Vec<_>>(), vec![2]);
        assert_eq!(lookup.mapping().get(&Value::Int(3)).unwrap().iter().copied().collect::<Vec<_>>(), vec![3]);
        assert!(lookup.mapping().len() == 3);
    }

    #[test]
    fn replace_reindexes_position_under_new_key() {
        let host = vec![Value::Int(1), Value::Int(2), Value::Int(3)];
        let mut lookup = Lookup::new("sample", None);
        lookup.build(&host).unwrap();

        lookup.on_replace(1, &Value::Int(20)).unwrap();

        assert!(lookup.mapping().get(&Value::Int(2)).is_none());
        assert_eq!(
            lookup.mapping().get(&Value::Int(20)).unwrap().iter().copied().collect::<Vec<_>>(),
            vec![1]
        );
    }

    #[test]
    fn failed_replace_leaves_old_key_intact() {
        let host = vec![Value::Int(1), Value::Int(2), Value::Int(3)];
        let mut lookup = Lookup::new("sample", None);
        lookup.build(&host).unwrap();

        let err = lookup.on_replace(1, &Value::from("text")).unwrap_err();
        assert!(matches!(err, CoreError::IncomparableKeys { .. }));

        // The rejected replace must leave position 1 exactly where it was.
        assert_eq!(
            lookup.mapping().get(&Value::Int(2)).unwrap().iter().copied().collect::<Vec<_>>(),
            vec![1]
        );
    }
}
