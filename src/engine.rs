use crate::element::Element;
use crate::error::CoreError;
use crate::host::{HostSequence, VecHost};
use crate::lookup::Lookup;
use crate::ops::{self, DataScan, FetchItemsByIndices};
use crate::pattern::{Pattern, SearchPattern};
use crate::plan::QueryPlan;
use crate::planner;
use tracing::debug;

///
/// SeqDex
///
/// Top-level facade binding a host sequence to the lookups declared over
/// it, and the planner/stream-operation glue that turns a `SearchPattern`
/// into a result stream (spec §6.3). This is the only thing allowed to
/// call a host's mutators, and it notifies every lookup in declaration
/// order after each one (spec §5).
///

pub struct SeqDex<H: HostSequence> {
    host: H,
    lookups: Vec<Lookup>,
}

impl<H: HostSequence> SeqDex<H> {
    #[must_use]
    pub fn new(host: H) -> Self {
        Self {
            host,
            lookups: Vec::new(),
        }
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[must_use]
    pub fn lookups(&self) -> &[Lookup] {
        &self.lookups
    }

    /// Look up a registered lookup by name (spec §7: an attempt to operate
    /// on an unregistered lookup name surfaces `UnknownLookup`).
    pub fn lookup(&self, name: &str) -> Result<&Lookup, CoreError> {
        self.lookups
            .iter()
            .find(|l| l.name() == name)
            .ok_or_else(|| CoreError::unknown_lookup(name))
    }

    /// Register a new lookup and build it over the current host contents
    /// (spec §6.3 `create_lookup`). `pattern` defaults to an identity
    /// indexer when `None`. Errors if `name` is already taken.
    pub fn create_lookup(
        &mut self,
        pattern: impl Into<Option<Pattern>>,
        name: impl Into<String>,
    ) -> Result<&Lookup, CoreError> {
        let name = name.into();
        if self.lookups.iter().any(|l| l.name() == name) {
            return Err(CoreError::duplicate_lookup(name));
        }
        let mut lookup = Lookup::new(name, pattern.into());
        lookup.build(self.host.as_slice())?;
        debug!(name = lookup.name(), "lookup registered");
        self.lookups.push(lookup);
        Ok(self.lookups.last().expect("just pushed"))
    }

    /// Describe, without executing, the plan `search` would run for
    /// `query` (spec §6.3 `plan`).
    #[must_use]
    pub fn plan(&self, query: &SearchPattern) -> QueryPlan {
        planner::plan(query, &self.lookups).plan
    }

    /// Run `query`, routing through whichever lookup the planner picks,
    /// or falling back to a full scan when none handles it (spec §4.6/
    /// §6.3 `search`).
    pub fn search<'a>(
        &'a self,
        query: SearchPattern,
    ) -> Box<dyn Iterator<Item = (usize, &'a H::Element)> + 'a> {
        let planned = planner::plan(&query, &self.lookups);

        let Some(lookup) = planned.lookup else {
            return Box::new(DataScan::new(query, self.host.as_slice()));
        };

        let comparator = query.comparator().clone();
        if comparator.is_range() {
            let start = comparator.start_position(lookup.mapping());
            let seek = ops::LookupRangeSeek::new(lookup, start, move |k| comparator.matches(k));
            let positions = ops::chain(seek);
            Box::new(FetchItemsByIndices::new(self.host.as_slice(), positions))
        } else {
            let keys = comparator.values();
            let seek = ops::LookupSeek::new(lookup, keys);
            let positions = ops::chain(seek);
            Box::new(FetchItemsByIndices::new(self.host.as_slice(), positions))
        }
    }
}

///
/// Mutators
///
/// Only implemented for the `VecHost` reference host: `HostSequence`
/// itself stays read-only (spec §1/§6.1), so mutation is specific to
/// whatever concrete host exposes it. A production host would get an
/// equivalent impl block wired to its own mutators.
///

impl<E: Element> SeqDex<VecHost<E>> {
    /// Append to the tail, then notify every lookup in declaration order
    /// (spec §6.1 `on_insert`).
    pub fn append(&mut self, element: E) -> Result<usize, CoreError> {
        let position = self.host.push(element);
        let value = self.host.get(position).expect("just inserted");
        for lookup in &mut self.lookups {
            lookup.on_insert(position, value)?;
        }
        debug!(position, "element appended");
        Ok(position)
    }

    /// Replace the element at `position` in place, then notify every
    /// lookup in declaration order (spec §6.1 `on_replace`).
    pub fn replace(&mut self, position: usize, element: E) -> Result<E, CoreError> {
        let len = self.host.len();
        let old = self
            .host
            .replace(position, element)
            .ok_or(CoreError::OutOfRange { position, len })?;
        let value = self.host.get(position).expect("just replaced");
        for lookup in &mut self.lookups {
            lookup.on_replace(position, value)?;
        }
        Ok(old)
    }

    /// Remove the element at `position`, shifting later positions down,
    /// then notify every lookup in declaration order so their position
    /// sets are renumbered consistently (spec §6.1 `on_delete`).
    pub fn delete(&mut self, position: usize) -> Result<E, CoreError> {
        let len = self.host.len();
        let removed = self
            .host
            .remove(position)
            .ok_or(CoreError::OutOfRange { position, len })?;
        for lookup in &mut self.lookups {
            lookup.on_delete(position);
        }
        debug!(position, "element deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Query;
    use crate::value::Value;

    fn cycle(values: &[i64], len: usize) -> VecHost<Value> {
        VecHost::from_vec(values.iter().cycle().take(len).map(|v| Value::Int(*v)).collect())
    }

    #[test]
    fn search_falls_back_to_scan_with_no_lookups() {
        let engine = SeqDex::new(cycle(&[1, 2, 3, 4, 5, 6, 7], 9));
        let query = Query::new().eq(2);
        let found: Vec<usize> = engine.search(query).map(|(p, _)| p).collect();
        assert_eq!(found, vec![1, 8]);
    }

    #[test]
    fn search_uses_lookup_once_one_is_registered() {
        let mut engine = SeqDex::new(cycle(&[1, 2, 3, 4, 5, 6, 7], 20));
        engine.create_lookup(None, "basic").unwrap();

        let plan = engine.plan(&Query::new().eq(5));
        assert!(plan.uses_lookup());

        let found: Vec<usize> = engine.search(Query::new().eq(5)).map(|(p, _)| p).collect();
        assert_eq!(found, vec![4, 11, 18]);
    }

    #[test]
    fn append_keeps_lookup_in_sync() {
        let mut engine = SeqDex::new(VecHost::from_vec(vec![Value::Int(1), Value::Int(2)]));
        engine.create_lookup(None, "basic").unwrap();
        engine.append(Value::Int(3)).unwrap();

        let found: Vec<usize> = engine.search(Query::new().eq(3)).map(|(p, _)| p).collect();
        assert_eq!(found, vec![2]);
    }

    #[test]
    fn delete_renumbers_lookup_and_host_together() {
        let mut engine = SeqDex::new(VecHost::from_vec(vec![
            Value::Int(95),
            Value::Int(96),
            Value::Int(97),
            Value::Int(98),
            Value::Int(99),
        ]));
        engine.create_lookup(None, "basic").unwrap();
        engine.delete(3).unwrap();

        assert_eq!(engine.host().as_slice(), &[
            Value::Int(95),
            Value::Int(96),
            Value::Int(97),
            Value::Int(99)
        ]);
        let found: Vec<usize> = engine.search(Query::new().eq(99)).map(|(p, _)| p).collect();
        assert_eq!(found, vec![3]);
    }

    #[test]
    fn create_lookup_rejects_duplicate_name() {
        let mut engine = SeqDex::new(cycle(&[1, 2, 3], 3));
        engine.create_lookup(None, "basic").unwrap();
        let err = engine.create_lookup(None, "basic").unwrap_err();
        assert!(matches!(err, CoreError::DuplicateLookup { .. }));
    }
}
