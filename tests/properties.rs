//! Property-based tests over the comparator covers relation and the
//! delete/renumber invariant, using proptest.

use proptest::prelude::*;
use seqdex::prelude::*;

fn arb_comparator() -> impl Strategy<Value = Comparator> {
    prop_oneof![
        any::<i64>().prop_map(|v| Comparator::Eq(Value::Int(v))),
        prop::collection::vec(any::<i64>(), 1..6)
            .prop_map(|vs| Comparator::In(vs.into_iter().map(Value::Int).collect())),
        any::<i64>().prop_map(|v| Comparator::Gt(Value::Int(v))),
        any::<i64>().prop_map(|v| Comparator::Ge(Value::Int(v))),
        any::<i64>().prop_map(|v| Comparator::Lt(Value::Int(v))),
        any::<i64>().prop_map(|v| Comparator::Le(Value::Int(v))),
    ]
}

proptest! {
    /// Every comparator covers itself.
    #[test]
    fn covers_is_reflexive(c in arb_comparator()) {
        prop_assert!(c.covers(&c));
    }

    /// If `a` covers `b` and `b` covers `c`, `a` covers `c` — checked on
    /// same-variant point/range comparators, where the relation reduces
    /// to ordinary bound comparison and transitivity is guaranteed.
    #[test]
    fn covers_is_transitive_for_same_direction_ranges(a in any::<i64>(), b in any::<i64>(), c in any::<i64>()) {
        prop_assume!(a <= b && b <= c);
        let ge_a = Comparator::Ge(Value::Int(a));
        let ge_b = Comparator::Ge(Value::Int(b));
        let ge_c = Comparator::Ge(Value::Int(c));
        prop_assert!(ge_a.covers(&ge_b));
        prop_assert!(ge_b.covers(&ge_c));
        prop_assert!(ge_a.covers(&ge_c));
    }

    /// A wider `In` set always covers any of its own subsets.
    #[test]
    fn in_covers_any_subset(values in prop::collection::vec(any::<i64>(), 1..10)) {
        let wide = Comparator::In(values.iter().copied().map(Value::Int).collect());
        for take in 0..=values.len() {
            let subset = Comparator::In(values[..take].iter().copied().map(Value::Int).collect());
            prop_assert!(wide.covers(&subset));
        }
    }

    /// Deleting any position from a built lookup renumbers every
    /// remaining position down past it by exactly one, and leaves
    /// positions before it untouched, for any list of distinct i64
    /// values.
    #[test]
    fn delete_renumbers_exactly_positions_after_it(
        mut values in prop::collection::vec(any::<i64>(), 2..20),
        delete_at in 0usize..20,
    ) {
        values.dedup();
        prop_assume!(delete_at < values.len());

        let mut engine = SeqDex::new(VecHost::from_vec(
            values.iter().copied().map(Value::Int).collect(),
        ));
        engine.create_lookup(None, "basic").unwrap();

        let deleted_value = values[delete_at];
        engine.delete(delete_at).unwrap();

        let lookup = engine.lookup("basic").unwrap();
        for (i, v) in values.iter().enumerate() {
            if i == delete_at {
                continue;
            }
            let expected_position = if i < delete_at { i } else { i - 1 };
            let positions = lookup.mapping().get(&Value::Int(*v));
            if *v == deleted_value && i > delete_at {
                // a later occurrence of the same value: still indexed,
                // just shifted down by one
                prop_assert!(positions.unwrap().contains(&expected_position));
            } else if *v != deleted_value {
                prop_assert!(positions.unwrap().contains(&expected_position));
            }
        }
    }
}
