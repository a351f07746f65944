//! Property-based test generators using proptest.
//!
//! Criteria generated here only name [`Item`](crate::Item) fields that have
//! a backend field name, so they both evaluate and compile.

use crate::fixtures::Item;
use mirrordb_core::{Comparator, Criteria, EntityId, Value};
use proptest::prelude::*;

/// Float values small enough to collide with each other.
const SCORES: [f64; 5] = [-1.0, 0.0, 0.5, 1.0, 2.5];

/// Strategy for generating comparators.
pub fn comparator_strategy() -> impl Strategy<Value = Comparator> {
    prop::sample::select(Comparator::ALL.to_vec())
}

/// Strategy for generating values of every kind.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-3i64..3).prop_map(Value::Integer),
        prop::sample::select(SCORES.to_vec()).prop_map(Value::Float),
        "[a-c]{0,2}".prop_map(Value::Text),
    ]
}

/// Strategy for generating valid entity IDs.
pub fn entity_id_strategy() -> impl Strategy<Value = EntityId> {
    "[a-f0-9]{1,8}".prop_map(EntityId::new)
}

/// Strategy for generating items, some still without an ID.
pub fn item_strategy() -> impl Strategy<Value = Item> {
    (
        prop::sample::select(vec!["", "", "a", "b"]),
        "[a-c]{1,2}",
        -3i64..3,
        prop::sample::select(SCORES.to_vec()),
    )
        .prop_map(|(id, attr, count, score)| Item::with_id(id, &attr).count(count).score(score))
}

/// Strategy for generating attribute criteria on mapped [`Item`] fields.
///
/// Operands are usually of the field's own kind and sometimes of another.
pub fn item_attr_strategy() -> impl Strategy<Value = Criteria> {
    let attr = ("[a-c]{0,2}", comparator_strategy()).prop_map(|(v, c)| Criteria::attr("Attr", v, c));
    let count = (-3i64..3, comparator_strategy()).prop_map(|(v, c)| Criteria::attr("Count", v, c));
    let score = (prop::sample::select(SCORES.to_vec()), comparator_strategy())
        .prop_map(|(v, c)| Criteria::attr("Score", v, c));
    let id = (prop::sample::select(vec!["", "a", "x"]), comparator_strategy())
        .prop_map(|(v, c)| Criteria::attr("Id", v, c));
    let mixed = (
        prop::sample::select(vec!["Id", "Attr", "Count", "Score"]),
        value_strategy(),
        comparator_strategy(),
    )
        .prop_map(|(name, v, c)| Criteria::attr(name, v, c));

    prop_oneof![2 => id, 3 => attr, 3 => count, 3 => score, 1 => mixed]
}

/// Strategy for generating criteria trees over mapped [`Item`] fields.
pub fn item_criteria_strategy() -> impl Strategy<Value = Criteria> {
    item_attr_strategy().prop_recursive(4, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Criteria::And),
            prop::collection::vec(inner.clone(), 0..4).prop_map(Criteria::Or),
            inner.prop_map(Criteria::not),
        ]
    })
}
