//! Compiled document filters select exactly what the in-memory evaluator
//! selects.

use mirrordb_core::{Comparator, Criteria, Entity};
use mirrordb_document::{Doc, Document, DocumentCompiler};
use mirrordb_testkit::prelude::*;
use proptest::prelude::*;

fn to_doc(item: &Item) -> Doc {
    match serde_json::to_value(item).unwrap() {
        serde_json::Value::Object(doc) => doc,
        other => panic!("item serialized to {other}"),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn filter_agrees_with_evaluator(item in item_strategy(), criteria in item_criteria_strategy()) {
        let filter = DocumentCompiler.compile::<Item>(&criteria).unwrap();
        prop_assert_eq!(filter.matches(&to_doc(&item)), criteria.is_satisfied_by(&item));
    }

    #[test]
    fn every_comparator_agrees(
        item in item_strategy(),
        comparator in comparator_strategy(),
        value in value_strategy(),
        field in prop::sample::select(vec!["Id", "Attr", "Count", "Score"]),
    ) {
        let criteria = Criteria::attr(field, value, comparator);
        let filter = DocumentCompiler.compile::<Item>(&criteria).unwrap();
        prop_assert_eq!(filter.matches(&to_doc(&item)), criteria.is_satisfied_by(&item));
    }
}

#[test]
fn identifier_criteria_compile_to_id_key() {
    let mut item = Item::new("a");
    item.set_id("i-1".into()).unwrap();

    let filter = DocumentCompiler
        .compile::<Item>(&Criteria::eq("Id", "i-1"))
        .unwrap();
    assert_eq!(filter.to_json(), serde_json::json!({"_id": {"$eq": "i-1"}}));
    assert!(filter.matches(&to_doc(&item)));
}

#[test]
fn unmapped_field_evaluates_but_does_not_compile() {
    let item = Item::new("a").note("hello");
    let criteria = Criteria::attr("Note", "hello", Comparator::Eq);

    assert!(criteria.is_satisfied_by(&item));
    assert!(DocumentCompiler.compile::<Item>(&criteria).is_err());
}

#[test]
fn unassigned_id_agrees_with_evaluator() {
    let item = Item::new("a");
    for criteria in [Criteria::ne("Id", "x"), Criteria::eq("Id", "")] {
        let filter = DocumentCompiler.compile::<Item>(&criteria).unwrap();
        assert!(criteria.is_satisfied_by(&item));
        assert!(filter.matches(&to_doc(&item)));
    }

    let document = Document::new(Doc::new());
    let doc = match serde_json::to_value(&document).unwrap() {
        serde_json::Value::Object(doc) => doc,
        other => panic!("document serialized to {other}"),
    };
    let criteria = Criteria::ne("Id", "x");
    let filter = DocumentCompiler.compile::<Document>(&criteria).unwrap();
    assert!(criteria.is_satisfied_by(&document));
    assert!(filter.matches(&doc));
}
