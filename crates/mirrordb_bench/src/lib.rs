//! Benchmark utilities.

use mirrordb_core::{Comparator, Criteria};
use mirrordb_testkit::Item;

/// Generates `count` items with spread-out counts and scores.
pub fn generate_items(count: usize) -> Vec<Item> {
    (0..count)
        .map(|n| {
            let n = n as i64;
            Item::with_id(&format!("i{n}"), &format!("attr-{}", n % 17))
                .count(n % 100)
                .score((n % 10) as f64 / 2.0)
        })
        .collect()
}

/// A criteria combining every node kind, selecting roughly a third of
/// [`generate_items`].
pub fn mixed_criteria() -> Criteria {
    Criteria::and(vec![
        Criteria::attr("Count", 30, Comparator::Gte),
        Criteria::or(vec![
            Criteria::lt("Score", 2.5),
            Criteria::eq("Attr", "attr-3"),
        ]),
        Criteria::not(Criteria::eq("Count", 50)),
    ])
}

/// A left-deep conjunction `depth` levels deep.
pub fn nested_criteria(depth: usize) -> Criteria {
    (0..depth).fold(Criteria::gte("Count", 0), |inner, n| {
        Criteria::and(vec![inner, Criteria::ne("Count", -(n as i64) - 1)])
    })
}
