//! Property-based tests for study ordering.

use std::cmp::Ordering;

use proptest::prelude::*;
use neuro_query::models::{SortDirection, SortKey, SortOrder, Study, collate, sort_studies};

fn arb_study() -> impl Strategy<Value = Study> {
    (
        proptest::option::of(1950i64..2030),                 // year
        proptest::option::of("[A-Za-zéÉüÜ ]{0,12}"),         // journal
        proptest::option::of("[A-Za-z0-9éÉ ]{0,16}"),        // title
        proptest::option::of("[A-Za-z,. ]{0,16}"),           // authors
    )
        .prop_map(|(year, journal, title, authors)| Study { year, journal, title, authors })
}

fn arb_order() -> impl Strategy<Value = SortOrder> {
    (
        proptest::sample::select(SortKey::ALL.to_vec()),
        prop_oneof![Just(SortDirection::Asc), Just(SortDirection::Desc)],
    )
        .prop_map(|(key, direction)| SortOrder { key, direction })
}

proptest! {
    /// Adjacent rows are in order and sorting twice changes nothing.
    #[test]
    fn sort_is_ordered_and_idempotent(
        rows in proptest::collection::vec(arb_study(), 0..40),
        order in arb_order(),
    ) {
        let sorted = sort_studies(&rows, order);
        prop_assert_eq!(sorted.len(), rows.len());
        for pair in sorted.windows(2) {
            prop_assert_ne!(order.compare(&pair[0], &pair[1]), Ordering::Greater);
        }
        prop_assert_eq!(sort_studies(&sorted, order), sorted.clone());
        for row in &rows {
            prop_assert!(sorted.contains(row));
        }
    }

    /// Collation is antisymmetric and only equal for identical strings.
    #[test]
    fn collation_is_a_total_order(a in "[A-Za-zéÉ]{0,8}", b in "[A-Za-zéÉ]{0,8}") {
        prop_assert_eq!(collate::compare(&a, &b), collate::compare(&b, &a).reverse());
        prop_assert_eq!(collate::compare(&a, &b) == Ordering::Equal, a == b);
    }

    /// Case differences never outrank letter differences.
    #[test]
    fn collation_ignores_case_first(a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
        prop_assume!(a != b);
        prop_assert_eq!(collate::compare(&a.to_uppercase(), &b), a.cmp(&b));
    }
}
