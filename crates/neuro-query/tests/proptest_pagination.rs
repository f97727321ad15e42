//! Property-based tests for pagination.

use proptest::prelude::*;
use neuro_query::pagination::{Pager, clamp_page, paginate, total_pages};

proptest! {
    /// A page never exceeds the page size and the page number is always valid.
    #[test]
    fn page_is_bounded(len in 0usize..500, page in 0usize..100, size in 1usize..50) {
        let list: Vec<usize> = (0..len).collect();
        let page = paginate(&list, page, size);

        prop_assert!(page.items.len() <= size);
        prop_assert!(page.page >= 1);
        prop_assert!(page.page <= page.total_pages);
        prop_assert_eq!(page.total, len);
        prop_assert_eq!(page.page, clamp_page(page.page, len, size));
    }

    /// Walking every page visits every item once, in order.
    #[test]
    fn pages_cover_list(len in 0usize..300, size in 1usize..40) {
        let list: Vec<usize> = (0..len).collect();
        let mut seen = Vec::new();
        for p in 1..=total_pages(len, size) {
            seen.extend(paginate(&list, p, size).items);
        }
        prop_assert_eq!(seen, list);
    }

    /// The footer range matches the items on the page.
    #[test]
    fn shown_range_matches_items(len in 1usize..300, page in 1usize..20, size in 1usize..40) {
        let list: Vec<usize> = (0..len).collect();
        let page = paginate(&list, page, size);

        prop_assert_eq!(page.last_shown() - page.first_shown() + 1, page.items.len());
        prop_assert_eq!(page.items[0] + 1, page.first_shown());
    }

    /// Navigation never leaves the valid range.
    #[test]
    fn pager_stays_in_range(
        len in 0usize..200,
        steps in proptest::collection::vec(0u8..5, 0..30),
    ) {
        let mut pager = Pager::new(20);
        for step in steps {
            match step {
                0 => pager.next(len),
                1 => pager.previous(len),
                2 => pager.first(),
                3 => pager.last(len),
                _ => pager.go_to(usize::MAX, len),
            }
            let current = pager.current(len);
            prop_assert!(current >= 1 && current <= total_pages(len, 20));
        }
    }
}
