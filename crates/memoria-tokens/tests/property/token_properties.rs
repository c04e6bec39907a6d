use memoria_tokens::{snippet, TokenCounter};
use proptest::prelude::*;

proptest! {
    #[test]
    fn count_text_is_never_negative_and_scales_with_length(s in ".{0,500}") {
        let counter = TokenCounter::new();
        let count = counter.count_text(&s);
        if s.is_empty() {
            prop_assert_eq!(count, 0);
        } else {
            prop_assert!(count >= 1);
        }
    }

    #[test]
    fn snippet_never_exceeds_bound_plus_ellipsis(s in ".{0,2000}", max in 1usize..200) {
        let out = snippet(&s, max);
        // The ellipsis is one extra char beyond max_chars when truncated.
        prop_assert!(out.chars().count() <= max + 1);
    }

    #[test]
    fn snippet_of_short_text_is_identity(s in ".{0,50}") {
        let out = snippet(&s, 1000);
        prop_assert_eq!(out, s);
    }

    #[test]
    fn count_object_is_order_independent_for_maps(a in 0i64..1000, b in 0i64..1000) {
        let counter = TokenCounter::new();
        let v1 = serde_json::json!({"a": a, "b": b});
        let v2 = serde_json::json!({"b": b, "a": a});
        prop_assert_eq!(counter.count_object(&v1), counter.count_object(&v2));
    }
}
