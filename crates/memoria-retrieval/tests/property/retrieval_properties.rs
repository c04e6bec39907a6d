use memoria_retrieval::{cosine_similarity, reciprocal_rank_fusion};
use proptest::prelude::*;

fn nonzero_vec() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-10.0f32..10.0, 1..16)
        .prop_filter("vector must be nonzero", |v| v.iter().any(|x| *x != 0.0))
}

proptest! {
    #[test]
    fn cosine_self_similarity_is_one(v in nonzero_vec()) {
        let sim = cosine_similarity(&v, &v).unwrap();
        prop_assert!((sim - 1.0).abs() < 1e-4);
    }

    #[test]
    fn cosine_is_bounded(a in nonzero_vec().prop_flat_map(|v| {
        let len = v.len();
        (Just(v), prop::collection::vec(-10.0f32..10.0, len..=len))
    })) {
        let (a, b) = a;
        let sim = cosine_similarity(&a, &b).unwrap();
        prop_assert!(sim >= -1.0 - 1e-6 && sim <= 1.0 + 1e-6);
    }

    #[test]
    fn cosine_is_symmetric(a in nonzero_vec().prop_flat_map(|v| {
        let len = v.len();
        (Just(v), prop::collection::vec(-10.0f32..10.0, len..=len))
    })) {
        let (a, b) = a;
        let ab = cosine_similarity(&a, &b).unwrap();
        let ba = cosine_similarity(&b, &a).unwrap();
        prop_assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn rrf_rank_one_in_both_lists_scores_two_over_k_plus_one(k in 1.0f64..200.0) {
        let lists = vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["a".to_string(), "c".to_string()],
        ];
        let result = reciprocal_rank_fusion(&lists, k);
        let a_score = result.iter().find(|(id, _)| id == "a").unwrap().1;
        prop_assert!((a_score - 2.0 / (k + 1.0)).abs() < 1e-9);
    }
}
