/// Reciprocal Rank Fusion (spec §4.4, §8 #5): for each id appearing at
/// rank `r` (1-based) in either ranked list, add `1/(k+r)`; sum across
/// lists for ids present in both. `lists` is a slice of ranked id
/// sequences (best first); returns ids sorted by total score
/// descending, ties broken by first appearance across the input lists
/// (a stable sort over the accumulation order).
pub fn reciprocal_rank_fusion(lists: &[Vec<String>], k: f64) -> Vec<(String, f64)> {
    let mut scores: Vec<(String, f64)> = Vec::new();
    let mut index: std::collections::HashMap<String, usize> = std::collections::HashMap::new();

    for list in lists {
        for (i, id) in list.iter().enumerate() {
            let rank = (i + 1) as f64;
            let contribution = 1.0 / (k + rank);
            if let Some(&pos) = index.get(id) {
                scores[pos].1 += contribution;
            } else {
                index.insert(id.clone(), scores.len());
                scores.push((id.clone(), contribution));
            }
        }
    }

    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_one_in_both_lists_scores_two_over_k_plus_one() {
        let lists = vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["a".to_string(), "c".to_string()],
        ];
        let result = reciprocal_rank_fusion(&lists, 60.0);
        let a_score = result.iter().find(|(id, _)| id == "a").unwrap().1;
        assert!((a_score - 2.0 / 61.0).abs() < 1e-12);
    }

    #[test]
    fn better_rank_yields_higher_score() {
        let lists = vec![vec!["a".to_string(), "b".to_string(), "c".to_string()]];
        let result = reciprocal_rank_fusion(&lists, 60.0);
        let scored: std::collections::HashMap<_, _> = result.into_iter().collect();
        assert!(scored["a"] > scored["b"]);
        assert!(scored["b"] > scored["c"]);
    }

    #[test]
    fn id_absent_from_a_list_only_gets_the_contribution_it_earned() {
        let lists = vec![
            vec!["a".to_string()],
            vec!["b".to_string()],
        ];
        let result = reciprocal_rank_fusion(&lists, 60.0);
        let scored: std::collections::HashMap<_, _> = result.into_iter().collect();
        assert!((scored["a"] - 1.0 / 61.0).abs() < 1e-12);
        assert!((scored["b"] - 1.0 / 61.0).abs() < 1e-12);
    }
}
