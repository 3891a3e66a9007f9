use crate::models::ScoredDish;

/// Dishes recommended per meal slot unless configured otherwise
pub const DEFAULT_TOP_K: usize = 5;

/// Pairs names with scores and orders them best first
///
/// The sort is stable, so dishes with equal scores keep their catalog order.
pub fn rank(dish_names: &[String], scores: &[f64]) -> Vec<ScoredDish> {
    let mut scored: Vec<ScoredDish> = dish_names
        .iter()
        .zip(scores)
        .map(|(name, score)| ScoredDish {
            name: name.clone(),
            score: *score,
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Names of the `k` highest-scoring dishes, best first
pub fn select_top(dish_names: &[String], scores: &[f64], k: usize) -> Vec<String> {
    rank(dish_names, scores)
        .into_iter()
        .take(k)
        .map(|dish| dish.name)
        .collect()
}
