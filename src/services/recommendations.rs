use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

use crate::{
    error::{AppError, AppResult},
    models::{Dish, MealType, Recommendation, UserProfile},
    services::{
        catalog::DishCatalog,
        encoder::Encodable,
        features::FeatureBatch,
        scorer::Scorable,
        top_k::{select_top, DEFAULT_TOP_K},
    },
};

/// Scores the whole catalog against one user and keeps the best dishes
/// per meal slot
///
/// Holds only shared, immutable state, so one instance serves any number
/// of concurrent requests.
#[derive(Clone)]
pub struct RecommendationPipeline {
    catalog: Arc<DishCatalog>,
    encoder: Arc<dyn Encodable>,
    scorer: Arc<dyn Scorable>,
    top_k: usize,
}

impl RecommendationPipeline {
    pub fn new(
        catalog: Arc<DishCatalog>,
        encoder: Arc<dyn Encodable>,
        scorer: Arc<dyn Scorable>,
    ) -> Self {
        Self {
            catalog,
            encoder,
            scorer,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Validates a raw request body, then recommends for it
    ///
    /// An incomplete profile fails before any dish is scored.
    pub fn recommend_from_json(&self, body: &Value) -> AppResult<Recommendation> {
        let user = UserProfile::from_json(body)?;
        self.recommend(&user)
    }

    /// Generates recommendations for every meal slot
    ///
    /// Slots are processed in meal order. A slot without candidates gets the
    /// placeholder; any other failure aborts the whole request.
    pub fn recommend(&self, user: &UserProfile) -> AppResult<Recommendation> {
        let start = Instant::now();
        let mut recommendation = Recommendation::new();

        for meal in MealType::ALL {
            let candidates = self.catalog.dishes_for_meal(meal);

            if candidates.is_empty() {
                tracing::debug!(meal = %meal, "No candidate dishes for meal");
                recommendation.insert_empty(meal);
                continue;
            }

            let top = self.recommend_for_meal(user, &candidates)?;
            tracing::debug!(
                meal = %meal,
                candidates = candidates.len(),
                selected = top.len(),
                "Meal slot scored"
            );
            recommendation.insert(meal, top);
        }

        tracing::info!(
            processing_time_ms = start.elapsed().as_millis(),
            "Recommendations generated"
        );

        Ok(recommendation)
    }

    /// Builds, encodes and scores one batch of candidates, returning the top names
    fn recommend_for_meal(
        &self,
        user: &UserProfile,
        candidates: &[&Dish],
    ) -> AppResult<Vec<String>> {
        let batch = FeatureBatch::build(user, candidates);

        let encoded = self.encoder.transform(&batch.rows)?;
        let matrix = batch.assemble(encoded)?;
        let scores = self.scorer.predict_probability(&matrix)?;

        if scores.len() != batch.len() {
            return Err(AppError::Pipeline(format!(
                "Scorer returned {} probabilities for {} dishes",
                scores.len(),
                batch.len()
            )));
        }

        if let Some(bad) = scores
            .iter()
            .find(|p| !p.is_finite() || !(0.0..=1.0).contains(*p))
        {
            return Err(AppError::Pipeline(format!(
                "Scorer returned an invalid probability: {}",
                bad
            )));
        }

        Ok(select_top(&batch.dish_names, &scores, self.top_k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::NO_SUITABLE_DISHES,
        services::{
            encoder::MockEncodable,
            features::{FeatureRow, NUMERICAL_COLUMNS},
            scorer::MockScorable,
        },
    };
    use serde_json::json;

    fn dish(name: &str, meal: MealType, calories: f64) -> Dish {
        Dish {
            name: name.to_string(),
            meal_type: meal,
            diet_type: "Vegetarian".to_string(),
            calories,
            protein: 10.0,
            carbs: 20.0,
            fat: 5.0,
            fiber: 4.0,
        }
    }

    fn user() -> UserProfile {
        UserProfile {
            age: 35.0,
            gender: "Female".to_string(),
            weight_goal: "Lose".to_string(),
            health_condition: "Hypertension".to_string(),
            diet_type: "Vegan".to_string(),
            activity_level: "Moderate".to_string(),
        }
    }

    /// Encoder that contributes no columns, so the matrix is just the numerical part
    fn passthrough_encoder() -> MockEncodable {
        let mut encoder = MockEncodable::new();
        encoder
            .expect_transform()
            .returning(|rows: &[FeatureRow]| Ok(vec![Vec::new(); rows.len()]));
        encoder
    }

    /// Scorer whose probability is the dish's calories / 1000
    fn calorie_scorer() -> MockScorable {
        let mut scorer = MockScorable::new();
        scorer
            .expect_predict_probability()
            .returning(|matrix: &[Vec<f64>]| {
                Ok(matrix.iter().map(|row| row[1] / 1000.0).collect())
            });
        scorer
    }

    fn pipeline(
        dishes: Vec<Dish>,
        encoder: MockEncodable,
        scorer: MockScorable,
    ) -> RecommendationPipeline {
        RecommendationPipeline::new(
            Arc::new(DishCatalog::new(dishes).unwrap()),
            Arc::new(encoder),
            Arc::new(scorer),
        )
    }

    #[test]
    fn test_empty_slots_get_placeholder() {
        let p = pipeline(
            vec![dish("Oats", MealType::Breakfast, 300.0)],
            passthrough_encoder(),
            calorie_scorer(),
        );

        let rec = p.recommend(&user()).unwrap();

        assert_eq!(rec.get(MealType::Breakfast).unwrap(), ["Oats"]);
        for meal in [MealType::Lunch, MealType::Snack, MealType::Dinner] {
            assert_eq!(rec.get(meal).unwrap(), [NO_SUITABLE_DISHES]);
        }
    }

    #[test]
    fn test_empty_catalog_never_calls_model() {
        let mut encoder = MockEncodable::new();
        encoder.expect_transform().never();
        let mut scorer = MockScorable::new();
        scorer.expect_predict_probability().never();

        let rec = pipeline(vec![], encoder, scorer).recommend(&user()).unwrap();
        assert_eq!(rec.len(), 4);
    }

    #[test]
    fn test_ties_broken_by_catalog_order() {
        let p = pipeline(
            vec![
                dish("A", MealType::Breakfast, 900.0),
                dish("B", MealType::Breakfast, 900.0),
                dish("C", MealType::Breakfast, 100.0),
            ],
            passthrough_encoder(),
            calorie_scorer(),
        );

        let rec = p.recommend(&user()).unwrap();
        assert_eq!(rec.get(MealType::Breakfast).unwrap(), ["A", "B", "C"]);
    }

    #[test]
    fn test_at_most_five_per_slot_descending() {
        let dishes = (1..=8)
            .map(|i| {
                let calories = i as f64 * 100.0;
                dish(&format!("Dinner {}", i), MealType::Dinner, calories)
            })
            .collect();
        let p = pipeline(dishes, passthrough_encoder(), calorie_scorer());

        let rec = p.recommend(&user()).unwrap();
        assert_eq!(
            rec.get(MealType::Dinner).unwrap(),
            ["Dinner 8", "Dinner 7", "Dinner 6", "Dinner 5", "Dinner 4"]
        );
    }

    #[test]
    fn test_fewer_than_five_candidates_returns_all() {
        let p = pipeline(
            vec![
                dish("Soup", MealType::Lunch, 200.0),
                dish("Wrap", MealType::Lunch, 400.0),
                dish("Bowl", MealType::Lunch, 300.0),
            ],
            passthrough_encoder(),
            calorie_scorer(),
        );

        let rec = p.recommend(&user()).unwrap();
        assert_eq!(rec.get(MealType::Lunch).unwrap(), ["Wrap", "Bowl", "Soup"]);
    }

    #[test]
    fn test_custom_top_k() {
        let dishes = (1..=4)
            .map(|i| dish(&format!("Snack {}", i), MealType::Snack, i as f64))
            .collect();
        let p = pipeline(dishes, passthrough_encoder(), calorie_scorer()).with_top_k(2);

        let rec = p.recommend(&user()).unwrap();
        assert_eq!(rec.get(MealType::Snack).unwrap(), ["Snack 4", "Snack 3"]);
    }

    #[test]
    fn test_encoder_sees_categorical_columns_in_schema_order() {
        let mut encoder = MockEncodable::new();
        encoder
            .expect_transform()
            .withf(|rows: &[FeatureRow]| {
                rows.len() == 1
                    && rows[0].categorical
                        == [
                            "Female",
                            "Lose",
                            "Hypertension",
                            "Vegan",
                            "Moderate",
                            "Snack",
                            "Vegetarian",
                        ]
                        .map(String::from)
            })
            .times(1)
            .returning(|_| Ok(vec![vec![7.0]]));

        let mut scorer = MockScorable::new();
        scorer
            .expect_predict_probability()
            .withf(|matrix: &[Vec<f64>]| {
                matrix.len() == 1
                    && matrix[0].len() == NUMERICAL_COLUMNS.len() + 1
                    && matrix[0] == [35.0, 150.0, 10.0, 20.0, 5.0, 4.0, 7.0]
            })
            .times(1)
            .returning(|_| Ok(vec![0.4]));

        let dishes = vec![dish("Hummus", MealType::Snack, 150.0)];
        let p = pipeline(dishes, encoder, scorer);
        let rec = p.recommend(&user()).unwrap();
        assert_eq!(rec.get(MealType::Snack).unwrap(), ["Hummus"]);
    }

    #[test]
    fn test_one_batch_per_meal_slot() {
        let mut encoder = MockEncodable::new();
        encoder
            .expect_transform()
            .times(2)
            .returning(|rows: &[FeatureRow]| Ok(vec![Vec::new(); rows.len()]));
        let mut scorer = MockScorable::new();
        scorer
            .expect_predict_probability()
            .times(2)
            .returning(|matrix: &[Vec<f64>]| Ok(vec![0.5; matrix.len()]));

        let p = pipeline(
            vec![
                dish("Idli", MealType::Breakfast, 1.0),
                dish("Dosa", MealType::Breakfast, 1.0),
                dish("Paneer", MealType::Dinner, 1.0),
            ],
            encoder,
            scorer,
        );
        assert!(p.recommend(&user()).is_ok());
    }

    #[test]
    fn test_missing_field_fails_before_scoring() {
        let mut encoder = MockEncodable::new();
        encoder.expect_transform().never();
        let mut scorer = MockScorable::new();
        scorer.expect_predict_probability().never();

        let dishes = vec![dish("Oats", MealType::Breakfast, 300.0)];
        let p = pipeline(dishes, encoder, scorer);
        let body = json!({
            "Gender": "Female",
            "Weight_Goal": "Lose",
            "Health_Condition": "None",
            "Diet_Type": "Vegan",
            "Activity_Level": "Active"
        });

        let err = p.recommend_from_json(&body).unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[test]
    fn test_unknown_category_aborts_request() {
        let mut encoder = MockEncodable::new();
        encoder.expect_transform().returning(|rows: &[FeatureRow]| {
            if rows[0].categorical[5] == "Snack" {
                Err(AppError::UnknownCategory {
                    column: "Meal_Type".to_string(),
                    value: "Snack".to_string(),
                })
            } else {
                Ok(rows.iter().map(|_| Vec::new()).collect())
            }
        });

        let p = pipeline(
            vec![
                dish("Oats", MealType::Breakfast, 300.0),
                dish("Nuts", MealType::Snack, 200.0),
                dish("Stew", MealType::Dinner, 600.0),
            ],
            encoder,
            calorie_scorer(),
        );

        let err = p.recommend(&user()).unwrap_err();
        assert!(matches!(err, AppError::UnknownCategory { .. }));
    }

    #[test]
    fn test_probability_count_mismatch_is_pipeline_error() {
        let mut scorer = MockScorable::new();
        scorer
            .expect_predict_probability()
            .returning(|_| Ok(vec![0.5]));

        let p = pipeline(
            vec![
                dish("Rice", MealType::Lunch, 300.0),
                dish("Roti", MealType::Lunch, 250.0),
            ],
            passthrough_encoder(),
            scorer,
        );

        assert!(matches!(p.recommend(&user()), Err(AppError::Pipeline(_))));
    }

    #[test]
    fn test_out_of_range_probability_is_pipeline_error() {
        let mut scorer = MockScorable::new();
        scorer
            .expect_predict_probability()
            .returning(|_| Ok(vec![f64::NAN]));

        let p = pipeline(
            vec![dish("Rice", MealType::Lunch, 300.0)],
            passthrough_encoder(),
            scorer,
        );

        assert!(matches!(p.recommend(&user()), Err(AppError::Pipeline(_))));
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let p = pipeline(
            vec![
                dish("A", MealType::Breakfast, 300.0),
                dish("B", MealType::Breakfast, 500.0),
                dish("C", MealType::Dinner, 700.0),
            ],
            passthrough_encoder(),
            calorie_scorer(),
        );

        let first = p.recommend(&user()).unwrap();
        let second = p.recommend(&user()).unwrap();
        assert_eq!(first, second);
    }
}
