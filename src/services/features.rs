//! Feature rows in the classifier's training schema.
//!
//! The column order below is the one the encoder and the model were fitted
//! on. Rows built in any other order still score, just meaninglessly.

use crate::{
    error::{AppError, AppResult},
    models::{Dish, UserProfile},
};

pub const NUMERICAL_COLUMNS: [&str; 6] = ["Age", "Calories", "Protein", "Carbs", "Fat", "Fiber"];

pub const CATEGORICAL_COLUMNS: [&str; 7] = [
    "Gender",
    "Weight_Goal",
    "Health_Condition",
    "User_Diet_Type",
    "Activity_Level",
    "Meal_Type",
    "Dish_Diet_Type",
];

/// Numerical columns followed by categorical columns
pub const ALL_COLUMNS: [&str; 13] = [
    "Age",
    "Calories",
    "Protein",
    "Carbs",
    "Fat",
    "Fiber",
    "Gender",
    "Weight_Goal",
    "Health_Condition",
    "User_Diet_Type",
    "Activity_Level",
    "Meal_Type",
    "Dish_Diet_Type",
];

/// One (user, dish) pairing, flattened
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    /// Values for [`NUMERICAL_COLUMNS`], in order
    pub numerical: [f64; 6],
    /// Values for [`CATEGORICAL_COLUMNS`], in order
    pub categorical: [String; 7],
}

impl FeatureRow {
    /// Merges a profile with one dish
    ///
    /// The profile's completeness is guaranteed by [`UserProfile::from_json`],
    /// so building a row cannot fail.
    pub fn build(user: &UserProfile, dish: &Dish) -> Self {
        let [calories, protein, carbs, fat, fiber] = dish.nutrition();
        Self {
            numerical: [user.age, calories, protein, carbs, fat, fiber],
            categorical: [
                user.gender.clone(),
                user.weight_goal.clone(),
                user.health_condition.clone(),
                user.diet_type.clone(),
                user.activity_level.clone(),
                dish.meal_type.as_str().to_string(),
                dish.diet_type.clone(),
            ],
        }
    }
}

/// Rows for every candidate of one meal slot, positionally aligned with
/// the dish names they were built from
#[derive(Debug, Clone, Default)]
pub struct FeatureBatch {
    pub rows: Vec<FeatureRow>,
    pub dish_names: Vec<String>,
}

impl FeatureBatch {
    pub fn build(user: &UserProfile, dishes: &[&Dish]) -> Self {
        let (rows, dish_names) = dishes
            .iter()
            .map(|dish| (FeatureRow::build(user, dish), dish.name.clone()))
            .unzip();
        Self { rows, dish_names }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Concatenates each row's numerical values with its encoded categories
    pub fn assemble(&self, encoded: Vec<Vec<f64>>) -> AppResult<Vec<Vec<f64>>> {
        if encoded.len() != self.rows.len() {
            return Err(AppError::Pipeline(format!(
                "Encoder returned {} rows for a batch of {}",
                encoded.len(),
                self.rows.len()
            )));
        }

        Ok(self
            .rows
            .iter()
            .zip(encoded)
            .map(|(row, categories)| {
                let mut features = Vec::with_capacity(row.numerical.len() + categories.len());
                features.extend_from_slice(&row.numerical);
                features.extend(categories);
                features
            })
            .collect())
    }
}
