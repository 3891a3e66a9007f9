use serde::{Deserialize, Serialize};

use super::MealType;

/// A catalog dish with its nutrition facts
///
/// Field names on the wire follow the catalog's column headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    /// Unique key within the catalog
    #[serde(rename = "Dish_Name")]
    pub name: String,
    #[serde(rename = "Meal_Type")]
    pub meal_type: MealType,
    #[serde(rename = "Diet_Type")]
    pub diet_type: String,
    #[serde(rename = "Calories")]
    pub calories: f64,
    #[serde(rename = "Protein")]
    pub protein: f64,
    #[serde(rename = "Carbs")]
    pub carbs: f64,
    #[serde(rename = "Fat")]
    pub fat: f64,
    #[serde(rename = "Fiber")]
    pub fiber: f64,
}

impl Dish {
    /// Nutrition values in feature-schema order
    pub fn nutrition(&self) -> [f64; 5] {
        [
            self.calories,
            self.protein,
            self.carbs,
            self.fat,
            self.fiber,
        ]
    }
}
