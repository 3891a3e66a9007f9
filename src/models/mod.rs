use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod dish;
pub mod recommendation;
pub mod user_profile;

pub use dish::Dish;
pub use recommendation::{Recommendation, ScoredDish, NO_SUITABLE_DISHES};
pub use user_profile::UserProfile;

/// Meal slot a dish belongs to and recommendations are grouped by
///
/// Variant order is the order slots are processed and reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MealType {
    Breakfast,
    Lunch,
    Snack,
    Dinner,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Snack,
        MealType::Dinner,
    ];

    /// Category value as stored in the catalog and seen by the encoder
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Snack => "Snack",
            MealType::Dinner => "Dinner",
        }
    }

    /// Lower-cased key used in the recommendation response
    pub fn slot_key(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Snack => "snack",
            MealType::Dinner => "dinner",
        }
    }
}

impl Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
