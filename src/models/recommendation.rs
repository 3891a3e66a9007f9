use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use super::MealType;

/// Placeholder returned for a meal slot with no candidate dishes
pub const NO_SUITABLE_DISHES: &str = "No suitable dishes found";

/// A dish name paired with its model score, only alive during one request
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDish {
    pub name: String,
    pub score: f64,
}

/// Ordered dish names per meal slot
///
/// Serializes as a map keyed by the lower-cased slot name, in meal order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recommendation {
    slots: BTreeMap<MealType, Vec<String>>,
}

impl Recommendation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, meal: MealType, dishes: Vec<String>) {
        self.slots.insert(meal, dishes);
    }

    /// Records the placeholder result for a slot without candidates
    pub fn insert_empty(&mut self, meal: MealType) {
        self.slots.insert(meal, vec![NO_SUITABLE_DISHES.to_string()]);
    }

    pub fn get(&self, meal: MealType) -> Option<&[String]> {
        self.slots.get(&meal).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Serialize for Recommendation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.slots
                .iter()
                .map(|(meal, dishes)| (meal.slot_key(), dishes)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_lowercase_keys_in_meal_order() {
        let mut rec = Recommendation::new();
        rec.insert(MealType::Dinner, vec!["Dal".to_string()]);
        rec.insert_empty(MealType::Snack);
        let breakfast = vec!["Idli".to_string(), "Poha".to_string()];
        rec.insert(MealType::Breakfast, breakfast);

        let json = serde_json::to_string(&rec).unwrap();
        assert_eq!(
            json,
            r#"{"breakfast":["Idli","Poha"],"snack":["No suitable dishes found"],"dinner":["Dal"]}"#
        );
    }

    #[test]
    fn test_get() {
        let mut rec = Recommendation::new();
        rec.insert_empty(MealType::Lunch);
        let placeholder = [NO_SUITABLE_DISHES.to_string()];
        assert_eq!(rec.get(MealType::Lunch), Some(&placeholder[..]));
        assert_eq!(rec.get(MealType::Dinner), None);
        assert_eq!(rec.len(), 1);
    }
}
