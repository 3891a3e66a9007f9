use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

use crate::models::{Dish, MealType};

/// In-memory, read-only table of every dish that can be recommended
#[derive(Debug, Default, Clone)]
pub struct DishCatalog {
    dishes: Vec<Dish>,
}

impl DishCatalog {
    /// Builds a catalog, keeping insertion order
    ///
    /// Rejects duplicate dish names and non-finite nutrition values, since
    /// either would make scores impossible to attribute or compute.
    pub fn new(dishes: Vec<Dish>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(dishes.len());
        for dish in &dishes {
            if !seen.insert(dish.name.as_str()) {
                bail!("Duplicate dish name in catalog: {}", dish.name);
            }
            if dish.nutrition().iter().any(|value| !value.is_finite()) {
                bail!("Dish {} has a non-finite nutrition value", dish.name);
            }
        }

        Ok(Self { dishes })
    }

    /// Loads the catalog from a JSON array of dish records
    ///
    /// Any malformed record fails the whole load, and the error names the
    /// offending dish.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let records: Vec<Value> = super::artifacts::read_json(path)
            .with_context(|| {
                format!("Could not load dish catalog from {}", path.display())
            })?;

        let dishes = records
            .into_iter()
            .enumerate()
            .map(|(row, record)| {
                let label = dish_label(row, &record);
                serde_json::from_value::<Dish>(record)
                    .with_context(|| format!("Invalid dish {} in {}", label, path.display()))
            })
            .collect::<Result<Vec<_>>>()?;
        let catalog = Self::new(dishes)?;

        tracing::info!(
            path = %path.display(),
            dishes = catalog.len(),
            breakfast = catalog.count_for_meal(MealType::Breakfast),
            lunch = catalog.count_for_meal(MealType::Lunch),
            snack = catalog.count_for_meal(MealType::Snack),
            dinner = catalog.count_for_meal(MealType::Dinner),
            "Dish catalog loaded"
        );

        Ok(catalog)
    }

    /// All dishes served at `meal`, in catalog order. Empty when there are none.
    pub fn dishes_for_meal(&self, meal: MealType) -> Vec<&Dish> {
        self.dishes
            .iter()
            .filter(|dish| dish.meal_type == meal)
            .collect()
    }

    pub fn count_for_meal(&self, meal: MealType) -> usize {
        self.dishes.iter().filter(|dish| dish.meal_type == meal).count()
    }

    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }
}

/// Names a raw catalog record for error messages, falling back to its row
fn dish_label(row: usize, record: &Value) -> String {
    match record.get("Dish_Name").and_then(Value::as_str) {
        Some(name) => format!("'{}' (row {})", name, row),
        None => format!("at row {}", row),
    }
}
