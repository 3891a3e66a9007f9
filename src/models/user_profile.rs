use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

/// Profile of the user recommendations are computed for
///
/// Every field is required; a profile can only be built through
/// [`UserProfile::from_json`], which rejects incomplete input up front.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    #[serde(rename = "Age")]
    pub age: f64,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Weight_Goal")]
    pub weight_goal: String,
    #[serde(rename = "Health_Condition")]
    pub health_condition: String,
    #[serde(rename = "Diet_Type")]
    pub diet_type: String,
    #[serde(rename = "Activity_Level")]
    pub activity_level: String,
}

/// Request keys, in the order they are validated
pub const REQUIRED_FIELDS: [&str; 6] = [
    "Age",
    "Gender",
    "Weight_Goal",
    "Health_Condition",
    "Diet_Type",
    "Activity_Level",
];

impl UserProfile {
    /// Validates a raw request body and builds a profile from it
    ///
    /// Fails with [`AppError::InvalidRequest`] when the body is not an object,
    /// a required key is absent or null, `Age` is not a finite number, or a
    /// categorical field is not a string. Extra keys are ignored.
    pub fn from_json(body: &Value) -> AppResult<Self> {
        let fields = body.as_object().ok_or_else(|| {
            AppError::InvalidRequest("Request body must be a JSON object".to_string())
        })?;

        if let Some(missing) = REQUIRED_FIELDS
            .iter()
            .find(|key| fields.get(**key).map_or(true, Value::is_null))
        {
            return Err(AppError::InvalidRequest(format!(
                "Missing required field: {}",
                missing
            )));
        }

        let age = fields["Age"]
            .as_f64()
            .filter(|age| age.is_finite())
            .ok_or_else(|| {
                AppError::InvalidRequest("Field Age must be a number".to_string())
            })?;

        Ok(Self {
            age,
            gender: category(fields, "Gender")?,
            weight_goal: category(fields, "Weight_Goal")?,
            health_condition: category(fields, "Health_Condition")?,
            diet_type: category(fields, "Diet_Type")?,
            activity_level: category(fields, "Activity_Level")?,
        })
    }
}

fn category(fields: &Map<String, Value>, key: &str) -> AppResult<String> {
    fields[key]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::InvalidRequest(format!("Field {} must be a string", key))
        })
}
