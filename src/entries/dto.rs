use serde::{Deserialize, Serialize};

/// Request body for logging a food entry. Required fields are `Option`
/// so missing values become field-level validation errors. The owner is
/// always taken from the verified token, never from the body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    pub food_name: Option<String>,
    pub calories: Option<i32>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub image_url: Option<String>,
    pub confidence: Option<f64>,
    pub meal_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: String,
}
