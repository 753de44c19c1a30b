use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User record. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub age: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
    pub daily_calorie_goal: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// A logged food item, owned by exactly one user.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FoodEntry {
    pub id: i64,
    pub user_id: i64,
    pub food_name: String,
    pub calories: i32,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub image_url: Option<String>,
    /// AI certainty as reported upstream, unclamped.
    pub confidence: Option<f64>,
    pub meal_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for `create_user`; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub age: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
    pub daily_calorie_goal: Option<i32>,
}

/// Partial profile update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub age: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
    pub daily_calorie_goal: Option<i32>,
}

/// Input for `create_entry`.
#[derive(Debug, Clone)]
pub struct NewFoodEntry {
    pub user_id: i64,
    pub food_name: String,
    pub calories: i32,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub image_url: Option<String>,
    pub confidence: Option<f64>,
    pub meal_type: Option<String>,
}
