use serde::{Deserialize, Serialize};

use crate::store::User;

/// Request body for registration. Required fields are `Option` so that
/// missing values surface as field-level validation errors instead of a
/// deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub age: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
    pub daily_calorie_goal: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Returned after register/login. `User` serialization already strips
/// the password hash, so it doubles as the public view.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}
