//! Daily and weekly aggregates over the authenticated user's entries.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::instrument;

use crate::{
    auth::AuthUser,
    clock::{today_local, trailing_week},
    error::ApiError,
    state::AppState,
    store::FoodEntry,
};

/// Fallback daily calorie goal when the user has not set one.
const DEFAULT_CALORIE_GOAL: i32 = 2000;

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/stats", get(stats))
        .route("/dashboard/weekly", get(weekly))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_calories: i64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub calorie_goal: i32,
    pub entries: usize,
}

#[derive(Debug, Serialize)]
pub struct WeeklyPoint {
    /// ISO calendar date.
    pub date: String,
    /// Short weekday name ("Mon").
    pub day: String,
    pub calories: i64,
}

fn sum_macros(entries: &[FoodEntry]) -> (i64, f64, f64, f64) {
    entries.iter().fold((0, 0.0, 0.0, 0.0), |acc, e| {
        (
            acc.0 + i64::from(e.calories),
            acc.1 + e.protein.unwrap_or(0.0),
            acc.2 + e.carbs.unwrap_or(0.0),
            acc.3 + e.fat.unwrap_or(0.0),
        )
    })
}

#[instrument(skip(state))]
pub async fn stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<DashboardStats>, ApiError> {
    let entries = state
        .store
        .entries_by_user_on(user_id, today_local())
        .await?;
    let (total_calories, total_protein, total_carbs, total_fat) = sum_macros(&entries);

    let calorie_goal = state
        .store
        .user_by_id(user_id)
        .await?
        .and_then(|u| u.daily_calorie_goal)
        .unwrap_or(DEFAULT_CALORIE_GOAL);

    Ok(Json(DashboardStats {
        total_calories,
        total_protein,
        total_carbs,
        total_fat,
        calorie_goal,
        entries: entries.len(),
    }))
}

#[instrument(skip(state))]
pub async fn weekly(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<WeeklyPoint>>, ApiError> {
    let mut points = Vec::with_capacity(7);
    for day in trailing_week(today_local()) {
        let entries = state.store.entries_by_user_on(user_id, day).await?;
        let calories = entries.iter().map(|e| i64::from(e.calories)).sum();
        points.push(WeeklyPoint {
            date: day.format("%Y-%m-%d").to_string(),
            day: day.format("%a").to_string(),
            calories,
        });
    }
    Ok(Json(points))
}
