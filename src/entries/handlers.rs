use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::AuthUser,
    clock::today_local,
    error::{ApiError, FieldError},
    state::AppState,
    store::{FoodEntry, NewFoodEntry},
};

use super::dto::{CreateEntryRequest, DeletedResponse};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/food-entries", get(list_entries))
        .route("/food-entries/today", get(list_today))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/food-entries", post(create_entry))
        .route("/food-entries/:id", delete(delete_entry))
}

#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<FoodEntry>>, ApiError> {
    Ok(Json(state.store.entries_by_user(user_id).await?))
}

#[instrument(skip(state))]
pub async fn list_today(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<FoodEntry>>, ApiError> {
    let entries = state
        .store
        .entries_by_user_on(user_id, today_local())
        .await?;
    Ok(Json(entries))
}

#[instrument(skip(state, payload))]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateEntryRequest>,
) -> Result<Json<FoodEntry>, ApiError> {
    let mut errors = Vec::new();

    let food_name = payload.food_name.unwrap_or_default().trim().to_string();
    if food_name.is_empty() {
        errors.push(FieldError::new("foodName", "Food name is required"));
    }

    let Some(calories) = payload.calories else {
        errors.push(FieldError::new("calories", "Calories are required"));
        return Err(ApiError::Validation(errors));
    };

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let entry = state
        .store
        .create_entry(NewFoodEntry {
            user_id,
            food_name,
            calories,
            protein: payload.protein,
            carbs: payload.carbs,
            fat: payload.fat,
            image_url: payload.image_url,
            confidence: payload.confidence,
            meal_type: payload.meal_type,
        })
        .await?;

    info!(user_id, entry_id = entry.id, "food entry created");
    Ok(Json(entry))
}

#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, ApiError> {
    if !state.store.delete_entry(id, user_id).await? {
        return Err(ApiError::NotFound("Food entry not found".into()));
    }
    info!(user_id, entry_id = id, "food entry deleted");
    Ok(Json(DeletedResponse {
        message: "Food entry deleted".into(),
    }))
}
