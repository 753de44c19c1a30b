use axum::{
    extract::{FromRef, State},
    routing::{get, post, put},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, RegisterRequest},
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password},
    },
    error::{ApiError, FieldError},
    state::AppState,
    store::{NewUser, ProfileUpdate, User},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(me))
        .route("/auth/profile", put(update_profile))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let mut errors = Vec::new();

    let username = payload.username.unwrap_or_default().trim().to_string();
    if username.is_empty() {
        errors.push(FieldError::new("username", "Username is required"));
    }

    let email = payload.email.unwrap_or_default().trim().to_lowercase();
    if !is_valid_email(&email) {
        errors.push(FieldError::new("email", "Invalid email"));
    }

    let password = payload.password.unwrap_or_default();
    if password.len() < 6 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters",
        ));
    }

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    if state.store.user_by_email(&email).await?.is_some()
        || state.store.user_by_username(&username).await?.is_some()
    {
        warn!(%email, %username, "register conflict");
        return Err(ApiError::Conflict("User already exists".into()));
    }

    let password_hash = hash_password(&password)?;
    let user = state
        .store
        .create_user(NewUser {
            username,
            email,
            password_hash,
            age: payload.age,
            weight: payload.weight,
            height: payload.height,
            activity_level: payload.activity_level,
            goal: payload.goal,
            daily_calorie_goal: payload.daily_calorie_goal,
        })
        .await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.email)?;

    info!(user_id = user.id, "user registered");
    Ok(Json(AuthResponse { token, user }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = payload.email.unwrap_or_default().trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(ApiError::Validation(vec![FieldError::new(
            "email",
            "Invalid email",
        )]));
    }

    // Any bad password is an auth failure, never a validation hint.
    let password = payload.password.unwrap_or_default();

    // Unknown email and wrong password produce the same response.
    let user = match state.store.user_by_email(&email).await? {
        Some(user) if verify_password(&password, &user.password_hash)? => user,
        _ => {
            warn!(%email, "login rejected");
            return Err(ApiError::Unauthorized("Invalid credentials".into()));
        }
    };

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.email)?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(AuthResponse { token, user }))
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<User>, ApiError> {
    let user = state
        .store
        .user_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    Ok(Json(user))
}

#[instrument(skip(state, update))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .store
        .update_user(user_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    info!(user_id, "profile updated");
    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_regex_accepts_plain_addresses() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
    }

    #[test]
    fn email_regex_rejects_garbage() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a b@x.com"));
        assert!(!is_valid_email("a@nodot"));
    }
}
