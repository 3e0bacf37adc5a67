use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::Result;
use crate::forms::{LoginForm, RegisterForm};
use crate::models::UserProfile;
use crate::validation::{RuleStatus, password_checklist, validate_password};

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub redirect: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: UserProfile,
    pub redirect: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub is_authenticated: bool,
    pub user: Option<UserProfile>,
}

#[derive(Debug, Deserialize)]
pub struct PasswordCheckRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct PasswordCheckResponse {
    pub valid: bool,
    pub rules: Vec<RuleStatus>,
}

/// Submit the registration form
///
/// Returns 400 with per-field errors when validation fails and 409 Conflict
/// if the email is already registered. Registration does not log the user in.
pub async fn register_user(
    State(state): State<AppState>,
    Json(form): Json<RegisterForm>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let store = state.store.clone();
    let submitted = tokio::task::spawn_blocking(move || form.submit(&store)).await??;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            redirect: submitted.redirect,
        }),
    ))
}

/// Submit the login form
///
/// Returns 401 for an unknown email, a wrong password or an orphaned
/// credential entry.
pub async fn login_user(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> Result<Json<LoginResponse>> {
    let store = state.store.clone();
    let submitted = tokio::task::spawn_blocking(move || form.submit(&store)).await??;

    Ok(Json(LoginResponse {
        success: true,
        user: submitted.value,
        redirect: submitted.redirect,
    }))
}

pub async fn logout_user(State(state): State<AppState>) -> Result<Json<LogoutResponse>> {
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || store.logout()).await?;

    Ok(Json(LogoutResponse {
        success: true,
        message: "Successfully logged out",
    }))
}

/// Current session, read from memory
pub async fn session_status(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(SessionResponse {
        is_authenticated: state.store.check_auth(),
        user: state.store.current_user(),
    })
}

/// Password checklist for the registration form
pub async fn password_check(Json(payload): Json<PasswordCheckRequest>) -> Json<PasswordCheckResponse> {
    Json(PasswordCheckResponse {
        valid: validate_password(&payload.password),
        rules: password_checklist(&payload.password),
    })
}
