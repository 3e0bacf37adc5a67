use axum::{Json, extract::State};
use serde::Serialize;

use crate::AppState;
use crate::error::{AppError, Result};
use crate::models::{Role, UserProfile};

/// Role catalogue entry
#[derive(Debug, Serialize)]
pub struct RoleInfo {
    pub name: Role,
    pub label: &'static str,
    pub description: &'static str,
}

/// Profile of the logged-in user, or `Unauthorized`
pub(crate) fn authenticated_user(state: &AppState) -> Result<UserProfile> {
    match state.store.current_user() {
        Some(user) if state.store.check_auth() => Ok(user),
        _ => Err(AppError::Unauthorized),
    }
}

/// Logged-in user holding an admin or superadmin role, or `Forbidden`
fn admin_user(state: &AppState) -> Result<UserProfile> {
    let user = authenticated_user(state)?;
    if !user.role.is_admin() {
        tracing::warn!("User {} with role {} denied admin access", user.id, user.role);
        return Err(AppError::Forbidden);
    }
    Ok(user)
}

/// Get current user profile
pub async fn user_profile(State(state): State<AppState>) -> Result<Json<UserProfile>> {
    authenticated_user(&state).map(Json)
}

/// List every registered profile (admin only)
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserProfile>>> {
    admin_user(&state)?;

    let store = state.store.clone();
    let users = tokio::task::spawn_blocking(move || store.registered_users()).await??;

    Ok(Json(users))
}

/// List the portal roles with their labels (admin only)
pub async fn list_roles(State(state): State<AppState>) -> Result<Json<Vec<RoleInfo>>> {
    admin_user(&state)?;

    let roles = Role::ALL
        .into_iter()
        .map(|role| RoleInfo {
            name: role,
            label: role.label(),
            description: role.description(),
        })
        .collect();

    Ok(Json(roles))
}
