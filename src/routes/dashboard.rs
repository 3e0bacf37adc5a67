use axum::{Json, extract::State};
use serde::Serialize;

use crate::AppState;
use crate::error::Result;
use crate::models::{Role, UserProfile};
use crate::routes::users::authenticated_user;

/// Placeholder dashboard statistics
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_users: usize,
    pub active_alerts: u32,
    pub recent_activities: Vec<String>,
    pub system_status: &'static str,
}

/// Logged-in profile plus the roles it holds
#[derive(Debug, Serialize)]
pub struct OverviewUser {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub roles: Vec<Role>,
}

#[derive(Debug, Serialize)]
pub struct DashboardOverview {
    pub user: OverviewUser,
    pub permissions: Vec<String>,
    pub recent_actions: Vec<String>,
}

/// Get dashboard statistics
///
/// Only the user count is real; alerts and activity are not tracked yet.
pub async fn dashboard_stats(State(state): State<AppState>) -> Result<Json<DashboardStats>> {
    authenticated_user(&state)?;

    let store = state.store.clone();
    let users = tokio::task::spawn_blocking(move || store.registered_users()).await??;

    Ok(Json(DashboardStats {
        total_users: users.len(),
        active_alerts: 0,
        recent_activities: Vec::new(),
        system_status: "operational",
    }))
}

/// Get dashboard overview data
pub async fn dashboard_overview(State(state): State<AppState>) -> Result<Json<DashboardOverview>> {
    let user = authenticated_user(&state)?;

    Ok(Json(DashboardOverview {
        user: OverviewUser {
            roles: vec![user.role],
            profile: user,
        },
        permissions: Vec::new(),
        recent_actions: Vec::new(),
    }))
}
