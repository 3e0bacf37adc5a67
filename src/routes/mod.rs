pub mod auth;
pub mod dashboard;
pub mod health;
pub mod users;

pub use auth::{login_user, logout_user, password_check, register_user, session_status};
pub use dashboard::{dashboard_overview, dashboard_stats};
pub use health::health_check;
pub use users::{list_roles, list_users, user_profile};
