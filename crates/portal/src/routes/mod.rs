//! HTTP route handlers for the portal.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Login screen
//! GET  /health                 - Liveness check (in main)
//! GET  /health/ready           - Readiness check (in main)
//!
//! # Auth
//! POST /auth/login             - Login action
//! GET  /cadastro               - Registration screen
//! POST /auth/register          - Registration action
//! POST /auth/logout            - Logout action
//!
//! # Admin panel (administrator only)
//! GET  /admin                  - User list (?filter=pending|all)
//! POST /admin/users/{id}/status - Status-transition command
//!
//! # Quoting (requires auth)
//! GET  /cotacao                - Quoting form
//! POST /cotacao                - Compute quotes
//! ```

pub mod admin;
pub mod auth;
pub mod quotes;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the admin panel router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::index))
        .route("/users/{id}/status", post(admin::update_status))
}

/// Create the quoting router.
pub fn quote_routes() -> Router<AppState> {
    Router::new().route("/", get(quotes::show).post(quotes::calculate))
}

/// Create all routes for the portal.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(auth::login_page))
        .route("/cadastro", get(auth::register_page))
        .nest("/auth", auth_routes())
        .nest("/admin", admin_routes())
        .nest("/cotacao", quote_routes())
}
