//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health            - Liveness check
//! GET  /health/ready      - Readiness check (database connectivity)
//!
//! # Auth
//! POST /auth/google       - Login with a Google ID token
//! POST /auth/apple        - Login with an Apple identity token
//!
//! # Dairies
//! POST /dairy/create      - Create a dairy for an owner
//! GET  /dairy/{owner_id}  - List an owner's dairies
//! ```

pub mod auth;
pub mod dairy;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/google", post(auth::google_login))
        .route("/auth/apple", post(auth::apple_login))
        .route("/dairy/create", post(dairy::create))
        .route("/dairy/{owner_id}", get(dairy::list))
}
