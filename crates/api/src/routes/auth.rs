//! Authentication route handlers.
//!
//! Both providers share one flow: verify the submitted token, link the
//! verified identity to an owner record, issue a session token, respond
//! with the owner. The response does not reveal whether the token was a
//! first login or a repeat beyond the message text.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use godairy_core::DeviceType;

use crate::error::{Result, set_sentry_user};
use crate::models::Owner;
use crate::services::auth::{IdentityClaim, session};
use crate::state::AppState;

/// Login request carrying a provider token.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub token: String,
    pub device_type: Option<DeviceType>,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub user: Owner,
}

/// POST /auth/google - verify a Google ID token and log the owner in.
pub async fn google_login(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> Result<Json<LoginResponse>> {
    let claim = state.google().verify(&request.token).await?;
    complete_login(&state, claim, request.device_type).await
}

/// POST /auth/apple - verify an Apple identity token and log the owner in.
pub async fn apple_login(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> Result<Json<LoginResponse>> {
    let claim = state.apple().verify(&request.token).await?;
    complete_login(&state, claim, request.device_type).await
}

async fn complete_login(
    state: &AppState,
    claim: IdentityClaim,
    device_type: Option<DeviceType>,
) -> Result<Json<LoginResponse>> {
    let linked = state.identity().link_login(claim, device_type).await?;

    set_sentry_user(&linked.owner.owner_id, Some(linked.owner.email.as_str()));

    let token = session::issue(
        &linked.owner.owner_id,
        &state.config().session_secret,
        Utc::now(),
    )?;

    let message = if linked.is_new {
        "Owner registered successfully"
    } else {
        "Login successful"
    };

    Ok(Json(LoginResponse {
        message,
        token,
        user: linked.owner,
    }))
}
