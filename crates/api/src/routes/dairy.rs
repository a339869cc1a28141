//! Dairy route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use godairy_core::OwnerId;

use crate::error::{AppError, Result};
use crate::models::Dairy;
use crate::state::AppState;

/// Dairy creation request.
#[derive(Debug, Deserialize)]
pub struct CreateDairyRequest {
    pub owner_id: String,
    pub name: String,
    pub address: String,
}

/// Successful creation response.
#[derive(Debug, Serialize)]
pub struct CreateDairyResponse {
    pub message: &'static str,
    /// The allocated public dairy code.
    pub dairy_id: String,
    /// The internal record ID.
    pub id: String,
}

/// POST /dairy/create - create a dairy with a freshly allocated code.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateDairyRequest>,
) -> Result<Json<CreateDairyResponse>> {
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }

    let dairy = state
        .dairy()
        .create(
            OwnerId::from(request.owner_id),
            request.name,
            request.address,
        )
        .await?;

    Ok(Json(CreateDairyResponse {
        message: "Dairy created successfully",
        dairy_id: dairy.dairy_id.to_string(),
        id: dairy.id.into_inner(),
    }))
}

/// GET /dairy/{owner_id} - list an owner's dairies in creation order.
pub async fn list(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> Result<Json<Vec<Dairy>>> {
    let dairies = state
        .dairy()
        .list_by_owner(&OwnerId::from(owner_id))
        .await?;

    Ok(Json(dairies))
}
