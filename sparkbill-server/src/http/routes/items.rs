//! Rate card item endpoints
//!
//! Every handler confirms the parent card exists before touching item rows,
//! so an unknown card is always "Rate card not found" and an item of another
//! card is "Item not found".

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use uuid::Uuid;

use crate::http::error::ApiError;
use crate::http::extractors::{ItemPath, RateCardId, ValidJson};
use crate::http::server::AppState;
use crate::models::{RateCardItem, RateCardItemCreate, RateCardItemUpdate};

async fn ensure_card(state: &AppState, id: Uuid) -> Result<(), ApiError> {
    if state.store.rate_card_exists(id).await? {
        Ok(())
    } else {
        Err(ApiError::not_found("rate card"))
    }
}

/// GET /api/rate-cards/{id}/items - display order
async fn list_items(
    State(state): State<Arc<AppState>>,
    RateCardId(card): RateCardId,
) -> Result<Json<Vec<RateCardItem>>, ApiError> {
    ensure_card(&state, card).await?;
    Ok(Json(state.store.list_items(card).await?))
}

/// GET /api/rate-cards/{id}/items/{item_id}
async fn get_item(
    State(state): State<Arc<AppState>>,
    path: ItemPath,
) -> Result<Json<RateCardItem>, ApiError> {
    ensure_card(&state, path.rate_card_id).await?;
    let item = state
        .store
        .get_item(path.rate_card_id, path.item_id)
        .await?
        .ok_or_else(|| ApiError::not_found("item"))?;
    Ok(Json(item))
}

/// POST /api/rate-cards/{id}/items
async fn create_item(
    State(state): State<Arc<AppState>>,
    RateCardId(card): RateCardId,
    ValidJson(req): ValidJson<RateCardItemCreate>,
) -> Result<(StatusCode, Json<RateCardItem>), ApiError> {
    ensure_card(&state, card).await?;
    let item = state
        .store
        .create_item(card, req)
        .await
        .map_err(|e| ApiError::persistence("Error creating item", e))?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/rate-cards/{id}/items/{item_id} - only fields present are changed
async fn update_item(
    State(state): State<Arc<AppState>>,
    path: ItemPath,
    ValidJson(patch): ValidJson<RateCardItemUpdate>,
) -> Result<Json<RateCardItem>, ApiError> {
    ensure_card(&state, path.rate_card_id).await?;
    let item = state
        .store
        .update_item(path.rate_card_id, path.item_id, patch)
        .await
        .map_err(|e| ApiError::persistence("Error updating item", e))?
        .ok_or_else(|| ApiError::not_found("item"))?;
    Ok(Json(item))
}

/// DELETE /api/rate-cards/{id}/items/{item_id}
async fn delete_item(
    State(state): State<Arc<AppState>>,
    path: ItemPath,
) -> Result<StatusCode, ApiError> {
    ensure_card(&state, path.rate_card_id).await?;
    if !state
        .store
        .delete_item(path.rate_card_id, path.item_id)
        .await?
    {
        return Err(ApiError::not_found("item"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Rate card item routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/rate-cards/{id}/items",
            get(list_items).post(create_item),
        )
        .route(
            "/api/rate-cards/{id}/items/{item_id}",
            get(get_item).put(update_item).delete(delete_item),
        )
}
