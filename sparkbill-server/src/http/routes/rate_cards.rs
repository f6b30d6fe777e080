//! Rate card endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::db::NewRateCard;
use crate::http::error::ApiError;
use crate::http::extractors::{RateCardId, ValidJson};
use crate::http::server::AppState;
use crate::models::rate_card::today;
use crate::models::{RateCard, RateCardCreate, RateCardName, RateCardUpdate};

/// GET /api/rate-cards - newest first, each with its ordered items
async fn list_rate_cards(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RateCard>>, ApiError> {
    Ok(Json(state.store.list_rate_cards().await?))
}

/// GET /api/rate-cards/{id}
async fn get_rate_card(
    State(state): State<Arc<AppState>>,
    RateCardId(id): RateCardId,
) -> Result<Json<RateCard>, ApiError> {
    let card = state
        .store
        .get_rate_card(id)
        .await?
        .ok_or_else(|| ApiError::not_found("rate card"))?;
    Ok(Json(card))
}

/// POST /api/rate-cards - card plus optional initial items, atomically
async fn create_rate_card(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<RateCardCreate>,
) -> Result<(StatusCode, Json<RateCard>), ApiError> {
    let card = NewRateCard {
        name: RateCardName::new(&req.name)?,
        created_date: req.created_date.unwrap_or_else(today),
        items: req.items,
    };

    let card = state
        .store
        .create_rate_card(card)
        .await
        .map_err(|e| ApiError::persistence("Error creating rate card", e))?;

    tracing::info!(id = %card.id, items = card.items.len(), "Rate card created");
    Ok((StatusCode::CREATED, Json(card)))
}

/// PUT /api/rate-cards/{id} - only fields present are changed
async fn update_rate_card(
    State(state): State<Arc<AppState>>,
    RateCardId(id): RateCardId,
    ValidJson(mut patch): ValidJson<RateCardUpdate>,
) -> Result<Json<RateCard>, ApiError> {
    if let Some(name) = patch.name.take() {
        patch.name = Some(RateCardName::new(&name)?.into_string());
    }

    let card = state
        .store
        .update_rate_card(id, patch)
        .await
        .map_err(|e| ApiError::persistence("Error updating rate card", e))?
        .ok_or_else(|| ApiError::not_found("rate card"))?;
    Ok(Json(card))
}

/// DELETE /api/rate-cards/{id} - removes the card's items too
async fn delete_rate_card(
    State(state): State<Arc<AppState>>,
    RateCardId(id): RateCardId,
) -> Result<StatusCode, ApiError> {
    if !state.store.delete_rate_card(id).await? {
        return Err(ApiError::not_found("rate card"));
    }
    tracing::info!(%id, "Rate card deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Rate card routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/rate-cards", get(list_rate_cards).post(create_rate_card))
        .route(
            "/api/rate-cards/{id}",
            get(get_rate_card)
                .put(update_rate_card)
                .delete(delete_rate_card),
        )
}
