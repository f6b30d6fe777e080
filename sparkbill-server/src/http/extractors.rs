//! Custom Axum extractors
//!
//! Path identifiers are parsed here so every handler sees typed ids and a
//! malformed id is always a 400 with the same message.

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::error::ApiError;
use crate::models::ValidationError;

fn parse_uuid(raw: &str, resource: &'static str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::Validation(ValidationError::InvalidId { resource }))
}

/// `{id}` of `/api/bills/{id}`
pub struct BillId(pub Uuid);

impl<S> FromRequestParts<S> for BillId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::InvalidId { resource: "bill" }))?;

        Ok(Self(parse_uuid(&id, "bill")?))
    }
}

/// `{id}` of `/api/rate-cards/{id}` and `/api/rate-cards/{id}/items`
pub struct RateCardId(pub Uuid);

impl<S> FromRequestParts<S> for RateCardId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                ApiError::Validation(ValidationError::InvalidId {
                    resource: "rate card",
                })
            })?;

        Ok(Self(parse_uuid(&id, "rate card")?))
    }
}

/// `{id}/items/{itemId}`: card UUID plus integer item id.
///
/// The card id is checked first, so a request with both ids malformed
/// reports the card.
pub struct ItemPath {
    pub rate_card_id: Uuid,
    pub item_id: i32,
}

impl<S> FromRequestParts<S> for ItemPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((card, item)): Path<(String, String)> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::InvalidId { resource: "item" }))?;

        let rate_card_id = parse_uuid(&card, "rate card")?;
        let item_id = item
            .parse::<i32>()
            .map_err(|_| ApiError::Validation(ValidationError::InvalidId { resource: "item" }))?;

        Ok(Self {
            rate_card_id,
            item_id,
        })
    }
}

/// JSON body whose rejections become 422 [`ApiError::InvalidBody`]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
