//! Bill endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::http::error::ApiError;
use crate::http::extractors::{BillId, ValidJson};
use crate::http::server::AppState;
use crate::models::{next_bill_number, Bill, BillInput, NextBillNumber};

/// GET /api/bills - all bills, bill number descending
async fn list_bills(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Bill>>, ApiError> {
    Ok(Json(state.store.list_bills().await?))
}

/// GET /api/bills-next-number
async fn next_number(
    State(state): State<Arc<AppState>>,
) -> Result<Json<NextBillNumber>, ApiError> {
    let latest = state.store.greatest_bill_no().await?;
    Ok(Json(NextBillNumber {
        next_number: next_bill_number(latest.as_deref()),
    }))
}

/// GET /api/bills/{id}
async fn get_bill(
    State(state): State<Arc<AppState>>,
    BillId(id): BillId,
) -> Result<Json<Bill>, ApiError> {
    let bill = state
        .store
        .get_bill(id)
        .await?
        .ok_or_else(|| ApiError::not_found("bill"))?;
    Ok(Json(bill))
}

/// POST /api/bills
async fn create_bill(
    State(state): State<Arc<AppState>>,
    ValidJson(input): ValidJson<BillInput>,
) -> Result<(StatusCode, Json<Bill>), ApiError> {
    let bill = state
        .store
        .create_bill(input)
        .await
        .map_err(|e| ApiError::persistence("Error creating bill", e))?;

    tracing::info!(bill_no = %bill.bill_no, id = %bill.id, "Bill created");
    Ok((StatusCode::CREATED, Json(bill)))
}

/// PUT /api/bills/{id} - full replacement
async fn update_bill(
    State(state): State<Arc<AppState>>,
    BillId(id): BillId,
    ValidJson(input): ValidJson<BillInput>,
) -> Result<Json<Bill>, ApiError> {
    let bill = state
        .store
        .replace_bill(id, input)
        .await
        .map_err(|e| ApiError::persistence("Error updating bill", e))?
        .ok_or_else(|| ApiError::not_found("bill"))?;
    Ok(Json(bill))
}

/// DELETE /api/bills/{id}
async fn delete_bill(
    State(state): State<Arc<AppState>>,
    BillId(id): BillId,
) -> Result<StatusCode, ApiError> {
    if !state.store.delete_bill(id).await? {
        return Err(ApiError::not_found("bill"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Bill routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/bills", get(list_bills).post(create_bill))
        .route("/api/bills-next-number", get(next_number))
        .route(
            "/api/bills/{id}",
            get(get_bill).put(update_bill).delete(delete_bill),
        )
}
