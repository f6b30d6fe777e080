//! Amount-in-words helper endpoint

use std::sync::Arc;

use axum::{extract::Query, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::{amount_in_words, ValidationError};

#[derive(Deserialize)]
pub struct AmountQuery {
    pub amount: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountInWordsResponse {
    pub amount_in_words: String,
}

fn parse_amount(raw: Option<&str>) -> Result<f64, ValidationError> {
    let raw = raw.ok_or(ValidationError::InvalidNumber {
        field: "amount",
        reason: "is required",
    })?;
    let amount: f64 = raw.trim().parse().map_err(|_| ValidationError::InvalidNumber {
        field: "amount",
        reason: "must be a number",
    })?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(ValidationError::InvalidNumber {
            field: "amount",
            reason: "must be a finite, non-negative number",
        });
    }
    Ok(amount)
}

/// GET /api/amount-in-words?amount=1250.50
async fn spell_amount(
    Query(query): Query<AmountQuery>,
) -> Result<Json<AmountInWordsResponse>, ApiError> {
    let amount = parse_amount(query.amount.as_deref())?;
    Ok(Json(AmountInWordsResponse {
        amount_in_words: amount_in_words(amount),
    }))
}

/// Amount-in-words routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/amount-in-words", get(spell_amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, StatusCode};

    use crate::http::routes::test_support::{app, send};

    #[test]
    fn parse_rules() {
        assert_eq!(parse_amount(Some(" 12.5 ")).unwrap(), 12.5);
        assert!(parse_amount(None).is_err());
        assert!(parse_amount(Some("ten")).is_err());
        assert!(parse_amount(Some("-1")).is_err());
        assert!(parse_amount(Some("inf")).is_err());
        assert!(parse_amount(Some("NaN")).is_err());
    }

    #[tokio::test]
    async fn spells_amount() {
        let (app, _) = app();
        let (status, body) =
            send(&app, Method::GET, "/api/amount-in-words?amount=1250.50", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["amountInWords"],
            "One Thousand Two Hundred Fifty Rupees and Fifty Paise Only"
        );
    }

    #[tokio::test]
    async fn bad_amount_is_400() {
        let (app, _) = app();
        let (status, body) = send(&app, Method::GET, "/api/amount-in-words", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "amount: is required");

        let (status, _) =
            send(&app, Method::GET, "/api/amount-in-words?amount=abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
