//! Bid endpoints, including the hire transition.

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::common::{BidId, GigId};
use crate::domains::bids::Bid;
use crate::domains::gigs::Gig;
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;
use crate::server::middleware::AuthUser;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBidRequest {
    pub gig_id: GigId,
    pub message: String,
    pub price: f64,
}

/// GET /api/bids/:gig_id: the gig owner's view of all bids on their gig.
pub async fn gig_bids_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
    Path(gig_id): Path<GigId>,
) -> Result<Json<Value>, ApiError> {
    let gig = Gig::find_by_id(gig_id, &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Gig not found"))?;

    if gig.owner_id != auth.user_id {
        return Err(ApiError::unauthorized(
            "Not authorized to view bids for this gig",
        ));
    }

    let bids = Bid::find_by_gig_with_freelancer(gig_id, &state.db_pool).await?;

    Ok(Json(json!({
        "success": true,
        "count": bids.len(),
        "data": bids,
    })))
}

/// GET /api/bids/user/me: the caller's own bids with gig summaries.
pub async fn my_bids_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let bids = Bid::find_by_freelancer(auth.user_id, &state.db_pool).await?;

    Ok(Json(json!({
        "success": true,
        "count": bids.len(),
        "data": bids,
    })))
}

/// POST /api/bids
pub async fn place_bid_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
    Json(body): Json<PlaceBidRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let message = body.message.trim();
    if !(10..=500).contains(&message.chars().count()) {
        return Err(ApiError::bad_request(
            "Message must be between 10 and 500 characters",
        ));
    }

    let price = Decimal::try_from(body.price)
        .map_err(|_| ApiError::bad_request("Price must be a valid number"))?;
    if price < Decimal::ONE || price > Decimal::from(1_000_000) {
        return Err(ApiError::bad_request(
            "Price must be between 1 and 1,000,000",
        ));
    }

    let bid = Bid::place(body.gig_id, auth.user_id, message, price, &state.db_pool).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": bid })),
    ))
}

/// PATCH /api/bids/:bid_id/hire
///
/// Runs the hire transition, then pushes the notification to the hired
/// freelancer. The push happens strictly after commit and its outcome never
/// changes the response.
pub async fn hire_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
    Path(bid_id): Path<BidId>,
) -> Result<Json<Value>, ApiError> {
    let outcome = state.hire_coordinator.hire(auth.user_id, bid_id).await?;

    match serde_json::to_value(&outcome.notification) {
        Ok(payload) => {
            state
                .notifier
                .notify(outcome.recipient, "notification", payload)
                .await;
        }
        Err(e) => {
            tracing::warn!(error = %e, "hired notification payload failed to serialize");
        }
    }

    Ok(Json(json!({
        "success": true,
        "message": "Freelancer hired successfully",
        "data": outcome.bid,
    })))
}
