//! Gig CRUD and listing endpoints.

use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::common::GigId;
use crate::domains::gigs::{Gig, GigStatus};
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;
use crate::server::middleware::AuthUser;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Deserialize)]
pub struct ListGigsQuery {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct GigRequest {
    pub title: String,
    pub description: String,
    pub budget: f64,
}

/// GET /api/gigs: public, open gigs only, searchable and paginated.
pub async fn list_gigs_handler(
    Extension(state): Extension<AxumAppState>,
    Query(query): Query<ListGigsQuery>,
) -> Result<Json<Value>, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let (gigs, total) = Gig::list_open(search, page, limit, &state.db_pool).await?;

    let total_pages = (total + limit - 1) / limit;
    Ok(Json(json!({
        "success": true,
        "count": gigs.len(),
        "total": total,
        "pagination": {
            "page": page,
            "limit": limit,
            "totalPages": total_pages,
            "hasNext": page * limit < total,
            "hasPrev": page > 1,
        },
        "data": gigs,
    })))
}

/// GET /api/gigs/:id: public.
pub async fn get_gig_handler(
    Extension(state): Extension<AxumAppState>,
    Path(gig_id): Path<GigId>,
) -> Result<Json<Value>, ApiError> {
    let gig = Gig::find_with_owner(gig_id, &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Gig not found"))?;

    Ok(Json(json!({ "success": true, "data": gig })))
}

/// GET /api/gigs/user/me: the caller's own gigs, any status.
pub async fn my_gigs_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let gigs = Gig::find_by_owner(auth.user_id, &state.db_pool).await?;

    Ok(Json(json!({
        "success": true,
        "count": gigs.len(),
        "data": gigs,
    })))
}

/// POST /api/gigs
pub async fn create_gig_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
    Json(body): Json<GigRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (title, description, budget) = validate_gig_input(&body)?;

    let gig = Gig::create(title, description, budget, auth.user_id, &state.db_pool).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": gig })),
    ))
}

/// PUT /api/gigs/:id: owner only, while open only.
pub async fn update_gig_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
    Path(gig_id): Path<GigId>,
    Json(body): Json<GigRequest>,
) -> Result<Json<Value>, ApiError> {
    let (title, description, budget) = validate_gig_input(&body)?;

    let existing = Gig::find_by_id(gig_id, &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Gig not found"))?;
    if existing.owner_id != auth.user_id {
        return Err(ApiError::unauthorized("Not authorized to update this gig"));
    }
    if existing.status != GigStatus::Open {
        return Err(ApiError::bad_request("Cannot update assigned gigs"));
    }

    // The model re-checks owner and status inside the write, so an edit
    // racing a hire fails cleanly instead of mutating an assigned gig.
    let updated = Gig::update(
        gig_id,
        auth.user_id,
        title,
        description,
        budget,
        &state.db_pool,
    )
    .await?
    .ok_or_else(|| ApiError::conflict("Gig is already assigned"))?;

    Ok(Json(json!({ "success": true, "data": updated })))
}

/// DELETE /api/gigs/:id: owner only, while open only.
pub async fn delete_gig_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
    Path(gig_id): Path<GigId>,
) -> Result<Json<Value>, ApiError> {
    let existing = Gig::find_by_id(gig_id, &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Gig not found"))?;
    if existing.owner_id != auth.user_id {
        return Err(ApiError::unauthorized("Not authorized to delete this gig"));
    }
    if existing.status != GigStatus::Open {
        return Err(ApiError::bad_request("Cannot delete assigned gigs"));
    }

    if !Gig::delete(gig_id, auth.user_id, &state.db_pool).await? {
        return Err(ApiError::conflict("Gig is already assigned"));
    }

    Ok(Json(json!({ "success": true, "data": {} })))
}

fn validate_gig_input(body: &GigRequest) -> Result<(&str, &str, Decimal), ApiError> {
    let title = body.title.trim();
    let description = body.description.trim();

    if !(5..=100).contains(&title.chars().count()) {
        return Err(ApiError::bad_request(
            "Title must be between 5 and 100 characters",
        ));
    }
    if !(10..=1000).contains(&description.chars().count()) {
        return Err(ApiError::bad_request(
            "Description must be between 10 and 1000 characters",
        ));
    }

    let budget = Decimal::try_from(body.budget)
        .map_err(|_| ApiError::bad_request("Budget must be a valid number"))?;
    if budget < Decimal::ONE || budget > Decimal::from(1_000_000) {
        return Err(ApiError::bad_request(
            "Budget must be between 1 and 1,000,000",
        ));
    }

    Ok((title, description, budget))
}
