use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::engagementdb::EngagementExt,
    dtos::engagementdtos::{
        CreateLeadDto, CreateReviewDto, LeadListResponseDto, LeadQueryDto, LeadResponseDto,
        ReviewListResponseDto, ReviewQueryDto, ReviewResponseDto, UpdateLeadStatusDto,
    },
    error::HttpError,
    middleware::{role_check, JWTAuthMiddleware},
    models::bookingmodel::BookingStatus,
    utils::roles::Permission,
    AppState,
};

pub fn reviews_handler() -> Router {
    Router::new().route("/", get(list_reviews).post(create_review))
}

pub fn leads_handler() -> Router {
    Router::new()
        .route("/", get(list_leads).post(create_lead))
        .route("/:lead_id/status", put(update_lead_status))
}

/// Records a review against a completed booking, attributing it to the
/// booking's customer and assigned cleaner.
pub async fn create_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateReviewDto>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::CustomersEdit)?;
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let booking = app_state
        .booking_lifecycle
        .get_booking(body.booking_id)
        .await?;

    if booking.status != BookingStatus::Completed {
        return Err(HttpError::bad_request(
            "Only completed bookings can be reviewed",
        ));
    }

    let review = app_state
        .db_client
        .save_review(
            booking.id,
            booking.customer_id,
            booking.assigned_to,
            body.rating,
            body.comment,
            body.would_recommend,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(ReviewResponseDto {
            status: "success".to_string(),
            data: review,
        }),
    ))
}

pub async fn list_reviews(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Query(query): Query<ReviewQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::CustomersView)?;
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(10);
    let offset = (page.saturating_sub(1) as i64) * limit as i64;

    let reviews = match query.cleaner_id {
        Some(cleaner_id) => app_state
            .db_client
            .get_reviews_for_cleaner(cleaner_id, limit as i64, offset)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?,
        None => app_state
            .db_client
            .get_public_reviews(limit as i64, offset)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?,
    };

    Ok(Json(ReviewListResponseDto {
        status: "success".to_string(),
        results: reviews.len(),
        reviews,
    }))
}

pub async fn create_lead(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateLeadDto>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::CustomersEdit)?;
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let lead = app_state
        .db_client
        .save_lead(
            body.name,
            body.email,
            body.phone,
            body.source,
            body.temperature,
            body.notes,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(LeadResponseDto {
            status: "success".to_string(),
            data: lead,
        }),
    ))
}

pub async fn list_leads(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Query(query): Query<LeadQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::CustomersView)?;
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(10);
    let offset = (page.saturating_sub(1) as i64) * limit as i64;

    let leads = app_state
        .db_client
        .get_leads(query.status, limit as i64, offset)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(LeadListResponseDto {
        status: "success".to_string(),
        results: leads.len(),
        leads,
    }))
}

pub async fn update_lead_status(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(lead_id): Path<Uuid>,
    Json(body): Json<UpdateLeadStatusDto>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::CustomersEdit)?;

    let lead = app_state
        .db_client
        .update_lead_status(lead_id, body.status)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(format!("Lead {} not found", lead_id)))?;

    Ok(Json(LeadResponseDto {
        status: "success".to_string(),
        data: lead,
    }))
}
