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
    dtos::{
        bookingdtos::{
            AssignCleanerDto, BookingCreatedDto, BookingListResponseDto, BookingQueryDto,
            BookingResponseDto, CreateBookingDto,
        },
        cleanerdtos::{PhotoListResponseDto, TimeRecordListResponseDto},
    },
    error::HttpError,
    middleware::{role_check, JWTAuthMiddleware},
    utils::roles::Permission,
    AppState,
};

/// Staff-facing booking routes. The public intake funnel mounts
/// `create_booking` and `list_bookings` separately, without auth.
pub fn bookings_handler() -> Router {
    Router::new()
        .route("/:booking_id", get(get_booking))
        .route("/:booking_id/assign", put(assign_cleaner))
        .route("/:booking_id/en-route", put(mark_en_route))
        .route("/:booking_id/complete", put(mark_completed))
        .route("/:booking_id/cancel", put(cancel_booking))
        .route("/:booking_id/time-records", get(list_time_records))
        .route("/:booking_id/photos", get(list_photos))
}

pub async fn create_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateBookingDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let (profile, booking) = body.into_parts();
    let (booking, customer_id) = app_state
        .booking_lifecycle
        .create_booking(profile, booking)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BookingCreatedDto {
            status: "success".to_string(),
            data: booking,
            customer_id,
        }),
    ))
}

pub async fn list_bookings(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<BookingQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(10);

    let bookings = app_state
        .booking_lifecycle
        .list_bookings(query.status, page, limit)
        .await?;

    Ok(Json(BookingListResponseDto {
        status: "success".to_string(),
        results: bookings.len(),
        bookings,
    }))
}

pub async fn get_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::BookingsView)?;

    let booking = app_state.booking_lifecycle.get_booking(booking_id).await?;

    Ok(Json(BookingResponseDto {
        status: "success".to_string(),
        data: booking,
    }))
}

pub async fn assign_cleaner(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(booking_id): Path<Uuid>,
    Json(body): Json<AssignCleanerDto>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::BookingsAssign)?;

    let booking = app_state
        .booking_lifecycle
        .assign_cleaner(booking_id, body.cleaner_id)
        .await?;

    Ok(Json(BookingResponseDto {
        status: "success".to_string(),
        data: booking,
    }))
}

pub async fn mark_en_route(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::BookingsEdit)?;

    let booking = app_state.booking_lifecycle.mark_en_route(booking_id).await?;

    Ok(Json(BookingResponseDto {
        status: "success".to_string(),
        data: booking,
    }))
}

pub async fn mark_completed(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::BookingsEdit)?;

    let booking = app_state
        .booking_lifecycle
        .mark_completed(booking_id)
        .await?;

    Ok(Json(BookingResponseDto {
        status: "success".to_string(),
        data: booking,
    }))
}

pub async fn cancel_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::BookingsEdit)?;

    let booking = app_state
        .booking_lifecycle
        .cancel_booking(booking_id)
        .await?;

    Ok(Json(BookingResponseDto {
        status: "success".to_string(),
        data: booking,
    }))
}

pub async fn list_time_records(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::BookingsView)?;

    let records = app_state.time_tracking.time_records(booking_id).await?;

    Ok(Json(TimeRecordListResponseDto {
        status: "success".to_string(),
        results: records.len(),
        records,
    }))
}

pub async fn list_photos(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::BookingsView)?;

    let photos = app_state.time_tracking.photos(booking_id).await?;

    Ok(Json(PhotoListResponseDto {
        status: "success".to_string(),
        results: photos.len(),
        photos,
    }))
}
