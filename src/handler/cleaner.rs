use std::sync::Arc;

use axum::{
    extract::{Multipart, Query},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::cleanerdb::CleanerExt,
    dtos::cleanerdtos::{
        CleanerListResponseDto, CleanerQueryDto, ClockInDto, ClockOutDto, FilterCleanerDto,
        LoginCleanerDto, LoginResponseDto, PhotoResponseDto, TimeRecordResponseDto,
    },
    error::{ErrorMessage, HttpError},
    middleware::{role_check, JWTAuthMiddleware},
    models::timemodel::PhotoType,
    utils::{password, roles::Permission, token},
    AppState,
};

/// Authenticated cleaner routes; `login` is mounted on the public router.
pub fn cleaner_handler() -> Router {
    Router::new()
        .route("/", get(list_cleaners))
        .route("/clock-in", post(clock_in))
        .route("/clock-out", post(clock_out))
        .route("/upload-photo", post(upload_photo))
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<LoginCleanerDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let cleaner = app_state
        .db_client
        .get_cleaner_by_email(&body.email)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string()))?;

    let password_matched = password::compare(&body.password, &cleaner.password)
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if !password_matched {
        return Err(HttpError::unauthorized(
            ErrorMessage::WrongCredentials.to_string(),
        ));
    }

    if cleaner.is_active == Some(false) {
        return Err(HttpError::unauthorized(
            ErrorMessage::AccountInactive.to_string(),
        ));
    }

    let token = token::create_token(
        &cleaner.id.to_string(),
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage * 60,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie_duration = time::Duration::minutes(app_state.env.jwt_maxage);
    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(cookie_duration)
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build auth cookie"))?,
    );

    let response = Json(LoginResponseDto {
        status: "success".to_string(),
        token,
        cleaner: FilterCleanerDto::filter_cleaner(&cleaner),
    });

    Ok((headers, response))
}

pub async fn list_cleaners(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Query(query): Query<CleanerQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::CleanersView)?;
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(10);
    let offset = (page.saturating_sub(1) as i64) * limit as i64;

    let cleaners = app_state
        .db_client
        .get_cleaners(query.active_only.unwrap_or(false), limit as i64, offset)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(CleanerListResponseDto {
        status: "success".to_string(),
        results: cleaners.len(),
        cleaners: FilterCleanerDto::filter_cleaners(&cleaners),
    }))
}

pub async fn clock_in(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<ClockInDto>,
) -> Result<impl IntoResponse, HttpError> {
    let record = app_state
        .time_tracking
        .clock_in(
            body.booking_id,
            auth.cleaner.id,
            body.lat,
            body.lng,
            body.travel_time,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TimeRecordResponseDto {
            status: "success".to_string(),
            data: record,
        }),
    ))
}

pub async fn clock_out(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<ClockOutDto>,
) -> Result<impl IntoResponse, HttpError> {
    let record = app_state
        .time_tracking
        .clock_out(body.booking_id, auth.cleaner.id, body.lat, body.lng)
        .await?;

    Ok(Json(TimeRecordResponseDto {
        status: "success".to_string(),
        data: record,
    }))
}

/// Multipart upload: `booking_id`, `type`, optional `caption`/`location`
/// and the `file` itself. Storage is a stub that mints a URL; the bytes are
/// not persisted here.
pub async fn upload_photo(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpError> {
    let mut booking_id: Option<Uuid> = None;
    let mut photo_type: Option<PhotoType> = None;
    let mut caption: Option<String> = None;
    let mut location: Option<String> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HttpError::bad_request(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "booking_id" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| HttpError::bad_request(e.to_string()))?;
                booking_id = Some(
                    Uuid::parse_str(&value)
                        .map_err(|_| HttpError::bad_request("booking_id is not a valid UUID"))?,
                );
            }
            "type" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| HttpError::bad_request(e.to_string()))?;
                photo_type = Some(match value.as_str() {
                    "before" => PhotoType::Before,
                    "during" => PhotoType::During,
                    "after" => PhotoType::After,
                    other => {
                        return Err(HttpError::bad_request(format!(
                            "Unknown photo type: {}",
                            other
                        )))
                    }
                });
            }
            "caption" => {
                caption = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| HttpError::bad_request(e.to_string()))?,
                );
            }
            "location" => {
                location = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| HttpError::bad_request(e.to_string()))?,
                );
            }
            "file" => {
                file_name = field.file_name().map(|name| name.to_string());
                // Drain the body; the stub store keeps only the name.
                let _ = field
                    .bytes()
                    .await
                    .map_err(|e| HttpError::bad_request(e.to_string()))?;
            }
            _ => {}
        }
    }

    let booking_id =
        booking_id.ok_or_else(|| HttpError::bad_request("booking_id is required"))?;
    let photo_type = photo_type.ok_or_else(|| HttpError::bad_request("type is required"))?;
    let file_name = file_name.ok_or_else(|| HttpError::bad_request("file is required"))?;

    let photo_url = format!("/uploads/job-photos/{}-{}", Uuid::new_v4(), file_name);

    let photo = app_state
        .time_tracking
        .upload_photo(
            booking_id,
            auth.cleaner.id,
            photo_type,
            photo_url,
            caption,
            location,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PhotoResponseDto {
            status: "success".to_string(),
            data: photo,
        }),
    ))
}
