use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::customerdb::CustomerExt,
    dtos::customerdtos::{
        CreateCustomerDto, CustomerListResponseDto, CustomerQueryDto, CustomerResponseDto,
    },
    error::HttpError,
    middleware::{role_check, JWTAuthMiddleware},
    service::error::ServiceError,
    utils::roles::Permission,
    AppState,
};

pub fn customers_handler() -> Router {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route("/:customer_id", get(get_customer))
}

pub async fn create_customer(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateCustomerDto>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::CustomersEdit)?;
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let customer = app_state
        .db_client
        .upsert_customer(body.into_profile())
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(CustomerResponseDto {
            status: "success".to_string(),
            data: customer,
        }),
    ))
}

pub async fn get_customer(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(customer_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::CustomersView)?;

    let customer = app_state
        .db_client
        .get_customer(customer_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or(ServiceError::CustomerNotFound(customer_id))?;

    Ok(Json(CustomerResponseDto {
        status: "success".to_string(),
        data: customer,
    }))
}

pub async fn list_customers(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Query(query): Query<CustomerQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::CustomersView)?;
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(10);
    let offset = (page.saturating_sub(1) as i64) * limit as i64;

    let customers = app_state
        .db_client
        .get_customers(limit as i64, offset)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(CustomerListResponseDto {
        status: "success".to_string(),
        results: customers.len(),
        customers,
    }))
}
