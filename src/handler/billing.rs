use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::billingdtos::{
        CreatePayoutDto, GenerateInvoiceDto, InvoiceListResponseDto, InvoiceQueryDto,
        InvoiceResponseDto, MarkInvoicePaidDto, MarkPayoutPaidDto, PayoutListResponseDto,
        PayoutQueryDto, PayoutResponseDto,
    },
    error::HttpError,
    middleware::{role_check, JWTAuthMiddleware},
    utils::roles::Permission,
    AppState,
};

pub fn invoices_handler() -> Router {
    Router::new()
        .route("/", get(list_invoices).post(generate_invoice))
        .route("/:invoice_id", get(get_invoice))
        .route("/:invoice_id/send", put(mark_invoice_sent))
        .route("/:invoice_id/pay", put(mark_invoice_paid))
}

pub fn payouts_handler() -> Router {
    Router::new()
        .route("/", get(list_payouts).post(create_payout))
        .route("/:payout_id", get(get_payout))
        .route("/:payout_id/pay", put(mark_payout_paid))
}

pub async fn generate_invoice(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<GenerateInvoiceDto>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::InvoicesCreate)?;

    let invoice = app_state
        .billing
        .generate_invoice(body.booking_id, body.discount, body.notes)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(InvoiceResponseDto {
            status: "success".to_string(),
            data: invoice,
        }),
    ))
}

pub async fn get_invoice(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(invoice_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::InvoicesView)?;

    let invoice = app_state.billing.get_invoice(invoice_id).await?;

    Ok(Json(InvoiceResponseDto {
        status: "success".to_string(),
        data: invoice,
    }))
}

pub async fn list_invoices(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Query(query): Query<InvoiceQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::InvoicesView)?;
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(10);

    let invoices = app_state
        .billing
        .list_invoices(query.status, page, limit)
        .await?;

    Ok(Json(InvoiceListResponseDto {
        status: "success".to_string(),
        results: invoices.len(),
        invoices,
    }))
}

pub async fn mark_invoice_sent(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(invoice_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::InvoicesEdit)?;

    let invoice = app_state.billing.mark_invoice_sent(invoice_id).await?;

    Ok(Json(InvoiceResponseDto {
        status: "success".to_string(),
        data: invoice,
    }))
}

pub async fn mark_invoice_paid(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(invoice_id): Path<Uuid>,
    Json(body): Json<MarkInvoicePaidDto>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::InvoicesEdit)?;

    let invoice = app_state
        .billing
        .mark_invoice_paid(invoice_id, body.paid_date)
        .await?;

    Ok(Json(InvoiceResponseDto {
        status: "success".to_string(),
        data: invoice,
    }))
}

pub async fn create_payout(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreatePayoutDto>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::PayoutsCreate)?;

    let payout = app_state
        .billing
        .create_payout(body.cleaner_id, body.period_start, body.period_end)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PayoutResponseDto {
            status: "success".to_string(),
            data: payout,
        }),
    ))
}

pub async fn get_payout(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(payout_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::PayoutsView)?;

    let payout = app_state.billing.get_payout(payout_id).await?;

    Ok(Json(PayoutResponseDto {
        status: "success".to_string(),
        data: payout,
    }))
}

pub async fn list_payouts(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Query(query): Query<PayoutQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::PayoutsView)?;
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(10);

    let payouts = app_state
        .billing
        .list_payouts(query.cleaner_id, query.status, page, limit)
        .await?;

    Ok(Json(PayoutListResponseDto {
        status: "success".to_string(),
        results: payouts.len(),
        payouts,
    }))
}

pub async fn mark_payout_paid(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(payout_id): Path<Uuid>,
    Json(body): Json<MarkPayoutPaidDto>,
) -> Result<impl IntoResponse, HttpError> {
    role_check(&auth, Permission::PayoutsEdit)?;

    let payout = app_state
        .billing
        .mark_payout_paid(payout_id, body.paid_date, body.transaction_id)
        .await?;

    Ok(Json(PayoutResponseDto {
        status: "success".to_string(),
        data: payout,
    }))
}
