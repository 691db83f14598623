use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::IntoResponse,
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    db::cleanerdb::CleanerExt,
    error::{ErrorMessage, HttpError},
    models::cleanermodel::{Cleaner, CleanerRole},
    utils::{
        roles::{has_permission, Permission, UserRole},
        token,
    },
    AppState,
};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JWTAuthMiddleware {
    pub cleaner: Cleaner,
    pub role: UserRole,
}

/// Authenticates a staff request from the `token` cookie or a Bearer header,
/// loads the cleaner behind it and stashes them as a request extension.
/// Deactivated accounts are rejected even with a valid token.
pub async fn auth(
    cookie_jar: CookieJar,
    Extension(app_state): Extension<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let cookies = cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| {
                    auth_value
                        .strip_prefix("Bearer ")
                        .map(|token| token.to_owned())
                })
        });

    let token = cookies
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::TokenNotProvided.to_string()))?;

    let cleaner_id = token::decode_token(token, app_state.env.jwt_secret.as_bytes())
        .ok()
        .and_then(|sub| uuid::Uuid::parse_str(&sub).ok())
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::InvalidToken.to_string()))?;

    let cleaner = app_state
        .db_client
        .get_cleaner(cleaner_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| {
            HttpError::unauthorized(ErrorMessage::CleanerNoLongerExists.to_string())
        })?;

    if cleaner.is_active == Some(false) {
        return Err(HttpError::unauthorized(
            ErrorMessage::AccountInactive.to_string(),
        ));
    }

    let role = cleaner.role.unwrap_or(CleanerRole::Cleaner).into();
    req.extensions_mut()
        .insert(JWTAuthMiddleware { cleaner, role });

    Ok(next.run(req).await)
}

/// Rejects a request whose authenticated role lacks the permission.
/// Handlers call this right after extracting the auth extension.
pub fn role_check(auth: &JWTAuthMiddleware, permission: Permission) -> Result<(), HttpError> {
    if !has_permission(auth.role, permission) {
        return Err(HttpError::new(
            ErrorMessage::PermissionDenied.to_string(),
            StatusCode::FORBIDDEN,
        ));
    }
    Ok(())
}
