// src/handlers/metadata.rs

use axum::{
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    common::{
        error::{ApiError, AppError},
        extract::{parse_id, parse_optional_body},
        response,
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::metadata::{ReferenceKind, RefreshPayload},
};

// GET /metadata/{kind}
pub async fn list_reference(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(raw_kind): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let kind: ReferenceKind = serde_json::from_value(json!(raw_kind.as_str())).map_err(|_| {
        AppError::BadRequest(format!("Lista desconhecida: '{}'", raw_kind)).to_api_error(&locale, &app_state.i18n_store)
    })?;

    let list = app_state
        .metadata_service
        .list(kind)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(response::ok(list))
}

// GET /metadata/customers/{id}/transporter
pub async fn customer_transporter(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let customer_id = parse_id(&raw_id).map_err(to_api)?;
    let transporter = app_state
        .metadata_service
        .customer_transporter(customer_id)
        .await
        .map_err(to_api)?;

    Ok(response::ok(transporter))
}

// POST /metadata/refresh (somente gerentes)
pub async fn refresh(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    if !user.is_manager() {
        return Err(to_api(AppError::Forbidden));
    }
    let payload: RefreshPayload = parse_optional_body(&body).map_err(to_api)?;

    app_state.metadata_service.refresh(payload.kind).await;

    Ok(response::ok(json!({ "refreshed": true })))
}
