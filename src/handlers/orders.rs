// src/handlers/orders.rs

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    common::{error::ApiError, extract::parse_id, response},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
};

// GET /orders/{id}
// O id é o do sCart convertido (cType = 2); cabeçalho + itens + totais
pub async fn get_order(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let lead_id = parse_id(&raw_id).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let order = app_state
        .lead_service
        .get_order(&user, lead_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(response::ok(order))
}
