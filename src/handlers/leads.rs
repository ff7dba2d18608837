// src/handlers/leads.rs

use axum::{
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    common::{
        error::{ApiError, AppError},
        extract::{parse_id, parse_optional_body, ValidatedJson, ValidatedQuery},
        response,
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        cart_item::{AddItemPayload, UpdateItemPayload},
        lead::{ConvertLeadPayload, CreateLeadPayload, LeadQuery, UpdateLeadPayload},
    },
};

// =============================================================================
//  1. LEADS (CABEÇALHO)
// =============================================================================

// GET /leads
pub async fn list_leads(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ValidatedQuery(query): ValidatedQuery<LeadQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let leads = app_state
        .lead_service
        .list(&user, query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(response::ok(leads))
}

// POST /leads
pub async fn create_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<CreateLeadPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let lead = app_state
        .lead_service
        .create(&user, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(response::created(lead))
}

// GET /leads/{id}
pub async fn get_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let lead_id = parse_id(&raw_id).map_err(to_api)?;
    let lead = app_state.lead_service.get(&user, lead_id).await.map_err(to_api)?;

    Ok(response::ok(lead))
}

// PUT /leads/{id}
pub async fn update_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(raw_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateLeadPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let lead_id = parse_id(&raw_id).map_err(to_api)?;
    let lead = app_state
        .lead_service
        .update(&user, lead_id, payload)
        .await
        .map_err(to_api)?;

    Ok(response::ok(lead))
}

// DELETE /leads/{id}
pub async fn delete_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let lead_id = parse_id(&raw_id).map_err(to_api)?;
    app_state.lead_service.delete(&user, lead_id).await.map_err(to_api)?;

    Ok(response::ok(json!({ "id": lead_id, "deleted": true })))
}

// =============================================================================
//  2. ITENS DO CARRINHO
// =============================================================================

// GET /leads/{id}/items
pub async fn list_items(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let lead_id = parse_id(&raw_id).map_err(to_api)?;
    let items = app_state.lead_service.list_items(&user, lead_id).await.map_err(to_api)?;

    Ok(response::ok(items))
}

// POST /leads/{id}/items
pub async fn add_item(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(raw_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<AddItemPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let lead_id = parse_id(&raw_id).map_err(to_api)?;
    let item = app_state
        .lead_service
        .add_item(&user, lead_id, payload)
        .await
        .map_err(to_api)?;

    Ok(response::created(item))
}

// PUT /leads/{id}/items/{itemId}
pub async fn update_item(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((raw_id, raw_item_id)): Path<(String, String)>,
    ValidatedJson(payload): ValidatedJson<UpdateItemPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let lead_id = parse_id(&raw_id).map_err(to_api)?;
    let item_id = parse_id(&raw_item_id).map_err(to_api)?;
    let item = app_state
        .lead_service
        .update_item(&user, lead_id, item_id, payload)
        .await
        .map_err(to_api)?;

    Ok(response::ok(item))
}

// DELETE /leads/{id}/items/{itemId}
pub async fn remove_item(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((raw_id, raw_item_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let lead_id = parse_id(&raw_id).map_err(to_api)?;
    let item_id = parse_id(&raw_item_id).map_err(to_api)?;
    app_state
        .lead_service
        .remove_item(&user, lead_id, item_id)
        .await
        .map_err(to_api)?;

    Ok(response::ok(json!({ "id": item_id, "deleted": true })))
}

// =============================================================================
//  3. TOTAIS E CONVERSÃO
// =============================================================================

// GET /leads/{id}/totals
pub async fn get_totals(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let lead_id = parse_id(&raw_id).map_err(to_api)?;
    let totals = app_state.lead_service.totals(&user, lead_id).await.map_err(to_api)?;

    Ok(response::ok(totals))
}

// POST /leads/{id}/convert
// Corpo opcional: sobrescritas de cabeçalho (transportadora, entrega, OC, comprador)
pub async fn convert_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let lead_id = parse_id(&raw_id).map_err(to_api)?;
    let header: ConvertLeadPayload = parse_optional_body(&body).map_err(to_api)?;

    let result = app_state
        .lead_service
        .convert(&user, lead_id, header)
        .await
        .map_err(to_api)?;

    Ok(response::ok(result))
}
