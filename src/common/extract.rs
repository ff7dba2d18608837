// src/common/extract.rs

use axum::{
    body::Bytes,
    extract::{FromRef, FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
};

/// Corpo JSON já desserializado e validado. JSON malformado vira 400
/// BAD_REQUEST e regras do validator viram 400 VALIDATION_ERROR, ambos no
/// envelope padrão.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let locale = Locale::from_headers(req.headers());
        let app_state = AppState::from_ref(state);

        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            AppError::BadRequest(rejection.body_text()).to_api_error(&locale, &app_state.i18n_store)
        })?;

        value
            .validate()
            .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

        Ok(ValidatedJson(value))
    }
}

/// Query string desserializada e validada.
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let locale = Locale::from_headers(&parts.headers);
        let app_state = AppState::from_ref(state);

        let Query(value) = Query::<T>::from_request_parts(parts, state).await.map_err(|rejection| {
            AppError::BadRequest(rejection.body_text()).to_api_error(&locale, &app_state.i18n_store)
        })?;

        value
            .validate()
            .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

        Ok(ValidatedQuery(value))
    }
}

/// Corpo opcional: vazio vira `T::default()`.
pub fn parse_optional_body<T>(body: &Bytes) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    let value: T = serde_json::from_slice(body).map_err(|e| AppError::BadRequest(e.to_string()))?;
    value.validate()?;
    Ok(value)
}

/// Ids de rota são inteiros positivos (chaves do banco legado).
pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest(format!("Identificador inválido: '{}'", raw)))
}
