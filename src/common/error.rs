// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Erro único da aplicação. Repositórios e serviços retornam isso com `?`;
// só na borda HTTP ele vira um ApiError (status + código + mensagem traduzida).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] ValidationErrors),

    #[error("Requisição inválida: {0}")]
    BadRequest(String),

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Lead {0} não encontrado")]
    LeadNotFound(i64),

    #[error("Item {0} não encontrado")]
    ItemNotFound(i64),

    #[error("Pedido {0} não encontrado")]
    OrderNotFound(i64),

    #[error("Lead {0} já foi convertido em pedido")]
    LeadAlreadyConverted(i64),

    #[error("Lead {0} não possui itens")]
    EmptyCart(i64),

    #[error("Serviço externo indisponível: {0}")]
    UpstreamUnavailable(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    /// Monta um erro de validação para um único campo (ex: preço ausente
    /// quando não há serviço de preços configurado).
    pub fn invalid_field(field: &'static str, message: &'static str) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, ValidationError::new("invalid").with_message(message.into()));
        AppError::ValidationError(errors)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::LeadNotFound(_) | AppError::ItemNotFound(_) | AppError::OrderNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::LeadAlreadyConverted(_) => StatusCode::CONFLICT,
            AppError::EmptyCart(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Código estável que o cliente usa para decidir o que fazer.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::InvalidToken => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::LeadNotFound(_) => "LEAD_NOT_FOUND",
            AppError::ItemNotFound(_) => "ITEM_NOT_FOUND",
            AppError::OrderNotFound(_) => "ORDER_NOT_FOUND",
            AppError::LeadAlreadyConverted(_) => "LEAD_ALREADY_CONVERTED",
            AppError::EmptyCart(_) => "EMPTY_CART",
            AppError::UpstreamUnavailable(_) => "SERVICE_UNAVAILABLE",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InternalServerError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_api_error(self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let status = self.status();
        let code = self.code();
        let message = i18n.translate(&locale.0, code);

        if status.is_server_error() {
            tracing::error!("{} ({}): {}", code, status.as_u16(), self);
        }

        let details = match &self {
            AppError::ValidationError(errors) => Some(
                flatten_validation_errors(errors)
                    .into_iter()
                    .map(|(field, key)| FieldError {
                        message: i18n.translate(&locale.0, &format!("validation.{}", key)),
                        field,
                    })
                    .collect(),
            ),
            _ => None,
        };

        // Texto bruto do driver só em build de desenvolvimento.
        let debug = (status.is_server_error() && cfg!(debug_assertions)).then(|| self.to_string());

        ApiError {
            status,
            code,
            message,
            details,
            debug,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

// O erro já "renderizado" para o cliente.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Option<Vec<FieldError>>,
    pub debug: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut error = json!({
            "code": self.code,
            "message": self.message,
        });
        if let Some(details) = self.details {
            error["details"] = json!(details);
        }
        if let Some(debug) = self.debug {
            error["debug"] = json!(debug);
        }

        let body = Json(json!({ "success": false, "error": error }));
        (self.status, body).into_response()
    }
}

/// Achata os erros do validator em pares (campo, chave da mensagem),
/// incluindo structs aninhadas como `remarks.obs`. Ordenado por campo.
pub fn flatten_validation_errors(errors: &ValidationErrors) -> Vec<(String, String)> {
    let mut out = Vec::new();
    collect_field_errors("", errors, &mut out);
    out.sort();
    out
}

fn collect_field_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<(String, String)>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for e in field_errors {
                    let key = e.message.as_ref().unwrap_or(&e.code);
                    out.push((path.clone(), key.to_string()));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}
