// src/common/response.rs

use axum::{http::StatusCode, Json};
use serde::Serialize;

// Envelope padrão de sucesso: { "success": true, "data": ... }
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

pub type Envelope<T> = (StatusCode, Json<ApiResponse<T>>);

pub fn ok<T: Serialize>(data: T) -> Envelope<T> {
    (StatusCode::OK, Json(ApiResponse { success: true, data }))
}

pub fn created<T: Serialize>(data: T) -> Envelope<T> {
    (StatusCode::CREATED, Json(ApiResponse { success: true, data }))
}
