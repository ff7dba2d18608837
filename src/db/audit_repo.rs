// src/db/audit_repo.rs

use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertAudit {
    pub lead_id: i64,
    pub order_web: i64,
    pub user_id: i64,
}

/// Trilha de auditoria. Roda depois do commit: falhar aqui não desfaz nada.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn log_lead_convert(&self, entry: &ConvertAudit) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct AuditRepository {
    pool: MySqlPool,
}

impl AuditRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLog for AuditRepository {
    async fn log_lead_convert(&self, entry: &ConvertAudit) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO mak.log_leads (cCart, cOrderWeb, cUser, action, created_at)
            VALUES (?, ?, ?, 'CONVERT', NOW())
            "#,
        )
            .bind(entry.lead_id)
            .bind(entry.order_web)
            .bind(entry.user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
