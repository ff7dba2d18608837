// src/db/metadata_repo.rs

use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::{
    common::error::AppError,
    models::metadata::{LogisticsUnit, Nop, PaymentTerm, PaymentType, ReferenceKind, ReferenceList, Transporter},
};

#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn list(&self, kind: ReferenceKind) -> Result<ReferenceList, AppError>;
    /// Transportadora que o cliente mais usou nos pedidos (cType = 2).
    async fn customer_transporter(&self, customer_id: i64) -> Result<Option<Transporter>, AppError>;
}

#[derive(Clone)]
pub struct MetadataRepository {
    pool: MySqlPool,
}

impl MetadataRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MetadataStore for MetadataRepository {
    async fn list(&self, kind: ReferenceKind) -> Result<ReferenceList, AppError> {
        let list = match kind {
            ReferenceKind::Nops => ReferenceList::Nops(
                sqlx::query_as::<_, Nop>("SELECT id, descricao AS description FROM mak.nop ORDER BY id")
                    .fetch_all(&self.pool)
                    .await?,
            ),
            ReferenceKind::PaymentTypes => ReferenceList::PaymentTypes(
                sqlx::query_as::<_, PaymentType>("SELECT id, nome AS name FROM mak.tipos_pagamento ORDER BY id")
                    .fetch_all(&self.pool)
                    .await?,
            ),
            ReferenceKind::PaymentTerms => ReferenceList::PaymentTerms(
                sqlx::query_as::<_, PaymentTerm>(
                    "SELECT id, nome AS name, parcelas AS installments FROM mak.condicoes_pagamento ORDER BY id",
                )
                    .fetch_all(&self.pool)
                    .await?,
            ),
            ReferenceKind::Transporters => ReferenceList::Transporters(
                sqlx::query_as::<_, Transporter>(
                    "SELECT id, nome AS name FROM mak.transportadoras WHERE ativo = 1 ORDER BY nome",
                )
                    .fetch_all(&self.pool)
                    .await?,
            ),
            ReferenceKind::LogisticsUnits => ReferenceList::LogisticsUnits(
                sqlx::query_as::<_, LogisticsUnit>("SELECT id, nome AS name, uf AS state FROM mak.emitentes ORDER BY id")
                    .fetch_all(&self.pool)
                    .await?,
            ),
        };

        Ok(list)
    }

    async fn customer_transporter(&self, customer_id: i64) -> Result<Option<Transporter>, AppError> {
        // Mais usada em todo o histórico; empate vai para o uso mais recente
        let transporter = sqlx::query_as::<_, Transporter>(
            r#"
            SELECT t.id, t.nome AS name
            FROM (
                SELECT cTransporter AS transporter_id
                FROM mak.sCart
                WHERE cCustomer = ? AND cType = 2 AND cDeleted = 0 AND cTransporter IS NOT NULL
                GROUP BY cTransporter
                ORDER BY COUNT(*) DESC, MAX(cCreatedAt) DESC, cTransporter
                LIMIT 1
            ) u
            JOIN mak.transportadoras t ON t.id = u.transporter_id
            "#,
        )
            .bind(customer_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(transporter)
    }
}
