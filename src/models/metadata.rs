// src/models/metadata.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// --- Listas de referência (somente leitura) ---

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Nop {
    pub id: i32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PaymentType {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTerm {
    pub id: i32,
    pub name: String,
    pub installments: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Transporter {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LogisticsUnit {
    pub id: i32,
    pub name: String,
    pub state: Option<String>,
}

/// Qual lista de referência. Vem da rota: /metadata/{kind}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceKind {
    Nops,
    PaymentTypes,
    PaymentTerms,
    Transporters,
    LogisticsUnits,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReferenceList {
    Nops(Vec<Nop>),
    PaymentTypes(Vec<PaymentType>),
    PaymentTerms(Vec<PaymentTerm>),
    Transporters(Vec<Transporter>),
    LogisticsUnits(Vec<LogisticsUnit>),
}

impl ReferenceList {
    pub fn len(&self) -> usize {
        match self {
            ReferenceList::Nops(v) => v.len(),
            ReferenceList::PaymentTypes(v) => v.len(),
            ReferenceList::PaymentTerms(v) => v.len(),
            ReferenceList::Transporters(v) => v.len(),
            ReferenceList::LogisticsUnits(v) => v.len(),
        }
    }
}

/// Corpo opcional do POST /metadata/refresh. Sem `kind`, limpa tudo.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RefreshPayload {
    pub kind: Option<ReferenceKind>,
}
