// src/models/lead.rs

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::{
    common::{error::AppError, validation::non_negative},
    models::auth::User,
};

// Valores padrão do cadastro legado
pub const DEFAULT_NAT_OP: i32 = 27;
pub const DEFAULT_EMIT_UNITY: i32 = 1;
pub const DEFAULT_LOG_UNITY: i32 = 1;
pub const DEFAULT_PAYMENT_TYPE: i32 = 1;
pub const DEFAULT_PAYMENT_TERMS: &str = "0";

// --- Enums ---

/// cType do sCart: 1 = Lead (rascunho), 2 = Pedido. 2 é terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum LeadType {
    Lead,
    Order,
}

impl LeadType {
    pub fn code(self) -> i32 {
        match self {
            LeadType::Lead => 1,
            LeadType::Order => 2,
        }
    }
}

impl From<LeadType> for i32 {
    fn from(value: LeadType) -> Self {
        value.code()
    }
}

impl TryFrom<i32> for LeadType {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(LeadType::Lead),
            2 => Ok(LeadType::Order),
            other => Err(format!("cType desconhecido: {}", other)),
        }
    }
}

/// Quem paga o frete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FreightType {
    #[default]
    Cif,
    Fob,
    Terceiros,
}

impl FreightType {
    pub fn code(self) -> i32 {
        match self {
            FreightType::Cif => 1,
            FreightType::Fob => 2,
            FreightType::Terceiros => 3,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(FreightType::Cif),
            2 => Some(FreightType::Fob),
            3 => Some(FreightType::Terceiros),
            _ => None,
        }
    }
}

// --- Entidade ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Remarks {
    #[validate(length(max = 2000, message = "too_long"))]
    pub finance: Option<String>,
    #[validate(length(max = 2000, message = "too_long"))]
    pub logistic: Option<String>,
    #[validate(length(max = 2000, message = "too_long"))]
    pub nfe: Option<String>,
    #[validate(length(max = 2000, message = "too_long"))]
    pub obs: Option<String>,
    #[validate(length(max = 2000, message = "too_long"))]
    pub manager: Option<String>,
}

impl Remarks {
    /// Sobrepõe somente as observações presentes em `other`.
    #[cfg(test)]
    pub fn merge(&mut self, other: &Remarks) {
        let fields = [
            (&mut self.finance, &other.finance),
            (&mut self.logistic, &other.logistic),
            (&mut self.nfe, &other.nfe),
            (&mut self.obs, &other.obs),
            (&mut self.manager, &other.manager),
        ];
        for (target, source) in fields {
            if source.is_some() {
                target.clone_from(source);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub id: i64,
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: i64,
    pub customer_id: i64,
    pub user_id: i64,
    pub seller_id: i64,
    #[serde(rename = "type")]
    pub lead_type: LeadType,
    pub order_web: Option<i64>,
    #[serde(rename = "cNatOp")]
    pub nat_op: i32,
    #[serde(rename = "cEmitUnity")]
    pub emit_unity: i32,
    #[serde(rename = "cLogUnity")]
    pub log_unity: i32,
    #[serde(rename = "cTransporter")]
    pub transporter_id: Option<i64>,
    pub payment_type: i32,
    pub payment_terms: String,
    pub freight: Decimal,
    pub freight_type: FreightType,
    pub delivery_date: Option<NaiveDate>,
    pub buyer: Option<String>,
    pub purchase_order: Option<String>,
    pub remarks: Remarks,
    pub customer: Option<CustomerSummary>,
    pub created_at: NaiveDateTime,
}

impl Lead {
    pub fn is_order(&self) -> bool {
        self.lead_type == LeadType::Order
    }

    /// Gerente vê tudo; os demais só o que criaram ou o que é da sua carteira.
    pub fn is_accessible_by(&self, user: &User) -> bool {
        user.is_manager() || self.user_id == user.id || user.seller_id == Some(self.seller_id)
    }
}

// Linha crua do sCart (com o JOIN de clientes), convertida para Lead
#[derive(Debug, FromRow)]
pub struct LeadRow {
    pub id: i64,
    pub customer_id: i64,
    pub user_id: i64,
    pub seller_id: i64,
    pub lead_type: i32,
    pub order_web: Option<i64>,
    pub nat_op: i32,
    pub emit_unity: i32,
    pub log_unity: i32,
    pub transporter_id: Option<i64>,
    pub payment_type: i32,
    pub payment_terms: String,
    pub freight: Decimal,
    pub freight_type: i32,
    pub delivery_date: Option<NaiveDate>,
    pub buyer: Option<String>,
    pub purchase_order: Option<String>,
    pub remarks_finance: Option<String>,
    pub remarks_logistic: Option<String>,
    pub remarks_nfe: Option<String>,
    pub remarks_obs: Option<String>,
    pub remarks_manager: Option<String>,
    pub created_at: NaiveDateTime,
    pub customer_name: Option<String>,
    pub customer_city: Option<String>,
    pub customer_state: Option<String>,
}

impl TryFrom<LeadRow> for Lead {
    type Error = AppError;

    fn try_from(row: LeadRow) -> Result<Self, Self::Error> {
        let lead_type = LeadType::try_from(row.lead_type)
            .map_err(|e| AppError::InternalServerError(anyhow::anyhow!("lead {}: {}", row.id, e)))?;
        let freight_type = FreightType::from_code(row.freight_type).ok_or_else(|| {
            AppError::InternalServerError(anyhow::anyhow!(
                "lead {}: cFreightType desconhecido: {}",
                row.id,
                row.freight_type
            ))
        })?;

        let customer = row.customer_name.map(|name| CustomerSummary {
            id: row.customer_id,
            name,
            city: row.customer_city,
            state: row.customer_state,
        });

        Ok(Lead {
            id: row.id,
            customer_id: row.customer_id,
            user_id: row.user_id,
            seller_id: row.seller_id,
            lead_type,
            order_web: row.order_web,
            nat_op: row.nat_op,
            emit_unity: row.emit_unity,
            log_unity: row.log_unity,
            transporter_id: row.transporter_id,
            payment_type: row.payment_type,
            payment_terms: row.payment_terms,
            freight: row.freight,
            freight_type,
            delivery_date: row.delivery_date,
            buyer: row.buyer,
            purchase_order: row.purchase_order,
            remarks: Remarks {
                finance: row.remarks_finance,
                logistic: row.remarks_logistic,
                nfe: row.remarks_nfe,
                obs: row.remarks_obs,
                manager: row.remarks_manager,
            },
            customer,
            created_at: row.created_at,
        })
    }
}

// --- Payloads ---

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadPayload {
    #[serde(rename = "customerId")]
    #[validate(required(message = "required"), range(min = 1, message = "min_one"))]
    pub customer_id: Option<i64>,

    #[serde(rename = "userId")]
    #[validate(required(message = "required"), range(min = 1, message = "min_one"))]
    pub user_id: Option<i64>,

    #[serde(rename = "sellerId")]
    #[validate(range(min = 1, message = "min_one"))]
    pub seller_id: Option<i64>,

    #[serde(rename = "cNatOp")]
    #[validate(range(min = 1, message = "min_one"))]
    pub nat_op: Option<i32>,

    #[serde(rename = "cEmitUnity")]
    #[validate(range(min = 1, message = "min_one"))]
    pub emit_unity: Option<i32>,

    #[serde(rename = "cLogUnity")]
    #[validate(range(min = 1, message = "min_one"))]
    pub log_unity: Option<i32>,

    #[serde(rename = "cTransporter")]
    #[validate(range(min = 1, message = "min_one"))]
    pub transporter_id: Option<i64>,

    #[serde(rename = "paymentType")]
    #[validate(range(min = 1, message = "min_one"))]
    pub payment_type: Option<i32>,

    #[serde(rename = "paymentTerms")]
    #[validate(length(max = 60, message = "too_long"))]
    pub payment_terms: Option<String>,

    #[validate(custom(function = "non_negative"))]
    pub freight: Option<Decimal>,

    pub freight_type: Option<FreightType>,

    pub delivery_date: Option<NaiveDate>,

    #[validate(length(max = 60, message = "too_long"))]
    pub buyer: Option<String>,

    #[serde(rename = "purchaseOrder")]
    #[validate(length(max = 40, message = "too_long"))]
    pub purchase_order: Option<String>,

    #[validate(nested)]
    pub remarks: Option<Remarks>,
}

/// Edição parcial: só as colunas presentes são gravadas.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadPayload {
    #[serde(rename = "customerId")]
    #[validate(range(min = 1, message = "min_one"))]
    pub customer_id: Option<i64>,

    #[serde(rename = "sellerId")]
    #[validate(range(min = 1, message = "min_one"))]
    pub seller_id: Option<i64>,

    #[serde(rename = "cNatOp")]
    #[validate(range(min = 1, message = "min_one"))]
    pub nat_op: Option<i32>,

    #[serde(rename = "cEmitUnity")]
    #[validate(range(min = 1, message = "min_one"))]
    pub emit_unity: Option<i32>,

    #[serde(rename = "cLogUnity")]
    #[validate(range(min = 1, message = "min_one"))]
    pub log_unity: Option<i32>,

    #[serde(rename = "cTransporter")]
    #[validate(range(min = 1, message = "min_one"))]
    pub transporter_id: Option<i64>,

    #[serde(rename = "paymentType")]
    #[validate(range(min = 1, message = "min_one"))]
    pub payment_type: Option<i32>,

    #[serde(rename = "paymentTerms")]
    #[validate(length(max = 60, message = "too_long"))]
    pub payment_terms: Option<String>,

    #[validate(custom(function = "non_negative"))]
    pub freight: Option<Decimal>,

    pub freight_type: Option<FreightType>,

    pub delivery_date: Option<NaiveDate>,

    #[validate(length(max = 60, message = "too_long"))]
    pub buyer: Option<String>,

    #[serde(rename = "purchaseOrder")]
    #[validate(length(max = 40, message = "too_long"))]
    pub purchase_order: Option<String>,

    #[validate(nested)]
    pub remarks: Option<Remarks>,
}

impl UpdateLeadPayload {
    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none()
            && self.seller_id.is_none()
            && self.nat_op.is_none()
            && self.emit_unity.is_none()
            && self.log_unity.is_none()
            && self.transporter_id.is_none()
            && self.payment_type.is_none()
            && self.payment_terms.is_none()
            && self.freight.is_none()
            && self.freight_type.is_none()
            && self.delivery_date.is_none()
            && self.buyer.is_none()
            && self.purchase_order.is_none()
            && self.remarks.as_ref().is_none_or(|r| *r == Remarks::default())
    }

    /// Aplica a edição sobre um lead em memória (mesma semântica do UPDATE dinâmico).
    #[cfg(test)]
    pub fn apply_to(&self, lead: &mut Lead) {
        if let Some(v) = self.customer_id {
            lead.customer_id = v;
        }
        if let Some(v) = self.seller_id {
            lead.seller_id = v;
        }
        if let Some(v) = self.nat_op {
            lead.nat_op = v;
        }
        if let Some(v) = self.emit_unity {
            lead.emit_unity = v;
        }
        if let Some(v) = self.log_unity {
            lead.log_unity = v;
        }
        if let Some(v) = self.transporter_id {
            lead.transporter_id = Some(v);
        }
        if let Some(v) = self.payment_type {
            lead.payment_type = v;
        }
        if let Some(v) = &self.payment_terms {
            lead.payment_terms = v.clone();
        }
        if let Some(v) = self.freight {
            lead.freight = v;
        }
        if let Some(v) = self.freight_type {
            lead.freight_type = v;
        }
        if let Some(v) = self.delivery_date {
            lead.delivery_date = Some(v);
        }
        if let Some(v) = &self.buyer {
            lead.buyer = Some(v.clone());
        }
        if let Some(v) = &self.purchase_order {
            lead.purchase_order = Some(v.clone());
        }
        if let Some(remarks) = &self.remarks {
            lead.remarks.merge(remarks);
        }
    }
}

/// Lead pronto para inserir, com os padrões do cadastro já resolvidos.
#[derive(Debug, Clone)]
pub struct NewLead {
    pub customer_id: i64,
    pub user_id: i64,
    pub seller_id: i64,
    pub nat_op: i32,
    pub emit_unity: i32,
    pub log_unity: i32,
    pub transporter_id: Option<i64>,
    pub payment_type: i32,
    pub payment_terms: String,
    pub freight: Decimal,
    pub freight_type: FreightType,
    pub delivery_date: Option<NaiveDate>,
    pub buyer: Option<String>,
    pub purchase_order: Option<String>,
    pub remarks: Remarks,
}

impl NewLead {
    /// Resolve os padrões. Vendedor: o do payload, senão o do usuário, senão 0.
    pub fn from_payload(payload: CreateLeadPayload, user: &User) -> Result<Self, AppError> {
        let customer_id = payload
            .customer_id
            .ok_or_else(|| AppError::invalid_field("customerId", "required"))?;
        let user_id = payload
            .user_id
            .ok_or_else(|| AppError::invalid_field("userId", "required"))?;

        Ok(Self {
            customer_id,
            user_id,
            seller_id: payload.seller_id.or(user.seller_id).unwrap_or(0),
            nat_op: payload.nat_op.unwrap_or(DEFAULT_NAT_OP),
            emit_unity: payload.emit_unity.unwrap_or(DEFAULT_EMIT_UNITY),
            log_unity: payload.log_unity.unwrap_or(DEFAULT_LOG_UNITY),
            transporter_id: payload.transporter_id,
            payment_type: payload.payment_type.unwrap_or(DEFAULT_PAYMENT_TYPE),
            payment_terms: payload
                .payment_terms
                .unwrap_or_else(|| DEFAULT_PAYMENT_TERMS.to_string()),
            freight: payload.freight.unwrap_or(Decimal::ZERO),
            freight_type: payload.freight_type.unwrap_or_default(),
            delivery_date: payload.delivery_date,
            buyer: payload.buyer,
            purchase_order: payload.purchase_order,
            remarks: payload.remarks.unwrap_or_default(),
        })
    }
}

// --- Conversão ---

/// Campos de cabeçalho que podem ser sobrescritos no momento da conversão.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConvertLeadPayload {
    #[serde(rename = "transporterId")]
    #[validate(range(min = 1, message = "min_one"))]
    pub transporter_id: Option<i64>,

    pub delivery_date: Option<NaiveDate>,

    #[serde(rename = "purchaseOrder")]
    #[validate(length(max = 40, message = "too_long"))]
    pub purchase_order: Option<String>,

    #[validate(length(max = 60, message = "too_long"))]
    pub buyer: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionRejection {
    NotFound,
    AlreadyConverted,
    EmptyCart,
}

impl ConversionRejection {
    pub fn into_error(self, lead_id: i64) -> AppError {
        match self {
            ConversionRejection::NotFound => AppError::LeadNotFound(lead_id),
            ConversionRejection::AlreadyConverted => AppError::LeadAlreadyConverted(lead_id),
            ConversionRejection::EmptyCart => AppError::EmptyCart(lead_id),
        }
    }
}

/// Pré-condições da conversão, sempre nesta ordem: existe, não convertido, tem itens.
pub fn check_conversion(lead_type: Option<LeadType>, item_count: i64) -> Result<(), ConversionRejection> {
    match lead_type {
        None => Err(ConversionRejection::NotFound),
        Some(LeadType::Order) => Err(ConversionRejection::AlreadyConverted),
        Some(LeadType::Lead) if item_count <= 0 => Err(ConversionRejection::EmptyCart),
        Some(LeadType::Lead) => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertOutcome {
    Converted { order_web: i64 },
    Rejected(ConversionRejection),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub lead_id: i64,
    pub order_id: i64,
    #[serde(rename = "type")]
    pub lead_type: LeadType,
    pub warnings: Vec<String>,
}

// --- Listagem ---

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LeadQuery {
    #[serde(rename = "sellerId")]
    #[validate(range(min = 1, message = "min_one"))]
    pub seller_id: Option<i64>,

    #[serde(rename = "customerId")]
    #[validate(range(min = 1, message = "min_one"))]
    pub customer_id: Option<i64>,

    #[serde(rename = "type")]
    #[validate(range(min = 1, max = 2, message = "out_of_range"))]
    pub lead_type: Option<i32>,

    #[validate(length(min = 1, max = 40, message = "out_of_range"))]
    pub segment: Option<String>,

    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,

    #[validate(range(min = 1, max = 1_000_000, message = "out_of_range"))]
    pub page: Option<i64>,

    #[serde(rename = "perPage")]
    #[validate(range(min = 1, max = 200, message = "out_of_range"))]
    pub per_page: Option<i64>,
}

/// Restrição de carteira para quem não é gerente.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerScope {
    pub user_id: i64,
    pub seller_id: Option<i64>,
}

/// Filtro tipado da listagem; cada campo presente vira uma condição com
/// parâmetro ligado (nunca concatenação de valores).
#[derive(Debug, Clone, PartialEq)]
pub struct LeadFilter {
    pub owner: Option<OwnerScope>,
    pub seller_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub lead_type: Option<LeadType>,
    pub segment: Option<String>,
    pub created_from: Option<NaiveDate>,
    pub created_to: Option<NaiveDate>,
    pub limit: i64,
    pub offset: i64,
}

pub const DEFAULT_PAGE_SIZE: i64 = 50;

impl LeadFilter {
    pub fn new(query: LeadQuery, user: &User) -> Result<Self, AppError> {
        let lead_type = query
            .lead_type
            .map(LeadType::try_from)
            .transpose()
            .map_err(|_| AppError::invalid_field("type", "out_of_range"))?;

        let limit = query.per_page.unwrap_or(DEFAULT_PAGE_SIZE);
        let offset = query
            .page
            .unwrap_or(1)
            .checked_sub(1)
            .and_then(|skipped| skipped.checked_mul(limit))
            .filter(|offset| *offset >= 0)
            .ok_or_else(|| AppError::invalid_field("page", "out_of_range"))?;

        let owner = (!user.is_manager()).then_some(OwnerScope {
            user_id: user.id,
            seller_id: user.seller_id,
        });

        Ok(Self {
            owner,
            seller_id: query.seller_id,
            customer_id: query.customer_id,
            lead_type,
            segment: query.segment,
            created_from: query.from,
            created_to: query.to,
            limit,
            offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seller(id: i64, seller: i64) -> User {
        User { id, seller_id: Some(seller), level: 1 }
    }

    #[test]
    fn conversion_checks_run_in_order() {
        assert_eq!(check_conversion(None, 0), Err(ConversionRejection::NotFound));
        assert_eq!(
            check_conversion(Some(LeadType::Order), 0),
            Err(ConversionRejection::AlreadyConverted)
        );
        assert_eq!(
            check_conversion(Some(LeadType::Order), 3),
            Err(ConversionRejection::AlreadyConverted)
        );
        assert_eq!(check_conversion(Some(LeadType::Lead), 0), Err(ConversionRejection::EmptyCart));
        assert_eq!(check_conversion(Some(LeadType::Lead), 1), Ok(()));
    }

    #[test]
    fn lead_type_serializes_as_legacy_code() {
        assert_eq!(serde_json::to_value(LeadType::Order).unwrap(), 2);
        let parsed: LeadType = serde_json::from_value(serde_json::json!(1)).unwrap();
        assert_eq!(parsed, LeadType::Lead);
        assert!(serde_json::from_value::<LeadType>(serde_json::json!(3)).is_err());
    }

    #[test]
    fn create_payload_defaults() {
        let payload: CreateLeadPayload =
            serde_json::from_value(serde_json::json!({ "customerId": 701546, "userId": 1 })).unwrap();
        let lead = NewLead::from_payload(payload, &seller(1, 77)).unwrap();

        assert_eq!(lead.nat_op, DEFAULT_NAT_OP);
        assert_eq!(lead.freight, Decimal::ZERO);
        assert_eq!(lead.freight_type, FreightType::Cif);
        assert_eq!(lead.seller_id, 77);
    }

    #[test]
    fn negative_freight_is_rejected_by_field() {
        let payload: UpdateLeadPayload =
            serde_json::from_value(serde_json::json!({ "freight": -5 })).unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().keys().any(|k| k.to_string() == "freight"));
    }

    #[test]
    fn missing_required_ids_are_all_reported() {
        let errors = CreateLeadPayload::default().validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }

    #[test]
    fn remarks_merge_keeps_untouched_notes() {
        let mut remarks = Remarks { obs: Some("entregar cedo".into()), ..Default::default() };
        remarks.merge(&Remarks { finance: Some("boleto".into()), ..Default::default() });
        assert_eq!(remarks.obs.as_deref(), Some("entregar cedo"));
        assert_eq!(remarks.finance.as_deref(), Some("boleto"));
    }

    #[test]
    fn non_manager_filter_is_scoped_to_owner() {
        let filter = LeadFilter::new(LeadQuery::default(), &seller(5, 9)).unwrap();
        assert_eq!(filter.owner, Some(OwnerScope { user_id: 5, seller_id: Some(9) }));

        let manager = User { id: 1, seller_id: None, level: 4 };
        let filter = LeadFilter::new(LeadQuery { page: Some(3), per_page: Some(20), ..Default::default() }, &manager).unwrap();
        assert_eq!(filter.owner, None);
        assert_eq!(filter.offset, 40);
    }

    #[test]
    fn huge_page_is_rejected_instead_of_overflowing() {
        let query = LeadQuery { page: Some(i64::MAX), ..Default::default() };
        assert!(query.validate().is_err());
        assert!(matches!(
            LeadFilter::new(query, &seller(5, 9)),
            Err(AppError::ValidationError(_))
        ));

        let zero = LeadQuery { page: Some(0), ..Default::default() };
        assert!(matches!(LeadFilter::new(zero, &seller(5, 9)), Err(AppError::ValidationError(_))));
    }

    fn row(lead_type: i32, freight_type: i32) -> LeadRow {
        LeadRow {
            id: 10,
            customer_id: 701546,
            user_id: 1,
            seller_id: 77,
            lead_type,
            order_web: None,
            nat_op: DEFAULT_NAT_OP,
            emit_unity: 1,
            log_unity: 1,
            transporter_id: None,
            payment_type: 1,
            payment_terms: "0".into(),
            freight: Decimal::ZERO,
            freight_type,
            delivery_date: None,
            buyer: None,
            purchase_order: None,
            remarks_finance: None,
            remarks_logistic: None,
            remarks_nfe: None,
            remarks_obs: None,
            remarks_manager: None,
            created_at: chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
                .and_then(|d| d.and_hms_opt(8, 0, 0))
                .unwrap(),
            customer_name: None,
            customer_city: None,
            customer_state: None,
        }
    }

    #[test]
    fn unknown_legacy_codes_are_rejected_alike() {
        assert_eq!(Lead::try_from(row(1, 2)).unwrap().freight_type, FreightType::Fob);
        assert!(matches!(Lead::try_from(row(9, 1)), Err(AppError::InternalServerError(_))));
        assert!(matches!(Lead::try_from(row(1, 9)), Err(AppError::InternalServerError(_))));
    }
}
