// src/services/lead_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::{AuditLog, ConvertAudit, LeadStore},
    models::{
        auth::User,
        cart_item::{AddItemPayload, CartItem, NewCartItem, UpdateItemPayload},
        lead::{
            ConversionResult, ConvertLeadPayload, ConvertOutcome, CreateLeadPayload, Lead, LeadFilter, LeadQuery,
            LeadType, NewLead, UpdateLeadPayload,
        },
        order::OrderDetail,
        totals::CartTotals,
    },
    services::{pricing::PriceSource, totals::compute_totals},
};

/// Regras de negócio de leads, itens e conversão. O controle de acesso fica
/// aqui; o repositório não sabe quem está chamando.
#[derive(Clone)]
pub struct LeadService {
    store: Arc<dyn LeadStore>,
    audit: Arc<dyn AuditLog>,
    pricing: Option<Arc<dyn PriceSource>>,
}

impl LeadService {
    pub fn new(store: Arc<dyn LeadStore>, audit: Arc<dyn AuditLog>, pricing: Option<Arc<dyn PriceSource>>) -> Self {
        Self { store, audit, pricing }
    }

    // =========================================================================
    //  CARREGAMENTO + ACESSO
    // =========================================================================

    async fn load(&self, user: &User, lead_id: i64) -> Result<Lead, AppError> {
        let lead = self
            .store
            .find_by_id(lead_id)
            .await?
            .ok_or(AppError::LeadNotFound(lead_id))?;

        if !lead.is_accessible_by(user) {
            return Err(AppError::Forbidden);
        }
        Ok(lead)
    }

    /// Lead que ainda aceita edição (cabeçalho ou itens).
    async fn load_editable(&self, user: &User, lead_id: i64) -> Result<Lead, AppError> {
        let lead = self.load(user, lead_id).await?;
        if lead.is_order() {
            return Err(AppError::LeadAlreadyConverted(lead_id));
        }
        Ok(lead)
    }

    /// O store recusou a escrita: o lead sumiu ou foi convertido no meio do caminho.
    async fn vanished(&self, lead_id: i64) -> Result<AppError, AppError> {
        Ok(match self.store.find_by_id(lead_id).await? {
            Some(lead) if lead.is_order() => AppError::LeadAlreadyConverted(lead_id),
            _ => AppError::LeadNotFound(lead_id),
        })
    }

    /// Escrita de item recusada: lead convertido/sumido ou item inexistente.
    async fn item_rejected(&self, lead_id: i64, item_id: i64) -> Result<AppError, AppError> {
        Ok(match self.store.find_by_id(lead_id).await? {
            Some(lead) if lead.is_order() => AppError::LeadAlreadyConverted(lead_id),
            Some(_) => AppError::ItemNotFound(item_id),
            None => AppError::LeadNotFound(lead_id),
        })
    }

    // =========================================================================
    //  LEADS
    // =========================================================================

    pub async fn create(&self, user: &User, payload: CreateLeadPayload) -> Result<Lead, AppError> {
        let new_lead = NewLead::from_payload(payload, user)?;
        let lead = self.store.create(&new_lead).await?;

        tracing::info!("Lead {} criado (cliente {}, vendedor {})", lead.id, lead.customer_id, lead.seller_id);
        Ok(lead)
    }

    pub async fn get(&self, user: &User, lead_id: i64) -> Result<Lead, AppError> {
        self.load(user, lead_id).await
    }

    pub async fn list(&self, user: &User, query: LeadQuery) -> Result<Vec<Lead>, AppError> {
        let filter = LeadFilter::new(query, user)?;
        self.store.list(&filter).await
    }

    pub async fn update(&self, user: &User, lead_id: i64, changes: UpdateLeadPayload) -> Result<Lead, AppError> {
        let lead = self.load_editable(user, lead_id).await?;
        if changes.is_empty() {
            return Ok(lead);
        }

        match self.store.update(lead_id, &changes).await? {
            Some(lead) => Ok(lead),
            None => Err(self.vanished(lead_id).await?),
        }
    }

    pub async fn delete(&self, user: &User, lead_id: i64) -> Result<(), AppError> {
        self.load_editable(user, lead_id).await?;

        if !self.store.delete(lead_id).await? {
            return Err(self.vanished(lead_id).await?);
        }
        tracing::info!("Lead {} excluído", lead_id);
        Ok(())
    }

    // =========================================================================
    //  ITENS
    // =========================================================================

    pub async fn list_items(&self, user: &User, lead_id: i64) -> Result<Vec<CartItem>, AppError> {
        self.load(user, lead_id).await?;
        self.store.list_items(lead_id).await
    }

    pub async fn add_item(&self, user: &User, lead_id: i64, payload: AddItemPayload) -> Result<CartItem, AppError> {
        let lead = self.load_editable(user, lead_id).await?;

        let quote = match (&self.pricing, payload.price, payload.product_id, payload.quantity) {
            (Some(pricing), None, Some(product_id), Some(quantity)) => {
                Some(pricing.quote(lead.customer_id, product_id, quantity).await?)
            }
            _ => None,
        };

        let new_item = NewCartItem::resolve(payload, quote)?;
        match self.store.add_item(lead_id, &new_item).await? {
            Some(item) => Ok(item),
            None => Err(self.vanished(lead_id).await?),
        }
    }

    pub async fn update_item(
        &self,
        user: &User,
        lead_id: i64,
        item_id: i64,
        changes: UpdateItemPayload,
    ) -> Result<CartItem, AppError> {
        self.load_editable(user, lead_id).await?;

        match self.store.update_item(lead_id, item_id, &changes).await? {
            Some(item) => Ok(item),
            None => Err(self.item_rejected(lead_id, item_id).await?),
        }
    }

    pub async fn remove_item(&self, user: &User, lead_id: i64, item_id: i64) -> Result<(), AppError> {
        self.load_editable(user, lead_id).await?;

        if !self.store.remove_item(lead_id, item_id).await? {
            return Err(self.item_rejected(lead_id, item_id).await?);
        }
        Ok(())
    }

    // =========================================================================
    //  TOTAIS
    // =========================================================================

    async fn compute_for(&self, lead: &Lead, items: &[CartItem]) -> Result<CartTotals, AppError> {
        let rate = if lead.seller_id > 0 {
            self.store.seller_commission_rate(lead.seller_id).await?
        } else {
            None
        };
        Ok(compute_totals(items, lead.freight, rate))
    }

    pub async fn totals(&self, user: &User, lead_id: i64) -> Result<CartTotals, AppError> {
        let lead = self.load(user, lead_id).await?;
        let items = self.store.list_items(lead_id).await?;
        self.compute_for(&lead, &items).await
    }

    // =========================================================================
    //  CONVERSÃO
    // =========================================================================

    pub async fn convert(
        &self,
        user: &User,
        lead_id: i64,
        header: ConvertLeadPayload,
    ) -> Result<ConversionResult, AppError> {
        self.load(user, lead_id).await?;

        let order_web = match self.store.convert_to_order(lead_id, &header).await? {
            ConvertOutcome::Converted { order_web } => order_web,
            ConvertOutcome::Rejected(rejection) => return Err(rejection.into_error(lead_id)),
        };
        tracing::info!("Lead {} convertido no pedido {} por {}", lead_id, order_web, user.id);

        // Depois do commit: falha na auditoria não desfaz a conversão
        let mut warnings = Vec::new();
        let entry = ConvertAudit { lead_id, order_web, user_id: user.id };
        if let Err(e) = self.audit.log_lead_convert(&entry).await {
            tracing::warn!("Falha ao auditar a conversão do lead {}: {}", lead_id, e);
            warnings.push(format!("audit log failed: {}", e));
        }

        Ok(ConversionResult {
            lead_id,
            order_id: order_web,
            lead_type: LeadType::Order,
            warnings,
        })
    }

    // =========================================================================
    //  PEDIDOS
    // =========================================================================

    pub async fn get_order(&self, user: &User, lead_id: i64) -> Result<OrderDetail, AppError> {
        let header = self
            .store
            .find_by_id(lead_id)
            .await?
            .filter(Lead::is_order)
            .ok_or(AppError::OrderNotFound(lead_id))?;

        if !header.is_accessible_by(user) {
            return Err(AppError::Forbidden);
        }

        let items = self.store.list_items(lead_id).await?;
        let totals = self.compute_for(&header, &items).await?;
        Ok(OrderDetail { header, items, totals })
    }
}
