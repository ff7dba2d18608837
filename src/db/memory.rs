// src/db/memory.rs
//
// Implementações em memória dos stores, usadas nos testes de serviço e de rotas.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::{AuditLog, ConvertAudit, LeadStore, MetadataStore},
    models::{
        cart_item::{CartItem, NewCartItem, UpdateItemPayload},
        lead::{
            check_conversion, ConvertLeadPayload, ConvertOutcome, Lead, LeadFilter, LeadType, NewLead,
            UpdateLeadPayload,
        },
        metadata::{Nop, PaymentTerm, PaymentType, ReferenceKind, ReferenceList, Transporter},
    },
};

fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

// =========================================================================
//  LEADS
// =========================================================================

// Mesma regra do filtro SQL. Segmento não existe aqui (não há cadastro de clientes).
fn filter_matches(filter: &LeadFilter, lead: &Lead) -> bool {
    let owner_ok = filter
        .owner
        .is_none_or(|o| lead.user_id == o.user_id || o.seller_id == Some(lead.seller_id));
    let date = lead.created_at.date();

    owner_ok
        && filter.seller_id.is_none_or(|v| lead.seller_id == v)
        && filter.customer_id.is_none_or(|v| lead.customer_id == v)
        && filter.lead_type.is_none_or(|v| lead.lead_type == v)
        && filter.created_from.is_none_or(|d| date >= d)
        && filter.created_to.is_none_or(|d| date <= d)
}

#[derive(Default)]
struct LeadState {
    leads: BTreeMap<i64, Lead>,
    items: BTreeMap<i64, CartItem>,
    next_lead: i64,
    next_item: i64,
    next_order: i64,
}

#[derive(Default)]
pub struct MemoryLeadStore {
    state: Mutex<LeadState>,
    product_costs: HashMap<i64, Decimal>,
    commissions: HashMap<i64, Decimal>,
}

impl MemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product_cost(mut self, product_id: i64, cost: Decimal) -> Self {
        self.product_costs.insert(product_id, cost);
        self
    }

    pub fn with_commission(mut self, seller_id: i64, rate: Decimal) -> Self {
        self.commissions.insert(seller_id, rate);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LeadState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl LeadState {
    fn is_draft(&self, lead_id: i64) -> bool {
        self.leads.get(&lead_id).is_some_and(|l| !l.is_order())
    }
}

#[async_trait]
impl LeadStore for MemoryLeadStore {
    async fn create(&self, new: &NewLead) -> Result<Lead, AppError> {
        let mut state = self.lock();
        state.next_lead += 1;
        let lead = Lead {
            id: state.next_lead,
            customer_id: new.customer_id,
            user_id: new.user_id,
            seller_id: new.seller_id,
            lead_type: LeadType::Lead,
            order_web: None,
            nat_op: new.nat_op,
            emit_unity: new.emit_unity,
            log_unity: new.log_unity,
            transporter_id: new.transporter_id,
            payment_type: new.payment_type,
            payment_terms: new.payment_terms.clone(),
            freight: new.freight,
            freight_type: new.freight_type,
            delivery_date: new.delivery_date,
            buyer: new.buyer.clone(),
            purchase_order: new.purchase_order.clone(),
            remarks: new.remarks.clone(),
            customer: None,
            created_at: now(),
        };
        state.leads.insert(lead.id, lead.clone());
        Ok(lead)
    }

    async fn find_by_id(&self, lead_id: i64) -> Result<Option<Lead>, AppError> {
        Ok(self.lock().leads.get(&lead_id).cloned())
    }

    async fn list(&self, filter: &LeadFilter) -> Result<Vec<Lead>, AppError> {
        let state = self.lock();
        Ok(state
            .leads
            .values()
            .rev()
            .filter(|l| filter_matches(filter, l))
            .skip(usize::try_from(filter.offset).unwrap_or(0))
            .take(usize::try_from(filter.limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn update(&self, lead_id: i64, changes: &UpdateLeadPayload) -> Result<Option<Lead>, AppError> {
        let mut state = self.lock();
        match state.leads.get_mut(&lead_id) {
            Some(lead) if !lead.is_order() => {
                changes.apply_to(lead);
                Ok(Some(lead.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, lead_id: i64) -> Result<bool, AppError> {
        let mut state = self.lock();
        match state.leads.get(&lead_id) {
            Some(lead) if !lead.is_order() => {
                state.leads.remove(&lead_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_items(&self, lead_id: i64) -> Result<Vec<CartItem>, AppError> {
        let state = self.lock();
        Ok(state.items.values().filter(|i| i.lead_id == lead_id).cloned().collect())
    }

    async fn add_item(&self, lead_id: i64, new: &NewCartItem) -> Result<Option<CartItem>, AppError> {
        let mut state = self.lock();
        if !state.is_draft(lead_id) {
            return Ok(None);
        }
        state.next_item += 1;
        let item = CartItem {
            id: state.next_item,
            lead_id,
            product_id: new.product_id,
            product_name: None,
            quantity: new.quantity,
            price: new.price,
            consumer_price: new.consumer_price,
            original_price: new.original_price,
            times: new.times,
            ipi: new.ipi,
            st: new.st,
            ttd: new.ttd,
            cost: self.product_costs.get(&new.product_id).copied(),
            subtotal: CartItem::line_subtotal(new.price, new.quantity),
        };
        state.items.insert(item.id, item.clone());
        Ok(Some(item))
    }

    async fn update_item(
        &self,
        lead_id: i64,
        item_id: i64,
        changes: &UpdateItemPayload,
    ) -> Result<Option<CartItem>, AppError> {
        let mut state = self.lock();
        if !state.is_draft(lead_id) {
            return Ok(None);
        }
        match state.items.get_mut(&item_id) {
            Some(item) if item.lead_id == lead_id => {
                changes.apply_to(item);
                Ok(Some(item.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn remove_item(&self, lead_id: i64, item_id: i64) -> Result<bool, AppError> {
        let mut state = self.lock();
        if !state.is_draft(lead_id) {
            return Ok(false);
        }
        match state.items.get(&item_id) {
            Some(item) if item.lead_id == lead_id => {
                state.items.remove(&item_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn seller_commission_rate(&self, seller_id: i64) -> Result<Option<Decimal>, AppError> {
        Ok(self.commissions.get(&seller_id).copied())
    }

    async fn convert_to_order(&self, lead_id: i64, header: &ConvertLeadPayload) -> Result<ConvertOutcome, AppError> {
        // O Mutex faz o papel do FOR UPDATE
        let mut state = self.lock();
        let lead_type = state.leads.get(&lead_id).map(|l| l.lead_type);
        let item_count = state.items.values().filter(|i| i.lead_id == lead_id).count();

        if let Err(rejection) = check_conversion(lead_type, item_count as i64) {
            return Ok(ConvertOutcome::Rejected(rejection));
        }

        state.next_order += 1;
        let order_web = 900_000 + state.next_order;
        if let Some(lead) = state.leads.get_mut(&lead_id) {
            lead.lead_type = LeadType::Order;
            lead.order_web = Some(order_web);
            if header.transporter_id.is_some() {
                lead.transporter_id = header.transporter_id;
            }
            if header.delivery_date.is_some() {
                lead.delivery_date = header.delivery_date;
            }
            if header.purchase_order.is_some() {
                lead.purchase_order.clone_from(&header.purchase_order);
            }
            if header.buyer.is_some() {
                lead.buyer.clone_from(&header.buyer);
            }
        }

        Ok(ConvertOutcome::Converted { order_web })
    }
}

// =========================================================================
//  AUDITORIA
// =========================================================================

#[derive(Default)]
pub struct MemoryAuditLog {
    failing: AtomicBool,
    entries: Mutex<Vec<ConvertAudit>>,
}

impl MemoryAuditLog {
    pub fn failing() -> Self {
        Self { failing: AtomicBool::new(true), ..Default::default() }
    }

    pub fn entries(&self) -> Vec<ConvertAudit> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl AuditLog for MemoryAuditLog {
    async fn log_lead_convert(&self, entry: &ConvertAudit) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::InternalServerError(anyhow::anyhow!("log_leads indisponível")));
        }
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).push(*entry);
        Ok(())
    }
}

// =========================================================================
//  METADADOS
// =========================================================================

#[derive(Debug, Clone, Copy)]
struct TransporterUsage {
    transporter_id: i64,
    used_at: NaiveDateTime,
}

/// Mesma ordenação do GROUP BY do repositório: mais usada, depois uso mais
/// recente, depois menor id.
fn most_used_transporter(history: &[TransporterUsage]) -> Option<i64> {
    let mut stats: HashMap<i64, (usize, NaiveDateTime)> = HashMap::new();
    for usage in history {
        let entry = stats.entry(usage.transporter_id).or_insert((0, usage.used_at));
        entry.0 += 1;
        entry.1 = entry.1.max(usage.used_at);
    }

    stats
        .into_iter()
        .max_by(|(id_a, (count_a, last_a)), (id_b, (count_b, last_b))| {
            count_a.cmp(count_b).then(last_a.cmp(last_b)).then(id_b.cmp(id_a))
        })
        .map(|(id, _)| id)
}

#[derive(Default)]
pub struct MemoryMetadataStore {
    transporters: Vec<Transporter>,
    history: HashMap<i64, Vec<TransporterUsage>>,
    calls: AtomicUsize,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self {
            transporters: vec![
                Transporter { id: 7, name: "Rodonaves".into() },
                Transporter { id: 9, name: "Braspress".into() },
            ],
            ..Default::default()
        }
    }

    pub fn with_usage(mut self, customer_id: i64, transporter_id: i64, used_at: NaiveDateTime) -> Self {
        self.history
            .entry(customer_id)
            .or_default()
            .push(TransporterUsage { transporter_id, used_at });
        self
    }

    /// Quantas vezes o "banco" foi consultado.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadataStore {
    async fn list(&self, kind: ReferenceKind) -> Result<ReferenceList, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let list = match kind {
            ReferenceKind::Nops => ReferenceList::Nops(vec![Nop { id: 27, description: "Venda de mercadoria".into() }]),
            ReferenceKind::PaymentTypes => {
                ReferenceList::PaymentTypes(vec![PaymentType { id: 1, name: "Boleto".into() }])
            }
            ReferenceKind::PaymentTerms => ReferenceList::PaymentTerms(vec![
                PaymentTerm { id: 0, name: "À vista".into(), installments: 1 },
                PaymentTerm { id: 3, name: "30/60/90".into(), installments: 3 },
            ]),
            ReferenceKind::Transporters => ReferenceList::Transporters(self.transporters.clone()),
            ReferenceKind::LogisticsUnits => ReferenceList::LogisticsUnits(Vec::new()),
        };
        Ok(list)
    }

    async fn customer_transporter(&self, customer_id: i64) -> Result<Option<Transporter>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let history = self.history.get(&customer_id).map(Vec::as_slice).unwrap_or_default();

        Ok(most_used_transporter(history)
            .and_then(|id| self.transporters.iter().find(|t| t.id == id).cloned()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap()
    }

    fn usage(transporter_id: i64, day: u32) -> TransporterUsage {
        TransporterUsage { transporter_id, used_at: at(day) }
    }

    #[test]
    fn most_frequent_wins() {
        let history = [usage(7, 1), usage(7, 2), usage(9, 20)];
        assert_eq!(most_used_transporter(&history), Some(7));
    }

    #[test]
    fn tie_goes_to_most_recent_use() {
        let history = [usage(7, 1), usage(9, 2), usage(7, 3), usage(9, 15)];
        assert_eq!(most_used_transporter(&history), Some(9));
    }

    #[test]
    fn no_history_no_transporter() {
        assert_eq!(most_used_transporter(&[]), None);
    }

    #[tokio::test]
    async fn item_writes_require_a_draft_lead() {
        let store = MemoryLeadStore::new();
        let lead = store
            .create(&NewLead {
                customer_id: 701546,
                user_id: 1,
                seller_id: 77,
                nat_op: 27,
                emit_unity: 1,
                log_unity: 1,
                transporter_id: None,
                payment_type: 1,
                payment_terms: "0".into(),
                freight: Decimal::ZERO,
                freight_type: Default::default(),
                delivery_date: None,
                buyer: None,
                purchase_order: None,
                remarks: Default::default(),
            })
            .await
            .unwrap();
        let new_item = NewCartItem {
            product_id: 123456,
            quantity: 1,
            price: Decimal::TEN,
            consumer_price: Decimal::TEN,
            original_price: Decimal::TEN,
            times: 1,
            ipi: Decimal::ZERO,
            st: Decimal::ZERO,
            ttd: false,
        };
        let item = store.add_item(lead.id, &new_item).await.unwrap().unwrap();
        store.convert_to_order(lead.id, &ConvertLeadPayload::default()).await.unwrap();

        assert!(store.add_item(lead.id, &new_item).await.unwrap().is_none());
        let edit = UpdateItemPayload { quantity: Some(5), ..Default::default() };
        assert!(store.update_item(lead.id, item.id, &edit).await.unwrap().is_none());
        assert!(!store.remove_item(lead.id, item.id).await.unwrap());
        assert_eq!(store.list_items(lead.id).await.unwrap(), vec![item]);
    }
}
