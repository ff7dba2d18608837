// src/db/lead_repo.rs

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, Transaction};

use crate::{
    common::error::AppError,
    db::filter::{self, LEAD_SELECT},
    models::{
        cart_item::{CartItem, CartItemRow, NewCartItem, UpdateItemPayload},
        lead::{
            check_conversion, ConversionRejection, ConvertLeadPayload, ConvertOutcome, Lead, LeadFilter, LeadRow,
            LeadType, NewLead, UpdateLeadPayload,
        },
    },
};

/// Persistência de leads e itens. A implementação de produção fala com o
/// MySQL legado; os testes usam uma versão em memória.
#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn create(&self, lead: &NewLead) -> Result<Lead, AppError>;
    async fn find_by_id(&self, lead_id: i64) -> Result<Option<Lead>, AppError>;
    async fn list(&self, filter: &LeadFilter) -> Result<Vec<Lead>, AppError>;
    /// `None` se o lead não existe mais ou já virou pedido.
    async fn update(&self, lead_id: i64, changes: &UpdateLeadPayload) -> Result<Option<Lead>, AppError>;
    /// Exclusão lógica (cDeleted = 1), só de leads não convertidos.
    async fn delete(&self, lead_id: i64) -> Result<bool, AppError>;

    async fn list_items(&self, lead_id: i64) -> Result<Vec<CartItem>, AppError>;
    /// Escritas de item só acontecem com o lead ainda em rascunho, checado na
    /// mesma transação da escrita. `None`/`false` se o lead não aceita mais
    /// edição ou o item não existe nele.
    async fn add_item(&self, lead_id: i64, item: &NewCartItem) -> Result<Option<CartItem>, AppError>;
    async fn update_item(
        &self,
        lead_id: i64,
        item_id: i64,
        changes: &UpdateItemPayload,
    ) -> Result<Option<CartItem>, AppError>;
    async fn remove_item(&self, lead_id: i64, item_id: i64) -> Result<bool, AppError>;

    async fn seller_commission_rate(&self, seller_id: i64) -> Result<Option<Decimal>, AppError>;

    /// Lead -> Pedido numa única transação. Duas conversões concorrentes do
    /// mesmo lead: exatamente uma vence.
    async fn convert_to_order(&self, lead_id: i64, header: &ConvertLeadPayload) -> Result<ConvertOutcome, AppError>;
}

const ITEM_SELECT: &str = r#"
    SELECT
        i.id,
        i.cCart AS lead_id,
        i.cProduct AS product_id,
        p.nome AS product_name,
        i.qProduct AS quantity,
        i.vProduct AS price,
        i.vProductCC AS consumer_price,
        i.vProductOriginal AS original_price,
        i.tTimes AS times,
        i.vIPI AS ipi,
        i.vST AS st,
        i.TTD AS ttd,
        p.vCusto AS cost
    FROM mak.icart i
    LEFT JOIN mak.inv p ON p.id = i.cProduct
"#;

#[derive(Clone)]
pub struct LeadRepository {
    pool: MySqlPool,
}

impl LeadRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn find_item(&self, lead_id: i64, item_id: i64) -> Result<Option<CartItem>, AppError> {
        let row = sqlx::query_as::<_, CartItemRow>(&format!("{} WHERE i.id = ? AND i.cCart = ?", ITEM_SELECT))
            .bind(item_id)
            .bind(lead_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(CartItem::from))
    }
}

/// Trava o cabeçalho do lead se ele ainda for rascunho. A conversão trava a
/// mesma linha, então as duas escritas ficam em série.
async fn lock_draft(tx: &mut Transaction<'_, MySql>, lead_id: i64) -> Result<bool, AppError> {
    let locked: Option<i64> =
        sqlx::query_scalar("SELECT id FROM mak.sCart WHERE id = ? AND cDeleted = 0 AND cType = 1 FOR UPDATE")
            .bind(lead_id)
            .fetch_optional(&mut **tx)
            .await?;

    Ok(locked.is_some())
}

fn inserted_id(id: u64) -> Result<i64, AppError> {
    i64::try_from(id).map_err(|e| AppError::InternalServerError(e.into()))
}

#[async_trait]
impl LeadStore for LeadRepository {
    // =========================================================================
    //  LEADS (mak.sCart)
    // =========================================================================

    async fn create(&self, lead: &NewLead) -> Result<Lead, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO mak.sCart (
                cCustomer, cUser, cSeller, cType,
                cNatOp, cEmitUnity, cLogUnity, cTransporter,
                cPaymentType, cPaymentTerms, cFreight, cFreightType,
                cDeliveryDate, cBuyer, cPurchaseOrder,
                cRemFinance, cRemLogistic, cRemNfe, cRemObs, cRemManager,
                cCreatedAt, cDeleted
            )
            VALUES (?, ?, ?, 1, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NOW(), 0)
            "#,
        )
            .bind(lead.customer_id)
            .bind(lead.user_id)
            .bind(lead.seller_id)
            .bind(lead.nat_op)
            .bind(lead.emit_unity)
            .bind(lead.log_unity)
            .bind(lead.transporter_id)
            .bind(lead.payment_type)
            .bind(&lead.payment_terms)
            .bind(lead.freight)
            .bind(lead.freight_type.code())
            .bind(lead.delivery_date)
            .bind(&lead.buyer)
            .bind(&lead.purchase_order)
            .bind(&lead.remarks.finance)
            .bind(&lead.remarks.logistic)
            .bind(&lead.remarks.nfe)
            .bind(&lead.remarks.obs)
            .bind(&lead.remarks.manager)
            .execute(&self.pool)
            .await?;

        let id = inserted_id(result.last_insert_id())?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::InternalServerError(anyhow::anyhow!("lead {} sumiu após o INSERT", id)))
    }

    async fn find_by_id(&self, lead_id: i64) -> Result<Option<Lead>, AppError> {
        let row = sqlx::query_as::<_, LeadRow>(&format!("{} AND c.id = ?", LEAD_SELECT))
            .bind(lead_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Lead::try_from).transpose()
    }

    async fn list(&self, filter: &LeadFilter) -> Result<Vec<Lead>, AppError> {
        let mut qb = filter::list_query(filter);
        let rows = qb.build_query_as::<LeadRow>().fetch_all(&self.pool).await?;

        rows.into_iter().map(Lead::try_from).collect()
    }

    async fn update(&self, lead_id: i64, changes: &UpdateLeadPayload) -> Result<Option<Lead>, AppError> {
        if let Some(mut qb) = filter::update_query(lead_id, changes) {
            qb.build().execute(&self.pool).await?;
        }

        // MySQL não conta linhas cujo valor não mudou; relê para decidir
        let lead = self.find_by_id(lead_id).await?;
        Ok(lead.filter(|l| !l.is_order()))
    }

    async fn delete(&self, lead_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE mak.sCart SET cDeleted = 1 WHERE id = ? AND cDeleted = 0 AND cType = 1")
            .bind(lead_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  ITENS (mak.icart)
    // =========================================================================

    async fn list_items(&self, lead_id: i64) -> Result<Vec<CartItem>, AppError> {
        let rows = sqlx::query_as::<_, CartItemRow>(&format!("{} WHERE i.cCart = ? ORDER BY i.id", ITEM_SELECT))
            .bind(lead_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(CartItem::from).collect())
    }

    async fn add_item(&self, lead_id: i64, item: &NewCartItem) -> Result<Option<CartItem>, AppError> {
        let mut tx = self.pool.begin().await?;
        if !lock_draft(&mut tx, lead_id).await? {
            tx.rollback().await?;
            return Ok(None);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO mak.icart (
                cCart, cProduct, qProduct, vProduct, vProductCC, vProductOriginal,
                tTimes, vIPI, vST, TTD
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
            .bind(lead_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.price)
            .bind(item.consumer_price)
            .bind(item.original_price)
            .bind(item.times)
            .bind(item.ipi)
            .bind(item.st)
            .bind(item.ttd)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        let item_id = inserted_id(result.last_insert_id())?;
        self.find_item(lead_id, item_id)
            .await?
            .map(Some)
            .ok_or_else(|| AppError::InternalServerError(anyhow::anyhow!("item {} sumiu após o INSERT", item_id)))
    }

    async fn update_item(
        &self,
        lead_id: i64,
        item_id: i64,
        changes: &UpdateItemPayload,
    ) -> Result<Option<CartItem>, AppError> {
        let mut tx = self.pool.begin().await?;
        if !lock_draft(&mut tx, lead_id).await? {
            tx.rollback().await?;
            return Ok(None);
        }

        let row = sqlx::query_as::<_, CartItemRow>(&format!("{} WHERE i.id = ? AND i.cCart = ?", ITEM_SELECT))
            .bind(item_id)
            .bind(lead_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(mut item) = row.map(CartItem::from) else {
            tx.rollback().await?;
            return Ok(None);
        };
        if changes.is_empty() {
            tx.rollback().await?;
            return Ok(Some(item));
        }
        changes.apply_to(&mut item);

        sqlx::query(
            r#"
            UPDATE mak.icart
            SET qProduct = ?, vProduct = ?, vProductCC = ?, tTimes = ?, vIPI = ?, vST = ?, TTD = ?
            WHERE id = ? AND cCart = ?
            "#,
        )
            .bind(item.quantity)
            .bind(item.price)
            .bind(item.consumer_price)
            .bind(item.times)
            .bind(item.ipi)
            .bind(item.st)
            .bind(item.ttd)
            .bind(item_id)
            .bind(lead_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Some(item))
    }

    async fn remove_item(&self, lead_id: i64, item_id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        if !lock_draft(&mut tx, lead_id).await? {
            tx.rollback().await?;
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM mak.icart WHERE id = ? AND cCart = ?")
            .bind(item_id)
            .bind(lead_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    async fn seller_commission_rate(&self, seller_id: i64) -> Result<Option<Decimal>, AppError> {
        let rate: Option<Option<Decimal>> = sqlx::query_scalar("SELECT comissao FROM mak.vendedores WHERE id = ?")
            .bind(seller_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(rate.flatten())
    }

    // =========================================================================
    //  CONVERSÃO
    // =========================================================================

    async fn convert_to_order(&self, lead_id: i64, header: &ConvertLeadPayload) -> Result<ConvertOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        // Trava a linha: a segunda conversão espera aqui e depois vê cType = 2
        let current: Option<(i32, i64, i64, i64)> = sqlx::query_as(
            "SELECT cType, cCustomer, cSeller, cUser FROM mak.sCart WHERE id = ? AND cDeleted = 0 FOR UPDATE",
        )
            .bind(lead_id)
            .fetch_optional(&mut *tx)
            .await?;

        let item_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mak.icart WHERE cCart = ?")
            .bind(lead_id)
            .fetch_one(&mut *tx)
            .await?;

        let lead_type = current
            .map(|(code, ..)| LeadType::try_from(code))
            .transpose()
            .map_err(|e| AppError::InternalServerError(anyhow::anyhow!("lead {}: {}", lead_id, e)))?;

        if let Err(rejection) = check_conversion(lead_type, item_count) {
            tx.rollback().await?;
            return Ok(ConvertOutcome::Rejected(rejection));
        }
        let Some((_, customer_id, seller_id, user_id)) = current else {
            tx.rollback().await?;
            return Ok(ConvertOutcome::Rejected(ConversionRejection::NotFound));
        };

        // Numeração de pedidos do legado: o id auto-incremento é o número do pedido
        let order = sqlx::query(
            "INSERT INTO mak.pedidos_web (cCart, cCustomer, cSeller, cUser, created_at) VALUES (?, ?, ?, ?, NOW())",
        )
            .bind(lead_id)
            .bind(customer_id)
            .bind(seller_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        let order_web = inserted_id(order.last_insert_id())?;

        let updated = sqlx::query(
            r#"
            UPDATE mak.sCart
            SET cType = 2,
                cOrderWeb = ?,
                cTransporter = COALESCE(?, cTransporter),
                cDeliveryDate = COALESCE(?, cDeliveryDate),
                cPurchaseOrder = COALESCE(?, cPurchaseOrder),
                cBuyer = COALESCE(?, cBuyer)
            WHERE id = ? AND cType = 1
            "#,
        )
            .bind(order_web)
            .bind(header.transporter_id)
            .bind(header.delivery_date)
            .bind(&header.purchase_order)
            .bind(&header.buyer)
            .bind(lead_id)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() != 1 {
            tx.rollback().await?;
            return Ok(ConvertOutcome::Rejected(ConversionRejection::AlreadyConverted));
        }

        tx.commit().await?;
        Ok(ConvertOutcome::Converted { order_web })
    }
}
