// src/db/filter.rs

use sqlx::{MySql, QueryBuilder};

use crate::models::lead::{LeadFilter, UpdateLeadPayload};

// SELECT do sCart com os aliases esperados por LeadRow
pub const LEAD_SELECT: &str = r#"
    SELECT
        c.id,
        c.cCustomer AS customer_id,
        c.cUser AS user_id,
        c.cSeller AS seller_id,
        c.cType AS lead_type,
        c.cOrderWeb AS order_web,
        c.cNatOp AS nat_op,
        c.cEmitUnity AS emit_unity,
        c.cLogUnity AS log_unity,
        c.cTransporter AS transporter_id,
        c.cPaymentType AS payment_type,
        c.cPaymentTerms AS payment_terms,
        c.cFreight AS freight,
        c.cFreightType AS freight_type,
        c.cDeliveryDate AS delivery_date,
        c.cBuyer AS buyer,
        c.cPurchaseOrder AS purchase_order,
        c.cRemFinance AS remarks_finance,
        c.cRemLogistic AS remarks_logistic,
        c.cRemNfe AS remarks_nfe,
        c.cRemObs AS remarks_obs,
        c.cRemManager AS remarks_manager,
        c.cCreatedAt AS created_at,
        cl.nome AS customer_name,
        cl.cidade AS customer_city,
        cl.estado AS customer_state
    FROM mak.sCart c
    LEFT JOIN mak.clientes cl ON cl.id = c.cCustomer
    WHERE c.cDeleted = 0
"#;

/// Monta a listagem: cada filtro presente vira `AND coluna = ?`.
pub fn list_query(filter: &LeadFilter) -> QueryBuilder<'static, MySql> {
    let mut qb = QueryBuilder::new(LEAD_SELECT);

    if let Some(owner) = filter.owner {
        qb.push(" AND (c.cUser = ").push_bind(owner.user_id);
        if let Some(seller_id) = owner.seller_id {
            qb.push(" OR c.cSeller = ").push_bind(seller_id);
        }
        qb.push(")");
    }
    if let Some(seller_id) = filter.seller_id {
        qb.push(" AND c.cSeller = ").push_bind(seller_id);
    }
    if let Some(customer_id) = filter.customer_id {
        qb.push(" AND c.cCustomer = ").push_bind(customer_id);
    }
    if let Some(lead_type) = filter.lead_type {
        qb.push(" AND c.cType = ").push_bind(lead_type.code());
    }
    if let Some(segment) = &filter.segment {
        qb.push(" AND cl.segmento = ").push_bind(segment.clone());
    }
    if let Some(from) = filter.created_from {
        qb.push(" AND c.cCreatedAt >= ").push_bind(from);
    }
    // `to` é inclusivo: corta no início do dia seguinte
    if let Some(to) = filter.created_to.and_then(|d| d.succ_opt()) {
        qb.push(" AND c.cCreatedAt < ").push_bind(to);
    }

    qb.push(" ORDER BY c.id DESC LIMIT ")
        .push_bind(filter.limit)
        .push(" OFFSET ")
        .push_bind(filter.offset);

    qb
}

/// UPDATE dinâmico do cabeçalho. `None` quando não há nada a gravar.
/// Só atinge leads vivos e ainda não convertidos.
pub fn update_query(lead_id: i64, changes: &UpdateLeadPayload) -> Option<QueryBuilder<'static, MySql>> {
    if changes.is_empty() {
        return None;
    }

    let mut qb = QueryBuilder::new("UPDATE mak.sCart SET ");
    {
        let mut set = qb.separated(", ");
        if let Some(v) = changes.customer_id {
            set.push("cCustomer = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.seller_id {
            set.push("cSeller = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.nat_op {
            set.push("cNatOp = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.emit_unity {
            set.push("cEmitUnity = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.log_unity {
            set.push("cLogUnity = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.transporter_id {
            set.push("cTransporter = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.payment_type {
            set.push("cPaymentType = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.payment_terms {
            set.push("cPaymentTerms = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = changes.freight {
            set.push("cFreight = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.freight_type {
            set.push("cFreightType = ").push_bind_unseparated(v.code());
        }
        if let Some(v) = changes.delivery_date {
            set.push("cDeliveryDate = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.buyer {
            set.push("cBuyer = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = &changes.purchase_order {
            set.push("cPurchaseOrder = ").push_bind_unseparated(v.clone());
        }
        if let Some(remarks) = &changes.remarks {
            let columns = [
                ("cRemFinance = ", &remarks.finance),
                ("cRemLogistic = ", &remarks.logistic),
                ("cRemNfe = ", &remarks.nfe),
                ("cRemObs = ", &remarks.obs),
                ("cRemManager = ", &remarks.manager),
            ];
            for (column, value) in columns {
                if let Some(v) = value {
                    set.push(column).push_bind_unseparated(v.clone());
                }
            }
        }
    }
    qb.push(" WHERE id = ")
        .push_bind(lead_id)
        .push(" AND cDeleted = 0 AND cType = 1");

    Some(qb)
}
