// src/models/order.rs

use serde::Serialize;

use crate::models::{cart_item::CartItem, lead::Lead, totals::CartTotals};

// Pedido = lead convertido (type 2), com itens e totais
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub header: Lead,
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}
