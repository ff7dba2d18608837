// src/models/totals.rs

use rust_decimal::Decimal;
use serde::Serialize;

// Totais do carrinho. Calculados a cada requisição, nunca persistidos.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Decimal,
    #[serde(rename = "totalIPI")]
    pub total_ipi: Decimal,
    #[serde(rename = "totalST")]
    pub total_st: Decimal,
    pub freight: Decimal,
    pub grand_total: Decimal,
    pub profitability: Option<Profitability>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profitability {
    pub margin: Decimal,
    pub commission: Decimal,
    pub margin_percent: Decimal,
}
