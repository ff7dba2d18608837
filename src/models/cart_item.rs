// src/models/cart_item.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::common::{error::AppError, validation::non_negative};

pub const DEFAULT_TIMES: i32 = 1;

// Item do carrinho (mak.icart). Pertence a exatamente um lead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: i64,
    #[serde(rename = "cartId")]
    pub lead_id: i64,
    pub product_id: i64,
    pub product_name: Option<String>,
    pub quantity: i32,
    pub price: Decimal,
    pub consumer_price: Decimal,
    pub original_price: Decimal,
    pub times: i32,
    pub ipi: Decimal,
    pub st: Decimal,
    pub ttd: bool,
    // Custo do produto (cadastro). Usado na rentabilidade, nunca exposto.
    #[serde(skip_serializing)]
    pub cost: Option<Decimal>,
    pub subtotal: Decimal,
}

impl CartItem {
    pub fn line_subtotal(price: Decimal, quantity: i32) -> Decimal {
        price * Decimal::from(quantity)
    }

    fn refresh_subtotal(&mut self) {
        self.subtotal = Self::line_subtotal(self.price, self.quantity);
    }
}

#[derive(Debug, FromRow)]
pub struct CartItemRow {
    pub id: i64,
    pub lead_id: i64,
    pub product_id: i64,
    pub product_name: Option<String>,
    pub quantity: i32,
    pub price: Decimal,
    pub consumer_price: Decimal,
    pub original_price: Decimal,
    pub times: i32,
    pub ipi: Decimal,
    pub st: Decimal,
    pub ttd: bool,
    pub cost: Option<Decimal>,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        Self {
            subtotal: CartItem::line_subtotal(row.price, row.quantity),
            id: row.id,
            lead_id: row.lead_id,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            price: row.price,
            consumer_price: row.consumer_price,
            original_price: row.original_price,
            times: row.times,
            ipi: row.ipi,
            st: row.st,
            ttd: row.ttd,
            cost: row.cost,
        }
    }
}

/// Cotação devolvida pelo serviço de preços.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub price: Decimal,
    pub consumer_price: Option<Decimal>,
    pub ipi: Option<Decimal>,
    pub st: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddItemPayload {
    #[serde(rename = "productId")]
    #[validate(required(message = "required"), range(min = 1, message = "min_one"))]
    pub product_id: Option<i64>,

    #[validate(required(message = "required"), range(min = 1, message = "min_one"))]
    pub quantity: Option<i32>,

    // Sem preço, o serviço de preços é consultado
    #[validate(custom(function = "non_negative"))]
    pub price: Option<Decimal>,

    #[serde(rename = "consumerPrice")]
    #[validate(custom(function = "non_negative"))]
    pub consumer_price: Option<Decimal>,

    #[serde(rename = "originalPrice")]
    #[validate(custom(function = "non_negative"))]
    pub original_price: Option<Decimal>,

    #[validate(range(min = 1, max = 24, message = "out_of_range"))]
    pub times: Option<i32>,

    #[validate(custom(function = "non_negative"))]
    pub ipi: Option<Decimal>,

    #[validate(custom(function = "non_negative"))]
    pub st: Option<Decimal>,

    pub ttd: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub product_id: i64,
    pub quantity: i32,
    pub price: Decimal,
    pub consumer_price: Decimal,
    pub original_price: Decimal,
    pub times: i32,
    pub ipi: Decimal,
    pub st: Decimal,
    pub ttd: bool,
}

impl NewCartItem {
    /// Junta o que veio no payload com a cotação (quando houver).
    /// O payload sempre vence; sem preço em nenhum dos dois é erro de validação.
    pub fn resolve(payload: AddItemPayload, quote: Option<PriceQuote>) -> Result<Self, AppError> {
        let product_id = payload
            .product_id
            .ok_or_else(|| AppError::invalid_field("productId", "required"))?;
        let quantity = payload
            .quantity
            .ok_or_else(|| AppError::invalid_field("quantity", "required"))?;

        let price = payload
            .price
            .or(quote.as_ref().map(|q| q.price))
            .ok_or_else(|| AppError::invalid_field("price", "required"))?;

        let consumer_price = payload
            .consumer_price
            .or(quote.as_ref().and_then(|q| q.consumer_price))
            .unwrap_or(price);
        let ipi = payload
            .ipi
            .or(quote.as_ref().and_then(|q| q.ipi))
            .unwrap_or(Decimal::ZERO);
        let st = payload
            .st
            .or(quote.as_ref().and_then(|q| q.st))
            .unwrap_or(Decimal::ZERO);

        Ok(Self {
            product_id,
            quantity,
            price,
            consumer_price,
            original_price: payload
                .original_price
                .or(quote.as_ref().map(|q| q.price))
                .unwrap_or(price),
            times: payload.times.unwrap_or(DEFAULT_TIMES),
            ipi,
            st,
            ttd: payload.ttd.unwrap_or(false),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemPayload {
    #[validate(range(min = 1, message = "min_one"))]
    pub quantity: Option<i32>,

    #[validate(custom(function = "non_negative"))]
    pub price: Option<Decimal>,

    #[serde(rename = "consumerPrice")]
    #[validate(custom(function = "non_negative"))]
    pub consumer_price: Option<Decimal>,

    #[validate(range(min = 1, max = 24, message = "out_of_range"))]
    pub times: Option<i32>,

    #[validate(custom(function = "non_negative"))]
    pub ipi: Option<Decimal>,

    #[validate(custom(function = "non_negative"))]
    pub st: Option<Decimal>,

    pub ttd: Option<bool>,
}

impl UpdateItemPayload {
    pub fn is_empty(&self) -> bool {
        self.quantity.is_none()
            && self.price.is_none()
            && self.consumer_price.is_none()
            && self.times.is_none()
            && self.ipi.is_none()
            && self.st.is_none()
            && self.ttd.is_none()
    }

    pub fn apply_to(&self, item: &mut CartItem) {
        if let Some(v) = self.quantity {
            item.quantity = v;
        }
        if let Some(v) = self.price {
            item.price = v;
        }
        if let Some(v) = self.consumer_price {
            item.consumer_price = v;
        }
        if let Some(v) = self.times {
            item.times = v;
        }
        if let Some(v) = self.ipi {
            item.ipi = v;
        }
        if let Some(v) = self.st {
            item.st = v;
        }
        if let Some(v) = self.ttd {
            item.ttd = v;
        }
        item.refresh_subtotal();
    }
}
