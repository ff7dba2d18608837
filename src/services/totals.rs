// src/services/totals.rs

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{
    cart_item::CartItem,
    totals::{CartTotals, Profitability},
};

const CURRENCY_DP: u32 = 2;

/// Arredondamento monetário: meio para longe do zero, 2 casas.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Função pura: itens + frete (+ comissão do vendedor) -> totais.
///
/// Cada componente é somado sem arredondar linha a linha e arredondado uma
/// única vez; o total geral é a soma exata dos componentes já arredondados.
/// A rentabilidade só existe quando todo item tem custo e a comissão é conhecida.
pub fn compute_totals(items: &[CartItem], freight: Decimal, commission_rate: Option<Decimal>) -> CartTotals {
    let raw_subtotal: Decimal = items.iter().map(|i| i.price * Decimal::from(i.quantity)).sum();
    let raw_ipi: Decimal = items.iter().map(|i| i.ipi).sum();
    let raw_st: Decimal = items.iter().map(|i| i.st).sum();

    let subtotal = round_currency(raw_subtotal);
    let total_ipi = round_currency(raw_ipi);
    let total_st = round_currency(raw_st);
    let freight = round_currency(freight);

    CartTotals {
        item_count: items.len(),
        total_quantity: items.iter().map(|i| i64::from(i.quantity)).sum(),
        subtotal,
        total_ipi,
        total_st,
        freight,
        grand_total: subtotal + total_ipi + total_st + freight,
        profitability: profitability(items, raw_subtotal, commission_rate),
    }
}

fn profitability(items: &[CartItem], subtotal: Decimal, commission_rate: Option<Decimal>) -> Option<Profitability> {
    let rate = commission_rate?;
    if items.is_empty() {
        return None;
    }

    let total_cost = items
        .iter()
        .map(|i| i.cost.map(|c| c * Decimal::from(i.quantity)))
        .sum::<Option<Decimal>>()?;

    let margin = subtotal - total_cost;
    let margin_percent = if subtotal.is_zero() {
        Decimal::ZERO
    } else {
        margin / subtotal * Decimal::ONE_HUNDRED
    };

    Some(Profitability {
        margin: round_currency(margin),
        commission: round_currency(subtotal * rate / Decimal::ONE_HUNDRED),
        margin_percent: round_currency(margin_percent),
    })
}
