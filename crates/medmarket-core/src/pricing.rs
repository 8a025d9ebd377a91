//! Client-side cost aggregation for carts, offers and wallet history.
//!
//! Amounts are plain `f64` as delivered by the backend; rounding only happens
//! when values are displayed.

use serde::Serialize;

use crate::model::{CartItem, Direction, OfferItem, WalletTransaction};

/// Share of the cart product subtotal charged by the platform.
pub const PLATFORM_FEE_RATE: f64 = 0.10;

/// Σ(price × quantity) over the line items of an offer.
pub fn offer_total(items: &[OfferItem]) -> f64 {
    items.iter().map(OfferItem::line_total).sum()
}

/// Σ(price × quantity) over the cart.
pub fn cart_subtotal(items: &[CartItem]) -> f64 {
    items.iter().map(CartItem::line_total).sum()
}

pub fn platform_fee(subtotal: f64) -> f64 {
    subtotal * PLATFORM_FEE_RATE
}

/// Number of units in the cart, as shown on the cart badge.
pub fn cart_count(items: &[CartItem]) -> u64 {
    items.iter().map(|i| u64::from(i.quantity)).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub subtotal: f64,
    pub platform_fee: f64,
    /// `None` until a delivery quote has been requested.
    pub delivery_fee: Option<f64>,
    pub total: f64,
}

pub fn checkout_summary(items: &[CartItem], delivery_fee: Option<f64>) -> CheckoutSummary {
    let subtotal = cart_subtotal(items);
    let platform_fee = platform_fee(subtotal);
    CheckoutSummary {
        subtotal,
        platform_fee,
        delivery_fee,
        total: subtotal + platform_fee + delivery_fee.unwrap_or(0.0),
    }
}

/// Cart items split by origin. Each group keeps the cart's original order.
#[derive(Debug, Default, PartialEq)]
pub struct CartGroups<'a> {
    pub direct: Vec<&'a CartItem>,
    pub from_offers: Vec<&'a CartItem>,
}

pub fn group_cart_items(items: &[CartItem]) -> CartGroups<'_> {
    let (from_offers, direct): (Vec<_>, Vec<_>) =
        items.iter().partition(|item| item.is_from_offer());
    CartGroups {
        direct,
        from_offers,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TransactionSummary {
    pub credits: f64,
    pub debits: f64,
    pub net: f64,
}

/// Totals wallet movements. Debits count by magnitude whatever sign the backend uses;
/// unclassified transactions are left out.
pub fn summarize_transactions(transactions: &[WalletTransaction]) -> TransactionSummary {
    let mut summary = TransactionSummary::default();
    for tx in transactions {
        match tx.kind.direction() {
            Some(Direction::Credit) => summary.credits += tx.amount.abs(),
            Some(Direction::Debit) => summary.debits += tx.amount.abs(),
            None => {
                tracing::debug!(id = tx.id, kind = %tx.kind, "Skipping unclassified transaction");
            }
        }
    }
    summary.net = summary.credits - summary.debits;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransactionKind;

    fn cart_item(id: i64, price: f64, quantity: u32, offer_id: Option<i64>) -> CartItem {
        CartItem {
            id,
            product_id: id * 10,
            product_name: None,
            price,
            quantity,
            offer_id,
            seller_hospital_id: None,
            seller_hospital_name: None,
        }
    }

    fn offer_item(price: f64, quantity: u32) -> OfferItem {
        OfferItem {
            product_id: 1,
            product_name: None,
            price,
            quantity,
        }
    }

    fn tx(id: i64, kind: &str, amount: f64) -> WalletTransaction {
        WalletTransaction {
            id,
            kind: TransactionKind::new(kind),
            amount,
            description: None,
            reference: None,
            created_at: None,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_offer_total_sums_price_times_quantity() {
        let items = vec![offer_item(12.5, 4), offer_item(3.0, 10), offer_item(0.99, 1)];
        assert!(approx(offer_total(&items), 50.0 + 30.0 + 0.99));
        assert_eq!(offer_total(&[]), 0.0);
    }

    #[test]
    fn test_platform_fee_is_ten_percent_of_subtotal() {
        let items = vec![cart_item(1, 100.0, 2, None), cart_item(2, 25.0, 4, Some(9))];
        let subtotal = cart_subtotal(&items);
        assert!(approx(subtotal, 300.0));
        assert!(approx(platform_fee(subtotal), 30.0));
        assert_eq!(platform_fee(0.0), 0.0);
    }

    #[test]
    fn test_checkout_summary_with_and_without_delivery() {
        let items = vec![cart_item(1, 40.0, 1, None)];

        let quoted = checkout_summary(&items, Some(5.0));
        assert!(approx(quoted.platform_fee, 4.0));
        assert!(approx(quoted.total, 49.0));

        let unquoted = checkout_summary(&items, None);
        assert_eq!(unquoted.delivery_fee, None);
        assert!(approx(unquoted.total, 44.0));
    }

    #[test]
    fn test_grouping_splits_on_offer_id_and_keeps_order() {
        let items = vec![
            cart_item(1, 1.0, 1, None),
            cart_item(2, 1.0, 1, Some(7)),
            cart_item(3, 1.0, 1, None),
            cart_item(4, 1.0, 1, Some(3)),
            cart_item(5, 1.0, 1, None),
        ];
        let groups = group_cart_items(&items);
        let direct: Vec<i64> = groups.direct.iter().map(|i| i.id).collect();
        let offers: Vec<i64> = groups.from_offers.iter().map(|i| i.id).collect();
        assert_eq!(direct, vec![1, 3, 5]);
        assert_eq!(offers, vec![2, 4]);
    }

    #[test]
    fn test_grouping_empty_cart() {
        let groups = group_cart_items(&[]);
        assert!(groups.direct.is_empty());
        assert!(groups.from_offers.is_empty());
    }

    #[test]
    fn test_cart_count_sums_quantities() {
        let items = vec![cart_item(1, 1.0, 3, None), cart_item(2, 1.0, 2, Some(1))];
        assert_eq!(cart_count(&items), 5);
    }

    #[test]
    fn test_cart_count_does_not_overflow() {
        let items = vec![
            cart_item(1, 1.0, u32::MAX, None),
            cart_item(2, 1.0, u32::MAX, None),
        ];
        assert_eq!(cart_count(&items), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_transaction_summary() {
        let txs = vec![
            tx(1, "CREDIT", 120.0),
            tx(2, "DEBIT", -20.0),
            tx(3, "debit", 30.0),
            tx(4, "ESCROW_HOLD", 999.0),
            tx(5, "SALE", 10.0),
            tx(6, "PURCHASE", 5.0),
        ];
        let summary = summarize_transactions(&txs);
        assert!(approx(summary.credits, 130.0));
        assert!(approx(summary.debits, 55.0));
        assert!(approx(summary.net, 75.0));
    }
}
