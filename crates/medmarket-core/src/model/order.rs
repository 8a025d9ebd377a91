use std::fmt;

use serde::{Deserialize, Serialize};

use super::Id;

/// Order lifecycle status as reported by the backend. Any other spelling is kept
/// verbatim so it is written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
    Other(String),
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PENDING" => Self::Pending,
            "CONFIRMED" => Self::Confirmed,
            "SHIPPED" => Self::Shipped,
            "DELIVERED" => Self::Delivered,
            "CANCELLED" => Self::Cancelled,
            _ => Self::Other(value),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(value: OrderStatus) -> Self {
        value.to_string()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Confirmed => write!(f, "CONFIRMED"),
            Self::Shipped => write!(f, "SHIPPED"),
            Self::Delivered => write!(f, "DELIVERED"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub price: f64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Id,
    pub buyer_hospital_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_hospital_name: Option<String>,
    pub seller_hospital_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_hospital_name: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub platform_fee: f64,
    #[serde(default)]
    pub delivery_fee: f64,
    pub total_amount: f64,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Order {
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}

/// Which side of the trade to list orders for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderView {
    #[default]
    Purchases,
    Sales,
}

impl OrderView {
    pub fn as_query(self) -> &'static str {
        match self {
            Self::Purchases => "purchases",
            Self::Sales => "sales",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryQuote {
    pub delivery_fee: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_and_unknown_statuses() {
        let shipped: OrderStatus = serde_json::from_value(json!("SHIPPED")).unwrap();
        assert_eq!(shipped, OrderStatus::Shipped);

        let custom: OrderStatus = serde_json::from_value(json!("AWAITING_PICKUP")).unwrap();
        assert_eq!(custom, OrderStatus::Other("AWAITING_PICKUP".into()));
        assert_eq!(serde_json::to_value(&custom).unwrap(), "AWAITING_PICKUP");
    }

    #[test]
    fn test_order_item_count() {
        let order: Order = serde_json::from_value(json!({
            "id": 3,
            "buyerHospitalId": 1,
            "sellerHospitalId": 2,
            "items": [
                {"productId": 1, "price": 1.0, "quantity": 2},
                {"productId": 2, "price": 1.0, "quantity": 5}
            ],
            "totalAmount": 7.7,
            "status": "PENDING"
        }))
        .unwrap();
        assert_eq!(order.item_count(), 7);
        assert_eq!(order.delivery_fee, 0.0);
    }

    #[test]
    fn test_status_spelling_is_preserved() {
        for raw in ["CANCELED", "shipped"] {
            let status: OrderStatus = serde_json::from_value(json!(raw)).unwrap();
            assert_eq!(status, OrderStatus::Other(raw.into()));
            assert_eq!(serde_json::to_value(&status).unwrap(), raw);
        }
        assert_eq!(
            serde_json::to_value(OrderStatus::Cancelled).unwrap(),
            "CANCELLED"
        );
    }

    #[test]
    fn test_item_count_does_not_overflow() {
        let item = json!({"productId": 1, "price": 1.0, "quantity": u32::MAX});
        let order: Order = serde_json::from_value(json!({
            "id": 1,
            "buyerHospitalId": 1,
            "sellerHospitalId": 2,
            "items": [item.clone(), item],
            "totalAmount": 0.0,
            "status": "PENDING"
        }))
        .unwrap();
        assert_eq!(order.item_count(), 2 * u64::from(u32::MAX));
    }
}
