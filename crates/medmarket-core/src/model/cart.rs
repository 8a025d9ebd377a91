use serde::{Deserialize, Serialize};

use super::Id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: Id,
    pub product_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub price: f64,
    pub quantity: u32,
    /// Set when the item came from an accepted offer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_hospital_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_hospital_name: Option<String>,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    pub fn is_from_offer(&self) -> bool {
        self.offer_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub product_id: Id,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_id: Option<Id>,
}
