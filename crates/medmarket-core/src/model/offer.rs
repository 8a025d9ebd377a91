use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Id;
use crate::error::{CoreError, Result};
use crate::pricing;

/// Negotiation state of an offer. Transitions are enforced by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
}

impl OfferStatus {
    /// Actions a participant may take on an offer in this state.
    pub fn available_actions(self) -> &'static [OfferAction] {
        match self {
            Self::Pending => &[OfferAction::Accept, OfferAction::Reject],
            Self::Rejected => &[OfferAction::Reopen],
            Self::Accepted => &[],
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status change requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferAction {
    Accept,
    Reject,
    Reopen,
}

impl OfferAction {
    /// Status sent to the backend for this action.
    pub fn target_status(self) -> OfferStatus {
        match self {
            Self::Accept => OfferStatus::Accepted,
            Self::Reject => OfferStatus::Rejected,
            Self::Reopen => OfferStatus::Pending,
        }
    }

    pub fn is_allowed_from(self, status: OfferStatus) -> bool {
        status.available_actions().contains(&self)
    }
}

impl fmt::Display for OfferAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accept => write!(f, "accept"),
            Self::Reject => write!(f, "reject"),
            Self::Reopen => write!(f, "reopen"),
        }
    }
}

impl FromStr for OfferAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "accept" => Ok(Self::Accept),
            "reject" => Ok(Self::Reject),
            "reopen" => Ok(Self::Reopen),
            other => Err(CoreError::invalid_value(
                "action",
                format!("unknown offer action '{other}' (expected accept, reject or reopen)"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferItem {
    pub product_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub price: f64,
    pub quantity: u32,
}

impl OfferItem {
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: Id,
    pub from_hospital_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_hospital_name: Option<String>,
    pub to_hospital_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_hospital_name: Option<String>,
    pub status: OfferStatus,
    #[serde(default)]
    pub items: Vec<OfferItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Offer {
    pub fn total(&self) -> f64 {
        pricing::offer_total(&self.items)
    }

    /// Whether `hospital_id` sent this offer (as opposed to receiving it).
    pub fn is_sent_by(&self, hospital_id: Id) -> bool {
        self.from_hospital_id == hospital_id
    }

    /// The other side of the negotiation from `hospital_id`'s point of view.
    pub fn counterparty_name(&self, hospital_id: Id) -> String {
        let (id, name) = if self.is_sent_by(hospital_id) {
            (self.to_hospital_id, &self.to_hospital_name)
        } else {
            (self.from_hospital_id, &self.from_hospital_name)
        };
        name.clone().unwrap_or_else(|| format!("hospital #{id}"))
    }
}

/// Payload for proposing a new offer to another hospital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOffer {
    pub to_hospital_id: Id,
    pub items: Vec<OfferItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl NewOffer {
    pub fn validate(&self) -> Result<()> {
        if self.items.is_empty() {
            return Err(CoreError::invalid_offer("an offer needs at least one item"));
        }
        for item in &self.items {
            if !(item.price.is_finite() && item.price > 0.0) {
                return Err(CoreError::invalid_offer(format!(
                    "price for product {} must be greater than zero",
                    item.product_id
                )));
            }
            if item.quantity == 0 {
                return Err(CoreError::invalid_offer(format!(
                    "quantity for product {} must be at least 1",
                    item.product_id
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Id,
    pub offer_id: Id,
    pub sender_hospital_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}
