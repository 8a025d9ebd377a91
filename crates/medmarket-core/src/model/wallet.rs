use std::fmt;

use serde::{Deserialize, Serialize};

use super::Id;

/// Transaction type exactly as the backend reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionKind(String);

/// Which way money moved in a wallet transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Credit,
    Debit,
}

impl TransactionKind {
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classify the type for wallet totals. `None` for types that move no money
    /// in or out, or that this client does not know.
    pub fn direction(&self) -> Option<Direction> {
        match self.0.to_ascii_uppercase().as_str() {
            "CREDIT" | "DEPOSIT" | "SALE" => Some(Direction::Credit),
            "DEBIT" | "WITHDRAWAL" | "PURCHASE" => Some(Direction::Debit),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    pub id: Id,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// On-chain or ledger reference, if the backend exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_is_written_back_unchanged() {
        let raw = json!({"id": 1, "type": "SALE", "amount": 5.0});
        let tx: WalletTransaction = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(tx.kind.direction(), Some(Direction::Credit));
        assert_eq!(tx.kind.to_string(), "SALE");
        assert_eq!(serde_json::to_value(&tx).unwrap(), raw);
    }

    #[test]
    fn test_direction() {
        assert_eq!(TransactionKind::new("debit").direction(), Some(Direction::Debit));
        assert_eq!(TransactionKind::new("Withdrawal").direction(), Some(Direction::Debit));
        assert_eq!(TransactionKind::new("DEPOSIT").direction(), Some(Direction::Credit));
        assert_eq!(TransactionKind::new("ESCROW_HOLD").direction(), None);
    }
}
