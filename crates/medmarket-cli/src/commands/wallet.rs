use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use medmarket_core::model::{Direction, WalletTransaction};
use medmarket_core::pricing::summarize_transactions;

use crate::cli::OutputFormat;
use crate::output::{money, or_dash, print_field, print_json, print_table};
use crate::session::Session;

pub async fn transactions(session: &Session, format: OutputFormat) -> Result<()> {
    session.require_hospital()?;
    let txs = match session.client().my_transactions().await {
        Ok(txs) => txs,
        Err(e) if e.is_not_found() => Vec::new(),
        Err(e) => return Err(e.into()),
    };
    let summary = summarize_transactions(&txs);

    if format == OutputFormat::Json {
        return print_json(&json!({ "transactions": txs, "summary": summary }));
    }

    print_transactions(&txs);
    if !txs.is_empty() {
        print_field("Credits", money(summary.credits).green());
        print_field("Debits", money(summary.debits).red());
        print_field("Net", money(summary.net).bold());
    }
    Ok(())
}

fn print_transactions(txs: &[WalletTransaction]) {
    let rows = txs
        .iter()
        .map(|tx| {
            let amount = match tx.kind.direction() {
                Some(Direction::Credit) => format!("+{}", money(tx.amount.abs())).green(),
                Some(Direction::Debit) => format!("-{}", money(tx.amount.abs())).red(),
                None => money(tx.amount).normal(),
            };
            [
                tx.id.to_string(),
                or_dash(tx.created_at.as_deref()),
                tx.kind.to_string(),
                amount.to_string(),
                or_dash(tx.description.as_deref()),
                or_dash(tx.reference.as_deref()),
            ]
        })
        .collect();
    print_table(
        ["ID", "Date", "Type", "Amount", "Description", "Reference"],
        rows,
        "No wallet transactions.",
    );
}
