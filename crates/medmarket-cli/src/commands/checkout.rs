use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;

use medmarket_core::model::Id;

use crate::cart::CartState;
use crate::cli::OutputFormat;
use crate::commands::cart::print_summary;
use crate::output::{confirm, money, print_json, print_success};
use crate::session::Session;

async fn non_empty_cart(session: &Session) -> Result<CartState> {
    session.require_hospital()?;
    let cart = CartState::load(session.client())
        .await
        .context("Failed to load cart")?;
    if cart.is_empty() {
        anyhow::bail!("Your cart is empty");
    }
    Ok(cart)
}

pub async fn quote(session: &Session, address_id: Id, format: OutputFormat) -> Result<()> {
    let cart = non_empty_cart(session).await?;
    let quote = session
        .client()
        .request_delivery_price(address_id)
        .await
        .context("Failed to get a delivery price")?;
    let summary = cart.summary(Some(quote.delivery_fee));

    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Table => print_summary(&summary),
    }
    Ok(())
}

pub async fn place(
    session: &Session,
    address_id: Id,
    assume_yes: bool,
    format: OutputFormat,
) -> Result<()> {
    let cart = non_empty_cart(session).await?;
    let quote = session
        .client()
        .request_delivery_price(address_id)
        .await
        .context("Failed to get a delivery price")?;
    let summary = cart.summary(Some(quote.delivery_fee));

    if format == OutputFormat::Table {
        print_summary(&summary);
    }
    if !confirm(
        &format!("Place order for {}?", money(summary.total)),
        assume_yes,
    )? {
        println!("Cancelled.");
        return Ok(());
    }

    let orders = session.client().place_order(address_id).await?;
    if format == OutputFormat::Json {
        return print_json(&json!({ "summary": summary, "orders": orders }));
    }
    let ids: Vec<String> = orders.iter().map(|o| format!("#{}", o.id)).collect();
    print_success(&format!(
        "Placed {} order(s): {}",
        orders.len(),
        ids.join(", ").cyan()
    ));
    Ok(())
}
