use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;

use medmarket_core::model::{AddToCart, CartItem, Id};
use medmarket_core::pricing::CheckoutSummary;

use crate::cart::CartState;
use crate::cli::OutputFormat;
use crate::output::{confirm, money, or_dash, print_field, print_json, print_success, print_table};
use crate::session::Session;

async fn load_cart(session: &Session) -> Result<CartState> {
    session.require_hospital()?;
    CartState::load(session.client())
        .await
        .context("Failed to load cart")
}

pub async fn show(session: &Session, format: OutputFormat) -> Result<()> {
    let cart = load_cart(session).await?;
    let summary = cart.summary(None);

    if format == OutputFormat::Json {
        let groups = cart.groups();
        return print_json(&json!({
            "items": groups.direct,
            "offerItems": groups.from_offers,
            "count": cart.count(),
            "summary": summary,
        }));
    }

    if cart.is_empty() {
        println!("Your cart is empty.");
        return Ok(());
    }

    let groups = cart.groups();
    if !groups.direct.is_empty() {
        println!("{}", "Marketplace items".bold());
        print_items(&groups.direct);
    }
    if !groups.from_offers.is_empty() {
        println!("{}", "From accepted offers".bold());
        print_items(&groups.from_offers);
    }
    print_field("Items", cart.count());
    print_summary(&summary);
    Ok(())
}

fn print_items(items: &[&CartItem]) {
    let rows = items
        .iter()
        .map(|i| {
            [
                i.id.to_string(),
                i.product_name
                    .clone()
                    .unwrap_or_else(|| format!("product #{}", i.product_id)),
                or_dash(i.seller_hospital_name.as_deref()),
                money(i.price),
                i.quantity.to_string(),
                money(i.line_total()),
                i.offer_id.map(|id| format!("#{id}")).unwrap_or_else(|| "-".into()),
            ]
        })
        .collect();
    print_table(
        ["Item", "Product", "Seller", "Price", "Qty", "Line total", "Offer"],
        rows,
        "",
    );
}

pub fn print_summary(summary: &CheckoutSummary) {
    print_field("Subtotal", money(summary.subtotal));
    print_field("Platform fee (10%)", money(summary.platform_fee));
    match summary.delivery_fee {
        Some(fee) => print_field("Delivery", money(fee)),
        None => print_field("Delivery", "quote with `medmarket checkout quote`".dimmed()),
    }
    print_field("Total", money(summary.total).bold());
}

pub async fn add(
    session: &Session,
    product_id: Id,
    quantity: u32,
    offer_id: Option<Id>,
) -> Result<()> {
    if quantity == 0 {
        anyhow::bail!("Quantity must be at least 1");
    }
    let mut cart = load_cart(session).await?;
    cart.add(
        session.client(),
        &AddToCart {
            product_id,
            quantity,
            offer_id,
        },
    )
    .await?;
    print_success(&format!(
        "Added {quantity} × product #{product_id} ({} item(s) in cart)",
        cart.count()
    ));
    Ok(())
}

pub async fn remove(session: &Session, item_id: Id) -> Result<()> {
    let mut cart = load_cart(session).await?;
    if !cart.items().iter().any(|i| i.id == item_id) {
        anyhow::bail!("Cart item #{item_id} not found");
    }
    cart.remove(session.client(), item_id).await?;
    print_success(&format!(
        "Removed item #{item_id} ({} item(s) left)",
        cart.count()
    ));
    Ok(())
}

pub async fn clear(session: &Session, assume_yes: bool) -> Result<()> {
    let mut cart = load_cart(session).await?;
    if cart.is_empty() {
        println!("Your cart is already empty.");
        return Ok(());
    }
    if !confirm(
        &format!("Remove all {} item(s) from the cart?", cart.count()),
        assume_yes,
    )? {
        println!("Cancelled.");
        return Ok(());
    }
    cart.clear(session.client()).await?;
    print_success("Cart cleared");
    Ok(())
}
