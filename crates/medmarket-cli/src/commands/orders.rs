use anyhow::Result;
use colored::Colorize;

use medmarket_core::model::{Order, OrderStatus, OrderView};

use crate::cli::OutputFormat;
use crate::output::{money, or_dash, print_json, print_table};
use crate::session::Session;

pub async fn list(session: &Session, view: OrderView, format: OutputFormat) -> Result<()> {
    session.require_hospital()?;
    let orders = match session.client().orders(view).await {
        Ok(orders) => orders,
        Err(e) if e.is_not_found() => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    match format {
        OutputFormat::Json => print_json(&orders)?,
        OutputFormat::Table => print_orders(&orders, view),
    }
    Ok(())
}

fn print_orders(orders: &[Order], view: OrderView) {
    let counterparty_header = match view {
        OrderView::Purchases => "Seller",
        OrderView::Sales => "Buyer",
    };
    let rows = orders
        .iter()
        .map(|o| {
            let counterparty = match view {
                OrderView::Purchases => o
                    .seller_hospital_name
                    .clone()
                    .unwrap_or_else(|| format!("#{}", o.seller_hospital_id)),
                OrderView::Sales => o
                    .buyer_hospital_name
                    .clone()
                    .unwrap_or_else(|| format!("#{}", o.buyer_hospital_id)),
            };
            [
                o.id.to_string(),
                or_dash(o.created_at.as_deref()),
                counterparty,
                o.item_count().to_string(),
                money(o.delivery_fee),
                money(o.total_amount),
                status_label(&o.status),
            ]
        })
        .collect();
    let empty = match view {
        OrderView::Purchases => "No orders yet.",
        OrderView::Sales => "No sales yet.",
    };
    print_table(
        ["ID", "Date", counterparty_header, "Units", "Delivery", "Total", "Status"],
        rows,
        empty,
    );
}

fn status_label(status: &OrderStatus) -> String {
    let text = status.to_string();
    match status {
        OrderStatus::Delivered => text.green().to_string(),
        OrderStatus::Cancelled => text.red().to_string(),
        OrderStatus::Shipped | OrderStatus::Confirmed => text.cyan().to_string(),
        OrderStatus::Pending | OrderStatus::Other(_) => text.yellow().to_string(),
    }
}
