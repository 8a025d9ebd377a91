use anyhow::{Context, Result};
use colored::Colorize;

use medmarket_core::model::{Id, NewOffer, Offer, OfferAction, OfferItem, OfferStatus};

use crate::cli::{ChatArgs, CreateOfferArgs, OfferStatusArg, OutputFormat};
use crate::output::{
    confirm, money, or_dash, print_field, print_json, print_success, print_table,
};
use crate::session::Session;

impl From<OfferStatusArg> for OfferStatus {
    fn from(value: OfferStatusArg) -> Self {
        match value {
            OfferStatusArg::Pending => Self::Pending,
            OfferStatusArg::Accepted => Self::Accepted,
            OfferStatusArg::Rejected => Self::Rejected,
        }
    }
}

/// Parse a `product_id:price:quantity` line item.
fn parse_item(raw: &str) -> Result<OfferItem> {
    let parts: Vec<&str> = raw.split(':').map(str::trim).collect();
    let [product_id, price, quantity] = parts.as_slice() else {
        anyhow::bail!("Invalid item \"{raw}\". Expected format: product_id:price:quantity");
    };
    Ok(OfferItem {
        product_id: product_id
            .parse()
            .with_context(|| format!("Invalid product ID in \"{raw}\""))?,
        product_name: None,
        price: price
            .parse()
            .with_context(|| format!("Invalid price in \"{raw}\""))?,
        quantity: quantity
            .parse()
            .with_context(|| format!("Invalid quantity in \"{raw}\""))?,
    })
}

async fn find_offer(session: &Session, id: Id) -> Result<Offer> {
    session
        .client()
        .offers()
        .await?
        .into_iter()
        .find(|o| o.id == id)
        .with_context(|| format!("Offer #{id} not found"))
}

pub async fn list(
    session: &Session,
    status: Option<OfferStatusArg>,
    format: OutputFormat,
) -> Result<()> {
    let hospital = session.require_hospital()?;
    let mut offers = session.client().offers().await?;
    if let Some(status) = status.map(OfferStatus::from) {
        offers.retain(|o| o.status == status);
    }

    if format == OutputFormat::Json {
        return print_json(&offers);
    }

    let rows = offers
        .iter()
        .map(|o| {
            let direction = if o.is_sent_by(hospital.id) { "sent" } else { "received" };
            let actions: Vec<String> = o
                .status
                .available_actions()
                .iter()
                .map(ToString::to_string)
                .collect();
            [
                o.id.to_string(),
                direction.to_string(),
                o.counterparty_name(hospital.id),
                status_label(o.status),
                o.items.len().to_string(),
                money(o.total()),
                if actions.is_empty() { "-".into() } else { actions.join(", ") },
            ]
        })
        .collect();
    print_table(
        ["ID", "Direction", "With", "Status", "Items", "Total", "Actions"],
        rows,
        "No offers.",
    );
    Ok(())
}

pub async fn show(session: &Session, id: Id, format: OutputFormat) -> Result<()> {
    let hospital = session.require_hospital()?;
    let offer = find_offer(session, id).await?;

    if format == OutputFormat::Json {
        return print_json(&offer);
    }

    print_field("Offer", format!("#{}", offer.id));
    print_field("With", offer.counterparty_name(hospital.id));
    print_field("Status", status_label(offer.status));
    if let Some(message) = &offer.message {
        print_field("Message", message);
    }
    let rows = offer
        .items
        .iter()
        .map(|i| {
            [
                i.product_id.to_string(),
                or_dash(i.product_name.as_deref()),
                money(i.price),
                i.quantity.to_string(),
                money(i.line_total()),
            ]
        })
        .collect();
    print_table(
        ["Product", "Name", "Price", "Qty", "Line total"],
        rows,
        "No line items.",
    );
    print_field("Total", money(offer.total()).bold());
    Ok(())
}

pub async fn create(session: &Session, args: &CreateOfferArgs, format: OutputFormat) -> Result<()> {
    let hospital = session.require_hospital()?;
    if args.to == hospital.id {
        anyhow::bail!("You cannot send an offer to your own hospital");
    }

    let offer = NewOffer {
        to_hospital_id: args.to,
        items: args
            .items
            .iter()
            .map(String::as_str)
            .map(parse_item)
            .collect::<Result<_>>()?,
        message: args.message.clone(),
    };
    offer.validate()?;

    let created = session.client().create_offer(&offer).await?;
    if format == OutputFormat::Json {
        return print_json(&created);
    }
    print_success(&format!(
        "Sent offer #{} to {} (total {})",
        created.id,
        created.counterparty_name(hospital.id).cyan(),
        money(created.total())
    ));
    Ok(())
}

/// Accept, reject or reopen an offer.
pub async fn respond(session: &Session, id: Id, action: OfferAction) -> Result<()> {
    session.require_hospital()?;
    let current = find_offer(session, id).await?;
    if !action.is_allowed_from(current.status) {
        anyhow::bail!(
            "Cannot {action} offer #{id}: it is {}",
            current.status.as_str().to_lowercase()
        );
    }

    let updated = session
        .client()
        .update_offer_status(id, action.target_status())
        .await?;
    print_success(&format!(
        "Offer #{id} is now {}",
        status_label(updated.status)
    ));
    Ok(())
}

pub async fn delete(session: &Session, id: Id, assume_yes: bool) -> Result<()> {
    session.require_hospital()?;
    if !confirm(&format!("Withdraw offer #{id}?"), assume_yes)? {
        println!("Cancelled.");
        return Ok(());
    }
    session.client().delete_offer(id).await?;
    print_success(&format!("Withdrew offer #{id}"));
    Ok(())
}

pub async fn chat(session: &Session, args: &ChatArgs, format: OutputFormat) -> Result<()> {
    let hospital = session.require_hospital()?;
    if let Some(message) = args.send.as_deref() {
        if message.trim().is_empty() {
            anyhow::bail!("Message cannot be empty");
        }
        session.client().send_chat(args.id, message.trim()).await?;
    }

    let messages = session.client().offer_chat(args.id).await?;
    if format == OutputFormat::Json {
        return print_json(&messages);
    }
    if messages.is_empty() {
        println!("No messages yet.");
    }
    for msg in &messages {
        let sender = if msg.sender_hospital_id == hospital.id {
            "you".green().to_string()
        } else {
            msg.sender_name
                .clone()
                .unwrap_or_else(|| format!("hospital #{}", msg.sender_hospital_id))
                .cyan()
                .to_string()
        };
        let at = msg.created_at.as_deref().unwrap_or("");
        println!("{} {} {}", at.dimmed(), sender, msg.message);
    }
    Ok(())
}

fn status_label(status: OfferStatus) -> String {
    match status {
        OfferStatus::Pending => status.as_str().yellow().to_string(),
        OfferStatus::Accepted => status.as_str().green().to_string(),
        OfferStatus::Rejected => status.as_str().red().to_string(),
    }
}
