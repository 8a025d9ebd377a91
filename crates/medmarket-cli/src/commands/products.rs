use anyhow::Result;

use medmarket_core::model::Product;

use crate::cli::{OutputFormat, ProductsArgs};
use crate::client::ProductQuery;
use crate::output::{money, or_dash, print_json, print_table};
use crate::session::Session;

pub async fn list(session: &Session, args: &ProductsArgs, format: OutputFormat) -> Result<()> {
    session.require_login()?;

    let hospital_id = if args.mine {
        Some(session.require_hospital()?.id)
    } else {
        args.hospital
    };

    let mut products = match hospital_id {
        Some(id) => session.client().hospital_products(id).await?,
        None => {
            let query = ProductQuery {
                search: args.search.clone(),
                category: args.category.clone(),
            };
            session.client().products(&query).await?
        }
    };

    // The per-hospital endpoint takes no filters; apply them locally.
    if hospital_id.is_some() {
        products.retain(|p| matches_filters(p, args));
    }

    match format {
        OutputFormat::Json => print_json(&products)?,
        OutputFormat::Table => print_products(&products),
    }
    Ok(())
}

fn matches_filters(product: &Product, args: &ProductsArgs) -> bool {
    let search_ok = args.search.as_deref().is_none_or(|needle| {
        let needle = needle.to_lowercase();
        product.name.to_lowercase().contains(&needle)
            || product
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    });
    let category_ok = args.category.as_deref().is_none_or(|category| {
        product
            .category
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(category))
    });
    search_ok && category_ok
}

pub fn print_products(products: &[Product]) {
    let rows = products
        .iter()
        .map(|p| {
            [
                p.id.to_string(),
                p.name.clone(),
                or_dash(p.category.as_deref()),
                money(p.price),
                if p.in_stock() {
                    p.quantity.to_string()
                } else {
                    "out of stock".to_string()
                },
                or_dash(p.expiry_date.as_deref()),
                p.hospital_name
                    .clone()
                    .unwrap_or_else(|| format!("#{}", p.hospital_id)),
            ]
        })
        .collect();
    print_table(
        ["ID", "Name", "Category", "Price", "Stock", "Expires", "Seller"],
        rows,
        "No products found.",
    );
}
