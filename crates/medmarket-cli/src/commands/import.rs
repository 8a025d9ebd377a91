use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;

use medmarket_core::csv_import::{ImportReport, import_products_file};

use crate::cli::{ImportArgs, OutputFormat};
use crate::output::{money, print_error, print_json, print_success, print_table, print_warning};
use crate::session::Session;

pub async fn import(session: &Session, args: &ImportArgs, format: OutputFormat) -> Result<()> {
    let report = import_products_file(&args.file)
        .with_context(|| format!("Cannot import {}", args.file.display()))?;
    let json_output = format == OutputFormat::Json;

    if args.dry_run {
        if json_output {
            return print_json(&report);
        }
        print_report(&report);
        return Ok(());
    }
    if !json_output {
        print_report(&report);
    }
    if report.rows.is_empty() {
        if json_output {
            print_json(&json!({ "report": report, "created": [], "failed": [] }))?;
        }
        anyhow::bail!("Nothing to import");
    }

    let hospital = session.require_hospital()?;
    let mut created = Vec::new();
    let mut failed = Vec::new();
    for row in &report.rows {
        match session.client().create_product(hospital.id, &row.product).await {
            Ok(product) => {
                tracing::debug!(line = row.line, id = product.id, "Created product");
                created.push(product);
            }
            Err(e) => {
                tracing::warn!(line = row.line, error = %e, "Failed to create product");
                if !json_output {
                    print_error(&format!("line {}: {} ({e})", row.line, row.product.name));
                }
                failed.push(json!({
                    "line": row.line,
                    "name": row.product.name,
                    "error": e.to_string(),
                }));
            }
        }
    }

    if json_output {
        print_json(&json!({ "report": report, "created": created, "failed": failed }))?;
    } else {
        print_success(&format!(
            "Listed {} product(s) under {}",
            created.len(),
            hospital.name.cyan()
        ));
    }
    if !failed.is_empty() || !report.is_clean() {
        anyhow::bail!(
            "{} row(s) were not imported",
            failed.len() + invalid_rows(&report)
        );
    }
    Ok(())
}

fn invalid_rows(report: &ImportReport) -> usize {
    let mut lines: Vec<u64> = report.errors.iter().map(|e| e.line).collect();
    lines.dedup();
    lines.len()
}

fn print_report(report: &ImportReport) {
    let rows = report
        .rows
        .iter()
        .map(|r| {
            [
                r.line.to_string(),
                r.product.name.clone(),
                r.product.category.clone(),
                money(r.product.price),
                r.product.quantity.to_string(),
                r.product.expiry_date.clone(),
            ]
        })
        .collect();
    print_table(
        ["Line", "Name", "Category", "Price", "Qty", "Expires"],
        rows,
        "No valid rows.",
    );

    if !report.is_clean() {
        print_warning(&format!(
            "{} problem(s) in {} row(s):",
            report.errors.len(),
            invalid_rows(report)
        ));
        for err in &report.errors {
            eprintln!("  {err}");
        }
    }
}
