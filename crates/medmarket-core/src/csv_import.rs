//! Bulk product listing from spreadsheet exports.
//!
//! The importer is lenient about layout (column order, header case, stray
//! whitespace, short rows) and strict about content: every row is validated and
//! every problem is reported, so a user can fix a file in one pass.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;

use crate::date::normalize_date;
use crate::error::{CoreError, Result};
use crate::model::NewProduct;

pub const REQUIRED_COLUMNS: [&str; 5] = ["name", "category", "price", "quantity", "expiry_date"];
pub const OPTIONAL_COLUMNS: [&str; 3] = ["description", "manufacturer", "batch_number"];

/// A problem with a single cell (or row) of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    /// 1-based line in the file; the header is line 1.
    pub line: u64,
    pub column: String,
    pub message: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, {}: {}", self.line, self.column, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportedRow {
    pub line: u64,
    pub product: NewProduct,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    pub rows: Vec<ImportedRow>,
    pub errors: Vec<RowError>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn products(&self) -> impl Iterator<Item = &NewProduct> {
        self.rows.iter().map(|r| &r.product)
    }
}

/// Header name → field index, keyed by normalized column name.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    indices: HashMap<String, usize>,
}

impl ColumnMap {
    /// Build from a header row, failing with every missing required column.
    pub fn from_headers(headers: &StringRecord) -> Result<Self> {
        let mut indices = HashMap::new();
        for (idx, header) in headers.iter().enumerate() {
            let key = normalize_header(header);
            if key.is_empty() {
                continue;
            }
            // First occurrence wins on duplicate headers.
            indices.entry(key).or_insert(idx);
        }

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !indices.contains_key(**col))
            .map(|col| (*col).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(CoreError::MissingColumns(missing));
        }

        Ok(Self { indices })
    }

    fn get<'r>(&self, record: &'r StringRecord, column: &str) -> &'r str {
        self.indices
            .get(column)
            .and_then(|&idx| record.get(idx))
            .unwrap_or("")
    }

    fn optional(&self, record: &StringRecord, column: &str) -> Option<String> {
        Some(self.get(record, column))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

fn normalize_header(header: &str) -> String {
    header
        .trim()
        .trim_start_matches('\u{feff}')
        .to_ascii_lowercase()
        .replace([' ', '-'], "_")
}

/// Parse and validate product rows from any reader.
///
/// Fails outright only when the file cannot be read as CSV or when required
/// columns are missing; per-row problems are collected in the report.
pub fn import_products<R: Read>(reader: R) -> Result<ImportReport> {
    let mut csv = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnMap::from_headers(csv.headers()?)?;
    let mut report = ImportReport::default();

    for (idx, record) in csv.records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(idx as u64 + 2);

        if record.iter().all(str::is_empty) {
            continue;
        }

        match validate_row(&columns, &record, line) {
            Ok(product) => report.rows.push(ImportedRow { line, product }),
            Err(mut errors) => report.errors.append(&mut errors),
        }
    }

    tracing::debug!(
        valid = report.rows.len(),
        errors = report.errors.len(),
        "Parsed product CSV"
    );
    Ok(report)
}

pub fn import_products_file(path: impl AsRef<Path>) -> Result<ImportReport> {
    let file = File::open(path.as_ref())?;
    import_products(file)
}

fn validate_row(
    columns: &ColumnMap,
    record: &StringRecord,
    line: u64,
) -> std::result::Result<NewProduct, Vec<RowError>> {
    let mut errors = Vec::new();
    let mut fail = |column: &str, message: String| {
        errors.push(RowError {
            line,
            column: column.to_string(),
            message,
        });
    };

    let name = columns.get(record, "name");
    if name.is_empty() {
        fail("name", "is required".into());
    }

    let category = columns.get(record, "category");
    if category.is_empty() {
        fail("category", "is required".into());
    }

    let price = match columns.get(record, "price") {
        "" => {
            fail("price", "is required".into());
            None
        }
        raw => match raw.parse::<f64>() {
            Ok(p) if p.is_finite() && p > 0.0 => Some(p),
            Ok(_) => {
                fail("price", format!("'{raw}' must be greater than zero"));
                None
            }
            Err(_) => {
                fail("price", format!("'{raw}' is not a number"));
                None
            }
        },
    };

    let quantity = match columns.get(record, "quantity") {
        "" => {
            fail("quantity", "is required".into());
            None
        }
        raw => match raw.parse::<u32>() {
            Ok(q) if q >= 1 => Some(q),
            Ok(_) => {
                fail("quantity", "must be at least 1".into());
                None
            }
            Err(_) => {
                fail("quantity", format!("'{raw}' is not a whole number"));
                None
            }
        },
    };

    let expiry_date = match columns.get(record, "expiry_date") {
        "" => {
            fail("expiry_date", "is required".into());
            None
        }
        raw => match normalize_date(raw) {
            Ok(date) => Some(date),
            Err(_) => {
                fail(
                    "expiry_date",
                    format!("'{raw}' is not a valid dd/mm/yyyy, dd-mm-yyyy or dd.mm.yyyy date"),
                );
                None
            }
        },
    };

    match (price, quantity, expiry_date) {
        (Some(price), Some(quantity), Some(expiry_date)) if errors.is_empty() => Ok(NewProduct {
            name: name.to_string(),
            description: columns.optional(record, "description"),
            category: category.to_string(),
            manufacturer: columns.optional(record, "manufacturer"),
            price,
            quantity,
            expiry_date,
            batch_number: columns.optional(record, "batch_number"),
        }),
        _ => Err(errors),
    }
}
