pub mod csv_import;
pub mod date;
pub mod error;
pub mod model;
pub mod pricing;

pub use csv_import::{ImportReport, ImportedRow, RowError, import_products, import_products_file};
pub use date::{normalize_date, parse_date};
pub use error::{CoreError, ErrorCategory, Result};
pub use pricing::{CartGroups, CheckoutSummary, TransactionSummary};
