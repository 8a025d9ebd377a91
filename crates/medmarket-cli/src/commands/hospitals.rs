use anyhow::Result;

use crate::cli::OutputFormat;
use crate::commands::auth::print_hospital;
use crate::output::{print_error, print_json};
use crate::session::Session;

pub async fn find(session: &Session, name: &str, format: OutputFormat) -> Result<()> {
    session.require_login()?;
    let found = session.client().hospital_by_name(name).await?;

    match (format, found) {
        (OutputFormat::Json, found) => print_json(&found)?,
        (OutputFormat::Table, Some(hospital)) => print_hospital(&hospital),
        (OutputFormat::Table, None) => print_error(&format!("No hospital named \"{name}\"")),
    }
    Ok(())
}
