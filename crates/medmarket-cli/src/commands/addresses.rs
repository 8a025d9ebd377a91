use anyhow::Result;

use medmarket_core::model::DeliveryAddress;

use crate::cli::{AddAddressArgs, OutputFormat};
use crate::output::{or_dash, print_json, print_success, print_table};
use crate::session::Session;

pub async fn list(session: &Session, format: OutputFormat) -> Result<()> {
    let hospital = session.require_hospital()?;
    let addresses = match session.client().delivery_addresses(hospital.id).await {
        Ok(addresses) => addresses,
        Err(e) if e.is_not_found() => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    if format == OutputFormat::Json {
        return print_json(&addresses);
    }
    let rows = addresses
        .iter()
        .map(|a| {
            [
                a.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
                a.label.clone(),
                a.one_line(),
                or_dash(a.contact_phone.as_deref()),
            ]
        })
        .collect();
    print_table(
        ["ID", "Label", "Address", "Phone"],
        rows,
        "No delivery addresses. Add one with `medmarket addresses add`.",
    );
    Ok(())
}

impl From<&AddAddressArgs> for DeliveryAddress {
    fn from(args: &AddAddressArgs) -> Self {
        fn trimmed(s: &str) -> String {
            s.trim().to_string()
        }
        Self {
            id: None,
            label: trimmed(&args.label),
            street: trimmed(&args.street),
            city: trimmed(&args.city),
            state: args.state.as_deref().map(trimmed).filter(|s| !s.is_empty()),
            postal_code: trimmed(&args.postal_code),
            country: trimmed(&args.country),
            contact_phone: args.phone.as_deref().map(trimmed).filter(|s| !s.is_empty()),
        }
    }
}

pub async fn add(session: &Session, args: &AddAddressArgs, format: OutputFormat) -> Result<()> {
    let hospital = session.require_hospital()?;
    let address = DeliveryAddress::from(args);
    address.validate()?;

    let created = session
        .client()
        .add_delivery_address(hospital.id, &address)
        .await?;
    if format == OutputFormat::Json {
        return print_json(&created);
    }
    print_success(&format!(
        "Added delivery address \"{}\"{}",
        created.label,
        created.id.map(|id| format!(" (#{id})")).unwrap_or_default()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_are_trimmed_and_blank_optionals_dropped() {
        let args = AddAddressArgs {
            label: " Dock ".into(),
            street: "1 Main St".into(),
            city: "Accra".into(),
            state: Some("  ".into()),
            postal_code: "00233".into(),
            country: "GH".into(),
            phone: None,
        };
        let address = DeliveryAddress::from(&args);
        assert_eq!(address.label, "Dock");
        assert_eq!(address.state, None);
        assert!(address.validate().is_ok());
    }
}
