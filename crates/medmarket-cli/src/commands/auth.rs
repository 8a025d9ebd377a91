use anyhow::Result;
use colored::Colorize;

use medmarket_core::model::HospitalProfile;

use crate::auth::token_preview;
use crate::cli::{LoginArgs, OutputFormat};
use crate::output::{or_dash, print_field, print_json, print_success, print_warning};
use crate::session::Session;

pub async fn login(session: &mut Session, args: &LoginArgs) -> Result<()> {
    session.login(&args.id_token, &args.wallet).await?;
    match session.hospital() {
        Some(hospital) => print_success(&format!(
            "Logged in to {} as {}",
            session.client().base_url().cyan(),
            hospital.name.cyan()
        )),
        None => {
            print_success(&format!("Logged in to {}", session.client().base_url().cyan()));
            print_warning("No hospital is linked to this account yet");
        }
    }
    Ok(())
}

pub fn logout(session: &mut Session, profile: &str) -> Result<()> {
    if session.logout()? {
        print_success("Logged out (session token removed)");
    } else {
        println!("No session found for profile \"{profile}\"");
    }
    Ok(())
}

pub fn whoami(session: &Session, profile: &str, format: OutputFormat) -> Result<()> {
    session.require_login()?;

    if format == OutputFormat::Json {
        return print_json(&session.hospital());
    }

    print_field("Profile", profile);
    print_field("Server", session.client().base_url().cyan());
    if let Some(token) = session.client().token() {
        print_field("Token", token_preview(token));
    }
    match session.hospital() {
        Some(hospital) => print_hospital(hospital),
        None => print_warning("No hospital is linked to this account"),
    }
    Ok(())
}

pub fn print_hospital(hospital: &HospitalProfile) {
    print_field("Hospital", format!("{} (#{})", hospital.name, hospital.id));
    print_field("Wallet", or_dash(hospital.wallet_address.as_deref()));
    print_field("Email", or_dash(hospital.email.as_deref()));
    print_field("Phone", or_dash(hospital.phone.as_deref()));
    print_field("Address", or_dash(hospital.address.as_deref()));
    let verified = if hospital.verified {
        "yes".green()
    } else {
        "no".yellow()
    };
    print_field("Verified", verified);
}
