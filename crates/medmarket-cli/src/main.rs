mod auth;
mod cart;
mod cli;
mod client;
mod commands;
mod config;
mod error;
mod observability;
mod output;
mod session;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use medmarket_core::model::{OfferAction, OrderView};

use auth::TokenStore;
use cli::{
    AddressCommands, CartCommands, CheckoutCommands, Cli, Commands, ConfigCommands,
    HospitalCommands, OfferCommands,
};
use output::print_error;
use session::Session;

#[tokio::main]
async fn main() {
    // Load .env file if present; a missing file is not an error
    if let Err(e) = dotenvy::dotenv()
        && !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
    {
        eprintln!("Warning: Failed to load .env file: {e}");
    }

    let cli = Cli::parse();
    observability::init_tracing(&cli.log_level);

    if let Err(e) = run(cli).await {
        tracing::debug!(error = ?e, "Command failed");
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let profile = cli.profile.as_str();
    let home = config::config_dir(cli.home.as_deref())?;
    let profile_cfg = config::load_profile(&home, profile)?;
    let format = cli
        .format
        .or_else(|| profile_cfg.output_format())
        .unwrap_or_default();

    if let Commands::Config(args) = &cli.command {
        return run_config(&home, profile, &args.command);
    }

    let api_url = config::resolve_api_url(cli.api_url.as_deref(), &profile_cfg);
    tracing::debug!(api_url = %api_url, profile, "Opening session");
    let mut session = Session::open(&api_url, TokenStore::new(&home, profile))?;

    match &cli.command {
        Commands::Login(args) => commands::auth::login(&mut session, args).await?,
        Commands::Logout => commands::auth::logout(&mut session, profile)?,
        command => {
            session.restore().await?;
            dispatch(&session, command, profile, format).await?;
        }
    }
    Ok(())
}

async fn dispatch(
    session: &Session,
    command: &Commands,
    profile: &str,
    format: cli::OutputFormat,
) -> Result<()> {
    match command {
        Commands::Whoami => commands::auth::whoami(session, profile, format)?,
        Commands::Products(args) => commands::products::list(session, args, format).await?,
        Commands::Hospital(args) => match &args.command {
            HospitalCommands::Find { name } => {
                commands::hospitals::find(session, name, format).await?
            }
        },
        Commands::Import(args) => commands::import::import(session, args, format).await?,
        Commands::Offers(args) => match &args.command {
            OfferCommands::List { status } => {
                commands::offers::list(session, *status, format).await?
            }
            OfferCommands::Show(id) => commands::offers::show(session, id.id, format).await?,
            OfferCommands::Create(create) => {
                commands::offers::create(session, create, format).await?
            }
            OfferCommands::Accept(id) => {
                commands::offers::respond(session, id.id, OfferAction::Accept).await?
            }
            OfferCommands::Reject(id) => {
                commands::offers::respond(session, id.id, OfferAction::Reject).await?
            }
            OfferCommands::Reopen(id) => {
                commands::offers::respond(session, id.id, OfferAction::Reopen).await?
            }
            OfferCommands::Delete(del) => {
                commands::offers::delete(session, del.id, del.yes).await?
            }
            OfferCommands::Chat(chat) => commands::offers::chat(session, chat, format).await?,
        },
        Commands::Cart(args) => match &args.command {
            CartCommands::Show => commands::cart::show(session, format).await?,
            CartCommands::Add {
                product_id,
                quantity,
                offer,
            } => commands::cart::add(session, *product_id, *quantity, *offer).await?,
            CartCommands::Remove { item_id } => commands::cart::remove(session, *item_id).await?,
            CartCommands::Clear { yes } => commands::cart::clear(session, *yes).await?,
        },
        Commands::Checkout(args) => match &args.command {
            CheckoutCommands::Quote { address } => {
                commands::checkout::quote(session, *address, format).await?
            }
            CheckoutCommands::Place { address, yes } => {
                commands::checkout::place(session, *address, *yes, format).await?
            }
        },
        Commands::Orders(args) => {
            let view = if args.sales {
                OrderView::Sales
            } else {
                OrderView::Purchases
            };
            commands::orders::list(session, view, format).await?
        }
        Commands::Wallet => commands::wallet::transactions(session, format).await?,
        Commands::Addresses(args) => match &args.command {
            AddressCommands::List => commands::addresses::list(session, format).await?,
            AddressCommands::Add(add) => commands::addresses::add(session, add, format).await?,
        },
        Commands::Login(_) | Commands::Logout | Commands::Config(_) => {
            unreachable!("handled before the session is restored")
        }
    }
    Ok(())
}

fn run_config(home: &Path, profile: &str, command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let cfg = config::load_profile(home, profile)?;
            println!("{}: {}", "Profile".cyan(), profile);
            println!(
                "{}: {}",
                "API URL".cyan(),
                cfg.api_url.as_deref().unwrap_or(config::DEFAULT_API_URL)
            );
            println!(
                "{}: {}",
                "Format".cyan(),
                cfg.format.as_deref().unwrap_or("table")
            );
        }
        ConfigCommands::Set(set_args) => {
            let mut cfg = config::load_profile(home, profile)?;
            cfg.set(&set_args.key, &set_args.value)?;
            config::save_profile(home, profile, &cfg)?;
            output::print_success(&format!("Set {} = {}", set_args.key, set_args.value));
        }
    }
    Ok(())
}
