use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "medmarket")]
#[command(about = "MedMarket CLI: trade medical supplies between hospitals")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides config and MEDMARKET_API_URL env var)
    #[arg(short, long, global = true, env = "MEDMARKET_API_URL")]
    pub api_url: Option<String>,

    /// Config profile name
    #[arg(short, long, global = true, env = "MEDMARKET_PROFILE", default_value = "default")]
    pub profile: String,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, env = "MEDMARKET_LOG", default_value = "warn")]
    pub log_level: String,

    /// Directory holding config and session files (default: ~/.medmarket)
    #[arg(long, global = true, env = "MEDMARKET_HOME", hide = true)]
    pub home: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    Json,
    #[default]
    Table,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Login with a credential issued by the wallet identity provider
    Login(LoginArgs),
    /// Logout (remove the stored session token)
    Logout,
    /// Show the hospital linked to the current session
    Whoami,
    /// Browse marketplace products
    Products(ProductsArgs),
    /// Look up another hospital
    Hospital(HospitalArgs),
    /// List products from a CSV file under your hospital
    Import(ImportArgs),
    /// Negotiate custom offers with other hospitals
    Offers(OffersArgs),
    /// Manage the shopping cart
    Cart(CartArgs),
    /// Quote delivery and place orders for the cart
    Checkout(CheckoutArgs),
    /// Track purchases and sales
    Orders(OrdersArgs),
    /// Show wallet transactions
    Wallet,
    /// Manage delivery addresses
    Addresses(AddressesArgs),
    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct LoginArgs {
    /// ID token returned by the wallet identity provider
    #[arg(long, env = "MEDMARKET_ID_TOKEN")]
    pub id_token: String,
    /// Wallet address the token was issued for
    #[arg(long)]
    pub wallet: String,
}

#[derive(clap::Args)]
pub struct ProductsArgs {
    /// Free-text search
    #[arg(short, long)]
    pub search: Option<String>,
    /// Filter by category
    #[arg(short, long)]
    pub category: Option<String>,
    /// Only products listed by this hospital
    #[arg(long, conflicts_with = "mine")]
    pub hospital: Option<i64>,
    /// Only products listed by your hospital
    #[arg(long)]
    pub mine: bool,
}

#[derive(clap::Args)]
pub struct HospitalArgs {
    #[command(subcommand)]
    pub command: HospitalCommands,
}

#[derive(Subcommand)]
pub enum HospitalCommands {
    /// Find a hospital by its exact name
    Find {
        /// Hospital name
        name: String,
    },
}

#[derive(clap::Args)]
pub struct ImportArgs {
    /// Path to the CSV file
    pub file: PathBuf,
    /// Validate only; do not create any product
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(clap::Args)]
pub struct OffersArgs {
    #[command(subcommand)]
    pub command: OfferCommands,
}

#[derive(Subcommand)]
pub enum OfferCommands {
    /// List offers sent and received
    List {
        /// Only offers in this status
        #[arg(long)]
        status: Option<OfferStatusArg>,
    },
    /// Show one offer with its line items
    Show(OfferIdArgs),
    /// Propose an offer to another hospital
    Create(CreateOfferArgs),
    /// Accept a pending offer
    Accept(OfferIdArgs),
    /// Reject a pending offer
    Reject(OfferIdArgs),
    /// Reopen a rejected offer
    Reopen(OfferIdArgs),
    /// Withdraw an offer
    Delete(ConfirmOfferArgs),
    /// Read or post to the offer's chat
    Chat(ChatArgs),
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OfferStatusArg {
    Pending,
    Accepted,
    Rejected,
}

#[derive(clap::Args)]
pub struct OfferIdArgs {
    /// Offer ID
    pub id: i64,
}

#[derive(clap::Args)]
pub struct ConfirmOfferArgs {
    /// Offer ID
    pub id: i64,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(clap::Args)]
pub struct CreateOfferArgs {
    /// Hospital receiving the offer
    #[arg(long)]
    pub to: i64,
    /// Line item as product_id:price:quantity (repeatable)
    #[arg(long = "item", required = true)]
    pub items: Vec<String>,
    /// Opening message
    #[arg(short, long)]
    pub message: Option<String>,
}

#[derive(clap::Args)]
pub struct ChatArgs {
    /// Offer ID
    pub id: i64,
    /// Post this message instead of only reading
    #[arg(long)]
    pub send: Option<String>,
}

#[derive(clap::Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommands,
}

#[derive(Subcommand)]
pub enum CartCommands {
    /// Show cart contents grouped by origin, with fees
    Show,
    /// Add a product (or an accepted offer's product) to the cart
    Add {
        /// Product ID
        product_id: i64,
        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
        /// Accepted offer the price comes from
        #[arg(long)]
        offer: Option<i64>,
    },
    /// Remove one cart item
    Remove {
        /// Cart item ID
        item_id: i64,
    },
    /// Empty the cart
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(clap::Args)]
pub struct CheckoutArgs {
    #[command(subcommand)]
    pub command: CheckoutCommands,
}

#[derive(Subcommand)]
pub enum CheckoutCommands {
    /// Ask the backend for a delivery price and show the full cost breakdown
    Quote {
        /// Delivery address ID
        #[arg(long)]
        address: i64,
    },
    /// Place orders for everything in the cart
    Place {
        /// Delivery address ID
        #[arg(long)]
        address: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(clap::Args)]
pub struct OrdersArgs {
    /// Show orders other hospitals placed with you
    #[arg(long)]
    pub sales: bool,
}

#[derive(clap::Args)]
pub struct AddressesArgs {
    #[command(subcommand)]
    pub command: AddressCommands,
}

#[derive(Subcommand)]
pub enum AddressCommands {
    /// List your hospital's delivery addresses
    List,
    /// Add a delivery address
    Add(AddAddressArgs),
}

#[derive(clap::Args)]
pub struct AddAddressArgs {
    #[arg(long)]
    pub label: String,
    #[arg(long)]
    pub street: String,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub postal_code: String,
    #[arg(long)]
    pub country: String,
    #[arg(long)]
    pub phone: Option<String>,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current config
    Show,
    /// Set config value
    Set(ConfigSetArgs),
}

#[derive(clap::Args)]
pub struct ConfigSetArgs {
    /// Key to set (api_url, format)
    pub key: String,
    /// Value
    pub value: String,
}
