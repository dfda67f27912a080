//! CLI argument definitions.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use invoicebook_core::{AppConfig, ClientId, InvoiceId};
use std::path::PathBuf;

/// Track clients and invoices for freelance work.
#[derive(Parser, Debug)]
#[command(name = "invoicebook")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file (overrides INVOICEBOOK_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Re-validate records inside the store as well (overrides INVOICEBOOK_STRICT)
    #[arg(long, global = true)]
    pub strict: bool,

    /// Write rolling logs into this absolute directory (overrides INVOICEBOOK_LOG_DIR)
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error (overrides INVOICEBOOK_LOG_LEVEL)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Lets global flags win over settings read from the environment.
    pub fn override_config(&self, config: &mut AppConfig) {
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if self.log_dir.is_some() {
            config.log_dir = self.log_dir.clone();
        }
        config.strict_validation |= self.strict;
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage clients
    #[command(subcommand)]
    Client(ClientCommand),

    /// Manage invoices
    #[command(subcommand)]
    Invoice(InvoiceCommand),

    /// Show client/invoice totals
    Dashboard,

    /// Print the core library version
    Version,
}

#[derive(Subcommand, Debug)]
pub enum ClientCommand {
    /// Register a client
    Add(ClientFields),
    /// List clients in creation order
    List,
    /// Show one client and its invoices
    Show { id: ClientId },
    /// Change some fields of a client
    Update(ClientUpdate),
    /// Delete a client; its invoices are kept
    Delete { id: ClientId },
}

#[derive(Args, Debug)]
pub struct ClientFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug)]
pub struct ClientUpdate {
    pub id: ClientId,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    /// New company; an empty value clears it
    #[arg(long)]
    pub company: Option<String>,
    /// New notes; an empty value clears them
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum InvoiceCommand {
    /// Raise an unpaid invoice
    Add(InvoiceFields),
    /// List invoices in creation order
    List {
        /// Only invoices for this client
        #[arg(long)]
        client: Option<ClientId>,
    },
    /// Show one invoice
    Show { id: InvoiceId },
    /// Change some fields of an invoice
    Update(InvoiceUpdate),
    /// Delete an invoice
    Delete { id: InvoiceId },
    /// Mark an invoice as paid
    Pay { id: InvoiceId },
}

#[derive(Args, Debug)]
pub struct InvoiceFields {
    #[arg(long)]
    pub client: ClientId,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub amount: f64,
    /// Billing date as YYYY-MM-DD; defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct InvoiceUpdate {
    pub id: InvoiceId,
    #[arg(long)]
    pub client: Option<ClientId>,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub amount: Option<f64>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// New description; an empty value clears it
    #[arg(long)]
    pub description: Option<String>,
}
