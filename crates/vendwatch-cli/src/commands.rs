//! CLI command definitions
//!
//! Defines all commands and arguments using clap derive macros.
//!
//! ## Commands
//!
//! - `login` / `register` / `logout` - session management
//! - `dashboard` - headline counts and recent vendors
//! - `vendor` - vendor CRUD and listing
//! - `service` - service CRUD, filtered views, color summary
//! - `remind` - deadline reminder sweep and local preview
//! - `config` - show or modify configuration

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use vendwatch_core::filter::{StatusFilter, VendorStatusFilter};
use vendwatch_core::model::VendorStatus;

// ===== Main CLI =====

/// Vendwatch - vendor contract tracking from the terminal
#[derive(Parser, Debug)]
#[command(name = "vendwatch")]
#[command(about = "Track vendor contracts, expiry dates, and payment deadlines", long_about = None)]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Which operation to run
    #[command(subcommand)]
    pub command: Commands,

    /// Read settings from this file instead of the default
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all log output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

// ===== Commands =====

/// Top-level operations
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and cache the session tokens
    Login {
        /// Account username
        #[arg(short, long)]
        username: String,

        /// Account password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create a new account
    Register {
        /// Account username
        #[arg(long)]
        username: String,

        /// Account email
        #[arg(long)]
        email: String,

        /// Account password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,

        /// First name
        #[arg(long, default_value = "")]
        first_name: String,

        /// Last name
        #[arg(long, default_value = "")]
        last_name: String,
    },

    /// End the session and drop cached tokens
    Logout,

    /// Show headline counts and recently added vendors
    Dashboard,

    /// Manage vendors
    Vendor {
        /// Vendor action
        #[command(subcommand)]
        action: VendorCommands,
    },

    /// Manage services
    Service {
        /// Service action
        #[command(subcommand)]
        action: ServiceCommands,
    },

    /// Deadline reminders
    Remind {
        /// Reminder action
        #[command(subcommand)]
        action: RemindCommands,
    },

    /// Inspect or edit CLI settings
    Config {
        /// Print one setting (e.g., api.base_url)
        #[arg(long)]
        get: Option<String>,

        /// Change one setting (e.g., pages.vendor_page_size=50)
        #[arg(long)]
        set: Option<String>,

        /// Print every setting with its value
        #[arg(long)]
        list: bool,

        /// Put every setting back to its default
        #[arg(long)]
        reset: bool,

        /// Print where settings are stored
        #[arg(long)]
        path: bool,
    },
}

// ===== Vendor Commands =====

/// Vendor subcommands
#[derive(Subcommand, Debug)]
pub enum VendorCommands {
    /// List vendors
    List {
        /// Case-insensitive substring matched against name, contact, and email
        #[arg(short, long)]
        search: Option<String>,

        /// Vendor status filter: any, active, inactive
        #[arg(long, default_value = "any")]
        status: VendorStatusFilter,

        /// Page to fetch
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Rows per page (the backend caps this at 100)
        #[arg(long)]
        page_size: Option<u32>,

        /// Show each vendor's unexpired services instead of the plain listing
        #[arg(long)]
        active_services: bool,
    },

    /// Show one vendor with its services
    Show {
        /// Vendor id
        id: i64,
    },

    /// Add a vendor
    Add {
        /// Vendor name
        #[arg(long)]
        name: String,

        /// Contact person
        #[arg(long)]
        contact: String,

        /// Contact email, the reminder recipient
        #[arg(long)]
        email: String,

        /// Contact phone
        #[arg(long)]
        phone: String,

        /// Vendor status: active or inactive
        #[arg(long, default_value = "active")]
        status: VendorStatus,
    },

    /// Edit a vendor; omitted fields keep their current values
    Edit {
        /// Vendor id
        id: i64,

        /// New vendor name
        #[arg(long)]
        name: Option<String>,

        /// New contact person
        #[arg(long)]
        contact: Option<String>,

        /// New contact email
        #[arg(long)]
        email: Option<String>,

        /// New contact phone
        #[arg(long)]
        phone: Option<String>,

        /// New status: active or inactive
        #[arg(long)]
        status: Option<VendorStatus>,
    },

    /// Delete a vendor and all of its services
    Rm {
        /// Vendor id
        id: i64,

        /// Delete without asking
        #[arg(long)]
        force: bool,
    },
}

// ===== Service Commands =====

/// Scope of the service listing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ServiceView {
    /// All services
    #[default]
    All,
    /// Expiry date inside the backend's alert window
    Expiring,
    /// Payment due date inside the backend's alert window
    PaymentDue,
    /// Not yet expired
    Active,
    /// Expiry date has passed
    Expired,
}

/// Service subcommands
#[derive(Subcommand, Debug)]
pub enum ServiceCommands {
    /// List services
    List {
        /// Backend view to fetch
        #[arg(long, value_enum, default_value_t = ServiceView::All)]
        view: ServiceView,

        /// Case-insensitive substring matched against the service name
        #[arg(short, long)]
        search: Option<String>,

        /// Status filter: any, active, expired, expiring-soon, payment-pending
        #[arg(long, default_value = "any")]
        status: StatusFilter,

        /// Page to fetch
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Rows per page (the backend caps this at 100)
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Show one service
    Show {
        /// Service id
        id: i64,
    },

    /// Add a service under a vendor
    Add {
        /// Owning vendor id
        #[arg(long)]
        vendor: i64,

        /// Service or contract name
        #[arg(long)]
        name: String,

        /// Contract start date (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Contract expiry date (YYYY-MM-DD)
        #[arg(long)]
        expiry: NaiveDate,

        /// Next payment due date (YYYY-MM-DD)
        #[arg(long)]
        payment_due: NaiveDate,

        /// Contract amount
        #[arg(long)]
        amount: Decimal,
    },

    /// Edit a service; omitted fields keep their current values
    Edit {
        /// Service id
        id: i64,

        /// New service name
        #[arg(long)]
        name: Option<String>,

        /// New start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// New expiry date (YYYY-MM-DD)
        #[arg(long)]
        expiry: Option<NaiveDate>,

        /// New payment due date (YYYY-MM-DD)
        #[arg(long)]
        payment_due: Option<NaiveDate>,

        /// New amount
        #[arg(long)]
        amount: Option<Decimal>,
    },

    /// Delete a service
    Rm {
        /// Service id
        id: i64,

        /// Delete without asking
        #[arg(long)]
        force: bool,
    },

    /// Group services by their stored status color
    Colors,
}

// ===== Remind Commands =====

/// Reminder subcommands
#[derive(Subcommand, Debug)]
pub enum RemindCommands {
    /// Run the backend reminder sweep, which emails vendor contacts
    Check {
        /// Deadline window in days (defaults to the configured window)
        #[arg(long)]
        days: Option<i64>,
    },

    /// Build reminder notices locally without sending anything
    Preview {
        /// Deadline window in days (defaults to the configured window)
        #[arg(long)]
        days: Option<i64>,

        /// Print full notice bodies instead of subject lines
        #[arg(long)]
        full: bool,
    },
}

// ===== Tests =====
