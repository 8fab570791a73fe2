//! Vendwatch CLI - vendor contract tracking from the terminal
//!
//! A command-line client for the vendor management backend with:
//! - Vendor and service CRUD with filtered listings
//! - A dashboard of headline counts
//! - Deadline reminder sweeps and local notice previews
//! - Human and JSON output, configuration file support

use std::collections::HashMap;
use std::io::{stdout, Write};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vendwatch_client::auth::RegisterRequest;
use vendwatch_client::error::ClientError;
use vendwatch_client::http::VendorClient;
use vendwatch_client::session::AuthSession;
use vendwatch_client::store::FileTokenStore;
use vendwatch_core::filter::{filter_services, filter_vendors, ServiceFilter, VendorFilter};
use vendwatch_core::model::{
    PageRequest, Service, ServicePayload, Vendor, VendorPayload, VendorWithActiveServices,
    MAX_PAGE_SIZE,
};
use vendwatch_core::reminder::{flag_due_services, ReminderNotice, ReminderSummary};

mod commands;
mod config;
mod output;

use commands::{Cli, Commands, RemindCommands, ServiceCommands, ServiceView, VendorCommands};
use config::CliConfig;
use output::{OutputFormat, Renderer};

// ===== Main Entry Point =====

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Quiet by default; --verbose turns on debug, --quiet drops even errors
    let filter = if cli.quiet {
        "off"
    } else if cli.verbose {
        "debug"
    } else {
        "error"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => CliConfig::load_from(path.clone()),
        None => CliConfig::load(),
    };

    let format = if cli.json {
        OutputFormat::Json
    } else {
        config.output.format.parse().unwrap_or_default()
    };
    let use_color = config.output.color && format == OutputFormat::Human;
    let renderer = Renderer::new(format, use_color);

    match run(cli, &config, &renderer).await {
        Ok(()) => Ok(()),
        Err(err) => {
            if let Some(client_err) = err.downcast_ref::<ClientError>() {
                if client_err.is_auth_error() {
                    eprintln!("Error: {}", client_err);
                    eprintln!("Run `vendwatch login --username <name>` to start a session.");
                    std::process::exit(1);
                }
            }
            Err(err)
        }
    }
}

async fn run(cli: Cli, config: &CliConfig, renderer: &Renderer) -> anyhow::Result<()> {
    let config_path_override = cli.config.clone();

    match cli.command {
        Commands::Login { username, password } => {
            handle_login(config, renderer, username, password).await?;
        }

        Commands::Register {
            username,
            email,
            password,
            first_name,
            last_name,
        } => {
            handle_register(config, renderer, username, email, password, first_name, last_name)
                .await?;
        }

        Commands::Logout => {
            handle_logout(config, renderer).await?;
        }

        Commands::Dashboard => {
            handle_dashboard(config, renderer).await?;
        }

        Commands::Vendor { action } => {
            handle_vendor(config, renderer, action).await?;
        }

        Commands::Service { action } => {
            handle_service(config, renderer, action).await?;
        }

        Commands::Remind { action } => {
            handle_remind(config, renderer, action).await?;
        }

        Commands::Config {
            get,
            set,
            list,
            reset,
            path,
        } => {
            handle_config(get, set, list, reset, path, config_path_override)?;
        }
    }

    Ok(())
}

// ===== Client Setup =====

/// Build an API client with the configured token cache and load any cached
/// session into it
async fn build_client(config: &CliConfig) -> anyhow::Result<VendorClient> {
    let store = FileTokenStore::new(config.token_path());
    let client = VendorClient::new(config.client_config(), AuthSession::new(), Arc::new(store))?;
    if let Err(err) = client.restore_session().await {
        tracing::warn!("Failed to restore cached session: {}", err);
    }
    Ok(client)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ===== Session Handlers =====

async fn handle_login(
    config: &CliConfig,
    renderer: &Renderer,
    username: String,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_password(&username)?,
    };

    let client = build_client(config).await?;
    client.login(&username, &password).await?;

    renderer.message(&format!("Logged in as {}", username), &mut stdout())?;
    Ok(())
}

async fn handle_register(
    config: &CliConfig,
    renderer: &Renderer,
    username: String,
    email: String,
    password: Option<String>,
    first_name: String,
    last_name: String,
) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_password(&username)?,
    };

    let mut request = RegisterRequest::new(username, email, password);
    if !first_name.is_empty() || !last_name.is_empty() {
        request = request.with_name(first_name, last_name);
    }

    let client = build_client(config).await?;
    let account = client.register(&request).await?;

    renderer.message(
        &format!(
            "Account {} created. Log in with: vendwatch login --username {}",
            account.username, account.username
        ),
        &mut stdout(),
    )?;
    Ok(())
}

async fn handle_logout(config: &CliConfig, renderer: &Renderer) -> anyhow::Result<()> {
    let client = build_client(config).await?;
    client.logout().await?;
    renderer.message("Logged out", &mut stdout())?;
    Ok(())
}

// ===== Dashboard Handler =====

async fn handle_dashboard(config: &CliConfig, renderer: &Renderer) -> anyhow::Result<()> {
    let client = build_client(config).await?;
    let summary = client.dashboard().await?;
    renderer.dashboard(&summary, &mut stdout())?;
    Ok(())
}

// ===== Vendor Handlers =====

async fn handle_vendor(
    config: &CliConfig,
    renderer: &Renderer,
    action: VendorCommands,
) -> anyhow::Result<()> {
    match action {
        VendorCommands::List {
            search,
            status,
            page,
            page_size,
            active_services,
        } => {
            let request =
                PageRequest::new(page, page_size.unwrap_or(config.pages.vendor_page_size));
            let filter = VendorFilter { search, status };
            let client = build_client(config).await?;

            if active_services {
                let fetched = client.list_vendors_with_active_services(request).await?;
                let rows: Vec<&VendorWithActiveServices> = fetched
                    .results
                    .iter()
                    .filter(|v| {
                        filter.matches_fields(&v.name, &v.contact_person, &v.email, v.status)
                    })
                    .collect();
                renderer.vendors_with_services(&rows, &fetched, &request, today(), &mut stdout())?;
            } else {
                let fetched = client.list_vendors(request).await?;
                let rows = filter_vendors(&fetched.results, &filter);
                renderer.vendor_page(&rows, &fetched, &request, &mut stdout())?;
            }
        }

        VendorCommands::Show { id } => {
            let client = build_client(config).await?;
            let vendor = client.get_vendor(id).await?;
            renderer.vendor_detail(&vendor, today(), &mut stdout())?;
        }

        VendorCommands::Add {
            name,
            contact,
            email,
            phone,
            status,
        } => {
            let payload = VendorPayload::new(name, contact, email, phone, status)?;
            let client = build_client(config).await?;
            let created = client.create_vendor(&payload).await?;
            renderer.vendor_detail(&created, today(), &mut stdout())?;
        }

        VendorCommands::Edit {
            id,
            name,
            contact,
            email,
            phone,
            status,
        } => {
            let client = build_client(config).await?;
            let current = client.get_vendor(id).await?;
            let payload = VendorPayload::new(
                name.unwrap_or(current.name),
                contact.unwrap_or(current.contact_person),
                email.unwrap_or(current.email),
                phone.unwrap_or(current.phone),
                status.unwrap_or(current.status),
            )?;
            let updated = client.update_vendor(id, &payload).await?;
            renderer.vendor_detail(&updated, today(), &mut stdout())?;
        }

        VendorCommands::Rm { id, force } => {
            if !force && !confirm(&format!("Delete vendor {} and all of its services?", id))? {
                renderer.message("Aborted", &mut stdout())?;
                return Ok(());
            }
            let client = build_client(config).await?;
            client.delete_vendor(id).await?;
            renderer.message(&format!("Vendor {} deleted", id), &mut stdout())?;
        }
    }

    Ok(())
}

// ===== Service Handlers =====

async fn handle_service(
    config: &CliConfig,
    renderer: &Renderer,
    action: ServiceCommands,
) -> anyhow::Result<()> {
    let window = config.reminders.window_days;
    match action {
        ServiceCommands::List {
            view,
            search,
            status,
            page,
            page_size,
        } => {
            let request =
                PageRequest::new(page, page_size.unwrap_or(config.pages.service_page_size));
            let client = build_client(config).await?;
            let fetched = match view {
                ServiceView::All => client.list_services(request).await?,
                ServiceView::Expiring => client.expiring_soon(request).await?,
                ServiceView::PaymentDue => client.payment_due_soon(request).await?,
                ServiceView::Active => client.active_services(request).await?,
                ServiceView::Expired => client.expired_services(request).await?,
            };

            let today = today();
            let filter = ServiceFilter { search, status };
            let rows = filter_services(&fetched.results, &filter, today);
            renderer.service_page(&rows, &fetched, &request, today, window, &mut stdout())?;
        }

        ServiceCommands::Show { id } => {
            let client = build_client(config).await?;
            let service = client.get_service(id).await?;
            renderer.service_detail(&service, today(), window, &mut stdout())?;
        }

        ServiceCommands::Add {
            vendor,
            name,
            start,
            expiry,
            payment_due,
            amount,
        } => {
            let payload = ServicePayload::new(vendor, name, start, expiry, payment_due, amount)?;
            let client = build_client(config).await?;
            let created = client.create_service(&payload).await?;
            renderer.service_detail(&created, today(), window, &mut stdout())?;
        }

        ServiceCommands::Edit {
            id,
            name,
            start,
            expiry,
            payment_due,
            amount,
        } => {
            let client = build_client(config).await?;
            let current = client.get_service(id).await?;
            let payload = ServicePayload::new(
                current.vendor,
                name.unwrap_or(current.service_name),
                start.unwrap_or(current.start_date),
                expiry.unwrap_or(current.expiry_date),
                payment_due.unwrap_or(current.payment_due_date),
                amount.unwrap_or(current.amount),
            )?;
            let updated = client.update_service(id, &payload).await?;
            renderer.service_detail(&updated, today(), window, &mut stdout())?;
        }

        ServiceCommands::Rm { id, force } => {
            if !force && !confirm(&format!("Delete service {}?", id))? {
                renderer.message("Aborted", &mut stdout())?;
                return Ok(());
            }
            let client = build_client(config).await?;
            client.delete_service(id).await?;
            renderer.message(&format!("Service {} deleted", id), &mut stdout())?;
        }

        ServiceCommands::Colors => {
            let client = build_client(config).await?;
            let groups = client.services_by_color().await?;
            renderer.color_groups(&groups, &mut stdout())?;
        }
    }

    Ok(())
}

// ===== Reminder Handlers =====

async fn handle_remind(
    config: &CliConfig,
    renderer: &Renderer,
    action: RemindCommands,
) -> anyhow::Result<()> {
    match action {
        RemindCommands::Check { days } => {
            let window = days.unwrap_or(config.reminders.window_days);
            let client = build_client(config).await?;
            let outcome = client.check_reminders(window).await?;
            renderer.reminder_outcome(&outcome, &mut stdout())?;
        }

        RemindCommands::Preview { days, full } => {
            let window = days.unwrap_or(config.reminders.window_days);
            let client = build_client(config).await?;
            let services = fetch_all_services(&client).await?;

            let today = today();
            let flags = flag_due_services(&services, today, window);
            let summary = ReminderSummary::from_flags(&flags);

            // One vendor fetch per distinct vendor; flags usually share them
            let mut vendors: HashMap<i64, Vendor> = HashMap::new();
            let mut notices = Vec::with_capacity(flags.len());
            for flag in &flags {
                let vendor_id = flag.service.vendor;
                if !vendors.contains_key(&vendor_id) {
                    let vendor = client.get_vendor(vendor_id).await?;
                    vendors.insert(vendor_id, vendor);
                }
                notices.push(ReminderNotice::build(flag, &vendors[&vendor_id], today));
            }

            renderer.reminder_preview(&notices, &summary, window, full, &mut stdout())?;
        }
    }

    Ok(())
}

/// Walk every page of the service listing
async fn fetch_all_services(client: &VendorClient) -> anyhow::Result<Vec<Service>> {
    let mut request = PageRequest::first(MAX_PAGE_SIZE);
    let mut services = Vec::new();
    loop {
        let page = client.list_services(request).await?;
        let has_next = page.has_next();
        services.extend(page.results);
        if !has_next {
            break;
        }
        request = request.at(request.page + 1);
    }
    Ok(services)
}

// ===== Config Handler =====

fn handle_config(
    get: Option<String>,
    set: Option<String>,
    list: bool,
    reset: bool,
    path: bool,
    config_path_override: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config_path = config_path_override.unwrap_or_else(CliConfig::default_path);

    if path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if reset {
        CliConfig::default().save_to(config_path.clone())?;
        println!("Configuration reset to defaults at {}", config_path.display());
        return Ok(());
    }

    let mut config = CliConfig::load_from(config_path.clone());

    if let Some(key) = get {
        match config.get(&key) {
            Some(value) => println!("{}", value),
            None => {
                eprintln!("Unknown setting: {}", key);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    if let Some(kv) = set {
        let Some((key, value)) = kv.split_once('=') else {
            eprintln!("Expected --set key=value");
            std::process::exit(1);
        };

        match config.set(key, value) {
            Ok(()) => {
                config.save_to(config_path.clone())?;
                println!("{} = {}", key, value);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    if list {
        for (key, value) in config.list() {
            println!("{} = {}", key, value);
        }
        println!();
        println!("File: {}", config_path.display());
        return Ok(());
    }

    // No flag given: show usage
    println!("Usage:");
    println!("  vendwatch config --list            Show all settings");
    println!("  vendwatch config --get <key>       Get a setting");
    println!("  vendwatch config --set <key>=<val> Set a setting");
    println!("  vendwatch config --reset           Reset to defaults");
    println!("  vendwatch config --path            Show config file location");
    Ok(())
}

// ===== Prompts =====

/// Reads a plain stdin line, so the password is echoed back to the terminal
fn prompt_password(username: &str) -> anyhow::Result<String> {
    print!("Password for {}: ", username);
    stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", prompt);
    stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("y"))
}
