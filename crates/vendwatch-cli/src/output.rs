//! Output rendering for the vendwatch CLI
//!
//! Two formats cover every command:
//!
//! - **Human**: aligned tables with optional ANSI colors for terminal use
//! - **JSON**: structured output for scripting and jq
//!
//! Status cells always come from the local classifier, not from the status
//! string the backend attaches to a row, so a table and a `--status` filter
//! applied to it can never disagree.

use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::io::{self, Write};

use chrono::NaiveDate;
use vendwatch_client::dashboard::DashboardSummary;
use vendwatch_client::services::ReminderOutcome;
use vendwatch_core::model::{
    ColorGroup, Page, PageRequest, Service, Vendor, VendorWithActiveServices,
};
use vendwatch_core::reminder::{ReminderNotice, ReminderSummary};
use vendwatch_core::status::{status_color_for, ServiceStatus, Severity, StatusColor};

// ===== Formats =====

/// Render target selected by `--format`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable tables with optional colors
    #[default]
    Human,
    /// Pretty-printed JSON envelopes
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Human => write!(f, "human"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("No such format: {}", s)),
        }
    }
}

// ===== JSON rows =====

/// Service row for JSON output: the backend fields plus the locally
/// classified status and the effective color
#[derive(Debug, Serialize)]
pub struct ServiceRow<'a> {
    /// The backend row
    #[serde(flatten)]
    pub service: &'a Service,
    /// Locally classified status label
    pub computed_status: &'static str,
    /// Severity bucket of the classified status
    pub severity: &'static str,
    /// Stored color hint, or the derived one when the row arrived without
    pub effective_color: String,
}

impl<'a> ServiceRow<'a> {
    /// Classify a service as of `today` and pair it with the row, deriving
    /// a missing color over `window_days`
    pub fn new(service: &'a Service, today: NaiveDate, window_days: i64) -> Self {
        let status = service.status_on(today);
        Self {
            service,
            computed_status: status.label.as_str(),
            severity: status.severity.as_str(),
            effective_color: effective_color(service, today, window_days)
                .as_str()
                .to_string(),
        }
    }
}

/// Stored color hint with the derivation fallback applied
fn effective_color(service: &Service, today: NaiveDate, window_days: i64) -> StatusColor {
    service.status_color.clone().unwrap_or_else(|| {
        status_color_for(today, service.expiry_date, service.payment_due_date, window_days)
    })
}

// ===== Renderer =====

/// Renders command results to a writer in the selected format
pub struct Renderer {
    format: OutputFormat,
    use_color: bool,
}

impl Renderer {
    /// Create a renderer; colors only apply to human output
    pub fn new(format: OutputFormat, use_color: bool) -> Self {
        Self { format, use_color }
    }

    /// Wrap text in an ANSI escape when colors are on
    fn paint(&self, text: &str, code: &str) -> String {
        if self.use_color && self.format == OutputFormat::Human {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    }

    fn write_json(&self, value: &serde_json::Value, writer: &mut dyn Write) -> io::Result<()> {
        writeln!(
            writer,
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_default()
        )
    }

    /// Status cell padded to `width`, colored by severity
    fn status_cell(&self, status: ServiceStatus, width: usize) -> String {
        self.paint(
            &pad(status.label.as_str(), width),
            severity_color(status.severity),
        )
    }

    fn table_header(&self, columns: &str, writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", self.paint(columns, "1"))
    }

    fn page_footer(
        &self,
        shown: usize,
        fetched: usize,
        noun: &str,
        count: u64,
        current: u32,
        total_pages: u64,
        writer: &mut dyn Write,
    ) -> io::Result<()> {
        writeln!(writer)?;
        if shown != fetched {
            writeln!(
                writer,
                "{} of {} {} on this page match the filters",
                shown, fetched, noun
            )?;
        }
        writeln!(
            writer,
            "Page {} of {} ({} total)",
            current,
            total_pages.max(1),
            count
        )
    }

    // ===== Messages =====

    /// Print a one-line confirmation
    pub fn message(&self, text: &str, writer: &mut dyn Write) -> io::Result<()> {
        match self.format {
            OutputFormat::Human => writeln!(writer, "{}", text),
            OutputFormat::Json => self.write_json(&json!({ "message": text }), writer),
        }
    }

    // ===== Vendors =====

    /// Render one page of vendors, after client-side filtering
    pub fn vendor_page(
        &self,
        rows: &[&Vendor],
        page: &Page<Vendor>,
        request: &PageRequest,
        writer: &mut dyn Write,
    ) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.write_json(
                &json!({
                    "count": page.count,
                    "page": request.page,
                    "page_size": request.page_size,
                    "results": rows,
                }),
                writer,
            );
        }

        if rows.is_empty() {
            writeln!(writer, "{}", self.paint("No vendors found.", "33"))?;
        } else {
            self.table_header(
                &format!(
                    "{} {} {} {} {} {}",
                    pad("ID", 5),
                    pad("NAME", 24),
                    pad("CONTACT", 18),
                    pad("EMAIL", 26),
                    pad("STATUS", 8),
                    "ACTIVE"
                ),
                writer,
            )?;
            for vendor in rows {
                writeln!(
                    writer,
                    "{} {} {} {} {} {}",
                    pad(&vendor.id.to_string(), 5),
                    pad(&vendor.name, 24),
                    pad(&vendor.contact_person, 18),
                    pad(&vendor.email, 26),
                    pad(vendor.status.as_str(), 8),
                    vendor.active_services_count
                )?;
            }
        }

        self.page_footer(
            rows.len(),
            page.results.len(),
            "vendors",
            page.count,
            request.page,
            page.total_pages(request.page_size),
            writer,
        )
    }

    /// Render one vendor with its nested services
    pub fn vendor_detail(
        &self,
        vendor: &Vendor,
        today: NaiveDate,
        writer: &mut dyn Write,
    ) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.write_json(
                &serde_json::to_value(vendor).unwrap_or_default(),
                writer,
            );
        }

        writeln!(
            writer,
            "{}",
            self.paint(&format!("Vendor #{}: {}", vendor.id, vendor.name), "1")
        )?;
        writeln!(writer, "  Contact:  {}", vendor.contact_person)?;
        writeln!(writer, "  Email:    {}", vendor.email)?;
        writeln!(writer, "  Phone:    {}", vendor.phone)?;
        writeln!(writer, "  Status:   {}", vendor.status)?;
        writeln!(
            writer,
            "  Created:  {}",
            vendor.created_at.format("%Y-%m-%d")
        )?;
        writeln!(
            writer,
            "  Services: {} ({} active)",
            vendor.services.len(),
            vendor.active_services_count
        )?;

        if !vendor.services.is_empty() {
            writeln!(writer)?;
            let rows: Vec<&Service> = vendor.services.iter().collect();
            self.service_table(&rows, today, false, writer)?;
        }

        Ok(())
    }

    /// Render one page of the active-services vendor listing
    pub fn vendors_with_services(
        &self,
        rows: &[&VendorWithActiveServices],
        page: &Page<VendorWithActiveServices>,
        request: &PageRequest,
        today: NaiveDate,
        writer: &mut dyn Write,
    ) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.write_json(
                &json!({
                    "count": page.count,
                    "page": request.page,
                    "page_size": request.page_size,
                    "results": rows,
                }),
                writer,
            );
        }

        if rows.is_empty() {
            writeln!(writer, "{}", self.paint("No vendors found.", "33"))?;
        }
        for vendor in rows {
            writeln!(
                writer,
                "{}",
                self.paint(
                    &format!(
                        "{} (#{}, {}) - {} active {}",
                        vendor.name,
                        vendor.id,
                        vendor.status,
                        vendor.active_services.len(),
                        plural(vendor.active_services.len() as i64, "service", "services")
                    ),
                    "1"
                )
            )?;
            for service in &vendor.active_services {
                writeln!(
                    writer,
                    "    {} expires {}  {} {}",
                    pad(&service.service_name, 24),
                    service.expiry_date,
                    pad(&format!("${}", service.amount), 11),
                    self.status_cell(service.status_on(today), 15)
                )?;
            }
        }

        self.page_footer(
            rows.len(),
            page.results.len(),
            "vendors",
            page.count,
            request.page,
            page.total_pages(request.page_size),
            writer,
        )
    }

    // ===== Services =====

    fn service_table(
        &self,
        rows: &[&Service],
        today: NaiveDate,
        with_vendor: bool,
        writer: &mut dyn Write,
    ) -> io::Result<()> {
        let vendor_header = if with_vendor { pad("VENDOR", 18) + " " } else { String::new() };
        self.table_header(
            &format!(
                "{} {} {}{} {} {} {}",
                pad("ID", 5),
                pad("SERVICE", 22),
                vendor_header,
                pad("EXPIRES", 10),
                pad("PAYMENT", 10),
                pad("AMOUNT", 11),
                "STATUS"
            ),
            writer,
        )?;
        for service in rows {
            let vendor_cell = if with_vendor {
                pad(&service.vendor_name, 18) + " "
            } else {
                String::new()
            };
            writeln!(
                writer,
                "{} {} {}{} {} {} {}",
                pad(&service.id.to_string(), 5),
                pad(&service.service_name, 22),
                vendor_cell,
                service.expiry_date,
                service.payment_due_date,
                pad(&format!("${}", service.amount), 11),
                self.status_cell(service.status_on(today), 15)
            )?;
        }
        Ok(())
    }

    /// Render one page of services, after client-side filtering
    pub fn service_page(
        &self,
        rows: &[&Service],
        page: &Page<Service>,
        request: &PageRequest,
        today: NaiveDate,
        window_days: i64,
        writer: &mut dyn Write,
    ) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            let outputs: Vec<ServiceRow> = rows
                .iter()
                .map(|s| ServiceRow::new(s, today, window_days))
                .collect();
            return self.write_json(
                &json!({
                    "count": page.count,
                    "page": request.page,
                    "page_size": request.page_size,
                    "results": outputs,
                }),
                writer,
            );
        }

        if rows.is_empty() {
            writeln!(writer, "{}", self.paint("No services found.", "33"))?;
        } else {
            self.service_table(rows, today, true, writer)?;
        }

        self.page_footer(
            rows.len(),
            page.results.len(),
            "services",
            page.count,
            request.page,
            page.total_pages(request.page_size),
            writer,
        )
    }

    /// Render one service with dates, classified status, and color
    pub fn service_detail(
        &self,
        service: &Service,
        today: NaiveDate,
        window_days: i64,
        writer: &mut dyn Write,
    ) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            let row = ServiceRow::new(service, today, window_days);
            return self.write_json(&serde_json::to_value(&row).unwrap_or_default(), writer);
        }

        let status = service.status_on(today);
        writeln!(
            writer,
            "{}",
            self.paint(
                &format!("Service #{}: {}", service.id, service.service_name),
                "1"
            )
        )?;
        writeln!(
            writer,
            "  Vendor:      {} (#{})",
            service.vendor_name, service.vendor
        )?;
        writeln!(writer, "  Started:     {}", service.start_date)?;
        writeln!(
            writer,
            "  Expires:     {} ({})",
            service.expiry_date,
            describe_days(service.days_until_expiry(today))
        )?;
        writeln!(
            writer,
            "  Payment due: {} ({})",
            service.payment_due_date,
            describe_days(service.days_until_payment(today))
        )?;
        writeln!(writer, "  Amount:      ${}", service.amount)?;
        writeln!(
            writer,
            "  Status:      {}",
            self.paint(status.label.as_str(), severity_color(status.severity))
        )?;
        let color = effective_color(service, today, window_days);
        writeln!(
            writer,
            "  Color:       {}",
            self.paint(color.as_str(), color_code(&color))
        )
    }

    /// Render the by-color grouping in severity order
    pub fn color_groups(
        &self,
        groups: &HashMap<StatusColor, ColorGroup>,
        writer: &mut dyn Write,
    ) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.write_json(
                &serde_json::to_value(groups).unwrap_or_default(),
                writer,
            );
        }

        if groups.is_empty() {
            return writeln!(writer, "{}", self.paint("No services found.", "33"));
        }

        let mut first = true;
        for color in ordered_colors(groups) {
            let group = &groups[&color];
            if !first {
                writeln!(writer)?;
            }
            first = false;
            writeln!(
                writer,
                "{} ({} {})",
                self.paint(&color.as_str().to_uppercase(), color_code(&color)),
                group.count,
                plural(group.count as i64, "service", "services")
            )?;
            for service in &group.services {
                writeln!(
                    writer,
                    "  {} {} expires {}",
                    pad(&service.service_name, 24),
                    pad(&service.vendor_name, 18),
                    service.expiry_date
                )?;
            }
        }
        Ok(())
    }

    // ===== Dashboard =====

    /// Render the dashboard summary
    pub fn dashboard(&self, summary: &DashboardSummary, writer: &mut dyn Write) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.write_json(
                &serde_json::to_value(summary).unwrap_or_default(),
                writer,
            );
        }

        writeln!(writer, "{}", self.paint("Vendor dashboard", "1"))?;
        writeln!(writer)?;
        writeln!(
            writer,
            "  {:<18}{:>5}",
            "Vendors:", summary.total_vendors
        )?;
        writeln!(
            writer,
            "  {:<18}{:>5}",
            "Active services:", summary.active_services
        )?;
        writeln!(
            writer,
            "  {:<18}{}",
            "Expiring soon:",
            self.count_cell(summary.expiring_soon, "33")
        )?;
        writeln!(
            writer,
            "  {:<18}{}",
            "Payment due:",
            self.count_cell(summary.payment_due, "33")
        )?;
        writeln!(
            writer,
            "  {:<18}{}",
            "Expired:",
            self.count_cell(summary.expired_services, "31")
        )?;

        if !summary.recent_vendors.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "{}", self.paint("Recently added vendors", "1"))?;
            for vendor in &summary.recent_vendors {
                writeln!(
                    writer,
                    "  {} {} {} {} active",
                    pad(&vendor.id.to_string(), 5),
                    pad(&vendor.name, 24),
                    pad(vendor.status.as_str(), 8),
                    vendor.active_services_count
                )?;
            }
        }
        Ok(())
    }

    /// Count aligned like the plain dashboard rows, colored when nonzero
    fn count_cell(&self, count: u64, color_code: &str) -> String {
        let text = format!("{:>5}", count);
        if count > 0 {
            self.paint(&text, color_code)
        } else {
            text
        }
    }

    // ===== Reminders =====

    /// Render the outcome of a backend reminder sweep
    pub fn reminder_outcome(
        &self,
        outcome: &ReminderOutcome,
        writer: &mut dyn Write,
    ) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.write_json(
                &serde_json::to_value(outcome).unwrap_or_default(),
                writer,
            );
        }

        writeln!(writer, "{}", self.paint(&outcome.message, "1"))?;
        writeln!(writer)?;
        let s = &outcome.summary;
        writeln!(writer, "  Services flagged: {:>4}", s.total_services_flagged)?;
        writeln!(writer, "    Expiring:       {:>4}", s.expiring_count)?;
        writeln!(writer, "    Payment due:    {:>4}", s.payment_due_count)?;
        writeln!(writer, "  Emails sent:      {:>4}", s.emails_sent)?;
        if s.emails_failed > 0 {
            writeln!(
                writer,
                "  Emails failed:    {}",
                self.paint(&format!("{:>4}", s.emails_failed), "31")
            )?;
        }
        Ok(())
    }

    /// Render locally built reminder notices without sending anything
    pub fn reminder_preview(
        &self,
        notices: &[ReminderNotice],
        summary: &ReminderSummary,
        window_days: i64,
        full: bool,
        writer: &mut dyn Write,
    ) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.write_json(
                &json!({
                    "window_days": window_days,
                    "summary": summary,
                    "notices": notices,
                }),
                writer,
            );
        }

        if notices.is_empty() {
            return writeln!(
                writer,
                "No services due within the next {} days.",
                window_days
            );
        }

        writeln!(
            writer,
            "{}",
            self.paint(
                &format!(
                    "{} {} due within {} days ({} expiring, {} payment due)",
                    summary.total_services_flagged,
                    plural(
                        summary.total_services_flagged as i64,
                        "service",
                        "services"
                    ),
                    window_days,
                    summary.expiring_count,
                    summary.payment_due_count
                ),
                "1"
            )
        )?;
        writeln!(writer)?;

        if full {
            for notice in notices {
                writeln!(writer, "To: {}", notice.recipient)?;
                writeln!(writer, "Subject: {}", notice.subject)?;
                writeln!(writer)?;
                writeln!(writer, "{}", notice.body)?;
                writeln!(writer, "{}", "-".repeat(60))?;
            }
        } else {
            for notice in notices {
                writeln!(
                    writer,
                    "  {} {}",
                    pad(&notice.recipient, 28),
                    notice.subject
                )?;
            }
        }
        Ok(())
    }
}

// ===== Helpers =====

/// Pad to `width`, truncating long text with a trailing ellipsis
fn pad(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let cut: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        format!("{:<width$}", text, width = width)
    }
}

fn plural(count: i64, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 {
        one
    } else {
        many
    }
}

/// Human phrase for a signed day count
fn describe_days(days: i64) -> String {
    match days {
        0 => "today".to_string(),
        d if d > 0 => format!("in {} {}", d, plural(d, "day", "days")),
        d => format!("{} {} ago", -d, plural(-d, "day", "days")),
    }
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Active => "32",
        Severity::Expired => "31",
        Severity::Pending => "33",
    }
}

fn color_code(color: &StatusColor) -> &'static str {
    match color {
        StatusColor::Red => "31",
        StatusColor::Orange => "91",
        StatusColor::Yellow => "33",
        StatusColor::Green => "32",
        StatusColor::Gray => "90",
        StatusColor::Other(_) => "0",
    }
}

const COLOR_ORDER: [StatusColor; 5] = [
    StatusColor::Red,
    StatusColor::Orange,
    StatusColor::Yellow,
    StatusColor::Green,
    StatusColor::Gray,
];

/// Known colors in severity order, then unknown tokens alphabetically
fn ordered_colors(groups: &HashMap<StatusColor, ColorGroup>) -> Vec<StatusColor> {
    let mut ordered: Vec<StatusColor> = COLOR_ORDER
        .iter()
        .filter(|&c| groups.contains_key(c))
        .cloned()
        .collect();
    let mut rest: Vec<StatusColor> = groups
        .keys()
        .filter(|c| !COLOR_ORDER.contains(c))
        .cloned()
        .collect();
    rest.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    ordered.extend(rest);
    ordered
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use vendwatch_core::model::VendorStatus;
    use vendwatch_core::reminder::{flag_due_services, ReminderFlag};
    use vendwatch_core::status::DEFAULT_WINDOW_DAYS;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service(
        id: i64,
        name: &str,
        expiry: NaiveDate,
        payment: NaiveDate,
        color: Option<StatusColor>,
    ) -> Service {
        let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Service {
            id,
            vendor: 1,
            service_name: name.to_string(),
            start_date: date(2024, 1, 1),
            expiry_date: expiry,
            payment_due_date: payment,
            amount: dec!(150.00),
            server_status: "Active".to_string(),
            vendor_name: "Acme Networks".to_string(),
            status_color: color,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    fn vendor(id: i64, name: &str) -> Vendor {
        let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Vendor {
            id,
            name: name.to_string(),
            contact_person: "Jordan Reyes".to_string(),
            email: "jordan@acme.example".to_string(),
            phone: "555-0101".to_string(),
            status: VendorStatus::Active,
            services: Vec::new(),
            active_services_count: 2,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    fn page_of<T: Clone>(rows: &[T]) -> Page<T> {
        Page {
            count: rows.len() as u64,
            next: None,
            previous: None,
            results: rows.to_vec(),
        }
    }

    fn render_to_string<F>(f: F) -> String
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_names_round_trip() {
        for (format, spelled) in [(OutputFormat::Human, "human"), (OutputFormat::Json, "json")] {
            assert_eq!(format.to_string(), spelled);
            assert_eq!(spelled.parse::<OutputFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_format_parse_accepts_aliases_case_insensitively() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Human);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_vendor_table_lists_rows() {
        let renderer = Renderer::new(OutputFormat::Human, false);
        let rows = vec![vendor(3, "Acme Networks")];
        let page = page_of(&rows);
        let refs: Vec<&Vendor> = page.results.iter().collect();

        let out = render_to_string(|w| {
            renderer.vendor_page(&refs, &page, &PageRequest::first(20), w)
        });

        assert!(out.contains("Acme Networks"));
        assert!(out.contains("jordan@acme.example"));
        assert!(out.contains("Page 1 of 1 (1 total)"));
    }

    #[test]
    fn test_vendor_json_envelope() {
        let renderer = Renderer::new(OutputFormat::Json, false);
        let rows = vec![vendor(3, "Acme Networks")];
        let page = page_of(&rows);
        let refs: Vec<&Vendor> = page.results.iter().collect();

        let out = render_to_string(|w| {
            renderer.vendor_page(&refs, &page, &PageRequest::first(20), w)
        });

        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["results"][0]["name"], "Acme Networks");
    }

    #[test]
    fn test_status_column_uses_local_classifier() {
        // The fixture's server status says Active but the dates say Expired
        let today = date(2024, 6, 1);
        let window = DEFAULT_WINDOW_DAYS;
        let renderer = Renderer::new(OutputFormat::Human, false);
        let rows = vec![service(7, "CDN contract", date(2024, 5, 30), date(2024, 6, 10), None)];
        let page = page_of(&rows);
        let refs: Vec<&Service> = page.results.iter().collect();

        let out = render_to_string(|w| {
            renderer.service_page(&refs, &page, &PageRequest::first(20), today, window, w)
        });

        assert!(out.contains("Expired"));
        assert!(!out.contains("Active"));
    }

    #[test]
    fn test_filter_note_in_footer() {
        let today = date(2024, 6, 1);
        let window = DEFAULT_WINDOW_DAYS;
        let renderer = Renderer::new(OutputFormat::Human, false);
        let rows = vec![
            service(1, "kept", date(2024, 12, 31), date(2024, 12, 31), None),
            service(2, "dropped", date(2024, 12, 31), date(2024, 12, 31), None),
        ];
        let page = page_of(&rows);
        let refs: Vec<&Service> = vec![&page.results[0]];

        let out = render_to_string(|w| {
            renderer.service_page(&refs, &page, &PageRequest::first(20), today, window, w)
        });

        assert!(out.contains("1 of 2 services on this page match the filters"));
    }

    #[test]
    fn test_status_cell_colored_by_severity() {
        let today = date(2024, 6, 1);
        let window = DEFAULT_WINDOW_DAYS;
        let renderer = Renderer::new(OutputFormat::Human, true);
        let rows = vec![service(7, "lapsed", date(2024, 5, 30), date(2024, 6, 10), None)];
        let page = page_of(&rows);
        let refs: Vec<&Service> = page.results.iter().collect();

        let out = render_to_string(|w| {
            renderer.service_page(&refs, &page, &PageRequest::first(20), today, window, w)
        });

        // Expired renders red
        assert!(out.contains("\x1b[31m"));
    }

    #[test]
    fn test_json_mode_never_colors() {
        let today = date(2024, 6, 1);
        let window = DEFAULT_WINDOW_DAYS;
        let renderer = Renderer::new(OutputFormat::Json, true);
        let rows = vec![service(7, "lapsed", date(2024, 5, 30), date(2024, 6, 10), None)];
        let page = page_of(&rows);
        let refs: Vec<&Service> = page.results.iter().collect();

        let out = render_to_string(|w| {
            renderer.service_page(&refs, &page, &PageRequest::first(20), today, window, w)
        });

        assert!(!out.contains("\x1b["));
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["results"][0]["computed_status"], "Expired");
        assert_eq!(json["results"][0]["severity"], "expired");
    }

    #[test]
    fn test_empty_page_message() {
        let today = date(2024, 6, 1);
        let window = DEFAULT_WINDOW_DAYS;
        let renderer = Renderer::new(OutputFormat::Human, false);
        let page: Page<Service> = page_of(&[]);

        let out = render_to_string(|w| {
            renderer.service_page(&[], &page, &PageRequest::first(20), today, window, w)
        });

        assert!(out.contains("No services found."));
    }

    #[test]
    fn test_service_detail_derives_missing_color() {
        // Expiry nine days out and no stored color: the derived hint is yellow
        let today = date(2024, 6, 1);
        let window = DEFAULT_WINDOW_DAYS;
        let renderer = Renderer::new(OutputFormat::Human, false);
        let row = service(7, "CDN contract", date(2024, 6, 10), date(2024, 12, 31), None);

        let out = render_to_string(|w| renderer.service_detail(&row, today, window, w));
        let squashed = out.split_whitespace().collect::<Vec<_>>().join(" ");

        assert!(squashed.contains("Expires: 2024-06-10 (in 9 days)"));
        assert!(squashed.contains("Color: yellow"));
    }

    #[test]
    fn test_detail_color_follows_configured_window() {
        // Expiry 20 days out: quiet under the stock window, yellow when widened to 30
        let today = date(2024, 6, 1);
        let renderer = Renderer::new(OutputFormat::Human, false);
        let row = service(7, "CDN contract", date(2024, 6, 21), date(2024, 12, 31), None);

        let squash = |out: String| out.split_whitespace().collect::<Vec<_>>().join(" ");
        let stock = squash(render_to_string(|w| {
            renderer.service_detail(&row, today, DEFAULT_WINDOW_DAYS, w)
        }));
        let widened = squash(render_to_string(|w| renderer.service_detail(&row, today, 30, w)));

        assert!(stock.contains("Color: gray"));
        assert!(widened.contains("Color: yellow"));
    }

    #[test]
    fn test_dashboard_lists_counts() {
        let renderer = Renderer::new(OutputFormat::Human, false);
        let summary = DashboardSummary {
            total_vendors: 12,
            active_services: 34,
            expiring_soon: 3,
            payment_due: 2,
            expired_services: 5,
            recent_vendors: vec![vendor(3, "Acme Networks")],
        };

        let out = render_to_string(|w| renderer.dashboard(&summary, w));
        let squashed = out.split_whitespace().collect::<Vec<_>>().join(" ");

        assert!(squashed.contains("Vendors: 12"));
        assert!(squashed.contains("Expiring soon: 3"));
        assert!(squashed.contains("Expired: 5"));
        assert!(out.contains("Recently added vendors"));
        assert!(out.contains("Acme Networks"));
    }

    #[test]
    fn test_color_groups_fixed_order() {
        let renderer = Renderer::new(OutputFormat::Human, false);
        let mut groups = HashMap::new();
        groups.insert(
            StatusColor::Green,
            ColorGroup {
                count: 1,
                services: vec![service(1, "quiet", date(2024, 12, 31), date(2024, 12, 31), None)],
            },
        );
        groups.insert(
            StatusColor::Red,
            ColorGroup {
                count: 1,
                services: vec![service(2, "lapsed", date(2024, 5, 1), date(2024, 5, 1), None)],
            },
        );

        let out = render_to_string(|w| renderer.color_groups(&groups, w));

        let red = out.find("RED").unwrap();
        let green = out.find("GREEN").unwrap();
        assert!(red < green);
        assert!(out.contains("lapsed"));
    }

    #[test]
    fn test_reminder_preview_subjects_and_full() {
        let today = date(2024, 6, 1);
        let rows = vec![service(1, "CDN contract", date(2024, 6, 5), date(2024, 12, 1), None)];
        let flags: Vec<ReminderFlag> = flag_due_services(&rows, today, 15);
        let summary = ReminderSummary::from_flags(&flags);
        let notices: Vec<ReminderNotice> = flags
            .iter()
            .map(|f| ReminderNotice::build(f, &vendor(1, "Acme Networks"), today))
            .collect();

        let renderer = Renderer::new(OutputFormat::Human, false);

        let out = render_to_string(|w| {
            renderer.reminder_preview(&notices, &summary, 15, false, w)
        });
        assert!(out.contains("1 service due within 15 days"));
        assert!(out.contains("jordan@acme.example"));
        assert!(!out.contains("Dear Jordan Reyes"));

        let out = render_to_string(|w| {
            renderer.reminder_preview(&notices, &summary, 15, true, w)
        });
        assert!(out.contains("Dear Jordan Reyes"));
        assert!(out.contains("Subject: Vendor Management Alert"));
    }

    #[test]
    fn test_reminder_preview_empty_window() {
        let renderer = Renderer::new(OutputFormat::Human, false);
        let summary = ReminderSummary::from_flags(&[]);

        let out = render_to_string(|w| renderer.reminder_preview(&[], &summary, 15, false, w));

        assert!(out.contains("No services due within the next 15 days."));
    }

    #[test]
    fn test_message_json_shape() {
        let renderer = Renderer::new(OutputFormat::Json, false);
        let out = render_to_string(|w| renderer.message("Vendor 7 deleted", w));
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["message"], "Vendor 7 deleted");
    }

    #[test]
    fn test_pad_truncates_long_text() {
        assert_eq!(pad("short", 8), "short   ");
        assert_eq!(pad("a very long vendor name", 10), "a very ...");
        assert_eq!(describe_days(0), "today");
        assert_eq!(describe_days(1), "in 1 day");
        assert_eq!(describe_days(-4), "4 days ago");
    }
}
