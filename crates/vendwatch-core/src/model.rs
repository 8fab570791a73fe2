use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{DomainError, DomainResult};
use crate::status::{classify, days_until, within_window, ServiceStatus, StatusColor};

/// Default rows per page requested by clients
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size the backend honors; bigger requests are clamped
pub const MAX_PAGE_SIZE: u32 = 100;

/// Vendor lifecycle status as stored by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VendorStatus {
    /// Vendor under contract
    Active,
    /// Vendor retained but not currently contracted
    Inactive,
}

impl VendorStatus {
    /// Wire token for the status
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorStatus::Active => "Active",
            VendorStatus::Inactive => "Inactive",
        }
    }

    /// Check if the vendor is active
    pub fn is_active(&self) -> bool {
        matches!(self, VendorStatus::Active)
    }
}

impl std::fmt::Display for VendorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VendorStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.to_lowercase().as_str() {
            "active" => Ok(VendorStatus::Active),
            "inactive" => Ok(VendorStatus::Inactive),
            other => Err(DomainError::unknown_token("vendor status", other)),
        }
    }
}

/// A vendor with contracted services, as read from the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    /// Backend row identifier
    pub id: i64,
    /// Vendor name, unique on the backend
    pub name: String,
    /// Primary contact person, addressed in reminder notices
    pub contact_person: String,
    /// Contact email, the reminder recipient
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Lifecycle status
    pub status: VendorStatus,
    /// Services contracted from this vendor, nested on reads
    #[serde(default)]
    pub services: Vec<Service>,
    /// Count of services whose expiry date has not passed
    #[serde(default)]
    pub active_services_count: u64,
    /// When the vendor row was created
    pub created_at: DateTime<Utc>,
    /// When the vendor row was last updated
    pub updated_at: DateTime<Utc>,
}

impl Vendor {
    /// Find a nested service by id
    pub fn service(&self, service_id: i64) -> Option<&Service> {
        self.services.iter().find(|s| s.id == service_id)
    }
}

/// Vendor row from the active-services listing, which nests only services
/// whose expiry date has not passed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorWithActiveServices {
    /// Backend row identifier
    pub id: i64,
    /// Vendor name
    pub name: String,
    /// Primary contact person
    pub contact_person: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Lifecycle status
    pub status: VendorStatus,
    /// Unexpired services only
    #[serde(default)]
    pub active_services: Vec<Service>,
    /// When the vendor row was created
    pub created_at: DateTime<Utc>,
    /// When the vendor row was last updated
    pub updated_at: DateTime<Utc>,
}

/// A contracted service, as read from the backend.
///
/// The backend attaches two derived fields on reads: a `status` string and
/// sometimes a `status_color` hint. The string is kept verbatim in
/// [`Service::server_status`] for display; status decisions go through
/// [`Service::status_on`], which classifies locally from the dates and the
/// hint so that rendering and filtering cannot disagree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    /// Backend row identifier
    pub id: i64,
    /// Owning vendor id
    pub vendor: i64,
    /// Service or contract name
    pub service_name: String,
    /// Contract start date
    pub start_date: NaiveDate,
    /// Contract expiry date
    pub expiry_date: NaiveDate,
    /// Next payment due date
    pub payment_due_date: NaiveDate,
    /// Contract amount; the backend serializes decimals as strings
    pub amount: Decimal,
    /// Status string precomputed by the backend, display only
    #[serde(rename = "status", default)]
    pub server_status: String,
    /// Owning vendor name, denormalized by the backend
    #[serde(default)]
    pub vendor_name: String,
    /// Color hint; not every read includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_color: Option<StatusColor>,
    /// When the service row was created
    pub created_at: DateTime<Utc>,
    /// When the service row was last updated
    pub updated_at: DateTime<Utc>,
}

impl Service {
    /// Color hint with the gray fallback applied for rows that arrived
    /// without one
    pub fn color_hint(&self) -> StatusColor {
        self.status_color.clone().unwrap_or(StatusColor::Gray)
    }

    /// Classify this service as of `today`
    pub fn status_on(&self, today: NaiveDate) -> ServiceStatus {
        classify(
            today,
            self.expiry_date,
            self.payment_due_date,
            &self.color_hint(),
        )
    }

    /// Signed days from `today` to the expiry date
    pub fn days_until_expiry(&self, today: NaiveDate) -> i64 {
        days_until(today, self.expiry_date)
    }

    /// Signed days from `today` to the payment due date
    pub fn days_until_payment(&self, today: NaiveDate) -> i64 {
        days_until(today, self.payment_due_date)
    }

    /// Check if the expiry date falls inside the inclusive warning window
    pub fn is_expiring_within(&self, today: NaiveDate, window_days: i64) -> bool {
        within_window(today, self.expiry_date, window_days)
    }

    /// Check if the payment due date falls inside the inclusive warning window
    pub fn is_payment_due_within(&self, today: NaiveDate, window_days: i64) -> bool {
        within_window(today, self.payment_due_date, window_days)
    }
}

/// Write payload for creating or updating a vendor
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VendorPayload {
    /// Vendor name
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Primary contact person
    #[validate(length(min = 1, max = 200))]
    pub contact_person: String,
    /// Contact email
    #[validate(email)]
    pub email: String,
    /// Contact phone
    #[validate(length(min = 1, max = 20))]
    pub phone: String,
    /// Lifecycle status
    pub status: VendorStatus,
}

impl VendorPayload {
    /// Create a validated vendor payload
    pub fn new(
        name: impl Into<String>,
        contact_person: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        status: VendorStatus,
    ) -> DomainResult<Self> {
        let payload = Self {
            name: name.into(),
            contact_person: contact_person.into(),
            email: email.into(),
            phone: phone.into(),
            status,
        };
        payload.validate()?;
        Ok(payload)
    }
}

/// Write payload for creating or updating a service
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServicePayload {
    /// Owning vendor id
    pub vendor: i64,
    /// Service or contract name
    #[validate(length(min = 1, max = 200))]
    pub service_name: String,
    /// Contract start date
    pub start_date: NaiveDate,
    /// Contract expiry date
    pub expiry_date: NaiveDate,
    /// Next payment due date
    pub payment_due_date: NaiveDate,
    /// Contract amount
    pub amount: Decimal,
}

impl ServicePayload {
    /// Create a validated service payload
    pub fn new(
        vendor: i64,
        service_name: impl Into<String>,
        start_date: NaiveDate,
        expiry_date: NaiveDate,
        payment_due_date: NaiveDate,
        amount: Decimal,
    ) -> DomainResult<Self> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::invalid_amount(format!(
                "Amount must be positive: {}",
                amount
            )));
        }
        if start_date > expiry_date {
            return Err(DomainError::InvalidDateRange {
                start: start_date,
                expiry: expiry_date,
            });
        }
        let payload = Self {
            vendor,
            service_name: service_name.into(),
            start_date,
            expiry_date,
            payment_due_date,
            amount,
        };
        payload.validate()?;
        Ok(payload)
    }
}

/// Paginated response envelope returned by backend list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total row count across all pages
    pub count: u64,
    /// URL of the next page, if any
    pub next: Option<String>,
    /// URL of the previous page, if any
    pub previous: Option<String>,
    /// Rows on this page
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Check if a next page exists
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Check if a previous page exists
    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Check if this page holds no rows
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Total page count for the given page size
    pub fn total_pages(&self, page_size: u32) -> u64 {
        self.count.div_ceil(page_size.max(1) as u64)
    }
}

/// Page cursor for list requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    /// Rows per page, clamped to the backend maximum
    pub page_size: u32,
}

impl PageRequest {
    /// Create a page request; page numbers start at 1 and sizes clamp to
    /// the backend maximum
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// First page at the given size
    pub fn first(page_size: u32) -> Self {
        Self::new(1, page_size)
    }

    /// Same cursor moved to the given page
    pub fn at(&self, page: u32) -> Self {
        Self::new(page, self.page_size)
    }

    /// Query parameters for the request
    pub fn query(&self) -> [(&'static str, String); 2] {
        [
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
        ]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// One bucket of the by-color service grouping endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorGroup {
    /// Services in this bucket
    pub count: u64,
    /// The bucketed rows
    pub services: Vec<Service>,
}
