//! # Vendwatch Core
//!
//! Domain logic for tracking vendor service contracts, featuring:
//!
//! - **Status Classification**: Pure, total classification of a service row
//!   from its expiry date, payment due date, and the backend's color hint
//! - **Unified Filtering**: Status filters that consume the same classifier
//!   as the renderer, so a table and its filters can never disagree
//! - **Reminder Sweeps**: Window eligibility, per-service deduplication, and
//!   notice rendering matching the backend's reminder emails
//! - **Wire-Faithful Model**: Vendor and service types that decode the
//!   backend's REST payloads, including string decimals and optional fields
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use vendwatch_core::{classify, StatusColor, StatusLabel, Severity};
//!
//! let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//! let expiry = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
//! let payment_due = NaiveDate::from_ymd_opt(2024, 6, 20).unwrap();
//!
//! let status = classify(today, expiry, payment_due, &StatusColor::Yellow);
//! assert_eq!(status.label, StatusLabel::ExpiringSoon);
//! assert_eq!(status.severity, Severity::Pending);
//! ```
//!
//! ## Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`status`]: The classifier, color vocabulary, and date-window rules
//! - [`model`]: Vendor and service types plus pagination envelopes
//! - [`filter`]: Client-side search and status predicates
//! - [`reminder`]: Reminder sweep eligibility and notice rendering
//! - [`error`]: Error handling and result types
//!
//! All of it is synchronous and free of I/O; the HTTP client and the CLI
//! build on top.

pub mod error;
pub mod filter;
pub mod model;
pub mod reminder;
pub mod status;

// Re-export commonly used types for convenience
pub use error::{DomainError, DomainResult};
pub use filter::{
    filter_services, filter_vendors, ServiceFilter, StatusFilter, VendorFilter,
    VendorStatusFilter,
};
pub use model::{
    ColorGroup, Page, PageRequest, Service, ServicePayload, Vendor, VendorPayload, VendorStatus,
    VendorWithActiveServices, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use reminder::{flag_due_services, ReminderFlag, ReminderNotice, ReminderSummary};
pub use status::{
    classify, days_until, status_color_for, within_window, Severity, ServiceStatus, StatusColor,
    StatusLabel, DEFAULT_WINDOW_DAYS,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{DomainError, DomainResult};
    pub use crate::filter::{ServiceFilter, StatusFilter, VendorFilter, VendorStatusFilter};
    pub use crate::model::{Page, PageRequest, Service, ServicePayload, Vendor, VendorPayload, VendorStatus};
    pub use crate::reminder::{flag_due_services, ReminderFlag, ReminderNotice, ReminderSummary};
    pub use crate::status::{classify, Severity, ServiceStatus, StatusColor, StatusLabel};
}
