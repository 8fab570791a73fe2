use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default look-ahead window for expiry and payment warnings, in days.
///
/// Shared by the color derivation, the reminder sweep, and the backend's
/// own warning endpoints.
pub const DEFAULT_WINDOW_DAYS: i64 = 15;

/// Color hint attached to a service row by the backend.
///
/// The backend derives the color from the service dates and clients treat it
/// as advisory. Parsing is total: tokens outside the known vocabulary are
/// preserved verbatim in [`StatusColor::Other`] and carry no classification
/// weight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StatusColor {
    /// No date pressure
    Green,
    /// Expiry or payment falls inside the warning window
    Yellow,
    /// Neutral, also the fallback when the backend omits the field
    Gray,
    /// Contract already expired
    Red,
    /// Payment past due
    Orange,
    /// Unrecognized token, kept as received
    Other(String),
}

impl StatusColor {
    /// Wire token for this color
    pub fn as_str(&self) -> &str {
        match self {
            StatusColor::Green => "green",
            StatusColor::Yellow => "yellow",
            StatusColor::Gray => "gray",
            StatusColor::Red => "red",
            StatusColor::Orange => "orange",
            StatusColor::Other(token) => token,
        }
    }

    /// Check if this is the warning color that drives [`StatusLabel::ExpiringSoon`]
    pub fn is_yellow(&self) -> bool {
        matches!(self, StatusColor::Yellow)
    }
}

impl Default for StatusColor {
    fn default() -> Self {
        StatusColor::Gray
    }
}

impl From<&str> for StatusColor {
    fn from(token: &str) -> Self {
        match token {
            "green" => StatusColor::Green,
            "yellow" => StatusColor::Yellow,
            "gray" => StatusColor::Gray,
            "red" => StatusColor::Red,
            "orange" => StatusColor::Orange,
            other => StatusColor::Other(other.to_string()),
        }
    }
}

impl From<String> for StatusColor {
    fn from(token: String) -> Self {
        StatusColor::from(token.as_str())
    }
}

impl From<StatusColor> for String {
    fn from(color: StatusColor) -> Self {
        color.as_str().to_string()
    }
}

impl std::fmt::Display for StatusColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Human-facing status label for a service row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusLabel {
    /// Contract in good standing
    Active,
    /// Expiry date has passed
    Expired,
    /// Payment due date has passed
    PaymentPending,
    /// Inside the warning window per the backend's color hint
    ExpiringSoon,
}

impl StatusLabel {
    /// Display text for the label
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLabel::Active => "Active",
            StatusLabel::Expired => "Expired",
            StatusLabel::PaymentPending => "Payment Pending",
            StatusLabel::ExpiringSoon => "Expiring Soon",
        }
    }

    /// Severity bucket this label renders under
    pub fn severity(&self) -> Severity {
        match self {
            StatusLabel::Active => Severity::Active,
            StatusLabel::Expired => Severity::Expired,
            StatusLabel::PaymentPending | StatusLabel::ExpiringSoon => Severity::Pending,
        }
    }
}

impl std::fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity bucket used to style a status label.
///
/// Coarser than [`StatusLabel`]: both payment-pending and expiring-soon
/// rows style as pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Nothing to act on
    Active,
    /// Contract lapsed
    Expired,
    /// Needs attention soon
    Pending,
}

impl Severity {
    /// Style class token for the severity
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Active => "active",
            Severity::Expired => "expired",
            Severity::Pending => "pending",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classified status of a service row: label plus its severity bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    /// Human-facing label
    pub label: StatusLabel,
    /// Severity bucket for styling
    pub severity: Severity,
}

impl ServiceStatus {
    /// Build a status from a label; the severity follows from the label
    pub fn from_label(label: StatusLabel) -> Self {
        Self {
            label,
            severity: label.severity(),
        }
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Classify a service row from its dates and the backend's color hint.
///
/// Rules apply in order, first match wins:
///
/// 1. expiry date before `today` is Expired
/// 2. payment due date before `today` is Payment Pending
/// 3. a yellow hint is Expiring Soon
/// 4. anything else is Active
///
/// Comparisons are strict, so a date equal to `today` has not passed.
/// The function is total: every hint, including unknown tokens, produces a
/// status, and identical inputs always produce identical output.
pub fn classify(
    today: NaiveDate,
    expiry_date: NaiveDate,
    payment_due_date: NaiveDate,
    color_hint: &StatusColor,
) -> ServiceStatus {
    let label = if expiry_date < today {
        StatusLabel::Expired
    } else if payment_due_date < today {
        StatusLabel::PaymentPending
    } else if color_hint.is_yellow() {
        StatusLabel::ExpiringSoon
    } else {
        StatusLabel::Active
    };
    ServiceStatus::from_label(label)
}

/// Signed day count from `today` to `date`; negative when `date` has passed
pub fn days_until(today: NaiveDate, date: NaiveDate) -> i64 {
    (date - today).num_days()
}

/// Check whether `date` falls inside the inclusive warning window
/// `[today, today + window_days]`
pub fn within_window(today: NaiveDate, date: NaiveDate, window_days: i64) -> bool {
    (0..=window_days).contains(&days_until(today, date))
}

/// Derive the color hint for a service the way the backend does.
///
/// Red for an expired contract, orange for a payment past due, yellow when
/// either date falls inside the warning window, gray otherwise. Used to
/// fill in the color locally when a row arrives without one; pass
/// [`DEFAULT_WINDOW_DAYS`] for backend parity.
pub fn status_color_for(
    today: NaiveDate,
    expiry_date: NaiveDate,
    payment_due_date: NaiveDate,
    window_days: i64,
) -> StatusColor {
    if expiry_date < today {
        StatusColor::Red
    } else if payment_due_date < today {
        StatusColor::Orange
    } else if within_window(today, expiry_date, window_days)
        || within_window(today, payment_due_date, window_days)
    {
        StatusColor::Yellow
    } else {
        StatusColor::Gray
    }
}
