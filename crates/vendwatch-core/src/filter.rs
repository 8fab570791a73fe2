use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::model::{Service, Vendor, VendorStatus};
use crate::status::{ServiceStatus, StatusLabel};

/// Service-status filter applied client side.
///
/// Matching goes through the same classifier that renders the status
/// column, so the filter and the table can never disagree about what a row
/// is. An empty selection matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusFilter {
    /// No filtering
    #[default]
    Any,
    /// Contracts in good standing
    Active,
    /// Lapsed contracts
    Expired,
    /// Contracts inside the warning window
    ExpiringSoon,
    /// Contracts with a payment past due
    PaymentPending,
}

impl StatusFilter {
    /// The label this filter selects, if it selects one
    pub fn label(&self) -> Option<StatusLabel> {
        match self {
            StatusFilter::Any => None,
            StatusFilter::Active => Some(StatusLabel::Active),
            StatusFilter::Expired => Some(StatusLabel::Expired),
            StatusFilter::ExpiringSoon => Some(StatusLabel::ExpiringSoon),
            StatusFilter::PaymentPending => Some(StatusLabel::PaymentPending),
        }
    }

    /// Check whether a classified status passes this filter
    pub fn matches(&self, status: ServiceStatus) -> bool {
        self.label().map_or(true, |label| label == status.label)
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = match self {
            StatusFilter::Any => "any",
            StatusFilter::Active => "active",
            StatusFilter::Expired => "expired",
            StatusFilter::ExpiringSoon => "expiring-soon",
            StatusFilter::PaymentPending => "payment-pending",
        };
        write!(f, "{}", token)
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.to_lowercase().replace(['_', ' '], "-").as_str() {
            "" | "any" | "all" => Ok(StatusFilter::Any),
            "active" => Ok(StatusFilter::Active),
            "expired" => Ok(StatusFilter::Expired),
            "expiring-soon" | "expiring" => Ok(StatusFilter::ExpiringSoon),
            "payment-pending" | "pending" => Ok(StatusFilter::PaymentPending),
            other => Err(DomainError::unknown_token("status filter", other)),
        }
    }
}

/// Vendor-status filter applied client side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VendorStatusFilter {
    /// No filtering
    #[default]
    Any,
    /// Active vendors only
    Active,
    /// Inactive vendors only
    Inactive,
}

impl VendorStatusFilter {
    /// Check whether a vendor status passes this filter
    pub fn matches(&self, status: VendorStatus) -> bool {
        match self {
            VendorStatusFilter::Any => true,
            VendorStatusFilter::Active => status == VendorStatus::Active,
            VendorStatusFilter::Inactive => status == VendorStatus::Inactive,
        }
    }
}

impl std::fmt::Display for VendorStatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = match self {
            VendorStatusFilter::Any => "any",
            VendorStatusFilter::Active => "active",
            VendorStatusFilter::Inactive => "inactive",
        };
        write!(f, "{}", token)
    }
}

impl std::str::FromStr for VendorStatusFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.to_lowercase().as_str() {
            "" | "any" | "all" => Ok(VendorStatusFilter::Any),
            "active" => Ok(VendorStatusFilter::Active),
            "inactive" => Ok(VendorStatusFilter::Inactive),
            other => Err(DomainError::unknown_token("vendor status filter", other)),
        }
    }
}

/// Client-side service list filter: substring search plus status
#[derive(Debug, Clone, Default)]
pub struct ServiceFilter {
    /// Case-insensitive substring matched against the service name
    pub search: Option<String>,
    /// Status predicate
    pub status: StatusFilter,
}

impl ServiceFilter {
    /// Check whether a service passes this filter as of `today`
    pub fn matches(&self, service: &Service, today: NaiveDate) -> bool {
        let search_ok = match self.search.as_deref() {
            Some(needle) if !needle.is_empty() => service
                .service_name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        };
        search_ok && self.status.matches(service.status_on(today))
    }
}

/// Client-side vendor list filter: substring search plus status.
///
/// The search covers the name, contact person, and email.
#[derive(Debug, Clone, Default)]
pub struct VendorFilter {
    /// Case-insensitive substring matched against name, contact, and email
    pub search: Option<String>,
    /// Status predicate
    pub status: VendorStatusFilter,
}

impl VendorFilter {
    /// Check whether a vendor passes this filter
    pub fn matches(&self, vendor: &Vendor) -> bool {
        self.matches_fields(
            &vendor.name,
            &vendor.contact_person,
            &vendor.email,
            vendor.status,
        )
    }

    /// Field-level form of [`matches`](Self::matches), for vendor rows that
    /// arrive in other shapes
    pub fn matches_fields(
        &self,
        name: &str,
        contact_person: &str,
        email: &str,
        status: VendorStatus,
    ) -> bool {
        let search_ok = match self.search.as_deref() {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                name.to_lowercase().contains(&needle)
                    || contact_person.to_lowercase().contains(&needle)
                    || email.to_lowercase().contains(&needle)
            }
            _ => true,
        };
        search_ok && self.status.matches(status)
    }
}

/// Apply a service filter to a slice of rows
pub fn filter_services<'a>(
    services: &'a [Service],
    filter: &ServiceFilter,
    today: NaiveDate,
) -> Vec<&'a Service> {
    services
        .iter()
        .filter(|service| filter.matches(service, today))
        .collect()
}

/// Apply a vendor filter to a slice of rows
pub fn filter_vendors<'a>(vendors: &'a [Vendor], filter: &VendorFilter) -> Vec<&'a Vendor> {
    vendors.iter().filter(|vendor| filter.matches(vendor)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusColor;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service(id: i64, name: &str, expiry: NaiveDate, payment: NaiveDate, color: Option<StatusColor>) -> Service {
        let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Service {
            id,
            vendor: 1,
            service_name: name.to_string(),
            start_date: date(2024, 1, 1),
            expiry_date: expiry,
            payment_due_date: payment,
            amount: Decimal::new(10000, 2),
            server_status: "Active".to_string(),
            vendor_name: "Acme Networks".to_string(),
            status_color: color,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    fn vendor(name: &str, contact: &str, email: &str, status: VendorStatus) -> Vendor {
        let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Vendor {
            id: 1,
            name: name.to_string(),
            contact_person: contact.to_string(),
            email: email.to_string(),
            phone: "555-0101".to_string(),
            status,
            services: Vec::new(),
            active_services_count: 0,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn status_filter_parses_ui_and_cli_spellings() {
        assert_eq!("".parse::<StatusFilter>().unwrap(), StatusFilter::Any);
        assert_eq!("Expired".parse::<StatusFilter>().unwrap(), StatusFilter::Expired);
        assert_eq!(
            "Expiring Soon".parse::<StatusFilter>().unwrap(),
            StatusFilter::ExpiringSoon
        );
        assert_eq!(
            "expiring_soon".parse::<StatusFilter>().unwrap(),
            StatusFilter::ExpiringSoon
        );
        assert_eq!(
            "payment-pending".parse::<StatusFilter>().unwrap(),
            StatusFilter::PaymentPending
        );
        assert!("bogus".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn filter_and_renderer_agree_on_every_row() {
        let today = date(2024, 6, 1);
        let rows = vec![
            service(1, "Lapsed", date(2024, 5, 30), date(2024, 6, 10), None),
            service(2, "Warned", date(2024, 6, 10), date(2024, 6, 20), Some(StatusColor::Yellow)),
            service(3, "Quiet", date(2024, 12, 31), date(2024, 12, 31), Some(StatusColor::Gray)),
        ];

        for row in &rows {
            let rendered = row.status_on(today);
            for filter in [
                StatusFilter::Active,
                StatusFilter::Expired,
                StatusFilter::ExpiringSoon,
                StatusFilter::PaymentPending,
            ] {
                assert_eq!(
                    filter.matches(rendered),
                    filter.label() == Some(rendered.label)
                );
            }
        }
    }

    #[test]
    fn filter_ignores_stale_server_status() {
        // The backend said Active but the dates say Expired; the local
        // classifier is the source of truth for both render and filter.
        let today = date(2024, 6, 1);
        let row = service(1, "Stale", date(2024, 5, 30), date(2024, 6, 10), None);
        assert_eq!(row.server_status, "Active");

        let filter = ServiceFilter {
            search: None,
            status: StatusFilter::Expired,
        };
        assert!(filter.matches(&row, today));

        let filter = ServiceFilter {
            search: None,
            status: StatusFilter::Active,
        };
        assert!(!filter.matches(&row, today));
    }

    #[test]
    fn service_search_is_case_insensitive_substring() {
        let today = date(2024, 6, 1);
        let row = service(1, "CDN Contract", date(2024, 12, 31), date(2024, 12, 31), None);

        let filter = ServiceFilter {
            search: Some("cdn".to_string()),
            status: StatusFilter::Any,
        };
        assert!(filter.matches(&row, today));

        let filter = ServiceFilter {
            search: Some("backup".to_string()),
            status: StatusFilter::Any,
        };
        assert!(!filter.matches(&row, today));
    }

    #[test]
    fn vendor_search_covers_name_contact_and_email() {
        let row = vendor("Acme Networks", "Jordan Reyes", "jordan@acme.example", VendorStatus::Active);

        for needle in ["acme", "jordan", "ACME.EXAMPLE"] {
            let filter = VendorFilter {
                search: Some(needle.to_string()),
                status: VendorStatusFilter::Any,
            };
            assert!(filter.matches(&row), "needle {:?} should match", needle);
        }

        let filter = VendorFilter {
            search: Some("globex".to_string()),
            status: VendorStatusFilter::Any,
        };
        assert!(!filter.matches(&row));
    }

    #[test]
    fn vendor_status_filter_is_exact() {
        let active = vendor("Acme", "Jordan", "j@acme.example", VendorStatus::Active);
        let inactive = vendor("Globex", "Sam", "s@globex.example", VendorStatus::Inactive);

        let filter = VendorFilter {
            search: None,
            status: VendorStatusFilter::Inactive,
        };
        assert!(!filter.matches(&active));
        assert!(filter.matches(&inactive));
    }

    #[test]
    fn filter_services_keeps_order() {
        let today = date(2024, 6, 1);
        let rows = vec![
            service(1, "alpha", date(2024, 5, 1), date(2024, 5, 1), None),
            service(2, "beta", date(2024, 12, 31), date(2024, 12, 31), None),
            service(3, "gamma", date(2024, 4, 1), date(2024, 4, 1), None),
        ];
        let filter = ServiceFilter {
            search: None,
            status: StatusFilter::Expired,
        };
        let hits = filter_services(&rows, &filter, today);
        let ids: Vec<i64> = hits.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
