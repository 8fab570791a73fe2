use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{Service, Vendor};

/// A service flagged by the reminder sweep, with the reasons it was flagged
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderFlag {
    /// The flagged service
    pub service: Service,
    /// Expiry date falls inside the window
    pub expiring: bool,
    /// Payment due date falls inside the window
    pub payment_due: bool,
}

/// Outcome of a reminder sweep as reported by the backend.
///
/// The two count fields arrived later than the rest of the payload, so they
/// default to zero when a backend omits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSummary {
    /// Distinct services flagged in this sweep
    pub total_services_flagged: u64,
    /// Notification emails delivered
    pub emails_sent: u64,
    /// Notification emails that errored
    pub emails_failed: u64,
    /// Services inside the expiry window
    #[serde(default)]
    pub expiring_count: u64,
    /// Services inside the payment window
    #[serde(default)]
    pub payment_due_count: u64,
}

impl ReminderSummary {
    /// Summarize locally computed flags; no emails are involved
    pub fn from_flags(flags: &[ReminderFlag]) -> Self {
        Self {
            total_services_flagged: flags.len() as u64,
            emails_sent: 0,
            emails_failed: 0,
            expiring_count: flags.iter().filter(|f| f.expiring).count() as u64,
            payment_due_count: flags.iter().filter(|f| f.payment_due).count() as u64,
        }
    }
}

/// Sweep services for expiry and payment dates inside the inclusive window
/// `[today, today + window_days]`.
///
/// A service matching both checks appears once with both reasons set.
/// Expiring services come first, matching the order the backend reports.
pub fn flag_due_services(
    services: &[Service],
    today: NaiveDate,
    window_days: i64,
) -> Vec<ReminderFlag> {
    let mut flags: Vec<ReminderFlag> = Vec::new();

    for service in services {
        if service.is_expiring_within(today, window_days) {
            flags.push(ReminderFlag {
                service: service.clone(),
                expiring: true,
                payment_due: false,
            });
        }
    }

    for service in services {
        if !service.is_payment_due_within(today, window_days) {
            continue;
        }
        match flags.iter_mut().find(|f| f.service.id == service.id) {
            Some(flag) => flag.payment_due = true,
            None => flags.push(ReminderFlag {
                service: service.clone(),
                expiring: false,
                payment_due: true,
            }),
        }
    }

    flags
}

/// Rendered reminder notice matching what the backend emails out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderNotice {
    /// Vendor contact address the backend delivers to
    pub recipient: String,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub body: String,
}

impl ReminderNotice {
    /// Render the notice the backend would send for a flag.
    ///
    /// `vendor` must be the owner of the flagged service; it supplies the
    /// salutation and the recipient address.
    pub fn build(flag: &ReminderFlag, vendor: &Vendor, today: NaiveDate) -> Self {
        let service = &flag.service;

        let mut subjects = Vec::new();
        if flag.expiring {
            subjects.push(format!(
                "Service Expiring in {} days",
                service.days_until_expiry(today)
            ));
        }
        if flag.payment_due {
            subjects.push(format!(
                "Payment Due in {} days",
                service.days_until_payment(today)
            ));
        }
        let subject = format!("Vendor Management Alert: {}", subjects.join(" & "));

        let mut lines = vec![
            format!("Dear {},", vendor.contact_person),
            String::new(),
            format!(
                "This is a reminder regarding the service '{}' for vendor '{}'.",
                service.service_name, vendor.name
            ),
            String::new(),
        ];

        if flag.expiring {
            lines.push(format!(
                "⚠️ EXPIRY ALERT: This service will expire on {} ({} days from now).",
                service.expiry_date.format("%Y-%m-%d"),
                service.days_until_expiry(today)
            ));
            lines.push(String::new());
        }

        if flag.payment_due {
            lines.push(format!(
                "💰 PAYMENT DUE: Payment of ${} is due on {} ({} days from now).",
                service.amount,
                service.payment_due_date.format("%Y-%m-%d"),
                service.days_until_payment(today)
            ));
            lines.push(String::new());
        }

        lines.extend([
            "Service Details:".to_string(),
            format!("  - Service Name: {}", service.service_name),
            format!("  - Start Date: {}", service.start_date.format("%Y-%m-%d")),
            format!("  - Expiry Date: {}", service.expiry_date.format("%Y-%m-%d")),
            format!(
                "  - Payment Due Date: {}",
                service.payment_due_date.format("%Y-%m-%d")
            ),
            format!("  - Amount: ${}", service.amount),
            String::new(),
            "Please take necessary action.".to_string(),
            String::new(),
            "Best regards,".to_string(),
            "Vendor Management System".to_string(),
        ]);

        Self {
            recipient: vendor.email.clone(),
            subject,
            body: lines.join("\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VendorStatus;
    use crate::status::StatusColor;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service(id: i64, name: &str, expiry: NaiveDate, payment: NaiveDate) -> Service {
        let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Service {
            id,
            vendor: 1,
            service_name: name.to_string(),
            start_date: date(2024, 1, 1),
            expiry_date: expiry,
            payment_due_date: payment,
            amount: dec!(1499.00),
            server_status: String::new(),
            vendor_name: "Acme Networks".to_string(),
            status_color: Some(StatusColor::Yellow),
            created_at: stamp,
            updated_at: stamp,
        }
    }

    fn vendor() -> Vendor {
        let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Vendor {
            id: 1,
            name: "Acme Networks".to_string(),
            contact_person: "Jordan Reyes".to_string(),
            email: "jordan@acme.example".to_string(),
            phone: "555-0101".to_string(),
            status: VendorStatus::Active,
            services: Vec::new(),
            active_services_count: 0,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn sweep_flags_each_service_once() {
        let today = date(2024, 6, 1);
        let rows = vec![
            // Both expiry and payment inside the window
            service(1, "both", date(2024, 6, 5), date(2024, 6, 10)),
            // Expiry only
            service(2, "expiring", date(2024, 6, 12), date(2024, 12, 1)),
            // Payment only
            service(3, "payment", date(2024, 12, 1), date(2024, 6, 14)),
            // Outside the window
            service(4, "quiet", date(2024, 12, 1), date(2024, 12, 1)),
            // Already past, not flagged
            service(5, "past", date(2024, 5, 20), date(2024, 5, 20)),
        ];

        let flags = flag_due_services(&rows, today, 15);
        assert_eq!(flags.len(), 3);

        let both = flags.iter().find(|f| f.service.id == 1).unwrap();
        assert!(both.expiring && both.payment_due);

        let expiring = flags.iter().find(|f| f.service.id == 2).unwrap();
        assert!(expiring.expiring && !expiring.payment_due);

        let payment = flags.iter().find(|f| f.service.id == 3).unwrap();
        assert!(!payment.expiring && payment.payment_due);
    }

    #[test]
    fn sweep_lists_expiring_services_first() {
        let today = date(2024, 6, 1);
        let rows = vec![
            service(1, "payment-only", date(2024, 12, 1), date(2024, 6, 10)),
            service(2, "expiring", date(2024, 6, 5), date(2024, 12, 1)),
        ];

        let flags = flag_due_services(&rows, today, 15);
        let ids: Vec<i64> = flags.iter().map(|f| f.service.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn summary_counts_reasons_not_flags() {
        let today = date(2024, 6, 1);
        let rows = vec![
            service(1, "both", date(2024, 6, 5), date(2024, 6, 10)),
            service(2, "expiring", date(2024, 6, 12), date(2024, 12, 1)),
        ];

        let summary = ReminderSummary::from_flags(&flag_due_services(&rows, today, 15));
        assert_eq!(summary.total_services_flagged, 2);
        assert_eq!(summary.expiring_count, 2);
        assert_eq!(summary.payment_due_count, 1);
        assert_eq!(summary.emails_sent, 0);
    }

    #[test]
    fn summary_decodes_short_backend_payload() {
        let json = r#"{"total_services_flagged": 4, "emails_sent": 3, "emails_failed": 1}"#;
        let summary: ReminderSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.total_services_flagged, 4);
        assert_eq!(summary.expiring_count, 0);
    }

    #[test]
    fn notice_subject_joins_reasons() {
        let today = date(2024, 6, 1);
        let flag = ReminderFlag {
            service: service(1, "CDN contract", date(2024, 6, 5), date(2024, 6, 10)),
            expiring: true,
            payment_due: true,
        };

        let notice = ReminderNotice::build(&flag, &vendor(), today);
        assert_eq!(
            notice.subject,
            "Vendor Management Alert: Service Expiring in 4 days & Payment Due in 9 days"
        );
        assert_eq!(notice.recipient, "jordan@acme.example");
    }

    #[test]
    fn notice_body_carries_salutation_and_details() {
        let today = date(2024, 6, 1);
        let flag = ReminderFlag {
            service: service(1, "CDN contract", date(2024, 6, 5), date(2024, 12, 1)),
            expiring: true,
            payment_due: false,
        };

        let notice = ReminderNotice::build(&flag, &vendor(), today);
        assert!(notice.body.starts_with("Dear Jordan Reyes,"));
        assert!(notice
            .body
            .contains("This service will expire on 2024-06-05 (4 days from now)."));
        assert!(notice.body.contains("  - Amount: $1499.00"));
        assert!(notice.body.ends_with("Vendor Management System"));
        assert!(!notice.body.contains("PAYMENT DUE"));
    }
}
