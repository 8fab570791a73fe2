//! Service endpoints
//!
//! Besides plain CRUD the backend exposes filtered views (expiring soon,
//! payment due, active, expired), a color-grouped summary, and a reminder
//! sweep that emails vendors about upcoming deadlines.

use std::collections::HashMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vendwatch_core::model::{ColorGroup, Page, PageRequest, Service, ServicePayload};
use vendwatch_core::reminder::ReminderSummary;
use vendwatch_core::status::StatusColor;

use crate::error::ClientResult;
use crate::http::VendorClient;

/// Response of the reminder sweep endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderOutcome {
    /// Human-readable confirmation line
    pub message: String,
    /// Counts of flagged services and sent emails
    pub summary: ReminderSummary,
}

impl VendorClient {
    /// List services, newest first
    pub async fn list_services(&self, page: PageRequest) -> ClientResult<Page<Service>> {
        self.request_json(Method::GET, "/services/", Some(&page.query()), None)
            .await
    }

    /// Fetch one service
    pub async fn get_service(&self, id: i64) -> ClientResult<Service> {
        self.request_json(Method::GET, &format!("/services/{}/", id), None, None)
            .await
    }

    /// Create a service under a vendor
    pub async fn create_service(&self, payload: &ServicePayload) -> ClientResult<Service> {
        self.request_json(
            Method::POST,
            "/services/",
            None,
            Some(serde_json::to_value(payload)?),
        )
        .await
    }

    /// Update a service in place
    pub async fn update_service(&self, id: i64, payload: &ServicePayload) -> ClientResult<Service> {
        self.request_json(
            Method::PATCH,
            &format!("/services/{}/", id),
            None,
            Some(serde_json::to_value(payload)?),
        )
        .await
    }

    /// Delete a service
    pub async fn delete_service(&self, id: i64) -> ClientResult<()> {
        self.request_no_content(Method::DELETE, &format!("/services/{}/", id))
            .await
    }

    /// Services whose expiry date falls within the server's alert window
    pub async fn expiring_soon(&self, page: PageRequest) -> ClientResult<Page<Service>> {
        self.request_json(
            Method::GET,
            "/services/expiring_soon/",
            Some(&page.query()),
            None,
        )
        .await
    }

    /// Services whose payment due date falls within the server's alert window
    pub async fn payment_due_soon(&self, page: PageRequest) -> ClientResult<Page<Service>> {
        self.request_json(
            Method::GET,
            "/services/payment_due_soon/",
            Some(&page.query()),
            None,
        )
        .await
    }

    /// Services that have not yet expired
    pub async fn active_services(&self, page: PageRequest) -> ClientResult<Page<Service>> {
        self.request_json(
            Method::GET,
            "/services/active_services/",
            Some(&page.query()),
            None,
        )
        .await
    }

    /// Services whose expiry date has passed
    pub async fn expired_services(&self, page: PageRequest) -> ClientResult<Page<Service>> {
        self.request_json(
            Method::GET,
            "/services/expired_services/",
            Some(&page.query()),
            None,
        )
        .await
    }

    /// Services grouped by their stored status color
    pub async fn services_by_color(&self) -> ClientResult<HashMap<StatusColor, ColorGroup>> {
        self.request_json(Method::GET, "/services/services_by_color/", None, None)
            .await
    }

    /// Run the reminder sweep for deadlines within `days` days
    pub async fn check_reminders(&self, days: i64) -> ClientResult<ReminderOutcome> {
        self.request_json(
            Method::POST,
            "/services/check_reminders/",
            None,
            Some(serde_json::json!({ "days": days })),
        )
        .await
    }
}
