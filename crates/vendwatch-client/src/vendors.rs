//! Vendor endpoints

use reqwest::Method;
use vendwatch_core::model::{Page, PageRequest, Vendor, VendorPayload, VendorWithActiveServices};

use crate::error::ClientResult;
use crate::http::VendorClient;

impl VendorClient {
    /// List vendors, newest first
    pub async fn list_vendors(&self, page: PageRequest) -> ClientResult<Page<Vendor>> {
        self.request_json(Method::GET, "/vendors/", Some(&page.query()), None)
            .await
    }

    /// Fetch one vendor with its nested services
    pub async fn get_vendor(&self, id: i64) -> ClientResult<Vendor> {
        self.request_json(Method::GET, &format!("/vendors/{}/", id), None, None)
            .await
    }

    /// Create a vendor
    pub async fn create_vendor(&self, payload: &VendorPayload) -> ClientResult<Vendor> {
        self.request_json(
            Method::POST,
            "/vendors/",
            None,
            Some(serde_json::to_value(payload)?),
        )
        .await
    }

    /// Update a vendor in place
    pub async fn update_vendor(&self, id: i64, payload: &VendorPayload) -> ClientResult<Vendor> {
        self.request_json(
            Method::PATCH,
            &format!("/vendors/{}/", id),
            None,
            Some(serde_json::to_value(payload)?),
        )
        .await
    }

    /// Delete a vendor and all of its services
    pub async fn delete_vendor(&self, id: i64) -> ClientResult<()> {
        self.request_no_content(Method::DELETE, &format!("/vendors/{}/", id))
            .await
    }

    /// List vendors annotated with their currently active services
    pub async fn list_vendors_with_active_services(
        &self,
        page: PageRequest,
    ) -> ClientResult<Page<VendorWithActiveServices>> {
        self.request_json(
            Method::GET,
            "/vendors/list_with_active_services/",
            Some(&page.query()),
            None,
        )
        .await
    }
}
