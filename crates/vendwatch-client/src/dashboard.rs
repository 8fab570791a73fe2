//! Dashboard aggregate
//!
//! The backend has no dashboard endpoint; the web UI assembled its overview
//! from the count fields of the filtered service views plus the first page of
//! vendors. This reproduces that aggregate for terminal use.

use serde::{Deserialize, Serialize};
use vendwatch_core::model::{PageRequest, Vendor};

use crate::error::ClientResult;
use crate::http::VendorClient;

/// Number of vendors shown in the dashboard's recent list
const RECENT_VENDORS: u32 = 5;

/// Snapshot of the headline numbers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_vendors: u64,
    pub active_services: u64,
    pub expiring_soon: u64,
    pub payment_due: u64,
    pub expired_services: u64,
    /// Most recently added vendors
    pub recent_vendors: Vec<Vendor>,
}

impl VendorClient {
    /// Assemble the dashboard snapshot from the count endpoints
    pub async fn dashboard(&self) -> ClientResult<DashboardSummary> {
        let vendors = self.list_vendors(PageRequest::first(RECENT_VENDORS)).await?;
        let active = self.active_services(PageRequest::first(1)).await?;
        let expiring = self.expiring_soon(PageRequest::first(1)).await?;
        let payment_due = self.payment_due_soon(PageRequest::first(1)).await?;
        let expired = self.expired_services(PageRequest::first(1)).await?;

        Ok(DashboardSummary {
            total_vendors: vendors.count,
            active_services: active.count,
            expiring_soon: expiring.count,
            payment_due: payment_due.count,
            expired_services: expired.count,
            recent_vendors: vendors.results,
        })
    }
}
