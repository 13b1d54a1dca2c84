//! Duplicate-bill detection
//!
//! A bounded lookback over recently updated bills, matching on the exact
//! reference number. The check is read-only and not atomic with the create
//! that follows it: two concurrent callers can both pass and both post.
//! The gateway does not enforce reference-number uniqueness, so this is a
//! guard against re-entry, not a uniqueness guarantee.

use crate::clients::{pagination, ConductorClient};
use crate::endpoints;
use crate::error::Result;
use chrono::{Months, Utc};
use ledger_types::Bill;
use std::sync::Arc;

pub struct DuplicateDetector {
    gateway: Arc<ConductorClient>,
    window_months: u32,
    page_cap: usize,
}

impl DuplicateDetector {
    pub fn new(gateway: Arc<ConductorClient>, window_months: u32, page_cap: usize) -> Self {
        Self {
            gateway,
            window_months,
            page_cap,
        }
    }

    /// First recently updated bill whose reference number matches exactly,
    /// case-sensitively. `vendor_id` narrows the scan server-side when the
    /// caller already knows the vendor.
    pub async fn find_by_ref(
        &self,
        ref_number: &str,
        vendor_id: Option<&str>,
    ) -> Result<Option<Bill>> {
        let today = Utc::now().date_naive();
        let updated_after = today
            .checked_sub_months(Months::new(self.window_months))
            .unwrap_or(today);

        let mut query = vec![("updatedAfter".to_string(), updated_after.to_string())];
        if let Some(vendor_id) = vendor_id {
            query.push(("vendorIds".to_string(), vendor_id.to_string()));
        }

        let bills: Vec<Bill> =
            pagination::list_all(&self.gateway, endpoints::BILLS, &query, self.page_cap).await?;

        log::debug!(
            "Duplicate scan for ref {} covered {} bills updated since {}",
            ref_number,
            bills.len(),
            updated_after
        );

        Ok(bills
            .into_iter()
            .find(|bill| bill.ref_number.as_deref() == Some(ref_number)))
    }
}
