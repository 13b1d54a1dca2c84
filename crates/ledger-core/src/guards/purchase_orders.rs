//! Active purchase-order resolution
//!
//! QuickBooks keeps two independent closure flags on a purchase order. A
//! bill may only be linked against orders that are still open under both,
//! which is what [`PurchaseOrder::is_active`] encodes.

use crate::clients::{pagination, ConductorClient};
use crate::endpoints;
use crate::error::Result;
use ledger_types::PurchaseOrder;
use std::sync::Arc;

pub struct PoResolver {
    gateway: Arc<ConductorClient>,
    page_cap: usize,
}

impl PoResolver {
    pub fn new(gateway: Arc<ConductorClient>, page_cap: usize) -> Self {
        Self { gateway, page_cap }
    }

    async fn vendor_orders(&self, vendor_id: &str) -> Result<Vec<PurchaseOrder>> {
        let query = vec![("vendorIds".to_string(), vendor_id.to_string())];
        pagination::list_all(
            &self.gateway,
            endpoints::PURCHASE_ORDERS,
            &query,
            self.page_cap,
        )
        .await
    }

    /// First purchase order of the vendor whose reference number matches
    /// exactly and which is still active. Closed orders with a matching
    /// number are passed over, not reported.
    pub async fn find_active(
        &self,
        vendor_id: &str,
        po_number: &str,
    ) -> Result<Option<PurchaseOrder>> {
        let orders = self.vendor_orders(vendor_id).await?;
        Ok(orders
            .into_iter()
            .find(|po| po.ref_number.as_deref() == Some(po_number) && po.is_active()))
    }

    /// All active purchase orders of the vendor, in server order
    pub async fn list_active(&self, vendor_id: &str) -> Result<Vec<PurchaseOrder>> {
        let orders = self.vendor_orders(vendor_id).await?;
        Ok(orders
            .into_iter()
            .filter(PurchaseOrder::is_active)
            .collect())
    }
}
