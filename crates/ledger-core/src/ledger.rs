//! High-level orchestrating client
//!
//! Reads go straight to the gateway through the paginator. Every mutation
//! runs the guards it needs, posts through the request core, and lands in
//! the audit log whether the gateway accepted it or not. The audit write
//! always happens before an error is handed back.

use crate::audit::AuditLog;
use crate::clients::{pagination, ConductorClient};
use crate::config::LedgerConfig;
use crate::endpoints;
use crate::error::{LedgerError, Result};
use crate::guards::{DuplicateDetector, PoResolver};
use crate::patterns::PatternStore;
use chrono::{NaiveDate, Utc};
use ledger_types::{
    AuditEntity, Bill, BillCreate, Customer, EndUser, Invoice, InvoiceCreate, LogAction,
    LogEntry, LogStatus, PurchaseOrder, PurchaseOrderCreate, Vendor, VendorPattern,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// Per-call switches for the bill-creation guards. Both default to off,
/// which means full policy enforcement.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateBillOptions {
    /// Post even when no posting pattern exists for the vendor
    pub skip_pattern_check: bool,
    /// Post even when a recent bill carries the same reference number
    pub skip_duplicate_check: bool,
}

pub struct LedgerClient {
    gateway: Arc<ConductorClient>,
    patterns: PatternStore,
    duplicates: DuplicateDetector,
    purchase_orders: PoResolver,
    audit: AuditLog,
    page_cap: usize,
}

impl LedgerClient {
    /// Wire up every component from one validated configuration
    pub fn new(config: &LedgerConfig) -> Result<Self> {
        let gateway = Arc::new(ConductorClient::new(config.conductor.clone())?);

        Ok(Self {
            patterns: PatternStore::new(&config.patterns_dir),
            duplicates: DuplicateDetector::new(
                gateway.clone(),
                config.duplicate_window_months,
                config.page_cap,
            ),
            purchase_orders: PoResolver::new(gateway.clone(), config.page_cap),
            audit: AuditLog::new(&config.logs_dir)?,
            page_cap: config.page_cap,
            gateway,
        })
    }

    /// Probe the gateway with the configured credentials
    pub async fn check_connection(&self) -> Result<bool> {
        self.gateway.check_connection().await
    }

    /// The tenant record this client is bound to
    pub async fn end_user(&self) -> Result<EndUser> {
        let path = format!("{}/{}", endpoints::END_USERS, self.gateway.end_user_id());
        let value = self.gateway.get(&path, &[]).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn list_vendors(&self) -> Result<Vec<Vendor>> {
        pagination::list_all(&self.gateway, endpoints::VENDORS, &[], self.page_cap).await
    }

    pub async fn get_vendor(&self, vendor_id: &str) -> Result<Vendor> {
        let path = format!("{}/{}", endpoints::VENDORS, vendor_id);
        let value = self.gateway.get(&path, &[]).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        pagination::list_all(&self.gateway, endpoints::CUSTOMERS, &[], self.page_cap).await
    }

    /// Bills, optionally narrowed to one vendor and a lower bound on the
    /// update time. Both filters are applied server-side.
    pub async fn list_bills(
        &self,
        vendor_id: Option<&str>,
        updated_after: Option<NaiveDate>,
    ) -> Result<Vec<Bill>> {
        let mut query = Vec::new();
        if let Some(vendor_id) = vendor_id {
            query.push(("vendorIds".to_string(), vendor_id.to_string()));
        }
        if let Some(updated_after) = updated_after {
            query.push(("updatedAfter".to_string(), updated_after.to_string()));
        }
        pagination::list_all(&self.gateway, endpoints::BILLS, &query, self.page_cap).await
    }

    pub async fn get_bill(&self, bill_id: &str) -> Result<Bill> {
        let path = format!("{}/{}", endpoints::BILLS, bill_id);
        let value = self.gateway.get(&path, &[]).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn list_invoices(&self, customer_id: Option<&str>) -> Result<Vec<Invoice>> {
        let mut query = Vec::new();
        if let Some(customer_id) = customer_id {
            query.push(("customerIds".to_string(), customer_id.to_string()));
        }
        pagination::list_all(&self.gateway, endpoints::INVOICES, &query, self.page_cap).await
    }

    pub async fn list_purchase_orders(
        &self,
        vendor_id: Option<&str>,
    ) -> Result<Vec<PurchaseOrder>> {
        let mut query = Vec::new();
        if let Some(vendor_id) = vendor_id {
            query.push(("vendorIds".to_string(), vendor_id.to_string()));
        }
        pagination::list_all(
            &self.gateway,
            endpoints::PURCHASE_ORDERS,
            &query,
            self.page_cap,
        )
        .await
    }

    /// See [`PoResolver::find_active`]
    pub async fn find_active_purchase_order(
        &self,
        vendor_id: &str,
        po_number: &str,
    ) -> Result<Option<PurchaseOrder>> {
        self.purchase_orders.find_active(vendor_id, po_number).await
    }

    /// See [`PoResolver::list_active`]
    pub async fn list_active_purchase_orders(
        &self,
        vendor_id: &str,
    ) -> Result<Vec<PurchaseOrder>> {
        self.purchase_orders.list_active(vendor_id).await
    }

    /// See [`DuplicateDetector::find_by_ref`]
    pub async fn find_duplicate_bill(
        &self,
        ref_number: &str,
        vendor_id: Option<&str>,
    ) -> Result<Option<Bill>> {
        self.duplicates.find_by_ref(ref_number, vendor_id).await
    }

    pub fn vendor_pattern(&self, vendor_id: &str) -> Result<Option<VendorPattern>> {
        self.patterns.find(vendor_id)
    }

    pub fn list_vendor_patterns(&self) -> Result<Vec<VendorPattern>> {
        self.patterns.list()
    }

    /// Create a bill under full posting policy:
    ///
    /// 1. the input must name a vendor;
    /// 2. a posting pattern must exist for that vendor;
    /// 3. no recently updated bill of that vendor may carry the same
    ///    reference number.
    ///
    /// Guards 2 and 3 can be switched off per call via `opts`; the vendor
    /// requirement cannot. A bill without a reference number skips the
    /// duplicate check since there is nothing to match on. The duplicate
    /// check races with concurrent creators, see [`DuplicateDetector`].
    pub async fn create_bill(&self, input: &BillCreate, opts: CreateBillOptions) -> Result<Bill> {
        let vendor_id = input
            .vendor_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(LedgerError::MissingVendor)?;

        if opts.skip_pattern_check {
            log::warn!("Pattern check skipped for vendor {}", vendor_id);
        } else if !self.patterns.exists(vendor_id)? {
            return Err(LedgerError::NoVendorPattern {
                vendor_id: vendor_id.to_string(),
            });
        }

        if let Some(ref_number) = input.ref_number.as_deref() {
            if opts.skip_duplicate_check {
                log::warn!("Duplicate check skipped for ref {}", ref_number);
            } else if let Some(existing) = self
                .duplicates
                .find_by_ref(ref_number, Some(vendor_id))
                .await?
            {
                return Err(LedgerError::DuplicateBill {
                    ref_number: ref_number.to_string(),
                    existing: Box::new(existing),
                });
            }
        }

        log::info!(
            "Creating bill for vendor {} (ref {:?}, {} linked transactions)",
            vendor_id,
            input.ref_number,
            input.link_to_transaction_ids.len()
        );

        let value = self
            .submit(Mutation {
                action: LogAction::Create,
                entity: AuditEntity::Bill,
                endpoint: endpoints::BILLS.to_string(),
                payload: serde_json::to_value(input)?,
                ref_number: input.ref_number.clone(),
                linked_entities: input.link_to_transaction_ids.clone(),
            })
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Update a bill. The gateway takes updates as POST on the entity
    /// path, never PUT or PATCH. `changes` is passed through as-is.
    pub async fn update_bill(&self, bill_id: &str, changes: Value) -> Result<Bill> {
        let ref_number = changes
            .get("refNumber")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        let value = self
            .submit(Mutation {
                action: LogAction::Update,
                entity: AuditEntity::Bill,
                endpoint: format!("{}/{}", endpoints::BILLS, bill_id),
                payload: changes,
                ref_number,
                linked_entities: Vec::new(),
            })
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Delete a bill. Returns the gateway's deletion acknowledgement.
    pub async fn delete_bill(&self, bill_id: &str) -> Result<Value> {
        let endpoint = format!("{}/{}", endpoints::BILLS, bill_id);
        let outcome = self.gateway.delete(&endpoint).await;
        self.record_outcome(
            Mutation {
                action: LogAction::Delete,
                entity: AuditEntity::Bill,
                endpoint,
                payload: Value::Null,
                ref_number: None,
                linked_entities: Vec::new(),
            },
            outcome,
        )
    }

    /// Create an invoice. Invoices carry no guard policy; the call is
    /// audited like every other mutation.
    pub async fn create_invoice(&self, input: &InvoiceCreate) -> Result<Invoice> {
        let value = self
            .submit(Mutation {
                action: LogAction::Create,
                entity: AuditEntity::Invoice,
                endpoint: endpoints::INVOICES.to_string(),
                payload: serde_json::to_value(input)?,
                ref_number: input.ref_number.clone(),
                linked_entities: Vec::new(),
            })
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Create a purchase order. Audited, no guard policy.
    pub async fn create_purchase_order(
        &self,
        input: &PurchaseOrderCreate,
    ) -> Result<PurchaseOrder> {
        let value = self
            .submit(Mutation {
                action: LogAction::Create,
                entity: AuditEntity::PurchaseOrder,
                endpoint: endpoints::PURCHASE_ORDERS.to_string(),
                payload: serde_json::to_value(input)?,
                ref_number: input.ref_number.clone(),
                linked_entities: Vec::new(),
            })
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// One mutating POST, recorded in the audit log regardless of outcome
    async fn submit(&self, mutation: Mutation) -> Result<Value> {
        let outcome = self
            .gateway
            .post(&mutation.endpoint, &mutation.payload)
            .await;
        self.record_outcome(mutation, outcome)
    }

    /// Write the audit record, then hand the outcome back. A failed audit
    /// write takes precedence over whatever the gateway said; the original
    /// outcome is still logged so it is not lost entirely.
    fn record_outcome(&self, mutation: Mutation, outcome: Result<Value>) -> Result<Value> {
        let (status, response) = match &outcome {
            Ok(value) => (LogStatus::Success, value.clone()),
            Err(e) => (LogStatus::Error, error_payload(e)),
        };

        let entry = LogEntry {
            timestamp: Utc::now(),
            action: mutation.action,
            entity: mutation.entity,
            endpoint: mutation.endpoint,
            payload: mutation.payload,
            response,
            status,
            ref_number: mutation.ref_number,
            linked_entities: mutation.linked_entities,
        };

        if let Err(audit_err) = self.audit.record(&entry) {
            log::error!(
                "Audit write failed after {} {} on {}: {}; gateway outcome was {:?}",
                entry.action.as_str(),
                entry.entity.as_str(),
                entry.endpoint,
                audit_err,
                entry.status
            );
            return Err(audit_err);
        }

        outcome
    }
}

/// One mutating call as the audit log will describe it
struct Mutation {
    action: LogAction,
    entity: AuditEntity,
    endpoint: String,
    payload: Value,
    ref_number: Option<String>,
    linked_entities: Vec<String>,
}

/// Shape an error into the JSON payload an audit record holds
fn error_payload(error: &LedgerError) -> Value {
    match error {
        LedgerError::Api {
            status,
            message,
            body,
        } => json!({
            "status": status,
            "message": message,
            "body": body,
        }),
        other => json!({ "message": other.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_payload_keeps_api_body() {
        let err = LedgerError::Api {
            status: 422,
            message: "refNumber is invalid".to_string(),
            body: json!({ "error": { "type": "invalid_request" } }),
        };
        let payload = error_payload(&err);
        assert_eq!(payload["status"], 422);
        assert_eq!(payload["body"]["error"]["type"], "invalid_request");
    }

    #[test]
    fn test_error_payload_flattens_other_errors() {
        let payload = error_payload(&LedgerError::MissingVendor);
        assert!(payload["message"].as_str().unwrap().contains("vendor"));
    }
}
