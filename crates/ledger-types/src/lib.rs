//! Shared types for the QuickBooks Desktop ledger client
//!
//! Everything here mirrors the gateway's wire format: camelCase field names,
//! decimal amounts carried as strings, cursor-paginated list envelopes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_true() -> bool {
    true
}

/// Reference to another QuickBooks object (vendor, account, item, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Connection state of one integration on an end-user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationConnection {
    pub id: String,
    pub integration_slug: String,
    #[serde(default)]
    pub last_request_at: Option<DateTime<Utc>>,
}

/// One tenant connection on the gateway. Created by the external
/// authentication flow; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndUser {
    pub id: String,
    pub company_name: String,
    #[serde(default)]
    pub source_id: Option<String>,
    #[serde(default)]
    pub integration_connections: Vec<IntegrationConnection>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A vendor as stored in the company file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: String,
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A customer as stored in the company file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Expense line on a bill, posted directly against an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseLine {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub account: Option<EntityRef>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
}

/// Item line on a bill or purchase order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemLine {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub item: Option<EntityRef>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One bill line. The wire format keeps expense and item lines in two
/// separate arrays; [`Bill`] folds them into a single tagged list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BillLine {
    Expense(ExpenseLine),
    Item(ItemLine),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBill {
    id: String,
    #[serde(default)]
    ref_number: Option<String>,
    #[serde(default)]
    transaction_date: Option<NaiveDate>,
    #[serde(default)]
    vendor: Option<EntityRef>,
    #[serde(default)]
    total_amount: Option<String>,
    #[serde(default)]
    expense_lines: Vec<ExpenseLine>,
    #[serde(default)]
    item_lines: Vec<ItemLine>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

/// A vendor bill as returned by the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawBill", into = "RawBill")]
pub struct Bill {
    pub id: String,
    pub ref_number: Option<String>,
    pub transaction_date: Option<NaiveDate>,
    pub vendor: Option<EntityRef>,
    pub total_amount: Option<String>,
    pub lines: Vec<BillLine>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<RawBill> for Bill {
    fn from(raw: RawBill) -> Self {
        // Expense lines first, item lines after, each group in wire order.
        let mut lines: Vec<BillLine> = raw
            .expense_lines
            .into_iter()
            .map(BillLine::Expense)
            .collect();
        lines.extend(raw.item_lines.into_iter().map(BillLine::Item));
        Self {
            id: raw.id,
            ref_number: raw.ref_number,
            transaction_date: raw.transaction_date,
            vendor: raw.vendor,
            total_amount: raw.total_amount,
            lines,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        }
    }
}

impl From<Bill> for RawBill {
    fn from(bill: Bill) -> Self {
        let mut expense_lines = Vec::new();
        let mut item_lines = Vec::new();
        for line in bill.lines {
            match line {
                BillLine::Expense(l) => expense_lines.push(l),
                BillLine::Item(l) => item_lines.push(l),
            }
        }
        Self {
            id: bill.id,
            ref_number: bill.ref_number,
            transaction_date: bill.transaction_date,
            vendor: bill.vendor,
            total_amount: bill.total_amount,
            expense_lines,
            item_lines,
            created_at: bill.created_at,
            updated_at: bill.updated_at,
        }
    }
}

/// Line on a customer invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub item: Option<EntityRef>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub rate: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A customer invoice as returned by the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    #[serde(default)]
    pub ref_number: Option<String>,
    #[serde(default)]
    pub transaction_date: Option<NaiveDate>,
    #[serde(default)]
    pub customer: Option<EntityRef>,
    #[serde(default)]
    pub total_amount: Option<String>,
    #[serde(default)]
    pub lines: Vec<InvoiceLine>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A purchase order as returned by the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub id: String,
    #[serde(default)]
    pub ref_number: Option<String>,
    #[serde(default)]
    pub transaction_date: Option<NaiveDate>,
    #[serde(default)]
    pub vendor: Option<EntityRef>,
    #[serde(default)]
    pub total_amount: Option<String>,
    #[serde(default)]
    pub is_fully_received: bool,
    #[serde(default)]
    pub is_manually_closed: bool,
    #[serde(default)]
    pub lines: Vec<ItemLine>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PurchaseOrder {
    /// A purchase order stays linkable while it is neither fully received
    /// nor manually closed. The two flags are independent on the wire.
    pub fn is_active(&self) -> bool {
        !self.is_fully_received && !self.is_manually_closed
    }
}

/// Expense line input for a new bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseLineInput {
    pub account_id: String,
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// Item line input for a new bill or purchase order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemLineInput {
    pub item_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

/// One line of bill input, split back into the two wire arrays on send
#[derive(Debug, Clone, PartialEq)]
pub enum BillLineInput {
    Expense(ExpenseLineInput),
    Item(ItemLineInput),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBillCreate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vendor_id: Option<String>,
    transaction_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ref_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    memo: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    link_to_transaction_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    expense_lines: Vec<ExpenseLineInput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    item_lines: Vec<ItemLineInput>,
}

/// Input for posting a new bill. `vendor_id` is optional at the type level
/// so a missing vendor surfaces as a policy error instead of a parse error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawBillCreate", into = "RawBillCreate")]
pub struct BillCreate {
    pub vendor_id: Option<String>,
    pub transaction_date: NaiveDate,
    pub ref_number: Option<String>,
    pub memo: Option<String>,
    /// Transaction ids (typically purchase orders) the bill should be
    /// linked against in the company file.
    pub link_to_transaction_ids: Vec<String>,
    pub lines: Vec<BillLineInput>,
}

impl From<RawBillCreate> for BillCreate {
    fn from(raw: RawBillCreate) -> Self {
        let mut lines: Vec<BillLineInput> = raw
            .expense_lines
            .into_iter()
            .map(BillLineInput::Expense)
            .collect();
        lines.extend(raw.item_lines.into_iter().map(BillLineInput::Item));
        Self {
            vendor_id: raw.vendor_id,
            transaction_date: raw.transaction_date,
            ref_number: raw.ref_number,
            memo: raw.memo,
            link_to_transaction_ids: raw.link_to_transaction_ids,
            lines,
        }
    }
}

impl From<BillCreate> for RawBillCreate {
    fn from(input: BillCreate) -> Self {
        let mut expense_lines = Vec::new();
        let mut item_lines = Vec::new();
        for line in input.lines {
            match line {
                BillLineInput::Expense(l) => expense_lines.push(l),
                BillLineInput::Item(l) => item_lines.push(l),
            }
        }
        Self {
            vendor_id: input.vendor_id,
            transaction_date: input.transaction_date,
            ref_number: input.ref_number,
            memo: input.memo,
            link_to_transaction_ids: input.link_to_transaction_ids,
            expense_lines,
            item_lines,
        }
    }
}

/// Line input for a new invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLineInput {
    pub item_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<String>,
}

/// Input for posting a new invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceCreate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    pub transaction_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<InvoiceLineInput>,
}

/// Input for posting a new purchase order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderCreate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    pub transaction_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<ItemLineInput>,
}

/// One page of a cursor-paginated list response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Locally stored posting template for one vendor: how bills from that
/// vendor are typically coded. Maintained by hand, read-only at request
/// time. Accepts both camelCase and snake_case keys since the files are
/// human-edited; unknown keys are kept rather than dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorPattern {
    #[serde(alias = "vendor_id")]
    pub vendor_id: String,
    #[serde(default, alias = "vendor_name")]
    pub vendor_name: Option<String>,
    #[serde(default)]
    pub terms: Option<String>,
    #[serde(default, alias = "tax_code")]
    pub tax_code: Option<String>,
    #[serde(default, alias = "typical_accounts")]
    pub typical_accounts: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// What a mutating call did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogAction {
    Create,
    Update,
    Delete,
}

impl LogAction {
    /// Stable lowercase tag used in audit filenames
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Which kind of entity a mutating call touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEntity {
    Bill,
    Invoice,
    PurchaseOrder,
}

impl AuditEntity {
    /// Stable lowercase tag used in audit filenames
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bill => "bill",
            Self::Invoice => "invoice",
            Self::PurchaseOrder => "purchase_order",
        }
    }
}

/// Outcome tag on an audit record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    Success,
    Error,
}

/// Audit record of one mutating gateway call. Written once, never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub action: LogAction,
    pub entity: AuditEntity,
    pub endpoint: String,
    pub payload: serde_json::Value,
    pub response: serde_json::Value,
    pub status: LogStatus,
    #[serde(default)]
    pub ref_number: Option<String>,
    #[serde(default)]
    pub linked_entities: Vec<String>,
}
