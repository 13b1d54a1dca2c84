//! Gateway endpoint paths
//!
//! All QuickBooks Desktop data hangs off one prefix; end-user records live
//! at the top level of the API.

pub const END_USERS: &str = "/end-users";
pub const VENDORS: &str = "/quickbooks-desktop/vendors";
pub const CUSTOMERS: &str = "/quickbooks-desktop/customers";
pub const BILLS: &str = "/quickbooks-desktop/bills";
pub const INVOICES: &str = "/quickbooks-desktop/invoices";
pub const PURCHASE_ORDERS: &str = "/quickbooks-desktop/purchase-orders";
