//! Cursor pagination over the gateway's list endpoints
//!
//! Every list response is an envelope of the form
//! `{ "data": [...], "nextCursor": "..." }` where the cursor is absent on
//! the last page. All multi-page reads in the crate go through here; no
//! caller touches cursors directly.

use crate::clients::ConductorClient;
use crate::error::Result;
use ledger_types::Page;
use serde::de::DeserializeOwned;

/// Fetch every page of a list endpoint, following `nextCursor` until the
/// server stops issuing one or `page_cap` pages have been fetched.
///
/// Hitting the cap truncates silently: partial results are still useful,
/// and a misbehaving server that issues cursors forever must not hang the
/// caller. Any page failing to fetch or parse fails the whole read.
pub async fn list_all<T: DeserializeOwned>(
    client: &ConductorClient,
    path: &str,
    query: &[(String, String)],
    page_cap: usize,
) -> Result<Vec<T>> {
    let mut records = Vec::new();
    let mut cursor: Option<String> = None;

    for page_index in 0..page_cap {
        let mut params: Vec<(String, String)> = query.to_vec();
        if let Some(ref c) = cursor {
            params.push(("cursor".to_string(), c.clone()));
        }

        let value = client.get(path, &params).await?;
        let page: Page<T> = serde_json::from_value(value)?;
        records.extend(page.data);

        // An empty cursor string means the same as no cursor at all.
        cursor = page.next_cursor.filter(|c| !c.is_empty());
        if cursor.is_none() {
            break;
        }

        if page_index + 1 == page_cap {
            log::debug!(
                "Page cap of {} reached for {}, truncating result set",
                page_cap,
                path
            );
        }
    }

    Ok(records)
}
