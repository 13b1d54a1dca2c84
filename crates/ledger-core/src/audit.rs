//! Append-only audit log of mutating gateway calls
//!
//! One pretty-printed JSON file per call, written before the outcome is
//! handed back to the caller. Files are never rewritten or deleted. The
//! filename alone carries the action, entity, reference number and a
//! collision-proof UTC stamp, so a record can be located without opening
//! anything.

use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use ledger_types::LogEntry;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Longest sanitized reference number kept in a filename
const MAX_REF_LEN: usize = 40;
/// Placeholder for mutations that carry no reference number
const NO_REF: &str = "noref";

pub struct AuditLog {
    root_path: PathBuf,
}

impl AuditLog {
    /// Open the audit directory, creating it if needed
    pub fn new<P: AsRef<Path>>(root_path: P) -> Result<Self> {
        let root_path = root_path.as_ref().to_path_buf();

        fs::create_dir_all(&root_path).map_err(|e| {
            LedgerError::Audit(format!(
                "Failed to create log directory {:?}: {}",
                root_path, e
            ))
        })?;

        Ok(Self { root_path })
    }

    /// Persist one entry. Returns the path written. A failure here is a
    /// failure of the operation being audited: a mutation this system
    /// cannot account for must not look accounted for.
    pub fn record(&self, entry: &LogEntry) -> Result<PathBuf> {
        let path = self.root_path.join(file_name(entry));

        let json = serde_json::to_string_pretty(entry)
            .map_err(|e| LedgerError::Audit(format!("Failed to serialize log entry: {}", e)))?;

        fs::write(&path, json)
            .map_err(|e| LedgerError::Audit(format!("Failed to write {:?}: {}", path, e)))?;

        log::info!(
            "Audit: {} {} recorded to {:?}",
            entry.action.as_str(),
            entry.entity.as_str(),
            path
        );
        Ok(path)
    }

    /// All entries currently on disk, unordered. Malformed files are
    /// skipped so a partial write cannot block later reads.
    pub fn entries(&self) -> Result<Vec<LogEntry>> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(&self.root_path)? {
            let entry = entry?;

            let path = entry.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
                let json = fs::read_to_string(&path)?;
                if let Ok(parsed) = serde_json::from_str::<LogEntry>(&json) {
                    entries.push(parsed);
                } else {
                    log::warn!("Skipping malformed audit file {:?}", path);
                }
            }
        }

        Ok(entries)
    }
}

fn file_name(entry: &LogEntry) -> String {
    let ref_part = entry
        .ref_number
        .as_deref()
        .map(sanitize_ref)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| NO_REF.to_string());

    format!(
        "{}_{}_{}_{}_{}.json",
        entry.action.as_str(),
        entry.entity.as_str(),
        ref_part,
        file_stamp(entry.timestamp),
        short_suffix()
    )
}

/// Keep filenames safe no matter what a reference number contains:
/// anything outside a conservative alphabet becomes an underscore, and
/// the result is capped in length.
fn sanitize_ref(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_REF_LEN)
        .collect()
}

/// Filesystem-safe UTC stamp with millisecond precision
fn file_stamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%dT%H%M%S%3fZ").to_string()
}

/// Random suffix so two records in the same millisecond cannot collide
fn short_suffix() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_types::{AuditEntity, LogAction, LogStatus};
    use serde_json::json;
    use tempfile::TempDir;

    fn entry(ref_number: Option<&str>) -> LogEntry {
        LogEntry {
            timestamp: Utc::now(),
            action: LogAction::Create,
            entity: AuditEntity::Bill,
            endpoint: "/quickbooks-desktop/bills".to_string(),
            payload: json!({ "vendorId": "v-1" }),
            response: json!({ "id": "b-1" }),
            status: LogStatus::Success,
            ref_number: ref_number.map(str::to_string),
            linked_entities: vec![],
        }
    }

    #[test]
    fn test_record_writes_parseable_file() {
        let temp_dir = TempDir::new().unwrap();
        let audit = AuditLog::new(temp_dir.path()).unwrap();

        let path = audit.record(&entry(Some("312094"))).unwrap();
        assert!(path.exists());

        let content = fs::read_to_string(&path).unwrap();
        let parsed: LogEntry = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.ref_number.as_deref(), Some("312094"));
        assert_eq!(parsed.status, LogStatus::Success);
    }

    #[test]
    fn test_filename_carries_action_entity_and_ref() {
        let temp_dir = TempDir::new().unwrap();
        let audit = AuditLog::new(temp_dir.path()).unwrap();

        let path = audit.record(&entry(Some("312094"))).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("create_bill_312094_"));
        assert!(name.ends_with(".json"));
    }

    #[test]
    fn test_missing_ref_uses_placeholder() {
        let temp_dir = TempDir::new().unwrap();
        let audit = AuditLog::new(temp_dir.path()).unwrap();

        let path = audit.record(&entry(None)).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("create_bill_noref_"));
    }

    #[test]
    fn test_same_entry_twice_gets_two_files() {
        let temp_dir = TempDir::new().unwrap();
        let audit = AuditLog::new(temp_dir.path()).unwrap();

        let e = entry(Some("312094"));
        let first = audit.record(&e).unwrap();
        let second = audit.record(&e).unwrap();
        assert_ne!(first, second);
        assert_eq!(audit.entries().unwrap().len(), 2);
    }

    #[test]
    fn test_sanitize_replaces_hostile_characters() {
        assert_eq!(sanitize_ref("AP/2026 #17"), "AP_2026__17");
        assert_eq!(sanitize_ref("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_ref("INV-42.1"), "INV-42.1");
        assert_eq!(sanitize_ref(&"9".repeat(100)).len(), MAX_REF_LEN);
    }

    #[test]
    fn test_entries_skips_malformed_files() {
        let temp_dir = TempDir::new().unwrap();
        let audit = AuditLog::new(temp_dir.path()).unwrap();

        audit.record(&entry(Some("1"))).unwrap();
        fs::write(temp_dir.path().join("stray.json"), "not json").unwrap();

        assert_eq!(audit.entries().unwrap().len(), 1);
    }
}
