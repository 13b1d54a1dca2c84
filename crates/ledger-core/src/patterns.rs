//! Vendor posting-pattern store
//!
//! One JSON file per vendor under a local directory, maintained by hand or
//! by an offline recording step. The store only ever reads; bill creation
//! refuses vendors with no pattern on file unless the caller overrides the
//! guard.

use crate::error::Result;
use ledger_types::VendorPattern;
use std::fs;
use std::path::{Path, PathBuf};

/// Read-only view over the pattern directory
pub struct PatternStore {
    root_path: PathBuf,
}

impl PatternStore {
    /// Create a store over the given directory. The directory is not
    /// required to exist; a missing one just means no patterns yet.
    pub fn new<P: AsRef<Path>>(root_path: P) -> Self {
        Self {
            root_path: root_path.as_ref().to_path_buf(),
        }
    }

    /// Find the pattern whose embedded vendor id matches. The filename
    /// does not matter, only the `vendorId` field inside the file.
    pub fn find(&self, vendor_id: &str) -> Result<Option<VendorPattern>> {
        Ok(self
            .load_all()?
            .into_iter()
            .find(|p| p.vendor_id == vendor_id))
    }

    /// Whether a pattern exists for the vendor
    pub fn exists(&self, vendor_id: &str) -> Result<bool> {
        Ok(self.find(vendor_id)?.is_some())
    }

    /// All parseable patterns on disk, in directory order
    pub fn list(&self) -> Result<Vec<VendorPattern>> {
        self.load_all()
    }

    fn load_all(&self) -> Result<Vec<VendorPattern>> {
        if !self.root_path.exists() {
            return Ok(Vec::new());
        }

        let mut patterns = Vec::new();

        for entry in fs::read_dir(&self.root_path)? {
            let entry = entry?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let json = match fs::read_to_string(&path) {
                Ok(json) => json,
                Err(e) => {
                    log::warn!("Skipping unreadable pattern file {:?}: {}", path, e);
                    continue;
                }
            };

            match serde_json::from_str::<VendorPattern>(&json) {
                Ok(pattern) => patterns.push(pattern),
                Err(e) => {
                    // One bad file must not take the whole store down.
                    log::warn!("Skipping malformed pattern file {:?}: {}", path, e);
                }
            }
        }

        Ok(patterns)
    }
}
