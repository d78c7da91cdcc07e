//! Store configuration.

use serde::{Deserialize, Serialize};
use tabview_sheet::DEFAULT_MAX_UPLOAD_BYTES;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Options applied when a store is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Rows per page
    pub page_size: usize,
    /// Largest accepted upload, in bytes
    pub max_upload_bytes: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            page_size: DEFAULT_PAGE_SIZE,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl StoreOptions {
    /// Set the rows per page. Zero is raised to one.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Set the upload size limit in bytes
    #[must_use]
    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}
