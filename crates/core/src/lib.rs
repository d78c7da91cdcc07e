//! # tabview-core
//!
//! The session state behind the spreadsheet viewer.
//!
//! This crate provides:
//! - [`TabularStore`], owning the parsed workbook and the view state
//! - Filter criteria and partial updates
//! - Pagination and the selected-record snapshot
//! - Store options and error types
//!
//! ```
//! use tabview_core::{FilterUpdate, TabularStore};
//! use tabview_sheet::Upload;
//!
//! let mut store = TabularStore::default();
//! let csv = b"ID,Name\n1,row1\n2,row2\n3,row3\n".to_vec();
//! store.load_workbook(&Upload::new("rows.csv", csv)).unwrap();
//!
//! store.update_filter(FilterUpdate::search("ROW2"));
//! assert_eq!(store.current_filtered_rows().len(), 1);
//!
//! assert!(store.select_record(0));
//! assert_eq!(store.selected_record().unwrap().source_index, 1);
//! ```

/// Error types and result aliases.
pub mod error;
/// Filter criteria.
pub mod filter;
/// Store configuration.
pub mod options;
/// Page window state.
pub mod pagination;
/// Selected record snapshot.
pub mod selection;
/// The tabular store.
pub mod store;

pub use error::{StoreError, StoreResult};
pub use filter::{FilterCriteria, FilterUpdate, Matcher};
pub use options::{StoreOptions, DEFAULT_PAGE_SIZE};
pub use pagination::{PageInfo, Pagination};
pub use selection::SelectedRecord;
pub use store::TabularStore;
