//! The session-scoped tabular store.

use crate::error::StoreResult;
use crate::filter::{FilterCriteria, FilterUpdate};
use crate::options::StoreOptions;
use crate::pagination::{PageInfo, Pagination};
use crate::selection::SelectedRecord;
use indexmap::IndexSet;
use tabview_sheet::{
    parse, serialize, Export, ExportError, ExportFormat, Record, Sheet, Upload, Workbook,
};

/// Owns the parsed workbook plus the filter, page and selection state of one
/// viewing session.
///
/// Derived views (`current_filtered_rows`, `current_page_rows`) are computed
/// from this state on every call, so they can never go stale.
#[derive(Debug, Clone)]
pub struct TabularStore {
    options: StoreOptions,
    workbook: Option<Workbook>,
    filters: FilterCriteria,
    selected: Option<SelectedRecord>,
    pagination: Pagination,
    visible_columns: Vec<String>,
}

impl Default for TabularStore {
    fn default() -> Self {
        Self::new(StoreOptions::default())
    }
}

impl TabularStore {
    /// Create an empty store.
    pub fn new(options: StoreOptions) -> Self {
        let pagination = Pagination::new(options.page_size);
        Self {
            options,
            workbook: None,
            filters: FilterCriteria::default(),
            selected: None,
            pagination,
            visible_columns: Vec::new(),
        }
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    // ===== Workbook =====

    /// Parse an upload and make it the current workbook.
    ///
    /// On success every piece of view state is reset: first sheet, no
    /// filters, no selection, page 0. On failure the previous state is left
    /// exactly as it was.
    pub fn load_workbook(&mut self, upload: &Upload) -> StoreResult<&Workbook> {
        let workbook = match parse(upload, self.options.max_upload_bytes) {
            Ok(workbook) => workbook,
            Err(e) => {
                tracing::warn!("Rejected upload {}: {}", upload.name(), e);
                return Err(e.into());
            }
        };

        tracing::info!(
            "Loaded {} ({} bytes, {} sheets)",
            upload.name(),
            upload.len(),
            workbook.sheet_count()
        );
        Ok(self.replace_workbook(workbook))
    }

    /// Install an already parsed workbook, with the same resets as
    /// [`load_workbook`](Self::load_workbook).
    pub fn replace_workbook(&mut self, workbook: Workbook) -> &Workbook {
        self.filters = FilterCriteria::default();
        self.selected = None;
        self.pagination.reset();
        self.visible_columns = distinct_headers(workbook.current_sheet());
        self.workbook.insert(workbook)
    }

    /// Drop the workbook and all view state.
    pub fn reset(&mut self) {
        tracing::debug!("Store reset");
        self.workbook = None;
        self.filters = FilterCriteria::default();
        self.selected = None;
        self.pagination.reset();
        self.visible_columns.clear();
    }

    pub fn workbook(&self) -> Option<&Workbook> {
        self.workbook.as_ref()
    }

    pub fn has_workbook(&self) -> bool {
        self.workbook.is_some()
    }

    /// The active sheet, if a workbook is loaded.
    pub fn current_sheet(&self) -> Option<&Sheet> {
        self.workbook.as_ref().map(Workbook::current_sheet)
    }

    pub fn selected_sheet_index(&self) -> Option<usize> {
        self.workbook.as_ref().map(Workbook::selected_sheet_index)
    }

    /// Switch the active sheet.
    ///
    /// Out-of-range indices (or no workbook) are ignored. Otherwise the
    /// selection is cleared and paging restarts at page 0. Filters are kept.
    pub fn select_sheet(&mut self, index: usize) -> bool {
        let Some(workbook) = self.workbook.as_mut() else {
            return false;
        };
        if !workbook.select_sheet(index) {
            tracing::debug!("Ignoring sheet index {} (have {})", index, workbook.sheet_count());
            return false;
        }

        self.visible_columns = distinct_headers(workbook.current_sheet());
        self.selected = None;
        self.pagination.reset();
        tracing::debug!("Selected sheet {}", index);
        true
    }

    // ===== Filtering =====

    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    /// Merge a partial update into the filter criteria and go back to page 0.
    pub fn update_filter(&mut self, update: FilterUpdate) {
        self.filters.merge(update);
        self.pagination.reset();
        tracing::debug!("Filters now {:?}", self.filters);
    }

    /// Remove every filter and go back to page 0.
    pub fn clear_filters(&mut self) {
        self.filters = FilterCriteria::default();
        self.pagination.reset();
    }

    fn filtered(&self) -> Vec<(usize, &Record)> {
        match self.current_sheet() {
            Some(sheet) => self.filters.apply(sheet.rows()),
            None => Vec::new(),
        }
    }

    /// Rows of the active sheet matching the filter criteria, in sheet order.
    pub fn current_filtered_rows(&self) -> Vec<&Record> {
        self.filtered().into_iter().map(|(_, record)| record).collect()
    }

    /// Sheet positions of the rows in [`current_filtered_rows`](Self::current_filtered_rows).
    pub fn filtered_indices(&self) -> Vec<usize> {
        self.filtered().into_iter().map(|(index, _)| index).collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered().len()
    }

    // ===== Pagination =====

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// The filtered rows on the current page. Empty if the page starts past
    /// the end of the filtered view.
    pub fn current_page_rows(&self) -> Vec<&Record> {
        let rows = self.current_filtered_rows();
        self.pagination.slice(&rows).to_vec()
    }

    pub fn page_info(&self) -> PageInfo {
        self.pagination.info(self.filtered_count())
    }

    pub fn set_page(&mut self, page: usize) {
        self.pagination.set_page(page);
    }

    /// Advance one page if there is one.
    pub fn next_page(&mut self) -> bool {
        let info = self.page_info();
        if info.current_page.saturating_add(1) < info.page_count {
            self.pagination.set_page(info.current_page + 1);
            true
        } else {
            false
        }
    }

    /// Go back one page if not on the first.
    pub fn previous_page(&mut self) -> bool {
        let current = self.pagination.current_page();
        if current == 0 {
            return false;
        }
        self.pagination.set_page(current - 1);
        true
    }

    pub fn set_page_size(&mut self, page_size: usize) -> StoreResult<()> {
        self.pagination.set_page_size(page_size)
    }

    // ===== Selection =====

    pub fn selected_record(&self) -> Option<&SelectedRecord> {
        self.selected.as_ref()
    }

    /// Select a row by its index in the filtered view.
    ///
    /// Ignored when no workbook is loaded or the index is out of range.
    pub fn select_record(&mut self, row_index: usize) -> bool {
        let Some(sheet) = self.current_sheet() else {
            return false;
        };
        let Some((source_index, record)) = self.filtered().get(row_index).copied() else {
            tracing::debug!("Ignoring row index {}", row_index);
            return false;
        };

        self.selected = Some(SelectedRecord {
            data: record.clone(),
            row_index,
            source_index,
            sheet_name: sheet.name().to_string(),
        });
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    // ===== Columns =====

    /// Columns shown by the presentation layer, in display order.
    pub fn visible_columns(&self) -> &[String] {
        &self.visible_columns
    }

    /// Hide a visible column or re-show a hidden one (appended at the end).
    ///
    /// Returns false for names that are not headers of the active sheet.
    pub fn toggle_column(&mut self, header: &str) -> bool {
        let Some(sheet) = self.current_sheet() else {
            return false;
        };
        if !sheet.has_header(header) {
            return false;
        }

        if let Some(pos) = self.visible_columns.iter().position(|h| h == header) {
            self.visible_columns.remove(pos);
        } else {
            self.visible_columns.push(header.to_string());
        }
        true
    }

    // ===== Export =====

    /// Export format matching the loaded file, XLSX when nothing is loaded.
    pub fn default_export_format(&self) -> ExportFormat {
        self.workbook
            .as_ref()
            .map(|wb| ExportFormat::for_source(wb.format()))
            .unwrap_or_default()
    }

    /// Serialize the filtered rows of the active sheet under all its headers.
    pub fn export_filtered_rows(&self, format: ExportFormat) -> StoreResult<Export> {
        let Some(sheet) = self.current_sheet() else {
            return Err(ExportError::NothingToExport.into());
        };
        let rows = self.current_filtered_rows();
        let export = serialize(sheet.headers(), &rows, format)?;

        tracing::info!(
            "Exported {} rows of {} as {}",
            export.row_count,
            sheet.name(),
            export.file_name
        );
        Ok(export)
    }
}

/// Headers of `sheet` in order, each name once.
fn distinct_headers(sheet: &Sheet) -> Vec<String> {
    sheet
        .headers()
        .iter()
        .cloned()
        .collect::<IndexSet<String>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabview_sheet::FileFormat;

    fn workbook() -> Workbook {
        let mut data = vec![vec!["ID".to_string(), "Name".to_string()]];
        for i in 0..23 {
            data.push(vec![i.to_string(), format!("name{i}")]);
        }
        Workbook::new(
            "test.xlsx",
            FileFormat::Xlsx,
            vec![
                Sheet::from_data("A", data),
                Sheet::from_data("B", vec![vec!["X"], vec!["only"]]),
            ],
        )
        .unwrap()
    }

    fn loaded() -> TabularStore {
        let mut store = TabularStore::default();
        store.replace_workbook(workbook());
        store
    }

    #[test]
    fn test_empty_store() {
        let mut store = TabularStore::default();
        assert!(store.current_sheet().is_none());
        assert!(store.current_filtered_rows().is_empty());
        assert!(store.current_page_rows().is_empty());
        assert!(!store.select_sheet(0));
        assert!(!store.select_record(0));
        assert!(store.export_filtered_rows(ExportFormat::Csv).is_err());
    }

    #[test]
    fn test_paging() {
        let mut store = loaded();
        assert_eq!(store.page_info().page_count, 3);
        assert_eq!(store.current_page_rows().len(), 10);

        assert!(store.next_page());
        assert!(store.next_page());
        assert_eq!(store.current_page_rows().len(), 3);
        assert!(!store.next_page());

        assert!(store.previous_page());
        assert_eq!(store.pagination().current_page(), 1);
    }

    #[test]
    fn test_filter_resets_page() {
        let mut store = loaded();
        store.set_page(2);
        store.update_filter(FilterUpdate::search("name1"));
        assert_eq!(store.pagination().current_page(), 0);
        // name1, name10..name19
        assert_eq!(store.filtered_count(), 11);
    }

    #[test]
    fn test_select_record_uses_filtered_index() {
        let mut store = loaded();
        store.update_filter(FilterUpdate::column("Name", "name2"));
        // name2, name20, name21, name22
        assert!(store.select_record(1));

        let selected = store.selected_record().unwrap();
        assert_eq!(selected.row_index, 1);
        assert_eq!(selected.source_index, 20);
        assert_eq!(selected.sheet_name, "A");
        assert_eq!(selected.data.get("Name").as_str(), "name20");

        assert!(!store.select_record(4));
        assert_eq!(store.selected_record().unwrap().source_index, 20);
    }

    #[test]
    fn test_toggle_column() {
        let mut store = loaded();
        assert_eq!(store.visible_columns(), ["ID", "Name"]);
        assert!(store.toggle_column("ID"));
        assert_eq!(store.visible_columns(), ["Name"]);
        assert!(store.toggle_column("ID"));
        assert_eq!(store.visible_columns(), ["Name", "ID"]);
        assert!(!store.toggle_column("Nope"));

        store.select_sheet(1);
        assert_eq!(store.visible_columns(), ["X"]);
    }

    #[test]
    fn test_toggle_duplicate_header() {
        let sheet = Sheet::from_data(
            "Dup",
            vec![vec!["Name", "Name", "Age"], vec!["a", "b", "30"]],
        );
        let workbook = Workbook::new("dup.xlsx", FileFormat::Xlsx, vec![sheet]).unwrap();
        let mut store = TabularStore::default();
        store.replace_workbook(workbook);

        assert_eq!(store.visible_columns(), ["Name", "Age"]);
        assert!(store.toggle_column("Name"));
        assert_eq!(store.visible_columns(), ["Age"]);
    }

    #[test]
    fn test_clear_selection_keeps_view() {
        let mut store = loaded();
        store.update_filter(FilterUpdate::search("name1"));
        store.set_page(1);
        assert!(store.select_record(3));

        store.clear_selection();

        assert!(store.selected_record().is_none());
        assert_eq!(store.pagination().current_page(), 1);
        assert_eq!(store.filters().search_text, "name1");
    }

    #[test]
    fn test_reset() {
        let mut store = loaded();
        store.update_filter(FilterUpdate::search("x"));
        store.reset();
        assert!(!store.has_workbook());
        assert!(store.filters().is_empty());
        assert!(store.visible_columns().is_empty());
    }
}
