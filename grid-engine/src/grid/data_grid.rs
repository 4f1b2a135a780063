//! Grid orchestrator
//!
//! [`DataGrid`] owns the grid state (filter text, sort, page) and a
//! [`SelectionController`], and turns a caller-owned record collection into
//! the rows visible on the current page. The pipeline order is fixed:
//! filter, then sort, then paginate. Selection is kept separately by row key
//! and overlaid on whatever rows end up visible.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::data::record::{default_key_extractor, GridRecord, KeyExtractor, RowKey};
use crate::grid::column::Column;
use crate::grid::filter::TextFilter;
use crate::grid::formatter::{DisplayCell, ValueFormatter};
use crate::grid::paginator::{clamp_page, page_count, paginate, PageInfo};
use crate::grid::selection::{SelectionController, SelectionMode};
use crate::grid::sort::{RowSorter, SortState};

/// Default rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Static options recognised by the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridOptions {
    /// Rows per page; 0 disables pagination
    pub page_size: usize,
    pub selection_mode: SelectionMode,
    pub show_pagination: bool,
    /// When false the grid ignores filter text entirely
    pub show_filter_bar: bool,
    /// When false row clicks never reach the callback
    pub row_clickable: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            selection_mode: SelectionMode::None,
            show_pagination: true,
            show_filter_bar: true,
            row_clickable: false,
        }
    }
}

/// Optional notifications for the presentation layer.
/// A missing callback means that interaction is disabled or unobserved.
pub struct GridCallbacks<R> {
    pub on_page_change: Option<Box<dyn FnMut(usize)>>,
    pub on_sort_request: Option<Box<dyn FnMut(&str)>>,
    pub on_filter_text_change: Option<Box<dyn FnMut(&str)>>,
    pub on_selection_change: Option<Box<dyn FnMut(&[&R])>>,
    pub on_row_click: Option<Box<dyn FnMut(&R)>>,
}

impl<R> Default for GridCallbacks<R> {
    fn default() -> Self {
        Self {
            on_page_change: None,
            on_sort_request: None,
            on_filter_text_change: None,
            on_selection_change: None,
            on_row_click: None,
        }
    }
}

/// A row on the current page, ready to render
#[derive(Debug)]
pub struct VisibleRow<'a, R> {
    /// Position of the record in the full collection
    pub index: usize,
    pub key: Option<RowKey>,
    pub record: &'a R,
    pub cells: Vec<DisplayCell>,
    pub selected: bool,
}

/// Filtered, sorted, paginated and selectable view over a record collection
pub struct DataGrid<R> {
    records: Arc<Vec<R>>,
    columns: Vec<Column<R>>,
    options: GridOptions,
    formatter: ValueFormatter,
    key_extractor: KeyExtractor<R>,
    /// Key of each record, by position
    keys: Vec<Option<RowKey>>,
    filter_text: String,
    sort: Option<SortState>,
    current_page: usize,
    /// Filtered and sorted positions into `records`
    ordered: Vec<usize>,
    selection: SelectionController,
    callbacks: GridCallbacks<R>,
}

impl<R: GridRecord + 'static> DataGrid<R> {
    pub fn new(records: Arc<Vec<R>>, columns: Vec<Column<R>>, options: GridOptions) -> Self {
        debug!(
            target: "grid",
            "Creating grid: {} records, {} columns, {:?}",
            records.len(),
            columns.len(),
            options
        );
        let mut grid = Self {
            records,
            columns,
            selection: SelectionController::new(options.selection_mode),
            options,
            formatter: ValueFormatter::default(),
            key_extractor: default_key_extractor(),
            keys: Vec::new(),
            filter_text: String::new(),
            sort: None,
            current_page: 1,
            ordered: Vec::new(),
            callbacks: GridCallbacks::default(),
        };
        grid.rebuild_keys();
        grid.refresh();
        grid
    }
}

impl<R: GridRecord> DataGrid<R> {
    /// Derive row keys with a custom extractor instead of the `id` field
    pub fn with_key_extractor(mut self, extractor: KeyExtractor<R>) -> Self {
        self.key_extractor = extractor;
        self.rebuild_keys();
        self
    }

    pub fn with_formatter(mut self, formatter: ValueFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_callbacks(mut self, callbacks: GridCallbacks<R>) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.sort = Some(sort);
        self.refresh();
        self
    }

    // ---- inputs -------------------------------------------------------

    /// Replace the record collection. A different collection (another
    /// `Arc` or another length) sends the grid back to page 1.
    ///
    /// Selection is kept by key. Observers are told when the selected
    /// records resolve differently against the new collection.
    pub fn set_records(&mut self, records: Arc<Vec<R>>) {
        let same_collection = Arc::ptr_eq(&self.records, &records);
        let changed = !same_collection || self.records.len() != records.len();
        let resolved_before = self.resolved_selection();

        self.records = records;
        self.rebuild_keys();
        if changed {
            debug!(target: "grid", "Record collection changed ({} rows), resetting to page 1", self.records.len());
            self.current_page = 1;
        }
        self.refresh();

        let resolved_after = self.resolved_selection();
        if resolved_before != resolved_after || (!same_collection && !resolved_after.is_empty()) {
            self.emit_selection();
        }
    }

    pub fn set_columns(&mut self, columns: Vec<Column<R>>) {
        self.columns = columns;
        self.refresh();
    }

    /// Change rows per page; 0 disables pagination
    pub fn set_page_size(&mut self, page_size: usize) {
        self.options.page_size = page_size;
        self.refresh();
    }

    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        let before = self.selection.len();
        self.options.selection_mode = mode;
        self.selection.set_mode(mode);
        if self.selection.len() != before {
            self.emit_selection();
        }
    }

    // ---- handlers -----------------------------------------------------

    /// New free-text query. Resets to page 1 when the text changes.
    pub fn on_filter_change(&mut self, text: &str) {
        if !self.options.show_filter_bar {
            debug!(target: "grid", "Filter bar disabled, ignoring '{}'", text);
            return;
        }
        if self.filter_text == text {
            return;
        }
        self.filter_text = text.to_string();
        self.current_page = 1;
        self.refresh();
        if let Some(cb) = self.callbacks.on_filter_text_change.as_mut() {
            cb(text);
        }
    }

    /// Header click on `column`. Unknown or non-sortable columns are ignored.
    pub fn on_sort_request(&mut self, column: &str) {
        let sortable = self
            .columns
            .iter()
            .any(|c| c.accessor == column && c.sortable);
        if !sortable {
            debug!(target: "sort", "Ignoring sort request for '{}'", column);
            return;
        }
        let next = SortState::toggle(self.sort.as_ref(), column);
        debug!(target: "sort", "Sort now '{}' {:?}", next.column, next.direction);
        self.sort = Some(next);
        self.refresh();
        if let Some(cb) = self.callbacks.on_sort_request.as_mut() {
            cb(column);
        }
    }

    /// Drop the active sort and return to insertion order
    pub fn clear_sort(&mut self) {
        if self.sort.take().is_some() {
            self.refresh();
        }
    }

    /// Navigate to `page` (1-based, clamped into range). Returns the page
    /// actually shown.
    pub fn on_page_change(&mut self, page: usize) -> usize {
        let target = clamp_page(page, self.page_count());
        if target != page {
            debug!(target: "grid", "Clamped page {} to {}", page, target);
        }
        if target != self.current_page {
            self.current_page = target;
            if let Some(cb) = self.callbacks.on_page_change.as_mut() {
                cb(target);
            }
        }
        self.current_page
    }

    pub fn next_page(&mut self) -> usize {
        self.on_page_change(self.current_page + 1)
    }

    pub fn previous_page(&mut self) -> usize {
        self.on_page_change(self.current_page.saturating_sub(1))
    }

    /// Toggle selection of a row. Unknown keys are ignored.
    pub fn on_row_select(&mut self, key: &RowKey) {
        if self.selection.toggle(key) {
            self.emit_selection();
        }
    }

    /// Row click on the record identified by `key`. Returns true when the
    /// click was delivered.
    pub fn on_row_click(&mut self, key: &RowKey) -> bool {
        if !self.options.row_clickable {
            return false;
        }
        let Some(cb) = self.callbacks.on_row_click.as_mut() else {
            return false;
        };
        let Some(position) = self.keys.iter().position(|k| k.as_ref() == Some(key)) else {
            debug!(target: "grid", "Row click on unknown key {}", key);
            return false;
        };
        cb(&self.records[position]);
        true
    }

    /// Select every keyed row on the current page
    pub fn select_all_visible(&mut self) {
        let keys = self.visible_keys();
        if self.selection.select_all_visible(&keys) {
            self.emit_selection();
        }
    }

    /// Deselect every keyed row on the current page
    pub fn clear_all_visible(&mut self) {
        let keys = self.visible_keys();
        if self.selection.clear_all_visible(&keys) {
            self.emit_selection();
        }
    }

    pub fn clear_selection(&mut self) {
        if self.selection.clear() {
            self.emit_selection();
        }
    }

    // ---- outputs ------------------------------------------------------

    pub fn records(&self) -> &Arc<Vec<R>> {
        &self.records
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn formatter(&self) -> &ValueFormatter {
        &self.formatter
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn sort_state(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_count(&self) -> usize {
        page_count(self.ordered.len(), self.effective_page_size())
    }

    /// Rows left after filtering, across all pages
    pub fn filtered_count(&self) -> usize {
        self.ordered.len()
    }

    pub fn total_count(&self) -> usize {
        self.records.len()
    }

    pub fn page_info(&self) -> PageInfo {
        PageInfo::new(
            self.current_page,
            self.effective_page_size(),
            self.ordered.len(),
        )
    }

    /// Collection positions of the rows on the current page
    pub fn visible_indices(&self) -> &[usize] {
        paginate(&self.ordered, self.current_page, self.effective_page_size()).rows
    }

    /// Filtered and sorted positions across every page
    pub fn ordered_indices(&self) -> &[usize] {
        &self.ordered
    }

    pub fn visible_rows(&self) -> Vec<VisibleRow<'_, R>> {
        self.visible_indices()
            .iter()
            .filter_map(|&index| {
                let record = self.records.get(index)?;
                let key = self.keys.get(index).cloned().flatten();
                let selected = key
                    .as_ref()
                    .is_some_and(|k| self.selection.is_selected(k));
                let cells = self
                    .columns
                    .iter()
                    .map(|column| column.render_cell(record, &self.formatter))
                    .collect();
                Some(VisibleRow {
                    index,
                    key,
                    record,
                    cells,
                    selected,
                })
            })
            .collect()
    }

    /// Header text with the sort indicator on the active column
    pub fn header_labels(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| match &self.sort {
                Some(sort) if sort.column == column.accessor => {
                    format!("{} {}", column.header, sort.direction.indicator())
                }
                _ => column.header.clone(),
            })
            .collect()
    }

    pub fn is_selected(&self, key: &RowKey) -> bool {
        self.selection.is_selected(key)
    }

    /// Selected records in collection order, whether visible or not
    pub fn selected_records(&self) -> Vec<&R> {
        self.records
            .iter()
            .zip(&self.keys)
            .filter(|(_, key)| {
                key.as_ref()
                    .is_some_and(|k| self.selection.is_selected(k))
            })
            .map(|(record, _)| record)
            .collect()
    }

    // ---- internals ----------------------------------------------------

    fn effective_page_size(&self) -> usize {
        if self.options.show_pagination {
            self.options.page_size
        } else {
            0
        }
    }

    fn visible_keys(&self) -> Vec<RowKey> {
        self.visible_indices()
            .iter()
            .filter_map(|&idx| self.keys.get(idx).cloned().flatten())
            .collect()
    }

    fn rebuild_keys(&mut self) {
        let extractor = Arc::clone(&self.key_extractor);
        self.keys = self.records.iter().map(|r| extractor(r)).collect();
        self.selection
            .set_known_keys(self.keys.iter().flatten().cloned());
    }

    /// Re-run filter and sort, then keep the current page in range
    fn refresh(&mut self) {
        let all: Vec<usize> = (0..self.records.len()).collect();
        let query = if self.options.show_filter_bar {
            self.filter_text.as_str()
        } else {
            ""
        };
        let filtered = TextFilter::filter_indices(&self.records, &all, &self.columns, query);
        self.ordered =
            RowSorter::apply(&self.records, &filtered, &self.columns, self.sort.as_ref());

        let clamped = clamp_page(self.current_page, self.page_count());
        if clamped != self.current_page {
            debug!(target: "grid", "Page {} out of range, moving to {}", self.current_page, clamped);
            self.current_page = clamped;
        }
        debug!(
            target: "grid",
            "Pipeline: {} records -> {} filtered, page {}/{}",
            self.records.len(),
            self.ordered.len(),
            self.current_page,
            self.page_count()
        );
    }

    /// Keys of the selected records present in the collection, in collection order
    fn resolved_selection(&self) -> Vec<RowKey> {
        self.keys
            .iter()
            .flatten()
            .filter(|k| self.selection.is_selected(k))
            .cloned()
            .collect()
    }

    fn emit_selection(&mut self) {
        let Some(cb) = self.callbacks.on_selection_change.as_mut() else {
            return;
        };
        let selected: Vec<&R> = self
            .records
            .iter()
            .zip(&self.keys)
            .filter(|(_, key)| {
                key.as_ref()
                    .is_some_and(|k| self.selection.is_selected(k))
            })
            .map(|(record, _)| record)
            .collect();
        cb(&selected);
    }
}

impl<R> fmt::Debug for DataGrid<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataGrid")
            .field("records", &self.records.len())
            .field("columns", &self.columns)
            .field("options", &self.options)
            .field("filter_text", &self.filter_text)
            .field("sort", &self.sort)
            .field("current_page", &self.current_page)
            .field("filtered", &self.ordered.len())
            .field("selection", &self.selection)
            .finish()
    }
}
