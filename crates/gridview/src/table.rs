//! The table: feature state, the derived-view pipeline, and user operations.
//!
//! Rows flow through four memoized stages, always in this order:
//!
//! ```text
//! rows -> filtered -> sorted -> paged -> windowed
//! ```
//!
//! Columns flow through two:
//!
//! ```text
//! column specs + computed columns -> processed -> layout
//! ```
//!
//! Stages hold row indices rather than rows. Each stage recomputes only when
//! one of its inputs has a newer revision than its cached result, so a
//! single mutation followed by a read performs exactly one coherent pass over
//! the stale stages.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use gridview_layout::{
    compose, ordered_keys, process_columns, CellType, Column, ColumnLayout, ColumnSpec,
    FreezeOverride, FrozenPosition, LayoutOptions, LayoutState, ReorderDrag, ResizeDrag,
};
use gridview_query::{
    apply_filtering, apply_sorting, FilterEntry, FilterState, FilterValue, Record, SortDirection,
    SortEntry, SortState, Value,
};

use crate::color::ColorAssignments;
use crate::computed::{ComputedColumnEditor, ComputedColumns};
use crate::config::TableConfig;
use crate::error::{Result, TableError};
use crate::event::TableEvent;
use crate::export::{format_cell, ExportColumn, ExportRow, ExportSnapshot, Exporter};
use crate::graph::{Clock, Memo, Revision, Tracked};
use crate::pagination::{apply_pagination, PageCursor, PageRange};
use crate::selection::{RowKey, Selection, SelectionMode};
use crate::window::{compute_window, scroll_offset_for, VirtualWindow, WindowParams};

type Comparator<T> = Box<dyn Fn(&T, &T, SortDirection) -> Ordering>;
type Formatter = Box<dyn Fn(&Value<'_>) -> String>;
type KeyFn<T> = Box<dyn Fn(&T) -> RowKey>;

/// Computed column values by column key, indexed like the rows.
type ComputedValues = HashMap<String, Vec<String>>;

/// How often each pipeline stage has recomputed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub computed: u64,
    pub filtered: u64,
    pub sorted: u64,
    pub paged: u64,
    pub windowed: u64,
    pub columns: u64,
    pub layout: u64,
}

/// Windowing settings; `None` when virtual scrolling is off.
#[derive(Clone, Copy, Debug, PartialEq)]
struct WindowSettings {
    item_height: f64,
    buffer: usize,
    viewport_height: f64,
}

impl WindowSettings {
    fn from_config(config: &TableConfig) -> Option<Self> {
        config.enable_virtual_scroll.then(|| WindowSettings {
            item_height: config.virtual_scroll_item_height,
            buffer: config.virtual_scroll_buffer_size,
            viewport_height: config.table_height,
        })
    }
}

fn layout_options(config: &TableConfig) -> LayoutOptions {
    LayoutOptions {
        show_selection_column: config.enable_row_selection && config.show_selection_checkbox,
        frozen_enabled: config.enable_frozen_columns,
    }
}

/// The rows to render right now.
#[derive(Clone, Debug)]
pub struct TableView<'t, T> {
    rows: &'t [T],
    page: Rc<Vec<usize>>,
    window: VirtualWindow,
}

impl<'t, T> TableView<'t, T> {
    /// The virtualization window over the current page.
    pub fn window(&self) -> VirtualWindow {
        self.window
    }

    /// Row indices on the current page.
    pub fn page_indices(&self) -> &[usize] {
        &self.page
    }

    /// Row indices to render: the current page cut to the window.
    pub fn indices(&self) -> &[usize] {
        &self.page[self.window.range()]
    }

    /// Rows to render, in display order.
    pub fn rows(&self) -> impl Iterator<Item = &'t T> + '_ {
        let rows = self.rows;
        self.indices().iter().map(move |&i| &rows[i])
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

/// An interactive table over rows of type `T`.
///
/// # Example
///
/// ```rust
/// use gridview::{ColumnSpec, Table};
/// use serde_json::json;
///
/// let rows: Vec<_> = (1..=25).map(|id| json!({"id": id, "name": format!("row {id}")})).collect();
/// let mut table = Table::new(vec![ColumnSpec::new("id"), ColumnSpec::new("name")], rows);
///
/// table.click_header("id", false);
/// table.click_header("id", false);
/// table.go_to_page(3);
///
/// let ids: Vec<_> = table.view().rows().map(|r| r["id"].as_i64().unwrap()).collect();
/// assert_eq!(ids, vec![5, 4, 3, 2, 1]);
/// ```
pub struct Table<T> {
    clock: Clock,
    rows: Tracked<Vec<T>>,
    columns: Tracked<Vec<ColumnSpec>>,
    config: TableConfig,
    // Each stage reads its own slice of the config.
    filtering: Tracked<bool>,
    paging: Tracked<bool>,
    windowing: Tracked<Option<WindowSettings>>,
    layout_options: Tracked<LayoutOptions>,
    filters: Tracked<FilterState>,
    sorts: Tracked<SortState>,
    page: Tracked<PageCursor>,
    scroll_top: Tracked<f64>,
    computed: Tracked<ComputedColumns>,
    layout_state: Tracked<LayoutState>,
    comparators: Tracked<HashMap<String, Comparator<T>>>,
    formatters: HashMap<String, Formatter>,
    row_key: Option<KeyFn<T>>,

    selection: Selection,
    colors: ColorAssignments,
    editor: ComputedColumnEditor,
    resize: Option<ResizeDrag>,
    reorder: Option<ReorderDrag>,
    events: Vec<TableEvent>,

    computed_memo: Memo<ComputedValues>,
    filtered_memo: Memo<Vec<usize>>,
    sorted_memo: Memo<Vec<usize>>,
    paged_memo: Memo<Vec<usize>>,
    window_memo: Memo<VirtualWindow>,
    columns_memo: Memo<Vec<Column>>,
    layout_memo: Memo<ColumnLayout>,
}

impl<T: Record> Table<T> {
    /// Creates a table with the default configuration.
    pub fn new(columns: Vec<ColumnSpec>, rows: Vec<T>) -> Self {
        let clock = Clock::new();
        let config = TableConfig::default();
        let mut table = Table {
            rows: Tracked::new(rows, &clock),
            columns: Tracked::new(columns, &clock),
            filters: Tracked::new(FilterState::new(), &clock),
            sorts: Tracked::new(SortState::new(), &clock),
            page: Tracked::new(PageCursor::new(config.page_size), &clock),
            scroll_top: Tracked::new(0.0, &clock),
            computed: Tracked::new(ComputedColumns::new(), &clock),
            layout_state: Tracked::new(LayoutState::new(), &clock),
            comparators: Tracked::new(HashMap::new(), &clock),
            formatters: HashMap::new(),
            row_key: None,
            selection: Selection::new(config.selection_mode),
            filtering: Tracked::new(config.enable_filtering, &clock),
            paging: Tracked::new(config.enable_pagination, &clock),
            windowing: Tracked::new(WindowSettings::from_config(&config), &clock),
            layout_options: Tracked::new(layout_options(&config), &clock),
            config,
            colors: ColorAssignments::new(),
            editor: ComputedColumnEditor::new(),
            resize: None,
            reorder: None,
            events: Vec::new(),
            computed_memo: Memo::new("computed"),
            filtered_memo: Memo::new("filtered"),
            sorted_memo: Memo::new("sorted"),
            paged_memo: Memo::new("paged"),
            window_memo: Memo::new("windowed"),
            columns_memo: Memo::new("columns"),
            layout_memo: Memo::new("layout"),
            clock,
        };
        table.sync_column_order();
        table
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.set_config(config);
        self.events.clear();
        self
    }

    /// Identifies rows with `key_fn` instead of the configured key field.
    pub fn with_row_key<F>(mut self, key_fn: F) -> Self
    where
        F: Fn(&T) -> RowKey + 'static,
    {
        self.row_key = Some(Box::new(key_fn));
        self
    }

    /// Sorts `column` with `comparator`, which must honor the direction itself.
    pub fn with_comparator<F>(mut self, column: impl Into<String>, comparator: F) -> Self
    where
        F: Fn(&T, &T, SortDirection) -> Ordering + 'static,
    {
        let column = column.into();
        self.comparators.update(&self.clock, |map| {
            map.insert(column, Box::new(comparator));
        });
        self
    }

    /// Renders `column` cells with `formatter` instead of by cell type.
    pub fn with_formatter<F>(mut self, column: impl Into<String>, formatter: F) -> Self
    where
        F: Fn(&Value<'_>) -> String + 'static,
    {
        self.formatters.insert(column.into(), Box::new(formatter));
        self
    }

    // ------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: TableConfig) {
        log::debug!("table config replaced");
        let mode = config.selection_mode;
        let page_size = config.effective_page_size();
        self.filtering.assign(&self.clock, config.enable_filtering);
        self.paging.assign(&self.clock, config.enable_pagination);
        self.windowing.assign(&self.clock, WindowSettings::from_config(&config));
        self.layout_options.assign(&self.clock, layout_options(&config));
        self.config = config;
        if self.selection.set_mode(mode) {
            self.emit_selection(None, true);
        }
        if self.page.page_size() != page_size
            && self
                .page
                .update_if(&self.clock, |cursor| cursor.set_page_size(page_size))
        {
            self.emit_page();
        }
        self.clamp_page();
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Replaces the rows. Selection is kept by key; the page is clamped.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        log::debug!("rows replaced: {} rows", rows.len());
        self.rows.update(&self.clock, |r| *r = rows);
        self.clamp_page();
    }

    /// Replaces the base column declarations. Filters and sorts on columns
    /// that are gone are dropped.
    pub fn set_columns(&mut self, columns: Vec<ColumnSpec>) {
        log::debug!("columns replaced: {} columns", columns.len());
        let before = self.column_keys();
        self.columns.update(&self.clock, |c| *c = columns);
        let after = self.column_keys();
        let removed: Vec<&String> = before.difference(&after).collect();
        if !removed.is_empty() {
            log::debug!("dropping references to removed columns: {removed:?}");
            let dropped = self.filters.update_if(&self.clock, |f| {
                removed.iter().fold(false, |changed, key| f.remove(key) || changed)
            });
            if dropped {
                self.after_filter_change();
            }
            let dropped = self.sorts.update_if(&self.clock, |s| {
                removed.iter().fold(false, |changed, key| s.remove(key) || changed)
            });
            if dropped {
                self.emit_sorts();
            }
        }
        self.sync_column_order();
        self.clamp_page();
    }

    fn column_keys(&self) -> BTreeSet<String> {
        self.processed().0.iter().map(|c| c.key.clone()).collect()
    }

    /// Identity of a row.
    pub fn row_key_of(&self, row: &T) -> RowKey {
        match &self.row_key {
            Some(key_fn) => key_fn(row),
            None => RowKey(row.field(&self.config.row_key_field).to_text().into_owned()),
        }
    }

    // ------------------------------------------------------------------
    // Pipeline
    // ------------------------------------------------------------------

    fn computed_values(&self) -> (Rc<ComputedValues>, Revision) {
        let inputs = [self.rows.revision(), self.computed.revision()];
        self.computed_memo.get(&self.clock, &inputs, || {
            self.computed
                .iter()
                .map(|def| {
                    let values: Vec<String> =
                        self.rows.iter().map(|row| def.evaluate(row)).collect();
                    (def.key.clone(), values)
                })
                .collect()
        })
    }

    fn cell<'a>(&'a self, computed: &'a ComputedValues, index: usize, key: &str) -> Value<'a> {
        match computed.get(key) {
            Some(values) => values
                .get(index)
                .map_or(Value::None, |v| Value::from(v.as_str())),
            None => self.rows[index].field(key),
        }
    }

    fn filtered(&self) -> (Rc<Vec<usize>>, Revision) {
        let (computed, computed_rev) = self.computed_values();
        let inputs = [
            self.rows.revision(),
            self.filters.revision(),
            computed_rev,
            self.filtering.revision(),
        ];
        self.filtered_memo.get(&self.clock, &inputs, || {
            let all: Vec<usize> = (0..self.rows.len()).collect();
            if !*self.filtering.value() {
                return all;
            }
            apply_filtering(&all, self.filters.entries(), |i, key| {
                self.cell(&computed, i, key)
            })
        })
    }

    fn sorted(&self) -> (Rc<Vec<usize>>, Revision) {
        let (filtered, filtered_rev) = self.filtered();
        let (computed, computed_rev) = self.computed_values();
        let inputs = [
            filtered_rev,
            self.sorts.revision(),
            self.comparators.revision(),
            computed_rev,
        ];
        self.sorted_memo.get(&self.clock, &inputs, || {
            let comparators = self.comparators.value();
            apply_sorting(
                &filtered,
                self.sorts.entries(),
                |i, key| self.cell(&computed, i, key),
                |key, a, b, direction| {
                    comparators
                        .get(key)
                        .map(|compare| compare(&self.rows[a], &self.rows[b], direction))
                },
            )
        })
    }

    fn paged(&self) -> (Rc<Vec<usize>>, Revision) {
        let (sorted, sorted_rev) = self.sorted();
        let inputs = [sorted_rev, self.page.revision(), self.paging.revision()];
        self.paged_memo.get(&self.clock, &inputs, || {
            let mut cursor = *self.page.value();
            cursor.clamp(sorted.len());
            apply_pagination(&sorted, &cursor, *self.paging.value())
        })
    }

    fn windowed(&self) -> (Rc<VirtualWindow>, Revision) {
        let (paged, paged_rev) = self.paged();
        let inputs = [paged_rev, self.scroll_top.revision(), self.windowing.revision()];
        self.window_memo.get(&self.clock, &inputs, || {
            let Some(settings) = *self.windowing.value() else {
                return VirtualWindow::identity(paged.len());
            };
            compute_window(
                paged.len(),
                &WindowParams {
                    scroll_top: *self.scroll_top.value(),
                    item_height: settings.item_height,
                    buffer: settings.buffer,
                    viewport_height: settings.viewport_height,
                },
            )
        })
    }

    fn processed(&self) -> (Rc<Vec<Column>>, Revision) {
        let inputs = [self.columns.revision(), self.computed.revision()];
        self.columns_memo.get(&self.clock, &inputs, || {
            let mut specs = self.columns.value().clone();
            specs.extend(self.computed.specs());
            process_columns(&specs)
        })
    }

    /// The rows to render.
    pub fn view(&self) -> TableView<'_, T> {
        let (page, _) = self.paged();
        let (window, _) = self.windowed();
        TableView {
            rows: &self.rows,
            page,
            window: *window,
        }
    }

    /// Row indices after filtering and sorting, across all pages.
    pub fn sorted_indices(&self) -> Rc<Vec<usize>> {
        self.sorted().0
    }

    /// Number of rows that pass the filters.
    pub fn filtered_count(&self) -> usize {
        self.filtered().0.len()
    }

    /// Processed columns, base columns first, then computed columns.
    pub fn columns(&self) -> Rc<Vec<Column>> {
        self.processed().0
    }

    pub fn column(&self, key: &str) -> Option<Column> {
        self.processed().0.iter().find(|c| c.key == key).cloned()
    }

    /// The columns to render.
    pub fn layout(&self) -> Rc<ColumnLayout> {
        let (processed, processed_rev) = self.processed();
        let inputs = [
            processed_rev,
            self.layout_state.revision(),
            self.layout_options.revision(),
        ];
        self.layout_memo
            .get(&self.clock, &inputs, || {
                compose(&processed, self.layout_state.value(), *self.layout_options.value())
            })
            .0
    }

    /// Full column key order, hidden columns included.
    pub fn column_order(&self) -> Vec<String> {
        let processed = self.processed().0;
        let mut by_static: Vec<&Column> = processed.iter().collect();
        by_static.sort_by_key(|c| c.order);
        let keys: Vec<&str> = by_static.iter().map(|c| c.key.as_str()).collect();
        let order = ordered_keys(&keys, self.layout_state.order())
            .into_iter()
            .map(str::to_string)
            .collect();
        order
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            computed: self.computed_memo.runs(),
            filtered: self.filtered_memo.runs(),
            sorted: self.sorted_memo.runs(),
            paged: self.paged_memo.runs(),
            windowed: self.window_memo.runs(),
            columns: self.columns_memo.runs(),
            layout: self.layout_memo.runs(),
        }
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Takes every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<TableEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: TableEvent) {
        log::trace!("emitting {}", event.name());
        self.events.push(event);
    }

    fn emit_selection(&mut self, row: Option<RowKey>, is_selected: bool) {
        let selected = self.selection.keys().clone();
        self.emit(TableEvent::SelectionChanged {
            selected,
            row,
            is_selected,
        });
    }

    fn emit_page(&mut self) {
        let (page, page_size) = (self.page.current_page(), self.page.page_size());
        self.emit(TableEvent::PageChanged { page, page_size });
    }

    fn emit_sorts(&mut self) {
        let sorts = self.sorts.entries().to_vec();
        self.emit(TableEvent::SortChanged { sorts });
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Flips one row's selection. Returns `false` when selection is disabled.
    pub fn toggle_row(&mut self, key: impl Into<RowKey>) -> bool {
        if !self.config.enable_row_selection {
            return false;
        }
        let key = key.into();
        let is_selected = self.selection.toggle(key.clone());
        log::debug!("row {key} selected: {is_selected}");
        self.emit_selection(Some(key), is_selected);
        true
    }

    /// Selects or deselects one row. Returns `true` if the selection changed.
    pub fn set_row_selected(&mut self, key: impl Into<RowKey>, selected: bool) -> bool {
        let key = key.into();
        if !self.config.enable_row_selection || self.selection.is_selected(&key) == selected {
            return false;
        }
        self.toggle_row(key)
    }

    /// Selects every row that passes the filters.
    pub fn select_all(&mut self) -> bool {
        if !self.config.enable_row_selection {
            return false;
        }
        let keys = self.filtered_keys();
        let changed = self.selection.select_all(keys);
        if changed {
            log::debug!("selected all: {} rows", self.selection.len());
            self.emit_selection(None, true);
        }
        changed
    }

    /// Header checkbox: deselects the filtered rows when all are selected,
    /// otherwise selects them all.
    pub fn toggle_all(&mut self) -> bool {
        if !self.is_all_selected() {
            return self.select_all();
        }
        let keys: BTreeSet<RowKey> = self.filtered_keys().into_iter().collect();
        let changed = self.selection.retain(|key| !keys.contains(key));
        if changed {
            log::debug!("deselected all filtered rows");
            self.emit_selection(None, false);
        }
        changed
    }

    pub fn clear_selection(&mut self) -> bool {
        let changed = self.selection.clear();
        if changed {
            log::debug!("selection cleared");
            self.emit_selection(None, false);
        }
        changed
    }

    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.config.selection_mode = mode;
        if self.selection.set_mode(mode) {
            self.emit_selection(None, true);
        }
    }

    fn filtered_keys(&self) -> Vec<RowKey> {
        self.filtered()
            .0
            .iter()
            .map(|&i| self.row_key_of(&self.rows[i]))
            .collect()
    }

    pub fn is_row_selected(&self, key: &RowKey) -> bool {
        self.selection.is_selected(key)
    }

    /// `true` when at least one row passes the filters and all such rows are
    /// selected.
    pub fn is_all_selected(&self) -> bool {
        let keys = self.filtered_keys();
        !keys.is_empty() && keys.iter().all(|k| self.selection.is_selected(k))
    }

    /// `true` when some, but not all, filtered rows are selected.
    pub fn is_partially_selected(&self) -> bool {
        let keys = self.filtered_keys();
        let selected = keys
            .iter()
            .filter(|k| self.selection.is_selected(k))
            .count();
        selected > 0 && selected < keys.len()
    }

    pub fn selected_keys(&self) -> &BTreeSet<RowKey> {
        self.selection.keys()
    }

    /// Selected rows in input order.
    pub fn selected_rows(&self) -> Vec<&T> {
        self.rows
            .iter()
            .filter(|row| self.selection.is_selected(&self.row_key_of(row)))
            .collect()
    }

    // ------------------------------------------------------------------
    // Sorting
    // ------------------------------------------------------------------

    /// Handles a header click. Unknown and non-sortable columns are ignored;
    /// `multi` falls back to a plain click when multi-sort is disabled.
    pub fn click_header(&mut self, key: &str, multi: bool) -> bool {
        if !self.column(key).is_some_and(|c| c.sortable) {
            return false;
        }
        let multi = multi && self.config.enable_multi_sort;
        self.sorts.update(&self.clock, |sorts| sorts.click(key, multi));
        log::debug!(
            "sort click on {key} (multi: {multi}): {:?}",
            self.sorts.direction_of(key)
        );
        self.emit_sorts();
        true
    }

    /// Replaces the sort entries.
    pub fn set_sorts(&mut self, entries: Vec<SortEntry>) -> bool {
        let mut next = SortState::new();
        next.set(entries);
        let changed = self.sorts.update_if(&self.clock, |sorts| {
            if *sorts == next {
                return false;
            }
            *sorts = next;
            true
        });
        if changed {
            self.emit_sorts();
        }
        changed
    }

    pub fn sorts(&self) -> &SortState {
        &self.sorts
    }

    pub fn reset_sort(&mut self) -> bool {
        let changed = self.sorts.update_if(&self.clock, SortState::clear);
        if changed {
            log::debug!("sort reset");
            self.emit_sorts();
        }
        changed
    }

    // ------------------------------------------------------------------
    // Filtering
    // ------------------------------------------------------------------

    /// Sets the filter for a column, replacing any previous one. A blank
    /// value removes it. Unknown and non-filterable columns are ignored.
    pub fn set_filter(&mut self, entry: FilterEntry) -> bool {
        if !self.config.enable_filtering || !self.column(&entry.key).is_some_and(|c| c.filterable)
        {
            return false;
        }
        log::debug!("filter on {}: {} {:?}", entry.key, entry.operator, entry.value);
        let changed = self.filters.update_if(&self.clock, |filters| filters.set(entry));
        if changed {
            self.after_filter_change();
        }
        changed
    }

    /// Sets a column filter from free-text input, keeping the column's
    /// current operator or falling back to its filter type's default.
    pub fn set_filter_text(&mut self, key: &str, text: &str) -> bool {
        let Some(column) = self.column(key) else {
            return false;
        };
        let operator = match self.filters.get(key) {
            Some(existing) => existing.operator.clone(),
            None => column.filter_type.default_operator(),
        };
        self.set_filter(FilterEntry::new(key, FilterValue::from(text), operator))
    }

    pub fn remove_filter(&mut self, key: &str) -> bool {
        let changed = self.filters.update_if(&self.clock, |filters| filters.remove(key));
        if changed {
            self.after_filter_change();
        }
        changed
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn reset_filters(&mut self) -> bool {
        let changed = self.filters.update_if(&self.clock, FilterState::clear);
        if changed {
            self.after_filter_change();
        }
        changed
    }

    fn after_filter_change(&mut self) {
        log::debug!("filters changed: {} active", self.filters.len());
        let filters = self.filters.entries().to_vec();
        self.emit(TableEvent::FilterChanged { filters });
        if self.page.update_if(&self.clock, PageCursor::reset) {
            self.emit_page();
        }
    }

    // ------------------------------------------------------------------
    // Pagination
    // ------------------------------------------------------------------

    pub fn current_page(&self) -> usize {
        self.page.current_page()
    }

    pub fn page_size(&self) -> usize {
        self.page.page_size()
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.config.page_size_options
    }

    pub fn total_pages(&self) -> usize {
        self.page.total_pages(self.filtered_count())
    }

    pub fn page_range(&self) -> PageRange {
        self.page.page_range(self.filtered_count())
    }

    fn navigate(&mut self, step: impl FnOnce(&mut PageCursor, usize) -> bool) -> bool {
        let total = self.filtered_count();
        let changed = self.page.update_if(&self.clock, |cursor| step(cursor, total));
        if changed {
            log::debug!("page {} of {}", self.page.current_page(), self.page.total_pages(total));
            self.emit_page();
        }
        changed
    }

    /// Moves to `page`. Pages outside `[1, total_pages]` are ignored.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        self.navigate(|cursor, total| cursor.go_to(page, total))
    }

    pub fn next_page(&mut self) -> bool {
        self.navigate(PageCursor::next)
    }

    pub fn previous_page(&mut self) -> bool {
        self.navigate(PageCursor::previous)
    }

    pub fn first_page(&mut self) -> bool {
        self.navigate(PageCursor::first)
    }

    pub fn last_page(&mut self) -> bool {
        self.navigate(PageCursor::last)
    }

    /// Changes the page size and returns to page 1.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        self.navigate(|cursor, _| cursor.set_page_size(page_size))
    }

    fn clamp_page(&mut self) {
        self.navigate(PageCursor::clamp);
    }

    // ------------------------------------------------------------------
    // Scrolling
    // ------------------------------------------------------------------

    pub fn scroll_top(&self) -> f64 {
        *self.scroll_top.value()
    }

    pub fn set_scroll_top(&mut self, scroll_top: f64) -> bool {
        self.scroll_top.assign(&self.clock, scroll_top)
    }

    /// Scrolls so that the `index`-th row of the current page is on top.
    pub fn scroll_to_row(&mut self, index: usize) -> bool {
        let offset = scroll_offset_for(index, self.config.virtual_scroll_item_height);
        self.set_scroll_top(offset)
    }

    // ------------------------------------------------------------------
    // Column layout
    // ------------------------------------------------------------------

    pub fn layout_state(&self) -> &LayoutState {
        &self.layout_state
    }

    fn resizable_column(&self, key: &str) -> Option<Column> {
        if !self.config.enable_column_resize {
            return None;
        }
        self.column(key).filter(|c| c.resizable)
    }

    /// Sets a column width, clamped to its bounds.
    pub fn resize_column(&mut self, key: &str, width: u32) -> bool {
        let Some(column) = self.resizable_column(key) else {
            return false;
        };
        let width = column.clamp_width(width);
        let changed = self
            .layout_state
            .update_if(&self.clock, |state| state.set_width(key, width));
        if changed {
            log::debug!("column {key} resized to {width}");
            self.emit(TableEvent::ColumnResized {
                column: key.to_string(),
                width,
            });
        }
        changed
    }

    /// Starts a resize session from the column's current width.
    pub fn begin_resize(&mut self, key: &str) -> bool {
        let Some(column) = self.resizable_column(key) else {
            return false;
        };
        let current = self.layout_state.width_of(key).unwrap_or(column.width);
        self.resize = Some(ResizeDrag::begin(&column, current));
        true
    }

    /// Previews an absolute width. Returns the clamped width.
    pub fn resize_to(&mut self, width: u32) -> Option<u32> {
        self.resize.as_mut().map(|drag| drag.resize_to(width))
    }

    /// Previews a width from the pointer distance since the start.
    pub fn resize_by(&mut self, delta: i64) -> Option<u32> {
        self.resize.as_mut().map(|drag| drag.drag_by(delta))
    }

    /// Column key and width of the resize in progress.
    pub fn resize_preview(&self) -> Option<(&str, u32)> {
        self.resize.as_ref().map(|drag| (drag.key(), drag.width()))
    }

    pub fn commit_resize(&mut self) -> bool {
        let Some(drag) = self.resize.take() else {
            return false;
        };
        let mut committed = None;
        self.layout_state.update_if(&self.clock, |state| {
            committed = drag.commit(state);
            committed.is_some()
        });
        match committed {
            Some((column, width)) => {
                log::debug!("column {column} resized to {width}");
                self.emit(TableEvent::ColumnResized { column, width });
                true
            }
            None => false,
        }
    }

    pub fn cancel_resize(&mut self) -> bool {
        self.resize.take().is_some()
    }

    /// Starts dragging a column header.
    pub fn begin_reorder(&mut self, key: &str) -> bool {
        if !self.config.enable_column_reorder || self.column(key).is_none() {
            return false;
        }
        self.reorder = Some(ReorderDrag::begin(key));
        true
    }

    /// Records the header currently under the dragged one.
    pub fn reorder_target(&mut self, key: &str) -> bool {
        match self.reorder.as_mut() {
            Some(drag) => {
                drag.hover(key);
                true
            }
            None => false,
        }
    }

    /// Drops the dragged column onto the current target.
    pub fn commit_reorder(&mut self) -> bool {
        let Some(drag) = self.reorder.take() else {
            return false;
        };
        let order = self.column_order();
        let mut outcome = None;
        self.layout_state.update_if(&self.clock, |state| {
            outcome = drag.commit(order, state);
            outcome.is_some()
        });
        let Some(moved) = outcome else {
            return false;
        };
        log::debug!(
            "column {} moved from {} to {}",
            moved.moved_column,
            moved.from_index,
            moved.to_index
        );
        self.emit(TableEvent::ColumnReordered {
            columns: moved.columns,
            moved_column: moved.moved_column,
            from_index: moved.from_index,
            to_index: moved.to_index,
        });
        true
    }

    pub fn cancel_reorder(&mut self) -> bool {
        self.reorder.take().is_some()
    }

    fn set_freeze(&mut self, key: &str, value: FreezeOverride) -> bool {
        if !self.config.enable_frozen_columns || self.column(key).is_none() {
            return false;
        }
        let changed = self
            .layout_state
            .update_if(&self.clock, |state| state.set_freeze(key, value));
        if changed {
            log::debug!("column {key} freeze: {value:?}");
        }
        changed
    }

    /// Pins a column to an edge.
    pub fn freeze_column(&mut self, key: &str, position: FrozenPosition) -> bool {
        self.set_freeze(key, position.into())
    }

    /// Makes a column scroll, even if declared frozen.
    pub fn unfreeze_column(&mut self, key: &str) -> bool {
        self.set_freeze(key, FreezeOverride::Unfrozen)
    }

    /// Returns a column to its declared freeze state.
    pub fn clear_freeze(&mut self, key: &str) -> bool {
        self.layout_state
            .update_if(&self.clock, |state| state.clear_freeze(key))
    }

    /// Edge a visible column is pinned to in the current layout.
    pub fn frozen_position(&self, key: &str) -> Option<FrozenPosition> {
        let layout = self.layout();
        if layout.left.iter().any(|p| p.key() == key) {
            Some(FrozenPosition::Left)
        } else if layout.right.iter().any(|p| p.key() == key) {
            Some(FrozenPosition::Right)
        } else {
            None
        }
    }

    pub fn is_column_visible(&self, key: &str) -> bool {
        self.column(key).is_some_and(|c| {
            self.layout_state.visibility_of(key).unwrap_or(c.visible)
        })
    }

    fn set_column_visible(&mut self, key: &str, visible: bool) -> bool {
        if self.column(key).is_none() || self.is_column_visible(key) == visible {
            return false;
        }
        log::debug!("column {key} visible: {visible}");
        self.layout_state
            .update_if(&self.clock, |state| state.set_visible(key, visible))
    }

    pub fn hide_column(&mut self, key: &str) -> bool {
        self.set_column_visible(key, false)
    }

    pub fn show_column(&mut self, key: &str) -> bool {
        self.set_column_visible(key, true)
    }

    pub fn toggle_column_visibility(&mut self, key: &str) -> bool {
        let visible = self.is_column_visible(key);
        self.set_column_visible(key, !visible)
    }

    pub fn show_all_columns(&mut self) -> bool {
        let hidden: Vec<String> = self
            .processed()
            .0
            .iter()
            .filter(|c| !self.layout_state.visibility_of(&c.key).unwrap_or(c.visible))
            .map(|c| c.key.clone())
            .collect();
        if hidden.is_empty() {
            return false;
        }
        log::debug!("showing {} hidden columns", hidden.len());
        self.layout_state.update(&self.clock, |state| {
            for key in &hidden {
                state.set_visible(key, true);
            }
        });
        true
    }

    fn sync_column_order(&mut self) {
        let keys = self.column_order();
        self.layout_state
            .update_if(&self.clock, |state| state.init_order_if_empty(keys));
    }

    // ------------------------------------------------------------------
    // Computed columns
    // ------------------------------------------------------------------

    pub fn computed_columns(&self) -> &ComputedColumns {
        &self.computed
    }

    /// The computed-column editor, for reading the draft.
    pub fn editor(&self) -> &ComputedColumnEditor {
        &self.editor
    }

    /// The computed-column editor, for draft edits. Saving goes through
    /// [`save_computed_column`](Self::save_computed_column).
    pub fn editor_mut(&mut self) -> &mut ComputedColumnEditor {
        &mut self.editor
    }

    pub fn open_new_computed_column(&mut self) {
        self.editor.open_new();
    }

    pub fn open_edit_computed_column(&mut self, key: &str) -> Result<()> {
        self.editor.open_edit(&self.computed, key)
    }

    /// Saves the editor draft. Returns the column key.
    ///
    /// # Errors
    ///
    /// See [`ComputedColumnEditor::save`]. On error the editor stays open.
    pub fn save_computed_column(&mut self) -> Result<String> {
        let editor = &mut self.editor;
        let reserved: Vec<&str> = self.columns.iter().map(|c| c.key.as_str()).collect();
        let mut saved = Err(TableError::EditorClosed);
        self.computed.update_if(&self.clock, |computed| {
            saved = editor.save(computed, &reserved);
            saved.is_ok()
        });
        let key = saved?;
        log::debug!("computed column {key} saved");
        self.sync_column_order();
        self.clamp_page();
        Ok(key)
    }

    pub fn cancel_computed_column(&mut self) -> bool {
        self.editor.cancel()
    }

    /// Deletes a computed column along with its filter, sort, layout and
    /// color references.
    pub fn remove_computed_column(&mut self, key: &str) -> Result<()> {
        let removed = self
            .computed
            .update_if(&self.clock, |computed| computed.remove(key).is_some());
        if !removed {
            return Err(TableError::UnknownComputedColumn(key.to_string()));
        }
        log::debug!("computed column {key} removed");
        if self.filters.update_if(&self.clock, |f| f.remove(key)) {
            self.after_filter_change();
        }
        if self.sorts.update_if(&self.clock, |s| s.remove(key)) {
            self.emit_sorts();
        }
        self.layout_state
            .update_if(&self.clock, |state| state.forget(key));
        self.colors.forget_column(key);
        if self.editor.editing() == Some(key) {
            self.editor.cancel();
        }
        self.clamp_page();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Colors
    // ------------------------------------------------------------------

    pub fn colors(&self) -> &ColorAssignments {
        &self.colors
    }

    pub fn set_row_color(&mut self, row: impl Into<RowKey>, color: &str) -> bool {
        self.colors.set_row(row.into(), color)
    }

    pub fn set_column_color(&mut self, column: &str, color: &str) -> bool {
        self.colors.set_column(column, color)
    }

    pub fn set_cell_color(&mut self, row: impl Into<RowKey>, column: &str, color: &str) -> bool {
        self.colors.set_cell(row.into(), column, color)
    }

    pub fn clear_colors(&mut self) -> bool {
        self.colors.clear()
    }

    /// Effective background of a cell: cell, then row, then column.
    pub fn cell_color(&self, row: &RowKey, column: &str) -> Option<&str> {
        self.colors.resolve(row, column)
    }

    // ------------------------------------------------------------------
    // Cells and export
    // ------------------------------------------------------------------

    /// Raw value of a cell; computed columns are evaluated.
    pub fn cell_value<'a>(&self, row: &'a T, column: &str) -> Value<'a> {
        match self.computed.get(column) {
            Some(definition) => Value::from(definition.evaluate(row)),
            None => row.field(column),
        }
    }

    /// Display text of a cell: the column's formatter if registered,
    /// otherwise rendering by cell type.
    pub fn cell_text(&self, row: &T, column: &str) -> String {
        let value = self.cell_value(row, column);
        if let Some(formatter) = self.formatters.get(column) {
            return formatter(&value);
        }
        let cell_type = self
            .column(column)
            .map_or(CellType::Text, |c| c.cell_type);
        format_cell(&value, cell_type)
    }

    /// Snapshot of the current page with the visible columns and colors.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::EmptyExport`] when the page has no rows.
    pub fn export_snapshot(&self) -> Result<ExportSnapshot> {
        let page = self.paged().0;
        if page.is_empty() {
            return Err(TableError::EmptyExport);
        }
        let columns: Vec<ExportColumn> = self
            .layout()
            .iter()
            .map(|placed| ExportColumn {
                key: placed.column.key.clone(),
                title: placed.column.title.clone(),
                cell_type: placed.column.cell_type,
            })
            .collect();
        let rows = page
            .iter()
            .map(|&index| {
                let row = &self.rows[index];
                let key = self.row_key_of(row);
                let cells = columns
                    .iter()
                    .map(|c| self.cell_text(row, &c.key))
                    .collect();
                let colors = columns
                    .iter()
                    .map(|c| self.colors.resolve(&key, &c.key).map(str::to_string))
                    .collect();
                ExportRow { key, cells, colors }
            })
            .collect();
        log::debug!("export snapshot: {} rows x {} columns", page.len(), columns.len());
        Ok(ExportSnapshot { columns, rows })
    }

    /// Hands the current snapshot to an exporter.
    pub fn export_with<E: Exporter>(&self, exporter: &mut E) -> Result<E::Output> {
        let snapshot = self.export_snapshot()?;
        Ok(exporter.export(&snapshot))
    }

    // ------------------------------------------------------------------
    // Resets
    // ------------------------------------------------------------------

    /// Clears sorting, filters and selection and returns to page 1.
    pub fn reset_all(&mut self) {
        log::debug!("resetting table state");
        self.reset_sort();
        self.reset_filters();
        self.clear_selection();
        if self.page.update_if(&self.clock, PageCursor::reset) {
            self.emit_page();
        }
    }
}
