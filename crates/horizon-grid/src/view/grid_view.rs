//! The grid view: keeps rendered rows and cells in step with the model and
//! the data source.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use horizon_grid_core::logging::{span_names, targets};
use horizon_grid_core::{ConnectionGuard, GridError, PerfSpan, Result};
use serde_json::Value;

use super::data_row::DataRow;
use super::header::HeaderRow;
use crate::format::{CellResolver, FormatterRegistry};
use crate::model::{
    ArrayDataSource, ChangeSet, Column, DataConnection, DefaultsRegistry, ExpansionState, GridModel,
    GridModelEvent, Identity, IterableDiffer, MutationKind, RowContext, RowPosition,
};
use crate::outlet::Outlet;

/// A row record as published by the data source.
pub type Record = Rc<Value>;

/// How rows are tracked across data source publishes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    /// The record allocation itself.
    Identity(usize),
    /// A key derived by a track-by function.
    Key(String),
}

struct ViewState {
    model: GridModel,
    defaults: Rc<DefaultsRegistry>,
    resolver: Rc<CellResolver>,
    column_differ: IterableDiffer<Column>,
    /// Columns in the order the header and rows were rendered with.
    rendered_columns: Vec<Column>,
    row_differ: IterableDiffer<Record, RowKey>,
    header: Option<HeaderRow>,
    rows: Outlet<DataRow>,
}

impl ViewState {
    fn new(model: GridModel) -> Self {
        Self {
            model,
            defaults: Rc::new(DefaultsRegistry::new()),
            resolver: Rc::new(CellResolver::default()),
            column_differ: IterableDiffer::new(),
            rendered_columns: Vec::new(),
            row_differ: IterableDiffer::with_track_by(|_, record: &Record| {
                RowKey::Identity(record.identity())
            }),
            header: None,
            rows: Outlet::new(),
        }
    }

    /// Build the header on first attach; reconcile with the model on reattach.
    fn setup(&mut self) {
        let columns = self.model.columns();
        self.defaults.apply_defaults(&columns);
        if self.header.is_some() {
            self.columns_changed(&columns);
        } else {
            self.column_differ.diff(&columns);
            self.header = Some(HeaderRow::new(&self.model, self.resolver.clone()));
            self.rendered_columns = columns;
        }
    }

    fn model_changed(&mut self, event: &GridModelEvent) {
        let _span = PerfSpan::new(span_names::COLUMNS);
        self.defaults.apply_defaults(&event.columns);
        self.columns_changed(&event.columns);

        if event.kind == MutationKind::Update {
            if let Some(column) = &event.column {
                if let Some(header) = self.header.as_mut() {
                    header.refresh_column(column);
                }
                for row in self.rows.iter_mut() {
                    row.refresh_column(column);
                }
            }
        }
    }

    fn columns_changed(&mut self, columns: &[Column]) {
        let Some(changes) = self.column_differ.diff(columns) else {
            return;
        };
        let mut result = match self.header.as_mut() {
            Some(header) => header.apply_column_changes(&changes),
            None => Ok(()),
        };
        for row in self.rows.iter_mut() {
            result = result.and(row.apply_column_changes(&changes));
        }
        result = result.and(changes.apply_to(&mut self.rendered_columns, Column::clone));
        if let Err(err) = result {
            tracing::error!(target: targets::VIEW, error = %err, "failed to apply column changes");
        }
    }

    fn data_changed(&mut self, records: &[Record]) {
        let _span = PerfSpan::new(span_names::ROWS);
        if let Some(changes) = self.row_differ.diff(records) {
            if let Err(err) = self.apply_row_changes(&changes) {
                tracing::error!(target: targets::VIEW, error = %err, "failed to apply row changes");
            }
        }
        let count = self.rows.len();
        for (index, row) in self.rows.iter().enumerate() {
            row.context().set_position(RowPosition::new(index, count));
        }
    }

    fn apply_row_changes(&mut self, changes: &ChangeSet<Record>) -> Result<()> {
        for record in changes.removals() {
            self.rows.remove(record.previous_index)?;
        }
        for record in changes.additions() {
            let context = RowContext::new(record.item.clone(), self.model.clone());
            let row = DataRow::new(context, &self.rendered_columns, self.resolver.clone());
            self.rows.insert(record.current_index, row)?;
        }
        tracing::debug!(
            target: targets::VIEW,
            added = changes.added().len(),
            removed = changes.removed().len(),
            rows = self.rows.len(),
            "rows reconciled"
        );
        Ok(())
    }
}

/// Runs `f` on the view state unless it is already borrowed.
fn with_state(weak: &Weak<RefCell<ViewState>>, what: &str, f: impl FnOnce(&mut ViewState)) {
    let Some(state) = weak.upgrade() else {
        return;
    };
    match state.try_borrow_mut() {
        Ok(mut state) => f(&mut *state),
        Err(_) => tracing::warn!(
            target: targets::VIEW,
            notification = what,
            "ignoring notification delivered while the grid view is busy"
        ),
    };
}

/// A headless grid view.
///
/// Attaching merges column defaults, renders the header row and starts
/// observing the model and the data source. From then on every model event
/// reconciles header and data cells, and every data publish reconciles the
/// rendered rows, creating a [`RowContext`] for each row that appears and
/// dropping the context of each row that goes away.
///
/// # Example
///
/// ```
/// use horizon_grid::prelude::*;
/// use serde_json::json;
///
/// let model = GridModel::new();
/// model.add_column(Column::new("firstName"));
///
/// let source = ArrayDataSource::new();
/// source.add_item(json!({"firstName": "Peter"}));
/// source.reload();
///
/// let mut view = GridView::new(model.clone()).with_data_source(source.clone());
/// view.attach();
/// assert_eq!(view.header_texts(), vec!["First Name "]);
/// assert_eq!(view.row_texts(0), Some(vec!["Peter".to_string()]));
///
/// model.add_column(Column::new("email"));
/// assert_eq!(view.header_texts(), vec!["First Name ", "Email "]);
/// ```
pub struct GridView {
    state: Rc<RefCell<ViewState>>,
    data_source: Option<ArrayDataSource<Value>>,
    model_connection: Option<ConnectionGuard<GridModelEvent>>,
    data_connection: Option<DataConnection<Value>>,
}

impl GridView {
    pub fn new(model: GridModel) -> Self {
        Self {
            state: Rc::new(RefCell::new(ViewState::new(model))),
            data_source: None,
            model_connection: None,
            data_connection: None,
        }
    }

    /// Use a specific defaults registry.
    pub fn with_defaults(self, defaults: Rc<DefaultsRegistry>) -> Self {
        self.state.borrow_mut().defaults = defaults;
        self
    }

    /// Use a specific formatter registry.
    pub fn with_formatters(self, formatters: FormatterRegistry) -> Self {
        self.state.borrow_mut().resolver = Rc::new(CellResolver::new(Rc::new(formatters)));
        self
    }

    /// Track rows by a key derived from each record instead of by identity.
    ///
    /// On a view that already rendered rows, the new keys are taken from
    /// those rows so the next publish only reports real changes.
    pub fn with_track_by<F>(self, track_by: F) -> Self
    where
        F: Fn(usize, &Value) -> String + 'static,
    {
        {
            let mut state = self.state.borrow_mut();
            let mut differ = IterableDiffer::with_track_by(move |index, record: &Record| {
                RowKey::Key(track_by(index, record.as_ref()))
            });
            if state.row_differ.has_snapshot() {
                let rendered: Vec<Record> = state
                    .rows
                    .iter()
                    .map(|row| row.context().record().clone())
                    .collect();
                differ.diff(&rendered);
            }
            state.row_differ = differ;
        }
        self
    }

    pub fn with_data_source(mut self, source: ArrayDataSource<Value>) -> Self {
        self.set_data_source(source);
        self
    }

    /// Switch to another data source.
    ///
    /// When attached, the rows are reconciled against whatever the new
    /// source last published.
    pub fn set_data_source(&mut self, source: ArrayDataSource<Value>) {
        if let Some(current) = &self.data_source {
            if ArrayDataSource::ptr_eq(current, &source) {
                return;
            }
        }
        if let Some(connection) = self.data_connection.take() {
            connection.disconnect();
        }
        self.data_source = Some(source);
        if self.is_attached() {
            self.observe_data_source();
        }
    }

    pub fn data_source(&self) -> Option<&ArrayDataSource<Value>> {
        self.data_source.as_ref()
    }

    pub fn model(&self) -> GridModel {
        self.state.borrow().model.clone()
    }

    pub fn is_attached(&self) -> bool {
        self.model_connection.is_some()
    }

    /// Render the header and start observing. Does nothing if already attached.
    pub fn attach(&mut self) {
        if self.is_attached() {
            return;
        }
        let _span = PerfSpan::new(span_names::RENDER);
        self.state.borrow_mut().setup();

        let model = self.model();
        let weak = Rc::downgrade(&self.state);
        self.model_connection = Some(model.changes().connect_scoped(move |event| {
            with_state(&weak, "model", |state| state.model_changed(event));
        }));
        self.observe_data_source();
        tracing::debug!(target: targets::VIEW, columns = model.column_count(), "grid view attached");
    }

    fn observe_data_source(&mut self) {
        let Some(source) = &self.data_source else {
            return;
        };
        let connection = source.connect();
        let weak = Rc::downgrade(&self.state);
        connection.subscribe(move |records| {
            with_state(&weak, "data", |state| state.data_changed(records));
        });
        self.data_connection = Some(connection);
    }

    /// Stop observing the model and the data source. Safe to call twice.
    ///
    /// Rendered rows stay as they are until the view is attached again.
    pub fn detach(&mut self) {
        let was_attached = self.model_connection.take().is_some();
        if let Some(connection) = self.data_connection.take() {
            connection.disconnect();
        }
        if was_attached {
            tracing::debug!(target: targets::VIEW, "grid view detached");
        }
    }

    /// Classes for the outer container.
    pub fn container_classes(&self) -> Vec<String> {
        self.state.borrow().model.styles().container_classes.clone()
    }

    /// Classes for the grid element.
    pub fn grid_classes(&self) -> Vec<String> {
        let mut classes = vec!["am-grid".to_string()];
        classes.extend(self.state.borrow().model.styles().grid_classes.iter().cloned());
        classes
    }

    /// Header text per column; empty before the first attach.
    pub fn header_texts(&self) -> Vec<String> {
        self.state
            .borrow()
            .header
            .as_ref()
            .map(HeaderRow::texts)
            .unwrap_or_default()
    }

    pub fn row_count(&self) -> usize {
        self.state.borrow().rows.len()
    }

    /// Cell texts of the row at `index`.
    pub fn row_texts(&self, index: usize) -> Option<Vec<String>> {
        self.state.borrow().rows.get(index).map(DataRow::texts)
    }

    /// Cell texts of every rendered row.
    pub fn all_row_texts(&self) -> Vec<Vec<String>> {
        self.state.borrow().rows.iter().map(DataRow::texts).collect()
    }

    /// The context of the row at `index`.
    pub fn row_context(&self, index: usize) -> Option<RowContext> {
        self.state
            .borrow()
            .rows
            .get(index)
            .map(|row| row.context().clone())
    }

    /// Expand or collapse the row at `index`.
    pub fn toggle_row(&mut self, index: usize) -> Result<ExpansionState> {
        let mut state = self.state.borrow_mut();
        let len = state.rows.len();
        state
            .rows
            .get_mut(index)
            .map(DataRow::toggle_expander)
            .ok_or_else(|| GridError::index_out_of_range(index, len))
    }

    /// Inspect the header row.
    pub fn with_header<R>(&self, f: impl FnOnce(Option<&HeaderRow>) -> R) -> R {
        f(self.state.borrow().header.as_ref())
    }

    /// Inspect the rendered data rows.
    pub fn with_rows<R>(&self, f: impl FnOnce(&Outlet<DataRow>) -> R) -> R {
        let state: Ref<'_, ViewState> = self.state.borrow();
        f(&state.rows)
    }
}

impl Drop for GridView {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for GridView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("GridView");
        debug.field("attached", &self.is_attached());
        if let Ok(state) = self.state.try_borrow() {
            debug
                .field("columns", &state.model.column_count())
                .field("rows", &state.rows.len());
        }
        debug.finish_non_exhaustive()
    }
}
