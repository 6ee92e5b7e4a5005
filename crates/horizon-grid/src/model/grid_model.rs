//! The grid model: an ordered column collection with change notification.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use horizon_grid_core::logging::targets;
use horizon_grid_core::{GridError, Result, Signal};
use serde::Deserialize;

use super::column::Column;
use super::template::TemplateRef;
use crate::format::FormatterId;

/// The kind of mutation a [`GridModelEvent`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Add,
    Remove,
    Update,
}

/// Emitted by [`GridModel::changes`] after every mutation.
///
/// `columns` is the full column list after the mutation. `column` names
/// the column affected when the mutation was about a single one.
#[derive(Debug, Clone)]
pub struct GridModelEvent {
    pub kind: MutationKind,
    pub column: Option<Column>,
    pub columns: Vec<Column>,
}

/// Grid-wide behaviour switches.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridModelConfig {
    /// Rows can be selected.
    pub selection: bool,
    /// Render an expander toggle in front of every data row.
    pub show_expander: bool,
    /// Formatter that renders the detail region of expanded rows.
    pub expander_formatter: Option<FormatterId>,
    /// Template for the detail region. Wins over `expander_formatter`.
    #[serde(skip)]
    pub expander_template: Option<TemplateRef>,
}

impl GridModelConfig {
    /// Parse a grid configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| GridError::invalid_config(err.to_string()))
    }

    pub fn with_selection(mut self, selection: bool) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_expander(mut self, show_expander: bool) -> Self {
        self.show_expander = show_expander;
        self
    }

    pub fn with_expander_formatter(mut self, id: impl Into<FormatterId>) -> Self {
        self.expander_formatter = Some(id.into());
        self
    }

    pub fn with_expander_template(mut self, template: TemplateRef) -> Self {
        self.expander_template = Some(template);
        self
    }
}

/// Grid-wide style settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridModelStyles {
    /// Classes for the outer container.
    pub container_classes: Vec<String>,
    /// Classes for the grid element itself.
    pub grid_classes: Vec<String>,
    /// Allow horizontal scrolling.
    pub scroll_x: bool,
    pub min_width: Option<String>,
    pub max_width: Option<String>,
}

impl GridModelStyles {
    pub fn with_container_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.container_classes = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_grid_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grid_classes = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_scroll_x(mut self, scroll_x: bool) -> Self {
        self.scroll_x = scroll_x;
        self
    }
}

pub(crate) struct GridModelInner {
    config: GridModelConfig,
    styles: GridModelStyles,
    columns: RefCell<Vec<Column>>,
    changes: Signal<GridModelEvent>,
}

/// An ordered collection of columns that notifies observers of every change.
///
/// `GridModel` is a shared handle; clones refer to the same model. Every
/// mutation emits exactly one [`GridModelEvent`] on [`changes`](Self::changes)
/// after the column list has been updated, and no borrow of the model is held
/// while observers run, so a slot may read the model freely.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use horizon_grid::model::{Column, GridModel, MutationKind};
///
/// let model = GridModel::new();
/// let adds = Rc::new(Cell::new(0));
/// let counter = adds.clone();
/// model.changes().connect(move |event| {
///     if event.kind == MutationKind::Add {
///         counter.set(counter.get() + 1);
///     }
/// });
///
/// model.add_column(Column::new("firstName"));
/// model.add_column(Column::new("lastName"));
/// assert_eq!(adds.get(), 2);
/// assert_eq!(model.column_count(), 2);
/// ```
#[derive(Clone)]
pub struct GridModel {
    inner: Rc<GridModelInner>,
}

impl Default for GridModel {
    fn default() -> Self {
        Self::new()
    }
}

impl GridModel {
    /// Create an empty model with default configuration.
    pub fn new() -> Self {
        Self::with_config(GridModelConfig::default(), GridModelStyles::default())
    }

    /// Create an empty model with the given configuration and styles.
    pub fn with_config(config: GridModelConfig, styles: GridModelStyles) -> Self {
        Self {
            inner: Rc::new(GridModelInner {
                config,
                styles,
                columns: RefCell::new(Vec::new()),
                changes: Signal::new(),
            }),
        }
    }

    /// Create a model pre-populated with columns. No event is emitted.
    pub fn with_columns(
        config: GridModelConfig,
        styles: GridModelStyles,
        columns: Vec<Column>,
    ) -> Self {
        let model = Self::with_config(config, styles);
        for column in &columns {
            column.set_model(Some(&model));
        }
        *model.inner.columns.borrow_mut() = columns;
        model
    }

    pub(crate) fn from_inner(inner: Rc<GridModelInner>) -> Self {
        Self { inner }
    }

    pub(crate) fn downgrade(&self) -> Weak<GridModelInner> {
        Rc::downgrade(&self.inner)
    }

    /// Returns `true` if both handles refer to the same model.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    /// Signal emitted after every mutation.
    pub fn changes(&self) -> &Signal<GridModelEvent> {
        &self.inner.changes
    }

    pub fn config(&self) -> &GridModelConfig {
        &self.inner.config
    }

    pub fn styles(&self) -> &GridModelStyles {
        &self.inner.styles
    }

    /// A snapshot of the columns in display order.
    pub fn columns(&self) -> Vec<Column> {
        self.inner.columns.borrow().clone()
    }

    pub fn column_count(&self) -> usize {
        self.inner.columns.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.columns.borrow().is_empty()
    }

    pub fn column(&self, index: usize) -> Option<Column> {
        self.inner.columns.borrow().get(index).cloned()
    }

    /// The first column whose key is `key`.
    pub fn column_by_key(&self, key: &str) -> Option<Column> {
        self.inner
            .columns
            .borrow()
            .iter()
            .find(|column| column.with_config(|config| config.key == key))
            .cloned()
    }

    /// Position of `column` in the collection, by identity.
    pub fn index_of(&self, column: &Column) -> Option<usize> {
        self.inner
            .columns
            .borrow()
            .iter()
            .position(|c| Column::ptr_eq(c, column))
    }

    pub fn contains(&self, column: &Column) -> bool {
        self.index_of(column).is_some()
    }

    /// Append a column.
    pub fn add_column(&self, column: Column) {
        column.set_model(Some(self));
        self.inner.columns.borrow_mut().push(column.clone());
        self.notify(MutationKind::Add, Some(column));
    }

    /// Insert a column at `index`. An index equal to the length appends.
    pub fn insert_column(&self, column: Column, index: usize) -> Result<()> {
        {
            let mut columns = self.inner.columns.borrow_mut();
            if index > columns.len() {
                return Err(GridError::index_out_of_range(index, columns.len()));
            }
            columns.insert(index, column.clone());
        }
        column.set_model(Some(self));
        self.notify(MutationKind::Add, Some(column));
        Ok(())
    }

    /// Remove every occurrence of `column`. Emits even if nothing was removed.
    pub fn remove_column(&self, column: &Column) -> usize {
        let removed = {
            let mut columns = self.inner.columns.borrow_mut();
            let before = columns.len();
            columns.retain(|c| !Column::ptr_eq(c, column));
            before - columns.len()
        };
        self.release(std::slice::from_ref(column));
        self.notify(MutationKind::Remove, Some(column.clone()));
        removed
    }

    /// Remove the column at `index`.
    pub fn remove_column_by_index(&self, index: usize) -> Result<Column> {
        let removed = {
            let mut columns = self.inner.columns.borrow_mut();
            if index >= columns.len() {
                return Err(GridError::index_out_of_range(index, columns.len()));
            }
            columns.remove(index)
        };
        self.release(std::slice::from_ref(&removed));
        self.notify(MutationKind::Remove, Some(removed.clone()));
        Ok(removed)
    }

    /// Remove every column whose key is `key`. Emits even if nothing matched.
    pub fn remove_columns_by_key(&self, key: &str) -> usize {
        let removed: Vec<Column> = {
            let mut columns = self.inner.columns.borrow_mut();
            let (removed, kept): (Vec<Column>, Vec<Column>) = columns
                .drain(..)
                .partition(|column| column.with_config(|config| config.key == key));
            *columns = kept;
            removed
        };
        self.release(&removed);
        self.notify(MutationKind::Remove, None);
        removed.len()
    }

    /// Replace `column` in place and notify observers that it changed.
    ///
    /// Since columns are shared handles this mostly serves as a prompt for
    /// views to re-render cells after [`Column::update_config`].
    pub fn update_column(&self, column: &Column) {
        {
            let mut columns = self.inner.columns.borrow_mut();
            if let Some(slot) = columns.iter_mut().find(|c| Column::ptr_eq(c, column)) {
                *slot = column.clone();
            }
        }
        self.notify(MutationKind::Update, Some(column.clone()));
    }

    /// Remove every column.
    pub fn remove_all(&self) {
        let removed = std::mem::take(&mut *self.inner.columns.borrow_mut());
        self.release(&removed);
        self.notify(MutationKind::Remove, None);
    }

    /// Replace the whole column list.
    pub fn set_columns(&self, columns: Vec<Column>) {
        for column in &columns {
            column.set_model(Some(self));
        }
        let previous = std::mem::replace(&mut *self.inner.columns.borrow_mut(), columns);
        self.release(&previous);
        self.notify(MutationKind::Update, None);
    }

    /// Clear the back-reference of columns that are no longer in the model.
    fn release(&self, removed: &[Column]) {
        for column in removed {
            if !self.contains(column) {
                column.set_model(None);
            }
        }
    }

    fn notify(&self, kind: MutationKind, column: Option<Column>) {
        let columns = self.columns();
        let key = column.as_ref().map(Column::key);
        tracing::debug!(
            target: targets::MODEL,
            kind = ?kind,
            column = key.as_deref(),
            column_count = columns.len(),
            "grid model changed"
        );
        self.inner.changes.emit(GridModelEvent {
            kind,
            column,
            columns,
        });
    }
}

impl fmt::Debug for GridModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridModel")
            .field("config", &self.inner.config)
            .field("styles", &self.inner.styles)
            .field("columns", &*self.inner.columns.borrow())
            .finish()
    }
}
