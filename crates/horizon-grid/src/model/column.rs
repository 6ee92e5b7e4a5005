//! Column definitions.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use horizon_grid_core::{GridError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::grid_model::{GridModel, GridModelInner};
use super::naming;
use super::template::TemplateRef;
use crate::format::FormatterId;

/// Column type assigned when none is given.
pub const DEFAULT_COLUMN_TYPE: &str = "text";

/// The configuration block of a column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnConfig {
    /// Dot-path into each row record. Identifies the column.
    pub key: String,
    /// Selects a default prototype from the registry, `"text"` unless set.
    pub column_type: String,
    /// Heading text. `None` when the column has no heading.
    pub heading: Option<String>,
    pub sortable: bool,
    /// Suppresses both the explicit and the derived heading.
    pub no_heading: bool,
    pub heading_formatter: Option<FormatterId>,
    pub formatter: Option<FormatterId>,
    /// Free-form settings for formatters and templates.
    pub context: Map<String, Value>,
    pub heading_template: Option<TemplateRef>,
    pub data_template: Option<TemplateRef>,
}

/// Style classes and sizing for a column's cells.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnStyles {
    #[serde(alias = "headerCellStyleClasses")]
    pub header_cell_classes: Vec<String>,
    #[serde(alias = "filterCellStyleClasses")]
    pub filter_cell_classes: Vec<String>,
    #[serde(alias = "dataCellStyleClasses")]
    pub data_cell_classes: Vec<String>,
    pub flex: f32,
    pub min_width: Option<String>,
    pub max_width: Option<String>,
}

impl Default for ColumnStyles {
    fn default() -> Self {
        Self {
            header_cell_classes: Vec::new(),
            filter_cell_classes: Vec::new(),
            data_cell_classes: Vec::new(),
            flex: 1.0,
            min_width: None,
            max_width: None,
        }
    }
}

impl ColumnStyles {
    /// Set the classes added to the header cell.
    pub fn with_header_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header_cell_classes = classes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the classes added to every data cell of the column.
    pub fn with_data_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data_cell_classes = classes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the flex grow factor.
    pub fn with_flex(mut self, flex: f32) -> Self {
        self.flex = flex;
        self
    }

    /// Set the minimum width (any CSS length).
    pub fn with_min_width(mut self, width: impl Into<String>) -> Self {
        self.min_width = Some(width.into());
        self
    }

    /// Set the maximum width (any CSS length).
    pub fn with_max_width(mut self, width: impl Into<String>) -> Self {
        self.max_width = Some(width.into());
        self
    }
}

/// Serializable description of a column, as found in configuration files.
///
/// ```
/// use horizon_grid::model::Column;
///
/// let column = Column::from_json(r#"{"key": "dob", "type": "date"}"#).unwrap();
/// assert_eq!(column.column_type(), "date");
/// assert_eq!(column.heading().as_deref(), Some("Dob "));
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    pub key: String,
    #[serde(rename = "type")]
    pub column_type: Option<String>,
    pub heading: Option<String>,
    pub sortable: Option<bool>,
    pub no_heading: Option<bool>,
    pub heading_formatter: Option<FormatterId>,
    pub formatter: Option<FormatterId>,
    pub context: Option<Map<String, Value>>,
    pub options: Option<Map<String, Value>>,
    pub styles: Option<ColumnStyles>,
}

pub(crate) struct ColumnState {
    pub(crate) config: ColumnConfig,
    pub(crate) styles: ColumnStyles,
    pub(crate) options: Map<String, Value>,
    model: Weak<GridModelInner>,
}

/// A column of the grid.
///
/// `Column` is a shared handle: clones refer to the same column, and two
/// handles compare equal only when they are the same column. Reconciliation
/// tracks columns by this identity, never by key, so two columns with the
/// same key are still distinct.
///
/// # Example
///
/// ```
/// use horizon_grid::model::Column;
///
/// let column = Column::builder("firstName").sortable(true).build();
/// assert_eq!(column.heading().as_deref(), Some("First Name "));
/// assert_eq!(column.column_type(), "text");
/// assert_eq!(column.css_key(), "first-name");
/// ```
#[derive(Clone)]
pub struct Column {
    inner: Rc<RefCell<ColumnState>>,
}

impl Column {
    /// Create a column with every setting at its default.
    pub fn new(key: impl Into<String>) -> Self {
        Self::builder(key).build()
    }

    /// Start building a column for `key`.
    pub fn builder(key: impl Into<String>) -> ColumnBuilder {
        ColumnBuilder::new(key)
    }

    /// Build a column from its serializable description.
    pub fn from_spec(spec: ColumnSpec) -> Self {
        let mut builder = Self::builder(spec.key);
        if let Some(column_type) = spec.column_type {
            builder = builder.column_type(column_type);
        }
        if let Some(heading) = spec.heading {
            builder = builder.heading(heading);
        }
        if let Some(sortable) = spec.sortable {
            builder = builder.sortable(sortable);
        }
        if let Some(no_heading) = spec.no_heading {
            builder = builder.no_heading(no_heading);
        }
        if let Some(id) = spec.heading_formatter {
            builder = builder.heading_formatter(id);
        }
        if let Some(id) = spec.formatter {
            builder = builder.formatter(id);
        }
        if let Some(context) = spec.context {
            builder.context = context;
        }
        if let Some(options) = spec.options {
            builder.options = options;
        }
        if let Some(styles) = spec.styles {
            builder = builder.styles(styles);
        }
        builder.build()
    }

    /// Parse a column from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str::<ColumnSpec>(json)
            .map(Self::from_spec)
            .map_err(|err| GridError::invalid_config(err.to_string()))
    }

    /// Returns `true` if both handles refer to the same column.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    /// A stable identity for this column, valid while any handle is alive.
    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.inner) as usize
    }

    pub fn key(&self) -> String {
        self.inner.borrow().config.key.clone()
    }

    pub fn column_type(&self) -> String {
        self.inner.borrow().config.column_type.clone()
    }

    /// The heading text, or `None` if the column has no heading.
    pub fn heading(&self) -> Option<String> {
        self.inner.borrow().config.heading.clone()
    }

    /// The key rendered as a CSS class suffix.
    pub fn css_key(&self) -> String {
        naming::css_friendly(&self.inner.borrow().config.key)
    }

    /// A copy of the configuration block.
    pub fn config(&self) -> ColumnConfig {
        self.inner.borrow().config.clone()
    }

    /// Access the configuration without cloning.
    pub fn with_config<R>(&self, f: impl FnOnce(&ColumnConfig) -> R) -> R {
        f(&self.inner.borrow().config)
    }

    /// Mutate the configuration in place.
    ///
    /// Views are not told about the change; call
    /// [`GridModel::update_column`] afterwards to refresh rendered cells.
    pub fn update_config(&self, f: impl FnOnce(&mut ColumnConfig)) {
        f(&mut self.inner.borrow_mut().config);
    }

    pub fn set_heading_template(&self, template: Option<TemplateRef>) {
        self.inner.borrow_mut().config.heading_template = template;
    }

    pub fn set_data_template(&self, template: Option<TemplateRef>) {
        self.inner.borrow_mut().config.data_template = template;
    }

    pub fn styles(&self) -> ColumnStyles {
        self.inner.borrow().styles.clone()
    }

    pub fn update_styles(&self, f: impl FnOnce(&mut ColumnStyles)) {
        f(&mut self.inner.borrow_mut().styles);
    }

    /// All free-form options.
    pub fn options(&self) -> Map<String, Value> {
        self.inner.borrow().options.clone()
    }

    /// A single option, e.g. `dateFormat` for date columns.
    pub fn option(&self, name: &str) -> Option<Value> {
        self.inner.borrow().options.get(name).cloned()
    }

    pub fn set_option(&self, name: impl Into<String>, value: Value) {
        self.inner.borrow_mut().options.insert(name.into(), value);
    }

    /// The model this column currently belongs to, if any.
    pub fn model(&self) -> Option<GridModel> {
        self.inner
            .borrow()
            .model
            .upgrade()
            .map(GridModel::from_inner)
    }

    pub(crate) fn set_model(&self, model: Option<&GridModel>) {
        self.inner.borrow_mut().model = model.map(GridModel::downgrade).unwrap_or_default();
    }

    pub(crate) fn state(&self) -> &RefCell<ColumnState> {
        &self.inner
    }
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other)
    }
}

impl Eq for Column {}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(state) => f
                .debug_struct("Column")
                .field("key", &state.config.key)
                .field("type", &state.config.column_type)
                .field("identity", &self.identity())
                .finish(),
            Err(_) => f
                .debug_struct("Column")
                .field("identity", &self.identity())
                .finish_non_exhaustive(),
        }
    }
}

/// Builder for [`Column`].
#[derive(Debug, Clone)]
pub struct ColumnBuilder {
    key: String,
    column_type: String,
    heading: Option<String>,
    sortable: bool,
    no_heading: bool,
    heading_formatter: Option<FormatterId>,
    formatter: Option<FormatterId>,
    context: Map<String, Value>,
    options: Map<String, Value>,
    styles: ColumnStyles,
    heading_template: Option<TemplateRef>,
    data_template: Option<TemplateRef>,
}

impl ColumnBuilder {
    fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            column_type: DEFAULT_COLUMN_TYPE.to_string(),
            heading: None,
            sortable: false,
            no_heading: false,
            heading_formatter: Some(FormatterId::key_heading()),
            formatter: None,
            context: Map::new(),
            options: Map::new(),
            styles: ColumnStyles::default(),
            heading_template: None,
            data_template: None,
        }
    }

    pub fn column_type(mut self, column_type: impl Into<String>) -> Self {
        self.column_type = column_type.into();
        self
    }

    /// Set an explicit heading. An empty heading falls back to the derived one.
    pub fn heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn no_heading(mut self, no_heading: bool) -> Self {
        self.no_heading = no_heading;
        self
    }

    pub fn heading_formatter(mut self, id: impl Into<FormatterId>) -> Self {
        self.heading_formatter = Some(id.into());
        self
    }

    pub fn formatter(mut self, id: impl Into<FormatterId>) -> Self {
        self.formatter = Some(id.into());
        self
    }

    pub fn context_value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.context.insert(name.into(), value);
        self
    }

    pub fn option(mut self, name: impl Into<String>, value: Value) -> Self {
        self.options.insert(name.into(), value);
        self
    }

    pub fn styles(mut self, styles: ColumnStyles) -> Self {
        self.styles = styles;
        self
    }

    pub fn heading_template(mut self, template: TemplateRef) -> Self {
        self.heading_template = Some(template);
        self
    }

    pub fn data_template(mut self, template: TemplateRef) -> Self {
        self.data_template = Some(template);
        self
    }

    pub fn build(self) -> Column {
        let heading = if self.no_heading {
            None
        } else {
            match self.heading {
                Some(heading) if !heading.is_empty() => Some(heading),
                _ => Some(naming::heading_from_key(&self.key)),
            }
        };

        Column {
            inner: Rc::new(RefCell::new(ColumnState {
                config: ColumnConfig {
                    key: self.key,
                    column_type: self.column_type,
                    heading,
                    sortable: self.sortable,
                    no_heading: self.no_heading,
                    heading_formatter: self.heading_formatter,
                    formatter: self.formatter,
                    context: self.context,
                    heading_template: self.heading_template,
                    data_template: self.data_template,
                },
                styles: self.styles,
                options: self.options,
                model: Weak::new(),
            })),
        }
    }
}
