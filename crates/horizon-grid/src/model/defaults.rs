//! Per-type column prototypes merged into columns before they are rendered.

use std::cell::RefCell;
use std::collections::HashMap;

use horizon_grid_core::logging::targets;
use serde_json::{Map, Value, json};

use super::column::{Column, ColumnConfig, ColumnStyles};
use crate::format::{DEFAULT_DATE_FORMAT, FormatterId};

/// Fill fields of `self` that are unset with the values in `defaults`.
trait FillDefaults {
    fn fill_defaults(&mut self, defaults: &Self);
}

fn fill_option<T: Clone>(target: &mut Option<T>, default: &Option<T>) {
    if target.is_none() {
        target.clone_from(default);
    }
}

fn fill_classes(target: &mut Vec<String>, default: &[String]) {
    if target.is_empty() {
        target.extend_from_slice(default);
    }
}

/// Deep-merge `defaults` into `target`.
///
/// Keys missing from `target` are copied over. Keys present on both sides
/// are kept as they are, except that two objects are merged recursively.
pub fn merge_missing(target: &mut Map<String, Value>, defaults: &Map<String, Value>) {
    for (key, default) in defaults {
        match target.get_mut(key) {
            None => {
                target.insert(key.clone(), default.clone());
            }
            Some(Value::Object(existing)) => {
                if let Value::Object(nested) = default {
                    merge_missing(existing, nested);
                }
            }
            Some(_) => {}
        }
    }
}

impl FillDefaults for ColumnConfig {
    // Identity and heading fields (key, type, heading, no_heading, sortable)
    // always stay as the column defined them.
    fn fill_defaults(&mut self, defaults: &Self) {
        fill_option(&mut self.heading_formatter, &defaults.heading_formatter);
        fill_option(&mut self.formatter, &defaults.formatter);
        fill_option(&mut self.heading_template, &defaults.heading_template);
        fill_option(&mut self.data_template, &defaults.data_template);
        merge_missing(&mut self.context, &defaults.context);
    }
}

impl FillDefaults for ColumnStyles {
    fn fill_defaults(&mut self, defaults: &Self) {
        fill_classes(&mut self.header_cell_classes, &defaults.header_cell_classes);
        fill_classes(&mut self.filter_cell_classes, &defaults.filter_cell_classes);
        fill_classes(&mut self.data_cell_classes, &defaults.data_cell_classes);
        fill_option(&mut self.min_width, &defaults.min_width);
        fill_option(&mut self.max_width, &defaults.max_width);
    }
}

/// Merge `prototype` into `column`. Never overwrites what the column set.
fn fill_column(column: &Column, prototype: &Column) {
    if Column::ptr_eq(column, prototype) {
        return;
    }
    let proto = prototype.state().borrow();
    let mut state = column.state().borrow_mut();
    state.config.fill_defaults(&proto.config);
    state.styles.fill_defaults(&proto.styles);
    merge_missing(&mut state.options, &proto.options);
}

/// Registry of default column prototypes, keyed by column type.
///
/// Two prototypes are registered out of the box:
///
/// | type   | formatter  | options                      |
/// |--------|------------|------------------------------|
/// | `date` | `date`     | `{"dateFormat": "fullDate"}` |
/// | `text` | `property` |                              |
///
/// # Example
///
/// ```
/// use horizon_grid::format::FormatterId;
/// use horizon_grid::model::{Column, DefaultsRegistry};
///
/// let defaults = DefaultsRegistry::new();
/// let dob = Column::builder("dob").column_type("date").build();
/// defaults.apply_defaults(&[dob.clone()]);
///
/// assert_eq!(dob.config().formatter, Some(FormatterId::date()));
/// assert_eq!(dob.option("dateFormat"), Some("fullDate".into()));
/// ```
#[derive(Debug)]
pub struct DefaultsRegistry {
    prototypes: RefCell<HashMap<String, Column>>,
}

impl Default for DefaultsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultsRegistry {
    /// Create a registry with the built-in `date` and `text` prototypes.
    pub fn new() -> Self {
        let registry = Self::empty();
        registry.set_default_column(
            "date",
            Column::builder("")
                .column_type("date")
                .formatter(FormatterId::date())
                .option("dateFormat", json!(DEFAULT_DATE_FORMAT))
                .build(),
        );
        registry.set_default_column(
            "text",
            Column::builder("")
                .formatter(FormatterId::property())
                .build(),
        );
        registry
    }

    /// Create a registry without any prototypes.
    pub fn empty() -> Self {
        Self {
            prototypes: RefCell::new(HashMap::new()),
        }
    }

    /// Register the prototype for `column_type`, returning the one it replaced.
    pub fn set_default_column(
        &self,
        column_type: impl Into<String>,
        prototype: Column,
    ) -> Option<Column> {
        let column_type = column_type.into();
        tracing::debug!(target: targets::DEFAULTS, column_type = %column_type, "prototype registered");
        self.prototypes.borrow_mut().insert(column_type, prototype)
    }

    /// The prototype for `column_type`, if one is registered.
    pub fn default_column(&self, column_type: &str) -> Option<Column> {
        self.prototypes.borrow().get(column_type).cloned()
    }

    /// Registered column types, sorted.
    pub fn column_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.prototypes.borrow().keys().cloned().collect();
        types.sort();
        types
    }

    /// Fill every column's unset settings from the prototype of its type.
    ///
    /// Columns without a registered prototype are left untouched. Applying
    /// twice has the same effect as applying once.
    pub fn apply_defaults(&self, columns: &[Column]) {
        for column in columns {
            let column_type = column.column_type();
            match self.default_column(&column_type) {
                Some(prototype) => fill_column(column, &prototype),
                None => tracing::trace!(
                    target: targets::DEFAULTS,
                    column_type = %column_type,
                    key = %column.key(),
                    "no prototype for column type"
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TemplateRef;

    #[test]
    fn test_text_column_gets_property_formatter() {
        let defaults = DefaultsRegistry::new();
        let name = Column::new("name");
        defaults.apply_defaults(&[name.clone()]);
        assert_eq!(name.config().formatter, Some(FormatterId::property()));
    }

    #[test]
    fn test_explicit_settings_are_kept() {
        let defaults = DefaultsRegistry::new();
        let dob = Column::builder("dob")
            .column_type("date")
            .formatter("custom")
            .option("dateFormat", json!("shortDate"))
            .build();
        defaults.apply_defaults(&[dob.clone()]);
        assert_eq!(dob.config().formatter, Some(FormatterId::new("custom")));
        assert_eq!(dob.option("dateFormat"), Some(json!("shortDate")));
    }

    #[test]
    fn test_identity_fields_never_merged() {
        let defaults = DefaultsRegistry::empty();
        defaults.set_default_column(
            "text",
            Column::builder("prototypeKey")
                .heading("Prototype")
                .sortable(true)
                .build(),
        );
        let column = Column::builder("email").no_heading(true).build();
        defaults.apply_defaults(&[column.clone()]);
        let config = column.config();
        assert_eq!(config.key, "email");
        assert_eq!(config.heading, None);
        assert!(!config.sortable);
    }

    #[test]
    fn test_nested_maps_merge_deeply() {
        let defaults = DefaultsRegistry::empty();
        defaults.set_default_column(
            "text",
            Column::builder("")
                .context_value("link", json!({"target": "_blank", "rel": "noopener"}))
                .context_value("width", json!(10))
                .build(),
        );
        let column = Column::builder("site")
            .context_value("link", json!({"target": "_self"}))
            .build();
        defaults.apply_defaults(&[column.clone()]);

        let context = column.config().context;
        assert_eq!(context["link"], json!({"target": "_self", "rel": "noopener"}));
        assert_eq!(context["width"], json!(10));
    }

    #[test]
    fn test_templates_and_styles_filled() {
        let template = TemplateRef::new("textCell");
        let defaults = DefaultsRegistry::empty();
        defaults.set_default_column(
            "text",
            Column::builder("")
                .data_template(template.clone())
                .styles(ColumnStyles::default().with_data_classes(["text-cell"]))
                .build(),
        );
        let column = Column::new("name");
        defaults.apply_defaults(&[column.clone()]);
        assert_eq!(column.config().data_template, Some(template));
        assert_eq!(column.styles().data_cell_classes, vec!["text-cell".to_string()]);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let defaults = DefaultsRegistry::new();
        let dob = Column::builder("dob").column_type("date").build();
        defaults.apply_defaults(&[dob.clone()]);
        let once = (dob.config(), dob.styles(), dob.options());
        defaults.apply_defaults(&[dob.clone()]);
        assert_eq!((dob.config(), dob.styles(), dob.options()), once);
    }

    #[test]
    fn test_unknown_type_untouched() {
        let defaults = DefaultsRegistry::new();
        let column = Column::builder("x").column_type("currency").build();
        let before = column.config();
        defaults.apply_defaults(&[column.clone()]);
        assert_eq!(column.config(), before);
    }

    #[test]
    fn test_prototype_applied_to_itself() {
        let defaults = DefaultsRegistry::new();
        let prototype = defaults.default_column("date").unwrap();
        defaults.apply_defaults(&[prototype]);
    }

    #[test]
    fn test_set_default_column_replaces() {
        let defaults = DefaultsRegistry::new();
        assert_eq!(defaults.column_types(), vec!["date", "text"]);
        let replaced = defaults.set_default_column("text", Column::new(""));
        assert!(replaced.is_some());
        assert!(defaults.default_column("currency").is_none());
    }
}
