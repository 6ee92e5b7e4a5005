//! Formatter traits, the built-in formatters, and the formatter registry.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::Deserialize;
use serde_json::Value;

use super::date::{self, DEFAULT_DATE_FORMAT};
use crate::model::{Column, RowContext, display_value, value_at};

/// Names a registered formatter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct FormatterId(String);

impl FormatterId {
    pub const KEY_HEADING: &'static str = "keyHeading";
    pub const PROPERTY: &'static str = "property";
    pub const DATE: &'static str = "date";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Renders a column's heading text.
    pub fn key_heading() -> Self {
        Self::new(Self::KEY_HEADING)
    }

    /// Renders the row value at the column's key.
    pub fn property() -> Self {
        Self::new(Self::PROPERTY)
    }

    /// Renders the row value at the column's key as a date.
    pub fn date() -> Self {
        Self::new(Self::DATE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FormatterId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for FormatterId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for FormatterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Renders a header cell.
pub trait HeaderFormatter {
    fn format_header(&self, column: &Column) -> String;
}

/// Renders a data cell.
pub trait DataFormatter {
    fn format_data(&self, column: &Column, row: &RowContext) -> String;
}

/// Renders the detail region of an expanded row.
pub trait ExpanderFormatter {
    fn format_expander(&self, row: &RowContext) -> String;
}

impl<F: Fn(&Column) -> String> HeaderFormatter for F {
    fn format_header(&self, column: &Column) -> String {
        self(column)
    }
}

impl<F: Fn(&Column, &RowContext) -> String> DataFormatter for F {
    fn format_data(&self, column: &Column, row: &RowContext) -> String {
        self(column, row)
    }
}

impl<F: Fn(&RowContext) -> String> ExpanderFormatter for F {
    fn format_expander(&self, row: &RowContext) -> String {
        self(row)
    }
}

/// Shows the column heading, or nothing for columns without one.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyHeadingFormatter;

impl HeaderFormatter for KeyHeadingFormatter {
    fn format_header(&self, column: &Column) -> String {
        column.heading().unwrap_or_default()
    }
}

/// Shows the row value found at the column's key.
#[derive(Debug, Default, Clone, Copy)]
pub struct PropertyFormatter;

impl PropertyFormatter {
    /// The raw value at the column's key, if any.
    pub fn value(column: &Column, row: &RowContext) -> Option<Value> {
        column.with_config(|config| value_at(row.data(), &config.key).cloned())
    }
}

impl DataFormatter for PropertyFormatter {
    fn format_data(&self, column: &Column, row: &RowContext) -> String {
        display_value(Self::value(column, row).as_ref())
    }
}

/// Shows the row value at the column's key as a date, using the column's
/// `dateFormat` option.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateFormatter;

impl DateFormatter {
    /// The date format configured for `column`.
    pub fn format_name(column: &Column) -> String {
        column
            .option("dateFormat")
            .and_then(|value| value.as_str().map(str::to_owned))
            .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string())
    }
}

impl DataFormatter for DateFormatter {
    fn format_data(&self, column: &Column, row: &RowContext) -> String {
        match PropertyFormatter::value(column, row) {
            None | Some(Value::Null) => String::new(),
            Some(value) => date::format_value(&value, &Self::format_name(column)),
        }
    }
}

/// Formatters addressable by [`FormatterId`].
pub struct FormatterRegistry {
    headers: HashMap<FormatterId, Rc<dyn HeaderFormatter>>,
    data: HashMap<FormatterId, Rc<dyn DataFormatter>>,
    expanders: HashMap<FormatterId, Rc<dyn ExpanderFormatter>>,
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl FormatterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            headers: HashMap::new(),
            data: HashMap::new(),
            expanders: HashMap::new(),
        }
    }

    /// A registry holding the `keyHeading`, `property` and `date` formatters.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_header(FormatterId::key_heading(), KeyHeadingFormatter);
        registry.register_data(FormatterId::property(), PropertyFormatter);
        registry.register_data(FormatterId::date(), DateFormatter);
        registry
    }

    pub fn register_header(
        &mut self,
        id: impl Into<FormatterId>,
        formatter: impl HeaderFormatter + 'static,
    ) -> &mut Self {
        self.headers.insert(id.into(), Rc::new(formatter));
        self
    }

    pub fn register_data(
        &mut self,
        id: impl Into<FormatterId>,
        formatter: impl DataFormatter + 'static,
    ) -> &mut Self {
        self.data.insert(id.into(), Rc::new(formatter));
        self
    }

    pub fn register_expander(
        &mut self,
        id: impl Into<FormatterId>,
        formatter: impl ExpanderFormatter + 'static,
    ) -> &mut Self {
        self.expanders.insert(id.into(), Rc::new(formatter));
        self
    }

    pub fn header(&self, id: &FormatterId) -> Option<Rc<dyn HeaderFormatter>> {
        self.headers.get(id).cloned()
    }

    pub fn data(&self, id: &FormatterId) -> Option<Rc<dyn DataFormatter>> {
        self.data.get(id).cloned()
    }

    pub fn expander(&self, id: &FormatterId) -> Option<Rc<dyn ExpanderFormatter>> {
        self.expanders.get(id).cloned()
    }
}

impl fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut headers: Vec<_> = self.headers.keys().collect();
        let mut data: Vec<_> = self.data.keys().collect();
        let mut expanders: Vec<_> = self.expanders.keys().collect();
        headers.sort();
        data.sort();
        expanders.sort();
        f.debug_struct("FormatterRegistry")
            .field("headers", &headers)
            .field("data", &data)
            .field("expanders", &expanders)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GridModel;
    use serde_json::json;

    fn row(data: Value) -> RowContext {
        RowContext::new(Rc::new(data), GridModel::new())
    }

    #[test]
    fn test_key_heading() {
        assert_eq!(
            KeyHeadingFormatter.format_header(&Column::new("firstName")),
            "First Name "
        );
        let hidden = Column::builder("x").no_heading(true).build();
        assert_eq!(KeyHeadingFormatter.format_header(&hidden), "");
    }

    #[test]
    fn test_property_formatter() {
        let row = row(json!({"name": {"first": "Peter"}, "age": 40, "nick": null}));
        assert_eq!(
            PropertyFormatter.format_data(&Column::new("name.first"), &row),
            "Peter"
        );
        assert_eq!(PropertyFormatter.format_data(&Column::new("age"), &row), "40");
        assert_eq!(PropertyFormatter.format_data(&Column::new("nick"), &row), "");
        assert_eq!(PropertyFormatter.format_data(&Column::new("missing"), &row), "");
    }

    #[test]
    fn test_date_formatter_uses_option() {
        let row = row(json!({"dob": "2015-06-15"}));
        let column = Column::builder("dob")
            .option("dateFormat", json!("shortDate"))
            .build();
        assert_eq!(DateFormatter.format_data(&column, &row), "6/15/15");
        assert_eq!(
            DateFormatter.format_data(&Column::new("dob"), &row),
            "Monday, June 15, 2015"
        );
        assert_eq!(DateFormatter.format_data(&Column::new("missing"), &row), "");
    }

    #[test]
    fn test_registry() {
        let mut registry = FormatterRegistry::with_builtins();
        registry.register_data("upper", |column: &Column, row: &RowContext| {
            PropertyFormatter
                .format_data(column, row)
                .to_uppercase()
        });
        assert!(registry.header(&FormatterId::key_heading()).is_some());
        assert!(registry.data(&FormatterId::date()).is_some());
        assert!(registry.expander(&FormatterId::new("details")).is_none());

        let upper = registry.data(&FormatterId::new("upper")).unwrap();
        let row = row(json!({"name": "bruce"}));
        assert_eq!(upper.format_data(&Column::new("name"), &row), "BRUCE");
    }

    #[test]
    fn test_formatter_id_deserializes_from_string() {
        let id: FormatterId = serde_json::from_str(r#""date""#).unwrap();
        assert_eq!(id, FormatterId::date());
        assert_eq!(id.to_string(), "date");
    }
}
