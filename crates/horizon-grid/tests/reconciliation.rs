//! Integration tests for column defaults, the identity differ, pagination and
//! formatter resolution.

use std::cell::RefCell;
use std::rc::Rc;

use horizon_grid::format::date;
use horizon_grid::prelude::*;
use serde_json::{Value, json};

fn names(items: &[&'static str]) -> Vec<Rc<str>> {
    items.iter().map(|item| Rc::from(*item)).collect()
}

// ============================================================================
// Identity differ
// ============================================================================

#[test]
fn test_differ_reports_adds_and_removes_by_identity() {
    let [a, b, c, d]: [Rc<str>; 4] = names(&["a", "b", "c", "d"]).try_into().unwrap();
    let mut differ: IterableDiffer<Rc<str>> = IterableDiffer::new();

    let first = differ.diff(&[a.clone(), b.clone(), c.clone()]).unwrap();
    assert_eq!(first.added().len(), 3);
    assert!(first.removed().is_empty());

    let changes = differ.diff(&[a.clone(), c.clone(), d.clone()]).unwrap();
    let removed: Vec<usize> = changes.removed().iter().map(|r| r.previous_index).collect();
    let added: Vec<usize> = changes.added().iter().map(|r| r.current_index).collect();
    assert_eq!(removed, vec![1]);
    assert_eq!(added, vec![2]);
    assert!(Rc::ptr_eq(&changes.removed()[0].item, &b));
    assert!(Rc::ptr_eq(&changes.added()[0].item, &d));
}

#[test]
fn test_differ_ignores_equal_values_with_new_identity() {
    let mut differ: IterableDiffer<Rc<str>> = IterableDiffer::new();
    differ.diff(&names(&["x"]));

    // Same text, different allocation.
    let changes = differ.diff(&names(&["x"])).unwrap();
    assert_eq!(changes.added().len(), 1);
    assert_eq!(changes.removed().len(), 1);
}

#[test]
fn test_change_set_replays_onto_mirror() {
    let items = names(&["a", "b", "c", "d", "e"]);
    let mut differ: IterableDiffer<Rc<str>> = IterableDiffer::new();
    differ.diff(&items);
    let mut mirror: Vec<String> = items.iter().map(|item| item.to_string()).collect();

    let next = vec![
        items[0].clone(),
        Rc::from("f"),
        items[2].clone(),
        items[4].clone(),
        Rc::from("g"),
    ];
    let changes = differ.diff(&next).unwrap();
    changes.apply_to(&mut mirror, |item| item.to_string()).unwrap();

    assert_eq!(mirror, vec!["a", "f", "c", "e", "g"]);
}

#[test]
fn test_reorder_only_is_not_a_change() {
    let items = names(&["a", "b", "c"]);
    let mut differ: IterableDiffer<Rc<str>> = IterableDiffer::new();
    differ.diff(&items);

    let reversed: Vec<Rc<str>> = items.iter().rev().cloned().collect();
    assert!(differ.diff(&reversed).is_none());
    assert!(differ.diff(&reversed).is_none());
}

// ============================================================================
// Column defaults
// ============================================================================

#[test]
fn test_defaults_are_idempotent_and_never_overwrite() {
    let defaults = DefaultsRegistry::new();
    let custom = Column::builder("born")
        .column_type("date")
        .formatter("shortDate")
        .build();
    let plain = Column::builder("updated").column_type("date").build();
    let columns = vec![custom.clone(), plain.clone()];

    defaults.apply_defaults(&columns);
    let once: Vec<ColumnConfigSnapshot> = columns.iter().map(snapshot).collect();
    defaults.apply_defaults(&columns);
    let twice: Vec<ColumnConfigSnapshot> = columns.iter().map(snapshot).collect();
    assert_eq!(once, twice);

    assert_eq!(custom.config().formatter, Some(FormatterId::new("shortDate")));
    assert_eq!(plain.config().formatter, Some(FormatterId::date()));
    assert_eq!(plain.option("dateFormat"), Some(Value::from("fullDate")));
}

type ColumnConfigSnapshot = (Option<FormatterId>, serde_json::Map<String, Value>);

fn snapshot(column: &Column) -> ColumnConfigSnapshot {
    (column.config().formatter, column.options())
}

#[test]
fn test_custom_prototype_deep_merges_context() {
    let defaults = DefaultsRegistry::empty();
    defaults.set_default_column(
        "money",
        Column::builder("money")
            .formatter("currency")
            .context_value("currency", json!({"code": "USD", "digits": 2}))
            .build(),
    );

    let price = Column::builder("price")
        .column_type("money")
        .context_value("currency", json!({"code": "EUR"}))
        .build();
    defaults.apply_defaults(&[price.clone()]);

    let config = price.config();
    assert_eq!(config.formatter, Some(FormatterId::new("currency")));
    assert_eq!(
        config.context.get("currency"),
        Some(&json!({"code": "EUR", "digits": 2}))
    );
    assert_eq!(config.key, "price");
}

// ============================================================================
// Pagination
// ============================================================================

#[test]
fn test_paginator_drives_published_window() {
    let source = ArrayDataSource::<u32>::new();
    for n in 0..12_u32 {
        source.add_item(n);
    }
    assert_eq!(source.connect().latest().len(), 12);
    let paginator = Paginator::new(5);
    source.attach_paginator(&paginator);

    let published = Rc::new(RefCell::new(Vec::new()));
    let sink = published.clone();
    let connection = source.connect();
    connection.subscribe(move |items: &[Rc<u32>]| {
        *sink.borrow_mut() = items.iter().map(|n| **n).collect::<Vec<u32>>();
    });

    source.reload();
    assert_eq!(*published.borrow(), vec![0, 1, 2, 3, 4]);

    paginator.next_page();
    paginator.next_page();
    assert_eq!(*published.borrow(), vec![10, 11]);
    assert_eq!(source.total_size(), 12);

    paginator.set_page(0, 3);
    assert_eq!(*published.borrow(), vec![0, 1, 2]);

    source.detach_paginator();
    paginator.next_page();
    assert_eq!(*published.borrow(), vec![0, 1, 2]);
    source.reload();
    assert_eq!(published.borrow().len(), 12);
}

#[test]
fn test_late_subscriber_sees_last_publish() {
    let source = ArrayDataSource::<u32>::new();
    source.add_item(1_u32);
    source.add_item(2_u32);

    let connection = source.connect();
    let seen = Rc::new(RefCell::new(0));
    let sink = seen.clone();
    connection.subscribe(move |items: &[Rc<u32>]| *sink.borrow_mut() = items.len());
    assert_eq!(*seen.borrow(), 2);

    connection.disconnect();
    source.add_item(3_u32);
    assert_eq!(*seen.borrow(), 2);
    assert_eq!(source.total_size(), 3);
}

// ============================================================================
// Formatter resolution
// ============================================================================

#[test]
fn test_resolution_prefers_templates_then_formatters() {
    let model = GridModel::new();
    let row = RowContext::new(Rc::new(json!({"name": "Peter"})), model);
    let resolver = CellResolver::default();

    let templated = Column::builder("name")
        .formatter(FormatterId::property())
        .data_template(TemplateRef::new("nameCell"))
        .build();
    assert_eq!(resolver.resolve_data(&templated, &row).source(), "template:nameCell");

    let formatted = Column::builder("name").formatter(FormatterId::property()).build();
    let content = resolver.resolve_data(&formatted, &row);
    assert_eq!(content.text(), Some("Peter".to_string()));
}

#[test]
fn test_unknown_formatter_renders_nothing() {
    let model = GridModel::new();
    let row = RowContext::new(Rc::new(json!({"name": "Peter"})), model);
    let resolver = CellResolver::default();

    let column = Column::builder("name").formatter("missing").build();
    assert!(resolver.resolve_data(&column, &row).is_empty());

    let headless = Column::builder("name").no_heading(true).build();
    assert_eq!(resolver.resolve_header(&headless).text(), Some(String::new()));
}

#[test]
fn test_custom_data_formatter() {
    let mut formatters = FormatterRegistry::with_builtins();
    formatters.register_data("upper", |column: &Column, row: &RowContext| {
        row.data()[column.key().as_str()]
            .as_str()
            .unwrap_or_default()
            .to_uppercase()
    });
    let resolver = CellResolver::new(Rc::new(formatters));

    let model = GridModel::new();
    let row = RowContext::new(Rc::new(json!({"name": "bruce"})), model);
    let column = Column::builder("name").formatter("upper").build();
    assert_eq!(resolver.resolve_data(&column, &row).to_string(), "BRUCE");
}

#[test]
fn test_date_patterns() {
    let value = json!("2015-06-15T09:03:01");
    assert_eq!(date::format_value(&value, "shortDate"), "6/15/15");
    assert_eq!(date::format_value(&value, "%Y/%m/%d"), "2015/06/15");
    assert_eq!(date::format_value(&json!("not a date"), "fullDate"), "not a date");
}
