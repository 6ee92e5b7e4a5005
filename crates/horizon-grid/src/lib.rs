//! Horizon Grid - a declarative data grid with incremental reconciliation.
//!
//! This is the main crate. It re-exports the core systems from
//! `horizon_grid_core` and adds the grid itself:
//!
//! - [`model`]: columns, the grid model, column defaults, the identity
//!   differ, row contexts and the paginated data source
//! - [`format`]: formatter traits, built-in formatters and cell resolution
//! - [`view`]: the headless header/data row views and [`view::GridView`]
//! - [`debug`]: tree-shaped dumps of a rendered grid
//!
//! # Example
//!
//! ```
//! use horizon_grid::prelude::*;
//! use serde_json::json;
//!
//! let model = GridModel::new();
//! model.add_column(Column::new("firstName"));
//! model.add_column(Column::builder("dob").column_type("date").build());
//!
//! let source = ArrayDataSource::new();
//! source.add_item(json!({"firstName": "Peter", "dob": "1980-01-02"}));
//! source.reload();
//!
//! let mut view = GridView::new(model).with_data_source(source);
//! view.attach();
//!
//! assert_eq!(view.header_texts(), vec!["First Name ", "Dob "]);
//! assert_eq!(
//!     view.row_texts(0),
//!     Some(vec!["Peter".to_string(), "Wednesday, January 2, 1980".to_string()])
//! );
//! ```

pub use horizon_grid_core::*;

pub mod debug;
pub mod format;
pub mod model;
pub mod outlet;
pub mod prelude;
pub mod view;

static_assertions::assert_not_impl_any!(model::GridModel: Send, Sync);
static_assertions::assert_not_impl_any!(model::Column: Send, Sync);
static_assertions::assert_not_impl_any!(view::GridView: Send, Sync);
