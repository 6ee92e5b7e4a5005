//! Headless rendering of a grid.
//!
//! A [`GridView`] owns a [`HeaderRow`] and an outlet of [`DataRow`]s and keeps
//! them reconciled with a [`GridModel`](crate::model::GridModel) and an
//! [`ArrayDataSource`](crate::model::ArrayDataSource). Cells carry their CSS
//! classes and a [`Renderable`](crate::format::Renderable); turning those
//! into pixels or markup is left to the embedding renderer.

mod data_row;
mod grid_view;
mod header;

pub use data_row::{DATA_CELL_CLASS, DATA_ROW_CLASS, DataCell, DataRow, EXPANDED_ROW_CLASS};
pub use grid_view::{GridView, Record, RowKey};
pub use header::{EXPANDER_COLUMN_CLASS, HEADER_CELL_CLASS, HEADER_ROW_CLASS, HeaderCell, HeaderRow};
