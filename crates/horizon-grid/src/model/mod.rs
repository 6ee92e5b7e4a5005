//! Data model for the grid.
//!
//! This module holds everything the grid renders from, separated from the
//! views that render it:
//!
//! - [`Column`] and [`GridModel`]: the column definitions and the ordered,
//!   observable collection holding them
//! - [`DefaultsRegistry`]: per-type column prototypes merged into columns
//! - [`IterableDiffer`]: identity-based reconciliation producing a
//!   [`ChangeSet`] of additions and removals
//! - [`RowContext`] and [`RowExpansion`]: per-row render state
//! - [`ArrayDataSource`]: an array-backed, optionally paginated row source
//!
//! # Example
//!
//! ```
//! use horizon_grid::model::{Column, DefaultsRegistry, GridModel, IterableDiffer};
//!
//! let model = GridModel::new();
//! model.add_column(Column::new("firstName"));
//! model.add_column(Column::builder("dob").column_type("date").build());
//!
//! // Fill formatters from the per-type prototypes.
//! DefaultsRegistry::new().apply_defaults(&model.columns());
//!
//! // Reconcile the column list against the previous snapshot.
//! let mut differ = IterableDiffer::new();
//! let changes = differ.diff(&model.columns()).unwrap();
//! assert_eq!(changes.added().len(), 2);
//! ```
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────┐  changes   ┌──────────────┐  ChangeSet  ┌────────────┐
//! │  GridModel  │───────────>│ IterableDiff │────────────>│  GridView  │
//! │  (columns)  │            │              │             │            │
//! └─────────────┘            └──────────────┘             └────────────┘
//!                                   ^                           ^
//! ┌─────────────┐   reload          │                           │
//! │ ArrayData   │───────────────────┘         RowContext ───────┘
//! │   Source    │
//! └─────────────┘
//! ```

mod column;
mod data_source;
mod defaults;
mod differ;
mod expansion;
mod grid_model;
pub mod naming;
mod path;
mod row;
mod template;

pub use column::{Column, ColumnBuilder, ColumnConfig, ColumnSpec, ColumnStyles, DEFAULT_COLUMN_TYPE};
pub use data_source::{ArrayDataSource, DEFAULT_PAGE_SIZE, DataConnection, PageEvent, Paginator};
pub use defaults::{DefaultsRegistry, merge_missing};
pub use differ::{AddedRecord, ChangeSet, Identity, IterableDiffer, RemovedRecord};
pub use expansion::{COLLAPSED_ICON, EXPANDED_ICON, ExpansionState, RowExpansion};
pub use grid_model::{GridModel, GridModelConfig, GridModelEvent, GridModelStyles, MutationKind};
pub use path::{display_value, value_at};
pub use row::{RowContext, RowPosition};
pub use template::TemplateRef;
