//! Prelude module for Horizon Grid.
//!
//! This module re-exports the most commonly used types for convenient importing:
//!
//! ```
//! use horizon_grid::prelude::*;
//! ```
//!
//! This provides access to:
//! - Signal/property system (`Signal`, `ReplayProperty`, `ConnectionGuard`)
//! - Errors (`GridError`)
//! - Columns and the grid model (`Column`, `GridModel`, `DefaultsRegistry`)
//! - Reconciliation (`IterableDiffer`, `ChangeSet`)
//! - Rows and data (`RowContext`, `ArrayDataSource`, `Paginator`)
//! - Formatting (`FormatterRegistry`, `CellResolver`, `Renderable`)
//! - The view (`GridView`)

// ============================================================================
// Signal/Slot and Property System
// ============================================================================

pub use crate::{ConnectionGuard, ConnectionId, Property, ReplayProperty, Signal};

// ============================================================================
// Errors and Diagnostics
// ============================================================================

pub use crate::debug::GridDebug;
pub use crate::{GridError, TreeFormatOptions, TreeStyle};

// ============================================================================
// Columns and Grid Model
// ============================================================================

pub use crate::model::{
    Column, ColumnStyles, DefaultsRegistry, GridModel, GridModelConfig, GridModelEvent,
    GridModelStyles, MutationKind, TemplateRef,
};

// ============================================================================
// Reconciliation
// ============================================================================

pub use crate::model::{AddedRecord, ChangeSet, IterableDiffer, RemovedRecord};

// ============================================================================
// Rows and Data
// ============================================================================

pub use crate::model::{
    ArrayDataSource, DataConnection, ExpansionState, Paginator, RowContext, RowExpansion,
};

// ============================================================================
// Formatting
// ============================================================================

pub use crate::format::{
    CellResolver, DataFormatter, ExpanderFormatter, FormatterId, FormatterRegistry,
    HeaderFormatter, Renderable,
};

// ============================================================================
// Views
// ============================================================================

pub use crate::outlet::Outlet;
pub use crate::view::{DataRow, GridView, HeaderRow};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Verify that the prelude covers a full grid setup.
    #[test]
    fn test_prelude_types_exist() {
        let _signal: Signal<i32> = Signal::new();
        let _property: ReplayProperty<String> = ReplayProperty::new(String::new());

        let model = GridModel::with_config(GridModelConfig::default(), GridModelStyles::default());
        model.add_column(Column::builder("id").styles(ColumnStyles::default()).build());

        let source: ArrayDataSource<serde_json::Value> = ArrayDataSource::new();
        source.add_item(json!({"id": 7}));
        source.reload();

        let mut view = GridView::new(model)
            .with_formatters(FormatterRegistry::with_builtins())
            .with_data_source(source);
        view.attach();
        assert_eq!(view.row_texts(0), Some(vec!["7".to_string()]));

        let _differ: IterableDiffer<Column> = IterableDiffer::new();
        let _paginator = Paginator::default();
        let _debug = GridDebug::new(TreeFormatOptions::default());
    }
}
