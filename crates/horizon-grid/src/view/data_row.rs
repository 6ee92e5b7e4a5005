//! Data rows and their cells.

use std::rc::Rc;

use horizon_grid_core::Result;

use crate::format::{CellResolver, Renderable};
use crate::model::{ChangeSet, Column, ExpansionState, RowContext, RowExpansion};
use crate::outlet::Outlet;

pub const DATA_ROW_CLASS: &str = "am-data-row";
pub const DATA_CELL_CLASS: &str = "am-data-cell";
pub const EXPANDED_ROW_CLASS: &str = "am-expanded-row";

/// A rendered data cell.
#[derive(Debug, Clone)]
pub struct DataCell {
    column: Column,
    classes: Vec<String>,
    content: Renderable,
}

impl DataCell {
    pub fn render(column: &Column, row: &RowContext, resolver: &CellResolver) -> Self {
        let mut classes = vec![
            DATA_CELL_CLASS.to_string(),
            format!("{DATA_CELL_CLASS}-{}", column.css_key()),
        ];
        classes.extend(column.styles().data_cell_classes);
        Self {
            column: column.clone(),
            classes,
            content: resolver.resolve_data(column, row),
        }
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn content(&self) -> &Renderable {
        &self.content
    }
}

/// A rendered data row: its context, one cell per column, and its expander.
#[derive(Debug)]
pub struct DataRow {
    context: RowContext,
    cells: Outlet<DataCell>,
    expansion: RowExpansion,
    resolver: Rc<CellResolver>,
}

impl DataRow {
    pub fn new(context: RowContext, columns: &[Column], resolver: Rc<CellResolver>) -> Self {
        let cells = columns
            .iter()
            .map(|column| DataCell::render(column, &context, &resolver))
            .collect();
        Self {
            expansion: RowExpansion::new(context.clone()),
            context,
            cells,
            resolver,
        }
    }

    pub fn context(&self) -> &RowContext {
        &self.context
    }

    pub fn cells(&self) -> &Outlet<DataCell> {
        &self.cells
    }

    pub fn expansion(&self) -> &RowExpansion {
        &self.expansion
    }

    /// Whether the expander toggle is rendered.
    pub fn shows_expander(&self) -> bool {
        self.context.model().config().show_expander
    }

    pub fn classes(&self) -> Vec<String> {
        let mut classes = vec![DATA_ROW_CLASS.to_string()];
        if self.context.is_expanded() {
            classes.push(EXPANDED_ROW_CLASS.to_string());
        }
        classes
    }

    /// Expand or collapse the row.
    pub fn toggle_expander(&mut self) -> ExpansionState {
        self.expansion.toggle(&self.resolver)
    }

    /// Insert and remove cells to follow a column change set.
    pub fn apply_column_changes(&mut self, changes: &ChangeSet<Column>) -> Result<()> {
        for record in changes.removals() {
            self.cells.remove(record.previous_index)?;
        }
        for record in changes.additions() {
            let cell = DataCell::render(&record.item, &self.context, &self.resolver);
            self.cells.insert(record.current_index, cell)?;
        }
        Ok(())
    }

    /// Re-render the cells showing `column`.
    pub fn refresh_column(&mut self, column: &Column) {
        for cell in self.cells.iter_mut() {
            if Column::ptr_eq(&cell.column, column) {
                *cell = DataCell::render(column, &self.context, &self.resolver);
            }
        }
    }

    /// The text of every cell.
    pub fn texts(&self) -> Vec<String> {
        self.cells.iter().map(|cell| cell.content.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DefaultsRegistry, GridModel, GridModelConfig, GridModelStyles};
    use serde_json::json;

    fn data_row(model: &GridModel) -> DataRow {
        DefaultsRegistry::new().apply_defaults(&model.columns());
        let context = RowContext::new(
            Rc::new(json!({"firstName": "Peter", "landLine": "021 975 1234"})),
            model.clone(),
        );
        DataRow::new(context, &model.columns(), Rc::new(CellResolver::default()))
    }

    #[test]
    fn test_cells_follow_columns() {
        let model = GridModel::new();
        model.add_column(Column::new("firstName"));
        model.add_column(Column::new("landLine"));
        let row = data_row(&model);
        assert_eq!(row.texts(), vec!["Peter", "021 975 1234"]);
        assert_eq!(
            row.cells().get(1).unwrap().classes(),
            ["am-data-cell", "am-data-cell-land-line"]
        );
    }

    #[test]
    fn test_expanded_class() {
        let model = GridModel::with_config(
            GridModelConfig::default().with_expander(true),
            GridModelStyles::default(),
        );
        model.add_column(Column::new("firstName"));
        let mut row = data_row(&model);
        assert!(row.shows_expander());
        assert_eq!(row.classes(), vec!["am-data-row"]);
        row.toggle_expander();
        assert_eq!(row.classes(), vec!["am-data-row", "am-expanded-row"]);
    }
}
