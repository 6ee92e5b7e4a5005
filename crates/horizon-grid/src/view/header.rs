//! The header row and its cells.

use std::rc::Rc;

use horizon_grid_core::Result;
use horizon_grid_core::logging::targets;

use crate::format::{CellResolver, Renderable};
use crate::model::{ChangeSet, Column, GridModel};
use crate::outlet::Outlet;

pub const HEADER_ROW_CLASS: &str = "am-header-row";
pub const HEADER_CELL_CLASS: &str = "am-header-cell";
pub const EXPANDER_COLUMN_CLASS: &str = "am-header-expander-column";

/// A rendered header cell.
#[derive(Debug, Clone)]
pub struct HeaderCell {
    column: Column,
    classes: Vec<String>,
    content: Renderable,
}

impl HeaderCell {
    pub fn render(column: &Column, resolver: &CellResolver) -> Self {
        let mut classes = vec![
            HEADER_CELL_CLASS.to_string(),
            format!("{HEADER_CELL_CLASS}-{}", column.css_key()),
        ];
        classes.extend(column.styles().header_cell_classes);
        Self {
            column: column.clone(),
            classes,
            content: resolver.resolve_header(column),
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

    pub fn flex(&self) -> f32 {
        self.column.styles().flex
    }
}

/// The header row: one cell per column, in column order.
#[derive(Debug)]
pub struct HeaderRow {
    cells: Outlet<HeaderCell>,
    show_expander: bool,
    resolver: Rc<CellResolver>,
}

impl HeaderRow {
    /// Render a cell for every column currently in `model`.
    pub fn new(model: &GridModel, resolver: Rc<CellResolver>) -> Self {
        let cells = model
            .columns()
            .iter()
            .map(|column| HeaderCell::render(column, &resolver))
            .collect();
        Self {
            cells,
            show_expander: model.config().show_expander,
            resolver,
        }
    }

    pub fn cells(&self) -> &Outlet<HeaderCell> {
        &self.cells
    }

    /// Whether an empty expander column precedes the cells.
    pub fn shows_expander(&self) -> bool {
        self.show_expander
    }

    pub fn classes(&self) -> Vec<String> {
        vec![HEADER_ROW_CLASS.to_string()]
    }

    /// Insert and remove cells to follow a column change set.
    pub fn apply_column_changes(&mut self, changes: &ChangeSet<Column>) -> Result<()> {
        for record in changes.removals() {
            self.cells.remove(record.previous_index)?;
        }
        for record in changes.additions() {
            let cell = HeaderCell::render(&record.item, &self.resolver);
            self.cells.insert(record.current_index, cell)?;
        }
        tracing::trace!(target: targets::VIEW, cells = self.cells.len(), "header row reconciled");
        Ok(())
    }

    /// Re-render the cells showing `column`.
    pub fn refresh_column(&mut self, column: &Column) {
        for cell in self.cells.iter_mut() {
            if Column::ptr_eq(&cell.column, column) {
                *cell = HeaderCell::render(column, &self.resolver);
            }
        }
    }

    /// The header text of every cell.
    pub fn texts(&self) -> Vec<String> {
        self.cells.iter().map(|cell| cell.content.to_string()).collect()
    }
}
