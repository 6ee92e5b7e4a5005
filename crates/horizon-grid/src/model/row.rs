//! Per-row rendering context.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use super::differ::Identity;
use super::grid_model::GridModel;

/// Where a row sits among the rows currently rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RowPosition {
    pub index: usize,
    pub count: usize,
}

impl RowPosition {
    pub fn new(index: usize, count: usize) -> Self {
        Self { index, count }
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.count > 0 && self.index + 1 == self.count
    }

    pub fn is_even(&self) -> bool {
        self.index % 2 == 0
    }

    pub fn is_odd(&self) -> bool {
        !self.is_even()
    }
}

struct RowInner {
    data: Rc<Value>,
    model: GridModel,
    position: Cell<RowPosition>,
    expanded: Cell<bool>,
}

/// The context a data row is rendered with: its record, the grid model, and
/// its expansion state.
///
/// A context lives exactly as long as its row is rendered. Clones share
/// state, so a cell holding a clone sees expansion and position updates.
#[derive(Clone)]
pub struct RowContext {
    inner: Rc<RowInner>,
}

impl RowContext {
    /// Create a collapsed context for `data`.
    pub fn new(data: Rc<Value>, model: GridModel) -> Self {
        Self::at(data, model, RowPosition::default())
    }

    /// Create a collapsed context at a given position.
    pub fn at(data: Rc<Value>, model: GridModel, position: RowPosition) -> Self {
        Self {
            inner: Rc::new(RowInner {
                data,
                model,
                position: Cell::new(position),
                expanded: Cell::new(false),
            }),
        }
    }

    /// The row record.
    pub fn data(&self) -> &Value {
        &self.inner.data
    }

    /// The shared handle to the row record.
    pub fn record(&self) -> &Rc<Value> {
        &self.inner.data
    }

    pub fn model(&self) -> &GridModel {
        &self.inner.model
    }

    pub fn position(&self) -> RowPosition {
        self.inner.position.get()
    }

    pub fn index(&self) -> usize {
        self.position().index
    }

    pub fn count(&self) -> usize {
        self.position().count
    }

    pub fn is_first(&self) -> bool {
        self.position().is_first()
    }

    pub fn is_last(&self) -> bool {
        self.position().is_last()
    }

    pub fn is_even(&self) -> bool {
        self.position().is_even()
    }

    pub fn is_odd(&self) -> bool {
        self.position().is_odd()
    }

    pub fn is_expanded(&self) -> bool {
        self.inner.expanded.get()
    }

    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    pub(crate) fn set_position(&self, position: RowPosition) {
        self.inner.position.set(position);
    }

    pub(crate) fn set_expanded(&self, expanded: bool) {
        self.inner.expanded.set(expanded);
    }
}

impl Identity for RowContext {
    fn identity(&self) -> usize {
        Rc::as_ptr(&self.inner) as usize
    }
}

impl fmt::Debug for RowContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowContext")
            .field("data", &self.inner.data)
            .field("position", &self.position())
            .field("expanded", &self.is_expanded())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_position_flags() {
        let first = RowPosition::new(0, 3);
        assert!(first.is_first() && first.is_even() && !first.is_last());
        let last = RowPosition::new(2, 3);
        assert!(last.is_last() && last.is_even() && !last.is_first());
        assert!(RowPosition::new(1, 3).is_odd());
        assert!(!RowPosition::default().is_last());
    }

    #[test]
    fn test_context_shares_state() {
        let row = RowContext::new(Rc::new(json!({"name": "Peter"})), GridModel::new());
        let clone = row.clone();
        assert!(!row.is_expanded());
        row.set_expanded(true);
        row.set_position(RowPosition::new(4, 5));
        assert!(clone.is_expanded());
        assert_eq!(clone.index(), 4);
        assert!(clone.is_last());
        assert_eq!(clone.data()["name"], "Peter");
        assert!(RowContext::ptr_eq(&row, &clone));
    }
}
