//! Expand/collapse state of a data row.

use horizon_grid_core::logging::targets;

use super::row::RowContext;
use crate::format::{CellResolver, Renderable};
use crate::outlet::Outlet;

/// Icon shown on the toggle of a collapsed row.
pub const COLLAPSED_ICON: &str = "keyboard_arrow_right";
/// Icon shown on the toggle of an expanded row.
pub const EXPANDED_ICON: &str = "keyboard_arrow_down";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExpansionState {
    #[default]
    Collapsed,
    Expanded,
}

impl ExpansionState {
    pub fn toggled(self) -> Self {
        match self {
            Self::Collapsed => Self::Expanded,
            Self::Expanded => Self::Collapsed,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Collapsed => COLLAPSED_ICON,
            Self::Expanded => EXPANDED_ICON,
        }
    }
}

/// The expander of a single data row.
///
/// Starts collapsed with an empty detail region. Expanding materializes the
/// grid's expander template or formatter into the detail region; collapsing
/// empties it again. The row context's `expanded` flag mirrors the state.
#[derive(Debug)]
pub struct RowExpansion {
    row: RowContext,
    state: ExpansionState,
    detail: Outlet<Renderable>,
}

impl RowExpansion {
    pub fn new(row: RowContext) -> Self {
        row.set_expanded(false);
        Self {
            row,
            state: ExpansionState::Collapsed,
            detail: Outlet::new(),
        }
    }

    pub fn row(&self) -> &RowContext {
        &self.row
    }

    pub fn state(&self) -> ExpansionState {
        self.state
    }

    pub fn is_expanded(&self) -> bool {
        self.state == ExpansionState::Expanded
    }

    /// The toggle icon for the current state.
    pub fn icon(&self) -> &'static str {
        self.state.icon()
    }

    /// The detail region: one renderable while expanded, empty otherwise.
    pub fn detail(&self) -> &Outlet<Renderable> {
        &self.detail
    }

    /// Flip between collapsed and expanded, returning the new state.
    pub fn toggle(&mut self, resolver: &CellResolver) -> ExpansionState {
        self.detail.clear();
        self.state = self.state.toggled();
        self.row.set_expanded(self.is_expanded());
        if self.is_expanded() {
            self.detail.push(resolver.resolve_expander(&self.row));
        }
        tracing::debug!(
            target: targets::VIEW,
            row = self.row.index(),
            state = ?self.state,
            "row expansion toggled"
        );
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GridModel, GridModelConfig, GridModelStyles, TemplateRef};
    use serde_json::json;
    use std::rc::Rc;

    fn expansion() -> RowExpansion {
        let model = GridModel::with_config(
            GridModelConfig::default()
                .with_expander(true)
                .with_expander_template(TemplateRef::new("detail")),
            GridModelStyles::default(),
        );
        RowExpansion::new(RowContext::new(Rc::new(json!({"id": 1})), model))
    }

    #[test]
    fn test_starts_collapsed() {
        let expansion = expansion();
        assert_eq!(expansion.state(), ExpansionState::Collapsed);
        assert_eq!(expansion.icon(), COLLAPSED_ICON);
        assert!(expansion.detail().is_empty());
        assert!(!expansion.row().is_expanded());
    }

    #[test]
    fn test_toggle_twice() {
        let resolver = CellResolver::default();
        let mut expansion = expansion();

        assert_eq!(expansion.toggle(&resolver), ExpansionState::Expanded);
        assert_eq!(expansion.icon(), EXPANDED_ICON);
        assert!(expansion.row().is_expanded());
        assert_eq!(expansion.detail().len(), 1);
        assert!(expansion.detail().get(0).unwrap().template().is_some());

        assert_eq!(expansion.toggle(&resolver), ExpansionState::Collapsed);
        assert_eq!(expansion.icon(), COLLAPSED_ICON);
        assert!(!expansion.row().is_expanded());
        assert!(expansion.detail().is_empty());
    }

    #[test]
    fn test_expand_without_expander_config() {
        let resolver = CellResolver::default();
        let row = RowContext::new(Rc::new(json!({})), GridModel::new());
        let mut expansion = RowExpansion::new(row);
        expansion.toggle(&resolver);
        assert!(expansion.is_expanded());
        assert!(expansion.detail().get(0).unwrap().is_empty());
    }
}
