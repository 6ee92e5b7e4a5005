//! Decides how each cell renders: template, formatter, or nothing.

use std::fmt;
use std::rc::Rc;

use horizon_grid_core::logging::targets;

use super::formatter::{
    DataFormatter, ExpanderFormatter, FormatterId, FormatterRegistry, HeaderFormatter,
};
use crate::model::{Column, RowContext, TemplateRef};

/// The values a template is instantiated with.
#[derive(Debug, Clone)]
pub struct TemplateContext {
    /// Absent for expander templates.
    pub column: Option<Column>,
    /// Absent for header templates.
    pub row: Option<RowContext>,
}

/// A template together with the context it renders.
#[derive(Debug, Clone)]
pub struct EmbeddedTemplate {
    pub template: TemplateRef,
    pub context: TemplateContext,
}

#[derive(Clone)]
enum Bound {
    Header(Rc<dyn HeaderFormatter>, Column),
    Data(Rc<dyn DataFormatter>, Column, RowContext),
    Expander(Rc<dyn ExpanderFormatter>, RowContext),
}

/// A formatter bound to the column and row it formats.
///
/// The text is produced on demand, so it always reflects the current column
/// configuration and row record.
#[derive(Clone)]
pub struct BoundFormatter {
    id: FormatterId,
    bound: Bound,
}

impl BoundFormatter {
    pub fn id(&self) -> &FormatterId {
        &self.id
    }

    pub fn text(&self) -> String {
        match &self.bound {
            Bound::Header(formatter, column) => formatter.format_header(column),
            Bound::Data(formatter, column, row) => formatter.format_data(column, row),
            Bound::Expander(formatter, row) => formatter.format_expander(row),
        }
    }
}

impl fmt::Debug for BoundFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.bound {
            Bound::Header(..) => "header",
            Bound::Data(..) => "data",
            Bound::Expander(..) => "expander",
        };
        f.debug_struct("BoundFormatter")
            .field("id", &self.id)
            .field("kind", &kind)
            .finish()
    }
}

/// What a cell renders.
#[derive(Debug, Clone, Default)]
pub enum Renderable {
    Template(EmbeddedTemplate),
    Formatter(BoundFormatter),
    /// Nothing could be resolved; the cell stays empty.
    #[default]
    Empty,
}

impl Renderable {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn template(&self) -> Option<&EmbeddedTemplate> {
        match self {
            Self::Template(embedded) => Some(embedded),
            _ => None,
        }
    }

    /// The formatted text, for formatter content.
    pub fn text(&self) -> Option<String> {
        match self {
            Self::Formatter(formatter) => Some(formatter.text()),
            _ => None,
        }
    }

    /// Where the content came from, e.g. `formatter:property`.
    pub fn source(&self) -> String {
        match self {
            Self::Template(embedded) => format!("template:{}", embedded.template.name()),
            Self::Formatter(formatter) => format!("formatter:{}", formatter.id()),
            Self::Empty => "empty".to_string(),
        }
    }
}

/// Formatter text as-is, templates as `<name>`, empty cells as nothing.
impl fmt::Display for Renderable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template(embedded) => write!(f, "<{}>", embedded.template.name()),
            Self::Formatter(formatter) => f.write_str(&formatter.text()),
            Self::Empty => Ok(()),
        }
    }
}

/// Resolves cell content against a [`FormatterRegistry`].
///
/// A template wins over a formatter. When neither is configured, or the
/// formatter is not registered, a warning naming the column key is logged
/// and the cell renders [`Renderable::Empty`].
#[derive(Debug, Clone)]
pub struct CellResolver {
    formatters: Rc<FormatterRegistry>,
}

impl Default for CellResolver {
    fn default() -> Self {
        Self::new(Rc::new(FormatterRegistry::with_builtins()))
    }
}

impl CellResolver {
    pub fn new(formatters: Rc<FormatterRegistry>) -> Self {
        Self { formatters }
    }

    pub fn formatters(&self) -> &FormatterRegistry {
        &self.formatters
    }

    pub fn resolve_header(&self, column: &Column) -> Renderable {
        let (key, template, id) = column.with_config(|config| {
            (
                config.key.clone(),
                config.heading_template.clone(),
                config.heading_formatter.clone(),
            )
        });
        if let Some(template) = template {
            return Renderable::Template(EmbeddedTemplate {
                template,
                context: TemplateContext {
                    column: Some(column.clone()),
                    row: None,
                },
            });
        }
        if let Some(id) = &id {
            if let Some(formatter) = self.formatters.header(id) {
                return Renderable::Formatter(BoundFormatter {
                    id: id.clone(),
                    bound: Bound::Header(formatter, column.clone()),
                });
            }
        }
        tracing::warn!(
            target: targets::FORMAT,
            key = %key,
            formatter = id.as_ref().map(FormatterId::as_str),
            "Could not find header formatter for column with key '{key}'"
        );
        Renderable::Empty
    }

    pub fn resolve_data(&self, column: &Column, row: &RowContext) -> Renderable {
        let (key, template, id) = column.with_config(|config| {
            (
                config.key.clone(),
                config.data_template.clone(),
                config.formatter.clone(),
            )
        });
        if let Some(template) = template {
            return Renderable::Template(EmbeddedTemplate {
                template,
                context: TemplateContext {
                    column: Some(column.clone()),
                    row: Some(row.clone()),
                },
            });
        }
        if let Some(id) = &id {
            if let Some(formatter) = self.formatters.data(id) {
                return Renderable::Formatter(BoundFormatter {
                    id: id.clone(),
                    bound: Bound::Data(formatter, column.clone(), row.clone()),
                });
            }
        }
        tracing::warn!(
            target: targets::FORMAT,
            key = %key,
            formatter = id.as_ref().map(FormatterId::as_str),
            "Could not find data formatter for column with key '{key}'"
        );
        Renderable::Empty
    }

    /// Resolve the detail region of an expanded row from the grid model's
    /// expander template or formatter.
    pub fn resolve_expander(&self, row: &RowContext) -> Renderable {
        let config = row.model().config();
        if let Some(template) = &config.expander_template {
            return Renderable::Template(EmbeddedTemplate {
                template: template.clone(),
                context: TemplateContext {
                    column: None,
                    row: Some(row.clone()),
                },
            });
        }
        let id = config.expander_formatter.clone();
        if let Some(id) = &id {
            if let Some(formatter) = self.formatters.expander(id) {
                return Renderable::Formatter(BoundFormatter {
                    id: id.clone(),
                    bound: Bound::Expander(formatter, row.clone()),
                });
            }
        }
        match &id {
            Some(id) => tracing::warn!(
                target: targets::FORMAT,
                row = row.index(),
                formatter = id.as_str(),
                "Could not find expander formatter for row"
            ),
            None => tracing::trace!(target: targets::FORMAT, row = row.index(), "no expander configured"),
        }
        Renderable::Empty
    }
}
