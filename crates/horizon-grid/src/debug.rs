//! Tree-shaped debug dumps of a rendered grid.
//!
//! ```
//! use horizon_grid::debug::GridDebug;
//! use horizon_grid::prelude::*;
//! use serde_json::json;
//!
//! let model = GridModel::new();
//! model.add_column(Column::new("firstName"));
//! let source = ArrayDataSource::new();
//! source.add_item(json!({"firstName": "Peter"}));
//! source.reload();
//!
//! let mut view = GridView::new(model).with_data_source(source);
//! view.attach();
//!
//! let dump = GridDebug::new(TreeFormatOptions::minimal()).format(&view);
//! assert!(dump.contains("Peter"));
//! ```

use horizon_grid_core::{TreeFormatOptions, TreeStyle};

use crate::format::Renderable;
use crate::view::{DataRow, GridView, HeaderRow};

struct Node {
    label: String,
    children: Vec<Node>,
}

impl Node {
    fn leaf(label: String) -> Self {
        Self {
            label,
            children: Vec::new(),
        }
    }
}

/// Formats a [`GridView`] as an indented tree.
#[derive(Debug, Clone, Default)]
pub struct GridDebug {
    options: TreeFormatOptions,
}

impl GridDebug {
    pub fn new(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TreeFormatOptions {
        &self.options
    }

    pub fn format(&self, view: &GridView) -> String {
        let header = view.with_header(|header| header.map(|h| self.header_node(h)));
        let (rows, total) = view.with_rows(|rows| {
            let limit = self.options.max_rows.unwrap_or(usize::MAX);
            let nodes: Vec<Node> = rows.iter().take(limit).map(|r| self.row_node(r)).collect();
            (nodes, rows.len())
        });

        let mut rows_node = Node {
            label: format!("Rows ({total})"),
            children: rows,
        };
        if rows_node.children.len() < total {
            let hidden = total - rows_node.children.len();
            rows_node.children.push(Node::leaf(format!("... {hidden} more")));
        }

        let mut root = Node {
            label: format!("Grid ({} columns)", view.model().column_count()),
            children: Vec::new(),
        };
        root.children.extend(header);
        root.children.push(rows_node);

        let mut out = String::new();
        out.push_str(&root.label);
        out.push('\n');
        self.write_children(&mut out, &root.children, "");
        out
    }

    fn header_node(&self, header: &HeaderRow) -> Node {
        let children = header
            .cells()
            .iter()
            .map(|cell| Node::leaf(self.cell_label(cell.content(), cell.classes())))
            .collect();
        Node {
            label: "Header".to_string(),
            children,
        }
    }

    fn row_node(&self, row: &DataRow) -> Node {
        let context = row.context();
        let mut children: Vec<Node> = row
            .cells()
            .iter()
            .map(|cell| Node::leaf(self.cell_label(cell.content(), cell.classes())))
            .collect();
        if self.options.show_detail {
            for detail in row.expansion().detail() {
                children.push(Node::leaf(format!(
                    "Detail: {}",
                    self.cell_label(detail, &[])
                )));
            }
        }
        let state = if context.is_expanded() {
            "expanded"
        } else {
            "collapsed"
        };
        Node {
            label: format!("Row {} ({state})", context.index()),
            children,
        }
    }

    fn cell_label(&self, content: &Renderable, classes: &[String]) -> String {
        let mut label = content.to_string();
        if self.options.show_classes && !classes.is_empty() {
            label.push_str(&format!(" [{}]", classes.join(" ")));
        }
        if self.options.show_sources {
            label.push_str(&format!(" ({})", content.source()));
        }
        label
    }

    fn write_children(&self, out: &mut String, children: &[Node], prefix: &str) {
        let style = self.options.style;
        for (i, child) in children.iter().enumerate() {
            let is_last = i + 1 == children.len();
            if style == TreeStyle::Compact {
                let depth = prefix.len() / 2;
                out.push_str(&"  ".repeat(depth + 1));
                out.push_str(&child.label);
                out.push('\n');
                self.write_children(out, &child.children, &format!("{prefix}  "));
                continue;
            }
            out.push_str(prefix);
            out.push_str(style.branch(is_last));
            out.push_str(&child.label);
            out.push('\n');
            let next = format!("{prefix}{}", style.continuation(is_last));
            self.write_children(out, &child.children, &next);
        }
    }
}
