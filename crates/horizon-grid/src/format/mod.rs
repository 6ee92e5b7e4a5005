//! Cell formatting.
//!
//! Every header cell, data cell and expanded-row detail region renders one
//! [`Renderable`]: a renderer-supplied template bound to its context, a
//! formatter bound to its column and row, or nothing. [`CellResolver`]
//! decides which, looking formatters up by [`FormatterId`] in a
//! [`FormatterRegistry`].
//!
//! # Built-in formatters
//!
//! | id           | kind   | renders                                       |
//! |--------------|--------|-----------------------------------------------|
//! | `keyHeading` | header | the column heading                            |
//! | `property`   | data   | the row value at the column key               |
//! | `date`       | data   | the same value as a date, per `dateFormat`    |

pub mod date;
mod formatter;
mod resolver;

pub use date::DEFAULT_DATE_FORMAT;
pub use formatter::{
    DataFormatter, DateFormatter, ExpanderFormatter, FormatterId, FormatterRegistry,
    HeaderFormatter, KeyHeadingFormatter, PropertyFormatter,
};
pub use resolver::{BoundFormatter, CellResolver, EmbeddedTemplate, Renderable, TemplateContext};
