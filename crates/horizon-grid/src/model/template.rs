//! Renderer-supplied template handles.

use std::fmt;
use std::rc::Rc;

/// An opaque template unit supplied by the renderer.
///
/// Templates override formatters for header, data and expander cells. The
/// grid never looks inside one; it only binds a context to it and hands the
/// pair back to the renderer. Two handles are equal when they refer to the
/// same template, regardless of name.
#[derive(Clone)]
pub struct TemplateRef {
    name: Rc<str>,
}

impl TemplateRef {
    /// Create a new template handle with a diagnostic name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Rc::from(name.into()),
        }
    }

    /// The diagnostic name this template was created with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if both handles refer to the same template.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.name, &b.name)
    }
}

impl PartialEq for TemplateRef {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other)
    }
}

impl Eq for TemplateRef {}

impl fmt::Debug for TemplateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TemplateRef").field(&&*self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_identity() {
        let a = TemplateRef::new("firstNameHeader");
        let b = TemplateRef::new("firstNameHeader");
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.name(), "firstNameHeader");
    }
}
