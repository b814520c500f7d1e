//! Inline style save/restore
//!
//! Every inline style the bridge writes goes through [`CssStateStack::set`],
//! which records the element's own inline value the first time a property is
//! overridden. [`CssStateStack::restore`] puts those values back, so an
//! element always ends up exactly as the page styled it once the bridge lets
//! go of it. Backups carry the declaration's priority along with its value.

use std::collections::{BTreeMap, HashMap};

use crate::backend::{DomBackend, StylePriority};
use crate::foundation::collections::ElementId;

/// Inline declaration as it was before the first override
#[derive(Debug, Clone, PartialEq, Eq)]
struct Original {
    value: String,
    priority: StylePriority,
}

/// Per-element backups of overridden inline style properties
#[derive(Debug, Default)]
pub struct CssStateStack {
    backups: HashMap<ElementId, BTreeMap<String, Original>>,
}

impl CssStateStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Override an inline style property, backing up the original value once
    pub fn set(&mut self, dom: &dyn DomBackend, element: ElementId, property: &str, value: &str) {
        self.set_with_priority(dom, element, property, value, StylePriority::Normal);
    }

    /// Override an inline style property with `!important`
    pub fn set_important(&mut self, dom: &dyn DomBackend, element: ElementId, property: &str, value: &str) {
        self.set_with_priority(dom, element, property, value, StylePriority::Important);
    }

    fn set_with_priority(
        &mut self,
        dom: &dyn DomBackend,
        element: ElementId,
        property: &str,
        value: &str,
        priority: StylePriority,
    ) {
        let backup = self.backups.entry(element).or_default();
        if !backup.contains_key(property) {
            let original = Original {
                value: dom.inline_style(element, property),
                priority: dom.inline_priority(element, property),
            };
            backup.insert(property.to_string(), original);
        }
        dom.set_inline_style(element, property, value, priority);
    }

    /// Restore one backed-up property
    pub fn restore_property(&mut self, dom: &dyn DomBackend, element: ElementId, property: &str) {
        self.restore(dom, element, Some(&[property]));
    }

    /// Restore every backed-up property of the element
    pub fn restore_all(&mut self, dom: &dyn DomBackend, element: ElementId) {
        self.restore(dom, element, None);
    }

    /// Restore the named properties (all of them when `properties` is `None`)
    ///
    /// A property whose original value was empty is removed from the inline
    /// style. Restored properties leave the backup; an element without any
    /// backed-up property is forgotten.
    pub fn restore(&mut self, dom: &dyn DomBackend, element: ElementId, properties: Option<&[&str]>) {
        let Some(backup) = self.backups.get_mut(&element) else {
            return;
        };

        let names: Vec<String> = match properties {
            Some(names) => names.iter().map(|name| (*name).to_string()).collect(),
            None => backup.keys().cloned().collect(),
        };

        for name in names {
            let Some(original) = backup.remove(&name) else {
                continue;
            };
            if original.value.is_empty() {
                dom.remove_inline_style(element, &name);
            } else {
                dom.set_inline_style(element, &name, &original.value, original.priority);
            }
        }

        if backup.is_empty() {
            self.backups.remove(&element);
        }
    }

    /// Original value recorded for `property`, if it is currently overridden
    pub fn backed_up(&self, element: ElementId, property: &str) -> Option<&str> {
        self.backups
            .get(&element)
            .and_then(|backup| backup.get(property))
            .map(|original| original.value.as_str())
    }

    /// Whether any property of the element is currently overridden
    pub fn has_backup(&self, element: ElementId) -> bool {
        self.backups.contains_key(&element)
    }

    /// Drop every backup without touching the page
    pub fn clear(&mut self) {
        self.backups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessDom;
    use crate::foundation::geometry::Size;

    fn canvas(dom: &HeadlessDom) -> ElementId {
        dom.create_canvas("canvas", Size::new(300, 150))
    }

    #[test]
    fn test_round_trip_restores_original_inline_value() {
        let dom = HeadlessDom::new();
        let element = canvas(&dom);
        dom.set_inline_style(element, "width", "50%", StylePriority::Normal);

        let mut stack = CssStateStack::new();
        stack.set(&dom, element, "width", "200px");
        stack.set(&dom, element, "width", "300px");
        assert_eq!(dom.inline_style(element, "width"), "300px");
        assert_eq!(stack.backed_up(element, "width"), Some("50%"));

        stack.restore_all(&dom, element);
        assert_eq!(dom.inline_style(element, "width"), "50%");
        assert!(!stack.has_backup(element));
    }

    #[test]
    fn test_unset_property_is_removed_on_restore() {
        let dom = HeadlessDom::new();
        let element = canvas(&dom);
        let mut stack = CssStateStack::new();

        stack.set(&dom, element, "cursor", "pointer");
        stack.restore_property(&dom, element, "cursor");
        assert_eq!(dom.inline_style(element, "cursor"), "");
        assert_eq!(dom.computed_style(element, "cursor"), "auto");
    }

    #[test]
    fn test_partial_restore_keeps_other_backups() {
        let dom = HeadlessDom::new();
        let element = canvas(&dom);
        let mut stack = CssStateStack::new();

        stack.set(&dom, element, "width", "10px");
        stack.set(&dom, element, "display", "none");
        stack.restore_property(&dom, element, "display");

        assert!(stack.has_backup(element));
        assert_eq!(dom.inline_style(element, "width"), "10px");
        assert_eq!(dom.inline_style(element, "display"), "");

        // a new override episode backs up the current value again
        dom.set_inline_style(element, "display", "block", StylePriority::Normal);
        stack.set(&dom, element, "display", "none");
        assert_eq!(stack.backed_up(element, "display"), Some("block"));
    }

    #[test]
    fn test_priority_restored_with_value() {
        let dom = HeadlessDom::new();
        let element = canvas(&dom);
        dom.set_inline_style(element, "height", "40px", StylePriority::Important);

        let mut stack = CssStateStack::new();
        stack.set(&dom, element, "height", "80px");
        assert_eq!(dom.inline_priority(element, "height"), StylePriority::Normal);
        stack.set_important(&dom, element, "width", "90px");
        assert_eq!(dom.inline_priority(element, "width"), StylePriority::Important);

        stack.restore_all(&dom, element);
        assert_eq!(dom.inline_style(element, "height"), "40px");
        assert_eq!(dom.inline_priority(element, "height"), StylePriority::Important);
        assert_eq!(dom.inline_style(element, "width"), "");
    }

    #[test]
    fn test_restore_unknown_element_is_noop() {
        let dom = HeadlessDom::new();
        let element = canvas(&dom);
        let mut stack = CssStateStack::new();
        stack.restore_all(&dom, element);
        stack.restore_property(&dom, element, "width");
        assert!(!stack.has_backup(element));
    }
}
