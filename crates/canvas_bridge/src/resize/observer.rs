use crate::backend::{DomBackend, Target};
use crate::css::CssStateStack;
use crate::foundation::collections::{ElementId, ListenerId};
use crate::foundation::geometry::{parse_css_number, Size, SizeF};

use super::DragController;

/// What a resize binding follows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeSource {
    /// Viewport inner size, updated on `resize`
    Viewport,
    /// Computed content size of an element, updated by resize observation
    Element(ElementId),
}

impl ResizeSource {
    /// Source for a resolved selector
    pub const fn from_target(target: Target) -> Self {
        match target {
            Target::Viewport => Self::Viewport,
            Target::Element(element) => Self::Element(element),
        }
    }

    /// Observed element, if any
    pub const fn element(self) -> Option<ElementId> {
        match self {
            Self::Viewport => None,
            Self::Element(element) => Some(element),
        }
    }

    /// Current size, truncated to whole pixels
    pub fn compute_size(self, dom: &dyn DomBackend) -> Size {
        match self {
            Self::Viewport => dom.viewport_size(),
            Self::Element(element) => computed_size(dom, element).truncate(),
        }
    }
}

/// Computed `width`/`height` of an element in CSS pixels (unparsable values count as 0)
pub(crate) fn computed_size(dom: &dyn DomBackend, element: ElementId) -> SizeF {
    let read = |property| parse_css_number(&dom.computed_style(element, property)).unwrap_or(0.0);
    SizeF::new(read("width"), read("height"))
}

/// Undo step registered while a binding is set up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cleanup {
    /// Restore every inline style the bridge overrode on the element
    RestoreStyles(ElementId),
    /// Stop a resize observation
    Disconnect(ListenerId),
    /// Remove an event listener
    RemoveListener(ListenerId),
}

impl Cleanup {
    fn run(self, dom: &dyn DomBackend, css: &mut CssStateStack) {
        match self {
            Self::RestoreStyles(element) => css.restore_all(dom, element),
            Self::Disconnect(id) | Self::RemoveListener(id) => dom.remove_listener(id),
        }
    }
}

/// A window's subscription to the size of some target
///
/// Each binding carries a generation id; callbacks capture it and do nothing
/// once the binding they were created for has been replaced.
#[derive(Debug)]
pub struct ResizeBinding {
    id: u64,
    source: ResizeSource,
    last_reported: Option<Size>,
    cleanups: Vec<Cleanup>,
    drag: Option<DragController>,
}

impl ResizeBinding {
    /// New binding; element sources restore their styles on teardown
    pub fn new(id: u64, source: ResizeSource) -> Self {
        let cleanups = source.element().map(Cleanup::RestoreStyles).into_iter().collect();
        Self {
            id,
            source,
            last_reported: None,
            cleanups,
            drag: None,
        }
    }

    /// Generation id
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Followed target
    pub const fn source(&self) -> ResizeSource {
        self.source
    }

    /// Last size reported to native code
    pub const fn last_reported(&self) -> Option<Size> {
        self.last_reported
    }

    /// Register an undo step; steps run in registration order
    pub fn push_cleanup(&mut self, cleanup: Cleanup) {
        self.cleanups.push(cleanup);
    }

    /// Registered undo steps
    pub fn cleanups(&self) -> &[Cleanup] {
        &self.cleanups
    }

    /// Measure the source and return the size if it differs from the last report
    pub fn observe(&mut self, dom: &dyn DomBackend) -> Option<Size> {
        let size = self.source.compute_size(dom);
        // deliberate: absorbs the observer's initial fire after the attach-time
        // report, and sub-pixel changes that truncate to the same size
        if self.last_reported == Some(size) {
            return None;
        }
        self.last_reported = Some(size);
        Some(size)
    }

    /// Attached drag controller
    pub const fn drag(&self) -> Option<&DragController> {
        self.drag.as_ref()
    }

    /// Attached drag controller, mutably
    pub fn drag_mut(&mut self) -> Option<&mut DragController> {
        self.drag.as_mut()
    }

    /// Attach a drag controller
    pub fn set_drag(&mut self, drag: DragController) {
        self.drag = Some(drag);
    }

    /// Run every cleanup in registration order
    pub fn teardown(self, dom: &dyn DomBackend, css: &mut CssStateStack) {
        for cleanup in self.cleanups {
            cleanup.run(dom, css);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessDom;

    #[test]
    fn test_element_size_is_truncated() {
        let dom = HeadlessDom::new();
        let container = dom.create_element("div", Some("container"));
        dom.set_sheet_style(container, "width", "320.75px");
        dom.set_sheet_style(container, "height", "200.2px");

        assert_eq!(ResizeSource::Element(container).compute_size(&dom), Size::new(320, 200));
        assert_eq!(ResizeSource::Viewport.compute_size(&dom), Size::new(1024, 768));
    }

    #[test]
    fn test_observe_reports_changes_only() {
        let dom = HeadlessDom::new();
        let mut binding = ResizeBinding::new(1, ResizeSource::Viewport);

        assert_eq!(binding.observe(&dom), Some(Size::new(1024, 768)));
        assert_eq!(binding.observe(&dom), None);

        dom.set_viewport_size(Size::new(800, 600));
        assert_eq!(binding.observe(&dom), Some(Size::new(800, 600)));
        assert_eq!(binding.last_reported(), Some(Size::new(800, 600)));
    }

    #[test]
    fn test_teardown_restores_styles_then_disconnects() {
        let dom = HeadlessDom::new();
        let container = dom.create_element("div", Some("container"));
        let mut css = CssStateStack::new();
        css.set(&dom, container, "width", "10px");

        let mut binding = ResizeBinding::new(7, ResizeSource::Element(container));
        let id = dom.observe_resize(container, Box::new(|| {})).unwrap();
        binding.push_cleanup(Cleanup::Disconnect(id));
        assert_eq!(
            binding.cleanups(),
            &[Cleanup::RestoreStyles(container), Cleanup::Disconnect(id)]
        );

        binding.teardown(&dom, &mut css);
        assert_eq!(dom.inline_style(container, "width"), "");
        assert!(!dom.is_registered(id));
        assert!(!css.has_backup(container));
    }
}
