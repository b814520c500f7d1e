//! Resize following: immediate report on attach, one report per change

#[cfg(test)]
mod tests {
    use super::super::{Harness, Record, WINDOW};
    use crate::error::{BridgeError, ErrorCode};
    use crate::foundation::collections::{ElementId, WindowHandle};
    use crate::foundation::geometry::Size;

    fn with_container(harness: &Harness) -> ElementId {
        let container = harness.dom.create_element("div", Some("container"));
        harness.dom.set_sheet_style(container, "width", "200px");
        harness.dom.set_sheet_style(container, "height", "150px");
        container
    }

    #[test]
    fn test_viewport_binding_reports_immediately_and_on_resize() {
        let harness = Harness::with_window();
        harness.bridge.set_resize_target(WINDOW, Some("window")).unwrap();
        assert_eq!(harness.take_resizes(), vec![(WINDOW, Size::new(1024, 768))]);

        harness.dom.set_viewport_size(Size::new(800, 600));
        assert_eq!(harness.take_resizes(), vec![(WINDOW, Size::new(800, 600))]);

        // same size again: nothing to report
        harness.dom.set_viewport_size(Size::new(800, 600));
        assert!(harness.take_resizes().is_empty());
    }

    #[test]
    fn test_element_binding_reports_each_change_once() {
        let harness = Harness::with_window();
        let container = with_container(&harness);

        harness.bridge.set_resize_target(WINDOW, Some("#container")).unwrap();
        assert_eq!(harness.take_resizes(), vec![(WINDOW, Size::new(200, 150))]);

        // the first observation repeats the size already reported
        harness.dom.advance_frame();
        assert!(harness.take_resizes().is_empty());

        harness.dom.set_sheet_style(container, "width", "250.9px");
        harness.dom.advance_frame();
        harness.dom.advance_frame();
        assert_eq!(harness.take_resizes(), vec![(WINDOW, Size::new(250, 150))]);
    }

    #[test]
    fn test_sub_pixel_change_is_not_reported() {
        let harness = Harness::with_window();
        let container = with_container(&harness);
        harness.dom.set_sheet_style(container, "width", "300.2px");

        harness.bridge.set_resize_target(WINDOW, Some("#container")).unwrap();
        assert_eq!(harness.take_resizes(), vec![(WINDOW, Size::new(300, 150))]);

        // truncates to the size already reported
        harness.dom.set_sheet_style(container, "width", "300.7px");
        harness.dom.advance_frame();
        assert!(harness.take_resizes().is_empty());

        harness.dom.set_sheet_style(container, "width", "301.1px");
        harness.dom.advance_frame();
        assert_eq!(harness.take_resizes(), vec![(WINDOW, Size::new(301, 150))]);
    }

    #[test]
    fn test_detach_stops_reports() {
        let harness = Harness::with_window();
        let container = with_container(&harness);
        let baseline = harness.dom.listener_count();

        harness.bridge.set_resize_target(WINDOW, Some("#container")).unwrap();
        assert_eq!(harness.dom.listener_count(), baseline + 1);
        harness.bridge.set_resize_target(WINDOW, None).unwrap();
        assert_eq!(harness.dom.listener_count(), baseline);
        harness.take();

        harness.dom.set_sheet_style(container, "width", "300px");
        harness.dom.advance_frame();
        harness.dom.set_viewport_size(Size::new(640, 480));
        assert!(harness.take_resizes().is_empty());
    }

    #[test]
    fn test_reattach_reports_exactly_once() {
        let harness = Harness::with_window();
        with_container(&harness);

        harness.bridge.set_resize_target(WINDOW, Some("#container")).unwrap();
        harness.bridge.set_resize_target(WINDOW, None).unwrap();
        harness.bridge.set_resize_target(WINDOW, Some("#container")).unwrap();
        harness.dom.advance_frame();

        assert_eq!(
            harness.take_resizes(),
            vec![(WINDOW, Size::new(200, 150)), (WINDOW, Size::new(200, 150))]
        );
    }

    #[test]
    fn test_switching_targets_drops_previous_binding() {
        let harness = Harness::with_window();
        let container = with_container(&harness);

        harness.bridge.set_resize_target(WINDOW, Some("#container")).unwrap();
        harness.bridge.set_resize_target(WINDOW, Some("window")).unwrap();
        harness.take();

        harness.dom.set_sheet_style(container, "height", "90px");
        harness.dom.advance_frame();
        assert!(harness.take_resizes().is_empty());

        harness.dom.set_viewport_size(Size::new(300, 300));
        assert_eq!(harness.take_resizes(), vec![(WINDOW, Size::new(300, 300))]);
    }

    #[test]
    fn test_each_window_follows_its_own_target() {
        let harness = Harness::with_window();
        with_container(&harness);
        harness.dom.create_canvas("second", Size::new(10, 10));
        let second = WindowHandle(0x20);
        harness.bridge.create_window(second, "#second").unwrap();

        harness.bridge.set_resize_target(WINDOW, Some("window")).unwrap();
        harness.bridge.set_resize_target(second, Some("#container")).unwrap();
        harness.take();

        harness.dom.set_viewport_size(Size::new(500, 400));
        assert_eq!(harness.take_resizes(), vec![(WINDOW, Size::new(500, 400))]);
    }

    #[test]
    fn test_unknown_window_is_reported() {
        let harness = Harness::with_window();
        let result = harness.bridge.set_resize_target(WindowHandle(0x99), Some("window"));

        assert!(matches!(result, Err(BridgeError::UnknownTarget(_))));
        assert_eq!(
            harness.take(),
            vec![Record::Error(
                ErrorCode::InvalidValue,
                "Unknown target: Cannot find canvas [0x99]".to_string()
            )]
        );
    }

    #[test]
    fn test_unknown_selector_is_reported() {
        let harness = Harness::with_window();
        let result = harness.bridge.set_resize_target(WINDOW, Some("#nowhere"));

        assert!(matches!(result, Err(BridgeError::UnknownTarget(_))));
        let records = harness.take();
        assert_eq!(records.len(), 1);
        assert!(matches!(&records[0], Record::Error(ErrorCode::InvalidValue, message) if message.contains("#nowhere")));
    }

    #[test]
    fn test_destroy_window_drops_binding() {
        let harness = Harness::with_window();
        let baseline = harness.dom.listener_count();
        harness.bridge.set_resize_target(WINDOW, Some("window")).unwrap();
        harness.bridge.destroy_window(WINDOW);
        harness.take();

        assert_eq!(harness.dom.listener_count(), baseline);
        harness.dom.set_viewport_size(Size::new(320, 200));
        assert!(harness.take_resizes().is_empty());
    }
}
