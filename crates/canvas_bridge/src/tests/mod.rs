//! Scenario tests driving the bridge through the headless DOM

mod resize;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::backend::HeadlessDom;
use crate::bridge::{NativeCallbacks, WindowBridge};
use crate::config::BridgeConfig;
use crate::error::ErrorCode;
use crate::foundation::collections::{ElementId, WindowHandle};
use crate::foundation::geometry::Size;
use crate::input::KeyEvent;

/// Something native code was told
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Record {
    Scale,
    Resized(WindowHandle, Size),
    Key(KeyEvent),
    Clipboard(Option<String>, Option<String>),
    Fullscreen(Option<WindowHandle>, bool, bool),
    Error(ErrorCode, String),
}

/// Page with one 300x150 `#canvas`, a bridge over it and recording callbacks
pub(crate) struct Harness {
    pub dom: Rc<HeadlessDom>,
    pub bridge: WindowBridge,
    pub canvas: ElementId,
    pub log: Rc<RefCell<Vec<Record>>>,
    pub consume_keys: Rc<Cell<bool>>,
}

pub(crate) const WINDOW: WindowHandle = WindowHandle(0x10);

impl Harness {
    pub fn new() -> Self {
        Self::with_config(BridgeConfig::default())
    }

    pub fn with_config(config: BridgeConfig) -> Self {
        let dom = Rc::new(HeadlessDom::with_targets(config.targets.clone()));
        let canvas = dom.create_canvas("canvas", Size::new(300, 150));
        let log = Rc::new(RefCell::new(Vec::new()));
        let consume_keys = Rc::new(Cell::new(false));
        let callbacks = recording_callbacks(&log, &consume_keys);
        let bridge = WindowBridge::new(dom.clone(), config, callbacks).unwrap();
        bridge.init(1.0).unwrap();
        Self {
            dom,
            bridge,
            canvas,
            log,
            consume_keys,
        }
    }

    /// Harness with `WINDOW` already created on `#canvas`
    pub fn with_window() -> Self {
        let harness = Self::new();
        harness.bridge.create_window(WINDOW, "#canvas").unwrap();
        harness
    }

    /// Drain the record log
    pub fn take(&self) -> Vec<Record> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    /// Drain the log, keeping only resize reports
    pub fn take_resizes(&self) -> Vec<(WindowHandle, Size)> {
        self.take()
            .into_iter()
            .filter_map(|record| match record {
                Record::Resized(window, size) => Some((window, size)),
                _ => None,
            })
            .collect()
    }
}

pub(crate) fn recording_callbacks(log: &Rc<RefCell<Vec<Record>>>, consume_keys: &Rc<Cell<bool>>) -> NativeCallbacks {
    let scale = Rc::clone(log);
    let resized = Rc::clone(log);
    let keyboard = Rc::clone(log);
    let consume = Rc::clone(consume_keys);
    let clipboard = Rc::clone(log);
    let fullscreen = Rc::clone(log);
    let error = Rc::clone(log);
    NativeCallbacks::new()
        .with_scale_changed(move || scale.borrow_mut().push(Record::Scale))
        .with_window_resized(move |window, size| resized.borrow_mut().push(Record::Resized(window, size)))
        .with_keyboard(move |event| {
            keyboard.borrow_mut().push(Record::Key(event.clone()));
            consume.get()
        })
        .with_clipboard(move |text, failure| {
            clipboard.borrow_mut().push(Record::Clipboard(
                text.map(str::to_string),
                failure.map(str::to_string),
            ));
        })
        .with_request_fullscreen(move |window, lock, resize| {
            fullscreen.borrow_mut().push(Record::Fullscreen(window, lock, resize));
        })
        .with_error(move |code, message| error.borrow_mut().push(Record::Error(code, message.to_string())))
}
