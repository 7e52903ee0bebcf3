//! Browser callback lifecycles as owned handles.
//!
//! Every loop, timer, and listener the page registers is held by a guard
//! that revokes the registration on `Drop`, so teardown can never leave a
//! callback firing against disposed state.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

/// Self-rescheduling requestAnimationFrame loop. Each invocation runs the
/// tick and schedules the next frame; frames never overlap. Dropping the
/// handle cancels the pending request.
pub struct FrameLoop {
    closure: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
    pending: Rc<Cell<i32>>,
    active: Rc<Cell<bool>>,
}

impl FrameLoop {
    pub fn start<F: FnMut() + 'static>(mut tick: F) -> Result<Self, JsValue> {
        // The closure needs a reference to itself to reschedule, hence the
        // shared Option slot (same shape as the usual rAF recursion).
        let closure: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(0));
        let active = Rc::new(Cell::new(true));

        let inner_closure = closure.clone();
        let inner_pending = pending.clone();
        let inner_active = active.clone();
        *closure.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            if !inner_active.get() {
                return;
            }
            tick();
            if let Some(cb) = inner_closure.borrow().as_ref() {
                if let Ok(id) = request_frame(cb) {
                    inner_pending.set(id);
                }
            }
        }) as Box<dyn FnMut()>));

        let first = {
            let slot = closure.borrow();
            request_frame(slot.as_ref().expect("closure just installed"))?
        };
        pending.set(first);

        Ok(Self {
            closure,
            pending,
            active,
        })
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.active.set(false);
        if let Some(win) = web_sys::window() {
            let _ = win.cancel_animation_frame(self.pending.get());
        }
        self.closure.borrow_mut().take();
    }
}

fn request_frame(cb: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
    window()?.request_animation_frame(cb.as_ref().unchecked_ref())
}

/// Shared cancel token for an [`Interval`]. Cloned into the callback when
/// the interval must be able to stop itself (countdown expiry).
#[derive(Clone)]
pub struct IntervalHandle {
    id: Rc<Cell<Option<i32>>>,
}

impl IntervalHandle {
    pub fn new() -> Self {
        Self {
            id: Rc::new(Cell::new(None)),
        }
    }

    /// Clears the interval. Safe to call more than once.
    pub fn clear(&self) {
        if let Some(id) = self.id.take() {
            if let Some(win) = web_sys::window() {
                win.clear_interval_with_handle(id);
            }
        }
    }
}

/// Periodic timer bound to `window.setInterval`.
pub struct Interval {
    handle: IntervalHandle,
    _closure: Closure<dyn FnMut()>,
}

impl Interval {
    /// `handle` is the token the callback may already have captured; it is
    /// armed with the browser timer id before the first tick can fire.
    pub fn start<F: FnMut() + 'static>(
        handle: IntervalHandle,
        period_ms: i32,
        tick: F,
    ) -> Result<Self, JsValue> {
        let closure = Closure::wrap(Box::new(tick) as Box<dyn FnMut()>);
        let id = window()?.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            period_ms,
        )?;
        handle.id.set(Some(id));
        Ok(Self {
            handle,
            _closure: closure,
        })
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.handle.clear();
    }
}

/// One-shot `window.setTimeout`. Clearing an already-fired timeout is a
/// no-op, so `Drop` is unconditional.
pub struct Timeout {
    id: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Timeout {
    pub fn once<F: FnMut() + 'static>(delay_ms: i32, action: F) -> Result<Self, JsValue> {
        let closure = Closure::wrap(Box::new(action) as Box<dyn FnMut()>);
        let id = window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms,
        )?;
        Ok(Self {
            id,
            _closure: closure,
        })
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        if let Some(win) = web_sys::window() {
            win.clear_timeout_with_handle(self.id);
        }
    }
}

/// addEventListener with a guaranteed matching removeEventListener.
pub struct EventListener {
    target: web_sys::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl EventListener {
    pub fn add<F: FnMut(web_sys::Event) + 'static>(
        target: &web_sys::EventTarget,
        event: &'static str,
        handler: F,
    ) -> Result<Self, JsValue> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}
