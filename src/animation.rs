//! requestAnimationFrame loop with an explicit lifetime.
//!
//! The frame callback reschedules itself for as long as its `CancelToken` is
//! live. `FrameLoop::stop` (or dropping the loop) cancels the token, cancels
//! the pending request and releases the closure, so nothing keeps firing
//! once the owner is gone.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::error::BackgroundError;

/// Shared stop flag between a loop and the callback it drives.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

type FrameCallback = Closure<dyn FnMut()>;

pub struct FrameLoop {
    token: CancelToken,
    pending: Rc<Cell<Option<i32>>>,
    // The callback holds a handle to this slot to reschedule itself; taking
    // the closure out in `stop` breaks that cycle.
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl FrameLoop {
    /// Runs `on_frame` once per display refresh until stopped.
    pub fn start<F>(mut on_frame: F) -> Result<FrameLoop, BackgroundError>
    where
        F: FnMut() + 'static,
    {
        let window = web_sys::window().ok_or(BackgroundError::NoWindow)?;
        let token = CancelToken::new();
        let pending = Rc::new(Cell::new(None));
        let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));

        let frame_token = token.clone();
        let frame_pending = pending.clone();
        let frame_callback = callback.clone();
        let frame_window = window.clone();
        let closure = Closure::wrap(Box::new(move || {
            frame_pending.set(None);
            if frame_token.is_cancelled() {
                return;
            }
            on_frame();
            if frame_token.is_cancelled() {
                return;
            }
            if let Some(next) = frame_callback.borrow().as_ref() {
                match request_frame(&frame_window, next) {
                    Ok(id) => frame_pending.set(Some(id)),
                    Err(e) => {
                        log::warn!("requestAnimationFrame failed, frame loop ends: {:?}", e);
                        frame_token.cancel();
                    }
                }
            }
        }) as Box<dyn FnMut()>);

        let id = request_frame(&window, &closure)?;
        pending.set(Some(id));
        *callback.borrow_mut() = Some(closure);
        log::info!("frame loop started");

        Ok(FrameLoop {
            token,
            pending,
            callback,
        })
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn stop(&mut self) {
        if self.token.is_cancelled() && self.callback.borrow().is_none() {
            return;
        }
        self.token.cancel();
        if let Some(id) = self.pending.take() {
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.cancel_animation_frame(id) {
                    log::warn!("cancelAnimationFrame({}) failed: {:?}", id, e);
                }
            }
        }
        self.callback.borrow_mut().take();
        log::info!("frame loop stopped");
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn request_frame(window: &Window, callback: &FrameCallback) -> Result<i32, JsValue> {
    let function: &js_sys::Function = callback.as_ref().unchecked_ref();
    window.request_animation_frame(function)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_shared_between_clones() {
        let token = CancelToken::new();
        let seen_by_callback = token.clone();
        assert!(!seen_by_callback.is_cancelled());
        token.cancel();
        assert!(seen_by_callback.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
    }
}
