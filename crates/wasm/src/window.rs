use fitview_core::{Subscription, ViewportSource, WidthCallback};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

/// The browser window as a [`ViewportSource`]: width is `innerWidth`,
/// changes arrive through `resize` events.
pub struct WindowViewport {
    window: Window,
}

impl WindowViewport {
    pub fn new() -> Result<Self, JsError> {
        let window = web_sys::window().ok_or_else(|| JsError::new("no global window"))?;
        Ok(Self { window })
    }
}

fn read_width(window: &Window) -> u32 {
    window
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .filter(|w| w.is_finite())
        .map(|w| w.max(0.0).round() as u32)
        .unwrap_or(0)
}

impl ViewportSource for WindowViewport {
    fn current_width(&self) -> u32 {
        read_width(&self.window)
    }

    fn subscribe(&self, mut callback: WidthCallback) -> Subscription {
        let reader = self.window.clone();
        let listener = Closure::<dyn FnMut()>::new(move || callback(read_width(&reader)));

        if let Err(e) = self
            .window
            .add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
        {
            web_sys::console::error_1(&e);
            return Subscription::empty();
        }

        let window = self.window.clone();
        Subscription::new(move || {
            if let Err(e) = window
                .remove_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
            {
                web_sys::console::error_1(&e);
            }
            // The release may run from inside this very listener; free the
            // closure once the current event has finished dispatching.
            wasm_bindgen_futures::spawn_local(async move {
                drop(listener);
            });
        })
    }
}
