mod dom;
mod error;
mod window;

use fitview_core::{
    Breakpoint, BreakpointObserver, ConfigError, FitConfig, ScaledViewport, Subscription,
};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

pub use dom::{ElementContent, apply_style};
pub use error::BridgeError;
pub use window::WindowViewport;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

fn parse_config(json: Option<&str>) -> Result<FitConfig, ConfigError> {
    match json {
        Some(json) => FitConfig::from_json(json),
        None => Ok(FitConfig::default()),
    }
}

fn report(result: Result<JsValue, JsValue>) {
    if let Err(e) = result {
        web_sys::console::error_1(&e);
    }
}

/// Layout for content of `intrinsic_height` at `viewport_width`, as JSON.
pub fn layout_json(
    viewport_width: u32,
    intrinsic_height: f64,
    config: Option<&str>,
) -> Result<String, BridgeError> {
    let config = parse_config(config)?;
    let layout = fitview_core::scale::compute_layout(viewport_width, intrinsic_height, &config);
    Ok(serde_json::to_string(&layout)?)
}

/// Compute a scaled layout without touching the DOM. Returns JSON.
#[wasm_bindgen]
pub fn compute_layout(
    viewport_width: u32,
    intrinsic_height: f64,
    config: Option<String>,
) -> Result<String, JsError> {
    Ok(layout_json(viewport_width, intrinsic_height, config.as_deref())?)
}

/// Live "is the window narrower than the breakpoint" flag.
#[wasm_bindgen]
pub struct MobileObserver {
    inner: BreakpointObserver,
    listeners: Vec<Subscription>,
}

#[wasm_bindgen]
impl MobileObserver {
    /// `breakpoint` defaults to 768 and must be a positive whole number.
    #[wasm_bindgen(constructor)]
    pub fn new(breakpoint: Option<f64>) -> Result<MobileObserver, JsError> {
        let breakpoint = breakpoint
            .map(Breakpoint::try_from)
            .transpose()?
            .unwrap_or_default();
        let viewport = WindowViewport::new()?;
        Ok(Self {
            inner: BreakpointObserver::new(&viewport, breakpoint),
            listeners: Vec::new(),
        })
    }

    #[wasm_bindgen(js_name = isMobile)]
    pub fn is_mobile(&self) -> bool {
        self.inner.is_mobile()
    }

    #[wasm_bindgen(js_name = mediaQuery)]
    pub fn media_query(&self) -> String {
        self.inner.breakpoint().media_query()
    }

    /// Call `callback(isMobile)` whenever the classification flips.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&mut self, callback: js_sys::Function) {
        let sub = self.inner.subscribe(move |class| {
            report(callback.call1(&JsValue::NULL, &JsValue::from_bool(class.is_mobile())));
        });
        self.listeners.push(sub);
    }

    pub fn dispose(&mut self) {
        self.listeners.clear();
        self.inner.dispose();
    }
}

/// A fixed-width document shrunk to fit the window.
///
/// `content` is kept at the design width and visually scaled; `container`
/// reserves exactly the scaled height in page flow.
#[wasm_bindgen]
pub struct ScaledDocument {
    inner: ScaledViewport,
    listeners: Vec<Subscription>,
}

#[wasm_bindgen]
impl ScaledDocument {
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: HtmlElement,
        content: HtmlElement,
        config: Option<String>,
    ) -> Result<ScaledDocument, JsError> {
        let config = parse_config(config.as_deref())?;
        let viewport = WindowViewport::new()?;
        let inner = ScaledViewport::new(&viewport, ElementContent::new(content.clone()), config)?;

        apply_style(&container, &content, &inner.layout())
            .map_err(|e| JsError::new(&format!("failed to style document: {e:?}")))?;
        let styling = inner.subscribe(move |layout| {
            if let Err(e) = apply_style(&container, &content, &layout) {
                web_sys::console::error_1(&e);
            }
        });

        Ok(Self {
            inner,
            listeners: vec![styling],
        })
    }

    pub fn scale(&self) -> f64 {
        self.inner.scale()
    }

    #[wasm_bindgen(js_name = visualHeight)]
    pub fn visual_height(&self) -> f64 {
        self.inner.visual_height()
    }

    #[wasm_bindgen(js_name = layoutJson)]
    pub fn layout_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.inner.layout())?)
    }

    /// Re-measure after the document's content changed. Returns whether the
    /// reserved height moved.
    pub fn refresh(&self) -> bool {
        self.inner.content_changed()
    }

    /// Call `callback(layoutJson)` whenever the layout changes.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&mut self, callback: js_sys::Function) {
        let sub = self.inner.subscribe(move |layout| match serde_json::to_string(&layout) {
            Ok(json) => report(callback.call1(&JsValue::NULL, &JsValue::from_str(&json))),
            Err(e) => web_sys::console::error_1(&JsValue::from_str(&e.to_string())),
        });
        self.listeners.push(sub);
    }

    pub fn dispose(&mut self) {
        self.listeners.clear();
        self.inner.dispose();
    }
}
