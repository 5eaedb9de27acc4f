use fitview_core::MeasureContent;
use fitview_protocol::ScaledLayout;
use wasm_bindgen::JsValue;
use web_sys::HtmlElement;

/// A DOM element measured at the width it is offered.
///
/// `offsetHeight` reports the layout box, which CSS transforms leave alone,
/// so the measurement is independent of the scale being shown.
pub struct ElementContent {
    element: HtmlElement,
}

impl ElementContent {
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }
}

impl MeasureContent for ElementContent {
    fn intrinsic_height(&self, available_width: u32) -> f64 {
        if let Err(e) = self
            .element
            .style()
            .set_property("width", &format!("{available_width}px"))
        {
            web_sys::console::error_1(&e);
        }
        f64::from(self.element.offset_height())
    }
}

/// Reserve the visual height on `container` and shrink `content` to match.
pub fn apply_style(
    container: &HtmlElement,
    content: &HtmlElement,
    layout: &ScaledLayout,
) -> Result<(), JsValue> {
    let style = layout.style();

    let outer = container.style();
    outer.set_property("height", &format!("{}px", style.container_height))?;
    outer.set_property("overflow", "hidden")?;

    let inner = content.style();
    inner.set_property("width", &format!("{}px", style.content_width))?;
    inner.set_property("transform", &style.transform)?;
    inner.set_property("transform-origin", &style.transform_origin)?;
    Ok(())
}
