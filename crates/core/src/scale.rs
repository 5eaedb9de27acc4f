//! Pure fit-to-width geometry.

use fitview_protocol::ScaledLayout;
use tracing::warn;

use crate::config::FitConfig;

/// Uniform shrink factor for showing `config.design_width` content in a
/// viewport `viewport_width` pixels wide.
///
/// Returns exactly `1.0` once the viewport fits the design width plus padding
/// (the boundary counts as fitting). Never magnifies, and never drops below
/// `config.min_scale`.
pub fn scale_factor(viewport_width: u32, config: &FitConfig) -> f64 {
    if viewport_width >= config.fit_width() {
        return 1.0;
    }
    let available = viewport_width.saturating_sub(config.screen_padding);
    let raw = f64::from(available) / f64::from(config.design_width);
    // A zero design width yields NaN here; it falls to the floor too.
    if raw.is_nan() || raw < config.min_scale {
        warn!(
            viewport_width,
            screen_padding = config.screen_padding,
            min_scale = config.min_scale,
            "viewport narrower than padding, clamping scale"
        );
        return config.min_scale;
    }
    raw
}

/// Replace negative or non-finite measurements with zero.
pub fn sanitize_height(height: f64) -> f64 {
    if height.is_finite() && height > 0.0 {
        height
    } else {
        0.0
    }
}

/// Height the scaled content occupies in page flow.
pub fn visual_height(intrinsic_height: f64, scale: f64) -> f64 {
    sanitize_height(intrinsic_height) * scale
}

/// Full layout for content measured at the design width.
pub fn compute_layout(viewport_width: u32, intrinsic_height: f64, config: &FitConfig) -> ScaledLayout {
    ScaledLayout::new(
        viewport_width,
        scale_factor(viewport_width, config),
        config.design_width,
        sanitize_height(intrinsic_height),
    )
}
