use serde::{Deserialize, Serialize};

use crate::types::{Size, Transform};

/// Geometry of fixed-width content shrunk to fit the viewport.
///
/// `intrinsic` is the content's own layout box (always laid out at the design
/// width); `visual` is what ends up on screen and is the space the container
/// must reserve in page flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaledLayout {
    pub viewport_width: u32,
    pub scale: f64,
    pub intrinsic: Size,
    pub visual: Size,
}

impl ScaledLayout {
    pub fn new(viewport_width: u32, scale: f64, design_width: u32, intrinsic_height: f64) -> Self {
        let intrinsic = Size::new(f64::from(design_width), intrinsic_height);
        Self {
            viewport_width,
            scale,
            intrinsic,
            visual: intrinsic.scaled(scale),
        }
    }

    pub fn visual_height(&self) -> f64 {
        self.visual.h
    }

    pub fn is_scaled(&self) -> bool {
        self.scale < 1.0
    }

    pub fn transform(&self) -> Transform {
        Transform::uniform(self.scale)
    }

    /// Styles for the container/content pair that realise this layout.
    pub fn style(&self) -> BlockStyle {
        let transform = self.transform();
        BlockStyle {
            container_height: self.visual.h,
            content_width: self.intrinsic.w,
            transform: transform.to_css(),
            transform_origin: transform.origin_css().to_string(),
        }
    }
}

/// CSS values a host applies to realise a [`ScaledLayout`].
///
/// The container reserves `container_height` in flow and clips overflow; the
/// content keeps the design width and is shrunk by `transform`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockStyle {
    pub container_height: f64,
    pub content_width: f64,
    pub transform: String,
    pub transform_origin: String,
}

impl BlockStyle {
    pub fn container_css(&self) -> String {
        format!("height: {}px; overflow: hidden;", self.container_height)
    }

    pub fn content_css(&self) -> String {
        format!(
            "width: {}px; transform: {}; transform-origin: {};",
            self.content_width, self.transform, self.transform_origin
        )
    }
}
