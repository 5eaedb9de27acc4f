use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    /// Uniformly scale both dimensions.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            w: self.w * factor,
            h: self.h * factor,
        }
    }
}

/// A purely visual uniform scale anchored at the top-left corner.
///
/// Applying it never changes the layout box of the transformed element, only
/// where its pixels land.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale: f64,
}

impl Transform {
    pub fn uniform(scale: f64) -> Self {
        Self { scale }
    }

    /// CSS `transform` value, e.g. `scale(0.475)`.
    pub fn to_css(&self) -> String {
        format!("scale({})", self.scale)
    }

    /// CSS `transform-origin` value.
    pub fn origin_css(&self) -> &'static str {
        "top left"
    }
}
