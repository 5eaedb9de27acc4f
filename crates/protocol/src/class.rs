use serde::{Deserialize, Serialize};

/// Viewport classification relative to a breakpoint.
///
/// There are exactly two states; transitions happen only when the viewport
/// width crosses the breakpoint in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Desktop,
    Mobile,
}

impl DeviceClass {
    /// Classify `width` against `breakpoint`: mobile iff `width < breakpoint`.
    pub fn classify(width: u32, breakpoint: u32) -> Self {
        if width < breakpoint {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn is_mobile(self) -> bool {
        self == DeviceClass::Mobile
    }
}
