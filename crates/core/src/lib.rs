//! Viewport classification and fit-to-width scaling for fixed-width documents.
//!
//! Both components read from an injected [`ViewportSource`], own exactly one
//! registration on it, and release that registration on `dispose()` or drop.

pub mod breakpoint;
pub mod config;
pub mod emitter;
pub mod error;
pub mod manual;
pub mod scale;
pub mod scaled_viewport;
pub mod viewport;

pub use breakpoint::{Breakpoint, BreakpointObserver};
pub use config::FitConfig;
pub use error::ConfigError;
pub use fitview_protocol::{DeviceClass, ScaledLayout};
pub use manual::ManualViewport;
pub use scaled_viewport::{FixedHeight, MeasureContent, ScaledViewport};
pub use viewport::{Subscription, ViewportSource, WidthCallback};
