pub mod class;
pub mod layout;
pub mod types;

pub use class::DeviceClass;
pub use layout::{BlockStyle, ScaledLayout};
pub use types::{Size, Transform};
