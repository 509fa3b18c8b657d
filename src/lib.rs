pub mod error;
pub mod plugin;

pub mod gpu {
    pub mod bindings;
    pub mod ffi;
    pub mod frame;
    pub mod layout;
    pub mod sprite;
}

pub use error::LayoutError;
pub use plugin::{PointSpriteConfig, PointSpritePlugin};
