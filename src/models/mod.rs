pub mod aspect;
pub mod image;
pub mod style;
pub mod wire;

pub use aspect::*;
pub use image::*;
pub use style::*;
pub use wire::*;
