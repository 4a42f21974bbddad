//! Colour and depth primitives shared by the rasterizer and frame drivers

pub mod color;
pub mod zbuffer;

pub use color::Rgb;
pub use zbuffer::{DepthBuffer, FAR_DEPTH};
