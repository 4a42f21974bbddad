//! Frame-driver contract
//!
//! A renderer owns a colour frame and its depth buffer and enforces the
//! per-frame order the rasterizer relies on:
//!
//! ```text
//! begin_frame (background fill + depth clear) -> draw_triangle * N -> get_frame
//! ```
//!
//! Triangles inside one frame may be submitted in any order; the depth test
//! resolves visibility.
//!
//! # Usage
//!
//! ```rust
//! use raster_core::graphics::Rgb;
//! use raster_core::raster::{Triangle, Vertex};
//! use raster_core::renderer::{Renderer, SoftwareRenderer};
//!
//! let mut renderer = SoftwareRenderer::new(64, 48);
//! renderer.begin_frame(Rgb::BLACK);
//! renderer.draw_triangle(&Triangle::new(
//!     Vertex::new(4.0, 4.0, 2.0),
//!     Vertex::new(60.0, 4.0, 2.0),
//!     Vertex::new(4.0, 44.0, 2.0),
//!     Rgb::YELLOW,
//! ));
//! assert_eq!(renderer.get_frame().pixel(10, 10), Some(Rgb::YELLOW));
//! ```

mod software;

pub use software::{FrameStats, SoftwareRenderer};

use crate::graphics::{DepthBuffer, Rgb};
use crate::raster::Triangle;
use crate::types::Frame;

/// Common interface for anything that renders frames of flat triangles
pub trait Renderer: Send {
    /// Get the current framebuffer (read-only)
    fn get_frame(&self) -> &Frame;

    /// Get the depth buffer (read-only)
    fn depth_buffer(&self) -> &DepthBuffer;

    /// Fill the colour buffer with a solid colour; depth is untouched
    fn clear(&mut self, color: Rgb);

    /// Reset every depth to the far plane
    fn clear_depth(&mut self);

    /// Start a new frame: background fill followed by a depth clear
    ///
    /// Skipping this between frames leaves last frame's depths in place and
    /// new geometry behind them is rejected.
    fn begin_frame(&mut self, background: Rgb) {
        self.clear(background);
        self.clear_depth();
    }

    /// Rasterize one triangle, returning the number of pixels written
    fn draw_triangle(&mut self, tri: &Triangle) -> usize;

    /// Rasterize a batch in order, returning the total pixels written
    fn draw_triangles(&mut self, tris: &[Triangle]) -> usize {
        tris.iter().map(|tri| self.draw_triangle(tri)).sum()
    }

    /// Reset to the initial state (black frame, far depth)
    fn reset(&mut self);

    /// Get the name of this renderer (for logs and tools)
    fn name(&self) -> &str;

    /// Recreate the frame and depth buffer at new dimensions
    fn resize(&mut self, width: u32, height: u32);
}
