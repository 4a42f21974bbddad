//! Owned depth buffer for hidden surface removal
//!
//! Stores one `f32` per pixel where lower values are nearer to the viewer.
//! The rasterizer never clears depth on its own: whoever drives the frame
//! calls [`DepthBuffer::clear`] before the first triangle, otherwise the
//! previous frame's depths keep occluding the new one.
//!
//! # Usage
//!
//! ```
//! use raster_core::graphics::{DepthBuffer, FAR_DEPTH};
//!
//! let mut depth = DepthBuffer::new(320, 240);
//! depth.clear(); // Reset to far plane
//! assert_eq!(depth.read(100, 100), Some(FAR_DEPTH));
//! ```

use crate::buffer::DepthView;

/// Depth of an untouched pixel; any finite depth passes the test against it
pub const FAR_DEPTH: f32 = f32::INFINITY;

/// Row-major depth buffer
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    width: u32,
    height: u32,
    /// Stored in row-major order: index = y * width + x
    buffer: Vec<f32>,
}

impl DepthBuffer {
    /// Create a buffer with every pixel at [`FAR_DEPTH`]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            buffer: vec![FAR_DEPTH; width as usize * height as usize],
        }
    }

    /// Reset every pixel to [`FAR_DEPTH`]
    pub fn clear(&mut self) {
        self.buffer.fill(FAR_DEPTH);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Read the depth at (x, y); `None` outside the buffer
    pub fn read(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.buffer.get(self.index(x as usize, y as usize)).copied()
    }

    /// Raw row-major storage
    pub fn as_slice(&self) -> &[f32] {
        &self.buffer
    }

    #[inline]
    pub(crate) fn index(&self, x: usize, y: usize) -> usize {
        y * self.width as usize + x
    }

    #[inline]
    pub(crate) fn get(&self, x: usize, y: usize) -> f32 {
        self.buffer[self.index(x, y)]
    }

    #[inline]
    pub(crate) fn set(&mut self, x: usize, y: usize, depth: f32) {
        let idx = self.index(x, y);
        self.buffer[idx] = depth;
    }

    /// Borrow as a strided view for use with [`crate::buffer::RenderTarget`]
    pub fn view_mut(&mut self) -> DepthView<'_> {
        let (w, h) = (self.width as usize, self.height as usize);
        match DepthView::packed(&mut self.buffer, w, h) {
            Ok(view) => view,
            // The buffer is always allocated as exactly width * height
            Err(err) => unreachable!("owned depth buffer rejected its own layout: {err}"),
        }
    }

    /// Resize, discarding contents; the new buffer starts at the far plane
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.buffer = vec![FAR_DEPTH; width as usize * height as usize];
    }
}

impl Default for DepthBuffer {
    fn default() -> Self {
        Self::new(320, 240)
    }
}
