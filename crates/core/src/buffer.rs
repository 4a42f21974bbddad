//! Strided views over caller-owned colour and depth memory
//!
//! A view carries its width, height and strides and checks them exactly once,
//! when it is created. After that every write the rasterizer makes is known to
//! land inside the slice, so the per-call contract is just "pass a view".
//!
//! Colour strides are in bytes; depth strides are in `f32` elements.
//!
//! ```
//! use raster_core::buffer::{ColorLayout, ColorView, DepthView, RenderTarget};
//! use raster_core::graphics::{Rgb, FAR_DEPTH};
//! use raster_core::raster::{draw_triangle, Triangle, Vertex};
//!
//! // 8x8 RGBA surface with 4 bytes of padding per row
//! let layout = ColorLayout::padded(4, 8 * 4 + 4);
//! let mut pixels = vec![0u8; 8 * (8 * 4 + 4)];
//! let mut depth = vec![FAR_DEPTH; 64];
//!
//! let color = ColorView::new(&mut pixels, 8, 8, layout).unwrap();
//! let depth = DepthView::packed(&mut depth, 8, 8).unwrap();
//! let mut target = RenderTarget::new(color, depth).unwrap();
//!
//! let tri = Triangle::new(
//!     Vertex::new(0.0, 0.0, 0.5),
//!     Vertex::new(8.0, 0.0, 0.5),
//!     Vertex::new(0.0, 8.0, 0.5),
//!     Rgb::GREEN,
//! );
//! assert!(draw_triangle(&mut target, &tri) > 0);
//! assert_eq!(target.color().get(1, 1), Some(Rgb::GREEN));
//! ```

use crate::error::{Axis, BufferError};
use crate::graphics::Rgb;
use crate::logging::{log, LogCategory, LogLevel};
use crate::raster::{ColorTarget, DepthTarget};

/// Byte addressing of an interleaved three-channel colour buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorLayout {
    /// Bytes to advance one pixel in x
    pub stride_x: usize,
    /// Bytes to advance one row in y
    pub stride_y: usize,
    /// Bytes between the R, G and B channels of one pixel
    pub channel_stride: usize,
}

impl ColorLayout {
    /// Tightly packed RGB rows
    pub const fn packed_rgb(width: usize) -> Self {
        Self {
            stride_x: 3,
            stride_y: 3 * width,
            channel_stride: 1,
        }
    }

    /// Tightly packed RGBA rows; the fourth byte is never written
    pub const fn packed_rgba(width: usize) -> Self {
        Self {
            stride_x: 4,
            stride_y: 4 * width,
            channel_stride: 1,
        }
    }

    /// Surfaces whose rows are longer than `width * bytes_per_pixel`
    pub const fn padded(bytes_per_pixel: usize, row_bytes: usize) -> Self {
        Self {
            stride_x: bytes_per_pixel,
            stride_y: row_bytes,
            channel_stride: 1,
        }
    }

    /// Byte offset of the first channel of pixel (x, y)
    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> usize {
        x * self.stride_x + y * self.stride_y
    }

    /// Bytes a `width` x `height` grid needs under this layout
    fn required_len(&self, width: usize, height: usize) -> Result<usize, BufferError> {
        if width == 0 || height == 0 {
            return Ok(0);
        }
        check_axis(Axis::X, width, self.stride_x)?;
        check_axis(Axis::Y, height, self.stride_y)?;
        if self.channel_stride == 0 {
            return Err(BufferError::AliasedAxis(Axis::Channel));
        }
        let overflow = BufferError::Overflow { width, height };
        (width - 1)
            .checked_mul(self.stride_x)
            .and_then(|x| x.checked_add((height - 1).checked_mul(self.stride_y)?))
            .and_then(|last| last.checked_add(self.channel_stride.checked_mul(2)?))
            .and_then(|last| last.checked_add(1))
            .ok_or(overflow)
    }
}

fn check_axis(axis: Axis, extent: usize, stride: usize) -> Result<(), BufferError> {
    if extent > 1 && stride == 0 {
        Err(BufferError::AliasedAxis(axis))
    } else {
        Ok(())
    }
}

fn check_len(required: usize, actual: usize) -> Result<(), BufferError> {
    if actual < required {
        log(LogCategory::Buffer, LogLevel::Warn, || {
            format!("view needs {required} elements but the buffer holds {actual}")
        });
        return Err(BufferError::TooSmall { required, actual });
    }
    Ok(())
}

/// Mutable strided view over an interleaved RGB byte buffer
#[derive(Debug)]
pub struct ColorView<'a> {
    data: &'a mut [u8],
    width: usize,
    height: usize,
    layout: ColorLayout,
}

impl<'a> ColorView<'a> {
    /// Wrap `data`, checking that every addressed byte is inside it
    pub fn new(
        data: &'a mut [u8],
        width: usize,
        height: usize,
        layout: ColorLayout,
    ) -> Result<Self, BufferError> {
        let required = layout.required_len(width, height)?;
        check_len(required, data.len())?;
        log(LogCategory::Buffer, LogLevel::Trace, || {
            format!("color view {width}x{height} {layout:?} over {} bytes", data.len())
        });
        Ok(Self {
            data,
            width,
            height,
            layout,
        })
    }

    pub fn packed_rgb(
        data: &'a mut [u8],
        width: usize,
        height: usize,
    ) -> Result<Self, BufferError> {
        Self::new(data, width, height, ColorLayout::packed_rgb(width))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn layout(&self) -> ColorLayout {
        self.layout
    }

    /// Read back pixel (x, y); `None` outside the grid
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = self.layout.offset(x, y);
        let c = self.layout.channel_stride;
        Some(Rgb::new(
            self.data[offset],
            self.data[offset + c],
            self.data[offset + 2 * c],
        ))
    }
}

impl ColorTarget for ColorView<'_> {
    #[inline]
    fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn put_color(&mut self, x: usize, y: usize, color: Rgb) {
        let offset = self.layout.offset(x, y);
        let c = self.layout.channel_stride;
        self.data[offset] = color.r;
        self.data[offset + c] = color.g;
        self.data[offset + 2 * c] = color.b;
    }
}

/// Mutable strided view over a depth buffer
#[derive(Debug)]
pub struct DepthView<'a> {
    data: &'a mut [f32],
    width: usize,
    height: usize,
    stride_x: usize,
    stride_y: usize,
}

impl<'a> DepthView<'a> {
    /// Wrap `data` with strides counted in `f32` elements
    pub fn new(
        data: &'a mut [f32],
        width: usize,
        height: usize,
        stride_x: usize,
        stride_y: usize,
    ) -> Result<Self, BufferError> {
        let required = if width == 0 || height == 0 {
            0
        } else {
            check_axis(Axis::X, width, stride_x)?;
            check_axis(Axis::Y, height, stride_y)?;
            (width - 1)
                .checked_mul(stride_x)
                .and_then(|x| x.checked_add((height - 1).checked_mul(stride_y)?))
                .and_then(|last| last.checked_add(1))
                .ok_or(BufferError::Overflow { width, height })?
        };
        check_len(required, data.len())?;
        Ok(Self {
            data,
            width,
            height,
            stride_x,
            stride_y,
        })
    }

    /// Row-major, one element per pixel
    pub fn packed(data: &'a mut [f32], width: usize, height: usize) -> Result<Self, BufferError> {
        Self::new(data, width, height, 1, width)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        x * self.stride_x + y * self.stride_y
    }

    /// Read back the depth at (x, y); `None` outside the grid
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[self.index(x, y)])
    }

    /// Set every addressed element to `depth`
    pub fn fill(&mut self, depth: f32) {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = self.index(x, y);
                self.data[idx] = depth;
            }
        }
    }
}

/// Colour and depth views sharing one pixel grid
#[derive(Debug)]
pub struct RenderTarget<'a> {
    color: ColorView<'a>,
    depth: DepthView<'a>,
}

impl<'a> RenderTarget<'a> {
    /// Pair two views; their grids must have the same dimensions
    pub fn new(color: ColorView<'a>, depth: DepthView<'a>) -> Result<Self, BufferError> {
        if color.width != depth.width || color.height != depth.height {
            let err = BufferError::DimensionMismatch {
                color_width: color.width,
                color_height: color.height,
                depth_width: depth.width,
                depth_height: depth.height,
            };
            log(LogCategory::Buffer, LogLevel::Warn, || err.to_string());
            return Err(err);
        }
        Ok(Self { color, depth })
    }

    pub fn color(&self) -> &ColorView<'a> {
        &self.color
    }

    pub fn depth(&self) -> &DepthView<'a> {
        &self.depth
    }

    pub fn depth_mut(&mut self) -> &mut DepthView<'a> {
        &mut self.depth
    }

    pub fn into_parts(self) -> (ColorView<'a>, DepthView<'a>) {
        (self.color, self.depth)
    }
}

impl ColorTarget for RenderTarget<'_> {
    #[inline]
    fn width(&self) -> usize {
        self.color.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.color.height
    }

    #[inline]
    fn put_color(&mut self, x: usize, y: usize, color: Rgb) {
        self.color.put_color(x, y, color);
    }
}

impl DepthTarget for RenderTarget<'_> {
    #[inline]
    fn depth(&self, x: usize, y: usize) -> f32 {
        self.depth.data[self.depth.index(x, y)]
    }

    #[inline]
    fn put_depth(&mut self, x: usize, y: usize, depth: f32) {
        let idx = self.depth.index(x, y);
        self.depth.data[idx] = depth;
    }
}
