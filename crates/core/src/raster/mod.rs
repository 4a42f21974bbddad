//! Background fill and depth-tested triangle rasterization
//!
//! Both operations write through the [`ColorTarget`] / [`DepthTarget`] traits,
//! so the same loops serve bounds-checked views ([`crate::buffer`]), owned
//! frames ([`crate::renderer::SoftwareRenderer`]) and raw foreign memory
//! ([`crate::ffi`]).
//!
//! # Architecture
//!
//! ```text
//! frame driver -> fill_background / draw_triangle -> {ColorTarget, DepthTarget} impls
//! ```
//!
//! The depth test is a strict less-than, so for pixels where the submitted
//! triangles have distinct depths the final image does not depend on
//! submission order.

pub mod triangle;

pub use triangle::{BoundingBox, Triangle, Vertex, MAX_COORDINATE};

use crate::buffer::{ColorLayout, ColorView, DepthView, RenderTarget};
use crate::error::RasterError;
use crate::graphics::Rgb;
use crate::logging::{log, LogCategory, LogLevel};
use triangle::EdgeSetup;

/// Something the background fill can write colours into
pub trait ColorTarget {
    /// Viewport width in pixels
    fn width(&self) -> usize;

    /// Viewport height in pixels
    fn height(&self) -> usize;

    /// Write all three channels of pixel (x, y)
    ///
    /// Callers only pass coordinates inside the viewport.
    fn put_color(&mut self, x: usize, y: usize, color: Rgb);
}

/// A colour target with a parallel depth grid
pub trait DepthTarget: ColorTarget {
    /// Stored depth at (x, y)
    fn depth(&self, x: usize, y: usize) -> f32;

    /// Overwrite the stored depth at (x, y)
    fn put_depth(&mut self, x: usize, y: usize, depth: f32);
}

/// Viewport extent as the signed values the box clamp works in
#[inline]
fn viewport<T: ColorTarget + ?Sized>(target: &T) -> (i32, i32) {
    let clamp = |v: usize| i32::try_from(v).unwrap_or(i32::MAX);
    (clamp(target.width()), clamp(target.height()))
}

/// Overwrite every pixel of the viewport with `color`
///
/// Depth is not touched.
///
/// # Example
///
/// ```
/// use raster_core::buffer::ColorView;
/// use raster_core::graphics::Rgb;
/// use raster_core::raster::fill_background;
///
/// let mut pixels = vec![0u8; 4 * 3 * 3];
/// let mut view = ColorView::packed_rgb(&mut pixels, 4, 3).unwrap();
/// fill_background(&mut view, Rgb::CYAN);
/// assert_eq!(view.get(3, 2), Some(Rgb::CYAN));
/// ```
pub fn fill_background<T: ColorTarget + ?Sized>(target: &mut T, color: Rgb) {
    let (width, height) = (target.width(), target.height());
    for y in 0..height {
        for x in 0..width {
            target.put_color(x, y, color);
        }
    }
}

/// Rasterize one flat-coloured triangle with depth testing
///
/// Returns the number of pixels whose colour and depth were written. Wholly
/// off-screen and zero-area triangles return 0 without touching the target.
///
/// Vertex coordinates are truncated toward zero. A pixel is covered when its
/// three edge values are all positive or all non-positive, and it is written
/// only when the interpolated depth is strictly less than the stored one.
///
/// This is the unvalidated hot path: NaN or enormous coordinates are the
/// caller's problem. Use [`draw_triangle_checked`] to reject them instead.
pub fn draw_triangle<T: DepthTarget + ?Sized>(target: &mut T, tri: &Triangle) -> usize {
    let (width, height) = viewport(target);
    let Some(bb) = tri.bounds(width, height) else {
        return 0;
    };
    let setup = EdgeSetup::new(tri);
    if setup.is_degenerate() {
        return 0;
    }

    let mut written = 0;
    for y in bb.min_y..=bb.max_y {
        for x in bb.min_x..=bb.max_x {
            let Some(depth) = setup.sample(x, y) else {
                continue;
            };
            let (px, py) = (x as usize, y as usize);
            if depth < target.depth(px, py) {
                target.put_color(px, py, tri.color);
                target.put_depth(px, py, depth);
                written += 1;
            }
        }
    }
    written
}

/// Validated entry point: rejects non-finite or out-of-range vertices
///
/// Once validated the triangle goes through [`draw_triangle`] unchanged, so
/// pixel output is identical to the hot path.
pub fn draw_triangle_checked<T: DepthTarget + ?Sized>(
    target: &mut T,
    tri: &Triangle,
) -> Result<usize, RasterError> {
    if let Err(err) = tri.validate() {
        log(LogCategory::Raster, LogLevel::Debug, || {
            format!("rejected triangle {:?}: {}", tri.vertices, err)
        });
        return Err(err);
    }
    let written = draw_triangle(target, tri);
    if written == 0 {
        log(LogCategory::Raster, LogLevel::Trace, || {
            format!(
                "triangle {:?} wrote no pixels (doubled area {})",
                tri.vertices,
                tri.doubled_area()
            )
        });
    }
    Ok(written)
}

/// Validated batch entry over plain slices
///
/// Wraps `pixels` with `layout` and `depth` as a packed row-major grid, then
/// checks every triangle before drawing any of them. A bad buffer comes back
/// as [`RasterError::Buffer`]; on any error nothing has been written.
///
/// # Example
///
/// ```
/// use raster_core::buffer::ColorLayout;
/// use raster_core::graphics::{Rgb, FAR_DEPTH};
/// use raster_core::raster::{draw_triangles_checked, Triangle, Vertex};
///
/// let mut pixels = vec![0u8; 8 * 8 * 3];
/// let mut depth = vec![FAR_DEPTH; 8 * 8];
/// let tri = Triangle::new(
///     Vertex::new(0.0, 0.0, 1.0),
///     Vertex::new(8.0, 0.0, 1.0),
///     Vertex::new(0.0, 8.0, 1.0),
///     Rgb::RED,
/// );
/// let layout = ColorLayout::packed_rgb(8);
/// let written = draw_triangles_checked(&mut pixels, layout, &mut depth, 8, 8, &[tri]).unwrap();
/// assert!(written > 0);
/// ```
pub fn draw_triangles_checked(
    pixels: &mut [u8],
    layout: ColorLayout,
    depth: &mut [f32],
    width: usize,
    height: usize,
    tris: &[Triangle],
) -> Result<usize, RasterError> {
    let color = ColorView::new(pixels, width, height, layout)?;
    let depth = DepthView::packed(depth, width, height)?;
    let mut target = RenderTarget::new(color, depth)?;

    for (i, tri) in tris.iter().enumerate() {
        if let Err(err) = tri.validate() {
            log(LogCategory::Raster, LogLevel::Debug, || {
                format!("batch of {} rejected at triangle {}: {}", tris.len(), i, err)
            });
            return Err(err);
        }
    }
    Ok(tris.iter().map(|tri| draw_triangle(&mut target, tri)).sum())
}
