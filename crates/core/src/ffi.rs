//! Raw C-ABI entry points for foreign frame drivers
//!
//! These take bare pointers plus stride metadata, exactly like the boundary
//! a display surface owned by another runtime exposes. No size information is
//! available, so nothing is validated beyond a null check: the caller
//! guarantees that every pixel of the `width` x `height` grid is addressable
//! under the given strides for the duration of the call.
//!
//! Colour strides are in bytes. Depth strides are in bytes as well; the
//! summed byte offset is divided by `size_of::<f32>()` to get the element.
//! Negative strides are allowed (for example bottom-up rows), with `buffer`
//! pointing at pixel (0, 0).

use std::os::raw::c_int;

use crate::graphics::Rgb;
use crate::logging::{log, LogCategory, LogLevel};
use crate::raster::{self, ColorTarget, DepthTarget, Triangle, Vertex};

const DEPTH_BYTES: isize = std::mem::size_of::<f32>() as isize;

struct RawColor {
    base: *mut u8,
    stride_x: isize,
    stride_y: isize,
    channel_stride: isize,
    width: usize,
    height: usize,
}

impl RawColor {
    /// # Safety
    ///
    /// `base` must be valid for writes at every channel of every pixel of the
    /// grid under the given strides.
    unsafe fn new(
        base: *mut u8,
        stride_x: c_int,
        stride_y: c_int,
        channel_stride: c_int,
        width: c_int,
        height: c_int,
    ) -> Self {
        Self {
            base,
            stride_x: stride_x as isize,
            stride_y: stride_y as isize,
            channel_stride: channel_stride as isize,
            width: width.max(0) as usize,
            height: height.max(0) as usize,
        }
    }
}

impl ColorTarget for RawColor {
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
        let offset = x as isize * self.stride_x + y as isize * self.stride_y;
        let c = self.channel_stride;
        // SAFETY: (x, y) is inside the grid and `new`'s contract covers it.
        unsafe {
            let px = self.base.offset(offset);
            *px = color.r;
            *px.offset(c) = color.g;
            *px.offset(2 * c) = color.b;
        }
    }
}

struct RawTarget {
    color: RawColor,
    depth: *mut f32,
    depth_stride_x: isize,
    depth_stride_y: isize,
}

impl RawTarget {
    #[inline]
    fn depth_index(&self, x: usize, y: usize) -> isize {
        (x as isize * self.depth_stride_x + y as isize * self.depth_stride_y) / DEPTH_BYTES
    }
}

impl ColorTarget for RawTarget {
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

impl DepthTarget for RawTarget {
    #[inline]
    fn depth(&self, x: usize, y: usize) -> f32 {
        // SAFETY: the depth grid is addressable per the entry point contract.
        unsafe { *self.depth.offset(self.depth_index(x, y)) }
    }

    #[inline]
    fn put_depth(&mut self, x: usize, y: usize, depth: f32) {
        // SAFETY: as above.
        unsafe { *self.depth.offset(self.depth_index(x, y)) = depth }
    }
}

/// Fill every pixel of a `width` x `height` colour buffer with (r, g, b)
///
/// # Safety
///
/// `buffer` must be null or valid for writes at
/// `x * stride_x + y * stride_y + k * channel_stride` for every pixel and
/// `k` in 0..3.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn fill_background(
    buffer: *mut u8,
    stride_x: c_int,
    stride_y: c_int,
    channel_stride: c_int,
    r: u8,
    g: u8,
    b: u8,
    width: c_int,
    height: c_int,
) {
    if buffer.is_null() {
        log(LogCategory::Ffi, LogLevel::Error, || {
            "fill_background called with a null colour buffer".to_string()
        });
        return;
    }
    let mut target = RawColor::new(buffer, stride_x, stride_y, channel_stride, width, height);
    raster::fill_background(&mut target, Rgb::new(r, g, b));
}

/// Rasterize one flat-coloured triangle with depth testing
///
/// Vertex x/y are pixel coordinates (truncated toward zero), z is depth with
/// lower values nearer.
///
/// # Safety
///
/// `buffer` must satisfy the contract of [`fill_background`], and
/// `depth_buffer` must be null or valid for reads and writes of an `f32` at
/// byte offset `x * depth_stride_x + y * depth_stride_y` (rounded down to a
/// whole element) for every pixel of the grid.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn draw_triangle(
    buffer: *mut u8,
    stride_x: c_int,
    stride_y: c_int,
    channel_stride: c_int,
    depth_buffer: *mut f32,
    depth_stride_x: c_int,
    depth_stride_y: c_int,
    p1x: f32,
    p1y: f32,
    p1z: f32,
    p2x: f32,
    p2y: f32,
    p2z: f32,
    p3x: f32,
    p3y: f32,
    p3z: f32,
    r: u8,
    g: u8,
    b: u8,
    width: c_int,
    height: c_int,
) {
    if buffer.is_null() || depth_buffer.is_null() {
        log(LogCategory::Ffi, LogLevel::Error, || {
            format!(
                "draw_triangle called with a null buffer (color null: {}, depth null: {})",
                buffer.is_null(),
                depth_buffer.is_null()
            )
        });
        return;
    }
    let mut target = RawTarget {
        color: RawColor::new(buffer, stride_x, stride_y, channel_stride, width, height),
        depth: depth_buffer,
        depth_stride_x: depth_stride_x as isize,
        depth_stride_y: depth_stride_y as isize,
    };
    let tri = Triangle::new(
        Vertex::new(p1x, p1y, p1z),
        Vertex::new(p2x, p2y, p2z),
        Vertex::new(p3x, p3y, p3z),
        Rgb::new(r, g, b),
    );
    raster::draw_triangle(&mut target, &tri);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{ColorView, DepthView, RenderTarget};
    use crate::graphics::FAR_DEPTH;

    const W: usize = 12;
    const H: usize = 9;

    #[test]
    fn test_fill_background_packed() {
        let mut pixels = vec![0u8; W * H * 3];
        unsafe {
            let row = (W * 3) as c_int;
            fill_background(pixels.as_mut_ptr(), 3, row, 1, 9, 8, 7, W as c_int, H as c_int);
        }
        assert!(pixels.chunks(3).all(|px| px == [9, 8, 7]));
    }

    #[test]
    fn test_fill_background_bottom_up_rows() {
        // Base pointer at the last row, negative row stride
        let mut pixels = vec![0u8; W * H * 3];
        let row = (W * 3) as c_int;
        unsafe {
            let base = pixels.as_mut_ptr().add((H - 1) * W * 3);
            fill_background(base, 3, -row, 1, 1, 2, 3, W as c_int, 2);
        }
        // Only the two bottom rows were written
        let bottom = &pixels[(H - 2) * W * 3..];
        assert!(bottom.chunks(3).all(|px| px == [1, 2, 3]));
        assert!(pixels[..(H - 2) * W * 3].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_null_buffers_are_ignored() {
        let mut depth = vec![FAR_DEPTH; W * H];
        unsafe {
            fill_background(std::ptr::null_mut(), 3, 36, 1, 0, 0, 0, W as c_int, H as c_int);
            draw_triangle(
                std::ptr::null_mut(),
                3,
                36,
                1,
                depth.as_mut_ptr(),
                4,
                48,
                0.0,
                0.0,
                1.0,
                10.0,
                0.0,
                1.0,
                0.0,
                8.0,
                1.0,
                255,
                0,
                0,
                W as c_int,
                H as c_int,
            );
        }
        assert!(depth.iter().all(|&d| d == FAR_DEPTH));
    }

    #[test]
    fn test_draw_triangle_matches_safe_path() {
        let verts = [(1.7, 0.4, 3.0), (11.2, 2.9, 1.0), (3.3, 8.8, 2.0)];
        let color = Rgb::new(200, 100, 50);

        // Raw path: packed RGB, depth strides in bytes
        let mut raw_pixels = vec![0u8; W * H * 3];
        let mut raw_depth = vec![FAR_DEPTH; W * H];
        unsafe {
            draw_triangle(
                raw_pixels.as_mut_ptr(),
                3,
                (W * 3) as c_int,
                1,
                raw_depth.as_mut_ptr(),
                DEPTH_BYTES as c_int,
                (W as isize * DEPTH_BYTES) as c_int,
                verts[0].0,
                verts[0].1,
                verts[0].2,
                verts[1].0,
                verts[1].1,
                verts[1].2,
                verts[2].0,
                verts[2].1,
                verts[2].2,
                color.r,
                color.g,
                color.b,
                W as c_int,
                H as c_int,
            );
        }

        // Safe path over identical buffers
        let mut safe_pixels = vec![0u8; W * H * 3];
        let mut safe_depth = vec![FAR_DEPTH; W * H];
        {
            let mut target = RenderTarget::new(
                ColorView::packed_rgb(&mut safe_pixels, W, H).unwrap(),
                DepthView::packed(&mut safe_depth, W, H).unwrap(),
            )
            .unwrap();
            let tri = Triangle::new(
                Vertex::new(verts[0].0, verts[0].1, verts[0].2),
                Vertex::new(verts[1].0, verts[1].1, verts[1].2),
                Vertex::new(verts[2].0, verts[2].1, verts[2].2),
                color,
            );
            assert!(raster::draw_triangle(&mut target, &tri) > 0);
        }

        assert_eq!(raw_pixels, safe_pixels);
        assert_eq!(raw_depth, safe_depth);
    }

    /// Reference render through the safe path: packed colour and depth
    fn safe_render(tri: &Triangle) -> (Vec<u8>, Vec<f32>) {
        let mut pixels = vec![0u8; W * H * 3];
        let mut depth = vec![FAR_DEPTH; W * H];
        {
            let mut target = RenderTarget::new(
                ColorView::packed_rgb(&mut pixels, W, H).unwrap(),
                DepthView::packed(&mut depth, W, H).unwrap(),
            )
            .unwrap();
            raster::draw_triangle(&mut target, tri);
        }
        (pixels, depth)
    }

    unsafe fn raw_draw(
        buffer: *mut u8,
        stride_y: c_int,
        depth: *mut f32,
        depth_stride_y: c_int,
        tri: &Triangle,
    ) {
        let [a, b, c] = tri.vertices;
        let color = tri.color;
        draw_triangle(
            buffer,
            3,
            stride_y,
            1,
            depth,
            DEPTH_BYTES as c_int,
            depth_stride_y,
            a.x,
            a.y,
            a.z,
            b.x,
            b.y,
            b.z,
            c.x,
            c.y,
            c.z,
            color.r,
            color.g,
            color.b,
            W as c_int,
            H as c_int,
        );
    }

    fn sample_triangle() -> Triangle {
        Triangle::new(
            Vertex::new(0.5, 1.2, 1.0),
            Vertex::new(11.9, 0.0, 4.0),
            Vertex::new(2.0, 8.7, 2.0),
            Rgb::new(10, 20, 30),
        )
    }

    #[test]
    fn test_draw_triangle_padded_depth_rows_and_bottom_up_color() {
        let tri = sample_triangle();
        let (safe_pixels, safe_depth) = safe_render(&tri);

        // Depth rows are 6 bytes longer than the pixels they hold, so the
        // summed byte offset is not a multiple of 4 on odd rows
        let depth_row = (W * 4 + 6) as c_int;
        let depth_index = |x: usize, y: usize| (x * 4 + y * (W * 4 + 6)) / 4;
        let mut raw_depth = vec![FAR_DEPTH; W * H + 2 * H];

        let row = W * 3;
        let mut raw_pixels = vec![0u8; W * H * 3];
        unsafe {
            let last_row = raw_pixels.as_mut_ptr().add((H - 1) * row);
            raw_draw(last_row, -(row as c_int), raw_depth.as_mut_ptr(), depth_row, &tri);
        }

        let mut written = Vec::new();
        for y in 0..H {
            for x in 0..W {
                let flipped = (H - 1 - y) * row + x * 3;
                let packed = y * row + x * 3;
                assert_eq!(
                    raw_pixels[flipped..flipped + 3],
                    safe_pixels[packed..packed + 3],
                    "colour at ({x}, {y})"
                );
                assert_eq!(raw_depth[depth_index(x, y)], safe_depth[y * W + x]);
                if safe_depth[y * W + x] != FAR_DEPTH {
                    written.push(depth_index(x, y));
                }
            }
        }

        // Nothing outside the addressed elements was touched
        let touched: Vec<usize> = (0..raw_depth.len())
            .filter(|&i| raw_depth[i] != FAR_DEPTH)
            .collect();
        assert!(!touched.is_empty());
        assert_eq!(touched, written);
        // Row 1 starts at byte 4W + 6, which rounds down to element W + 1
        assert_eq!(depth_index(0, 1), W + 1);
    }

    #[test]
    fn test_draw_triangle_bottom_up_depth() {
        let tri = sample_triangle();
        let (safe_pixels, safe_depth) = safe_render(&tri);

        let mut raw_pixels = vec![0u8; W * H * 3];
        let mut raw_depth = vec![FAR_DEPTH; W * H];
        unsafe {
            let last_row = raw_depth.as_mut_ptr().add((H - 1) * W);
            raw_draw(
                raw_pixels.as_mut_ptr(),
                (W * 3) as c_int,
                last_row,
                -((W as isize * DEPTH_BYTES) as c_int),
                &tri,
            );
        }

        assert_eq!(raw_pixels, safe_pixels);
        for y in 0..H {
            assert_eq!(
                raw_depth[(H - 1 - y) * W..(H - y) * W],
                safe_depth[y * W..(y + 1) * W],
                "depth row {y}"
            );
        }
    }
}
