//! Software renderer - CPU rasterization into an owned packed RGB frame

use super::Renderer;
use crate::graphics::{DepthBuffer, Rgb};
use crate::logging::{log, LogCategory, LogLevel};
use crate::raster::{self, ColorTarget, DepthTarget, Triangle};
use crate::types::Frame;

/// Counters for the frame in progress, reset by `begin_frame`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Triangles handed to `draw_triangle`
    pub submitted: usize,
    /// Triangles refused by validation (only when validation is on)
    pub rejected: usize,
    /// Triangles that wrote no pixel: off screen, degenerate or fully occluded
    pub empty: usize,
    /// Pixels whose colour and depth were written
    pub pixels_written: usize,
}

/// CPU renderer owning a packed RGB [`Frame`] and a [`DepthBuffer`]
pub struct SoftwareRenderer {
    frame: Frame,
    depth: DepthBuffer,
    stats: FrameStats,
    validate: bool,
}

impl SoftwareRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame: Frame::new(width, height),
            depth: DepthBuffer::new(width, height),
            stats: FrameStats::default(),
            validate: false,
        }
    }

    /// Route triangles through the validated entry point
    ///
    /// Rejected triangles are counted in [`FrameStats::rejected`] and skipped.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Hand over the finished frame, leaving a fresh black one behind
    pub fn take_frame(&mut self) -> Frame {
        let blank = Frame::new(self.frame.width, self.frame.height);
        std::mem::replace(&mut self.frame, blank)
    }
}

impl ColorTarget for SoftwareRenderer {
    #[inline]
    fn width(&self) -> usize {
        self.frame.width as usize
    }

    #[inline]
    fn height(&self) -> usize {
        self.frame.height as usize
    }

    #[inline]
    fn put_color(&mut self, x: usize, y: usize, color: Rgb) {
        let offset = (y * self.frame.width as usize + x) * 3;
        self.frame.pixels[offset..offset + 3].copy_from_slice(&[color.r, color.g, color.b]);
    }
}

impl DepthTarget for SoftwareRenderer {
    #[inline]
    fn depth(&self, x: usize, y: usize) -> f32 {
        self.depth.get(x, y)
    }

    #[inline]
    fn put_depth(&mut self, x: usize, y: usize, depth: f32) {
        self.depth.set(x, y, depth);
    }
}

impl Renderer for SoftwareRenderer {
    fn get_frame(&self) -> &Frame {
        &self.frame
    }

    fn depth_buffer(&self) -> &DepthBuffer {
        &self.depth
    }

    fn clear(&mut self, color: Rgb) {
        raster::fill_background(self, color);
    }

    fn clear_depth(&mut self) {
        self.depth.clear();
    }

    fn begin_frame(&mut self, background: Rgb) {
        if self.stats.submitted > 0 {
            let stats = self.stats;
            log(LogCategory::Frame, LogLevel::Debug, || {
                format!(
                    "frame done: {} submitted, {} rejected, {} empty, {} pixels",
                    stats.submitted, stats.rejected, stats.empty, stats.pixels_written
                )
            });
        }
        self.stats = FrameStats::default();
        self.clear(background);
        self.clear_depth();
    }

    fn draw_triangle(&mut self, tri: &Triangle) -> usize {
        self.stats.submitted += 1;
        let written = if self.validate {
            match raster::draw_triangle_checked(self, tri) {
                Ok(written) => written,
                Err(_) => {
                    self.stats.rejected += 1;
                    return 0;
                }
            }
        } else {
            raster::draw_triangle(self, tri)
        };
        if written == 0 {
            self.stats.empty += 1;
        }
        self.stats.pixels_written += written;
        written
    }

    fn reset(&mut self) {
        self.begin_frame(Rgb::BLACK);
    }

    fn name(&self) -> &str {
        "Software Rasterizer"
    }

    fn resize(&mut self, width: u32, height: u32) {
        log(LogCategory::Frame, LogLevel::Info, || {
            format!(
                "resize {}x{} -> {}x{}",
                self.frame.width, self.frame.height, width, height
            )
        });
        self.frame = Frame::new(width, height);
        self.depth.resize(width, height);
        self.stats = FrameStats::default();
    }
}
