//! Screen-space triangle description and per-triangle setup
//!
//! Vertex x/y are truncated toward zero before anything else happens. The
//! coverage test runs on those integer positions; only depth interpolation is
//! done in floating point.

use serde::{Deserialize, Serialize};

use crate::error::RasterError;
use crate::graphics::Rgb;

/// Largest |x| or |y| accepted by [`Triangle::validate`]
///
/// Every integer up to 2^24 is exact in f32, and edge values built from
/// coordinates this size stay far inside i64.
pub const MAX_COORDINATE: f32 = 16_777_216.0;

/// Truncated coordinates are clamped to +-2^29 so that every edge product
/// (an edge delta of at most 2^30 times a pixel offset below 2^32) and their
/// difference stays inside i64 for any i32 viewport
const COORDINATE_CLAMP: i32 = 1 << 29;

/// Projected vertex: pixel position plus depth (lower is nearer)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vertex {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<[f32; 3]> for Vertex {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Vertex> for [f32; 3] {
    fn from(v: Vertex) -> Self {
        [v.x, v.y, v.z]
    }
}

/// Three projected vertices filled with one flat colour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
    pub color: Rgb,
}

/// Inclusive pixel box, already clamped to the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BoundingBox {
    /// Number of pixels the box spans (0 when an axis is empty)
    pub fn area(&self) -> usize {
        let w = (self.max_x - self.min_x + 1).max(0) as usize;
        let h = (self.max_y - self.min_y + 1).max(0) as usize;
        w * h
    }

    /// True when the two boxes share at least one pixel
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }
}

impl Triangle {
    #[inline]
    pub const fn new(v1: Vertex, v2: Vertex, v3: Vertex, color: Rgb) -> Self {
        Self {
            vertices: [v1, v2, v3],
            color,
        }
    }

    /// Integer pixel positions (truncation toward zero, not rounding)
    ///
    /// Positions beyond +-2^29 are clamped, which only affects triangles
    /// that [`Triangle::validate`] would reject anyway.
    #[inline]
    fn truncated(&self) -> [(i32, i32); 3] {
        let clamp = |c: f32| (c as i32).clamp(-COORDINATE_CLAMP, COORDINATE_CLAMP);
        self.vertices.map(|v| (clamp(v.x), clamp(v.y)))
    }

    /// Clamped bounding box for a `width` x `height` viewport
    ///
    /// `None` when the box is empty by more than one pixel on an axis, which is
    /// how triangles lying wholly off screen are discarded. A box that is empty
    /// by exactly one pixel is still returned and simply iterates nothing.
    ///
    /// # Example
    ///
    /// ```
    /// use raster_core::graphics::Rgb;
    /// use raster_core::raster::{Triangle, Vertex};
    ///
    /// let tri = Triangle::new(
    ///     Vertex::new(-5.0, 2.9, 1.0),
    ///     Vertex::new(50.0, 2.0, 1.0),
    ///     Vertex::new(3.0, 8.0, 1.0),
    ///     Rgb::RED,
    /// );
    /// let bb = tri.bounds(20, 10).unwrap();
    /// assert_eq!((bb.min_x, bb.min_y, bb.max_x, bb.max_y), (0, 2, 19, 8));
    /// ```
    pub fn bounds(&self, width: i32, height: i32) -> Option<BoundingBox> {
        let [(x1, y1), (x2, y2), (x3, y3)] = self.truncated();
        let bb = BoundingBox {
            min_x: x1.min(x2).min(x3).max(0),
            max_x: x1.max(x2).max(x3).min(width.saturating_sub(1)),
            min_y: y1.min(y2).min(y3).max(0),
            max_y: y1.max(y2).max(y3).min(height.saturating_sub(1)),
        };
        if bb.min_x as i64 > bb.max_x as i64 + 1 || bb.min_y as i64 > bb.max_y as i64 + 1 {
            return None;
        }
        Some(bb)
    }

    /// Precondition check for the validated entry point
    pub fn validate(&self) -> Result<(), RasterError> {
        for (index, v) in self.vertices.iter().enumerate() {
            if !(v.x.is_finite() && v.y.is_finite() && v.z.is_finite()) {
                return Err(RasterError::NonFiniteVertex { index });
            }
            for value in [v.x, v.y] {
                if value.abs() > MAX_COORDINATE {
                    return Err(RasterError::CoordinateOutOfRange { index, value });
                }
            }
        }
        Ok(())
    }

    /// Twice the signed area of the truncated triangle
    pub fn doubled_area(&self) -> i64 {
        EdgeSetup::new(self).area
    }
}

/// One edge function `e(x, y) = dy * (x - ax) - dx * (y - ay)`
#[derive(Debug, Clone, Copy)]
struct Edge {
    dx: i64,
    dy: i64,
    ax: i64,
    ay: i64,
}

impl Edge {
    /// Edge running from `from` to `to`, anchored on `to`
    #[inline]
    fn new(from: (i32, i32), to: (i32, i32)) -> Self {
        Self {
            dx: from.0 as i64 - to.0 as i64,
            dy: from.1 as i64 - to.1 as i64,
            ax: to.0 as i64,
            ay: to.1 as i64,
        }
    }

    #[inline]
    fn eval(&self, x: i64, y: i64) -> i64 {
        self.dy * (x - self.ax) - self.dx * (y - self.ay)
    }
}

/// Per-triangle constants reused for every pixel of the box
#[derive(Debug, Clone, Copy)]
pub(crate) struct EdgeSetup {
    /// p1 -> p2, weights p3
    e12: Edge,
    /// p2 -> p3, weights p1
    e23: Edge,
    /// p3 -> p1, weights p2
    e31: Edge,
    area: i64,
    inv_area: f32,
    z: [f32; 3],
}

impl EdgeSetup {
    #[inline]
    pub(crate) fn new(tri: &Triangle) -> Self {
        let [p1, p2, p3] = tri.truncated();
        let e12 = Edge::new(p1, p2);
        let e23 = Edge::new(p2, p3);
        let e31 = Edge::new(p3, p1);
        // (p3y - p1y)(p2x - p3x) - (p3x - p1x)(p2y - p3y)
        let area = e31.dy * e23.dx - e31.dx * e23.dy;
        Self {
            e12,
            e23,
            e31,
            area,
            inv_area: if area == 0 { 0.0 } else { 1.0 / area as f32 },
            z: tri.vertices.map(|v| v.z),
        }
    }

    #[inline]
    pub(crate) fn is_degenerate(&self) -> bool {
        self.area == 0
    }

    /// Coverage test plus interpolated depth for one pixel
    ///
    /// Covered means all three edge values are strictly positive or all are
    /// non-positive, so either winding fills.
    #[inline]
    pub(crate) fn sample(&self, x: i32, y: i32) -> Option<f32> {
        let (x, y) = (x as i64, y as i64);
        let s1 = self.e12.eval(x, y);
        let s2 = self.e23.eval(x, y);
        let s3 = self.e31.eval(x, y);

        let inside = (s1 > 0 && s2 > 0 && s3 > 0) || (s1 <= 0 && s2 <= 0 && s3 <= 0);
        if !inside {
            return None;
        }
        let [z1, z2, z3] = self.z;
        Some((z1 * s2 as f32 + z2 * s3 as f32 + z3 * s1 as f32) * self.inv_area)
    }
}
