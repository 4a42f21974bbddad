//! Error types for the validated entry points
//!
//! The hot rasterization paths never return errors. Everything here is raised
//! either once, when a buffer view is created, or by the checked triangle
//! entry point before any pixel is touched.

use thiserror::Error;

/// Buffer axis, used to report which stride is inconsistent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Channel,
}

/// Problems detected while wrapping caller memory in a strided view
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    #[error("buffer too small: layout addresses {required} elements, buffer holds {actual}")]
    TooSmall { required: usize, actual: usize },
    #[error("zero {0:?} stride would alias distinct pixels")]
    AliasedAxis(Axis),
    #[error("buffer addressing overflows usize for a {width}x{height} grid")]
    Overflow { width: usize, height: usize },
    #[error(
        "color grid is {color_width}x{color_height} but depth grid is {depth_width}x{depth_height}"
    )]
    DimensionMismatch {
        color_width: usize,
        color_height: usize,
        depth_width: usize,
        depth_height: usize,
    },
}

/// Errors reported by [`crate::raster::draw_triangle_checked`]
#[derive(Debug, Error, PartialEq)]
pub enum RasterError {
    #[error("buffer error: {0}")]
    Buffer(#[from] BufferError),
    #[error("vertex {index} has a non-finite component")]
    NonFiniteVertex { index: usize },
    #[error("vertex {index} coordinate {value} is outside the supported range")]
    CoordinateOutOfRange { index: usize, value: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_error_converts_into_raster_error() {
        let err: RasterError = BufferError::AliasedAxis(Axis::Y).into();
        assert_eq!(err, RasterError::Buffer(BufferError::AliasedAxis(Axis::Y)));
        assert_eq!(err.to_string(), "buffer error: zero Y stride would alias distinct pixels");
    }

    #[test]
    fn dimension_mismatch_message() {
        let err = BufferError::DimensionMismatch {
            color_width: 4,
            color_height: 3,
            depth_width: 4,
            depth_height: 2,
        };
        assert_eq!(err.to_string(), "color grid is 4x3 but depth grid is 4x2");
    }
}
