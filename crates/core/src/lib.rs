//! Depth-tested flat-colour triangle rasterizer.
//!
//! Two operations make up the core: [`raster::fill_background`] clears a colour
//! buffer and [`raster::draw_triangle`] fills one screen-space triangle,
//! writing colour and depth only where it is nearer than what is stored.
//! Buffers are owned by the caller and reached through strided views
//! ([`buffer`]), the owned [`renderer::SoftwareRenderer`], or the raw C ABI in
//! [`ffi`].

pub mod buffer;
pub mod error;
pub mod ffi;
pub mod graphics;
pub mod logging;
pub mod raster;
pub mod renderer;

pub use error::{BufferError, RasterError};

pub mod types {
    use serde::{Deserialize, Serialize};

    use crate::buffer::{ColorLayout, ColorView};
    use crate::graphics::Rgb;

    /// Packed RGB frame, three bytes per pixel, rows top to bottom
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Frame {
        pub width: u32,
        pub height: u32,
        pub pixels: Vec<u8>,
    }

    impl Frame {
        /// Black frame
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                pixels: vec![0; width as usize * height as usize * 3],
            }
        }

        /// Colour at (x, y); `None` outside the frame
        pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
            if x >= self.width || y >= self.height {
                return None;
            }
            let offset = (y as usize * self.width as usize + x as usize) * 3;
            let px = self.pixels.get(offset..offset + 3)?;
            Some(Rgb::new(px[0], px[1], px[2]))
        }

        pub fn layout(&self) -> ColorLayout {
            ColorLayout::packed_rgb(self.width as usize)
        }

        /// Borrow as a strided view for use with [`crate::buffer::RenderTarget`]
        pub fn view_mut(&mut self) -> ColorView<'_> {
            let (w, h) = (self.width as usize, self.height as usize);
            match ColorView::packed_rgb(&mut self.pixels, w, h) {
                Ok(view) => view,
                // new() allocates exactly width * height * 3 bytes
                Err(err) => unreachable!("owned frame rejected its own layout: {err}"),
            }
        }
    }
}
