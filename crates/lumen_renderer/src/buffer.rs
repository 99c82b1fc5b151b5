//! Image sinks receiving rendered pixels.

use std::sync::atomic::{AtomicU32, Ordering};

use image::RgbaImage;

use crate::render::RenderError;
use crate::Color;

/// Destination for pixel colours.
///
/// Writes take `&self` so that workers can fill disjoint pixels
/// concurrently.
pub trait ImageSink: Sync {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Store the colour of pixel `(x, y)`; `y` counts rows from the top.
    fn write_pixel(&self, x: u32, y: u32, color: Color);
}

/// One pixel: the f32 bits of each channel.
#[derive(Default)]
struct Cell([AtomicU32; 3]);

impl Cell {
    fn store(&self, color: Color) {
        for (channel, value) in self.0.iter().zip(color.to_array()) {
            channel.store(value.to_bits(), Ordering::Relaxed);
        }
    }

    fn load(&self) -> Color {
        let [r, g, b] = &self.0;
        Color::new(
            f32::from_bits(r.load(Ordering::Relaxed)),
            f32::from_bits(g.load(Ordering::Relaxed)),
            f32::from_bits(b.load(Ordering::Relaxed)),
        )
    }
}

/// In-memory image buffer, initially black.
pub struct ImageBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Cell>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixels = Vec::new();
        pixels.resize_with(width as usize * height as usize, Cell::default);
        Self {
            width,
            height,
            pixels,
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)].load()
    }

    /// Convert to RGBA bytes, row by row from the top.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for cell in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(cell.load()));
        }
        bytes
    }

    /// Copy into an [`RgbaImage`] ready to be encoded by the caller.
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(color_to_rgba(self.get(x, y)))
        })
    }
}

impl ImageSink for ImageBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn write_pixel(&self, x: u32, y: u32, color: Color) {
        debug_assert!(x < self.width && y < self.height);
        self.pixels[self.index(x, y)].store(color);
    }
}

/// Convert a color to 8-bit RGBA, clamping each channel to [0, 1].
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let c = (color.clamp(Color::ZERO, Color::ONE) * 255.0).round();
    [c.x as u8, c.y as u8, c.z as u8, 255]
}

/// Paint grid lines every `interval` pixels, in both directions.
pub fn draw_grid(sink: &dyn ImageSink, interval: u32, color: Color) -> Result<(), RenderError> {
    if interval == 0 {
        return Err(RenderError::InvalidGridInterval);
    }
    for y in 0..sink.height() {
        for x in 0..sink.width() {
            if x % interval == 0 || y % interval == 0 {
                sink.write_pixel(x, y, color);
            }
        }
    }
    Ok(())
}
