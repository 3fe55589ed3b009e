//! Full-screen picture rendering with half-block cells.
//!
//! Each terminal cell shows two vertically stacked pixels: the upper one as
//! the foreground of `▀`, the lower one as the background. The decoded image
//! is kept once and rescaled only when the drawing area changes size.

use crate::image_store::ImageStore;
use anyhow::Result;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;

const UPPER_HALF_BLOCK: &str = "\u{2580}";

/// Fit `image` inside `area` (two pixel rows per cell), keeping aspect ratio.
pub fn scale_to_area(image: &DynamicImage, area: Rect) -> RgbImage {
    let width = u32::from(area.width.max(1));
    let height = u32::from(area.height.max(1)) * 2;
    image.resize(width, height, FilterType::Triangle).to_rgb8()
}

/// Widget drawing already scaled pixels centered in its area.
pub struct HalfBlockImage<'a> {
    pixels: &'a RgbImage,
    background: Color,
}

impl<'a> HalfBlockImage<'a> {
    pub fn new(pixels: &'a RgbImage) -> Self {
        Self {
            pixels,
            background: Color::Black,
        }
    }

    pub fn background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }
}

impl Widget for HalfBlockImage<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (width, height) = self.pixels.dimensions();
        let cols = (width as u16).min(area.width);
        let rows = (height.div_ceil(2) as u16).min(area.height);
        let left = area.x + (area.width - cols) / 2;
        let top = area.y + (area.height - rows) / 2;

        for row in 0..rows {
            for col in 0..cols {
                let x = u32::from(col);
                let upper = self.pixels.get_pixel(x, u32::from(row) * 2);
                let lower_y = u32::from(row) * 2 + 1;
                let lower = if lower_y < height {
                    let p = self.pixels.get_pixel(x, lower_y);
                    Color::Rgb(p[0], p[1], p[2])
                } else {
                    self.background
                };
                if let Some(cell) = buf.cell_mut((left + col, top + row)) {
                    cell.set_symbol(UPPER_HALF_BLOCK)
                        .set_fg(Color::Rgb(upper[0], upper[1], upper[2]))
                        .set_bg(lower);
                }
            }
        }
    }
}

/// The decoded current image plus its scaled rendition.
#[derive(Debug, Default)]
pub struct PictureView {
    image: Option<DynamicImage>,
    scaled: Option<(Rect, RgbImage)>,
}

impl PictureView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the store's image, replacing whatever was loaded.
    pub fn load(&mut self, store: &ImageStore) -> Result<()> {
        self.scaled = None;
        self.image = None;
        self.image = Some(store.load()?);
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }

    /// Pixels scaled for `area`, recomputed only when the size changes.
    pub fn pixels_for(&mut self, area: Rect) -> Option<&RgbImage> {
        let image = self.image.as_ref()?;
        let stale = self
            .scaled
            .as_ref()
            .is_none_or(|(cached, _)| cached.width != area.width || cached.height != area.height);
        if stale {
            self.scaled = Some((area, scale_to_area(image, area)));
        }
        self.scaled.as_ref().map(|(_, pixels)| pixels)
    }
}
