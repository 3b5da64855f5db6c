//! Thumbnail art
//!
//! Decodes cached image bytes once and renders them as half-block cells:
//! each terminal cell shows two vertical pixels, the upper one as the
//! foreground of '▀' and the lower one as the background.

use image::imageops::FilterType;
use image::RgbImage;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;
use tracing::warn;

/// Decoded, downscaled thumbnail
#[derive(Debug, Clone)]
pub struct ThumbnailArt {
    image: RgbImage,
}

impl ThumbnailArt {
    /// Upper bound of the stored image, in pixels
    pub const MAX_WIDTH: u32 = 96;
    pub const MAX_HEIGHT: u32 = 72;

    /// Decode PNG or JPEG bytes
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        match image::load_from_memory(bytes) {
            Ok(img) => {
                let img = if img.width() > Self::MAX_WIDTH || img.height() > Self::MAX_HEIGHT {
                    img.thumbnail(Self::MAX_WIDTH, Self::MAX_HEIGHT)
                } else {
                    img
                };
                Some(Self {
                    image: img.to_rgb8(),
                })
            }
            Err(e) => {
                warn!(error = %e, "could not decode thumbnail");
                None
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Image scaled to fit `cols` x `rows` cells, keeping aspect ratio
    fn fitted(&self, cols: u16, rows: u16) -> Option<RgbImage> {
        let (w, h) = (self.image.width(), self.image.height());
        if w == 0 || h == 0 || cols == 0 || rows == 0 {
            return None;
        }
        let max_w = f64::from(cols);
        let max_h = f64::from(rows) * 2.0;
        let scale = (max_w / f64::from(w)).min(max_h / f64::from(h));
        let tw = ((f64::from(w) * scale).floor() as u32).max(1);
        let th = ((f64::from(h) * scale).floor() as u32).max(1);
        Some(image::imageops::resize(&self.image, tw, th, FilterType::Triangle))
    }
}

fn pixel_color(img: &RgbImage, x: u32, y: u32) -> Option<Color> {
    if x < img.width() && y < img.height() {
        let [r, g, b] = img.get_pixel(x, y).0;
        Some(Color::Rgb(r, g, b))
    } else {
        None
    }
}

impl Widget for &ThumbnailArt {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(img) = self.fitted(area.width, area.height) else {
            return;
        };

        let cols = img.width() as u16;
        let rows = img.height().div_ceil(2) as u16;
        let x0 = area.x + area.width.saturating_sub(cols) / 2;
        let y0 = area.y + area.height.saturating_sub(rows) / 2;

        for row in 0..rows {
            for col in 0..cols {
                let top = pixel_color(&img, u32::from(col), u32::from(row) * 2);
                let bottom = pixel_color(&img, u32::from(col), u32::from(row) * 2 + 1);
                let Some(top) = top else { continue };

                if let Some(cell) = buf.cell_mut((x0 + col, y0 + row)) {
                    cell.set_char('▀').set_fg(top);
                    if let Some(bottom) = bottom {
                        cell.set_bg(bottom);
                    }
                }
            }
        }
    }
}
