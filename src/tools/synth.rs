use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::decoder::encode_modules;
use crate::models::Ean13;

/// Layout of a rendered barcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Pixels per module
    pub module: u32,
    /// Quiet zone on each side, in modules
    pub quiet_zone: u32,
    /// Bar height in pixels
    pub bar_height: u32,
    /// Blank rows above and below the bars
    pub margin: u32,
    /// Light bars on a dark ground
    pub invert: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            module: 4,
            quiet_zone: 12,
            bar_height: 120,
            margin: 70,
            invert: false,
        }
    }
}

impl RenderOptions {
    /// Image size the options produce
    pub fn dimensions(&self) -> (u32, u32) {
        let width = (95 + 2 * self.quiet_zone) * self.module;
        let height = self.bar_height + 2 * self.margin;
        (width, height)
    }
}

/// Render a clean, axis-aligned barcode
pub fn render_ean13(code: &Ean13, options: &RenderOptions) -> GrayImage {
    let (width, height) = options.dimensions();
    let (paper, ink) = if options.invert {
        (Luma([0u8]), Luma([255u8]))
    } else {
        (Luma([255u8]), Luma([0u8]))
    };

    let mut image = GrayImage::from_pixel(width, height, paper);
    if options.module == 0 || options.bar_height == 0 {
        return image;
    }

    for (i, bar) in encode_modules(code).iter().enumerate() {
        if !bar {
            continue;
        }
        let x = (options.quiet_zone + i as u32) * options.module;
        let rect = Rect::at(x as i32, options.margin as i32).of_size(options.module, options.bar_height);
        draw_filled_rect_mut(&mut image, rect, ink);
    }
    image
}
