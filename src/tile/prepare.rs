//! Tile preparation: flatten, resize, border.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};

use crate::layout::LayoutParameters;

/// Color transparent pixels are flattened onto.
pub const BACKGROUND_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Color of the border drawn around each tile.
pub const BORDER_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// One bordered, opaque copy of the photo, ready to be placed on a page.
///
/// The tile is built once per sheet and borrowed for every placement.
#[derive(Debug, Clone)]
pub struct Tile {
    image: RgbImage,
    border_width: u32,
}

impl Tile {
    /// The tile pixels, border included.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Total width including the border.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Total height including the border.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Border width on each side.
    pub fn border_width(&self) -> u32 {
        self.border_width
    }
}

/// Build a tile from a decoded photo.
///
/// The photo is flattened onto [`BACKGROUND_COLOR`], scaled to exactly
/// `tile_width x tile_height` with a Lanczos3 filter (aspect ratio is not
/// kept) and surrounded by `border_width` pixels of [`BORDER_COLOR`].
pub fn prepare_tile(source: &DynamicImage, params: &LayoutParameters) -> Tile {
    let flattened = flatten(source);
    let resized = imageops::resize(
        &flattened,
        params.tile_width,
        params.tile_height,
        FilterType::Lanczos3,
    );

    Tile {
        image: add_border(&resized, params.border_width, BORDER_COLOR),
        border_width: params.border_width,
    }
}

/// Remove transparency by compositing onto [`BACKGROUND_COLOR`].
///
/// Images without an alpha channel are converted straight to 8-bit RGB.
pub fn flatten(source: &DynamicImage) -> RgbImage {
    if !source.color().has_alpha() {
        return source.to_rgb8();
    }

    let rgba = source.to_rgba8();
    let mut output = RgbImage::new(rgba.width(), rgba.height());
    for (src, dst) in rgba.pixels().zip(output.pixels_mut()) {
        let [r, g, b, a] = src.0;
        *dst = Rgb([
            blend(r, BACKGROUND_COLOR.0[0], a),
            blend(g, BACKGROUND_COLOR.0[1], a),
            blend(b, BACKGROUND_COLOR.0[2], a),
        ]);
    }
    output
}

/// Surround an image with a solid border.
pub fn add_border(image: &RgbImage, border: u32, color: Rgb<u8>) -> RgbImage {
    if border == 0 {
        return image.clone();
    }

    let frame = border.saturating_mul(2);
    let mut framed = RgbImage::from_pixel(
        image.width().saturating_add(frame),
        image.height().saturating_add(frame),
        color,
    );
    imageops::replace(&mut framed, image, i64::from(border), i64::from(border));
    framed
}

#[inline]
fn blend(foreground: u8, background: u8, alpha: u8) -> u8 {
    let alpha = u16::from(alpha);
    let value = u16::from(foreground) * alpha + u16::from(background) * (255 - alpha);
    ((value + 127) / 255) as u8
}

// =============================================================================
// Tests
// =============================================================================
