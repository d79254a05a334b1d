//! Raster composition of a sheet.

use image::imageops;
use image::{Rgb, RgbImage};

use crate::layout::{plan_page, LayoutParameters, PagePlan};
use crate::tile::Tile;

/// Background color of an empty page.
pub const PAGE_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// A composed page: the canvas and the plan that filled it.
#[derive(Debug, Clone)]
pub struct Page {
    canvas: RgbImage,
    plan: PagePlan,
}

impl Page {
    /// The page pixels.
    pub fn canvas(&self) -> &RgbImage {
        &self.canvas
    }

    /// Where each copy went.
    pub fn plan(&self) -> &PagePlan {
        &self.plan
    }

    /// Number of copies on the page.
    pub fn placed(&self) -> u32 {
        self.plan.placed()
    }

    /// Split into the canvas and the plan.
    pub fn into_parts(self) -> (RgbImage, PagePlan) {
        (self.canvas, self.plan)
    }
}

/// A page with nothing stamped on it, for layouts where no copy fits.
///
/// No tile buffer is needed, so tile dimensions larger than the page never
/// allocate.
pub fn blank_page(params: &LayoutParameters) -> Page {
    Page {
        canvas: RgbImage::from_pixel(params.page_width, params.page_height, PAGE_COLOR),
        plan: plan_page(params),
    }
}

/// Stamp copies of `tile` onto a fresh page following [`plan_page`].
///
/// The tile must have the footprint described by `params`; every placement
/// borrows the same tile buffer.
pub fn compose_page(tile: &Tile, params: &LayoutParameters) -> Page {
    debug_assert_eq!(tile.width(), params.footprint_width());
    debug_assert_eq!(tile.height(), params.footprint_height());

    let plan = plan_page(params);
    let mut canvas = RgbImage::from_pixel(params.page_width, params.page_height, PAGE_COLOR);

    for placement in &plan.placements {
        imageops::replace(
            &mut canvas,
            tile.image(),
            i64::from(placement.x),
            i64::from(placement.y),
        );
    }

    Page { canvas, plan }
}

// =============================================================================
// Tests
// =============================================================================
