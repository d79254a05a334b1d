//! Layout parameters for a passport sheet.

use serde::{Deserialize, Serialize};

/// Default page width in pixels (A4 at 300 DPI).
pub const DEFAULT_PAGE_WIDTH: u32 = 2480;

/// Default page height in pixels (A4 at 300 DPI).
pub const DEFAULT_PAGE_HEIGHT: u32 = 3508;

/// Default tile content width in pixels.
pub const DEFAULT_TILE_WIDTH: u32 = 384;

/// Default tile content height in pixels.
pub const DEFAULT_TILE_HEIGHT: u32 = 472;

/// Default border width around each tile.
pub const DEFAULT_BORDER_WIDTH: u32 = 2;

/// Default left margin.
pub const DEFAULT_MARGIN_X: u32 = 10;

/// Default top margin.
pub const DEFAULT_MARGIN_Y: u32 = 15;

/// Default gap between tiles in a row.
pub const DEFAULT_HORIZONTAL_GAP: u32 = 20;

/// Default spacing between rows.
pub const DEFAULT_VERTICAL_SPACING: u32 = 25;

/// Default number of copies per sheet.
pub const DEFAULT_COPIES: u32 = 6;

/// Largest page raster accepted, in pixels (A4 at 600 DPI fits).
pub const MAX_PAGE_PIXELS: u64 = 64 * 1024 * 1024;

/// Geometry of a sheet and the number of copies requested for it.
///
/// All values are pixels except `requested_copies`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutParameters {
    /// Content width of a tile, excluding its border
    pub tile_width: u32,

    /// Content height of a tile, excluding its border
    pub tile_height: u32,

    /// Border drawn on each side of a tile
    pub border_width: u32,

    /// Space between consecutive rows
    pub vertical_spacing: u32,

    /// Left margin; every row starts here
    pub margin_x: u32,

    /// Top margin; the first row starts here
    pub margin_y: u32,

    /// Space between consecutive tiles in a row
    pub horizontal_gap: u32,

    /// Page width
    pub page_width: u32,

    /// Page height
    pub page_height: u32,

    /// Number of copies to place
    pub requested_copies: u32,
}

impl Default for LayoutParameters {
    fn default() -> Self {
        Self {
            tile_width: DEFAULT_TILE_WIDTH,
            tile_height: DEFAULT_TILE_HEIGHT,
            border_width: DEFAULT_BORDER_WIDTH,
            vertical_spacing: DEFAULT_VERTICAL_SPACING,
            margin_x: DEFAULT_MARGIN_X,
            margin_y: DEFAULT_MARGIN_Y,
            horizontal_gap: DEFAULT_HORIZONTAL_GAP,
            page_width: DEFAULT_PAGE_WIDTH,
            page_height: DEFAULT_PAGE_HEIGHT,
            requested_copies: DEFAULT_COPIES,
        }
    }
}

impl LayoutParameters {
    /// Return a copy of these parameters with a different copy count.
    pub fn with_copies(mut self, copies: u32) -> Self {
        self.requested_copies = copies;
        self
    }

    /// Width of a tile including its border on both sides.
    #[inline]
    pub fn footprint_width(&self) -> u32 {
        self.tile_width
            .saturating_add(self.border_width.saturating_mul(2))
    }

    /// Height of a tile including its border on both sides.
    #[inline]
    pub fn footprint_height(&self) -> u32 {
        self.tile_height
            .saturating_add(self.border_width.saturating_mul(2))
    }

    /// Number of tiles that fit in one row.
    pub fn columns(&self) -> u32 {
        fit_count(
            self.margin_x,
            self.footprint_width(),
            self.horizontal_gap,
            self.page_width,
        )
    }

    /// Number of rows that fit on the page.
    pub fn rows(&self) -> u32 {
        fit_count(
            self.margin_y,
            self.footprint_height(),
            self.vertical_spacing,
            self.page_height,
        )
    }

    /// Maximum number of tiles one page can hold.
    pub fn capacity(&self) -> u64 {
        u64::from(self.columns()) * u64::from(self.rows())
    }

    /// Validate the parameters and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err("tile width and height must be greater than 0".to_string());
        }
        if self.page_width == 0 || self.page_height == 0 {
            return Err("page width and height must be greater than 0".to_string());
        }
        let pixels = u64::from(self.page_width) * u64::from(self.page_height);
        if pixels > MAX_PAGE_PIXELS {
            return Err(format!(
                "page area of {} pixels exceeds the maximum of {}",
                pixels, MAX_PAGE_PIXELS
            ));
        }
        Ok(())
    }
}

/// Count the positions `start + k * (extent + gap)` whose far edge stays
/// within `limit`.
fn fit_count(start: u32, extent: u32, gap: u32, limit: u32) -> u32 {
    let first_end = u64::from(start) + u64::from(extent);
    if first_end > u64::from(limit) {
        return 0;
    }

    let room = u64::from(limit) - first_end;
    let step = u64::from(extent) + u64::from(gap);
    match room.checked_div(step) {
        Some(extra) => u32::try_from(extra + 1).unwrap_or(u32::MAX),
        // Zero-sized footprint with no gap never advances
        None => u32::MAX,
    }
}

// =============================================================================
// Tests
// =============================================================================
