//! Sheet layout.
//!
//! Computes where copies of a tile go on a page without touching any pixels.
//! The [`sheet`](crate::sheet) module turns a [`PagePlan`] into a raster page.
//!
//! # Example
//!
//! ```
//! use passport_sheet::layout::{plan_page, LayoutParameters};
//!
//! let params = LayoutParameters::default().with_copies(6);
//! let plan = plan_page(&params);
//!
//! assert_eq!(plan.placed(), 6);
//! assert_eq!(plan.placements[1].x, 418);
//! ```

mod params;
mod plan;

pub use params::{
    LayoutParameters, DEFAULT_BORDER_WIDTH, DEFAULT_COPIES, DEFAULT_HORIZONTAL_GAP,
    DEFAULT_MARGIN_X, DEFAULT_MARGIN_Y, DEFAULT_PAGE_HEIGHT, DEFAULT_PAGE_WIDTH,
    DEFAULT_TILE_HEIGHT, DEFAULT_TILE_WIDTH, DEFAULT_VERTICAL_SPACING, MAX_PAGE_PIXELS,
};
pub use plan::{plan_page, PagePlan, Placement};
