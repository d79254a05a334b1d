//! Row-major flow placement of identical tiles on a single page.
//!
//! Tiles are placed left to right starting at the margins. When the next
//! tile would cross the right edge of the page the cursor wraps to the start
//! of a new row; when a row would cross the bottom edge placement stops and
//! the remaining copies are dropped. There is no second page.

use serde::Serialize;

use super::params::LayoutParameters;

/// Position of one placed tile, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    /// Zero-based copy index, in request order
    pub index: u32,

    /// Left edge in page pixels
    pub x: u32,

    /// Top edge in page pixels
    pub y: u32,

    /// Footprint width (content plus border)
    pub width: u32,

    /// Footprint height (content plus border)
    pub height: u32,
}

impl Placement {
    /// Right edge, exclusive.
    #[inline]
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Bottom edge, exclusive.
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Whether two placements share any pixel.
    pub fn overlaps(&self, other: &Placement) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// The outcome of laying out one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagePlan {
    /// Page width in pixels
    pub page_width: u32,

    /// Page height in pixels
    pub page_height: u32,

    /// Number of copies asked for
    pub requested: u32,

    /// Placed tiles, in request order
    pub placements: Vec<Placement>,
}

impl PagePlan {
    /// Number of copies actually placed.
    pub fn placed(&self) -> u32 {
        self.placements.len() as u32
    }

    /// Number of requested copies that did not fit.
    pub fn dropped(&self) -> u32 {
        self.requested - self.placed()
    }

    /// Whether every requested copy was placed.
    pub fn is_complete(&self) -> bool {
        self.dropped() == 0
    }
}

/// Lay out `params.requested_copies` tiles.
///
/// The wrap check is evaluated before the overflow check on every
/// iteration, so a full row still gets the chance to start a new one before
/// the page is declared full. A tile wider than the space right of the left
/// margin can never be placed without crossing the page edge, so it yields
/// an empty plan.
pub fn plan_page(params: &LayoutParameters) -> PagePlan {
    let footprint_w = u64::from(params.footprint_width());
    let footprint_h = u64::from(params.footprint_height());
    let page_w = u64::from(params.page_width);
    let page_h = u64::from(params.page_height);
    let margin_x = u64::from(params.margin_x);

    let mut plan = PagePlan {
        page_width: params.page_width,
        page_height: params.page_height,
        requested: params.requested_copies,
        placements: Vec::new(),
    };

    if margin_x + footprint_w > page_w {
        return plan;
    }

    let mut x = margin_x;
    let mut y = u64::from(params.margin_y);

    for index in 0..params.requested_copies {
        if x + footprint_w > page_w {
            x = margin_x;
            y += footprint_h + u64::from(params.vertical_spacing);
        }

        if y + footprint_h > page_h {
            break;
        }

        // Both coordinates are bounded by the u32 page size here
        plan.placements.push(Placement {
            index,
            x: x as u32,
            y: y as u32,
            width: params.footprint_width(),
            height: params.footprint_height(),
        });

        x += footprint_w + u64::from(params.horizontal_gap);
    }

    plan
}

// =============================================================================
// Tests
// =============================================================================
