//! Sheet rendering.
//!
//! ```text
//! Tile + LayoutParameters ──▶ compose_page ──▶ Page ──▶ export_pdf ──▶ PDF bytes
//!                              (plan_page +              (printpdf,
//!                               stamping)                 DPI-sized page)
//! ```

mod compose;
mod export;

pub use compose::{blank_page, compose_page, Page, PAGE_COLOR};
pub use export::{export_pdf, px_to_mm, DEFAULT_DPI};
