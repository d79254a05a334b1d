//! Tile preparation.
//!
//! Turns an arbitrary decoded photo into the canonical tile that is stamped
//! onto the sheet:
//!
//! ```text
//! DynamicImage ──▶ flatten ──▶ resize (Lanczos3) ──▶ add_border ──▶ Tile
//!  (any mode)     (opaque RGB)  (tile_width x        (black frame)
//!                               tile_height)
//! ```
//!
//! # Components
//!
//! - [`prepare_tile`]: the full transform
//! - [`flatten`]: alpha compositing onto white, also used before upload
//! - [`decode_image`] / [`encode_png`]: byte-level codec helpers

mod codec;
mod prepare;

pub use codec::{decode_image, encode_png};
pub use prepare::{add_border, flatten, prepare_tile, Tile, BACKGROUND_COLOR, BORDER_COLOR};
