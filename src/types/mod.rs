//! Data types for workbook cells, facilities, and map primitives.

mod cell;
mod facility;
mod map;
mod workbook;

pub use cell::*;
pub use facility::*;
pub use map::*;
pub use workbook::*;
