//! Data types for the workbook model.

mod cell;
mod style;

pub use cell::*;
pub use style::*;
