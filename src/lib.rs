//! xlwrite - build Excel `.xlsx` workbooks from Rust
//!
//! Write text and formulas into cells, style them with fonts, fills and
//! borders, merge ranges and save a valid OOXML package:
//! - Cell values are deduplicated into the shared string table
//! - Equal styles share one entry in `styles.xml`
//! - Output is deterministic for a fixed document timestamp
//! - Saving to a path is atomic
//!
//! # Usage
//!
//! ```no_run
//! use xlwrite::{BorderSide, BorderStyle, Workbook};
//!
//! # fn main() -> xlwrite::Result<()> {
//! let mut wb = Workbook::new();
//! let mut ws = wb.active_sheet_mut();
//! ws.set_cell_value("A1", "Total")?
//!     .set_cell_value("B1", "=SUM(B2:B10)")?
//!     .set_cell_color("A1", "FFFF0000")?
//!     .set_cell_border_style("B1", BorderSide::Bottom, BorderStyle::Double)?;
//! ws.select_cell("A1")?
//!     .select_fill()
//!     .select_start_color()
//!     .apply_color("FFFFFF00")?;
//! wb.save("report.xlsx")?;
//! # Ok(())
//! # }
//! ```

pub mod cell_ref;
pub mod error;
pub mod namespaces;
pub mod options;
pub mod selection;
pub mod shared_strings;
pub mod sheet;
pub mod styles;
pub mod types;
pub mod workbook;

mod export;
mod xml_writer;

pub use cell_ref::{
    column_index, column_letters, parse_cell_range, parse_cell_ref, CellCoord, MAX_COLUMN, MAX_ROW,
};
pub use error::{PackagingError, Result, XlwriteError};
pub use options::{Compression, DefaultFont, WorkbookOptions};
pub use selection::{
    BorderSideSelection, BordersSelection, CellSelection, ColorSelection, FillSelection,
    FontSelection,
};
pub use shared_strings::SharedStringTable;
pub use sheet::{Dimension, Sheet, Worksheet};
pub use styles::{CellFormat, StyleRegistry};
pub use types::*;
pub use workbook::Workbook;
