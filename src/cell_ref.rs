//! Utilities for encoding and parsing Excel-style cell references.
//!
//! Columns and rows are 1-based throughout: column 1 is `A`, row 1 is the
//! first row. Column letters use bijective base-26 (no zero digit), so
//! 26 is `Z`, 27 is `AA`, 702 is `ZZ` and 703 is `AAA`.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, OnceLock};

use crate::error::{Result, XlwriteError};

/// Largest column index in a sheet (`XFD`).
pub const MAX_COLUMN: u32 = 16_384;

/// Largest row index in a sheet.
pub const MAX_ROW: u32 = 1_048_576;

static LETTERS_CACHE: OnceLock<Mutex<HashMap<u32, String>>> = OnceLock::new();
static INDEX_CACHE: OnceLock<Mutex<HashMap<String, u32>>> = OnceLock::new();

/// A validated 1-based cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    pub col: u32,
    pub row: u32,
}

impl CellCoord {
    /// Build a coordinate, checking both axes against the sheet limits.
    pub fn new(col: u32, row: u32) -> Result<Self> {
        check_column(col)?;
        check_row(row)?;
        Ok(Self { col, row })
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Coordinates are validated on construction; fall back to raw digits
        // only if a caller built one by hand with an out-of-range column.
        match column_letters(self.col) {
            Ok(letters) => write!(f, "{letters}{}", self.row),
            Err(_) => write!(f, "C{}R{}", self.col, self.row),
        }
    }
}

impl FromStr for CellCoord {
    type Err = XlwriteError;

    fn from_str(s: &str) -> Result<Self> {
        parse_cell_ref(s)
    }
}

fn check_column(col: u32) -> Result<()> {
    if col == 0 || col > MAX_COLUMN {
        return Err(XlwriteError::ColumnOutOfRange(col));
    }
    Ok(())
}

fn check_row(row: u32) -> Result<()> {
    if row == 0 || row > MAX_ROW {
        return Err(XlwriteError::RowOutOfRange(row));
    }
    Ok(())
}

/// Convert a 1-based column index to its letters (`1` → `A`, `28` → `AB`).
pub fn column_letters(col: u32) -> Result<String> {
    check_column(col)?;

    let cache = LETTERS_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = match cache.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    let letters = cache.entry(col).or_insert_with(|| encode_column(col));
    Ok(letters.clone())
}

fn encode_column(col: u32) -> String {
    let mut digits = Vec::with_capacity(3);
    let mut n = col;
    while n > 0 {
        n -= 1;
        if let Some(c) = char::from_u32(u32::from(b'A') + n % 26) {
            digits.push(c);
        }
        n /= 26;
    }
    digits.iter().rev().collect()
}

/// Convert column letters back to a 1-based index (`"ab"` → `28`).
///
/// Accepts one to three ASCII letters in either case.
pub fn column_index(letters: &str) -> Result<u32> {
    let upper = letters.to_ascii_uppercase();
    if upper.is_empty() || upper.len() > 3 || !upper.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(XlwriteError::MalformedReference(letters.to_string()));
    }

    let cache = INDEX_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = match cache.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    if let Some(&col) = cache.get(&upper) {
        return Ok(col);
    }

    let col = upper
        .bytes()
        .fold(0u32, |acc, b| acc * 26 + u32::from(b - b'A') + 1);
    check_column(col)?;
    cache.insert(upper, col);
    Ok(col)
}

/// Parse a cell reference like `"B7"` into a coordinate.
///
/// The whole input must be one run of letters followed by one run of digits.
pub fn parse_cell_ref(cell_ref: &str) -> Result<CellCoord> {
    let malformed = || XlwriteError::MalformedReference(cell_ref.to_string());

    let split = cell_ref
        .bytes()
        .position(|b| !b.is_ascii_alphabetic())
        .ok_or_else(malformed)?;
    let (letters, digits) = cell_ref.split_at(split);

    if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    let col = column_index(letters)?;
    let row: u32 = digits.parse().map_err(|_| malformed())?;
    CellCoord::new(col, row)
}

/// Parse a range like `"A1:B10"` into its two corner coordinates.
pub fn parse_cell_range(range: &str) -> Result<(CellCoord, CellCoord)> {
    let (start, end) = range
        .split_once(':')
        .ok_or_else(|| XlwriteError::MalformedReference(range.to_string()))?;
    Ok((parse_cell_ref(start)?, parse_cell_ref(end)?))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters_boundaries() {
        assert_eq!(column_letters(1).unwrap(), "A");
        assert_eq!(column_letters(26).unwrap(), "Z");
        assert_eq!(column_letters(27).unwrap(), "AA");
        assert_eq!(column_letters(702).unwrap(), "ZZ");
        assert_eq!(column_letters(703).unwrap(), "AAA");
        assert_eq!(column_letters(MAX_COLUMN).unwrap(), "XFD");
    }

    #[test]
    fn test_column_letters_out_of_range() {
        assert!(matches!(
            column_letters(0),
            Err(XlwriteError::ColumnOutOfRange(0))
        ));
        assert!(column_letters(MAX_COLUMN + 1).is_err());
    }

    #[test]
    fn test_column_index_round_trip_all_columns() {
        for n in 1..=MAX_COLUMN {
            let letters = column_letters(n).unwrap();
            assert_eq!(column_index(&letters).unwrap(), n, "column {letters}");
        }
    }

    #[test]
    fn test_column_index_is_case_insensitive() {
        assert_eq!(column_index("ab").unwrap(), 28);
        assert_eq!(column_index("xFd").unwrap(), MAX_COLUMN);
    }

    #[test]
    fn test_column_index_rejects_long_or_empty() {
        assert!(column_index("").is_err());
        assert!(column_index("ABCD").is_err());
        assert!(column_index("A1").is_err());
    }

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(parse_cell_ref("B7").unwrap(), CellCoord { col: 2, row: 7 });
        assert_eq!(parse_cell_ref("aa10").unwrap(), CellCoord { col: 27, row: 10 });
    }

    #[test]
    fn test_parse_cell_ref_malformed() {
        for bad in ["", "7B", "B", "7", "B7C", "$B$7", "B-7", " B7", "B0"] {
            assert!(parse_cell_ref(bad).is_err(), "{bad:?} should fail");
        }
    }

    #[test]
    fn test_parse_cell_range() {
        let (start, end) = parse_cell_range("A1:C3").unwrap();
        assert_eq!(start, CellCoord { col: 1, row: 1 });
        assert_eq!(end, CellCoord { col: 3, row: 3 });
        assert!(parse_cell_range("A1").is_err());
        assert!(parse_cell_range("A1:").is_err());
    }

    #[test]
    fn test_display_is_canonical_uppercase() {
        let coord: CellCoord = "xfd1048576".parse().unwrap();
        assert_eq!(coord.to_string(), "XFD1048576");
    }
}
