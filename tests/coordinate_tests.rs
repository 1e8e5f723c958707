//! Tests for cell reference encoding and parsing.
//!
//! Columns use bijective base-26 letters: `A`..`Z`, then `AA`..`ZZ`, then
//! `AAA`..`XFD`. Rows and columns are 1-based.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use test_case::test_case;
use xlwrite::{
    column_index, column_letters, parse_cell_range, parse_cell_ref, CellCoord, XlwriteError,
    MAX_COLUMN, MAX_ROW,
};

// ============================================================================
// COLUMN LETTERS
// ============================================================================

#[test_case(1, "A")]
#[test_case(2, "B")]
#[test_case(26, "Z")]
#[test_case(27, "AA")]
#[test_case(52, "AZ")]
#[test_case(53, "BA")]
#[test_case(702, "ZZ")]
#[test_case(703, "AAA")]
#[test_case(16_384, "XFD")]
fn test_column_letters(col: u32, expected: &str) {
    assert_eq!(column_letters(col).unwrap(), expected);
    assert_eq!(column_index(expected).unwrap(), col);
}

#[test_case(0 ; "zero")]
#[test_case(MAX_COLUMN + 1 ; "past XFD")]
fn test_column_letters_out_of_range(col: u32) {
    assert!(matches!(
        column_letters(col),
        Err(XlwriteError::ColumnOutOfRange(c)) if c == col
    ));
}

#[test_case("xfd", 16_384)]
#[test_case("Ab", 28)]
fn test_column_index_ignores_case(letters: &str, expected: u32) {
    assert_eq!(column_index(letters).unwrap(), expected);
}

#[test_case("" ; "empty")]
#[test_case("ABCD" ; "four letters")]
#[test_case("A1" ; "digit")]
#[test_case("XFE" ; "past last column")]
fn test_column_index_rejects(letters: &str) {
    assert!(column_index(letters).is_err());
}

#[test]
fn test_letters_round_trip_and_increase() {
    let mut previous = String::new();
    for col in 1..=MAX_COLUMN {
        let letters = column_letters(col).unwrap();
        assert_eq!(column_index(&letters).unwrap(), col);
        // Shorter strings sort before longer ones, then lexicographically
        assert!(
            (letters.len(), letters.as_str()) > (previous.len(), previous.as_str()),
            "{letters} should follow {previous}"
        );
        previous = letters;
    }
}

// ============================================================================
// CELL REFERENCES
// ============================================================================

#[test_case("A1", 1, 1)]
#[test_case("B7", 2, 7)]
#[test_case("aa10", 27, 10)]
#[test_case("XFD1048576", 16_384, 1_048_576)]
fn test_parse_cell_ref(reference: &str, col: u32, row: u32) {
    assert_eq!(parse_cell_ref(reference).unwrap(), CellCoord { col, row });
}

#[test_case("" ; "empty")]
#[test_case("1A" ; "digits first")]
#[test_case("A" ; "no row")]
#[test_case("7" ; "no column")]
#[test_case("A 1" ; "space")]
#[test_case("$A$1" ; "absolute marker")]
#[test_case("A1B" ; "trailing letter")]
fn test_parse_cell_ref_malformed(reference: &str) {
    assert!(matches!(
        parse_cell_ref(reference),
        Err(XlwriteError::MalformedReference(_))
    ));
}

#[test]
fn test_parse_cell_ref_bounds() {
    assert!(matches!(parse_cell_ref("A0"), Err(XlwriteError::RowOutOfRange(0))));
    assert!(parse_cell_ref(&format!("A{}", MAX_ROW + 1)).is_err());
    assert!(parse_cell_ref("XFE1").is_err());
}

#[test]
fn test_coord_display_and_from_str() {
    let coord: CellCoord = "c12".parse().unwrap();
    assert_eq!(coord, CellCoord::new(3, 12).unwrap());
    assert_eq!(coord.to_string(), "C12");
}

// ============================================================================
// RANGES
// ============================================================================

#[test_case("A1:B2", (1, 1), (2, 2))]
#[test_case("c3:a1", (3, 3), (1, 1) ; "endpoints kept as written")]
#[test_case("Z9:Z9", (26, 9), (26, 9))]
fn test_parse_cell_range(range: &str, start: (u32, u32), end: (u32, u32)) {
    let (a, b) = parse_cell_range(range).unwrap();
    assert_eq!((a.col, a.row), start);
    assert_eq!((b.col, b.row), end);
}

#[test_case("A1" ; "single cell")]
#[test_case("A1:" ; "missing end")]
#[test_case(":B2" ; "missing start")]
#[test_case("A1:B2:C3" ; "three parts")]
#[test_case("A1-B2" ; "wrong separator")]
fn test_parse_cell_range_malformed(range: &str) {
    assert!(parse_cell_range(range).is_err());
}
