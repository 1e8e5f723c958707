//! Tests for writing cells through the worksheet API and the selection
//! handles, checked against the worksheet XML that ends up in the package.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use common::{cell, cells, element_attr, fixed_workbook, read_part, shared_strings};
use serde_json::json;
use test_case::test_case;
use xlwrite::{BorderSide, BorderStyle, PatternType, Workbook, XlwriteError};

fn sheet1(wb: &mut Workbook) -> String {
    let bytes = wb.to_bytes().unwrap();
    read_part(&bytes, "xl/worksheets/sheet1.xml")
}

// ============================================================================
// VALUES AND FORMULAS
// ============================================================================

#[test]
fn test_text_values_reference_shared_strings() {
    let mut wb = fixed_workbook();
    wb.active_sheet_mut()
        .set_cell_value("A1", "Name")
        .unwrap()
        .set_cell_value("B1", "Score")
        .unwrap()
        .set_cell_value("A2", "Name")
        .unwrap();
    let bytes = wb.to_bytes().unwrap();
    let xml = read_part(&bytes, "xl/worksheets/sheet1.xml");

    assert_eq!(shared_strings(&bytes), ["Name", "Score"]);
    let a1 = cell(&xml, "A1");
    assert_eq!(a1.t.as_deref(), Some("s"));
    assert_eq!(a1.v.as_deref(), Some("0"));
    assert_eq!(cell(&xml, "B1").v.as_deref(), Some("1"));
    assert_eq!(cell(&xml, "A2").v.as_deref(), Some("0"));
    assert!(a1.s.is_none());
}

#[test]
fn test_formula_cell() {
    let mut wb = fixed_workbook();
    wb.active_sheet_mut()
        .set_cell_value("C3", "=SUM(A1:B2)")
        .unwrap();
    let xml = sheet1(&mut wb);
    let c3 = cell(&xml, "C3");
    assert_eq!(c3.f.as_deref(), Some("SUM(A1:B2)"));
    assert!(c3.v.is_none());
    assert!(wb.shared_strings().is_empty());
}

#[test]
fn test_formula_replaces_value_and_back() {
    let mut wb = fixed_workbook();
    let mut ws = wb.active_sheet_mut();
    ws.set_cell_value("A1", "text").unwrap();
    ws.set_cell_value("A1", "=1+1").unwrap();
    let record = ws.cell("A1").unwrap().unwrap();
    assert_eq!(
        serde_json::to_value(record).unwrap(),
        json!({ "content": { "formula": "1+1" } })
    );

    ws.set_cell_value("A1", "again").unwrap();
    let record = ws.cell("A1").unwrap().unwrap();
    assert_eq!(
        serde_json::to_value(record).unwrap(),
        json!({ "content": { "sharedString": 1 } })
    );
}

#[test]
fn test_cells_written_row_major() {
    let mut wb = fixed_workbook();
    wb.active_sheet_mut()
        .set_cell_value("B2", "4")
        .unwrap()
        .set_cell_value("A2", "3")
        .unwrap()
        .set_cell_value("J1", "2")
        .unwrap()
        .set_cell_value("B1", "1")
        .unwrap()
        .set_cell_value("A10", "5")
        .unwrap();
    let xml = sheet1(&mut wb);
    let order: Vec<String> = cells(&xml).into_iter().map(|c| c.r).collect();
    assert_eq!(order, ["B1", "J1", "A2", "B2", "A10"]);
    assert_eq!(element_attr(&xml, "row", 0, "spans").as_deref(), Some("1:10"));
    assert_eq!(element_attr(&xml, "row", 2, "r").as_deref(), Some("10"));
}

#[test]
fn test_by_column_and_row_matches_reference_form() {
    let mut wb = fixed_workbook();
    wb.active_sheet_mut()
        .set_cell_value_by_column_and_row(28, 3, "x")
        .unwrap();
    assert!(wb.active_sheet().cell("AB3").unwrap().is_some());
}

#[test]
fn test_font_setters_by_column_and_row_match_reference_form() {
    let mut by_ref = fixed_workbook();
    by_ref
        .active_sheet_mut()
        .set_cell_font_size("C4", "9.5")
        .unwrap()
        .set_cell_font_name("C4", "Georgia")
        .unwrap();

    let mut by_index = fixed_workbook();
    {
        let mut ws = by_index.active_sheet_mut();
        ws.set_cell_font_size_by_column_and_row(3, 4, "9.5")
            .unwrap()
            .set_cell_font_name_by_column_and_row(3, 4, "Georgia")
            .unwrap();
        assert!(matches!(
            ws.set_cell_font_size_by_column_and_row(0, 1, "9"),
            Err(XlwriteError::ColumnOutOfRange(0))
        ));
        assert!(ws.set_cell_font_size_by_column_and_row(1, 1, "big").is_err());
        assert!(ws.cell("A1").unwrap().is_none());
    }

    assert_eq!(
        serde_json::to_value(by_index.active_sheet().cell("C4").unwrap().unwrap()).unwrap(),
        json!({ "font": { "size": "9.5", "name": "Georgia" } })
    );
    assert_eq!(by_ref.to_bytes().unwrap(), by_index.to_bytes().unwrap());
}

// ============================================================================
// DIMENSION
// ============================================================================

#[test_case(&["B2"], "B2" ; "single cell")]
#[test_case(&["B2", "D5"], "B2:D5" ; "two cells")]
#[test_case(&["C1", "A7", "B3"], "A1:C7" ; "box spans extremes")]
#[test_case(&["B2", "D5", "A1"], "A1:D5" ; "grows back to origin")]
fn test_dimension(refs: &[&str], expected: &str) {
    let mut wb = fixed_workbook();
    {
        let mut ws = wb.active_sheet_mut();
        for r in refs {
            ws.set_cell_value(r, "v").unwrap();
        }
    }
    let xml = sheet1(&mut wb);
    assert_eq!(element_attr(&xml, "dimension", 0, "ref").as_deref(), Some(expected));
}

#[test]
fn test_dimension_empty_sheet() {
    let mut wb = fixed_workbook();
    let xml = sheet1(&mut wb);
    assert_eq!(element_attr(&xml, "dimension", 0, "ref").as_deref(), Some("A1"));
    assert!(cells(&xml).is_empty());
}

#[test]
fn test_style_only_mutation_extends_dimension() {
    let mut wb = fixed_workbook();
    wb.active_sheet_mut()
        .set_cell_value("A1", "x")
        .unwrap()
        .set_cell_fill_type("E4", PatternType::Solid)
        .unwrap();
    let xml = sheet1(&mut wb);
    assert_eq!(element_attr(&xml, "dimension", 0, "ref").as_deref(), Some("A1:E4"));
    let e4 = cell(&xml, "E4");
    assert!(e4.t.is_none());
    assert!(e4.v.is_none());
    assert!(e4.s.is_some());
}

// ============================================================================
// ERRORS
// ============================================================================

#[test_case("" ; "empty")]
#[test_case("A" ; "no row")]
#[test_case("1A" ; "reversed")]
fn test_malformed_reference_leaves_sheet_untouched(reference: &str) {
    let mut wb = fixed_workbook();
    let mut ws = wb.active_sheet_mut();
    assert!(matches!(
        ws.set_cell_value(reference, "x"),
        Err(XlwriteError::MalformedReference(_))
    ));
    assert!(ws.set_cell_color(reference, "FFFF0000").is_err());
    assert!(ws.merge_cells(&format!("{reference}:B2")).is_err());
    assert!(ws.is_empty());
    assert!(ws.merge_ranges().is_empty());
    assert!(ws.dimension().is_none());
    assert!(wb.shared_strings().is_empty());
}

#[test_case("red" ; "word")]
#[test_case("FFF" ; "too short")]
#[test_case("GG000000" ; "not hex")]
fn test_invalid_color_rejected(color: &str) {
    let mut wb = fixed_workbook();
    let mut ws = wb.active_sheet_mut();
    assert!(matches!(
        ws.set_cell_color("A1", color),
        Err(XlwriteError::InvalidColor(_))
    ));
    assert!(ws.set_cell_fill_color("A1", "FFFFFFFF", Some(color)).is_err());
    assert!(ws.is_empty());
}

#[test]
fn test_invalid_font_size_rejected() {
    let mut wb = fixed_workbook();
    let mut ws = wb.active_sheet_mut();
    for bad in ["0", "-1", "big", "10.555", "410"] {
        assert!(
            matches!(
                ws.set_cell_font_size("A1", bad),
                Err(XlwriteError::InvalidFontSize(_))
            ),
            "{bad:?} should be rejected"
        );
    }
    assert!(ws.is_empty());
}

// ============================================================================
// MERGES
// ============================================================================

#[test]
fn test_merge_ranges_written_in_call_order() {
    let mut wb = fixed_workbook();
    wb.active_sheet_mut()
        .merge_cells("D1:E1")
        .unwrap()
        .merge_cells_by_column_and_row(1, 1, 3, 2)
        .unwrap()
        .merge_cells("D1:E1")
        .unwrap();
    let xml = sheet1(&mut wb);
    assert_eq!(element_attr(&xml, "mergeCells", 0, "count").as_deref(), Some("3"));
    let refs: Vec<String> = (0..3)
        .map(|i| element_attr(&xml, "mergeCell", i, "ref").unwrap())
        .collect();
    assert_eq!(refs, ["D1:E1", "A1:C2", "D1:E1"]);
}

#[test]
fn test_no_merge_block_without_merges() {
    let mut wb = fixed_workbook();
    wb.active_sheet_mut().set_cell_value("A1", "x").unwrap();
    let xml = sheet1(&mut wb);
    assert!(!xml.contains("mergeCells"));
}

// ============================================================================
// SELECTIONS
// ============================================================================

#[test]
fn test_selection_and_direct_setter_agree() {
    let mut direct = fixed_workbook();
    direct
        .active_sheet_mut()
        .set_cell_color("B2", "FF00FF00")
        .unwrap()
        .set_cell_fill_color("B2", "FFFFFF00", Some("FF0000FF"))
        .unwrap()
        .set_cell_fill_type("B2", PatternType::LightUp)
        .unwrap()
        .set_cell_border_style("B2", BorderSide::Right, BorderStyle::Hair)
        .unwrap();

    let mut selected = fixed_workbook();
    {
        let mut ws = selected.active_sheet_mut();
        ws.select_cell("B2")
            .unwrap()
            .select_font()
            .select_color()
            .apply_color("FF00FF00")
            .unwrap();
        ws.select_cell("B2")
            .unwrap()
            .select_fill()
            .select_start_color()
            .apply_color("FFFFFF00")
            .unwrap();
        ws.select_cell("B2")
            .unwrap()
            .select_fill()
            .select_end_color()
            .apply_color("FF0000FF")
            .unwrap();
        ws.select_cell("B2")
            .unwrap()
            .select_fill()
            .set_fill_type(PatternType::LightUp);
        ws.select_cell("B2")
            .unwrap()
            .select_borders()
            .select_right()
            .apply_border_style(BorderStyle::Hair);
    }

    assert_eq!(
        direct.active_sheet().cell("B2").unwrap(),
        selected.active_sheet().cell("B2").unwrap()
    );
    assert_eq!(direct.to_bytes().unwrap(), selected.to_bytes().unwrap());
}

#[test]
fn test_selection_records_cell_as_json() {
    let mut wb = fixed_workbook();
    let mut ws = wb.active_sheet_mut();
    ws.select_cell_by_column_and_row(1, 1)
        .unwrap()
        .select_borders()
        .select_top()
        .apply_border_style(BorderStyle::Thick);
    ws.select_cell("A1")
        .unwrap()
        .select_font()
        .select_color()
        .apply_color("00FF00")
        .unwrap();

    let record = ws.cell("A1").unwrap().unwrap();
    assert_eq!(
        serde_json::to_value(record).unwrap(),
        json!({
            "font": { "size": "11", "color": "FF00FF00", "name": "Calibri" },
            "border": { "top": { "style": "thick" } }
        })
    );
}
