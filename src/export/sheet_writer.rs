//! Generates worksheet XML from a [`Sheet`].
//!
//! Cell styles are resolved against the registry while the sheet is written,
//! so every worksheet must be rendered before `styles.xml`.

use crate::cell_ref::column_letters;
use crate::error::Result;
use crate::namespaces::{NS_DOC_RELATIONSHIPS, NS_MARKUP_COMPAT, NS_SPREADSHEET, NS_X14AC};
use crate::sheet::Sheet;
use crate::styles::StyleRegistry;
use crate::types::CellContent;
use crate::xml_writer::{encode_xstring, XmlWriter};

const DEFAULT_ROW_HEIGHT: &str = "18.75";

/// Write a complete worksheet part for `sheet`.
pub(crate) fn write_sheet_xml(
    sheet: &Sheet,
    tab_selected: bool,
    styles: &mut StyleRegistry,
) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::with_declaration()?;
    xml.start_element_with(
        "worksheet",
        &[
            ("xmlns", NS_SPREADSHEET),
            ("xmlns:r", NS_DOC_RELATIONSHIPS),
            ("xmlns:mc", NS_MARKUP_COMPAT),
            ("mc:Ignorable", "x14ac"),
            ("xmlns:x14ac", NS_X14AC),
        ],
    )?;

    xml.start_element("sheetPr")?
        .element("outlinePr", &[("summaryBelow", "1"), ("summaryRight", "1")])?
        .end_element()?;

    // An untouched sheet still needs a dimension
    let dimension = sheet
        .dimension()
        .map_or_else(|| "A1".to_string(), |dim| dim.reference());
    xml.element("dimension", &[("ref", &dimension)])?;

    xml.start_element("sheetViews")?;
    if tab_selected {
        xml.start_element_with("sheetView", &[("tabSelected", "1"), ("workbookViewId", "0")])?;
    } else {
        xml.start_element_with("sheetView", &[("workbookViewId", "0")])?;
    }
    xml.element("selection", &[("activeCell", "A1"), ("sqref", "A1")])?
        .end_element()?
        .end_element()?;

    xml.element("sheetFormatPr", &[("defaultRowHeight", DEFAULT_ROW_HEIGHT)])?;

    xml.start_element("sheetData")?;
    write_sheet_data(&mut xml, sheet, styles)?;
    xml.end_element()?;

    let merges = sheet.merge_ranges();
    if !merges.is_empty() {
        xml.start_element_with("mergeCells", &[("count", &merges.len().to_string())])?;
        for range in merges {
            xml.element("mergeCell", &[("ref", range)])?;
        }
        xml.end_element()?;
    }

    xml.element(
        "pageMargins",
        &[
            ("left", "0.7"),
            ("right", "0.7"),
            ("top", "0.75"),
            ("bottom", "0.75"),
            ("header", "0.3"),
            ("footer", "0.3"),
        ],
    )?;
    xml.element("pageSetup", &[])?;

    xml.finish()
}

/// Write all rows into `<sheetData>`, interning each cell's style on the way.
fn write_sheet_data(xml: &mut XmlWriter, sheet: &Sheet, styles: &mut StyleRegistry) -> Result<()> {
    let Some(dimension) = sheet.dimension() else {
        return Ok(());
    };
    let spans = format!("1:{}", dimension.max.col);
    let mut styled = 0usize;

    for (row, cells) in sheet.rows() {
        xml.start_element_with("row", &[("r", &row.to_string()), ("spans", &spans)])?;

        for (&col, cell) in cells {
            let reference = format!("{}{row}", column_letters(col)?);
            let style_id = styles.resolve(cell.font.as_ref(), cell.fill.as_ref(), cell.border.as_ref());
            let style_attr = style_id.map(|id| id.to_string());

            let mut attrs: Vec<(&str, &str)> = vec![("r", reference.as_str())];
            if let Some(s) = &style_attr {
                attrs.push(("s", s.as_str()));
                styled += 1;
            }

            match &cell.content {
                None => {
                    xml.element("c", &attrs)?;
                }
                Some(content) => {
                    attrs.push(("t", "s"));
                    xml.start_element_with("c", &attrs)?;
                    match content {
                        CellContent::Formula(formula) => {
                            xml.element_with_text("f", &[], &encode_xstring(formula))?;
                        }
                        CellContent::SharedString(idx) => {
                            xml.element_with_text("v", &[], &idx.to_string())?;
                        }
                    }
                    xml.end_element()?;
                }
            }
        }

        xml.end_element()?;
    }

    log::trace!(
        "{}: resolved styles for {styled} of {} cells",
        sheet.name(),
        sheet.cell_count()
    );
    Ok(())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use crate::types::{BorderSide, BorderStyle};
    use crate::Workbook;

    use super::*;

    fn render(wb: &mut Workbook, idx: usize, tab_selected: bool) -> String {
        let (sheet, styles) = wb.sheet_and_styles(idx).unwrap();
        let bytes = write_sheet_xml(sheet, tab_selected, styles).unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_empty_sheet() {
        let mut wb = Workbook::new();
        let xml = render(&mut wb, 0, true);
        assert!(xml.contains(r#"<dimension ref="A1"/>"#));
        assert!(xml.contains(r#"<sheetView tabSelected="1" workbookViewId="0">"#));
        assert!(xml.contains("<sheetData></sheetData>"));
        assert!(!xml.contains("mergeCells"));
    }

    #[test]
    fn test_rows_are_sorted_and_cells_typed() {
        let mut wb = Workbook::new();
        wb.active_sheet_mut()
            .set_cell_value("B2", "second")
            .unwrap()
            .set_cell_value("A1", "first")
            .unwrap()
            .set_cell_value("C1", "=A1&B2")
            .unwrap();
        let xml = render(&mut wb, 0, true);

        assert!(xml.contains(r#"<dimension ref="A1:C2"/>"#));
        let row1 = xml.find(r#"<row r="1" spans="1:3">"#).unwrap();
        let row2 = xml.find(r#"<row r="2" spans="1:3">"#).unwrap();
        assert!(row1 < row2);
        // "second" was interned first
        assert!(xml.contains(r#"<c r="A1" t="s"><v>1</v></c>"#), "{xml}");
        assert!(xml.contains(r#"<c r="B2" t="s"><v>0</v></c>"#), "{xml}");
        assert!(xml.contains(r#"<c r="C1" t="s"><f>A1&amp;B2</f></c>"#), "{xml}");
    }

    #[test]
    fn test_style_only_cell_has_no_type() {
        let mut wb = Workbook::new();
        wb.active_sheet_mut()
            .set_cell_border_style("B2", BorderSide::Left, BorderStyle::Thin)
            .unwrap();
        let xml = render(&mut wb, 0, false);
        assert!(xml.contains(r#"<c r="B2" s="1"/>"#), "{xml}");
        assert!(xml.contains(r#"<sheetView workbookViewId="0">"#));
    }

    #[test]
    fn test_merge_cells_in_order() {
        let mut wb = Workbook::new();
        wb.active_sheet_mut()
            .merge_cells("C3:D4")
            .unwrap()
            .merge_cells("A1:B1")
            .unwrap();
        let xml = render(&mut wb, 0, true);
        assert!(xml.contains(
            r#"<mergeCells count="2"><mergeCell ref="C3:D4"/><mergeCell ref="A1:B1"/></mergeCells>"#
        ));
    }
}
