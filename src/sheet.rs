//! Sheet model and its mutation handle.
//!
//! A [`Sheet`] owns the sparse cell map of one tab. Mutation goes through a
//! [`Worksheet`], which borrows the sheet together with the workbook's shared
//! string table and default font so that text is interned as it is written.

use std::collections::BTreeMap;
use std::ops::Deref;

use crate::cell_ref::{parse_cell_range, parse_cell_ref, CellCoord};
use crate::error::Result;
use crate::options::DefaultFont;
use crate::selection::CellSelection;
use crate::shared_strings::SharedStringTable;
use crate::types::{
    Argb, BorderAttributes, BorderLine, BorderSide, BorderStyle, CellContent, CellRecord,
    FillAttributes, FontAttributes, FontSize, PatternType,
};

/// Bounding box of every coordinate a sheet mutation has touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimension {
    pub min: CellCoord,
    pub max: CellCoord,
}

impl Dimension {
    fn at(coord: CellCoord) -> Self {
        Self {
            min: coord,
            max: coord,
        }
    }

    fn include(&mut self, coord: CellCoord) {
        self.min.col = self.min.col.min(coord.col);
        self.min.row = self.min.row.min(coord.row);
        self.max.col = self.max.col.max(coord.col);
        self.max.row = self.max.row.max(coord.row);
    }

    /// The `<dimension ref>` value, e.g. `A1:D5`, or `B2` for a single cell.
    pub fn reference(&self) -> String {
        if self.min == self.max {
            self.min.to_string()
        } else {
            format!("{}:{}", self.min, self.max)
        }
    }
}

/// One worksheet tab.
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    /// row → column → cell
    cells: BTreeMap<u32, BTreeMap<u32, CellRecord>>,
    dimension: Option<Dimension>,
    merge_ranges: Vec<String>,
}

impl Sheet {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            cells: BTreeMap::new(),
            dimension: None,
            merge_ranges: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `None` until the first mutation.
    pub fn dimension(&self) -> Option<Dimension> {
        self.dimension
    }

    /// Look up a cell by reference such as `"B7"`.
    pub fn cell(&self, cell_ref: &str) -> Result<Option<&CellRecord>> {
        let coord = parse_cell_ref(cell_ref)?;
        Ok(self.cell_at(coord))
    }

    pub fn cell_at(&self, coord: CellCoord) -> Option<&CellRecord> {
        self.cells.get(&coord.row)?.get(&coord.col)
    }

    /// Rows in ascending order, each with its cells in ascending column order.
    pub fn rows(&self) -> impl Iterator<Item = (u32, &BTreeMap<u32, CellRecord>)> {
        self.cells.iter().map(|(row, cols)| (*row, cols))
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, &CellRecord)> {
        self.cells.iter().flat_map(|(&row, cols)| {
            cols.iter()
                .map(move |(&col, cell)| (CellCoord { col, row }, cell))
        })
    }

    pub fn cell_count(&self) -> usize {
        self.cells.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Merge ranges in the order they were added.
    pub fn merge_ranges(&self) -> &[String] {
        &self.merge_ranges
    }

    /// Get or create the cell at `coord`, growing the dimension to cover it.
    fn touch(&mut self, coord: CellCoord) -> &mut CellRecord {
        match &mut self.dimension {
            Some(dim) => dim.include(coord),
            None => self.dimension = Some(Dimension::at(coord)),
        }
        self.cells
            .entry(coord.row)
            .or_default()
            .entry(coord.col)
            .or_default()
    }
}

/// Mutable view of a sheet, handed out by the workbook.
pub struct Worksheet<'a> {
    sheet: &'a mut Sheet,
    strings: &'a mut SharedStringTable,
    default_font: &'a DefaultFont,
}

impl Deref for Worksheet<'_> {
    type Target = Sheet;

    fn deref(&self) -> &Self::Target {
        self.sheet
    }
}

impl<'a> Worksheet<'a> {
    pub(crate) fn new(
        sheet: &'a mut Sheet,
        strings: &'a mut SharedStringTable,
        default_font: &'a DefaultFont,
    ) -> Self {
        Self {
            sheet,
            strings,
            default_font,
        }
    }

    /// Shorter-lived handle over the same sheet, used by selections.
    pub(crate) fn reborrow(&mut self) -> Worksheet<'_> {
        Worksheet {
            sheet: self.sheet,
            strings: self.strings,
            default_font: self.default_font,
        }
    }

    /// Set a cell's value. Text starting with `=` is stored as a formula.
    pub fn set_cell_value(&mut self, cell_ref: &str, value: &str) -> Result<&mut Self> {
        let coord = parse_cell_ref(cell_ref)?;
        self.write_value(coord, value);
        Ok(self)
    }

    pub fn set_cell_value_by_column_and_row(
        &mut self,
        col: u32,
        row: u32,
        value: &str,
    ) -> Result<&mut Self> {
        let coord = CellCoord::new(col, row)?;
        self.write_value(coord, value);
        Ok(self)
    }

    fn write_value(&mut self, coord: CellCoord, value: &str) {
        let content = match value.strip_prefix('=') {
            Some(formula) => CellContent::Formula(formula.to_string()),
            None => CellContent::SharedString(self.strings.intern(value)),
        };
        self.sheet.touch(coord).content = Some(content);
    }

    /// Set the font color, filling in the default size and name if unset.
    pub fn set_cell_color(&mut self, cell_ref: &str, argb: &str) -> Result<&mut Self> {
        let coord = parse_cell_ref(cell_ref)?;
        let color: Argb = argb.parse()?;
        self.apply_font_color(coord, color);
        Ok(self)
    }

    pub fn set_cell_color_by_column_and_row(
        &mut self,
        col: u32,
        row: u32,
        argb: &str,
    ) -> Result<&mut Self> {
        let coord = CellCoord::new(col, row)?;
        let color: Argb = argb.parse()?;
        self.apply_font_color(coord, color);
        Ok(self)
    }

    pub fn set_cell_font_size(&mut self, cell_ref: &str, size: &str) -> Result<&mut Self> {
        let coord = parse_cell_ref(cell_ref)?;
        let size: FontSize = size.parse()?;
        self.font_mut(coord).size = Some(size);
        Ok(self)
    }

    pub fn set_cell_font_name(&mut self, cell_ref: &str, name: &str) -> Result<&mut Self> {
        let coord = parse_cell_ref(cell_ref)?;
        self.font_mut(coord).name = Some(name.to_string());
        Ok(self)
    }

    pub fn set_cell_font_size_by_column_and_row(
        &mut self,
        col: u32,
        row: u32,
        size: &str,
    ) -> Result<&mut Self> {
        let coord = CellCoord::new(col, row)?;
        let size: FontSize = size.parse()?;
        self.font_mut(coord).size = Some(size);
        Ok(self)
    }

    pub fn set_cell_font_name_by_column_and_row(
        &mut self,
        col: u32,
        row: u32,
        name: &str,
    ) -> Result<&mut Self> {
        let coord = CellCoord::new(col, row)?;
        self.font_mut(coord).name = Some(name.to_string());
        Ok(self)
    }

    /// Set one border side. A side that already has a style keeps it.
    pub fn set_cell_border_style(
        &mut self,
        cell_ref: &str,
        side: BorderSide,
        style: BorderStyle,
    ) -> Result<&mut Self> {
        let coord = parse_cell_ref(cell_ref)?;
        self.apply_border_style(coord, side, style);
        Ok(self)
    }

    pub fn set_cell_border_style_by_column_and_row(
        &mut self,
        col: u32,
        row: u32,
        side: BorderSide,
        style: BorderStyle,
    ) -> Result<&mut Self> {
        let coord = CellCoord::new(col, row)?;
        self.apply_border_style(coord, side, style);
        Ok(self)
    }

    /// Set the fill foreground color and, if given, the background color.
    pub fn set_cell_fill_color(
        &mut self,
        cell_ref: &str,
        start: &str,
        end: Option<&str>,
    ) -> Result<&mut Self> {
        let coord = parse_cell_ref(cell_ref)?;
        let (start, end) = parse_fill_colors(start, end)?;
        self.apply_fill_colors(coord, Some(start), end);
        Ok(self)
    }

    pub fn set_cell_fill_color_by_column_and_row(
        &mut self,
        col: u32,
        row: u32,
        start: &str,
        end: Option<&str>,
    ) -> Result<&mut Self> {
        let coord = CellCoord::new(col, row)?;
        let (start, end) = parse_fill_colors(start, end)?;
        self.apply_fill_colors(coord, Some(start), end);
        Ok(self)
    }

    pub fn set_cell_fill_type(&mut self, cell_ref: &str, pattern: PatternType) -> Result<&mut Self> {
        let coord = parse_cell_ref(cell_ref)?;
        self.apply_fill_type(coord, pattern);
        Ok(self)
    }

    pub fn set_cell_fill_type_by_column_and_row(
        &mut self,
        col: u32,
        row: u32,
        pattern: PatternType,
    ) -> Result<&mut Self> {
        let coord = CellCoord::new(col, row)?;
        self.apply_fill_type(coord, pattern);
        Ok(self)
    }

    /// Append a merge range such as `"A1:C1"`. Overlaps are not checked.
    pub fn merge_cells(&mut self, range: &str) -> Result<&mut Self> {
        let (start, end) = parse_cell_range(range)?;
        self.sheet.merge_ranges.push(format!("{start}:{end}"));
        Ok(self)
    }

    pub fn merge_cells_by_column_and_row(
        &mut self,
        col1: u32,
        row1: u32,
        col2: u32,
        row2: u32,
    ) -> Result<&mut Self> {
        let start = CellCoord::new(col1, row1)?;
        let end = CellCoord::new(col2, row2)?;
        self.sheet.merge_ranges.push(format!("{start}:{end}"));
        Ok(self)
    }

    /// Start a selection on one cell; see [`CellSelection`].
    pub fn select_cell(&mut self, cell_ref: &str) -> Result<CellSelection<'_>> {
        let coord = parse_cell_ref(cell_ref)?;
        Ok(CellSelection::new(self.reborrow(), coord))
    }

    pub fn select_cell_by_column_and_row(&mut self, col: u32, row: u32) -> Result<CellSelection<'_>> {
        let coord = CellCoord::new(col, row)?;
        Ok(CellSelection::new(self.reborrow(), coord))
    }

    fn font_mut(&mut self, coord: CellCoord) -> &mut FontAttributes {
        self.sheet
            .touch(coord)
            .font
            .get_or_insert_with(FontAttributes::default)
    }

    fn fill_mut(&mut self, coord: CellCoord) -> &mut FillAttributes {
        self.sheet
            .touch(coord)
            .fill
            .get_or_insert_with(FillAttributes::default)
    }

    pub(crate) fn apply_font_color(&mut self, coord: CellCoord, color: Argb) {
        let size = self.default_font.size;
        let name = self.default_font.name.clone();
        let font = self.font_mut(coord);
        font.size.get_or_insert(size);
        font.color = Some(color);
        font.name.get_or_insert(name);
    }

    pub(crate) fn apply_fill_colors(
        &mut self,
        coord: CellCoord,
        start: Option<Argb>,
        end: Option<Argb>,
    ) {
        let fill = self.fill_mut(coord);
        if let Some(start) = start {
            fill.fg_color = Some(start);
        }
        if let Some(end) = end {
            fill.bg_color = Some(end);
        }
    }

    pub(crate) fn apply_fill_type(&mut self, coord: CellCoord, pattern: PatternType) {
        self.fill_mut(coord).pattern = Some(pattern);
    }

    pub(crate) fn apply_border_style(&mut self, coord: CellCoord, side: BorderSide, style: BorderStyle) {
        let written = self
            .sheet
            .touch(coord)
            .border
            .get_or_insert_with(BorderAttributes::default)
            .set_side_if_unset(side, BorderLine { style, color: None });
        if !written {
            log::trace!(
                "{}!{coord}: keeping existing {} border",
                self.sheet.name,
                side.as_str()
            );
        }
    }
}

fn parse_fill_colors(start: &str, end: Option<&str>) -> Result<(Argb, Option<Argb>)> {
    let start: Argb = start.parse()?;
    let end = end.map(str::parse::<Argb>).transpose()?;
    Ok((start, end))
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
    use crate::error::XlwriteError;

    struct Fixture {
        sheet: Sheet,
        strings: SharedStringTable,
        font: DefaultFont,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                sheet: Sheet::new("Sheet1".to_string()),
                strings: SharedStringTable::new(),
                font: DefaultFont::default(),
            }
        }

        fn ws(&mut self) -> Worksheet<'_> {
            Worksheet::new(&mut self.sheet, &mut self.strings, &self.font)
        }
    }

    #[test]
    fn test_value_and_formula_are_exclusive() {
        let mut fx = Fixture::new();
        fx.ws().set_cell_value("A1", "=SUM(A2:A3)").unwrap();
        let cell = fx.sheet.cell("A1").unwrap().unwrap();
        assert_eq!(cell.formula(), Some("SUM(A2:A3)"));
        assert_eq!(cell.shared_string_index(), None);

        fx.ws().set_cell_value("A1", "5").unwrap();
        let cell = fx.sheet.cell("A1").unwrap().unwrap();
        assert_eq!(cell.formula(), None);
        assert_eq!(cell.shared_string_index(), Some(0));
        assert_eq!(fx.strings.get(0), Some("5"));
    }

    #[test]
    fn test_same_text_shares_one_entry() {
        let mut fx = Fixture::new();
        fx.ws()
            .set_cell_value("A1", "dup")
            .unwrap()
            .set_cell_value("C4", "dup")
            .unwrap();
        assert_eq!(fx.strings.len(), 1);
        let a1 = fx.sheet.cell("A1").unwrap().unwrap().shared_string_index();
        let c4 = fx.sheet.cell("C4").unwrap().unwrap().shared_string_index();
        assert_eq!(a1, c4);
    }

    #[test]
    fn test_dimension_tracks_bounding_box() {
        let mut fx = Fixture::new();
        assert_eq!(fx.sheet.dimension(), None);
        fx.ws()
            .set_cell_value("B2", "x")
            .unwrap()
            .set_cell_value("D5", "y")
            .unwrap()
            .set_cell_value("A1", "z")
            .unwrap();
        let dim = fx.sheet.dimension().unwrap();
        assert_eq!(dim.min, CellCoord { col: 1, row: 1 });
        assert_eq!(dim.max, CellCoord { col: 4, row: 5 });
        assert_eq!(dim.reference(), "A1:D5");
    }

    #[test]
    fn test_style_mutations_grow_dimension() {
        let mut fx = Fixture::new();
        fx.ws().set_cell_value("B2", "x").unwrap();
        fx.ws()
            .set_cell_border_style("F9", BorderSide::Top, BorderStyle::Thin)
            .unwrap();
        assert_eq!(fx.sheet.dimension().unwrap().reference(), "B2:F9");
        let styled = fx.sheet.cell("F9").unwrap().unwrap();
        assert!(styled.content.is_none());
        assert!(styled.is_styled());
    }

    #[test]
    fn test_border_no_clobber() {
        let mut fx = Fixture::new();
        fx.ws()
            .set_cell_border_style("A1", BorderSide::Top, BorderStyle::Thin)
            .unwrap()
            .set_cell_border_style("A1", BorderSide::Top, BorderStyle::Thick)
            .unwrap()
            .set_cell_border_style("A1", BorderSide::Left, BorderStyle::Double)
            .unwrap();
        let border = fx.sheet.cell("A1").unwrap().unwrap().border.clone().unwrap();
        assert_eq!(border.top.map(|l| l.style), Some(BorderStyle::Thin));
        assert_eq!(border.left.map(|l| l.style), Some(BorderStyle::Double));
        assert!(border.bottom.is_none());
    }

    #[test]
    fn test_color_fills_default_font() {
        let mut fx = Fixture::new();
        fx.ws().set_cell_color("A1", "FFFF0000").unwrap();
        let font = fx.sheet.cell("A1").unwrap().unwrap().font.clone().unwrap();
        assert_eq!(font.size, Some(FontSize::points(11)));
        assert_eq!(font.name.as_deref(), Some("Calibri"));
        assert_eq!(font.color.map(|c| c.to_string()).as_deref(), Some("FFFF0000"));
    }

    #[test]
    fn test_color_keeps_explicit_size() {
        let mut fx = Fixture::new();
        fx.ws()
            .set_cell_font_size("A1", "14")
            .unwrap()
            .set_cell_color("A1", "00FF00")
            .unwrap();
        let font = fx.sheet.cell("A1").unwrap().unwrap().font.clone().unwrap();
        assert_eq!(font.size, Some(FontSize::points(14)));
        assert_eq!(font.color.map(|c| c.to_string()).as_deref(), Some("FF00FF00"));
    }

    #[test]
    fn test_font_size_alone_does_not_fill_defaults() {
        let mut fx = Fixture::new();
        fx.ws().set_cell_font_size("A1", "9").unwrap();
        let font = fx.sheet.cell("A1").unwrap().unwrap().font.clone().unwrap();
        assert!(font.name.is_none());
        assert!(font.color.is_none());
    }

    #[test]
    fn test_fill_color_and_type() {
        let mut fx = Fixture::new();
        fx.ws()
            .set_cell_fill_color("B3", "FFFFFF00", Some("FF000000"))
            .unwrap()
            .set_cell_fill_type("B3", PatternType::Solid)
            .unwrap();
        let fill = fx.sheet.cell("B3").unwrap().unwrap().fill.clone().unwrap();
        assert_eq!(fill.pattern, Some(PatternType::Solid));
        assert_eq!(fill.fg_color.map(|c| c.to_string()).as_deref(), Some("FFFFFF00"));
        assert_eq!(fill.bg_color.map(|c| c.to_string()).as_deref(), Some("FF000000"));
    }

    #[test]
    fn test_malformed_reference_changes_nothing() {
        let mut fx = Fixture::new();
        let err = fx.ws().set_cell_value("1A", "x").err();
        assert!(matches!(err, Some(XlwriteError::MalformedReference(_))));
        assert!(fx.strings.is_empty());
        assert!(fx.sheet.is_empty());
        assert_eq!(fx.sheet.dimension(), None);
    }

    #[test]
    fn test_bad_color_changes_nothing() {
        let mut fx = Fixture::new();
        assert!(fx.ws().set_cell_color("A1", "nope").is_err());
        assert!(fx.sheet.is_empty());
    }

    #[test]
    fn test_merge_ranges_keep_order_and_duplicates() {
        let mut fx = Fixture::new();
        fx.ws()
            .merge_cells("A1:B2")
            .unwrap()
            .merge_cells_by_column_and_row(3, 1, 4, 1)
            .unwrap()
            .merge_cells("a1:b2")
            .unwrap();
        assert_eq!(fx.sheet.merge_ranges(), ["A1:B2", "C1:D1", "A1:B2"]);
        assert!(fx.ws().merge_cells("A1-B2").is_err());
    }

    #[test]
    fn test_cells_iterate_row_major() {
        let mut fx = Fixture::new();
        for r in ["C2", "A2", "B1", "A10", "AA1"] {
            fx.ws().set_cell_value(r, r).unwrap();
        }
        let order: Vec<String> = fx.sheet.cells().map(|(c, _)| c.to_string()).collect();
        assert_eq!(order, ["B1", "AA1", "A2", "C2", "A10"]);
        assert_eq!(fx.sheet.cell_count(), 5);
    }
}
