//! Fluent style selections.
//!
//! ```text
//! ws.select_cell("B2")?.select_font().select_color().apply_color("FFFF0000")?;
//! ws.select_cell("B2")?.select_borders().select_top().apply_border_style(BorderStyle::Thin);
//! ```
//!
//! Each handle remembers the cell it was created from and holds the
//! worksheet borrow, so selections cannot leak onto another cell.

use crate::cell_ref::CellCoord;
use crate::error::Result;
use crate::sheet::Worksheet;
use crate::types::{Argb, BorderSide, BorderStyle, PatternType};

/// One selected cell.
pub struct CellSelection<'a> {
    sheet: Worksheet<'a>,
    coord: CellCoord,
}

impl<'a> CellSelection<'a> {
    pub(crate) fn new(sheet: Worksheet<'a>, coord: CellCoord) -> Self {
        Self { sheet, coord }
    }

    pub fn coord(&self) -> CellCoord {
        self.coord
    }

    pub fn select_font(self) -> FontSelection<'a> {
        FontSelection { cell: self }
    }

    pub fn select_fill(self) -> FillSelection<'a> {
        FillSelection { cell: self }
    }

    pub fn select_borders(self) -> BordersSelection<'a> {
        BordersSelection { cell: self }
    }
}

pub struct FontSelection<'a> {
    cell: CellSelection<'a>,
}

impl<'a> FontSelection<'a> {
    pub fn select_color(self) -> ColorSelection<'a> {
        ColorSelection {
            cell: self.cell,
            target: ColorTarget::Font,
        }
    }
}

pub struct FillSelection<'a> {
    cell: CellSelection<'a>,
}

impl<'a> FillSelection<'a> {
    /// Foreground color of the fill pattern.
    pub fn select_start_color(self) -> ColorSelection<'a> {
        ColorSelection {
            cell: self.cell,
            target: ColorTarget::FillStart,
        }
    }

    /// Background color of the fill pattern.
    pub fn select_end_color(self) -> ColorSelection<'a> {
        ColorSelection {
            cell: self.cell,
            target: ColorTarget::FillEnd,
        }
    }

    pub fn set_fill_type(mut self, pattern: PatternType) {
        let coord = self.cell.coord;
        self.cell.sheet.apply_fill_type(coord, pattern);
    }
}

pub struct BordersSelection<'a> {
    cell: CellSelection<'a>,
}

impl<'a> BordersSelection<'a> {
    pub fn select_top(self) -> BorderSideSelection<'a> {
        self.select_side(BorderSide::Top)
    }

    pub fn select_bottom(self) -> BorderSideSelection<'a> {
        self.select_side(BorderSide::Bottom)
    }

    pub fn select_left(self) -> BorderSideSelection<'a> {
        self.select_side(BorderSide::Left)
    }

    pub fn select_right(self) -> BorderSideSelection<'a> {
        self.select_side(BorderSide::Right)
    }

    pub fn select_side(self, side: BorderSide) -> BorderSideSelection<'a> {
        BorderSideSelection {
            cell: self.cell,
            side,
        }
    }
}

pub struct BorderSideSelection<'a> {
    cell: CellSelection<'a>,
    side: BorderSide,
}

impl BorderSideSelection<'_> {
    pub fn side(&self) -> BorderSide {
        self.side
    }

    /// First write wins: a side that already has a style is left alone.
    pub fn apply_border_style(mut self, style: BorderStyle) {
        let coord = self.cell.coord;
        self.cell.sheet.apply_border_style(coord, self.side, style);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorTarget {
    Font,
    FillStart,
    FillEnd,
}

pub struct ColorSelection<'a> {
    cell: CellSelection<'a>,
    target: ColorTarget,
}

impl ColorSelection<'_> {
    /// Parse `argb` and apply it to whatever this selection points at.
    pub fn apply_color(mut self, argb: &str) -> Result<()> {
        let color: Argb = argb.parse()?;
        let coord = self.cell.coord;
        let sheet = &mut self.cell.sheet;
        match self.target {
            ColorTarget::Font => sheet.apply_font_color(coord, color),
            ColorTarget::FillStart => sheet.apply_fill_colors(coord, Some(color), None),
            ColorTarget::FillEnd => sheet.apply_fill_colors(coord, None, Some(color)),
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use crate::types::{BorderStyle, FontSize, PatternType};
    use crate::Workbook;

    #[test]
    fn test_font_color_through_selection() {
        let mut wb = Workbook::new();
        let mut ws = wb.active_sheet_mut();
        ws.select_cell("C3")
            .unwrap()
            .select_font()
            .select_color()
            .apply_color("FF0000FF")
            .unwrap();
        let font = ws.cell("C3").unwrap().unwrap().font.clone().unwrap();
        assert_eq!(font.color.unwrap().as_str(), "FF0000FF");
        assert_eq!(font.size, Some(FontSize::points(11)));
        assert_eq!(font.name.as_deref(), Some("Calibri"));
    }

    #[test]
    fn test_fill_colors_and_type_through_selection() {
        let mut wb = Workbook::new();
        let mut ws = wb.active_sheet_mut();
        ws.select_cell_by_column_and_row(2, 2)
            .unwrap()
            .select_fill()
            .select_start_color()
            .apply_color("FFFFFF00")
            .unwrap();
        ws.select_cell("B2")
            .unwrap()
            .select_fill()
            .select_end_color()
            .apply_color("FF00FF00")
            .unwrap();
        ws.select_cell("B2")
            .unwrap()
            .select_fill()
            .set_fill_type(PatternType::DarkGrid);

        let fill = ws.cell("B2").unwrap().unwrap().fill.clone().unwrap();
        assert_eq!(fill.fg_color.unwrap().as_str(), "FFFFFF00");
        assert_eq!(fill.bg_color.unwrap().as_str(), "FF00FF00");
        assert_eq!(fill.pattern, Some(PatternType::DarkGrid));
    }

    #[test]
    fn test_border_sides_through_selection() {
        let mut wb = Workbook::new();
        let mut ws = wb.active_sheet_mut();
        ws.select_cell("A1")
            .unwrap()
            .select_borders()
            .select_bottom()
            .apply_border_style(BorderStyle::Medium);
        ws.select_cell("A1")
            .unwrap()
            .select_borders()
            .select_bottom()
            .apply_border_style(BorderStyle::Thin);
        ws.select_cell("A1")
            .unwrap()
            .select_borders()
            .select_right()
            .apply_border_style(BorderStyle::Dotted);

        let border = ws.cell("A1").unwrap().unwrap().border.clone().unwrap();
        assert_eq!(border.bottom.map(|l| l.style), Some(BorderStyle::Medium));
        assert_eq!(border.right.map(|l| l.style), Some(BorderStyle::Dotted));
        assert!(border.top.is_none());
    }

    #[test]
    fn test_selection_stays_on_its_cell() {
        let mut wb = Workbook::new();
        let mut ws = wb.active_sheet_mut();
        ws.select_cell("A1")
            .unwrap()
            .select_font()
            .select_color()
            .apply_color("FFFF0000")
            .unwrap();
        ws.select_cell("B1")
            .unwrap()
            .select_fill()
            .set_fill_type(PatternType::Solid);
        assert!(ws.cell("A1").unwrap().unwrap().fill.is_none());
        assert!(ws.cell("B1").unwrap().unwrap().font.is_none());
    }

    #[test]
    fn test_bad_reference_fails_before_selection() {
        let mut wb = Workbook::new();
        let mut ws = wb.active_sheet_mut();
        assert!(ws.select_cell("A0").is_err());
        assert!(ws.select_cell_by_column_and_row(0, 1).is_err());
        assert!(ws.is_empty());
    }

    #[test]
    fn test_bad_color_leaves_cell_untouched() {
        let mut wb = Workbook::new();
        let mut ws = wb.active_sheet_mut();
        let result = ws
            .select_cell("D4")
            .unwrap()
            .select_font()
            .select_color()
            .apply_color("red");
        assert!(result.is_err());
        assert!(ws.cell("D4").unwrap().is_none());
    }
}
