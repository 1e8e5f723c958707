//! Style registry behind xl/styles.xml
//!
//! Fonts, fills, borders and cell formats (xf) are interned into four
//! independent tables. An id is the position of the first equal value, so
//! ids are dense, assigned in first-seen order and never change. Worksheets
//! must be resolved against the registry before `styles.xml` is rendered.

use indexmap::IndexSet;

use crate::types::{BorderAttributes, FillAttributes, FontAttributes, PatternType};

/// Composite cell format referencing one font, one fill and one border.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellFormat {
    pub font_id: usize,
    pub fill_id: usize,
    pub border_id: usize,
}

/// Interning tables for every style family.
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    fonts: IndexSet<FontAttributes>,
    fills: IndexSet<FillAttributes>,
    borders: IndexSet<BorderAttributes>,
    cell_formats: IndexSet<CellFormat>,
}

impl StyleRegistry {
    /// Registry seeded with the entries every package needs: the default
    /// font, the `none` and `gray125` fills, an empty border and format 0.
    pub fn new(default_font: FontAttributes) -> Self {
        let mut registry = Self {
            fonts: IndexSet::new(),
            fills: IndexSet::new(),
            borders: IndexSet::new(),
            cell_formats: IndexSet::new(),
        };
        registry.fonts.insert(default_font);
        registry.fills.insert(FillAttributes {
            pattern: Some(PatternType::None),
            ..FillAttributes::default()
        });
        registry.fills.insert(FillAttributes {
            pattern: Some(PatternType::Gray125),
            ..FillAttributes::default()
        });
        registry.borders.insert(BorderAttributes::default());
        registry.cell_formats.insert(CellFormat::default());
        registry
    }

    pub fn intern_font(&mut self, font: &FontAttributes) -> usize {
        intern(&mut self.fonts, font)
    }

    /// Fills are keyed by their normalized form, so a colors-only fill and
    /// the same fill marked `solid` share an id.
    pub fn intern_fill(&mut self, fill: &FillAttributes) -> usize {
        intern(&mut self.fills, &fill.normalized())
    }

    pub fn intern_border(&mut self, border: &BorderAttributes) -> usize {
        intern(&mut self.borders, border)
    }

    /// Intern the format for a font/fill/border triple; unset parts use entry 0.
    pub fn intern_cell_format(
        &mut self,
        font_id: Option<usize>,
        fill_id: Option<usize>,
        border_id: Option<usize>,
    ) -> usize {
        let format = CellFormat {
            font_id: font_id.unwrap_or(0),
            fill_id: fill_id.unwrap_or(0),
            border_id: border_id.unwrap_or(0),
        };
        intern(&mut self.cell_formats, &format)
    }

    /// Resolve a cell's style bundles to a cell format id.
    ///
    /// Returns `None` for a cell with no bundles at all, which is written
    /// without an `s` attribute.
    pub fn resolve(
        &mut self,
        font: Option<&FontAttributes>,
        fill: Option<&FillAttributes>,
        border: Option<&BorderAttributes>,
    ) -> Option<usize> {
        if font.is_none() && fill.is_none() && border.is_none() {
            return None;
        }
        let font_id = font.map(|f| self.intern_font(f));
        let fill_id = fill.map(|f| self.intern_fill(f));
        let border_id = border.map(|b| self.intern_border(b));
        Some(self.intern_cell_format(font_id, fill_id, border_id))
    }

    pub fn fonts(&self) -> impl ExactSizeIterator<Item = &FontAttributes> {
        self.fonts.iter()
    }

    pub fn fills(&self) -> impl ExactSizeIterator<Item = &FillAttributes> {
        self.fills.iter()
    }

    pub fn borders(&self) -> impl ExactSizeIterator<Item = &BorderAttributes> {
        self.borders.iter()
    }

    pub fn cell_formats(&self) -> impl ExactSizeIterator<Item = &CellFormat> {
        self.cell_formats.iter()
    }

    pub fn cell_format(&self, id: usize) -> Option<&CellFormat> {
        self.cell_formats.get_index(id)
    }

    pub fn font(&self, id: usize) -> Option<&FontAttributes> {
        self.fonts.get_index(id)
    }

    pub fn fill(&self, id: usize) -> Option<&FillAttributes> {
        self.fills.get_index(id)
    }

    pub fn border(&self, id: usize) -> Option<&BorderAttributes> {
        self.borders.get_index(id)
    }
}

fn intern<T: Clone + Eq + std::hash::Hash>(table: &mut IndexSet<T>, value: &T) -> usize {
    if let Some(id) = table.get_index_of(value) {
        return id;
    }
    table.insert_full(value.clone()).0
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
    use crate::options::DefaultFont;
    use crate::types::{BorderLine, BorderSide, BorderStyle};

    fn registry() -> StyleRegistry {
        StyleRegistry::new(DefaultFont::default().attributes())
    }

    fn red_font() -> FontAttributes {
        FontAttributes {
            color: Some("FFFF0000".parse().unwrap()),
            ..FontAttributes::default()
        }
    }

    #[test]
    fn test_seed_state() {
        let reg = registry();
        assert_eq!(reg.fonts().len(), 1);
        assert_eq!(reg.fills().len(), 2);
        assert_eq!(reg.borders().len(), 1);
        assert_eq!(reg.cell_formats().len(), 1);
        assert_eq!(reg.fill(1).and_then(|f| f.pattern), Some(PatternType::Gray125));
        assert_eq!(reg.cell_format(0), Some(&CellFormat::default()));
    }

    #[test]
    fn test_intern_font_idempotent_and_sequential() {
        let mut reg = registry();
        let red = reg.intern_font(&red_font());
        assert_eq!(red, 1);
        assert_eq!(reg.intern_font(&red_font()), 1);

        let blue = FontAttributes {
            color: Some("FF0000FF".parse().unwrap()),
            ..FontAttributes::default()
        };
        assert_eq!(reg.intern_font(&blue), 2);
        assert_eq!(reg.fonts().len(), 3);
    }

    #[test]
    fn test_default_equal_font_reuses_seed() {
        let mut reg = registry();
        assert_eq!(reg.intern_font(&DefaultFont::default().attributes()), 0);
    }

    #[test]
    fn test_fill_and_border_have_independent_ids() {
        let mut reg = registry();
        let fill = FillAttributes {
            pattern: Some(PatternType::Solid),
            fg_color: Some("FFFFFF00".parse().unwrap()),
            bg_color: None,
        };
        let mut border = BorderAttributes::default();
        border.set_side_if_unset(
            BorderSide::Top,
            BorderLine {
                style: BorderStyle::Thin,
                color: None,
            },
        );
        assert_eq!(reg.intern_fill(&fill), 2);
        assert_eq!(reg.intern_border(&border), 1);
        assert_eq!(reg.intern_fill(&fill), 2);
        assert_eq!(reg.intern_border(&border), 1);
    }

    #[test]
    fn test_equivalent_fills_share_an_id() {
        let mut reg = registry();
        let colors_only = FillAttributes {
            fg_color: Some("FFFF0000".parse().unwrap()),
            ..FillAttributes::default()
        };
        let solid = FillAttributes {
            pattern: Some(PatternType::Solid),
            ..colors_only.clone()
        };
        assert_eq!(reg.intern_fill(&colors_only), 2);
        assert_eq!(reg.intern_fill(&solid), 2);
        assert_eq!(reg.intern_fill(&FillAttributes::default()), 0);
        assert_eq!(reg.fills().len(), 3);
    }

    #[test]
    fn test_cell_format_composite() {
        let mut reg = registry();
        assert_eq!(reg.intern_cell_format(None, None, None), 0);
        assert_eq!(reg.intern_cell_format(Some(1), None, None), 1);
        assert_eq!(reg.intern_cell_format(Some(1), Some(0), Some(0)), 1);
        assert_eq!(reg.intern_cell_format(None, Some(2), None), 2);
        assert_eq!(
            reg.cell_format(2),
            Some(&CellFormat {
                font_id: 0,
                fill_id: 2,
                border_id: 0
            })
        );
    }

    #[test]
    fn test_resolve_unstyled_is_none() {
        let mut reg = registry();
        assert_eq!(reg.resolve(None, None, None), None);
        assert_eq!(reg.cell_formats().len(), 1);
    }

    #[test]
    fn test_resolve_styled_cell() {
        let mut reg = registry();
        let font = red_font();
        let id = reg.resolve(Some(&font), None, None).unwrap();
        assert_eq!(id, 1);
        assert_eq!(reg.cell_format(id).map(|f| f.font_id), Some(1));
        assert_eq!(reg.resolve(Some(&font), None, None), Some(1));
    }

    #[test]
    fn test_iteration_order_is_insertion_order() {
        let mut reg = registry();
        let sizes = ["14", "9", "12"];
        for s in sizes {
            reg.intern_font(&FontAttributes {
                size: Some(s.parse().unwrap()),
                ..FontAttributes::default()
            });
        }
        let emitted: Vec<String> = reg
            .fonts()
            .skip(1)
            .filter_map(|f| f.size.map(|s| s.to_string()))
            .collect();
        assert_eq!(emitted, sizes);
    }
}
