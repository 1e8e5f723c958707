//! The workbook: ordered sheets, the shared string table and the style
//! registry, plus saving to an `.xlsx` package.

use std::io::{Cursor, Seek, Write};
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::{Result, XlwriteError};
use crate::export::{self, zip_writer, PackageSource, Part};
use crate::options::WorkbookOptions;
use crate::shared_strings::SharedStringTable;
use crate::sheet::{Sheet, Worksheet};
use crate::styles::StyleRegistry;

/// Longest sheet name Excel accepts.
pub const MAX_SHEET_NAME_LEN: usize = 31;

const FORBIDDEN_NAME_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// An in-memory workbook. Always holds at least one sheet.
#[derive(Debug, Clone)]
pub struct Workbook {
    sheets: Vec<Sheet>,
    active: usize,
    styles: StyleRegistry,
    shared_strings: SharedStringTable,
    options: WorkbookOptions,
    created: DateTime<Utc>,
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

impl Workbook {
    /// A workbook with one empty sheet named `Sheet1`.
    pub fn new() -> Self {
        Self::with_options(WorkbookOptions::default())
    }

    pub fn with_options(options: WorkbookOptions) -> Self {
        let styles = StyleRegistry::new(options.default_font.attributes());
        let created = options.created.unwrap_or_else(Utc::now);
        Self {
            sheets: vec![Sheet::new("Sheet1".to_string())],
            active: 0,
            styles,
            shared_strings: SharedStringTable::new(),
            options,
            created,
        }
    }

    pub fn options(&self) -> &WorkbookOptions {
        &self.options
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    pub fn shared_strings(&self) -> &SharedStringTable {
        &self.shared_strings
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn sheet_names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.sheets.iter().map(Sheet::name)
    }

    pub fn active_sheet_index(&self) -> usize {
        self.active
    }

    /// Append a sheet named `Sheet<N>` and make it active.
    pub fn create_sheet(&mut self) -> Worksheet<'_> {
        let mut n = self.sheets.len() + 1;
        let mut name = format!("Sheet{n}");
        while self.position_of(&name).is_some() {
            n += 1;
            name = format!("Sheet{n}");
        }
        self.sheets.push(Sheet::new(name));
        self.active = self.sheets.len() - 1;
        log::debug!("created sheet {} at index {}", n, self.active);
        self.worksheet_at(self.active)
    }

    /// Insert a named sheet at `index` (or append) and make it active.
    pub fn add_sheet(&mut self, name: &str, index: Option<usize>) -> Result<Worksheet<'_>> {
        let count = self.sheets.len();
        let index = index.unwrap_or(count);
        if index > count {
            return Err(XlwriteError::InvalidIndex { index, count });
        }
        self.validate_sheet_name(name)?;
        self.sheets.insert(index, Sheet::new(name.to_string()));
        self.active = index;
        log::debug!("added sheet {name:?} at index {index}");
        Ok(self.worksheet_at(index))
    }

    pub fn sheet(&self, index: usize) -> Result<&Sheet> {
        self.sheets.get(index).ok_or(XlwriteError::SheetNotFound(index))
    }

    pub fn sheet_mut(&mut self, index: usize) -> Result<Worksheet<'_>> {
        if index >= self.sheets.len() {
            return Err(XlwriteError::SheetNotFound(index));
        }
        Ok(self.worksheet_at(index))
    }

    /// Case-insensitive lookup, matching how Excel compares sheet names.
    pub fn sheet_by_name(&self, name: &str) -> Option<&Sheet> {
        self.position_of(name).and_then(|idx| self.sheets.get(idx))
    }

    // `active` is kept in range and the list is never empty
    #[allow(clippy::indexing_slicing)]
    pub fn active_sheet(&self) -> &Sheet {
        &self.sheets[self.active]
    }

    pub fn active_sheet_mut(&mut self) -> Worksheet<'_> {
        self.worksheet_at(self.active)
    }

    pub fn set_active_sheet_index(&mut self, index: usize) -> Result<()> {
        if index >= self.sheets.len() {
            return Err(XlwriteError::SheetNotFound(index));
        }
        self.active = index;
        Ok(())
    }

    /// Save to `path`, replacing it only once the package is fully written.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        log::debug!("saving {} sheet(s) to {}", self.sheets.len(), path.display());
        let parts = self.render()?;
        zip_writer::save_package(&parts, path, self.options.compression)?;
        log::debug!("saved {} parts to {}", parts.len(), path.display());
        Ok(())
    }

    /// Write the package to any seekable writer and hand the writer back.
    pub fn write_to<W: Write + Seek>(&mut self, writer: W) -> Result<W> {
        log::debug!("writing {} sheet(s) to stream", self.sheets.len());
        let parts = self.render()?;
        let writer = zip_writer::write_package(&parts, writer, self.options.compression)?;
        log::debug!("wrote {} parts", parts.len());
        Ok(writer)
    }

    /// The package as bytes.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        Ok(self.write_to(Cursor::new(Vec::new()))?.into_inner())
    }

    fn render(&mut self) -> Result<Vec<Part>> {
        export::render_package(PackageSource {
            sheets: &self.sheets,
            active: self.active,
            styles: &mut self.styles,
            strings: &self.shared_strings,
            options: &self.options,
            timestamp: self.created,
        })
    }

    /// Handle over one sheet. Callers check `index` first.
    #[allow(clippy::indexing_slicing)]
    fn worksheet_at(&mut self, index: usize) -> Worksheet<'_> {
        let Self {
            sheets,
            shared_strings,
            options,
            ..
        } = self;
        Worksheet::new(&mut sheets[index], shared_strings, &options.default_font)
    }

    #[cfg(test)]
    pub(crate) fn sheet_and_styles(&mut self, index: usize) -> Option<(&Sheet, &mut StyleRegistry)> {
        let sheet = self.sheets.get(index)?;
        Some((sheet, &mut self.styles))
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.sheets
            .iter()
            .position(|s| s.name().to_lowercase() == name.to_lowercase())
    }

    fn validate_sheet_name(&self, name: &str) -> Result<()> {
        let reject = |reason| {
            Err(XlwriteError::InvalidSheetName {
                name: name.to_string(),
                reason,
            })
        };
        if name.is_empty() {
            return reject("name is empty");
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return reject("name is longer than 31 characters");
        }
        if name.contains(FORBIDDEN_NAME_CHARS) {
            return reject("name contains one of [ ] : * ? / \\");
        }
        if name.starts_with('\'') || name.ends_with('\'') {
            return reject("name starts or ends with an apostrophe");
        }
        if self.position_of(name).is_some() {
            return reject("a sheet with this name already exists");
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
    use super::*;

    #[test]
    fn test_new_workbook() {
        let wb = Workbook::new();
        assert_eq!(wb.sheet_count(), 1);
        assert_eq!(wb.active_sheet_index(), 0);
        assert_eq!(wb.active_sheet().name(), "Sheet1");
        assert_eq!(wb.styles().fonts().len(), 1);
        assert!(wb.shared_strings().is_empty());
    }

    #[test]
    fn test_create_sheet_names_and_activates() {
        let mut wb = Workbook::new();
        assert_eq!(wb.create_sheet().name(), "Sheet2");
        assert_eq!(wb.active_sheet_index(), 1);
        wb.add_sheet("Sheet4", None).unwrap();
        assert_eq!(wb.create_sheet().name(), "Sheet5");
        assert_eq!(
            wb.sheet_names().collect::<Vec<_>>(),
            ["Sheet1", "Sheet2", "Sheet4", "Sheet5"]
        );
    }

    #[test]
    fn test_create_sheet_skips_taken_name() {
        let mut wb = Workbook::new();
        wb.add_sheet("sheet2", Some(0)).unwrap();
        assert_eq!(wb.create_sheet().name(), "Sheet3");
    }

    #[test]
    fn test_add_sheet_at_index() {
        let mut wb = Workbook::new();
        wb.add_sheet("Front", Some(0)).unwrap();
        assert_eq!(wb.active_sheet_index(), 0);
        assert_eq!(wb.sheet(1).unwrap().name(), "Sheet1");
        wb.add_sheet("Back", Some(2)).unwrap();
        assert_eq!(wb.active_sheet_index(), 2);
    }

    #[test]
    fn test_add_sheet_index_out_of_range() {
        let mut wb = Workbook::new();
        let err = wb.add_sheet("X", Some(2)).err();
        assert!(matches!(
            err,
            Some(XlwriteError::InvalidIndex { index: 2, count: 1 })
        ));
        assert_eq!(wb.sheet_count(), 1);
        assert_eq!(wb.active_sheet_index(), 0);
    }

    #[test]
    fn test_sheet_name_rules() {
        let mut wb = Workbook::new();
        for bad in ["", "a/b", "x[1]", "'quoted'", "SHEET1", &"n".repeat(32)] {
            let err = wb.add_sheet(bad, None).err();
            assert!(
                matches!(err, Some(XlwriteError::InvalidSheetName { .. })),
                "{bad:?} should be rejected"
            );
        }
        assert!(wb.add_sheet(&"n".repeat(31), None).is_ok());
        assert!(wb.add_sheet("it's fine", None).is_ok());
    }

    #[test]
    fn test_sheet_lookup_errors() {
        let mut wb = Workbook::new();
        assert!(matches!(wb.sheet(1), Err(XlwriteError::SheetNotFound(1))));
        assert!(matches!(wb.sheet_mut(3).err(), Some(XlwriteError::SheetNotFound(3))));
        assert!(matches!(
            wb.set_active_sheet_index(1),
            Err(XlwriteError::SheetNotFound(1))
        ));
        assert_eq!(wb.active_sheet_index(), 0);
    }

    #[test]
    fn test_sheet_by_name_ignores_case() {
        let mut wb = Workbook::new();
        wb.add_sheet("Data", None).unwrap();
        assert_eq!(wb.sheet_by_name("data").map(Sheet::name), Some("Data"));
        assert!(wb.sheet_by_name("missing").is_none());
    }

    #[test]
    fn test_strings_shared_across_sheets() {
        let mut wb = Workbook::new();
        wb.active_sheet_mut().set_cell_value("A1", "same").unwrap();
        wb.create_sheet().set_cell_value("B2", "same").unwrap();
        assert_eq!(wb.shared_strings().len(), 1);
        assert_eq!(
            wb.sheet(1).unwrap().cell("B2").unwrap().unwrap().shared_string_index(),
            Some(0)
        );
    }

    #[test]
    fn test_to_bytes_is_stable() {
        let mut wb = Workbook::new();
        wb.active_sheet_mut()
            .set_cell_value("A1", "x")
            .unwrap()
            .set_cell_color("A1", "FFFF0000")
            .unwrap();
        let first = wb.to_bytes().unwrap();
        let second = wb.to_bytes().unwrap();
        assert_eq!(first, second);
        // Saving must not re-seed or renumber styles
        assert_eq!(wb.styles().fonts().len(), 2);
        assert_eq!(wb.styles().cell_formats().len(), 2);
    }
}
