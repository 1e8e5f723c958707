//! XLSX export pipeline.
//!
//! Every part is rendered in memory before the archive is opened.
//! Worksheets go first because writing them interns the cell styles that
//! `styles.xml` then lists.

pub(crate) mod package_parts;
pub(crate) mod sheet_writer;
pub(crate) mod styles_writer;
pub(crate) mod theme;
pub(crate) mod zip_writer;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::options::WorkbookOptions;
use crate::shared_strings::SharedStringTable;
use crate::sheet::Sheet;
use crate::styles::StyleRegistry;

/// One rendered file of the package.
#[derive(Debug, Clone)]
pub(crate) struct Part {
    pub name: String,
    pub data: Vec<u8>,
}

impl Part {
    fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Everything the renderer needs from a workbook.
pub(crate) struct PackageSource<'a> {
    pub sheets: &'a [Sheet],
    pub active: usize,
    pub styles: &'a mut StyleRegistry,
    pub strings: &'a SharedStringTable,
    pub options: &'a WorkbookOptions,
    pub timestamp: DateTime<Utc>,
}

/// Render all parts, in the order they are stored in the archive.
pub(crate) fn render_package(src: PackageSource<'_>) -> Result<Vec<Part>> {
    let PackageSource {
        sheets,
        active,
        styles,
        strings,
        options,
        timestamp,
    } = src;

    let mut worksheets = Vec::with_capacity(sheets.len());
    for (idx, sheet) in sheets.iter().enumerate() {
        let data = sheet_writer::write_sheet_xml(sheet, idx == active, styles)?;
        worksheets.push(Part::new(package_parts::worksheet_part_name(idx + 1), data));
    }

    let names = || sheets.iter().map(Sheet::name);
    let mut parts = vec![
        Part::new("[Content_Types].xml", package_parts::content_types_xml(sheets.len())?),
        Part::new("_rels/.rels", package_parts::root_rels_xml()?),
        Part::new("docProps/app.xml", package_parts::app_xml(names())?),
        Part::new(
            "docProps/core.xml",
            package_parts::core_xml(&options.creator, timestamp)?,
        ),
        Part::new("xl/workbook.xml", package_parts::workbook_xml(names(), active)?),
        Part::new(
            "xl/_rels/workbook.xml.rels",
            package_parts::workbook_rels_xml(sheets.len())?,
        ),
        Part::new("xl/styles.xml", styles_writer::write_styles_xml(styles)?),
        Part::new("xl/theme/theme1.xml", theme::THEME_XML.as_bytes().to_vec()),
        Part::new("xl/sharedStrings.xml", package_parts::shared_strings_xml(strings)?),
    ];
    parts.append(&mut worksheets);

    for part in &parts {
        log::trace!("rendered {} ({} bytes)", part.name, part.data.len());
    }
    Ok(parts)
}
