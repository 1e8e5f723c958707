//! Common test utilities for reading back produced packages.
//!
//! Packages are opened with `zip` and parts are inspected with quick-xml,
//! independently of the writer code under test.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::io::{Cursor, Read};

use chrono::{TimeZone, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use xlwrite::{Workbook, WorkbookOptions};

// ============================================================================
// Workbook helpers
// ============================================================================

/// Options with a fixed document timestamp so output is reproducible.
#[must_use]
pub fn fixed_options() -> WorkbookOptions {
    WorkbookOptions {
        created: Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
        ..WorkbookOptions::default()
    }
}

#[must_use]
pub fn fixed_workbook() -> Workbook {
    Workbook::with_options(fixed_options())
}

// ============================================================================
// Package access
// ============================================================================

pub fn open_package(bytes: &[u8]) -> zip::ZipArchive<Cursor<Vec<u8>>> {
    zip::ZipArchive::new(Cursor::new(bytes.to_vec())).expect("Failed to open ZIP archive")
}

/// Entry names in archive order.
#[must_use]
pub fn part_names(bytes: &[u8]) -> Vec<String> {
    let mut archive = open_package(bytes);
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

#[must_use]
pub fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = open_package(bytes);
    let mut file = archive
        .by_name(name)
        .unwrap_or_else(|_| panic!("missing part {name}"));
    let mut xml = String::new();
    file.read_to_string(&mut xml).unwrap();
    xml
}

// ============================================================================
// XML helpers
// ============================================================================

pub fn attr(e: &BytesStart, key: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key.as_bytes())
        .map(|a| a.unescape_value().unwrap().into_owned())
}

/// Attributes of every element named `name`, in document order.
#[must_use]
pub fn elements(xml: &str, name: &str) -> Vec<Vec<(String, String)>> {
    let mut reader = Reader::from_str(xml);
    let mut found = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e)) if e.name().as_ref() == name.as_bytes() => {
                let attrs = e
                    .attributes()
                    .flatten()
                    .map(|a| {
                        (
                            String::from_utf8(a.key.as_ref().to_vec()).unwrap(),
                            a.unescape_value().unwrap().into_owned(),
                        )
                    })
                    .collect();
                found.push(attrs);
            }
            Ok(Event::Eof) => break,
            Err(e) => panic!("XML error: {e}"),
            _ => {}
        }
    }
    found
}

/// Value of `key` on the `idx`-th element named `name`.
#[must_use]
pub fn element_attr(xml: &str, name: &str, idx: usize, key: &str) -> Option<String> {
    elements(xml, name)
        .get(idx)?
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

/// Number of `child` elements directly or indirectly inside the first `parent`.
#[must_use]
pub fn count_within(xml: &str, parent: &str, child: &str) -> usize {
    let mut reader = Reader::from_str(xml);
    let mut inside = false;
    let mut count = 0;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == parent.as_bytes() => inside = true,
            Ok(Event::End(e)) if e.name().as_ref() == parent.as_bytes() => break,
            Ok(Event::Start(e) | Event::Empty(e))
                if inside && e.name().as_ref() == child.as_bytes() =>
            {
                count += 1;
            }
            Ok(Event::Eof) => break,
            Err(e) => panic!("XML error: {e}"),
            _ => {}
        }
    }
    count
}

// ============================================================================
// Worksheet cells
// ============================================================================

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CellXml {
    pub r: String,
    pub s: Option<String>,
    pub t: Option<String>,
    pub v: Option<String>,
    pub f: Option<String>,
}

/// Every `<c>` of a worksheet in document order.
#[must_use]
pub fn cells(sheet_xml: &str) -> Vec<CellXml> {
    let mut reader = Reader::from_str(sheet_xml);
    let mut out = Vec::new();
    let mut current: Option<CellXml> = None;
    let mut field: Option<&'static str> = None;
    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) if e.name().as_ref() == b"c" => out.push(cell_from(&e)),
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"c" => current = Some(cell_from(&e)),
                b"v" => field = Some("v"),
                b"f" => field = Some("f"),
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if let (Some(cell), Some(which)) = (current.as_mut(), field) {
                    let text = t.unescape().unwrap().into_owned();
                    match which {
                        "v" => cell.v = Some(text),
                        _ => cell.f = Some(text),
                    }
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"c" => out.extend(current.take()),
                b"v" | b"f" => field = None,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => panic!("XML error: {e}"),
            _ => {}
        }
    }
    out
}

fn cell_from(e: &BytesStart) -> CellXml {
    CellXml {
        r: attr(e, "r").unwrap_or_default(),
        s: attr(e, "s"),
        t: attr(e, "t"),
        ..CellXml::default()
    }
}

#[must_use]
pub fn cell(sheet_xml: &str, r: &str) -> CellXml {
    cells(sheet_xml)
        .into_iter()
        .find(|c| c.r == r)
        .unwrap_or_else(|| panic!("cell {r} not written"))
}

// ============================================================================
// Shared strings and styles
// ============================================================================

/// Text of every `<si>` in order.
#[must_use]
pub fn shared_strings(bytes: &[u8]) -> Vec<String> {
    let xml = read_part(bytes, "xl/sharedStrings.xml");
    let mut reader = Reader::from_str(&xml);
    let mut strings = Vec::new();
    let mut in_t = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"t" => {
                in_t = true;
                strings.push(String::new());
            }
            Ok(Event::Empty(e)) if e.name().as_ref() == b"t" => strings.push(String::new()),
            Ok(Event::Text(t)) if in_t => {
                if let Some(last) = strings.last_mut() {
                    last.push_str(&t.unescape().unwrap());
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"t" => in_t = false,
            Ok(Event::Eof) => break,
            Err(e) => panic!("XML error: {e}"),
            _ => {}
        }
    }
    strings
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XfXml {
    pub font_id: usize,
    pub fill_id: usize,
    pub border_id: usize,
}

/// Entries of `<cellXfs>` in id order.
#[must_use]
pub fn cell_xfs(styles_xml: &str) -> Vec<XfXml> {
    let mut reader = Reader::from_str(styles_xml);
    let mut in_cell_xfs = false;
    let mut xfs = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"cellXfs" => in_cell_xfs = true,
            Ok(Event::End(e)) if e.name().as_ref() == b"cellXfs" => in_cell_xfs = false,
            Ok(Event::Start(e) | Event::Empty(e)) if in_cell_xfs && e.name().as_ref() == b"xf" => {
                let id = |key| attr(&e, key).unwrap().parse().unwrap();
                xfs.push(XfXml {
                    font_id: id("fontId"),
                    fill_id: id("fillId"),
                    border_id: id("borderId"),
                });
            }
            Ok(Event::Eof) => break,
            Err(e) => panic!("XML error: {e}"),
            _ => {}
        }
    }
    xfs
}

/// The `rgb` of each font's `<color>`, `None` for fonts without one.
#[must_use]
pub fn font_colors(styles_xml: &str) -> Vec<Option<String>> {
    let mut reader = Reader::from_str(styles_xml);
    let mut colors = Vec::new();
    let mut in_font = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"font" => {
                in_font = true;
                colors.push(None);
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"font" => in_font = false,
            Ok(Event::Empty(e)) if in_font && e.name().as_ref() == b"color" => {
                if let Some(last) = colors.last_mut() {
                    *last = attr(&e, "rgb");
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => panic!("XML error: {e}"),
            _ => {}
        }
    }
    colors
}
