//! Package-level parts: content types, relationships, workbook manifest,
//! document properties and the shared string table.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::Result;
use crate::namespaces::{
    CT_CORE_PROPERTIES, CT_EXTENDED_PROPERTIES, CT_RELATIONSHIPS, CT_SHARED_STRINGS, CT_STYLES,
    CT_THEME, CT_WORKBOOK, CT_WORKSHEET, CT_XML, NS_CONTENT_TYPES, NS_CORE_PROPERTIES, NS_DC,
    NS_DCMI_TYPE, NS_DC_TERMS, NS_DOC_PROPS_VTYPES, NS_DOC_RELATIONSHIPS, NS_EXTENDED_PROPERTIES,
    NS_RELATIONSHIPS, NS_SPREADSHEET, NS_XSI, REL_CORE_PROPERTIES, REL_EXTENDED_PROPERTIES,
    REL_SHARED_STRINGS, REL_STYLES, REL_THEME, REL_WORKBOOK, REL_WORKSHEET,
};
use crate::shared_strings::SharedStringTable;
use crate::xml_writer::{encode_xstring, XmlWriter};

/// Relationship ids 1..=3 of the workbook are taken by styles, theme and
/// shared strings; worksheet `k` (1-based) gets `rId{k + 3}`.
const FIXED_WORKBOOK_RELS: usize = 3;

pub(crate) fn worksheet_part_name(sheet_number: usize) -> String {
    format!("xl/worksheets/sheet{sheet_number}.xml")
}

fn worksheet_rel_id(sheet_number: usize) -> String {
    format!("rId{}", sheet_number + FIXED_WORKBOOK_RELS)
}

pub(crate) fn content_types_xml(sheet_count: usize) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::with_declaration()?;
    xml.start_element_with("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    xml.element("Default", &[("Extension", "rels"), ("ContentType", CT_RELATIONSHIPS)])?
        .element("Default", &[("Extension", "xml"), ("ContentType", CT_XML)])?
        .element("Override", &[("PartName", "/xl/workbook.xml"), ("ContentType", CT_WORKBOOK)])?;
    for k in 1..=sheet_count {
        let part_name = format!("/{}", worksheet_part_name(k));
        xml.element("Override", &[("PartName", &part_name), ("ContentType", CT_WORKSHEET)])?;
    }
    xml.element("Override", &[("PartName", "/xl/theme/theme1.xml"), ("ContentType", CT_THEME)])?
        .element("Override", &[("PartName", "/xl/styles.xml"), ("ContentType", CT_STYLES)])?
        .element(
            "Override",
            &[("PartName", "/xl/sharedStrings.xml"), ("ContentType", CT_SHARED_STRINGS)],
        )?
        .element(
            "Override",
            &[("PartName", "/docProps/core.xml"), ("ContentType", CT_CORE_PROPERTIES)],
        )?
        .element(
            "Override",
            &[("PartName", "/docProps/app.xml"), ("ContentType", CT_EXTENDED_PROPERTIES)],
        )?;
    xml.finish()
}

pub(crate) fn root_rels_xml() -> Result<Vec<u8>> {
    let mut xml = XmlWriter::with_declaration()?;
    xml.start_element_with("Relationships", &[("xmlns", NS_RELATIONSHIPS)])?
        .element(
            "Relationship",
            &[("Id", "rId1"), ("Type", REL_WORKBOOK), ("Target", "xl/workbook.xml")],
        )?
        .element(
            "Relationship",
            &[("Id", "rId2"), ("Type", REL_CORE_PROPERTIES), ("Target", "docProps/core.xml")],
        )?
        .element(
            "Relationship",
            &[("Id", "rId3"), ("Type", REL_EXTENDED_PROPERTIES), ("Target", "docProps/app.xml")],
        )?;
    xml.finish()
}

/// `docProps/app.xml`: application name and the list of sheet titles.
pub(crate) fn app_xml<'a>(sheet_names: impl ExactSizeIterator<Item = &'a str>) -> Result<Vec<u8>> {
    let count = sheet_names.len().to_string();
    let mut xml = XmlWriter::with_declaration()?;
    xml.start_element_with(
        "Properties",
        &[("xmlns", NS_EXTENDED_PROPERTIES), ("xmlns:vt", NS_DOC_PROPS_VTYPES)],
    )?;
    xml.element_with_text("Application", &[], "Microsoft Excel")?
        .element_with_text("DocSecurity", &[], "0")?
        .element_with_text("ScaleCrop", &[], "false")?;

    xml.start_element("HeadingPairs")?
        .start_element_with("vt:vector", &[("size", "2"), ("baseType", "variant")])?
        .start_element("vt:variant")?
        .element_with_text("vt:lpstr", &[], "Worksheets")?
        .end_element()?
        .start_element("vt:variant")?
        .element_with_text("vt:i4", &[], &count)?
        .end_element()?
        .end_element()?
        .end_element()?;

    xml.start_element("TitlesOfParts")?
        .start_element_with("vt:vector", &[("size", &count), ("baseType", "lpstr")])?;
    for name in sheet_names {
        xml.element_with_text("vt:lpstr", &[], name)?;
    }
    xml.end_element()?.end_element()?;

    xml.element("Company", &[])?
        .element_with_text("LinksUpToDate", &[], "false")?
        .element_with_text("SharedDoc", &[], "false")?
        .element_with_text("HyperlinksChanged", &[], "false")?
        .element_with_text("AppVersion", &[], "12.0000")?;
    xml.finish()
}

/// `docProps/core.xml`: creator and W3CDTF timestamps.
pub(crate) fn core_xml(creator: &str, timestamp: DateTime<Utc>) -> Result<Vec<u8>> {
    let stamp = timestamp.to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut xml = XmlWriter::with_declaration()?;
    xml.start_element_with(
        "cp:coreProperties",
        &[
            ("xmlns:cp", NS_CORE_PROPERTIES),
            ("xmlns:dc", NS_DC),
            ("xmlns:dcterms", NS_DC_TERMS),
            ("xmlns:dcmitype", NS_DCMI_TYPE),
            ("xmlns:xsi", NS_XSI),
        ],
    )?;
    xml.element_with_text("dc:creator", &[], creator)?
        .element_with_text("cp:lastModifiedBy", &[], creator)?
        .element_with_text("dcterms:created", &[("xsi:type", "dcterms:W3CDTF")], &stamp)?
        .element_with_text("dcterms:modified", &[("xsi:type", "dcterms:W3CDTF")], &stamp)?;
    xml.finish()
}

/// `xl/workbook.xml`: the sheet manifest and the active tab.
pub(crate) fn workbook_xml<'a>(
    sheet_names: impl Iterator<Item = &'a str>,
    active: usize,
) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::with_declaration()?;
    xml.start_element_with(
        "workbook",
        &[("xmlns", NS_SPREADSHEET), ("xmlns:r", NS_DOC_RELATIONSHIPS)],
    )?;
    xml.element(
        "fileVersion",
        &[("appName", "xl"), ("lastEdited", "4"), ("lowestEdited", "4"), ("rupBuild", "4505")],
    )?
    .element("workbookPr", &[])?;

    xml.start_element("bookViews")?
        .element("workbookView", &[("activeTab", &active.to_string())])?
        .end_element()?;

    xml.start_element("sheets")?;
    for (idx, name) in sheet_names.enumerate() {
        let k = idx + 1;
        xml.element(
            "sheet",
            &[("name", name), ("sheetId", &k.to_string()), ("r:id", &worksheet_rel_id(k))],
        )?;
    }
    xml.end_element()?;

    // Formulas are written without cached values
    xml.element("calcPr", &[("calcId", "999999"), ("fullCalcOnLoad", "1")])?;
    xml.finish()
}

pub(crate) fn workbook_rels_xml(sheet_count: usize) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::with_declaration()?;
    xml.start_element_with("Relationships", &[("xmlns", NS_RELATIONSHIPS)])?
        .element("Relationship", &[("Id", "rId1"), ("Type", REL_STYLES), ("Target", "styles.xml")])?
        .element(
            "Relationship",
            &[("Id", "rId2"), ("Type", REL_THEME), ("Target", "theme/theme1.xml")],
        )?
        .element(
            "Relationship",
            &[("Id", "rId3"), ("Type", REL_SHARED_STRINGS), ("Target", "sharedStrings.xml")],
        )?;
    for k in 1..=sheet_count {
        let target = format!("worksheets/sheet{k}.xml");
        xml.element(
            "Relationship",
            &[("Id", &worksheet_rel_id(k)), ("Type", REL_WORKSHEET), ("Target", &target)],
        )?;
    }
    xml.finish()
}

/// `xl/sharedStrings.xml` in index order.
pub(crate) fn shared_strings_xml(strings: &SharedStringTable) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::with_declaration()?;
    xml.start_element_with(
        "sst",
        &[("xmlns", NS_SPREADSHEET), ("uniqueCount", &strings.len().to_string())],
    )?;
    for value in strings.iter() {
        let encoded = encode_xstring(value);
        let value: &str = &encoded;
        xml.start_element("si")?;
        if needs_space_preserve(value) {
            xml.element_with_text("t", &[("xml:space", "preserve")], value)?;
        } else {
            xml.element_with_text("t", &[], value)?;
        }
        xml.end_element()?;
    }
    xml.finish()
}

fn needs_space_preserve(value: &str) -> bool {
    value.starts_with(char::is_whitespace) || value.ends_with(char::is_whitespace)
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
    use chrono::TimeZone;

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_content_types_one_override_per_part() {
        let xml = text(content_types_xml(2).unwrap());
        assert_eq!(xml.matches(r#"<Default Extension="xml""#).count(), 1);
        assert_eq!(xml.matches(r#"<Default Extension="rels""#).count(), 1);
        assert!(xml.contains(r#"PartName="/xl/worksheets/sheet1.xml""#));
        assert!(xml.contains(r#"PartName="/xl/worksheets/sheet2.xml""#));
        assert!(!xml.contains("sheet3.xml"));
        assert_eq!(xml.matches("<Override ").count(), 8);
    }

    #[test]
    fn test_workbook_sheet_ids_and_rels() {
        let xml = text(workbook_xml(["Data", "Summary"].into_iter(), 1).unwrap());
        assert!(xml.contains(r#"<workbookView activeTab="1"/>"#));
        assert!(xml.contains(r#"<sheet name="Data" sheetId="1" r:id="rId4"/>"#));
        assert!(xml.contains(r#"<sheet name="Summary" sheetId="2" r:id="rId5"/>"#));

        let rels = text(workbook_rels_xml(2).unwrap());
        assert!(rels.contains(r#"Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles""#));
        assert!(rels.contains(r#"<Relationship Id="rId5" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/>"#));
    }

    #[test]
    fn test_app_lists_sheet_titles() {
        let xml = text(app_xml(["A", "B & C"].into_iter()).unwrap());
        assert!(xml.contains(r#"<vt:i4>2</vt:i4>"#));
        assert!(xml.contains(
            r#"<vt:vector size="2" baseType="lpstr"><vt:lpstr>A</vt:lpstr><vt:lpstr>B &amp; C</vt:lpstr></vt:vector>"#
        ));
    }

    #[test]
    fn test_core_timestamps() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let xml = text(core_xml("Reports", ts).unwrap());
        assert!(xml.contains("<dc:creator>Reports</dc:creator>"));
        assert!(xml.contains(
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">2024-03-01T12:30:00Z</dcterms:created>"#
        ));
    }

    #[test]
    fn test_shared_strings_preserve_space() {
        let mut sst = SharedStringTable::new();
        sst.intern("plain");
        sst.intern(" padded ");
        sst.intern("a<b");
        let xml = text(shared_strings_xml(&sst).unwrap());
        assert!(xml.contains(r#"uniqueCount="3""#));
        assert!(xml.contains("<si><t>plain</t></si>"));
        assert!(xml.contains(r#"<si><t xml:space="preserve"> padded </t></si>"#));
        assert!(xml.contains("<si><t>a&lt;b</t></si>"));
        let plain = xml.find("plain").unwrap();
        let padded = xml.find("padded").unwrap();
        assert!(plain < padded);
    }
}
