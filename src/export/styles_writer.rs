//! Generates `xl/styles.xml` from the style registry.

use crate::error::Result;
use crate::namespaces::NS_SPREADSHEET;
use crate::styles::StyleRegistry;
use crate::types::{Argb, BorderAttributes, FillAttributes, FontAttributes};
use crate::xml_writer::XmlWriter;

/// Render every interned font, fill, border and cell format in id order.
pub(crate) fn write_styles_xml(styles: &StyleRegistry) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::with_declaration()?;
    xml.start_element_with("styleSheet", &[("xmlns", NS_SPREADSHEET)])?;

    xml.start_element_with("fonts", &[("count", &styles.fonts().len().to_string())])?;
    for font in styles.fonts() {
        write_font(&mut xml, font)?;
    }
    xml.end_element()?;

    xml.start_element_with("fills", &[("count", &styles.fills().len().to_string())])?;
    for fill in styles.fills() {
        write_fill(&mut xml, fill)?;
    }
    xml.end_element()?;

    xml.start_element_with("borders", &[("count", &styles.borders().len().to_string())])?;
    for border in styles.borders() {
        write_border(&mut xml, border)?;
    }
    xml.end_element()?;

    xml.start_element_with("cellStyleXfs", &[("count", "1")])?
        .element(
            "xf",
            &[("numFmtId", "0"), ("fontId", "0"), ("fillId", "0"), ("borderId", "0")],
        )?
        .end_element()?;

    xml.start_element_with(
        "cellXfs",
        &[("count", &styles.cell_formats().len().to_string())],
    )?;
    for format in styles.cell_formats() {
        let font_id = format.font_id.to_string();
        let fill_id = format.fill_id.to_string();
        let border_id = format.border_id.to_string();
        let mut attrs: Vec<(&str, &str)> = vec![
            ("numFmtId", "0"),
            ("fontId", font_id.as_str()),
            ("fillId", fill_id.as_str()),
            ("borderId", border_id.as_str()),
            ("xfId", "0"),
        ];
        if format.font_id != 0 {
            attrs.push(("applyFont", "1"));
        }
        if format.fill_id != 0 {
            attrs.push(("applyFill", "1"));
        }
        if format.border_id != 0 {
            attrs.push(("applyBorder", "1"));
        }
        xml.element("xf", &attrs)?;
    }
    xml.end_element()?;

    xml.start_element_with("cellStyles", &[("count", "1")])?
        .element("cellStyle", &[("name", "Normal"), ("xfId", "0"), ("builtinId", "0")])?
        .end_element()?;
    xml.element("dxfs", &[("count", "0")])?;
    xml.element(
        "tableStyles",
        &[
            ("count", "0"),
            ("defaultTableStyle", "TableStyleMedium9"),
            ("defaultPivotStyle", "PivotStyleLight16"),
        ],
    )?;

    xml.finish()
}

/// Only the fields that were set are written.
fn write_font(xml: &mut XmlWriter, font: &FontAttributes) -> Result<()> {
    xml.start_element("font")?;
    if let Some(size) = font.size {
        xml.element("sz", &[("val", &size.to_string())])?;
    }
    if let Some(color) = &font.color {
        xml.element("color", &[("rgb", color.as_str())])?;
    }
    if let Some(name) = &font.name {
        xml.element("name", &[("val", name)])?;
    }
    xml.end_element()?;
    Ok(())
}

fn write_fill(xml: &mut XmlWriter, fill: &FillAttributes) -> Result<()> {
    xml.start_element("fill")?;
    xml.start_element_with("patternFill", &[("patternType", fill.effective_pattern().as_str())])?;
    if let Some(fg) = &fill.fg_color {
        xml.element("fgColor", &[("rgb", fg.as_str())])?;
    }
    if let Some(bg) = &fill.bg_color {
        xml.element("bgColor", &[("rgb", bg.as_str())])?;
    }
    xml.end_element()?.end_element()?;
    Ok(())
}

/// Sides are written in schema order; a side without a style is an empty element.
fn write_border(xml: &mut XmlWriter, border: &BorderAttributes) -> Result<()> {
    let black = Argb::black();
    xml.start_element("border")?;
    for (side, line) in border.sides() {
        match line {
            Some(line) => {
                let color = line.color.as_ref().unwrap_or(&black);
                xml.start_element_with(side.as_str(), &[("style", line.style.as_str())])?
                    .element("color", &[("rgb", color.as_str())])?
                    .end_element()?;
            }
            None => {
                xml.element(side.as_str(), &[])?;
            }
        }
    }
    xml.element("diagonal", &[])?;
    xml.end_element()?;
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
    use super::*;
    use crate::options::DefaultFont;
    use crate::types::{BorderLine, BorderSide, BorderStyle, PatternType};

    fn render(styles: &StyleRegistry) -> String {
        String::from_utf8(write_styles_xml(styles).unwrap()).unwrap()
    }

    #[test]
    fn test_seeded_stylesheet() {
        let styles = StyleRegistry::new(DefaultFont::default().attributes());
        let xml = render(&styles);
        assert!(xml.contains(
            r#"<fonts count="1"><font><sz val="11"/><color rgb="FF000000"/><name val="Calibri"/></font></fonts>"#
        ), "{xml}");
        assert!(xml.contains(
            r#"<fills count="2"><fill><patternFill patternType="none"></patternFill></fill><fill><patternFill patternType="gray125"></patternFill></fill></fills>"#
        ), "{xml}");
        assert!(xml.contains(
            r#"<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>"#
        ), "{xml}");
        assert!(xml.contains(
            r#"<cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>"#
        ), "{xml}");
    }

    #[test]
    fn test_partial_font_and_solid_fill() {
        let mut styles = StyleRegistry::new(DefaultFont::default().attributes());
        let font = FontAttributes {
            size: Some("10.5".parse().unwrap()),
            ..FontAttributes::default()
        };
        let fill = FillAttributes {
            pattern: None,
            fg_color: Some("FFFFFF00".parse().unwrap()),
            bg_color: None,
        };
        styles.resolve(Some(&font), Some(&fill), None);
        let xml = render(&styles);
        assert!(xml.contains(r#"<font><sz val="10.5"/></font>"#), "{xml}");
        assert!(xml.contains(
            r#"<fill><patternFill patternType="solid"><fgColor rgb="FFFFFF00"/></patternFill></fill>"#
        ), "{xml}");
        assert!(xml.contains(
            r#"<xf numFmtId="0" fontId="1" fillId="2" borderId="0" xfId="0" applyFont="1" applyFill="1"/>"#
        ), "{xml}");
    }

    #[test]
    fn test_border_sides_default_to_black() {
        let mut styles = StyleRegistry::new(DefaultFont::default().attributes());
        let mut border = BorderAttributes::default();
        border.set_side_if_unset(
            BorderSide::Bottom,
            BorderLine {
                style: BorderStyle::MediumDashed,
                color: None,
            },
        );
        border.set_side_if_unset(
            BorderSide::Left,
            BorderLine {
                style: BorderStyle::Thin,
                color: Some("FF123456".parse().unwrap()),
            },
        );
        styles.intern_border(&border);
        let xml = render(&styles);
        assert!(xml.contains(
            r#"<border><left style="thin"><color rgb="FF123456"/></left><right/><top/><bottom style="mediumDashed"><color rgb="FF000000"/></bottom><diagonal/></border>"#
        ), "{xml}");
    }

    #[test]
    fn test_pattern_fill_with_both_colors() {
        let mut styles = StyleRegistry::new(DefaultFont::default().attributes());
        styles.intern_fill(&FillAttributes {
            pattern: Some(PatternType::LightGrid),
            fg_color: Some("FF00FF00".parse().unwrap()),
            bg_color: Some("FF0000FF".parse().unwrap()),
        });
        let xml = render(&styles);
        assert!(xml.contains(
            r#"<patternFill patternType="lightGrid"><fgColor rgb="FF00FF00"/><bgColor rgb="FF0000FF"/></patternFill>"#
        ), "{xml}");
    }
}
