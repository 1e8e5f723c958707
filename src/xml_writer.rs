//! Append-only XML builder over `quick_xml::Writer`.
//!
//! Open elements are tracked on a stack so `end_element` needs no name and
//! documents stay well-formed as long as every start is matched. Attribute
//! values and text are escaped by quick-xml. Cell text that may carry
//! control characters goes through [`encode_xstring`] first.

use std::borrow::Cow;
use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::Result;

pub(crate) struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
    open: Vec<String>,
}

impl XmlWriter {
    /// A writer that starts with the standalone UTF-8 declaration.
    pub(crate) fn with_declaration() -> Result<Self> {
        let mut xml = Self {
            writer: Writer::new(Cursor::new(Vec::with_capacity(4096))),
            open: Vec::new(),
        };
        xml.writer.write_event(Event::Decl(BytesDecl::new(
            "1.0",
            Some("UTF-8"),
            Some("yes"),
        )))?;
        Ok(xml)
    }

    pub(crate) fn start_element(&mut self, name: &str) -> Result<&mut Self> {
        self.start_element_with(name, &[])
    }

    pub(crate) fn start_element_with(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self> {
        self.writer.write_event(Event::Start(start_tag(name, attrs)))?;
        self.open.push(name.to_string());
        Ok(self)
    }

    /// Close the innermost open element. Does nothing if none is open.
    pub(crate) fn end_element(&mut self) -> Result<&mut Self> {
        if let Some(name) = self.open.pop() {
            self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        Ok(self)
    }

    /// Self-closing element.
    pub(crate) fn element(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self> {
        self.writer.write_event(Event::Empty(start_tag(name, attrs)))?;
        Ok(self)
    }

    pub(crate) fn element_with_text(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> Result<&mut Self> {
        self.start_element_with(name, attrs)?;
        self.text(text)?;
        self.end_element()
    }

    pub(crate) fn text(&mut self, text: &str) -> Result<&mut Self> {
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(self)
    }

    /// Close anything still open and return the document bytes.
    pub(crate) fn finish(mut self) -> Result<Vec<u8>> {
        while !self.open.is_empty() {
            self.end_element()?;
        }
        Ok(self.writer.into_inner().into_inner())
    }
}

/// Encode text as an OOXML `ST_Xstring`.
///
/// Characters XML 1.0 cannot carry, and `\r` which parsers fold into `\n`,
/// become `_xHHHH_`. A literal `_xHHHH_` already in the text gets its
/// underscore written as `_x005F_` so readers do not decode it.
pub(crate) fn encode_xstring(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_unrepresentable) && !text.contains("_x") {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for (idx, ch) in text.char_indices() {
        if is_unrepresentable(ch) {
            out.push_str(&format!("_x{:04X}_", u32::from(ch)));
        } else if ch == '_' && text.get(idx..).is_some_and(starts_with_escape) {
            out.push_str("_x005F_");
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

fn is_unrepresentable(ch: char) -> bool {
    matches!(ch, '\u{0}'..='\u{8}' | '\u{B}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
}

fn starts_with_escape(s: &str) -> bool {
    match s.as_bytes().get(..7) {
        Some(&[b'_', b'x', h1, h2, h3, h4, b'_']) => {
            [h1, h2, h3, h4].iter().all(u8::is_ascii_hexdigit)
        }
        _ => false,
    }
}

fn start_tag<'a>(name: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
    let mut tag = BytesStart::new(name);
    for &(key, value) in attrs {
        tag.push_attribute((key, value));
    }
    tag
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

    fn render(build: impl FnOnce(&mut XmlWriter) -> Result<()>) -> String {
        let mut xml = XmlWriter::with_declaration().unwrap();
        build(&mut xml).unwrap();
        String::from_utf8(xml.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_nesting_and_empty_elements() {
        let out = render(|x| {
            x.start_element_with("root", &[("a", "1")])?
                .element("leaf", &[("v", "2")])?
                .element_with_text("t", &[], "hi")?
                .end_element()?;
            Ok(())
        });
        assert_eq!(
            out,
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><root a="1"><leaf v="2"/><t>hi</t></root>"#
        );
    }

    #[test]
    fn test_escaping() {
        let out = render(|x| {
            x.element_with_text("t", &[("k", "a\"<b")], "x & y < z")?;
            Ok(())
        });
        assert!(out.contains(r#"k="a&quot;&lt;b""#), "{out}");
        assert!(out.contains("<t k=\"a&quot;&lt;b\">x &amp; y &lt; z</t>"), "{out}");
    }

    #[test]
    fn test_encode_xstring_control_characters() {
        assert_eq!(encode_xstring("a\u{1}b\u{0}c"), "a_x0001_b_x0000_c");
        assert_eq!(encode_xstring("x\r\ny"), "x_x000D_\ny");
        assert_eq!(encode_xstring("tab\there\nnext"), "tab\there\nnext");
        assert_eq!(encode_xstring("\u{FFFF}"), "_xFFFF_");
    }

    #[test]
    fn test_encode_xstring_escapes_literal_sequences() {
        assert_eq!(encode_xstring("_x0041_"), "_x005F_x0041_");
        assert_eq!(encode_xstring("a_x00zz_b"), "a_x00zz_b");
        assert_eq!(encode_xstring("snake_x_case"), "snake_x_case");
        assert!(matches!(encode_xstring("plain text"), Cow::Borrowed("plain text")));
    }

    #[test]
    fn test_finish_closes_open_elements() {
        let out = render(|x| {
            x.start_element("a")?.start_element("b")?;
            Ok(())
        });
        assert!(out.ends_with("<a><b></b></a>"), "{out}");
    }

    #[test]
    fn test_extra_end_is_ignored() {
        let out = render(|x| {
            x.start_element("a")?.end_element()?.end_element()?;
            Ok(())
        });
        assert!(out.ends_with("<a></a>"));
    }
}
