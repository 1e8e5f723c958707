//! Workbook configuration.
//!
//! Options can be built in code or deserialized from JSON; missing keys fall
//! back to [`WorkbookOptions::default`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{Argb, FontAttributes, FontSize};

/// Workbook-wide default font, seeded as font 0 of the style table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DefaultFont {
    pub size: FontSize,
    pub color: Argb,
    pub name: String,
}

impl Default for DefaultFont {
    fn default() -> Self {
        Self {
            size: FontSize::points(11),
            color: Argb::black(),
            name: "Calibri".to_string(),
        }
    }
}

impl DefaultFont {
    /// The fully populated font bundle for the style table.
    pub fn attributes(&self) -> FontAttributes {
        FontAttributes {
            size: Some(self.size),
            color: Some(self.color.clone()),
            name: Some(self.name.clone()),
        }
    }
}

/// Zip compression used for every part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Compression {
    #[default]
    Deflated,
    Stored,
}

impl Compression {
    pub(crate) fn method(self) -> zip::CompressionMethod {
        match self {
            Self::Deflated => zip::CompressionMethod::Deflated,
            Self::Stored => zip::CompressionMethod::Stored,
        }
    }
}

/// Settings applied when a workbook is created and saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkbookOptions {
    pub default_font: DefaultFont,
    /// Written to `dc:creator` and `cp:lastModifiedBy`.
    pub creator: String,
    /// Document timestamp. `None` means the moment the workbook is created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    pub compression: Compression,
}

impl Default for WorkbookOptions {
    fn default() -> Self {
        Self {
            default_font: DefaultFont::default(),
            creator: "xlwrite".to_string(),
            created: None,
            compression: Compression::default(),
        }
    }
}

impl WorkbookOptions {
    /// Parse options from JSON such as `{"creator": "me", "defaultFont": {"size": "10"}}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
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
    fn test_default_options() {
        let opts = WorkbookOptions::default();
        assert_eq!(opts.default_font.name, "Calibri");
        assert_eq!(opts.default_font.size.to_string(), "11");
        assert_eq!(opts.default_font.color.as_str(), "FF000000");
        assert_eq!(opts.compression, Compression::Deflated);
        assert!(opts.created.is_none());
    }

    #[test]
    fn test_from_json_partial() {
        let opts = WorkbookOptions::from_json(
            r#"{"creator": "Reports", "defaultFont": {"size": "10.5", "name": "Arial"}}"#,
        )
        .unwrap();
        assert_eq!(opts.creator, "Reports");
        assert_eq!(opts.default_font.name, "Arial");
        assert_eq!(opts.default_font.size.to_string(), "10.5");
        assert_eq!(opts.default_font.color.as_str(), "FF000000");
    }

    #[test]
    fn test_from_json_timestamp_and_compression() {
        let opts = WorkbookOptions::from_json(
            r#"{"created": "2024-01-02T03:04:05Z", "compression": "stored"}"#,
        )
        .unwrap();
        assert_eq!(opts.compression, Compression::Stored);
        assert_eq!(
            opts.created.map(|c| c.to_rfc3339()),
            Some("2024-01-02T03:04:05+00:00".to_string())
        );
    }

    #[test]
    fn test_from_json_rejects_bad_color() {
        let err = WorkbookOptions::from_json(r#"{"defaultFont": {"color": "blue"}}"#);
        assert!(err.is_err());
    }
}
