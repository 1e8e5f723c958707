use serde::{Deserialize, Serialize};

use super::{BorderAttributes, FillAttributes, FontAttributes};

/// What a cell holds. A value and a formula are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellContent {
    /// Index into the workbook's shared string table.
    SharedString(usize),
    /// Formula text without the leading `=`.
    Formula(String),
}

/// One populated cell of a sheet.
///
/// `None` style bundles mean "never styled", which is written differently
/// from a bundle equal to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<CellContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<FontAttributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<FillAttributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<BorderAttributes>,
}

impl CellRecord {
    pub fn formula(&self) -> Option<&str> {
        match &self.content {
            Some(CellContent::Formula(f)) => Some(f),
            _ => None,
        }
    }

    pub fn shared_string_index(&self) -> Option<usize> {
        match self.content {
            Some(CellContent::SharedString(idx)) => Some(idx),
            _ => None,
        }
    }

    /// Whether any style bundle has been attached.
    pub fn is_styled(&self) -> bool {
        self.font.is_some() || self.fill.is_some() || self.border.is_some()
    }
}
