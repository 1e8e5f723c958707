use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, XlwriteError};

/// An opaque-by-default ARGB color, stored as 8 uppercase hex digits.
///
/// Six-digit `RRGGBB` input is promoted to `FFRRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Argb(String);

impl Argb {
    /// Opaque black, the default font and border color.
    pub fn black() -> Self {
        Self("FF000000".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Argb {
    type Err = XlwriteError;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(XlwriteError::InvalidColor(s.to_string()));
        }
        match hex.len() {
            8 => Ok(Self(hex.to_ascii_uppercase())),
            6 => Ok(Self(format!("FF{}", hex.to_ascii_uppercase()))),
            _ => Err(XlwriteError::InvalidColor(s.to_string())),
        }
    }
}

impl TryFrom<String> for Argb {
    type Error = XlwriteError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Argb> for String {
    fn from(c: Argb) -> Self {
        c.0
    }
}

impl fmt::Display for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Font size in hundredths of a point, so it can be hashed and compared exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FontSize(u32);

impl FontSize {
    /// A whole point size.
    pub fn points(points: u16) -> Self {
        Self(u32::from(points) * 100)
    }

    pub fn hundredths(self) -> u32 {
        self.0
    }
}

impl FromStr for FontSize {
    type Err = XlwriteError;

    /// Parse decimal text such as `"11"` or `"10.5"` (at most two decimals).
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || XlwriteError::InvalidFontSize(s.to_string());
        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty() || frac.len() > 2 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let whole: u32 = whole.parse().map_err(|_| invalid())?;
        let frac: u32 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u32>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };
        let hundredths = whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(frac))
            .ok_or_else(invalid)?;
        if hundredths == 0 || hundredths > 409 * 100 {
            return Err(invalid());
        }
        Ok(Self(hundredths))
    }
}

impl TryFrom<String> for FontSize {
    type Error = XlwriteError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<FontSize> for String {
    fn from(size: FontSize) -> Self {
        size.to_string()
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{whole}")
        } else if frac % 10 == 0 {
            write!(f, "{whole}.{}", frac / 10)
        } else {
            write!(f, "{whole}.{frac:02}")
        }
    }
}

/// Partial font description. Unset fields are left out of `styles.xml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<FontSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Argb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Pattern fill description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<PatternType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fg_color: Option<Argb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<Argb>,
}

impl FillAttributes {
    /// Pattern written to `styles.xml`. A fill that only has colors is solid.
    pub fn effective_pattern(&self) -> PatternType {
        match self.pattern {
            Some(p) => p,
            None if self.fg_color.is_some() || self.bg_color.is_some() => PatternType::Solid,
            None => PatternType::None,
        }
    }

    /// The same fill with its pattern made explicit, so fills that render
    /// identically compare equal.
    pub fn normalized(&self) -> Self {
        Self {
            pattern: Some(self.effective_pattern()),
            ..self.clone()
        }
    }
}

/// One side of a cell border.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BorderLine {
    pub style: BorderStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Argb>,
}

/// Four-sided border description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BorderAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<BorderLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<BorderLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<BorderLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<BorderLine>,
}

impl BorderAttributes {
    pub fn side(&self, side: BorderSide) -> Option<&BorderLine> {
        match side {
            BorderSide::Left => self.left.as_ref(),
            BorderSide::Right => self.right.as_ref(),
            BorderSide::Top => self.top.as_ref(),
            BorderSide::Bottom => self.bottom.as_ref(),
        }
    }

    /// Set a side unless it already has a style. Returns whether it was written.
    pub fn set_side_if_unset(&mut self, side: BorderSide, line: BorderLine) -> bool {
        let slot = match side {
            BorderSide::Left => &mut self.left,
            BorderSide::Right => &mut self.right,
            BorderSide::Top => &mut self.top,
            BorderSide::Bottom => &mut self.bottom,
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(line);
        true
    }

    /// Sides in the order the schema requires them.
    pub fn sides(&self) -> [(BorderSide, Option<&BorderLine>); 4] {
        [
            (BorderSide::Left, self.left.as_ref()),
            (BorderSide::Right, self.right.as_ref()),
            (BorderSide::Top, self.top.as_ref()),
            (BorderSide::Bottom, self.bottom.as_ref()),
        ]
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum BorderSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl BorderSide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

impl FromStr for BorderSide {
    type Err = XlwriteError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            _ => Err(XlwriteError::InvalidStyle(s.to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum BorderStyle {
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
    Hair,
    MediumDashed,
    DashDot,
    MediumDashDot,
    DashDotDot,
    MediumDashDotDot,
    SlantDashDot,
}

impl BorderStyle {
    const ALL: [Self; 13] = [
        Self::Thin,
        Self::Medium,
        Self::Thick,
        Self::Dashed,
        Self::Dotted,
        Self::Double,
        Self::Hair,
        Self::MediumDashed,
        Self::DashDot,
        Self::MediumDashDot,
        Self::DashDotDot,
        Self::MediumDashDotDot,
        Self::SlantDashDot,
    ];

    /// The `style` attribute value used in `styles.xml`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Thin => "thin",
            Self::Medium => "medium",
            Self::Thick => "thick",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
            Self::Double => "double",
            Self::Hair => "hair",
            Self::MediumDashed => "mediumDashed",
            Self::DashDot => "dashDot",
            Self::MediumDashDot => "mediumDashDot",
            Self::DashDotDot => "dashDotDot",
            Self::MediumDashDotDot => "mediumDashDotDot",
            Self::SlantDashDot => "slantDashDot",
        }
    }
}

impl FromStr for BorderStyle {
    type Err = XlwriteError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| XlwriteError::InvalidStyle(s.to_string()))
    }
}

/// Pattern fill types from ECMA-376 Part 1, Section 18.18.55
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum PatternType {
    None,
    Solid,
    Gray125,
    Gray0625,
    DarkGray,
    MediumGray,
    LightGray,
    DarkHorizontal,
    DarkVertical,
    DarkDown,
    DarkUp,
    DarkGrid,
    DarkTrellis,
    LightHorizontal,
    LightVertical,
    LightDown,
    LightUp,
    LightGrid,
    LightTrellis,
}

impl PatternType {
    const ALL: [Self; 19] = [
        Self::None,
        Self::Solid,
        Self::Gray125,
        Self::Gray0625,
        Self::DarkGray,
        Self::MediumGray,
        Self::LightGray,
        Self::DarkHorizontal,
        Self::DarkVertical,
        Self::DarkDown,
        Self::DarkUp,
        Self::DarkGrid,
        Self::DarkTrellis,
        Self::LightHorizontal,
        Self::LightVertical,
        Self::LightDown,
        Self::LightUp,
        Self::LightGrid,
        Self::LightTrellis,
    ];

    /// The `patternType` attribute value used in `styles.xml`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Solid => "solid",
            Self::Gray125 => "gray125",
            Self::Gray0625 => "gray0625",
            Self::DarkGray => "darkGray",
            Self::MediumGray => "mediumGray",
            Self::LightGray => "lightGray",
            Self::DarkHorizontal => "darkHorizontal",
            Self::DarkVertical => "darkVertical",
            Self::DarkDown => "darkDown",
            Self::DarkUp => "darkUp",
            Self::DarkGrid => "darkGrid",
            Self::DarkTrellis => "darkTrellis",
            Self::LightHorizontal => "lightHorizontal",
            Self::LightVertical => "lightVertical",
            Self::LightDown => "lightDown",
            Self::LightUp => "lightUp",
            Self::LightGrid => "lightGrid",
            Self::LightTrellis => "lightTrellis",
        }
    }
}

impl FromStr for PatternType {
    type Err = XlwriteError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| XlwriteError::InvalidStyle(s.to_string()))
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
    fn test_argb_normalizes() {
        assert_eq!("ff0000ff".parse::<Argb>().unwrap().as_str(), "FF0000FF");
        assert_eq!("#00ff00".parse::<Argb>().unwrap().as_str(), "FF00FF00");
        assert!("red".parse::<Argb>().is_err());
        assert!("FFF".parse::<Argb>().is_err());
    }

    #[test]
    fn test_font_size_parse_and_display() {
        assert_eq!("11".parse::<FontSize>().unwrap(), FontSize::points(11));
        assert_eq!("10.5".parse::<FontSize>().unwrap().to_string(), "10.5");
        assert_eq!("8.25".parse::<FontSize>().unwrap().to_string(), "8.25");
        assert_eq!("12.50".parse::<FontSize>().unwrap().to_string(), "12.5");
        assert!("0".parse::<FontSize>().is_err());
        assert!("1.234".parse::<FontSize>().is_err());
        assert!(".5".parse::<FontSize>().is_err());
        assert!("abc".parse::<FontSize>().is_err());
    }

    #[test]
    fn test_keyword_round_trip() {
        for style in BorderStyle::ALL {
            assert_eq!(style.as_str().parse::<BorderStyle>().unwrap(), style);
        }
        for pattern in PatternType::ALL {
            assert_eq!(pattern.as_str().parse::<PatternType>().unwrap(), pattern);
        }
        assert!("wavy".parse::<BorderStyle>().is_err());
    }

    #[test]
    fn test_border_first_write_wins() {
        let mut border = BorderAttributes::default();
        let thin = BorderLine {
            style: BorderStyle::Thin,
            color: None,
        };
        let thick = BorderLine {
            style: BorderStyle::Thick,
            color: None,
        };
        assert!(border.set_side_if_unset(BorderSide::Top, thin));
        assert!(!border.set_side_if_unset(BorderSide::Top, thick));
        assert_eq!(
            border.side(BorderSide::Top).map(|l| l.style),
            Some(BorderStyle::Thin)
        );
    }

    #[test]
    fn test_fill_effective_pattern() {
        let mut fill = FillAttributes::default();
        assert_eq!(fill.effective_pattern(), PatternType::None);
        fill.fg_color = Some("FFFF0000".parse().unwrap());
        assert_eq!(fill.effective_pattern(), PatternType::Solid);
        fill.pattern = Some(PatternType::DarkGrid);
        assert_eq!(fill.effective_pattern(), PatternType::DarkGrid);
    }

    #[test]
    fn test_fill_normalized() {
        let colors_only = FillAttributes {
            fg_color: Some("FFFF0000".parse().unwrap()),
            ..FillAttributes::default()
        };
        let solid = FillAttributes {
            pattern: Some(PatternType::Solid),
            ..colors_only.clone()
        };
        assert_eq!(colors_only.normalized(), solid);
        assert_eq!(solid.normalized(), solid);
        assert_eq!(
            FillAttributes::default().normalized().pattern,
            Some(PatternType::None)
        );
    }
}
