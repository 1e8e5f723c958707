//! XML namespaces, relationship types and content types written into the
//! package.

// =============================================================================
// Spreadsheet namespaces
// =============================================================================

/// Main spreadsheet namespace (Transitional conformance)
pub const NS_SPREADSHEET: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// Office document relationships namespace, bound to the `r:` prefix
pub const NS_DOC_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Markup compatibility namespace, bound to the `mc:` prefix
pub const NS_MARKUP_COMPAT: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";

/// Excel 2009 spreadsheet extensions, bound to the `x14ac:` prefix
pub const NS_X14AC: &str = "http://schemas.microsoft.com/office/spreadsheetml/2009/9/ac";

// =============================================================================
// Package namespaces
// =============================================================================

/// Relationships namespace
pub const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Content types namespace
pub const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

// =============================================================================
// Document property namespaces
// =============================================================================

pub const NS_EXTENDED_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties";

pub const NS_DOC_PROPS_VTYPES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes";

pub const NS_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";

pub const NS_DC: &str = "http://purl.org/dc/elements/1.1/";

pub const NS_DC_TERMS: &str = "http://purl.org/dc/terms/";

pub const NS_DCMI_TYPE: &str = "http://purl.org/dc/dcmitype/";

pub const NS_XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";

// =============================================================================
// Relationship types
// =============================================================================

/// Relationship type for worksheets
pub const REL_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";

/// Relationship type for styles
pub const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

/// Relationship type for shared strings
pub const REL_SHARED_STRINGS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";

/// Relationship type for theme
pub const REL_THEME: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";

/// Relationship type for workbook (from root .rels)
pub const REL_WORKBOOK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

pub const REL_EXTENDED_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";

pub const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";

// =============================================================================
// Content types
// =============================================================================

pub const CT_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";

pub const CT_XML: &str = "application/xml";

pub const CT_WORKBOOK: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

pub const CT_WORKSHEET: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";

pub const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";

pub const CT_STYLES: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";

pub const CT_SHARED_STRINGS: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml";

pub const CT_CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";

pub const CT_EXTENDED_PROPERTIES: &str =
    "application/vnd.openxmlformats-officedocument.extended-properties+xml";
