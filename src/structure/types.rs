//! Value types shared by every semantic node.
//!
//! Structure type names follow ISO 32000-1:2008 Section 14.8.4 (plus the
//! PDF 2.0 `DocumentHeader`/`DocumentFooter`/`Title` additions and an
//! `Artifact` pseudo-kind for content marked as artifact).

use crate::geometry::BoundingBox;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Identity of a node. Equality and ordering of nodes are defined by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Build an identifier from a fixed value (externally assigned ids).
    pub fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    /// Underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Node kinds.
///
/// The set is closed except for [`NodeKind::Custom`], which carries
/// unrecognized (usually role-mapped) structure type names verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Grouping
    /// Document root
    Document,
    /// Part (major division)
    Part,
    /// Article
    Art,
    /// Section
    Sect,
    /// Division
    Div,
    /// Block quotation
    BlockQuote,
    /// Caption
    Caption,
    /// Table of contents
    TOC,
    /// Table of contents item
    TOCI,
    /// Index
    Index,
    /// Non-structural grouping
    NonStruct,
    /// Producer-private content
    Private,
    /// Document title (PDF 2.0)
    Title,

    // Paragraph-like
    /// Paragraph
    P,
    /// Heading without explicit level
    H,
    /// Heading level 1
    H1,
    /// Heading level 2
    H2,
    /// Heading level 3
    H3,
    /// Heading level 4
    H4,
    /// Heading level 5
    H5,
    /// Heading level 6
    H6,

    // Lists
    /// List
    L,
    /// List item
    LI,
    /// Label (list item marker)
    Lbl,
    /// List body (list item content)
    LBody,

    // Tables
    /// Table
    Table,
    /// Table header row group
    THead,
    /// Table body row group
    TBody,
    /// Table footer row group
    TFoot,
    /// Table row
    TR,
    /// Table header cell
    TH,
    /// Table data cell
    TD,

    // Inline
    /// Span (inline generic)
    Span,
    /// Quote
    Quote,
    /// Note
    Note,
    /// Reference
    Reference,
    /// Bibliographic entry
    BibEntry,
    /// Code
    Code,
    /// Link
    Link,
    /// Annotation
    Annot,
    /// Ruby annotation
    Ruby,

    // Illustration
    /// Figure
    Figure,
    /// Formula
    Formula,
    /// Form widget
    Form,

    // Artifacts and page furniture
    /// Content marked as artifact
    Artifact,
    /// Running header
    DocumentHeader,
    /// Running footer
    DocumentFooter,

    /// Any other structure type name
    Custom(String),
}

impl NodeKind {
    /// Parse a structure type name (e.g. `"LBody"` -> `NodeKind::LBody`).
    pub fn from_tag(s: &str) -> Self {
        match s {
            "Document" => Self::Document,
            "Part" => Self::Part,
            "Art" => Self::Art,
            "Sect" => Self::Sect,
            "Div" => Self::Div,
            "BlockQuote" => Self::BlockQuote,
            "Caption" => Self::Caption,
            "TOC" => Self::TOC,
            "TOCI" => Self::TOCI,
            "Index" => Self::Index,
            "NonStruct" => Self::NonStruct,
            "Private" => Self::Private,
            "Title" => Self::Title,
            "P" => Self::P,
            "H" => Self::H,
            "H1" => Self::H1,
            "H2" => Self::H2,
            "H3" => Self::H3,
            "H4" => Self::H4,
            "H5" => Self::H5,
            "H6" => Self::H6,
            "L" => Self::L,
            "LI" => Self::LI,
            "Lbl" => Self::Lbl,
            "LBody" => Self::LBody,
            "Table" => Self::Table,
            "THead" => Self::THead,
            "TBody" => Self::TBody,
            "TFoot" => Self::TFoot,
            "TR" => Self::TR,
            "TH" => Self::TH,
            "TD" => Self::TD,
            "Span" => Self::Span,
            "Quote" => Self::Quote,
            "Note" => Self::Note,
            "Reference" => Self::Reference,
            "BibEntry" => Self::BibEntry,
            "Code" => Self::Code,
            "Link" => Self::Link,
            "Annot" => Self::Annot,
            "Ruby" => Self::Ruby,
            "Figure" => Self::Figure,
            "Formula" => Self::Formula,
            "Form" => Self::Form,
            "Artifact" => Self::Artifact,
            "DocumentHeader" => Self::DocumentHeader,
            "DocumentFooter" => Self::DocumentFooter,
            _ => Self::Custom(s.to_string()),
        }
    }

    /// The structure type name used in reports and issue context.
    pub fn tag(&self) -> &str {
        match self {
            Self::Document => "Document",
            Self::Part => "Part",
            Self::Art => "Art",
            Self::Sect => "Sect",
            Self::Div => "Div",
            Self::BlockQuote => "BlockQuote",
            Self::Caption => "Caption",
            Self::TOC => "TOC",
            Self::TOCI => "TOCI",
            Self::Index => "Index",
            Self::NonStruct => "NonStruct",
            Self::Private => "Private",
            Self::Title => "Title",
            Self::P => "P",
            Self::H => "H",
            Self::H1 => "H1",
            Self::H2 => "H2",
            Self::H3 => "H3",
            Self::H4 => "H4",
            Self::H5 => "H5",
            Self::H6 => "H6",
            Self::L => "L",
            Self::LI => "LI",
            Self::Lbl => "Lbl",
            Self::LBody => "LBody",
            Self::Table => "Table",
            Self::THead => "THead",
            Self::TBody => "TBody",
            Self::TFoot => "TFoot",
            Self::TR => "TR",
            Self::TH => "TH",
            Self::TD => "TD",
            Self::Span => "Span",
            Self::Quote => "Quote",
            Self::Note => "Note",
            Self::Reference => "Reference",
            Self::BibEntry => "BibEntry",
            Self::Code => "Code",
            Self::Link => "Link",
            Self::Annot => "Annot",
            Self::Ruby => "Ruby",
            Self::Figure => "Figure",
            Self::Formula => "Formula",
            Self::Form => "Form",
            Self::Artifact => "Artifact",
            Self::DocumentHeader => "DocumentHeader",
            Self::DocumentFooter => "DocumentFooter",
            Self::Custom(name) => name,
        }
    }

    /// Heading kind for a level; levels outside 1..=6 map to the generic `H`.
    pub fn heading(level: u8) -> Self {
        match level {
            1 => Self::H1,
            2 => Self::H2,
            3 => Self::H3,
            4 => Self::H4,
            5 => Self::H5,
            6 => Self::H6,
            _ => Self::H,
        }
    }

    /// Check if this is a heading type (H, H1-H6)
    pub fn is_heading(&self) -> bool {
        matches!(self, Self::H | Self::H1 | Self::H2 | Self::H3 | Self::H4 | Self::H5 | Self::H6)
    }

    /// Numeric level of an `H1`-`H6` heading.
    pub fn heading_level(&self) -> Option<u8> {
        match self {
            Self::H1 => Some(1),
            Self::H2 => Some(2),
            Self::H3 => Some(3),
            Self::H4 => Some(4),
            Self::H5 => Some(5),
            Self::H6 => Some(6),
            _ => None,
        }
    }

    /// Check if this is a block-level element
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            Self::Document
                | Self::Part
                | Self::Art
                | Self::Sect
                | Self::Div
                | Self::BlockQuote
                | Self::Caption
                | Self::TOC
                | Self::TOCI
                | Self::Index
                | Self::Title
                | Self::P
                | Self::H
                | Self::H1
                | Self::H2
                | Self::H3
                | Self::H4
                | Self::H5
                | Self::H6
                | Self::L
                | Self::LI
                | Self::Table
                | Self::Figure
                | Self::Formula
        )
    }

    /// Table rows, row groups and cells.
    pub fn is_table_part(&self) -> bool {
        matches!(
            self,
            Self::THead | Self::TBody | Self::TFoot | Self::TR | Self::TH | Self::TD
        )
    }

    /// Kinds that do not belong to the logical content (artifacts, page furniture).
    pub fn is_artifact(&self) -> bool {
        matches!(self, Self::Artifact | Self::DocumentHeader | Self::DocumentFooter)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

/// Attribute value attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Explicit null
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Integer(i64),
    /// Floating-point number
    Float(f64),
    /// Text
    String(String),
    /// Array of values
    Array(Vec<AttributeValue>),
}

impl AttributeValue {
    /// Text value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean value, if this is a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer value, if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value (integers widen to f64).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Whether this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Non-blank text content (whitespace-only strings don't count).
    pub fn non_empty_text(&self) -> Option<&str> {
        self.as_str().filter(|s| !s.trim().is_empty())
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for AttributeValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

/// Ordered attribute map. Keys are unique by construction.
pub type Attributes = IndexMap<String, AttributeValue>;

/// Attribute key holding alternate description text.
pub const ATTR_ALT: &str = "Alt";

/// Attribute key holding replacement text.
pub const ATTR_ACTUAL_TEXT: &str = "ActualText";

/// A run of text content, positioned when the extractor knew where it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    /// Unicode text
    pub text: String,
    /// Location on the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
}

impl TextRun {
    /// Unpositioned text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bbox: None,
        }
    }

    /// Text with a location.
    pub fn positioned(text: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            bbox: Some(bbox),
        }
    }
}

/// List numbering scheme (the `/ListNumbering` attribute).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListNumbering {
    /// Bulleted or unlabeled
    Unordered,
    /// 1, 2, 3
    Decimal,
    /// I, II, III
    UpperRoman,
    /// i, ii, iii
    LowerRoman,
    /// A, B, C
    UpperAlpha,
    /// a, b, c
    LowerAlpha,
    /// Not specified or unrecognized
    #[default]
    Unknown,
}

impl ListNumbering {
    /// Map a PDF `/ListNumbering` name.
    pub fn from_pdf_name(name: &str) -> Self {
        match name {
            "None" | "Disc" | "Circle" | "Square" => Self::Unordered,
            "Decimal" => Self::Decimal,
            "UpperRoman" => Self::UpperRoman,
            "LowerRoman" => Self::LowerRoman,
            "UpperAlpha" => Self::UpperAlpha,
            "LowerAlpha" => Self::LowerAlpha,
            _ => Self::Unknown,
        }
    }

    /// Whether items carry sequence numbers.
    pub fn is_ordered(&self) -> bool {
        !matches!(self, Self::Unordered | Self::Unknown)
    }
}

/// An embedded raster image inside a figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageChunk {
    /// Placement on the page
    pub bbox: BoundingBox,
    /// Image width in pixels
    pub pixel_width: u32,
    /// Image height in pixels
    pub pixel_height: u32,
}

/// Vector line art inside a figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineArtChunk {
    /// Bounds of the paths
    pub bbox: BoundingBox,
    /// Number of path segments
    pub segment_count: usize,
}
