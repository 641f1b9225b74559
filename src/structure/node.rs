//! Semantic nodes.
//!
//! Every node shape embeds a [`NodeCore`] holding the fields all nodes share
//! (identity, kind, bounding box, children, attributes, depth, cached issue
//! codes) and implements [`SemanticNode`] on top of it. The closed set of
//! shapes is the [`Node`] sum type.
//!
//! Children are owned values. A node never stores its parent; traversals pass
//! the parent along instead (see [`crate::structure::traversal`]).

use super::builder::{check_depths, rebase_depths};
use super::traversal::pre_order;
use super::types::{
    AttributeValue, Attributes, ImageChunk, LineArtChunk, ListNumbering, NodeId, NodeKind,
    TextRun, ATTR_ACTUAL_TEXT, ATTR_ALT,
};
use crate::error::Result;
use crate::geometry::BoundingBox;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Fields shared by every node shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeCore {
    #[serde(default)]
    pub(crate) id: NodeId,
    pub(crate) kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) bbox: Option<BoundingBox>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub(crate) attributes: Attributes,
    #[serde(default)]
    pub(crate) depth: usize,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub(crate) issue_codes: IndexSet<String>,
}

impl NodeCore {
    /// Create a core with a fresh id, depth 0 and no children.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: NodeId::new(),
            kind,
            bbox: None,
            children: Vec::new(),
            attributes: Attributes::new(),
            depth: 0,
            issue_codes: IndexSet::new(),
        }
    }
}

impl Drop for NodeCore {
    // Flatten the subtree so dropping a deep chain does not recurse.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.core_mut().children);
        }
    }
}

/// Capability shared by all node shapes.
///
/// Shapes provide access to their [`NodeCore`] and say whether they carry
/// content of their own; everything else is derived.
pub trait SemanticNode {
    /// Shared fields
    fn core(&self) -> &NodeCore;

    /// Shared fields, mutably. Identity and kind have no setters.
    fn core_mut(&mut self) -> &mut NodeCore;

    /// Whether the node carries content itself (text runs, image or line-art
    /// chunks), independent of its children.
    fn has_own_content(&self) -> bool;

    /// Text carried by the node itself, runs joined with a space.
    fn own_text(&self) -> String {
        String::new()
    }

    /// Node identity
    fn id(&self) -> NodeId {
        self.core().id
    }

    /// Node kind
    fn kind(&self) -> &NodeKind {
        &self.core().kind
    }

    /// Position on the page, if known
    fn bbox(&self) -> Option<&BoundingBox> {
        self.core().bbox.as_ref()
    }

    /// Page index of the bounding box, if any
    fn page_index(&self) -> Option<u32> {
        self.bbox().map(|b| b.page_index)
    }

    /// Children in author order
    fn children(&self) -> &[Node] {
        &self.core().children
    }

    /// Attribute map
    fn attributes(&self) -> &Attributes {
        &self.core().attributes
    }

    /// Look up one attribute
    fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.core().attributes.get(key)
    }

    /// Distance from the tree root, as assigned by whoever built the tree
    fn depth(&self) -> usize {
        self.core().depth
    }

    /// Issue codes cached on this node by earlier passes
    fn issue_codes(&self) -> &IndexSet<String> {
        &self.core().issue_codes
    }

    /// Non-blank `Alt`, falling back to non-blank `ActualText`.
    fn text_alternative(&self) -> Option<&str> {
        self.attribute(ATTR_ALT)
            .and_then(AttributeValue::non_empty_text)
            .or_else(|| self.attribute(ATTR_ACTUAL_TEXT).and_then(AttributeValue::non_empty_text))
    }

    /// Cache an issue code. Returns false if it was already present.
    fn add_issue_code(&mut self, code: impl Into<String>) -> bool
    where
        Self: Sized,
    {
        self.core_mut().issue_codes.insert(code.into())
    }

    /// Drop a cached issue code. Returns false if it was absent.
    fn remove_issue_code(&mut self, code: &str) -> bool {
        self.core_mut().issue_codes.shift_remove(code)
    }

    /// Drop all cached issue codes.
    fn clear_issue_codes(&mut self) {
        self.core_mut().issue_codes.clear();
    }

    /// Whether a code is cached on this node.
    fn has_issue_code(&self, code: &str) -> bool {
        self.core().issue_codes.contains(code)
    }

    /// Replace the generated id (externally assigned identifiers).
    fn with_id(mut self, id: NodeId) -> Self
    where
        Self: Sized,
    {
        self.core_mut().id = id;
        self
    }

    /// Set the bounding box.
    fn with_bbox(mut self, bbox: BoundingBox) -> Self
    where
        Self: Sized,
    {
        self.core_mut().bbox = Some(bbox);
        self
    }

    /// Set an attribute, replacing any previous value for the key.
    fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self
    where
        Self: Sized,
    {
        self.core_mut().attributes.insert(key.into(), value.into());
        self
    }

    /// Set the `Alt` attribute.
    fn with_alt(self, alt: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.with_attribute(ATTR_ALT, AttributeValue::String(alt.into()))
    }

    /// Set the `ActualText` attribute.
    fn with_actual_text(self, text: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.with_attribute(ATTR_ACTUAL_TEXT, AttributeValue::String(text.into()))
    }

    /// Append a child. The child's subtree depths are rebased under this node.
    fn with_child(mut self, child: impl Into<Node>) -> Self
    where
        Self: Sized,
    {
        let mut child = child.into();
        rebase_depths(&mut child, self.depth() + 1);
        self.core_mut().children.push(child);
        self
    }

    /// Append several children.
    fn with_children<I, C>(self, children: I) -> Self
    where
        Self: Sized,
        I: IntoIterator<Item = C>,
        C: Into<Node>,
    {
        children.into_iter().fold(self, |node, child| node.with_child(child))
    }

    /// Place this node at `depth`, rebasing its subtree.
    fn with_depth(mut self, depth: usize) -> Self
    where
        Self: Sized,
    {
        let core = self.core_mut();
        core.depth = depth;
        for child in core.children.iter_mut() {
            rebase_depths(child, depth + 1);
        }
        self
    }
}

/// Generic content node: headings, paragraphs, spans, links, artifacts, ...
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentNode {
    #[serde(flatten)]
    core: NodeCore,
    /// Text runs carried directly by this node
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<TextRun>,
}

impl ContentNode {
    /// Create a node of any kind.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            core: NodeCore::new(kind),
            text: Vec::new(),
        }
    }

    /// Document root
    pub fn document() -> Self {
        Self::new(NodeKind::Document)
    }

    /// Paragraph with text
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(NodeKind::P).with_text(text)
    }

    /// Heading at `level` (1-6; other levels produce a generic `H`)
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::new(NodeKind::heading(level)).with_text(text)
    }

    /// Inline span with text
    pub fn span(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Span).with_text(text)
    }

    /// Caption with text
    pub fn caption(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Caption).with_text(text)
    }

    /// Append an unpositioned text run.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text.push(TextRun::new(text));
        self
    }

    /// Append a text run.
    pub fn with_text_run(mut self, run: TextRun) -> Self {
        self.text.push(run);
        self
    }
}

impl SemanticNode for ContentNode {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn has_own_content(&self) -> bool {
        self.text.iter().any(|run| !run.text.trim().is_empty())
    }

    fn own_text(&self) -> String {
        self.text
            .iter()
            .map(|run| run.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Table node with optional summary and visual grid borders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableNode {
    #[serde(flatten)]
    core: NodeCore,
    /// Textual summary of the table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// X coordinates of vertical ruling lines, left to right
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_borders: Option<Vec<f32>>,
    /// Y coordinates of horizontal ruling lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_borders: Option<Vec<f32>>,
}

impl TableNode {
    /// Empty table
    pub fn new() -> Self {
        Self {
            core: NodeCore::new(NodeKind::Table),
            summary: None,
            column_borders: None,
            row_borders: None,
        }
    }

    /// Set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Set the visual grid borders.
    pub fn with_borders(mut self, column_borders: Vec<f32>, row_borders: Vec<f32>) -> Self {
        self.column_borders = Some(column_borders);
        self.row_borders = Some(row_borders);
        self
    }

    /// Rows, looking through `THead`/`TBody`/`TFoot` groups.
    pub fn rows(&self) -> Vec<&Node> {
        let mut rows = Vec::new();
        for child in self.children() {
            match child.kind() {
                NodeKind::TR => rows.push(child),
                NodeKind::THead | NodeKind::TBody | NodeKind::TFoot => rows.extend(
                    child.children().iter().filter(|n| *n.kind() == NodeKind::TR),
                ),
                _ => {},
            }
        }
        rows
    }

    /// Number of logical rows
    pub fn row_count(&self) -> usize {
        self.rows().len()
    }

    /// Widest row, counting `ColSpan` on cells
    pub fn column_count(&self) -> usize {
        self.rows()
            .iter()
            .map(|row| {
                row.children()
                    .iter()
                    .filter(|cell| matches!(cell.kind(), NodeKind::TH | NodeKind::TD))
                    .map(|cell| {
                        cell.attribute("ColSpan")
                            .and_then(AttributeValue::as_i64)
                            .filter(|span| *span > 0)
                            .unwrap_or(1) as usize
                    })
                    .sum::<usize>()
            })
            .max()
            .unwrap_or(0)
    }

    /// `(rows, columns)` implied by the ruling lines, when both are known.
    pub fn geometric_grid(&self) -> Option<(usize, usize)> {
        let xs = self.column_borders.as_ref()?;
        let ys = self.row_borders.as_ref()?;
        if xs.len() < 2 || ys.len() < 2 {
            return None;
        }
        Some((ys.len() - 1, xs.len() - 1))
    }

    /// Whether the ruling-line grid agrees with the logical row/column count.
    pub fn grid_matches_structure(&self) -> Option<bool> {
        self.geometric_grid()
            .map(|grid| grid == (self.row_count(), self.column_count()))
    }
}

impl Default for TableNode {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticNode for TableNode {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn has_own_content(&self) -> bool {
        false
    }
}

/// List node with numbering metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNode {
    #[serde(flatten)]
    core: NodeCore,
    /// Numbering scheme
    #[serde(default)]
    pub numbering: ListNumbering,
    /// First item number for ordered lists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    /// Nesting level among lists (0 for a top-level list)
    #[serde(default)]
    pub level: usize,
}

impl ListNode {
    /// Empty list
    pub fn new(numbering: ListNumbering) -> Self {
        Self {
            core: NodeCore::new(NodeKind::L),
            numbering,
            start: None,
            level: 0,
        }
    }

    /// Set the start number.
    pub fn with_start(mut self, start: u32) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the nesting level.
    pub fn with_level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    /// Whether items carry sequence numbers
    pub fn is_ordered(&self) -> bool {
        self.numbering.is_ordered()
    }

    /// Number of `LI` children
    pub fn item_count(&self) -> usize {
        self.children()
            .iter()
            .filter(|c| *c.kind() == NodeKind::LI)
            .count()
    }
}

impl SemanticNode for ListNode {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn has_own_content(&self) -> bool {
        false
    }
}

/// Figure node with embedded image and line-art chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FigureNode {
    #[serde(flatten)]
    core: NodeCore,
    /// Raster images
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageChunk>,
    /// Vector line art
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line_art: Vec<LineArtChunk>,
}

impl FigureNode {
    /// Empty figure
    pub fn new() -> Self {
        Self {
            core: NodeCore::new(NodeKind::Figure),
            images: Vec::new(),
            line_art: Vec::new(),
        }
    }

    /// Add a raster image.
    pub fn with_image(mut self, image: ImageChunk) -> Self {
        self.images.push(image);
        self
    }

    /// Add line art.
    pub fn with_line_art(mut self, art: LineArtChunk) -> Self {
        self.line_art.push(art);
        self
    }

    /// Whether any raster image is embedded
    pub fn has_raster_content(&self) -> bool {
        !self.images.is_empty()
    }

    /// Whether any line art is embedded
    pub fn has_line_art(&self) -> bool {
        !self.line_art.is_empty()
    }
}

impl Default for FigureNode {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticNode for FigureNode {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn has_own_content(&self) -> bool {
        self.has_raster_content() || self.has_line_art()
    }
}

/// Any node in a structure tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum Node {
    /// Generic content node
    Content(ContentNode),
    /// Table
    Table(TableNode),
    /// List
    List(ListNode),
    /// Figure
    Figure(FigureNode),
}

impl Node {
    /// Deserialize a tree. Depths are taken as stored.
    pub fn from_json(json: &str) -> Result<Node> {
        Ok(serde_json::from_str(json)?)
    }

    /// Deserialize a tree and reject depths that disagree with tree position.
    pub fn from_json_strict(json: &str) -> Result<Node> {
        let node = Self::from_json(json)?;
        check_depths(&node)?;
        Ok(node)
    }

    /// Serialize the tree as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Text of this node and all descendants in document order.
    pub fn text_content(&self) -> String {
        pre_order(self)
            .map(|visit| visit.node.own_text())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Find a node in this subtree by id.
    pub fn find(&self, id: NodeId) -> Option<&Node> {
        pre_order(self).map(|visit| visit.node).find(|n| n.id() == id)
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        pre_order(self).count()
    }

    /// The table shape, if this is one
    pub fn as_table(&self) -> Option<&TableNode> {
        match self {
            Node::Table(t) => Some(t),
            _ => None,
        }
    }

    /// The list shape, if this is one
    pub fn as_list(&self) -> Option<&ListNode> {
        match self {
            Node::List(l) => Some(l),
            _ => None,
        }
    }

    /// The figure shape, if this is one
    pub fn as_figure(&self) -> Option<&FigureNode> {
        match self {
            Node::Figure(f) => Some(f),
            _ => None,
        }
    }
}

impl SemanticNode for Node {
    fn core(&self) -> &NodeCore {
        match self {
            Node::Content(n) => n.core(),
            Node::Table(n) => n.core(),
            Node::List(n) => n.core(),
            Node::Figure(n) => n.core(),
        }
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        match self {
            Node::Content(n) => n.core_mut(),
            Node::Table(n) => n.core_mut(),
            Node::List(n) => n.core_mut(),
            Node::Figure(n) => n.core_mut(),
        }
    }

    fn has_own_content(&self) -> bool {
        match self {
            Node::Content(n) => n.has_own_content(),
            Node::Table(n) => n.has_own_content(),
            Node::List(n) => n.has_own_content(),
            Node::Figure(n) => n.has_own_content(),
        }
    }

    fn own_text(&self) -> String {
        match self {
            Node::Content(n) => n.own_text(),
            Node::Table(n) => n.own_text(),
            Node::List(n) => n.own_text(),
            Node::Figure(n) => n.own_text(),
        }
    }
}

impl From<ContentNode> for Node {
    fn from(n: ContentNode) -> Self {
        Node::Content(n)
    }
}

impl From<TableNode> for Node {
    fn from(n: TableNode) -> Self {
        Node::Table(n)
    }
}

impl From<ListNode> for Node {
    fn from(n: ListNode) -> Self {
        Node::List(n)
    }
}

impl From<FigureNode> for Node {
    fn from(n: FigureNode) -> Self {
        Node::Figure(n)
    }
}

// Node equality and ordering are by identity, not content.
macro_rules! identity_semantics {
    ($($shape:ty),*) => {
        $(
            impl PartialEq for $shape {
                fn eq(&self, other: &Self) -> bool {
                    self.id() == other.id()
                }
            }

            impl Eq for $shape {}

            impl Hash for $shape {
                fn hash<H: Hasher>(&self, state: &mut H) {
                    self.id().hash(state);
                }
            }

            impl PartialOrd for $shape {
                fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                    Some(self.cmp(other))
                }
            }

            impl Ord for $shape {
                fn cmp(&self, other: &Self) -> Ordering {
                    self.id().cmp(&other.id())
                }
            }
        )*
    };
}

identity_semantics!(ContentNode, TableNode, ListNode, FigureNode, Node);
