//! Semantic structure tree model.
//!
//! A document's logical structure (the tagged-PDF structure tree, already
//! extracted) is modeled as a tree of [`Node`] values. Four shapes share one
//! capability, [`SemanticNode`]:
//!
//! - [`ContentNode`]: headings, paragraphs, spans, links, captions, artifacts, ...
//! - [`TableNode`]: adds a summary and the visual grid borders
//! - [`ListNode`]: adds numbering scheme, start number and nesting level
//! - [`FigureNode`]: adds embedded image and line-art chunks
//!
//! ## Reading Order
//!
//! The claimed reading order is the pre-order traversal of the tree:
//! 1. Visit the node
//! 2. Recursively visit children in author order
//!
//! ## Example
//!
//! ```
//! use tagcheck::geometry::BoundingBox;
//! use tagcheck::structure::{ContentNode, Node, NodeKind, SemanticNode};
//!
//! let tree: Node = ContentNode::document()
//!     .with_child(ContentNode::heading(1, "Annual report").with_bbox(BoundingBox::new(0, 72.0, 720.0, 300.0, 24.0)))
//!     .with_child(ContentNode::paragraph("Revenue grew.").with_bbox(BoundingBox::new(0, 72.0, 680.0, 450.0, 14.0)))
//!     .into();
//!
//! assert_eq!(tree.node_count(), 3);
//! assert_eq!(*tree.children()[0].kind(), NodeKind::H1);
//! assert_eq!(tree.children()[1].depth(), 1);
//! ```

pub mod builder;
mod node;
pub mod traversal;
mod types;

pub use builder::{assign_depths, check_depths};
pub use node::{ContentNode, FigureNode, ListNode, Node, NodeCore, SemanticNode, TableNode};
pub use traversal::{collect_positioned, pre_order, PositionedNode, Visit};
pub use types::{
    AttributeValue, Attributes, ImageChunk, LineArtChunk, ListNumbering, NodeId, NodeKind,
    TextRun, ATTR_ACTUAL_TEXT, ATTR_ALT,
};
