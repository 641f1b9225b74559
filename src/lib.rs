// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::new_without_default)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # tagcheck
//!
//! Accessibility analysis for tagged document structure trees: checks that
//! the logical structure of a document is well formed and that its claimed
//! reading order agrees with the page layout.
//!
//! ## Core Features
//!
//! ### Structure Tree Model
//! - **Semantic nodes**: one capability ([`SemanticNode`]) over four shapes
//!   (content, table, list, figure), closed under the [`Node`] sum type
//! - **Tagged PDF vocabulary**: ISO 32000-1:2008 Section 14.8.4 standard
//!   structure types, with custom types preserved
//! - **Page geometry**: page-scoped, y-up bounding boxes
//!
//! ### Structural Analysis
//! - Nesting legality, required children, required attributes
//! - Empty elements, duplicate identifiers, depth ceiling
//! - Rule tables as data; unknown kinds are permitted
//!
//! ### Reading-Order Validation
//! - Top-to-bottom order, script direction (LTR/RTL), overlapping boxes
//! - Column interleaving across multi-column layouts
//! - Pages validated independently
//!
//! Both engines are pure functions of an immutable tree: they never fail,
//! perform no I/O and keep no state between calls.
//!
//! ## Quick Start
//!
//! ```
//! use tagcheck::compliance::{analyze, validate};
//! use tagcheck::config::{ReadingOrderOptions, StructuralOptions};
//! use tagcheck::geometry::BoundingBox;
//! use tagcheck::structure::{ContentNode, ListNode, ListNumbering, Node, NodeKind, SemanticNode};
//!
//! let item = ContentNode::new(NodeKind::LI)
//!     .with_child(ContentNode::new(NodeKind::Lbl).with_text("1."))
//!     .with_child(ContentNode::new(NodeKind::LBody).with_text("Unpack the box"));
//!
//! let tree: Node = ContentNode::document()
//!     .with_child(ContentNode::heading(1, "Setup").with_bbox(BoundingBox::new(0, 72.0, 720.0, 200.0, 24.0)))
//!     .with_child(
//!         ListNode::new(ListNumbering::Decimal)
//!             .with_bbox(BoundingBox::new(0, 72.0, 660.0, 400.0, 40.0))
//!             .with_child(item),
//!     )
//!     .into();
//!
//! let structural = analyze(&tree, &StructuralOptions::default());
//! assert!(structural.is_valid);
//! assert_eq!(structural.total_node_count, 6);
//!
//! let reading_order = validate(&tree, &ReadingOrderOptions::default());
//! assert!(reading_order.is_valid);
//! println!("{}", structural);
//! println!("{}", reading_order);
//! ```

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// Page geometry
pub mod geometry;

// Semantic structure tree
pub mod structure;

// Engine options and presets
pub mod config;

// Structural and reading-order analysis
pub mod compliance;

// Re-exports
pub use compliance::{
    analyze, validate, ReadingOrderResult, ReadingOrderValidator, StructuralAnalyzer,
    StructuralResult,
};
pub use config::{ReadingDirection, ReadingOrderOptions, StructuralOptions};
pub use error::{Error, Result};
pub use structure::{Node, SemanticNode};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
