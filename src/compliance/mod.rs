//! Accessibility analysis of semantic structure trees.
//!
//! Two independent engines work on an immutable [`Node`](crate::structure::Node) tree:
//!
//! - [`StructuralAnalyzer`]: nesting legality, required children and
//!   attributes, empty elements, duplicate ids, depth ceiling
//! - [`ReadingOrderValidator`]: whether the claimed reading order agrees
//!   with the page geometry (top-to-bottom, script direction, overlaps,
//!   column interleaving)
//!
//! Neither engine fails. Every problem found is returned as an issue record
//! in the result value.
//!
//! ## Example
//!
//! ```
//! use tagcheck::compliance::{analyze, validate};
//! use tagcheck::config::{ReadingOrderOptions, StructuralOptions};
//! use tagcheck::geometry::BoundingBox;
//! use tagcheck::structure::{ContentNode, FigureNode, Node, SemanticNode};
//!
//! let tree: Node = ContentNode::document()
//!     .with_child(ContentNode::heading(1, "Results").with_bbox(BoundingBox::new(0, 72.0, 720.0, 300.0, 24.0)))
//!     .with_child(FigureNode::new().with_bbox(BoundingBox::new(0, 72.0, 400.0, 300.0, 280.0)))
//!     .into();
//!
//! let structural = analyze(&tree, &StructuralOptions::default());
//! assert!(!structural.is_valid); // figure lacks Alt/ActualText
//!
//! let reading = validate(&tree, &ReadingOrderOptions::default());
//! assert!(reading.is_valid);
//! ```

pub mod checker;
pub mod columns;
pub mod reading_order;
pub mod rules;
pub mod structural;
mod types;

pub use checker::{CheckResult, CriterionChecker, Violation};
pub use reading_order::{
    validate, ReadingOrderIssue, ReadingOrderIssueType, ReadingOrderResult,
    ReadingOrderValidator, Severity,
};
pub use structural::{
    analyze, StructuralAnalyzer, StructuralIssue, StructuralIssueCode, StructuralResult,
};
pub use types::{context, issue_id, IssueContext};
