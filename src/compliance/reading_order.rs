//! Reading-order validator.
//!
//! The claimed reading order is the pre-order traversal of the structure
//! tree. Every node with a bounding box takes part; nodes without one are
//! skipped silently. Pages are validated independently, one pair `(A, B)`
//! at a time, where B is each node in turn and A the nearest node before it
//! that does not enclose it:
//!
//! - **outOfOrder** (critical): B sits clearly above A and the jump is not a
//!   move to the next column
//! - **reverseDirection** (warning): A and B share a line but B lies against
//!   the reading direction
//! - **overlapping** (warning): A and B overlap by at least the configured
//!   fraction of the smaller box
//! - **columnJump** (warning): the order returns to a column it had already
//!   left (see [`super::columns`])
//!
//! Coordinates are y-up: a larger `y` is higher on the page.
//!
//! ## Example
//!
//! ```
//! use tagcheck::compliance::{validate, ReadingOrderIssueType};
//! use tagcheck::config::ReadingOrderOptions;
//! use tagcheck::geometry::BoundingBox;
//! use tagcheck::structure::{ContentNode, Node, SemanticNode};
//!
//! let tree: Node = ContentNode::document()
//!     .with_child(ContentNode::paragraph("second").with_bbox(BoundingBox::new(0, 72.0, 600.0, 400.0, 20.0)))
//!     .with_child(ContentNode::paragraph("first").with_bbox(BoundingBox::new(0, 72.0, 700.0, 400.0, 20.0)))
//!     .into();
//!
//! let result = validate(&tree, &ReadingOrderOptions::default());
//! assert_eq!(result.count(ReadingOrderIssueType::OutOfOrder), 1);
//! assert_eq!(result.critical_count(), 1);
//! ```

use super::columns::{column_units, ColumnStep, ColumnTracker};
use super::types::{context, issue_id, IssueContext};
use crate::config::{ReadingDirection, ReadingOrderOptions};
use crate::geometry::{BoundingBox, Rect};
use crate::structure::{
    collect_positioned, traversal::group_by_page, traversal::is_positioned_ancestor, Node, NodeId,
    PositionedNode, SemanticNode,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

const ENGINE: &str = "readingOrder";

/// Fraction of the smaller height two boxes must share to be on one line.
const SAME_LINE_FRACTION: f32 = 0.5;

/// Issue severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    /// The claimed order is wrong
    Critical,
    /// The claimed order is suspicious
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Category of a reading-order issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReadingOrderIssueType {
    /// Later node sits clearly above the earlier one
    OutOfOrder,
    /// Same line, against the reading direction
    ReverseDirection,
    /// Consecutive boxes overlap
    Overlapping,
    /// Order returns to an abandoned column
    ColumnJump,
}

impl ReadingOrderIssueType {
    /// Stable type name (`outOfOrder`, `columnJump`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OutOfOrder => "outOfOrder",
            Self::ReverseDirection => "reverseDirection",
            Self::Overlapping => "overlapping",
            Self::ColumnJump => "columnJump",
        }
    }

    /// Severity attached to this type
    pub fn severity(&self) -> Severity {
        match self {
            Self::OutOfOrder => Severity::Critical,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for ReadingOrderIssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reading-order issue between two nodes on one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingOrderIssue {
    /// Issue identifier, unique within a result
    pub id: Uuid,
    /// Issue category
    #[serde(rename = "type")]
    pub issue_type: ReadingOrderIssueType,
    /// Severity
    pub severity: Severity,
    /// Page both nodes are on
    pub page_index: u32,
    /// Node earlier in the claimed order
    pub first_node: NodeId,
    /// Node later in the claimed order
    pub second_node: NodeId,
    /// Human-readable message
    pub message: String,
    /// Details for programmatic inspection
    pub context: IssueContext,
}

impl fmt::Display for ReadingOrderIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {}] page {}: {}",
            self.severity, self.issue_type, self.page_index, self.message
        )
    }
}

/// Outcome of a reading-order validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingOrderResult {
    /// True iff no issues of any severity were found
    pub is_valid: bool,
    /// Issues, page by page, in claimed order within a page
    pub issues: Vec<ReadingOrderIssue>,
    /// Number of nodes with a bounding box
    pub total_positioned_nodes: usize,
    /// Number of distinct pages among positioned nodes
    pub page_count: usize,
}

impl ReadingOrderResult {
    /// Issues grouped by severity, severities in order of first occurrence.
    pub fn issues_by_severity(&self) -> IndexMap<Severity, Vec<&ReadingOrderIssue>> {
        let mut groups: IndexMap<Severity, Vec<&ReadingOrderIssue>> = IndexMap::new();
        for issue in &self.issues {
            groups.entry(issue.severity).or_default().push(issue);
        }
        groups
    }

    /// Number of critical issues
    pub fn critical_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Critical)
            .count()
    }

    /// Number of warnings
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// Number of issues of one type
    pub fn count(&self, issue_type: ReadingOrderIssueType) -> usize {
        self.issues
            .iter()
            .filter(|i| i.issue_type == issue_type)
            .count()
    }

    /// Issues on one page
    pub fn issues_on_page(&self, page_index: u32) -> Vec<&ReadingOrderIssue> {
        self.issues
            .iter()
            .filter(|i| i.page_index == page_index)
            .collect()
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for ReadingOrderResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} positioned nodes on {} pages: ",
            self.total_positioned_nodes, self.page_count
        )?;
        if self.is_valid {
            write!(f, "reading order OK")
        } else {
            write!(
                f,
                "{} issues ({} critical, {} warnings)",
                self.issues.len(),
                self.critical_count(),
                self.warning_count()
            )
        }
    }
}

/// Reading-order validator.
///
/// Out-of-range options are clamped on construction, so validation itself
/// cannot fail.
#[derive(Debug, Clone, Default)]
pub struct ReadingOrderValidator {
    options: ReadingOrderOptions,
}

impl ReadingOrderValidator {
    /// Create a validator; invalid tolerances are clamped with a warning.
    pub fn new(options: ReadingOrderOptions) -> Self {
        Self {
            options: options.sanitized(),
        }
    }

    /// Options in effect (after clamping)
    pub fn options(&self) -> &ReadingOrderOptions {
        &self.options
    }

    /// Validate the claimed reading order of the tree rooted at `root`.
    pub fn validate(&self, root: &Node) -> ReadingOrderResult {
        let positioned = collect_positioned(root);
        let units = column_units(root);
        let pages = group_by_page(&positioned);
        log::debug!(
            "Validating reading order: {} positioned nodes on {} pages",
            positioned.len(),
            pages.len()
        );

        let mut issues = Vec::new();
        for (page_index, indices) in &pages {
            self.validate_page(*page_index, &positioned, &units, indices, &mut issues);
        }

        let result = ReadingOrderResult {
            is_valid: issues.is_empty(),
            issues,
            total_positioned_nodes: positioned.len(),
            page_count: pages.len(),
        };
        log::debug!("Reading-order validation complete: {}", result);
        result
    }

    fn validate_page(
        &self,
        page_index: u32,
        positioned: &[PositionedNode<'_>],
        units: &[Option<usize>],
        indices: &[usize],
        issues: &mut Vec<ReadingOrderIssue>,
    ) {
        let extents = unit_extents(positioned, units, indices);
        let mut columns = ColumnTracker::new();
        let mut current_unit: Option<usize> = None;
        let mut last_in_columns: Option<usize> = None;

        for (position, &index) in indices.iter().enumerate() {
            let current = &positioned[index];

            // Containment is not an ordering claim: compare with the nearest
            // earlier node that does not enclose this one
            let earlier = indices[..position]
                .iter()
                .rev()
                .copied()
                .find(|&prev| !is_positioned_ancestor(positioned, prev, index));
            if let Some(prev) = earlier {
                self.check_pair(page_index, &positioned[prev], current, issues);
            }

            let unit = if self.options.validate_columns {
                units.get(index).copied().flatten()
            } else {
                None
            };
            if let Some(unit) = unit {
                if current_unit != Some(unit) {
                    current_unit = Some(unit);
                    if let Some(extent) = extents.get(&unit) {
                        let step = columns.observe(extent);
                        if let (ColumnStep::Returned(band), Some(last)) = (step, last_in_columns) {
                            let band = columns.bands()[band];
                            push_issue(
                                issues,
                                ReadingOrderIssueType::ColumnJump,
                                page_index,
                                &positioned[last],
                                current,
                                format!(
                                    "{} returns to the column at x {:.1}-{:.1} after leaving it",
                                    current.node.kind(),
                                    band.left,
                                    band.right
                                ),
                                context([
                                    ("columnLeft", format!("{:.1}", band.left)),
                                    ("columnRight", format!("{:.1}", band.right)),
                                ]),
                            );
                        }
                    }
                }
                last_in_columns = Some(index);
            }
        }
    }

    fn check_pair(
        &self,
        page_index: u32,
        first: &PositionedNode<'_>,
        second: &PositionedNode<'_>,
        issues: &mut Vec<ReadingOrderIssue>,
    ) {
        let (a, b) = (&first.bbox, &second.bbox);

        let gap = b.bottom() - a.top();
        if gap > self.options.vertical_tolerance && !self.is_column_change(a, b) {
            push_issue(
                issues,
                ReadingOrderIssueType::OutOfOrder,
                page_index,
                first,
                second,
                format!(
                    "{} is read after {} but sits {:.1}pt above it",
                    second.node.kind(),
                    first.node.kind(),
                    gap
                ),
                context([("verticalGap", format!("{:.1}", gap))]),
            );
        } else if same_line(a, b) {
            if let Some(shift) = self.reverse_shift(a, b) {
                push_issue(
                    issues,
                    ReadingOrderIssueType::ReverseDirection,
                    page_index,
                    first,
                    second,
                    format!(
                        "{} is read after {} on the same line but lies {:.1}pt against the reading direction",
                        second.node.kind(),
                        first.node.kind(),
                        shift
                    ),
                    context([
                        ("horizontalShift", format!("{:.1}", shift)),
                        ("direction", direction_name(self.options.direction).to_string()),
                    ]),
                );
            }
        }

        if self.options.check_overlaps {
            let fraction = a.overlap_fraction(b);
            if fraction >= self.options.overlap_threshold {
                push_issue(
                    issues,
                    ReadingOrderIssueType::Overlapping,
                    page_index,
                    first,
                    second,
                    format!(
                        "{} and {} overlap by {:.0}% of the smaller box",
                        first.node.kind(),
                        second.node.kind(),
                        fraction * 100.0
                    ),
                    context([("overlapFraction", format!("{:.2}", fraction))]),
                );
            }
        }
    }

    /// A jump up the page is a column change when B sits beside A, on the
    /// side the reading direction moves towards.
    fn is_column_change(&self, a: &BoundingBox, b: &BoundingBox) -> bool {
        let tolerance = self.options.horizontal_tolerance;
        if a.rect.horizontal_overlap(&b.rect) > tolerance {
            return false;
        }
        match self.options.direction {
            ReadingDirection::LeftToRight => b.left() >= a.right() - tolerance,
            ReadingDirection::RightToLeft => b.right() <= a.left() + tolerance,
        }
    }

    /// How far B lies against the reading direction, if beyond tolerance on
    /// both edges.
    fn reverse_shift(&self, a: &BoundingBox, b: &BoundingBox) -> Option<f32> {
        let tolerance = self.options.horizontal_tolerance;
        let (lead, trail) = match self.options.direction {
            ReadingDirection::LeftToRight => (a.left() - b.left(), a.right() - b.right()),
            ReadingDirection::RightToLeft => (b.right() - a.right(), b.left() - a.left()),
        };
        if lead > tolerance && trail > tolerance {
            Some(lead.min(trail))
        } else {
            None
        }
    }
}

fn same_line(a: &BoundingBox, b: &BoundingBox) -> bool {
    let smaller = a.height().min(b.height());
    smaller > 0.0 && a.rect.vertical_overlap(&b.rect) >= SAME_LINE_FRACTION * smaller
}

/// Union of each column unit's boxes on one page.
fn unit_extents(
    positioned: &[PositionedNode<'_>],
    units: &[Option<usize>],
    indices: &[usize],
) -> HashMap<usize, Rect> {
    let mut extents: HashMap<usize, Rect> = HashMap::new();
    for &index in indices {
        if let Some(unit) = units.get(index).copied().flatten() {
            let rect = positioned[index].bbox.rect;
            extents
                .entry(unit)
                .and_modify(|extent| *extent = extent.union(&rect))
                .or_insert(rect);
        }
    }
    extents
}

fn direction_name(direction: ReadingDirection) -> &'static str {
    match direction {
        ReadingDirection::LeftToRight => "leftToRight",
        ReadingDirection::RightToLeft => "rightToLeft",
    }
}

fn push_issue(
    issues: &mut Vec<ReadingOrderIssue>,
    issue_type: ReadingOrderIssueType,
    page_index: u32,
    first: &PositionedNode<'_>,
    second: &PositionedNode<'_>,
    message: String,
    context: IssueContext,
) {
    let nodes = [first.node.id(), second.node.id()];
    let issue = ReadingOrderIssue {
        id: issue_id(ENGINE, issue_type.as_str(), &nodes, issues.len()),
        issue_type,
        severity: issue_type.severity(),
        page_index,
        first_node: nodes[0],
        second_node: nodes[1],
        message,
        context,
    };
    log::trace!("{}", issue);
    issues.push(issue);
}

/// Validate the reading order of `root` with `options`.
pub fn validate(root: &Node, options: &ReadingOrderOptions) -> ReadingOrderResult {
    ReadingOrderValidator::new(*options).validate(root)
}
