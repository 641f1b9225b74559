//! Structural rule engine.
//!
//! Validates a structure tree in a single pre-order pass:
//! - Empty elements (no children, no content, no text alternative)
//! - Nesting legality (which child kinds a container admits)
//! - Required children (e.g. `LI` needs `Lbl` and `LBody`)
//! - Required attributes (e.g. `Figure` needs `Alt` or `ActualText`)
//! - Duplicate node identifiers
//! - Depth ceiling
//!
//! The rules themselves live in [`super::rules`]; node kinds without a rule
//! are never reported.
//!
//! ## Example
//!
//! ```
//! use tagcheck::compliance::{analyze, StructuralIssueCode};
//! use tagcheck::config::StructuralOptions;
//! use tagcheck::structure::{ContentNode, Node, NodeKind, SemanticNode};
//!
//! let item = ContentNode::new(NodeKind::LI)
//!     .with_child(ContentNode::new(NodeKind::Lbl).with_text("1."));
//! let tree: Node = ContentNode::document().with_child(item).into();
//!
//! let result = analyze(&tree, &StructuralOptions::default());
//! assert!(!result.is_valid);
//! assert_eq!(result.count(StructuralIssueCode::MissingRequiredChild), 1);
//! ```

use super::rules;
use super::types::{context, issue_id, IssueContext};
use crate::config::StructuralOptions;
use crate::structure::{pre_order, Node, NodeId, NodeKind, SemanticNode};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

const ENGINE: &str = "structural";

/// Category of a structural defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StructuralIssueCode {
    /// Node has no children, content or text alternative
    EmptyElement,
    /// Container holds a child kind it does not admit
    UnexpectedChild,
    /// Container lacks a mandatory child kind
    MissingRequiredChild,
    /// Node lacks a required attribute (or content alternative)
    MissingAttribute,
    /// Identifier seen more than once
    DuplicateId,
    /// Node nested deeper than allowed
    InvalidNesting,
}

impl StructuralIssueCode {
    /// Stable code name (`emptyElement`, `unexpectedChild`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyElement => "emptyElement",
            Self::UnexpectedChild => "unexpectedChild",
            Self::MissingRequiredChild => "missingRequiredChild",
            Self::MissingAttribute => "missingAttribute",
            Self::DuplicateId => "duplicateId",
            Self::InvalidNesting => "invalidNesting",
        }
    }
}

impl fmt::Display for StructuralIssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single structural defect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralIssue {
    /// Issue identifier, unique within a result
    pub id: Uuid,
    /// Defect category
    pub code: StructuralIssueCode,
    /// Kind of the offending node
    pub node_kind: NodeKind,
    /// Identity of the offending node
    pub node_id: NodeId,
    /// Page of the offending node, when it has a bounding box
    pub page_index: Option<u32>,
    /// Human-readable message
    pub message: String,
    /// Details for programmatic inspection
    pub context: IssueContext,
}

impl fmt::Display for StructuralIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} (at {} {}", self.code, self.message, self.node_kind, self.node_id)?;
        if let Some(page) = self.page_index {
            write!(f, ", page {}", page)?;
        }
        write!(f, ")")
    }
}

/// Outcome of a structural analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralResult {
    /// True iff no issues were found
    pub is_valid: bool,
    /// Issues in traversal order
    pub issues: Vec<StructuralIssue>,
    /// Number of nodes visited
    pub total_node_count: usize,
    /// Largest `depth` value among visited nodes
    pub max_depth: usize,
}

impl StructuralResult {
    /// Issues grouped by code, codes in order of first occurrence.
    pub fn issues_by_code(&self) -> IndexMap<StructuralIssueCode, Vec<&StructuralIssue>> {
        let mut groups: IndexMap<StructuralIssueCode, Vec<&StructuralIssue>> = IndexMap::new();
        for issue in &self.issues {
            groups.entry(issue.code).or_default().push(issue);
        }
        groups
    }

    /// Number of distinct codes present.
    pub fn distinct_code_count(&self) -> usize {
        self.issues_by_code().len()
    }

    /// Number of issues with `code`.
    pub fn count(&self, code: StructuralIssueCode) -> usize {
        self.issues.iter().filter(|i| i.code == code).count()
    }

    /// Issues reported against one node.
    pub fn issues_for_node(&self, id: NodeId) -> Vec<&StructuralIssue> {
        self.issues.iter().filter(|i| i.node_id == id).collect()
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for StructuralResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes, max depth {}: ",
            self.total_node_count, self.max_depth
        )?;
        if self.is_valid {
            return write!(f, "no structural issues");
        }
        let summary = self
            .issues_by_code()
            .iter()
            .map(|(code, issues)| format!("{} {}", issues.len(), code))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{} issues ({})", self.issues.len(), summary)
    }
}

/// Structural rule engine.
///
/// Stateless apart from its options; one analyzer can be shared across
/// threads and trees.
#[derive(Debug, Clone, Default)]
pub struct StructuralAnalyzer {
    options: StructuralOptions,
}

/// Mutable state of one analysis run.
struct Pass {
    issues: Vec<StructuralIssue>,
    seen_ids: HashMap<NodeId, NodeKind>,
}

impl Pass {
    fn report(
        &mut self,
        code: StructuralIssueCode,
        node: &Node,
        message: String,
        context: IssueContext,
    ) {
        let issue = StructuralIssue {
            id: issue_id(ENGINE, code.as_str(), &[node.id()], self.issues.len()),
            code,
            node_kind: node.kind().clone(),
            node_id: node.id(),
            page_index: node.page_index(),
            message,
            context,
        };
        log::trace!("{}", issue);
        self.issues.push(issue);
    }
}

impl StructuralAnalyzer {
    /// Create an analyzer with the given options.
    pub fn new(options: StructuralOptions) -> Self {
        Self { options }
    }

    /// Options in effect
    pub fn options(&self) -> &StructuralOptions {
        &self.options
    }

    /// Analyze the tree rooted at `root`.
    pub fn analyze(&self, root: &Node) -> StructuralResult {
        log::debug!("Analyzing structure tree rooted at {} {}", root.kind(), root.id());

        let mut pass = Pass {
            issues: Vec::new(),
            seen_ids: HashMap::new(),
        };
        let mut total_node_count = 0;
        let mut max_depth = 0;

        for visit in pre_order(root) {
            let node = visit.node;
            total_node_count += 1;
            max_depth = max_depth.max(node.depth());

            if self.options.check_duplicate_ids {
                self.check_duplicate_id(node, &mut pass);
            }
            if let Some(limit) = self.options.max_depth {
                self.check_depth(node, limit, &mut pass);
            }
            if self.options.check_empty_elements {
                self.check_empty(node, &mut pass);
            }
            if self.options.validate_nesting {
                if let Some(parent) = visit.parent {
                    self.check_nesting(parent, node, &mut pass);
                }
            }
            if self.options.validate_required_children {
                self.check_required_children(node, &mut pass);
            }
            if self.options.validate_attributes {
                self.check_attributes(node, &mut pass);
            }
        }

        let result = StructuralResult {
            is_valid: pass.issues.is_empty(),
            issues: pass.issues,
            total_node_count,
            max_depth,
        };
        log::debug!("Structural analysis complete: {}", result);
        result
    }

    fn check_duplicate_id(&self, node: &Node, pass: &mut Pass) {
        if let Some(first_kind) = pass.seen_ids.get(&node.id()).cloned() {
            pass.report(
                StructuralIssueCode::DuplicateId,
                node,
                format!(
                    "Identifier {} is already used by a {} node",
                    node.id(),
                    first_kind
                ),
                context([
                    ("duplicateId", node.id().to_string()),
                    ("firstKind", first_kind.tag().to_string()),
                ]),
            );
        } else {
            pass.seen_ids.insert(node.id(), node.kind().clone());
        }
    }

    fn check_depth(&self, node: &Node, limit: usize, pass: &mut Pass) {
        if node.depth() > limit {
            pass.report(
                StructuralIssueCode::InvalidNesting,
                node,
                format!(
                    "{} at depth {} exceeds maximum depth {}",
                    node.kind(),
                    node.depth(),
                    limit
                ),
                context([
                    ("depth", node.depth().to_string()),
                    ("maxDepth", limit.to_string()),
                ]),
            );
        }
    }

    fn check_empty(&self, node: &Node, pass: &mut Pass) {
        let is_empty = node.children().is_empty()
            && !node.has_own_content()
            && node.text_alternative().is_none();
        if is_empty && !rules::is_permitted_empty(node.kind()) {
            pass.report(
                StructuralIssueCode::EmptyElement,
                node,
                format!("{} has no content, children or text alternative", node.kind()),
                context([("elementType", node.kind().tag())]),
            );
        }
    }

    fn check_nesting(&self, parent: &Node, child: &Node, pass: &mut Pass) {
        if !rules::admits_child(parent.kind(), child.kind()) {
            pass.report(
                StructuralIssueCode::UnexpectedChild,
                parent,
                format!("{} cannot contain {}", parent.kind(), child.kind()),
                context([
                    ("childType", child.kind().tag().to_string()),
                    ("childId", child.id().to_string()),
                ]),
            );
        }
    }

    fn check_required_children(&self, node: &Node, pass: &mut Pass) {
        for requirement in rules::required_children(node.kind()) {
            let satisfied = node
                .children()
                .iter()
                .any(|c| requirement.satisfied_by.contains(c.kind()));
            if !satisfied {
                pass.report(
                    StructuralIssueCode::MissingRequiredChild,
                    node,
                    format!("{} is missing required child {}", node.kind(), requirement.reported),
                    context([("missingChild", requirement.reported.tag())]),
                );
            }
        }
    }

    fn check_attributes(&self, node: &Node, pass: &mut Pass) {
        let Some(requirement) = rules::attribute_requirement(node.kind()) else {
            return;
        };
        let has_attribute = requirement.attributes.iter().any(|key| {
            node.attribute(key)
                .and_then(|value| value.non_empty_text())
                .is_some()
        });
        let satisfied =
            has_attribute || (requirement.text_content_suffices && !node.text_content().is_empty());
        if !satisfied {
            pass.report(
                StructuralIssueCode::MissingAttribute,
                node,
                format!("{} requires {}", node.kind(), requirement.describe()),
                context([("requiredAttribute", requirement.attributes.join("|"))]),
            );
        }
    }
}

/// Analyze `root` with `options`.
pub fn analyze(root: &Node, options: &StructuralOptions) -> StructuralResult {
    StructuralAnalyzer::new(*options).analyze(root)
}
