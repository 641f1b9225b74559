//! Contract for criterion-specific checkers.
//!
//! A checker evaluates one accessibility criterion (say, "images have a text
//! alternative") against semantic nodes. The structural and reading-order
//! engines neither call nor depend on checkers; both sides only share the
//! node model.

use super::types::IssueContext;
use crate::structure::{Node, NodeId, NodeKind, SemanticNode};
use serde::{Deserialize, Serialize};

/// One failure of a criterion on one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Offending node
    pub node_id: NodeId,
    /// Its kind
    pub node_kind: NodeKind,
    /// Human-readable message
    pub message: String,
}

impl Violation {
    /// Violation on `node`.
    pub fn new(node: &Node, message: impl Into<String>) -> Self {
        Self {
            node_id: node.id(),
            node_kind: node.kind().clone(),
            message: message.into(),
        }
    }
}

/// Outcome of checking one criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// Criterion identifier (e.g. `"1.1.1"`)
    pub criterion: String,
    /// True iff there are no violations
    pub passed: bool,
    /// Violations found
    pub violations: Vec<Violation>,
    /// Extra details, if the checker has any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<IssueContext>,
}

impl CheckResult {
    /// Result for `criterion` from a list of violations.
    pub fn from_violations(criterion: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self {
            criterion: criterion.into(),
            passed: violations.is_empty(),
            violations,
            context: None,
        }
    }

    /// Attach context.
    pub fn with_context(mut self, context: IssueContext) -> Self {
        self.context = Some(context);
        self
    }
}

/// A criterion-specific checker.
pub trait CriterionChecker: Send + Sync {
    /// Criterion this checker evaluates
    fn criterion(&self) -> &str;

    /// Check a single node.
    fn check(&self, node: &Node) -> CheckResult;

    /// Check several nodes, concatenating their violations.
    fn check_all(&self, nodes: &[&Node]) -> CheckResult {
        let violations = nodes
            .iter()
            .flat_map(|node| self.check(node).violations)
            .collect();
        CheckResult::from_violations(self.criterion(), violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::types::context;
    use crate::structure::{pre_order, ContentNode, FigureNode};

    struct FigureAltChecker;

    impl CriterionChecker for FigureAltChecker {
        fn criterion(&self) -> &str {
            "1.1.1"
        }

        fn check(&self, node: &Node) -> CheckResult {
            let mut violations = Vec::new();
            if *node.kind() == NodeKind::Figure && node.text_alternative().is_none() {
                violations.push(Violation::new(node, "Figure has no text alternative"));
            }
            CheckResult::from_violations(self.criterion(), violations)
        }
    }

    #[test]
    fn test_single_node() {
        let figure: Node = FigureNode::new().into();
        let result = FigureAltChecker.check(&figure);
        assert!(!result.passed);
        assert_eq!(result.violations[0].node_id, figure.id());

        let described: Node = FigureNode::new().with_alt("Logo").into();
        assert!(FigureAltChecker.check(&described).passed);
    }

    #[test]
    fn test_check_all_concatenates() {
        let tree: Node = ContentNode::document()
            .with_child(FigureNode::new())
            .with_child(ContentNode::paragraph("text"))
            .with_child(FigureNode::new().with_alt("ok"))
            .with_child(FigureNode::new())
            .into();
        let nodes: Vec<&Node> = pre_order(&tree).map(|v| v.node).collect();

        let result = FigureAltChecker.check_all(&nodes);
        assert_eq!(result.criterion, "1.1.1");
        assert!(!result.passed);
        assert_eq!(result.violations.len(), 2);
        assert!(result.context.is_none());
    }

    #[test]
    fn test_check_all_empty_passes() {
        let result = FigureAltChecker.check_all(&[]);
        assert!(result.passed);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn test_context_serialization() {
        let result = CheckResult::from_violations("1.3.2", Vec::new())
            .with_context(context([("pages", "3")]));
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"pages\":\"3\""));
        assert!(!serde_json::to_string(&CheckResult::from_violations("x", Vec::new()))
            .unwrap()
            .contains("context"));
    }
}
