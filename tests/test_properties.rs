//! Property tests for both engines over generated trees.

use std::collections::HashSet;

use proptest::prelude::*;
use tagcheck::compliance::rules::is_permitted_empty;
use tagcheck::compliance::{analyze, validate, ReadingOrderIssueType, StructuralIssueCode};
use tagcheck::config::{ReadingOrderOptions, StructuralOptions};
use tagcheck::geometry::BoundingBox;
use tagcheck::structure::{pre_order, ContentNode, Node, NodeId, NodeKind, SemanticNode};

#[derive(Debug, Clone)]
struct GenNode {
    kind: NodeKind,
    text: bool,
    alt: bool,
    bbox: Option<BoundingBox>,
    id: Option<u128>,
    children: Vec<GenNode>,
}

impl GenNode {
    fn build(&self) -> ContentNode {
        let mut node = ContentNode::new(self.kind.clone());
        if self.text {
            node = node.with_text("text");
        }
        if self.alt {
            node = node.with_alt("alternative");
        }
        if let Some(bbox) = self.bbox {
            node = node.with_bbox(bbox);
        }
        if let Some(id) = self.id {
            node = node.with_id(NodeId::from_u128(id));
        }
        node.with_children(self.children.iter().map(GenNode::build))
    }
}

fn kind_strategy() -> impl Strategy<Value = NodeKind> {
    prop::sample::select(vec![
        NodeKind::Document,
        NodeKind::Sect,
        NodeKind::Div,
        NodeKind::P,
        NodeKind::H1,
        NodeKind::Span,
        NodeKind::Link,
        NodeKind::L,
        NodeKind::LI,
        NodeKind::Lbl,
        NodeKind::LBody,
        NodeKind::Table,
        NodeKind::TR,
        NodeKind::TH,
        NodeKind::TD,
        NodeKind::TOC,
        NodeKind::TOCI,
        NodeKind::Figure,
        NodeKind::Caption,
        NodeKind::Artifact,
        NodeKind::Note,
        NodeKind::DocumentHeader,
        NodeKind::Custom("Aside".to_string()),
    ])
}

fn bbox_strategy() -> impl Strategy<Value = BoundingBox> {
    (0u32..3, 0.0f32..500.0, 0.0f32..700.0, 1.0f32..250.0, 1.0f32..80.0)
        .prop_map(|(page, x, y, w, h)| BoundingBox::new(page, x, y, w, h))
}

fn tree_strategy() -> impl Strategy<Value = Node> {
    let leaf = (
        kind_strategy(),
        any::<bool>(),
        any::<bool>(),
        prop::option::of(bbox_strategy()),
        prop::option::weighted(0.2, 0u128..4),
    )
        .prop_map(|(kind, text, alt, bbox, id)| GenNode {
            kind,
            text,
            alt,
            bbox,
            id,
            children: Vec::new(),
        });

    let gen = leaf.prop_recursive(5, 64, 6, |inner| {
        (
            kind_strategy(),
            any::<bool>(),
            any::<bool>(),
            prop::option::of(bbox_strategy()),
            prop::option::weighted(0.2, 0u128..4),
            prop::collection::vec(inner, 0..6),
        )
            .prop_map(|(kind, text, alt, bbox, id, children)| GenNode {
                kind,
                text,
                alt,
                bbox,
                id,
                children,
            })
    });

    gen.prop_map(|g| g.build().into())
}

/// Flat page content: `(page, x, y, w, h)` blocks directly under the root.
fn flat_blocks_strategy() -> impl Strategy<Value = Vec<BoundingBox>> {
    prop::collection::vec(bbox_strategy(), 0..24)
}

fn flat_document(blocks: &[BoundingBox]) -> Node {
    ContentNode::document()
        .with_children(
            blocks
                .iter()
                .enumerate()
                .map(|(i, bbox)| {
                    ContentNode::paragraph("block")
                        .with_id(NodeId::from_u128(1_000 + i as u128))
                        .with_bbox(*bbox)
                }),
        )
        .into()
}

const CATEGORIES: [StructuralIssueCode; 5] = [
    StructuralIssueCode::EmptyElement,
    StructuralIssueCode::UnexpectedChild,
    StructuralIssueCode::MissingRequiredChild,
    StructuralIssueCode::MissingAttribute,
    StructuralIssueCode::DuplicateId,
];

fn disable(code: StructuralIssueCode) -> StructuralOptions {
    let options = StructuralOptions::ALL;
    match code {
        StructuralIssueCode::EmptyElement => options.check_empty_elements(false),
        StructuralIssueCode::UnexpectedChild => options.validate_nesting(false),
        StructuralIssueCode::MissingRequiredChild => options.validate_required_children(false),
        StructuralIssueCode::MissingAttribute => options.validate_attributes(false),
        StructuralIssueCode::DuplicateId => options.check_duplicate_ids(false),
        StructuralIssueCode::InvalidNesting => options.max_depth(None),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn disabled_category_is_silent(tree in tree_strategy()) {
        let full = analyze(&tree, &StructuralOptions::ALL);
        for code in CATEGORIES {
            let partial = analyze(&tree, &disable(code));
            prop_assert_eq!(partial.count(code), 0);

            // Every other category is unaffected
            let expected: Vec<_> = full
                .issues
                .iter()
                .filter(|i| i.code != code)
                .map(|i| (i.code, i.node_id, i.context.clone()))
                .collect();
            let actual: Vec<_> = partial
                .issues
                .iter()
                .map(|i| (i.code, i.node_id, i.context.clone()))
                .collect();
            prop_assert_eq!(expected, actual);
        }
        prop_assert_eq!(analyze(&tree, &StructuralOptions::ALL), full);
    }

    #[test]
    fn disabled_depth_ceiling_is_silent(tree in tree_strategy()) {
        let bounded = analyze(&tree, &StructuralOptions::STRICT.max_depth(Some(2)));
        let unbounded = analyze(&tree, &StructuralOptions::STRICT.max_depth(None));
        prop_assert_eq!(unbounded.count(StructuralIssueCode::InvalidNesting), 0);

        let deeper = pre_order(&tree).filter(|v| v.node.depth() > 2).count();
        prop_assert_eq!(bounded.count(StructuralIssueCode::InvalidNesting), deeper);

        let expected: Vec<_> = bounded
            .issues
            .iter()
            .filter(|i| i.code != StructuralIssueCode::InvalidNesting)
            .map(|i| (i.code, i.node_id, i.context.clone()))
            .collect();
        let actual: Vec<_> = unbounded
            .issues
            .iter()
            .map(|i| (i.code, i.node_id, i.context.clone()))
            .collect();
        prop_assert_eq!(expected, actual);
    }

    #[test]
    fn counts_match_traversal(tree in tree_strategy()) {
        let result = analyze(&tree, &StructuralOptions::STRICT);
        prop_assert_eq!(result.total_node_count, pre_order(&tree).count());
        let deepest = pre_order(&tree).map(|v| v.node.depth()).max().unwrap_or(0);
        prop_assert_eq!(result.max_depth, deepest);
        prop_assert_eq!(result.is_valid, result.issues.is_empty());
    }

    #[test]
    fn permitted_empty_never_reported(tree in tree_strategy()) {
        let result = analyze(&tree, &StructuralOptions::ALL);
        for issue in result.issues.iter().filter(|i| i.code == StructuralIssueCode::EmptyElement) {
            prop_assert!(!is_permitted_empty(&issue.node_kind));
        }
    }

    #[test]
    fn issue_ids_unique(tree in tree_strategy()) {
        let result = analyze(&tree, &StructuralOptions::ALL);
        let mut ids: Vec<_> = result.issues.iter().map(|i| i.id).collect();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), result.issues.len());
    }

    #[test]
    fn reading_order_is_idempotent(tree in tree_strategy()) {
        let options = ReadingOrderOptions::default();
        let first = validate(&tree, &options);
        let second = validate(&tree, &options);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.is_valid, first.issues.is_empty());
    }

    #[test]
    fn issues_stay_on_one_page(tree in tree_strategy()) {
        let result = validate(&tree, &ReadingOrderOptions::default());
        // Generated ids may repeat, so match on (id, page) pairs
        let placed: HashSet<(NodeId, u32)> = pre_order(&tree)
            .filter_map(|v| v.node.page_index().map(|page| (v.node.id(), page)))
            .collect();
        for issue in &result.issues {
            prop_assert!(placed.contains(&(issue.first_node, issue.page_index)));
            prop_assert!(placed.contains(&(issue.second_node, issue.page_index)));
        }
    }

    #[test]
    fn pages_are_independent(blocks in flat_blocks_strategy()) {
        let options = ReadingOrderOptions::default();
        let whole = validate(&flat_document(&blocks), &options);

        for page in 0u32..3 {
            let only: Vec<BoundingBox> = blocks.iter().copied().filter(|b| b.page_index == page).collect();
            // Renumber so node ids match the whole-document run
            let ids: Vec<NodeId> = blocks
                .iter()
                .enumerate()
                .filter(|(_, b)| b.page_index == page)
                .map(|(i, _)| NodeId::from_u128(1_000 + i as u128))
                .collect();
            let alone = validate(&flat_document(&only), &options);

            let expected: Vec<_> = whole
                .issues_on_page(page)
                .into_iter()
                .map(|i| (i.issue_type, i.first_node, i.second_node))
                .collect();
            let actual: Vec<_> = alone
                .issues
                .iter()
                .map(|i| {
                    let remap = |id: NodeId| {
                        let local = id.as_uuid().as_u128() - 1_000;
                        ids[local as usize]
                    };
                    (i.issue_type, remap(i.first_node), remap(i.second_node))
                })
                .collect();
            prop_assert_eq!(expected, actual);
        }
    }

    #[test]
    fn single_column_descending_is_valid(heights in prop::collection::vec(5.0f32..30.0, 1..20)) {
        let mut y = 780.0;
        let mut blocks = Vec::new();
        for h in heights {
            y -= h + 6.0;
            blocks.push(BoundingBox::new(0, 72.0, y, 450.0, h));
        }
        let result = validate(&flat_document(&blocks), &ReadingOrderOptions::default());
        prop_assert!(result.is_valid, "{:?}", result.issues);
        prop_assert_eq!(result.count(ReadingOrderIssueType::ColumnJump), 0);
    }
}
