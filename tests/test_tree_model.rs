//! Integration tests for the semantic tree model.
//!
//! Tests for node kinds, JSON import/export, depth bookkeeping, traversal
//! and page geometry.

use tagcheck::geometry::{BoundingBox, Point, Rect};
use tagcheck::structure::traversal::{group_by_page, is_positioned_ancestor};
use tagcheck::structure::{
    assign_depths, check_depths, collect_positioned, pre_order, AttributeValue, ContentNode,
    FigureNode, ImageChunk, LineArtChunk, ListNode, ListNumbering, Node, NodeId, NodeKind,
    SemanticNode, TableNode, TextRun,
};
use tagcheck::{Error, ReadingOrderOptions, StructuralOptions};

// =============================================================================
// NODE KINDS
// =============================================================================

mod kind_tests {
    use super::*;

    #[test]
    fn test_tag_round_trip() {
        for tag in ["Document", "Sect", "P", "H3", "L", "LI", "Lbl", "LBody", "TR", "TOCI", "Artifact"] {
            assert_eq!(NodeKind::from_tag(tag).tag(), tag);
        }
        assert_eq!(NodeKind::from_tag("Sidebar"), NodeKind::Custom("Sidebar".to_string()));
        assert_eq!(NodeKind::from_tag("Sidebar").tag(), "Sidebar");
    }

    #[test]
    fn test_kind_classification() {
        assert!(NodeKind::H2.is_heading());
        assert_eq!(NodeKind::H2.heading_level(), Some(2));
        assert_eq!(NodeKind::H.heading_level(), None);
        assert_eq!(NodeKind::heading(9), NodeKind::H);
        assert!(NodeKind::P.is_block());
        assert!(!NodeKind::Span.is_block());
        assert!(NodeKind::TD.is_table_part());
        assert!(NodeKind::DocumentFooter.is_artifact());
    }

    #[test]
    fn test_kind_serializes_as_tag() {
        assert_eq!(serde_json::to_string(&NodeKind::LBody).unwrap(), "\"LBody\"");
        let kind: NodeKind = serde_json::from_str("\"Aside\"").unwrap();
        assert_eq!(kind, NodeKind::Custom("Aside".into()));
    }
}

// =============================================================================
// JSON IMPORT / EXPORT
// =============================================================================

mod json_tests {
    use super::*;

    const TREE: &str = r#"{
        "shape": "content",
        "id": "00000000-0000-0000-0000-000000000001",
        "kind": "Document",
        "children": [
            {
                "shape": "content",
                "kind": "P",
                "depth": 1,
                "bbox": {"pageIndex": 0, "rect": {"x": 72, "y": 700, "width": 400, "height": 14}},
                "text": [{"text": "Hello"}]
            },
            {
                "shape": "figure",
                "kind": "Figure",
                "depth": 1,
                "attributes": {"Alt": "Logo", "Width": 120, "Decorative": false},
                "images": [{"bbox": {"pageIndex": 0, "rect": {"x": 0, "y": 0, "width": 10, "height": 10}}, "pixelWidth": 64, "pixelHeight": 64}]
            },
            {
                "shape": "list",
                "kind": "L",
                "depth": 1,
                "numbering": "decimal",
                "start": 3
            }
        ]
    }"#;

    #[test]
    fn test_import_tree() {
        let tree = Node::from_json_strict(TREE).unwrap();
        assert_eq!(tree.id(), NodeId::from_u128(1));
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.text_content(), "Hello");

        let p = &tree.children()[0];
        assert_eq!(p.page_index(), Some(0));
        assert_eq!(p.bbox().map(|b| b.top()), Some(714.0));

        let figure = tree.children()[1].as_figure().unwrap();
        assert!(figure.has_raster_content());
        assert_eq!(figure.text_alternative(), Some("Logo"));
        assert_eq!(figure.attribute("Width").and_then(AttributeValue::as_i64), Some(120));
        assert_eq!(figure.attribute("Decorative").and_then(AttributeValue::as_bool), Some(false));

        let list = tree.children()[2].as_list().unwrap();
        assert_eq!(list.numbering, ListNumbering::Decimal);
        assert_eq!(list.start, Some(3));
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let tree = Node::from_json(TREE).unwrap();
        let p = tree.children()[0].id();
        let figure = tree.children()[1].id();
        assert_ne!(p, figure);
    }

    #[test]
    fn test_strict_import_rejects_bad_depths() {
        let json = r#"{"shape": "content", "kind": "Document", "children": [{"shape": "content", "kind": "P", "depth": 4}]}"#;
        assert!(Node::from_json(json).is_ok());
        let err = Node::from_json_strict(json).unwrap_err();
        assert!(matches!(err, Error::InvalidTree(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = Node::from_json("{\"shape\": \"content\"").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_export_import_preserves_tree() {
        let tree: Node = ContentNode::document()
            .with_child(
                TableNode::new()
                    .with_summary("Prices")
                    .with_borders(vec![0.0, 50.0, 100.0], vec![0.0, 20.0])
                    .with_child(
                        ContentNode::new(NodeKind::TR)
                            .with_child(ContentNode::new(NodeKind::TD).with_text("a"))
                            .with_child(ContentNode::new(NodeKind::TD).with_text("b")),
                    ),
            )
            .with_child(FigureNode::new().with_line_art(LineArtChunk {
                bbox: BoundingBox::new(1, 0.0, 0.0, 5.0, 5.0),
                segment_count: 12,
            }))
            .into();

        let back = Node::from_json_strict(&tree.to_json().unwrap()).unwrap();
        assert_eq!(back, tree);
        assert_eq!(back.node_count(), tree.node_count());
        let table = back.children()[0].as_table().unwrap();
        assert_eq!(table.summary.as_deref(), Some("Prices"));
        assert_eq!(table.grid_matches_structure(), Some(true));
        assert!(back.children()[1].as_figure().unwrap().has_line_art());
    }

    #[test]
    fn test_options_from_json() {
        let options = StructuralOptions::from_json(r#"{"validateNesting": false}"#).unwrap();
        assert!(!options.validate_nesting);
        assert!(options.check_empty_elements);

        let options = ReadingOrderOptions::from_json(r#"{"validateColumns": false, "overlapThreshold": 0.3}"#).unwrap();
        assert!(!options.validate_columns);
        assert_eq!(options.overlap_threshold, 0.3);
        assert!(ReadingOrderOptions::from_json(r#"{"horizontalTolerance": -1}"#).is_err());
    }
}

// =============================================================================
// DEPTHS AND TRAVERSAL
// =============================================================================

mod traversal_tests {
    use super::*;

    fn sample() -> Node {
        ContentNode::document()
            .with_child(
                ContentNode::new(NodeKind::Sect)
                    .with_bbox(BoundingBox::new(0, 0.0, 0.0, 600.0, 800.0))
                    .with_child(ContentNode::heading(1, "A").with_bbox(BoundingBox::new(0, 50.0, 700.0, 300.0, 20.0)))
                    .with_child(ContentNode::paragraph("B")),
            )
            .with_child(ContentNode::paragraph("C").with_bbox(BoundingBox::new(1, 50.0, 700.0, 300.0, 20.0)))
            .into()
    }

    #[test]
    fn test_pre_order_with_parents() {
        let tree = sample();
        let visits: Vec<_> = pre_order(&tree).collect();
        let texts: Vec<String> = visits.iter().map(|v| v.node.own_text()).collect();
        assert_eq!(texts, vec!["", "", "A", "B", "C"]);
        assert!(visits[0].parent.is_none());
        assert_eq!(visits[2].parent.map(|p| p.kind().clone()), Some(NodeKind::Sect));
        assert_eq!(visits[4].ordinal, 4);
    }

    #[test]
    fn test_positioned_collection() {
        let tree = sample();
        let positioned = collect_positioned(&tree);
        assert_eq!(positioned.len(), 3);
        assert_eq!(positioned[1].positioned_ancestor, Some(0));
        assert_eq!(positioned[2].positioned_ancestor, None);
        assert!(is_positioned_ancestor(&positioned, 0, 1));
        assert!(!is_positioned_ancestor(&positioned, 1, 2));

        let pages = group_by_page(&positioned);
        assert_eq!(pages.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(pages[&0], vec![0, 1]);
    }

    #[test]
    fn test_assign_and_check_depths() {
        let mut tree: Node = ContentNode::document()
            .with_child(ContentNode::new(NodeKind::Sect).with_child(ContentNode::paragraph("x")).with_depth(7))
            .with_depth(3)
            .into();
        // with_depth on the root rebases everything below it
        assert!(check_depths(&tree).is_ok());
        assert_eq!(tree.children()[0].children()[0].depth(), 5);

        assign_depths(&mut tree);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.children()[0].children()[0].depth(), 2);
    }

    #[test]
    fn test_deep_tree_traversal() {
        let mut node = ContentNode::paragraph("leaf");
        for _ in 0..5_000 {
            node = ContentNode::new(NodeKind::Div).with_child(node);
        }
        let tree: Node = node.into();
        assert_eq!(tree.node_count(), 5_001);
        assert_eq!(pre_order(&tree).map(|v| v.node.depth()).max(), Some(5_000));
        assert_eq!(tree.text_content(), "leaf");
        drop(tree);
    }
}

// =============================================================================
// NODE HELPERS AND GEOMETRY
// =============================================================================

mod helper_tests {
    use super::*;

    #[test]
    fn test_text_runs_and_content() {
        let p = ContentNode::new(NodeKind::P)
            .with_text("  Hello ")
            .with_text_run(TextRun::positioned("world", BoundingBox::new(0, 0.0, 0.0, 30.0, 10.0)));
        assert_eq!(p.own_text(), "Hello world");
        assert!(p.has_own_content());
    }

    #[test]
    fn test_list_and_figure_helpers() {
        let list = ListNode::new(ListNumbering::from_pdf_name("UpperRoman"))
            .with_level(1)
            .with_child(ContentNode::new(NodeKind::LI));
        assert!(list.is_ordered());
        assert_eq!(list.item_count(), 1);
        assert_eq!(list.level, 1);
        assert!(!ListNode::new(ListNumbering::from_pdf_name("Disc")).is_ordered());

        let figure = FigureNode::new().with_image(ImageChunk {
            bbox: BoundingBox::new(0, 0.0, 0.0, 10.0, 10.0),
            pixel_width: 8,
            pixel_height: 8,
        });
        assert!(figure.has_own_content());
        assert!(!figure.has_line_art());
    }

    #[test]
    fn test_bounding_box_geometry() {
        let a = BoundingBox::new(0, 100.0, 100.0, 100.0, 50.0);
        let b = BoundingBox::new(0, 150.0, 110.0, 100.0, 50.0);
        let other_page = BoundingBox::new(1, 100.0, 100.0, 100.0, 50.0);

        assert!(a.overlaps(&b));
        assert!((a.overlap_fraction(&b) - 0.4).abs() < 1e-6);
        assert_eq!(a.overlap_fraction(&other_page), 0.0);
        assert!(a.union(&other_page).is_none());
        assert_eq!(a.union(&b).map(|u| u.rect), Some(Rect::new(100.0, 100.0, 150.0, 60.0)));
        assert!(a.contains_point(&Point::new(150.0, 120.0)));
        assert_eq!(a.center(), Point::new(150.0, 125.0));
    }
}
