//! Benchmarks for the structural and reading-order engines.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tagcheck::compliance::{analyze, validate};
use tagcheck::config::{ReadingOrderOptions, StructuralOptions};
use tagcheck::geometry::BoundingBox;
use tagcheck::structure::{ContentNode, Node, NodeKind, SemanticNode, TableNode};

/// Pages of two-column text: a heading, then each column top to bottom.
fn wide_tree(pages: u32, rows: usize) -> Node {
    let mut doc = ContentNode::document();
    for page in 0..pages {
        let mut sect = ContentNode::new(NodeKind::Sect)
            .with_child(ContentNode::heading(1, "Heading").with_bbox(BoundingBox::new(page, 50.0, 740.0, 450.0, 24.0)));
        for column in 0..2 {
            let x = 50.0 + column as f32 * 250.0;
            for row in 0..rows {
                let y = 700.0 - row as f32 * 30.0;
                sect = sect.with_child(
                    ContentNode::paragraph("Lorem ipsum dolor sit amet")
                        .with_bbox(BoundingBox::new(page, x, y, 200.0, 24.0)),
                );
            }
        }
        let table = TableNode::new().with_children((0..4).map(|_| {
            ContentNode::new(NodeKind::TR).with_children(
                (0..3).map(|c| ContentNode::new(NodeKind::TD).with_text(c.to_string())),
            )
        }));
        doc = doc.with_child(sect.with_child(table));
    }
    doc.into()
}

/// A single chain of nested sections.
fn deep_tree(depth: usize) -> Node {
    let mut node = ContentNode::paragraph("leaf");
    for _ in 0..depth {
        node = ContentNode::new(NodeKind::Div).with_child(node);
    }
    ContentNode::document().with_child(node).into()
}

// ============================================================================
// Structural Analysis
// ============================================================================

fn bench_structural(c: &mut Criterion) {
    let mut group = c.benchmark_group("structural");
    for pages in [1u32, 10, 100] {
        let tree = wide_tree(pages, 20);
        group.bench_with_input(BenchmarkId::new("wide", pages), &tree, |b, tree| {
            b.iter(|| analyze(black_box(tree), &StructuralOptions::ALL));
        });
    }
    let tree = deep_tree(2_000);
    group.bench_function("deep_2000", |b| {
        b.iter(|| analyze(black_box(&tree), &StructuralOptions::STRICT));
    });
    group.finish();
}

// ============================================================================
// Reading-Order Validation
// ============================================================================

fn bench_reading_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("reading_order");
    for pages in [1u32, 10, 100] {
        let tree = wide_tree(pages, 20);
        group.bench_with_input(BenchmarkId::new("two_column", pages), &tree, |b, tree| {
            b.iter(|| validate(black_box(tree), &ReadingOrderOptions::DEFAULT));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_structural, bench_reading_order);
criterion_main!(benches);
