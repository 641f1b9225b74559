//! Column band tracking for column-interleaving detection.
//!
//! A band is a region of the page the claimed reading order passes through,
//! keyed by its horizontal extent. Bands are inferred incrementally from the
//! column units fed to the tracker:
//!
//! - A unit that mostly lies inside a band (overlap >= half its own width)
//!   belongs to it, and widens it to their union.
//! - A unit that covers two or more bands crosses columns. It is *spanning*
//!   (full-width headings, figures, footers) and starts a new section.
//! - A band at least twice as wide as a unit inside it was spanning all
//!   along; it is re-marked and the unit starts a band of its own.
//!
//! Leaving a non-spanning band marks it departed. Entering a spanning band
//! forgets all departed bands. Re-entering a departed band is a return to a
//! column the reader had already finished, but only when one of the bands
//! visited in between shares rows with it. Bands stacked one below the other
//! are alternating alignment in a single column, not parallel columns.
//!
//! ## Column units
//!
//! [`column_units`] decides which positioned nodes feed the tracker, and as
//! what. Every node outside tables, labels and artifacts that is not a
//! grouping container forms a unit together with its positioned
//! descendants. A unit is observed once, with the union of its members'
//! boxes on the page, so a paragraph whose text sits in positioned spans
//! still counts as one block.

use crate::geometry::Rect;
use crate::structure::{Node, NodeKind, SemanticNode};
use std::collections::HashMap;

/// Minimum overlap, as a fraction of the narrower width, for a match.
pub const COLUMN_MATCH_FRACTION: f32 = 0.5;

/// Width ratio at which one extent spans another.
pub const SPANNING_WIDTH_RATIO: f32 = 2.0;

/// A region of the page, keyed by its horizontal extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnBand {
    /// Left edge
    pub left: f32,
    /// Right edge
    pub right: f32,
    /// Lowest edge of any unit seen in the band
    pub bottom: f32,
    /// Highest edge of any unit seen in the band
    pub top: f32,
    /// Whether the band crosses columns
    pub spanning: bool,
}

impl ColumnBand {
    fn new(extent: &Rect, spanning: bool) -> Self {
        Self {
            left: extent.left(),
            right: extent.right(),
            bottom: extent.bottom(),
            top: extent.top(),
            spanning,
        }
    }

    /// Band width
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    fn overlap(&self, left: f32, right: f32) -> f32 {
        (self.right.min(right) - self.left.max(left)).max(0.0)
    }

    /// `[left, right]` lies mostly inside this band.
    fn holds(&self, left: f32, right: f32) -> bool {
        self.overlap(left, right) >= COLUMN_MATCH_FRACTION * (right - left)
    }

    /// `[left, right]` covers most of this band.
    fn covered_by(&self, left: f32, right: f32) -> bool {
        self.width() > 0.0 && self.overlap(left, right) >= COLUMN_MATCH_FRACTION * self.width()
    }

    /// Whether the two bands occupy some common rows of the page.
    pub fn shares_rows_with(&self, other: &ColumnBand) -> bool {
        self.top.min(other.top) > self.bottom.max(other.bottom)
    }

    fn widen(&mut self, extent: &Rect) {
        self.left = self.left.min(extent.left());
        self.right = self.right.max(extent.right());
        self.bottom = self.bottom.min(extent.bottom());
        self.top = self.top.max(extent.top());
    }
}

/// What observing one unit did to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnStep {
    /// Degenerate extent, not tracked
    Ignored,
    /// Still in the current band
    Stayed,
    /// Moved to a band not visited since the last section break, or back to
    /// one that nothing beside it interrupted
    Entered(usize),
    /// Moved to a spanning band; departed bands are forgotten
    Spanned(usize),
    /// Moved back to a band already departed from, past a parallel column
    Returned(usize),
}

/// Incremental band tracker for one page.
#[derive(Debug, Clone, Default)]
pub struct ColumnTracker {
    bands: Vec<ColumnBand>,
    current: Option<usize>,
    /// Departed band -> bands entered since leaving it
    departed: HashMap<usize, Vec<usize>>,
}

impl ColumnTracker {
    /// Empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Bands seen so far
    pub fn bands(&self) -> &[ColumnBand] {
        &self.bands
    }

    /// Index of the band the order is currently in
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Feed the extent of the next unit in reading order.
    pub fn observe(&mut self, extent: &Rect) -> ColumnStep {
        let (left, right) = (extent.left(), extent.right());
        let width = right - left;
        if !(width > 0.0) {
            return ColumnStep::Ignored;
        }

        let covered: Vec<usize> = self
            .column_bands()
            .filter(|&i| self.bands[i].covered_by(left, right))
            .collect();
        if covered.len() >= 2 {
            return self.enter_spanning(extent);
        }

        let holder = self
            .column_bands()
            .find(|&i| self.bands[i].holds(left, right));
        if let Some(i) = holder {
            if self.bands[i].width() >= SPANNING_WIDTH_RATIO * width {
                log::trace!(
                    "Band {} [{:.1}, {:.1}] re-marked as spanning",
                    i,
                    self.bands[i].left,
                    self.bands[i].right
                );
                self.bands[i].spanning = true;
                let band = self.push(ColumnBand::new(extent, false));
                return self.enter(band, extent);
            }
            return self.enter(i, extent);
        }

        if let Some(&i) = covered.first() {
            return self.enter(i, extent);
        }

        if let Some(i) = self.matching_spanning_band(left, right) {
            return self.enter(i, extent);
        }

        let band = self.push(ColumnBand::new(extent, false));
        self.enter(band, extent)
    }

    /// Indices of non-spanning bands.
    fn column_bands(&self) -> impl Iterator<Item = usize> + '_ {
        self.bands
            .iter()
            .enumerate()
            .filter(|(_, b)| !b.spanning)
            .map(|(i, _)| i)
    }

    fn matching_spanning_band(&self, left: f32, right: f32) -> Option<usize> {
        self.bands
            .iter()
            .position(|b| b.spanning && b.holds(left, right) && b.covered_by(left, right))
    }

    fn enter_spanning(&mut self, extent: &Rect) -> ColumnStep {
        let band = match self.matching_spanning_band(extent.left(), extent.right()) {
            Some(i) => i,
            None => self.push(ColumnBand::new(extent, true)),
        };
        self.enter(band, extent)
    }

    fn push(&mut self, band: ColumnBand) -> usize {
        self.bands.push(band);
        self.bands.len() - 1
    }

    /// Move into `band`, judged against the band as it was before `extent`
    /// joined it.
    fn enter(&mut self, band: usize, extent: &Rect) -> ColumnStep {
        let step = self.step_into(band);
        self.bands[band].widen(extent);
        step
    }

    fn step_into(&mut self, band: usize) -> ColumnStep {
        if self.current == Some(band) {
            return ColumnStep::Stayed;
        }
        if let Some(previous) = self.current {
            if !self.bands[previous].spanning {
                self.departed.entry(previous).or_default();
            }
        }
        self.current = Some(band);

        if self.bands[band].spanning {
            self.departed.clear();
            log::trace!("Entered spanning band {}", band);
            return ColumnStep::Spanned(band);
        }

        let returned = self.departed.remove(&band);
        for visited in self.departed.values_mut() {
            visited.push(band);
        }
        if let Some(visited) = returned {
            let target = &self.bands[band];
            if visited.iter().any(|&other| self.bands[other].shares_rows_with(target)) {
                log::trace!("Returned to departed band {}", band);
                return ColumnStep::Returned(band);
            }
            log::trace!("Back in band {} below everything read since", band);
        } else {
            log::trace!("Entered band {}", band);
        }
        ColumnStep::Entered(band)
    }
}

/// How a node takes part in column tracking when no unit encloses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Not inside a unit; the next suitable node starts one
    Open,
    /// Table parts, labels, artifacts: never tracked
    Excluded,
    /// Member of the given unit
    Inside(usize),
}

/// Column unit of every positioned node under `root`.
///
/// The result is parallel to [`crate::structure::collect_positioned`]: entry
/// `i` belongs to the `i`-th positioned node in document order. Members of
/// one unit are consecutive in that order.
pub fn column_units(root: &Node) -> Vec<Option<usize>> {
    let mut units = Vec::new();
    let mut next_unit = 0;
    let mut stack: Vec<(&Node, Flow)> = vec![(root, Flow::Open)];

    while let Some((node, flow)) = stack.pop() {
        let positioned = node.bbox().is_some();
        let (own, inherited) = match flow {
            Flow::Inside(unit) => (Some(unit), flow),
            Flow::Excluded => (None, flow),
            Flow::Open => {
                let kind = node.kind();
                if excluded_from_columns(kind, positioned) {
                    (None, Flow::Excluded)
                } else if is_grouping(kind) {
                    // A positioned container is observed on its own; its
                    // content still forms units of its own
                    let own = positioned.then(|| {
                        next_unit += 1;
                        next_unit - 1
                    });
                    (own, Flow::Open)
                } else {
                    next_unit += 1;
                    (Some(next_unit - 1), Flow::Inside(next_unit - 1))
                }
            },
        };
        if positioned {
            units.push(own);
        }
        for child in node.children().iter().rev() {
            stack.push((child, inherited));
        }
    }

    units
}

/// Content laid out on its own grid: table cells, list labels beside their
/// bodies, page furniture.
fn excluded_from_columns(kind: &NodeKind, positioned: bool) -> bool {
    match kind {
        NodeKind::Table => !positioned,
        NodeKind::Lbl => true,
        _ => kind.is_table_part() || kind.is_artifact(),
    }
}

fn is_grouping(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Document
            | NodeKind::Part
            | NodeKind::Art
            | NodeKind::Sect
            | NodeKind::Div
            | NodeKind::BlockQuote
            | NodeKind::NonStruct
            | NodeKind::Private
            | NodeKind::L
            | NodeKind::LI
            | NodeKind::TOC
            | NodeKind::TOCI
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundingBox;
    use crate::structure::{collect_positioned, ContentNode, TableNode};

    const COL1: (f32, f32) = (50.0, 250.0);
    const COL2: (f32, f32) = (300.0, 500.0);
    const FULL: (f32, f32) = (50.0, 500.0);

    /// `(left, right)` at a text row; row 0 is the top of the page.
    fn at(extent: (f32, f32), row: usize) -> Rect {
        Rect::new(extent.0, 700.0 - row as f32 * 50.0, extent.1 - extent.0, 40.0)
    }

    fn feed(tracker: &mut ColumnTracker, extents: &[Rect]) -> Vec<ColumnStep> {
        extents.iter().map(|r| tracker.observe(r)).collect()
    }

    fn returns(steps: &[ColumnStep]) -> usize {
        steps
            .iter()
            .filter(|s| matches!(s, ColumnStep::Returned(_)))
            .count()
    }

    #[test]
    fn test_sequential_columns() {
        let mut tracker = ColumnTracker::new();
        let steps = feed(
            &mut tracker,
            &[at(COL1, 0), at(COL1, 1), at(COL1, 2), at(COL2, 0), at(COL2, 1)],
        );
        assert_eq!(returns(&steps), 0);
        assert_eq!(steps[1], ColumnStep::Stayed);
        assert_eq!(steps[3], ColumnStep::Entered(1));
        assert_eq!(tracker.bands().len(), 2);
        assert_eq!(tracker.bands()[0].bottom, 600.0);
        assert_eq!(tracker.bands()[0].top, 740.0);
    }

    #[test]
    fn test_interleaved_columns() {
        let mut tracker = ColumnTracker::new();
        let steps = feed(
            &mut tracker,
            &[at(COL1, 0), at(COL2, 0), at(COL1, 1), at(COL2, 1)],
        );
        assert_eq!(steps[2], ColumnStep::Returned(0));
        assert_eq!(steps[3], ColumnStep::Returned(1));
    }

    #[test]
    fn test_full_width_resets_section() {
        let mut tracker = ColumnTracker::new();
        let steps = feed(
            &mut tracker,
            &[at(COL1, 0), at(COL2, 0), at(FULL, 1), at(COL1, 2), at(COL2, 2)],
        );
        assert!(matches!(steps[2], ColumnStep::Spanned(_)));
        assert_eq!(returns(&steps), 0);
        // The same spanning band is reused
        let steps = feed(&mut tracker, &[at(FULL, 3), at(COL1, 4)]);
        assert_eq!(returns(&steps), 0);
        assert_eq!(tracker.bands().iter().filter(|b| b.spanning).count(), 1);
    }

    #[test]
    fn test_full_width_before_columns() {
        let mut tracker = ColumnTracker::new();
        let steps = feed(
            &mut tracker,
            &[at(FULL, 0), at(FULL, 1), at(COL1, 2), at(COL1, 3), at(COL2, 2), at(COL2, 3)],
        );
        assert_eq!(returns(&steps), 0);
        assert!(tracker.bands()[0].spanning);

        let steps = feed(&mut tracker, &[at(COL1, 4)]);
        assert_eq!(returns(&steps), 1);
    }

    #[test]
    fn test_narrow_headings_inside_columns() {
        let mut tracker = ColumnTracker::new();
        let steps = feed(
            &mut tracker,
            &[
                at(COL1, 0),
                at((50.0, 120.0), 1),
                at(COL1, 2),
                at(COL1, 3),
                at(COL2, 0),
                at((300.0, 380.0), 1),
                at(COL2, 2),
            ],
        );
        assert_eq!(returns(&steps), 0);

        let steps = feed(&mut tracker, &[at(COL1, 4)]);
        assert_eq!(returns(&steps), 1);
    }

    #[test]
    fn test_single_column_never_returns() {
        let mut tracker = ColumnTracker::new();
        let steps = feed(
            &mut tracker,
            &[
                at((72.0, 540.0), 0),
                at((72.0, 200.0), 1),
                at((72.0, 540.0), 2),
                at((90.0, 540.0), 3),
                at((72.0, 300.0), 4),
            ],
        );
        assert_eq!(returns(&steps), 0);
    }

    #[test]
    fn test_alternating_alignment_is_one_column() {
        // Short left line, right-aligned date, short left line, top to bottom
        let line = |left: f32, right: f32, y: f32| Rect::new(left, y, right - left, 20.0);
        for with_title in [true, false] {
            let mut tracker = ColumnTracker::new();
            let mut lines = Vec::new();
            if with_title {
                lines.push(line(72.0, 540.0, 700.0));
            }
            lines.push(line(72.0, 250.0, 670.0));
            lines.push(line(350.0, 540.0, 640.0));
            lines.push(line(72.0, 250.0, 610.0));
            let steps = feed(&mut tracker, &lines);
            assert_eq!(returns(&steps), 0, "{:?}", steps);
            assert!(matches!(steps.last(), Some(ColumnStep::Entered(_))));
        }
    }

    #[test]
    fn test_degenerate_extent_ignored() {
        let mut tracker = ColumnTracker::new();
        assert_eq!(tracker.observe(&Rect::new(10.0, 0.0, 0.0, 10.0)), ColumnStep::Ignored);
        assert_eq!(tracker.observe(&Rect::new(10.0, 0.0, f32::NAN, 10.0)), ColumnStep::Ignored);
        assert!(tracker.bands().is_empty());
        assert_eq!(tracker.current(), None);
    }

    #[test]
    fn test_units_follow_positioned_order() {
        let bbox = |x: f32| BoundingBox::new(0, x, 0.0, 10.0, 10.0);
        let tree: Node = ContentNode::document()
            .with_bbox(bbox(0.0))
            .with_child(ContentNode::paragraph("p").with_bbox(bbox(1.0)).with_child(ContentNode::span("s").with_bbox(bbox(2.0))))
            .with_child(ContentNode::new(NodeKind::P).with_child(ContentNode::span("a").with_bbox(bbox(3.0))).with_child(ContentNode::span("b").with_bbox(bbox(4.0))))
            .with_child(
                TableNode::new().with_child(
                    ContentNode::new(NodeKind::TR).with_child(ContentNode::new(NodeKind::TD).with_text("c").with_bbox(bbox(5.0))),
                ),
            )
            .with_child(
                ContentNode::new(NodeKind::L).with_child(
                    ContentNode::new(NodeKind::LI)
                        .with_child(ContentNode::new(NodeKind::Lbl).with_text("1.").with_bbox(bbox(6.0)))
                        .with_child(ContentNode::new(NodeKind::LBody).with_text("item").with_bbox(bbox(7.0))),
                ),
            )
            .with_child(ContentNode::new(NodeKind::Artifact).with_bbox(bbox(8.0)))
            .into();

        let units = column_units(&tree);
        assert_eq!(units.len(), collect_positioned(&tree).len());
        assert_eq!(
            units,
            vec![Some(0), Some(1), Some(1), Some(2), Some(2), None, None, Some(3), None]
        );
    }

    #[test]
    fn test_positioned_table_is_one_unit() {
        let cell = ContentNode::new(NodeKind::TD)
            .with_text("c")
            .with_bbox(BoundingBox::new(0, 0.0, 0.0, 5.0, 5.0));
        let tree: Node = TableNode::new()
            .with_bbox(BoundingBox::new(0, 0.0, 0.0, 100.0, 100.0))
            .with_child(ContentNode::new(NodeKind::TR).with_child(cell))
            .into();
        assert_eq!(column_units(&tree), vec![Some(0), Some(0)]);
    }
}
