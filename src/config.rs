//! Configuration for the analysis engines.
//!
//! Both option types come with named presets (plain constants, no
//! hierarchy) and load from JSON, where missing fields take their defaults.
//!
//! The numeric reading-order tolerances are tuned constants, not values
//! taken from a WCAG formula.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Vertical jitter (points) tolerated before a pair counts as out of order.
pub const DEFAULT_VERTICAL_TOLERANCE: f32 = 5.0;

/// Horizontal jitter (points) tolerated before a pair counts as reversed.
pub const DEFAULT_HORIZONTAL_TOLERANCE: f32 = 5.0;

/// Fraction of the smaller box's area below which an overlap is ignored.
pub const DEFAULT_OVERLAP_THRESHOLD: f32 = 0.10;

/// Maximum depth used by [`StructuralOptions::STRICT`].
pub const STRICT_MAX_DEPTH: usize = 32;

/// Structural rule engine options.
///
/// Every category is independently toggleable; a disabled category never
/// produces issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuralOptions {
    /// Check parent/child kind legality
    pub validate_nesting: bool,
    /// Check containers have their mandatory children
    pub validate_required_children: bool,
    /// Check required attributes (Alt/ActualText/text)
    pub validate_attributes: bool,
    /// Flag nodes with no content at all
    pub check_empty_elements: bool,
    /// Flag repeated node identifiers
    pub check_duplicate_ids: bool,
    /// Deepest allowed node depth; `None` is unbounded
    pub max_depth: Option<usize>,
}

impl StructuralOptions {
    /// Every rule, unbounded depth (the default)
    pub const ALL: Self = Self {
        validate_nesting: true,
        validate_required_children: true,
        validate_attributes: true,
        check_empty_elements: true,
        check_duplicate_ids: true,
        max_depth: None,
    };

    /// Every rule plus a depth ceiling
    pub const STRICT: Self = Self {
        max_depth: Some(STRICT_MAX_DEPTH),
        ..Self::ALL
    };

    /// Only nesting legality and duplicate ids
    pub const LENIENT: Self = Self {
        validate_nesting: true,
        validate_required_children: false,
        validate_attributes: false,
        check_empty_elements: false,
        check_duplicate_ids: true,
        max_depth: None,
    };

    /// Only nesting legality
    pub const NESTING_ONLY: Self = Self {
        check_duplicate_ids: false,
        ..Self::LENIENT
    };

    /// Nothing enabled
    pub const NONE: Self = Self {
        validate_nesting: false,
        validate_required_children: false,
        validate_attributes: false,
        check_empty_elements: false,
        check_duplicate_ids: false,
        max_depth: None,
    };

    /// Default options (all rules)
    pub fn new() -> Self {
        Self::ALL
    }

    /// Enable or disable nesting checks.
    pub fn validate_nesting(mut self, enabled: bool) -> Self {
        self.validate_nesting = enabled;
        self
    }

    /// Enable or disable required-children checks.
    pub fn validate_required_children(mut self, enabled: bool) -> Self {
        self.validate_required_children = enabled;
        self
    }

    /// Enable or disable required-attribute checks.
    pub fn validate_attributes(mut self, enabled: bool) -> Self {
        self.validate_attributes = enabled;
        self
    }

    /// Enable or disable empty-element checks.
    pub fn check_empty_elements(mut self, enabled: bool) -> Self {
        self.check_empty_elements = enabled;
        self
    }

    /// Enable or disable duplicate-id checks.
    pub fn check_duplicate_ids(mut self, enabled: bool) -> Self {
        self.check_duplicate_ids = enabled;
        self
    }

    /// Set or clear the depth ceiling.
    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Reject a zero depth ceiling (only the root could ever pass it).
    pub fn ensure_valid(&self) -> Result<()> {
        if self.max_depth == Some(0) {
            return Err(Error::InvalidConfig(
                "max depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Load from JSON and validate; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.ensure_valid()?;
        Ok(options)
    }
}

impl Default for StructuralOptions {
    fn default() -> Self {
        Self::ALL
    }
}

/// Script direction within a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReadingDirection {
    /// Latin, Cyrillic, CJK horizontal, ...
    #[default]
    LeftToRight,
    /// Arabic, Hebrew, ...
    RightToLeft,
}

/// Reading-order validator options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadingOrderOptions {
    /// Expected direction within a line
    pub direction: ReadingDirection,
    /// Detect column interleaving
    pub validate_columns: bool,
    /// Detect overlapping consecutive boxes
    pub check_overlaps: bool,
    /// Points of vertical slack
    pub vertical_tolerance: f32,
    /// Points of horizontal slack
    pub horizontal_tolerance: f32,
    /// Minimum overlap fraction (of the smaller box) that is reported
    pub overlap_threshold: f32,
}

impl ReadingOrderOptions {
    /// Left-to-right with every check enabled
    pub const DEFAULT: Self = Self {
        direction: ReadingDirection::LeftToRight,
        validate_columns: true,
        check_overlaps: true,
        vertical_tolerance: DEFAULT_VERTICAL_TOLERANCE,
        horizontal_tolerance: DEFAULT_HORIZONTAL_TOLERANCE,
        overlap_threshold: DEFAULT_OVERLAP_THRESHOLD,
    };

    /// Same as [`Self::DEFAULT`] for right-to-left scripts
    pub const RIGHT_TO_LEFT: Self = Self {
        direction: ReadingDirection::RightToLeft,
        ..Self::DEFAULT
    };

    /// Tight tolerances
    pub const STRICT: Self = Self {
        vertical_tolerance: 2.0,
        horizontal_tolerance: 2.0,
        overlap_threshold: 0.05,
        ..Self::DEFAULT
    };

    /// Loose tolerances, no column tracking
    pub const LENIENT: Self = Self {
        validate_columns: false,
        vertical_tolerance: 15.0,
        horizontal_tolerance: 15.0,
        overlap_threshold: 0.25,
        ..Self::DEFAULT
    };

    /// Default options
    pub fn new() -> Self {
        Self::DEFAULT
    }

    /// Set the reading direction.
    pub fn direction(mut self, direction: ReadingDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Enable or disable column interleaving detection.
    pub fn validate_columns(mut self, enabled: bool) -> Self {
        self.validate_columns = enabled;
        self
    }

    /// Enable or disable overlap detection.
    pub fn check_overlaps(mut self, enabled: bool) -> Self {
        self.check_overlaps = enabled;
        self
    }

    /// Set the vertical tolerance in points.
    pub fn vertical_tolerance(mut self, points: f32) -> Self {
        self.vertical_tolerance = points;
        self
    }

    /// Set the horizontal tolerance in points.
    pub fn horizontal_tolerance(mut self, points: f32) -> Self {
        self.horizontal_tolerance = points;
        self
    }

    /// Set the overlap threshold (fraction of the smaller area).
    pub fn overlap_threshold(mut self, fraction: f32) -> Self {
        self.overlap_threshold = fraction;
        self
    }

    /// Reject negative or non-finite tolerances and thresholds outside `(0, 1]`.
    pub fn ensure_valid(&self) -> Result<()> {
        if !self.vertical_tolerance.is_finite() || self.vertical_tolerance < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "vertical tolerance must be a finite value >= 0, got {}",
                self.vertical_tolerance
            )));
        }
        if !self.horizontal_tolerance.is_finite() || self.horizontal_tolerance < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "horizontal tolerance must be a finite value >= 0, got {}",
                self.horizontal_tolerance
            )));
        }
        if !(self.overlap_threshold > 0.0 && self.overlap_threshold <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "overlap threshold must be in (0, 1], got {}",
                self.overlap_threshold
            )));
        }
        Ok(())
    }

    /// Clamp out-of-range values so the validator can always run.
    pub fn sanitized(&self) -> Self {
        let mut options = *self;
        if !options.vertical_tolerance.is_finite() || options.vertical_tolerance < 0.0 {
            log::warn!(
                "Invalid vertical tolerance {}, using 0",
                options.vertical_tolerance
            );
            options.vertical_tolerance = 0.0;
        }
        if !options.horizontal_tolerance.is_finite() || options.horizontal_tolerance < 0.0 {
            log::warn!(
                "Invalid horizontal tolerance {}, using 0",
                options.horizontal_tolerance
            );
            options.horizontal_tolerance = 0.0;
        }
        if !(options.overlap_threshold > 0.0 && options.overlap_threshold <= 1.0) {
            log::warn!(
                "Invalid overlap threshold {}, using {}",
                options.overlap_threshold,
                DEFAULT_OVERLAP_THRESHOLD
            );
            options.overlap_threshold = DEFAULT_OVERLAP_THRESHOLD;
        }
        options
    }

    /// Load from JSON and validate; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.ensure_valid()?;
        Ok(options)
    }
}

impl Default for ReadingOrderOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}
