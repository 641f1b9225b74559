//! Geometric primitives for layout analysis.
//!
//! All rectangles live in a page-local coordinate system where the vertical
//! axis increases upward (PDF user space): `y` is the bottom edge and
//! `y + height` is the top edge.
//!
//! [`BoundingBox`] ties a [`Rect`] to a page index. Operations that combine two
//! boxes only produce a result when both boxes are on the same page.

use serde::{Deserialize, Serialize};

/// A 2D point in page space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagcheck::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle in page space (y-up).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// X coordinate of the left edge
    pub x: f32,
    /// Y coordinate of the bottom edge
    pub y: f32,
    /// Width of rectangle
    pub width: f32,
    /// Height of rectangle
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from its bottom-left corner and dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagcheck::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.top(), 50.0);
    /// ```
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from two corner points (bottom-left, top-right).
    ///
    /// # Examples
    ///
    /// ```
    /// use tagcheck::geometry::Rect;
    ///
    /// let rect = Rect::from_points(10.0, 20.0, 110.0, 70.0);
    /// assert_eq!(rect.x, 10.0);
    /// assert_eq!(rect.y, 20.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn from_points(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    /// Get the left edge x-coordinate.
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Get the right edge x-coordinate.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the bottom edge y-coordinate.
    pub fn bottom(&self) -> f32 {
        self.y
    }

    /// Get the top edge y-coordinate.
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Get the center point of the rectangle.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagcheck::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    /// let center = rect.center();
    /// assert_eq!(center.x, 50.0);
    /// assert_eq!(center.y, 25.0);
    /// ```
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Check if this rectangle intersects with another (touching edges do not count).
    ///
    /// # Examples
    ///
    /// ```
    /// use tagcheck::geometry::Rect;
    ///
    /// let r1 = Rect::new(0.0, 0.0, 100.0, 100.0);
    /// let r2 = Rect::new(50.0, 50.0, 100.0, 100.0);
    /// let r3 = Rect::new(200.0, 200.0, 100.0, 100.0);
    ///
    /// assert!(r1.intersects(&r2));
    /// assert!(!r1.intersects(&r3));
    /// ```
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.bottom() < other.top()
            && self.top() > other.bottom()
    }

    /// Check if this rectangle contains a point (edges inclusive).
    ///
    /// # Examples
    ///
    /// ```
    /// use tagcheck::geometry::{Rect, Point};
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
    /// assert!(rect.contains_point(&Point::new(50.0, 50.0)));
    /// assert!(!rect.contains_point(&Point::new(150.0, 150.0)));
    /// ```
    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.bottom() && p.y <= self.top()
    }

    /// Check if `other` lies entirely inside this rectangle (edges inclusive).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.bottom() >= self.bottom()
            && other.top() <= self.top()
    }

    /// Compute the union of this rectangle with another.
    ///
    /// Returns the smallest rectangle that contains both rectangles.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagcheck::geometry::Rect;
    ///
    /// let r1 = Rect::new(0.0, 0.0, 50.0, 50.0);
    /// let r2 = Rect::new(25.0, 25.0, 50.0, 50.0);
    /// let union = r1.union(&r2);
    ///
    /// assert_eq!(union.x, 0.0);
    /// assert_eq!(union.y, 0.0);
    /// assert_eq!(union.right(), 75.0);
    /// assert_eq!(union.top(), 75.0);
    /// ```
    pub fn union(&self, other: &Rect) -> Rect {
        let x0 = self.left().min(other.left());
        let y0 = self.bottom().min(other.bottom());
        let x1 = self.right().max(other.right());
        let y1 = self.top().max(other.top());
        Rect::from_points(x0, y0, x1, y1)
    }

    /// Compute the intersection of this rectangle with another.
    ///
    /// Returns `None` when the rectangles do not overlap with a positive area.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let x0 = self.left().max(other.left());
        let y0 = self.bottom().max(other.bottom());
        let x1 = self.right().min(other.right());
        let y1 = self.top().min(other.top());
        Some(Rect::from_points(x0, y0, x1, y1))
    }

    /// Compute the area of the rectangle.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagcheck::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    /// assert_eq!(rect.area(), 5000.0);
    /// ```
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Length of the shared horizontal extent (negative when apart).
    pub fn horizontal_overlap(&self, other: &Rect) -> f32 {
        self.right().min(other.right()) - self.left().max(other.left())
    }

    /// Length of the shared vertical extent (negative when apart).
    pub fn vertical_overlap(&self, other: &Rect) -> f32 {
        self.top().min(other.top()) - self.bottom().max(other.bottom())
    }

    /// Distance from a point to the nearest point of the rectangle.
    ///
    /// Zero when the point is inside or on an edge.
    pub fn distance_to_point(&self, p: &Point) -> f32 {
        let dx = (self.left() - p.x).max(0.0).max(p.x - self.right());
        let dy = (self.bottom() - p.y).max(0.0).max(p.y - self.top());
        (dx * dx + dy * dy).sqrt()
    }
}

/// A rectangle on a specific page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    /// Zero-based page index
    pub page_index: u32,
    /// Page-local rectangle
    pub rect: Rect,
}

impl BoundingBox {
    /// Create a bounding box on `page_index`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagcheck::geometry::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(0, 72.0, 700.0, 200.0, 14.0);
    /// assert_eq!(bbox.page_index, 0);
    /// assert_eq!(bbox.top(), 714.0);
    /// ```
    pub fn new(page_index: u32, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            page_index,
            rect: Rect::new(x, y, width, height),
        }
    }

    /// Wrap an existing rectangle.
    pub fn from_rect(page_index: u32, rect: Rect) -> Self {
        Self { page_index, rect }
    }

    /// Left edge
    pub fn left(&self) -> f32 {
        self.rect.left()
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.rect.bottom()
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.rect.right()
    }

    /// Top edge
    pub fn top(&self) -> f32 {
        self.rect.top()
    }

    /// Width
    pub fn width(&self) -> f32 {
        self.rect.width
    }

    /// Height
    pub fn height(&self) -> f32 {
        self.rect.height
    }

    /// Area
    pub fn area(&self) -> f32 {
        self.rect.area()
    }

    /// Center point
    pub fn center(&self) -> Point {
        self.rect.center()
    }

    /// Whether both boxes are on the same page.
    pub fn same_page(&self, other: &BoundingBox) -> bool {
        self.page_index == other.page_index
    }

    /// Smallest box covering both, or `None` if the pages differ.
    pub fn union(&self, other: &BoundingBox) -> Option<BoundingBox> {
        if !self.same_page(other) {
            return None;
        }
        Some(BoundingBox::from_rect(self.page_index, self.rect.union(&other.rect)))
    }

    /// Shared region, or `None` if the pages differ or the boxes do not overlap.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        if !self.same_page(other) {
            return None;
        }
        self.rect
            .intersection(&other.rect)
            .map(|rect| BoundingBox::from_rect(self.page_index, rect))
    }

    /// Whether `other` is on the same page and entirely inside this box.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.same_page(other) && self.rect.contains_rect(&other.rect)
    }

    /// Whether the point lies inside this box (page is implied by the caller).
    pub fn contains_point(&self, p: &Point) -> bool {
        self.rect.contains_point(p)
    }

    /// Whether the two boxes overlap with a positive area on the same page.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.same_page(other) && self.rect.intersects(&other.rect)
    }

    /// Intersection area divided by the smaller of the two areas.
    ///
    /// Returns `0.0` for boxes on different pages, disjoint boxes, or when
    /// either box has zero area.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagcheck::geometry::BoundingBox;
    ///
    /// let a = BoundingBox::new(0, 0.0, 0.0, 100.0, 100.0);
    /// let b = BoundingBox::new(0, 50.0, 0.0, 100.0, 100.0);
    /// assert_eq!(a.overlap_fraction(&b), 0.5);
    /// ```
    pub fn overlap_fraction(&self, other: &BoundingBox) -> f32 {
        let smaller = self.area().min(other.area());
        if smaller <= 0.0 {
            return 0.0;
        }
        match self.intersection(other) {
            Some(shared) => shared.area() / smaller,
            None => 0.0,
        }
    }

    /// Distance from a point to the nearest point of this box.
    pub fn distance_to_point(&self, p: &Point) -> f32 {
        self.rect.distance_to_point(p)
    }
}

/// Compute the Euclidean distance between two points.
///
/// # Examples
///
/// ```
/// use tagcheck::geometry::{Point, euclidean_distance};
///
/// let p1 = Point::new(0.0, 0.0);
/// let p2 = Point::new(3.0, 4.0);
///
/// assert_eq!(euclidean_distance(&p1, &p2), 5.0);
/// ```
pub fn euclidean_distance(p1: &Point, p2: &Point) -> f32 {
    ((p2.x - p1.x).powi(2) + (p2.y - p1.y).powi(2)).sqrt()
}
