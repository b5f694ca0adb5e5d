//! Integer image geometry: points, rectangles and traced contours.
//!
//! Rectangle semantics follow the usual computer-vision convention:
//! `x`/`y` is the top-left pixel, `br()` is one past the last pixel, and
//! `contains` is half-open on both axes.

use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in image coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning two arbitrary corner points. `br` of the result is
    /// the larger of the two points, so the far corner itself is excluded.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self {
            x,
            y,
            width: a.x.max(b.x) - x,
            height: a.y.max(b.y) - y,
        }
    }

    /// Rectangle given as fractions of a frame, resolved against the last
    /// pixel index (`size - 1`) and truncated toward zero.
    ///
    /// `Rect::from_fractions(864, 480, (0.0, 0.3), (1.0, 0.7))` is the band
    /// between 30% and 70% of the height across the full width.
    pub fn from_fractions(
        frame_width: u32,
        frame_height: u32,
        from: (f64, f64),
        to: (f64, f64),
    ) -> Self {
        let max_x = f64::from(frame_width.saturating_sub(1));
        let max_y = f64::from(frame_height.saturating_sub(1));
        let x0 = (max_x * from.0) as i32;
        let y0 = (max_y * from.1) as i32;
        let x1 = (max_x * to.0) as i32;
        let y1 = (max_y * to.1) as i32;
        Self::from_corners(Point::new(x0, y0), Point::new(x1, y1))
    }

    pub fn tl(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn br(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    /// The four corners in the order top-left, bottom-right, bottom-left,
    /// top-right. Bottom and right corners lie one past the last pixel.
    pub fn corners(&self) -> [Point; 4] {
        let tl = self.tl();
        let br = self.br();
        [tl, br, Point::new(tl.x, br.y), Point::new(br.x, tl.y)]
    }

    pub fn area(&self) -> i64 {
        i64::from(self.width) * i64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Pixel center, rounded toward the top-left.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn contains(&self, p: Point) -> bool {
        let (px, py) = (i64::from(p.x), i64::from(p.y));
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        x <= px && px < x + i64::from(self.width) && y <= py && py < y + i64::from(self.height)
    }

    /// True when any corner of `other` falls inside `self`.
    ///
    /// This is deliberately weaker than intersection: a rectangle that
    /// crosses `self` without putting a corner inside it does not count.
    pub fn contains_any_corner_of(&self, other: &Rect) -> bool {
        other.corners().iter().any(|&c| self.contains(c))
    }

    /// Intersection with the `width x height` frame, `None` if nothing is left.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<Rect> {
        let frame_w = i32::try_from(width).unwrap_or(i32::MAX);
        let frame_h = i32::try_from(height).unwrap_or(i32::MAX);
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = (self.x.saturating_add(self.width)).min(frame_w);
        let y1 = (self.y.saturating_add(self.height)).min(frame_h);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{} at ({}, {})",
            self.width, self.height, self.x, self.y
        )
    }
}

/// Whether a traced border encloses foreground or a hole inside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorderKind {
    Outer,
    Hole,
}

/// A traced border: the boundary pixels in tracing order plus its place in
/// the border hierarchy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contour {
    pub points: Vec<Point>,
    pub kind: BorderKind,
    /// Index of the enclosing border in the same traced set.
    pub parent: Option<usize>,
}

/// Area enclosed by a closed polygon (shoelace formula). Independent of
/// winding direction.
pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0i64;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        twice_area += i64::from(p.x) * i64::from(q.y) - i64::from(q.x) * i64::from(p.y);
    }
    twice_area.abs() as f64 / 2.0
}

/// Smallest rectangle covering every point, counting each point as a whole
/// pixel. An empty slice gives an empty rectangle.
pub fn bounding_rect(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::default();
    };
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
}
