//! Axis-aligned geometry in device units (points at 72 DPI).
//!
//! The origin is the top-left corner of the page and Y grows downward.

use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A 2D coordinate in device units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

/// An axis-aligned rectangle described by its top-left and bottom-right
/// corners. `end` is the first coordinate outside the rectangle on both
/// axes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub start: Point,
    pub end: Point,
}

impl Rect {
    pub fn new(sx: f64, sy: f64, ex: f64, ey: f64) -> Self {
        Self {
            start: Point::new(sx, sy),
            end: Point::new(ex, ey),
        }
    }

    pub fn from_points(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn from_origin(start: Point, width: f64, height: f64) -> Self {
        Self {
            start,
            end: Point::new(start.x + width, start.y + height),
        }
    }

    pub fn width(&self) -> f64 {
        self.end.x - self.start.x
    }

    pub fn height(&self) -> f64 {
        self.end.y - self.start.y
    }

    /// Whether both extents exceed the given minima.
    pub fn is_valid(&self, min_width: f64, min_height: f64) -> bool {
        min_width < self.width() && min_height < self.height()
    }

    pub fn contains_point(&self, p: Point) -> bool {
        self.start.x <= p.x && p.x < self.end.x && self.start.y <= p.y && p.y < self.end.y
    }

    pub fn contains(&self, other: &Rect) -> bool {
        self.start.x <= other.start.x
            && self.start.y <= other.start.y
            && other.end.x <= self.end.x
            && other.end.y <= self.end.y
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.start.x < other.end.x
            && other.start.x < self.end.x
            && self.start.y < other.end.y
            && other.start.y < self.end.y
    }
}
