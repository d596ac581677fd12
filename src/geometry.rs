//! Integer geometry on the plan canvas: points, axis-aligned rectangles,
//! grid snapping, and meter/unit conversion.
//!
//! Everything here is pure. Overlap is strict: two rectangles that only
//! share an edge or a corner do not intersect, which is what lets rooms sit
//! flush against each other.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::consts::{GRID_SIZE, UNITS_PER_METER};

/// A point in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn offset_from(self, other: Point) -> Point {
        Point::new(self.x.saturating_sub(other.x), self.y.saturating_sub(other.y))
    }
}

/// Axis-aligned rectangle in canvas units.
///
/// `x`/`y` is the top-left corner. Committed rooms always have a positive
/// width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    #[must_use]
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Top-left corner.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Exclusive right edge.
    #[must_use]
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Whether both dimensions are strictly positive and the far edges are
    /// representable as `i32`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.x.checked_add(self.width).is_some()
            && self.y.checked_add(self.height).is_some()
    }

    /// Same size, moved so its top-left corner is `origin`.
    #[must_use]
    pub fn with_origin(&self, origin: Point) -> Rect {
        Rect::new(origin.x, origin.y, self.width, self.height)
    }

    /// Same size, shifted by `(dx, dy)`.
    #[must_use]
    pub fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x.saturating_add(dx), self.y.saturating_add(dy), self.width, self.height)
    }

    /// Strict interior overlap. Shared edges and corners do not count.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        if !self.is_valid() || !other.is_valid() {
            return false;
        }
        self.x < other.right() && other.x < self.right() && self.y < other.bottom() && other.y < self.bottom()
    }

    /// Half-open point containment: the left/top edges are inside, the
    /// right/bottom edges are not.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Whether `inner` lies entirely within `self`, edges inclusive. An
    /// invalid `inner` is never contained.
    #[must_use]
    pub fn contains_rect(&self, inner: &Rect) -> bool {
        inner.is_valid()
            && inner.x >= self.x && inner.y >= self.y && inner.right() <= self.right() && inner.bottom() <= self.bottom()
    }
}

/// Free-function form of [`Rect::intersects`].
#[must_use]
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.intersects(b)
}

/// Free-function form of [`Rect::contains`].
#[must_use]
pub fn contains(r: &Rect, p: Point) -> bool {
    r.contains(p)
}

/// Round `v` to the nearest multiple of `grid`. Exact halves round toward
/// positive infinity. A non-positive `grid` leaves `v` unchanged. Results
/// past the `i32` range saturate.
#[must_use]
pub fn snap_to_grid(v: i32, grid: i32) -> i32 {
    if grid <= 0 {
        return v;
    }
    let grid = i64::from(grid);
    let snapped = (i64::from(v) + grid / 2).div_euclid(grid) * grid;
    i32::try_from(snapped).unwrap_or(if snapped < 0 { i32::MIN } else { i32::MAX })
}

/// Snap both coordinates of `p` to `grid`.
#[must_use]
pub fn snap_point(p: Point, grid: i32) -> Point {
    Point::new(snap_to_grid(p.x, grid), snap_to_grid(p.y, grid))
}

/// Convert a real-world length to canvas units (`round(meters * GRID_SIZE * 2)`).
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn meters_to_units(meters: f64) -> i32 {
    (meters * UNITS_PER_METER).round() as i32
}

/// Convert canvas units back to meters (`units * 0.5 / GRID_SIZE`).
#[must_use]
pub fn units_to_meters(units: i32) -> f64 {
    f64::from(units) * 0.5 / f64::from(GRID_SIZE)
}
