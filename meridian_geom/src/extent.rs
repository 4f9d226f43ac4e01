// Copyright 2026 the Meridian Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis‑aligned bounding boxes.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// An axis‑aligned bounding box `[min_x, min_y, max_x, max_y]`.
///
/// Two conventions coexist:
/// - Canvas/pixel extents always have `min_y < max_y` (Y grows downward).
/// - World extents may have `min_y > max_y` when the world Y axis is
///   inverted relative to the pixel axis.
///
/// [`Extent::width`] and [`Extent::height`] are therefore *signed*; use
/// [`Extent::size`] when only the magnitude matters. Containment and
/// intersection tests normalize each axis first, so they work for both
/// conventions.
///
/// Extents serialize as a plain `[min_x, min_y, max_x, max_y]` array.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Extent {
    /// Minimum X.
    pub min_x: f64,
    /// Minimum Y (may exceed `max_y` for Y‑inverted world extents).
    pub min_y: f64,
    /// Maximum X.
    pub max_x: f64,
    /// Maximum Y.
    pub max_y: f64,
}

impl Extent {
    /// The empty extent sentinel `[+inf, +inf, -inf, -inf]`.
    ///
    /// Merging anything into it yields that thing.
    pub const EMPTY: Self = Self::new(
        f64::INFINITY,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::NEG_INFINITY,
    );

    /// Creates an extent from its four bounds.
    #[must_use]
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Returns the empty extent sentinel.
    #[must_use]
    pub const fn empty() -> Self {
        Self::EMPTY
    }

    /// Returns the bounding extent of a set of points.
    ///
    /// Yields [`Extent::EMPTY`] when `points` is empty.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        points
            .into_iter()
            .fold(Self::EMPTY, |extent, pt| extent.extend_point(pt))
    }

    /// Returns `true` if the extent is empty, i.e. `max_x < min_x`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.max_x < self.min_x
    }

    /// Returns `true` if all four bounds are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
    }

    /// Component‑wise union of two extents.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Grows the extent so that it contains `pt`.
    #[must_use]
    pub fn extend_point(&self, pt: Point) -> Self {
        Self::new(
            self.min_x.min(pt.x),
            self.min_y.min(pt.y),
            self.max_x.max(pt.x),
            self.max_y.max(pt.y),
        )
    }

    /// Overlapping region of two extents, or [`Extent::EMPTY`] if they do
    /// not intersect.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        if !self.intersects(other) {
            return Self::EMPTY;
        }
        let (ax0, ax1, ay0, ay1) = self.normalized();
        let (bx0, bx1, by0, by1) = other.normalized();
        Self::new(ax0.max(bx0), ay0.max(by0), ax1.min(bx1), ay1.min(by1))
    }

    /// Midpoint of the extent.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Signed width, `max_x - min_x`.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Signed height, `max_y - min_y`.
    ///
    /// Negative for Y‑inverted world extents.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Absolute width and height.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width().abs(), self.height().abs())
    }

    /// Area covered by the extent; `0` for empty extents.
    #[must_use]
    pub fn area(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        (self.width() * self.height()).abs()
    }

    /// Expands all four sides by `value`.
    ///
    /// Hit boxes grow by half a line width this way. A negative `value`
    /// shrinks the extent.
    #[must_use]
    pub fn buffer(&self, value: f64) -> Self {
        Self::new(
            self.min_x - value,
            self.min_y - value,
            self.max_x + value,
            self.max_y + value,
        )
    }

    /// Returns `true` if `(x, y)` lies inside or on the boundary.
    #[must_use]
    pub fn contains_xy(&self, x: f64, y: f64) -> bool {
        let (x0, x1, y0, y1) = self.normalized();
        x0 <= x && x <= x1 && y0 <= y && y <= y1
    }

    /// Returns `true` if `pt` lies inside or on the boundary.
    #[must_use]
    pub fn contains_point(&self, pt: Point) -> bool {
        self.contains_xy(pt.x, pt.y)
    }

    /// Returns `true` if `other` lies entirely inside this extent.
    ///
    /// Compared component by component, like [`Extent::merge`], so a merge
    /// always contains both of its inputs whatever the axis directions.
    #[must_use]
    pub fn contains_extent(&self, other: &Self) -> bool {
        self.min_x <= other.min_x
            && other.max_x <= self.max_x
            && self.min_y <= other.min_y
            && other.max_y <= self.max_y
    }

    /// Returns `true` if the two extents overlap or touch.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        let (ax0, ax1, ay0, ay1) = self.normalized();
        let (bx0, bx1, by0, by1) = other.normalized();
        ax0 <= bx1 && ax1 >= bx0 && ay0 <= by1 && ay1 >= by0
    }

    /// Scales the extent about its center.
    #[must_use]
    pub fn scale_from_center(&self, scale: f64) -> Self {
        let dx = self.width() * (scale - 1.0) / 2.0;
        let dy = self.height() * (scale - 1.0) / 2.0;
        Self::new(
            self.min_x - dx,
            self.min_y - dy,
            self.max_x + dx,
            self.max_y + dy,
        )
    }

    /// Scales the extent about `anchor`, which stays fixed.
    ///
    /// This is an anchored zoom: `anchor` keeps its relative position inside
    /// the extent. Meant for anchors inside the extent; an outside anchor
    /// still yields the same affine scaling about that point.
    #[must_use]
    pub fn scale_from_point(&self, scale: f64, anchor: Point) -> Self {
        Self::new(
            anchor.x - (anchor.x - self.min_x) * scale,
            anchor.y - (anchor.y - self.min_y) * scale,
            anchor.x + (self.max_x - anchor.x) * scale,
            anchor.y + (self.max_y - anchor.y) * scale,
        )
    }

    /// `(min_x, max_y)`: the top‑left corner in Cartesian (Y‑up) terms.
    #[must_use]
    pub fn top_left(&self) -> Point {
        Point::new(self.min_x, self.max_y)
    }

    /// `(max_x, max_y)`.
    #[must_use]
    pub fn top_right(&self) -> Point {
        Point::new(self.max_x, self.max_y)
    }

    /// `(min_x, min_y)`.
    #[must_use]
    pub fn bottom_left(&self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// `(max_x, min_y)`.
    #[must_use]
    pub fn bottom_right(&self) -> Point {
        Point::new(self.max_x, self.min_y)
    }

    /// The outline as a closed 5‑point ring, starting and ending at the
    /// bottom‑left corner.
    #[must_use]
    pub fn polygon_coords(&self) -> [Point; 5] {
        [
            self.bottom_left(),
            self.top_left(),
            self.top_right(),
            self.bottom_right(),
            self.bottom_left(),
        ]
    }

    /// Converts into a Kurbo rectangle with normalized bounds.
    #[must_use]
    pub fn to_rect(&self) -> Rect {
        let (x0, x1, y0, y1) = self.normalized();
        Rect::new(x0, y0, x1, y1)
    }

    /// Returns `true` if every bound is within `tolerance` of `other`'s.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (self.min_x - other.min_x).abs() <= tolerance
            && (self.min_y - other.min_y).abs() <= tolerance
            && (self.max_x - other.max_x).abs() <= tolerance
            && (self.max_y - other.max_y).abs() <= tolerance
    }

    // (x_lo, x_hi, y_lo, y_hi) regardless of axis direction.
    fn normalized(&self) -> (f64, f64, f64, f64) {
        (
            self.min_x.min(self.max_x),
            self.min_x.max(self.max_x),
            self.min_y.min(self.max_y),
            self.min_y.max(self.max_y),
        )
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl From<[f64; 4]> for Extent {
    fn from([min_x, min_y, max_x, max_y]: [f64; 4]) -> Self {
        Self::new(min_x, min_y, max_x, max_y)
    }
}

impl From<Extent> for [f64; 4] {
    fn from(extent: Extent) -> Self {
        [extent.min_x, extent.min_y, extent.max_x, extent.max_y]
    }
}

impl From<Rect> for Extent {
    fn from(rect: Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.x1, rect.y1)
    }
}

/// Returns `true` if `extent` is missing or empty.
#[must_use]
pub fn is_none_or_empty(extent: Option<&Extent>) -> bool {
    extent.is_none_or(Extent::is_empty)
}
