// Copyright 2026 the Meridian Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate trees and batch mapping.
//!
//! Geometry producers hand the engine anything from a single position to a
//! multi‑part polygon. [`Coords`] keeps that shape explicit, and the helpers
//! here map every leaf while preserving it.

use alloc::vec::Vec;

use kurbo::Point;

use crate::extent::Extent;
use crate::precision::{Precision, round_to};
use crate::transform::sin_cos_deg;

/// A position or an arbitrarily nested collection of positions.
///
/// The variant drives recursion: a two‑point path and a single point can never
/// be confused with each other.
#[derive(Clone, Debug, PartialEq)]
pub enum Coords {
    /// A single position.
    Point(Point),
    /// An ordered run of positions: a line string or a polygon ring.
    Path(Vec<Point>),
    /// Nested parts: rings of a polygon, parts of a multi‑geometry, and so on.
    Multi(Vec<Coords>),
}

/// Something that can map a single point into another space.
///
/// Implemented by [`Transform`](crate::Transform) and by the world↔pixel
/// ratio in `meridian_view`, so both can drive [`transform_2d`].
pub trait PointMapper {
    /// Maps `pt`, rounding to `precision`.
    ///
    /// Returns `None` if the mapper is not able to map anything, for example
    /// because it is not fully configured.
    fn map_point(&self, pt: Point, precision: Precision) -> Option<Point>;
}

impl<M: PointMapper + ?Sized> PointMapper for &M {
    fn map_point(&self, pt: Point, precision: Precision) -> Option<Point> {
        (**self).map_point(pt, precision)
    }
}

/// Maps every point of `coords` through `tool`.
///
/// Unlike the ratio conversions, this never reports an error to the caller:
/// a non‑finite leaf or a mapper that cannot map is logged at `error` level
/// and the whole call yields `None`.
pub fn transform_2d<M: PointMapper + ?Sized>(
    tool: &M,
    coords: &Coords,
    precision: Precision,
) -> Option<Coords> {
    match coords {
        Coords::Point(pt) => map_leaf(tool, *pt, precision).map(Coords::Point),
        Coords::Path(points) => points
            .iter()
            .map(|pt| map_leaf(tool, *pt, precision))
            .collect::<Option<Vec<_>>>()
            .map(Coords::Path),
        Coords::Multi(parts) => parts
            .iter()
            .map(|part| transform_2d(tool, part, precision))
            .collect::<Option<Vec<_>>>()
            .map(Coords::Multi),
    }
}

fn map_leaf<M: PointMapper + ?Sized>(tool: &M, pt: Point, precision: Precision) -> Option<Point> {
    if !pt.is_finite() {
        log::error!("malformed coordinate {pt:?}: expected two finite numbers");
        return None;
    }
    let mapped = tool.map_point(pt, precision);
    if mapped.is_none() {
        log::error!("coordinate mapper could not map {pt:?}");
    }
    mapped
}

impl Coords {
    /// Applies `f` to every point, keeping the tree shape.
    #[must_use]
    pub fn map_points(&self, mut f: impl FnMut(Point) -> Point) -> Self {
        self.map_points_inner(&mut f)
    }

    fn map_points_inner(&self, f: &mut impl FnMut(Point) -> Point) -> Self {
        match self {
            Self::Point(pt) => Self::Point(f(*pt)),
            Self::Path(points) => Self::Path(points.iter().map(|pt| f(*pt)).collect()),
            Self::Multi(parts) => {
                Self::Multi(parts.iter().map(|part| part.map_points_inner(f)).collect())
            }
        }
    }

    /// Calls `f` with every point, depth first.
    pub fn for_each_point(&self, mut f: impl FnMut(Point)) {
        self.for_each_point_inner(&mut f);
    }

    fn for_each_point_inner(&self, f: &mut impl FnMut(Point)) {
        match self {
            Self::Point(pt) => f(*pt),
            Self::Path(points) => points.iter().for_each(|pt| f(*pt)),
            Self::Multi(parts) => parts.iter().for_each(|part| part.for_each_point_inner(f)),
        }
    }

    /// Total number of points in the tree.
    #[must_use]
    pub fn point_count(&self) -> usize {
        match self {
            Self::Point(_) => 1,
            Self::Path(points) => points.len(),
            Self::Multi(parts) => parts.iter().map(Self::point_count).sum(),
        }
    }

    /// Bounding extent of all points; empty for an empty tree.
    #[must_use]
    pub fn extent(&self) -> Extent {
        let mut extent = Extent::EMPTY;
        self.for_each_point(|pt| extent = extent.extend_point(pt));
        extent
    }

    /// Rotates every point about the origin by `angle` degrees.
    #[must_use]
    pub fn rotate(&self, angle: f64) -> Self {
        self.rotate_by_anchor(angle, Point::ZERO)
    }

    /// Rotates every point about `anchor` by `angle` degrees.
    #[must_use]
    pub fn rotate_by_anchor(&self, angle: f64, anchor: Point) -> Self {
        let (sin, cos) = sin_cos_deg(angle);
        self.map_points(|pt| {
            let dx = pt.x - anchor.x;
            let dy = pt.y - anchor.y;
            Point::new(
                anchor.x + dx * cos - dy * sin,
                anchor.y + dx * sin + dy * cos,
            )
        })
    }

    /// Scales every point relative to the origin.
    #[must_use]
    pub fn scale(&self, sx: f64, sy: f64) -> Self {
        self.scale_by_anchor(sx, sy, Point::ZERO)
    }

    /// Scales every point relative to `anchor`.
    #[must_use]
    pub fn scale_by_anchor(&self, sx: f64, sy: f64, anchor: Point) -> Self {
        self.map_points(|pt| {
            Point::new(
                anchor.x + (pt.x - anchor.x) * sx,
                anchor.y + (pt.y - anchor.y) * sy,
            )
        })
    }

    /// Moves every point by `(dx, dy)`.
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        self.map_points(|pt| Point::new(pt.x + dx, pt.y + dy))
    }

    /// Rounds every coordinate to `decimals` decimal places.
    #[must_use]
    pub fn to_fixed(&self, decimals: u32) -> Self {
        self.map_points(|pt| Point::new(round_to(pt.x, decimals), round_to(pt.y, decimals)))
    }

    /// Returns `true` if every leaf is a pair of finite numbers.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Point(pt) => pt.is_finite(),
            Self::Path(points) => points.iter().all(|pt| pt.is_finite()),
            Self::Multi(parts) => parts.iter().all(Self::is_valid),
        }
    }

    /// Deep comparison of shape and values, with a per‑coordinate tolerance.
    ///
    /// Use `==` for exact comparison.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        let close = |a: &Point, b: &Point| {
            (a.x - b.x).abs() <= tolerance && (a.y - b.y).abs() <= tolerance
        };
        match (self, other) {
            (Self::Point(a), Self::Point(b)) => close(a, b),
            (Self::Path(a), Self::Path(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(a, b)| close(a, b))
            }
            (Self::Multi(a), Self::Multi(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a.approx_eq(b, tolerance))
            }
            _ => false,
        }
    }

    /// Reverses the order at this nesting level only.
    ///
    /// For a [`Coords::Multi`], the parts are reordered but each part keeps
    /// its own point order.
    #[must_use]
    pub fn reverse(&self) -> Self {
        match self {
            Self::Point(pt) => Self::Point(*pt),
            Self::Path(points) => Self::Path(points.iter().rev().copied().collect()),
            Self::Multi(parts) => Self::Multi(parts.iter().rev().cloned().collect()),
        }
    }
}

impl From<Point> for Coords {
    fn from(pt: Point) -> Self {
        Self::Point(pt)
    }
}

impl From<Vec<Point>> for Coords {
    fn from(points: Vec<Point>) -> Self {
        Self::Path(points)
    }
}

impl From<Vec<Self>> for Coords {
    fn from(parts: Vec<Self>) -> Self {
        Self::Multi(parts)
    }
}
