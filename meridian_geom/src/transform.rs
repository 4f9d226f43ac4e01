// Copyright 2026 the Meridian Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 2×3 affine matrix algebra.

use core::f64::consts::PI;
use core::fmt;
use core::ops::Mul;

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

use crate::coordinate::{Coords, PointMapper};
use crate::extent::Extent;
use crate::precision::Precision;

/// A 2D affine transform `(a, b, c, d, e, f)`.
///
/// A point `(x, y)` maps to `(a*x + c*y + e, b*x + d*y + f)`, which is the
/// same coefficient layout as [`kurbo::Affine`] and the canvas `setTransform`
/// call.
///
/// Transforms are immutable values: [`Transform::multiply`] and the helpers
/// built on it ([`translate`](Self::translate), [`scale`](Self::scale),
/// [`rotate`](Self::rotate), ...) return a new transform and leave `self`
/// untouched. Composition is right‑to‑left on points: in
/// `t.translate(..).rotate(..)` the rotation is applied to a point first.
#[derive(Clone, Copy, PartialEq)]
pub struct Transform(Affine);

impl Transform {
    /// The identity transform `(1, 0, 0, 1, 0, 0)`.
    pub const IDENTITY: Self = Self(Affine::IDENTITY);

    /// Creates a transform from its six coefficients.
    #[must_use]
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self(Affine::new([a, b, c, d, e, f]))
    }

    /// Creates a transform from a `[a, b, c, d, e, f]` array.
    #[must_use]
    pub const fn from_coeffs(coeffs: [f64; 6]) -> Self {
        Self(Affine::new(coeffs))
    }

    /// Returns the `[a, b, c, d, e, f]` coefficients.
    #[must_use]
    pub fn coeffs(&self) -> [f64; 6] {
        self.0.as_coeffs()
    }

    /// Returns the equivalent Kurbo affine.
    #[must_use]
    pub fn to_affine(self) -> Affine {
        self.0
    }

    /// Builds a single transform from an ordered list of operations.
    ///
    /// Each operation is composed onto the running result in list order,
    /// starting from the identity.
    #[must_use]
    pub fn from_ops(ops: &[TransformOp]) -> Self {
        ops.iter().fold(Self::IDENTITY, |t, op| op.compose_onto(t))
    }

    /// Returns `self ∘ other`: `other` is applied to a point first.
    #[must_use]
    pub fn multiply(self, other: Self) -> Self {
        Self(self.0 * other.0)
    }

    /// Composes a translation by `(dx, dy)`.
    #[must_use]
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        self.multiply(Self::new(1.0, 0.0, 0.0, 1.0, dx, dy))
    }

    /// Composes a non‑uniform scale.
    #[must_use]
    pub fn scale(self, sx: f64, sy: f64) -> Self {
        self.multiply(Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0))
    }

    /// Composes a skew; `ax` and `ay` are angles in degrees.
    ///
    /// Matches SVG `skewX(ax)` followed by `skewY(ay)` when only one of them
    /// is non‑zero.
    #[must_use]
    pub fn skew(self, ax: f64, ay: f64) -> Self {
        let tan_x = libm::tan(ax * DEG_TO_RAD);
        let tan_y = libm::tan(ay * DEG_TO_RAD);
        self.multiply(Self::new(1.0, tan_y, tan_x, 1.0, 0.0, 0.0))
    }

    /// Composes a rotation about the origin; `angle` is in degrees.
    #[must_use]
    pub fn rotate(self, angle: f64) -> Self {
        let (sin, cos) = sin_cos_deg(angle);
        self.multiply(Self::new(cos, sin, -sin, cos, 0.0, 0.0))
    }

    /// Composes a rotation about `origin`; `angle` is in degrees.
    ///
    /// Equivalent to `translate(origin)`, `rotate(angle)`,
    /// `translate(-origin)`, composed in that order.
    #[must_use]
    pub fn rotate_at_origin(self, angle: f64, origin: Point) -> Self {
        self.translate(origin.x, origin.y)
            .rotate(angle)
            .translate(-origin.x, -origin.y)
    }

    /// Composes a non‑uniform scale about `origin`.
    #[must_use]
    pub fn scale_at_origin(self, sx: f64, sy: f64, origin: Point) -> Self {
        self.translate(origin.x, origin.y)
            .scale(sx, sy)
            .translate(-origin.x, -origin.y)
    }

    /// Builds the placement matrix for a sub‑drawing in one step.
    ///
    /// The result is
    /// `translate(dx1, dy1) ∘ scale(sx, sy) ∘ rotate(angle) ∘ translate(dx2, dy2)`:
    /// a point is first moved by `(dx2, dy2)` (typically the negated anchor
    /// of the source drawing), rotated by `angle` degrees, scaled, and moved to
    /// the target position `(dx1, dy1)`.
    #[must_use]
    pub fn compose(dx1: f64, dy1: f64, sx: f64, sy: f64, angle: f64, dx2: f64, dy2: f64) -> Self {
        let (sin, cos) = sin_cos_deg(angle);
        Self::new(
            sx * cos,
            sy * sin,
            -sx * sin,
            sy * cos,
            dx2 * sx * cos - dy2 * sx * sin + dx1,
            dx2 * sy * sin + dy2 * sy * cos + dy1,
        )
    }

    /// Returns the inverse transform.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Singular`] when the determinant is zero (or
    /// not finite); such a matrix collapses the plane and has no inverse.
    pub fn invert(self) -> Result<Self, TransformError> {
        let [a, b, c, d, e, f] = self.coeffs();
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(TransformError::Singular { determinant: det });
        }
        Ok(Self::new(
            d / det,
            -b / det,
            -c / det,
            a / det,
            (c * f - d * e) / det,
            -(a * f - b * e) / det,
        ))
    }

    /// Maps a point, rounding the result to `precision`.
    #[must_use]
    pub fn apply(&self, pt: Point, precision: Precision) -> Point {
        let mapped = self.0 * pt;
        Point::new(precision.round(mapped.x), precision.round(mapped.y))
    }

    /// Maps every point of a coordinate tree, keeping its shape.
    #[must_use]
    pub fn apply_coords(&self, coords: &Coords, precision: Precision) -> Coords {
        coords.map_points(|pt| self.apply(pt, precision))
    }

    /// Bounding extent of the four transformed corners of `extent`.
    #[must_use]
    pub fn apply_extent(&self, extent: &Extent) -> Extent {
        Extent::from_points([
            self.0 * extent.bottom_left(),
            self.0 * extent.top_left(),
            self.0 * extent.top_right(),
            self.0 * extent.bottom_right(),
        ])
    }

    /// `a*d - b*c`.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        let [a, b, c, d, _, _] = self.coeffs();
        a * d - b * c
    }

    /// Approximate uniform scale factor, `sqrt(|determinant|)`.
    ///
    /// Exact only for uniform, unskewed scaling. Used to scale line widths
    /// along with the geometry they belong to.
    #[must_use]
    pub fn scale_factor(&self) -> f64 {
        libm::sqrt(self.determinant().abs())
    }

    /// Rotation angle in degrees, computed as `atan2(b, d)`.
    #[must_use]
    pub fn rotation_angle(&self) -> f64 {
        let [_, b, _, d, _, _] = self.coeffs();
        libm::atan2(b, d) * RAD_TO_DEG
    }

    /// Translation part `(e, f)`.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        self.0.translation()
    }

    /// Returns `true` for the identity transform.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Returns `true` if every coefficient is within `tolerance` of `other`'s.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.coeffs()
            .iter()
            .zip(other.coeffs().iter())
            .all(|(x, y)| (x - y).abs() <= tolerance)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.coeffs();
        write!(f, "Transform({a}, {b}, {c}, {d}, {e}, {g})")
    }
}

impl From<Affine> for Transform {
    fn from(affine: Affine) -> Self {
        Self(affine)
    }
}

impl From<Transform> for Affine {
    fn from(t: Transform) -> Self {
        t.0
    }
}

impl Mul for Transform {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.multiply(rhs)
    }
}

impl Mul<Point> for Transform {
    type Output = Point;

    fn mul(self, rhs: Point) -> Point {
        self.0 * rhs
    }
}

impl PointMapper for Transform {
    fn map_point(&self, pt: Point, precision: Precision) -> Option<Point> {
        Some(self.apply(pt, precision))
    }
}

/// One step of a declarative transform list, as produced by style sheets.
///
/// Serialized with an `action` tag:
///
/// ```json
/// [
///   { "action": "translate", "value": [10, 20] },
///   { "action": "rotate", "value": 45, "origin": [5, 5] },
///   { "action": "scale", "value": [2, 2] },
///   { "action": "matrix", "value": [1, 0, 0, 1, 0, 0] }
/// ]
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum TransformOp {
    /// Translate by `[dx, dy]`.
    Translate {
        /// Offset.
        value: [f64; 2],
    },
    /// Rotate by `value` degrees, about `origin` if given.
    Rotate {
        /// Angle in degrees.
        value: f64,
        /// Optional pivot.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        origin: Option<[f64; 2]>,
    },
    /// Scale by `[sx, sy]`, about `origin` if given.
    Scale {
        /// Scale factors.
        value: [f64; 2],
        /// Optional pivot.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        origin: Option<[f64; 2]>,
    },
    /// Multiply by a raw `[a, b, c, d, e, f]` matrix.
    Matrix {
        /// Coefficients.
        value: [f64; 6],
    },
}

impl TransformOp {
    fn compose_onto(&self, t: Transform) -> Transform {
        match *self {
            Self::Translate { value: [dx, dy] } => t.translate(dx, dy),
            Self::Rotate {
                value,
                origin: None,
            } => t.rotate(value),
            Self::Rotate {
                value,
                origin: Some([x, y]),
            } => t.rotate_at_origin(value, Point::new(x, y)),
            Self::Scale {
                value: [sx, sy],
                origin: None,
            } => t.scale(sx, sy),
            Self::Scale {
                value: [sx, sy],
                origin: Some([x, y]),
            } => t.scale_at_origin(sx, sy, Point::new(x, y)),
            Self::Matrix { value } => t.multiply(Transform::from_coeffs(value)),
        }
    }
}

/// Error returned by [`Transform::invert`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformError {
    /// The matrix has a zero determinant.
    Singular {
        /// The offending determinant.
        determinant: f64,
    },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Singular { determinant } => write!(
                f,
                "transform is not invertible (determinant is {determinant})"
            ),
        }
    }
}

impl core::error::Error for TransformError {}

const DEG_TO_RAD: f64 = PI / 180.0;
const RAD_TO_DEG: f64 = 180.0 / PI;

// Exact values at multiples of 90° so right‑angle rotations stay clean.
// `(sin, cos)` of `angle` degrees, exact at multiples of 90.
pub(crate) fn sin_cos_deg(angle: f64) -> (f64, f64) {
    let normalized = angle % 360.0;
    let normalized = if normalized < 0.0 {
        normalized + 360.0
    } else {
        normalized
    };
    if normalized == 0.0 {
        (0.0, 1.0)
    } else if normalized == 90.0 {
        (1.0, 0.0)
    } else if normalized == 180.0 {
        (0.0, -1.0)
    } else if normalized == 270.0 {
        (-1.0, 0.0)
    } else {
        let rad = angle * DEG_TO_RAD;
        (libm::sin(rad), libm::cos(rad))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use kurbo::Point;

    use super::{Transform, TransformError, TransformOp};
    use crate::{Coords, Extent, Precision};

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
    }

    #[test]
    fn identity_and_coefficients() {
        let t = Transform::default();
        assert!(t.is_identity());
        assert_eq!(t.coeffs(), [1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        let m = Transform::new(2.0, 0.0, 0.0, 3.0, 4.0, 5.0);
        assert_eq!(
            m.apply(Point::new(1.0, 1.0), Precision::High),
            Point::new(6.0, 8.0)
        );
    }

    #[test]
    fn composition_leaves_operands_untouched() {
        let base = Transform::IDENTITY.scale(2.0, 2.0);
        let moved = base.translate(10.0, 0.0);
        assert_eq!(base, Transform::IDENTITY.scale(2.0, 2.0));
        // Translation happens in the scaled frame.
        assert_eq!(
            moved.apply(Point::ZERO, Precision::High),
            Point::new(20.0, 0.0)
        );
        assert_eq!(moved, base * Transform::IDENTITY.translate(10.0, 0.0));
    }

    #[test]
    fn translate_and_rotate_cancel() {
        let t = Transform::IDENTITY.translate(7.5, -3.0).translate(-7.5, 3.0);
        assert!(t.is_identity());

        let r = Transform::IDENTITY.rotate(37.0).rotate(-37.0);
        assert!(r.approx_eq(&Transform::IDENTITY, 1e-12));
    }

    #[test]
    fn right_angle_rotation_is_exact() {
        let r = Transform::IDENTITY.rotate(90.0);
        assert_eq!(
            r.apply(Point::new(1.0, 0.0), Precision::Exact),
            Point::new(0.0, 1.0)
        );
        assert!((r.rotation_angle() - 90.0).abs() < 1e-12);
        let r = Transform::IDENTITY.rotate(-90.0);
        assert_eq!(
            r.apply(Point::new(1.0, 0.0), Precision::Exact),
            Point::new(0.0, -1.0)
        );
    }

    #[test]
    fn skew_uses_tangent_of_angle() {
        let sx = Transform::IDENTITY.skew(45.0, 0.0);
        assert!(close(
            sx.apply(Point::new(0.0, 1.0), Precision::Exact),
            Point::new(1.0, 1.0)
        ));
        assert_eq!(
            sx.apply(Point::new(1.0, 0.0), Precision::Exact),
            Point::new(1.0, 0.0)
        );

        let sy = Transform::IDENTITY.skew(0.0, 45.0);
        assert!(close(
            sy.apply(Point::new(1.0, 0.0), Precision::Exact),
            Point::new(1.0, 1.0)
        ));
        assert_eq!(
            sy.apply(Point::new(0.0, 1.0), Precision::Exact),
            Point::new(0.0, 1.0)
        );

        let shallow = Transform::IDENTITY.skew(30.0, 0.0);
        let expected_x = 2.0 * libm::tan(30.0_f64.to_radians());
        assert!(close(
            shallow.apply(Point::new(0.0, 2.0), Precision::Exact),
            Point::new(expected_x, 2.0)
        ));
    }

    #[test]
    fn invert_round_trips_points() {
        let transforms = [
            Transform::IDENTITY
                .translate(12.0, -4.0)
                .rotate(33.0)
                .scale(2.0, 0.5),
            Transform::IDENTITY.skew(10.0, 0.0).translate(3.0, 3.0),
            Transform::compose(100.0, 50.0, 3.0, 3.0, 45.0, -8.0, -8.0),
        ];
        let p = Point::new(3.25, -17.5);
        for t in transforms {
            let inv = t.invert().unwrap();
            let back = inv.apply(t.apply(p, Precision::Exact), Precision::High);
            assert!(close(back, p), "{t:?}: {back:?} != {p:?}");
            assert!((t * inv).approx_eq(&Transform::IDENTITY, 1e-9));
        }
    }

    #[test]
    fn invert_singular_fails() {
        let t = Transform::IDENTITY.scale(0.0, 4.0);
        assert_eq!(
            t.invert(),
            Err(TransformError::Singular { determinant: 0.0 })
        );
    }

    #[test]
    fn scale_factor_from_determinant() {
        let t = Transform::IDENTITY.scale(4.0, 9.0);
        assert_eq!(t.determinant(), 36.0);
        assert_eq!(t.scale_factor(), 6.0);
        let flipped = Transform::IDENTITY.scale(-2.0, 2.0);
        assert_eq!(flipped.scale_factor(), 2.0);
        let rotated = Transform::IDENTITY.rotate(30.0).scale(3.0, 3.0);
        assert!((rotated.scale_factor() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn rotation_angle_uses_b_and_d() {
        let t = Transform::IDENTITY.rotate(30.0);
        assert!((t.rotation_angle() - 30.0).abs() < 1e-9);
        // atan2(b, d), not atan2(b, a): a non‑uniform scale changes the answer.
        let t = Transform::new(2.0, 1.0, 0.0, 1.0, 0.0, 0.0);
        assert!((t.rotation_angle() - 45.0).abs() < 1e-9);
    }

    #[test]
    fn rotate_at_origin_keeps_origin_fixed() {
        let origin = Point::new(10.0, 10.0);
        let t = Transform::IDENTITY.rotate_at_origin(90.0, origin);
        assert_eq!(t.apply(origin, Precision::High), origin);
        assert_eq!(
            t.apply(Point::new(20.0, 10.0), Precision::High),
            Point::new(10.0, 20.0)
        );
    }

    #[test]
    fn compose_matches_chained_operations() {
        let composed = Transform::compose(5.0, 6.0, 2.0, 3.0, 30.0, -1.0, 4.0);
        let chained = Transform::IDENTITY
            .translate(5.0, 6.0)
            .scale(2.0, 3.0)
            .rotate(30.0)
            .translate(-1.0, 4.0);
        assert!(composed.approx_eq(&chained, 1e-12));
    }

    #[test]
    fn apply_rounding() {
        let t = Transform::IDENTITY.scale(1.0 / 3.0, 1.0 / 3.0);
        let p = Point::new(1.0, 2.0);
        assert_eq!(t.apply(p, Precision::High), Point::new(0.333_333, 0.666_667));
        assert_eq!(t.apply(p, Precision::Low), Point::new(0.33, 0.67));
    }

    #[test]
    fn apply_coords_keeps_shape() {
        let t = Transform::IDENTITY.translate(1.0, 1.0);
        let coords = Coords::Multi(vec![
            Coords::Point(Point::new(0.0, 0.0)),
            Coords::Path(vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)]),
        ]);
        let moved = t.apply_coords(&coords, Precision::High);
        assert_eq!(
            moved,
            Coords::Multi(vec![
                Coords::Point(Point::new(1.0, 1.0)),
                Coords::Path(vec![Point::new(2.0, 2.0), Point::new(3.0, 3.0)]),
            ])
        );
    }

    #[test]
    fn apply_extent_bounds_rotated_box() {
        let t = Transform::IDENTITY.rotate(90.0);
        let e = t.apply_extent(&Extent::new(0.0, 0.0, 2.0, 1.0));
        assert!(e.approx_eq(&Extent::new(-1.0, 0.0, 0.0, 2.0), 1e-12));
    }

    #[test]
    fn from_ops_folds_in_order() {
        let ops = [
            TransformOp::Translate { value: [10.0, 0.0] },
            TransformOp::Rotate {
                value: 90.0,
                origin: Some([1.0, 0.0]),
            },
            TransformOp::Scale {
                value: [2.0, 2.0],
                origin: None,
            },
            TransformOp::Matrix {
                value: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            },
        ];
        let expected = Transform::IDENTITY
            .translate(10.0, 0.0)
            .rotate_at_origin(90.0, Point::new(1.0, 0.0))
            .scale(2.0, 2.0);
        assert!(Transform::from_ops(&ops).approx_eq(&expected, 1e-12));
        assert!(Transform::from_ops(&[]).is_identity());
    }

    #[test]
    fn ops_deserialize_from_style_json() {
        let json = r#"[
            {"action": "translate", "value": [10, 20]},
            {"action": "rotate", "value": 45, "origin": [5, 5]},
            {"action": "scale", "value": [2, 3]},
            {"action": "matrix", "value": [1, 0, 0, 1, 4, 4]}
        ]"#;
        let ops: alloc::vec::Vec<TransformOp> = serde_json::from_str(json).unwrap();
        assert_eq!(ops.len(), 4);
        assert_eq!(
            ops[1],
            TransformOp::Rotate {
                value: 45.0,
                origin: Some([5.0, 5.0]),
            }
        );
        assert_eq!(
            ops[2],
            TransformOp::Scale {
                value: [2.0, 3.0],
                origin: None,
            }
        );
    }
}
