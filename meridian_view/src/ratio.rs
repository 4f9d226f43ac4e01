// Copyright 2026 the Meridian Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! World extent ↔ canvas extent mapping.

use kurbo::Point;
use meridian_geom::{Coords, Extent, PointMapper, Precision};

use crate::error::RatioError;

/// Options for [`Ratio::convert`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Pad the destination extent so its aspect ratio matches the source.
    pub correct: bool,
    /// Both spaces grow Y in the same direction; no flip is applied.
    pub same_origin: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            correct: true,
            same_origin: false,
        }
    }
}

/// Maps coordinates between a world extent and a canvas extent.
///
/// A `Ratio` is a pure function of its two extents and the
/// [`same_origin`](Self::same_origin) flag; rebuild or update it whenever the
/// viewport or the target surface size changes.
///
/// By default world space is Cartesian (Y up) and canvas space is Y down, so
/// the Y axis is flipped during conversion.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Ratio {
    world_extent: Option<Extent>,
    canvas_extent: Option<Extent>,
    same_origin: bool,
    // Derived from the three fields above; rebuilt by every setter so a
    // batch mapping does not redo the aspect correction per point.
    to_pix: Option<LinearMap>,
    to_world: Option<LinearMap>,
}

impl Ratio {
    /// Creates a ratio with no extents; conversions fail until both are set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ratio from a world extent and a canvas extent.
    #[must_use]
    pub fn with_extents(world_extent: Extent, canvas_extent: Extent) -> Self {
        let mut ratio = Self {
            world_extent: Some(world_extent),
            canvas_extent: Some(canvas_extent),
            ..Self::default()
        };
        ratio.rebuild_maps();
        ratio
    }

    /// Sets the world extent.
    pub fn set_world_extent(&mut self, extent: Extent) {
        self.world_extent = Some(extent);
        self.rebuild_maps();
    }

    /// Sets the canvas (pixel) extent.
    pub fn set_canvas_extent(&mut self, extent: Extent) {
        self.canvas_extent = Some(extent);
        self.rebuild_maps();
    }

    /// Sets whether world Y grows downward like pixel Y.
    pub fn set_world_extent_origin(&mut self, same_origin: bool) {
        self.same_origin = same_origin;
        self.rebuild_maps();
    }

    /// Returns the world extent, if set.
    #[must_use]
    pub fn world_extent(&self) -> Option<Extent> {
        self.world_extent
    }

    /// Returns the canvas extent, if set.
    #[must_use]
    pub fn canvas_extent(&self) -> Option<Extent> {
        self.canvas_extent
    }

    /// Returns `true` if world Y grows downward like pixel Y.
    #[must_use]
    pub fn same_origin(&self) -> bool {
        self.same_origin
    }

    /// Pixels per world unit along X: canvas width / world width.
    ///
    /// # Errors
    ///
    /// Fails if either extent has not been set.
    pub fn scale(&self) -> Result<f64, RatioError> {
        let (world, canvas) = self.extents()?;
        Ok(canvas.width() / world.width())
    }

    /// Maps `coords` from the `from` extent into the `to` extent.
    ///
    /// When `options.correct` is set, `to` is first padded with
    /// [`correct_extent`] so the mapping is isotropic. X is interpolated
    /// linearly; Y is either interpolated the same way (`same_origin`) or
    /// flipped so that `from`'s minimum Y lands on `to`'s maximum Y.
    #[must_use]
    pub fn convert(
        coords: &Coords,
        from: &Extent,
        to: &Extent,
        options: ConvertOptions,
        precision: Precision,
    ) -> Coords {
        let map = LinearMap::new(from, to, options);
        coords.map_points(|pt| map.apply(pt, precision))
    }

    /// Maps world coordinates to pixels, rounded to [`Precision::Low`].
    ///
    /// # Errors
    ///
    /// Fails if either extent has not been set.
    pub fn to_pix(&self, coords: &Coords) -> Result<Coords, RatioError> {
        self.to_pix_with(coords, Precision::Low)
    }

    /// Maps world coordinates to pixels with an explicit precision.
    ///
    /// # Errors
    ///
    /// Fails if either extent has not been set.
    pub fn to_pix_with(&self, coords: &Coords, precision: Precision) -> Result<Coords, RatioError> {
        let map = self.pix_map()?;
        Ok(coords.map_points(|pt| map.apply(pt, precision)))
    }

    /// Maps pixel coordinates back to world, rounded to [`Precision::High`].
    ///
    /// This is the exact inverse of [`Ratio::to_pix`] (up to rounding),
    /// including the aspect correction.
    ///
    /// # Errors
    ///
    /// Fails if either extent has not been set.
    pub fn to_world(&self, pix: &Coords) -> Result<Coords, RatioError> {
        self.to_world_with(pix, Precision::High)
    }

    /// Maps pixel coordinates back to world with an explicit precision.
    ///
    /// # Errors
    ///
    /// Fails if either extent has not been set.
    pub fn to_world_with(&self, pix: &Coords, precision: Precision) -> Result<Coords, RatioError> {
        let map = self.world_map()?;
        Ok(pix.map_points(|pt| map.apply(pt, precision)))
    }

    /// Maps a single world point to pixels.
    ///
    /// # Errors
    ///
    /// Fails if either extent has not been set.
    pub fn to_pix_point(&self, pt: Point, precision: Precision) -> Result<Point, RatioError> {
        Ok(self.pix_map()?.apply(pt, precision))
    }

    /// Maps a single pixel position to world.
    ///
    /// # Errors
    ///
    /// Fails if either extent has not been set.
    pub fn to_world_point(&self, pt: Point, precision: Precision) -> Result<Point, RatioError> {
        Ok(self.world_map()?.apply(pt, precision))
    }

    /// A [`PointMapper`] that maps pixels to world, for use with
    /// [`meridian_geom::transform_2d`]. The ratio itself maps world to pixels.
    #[must_use]
    pub fn world_mapper(&self) -> ToWorld<'_> {
        ToWorld(self)
    }

    fn extents(&self) -> Result<(Extent, Extent), RatioError> {
        let world = self.world_extent.ok_or(RatioError::MissingWorldExtent)?;
        let canvas = self.canvas_extent.ok_or(RatioError::MissingCanvasExtent)?;
        Ok((world, canvas))
    }

    fn pix_map(&self) -> Result<LinearMap, RatioError> {
        self.to_pix.ok_or_else(|| self.missing_extent())
    }

    fn world_map(&self) -> Result<LinearMap, RatioError> {
        self.to_world.ok_or_else(|| self.missing_extent())
    }

    fn missing_extent(&self) -> RatioError {
        if self.world_extent.is_none() {
            RatioError::MissingWorldExtent
        } else {
            RatioError::MissingCanvasExtent
        }
    }

    fn rebuild_maps(&mut self) {
        let Ok((world, canvas)) = self.extents() else {
            self.to_pix = None;
            self.to_world = None;
            return;
        };
        self.to_pix = Some(LinearMap::new(
            &world,
            &canvas,
            ConvertOptions {
                correct: true,
                same_origin: self.same_origin,
            },
        ));
        // Inverse of `to_pix`: start from the corrected canvas, not the raw one.
        let corrected = correct_extent(&canvas, &world);
        self.to_world = Some(LinearMap::new(
            &corrected,
            &world,
            ConvertOptions {
                correct: false,
                same_origin: self.same_origin,
            },
        ));
    }
}

impl PointMapper for Ratio {
    fn map_point(&self, pt: Point, precision: Precision) -> Option<Point> {
        match self.to_pix_point(pt, precision) {
            Ok(mapped) => Some(mapped),
            Err(err) => {
                log::debug!("cannot map {pt:?} to pixels: {err}");
                None
            }
        }
    }
}

/// Pixel → world view of a [`Ratio`], see [`Ratio::world_mapper`].
#[derive(Clone, Copy, Debug)]
pub struct ToWorld<'a>(&'a Ratio);

impl PointMapper for ToWorld<'_> {
    fn map_point(&self, pt: Point, precision: Precision) -> Option<Point> {
        match self.0.to_world_point(pt, precision) {
            Ok(mapped) => Some(mapped),
            Err(err) => {
                log::debug!("cannot map {pt:?} to world: {err}");
                None
            }
        }
    }
}

/// Pads `to` so that its aspect ratio matches `from`'s.
///
/// The relatively shorter axis of `to` is grown symmetrically around its
/// center; the other axis is unchanged. Each axis keeps its direction, so a
/// Y‑inverted extent stays inverted. Degenerate extents (zero or non‑finite
/// size) are returned unchanged.
#[must_use]
pub fn correct_extent(to: &Extent, from: &Extent) -> Extent {
    let from_size = from.size();
    let to_size = to.size();
    let usable = |w: f64, h: f64| w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0;
    if !usable(from_size.width, from_size.height) || !usable(to_size.width, to_size.height) {
        return *to;
    }

    let target = from_size.width / from_size.height;
    let current = to_size.width / to_size.height;
    let center = to.center();
    if current < target {
        let half = to.width() * (target / current) / 2.0;
        Extent::new(center.x - half, to.min_y, center.x + half, to.max_y)
    } else if current > target {
        let half = to.height() * (current / target) / 2.0;
        Extent::new(to.min_x, center.y - half, to.max_x, center.y + half)
    } else {
        *to
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct LinearMap {
    from_min: Point,
    to: Extent,
    res_x: f64,
    res_y: f64,
    same_origin: bool,
}

impl LinearMap {
    fn new(from: &Extent, to: &Extent, options: ConvertOptions) -> Self {
        let to = if options.correct {
            correct_extent(to, from)
        } else {
            *to
        };
        Self {
            from_min: Point::new(from.min_x, from.min_y),
            to,
            res_x: to.width() / from.width(),
            res_y: to.height() / from.height(),
            same_origin: options.same_origin,
        }
    }

    fn apply(&self, pt: Point, precision: Precision) -> Point {
        let x = self.res_x * (pt.x - self.from_min.x) + self.to.min_x;
        let y = if self.same_origin {
            self.res_y * (pt.y - self.from_min.y) + self.to.min_y
        } else {
            self.to.max_y - self.res_y * (pt.y - self.from_min.y)
        };
        Point::new(precision.round(x), precision.round(y))
    }
}
