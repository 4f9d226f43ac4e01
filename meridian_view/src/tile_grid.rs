// Copyright 2026 the Meridian Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tile addressing over a resolution ladder.
//!
//! Tile `(z, x, y)` covers
//! `origin + (x, y) * tile_size * resolution(z)` up to one tile further in
//! each direction. X and Y both grow with world coordinates.

use alloc::vec::Vec;

use kurbo::{Point, Size};
use meridian_geom::Extent;
use serde::{Deserialize, Serialize};

use crate::error::TileGridError;
use crate::view::linear_find_nearest;

// Tile coordinates this close to an integer are treated as lying on the tile
// boundary.
const BOUNDARY_TOLERANCE: f64 = 1e-9;

/// Address of one tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level.
    pub z: u32,
    /// Column.
    pub x: i64,
    /// Row.
    pub y: i64,
}

impl TileCoord {
    /// Creates a tile address.
    #[must_use]
    pub const fn new(z: u32, x: i64, y: i64) -> Self {
        Self { z, x, y }
    }
}

/// Inclusive range of tile columns and rows at one zoom level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRange {
    /// First column.
    pub min_x: i64,
    /// Last column.
    pub max_x: i64,
    /// First row.
    pub min_y: i64,
    /// Last row.
    pub max_y: i64,
}

impl TileRange {
    /// A range covering no tile.
    pub const EMPTY: Self = Self::new(0, -1, 0, -1);

    /// Creates a range; bounds are inclusive.
    #[must_use]
    pub const fn new(min_x: i64, max_x: i64, min_y: i64, max_y: i64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Returns `true` if `coord`'s column and row are in the range.
    #[must_use]
    pub fn contains(&self, coord: &TileCoord) -> bool {
        self.contains_xy(coord.x, coord.y)
    }

    /// Returns `true` if column `x` and row `y` are in the range.
    #[must_use]
    pub fn contains_xy(&self, x: i64, y: i64) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }

    /// Returns `true` if the range covers no tile.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> i64 {
        self.max_x
            .saturating_sub(self.min_x)
            .saturating_add(1)
            .max(0)
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> i64 {
        self.max_y
            .saturating_sub(self.min_y)
            .saturating_add(1)
            .max(0)
    }

    /// Tiles of the range at zoom `z`, row by row.
    pub fn iter(&self, z: u32) -> impl Iterator<Item = TileCoord> + use<> {
        let Self {
            min_x,
            max_x,
            min_y,
            max_y,
        } = *self;
        (min_y..=max_y).flat_map(move |y| (min_x..=max_x).map(move |x| TileCoord::new(z, x, y)))
    }
}

/// A resolution ladder cut into fixed‑size tiles.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    resolutions: Vec<f64>,
    tile_size: Size,
    origin: Point,
    extent: Option<Extent>,
}

impl TileGrid {
    /// Creates a grid from a strictly decreasing ladder of positive
    /// resolutions.
    ///
    /// # Errors
    ///
    /// [`TileGridError::EmptyResolutions`] or
    /// [`TileGridError::UnsortedResolutions`].
    pub fn new(
        resolutions: impl Into<Vec<f64>>,
        tile_size: Size,
        origin: Point,
    ) -> Result<Self, TileGridError> {
        let resolutions = resolutions.into();
        let Some(&last) = resolutions.last() else {
            return Err(TileGridError::EmptyResolutions);
        };
        let decreasing = resolutions.windows(2).all(|pair| pair[0] > pair[1]);
        if !decreasing || !last.is_finite() || last <= 0.0 {
            return Err(TileGridError::UnsortedResolutions);
        }
        Ok(Self {
            resolutions,
            tile_size,
            origin,
            extent: None,
        })
    }

    /// Grid whose zoom 0 tile covers `extent`, halving the resolution per
    /// level down to `max_zoom`. The origin is the extent's bottom‑left
    /// corner.
    ///
    /// # Errors
    ///
    /// [`TileGridError::DegenerateExtent`] if `extent` or `tile_size` does not
    /// yield a finite, positive zoom 0 resolution.
    pub fn for_extent(
        extent: &Extent,
        max_zoom: u32,
        tile_size: Size,
    ) -> Result<Self, TileGridError> {
        let size = extent.size();
        let base = (size.width / tile_size.width).max(size.height / tile_size.height);
        if !base.is_finite() || base <= 0.0 {
            return Err(TileGridError::DegenerateExtent);
        }
        let resolutions: Vec<f64> = (0..=max_zoom)
            .map(|z| base / libm::pow(2.0, f64::from(z)))
            .collect();
        let origin = extent.to_rect().origin();
        Ok(Self::new(resolutions, tile_size, origin)?.with_extent(*extent))
    }

    /// Restricts the grid to `extent`.
    #[must_use]
    pub fn with_extent(mut self, extent: Extent) -> Self {
        self.extent = Some(extent);
        self
    }

    /// The resolution ladder.
    #[must_use]
    pub fn resolutions(&self) -> &[f64] {
        &self.resolutions
    }

    /// Tile size in pixels.
    #[must_use]
    pub fn tile_size(&self) -> Size {
        self.tile_size
    }

    /// World coordinate of the corner of tile `(z, 0, 0)`.
    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// The extent the grid is restricted to, if any.
    #[must_use]
    pub fn extent(&self) -> Option<Extent> {
        self.extent
    }

    /// Coarsest zoom level; always 0.
    #[must_use]
    pub fn min_zoom(&self) -> u32 {
        0
    }

    /// Finest zoom level.
    #[must_use]
    pub fn max_zoom(&self) -> u32 {
        u32::try_from(self.resolutions.len() - 1).unwrap_or(u32::MAX)
    }

    /// Resolution of zoom level `z`.
    ///
    /// # Panics
    ///
    /// If `z` is outside `min_zoom()..=max_zoom()`.
    #[must_use]
    pub fn resolution(&self, z: u32) -> f64 {
        assert!(
            z <= self.max_zoom(),
            "zoom level {z} outside {}..={}",
            self.min_zoom(),
            self.max_zoom()
        );
        self.resolutions[z as usize]
    }

    /// Zoom level for `resolution`; see [`linear_find_nearest`] for the
    /// meaning of `direction`.
    #[must_use]
    pub fn z_for_resolution(&self, resolution: f64, direction: i32) -> u32 {
        let index = linear_find_nearest(&self.resolutions, resolution, direction);
        u32::try_from(index)
            .unwrap_or(u32::MAX)
            .clamp(self.min_zoom(), self.max_zoom())
    }

    /// World extent of a tile.
    #[must_use]
    pub fn tile_coord_extent(&self, coord: TileCoord) -> Extent {
        let resolution = self.resolution(coord.z);
        let span_x = self.tile_size.width * resolution;
        let span_y = self.tile_size.height * resolution;
        let min_x = self.origin.x + coord.x as f64 * span_x;
        let min_y = self.origin.y + coord.y as f64 * span_y;
        Extent::new(min_x, min_y, min_x + span_x, min_y + span_y)
    }

    /// World centre of a tile.
    #[must_use]
    pub fn tile_coord_center(&self, coord: TileCoord) -> Point {
        self.tile_coord_extent(coord).center()
    }

    /// World extent covered by `range` at zoom `z`.
    #[must_use]
    pub fn tile_range_extent(&self, z: u32, range: &TileRange) -> Extent {
        let first = self.tile_coord_extent(TileCoord::new(z, range.min_x, range.min_y));
        let last = self.tile_coord_extent(TileCoord::new(z, range.max_x, range.max_y));
        Extent::new(first.min_x, first.min_y, last.max_x, last.max_y)
    }

    /// Tile containing world point `(x, y)` at the zoom level nearest to
    /// `resolution`.
    ///
    /// A point exactly on a tile boundary belongs to the tile above it, or to
    /// the tile below it when `reverse` is set; ranges use the latter for
    /// their upper corner so they do not include tiles they only touch.
    #[must_use]
    pub fn tile_coord_for_xy_and_resolution(
        &self,
        x: f64,
        y: f64,
        resolution: f64,
        reverse: bool,
    ) -> TileCoord {
        let z = self.z_for_resolution(resolution, 0);
        self.tile_coord_for_xy_and_z(x, y, z, reverse)
    }

    /// Tile containing world point `(x, y)` at zoom `z`.
    #[must_use]
    pub fn tile_coord_for_xy_and_z(&self, x: f64, y: f64, z: u32, reverse: bool) -> TileCoord {
        let resolution = self.resolution(z);
        let tx = (x - self.origin.x) / (resolution * self.tile_size.width);
        let ty = (y - self.origin.y) / (resolution * self.tile_size.height);
        TileCoord::new(z, tile_index(tx, reverse), tile_index(ty, reverse))
    }

    /// Tiles intersecting `extent` at the zoom level nearest to `resolution`.
    #[must_use]
    pub fn tile_range_for_extent_and_resolution(
        &self,
        extent: &Extent,
        resolution: f64,
    ) -> TileRange {
        let z = self.z_for_resolution(resolution, 0);
        self.tile_range_for_extent_and_z(extent, z)
    }

    /// Tiles intersecting `extent` at zoom `z`.
    ///
    /// Empty or non‑finite extents give [`TileRange::EMPTY`].
    #[must_use]
    pub fn tile_range_for_extent_and_z(&self, extent: &Extent, z: u32) -> TileRange {
        if extent.is_empty() || !extent.is_finite() {
            return TileRange::EMPTY;
        }
        let r = extent.to_rect();
        let min = self.tile_coord_for_xy_and_z(r.x0, r.y0, z, false);
        let max = self.tile_coord_for_xy_and_z(r.x1, r.y1, z, true);
        TileRange::new(min.x, max.x, min.y, max.y)
    }

    /// Every tile of the grid's extent at zoom `z`, if the grid has one.
    #[must_use]
    pub fn full_tile_range(&self, z: u32) -> Option<TileRange> {
        self.extent
            .map(|extent| self.tile_range_for_extent_and_z(&extent, z))
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "tile indices of finite coordinates fit in i64"
)]
fn tile_index(t: f64, reverse: bool) -> i64 {
    let rounded = libm::round(t);
    let t = if (t - rounded).abs() < BOUNDARY_TOLERANCE {
        rounded
    } else {
        t
    };
    if reverse {
        (libm::ceil(t) as i64).saturating_sub(1)
    } else {
        libm::floor(t) as i64
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kurbo::{Point, Size};
    use meridian_geom::Extent;

    use super::{TileCoord, TileGrid, TileRange};
    use crate::error::TileGridError;

    fn grid() -> TileGrid {
        TileGrid::new([2.0, 1.0], Size::new(256.0, 256.0), Point::ORIGIN).unwrap()
    }

    #[test]
    fn range_for_extent_excludes_touching_tiles() {
        let grid = grid();
        let range =
            grid.tile_range_for_extent_and_resolution(&Extent::new(0.0, 0.0, 512.0, 512.0), 1.0);
        assert_eq!(range, TileRange::new(0, 1, 0, 1));
        assert_eq!(range.width(), 2);
        assert_eq!(range.height(), 2);

        let range =
            grid.tile_range_for_extent_and_resolution(&Extent::new(0.0, 0.0, 512.0, 512.0), 2.0);
        assert_eq!(range, TileRange::new(0, 0, 0, 0));
    }

    #[test]
    fn range_for_extent_off_boundaries() {
        let grid = grid();
        let range =
            grid.tile_range_for_extent_and_z(&Extent::new(-10.0, 100.0, 300.0, 600.0), 1);
        assert_eq!(range, TileRange::new(-1, 1, 0, 2));
        assert!(range.contains(&TileCoord::new(1, -1, 2)));
        assert!(!range.contains(&TileCoord::new(1, 2, 0)));
    }

    #[test]
    fn coord_for_xy_reverse_policy() {
        let grid = grid();
        assert_eq!(
            grid.tile_coord_for_xy_and_resolution(256.0, 256.0, 1.0, false),
            TileCoord::new(1, 1, 1)
        );
        assert_eq!(
            grid.tile_coord_for_xy_and_resolution(256.0, 256.0, 1.0, true),
            TileCoord::new(1, 0, 0)
        );
        assert_eq!(
            grid.tile_coord_for_xy_and_resolution(300.0, -1.0, 1.0, true),
            TileCoord::new(1, 1, -1)
        );
    }

    #[test]
    fn tile_extent_and_center() {
        let grid = grid();
        let coord = TileCoord::new(0, 1, -1);
        assert_eq!(
            grid.tile_coord_extent(coord),
            Extent::new(512.0, -512.0, 1024.0, 0.0)
        );
        assert_eq!(grid.tile_coord_center(coord), Point::new(768.0, -256.0));
        assert_eq!(
            grid.tile_range_extent(1, &TileRange::new(0, 1, 0, 1)),
            Extent::new(0.0, 0.0, 512.0, 512.0)
        );
    }

    #[test]
    fn z_for_resolution_clamps() {
        let grid = TileGrid::new([8.0, 4.0, 2.0, 1.0], Size::new(1.0, 1.0), Point::ORIGIN).unwrap();
        assert_eq!(grid.max_zoom(), 3);
        assert_eq!(grid.z_for_resolution(100.0, 0), 0);
        assert_eq!(grid.z_for_resolution(0.01, 0), 3);
        assert_eq!(grid.z_for_resolution(3.0, 1), 1);
        assert_eq!(grid.z_for_resolution(3.0, -1), 2);
    }

    #[test]
    fn for_extent_halves_resolutions() {
        let extent = Extent::new(100.0, 50.0, 1124.0, 562.0);
        let grid = TileGrid::for_extent(&extent, 2, Size::new(256.0, 256.0)).unwrap();
        assert_eq!(grid.resolutions(), &[4.0, 2.0, 1.0]);
        assert_eq!(grid.origin(), Point::new(100.0, 50.0));
        assert_eq!(grid.extent(), Some(extent));
        assert_eq!(grid.full_tile_range(0), Some(TileRange::new(0, 0, 0, 0)));
        assert_eq!(grid.full_tile_range(2), Some(TileRange::new(0, 3, 0, 1)));
    }

    #[test]
    fn rejects_bad_ladders() {
        let size = Size::new(256.0, 256.0);
        assert_eq!(
            TileGrid::new(Vec::<f64>::new(), size, Point::ORIGIN),
            Err(TileGridError::EmptyResolutions)
        );
        assert_eq!(
            TileGrid::new([1.0, 1.0], size, Point::ORIGIN),
            Err(TileGridError::UnsortedResolutions)
        );
        assert_eq!(
            TileGrid::for_extent(&Extent::new(0.0, 0.0, 0.0, 0.0), 3, size),
            Err(TileGridError::DegenerateExtent)
        );
        assert_eq!(
            TileGrid::for_extent(&Extent::new(0.0, 0.0, 10.0, 10.0), 3, Size::ZERO),
            Err(TileGridError::DegenerateExtent)
        );
        assert_eq!(
            TileGrid::for_extent(&Extent::EMPTY, 3, size),
            Err(TileGridError::DegenerateExtent)
        );
    }

    #[test]
    #[should_panic(expected = "zoom level 2 outside 0..=1")]
    fn resolution_out_of_range_panics() {
        let _ = grid().resolution(2);
    }

    #[test]
    fn empty_and_non_finite_extents_give_empty_ranges() {
        let grid = grid();
        for extent in [
            Extent::EMPTY,
            Extent::new(0.0, f64::NAN, 10.0, 10.0),
            Extent::new(0.0, 0.0, f64::INFINITY, 10.0),
        ] {
            let range = grid.tile_range_for_extent_and_z(&extent, 1);
            assert_eq!(range, TileRange::EMPTY);
            assert!(range.is_empty());
            assert_eq!(range.width(), 0);
            assert_eq!(range.height(), 0);
            assert_eq!(range.iter(1).count(), 0);
        }
    }

    #[test]
    fn far_away_extents_saturate() {
        let grid = grid();
        let range = grid.tile_range_for_extent_and_z(&Extent::new(-1e300, -1e300, -1e300, -1e300), 1);
        assert_eq!(range.min_x, i64::MIN);
        assert_eq!(range.max_x, i64::MIN);
        assert_eq!(range.width(), 1);

        let wide = TileRange::new(i64::MIN, i64::MAX, i64::MAX, i64::MIN);
        assert_eq!(wide.width(), i64::MAX);
        assert_eq!(wide.height(), 0);
        assert!(wide.is_empty());
    }

    #[test]
    fn range_iteration() {
        let range = TileRange::new(0, 1, 5, 6);
        let tiles: Vec<_> = range.iter(3).collect();
        assert_eq!(
            tiles,
            [
                TileCoord::new(3, 0, 5),
                TileCoord::new(3, 1, 5),
                TileCoord::new(3, 0, 6),
                TileCoord::new(3, 1, 6),
            ]
        );
        assert!(TileRange::new(1, 0, 0, 0).is_empty());
        assert_eq!(TileRange::new(1, 0, 0, 0).iter(0).count(), 0);
    }
}
