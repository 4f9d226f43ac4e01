// Copyright 2026 the Meridian Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport state: centre, resolution and zoom.

use alloc::vec::Vec;

use kurbo::{Point, Size};
use meridian_geom::Extent;
use serde::{Deserialize, Serialize};

use crate::error::ViewError;
use crate::ratio::Ratio;

/// Ratio between consecutive zoom levels when none is configured.
pub const DEFAULT_ZOOM_FACTOR: f64 = 2.0;

/// Number of zoom levels derived below the maximum resolution when the view
/// is built from an extent and a canvas size.
pub const DEFAULT_MAX_ZOOM: u32 = 28;

// Zoom values this close to an integer are reported as that integer, so a
// `set_zoom(n)` / `zoom()` round trip is exact.
const ZOOM_SNAP_TOLERANCE: f64 = 1e-9;

/// How zoom levels map onto resolutions.
///
/// Obtained from [`View::levels`]; only [`ViewBuilder`] creates one, which
/// guarantees a non‑empty, strictly decreasing ladder.
#[derive(Clone, Debug, PartialEq)]
pub enum LevelModel {
    /// An explicit resolution ladder, highest resolution (zoom 0) first.
    #[non_exhaustive]
    Discrete {
        /// Resolutions in world units per pixel.
        resolutions: Vec<f64>,
    },
    /// A geometric progression `max_resolution / zoom_factor^zoom`.
    #[non_exhaustive]
    Continuous {
        /// Resolution at zoom 0.
        max_resolution: f64,
        /// Resolution at the deepest zoom level.
        min_resolution: f64,
        /// Ratio between consecutive levels.
        zoom_factor: f64,
    },
}

impl LevelModel {
    /// Resolution at zoom 0.
    #[must_use]
    pub fn max_resolution(&self) -> f64 {
        match self {
            Self::Discrete { resolutions } => resolutions[0],
            Self::Continuous { max_resolution, .. } => *max_resolution,
        }
    }

    /// Finest resolution of the model.
    #[must_use]
    pub fn min_resolution(&self) -> f64 {
        match self {
            Self::Discrete { resolutions } => resolutions[resolutions.len() - 1],
            Self::Continuous { min_resolution, .. } => *min_resolution,
        }
    }

    /// The explicit ladder, if any.
    #[must_use]
    pub fn resolutions(&self) -> Option<&[f64]> {
        match self {
            Self::Discrete { resolutions } => Some(resolutions.as_slice()),
            Self::Continuous { .. } => None,
        }
    }

    /// Resolution for an integer zoom level; `zoom` is floored first.
    ///
    /// With a ladder the level index is clamped into the ladder.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "the level index is floored and clamped into the ladder"
    )]
    pub fn resolution_for_zoom(&self, zoom: f64) -> f64 {
        let zoom = libm::floor(zoom);
        match self {
            Self::Discrete { resolutions } => {
                let last = (resolutions.len() - 1) as f64;
                let index = zoom.max(0.0).min(last) as usize;
                resolutions[index]
            }
            Self::Continuous {
                max_resolution,
                zoom_factor,
                ..
            } => max_resolution / libm::pow(*zoom_factor, zoom),
        }
    }

    /// Possibly fractional zoom level for `resolution`.
    ///
    /// With a ladder, the nearest level at or above `resolution` is found and
    /// the fractional part is interpolated logarithmically towards the next
    /// level.
    #[must_use]
    pub fn zoom_for_resolution(&self, resolution: f64) -> f64 {
        let zoom = match self {
            Self::Discrete { resolutions } => {
                let nearest = linear_find_nearest(resolutions, resolution, 1);
                let base = resolutions[nearest];
                let factor = resolutions
                    .get(nearest + 1)
                    .map_or(DEFAULT_ZOOM_FACTOR, |next| base / next);
                nearest as f64 + libm::log(base / resolution) / libm::log(factor)
            }
            Self::Continuous {
                max_resolution,
                zoom_factor,
                ..
            } => libm::log(max_resolution / resolution) / libm::log(*zoom_factor),
        };
        let rounded = libm::round(zoom);
        if (zoom - rounded).abs() < ZOOM_SNAP_TOLERANCE {
            rounded
        } else {
            zoom
        }
    }
}

/// Index of the entry of a decreasing `arr` nearest to `target`.
///
/// - `direction > 0`: the smallest entry that is still `>= target`.
/// - `direction < 0`: the largest entry that is `<= target`.
/// - `direction == 0`: the closest entry, ties going to the smaller one.
///
/// Targets outside the ladder yield the first or last index.
#[must_use]
pub fn linear_find_nearest(arr: &[f64], target: f64, direction: i32) -> usize {
    let n = arr.len();
    if n == 0 || arr[0] <= target {
        return 0;
    }
    if target <= arr[n - 1] {
        return n - 1;
    }
    if direction > 0 {
        (1..n).find(|&i| arr[i] < target).map_or(n - 1, |i| i - 1)
    } else if direction < 0 {
        (1..n).find(|&i| arr[i] <= target).unwrap_or(n - 1)
    } else {
        for i in 1..n {
            if arr[i] == target {
                return i;
            }
            if arr[i] < target {
                return if arr[i - 1] - target < target - arr[i] {
                    i - 1
                } else {
                    i
                };
            }
        }
        n - 1
    }
}

/// Construction options for a [`View`].
///
/// Every field is optional so options can be collected in several steps (for
/// example defaults from a config file, then the canvas size once it is
/// known) and merged with [`ViewOptions::merge`]. A view can be built once
/// either `resolutions` or both `extent` and `canvas_size` are present.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    /// Initial centre; defaults to the centre of `extent`, else the origin.
    pub center: Option<[f64; 2]>,
    /// Initial resolution; defaults to the maximum resolution.
    pub resolution: Option<f64>,
    /// Initial zoom level, used when `resolution` is not given.
    pub zoom: Option<f64>,
    /// Explicit resolution ladder, highest first.
    pub resolutions: Option<Vec<f64>>,
    /// World extent to fit at zoom 0 when no ladder is given.
    pub extent: Option<Extent>,
    /// Canvas size in pixels used with `extent`.
    pub canvas_size: Option<[f64; 2]>,
    /// Ratio between zoom levels; defaults to [`DEFAULT_ZOOM_FACTOR`].
    pub zoom_factor: Option<f64>,
    /// Number of levels below zoom 0; defaults to [`DEFAULT_MAX_ZOOM`].
    pub max_zoom: Option<u32>,
    /// How far beyond the min/max resolution zooming may go; defaults to 1.
    pub resolution_scale_constrain: Option<f64>,
    /// Bounds for the centre.
    pub extent_constrain: Option<Extent>,
    /// Viewport size in pixels; defaults to `canvas_size`.
    pub viewport_size: Option<[f64; 2]>,
}

impl ViewOptions {
    /// Returns `self` with every field that is set in `later` replaced.
    #[must_use]
    pub fn merge(self, later: Self) -> Self {
        Self {
            center: later.center.or(self.center),
            resolution: later.resolution.or(self.resolution),
            zoom: later.zoom.or(self.zoom),
            resolutions: later.resolutions.or(self.resolutions),
            extent: later.extent.or(self.extent),
            canvas_size: later.canvas_size.or(self.canvas_size),
            zoom_factor: later.zoom_factor.or(self.zoom_factor),
            max_zoom: later.max_zoom.or(self.max_zoom),
            resolution_scale_constrain: later
                .resolution_scale_constrain
                .or(self.resolution_scale_constrain),
            extent_constrain: later.extent_constrain.or(self.extent_constrain),
            viewport_size: later.viewport_size.or(self.viewport_size),
        }
    }

    /// Returns `true` if enough is known to derive the resolution limits.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.resolutions.is_some() || (self.extent.is_some() && self.canvas_size.is_some())
    }
}

/// Builder for [`View`].
///
/// ```rust
/// use meridian_view::{ViewBuilder, ViewError, ViewOptions};
///
/// // Not enough information yet.
/// let builder = ViewBuilder::new().zoom(2.0);
/// assert_eq!(builder.build().unwrap_err(), ViewError::MissingResolution);
///
/// // Second phase: supply the ladder.
/// let view = builder
///     .initialize(ViewOptions {
///         resolutions: Some(vec![8.0, 4.0, 2.0, 1.0]),
///         ..ViewOptions::default()
///     })
///     .build()
///     .unwrap();
/// assert_eq!(view.resolution(), 2.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ViewBuilder {
    options: ViewOptions,
}

impl ViewBuilder {
    /// Creates a builder with no options set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from a set of options.
    #[must_use]
    pub fn from_options(options: ViewOptions) -> Self {
        Self { options }
    }

    /// Merges further options; fields set in `options` win.
    #[must_use]
    pub fn initialize(self, options: ViewOptions) -> Self {
        Self {
            options: self.options.merge(options),
        }
    }

    /// Returns the options collected so far.
    #[must_use]
    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    /// Sets the initial centre.
    #[must_use]
    pub fn center(mut self, center: Point) -> Self {
        self.options.center = Some([center.x, center.y]);
        self
    }

    /// Sets the initial resolution.
    #[must_use]
    pub fn resolution(mut self, resolution: f64) -> Self {
        self.options.resolution = Some(resolution);
        self
    }

    /// Sets the initial zoom level.
    #[must_use]
    pub fn zoom(mut self, zoom: f64) -> Self {
        self.options.zoom = Some(zoom);
        self
    }

    /// Uses an explicit resolution ladder, highest first.
    #[must_use]
    pub fn resolutions(mut self, resolutions: impl Into<Vec<f64>>) -> Self {
        self.options.resolutions = Some(resolutions.into());
        self
    }

    /// Sets the world extent fitted at zoom 0.
    #[must_use]
    pub fn extent(mut self, extent: Extent) -> Self {
        self.options.extent = Some(extent);
        self
    }

    /// Sets the canvas size used with [`ViewBuilder::extent`].
    #[must_use]
    pub fn canvas_size(mut self, size: Size) -> Self {
        self.options.canvas_size = Some([size.width, size.height]);
        self
    }

    /// Sets the ratio between zoom levels.
    #[must_use]
    pub fn zoom_factor(mut self, zoom_factor: f64) -> Self {
        self.options.zoom_factor = Some(zoom_factor);
        self
    }

    /// Sets the number of levels below zoom 0.
    #[must_use]
    pub fn max_zoom(mut self, max_zoom: u32) -> Self {
        self.options.max_zoom = Some(max_zoom);
        self
    }

    /// Sets how far beyond the resolution limits zooming may go.
    #[must_use]
    pub fn resolution_scale_constrain(mut self, factor: f64) -> Self {
        self.options.resolution_scale_constrain = Some(factor);
        self
    }

    /// Sets bounds for the centre.
    #[must_use]
    pub fn extent_constrain(mut self, extent: Extent) -> Self {
        self.options.extent_constrain = Some(extent);
        self
    }

    /// Sets the viewport size in pixels.
    #[must_use]
    pub fn viewport_size(mut self, size: Size) -> Self {
        self.options.viewport_size = Some([size.width, size.height]);
        self
    }

    /// Builds the view.
    ///
    /// # Errors
    ///
    /// - [`ViewError::MissingResolution`] if neither a ladder nor an
    ///   extent + canvas size was supplied.
    /// - [`ViewError::EmptyResolutions`] / [`ViewError::UnsortedResolutions`]
    ///   for an unusable ladder.
    /// - [`ViewError::InvalidZoomFactor`],
    ///   [`ViewError::InvalidScaleConstrain`] and
    ///   [`ViewError::DegenerateExtent`] for unusable numbers.
    pub fn build(&self) -> Result<View, ViewError> {
        let o = &self.options;

        let zoom_factor = o.zoom_factor.unwrap_or(DEFAULT_ZOOM_FACTOR);
        if !zoom_factor.is_finite() || zoom_factor <= 1.0 {
            return Err(ViewError::InvalidZoomFactor(zoom_factor));
        }
        let scale_constrain = o.resolution_scale_constrain.unwrap_or(1.0);
        if !scale_constrain.is_finite() || scale_constrain < 1.0 {
            return Err(ViewError::InvalidScaleConstrain(scale_constrain));
        }

        let levels = match (&o.resolutions, o.extent, o.canvas_size) {
            (Some(resolutions), _, _) => {
                if resolutions.is_empty() {
                    return Err(ViewError::EmptyResolutions);
                }
                let decreasing = resolutions.windows(2).all(|pair| pair[0] > pair[1]);
                let last = resolutions[resolutions.len() - 1];
                if !decreasing || !last.is_finite() || last <= 0.0 {
                    return Err(ViewError::UnsortedResolutions);
                }
                log::trace!("view uses a ladder of {} resolutions", resolutions.len());
                LevelModel::Discrete {
                    resolutions: resolutions.clone(),
                }
            }
            (None, Some(extent), Some([width, height])) => {
                let max_resolution = (extent.width().abs() / width).max(extent.height().abs() / height);
                if !max_resolution.is_finite() || max_resolution <= 0.0 {
                    return Err(ViewError::DegenerateExtent);
                }
                let max_zoom = o.max_zoom.unwrap_or(DEFAULT_MAX_ZOOM);
                let min_resolution = max_resolution / libm::pow(zoom_factor, f64::from(max_zoom));
                log::trace!(
                    "view derives resolutions {max_resolution}..{min_resolution} (factor {zoom_factor})"
                );
                LevelModel::Continuous {
                    max_resolution,
                    min_resolution,
                    zoom_factor,
                }
            }
            _ => return Err(ViewError::MissingResolution),
        };

        let center = o
            .center
            .map(|[x, y]| Point::new(x, y))
            .or_else(|| o.extent.map(|extent| extent.center()))
            .unwrap_or(Point::ORIGIN);
        let viewport_size = o
            .viewport_size
            .or(o.canvas_size)
            .map_or(Size::ZERO, |[w, h]| Size::new(w, h));

        let mut view = View {
            center,
            resolution: levels.max_resolution(),
            levels,
            zoom_factor,
            resolution_scale_constrain: scale_constrain,
            extent_constrain: o.extent_constrain,
            viewport_size,
        };
        if let Some(resolution) = o.resolution {
            view.set_resolution(resolution);
        } else if let Some(zoom) = o.zoom {
            view.set_zoom(zoom);
        }
        view.set_center(center);
        Ok(view)
    }
}

/// A snapshot of the view for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    /// Centre in world coordinates.
    pub center: Point,
    /// World units per pixel.
    pub resolution: f64,
    /// Possibly fractional zoom level.
    pub zoom: f64,
    /// Visible world extent.
    pub extent: Extent,
}

/// The live viewport: a centre and a resolution over a zoom ladder.
///
/// Input handlers mutate the view between frames through
/// [`set_center`](Self::set_center), [`set_resolution`](Self::set_resolution),
/// [`set_zoom`](Self::set_zoom), [`fill`](Self::fill) and
/// [`center_on`](Self::center_on). Renderers read [`extent`](Self::extent) /
/// [`state`](Self::state), which are recomputed on every call.
///
/// The resolution always stays within
/// `[min_resolution / resolution_scale_constrain / 2,
///   max_resolution * resolution_scale_constrain]`.
#[derive(Clone, Debug)]
pub struct View {
    center: Point,
    resolution: f64,
    levels: LevelModel,
    zoom_factor: f64,
    resolution_scale_constrain: f64,
    extent_constrain: Option<Extent>,
    viewport_size: Size,
}

impl View {
    /// Current centre in world coordinates.
    #[must_use]
    pub fn center(&self) -> Point {
        self.center
    }

    /// Current resolution in world units per pixel.
    #[must_use]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// The zoom level model.
    #[must_use]
    pub fn levels(&self) -> &LevelModel {
        &self.levels
    }

    /// The explicit resolution ladder, if any.
    #[must_use]
    pub fn resolutions(&self) -> Option<&[f64]> {
        self.levels.resolutions()
    }

    /// Resolution at zoom 0.
    #[must_use]
    pub fn max_resolution(&self) -> f64 {
        self.levels.max_resolution()
    }

    /// Finest resolution of the level model.
    #[must_use]
    pub fn min_resolution(&self) -> f64 {
        self.levels.min_resolution()
    }

    /// Configured zoom factor.
    #[must_use]
    pub fn zoom_factor(&self) -> f64 {
        self.zoom_factor
    }

    /// How far beyond the resolution limits zooming may go.
    #[must_use]
    pub fn resolution_scale_constrain(&self) -> f64 {
        self.resolution_scale_constrain
    }

    /// Bounds for the centre, if any.
    #[must_use]
    pub fn extent_constrain(&self) -> Option<Extent> {
        self.extent_constrain
    }

    /// Sets or clears the bounds for the centre and re‑applies them.
    pub fn set_extent_constrain(&mut self, extent: Option<Extent>) {
        self.extent_constrain = extent;
        self.set_center(self.center);
    }

    /// Viewport size in pixels.
    #[must_use]
    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    /// Sets the viewport size in pixels.
    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport_size = size;
    }

    /// Allowed resolution band `(lowest, highest)`.
    #[must_use]
    pub fn resolution_bounds(&self) -> (f64, f64) {
        let scale = self.resolution_scale_constrain;
        (
            self.min_resolution() / scale / 2.0,
            self.max_resolution() * scale,
        )
    }

    /// Clamps `resolution` into [`View::resolution_bounds`] without changing
    /// the view.
    #[must_use]
    pub fn constrain_resolution(&self, resolution: f64) -> f64 {
        let (lowest, highest) = self.resolution_bounds();
        resolution.max(lowest).min(highest)
    }

    /// Clamps `center` into the centre bounds without changing the view.
    #[must_use]
    pub fn constrain_center(&self, center: Point) -> Point {
        match self.extent_constrain {
            Some(bounds) => {
                let r = bounds.to_rect();
                Point::new(
                    center.x.max(r.x0).min(r.x1),
                    center.y.max(r.y0).min(r.y1),
                )
            }
            None => center,
        }
    }

    /// Sets the resolution, clamped into the allowed band.
    ///
    /// Returns `true` if `resolution` was accepted as is and `false` if it
    /// had to be clamped, which callers use to detect a zoom limit.
    pub fn set_resolution(&mut self, resolution: f64) -> bool {
        let constrained = self.constrain_resolution(resolution);
        self.resolution = constrained;
        let accepted = constrained == resolution;
        if !accepted {
            log::debug!("resolution {resolution} clamped to {constrained}");
        }
        accepted
    }

    /// Sets the centre, clamped into the centre bounds.
    ///
    /// Returns `true` if `center` was accepted as is.
    pub fn set_center(&mut self, center: Point) -> bool {
        let constrained = self.constrain_center(center);
        self.center = constrained;
        let accepted = constrained == center;
        if !accepted {
            log::debug!("center {center:?} clamped to {constrained:?}");
        }
        accepted
    }

    /// Current, possibly fractional, zoom level.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.levels.zoom_for_resolution(self.resolution)
    }

    /// Zoom level for `resolution`.
    #[must_use]
    pub fn zoom_for_resolution(&self, resolution: f64) -> f64 {
        self.levels.zoom_for_resolution(resolution)
    }

    /// Resolution for the integer zoom level `floor(zoom)`.
    #[must_use]
    pub fn resolution_for_zoom(&self, zoom: f64) -> f64 {
        self.levels.resolution_for_zoom(zoom)
    }

    /// Jumps to the integer zoom level `floor(zoom)`.
    ///
    /// Returns the result of the underlying [`View::set_resolution`].
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        self.set_resolution(self.resolution_for_zoom(zoom))
    }

    /// Multiplies the resolution by `factor`, keeping `anchor` (world
    /// coordinates) fixed on screen if given.
    ///
    /// Returns the result of the underlying [`View::set_resolution`].
    pub fn zoom_by(&mut self, factor: f64, anchor: Option<Point>) -> bool {
        let requested = self.resolution * factor;
        if let Some(anchor) = anchor {
            let center = self.calculate_center_zoom(self.constrain_resolution(requested), anchor);
            self.set_center(center);
        }
        self.set_resolution(requested)
    }

    /// Visible world extent, `center ± resolution * viewport_size / 2`.
    #[must_use]
    pub fn extent(&self) -> Extent {
        self.extent_for_size(self.viewport_size)
    }

    /// World extent visible through a viewport of `size` pixels.
    #[must_use]
    pub fn extent_for_size(&self, size: Size) -> Extent {
        let half_w = self.resolution * size.width / 2.0;
        let half_h = self.resolution * size.height / 2.0;
        Extent::new(
            self.center.x - half_w,
            self.center.y - half_h,
            self.center.x + half_w,
            self.center.y + half_h,
        )
    }

    /// Snapshot of centre, resolution, zoom and extent.
    #[must_use]
    pub fn state(&self) -> ViewState {
        ViewState {
            center: self.center,
            resolution: self.resolution,
            zoom: self.zoom(),
            extent: self.extent(),
        }
    }

    /// Ratio mapping the visible extent onto a `viewport_size` canvas
    /// anchored at the origin.
    #[must_use]
    pub fn ratio(&self) -> Ratio {
        Ratio::with_extents(
            self.extent(),
            Extent::new(0.0, 0.0, self.viewport_size.width, self.viewport_size.height),
        )
    }

    /// Resolution at which `extent` just fits into `size` pixels.
    #[must_use]
    pub fn resolution_for_extent(&self, extent: &Extent, size: Size) -> f64 {
        let extent_size = extent.size();
        (extent_size.width / size.width).max(extent_size.height / size.height)
    }

    /// Zooms to fit: the whole of `extent` becomes visible in `size` pixels,
    /// centred.
    pub fn fill(&mut self, extent: &Extent, size: Size) {
        let resolution = self.resolution_for_extent(extent, size);
        self.set_resolution(resolution);
        self.set_center(extent.center());
    }

    /// Centre that keeps `anchor` at the same pixel while the resolution
    /// changes from the current one to `resolution`.
    #[must_use]
    pub fn calculate_center_zoom(&self, resolution: f64, anchor: Point) -> Point {
        let current = self.resolution;
        Point::new(
            anchor.x - resolution * (anchor.x - self.center.x) / current,
            anchor.y - resolution * (anchor.y - self.center.y) / current,
        )
    }

    /// Centres the view so that world point `coord` lands on pixel `pixel`
    /// of a `size` viewport.
    ///
    /// Returns the result of the underlying [`View::set_center`].
    pub fn center_on(&mut self, coord: Point, size: Size, pixel: Point) -> bool {
        let center = Point::new(
            coord.x + (size.width / 2.0 - pixel.x) * self.resolution,
            coord.y + (pixel.y - size.height / 2.0) * self.resolution,
        );
        self.set_center(center)
    }
}
