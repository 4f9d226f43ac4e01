// Copyright 2026 the Meridian Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Meridian View: viewport state and world↔pixel mapping.
//!
//! This crate owns the one piece of mutable state in the Meridian transform
//! engine, the [`View`], and the stateless helpers that turn it into pixel
//! coordinates:
//! - [`View`]: centre + resolution (world units per pixel), a zoom ladder,
//!   and the pan/zoom/fit operations input handlers call between frames.
//! - [`Ratio`]: maps between a world extent and a canvas extent with aspect
//!   correction and the Y flip between Cartesian world space and pixel space.
//! - [`TileGrid`]: discretizes the resolution ladder into addressable tiles
//!   for level‑of‑detail consumers.
//!
//! ## Frame example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use meridian_geom::{Coords, Extent};
//! use meridian_view::ViewBuilder;
//!
//! // 1000×500 world units shown on a 500×500 canvas.
//! let mut view = ViewBuilder::new()
//!     .extent(Extent::new(0.0, 0.0, 1000.0, 500.0))
//!     .canvas_size(Size::new(500.0, 500.0))
//!     .build()
//!     .unwrap();
//! assert_eq!(view.max_resolution(), 2.0);
//!
//! // Each frame: snapshot the view and map authored geometry to pixels.
//! let ratio = view.ratio();
//! let px = ratio.to_pix(&Coords::Point(Point::new(500.0, 250.0))).unwrap();
//! assert_eq!(px, Coords::Point(Point::new(250.0, 250.0)));
//!
//! // Between frames: zoom in one level around the centre.
//! let zoom = view.zoom();
//! view.set_zoom(zoom + 1.0);
//! assert_eq!(view.resolution(), 1.0);
//! ```
//!
//! ## Design notes
//!
//! - [`View::extent`] and [`View::state`] are recomputed on every call, so all
//!   consumers of one frame see the same snapshot as long as the view is only
//!   mutated between frames.
//! - A `View` can only be obtained from [`ViewBuilder::build`], which refuses
//!   to produce a view without enough information to derive its resolution
//!   limits.
//! - World space is Cartesian (Y up) by default; pixel space is Y down.
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod error;
mod ratio;
mod tile_grid;
mod view;

pub use error::{RatioError, TileGridError, ViewError};
pub use ratio::{ConvertOptions, Ratio, ToWorld, correct_extent};
pub use tile_grid::{TileCoord, TileGrid, TileRange};
pub use view::{
    DEFAULT_MAX_ZOOM, DEFAULT_ZOOM_FACTOR, LevelModel, View, ViewBuilder, ViewOptions, ViewState,
    linear_find_nearest,
};
