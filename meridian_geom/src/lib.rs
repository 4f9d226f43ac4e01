// Copyright 2026 the Meridian Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Meridian Geom: affine transforms, extents and coordinate trees.
//!
//! This crate holds the leaf geometry types of the Meridian drawing engine.
//! Geometry is authored in a resolution‑independent *world* space; everything
//! here is about moving coordinates between spaces without owning any view
//! state:
//! - [`Transform`]: a 2×3 affine matrix with compose/invert/apply.
//! - [`Extent`]: axis‑aligned bounding boxes, including the Y‑inverted world
//!   convention.
//! - [`Coords`]: a tagged tree of points (point, path, nested parts) and the
//!   batch mapper [`transform_2d`].
//!
//! Viewport state (resolution, zoom, world↔pixel ratios) lives in
//! `meridian_view`, which is built on top of this crate.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Point;
//! use meridian_geom::{Coords, Precision, Transform, transform_2d};
//!
//! // Place a symbol: move it to (100, 50), double its size and turn it 90°.
//! let placement = Transform::IDENTITY
//!     .translate(100.0, 50.0)
//!     .scale(2.0, 2.0)
//!     .rotate(90.0);
//!
//! let ring = Coords::Path(vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(1.0, 0.0),
//!     Point::new(1.0, 1.0),
//! ]);
//! let placed = transform_2d(&placement, &ring, Precision::High).unwrap();
//! assert_eq!(placed.point_count(), 3);
//! ```
//!
//! ## Design notes
//!
//! - Transforms are immutable `Copy` values. Every compose operation returns
//!   a new matrix; a previously used transform can never be changed behind a
//!   caller's back.
//! - Coordinate trees are tagged, so recursion never has to guess whether an
//!   array is a point or a list of points.
//! - Angles are expressed in degrees throughout.
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod coordinate;
mod extent;
mod precision;
mod transform;

pub use coordinate::{Coords, PointMapper, transform_2d};
pub use extent::{Extent, is_none_or_empty};
pub use precision::{Precision, round_to};
pub use transform::{Transform, TransformError, TransformOp};
