// Copyright 2026 the Meridian Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// Error returned by [`Ratio`](crate::Ratio) conversions whose extents were
/// never set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RatioError {
    /// No world extent has been set.
    MissingWorldExtent,
    /// No canvas extent has been set.
    MissingCanvasExtent,
}

impl fmt::Display for RatioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingWorldExtent => f.write_str("ratio has no world extent"),
            Self::MissingCanvasExtent => f.write_str("ratio has no canvas extent"),
        }
    }
}

impl core::error::Error for RatioError {}

/// Error returned by [`ViewBuilder::build`](crate::ViewBuilder::build).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewError {
    /// Neither `resolutions` nor `extent` + `canvas_size` were provided.
    MissingResolution,
    /// An explicit resolution ladder was empty.
    EmptyResolutions,
    /// The resolution ladder is not strictly decreasing.
    UnsortedResolutions,
    /// The zoom factor must be finite and greater than one.
    InvalidZoomFactor(f64),
    /// The resolution scale constraint must be finite and at least one.
    InvalidScaleConstrain(f64),
    /// The extent or canvas size yields no usable maximum resolution.
    DegenerateExtent,
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingResolution => f.write_str(
                "view needs either a resolution ladder or an extent and a canvas size",
            ),
            Self::EmptyResolutions => f.write_str("resolution ladder is empty"),
            Self::UnsortedResolutions => {
                f.write_str("resolution ladder must be strictly decreasing")
            }
            Self::InvalidZoomFactor(factor) => {
                write!(f, "zoom factor {factor} must be finite and greater than 1")
            }
            Self::InvalidScaleConstrain(factor) => write!(
                f,
                "resolution scale constraint {factor} must be finite and at least 1"
            ),
            Self::DegenerateExtent => {
                f.write_str("extent and canvas size do not define a positive resolution")
            }
        }
    }
}

impl core::error::Error for ViewError {}

/// Error returned when constructing a [`TileGrid`](crate::TileGrid).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileGridError {
    /// The resolution ladder was empty.
    EmptyResolutions,
    /// The resolution ladder is not strictly decreasing.
    UnsortedResolutions,
    /// The extent or tile size yields no usable zoom 0 resolution.
    DegenerateExtent,
}

impl fmt::Display for TileGridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyResolutions => f.write_str("tile grid resolution ladder is empty"),
            Self::UnsortedResolutions => {
                f.write_str("tile grid resolutions must be strictly decreasing")
            }
            Self::DegenerateExtent => {
                f.write_str("extent and tile size do not define a positive resolution")
            }
        }
    }
}

impl core::error::Error for TileGridError {}
