// Copyright 2026 the Meridian Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Rounding applied to mapped coordinates.
///
/// World coordinates are usually kept at sub‑pixel precision while pixel
/// coordinates only need a couple of decimals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Precision {
    /// Round to 6 decimals.
    #[default]
    High,
    /// Round to 2 decimals.
    Low,
    /// Do not round at all.
    Exact,
}

impl Precision {
    /// Number of decimals kept, or `None` for [`Precision::Exact`].
    #[must_use]
    pub fn decimals(self) -> Option<u32> {
        match self {
            Self::High => Some(6),
            Self::Low => Some(2),
            Self::Exact => None,
        }
    }

    /// Rounds `value` according to this precision.
    #[must_use]
    pub fn round(self, value: f64) -> f64 {
        match self.decimals() {
            Some(decimals) => round_to(value, decimals),
            None => value,
        }
    }
}

/// Rounds `value` half away from zero to `decimals` decimal places.
///
/// Non‑finite values are returned unchanged.
#[must_use]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = libm::pow(10.0, f64::from(decimals));
    libm::round(value * factor) / factor
}
