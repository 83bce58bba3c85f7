//! # Unit Types
//!
//! Lightweight newtype wrappers for the two ways rates show up in this
//! crate: as a percentage typed by a user (`2.0` meaning 2 %) and as the
//! fraction the formulas consume (`0.02`). Keeping them apart stops a
//! percentage from leaking into a growth factor unconverted.
//!
//! Physical quantities (kN, mm, MPa) stay plain `f64` fields with the unit
//! in the field name, e.g. `thickness_mm`.
//!
//! ## Example
//!
//! ```rust
//! use pave_core::units::{Fraction, Percent};
//!
//! let growth = Percent(2.0);
//! let fraction: Fraction = growth.into();
//! assert!((fraction.0 - 0.02).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{PaveError, PaveResult};

/// A rate expressed in percent (0-100 for user-facing fields)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(pub f64);

/// A rate expressed as a fraction (0.03 for 3 %)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fraction(pub f64);

impl From<Percent> for Fraction {
    fn from(p: Percent) -> Self {
        Fraction(p.0 / 100.0)
    }
}

impl From<Fraction> for Percent {
    fn from(f: Fraction) -> Self {
        Percent(f.0 * 100.0)
    }
}

impl Percent {
    /// Convert a form percentage to a fraction, rejecting values outside 0-100.
    ///
    /// `field` is used in the error so the caller can point at the input.
    pub fn to_fraction_checked(self, field: &str) -> PaveResult<Fraction> {
        if !self.0.is_finite() || !(0.0..=100.0).contains(&self.0) {
            return Err(PaveError::invalid_input(
                field,
                self.0.to_string(),
                "Percentage must be between 0 and 100",
            ));
        }
        Ok(self.into())
    }
}

impl std::fmt::Display for Percent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}
