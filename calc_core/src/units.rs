//! # Unit Types
//!
//! Type-safe wrappers for the metric units the engine works in. They are
//! plain f64 newtypes that serialize as bare numbers.
//!
//! Inputs are expected in these units already; there is no conversion
//! between unit systems, only between scales of the same quantity:
//! - Length: metres (m), millimetres (mm)
//! - Pressure: kilopascals (kPa = kN/m²)
//! - Line load: kilonewtons per metre (kN/m)
//! - Unit weight: kilonewtons per cubic metre (kN/m³)
//! - Area: square metres (m²)
//!
//! ## Example
//!
//! ```rust
//! use calc_core::units::{Meters, Millimeters, KnPerM3, Kilopascals};
//!
//! let span = Meters(1.8);
//! let span_mm: Millimeters = span.into();
//! assert!((span_mm.0 - 1800.0).abs() < 1e-9);
//!
//! // Self-weight pressure of a 200 mm slab
//! let pressure: Kilopascals = KnPerM3(24.5).over_depth(Meters(0.2));
//! assert!((pressure.0 - 4.9).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

// ============================================================================
// Load Units
// ============================================================================

/// Area load in kilopascals (kN/m²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilopascals(pub f64);

/// Line load in kilonewtons per metre
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnPerM(pub f64);

/// Unit weight in kilonewtons per cubic metre
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnPerM3(pub f64);

impl KnPerM3 {
    /// Pressure exerted by a layer of this material of the given depth
    pub fn over_depth(self, depth: Meters) -> Kilopascals {
        Kilopascals(self.0 * depth.0)
    }
}

impl KnPerM {
    /// Equivalent area load when lines of this load repeat at `spacing`
    pub fn spread_over(self, spacing: Meters) -> Kilopascals {
        Kilopascals(self.0 / spacing.0)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Area in square metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqMeters(pub f64);

impl Mul for Meters {
    type Output = SqMeters;
    fn mul(self, rhs: Self) -> Self::Output {
        SqMeters(self.0 * rhs.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Millimeters);
impl_arithmetic!(Kilopascals);
impl_arithmetic!(KnPerM);
impl_arithmetic!(KnPerM3);
impl_arithmetic!(SqMeters);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters_to_millimeters() {
        let m = Meters(2.4);
        let mm: Millimeters = m.into();
        assert!((mm.0 - 2400.0).abs() < 1e-9);
    }

    #[test]
    fn test_unit_weight_over_depth() {
        let p = KnPerM3(24.0).over_depth(Meters(0.25));
        assert!((p.0 - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_line_load_spread() {
        let p = KnPerM(0.1).spread_over(Meters(0.4));
        assert!((p.0 - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_area() {
        let a = Meters(3.0) * Meters(4.5);
        assert!((a.0 - 13.5).abs() < 1e-12);
    }

    #[test]
    fn test_arithmetic() {
        let a = Kilopascals(10.0);
        let b = Kilopascals(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_serialization() {
        let m = Meters(1.5);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1.5");

        let roundtrip: Meters = serde_json::from_str(&json).unwrap();
        assert_eq!(m, roundtrip);
    }
}
