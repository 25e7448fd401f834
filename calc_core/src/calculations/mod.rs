//! # Formwork Calculations
//!
//! Checks that consume a governing design load. Each calculation follows the
//! pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - a result record (JSON-serializable)
//! - a pure function returning `Result<_, CalcError>`
//!
//! ## Available Calculations
//!
//! - [`formwork_design`] - System capacity and joist spacing validation
//! - [`bill_of_materials`] - Approximate component counts for a validated design

pub mod bill_of_materials;
pub mod formwork_design;

pub use bill_of_materials::{estimate_bom, BillOfMaterials};
pub use formwork_design::{validate_formwork, FormworkDesign, FormworkInput, UTILIZATION_CEILING};

/// Tolerance for quotients that land a hair above a whole number
const COUNT_EPSILON: f64 = 1e-9;

/// Round a positive quantity up to a whole count
///
/// 6.0 / 0.4 evaluates to 15.000000000000002 in floating point; the
/// tolerance keeps that at 15.
pub(crate) fn ceil_count(quantity: f64) -> u32 {
    (quantity - COUNT_EPSILON).ceil().max(0.0) as u32
}
