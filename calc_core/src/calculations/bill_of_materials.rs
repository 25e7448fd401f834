//! # Bill of Materials
//!
//! Approximate component counts for a validated formwork bay. Primary beams
//! are taken at 2 m centres in each direction and props on a 1.5 m grid.
//! Only a [`FormworkDesign`] can be estimated, so a failed validation never
//! reaches this module.

use serde::{Deserialize, Serialize};

use super::ceil_count;
use super::formwork_design::FormworkDesign;
use crate::units::Meters;

/// Primary beam spacing (m)
pub const BEAM_SPACING_M: f64 = 2.0;

/// Prop grid spacing (m)
pub const SUPPORT_GRID_M: f64 = 1.5;

/// Component counts for one bay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BillOfMaterials {
    /// span × width (m²)
    pub decking_area_m2: f64,

    /// Joists from the validated layout
    pub joist_count: u32,

    /// ceil(width / 2)
    pub beams_across_width: u32,

    /// ceil(span / 2)
    pub beams_along_span: u32,

    /// ceil(width / 1.5) × ceil(span / 1.5)
    pub support_count: u32,
}

impl BillOfMaterials {
    /// Total primary beams
    pub fn total_beams(&self) -> u32 {
        self.beams_across_width + self.beams_along_span
    }
}

/// Estimate component counts from a validated design
///
/// # Example
/// ```
/// use calc_core::calculations::{estimate_bom, validate_formwork, FormworkInput};
/// use calc_core::systems::FormworkSystem;
///
/// let design = validate_formwork(&FormworkInput {
///     system: FormworkSystem::SystemC,
///     support: None,
///     span_m: 3.0,
///     width_m: 6.0,
///     design_load_kpa: 17.355,
///     concrete_thickness_m: 0.2,
/// })
/// .unwrap();
///
/// let bom = estimate_bom(&design);
/// assert_eq!(bom.decking_area_m2, 18.0);
/// assert_eq!(bom.support_count, 8);
/// ```
pub fn estimate_bom(design: &FormworkDesign) -> BillOfMaterials {
    let span = Meters(design.span_m);
    let width = Meters(design.width_m);

    BillOfMaterials {
        decking_area_m2: (span * width).value(),
        joist_count: design.joist_count,
        beams_across_width: ceil_count(design.width_m / BEAM_SPACING_M),
        beams_along_span: ceil_count(design.span_m / BEAM_SPACING_M),
        support_count: ceil_count(design.width_m / SUPPORT_GRID_M)
            .saturating_mul(ceil_count(design.span_m / SUPPORT_GRID_M)),
    }
}
