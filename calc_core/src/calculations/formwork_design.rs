//! # Formwork Capacity Validation
//!
//! Checks a formwork system against a governing design load and derives the
//! joist layout. Checks run in order and stop at the first failure:
//!
//! 1. Span within the resolved `[min, max]` bounds (inclusive)
//! 2. Slab thickness within the resolved capacity, when one applies
//! 3. Design load within the resolved ultimate capacity
//! 4. Largest standard spacing with `design_load ≤ 0.9 × capacity`
//!
//! The joist count, actual spacing, self-weight and deflection figures are
//! then computed from the chosen spacing.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::formwork_design::{validate_formwork, FormworkInput};
//! use calc_core::systems::FormworkSystem;
//!
//! let input = FormworkInput {
//!     system: FormworkSystem::SystemC,
//!     support: None,
//!     span_m: 3.0,
//!     width_m: 6.0,
//!     design_load_kpa: 17.355,
//!     concrete_thickness_m: 0.2,
//! };
//!
//! let design = validate_formwork(&input).unwrap();
//! assert_eq!(design.standard_spacing_m, 1.0);
//! assert_eq!(design.joist_count, 7);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::ceil_count;
use crate::errors::{CalcError, CalcResult, Constraint};
use crate::systems::{FormworkSystem, SupportConfiguration};
use crate::units::{Kilopascals, KnPerM, Meters, Millimeters};

/// Highest admissible ratio of design load to spacing capacity
pub const UTILIZATION_CEILING: f64 = 0.9;

/// Span divisor for the estimated deflection heuristic
pub const DEFLECTION_ESTIMATE_DIVISOR: f64 = 400.0;

/// Estimated deflection never exceeds this share of the allowed deflection
pub const DEFLECTION_ESTIMATE_SHARE: f64 = 0.8;

/// Largest bay span or width accepted as input (m)
pub const MAX_BAY_DIMENSION_M: f64 = 100.0;

/// Input parameters for a formwork validation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "system": "SystemA",
///   "support": "TripleMidSupport",
///   "span_m": 2.4,
///   "width_m": 4.0,
///   "design_load_kpa": 17.355,
///   "concrete_thickness_m": 0.2
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormworkInput {
    /// Formwork system to check
    pub system: FormworkSystem,

    /// Mid-support arrangement (required for System A)
    #[serde(default)]
    pub support: Option<SupportConfiguration>,

    /// Bay span (m)
    pub span_m: f64,

    /// Bay width across the joists (m)
    pub width_m: f64,

    /// Governing factored design load (kPa)
    pub design_load_kpa: f64,

    /// Slab thickness (m)
    pub concrete_thickness_m: f64,
}

impl FormworkInput {
    /// Validate input parameters
    pub fn validate(&self) -> CalcResult<()> {
        if !self.span_m.is_finite() || self.span_m <= 0.0 {
            return Err(CalcError::invalid_input(
                "span_m",
                self.span_m.to_string(),
                "Span must be a positive number",
            ));
        }
        if !self.width_m.is_finite() || self.width_m <= 0.0 {
            return Err(CalcError::invalid_input(
                "width_m",
                self.width_m.to_string(),
                "Width must be positive",
            ));
        }
        for (field, value) in [("span_m", self.span_m), ("width_m", self.width_m)] {
            if value > MAX_BAY_DIMENSION_M {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    format!("Bay dimensions above {} m are not supported", MAX_BAY_DIMENSION_M),
                ));
            }
        }
        if !self.design_load_kpa.is_finite() || self.design_load_kpa < 0.0 {
            return Err(CalcError::invalid_input(
                "design_load_kpa",
                self.design_load_kpa.to_string(),
                "Design load cannot be negative",
            ));
        }
        if !self.concrete_thickness_m.is_finite() || self.concrete_thickness_m < 0.0 {
            return Err(CalcError::invalid_input(
                "concrete_thickness_m",
                self.concrete_thickness_m.to_string(),
                "Thickness cannot be negative",
            ));
        }
        Ok(())
    }
}

/// A formwork layout that passed every check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormworkDesign {
    // === Echo ===
    pub system: FormworkSystem,

    /// Support arrangement that applied, `None` for flat systems
    pub support: Option<SupportConfiguration>,

    /// Build material label
    pub material: String,

    pub span_m: f64,
    pub width_m: f64,
    pub design_load_kpa: f64,

    // === Resolved limits ===
    pub min_span_m: f64,
    pub max_span_m: f64,
    pub ultimate_capacity_kpa: f64,
    pub serviceability_capacity_kpa: f64,

    // === Joist layout ===
    /// Chosen standard joist spacing (m)
    pub standard_spacing_m: f64,

    /// Capacity at the chosen spacing, capped by the ultimate capacity (kPa)
    pub spacing_capacity_kpa: f64,

    /// design_load / spacing_capacity
    pub utilization: f64,

    pub joist_count: u32,

    /// Evenly distributed spacing across the width (m)
    pub actual_spacing_m: f64,

    // === Self-weight and deflection ===
    /// Decking plus joists spread at the actual spacing (kPa)
    pub total_self_weight_kpa: f64,

    /// Deflection limit N in span / N
    pub deflection_limit_ratio: f64,

    pub allowed_deflection_mm: f64,

    /// Heuristic estimate, not an analysis result
    pub estimated_deflection_mm: f64,
}

impl FormworkDesign {
    /// Whether the estimated deflection stays within the allowance
    pub fn deflection_ok(&self) -> bool {
        self.estimated_deflection_mm <= self.allowed_deflection_mm
    }
}

/// Validate a formwork system against a design load.
///
/// # Returns
///
/// * `Ok(FormworkDesign)` - The joist layout for the largest admissible spacing
/// * `Err(CalcError)` - `InvalidInput`/`MissingField` for bad inputs, or
///   `SpanOutOfRange`, `CapacityExceeded` or `NoAdmissibleSpacing` for the
///   first violated design rule
pub fn validate_formwork(input: &FormworkInput) -> CalcResult<FormworkDesign> {
    input.validate()?;

    let spec = input.system.spec();
    let limits = input.system.resolve(input.support)?;
    let system = input.system.display_name();

    if input.span_m < limits.min_span_m || input.span_m > limits.max_span_m {
        return Err(CalcError::span_out_of_range(
            system,
            input.span_m,
            limits.min_span_m,
            limits.max_span_m,
        ));
    }

    if let Some(thickness_capacity) = limits.concrete_thickness_capacity_m {
        if input.concrete_thickness_m > thickness_capacity {
            return Err(CalcError::capacity_exceeded(
                system,
                Constraint::ConcreteThickness,
                thickness_capacity,
                input.concrete_thickness_m,
            ));
        }
    }

    if input.design_load_kpa > limits.ultimate_capacity_kpa {
        return Err(CalcError::capacity_exceeded(
            system,
            Constraint::VerticalCapacity,
            limits.ultimate_capacity_kpa,
            input.design_load_kpa,
        ));
    }

    // Widest first; rated capacity never credited above the ultimate
    let (spacing, spacing_capacity) = spec
        .spacings
        .iter()
        .rev()
        .map(|rating| (rating.spacing_m, rating.capacity_kpa.min(limits.ultimate_capacity_kpa)))
        .find(|&(_, capacity)| input.design_load_kpa <= capacity * UTILIZATION_CEILING)
        .ok_or_else(|| CalcError::no_admissible_spacing(system, input.design_load_kpa, UTILIZATION_CEILING))?;

    debug!(system, spacing_m = spacing, capacity_kpa = spacing_capacity, "standard spacing selected");

    let joist_count = ceil_count(input.width_m / spacing).max(1) + 1;
    let actual_spacing = Meters(input.width_m / f64::from(joist_count - 1));

    let total_self_weight =
        Kilopascals(spec.decking_weight_kpa) + KnPerM(spec.joist_weight_kn_m).spread_over(actual_spacing);

    let span = Meters(input.span_m);
    let allowed = span / spec.deflection_limit_ratio;
    let estimated_m = (input.span_m / DEFLECTION_ESTIMATE_DIVISOR).min(DEFLECTION_ESTIMATE_SHARE * allowed.value());
    let allowed_deflection = Millimeters::from(allowed);
    let estimated_deflection = Millimeters::from(Meters(estimated_m));

    let utilization = if spacing_capacity > 0.0 {
        input.design_load_kpa / spacing_capacity
    } else {
        0.0
    };

    info!(
        system,
        span_m = input.span_m,
        width_m = input.width_m,
        joist_count,
        utilization,
        "formwork design accepted"
    );

    Ok(FormworkDesign {
        system: input.system,
        support: limits.support,
        material: spec.material.to_string(),
        span_m: input.span_m,
        width_m: input.width_m,
        design_load_kpa: input.design_load_kpa,
        min_span_m: limits.min_span_m,
        max_span_m: limits.max_span_m,
        ultimate_capacity_kpa: limits.ultimate_capacity_kpa,
        serviceability_capacity_kpa: limits.serviceability_capacity_kpa,
        standard_spacing_m: spacing,
        spacing_capacity_kpa: spacing_capacity,
        utilization,
        joist_count,
        actual_spacing_m: actual_spacing.value(),
        total_self_weight_kpa: total_self_weight.value(),
        deflection_limit_ratio: spec.deflection_limit_ratio,
        allowed_deflection_mm: allowed_deflection.value(),
        estimated_deflection_mm: estimated_deflection.value(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(system: FormworkSystem, support: Option<SupportConfiguration>, span_m: f64, load: f64) -> FormworkInput {
        FormworkInput {
            system,
            support,
            span_m,
            width_m: 6.0,
            design_load_kpa: load,
            concrete_thickness_m: 0.2,
        }
    }

    #[test]
    fn test_system_c_reference_layout() {
        let design = validate_formwork(&input(FormworkSystem::SystemC, None, 3.0, 17.355)).unwrap();

        // 1.2 m is rated 16 kPa, 14.4 kPa at 90%; 1.0 m is rated 20 kPa
        assert_eq!(design.standard_spacing_m, 1.0);
        assert_eq!(design.spacing_capacity_kpa, 20.0);
        assert_eq!(design.joist_count, 7);
        assert!((design.actual_spacing_m - 1.0).abs() < 1e-12);
        assert!((design.total_self_weight_kpa - 0.32).abs() < 1e-9);
        assert!((design.utilization - 17.355 / 20.0).abs() < 1e-12);
        assert_eq!(design.material, "Steel");
        assert_eq!(design.support, None);
    }

    #[test]
    fn test_joist_count_not_inflated_by_rounding() {
        let design = validate_formwork(&FormworkInput {
            width_m: 6.0,
            ..input(FormworkSystem::SystemA, Some(SupportConfiguration::TripleMidSupport), 2.4, 17.355)
        })
        .unwrap();

        assert_eq!(design.standard_spacing_m, 0.4);
        // 6.0 / 0.4 = 15 bays
        assert_eq!(design.joist_count, 16);
        assert!((design.actual_spacing_m - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_actual_spacing_redistributes() {
        let design = validate_formwork(&FormworkInput {
            width_m: 5.0,
            ..input(FormworkSystem::SystemC, None, 3.0, 10.0)
        })
        .unwrap();

        // 1.2 m: ceil(5.0 / 1.2) = 5 bays, 6 joists at 1.0 m
        assert_eq!(design.standard_spacing_m, 1.2);
        assert_eq!(design.joist_count, 6);
        assert!((design.actual_spacing_m - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_span_bounds_inclusive() {
        assert!(validate_formwork(&input(FormworkSystem::SystemB, None, 0.9, 5.0)).is_ok());
        assert!(validate_formwork(&input(FormworkSystem::SystemB, None, 3.0, 5.0)).is_ok());

        let err = validate_formwork(&input(FormworkSystem::SystemB, None, 3.01, 5.0)).unwrap_err();
        assert_eq!(err.violated_constraint(), Some(Constraint::SpanBounds));
        let err = validate_formwork(&input(FormworkSystem::SystemB, None, 0.89, 5.0)).unwrap_err();
        assert_eq!(err.error_code(), "SPAN_OUT_OF_RANGE");
    }

    #[test]
    fn test_system_a_span_follows_support() {
        let none = Some(SupportConfiguration::NoMidSupport);
        let single = Some(SupportConfiguration::SingleMidSupport);

        assert!(validate_formwork(&input(FormworkSystem::SystemA, none, 1.8, 5.0)).is_ok());
        let err = validate_formwork(&input(FormworkSystem::SystemA, none, 2.0, 5.0)).unwrap_err();
        assert_eq!(err.violated_constraint(), Some(Constraint::SpanBounds));
        assert!(validate_formwork(&input(FormworkSystem::SystemA, single, 2.0, 5.0)).is_ok());
    }

    #[test]
    fn test_system_a_without_support_is_input_error() {
        let err = validate_formwork(&input(FormworkSystem::SystemA, None, 1.5, 5.0)).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");
        assert!(!err.is_design_violation());
    }

    #[test]
    fn test_support_ignored_for_flat_systems() {
        let design = validate_formwork(&input(
            FormworkSystem::SystemB,
            Some(SupportConfiguration::TripleMidSupport),
            2.0,
            5.0,
        ))
        .unwrap();
        assert_eq!(design.support, None);
        assert_eq!(design.max_span_m, 3.0);
    }

    #[test]
    fn test_concrete_thickness_capacity() {
        let err = validate_formwork(&FormworkInput {
            concrete_thickness_m: 0.25,
            ..input(FormworkSystem::SystemA, Some(SupportConfiguration::NoMidSupport), 1.5, 5.0)
        })
        .unwrap_err();
        assert_eq!(err.violated_constraint(), Some(Constraint::ConcreteThickness));

        // System B has no thickness limit
        assert!(validate_formwork(&FormworkInput {
            concrete_thickness_m: 1.4,
            ..input(FormworkSystem::SystemB, None, 2.0, 5.0)
        })
        .is_ok());
    }

    #[test]
    fn test_span_checked_before_thickness() {
        let err = validate_formwork(&FormworkInput {
            concrete_thickness_m: 2.0,
            ..input(FormworkSystem::SystemC, None, 6.0, 5.0)
        })
        .unwrap_err();
        assert_eq!(err.violated_constraint(), Some(Constraint::SpanBounds));
    }

    #[test]
    fn test_vertical_capacity_exceeded() {
        let err = validate_formwork(&input(FormworkSystem::SystemB, None, 2.0, 17.355)).unwrap_err();
        match err {
            CalcError::CapacityExceeded {
                constraint,
                limit,
                value,
                ..
            } => {
                assert_eq!(constraint, Constraint::VerticalCapacity);
                assert_eq!(limit, 15.0);
                assert_eq!(value, 17.355);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_no_admissible_spacing_between_ceiling_and_ultimate() {
        // Under the 18 kPa ultimate but above 90% of it
        let err = validate_formwork(&input(
            FormworkSystem::SystemA,
            Some(SupportConfiguration::DoubleMidSupport),
            2.4,
            17.355,
        ))
        .unwrap_err();
        assert_eq!(err.error_code(), "NO_ADMISSIBLE_SPACING");
        assert_eq!(err.violated_constraint(), Some(Constraint::SpacingUtilization));
    }

    #[test]
    fn test_utilization_never_exceeds_ceiling() {
        for system in FormworkSystem::ALL {
            for support in SupportConfiguration::ALL {
                let limits = system.resolve(Some(support)).unwrap();
                let mut load = 0.0;
                while load <= limits.ultimate_capacity_kpa {
                    let span = limits.min_span_m;
                    if let Ok(design) = validate_formwork(&FormworkInput {
                        concrete_thickness_m: 0.1,
                        ..input(system, Some(support), span, load)
                    }) {
                        assert!(design.utilization <= UTILIZATION_CEILING + 1e-12);
                        assert!(design.design_load_kpa <= UTILIZATION_CEILING * design.ultimate_capacity_kpa + 1e-12);
                    }
                    load += 0.25;
                }
            }
        }
    }

    #[test]
    fn test_deflection_heuristic() {
        // System C: allowed 3.0 / 360 = 8.33 mm; 0.8 × 8.33 = 6.67 mm caps the 7.5 mm estimate
        let design = validate_formwork(&input(FormworkSystem::SystemC, None, 3.0, 10.0)).unwrap();
        assert!((design.allowed_deflection_mm - 3000.0 / 360.0).abs() < 1e-9);
        assert!((design.estimated_deflection_mm - 0.8 * 3000.0 / 360.0).abs() < 1e-9);

        // System B: allowed 2.0 / 250 = 8 mm; 2.0 / 400 = 5 mm governs
        let design = validate_formwork(&input(FormworkSystem::SystemB, None, 2.0, 5.0)).unwrap();
        assert!((design.allowed_deflection_mm - 8.0).abs() < 1e-9);
        assert!((design.estimated_deflection_mm - 5.0).abs() < 1e-9);
        assert!(design.deflection_ok());
    }

    #[test]
    fn test_invalid_inputs() {
        let bad_width = FormworkInput {
            width_m: 0.0,
            ..input(FormworkSystem::SystemC, None, 3.0, 10.0)
        };
        assert_eq!(validate_formwork(&bad_width).unwrap_err().error_code(), "INVALID_INPUT");

        let bad_load = input(FormworkSystem::SystemC, None, 3.0, -1.0);
        assert_eq!(validate_formwork(&bad_load).unwrap_err().error_code(), "INVALID_INPUT");

        let bad_span = input(FormworkSystem::SystemC, None, f64::NAN, 10.0);
        assert!(validate_formwork(&bad_span).is_err());
    }

    #[test]
    fn test_bay_dimension_upper_bound() {
        let huge = FormworkInput {
            width_m: 1.0e10,
            ..input(FormworkSystem::SystemC, None, 3.0, 10.0)
        };
        let err = validate_formwork(&huge).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(err.to_string().contains("width_m"));

        let widest = FormworkInput {
            width_m: MAX_BAY_DIMENSION_M,
            ..input(FormworkSystem::SystemC, None, 3.0, 10.0)
        };
        let design = validate_formwork(&widest).unwrap();
        // 1.2 m spacing: 100 / 1.2 rounds up to 84 bays
        assert_eq!(design.joist_count, 85);

        let long = input(FormworkSystem::SystemC, None, 1.0e10, 10.0);
        assert_eq!(validate_formwork(&long).unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_zero_load_takes_widest_spacing() {
        let design = validate_formwork(&input(FormworkSystem::SystemB, None, 2.0, 0.0)).unwrap();
        assert_eq!(design.standard_spacing_m, 0.6);
        assert_eq!(design.utilization, 0.0);
    }

    #[test]
    fn test_input_json() {
        let json = r#"{
            "system": "SystemA",
            "support": "TripleMidSupport",
            "span_m": 2.4,
            "width_m": 4.0,
            "design_load_kpa": 17.355,
            "concrete_thickness_m": 0.2
        }"#;
        let parsed: FormworkInput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.support, Some(SupportConfiguration::TripleMidSupport));
        assert!(validate_formwork(&parsed).is_ok());
    }
}
