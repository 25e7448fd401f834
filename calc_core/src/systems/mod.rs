//! Formwork system catalog
//!
//! Static specification for the proprietary slab formwork systems. Each
//! system has span bounds, vertical capacities, a discrete set of standard
//! joist spacings and component self-weights. System A's span, thickness and
//! vertical capacity depend on a [`SupportConfiguration`].

pub mod support;

pub use support::{SupportConfiguration, SupportVariant};

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Proprietary formwork system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormworkSystem {
    /// Aluminium panel system on adjustable props
    SystemA,
    /// Timber joist and plywood system
    SystemB,
    /// Heavy-duty steel beam system
    SystemC,
}

/// Rated capacity at one standard joist spacing
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpacingRating {
    /// Joist spacing (m)
    pub spacing_m: f64,
    /// Rated vertical capacity at this spacing (kPa)
    pub capacity_kpa: f64,
}

/// How a system's span and capacity limits are determined
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum CapacityModel {
    /// One set of limits for every installation
    Flat {
        max_span_m: f64,
        ultimate_capacity_kpa: f64,
        concrete_thickness_capacity_m: Option<f64>,
    },
    /// Limits looked up by mid-support arrangement
    BySupport,
}

/// Static specification of one formwork system
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SystemSpec {
    pub name: &'static str,
    pub material: &'static str,
    pub min_span_m: f64,
    pub capacity: CapacityModel,
    /// Serviceability capacity of the decking itself (kPa)
    pub serviceability_capacity_kpa: f64,
    /// Standard joist spacings, ascending
    pub spacings: &'static [SpacingRating],
    /// Decking self-weight (kPa)
    pub decking_weight_kpa: f64,
    /// Joist self-weight (kN/m)
    pub joist_weight_kn_m: f64,
    /// Deflection limit as span / N
    pub deflection_limit_ratio: f64,
}

/// Limits resolved for one system and support arrangement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLimits {
    pub system: FormworkSystem,
    /// Support arrangement that applied, `None` for systems without variants
    pub support: Option<SupportConfiguration>,
    pub min_span_m: f64,
    pub max_span_m: f64,
    pub ultimate_capacity_kpa: f64,
    pub serviceability_capacity_kpa: f64,
    pub concrete_thickness_capacity_m: Option<f64>,
}

const SYSTEM_A_SPACINGS: &[SpacingRating] = &[
    SpacingRating { spacing_m: 0.3, capacity_kpa: 30.0 },
    SpacingRating { spacing_m: 0.4, capacity_kpa: 24.0 },
    SpacingRating { spacing_m: 0.5, capacity_kpa: 19.0 },
    SpacingRating { spacing_m: 0.6, capacity_kpa: 16.0 },
];

const SYSTEM_B_SPACINGS: &[SpacingRating] = &[
    SpacingRating { spacing_m: 0.3, capacity_kpa: 26.0 },
    SpacingRating { spacing_m: 0.4, capacity_kpa: 20.0 },
    SpacingRating { spacing_m: 0.45, capacity_kpa: 18.0 },
    SpacingRating { spacing_m: 0.6, capacity_kpa: 13.0 },
];

const SYSTEM_C_SPACINGS: &[SpacingRating] = &[
    SpacingRating { spacing_m: 0.4, capacity_kpa: 40.0 },
    SpacingRating { spacing_m: 0.6, capacity_kpa: 30.0 },
    SpacingRating { spacing_m: 0.8, capacity_kpa: 24.0 },
    SpacingRating { spacing_m: 1.0, capacity_kpa: 20.0 },
    SpacingRating { spacing_m: 1.2, capacity_kpa: 16.0 },
];

const SYSTEM_A: SystemSpec = SystemSpec {
    name: "System A",
    material: "Aluminium",
    min_span_m: 0.6,
    capacity: CapacityModel::BySupport,
    serviceability_capacity_kpa: 8.0,
    spacings: SYSTEM_A_SPACINGS,
    decking_weight_kpa: 0.15,
    joist_weight_kn_m: 0.05,
    deflection_limit_ratio: 270.0,
};

const SYSTEM_B: SystemSpec = SystemSpec {
    name: "System B",
    material: "Timber",
    min_span_m: 0.9,
    capacity: CapacityModel::Flat {
        max_span_m: 3.0,
        ultimate_capacity_kpa: 15.0,
        concrete_thickness_capacity_m: None,
    },
    serviceability_capacity_kpa: 10.0,
    spacings: SYSTEM_B_SPACINGS,
    decking_weight_kpa: 0.12,
    joist_weight_kn_m: 0.08,
    deflection_limit_ratio: 250.0,
};

const SYSTEM_C: SystemSpec = SystemSpec {
    name: "System C",
    material: "Steel",
    min_span_m: 1.2,
    capacity: CapacityModel::Flat {
        max_span_m: 4.5,
        ultimate_capacity_kpa: 25.0,
        concrete_thickness_capacity_m: Some(1.0),
    },
    serviceability_capacity_kpa: 18.0,
    spacings: SYSTEM_C_SPACINGS,
    decking_weight_kpa: 0.2,
    joist_weight_kn_m: 0.12,
    deflection_limit_ratio: 360.0,
};

impl FormworkSystem {
    /// All systems for UI selection
    pub const ALL: [FormworkSystem; 3] = [
        FormworkSystem::SystemA,
        FormworkSystem::SystemB,
        FormworkSystem::SystemC,
    ];

    /// Static specification
    pub fn spec(&self) -> &'static SystemSpec {
        match self {
            FormworkSystem::SystemA => &SYSTEM_A,
            FormworkSystem::SystemB => &SYSTEM_B,
            FormworkSystem::SystemC => &SYSTEM_C,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        self.spec().name
    }

    /// Whether limits depend on the support arrangement
    pub fn is_support_sensitive(&self) -> bool {
        matches!(self.spec().capacity, CapacityModel::BySupport)
    }

    /// Parse from a flexible string ("A", "system b", "SystemC", ...)
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let normalized = s.trim().to_uppercase().replace([' ', '_', '-'], "");
        match normalized.strip_prefix("SYSTEM").unwrap_or(normalized.as_str()) {
            "A" => Ok(FormworkSystem::SystemA),
            "B" => Ok(FormworkSystem::SystemB),
            "C" => Ok(FormworkSystem::SystemC),
            _ => Err(CalcError::invalid_input(
                "system",
                s,
                "Expected System A, System B or System C",
            )),
        }
    }

    /// Resolve span and capacity limits for a support arrangement
    ///
    /// The arrangement is required for System A and ignored for the others.
    ///
    /// # Example
    /// ```
    /// use calc_core::systems::{FormworkSystem, SupportConfiguration};
    ///
    /// let limits = FormworkSystem::SystemA
    ///     .resolve(Some(SupportConfiguration::DoubleMidSupport))
    ///     .unwrap();
    /// assert_eq!(limits.max_span_m, 3.0);
    ///
    /// let flat = FormworkSystem::SystemB
    ///     .resolve(Some(SupportConfiguration::TripleMidSupport))
    ///     .unwrap();
    /// assert_eq!(flat.support, None);
    /// ```
    pub fn resolve(&self, support: Option<SupportConfiguration>) -> CalcResult<ResolvedLimits> {
        let spec = self.spec();
        match spec.capacity {
            CapacityModel::Flat {
                max_span_m,
                ultimate_capacity_kpa,
                concrete_thickness_capacity_m,
            } => Ok(ResolvedLimits {
                system: *self,
                support: None,
                min_span_m: spec.min_span_m,
                max_span_m,
                ultimate_capacity_kpa,
                serviceability_capacity_kpa: spec.serviceability_capacity_kpa,
                concrete_thickness_capacity_m,
            }),
            CapacityModel::BySupport => {
                let config = support.ok_or_else(|| CalcError::missing_field("support_configuration"))?;
                let variant = config.system_a_variant();
                Ok(ResolvedLimits {
                    system: *self,
                    support: Some(config),
                    min_span_m: spec.min_span_m,
                    max_span_m: variant.max_span_m,
                    ultimate_capacity_kpa: variant.ultimate_capacity_kpa,
                    serviceability_capacity_kpa: spec
                        .serviceability_capacity_kpa
                        .min(variant.ultimate_capacity_kpa),
                    concrete_thickness_capacity_m: Some(variant.concrete_thickness_capacity_m),
                })
            }
        }
    }
}

impl std::fmt::Display for FormworkSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_flexible() {
        assert_eq!(FormworkSystem::from_str_flexible("A").unwrap(), FormworkSystem::SystemA);
        assert_eq!(
            FormworkSystem::from_str_flexible("system b").unwrap(),
            FormworkSystem::SystemB
        );
        assert_eq!(
            FormworkSystem::from_str_flexible("SystemC").unwrap(),
            FormworkSystem::SystemC
        );
        assert_eq!(
            FormworkSystem::from_str_flexible("System-A").unwrap(),
            FormworkSystem::SystemA
        );
        assert!(FormworkSystem::from_str_flexible("System D").is_err());
        assert!(FormworkSystem::from_str_flexible("").is_err());
    }

    #[test]
    fn test_spacings_ascending_and_positive() {
        for system in FormworkSystem::ALL {
            let spacings = system.spec().spacings;
            assert!(!spacings.is_empty(), "{} has no spacings", system);
            for pair in spacings.windows(2) {
                assert!(pair[0].spacing_m < pair[1].spacing_m);
            }
            assert!(spacings.iter().all(|s| s.spacing_m > 0.0 && s.capacity_kpa > 0.0));
        }
    }

    #[test]
    fn test_only_system_a_is_support_sensitive() {
        assert!(FormworkSystem::SystemA.is_support_sensitive());
        assert!(!FormworkSystem::SystemB.is_support_sensitive());
        assert!(!FormworkSystem::SystemC.is_support_sensitive());
    }

    #[test]
    fn test_system_a_requires_support() {
        let err = FormworkSystem::SystemA.resolve(None).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");
    }

    #[test]
    fn test_system_a_resolves_by_support() {
        let limits = FormworkSystem::SystemA
            .resolve(Some(SupportConfiguration::NoMidSupport))
            .unwrap();
        assert_eq!(limits.max_span_m, 1.8);
        assert_eq!(limits.ultimate_capacity_kpa, 8.0);
        assert_eq!(limits.concrete_thickness_capacity_m, Some(0.20));
        assert_eq!(limits.support, Some(SupportConfiguration::NoMidSupport));
        assert!(limits.serviceability_capacity_kpa <= limits.ultimate_capacity_kpa);
    }

    #[test]
    fn test_flat_systems_ignore_support() {
        let with = FormworkSystem::SystemC
            .resolve(Some(SupportConfiguration::SingleMidSupport))
            .unwrap();
        let without = FormworkSystem::SystemC.resolve(None).unwrap();
        assert_eq!(with, without);
        assert_eq!(with.concrete_thickness_capacity_m, Some(1.0));

        let b = FormworkSystem::SystemB.resolve(None).unwrap();
        assert_eq!(b.concrete_thickness_capacity_m, None);
        assert_eq!(b.ultimate_capacity_kpa, 15.0);
    }

    #[test]
    fn test_span_bounds_are_ordered() {
        for system in FormworkSystem::ALL {
            let limits = system.resolve(Some(SupportConfiguration::NoMidSupport)).unwrap();
            assert!(limits.min_span_m < limits.max_span_m);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(FormworkSystem::SystemB.to_string(), "System B");
        assert_eq!(FormworkSystem::SystemC.spec().material, "Steel");
    }
}
