//! Mid-support arrangements for System A
//!
//! System A's maximum span, slab thickness capacity and vertical capacity
//! depend on how many intermediate supports are placed under each bay.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Mid-support arrangement under a System A bay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupportConfiguration {
    /// Panels span between primary props only
    NoMidSupport,
    /// One intermediate prop line per bay
    SingleMidSupport,
    /// Two intermediate prop lines per bay
    DoubleMidSupport,
    /// Three intermediate prop lines per bay
    TripleMidSupport,
}

/// Limits that vary with the support arrangement
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SupportVariant {
    /// Maximum span (m)
    pub max_span_m: f64,
    /// Maximum slab thickness (m)
    pub concrete_thickness_capacity_m: f64,
    /// Ultimate vertical capacity (kPa)
    pub ultimate_capacity_kpa: f64,
}

impl SupportConfiguration {
    /// All arrangements for UI selection
    pub const ALL: [SupportConfiguration; 4] = [
        SupportConfiguration::NoMidSupport,
        SupportConfiguration::SingleMidSupport,
        SupportConfiguration::DoubleMidSupport,
        SupportConfiguration::TripleMidSupport,
    ];

    /// Parse from a flexible string ("none", "single", "2", "triple", ...)
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_uppercase().replace([' ', '_', '-'], "").as_str() {
            "NONE" | "0" | "NOMIDSUPPORT" => Ok(SupportConfiguration::NoMidSupport),
            "SINGLE" | "1" | "SINGLEMIDSUPPORT" => Ok(SupportConfiguration::SingleMidSupport),
            "DOUBLE" | "2" | "DOUBLEMIDSUPPORT" => Ok(SupportConfiguration::DoubleMidSupport),
            "TRIPLE" | "3" | "TRIPLEMIDSUPPORT" => Ok(SupportConfiguration::TripleMidSupport),
            _ => Err(CalcError::invalid_input(
                "support_configuration",
                s,
                "Expected none, single, double or triple",
            )),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            SupportConfiguration::NoMidSupport => "No mid-support",
            SupportConfiguration::SingleMidSupport => "Single mid-support",
            SupportConfiguration::DoubleMidSupport => "Double mid-support",
            SupportConfiguration::TripleMidSupport => "Triple mid-support",
        }
    }

    /// System A limits for this arrangement
    pub fn system_a_variant(&self) -> SupportVariant {
        match self {
            SupportConfiguration::NoMidSupport => SupportVariant {
                max_span_m: 1.8,
                concrete_thickness_capacity_m: 0.20,
                ultimate_capacity_kpa: 8.0,
            },
            SupportConfiguration::SingleMidSupport => SupportVariant {
                max_span_m: 2.4,
                concrete_thickness_capacity_m: 0.30,
                ultimate_capacity_kpa: 12.0,
            },
            SupportConfiguration::DoubleMidSupport => SupportVariant {
                max_span_m: 3.0,
                concrete_thickness_capacity_m: 0.45,
                ultimate_capacity_kpa: 18.0,
            },
            SupportConfiguration::TripleMidSupport => SupportVariant {
                max_span_m: 3.6,
                concrete_thickness_capacity_m: 0.60,
                ultimate_capacity_kpa: 24.0,
            },
        }
    }
}

impl std::fmt::Display for SupportConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
