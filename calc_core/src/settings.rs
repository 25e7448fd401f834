//! # Engine Settings
//!
//! Numeric policy for one evaluation. The values that differ between
//! revisions of the formwork load tables (concrete unit weight, whether stored
//! material stays on the deck after placement) are settings rather than
//! literals, so a caller picks a revision explicitly.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::settings::{EngineSettings, Formulation};
//!
//! let settings = EngineSettings::default()
//!     .with_concrete_unit_weight(24.0)
//!     .with_formulation(Formulation::Extended);
//!
//! assert!(settings.validate().is_ok());
//! assert_eq!(settings.gamma_d, 1.3);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Default reinforced concrete unit weight (kN/m³)
pub const DEFAULT_CONCRETE_UNIT_WEIGHT_KN_M3: f64 = 24.5;

/// Additional weight per percent of reinforcement, per metre of slab (kN/m³ per %)
pub const DEFAULT_REINFORCEMENT_WEIGHT_FACTOR: f64 = 0.5;

/// Default amplification for unanticipated conditions on critical members
pub const DEFAULT_GAMMA_D: f64 = 1.3;

/// Which combination table to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Formulation {
    /// Extended when any secondary action is non-zero, simplified otherwise
    #[default]
    Auto,
    /// Dead and construction loads only (two combinations per stage)
    Simplified,
    /// Adds wind, water, other-action, lateral pressure and impact combinations
    Extended,
}

impl Formulation {
    /// The concrete table for a load set
    ///
    /// ```
    /// use calc_core::settings::Formulation;
    ///
    /// assert_eq!(Formulation::Auto.resolve(true), Formulation::Extended);
    /// assert_eq!(Formulation::Auto.resolve(false), Formulation::Simplified);
    /// assert_eq!(Formulation::Simplified.resolve(true), Formulation::Simplified);
    /// ```
    pub fn resolve(self, has_secondary: bool) -> Formulation {
        match self {
            Formulation::Auto if has_secondary => Formulation::Extended,
            Formulation::Auto => Formulation::Simplified,
            explicit => explicit,
        }
    }
}

/// Which member classes to generate combinations for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MemberClasses {
    /// Only the amplified (γ_d) pass
    CriticalOnly,
    /// Amplified pass plus an unamplified pass for non-critical members
    #[default]
    CriticalAndNonCritical,
}

/// Settings for one evaluation.
///
/// Missing fields fall back to their defaults when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Concrete unit weight ρ (kN/m³), 24.0 or 24.5 depending on revision
    pub concrete_unit_weight_kn_m3: f64,

    /// Reinforcement weight factor k in G_c = ρ·t + k·r·t
    pub reinforcement_weight_factor: f64,

    /// Amplification γ_d applied to critical-member combinations
    pub gamma_d: f64,

    /// Combination table to use
    pub formulation: Formulation,

    /// Keep Q_m in the after-placement combinations
    pub after_placement_includes_storage: bool,

    /// Member classes to evaluate
    pub member_classes: MemberClasses,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            concrete_unit_weight_kn_m3: DEFAULT_CONCRETE_UNIT_WEIGHT_KN_M3,
            reinforcement_weight_factor: DEFAULT_REINFORCEMENT_WEIGHT_FACTOR,
            gamma_d: DEFAULT_GAMMA_D,
            formulation: Formulation::Auto,
            after_placement_includes_storage: true,
            member_classes: MemberClasses::CriticalAndNonCritical,
        }
    }
}

impl EngineSettings {
    /// Set the concrete unit weight (builder pattern)
    pub fn with_concrete_unit_weight(mut self, kn_m3: f64) -> Self {
        self.concrete_unit_weight_kn_m3 = kn_m3;
        self
    }

    /// Set γ_d (builder pattern)
    pub fn with_gamma_d(mut self, gamma_d: f64) -> Self {
        self.gamma_d = gamma_d;
        self
    }

    /// Set the combination table (builder pattern)
    pub fn with_formulation(mut self, formulation: Formulation) -> Self {
        self.formulation = formulation;
        self
    }

    /// Drop Q_m from the after-placement combinations (builder pattern)
    pub fn without_storage_after_placement(mut self) -> Self {
        self.after_placement_includes_storage = false;
        self
    }

    /// Set which member classes are evaluated (builder pattern)
    pub fn with_member_classes(mut self, classes: MemberClasses) -> Self {
        self.member_classes = classes;
        self
    }

    /// Validate settings
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.concrete_unit_weight_kn_m3 > 0.0) || !self.concrete_unit_weight_kn_m3.is_finite() {
            return Err(CalcError::invalid_input(
                "concrete_unit_weight_kn_m3",
                self.concrete_unit_weight_kn_m3.to_string(),
                "Concrete unit weight must be positive and finite",
            ));
        }
        if !(self.reinforcement_weight_factor >= 0.0) || !self.reinforcement_weight_factor.is_finite() {
            return Err(CalcError::invalid_input(
                "reinforcement_weight_factor",
                self.reinforcement_weight_factor.to_string(),
                "Reinforcement weight factor cannot be negative",
            ));
        }
        if !(self.gamma_d >= 1.0) || !self.gamma_d.is_finite() {
            return Err(CalcError::invalid_input(
                "gamma_d",
                self.gamma_d.to_string(),
                "Amplification factor must be finite and at least 1.0",
            ));
        }
        Ok(())
    }
}
