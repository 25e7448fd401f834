//! Construction-stage loads and factored combinations for slab formwork
//!
//! # Overview
//!
//! - [`Stage`] - The three construction stages (before, during, after placement)
//! - [`Action`] - Every action the deck sees (G_f, G_c, Q_w, Q_m, wind, ...)
//! - [`LoadInputs`] - Raw inputs for one evaluation
//! - [`ActionSet`] - Resolved action magnitudes for one stage
//! - [`concrete`] - Concrete self-weight model
//! - [`combinations`] - Stage formula tables and the combination generator
//! - [`governing`] - Selection of the governing design load
//!
//! # Example
//!
//! ```
//! use calc_core::loads::{LoadInputs, ImposedLoads, Stage, select_design_load};
//! use calc_core::loads::combinations::generate_stage_combinations;
//! use calc_core::loads::concrete::ConcreteLoad;
//! use calc_core::settings::EngineSettings;
//!
//! let settings = EngineSettings::default();
//! let inputs = LoadInputs::new(0.5, 0.2, 1.0)
//!     .with_imposed(Stage::DuringPlacement, ImposedLoads::new(2.0, 2.5));
//!
//! let concrete = ConcreteLoad::compute(inputs.concrete_thickness_m, inputs.reinforcement_pct, &settings).unwrap();
//! let per_stage = generate_stage_combinations(&inputs, &concrete, &settings);
//! let design = select_design_load(&per_stage).unwrap();
//!
//! assert_eq!(design.governing_stage, Stage::DuringPlacement);
//! assert!((design.value_kpa - 17.355).abs() < 1e-9);
//! ```

pub mod load_types;
pub mod concrete;
pub mod combinations;
pub mod governing;

pub use load_types::Action;
pub use concrete::{compute_concrete_load, ConcreteLoad};
pub use combinations::{
    FactoredCombination,
    LoadCombination,
    StageCombinations,
    generate_combinations,
    generate_stage_combinations,
    stage_formulas,
};
pub use governing::{DesignLoad, select_design_load, select_for_class};

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::errors::{CalcError, CalcResult};
use crate::settings::{EngineSettings, Formulation};

/// Smallest slab thickness the engine accepts (m)
pub const MIN_CONCRETE_THICKNESS_M: f64 = 0.05;

/// Largest slab thickness the engine accepts (m)
pub const MAX_CONCRETE_THICKNESS_M: f64 = 1.5;

/// Largest reinforcement ratio the engine accepts (%)
pub const MAX_REINFORCEMENT_PCT: f64 = 5.0;

/// Construction stage
///
/// Stages are ordered; the ordering is used to break ties when two stages
/// produce the same governing load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Stage I - deck erected, no concrete yet
    BeforePlacement,
    /// Stage II - concrete being placed
    DuringPlacement,
    /// Stage III - concrete placed, not yet self-supporting
    AfterPlacement,
}

impl Stage {
    /// All stages in enumeration order
    pub const ALL: [Stage; 3] = [
        Stage::BeforePlacement,
        Stage::DuringPlacement,
        Stage::AfterPlacement,
    ];

    /// Stage number (1, 2, 3)
    pub fn number(&self) -> u8 {
        match self {
            Stage::BeforePlacement => 1,
            Stage::DuringPlacement => 2,
            Stage::AfterPlacement => 3,
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::BeforePlacement => "Before concrete placement",
            Stage::DuringPlacement => "During concrete placement",
            Stage::AfterPlacement => "After concrete placement",
        }
    }

    /// Whether concrete self-weight acts on the deck in this stage
    pub fn carries_concrete(&self) -> bool {
        !matches!(self, Stage::BeforePlacement)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stage {}", self.number())
    }
}

/// Member classification of a combination pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberClass {
    /// γ_d applied
    Critical,
    /// γ_d = 1.0
    NonCritical,
}

impl MemberClass {
    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            MemberClass::Critical => "Critical members",
            MemberClass::NonCritical => "Non-critical members",
        }
    }
}

/// The amplification used for one generation pass.
///
/// The member class is fixed by the constructor, so a pass is never tagged
/// critical without γ_d or the other way round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Amplification {
    member_class: MemberClass,
    gamma_d: f64,
}

impl Amplification {
    /// Critical-member pass with the given γ_d
    pub fn critical(gamma_d: f64) -> Self {
        Amplification {
            member_class: MemberClass::Critical,
            gamma_d,
        }
    }

    /// Non-critical pass (γ_d = 1.0)
    pub fn non_critical() -> Self {
        Amplification {
            member_class: MemberClass::NonCritical,
            gamma_d: 1.0,
        }
    }

    /// Member class of this pass
    pub fn member_class(&self) -> MemberClass {
        self.member_class
    }

    /// γ_d applied to the amplified part of each combination
    pub fn gamma_d(&self) -> f64 {
        self.gamma_d
    }
}

/// Construction imposed loads for one stage (kPa)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImposedLoads {
    /// Q_w - workers and equipment
    #[serde(default)]
    pub workers_kpa: f64,

    /// Q_m - stored material
    #[serde(default)]
    pub stored_material_kpa: f64,
}

impl ImposedLoads {
    /// Create imposed loads for a stage
    pub fn new(workers_kpa: f64, stored_material_kpa: f64) -> Self {
        ImposedLoads {
            workers_kpa,
            stored_material_kpa,
        }
    }
}

/// Secondary actions for the extended formulation.
///
/// All default to zero. Q_h is a line load (kN/m); the rest are kPa.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecondaryActions {
    /// Q_h - horizontal imposed action (kN/m)
    pub horizontal_kn_m: f64,
    /// W_s - service wind
    pub service_wind_kpa: f64,
    /// W_u - ultimate wind
    pub ultimate_wind_kpa: f64,
    /// F_w - flowing water
    pub flowing_water_kpa: f64,
    /// Q_x - other actions
    pub other_kpa: f64,
    /// P_c - lateral concrete pressure
    pub lateral_pressure_kpa: f64,
    /// I - impact
    pub impact_kpa: f64,
}

impl SecondaryActions {
    /// Magnitude of a secondary action (0.0 for primary actions)
    pub fn get(&self, action: Action) -> f64 {
        match action {
            Action::HorizontalImposed => self.horizontal_kn_m,
            Action::ServiceWind => self.service_wind_kpa,
            Action::UltimateWind => self.ultimate_wind_kpa,
            Action::FlowingWater => self.flowing_water_kpa,
            Action::Other => self.other_kpa,
            Action::LateralConcretePressure => self.lateral_pressure_kpa,
            Action::Impact => self.impact_kpa,
            Action::FormworkSelfWeight
            | Action::ConcreteSelfWeight
            | Action::Workers
            | Action::StoredMaterial => 0.0,
        }
    }

    /// Whether any secondary action is non-zero
    pub fn any(&self) -> bool {
        Action::SECONDARY.iter().any(|a| self.get(*a) != 0.0)
    }
}

/// Raw load inputs for one evaluation.
///
/// # JSON Format
/// ```json
/// {
///   "formwork_self_weight_kpa": 0.5,
///   "concrete_thickness_m": 0.2,
///   "reinforcement_pct": 1.0,
///   "before_placement": { "workers_kpa": 1.0, "stored_material_kpa": 2.5 },
///   "during_placement": { "workers_kpa": 2.0, "stored_material_kpa": 2.5 },
///   "after_placement": { "workers_kpa": 1.0, "stored_material_kpa": 2.5 },
///   "secondary": { "ultimate_wind_kpa": 0.8 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadInputs {
    /// G_f - formwork self-weight (kPa)
    pub formwork_self_weight_kpa: f64,

    /// Slab thickness t (m)
    pub concrete_thickness_m: f64,

    /// Reinforcement ratio r (%)
    #[serde(default)]
    pub reinforcement_pct: f64,

    /// Stage I imposed loads
    #[serde(default)]
    pub before_placement: ImposedLoads,

    /// Stage II imposed loads
    #[serde(default)]
    pub during_placement: ImposedLoads,

    /// Stage III imposed loads
    #[serde(default)]
    pub after_placement: ImposedLoads,

    /// Secondary actions (extended formulation only)
    #[serde(default)]
    pub secondary: SecondaryActions,
}

impl LoadInputs {
    /// Create inputs with zero imposed and secondary loads
    pub fn new(formwork_self_weight_kpa: f64, concrete_thickness_m: f64, reinforcement_pct: f64) -> Self {
        LoadInputs {
            formwork_self_weight_kpa,
            concrete_thickness_m,
            reinforcement_pct,
            before_placement: ImposedLoads::default(),
            during_placement: ImposedLoads::default(),
            after_placement: ImposedLoads::default(),
            secondary: SecondaryActions::default(),
        }
    }

    /// Set the imposed loads of one stage (builder pattern)
    pub fn with_imposed(mut self, stage: Stage, imposed: ImposedLoads) -> Self {
        match stage {
            Stage::BeforePlacement => self.before_placement = imposed,
            Stage::DuringPlacement => self.during_placement = imposed,
            Stage::AfterPlacement => self.after_placement = imposed,
        }
        self
    }

    /// Set the same imposed loads on every stage (builder pattern)
    pub fn with_imposed_all(self, imposed: ImposedLoads) -> Self {
        Stage::ALL
            .iter()
            .fold(self, |inputs, stage| inputs.with_imposed(*stage, imposed))
    }

    /// Set secondary actions (builder pattern)
    pub fn with_secondary(mut self, secondary: SecondaryActions) -> Self {
        self.secondary = secondary;
        self
    }

    /// Imposed loads of one stage
    pub fn imposed(&self, stage: Stage) -> ImposedLoads {
        match stage {
            Stage::BeforePlacement => self.before_placement,
            Stage::DuringPlacement => self.during_placement,
            Stage::AfterPlacement => self.after_placement,
        }
    }

    /// Validate ranges at the engine boundary
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.formwork_self_weight_kpa > 0.0) || !self.formwork_self_weight_kpa.is_finite() {
            return Err(CalcError::invalid_input(
                "formwork_self_weight_kpa",
                self.formwork_self_weight_kpa.to_string(),
                "Formwork self-weight must be positive",
            ));
        }
        if !(MIN_CONCRETE_THICKNESS_M..=MAX_CONCRETE_THICKNESS_M).contains(&self.concrete_thickness_m) {
            return Err(CalcError::invalid_input(
                "concrete_thickness_m",
                self.concrete_thickness_m.to_string(),
                format!(
                    "Slab thickness must be between {} and {} m",
                    MIN_CONCRETE_THICKNESS_M, MAX_CONCRETE_THICKNESS_M
                ),
            ));
        }
        if !(0.0..=MAX_REINFORCEMENT_PCT).contains(&self.reinforcement_pct) {
            return Err(CalcError::invalid_input(
                "reinforcement_pct",
                self.reinforcement_pct.to_string(),
                format!("Reinforcement ratio must be between 0 and {} %", MAX_REINFORCEMENT_PCT),
            ));
        }
        for stage in Stage::ALL {
            let imposed = self.imposed(stage);
            check_non_negative(&format!("stage_{}.workers_kpa", stage.number()), imposed.workers_kpa)?;
            check_non_negative(
                &format!("stage_{}.stored_material_kpa", stage.number()),
                imposed.stored_material_kpa,
            )?;
        }
        for action in Action::SECONDARY {
            check_non_negative(
                &format!("secondary.{}", action.code()),
                self.secondary.get(action),
            )?;
        }
        Ok(())
    }

    /// Reject secondary actions that the chosen combination table would drop
    pub fn validate_formulation(&self, settings: &EngineSettings) -> CalcResult<()> {
        if settings.formulation == Formulation::Simplified && self.secondary.any() {
            return Err(CalcError::invalid_input(
                "settings.formulation",
                "Simplified",
                "Secondary actions are only combined by the extended formulation",
            ));
        }
        Ok(())
    }

    /// Resolve every action magnitude acting in one stage
    ///
    /// Concrete self-weight is only present from placement onwards.
    pub fn actions(&self, stage: Stage, concrete: &ConcreteLoad) -> ActionSet {
        let imposed = self.imposed(stage);
        let mut set = ActionSet::new(stage.to_string())
            .with_action(Action::FormworkSelfWeight, self.formwork_self_weight_kpa)
            .with_action(Action::Workers, imposed.workers_kpa)
            .with_action(Action::StoredMaterial, imposed.stored_material_kpa);

        if stage.carries_concrete() {
            set.set(Action::ConcreteSelfWeight, concrete.value_kpa);
        }
        for action in Action::SECONDARY {
            let value = self.secondary.get(action);
            if value != 0.0 {
                set.set(action, value);
            }
        }
        set
    }
}

fn check_non_negative(field: &str, value: f64) -> CalcResult<()> {
    if !(value >= 0.0) || !value.is_finite() {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Load cannot be negative",
        ));
    }
    Ok(())
}

/// Action magnitudes for one stage
///
/// # Example
/// ```
/// use calc_core::loads::{ActionSet, Action};
///
/// let set = ActionSet::new("Stage 2")
///     .with_action(Action::FormworkSelfWeight, 0.5)
///     .with_action(Action::ConcreteSelfWeight, 5.0);
///
/// assert_eq!(set.get(Action::ConcreteSelfWeight), 5.0);
/// assert_eq!(set.get(Action::Impact), 0.0);  // Not specified, defaults to 0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionSet {
    /// Label for this set (usually the stage)
    pub label: String,

    /// Magnitudes keyed by action (kPa, or kN/m for Q_h)
    pub actions: HashMap<Action, f64>,
}

impl ActionSet {
    /// Create a new empty action set with a label
    pub fn new(label: impl Into<String>) -> Self {
        ActionSet {
            label: label.into(),
            actions: HashMap::new(),
        }
    }

    /// Add or update an action (builder pattern)
    pub fn with_action(mut self, action: Action, value: f64) -> Self {
        self.actions.insert(action, value);
        self
    }

    /// Set an action value (mutable)
    pub fn set(&mut self, action: Action, value: f64) {
        self.actions.insert(action, value);
    }

    /// Get an action value, defaulting to 0.0 if not set
    pub fn get(&self, action: Action) -> f64 {
        self.actions.get(&action).copied().unwrap_or(0.0)
    }

    /// Check if an action is defined (even if zero)
    pub fn has(&self, action: Action) -> bool {
        self.actions.contains_key(&action)
    }

    /// Whether any secondary action is non-zero
    pub fn has_secondary(&self) -> bool {
        Action::SECONDARY.iter().any(|a| self.get(*a) != 0.0)
    }
}

impl Default for ActionSet {
    fn default() -> Self {
        ActionSet::new("Unnamed")
    }
}
