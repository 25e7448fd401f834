//! Stage-aware factored load combinations for slab formwork
//!
//! Each stage has its own formula table. A formula is split into an
//! amplified part, which is multiplied by γ_d on the critical-member pass,
//! and an unamplified part that is never multiplied by γ_d (the stage I
//! dead-load check, ultimate wind and impact). The critical and
//! non-critical passes share the same table; only γ_d differs.
//!
//! ## Simplified formulation
//!
//! | Stage | Id   | Vertical                                          |
//! |-------|------|---------------------------------------------------|
//! | 1     | S1-A | 1.35 G_f                                          |
//! | 1     | S1-B | γ_d (1.2 G_f + 1.5 Q_w + 1.5 Q_m)                 |
//! | 2, 3  | Sn-A | γ_d (1.35 G_f + 1.35 G_c)                         |
//! | 2, 3  | Sn-B | γ_d (1.2 G_f + 1.2 G_c + 1.5 Q_w + 1.5 Q_m)       |
//!
//! ## Extended formulation
//!
//! Adds service wind / water / other action (and lateral pressure during
//! placement) inside the γ_d bracket, ultimate wind at 1.0 outside it, and
//! impact at 1.1 outside it. Combinations carrying construction loads also
//! carry a horizontal component of γ_d × 1.5 Q_h.
//!
//! Under [`Formulation::Auto`] (the default) the generator switches to the
//! extended table as soon as a stage carries any secondary action.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::concrete::ConcreteLoad;
use super::load_types::Action;
use super::{ActionSet, Amplification, LoadInputs, MemberClass, Stage};
use crate::settings::{EngineSettings, Formulation, MemberClasses};

/// One factored term of a combination
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorTerm {
    /// The action the factor applies to
    pub action: Action,
    /// Load factor
    pub factor: f64,
}

/// A combination formula for one stage
///
/// # Example
/// ```
/// use calc_core::loads::{LoadCombination, ActionSet, Action, Stage};
///
/// let combo = LoadCombination::new("S2-A", Stage::DuringPlacement)
///     .with_factor(Action::FormworkSelfWeight, 1.35)
///     .with_factor(Action::ConcreteSelfWeight, 1.35);
///
/// let set = ActionSet::new("Stage 2")
///     .with_action(Action::FormworkSelfWeight, 0.5)
///     .with_action(Action::ConcreteSelfWeight, 5.0);
///
/// let (vertical, horizontal) = combo.apply(&set, 1.3);
/// assert!((vertical - 9.6525).abs() < 1e-9);
/// assert_eq!(horizontal, 0.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadCombination {
    /// Combination identifier (e.g., "S1-A", "S2-C")
    pub name: String,

    /// Stage the formula belongs to
    pub stage: Stage,

    /// Vertical terms multiplied by γ_d
    pub amplified: Vec<FactorTerm>,

    /// Vertical terms never multiplied by γ_d
    pub unamplified: Vec<FactorTerm>,

    /// Horizontal terms, multiplied by γ_d
    pub horizontal: Vec<FactorTerm>,
}

impl LoadCombination {
    /// Create a new empty combination
    pub fn new(name: impl Into<String>, stage: Stage) -> Self {
        LoadCombination {
            name: name.into(),
            stage,
            amplified: Vec::new(),
            unamplified: Vec::new(),
            horizontal: Vec::new(),
        }
    }

    /// Add a vertical term inside the γ_d bracket (builder pattern)
    pub fn with_factor(mut self, action: Action, factor: f64) -> Self {
        self.amplified.push(FactorTerm { action, factor });
        self
    }

    /// Add a vertical term outside the γ_d bracket (builder pattern)
    pub fn with_unamplified_factor(mut self, action: Action, factor: f64) -> Self {
        self.unamplified.push(FactorTerm { action, factor });
        self
    }

    /// Add a horizontal term (builder pattern)
    pub fn with_horizontal_factor(mut self, action: Action, factor: f64) -> Self {
        self.horizontal.push(FactorTerm { action, factor });
        self
    }

    /// Apply this combination, returning (vertical kPa, horizontal kN/m)
    pub fn apply(&self, actions: &ActionSet, gamma_d: f64) -> (f64, f64) {
        let sum = |terms: &[FactorTerm]| -> f64 {
            terms
                .iter()
                .fold(0.0, |acc, t| acc + t.factor * actions.get(t.action))
        };
        let vertical = gamma_d * sum(&self.amplified) + sum(&self.unamplified);
        let horizontal = gamma_d * sum(&self.horizontal);
        (vertical, horizontal)
    }

    /// Total vertical factor on an action (0.0 if absent)
    pub fn get_factor(&self, action: Action) -> f64 {
        self.amplified
            .iter()
            .chain(self.unamplified.iter())
            .filter(|t| t.action == action)
            .fold(0.0, |acc, t| acc + t.factor)
    }

    /// Render the vertical equation with γ_d substituted
    ///
    /// ```
    /// use calc_core::loads::{LoadCombination, Action, Stage};
    ///
    /// let combo = LoadCombination::new("S1-B", Stage::BeforePlacement)
    ///     .with_factor(Action::FormworkSelfWeight, 1.2)
    ///     .with_factor(Action::Workers, 1.5);
    /// assert_eq!(combo.equation(1.3), "1.3 × (1.2 × G_f + 1.5 × Q_w)");
    /// assert_eq!(combo.equation(1.0), "1.2 × G_f + 1.5 × Q_w");
    /// ```
    pub fn equation(&self, gamma_d: f64) -> String {
        let join = |terms: &[FactorTerm]| -> String {
            terms
                .iter()
                .map(|t| format!("{} × {}", format_factor(t.factor), t.action.code()))
                .collect::<Vec<_>>()
                .join(" + ")
        };

        let mut parts = Vec::new();
        if !self.amplified.is_empty() {
            let inner = join(&self.amplified);
            if gamma_d == 1.0 {
                parts.push(inner);
            } else {
                parts.push(format!("{} × ({})", format_factor(gamma_d), inner));
            }
        }
        if !self.unamplified.is_empty() {
            parts.push(join(&self.unamplified));
        }
        parts.join(" + ")
    }
}

fn format_factor(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// A combination evaluated for one stage and one member class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoredCombination {
    /// Combination identifier (e.g., "S2-B")
    pub name: String,

    /// Stage that produced this combination
    pub stage: Stage,

    /// Member class of the pass
    pub member_class: MemberClass,

    /// γ_d used on the amplified part
    pub gamma_d: f64,

    /// Equation with γ_d substituted
    pub equation: String,

    /// Factored vertical load (kPa)
    pub vertical_kpa: f64,

    /// Factored horizontal load (kN/m)
    pub horizontal_kn_m: f64,
}

/// Combinations per stage, iterated in stage order
pub type StageCombinations = BTreeMap<Stage, Vec<FactoredCombination>>;

/// Formula table for a stage
///
/// `Formulation::Auto` gives the simplified table here; the generator
/// resolves it against the actual actions first.
///
/// # Example
/// ```
/// use calc_core::loads::{stage_formulas, Stage};
/// use calc_core::settings::EngineSettings;
///
/// let table = stage_formulas(Stage::BeforePlacement, &EngineSettings::default());
/// assert_eq!(table.len(), 2);
/// assert_eq!(table[0].name, "S1-A");
/// ```
pub fn stage_formulas(stage: Stage, settings: &EngineSettings) -> Vec<LoadCombination> {
    let extended = settings.formulation == Formulation::Extended;
    let id = |letter: char| format!("S{}-{}", stage.number(), letter);

    match stage {
        Stage::BeforePlacement => {
            let mut table = vec![
                // Pure dead load, no γ_d
                LoadCombination::new(id('A'), stage)
                    .with_unamplified_factor(Action::FormworkSelfWeight, 1.35),
                construction(id('B'), stage, true),
            ];
            if extended {
                table.push(
                    construction(id('C'), stage, true)
                        .with_factor(Action::ServiceWind, 1.0)
                        .with_factor(Action::FlowingWater, 1.0)
                        .with_factor(Action::Other, 1.5),
                );
                table.push(
                    LoadCombination::new(id('D'), stage)
                        .with_factor(Action::FormworkSelfWeight, 1.2)
                        .with_unamplified_factor(Action::UltimateWind, 1.0),
                );
                table.push(
                    construction(id('E'), stage, true)
                        .with_unamplified_factor(Action::Impact, 1.1),
                );
            }
            table
        }
        Stage::DuringPlacement => {
            let mut table = vec![
                dead_with_concrete(id('A'), stage),
                construction(id('B'), stage, true),
            ];
            if extended {
                table.push(
                    construction(id('C'), stage, true)
                        .with_factor(Action::ServiceWind, 1.0)
                        .with_factor(Action::FlowingWater, 1.0)
                        .with_factor(Action::Other, 1.5)
                        .with_factor(Action::LateralConcretePressure, 1.0),
                );
                table.push(
                    construction(id('D'), stage, true)
                        .with_unamplified_factor(Action::Impact, 1.1),
                );
            }
            table
        }
        Stage::AfterPlacement => {
            let storage = settings.after_placement_includes_storage;
            let mut table = vec![
                dead_with_concrete(id('A'), stage),
                construction(id('B'), stage, storage),
            ];
            if extended {
                table.push(
                    construction(id('C'), stage, storage)
                        .with_factor(Action::ServiceWind, 1.0)
                        .with_factor(Action::FlowingWater, 1.0)
                        .with_factor(Action::Other, 1.5),
                );
                table.push(
                    LoadCombination::new(id('D'), stage)
                        .with_factor(Action::FormworkSelfWeight, 1.2)
                        .with_factor(Action::ConcreteSelfWeight, 1.2)
                        .with_unamplified_factor(Action::UltimateWind, 1.0),
                );
            }
            table
        }
    }
}

// 1.35 G_f + 1.35 G_c
fn dead_with_concrete(name: String, stage: Stage) -> LoadCombination {
    LoadCombination::new(name, stage)
        .with_factor(Action::FormworkSelfWeight, 1.35)
        .with_factor(Action::ConcreteSelfWeight, 1.35)
}

// 1.2 G_f (+ 1.2 G_c) + 1.5 Q_w (+ 1.5 Q_m), horizontal 1.5 Q_h
fn construction(name: String, stage: Stage, include_storage: bool) -> LoadCombination {
    let mut combo = LoadCombination::new(name, stage).with_factor(Action::FormworkSelfWeight, 1.2);
    if stage.carries_concrete() {
        combo = combo.with_factor(Action::ConcreteSelfWeight, 1.2);
    }
    combo = combo.with_factor(Action::Workers, 1.5);
    if include_storage {
        combo = combo.with_factor(Action::StoredMaterial, 1.5);
    }
    combo.with_horizontal_factor(Action::HorizontalImposed, 1.5)
}

/// Generate the factored combinations of one stage for one pass
///
/// Every formula of the stage is evaluated, even when all imposed loads are
/// zero, and equal results are kept.
///
/// # Example
/// ```
/// use calc_core::loads::{generate_combinations, ActionSet, Action, Amplification, MemberClass, Stage};
/// use calc_core::settings::EngineSettings;
///
/// let set = ActionSet::new("Stage 1").with_action(Action::FormworkSelfWeight, 0.5);
/// let combos = generate_combinations(
///     Stage::BeforePlacement,
///     &set,
///     Amplification::critical(1.3),
///     &EngineSettings::default(),
/// );
///
/// assert_eq!(combos.len(), 2);
/// assert!((combos[0].vertical_kpa - 0.675).abs() < 1e-9);
/// assert_eq!(combos[1].member_class, MemberClass::Critical);
/// ```
pub fn generate_combinations(
    stage: Stage,
    actions: &ActionSet,
    amplification: Amplification,
    settings: &EngineSettings,
) -> Vec<FactoredCombination> {
    let gamma_d = amplification.gamma_d();
    let formulation = settings.formulation.resolve(actions.has_secondary());
    stage_formulas(stage, &settings.with_formulation(formulation))
        .iter()
        .map(|combo| {
            let (vertical_kpa, horizontal_kn_m) = combo.apply(actions, gamma_d);
            debug!(
                combination = %combo.name,
                class = ?amplification.member_class(),
                vertical_kpa,
                horizontal_kn_m,
                "evaluated load combination"
            );
            FactoredCombination {
                name: combo.name.clone(),
                stage,
                member_class: amplification.member_class(),
                gamma_d,
                equation: combo.equation(gamma_d),
                vertical_kpa,
                horizontal_kn_m,
            }
        })
        .collect()
}

/// Generate combinations for every stage and every requested member class
///
/// Critical-pass combinations come first within each stage.
pub fn generate_stage_combinations(
    inputs: &LoadInputs,
    concrete: &ConcreteLoad,
    settings: &EngineSettings,
) -> StageCombinations {
    let mut passes = vec![Amplification::critical(settings.gamma_d)];
    if settings.member_classes == MemberClasses::CriticalAndNonCritical {
        passes.push(Amplification::non_critical());
    }

    Stage::ALL
        .iter()
        .map(|stage| {
            let actions = inputs.actions(*stage, concrete);
            let combos = passes
                .iter()
                .flat_map(|pass| generate_combinations(*stage, &actions, *pass, settings))
                .collect();
            (*stage, combos)
        })
        .collect()
}
