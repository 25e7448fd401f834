//! Governing design load selection
//!
//! The design load is the largest vertical combination over all stages. When
//! both member classes are present only the critical class is considered.
//! Ties go to the earliest stage, then to the earliest combination within
//! that stage.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::combinations::{FactoredCombination, StageCombinations};
use super::{MemberClass, Stage};
use crate::errors::{CalcError, CalcResult};

/// The governing design load and where it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignLoad {
    /// Governing factored vertical load (kPa)
    pub value_kpa: f64,

    /// Stage that produced it
    pub governing_stage: Stage,

    /// Combination that produced it (e.g., "S2-B")
    pub governing_combination: String,

    /// Member class the selection was made over
    pub member_class: MemberClass,

    /// Equation of the governing combination
    pub equation: String,
}

/// Select the governing design load
///
/// # Example
/// ```
/// use calc_core::loads::{select_design_load, FactoredCombination, MemberClass, Stage, StageCombinations};
///
/// let combo = |stage: Stage, name: &str, value: f64| FactoredCombination {
///     name: name.to_string(),
///     stage,
///     member_class: MemberClass::Critical,
///     gamma_d: 1.3,
///     equation: String::new(),
///     vertical_kpa: value,
///     horizontal_kn_m: 0.0,
/// };
///
/// let mut per_stage = StageCombinations::new();
/// per_stage.insert(Stage::BeforePlacement, vec![combo(Stage::BeforePlacement, "S1-A", 4.0)]);
/// per_stage.insert(Stage::AfterPlacement, vec![combo(Stage::AfterPlacement, "S3-B", 12.0)]);
///
/// let design = select_design_load(&per_stage).unwrap();
/// assert_eq!(design.value_kpa, 12.0);
/// assert_eq!(design.governing_stage, Stage::AfterPlacement);
/// ```
pub fn select_design_load(per_stage: &StageCombinations) -> CalcResult<DesignLoad> {
    if per_stage.is_empty() {
        return Err(CalcError::invalid_input(
            "combinations",
            "{}",
            "At least one stage of combinations is required",
        ));
    }

    let has_critical = per_stage
        .values()
        .flatten()
        .any(|c| c.member_class == MemberClass::Critical);
    let class = if has_critical {
        MemberClass::Critical
    } else {
        MemberClass::NonCritical
    };

    select_for_class(per_stage, class)
}

/// Select the largest vertical combination of one member class
pub fn select_for_class(per_stage: &StageCombinations, class: MemberClass) -> CalcResult<DesignLoad> {
    let mut governing: Option<&FactoredCombination> = None;

    // BTreeMap iterates stages in enumeration order; only a strictly larger
    // value displaces the current pick
    for combo in per_stage
        .values()
        .flatten()
        .filter(|c| c.member_class == class)
    {
        match governing {
            Some(best) if combo.vertical_kpa <= best.vertical_kpa => {}
            _ => governing = Some(combo),
        }
    }

    let combo = governing.ok_or_else(|| {
        CalcError::invalid_input(
            "combinations",
            format!("{} stage(s)", per_stage.len()),
            format!("No {} combinations to select from", class.display_name().to_lowercase()),
        )
    })?;

    info!(
        design_load_kpa = combo.vertical_kpa,
        stage = %combo.stage,
        combination = %combo.name,
        "governing design load selected"
    );

    Ok(DesignLoad {
        value_kpa: combo.vertical_kpa,
        governing_stage: combo.stage,
        governing_combination: combo.name.clone(),
        member_class: class,
        equation: combo.equation.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::combinations::generate_stage_combinations;
    use crate::loads::{ConcreteLoad, ImposedLoads, LoadInputs};
    use crate::settings::EngineSettings;

    fn combo(stage: Stage, name: &str, class: MemberClass, value: f64) -> FactoredCombination {
        FactoredCombination {
            name: name.to_string(),
            stage,
            member_class: class,
            gamma_d: if class == MemberClass::Critical { 1.3 } else { 1.0 },
            equation: String::new(),
            vertical_kpa: value,
            horizontal_kn_m: 0.0,
        }
    }

    #[test]
    fn test_empty_mapping_fails() {
        let per_stage = StageCombinations::new();
        assert!(select_design_load(&per_stage).is_err());
    }

    #[test]
    fn test_mapping_without_combinations_fails() {
        let mut per_stage = StageCombinations::new();
        per_stage.insert(Stage::DuringPlacement, Vec::new());
        assert!(select_design_load(&per_stage).is_err());
    }

    #[test]
    fn test_tie_goes_to_earliest_stage() {
        let mut per_stage = StageCombinations::new();
        // Inserted out of order on purpose
        per_stage.insert(
            Stage::AfterPlacement,
            vec![combo(Stage::AfterPlacement, "S3-B", MemberClass::Critical, 10.0)],
        );
        per_stage.insert(
            Stage::DuringPlacement,
            vec![combo(Stage::DuringPlacement, "S2-B", MemberClass::Critical, 10.0)],
        );
        per_stage.insert(
            Stage::BeforePlacement,
            vec![combo(Stage::BeforePlacement, "S1-B", MemberClass::Critical, 3.0)],
        );

        let design = select_design_load(&per_stage).unwrap();
        assert_eq!(design.governing_stage, Stage::DuringPlacement);
        assert_eq!(design.governing_combination, "S2-B");
    }

    #[test]
    fn test_tie_within_stage_goes_to_first_combination() {
        let mut per_stage = StageCombinations::new();
        per_stage.insert(
            Stage::DuringPlacement,
            vec![
                combo(Stage::DuringPlacement, "S2-A", MemberClass::Critical, 8.0),
                combo(Stage::DuringPlacement, "S2-B", MemberClass::Critical, 8.0),
            ],
        );
        let design = select_design_load(&per_stage).unwrap();
        assert_eq!(design.governing_combination, "S2-A");
    }

    #[test]
    fn test_critical_class_preferred() {
        let mut per_stage = StageCombinations::new();
        per_stage.insert(
            Stage::DuringPlacement,
            vec![
                combo(Stage::DuringPlacement, "S2-B", MemberClass::Critical, 9.0),
                // Cannot happen with real passes, but the filter must hold
                combo(Stage::DuringPlacement, "S2-B", MemberClass::NonCritical, 20.0),
            ],
        );
        let design = select_design_load(&per_stage).unwrap();
        assert_eq!(design.value_kpa, 9.0);
        assert_eq!(design.member_class, MemberClass::Critical);
    }

    #[test]
    fn test_non_critical_only() {
        let mut per_stage = StageCombinations::new();
        per_stage.insert(
            Stage::BeforePlacement,
            vec![combo(Stage::BeforePlacement, "S1-B", MemberClass::NonCritical, 4.5)],
        );
        let design = select_design_load(&per_stage).unwrap();
        assert_eq!(design.member_class, MemberClass::NonCritical);
        assert_eq!(design.value_kpa, 4.5);
    }

    #[test]
    fn test_design_load_bounds_every_combination() {
        let inputs = LoadInputs::new(0.6, 0.3, 2.0)
            .with_imposed(Stage::BeforePlacement, ImposedLoads::new(1.0, 4.0))
            .with_imposed(Stage::DuringPlacement, ImposedLoads::new(2.0, 1.0))
            .with_imposed(Stage::AfterPlacement, ImposedLoads::new(1.0, 0.0));
        let settings = EngineSettings::default();
        let concrete = ConcreteLoad::compute(0.3, 2.0, &settings).unwrap();
        let per_stage = generate_stage_combinations(&inputs, &concrete, &settings);

        let design = select_design_load(&per_stage).unwrap();
        for c in per_stage.values().flatten().filter(|c| c.member_class == MemberClass::Critical) {
            assert!(design.value_kpa >= c.vertical_kpa);
        }
    }

    #[test]
    fn test_reference_scenario_governs_at_least_17_355() {
        let inputs = LoadInputs::new(0.5, 0.2, 1.0)
            .with_imposed(Stage::DuringPlacement, ImposedLoads::new(2.0, 2.5));
        let settings = EngineSettings::default();
        let concrete = ConcreteLoad::compute(0.2, 1.0, &settings).unwrap();
        let per_stage = generate_stage_combinations(&inputs, &concrete, &settings);

        let design = select_design_load(&per_stage).unwrap();
        assert!(design.value_kpa >= 17.355 - 1e-9);
        assert_eq!(design.governing_stage, Stage::DuringPlacement);
        assert_eq!(design.governing_combination, "S2-B");
    }

    #[test]
    fn test_select_for_class_non_critical() {
        let inputs = LoadInputs::new(0.5, 0.2, 1.0)
            .with_imposed(Stage::DuringPlacement, ImposedLoads::new(2.0, 2.5));
        let settings = EngineSettings::default();
        let concrete = ConcreteLoad::compute(0.2, 1.0, &settings).unwrap();
        let per_stage = generate_stage_combinations(&inputs, &concrete, &settings);

        let plain = select_for_class(&per_stage, MemberClass::NonCritical).unwrap();
        assert!((plain.value_kpa - 13.35).abs() < 1e-9);
    }
}
