//! # Evaluation Pipeline
//!
//! Runs one request through the whole engine and packages every
//! intermediate result into an [`EvaluationReport`].
//!
//! ```text
//! EvaluationRequest
//! ├── settings: EngineSettings
//! ├── loads: LoadInputs ──► ConcreteLoad ──► StageCombinations ──► DesignLoad
//! └── formwork: FormworkRequest? ─────────────────────────────────► FormworkDesign ──► BillOfMaterials
//! ```
//!
//! A design that breaks a formwork rule is reported as
//! [`DesignOutcome::Rejected`] alongside the load results. Invalid inputs
//! fail the whole evaluation.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::evaluation::{evaluate, EvaluationRequest, FormworkRequest};
//! use calc_core::loads::{ImposedLoads, LoadInputs, Stage};
//! use calc_core::systems::FormworkSystem;
//!
//! let request = EvaluationRequest::new(
//!     LoadInputs::new(0.5, 0.2, 1.0)
//!         .with_imposed(Stage::DuringPlacement, ImposedLoads::new(2.0, 2.5)),
//! )
//! .with_formwork(FormworkRequest::new(FormworkSystem::SystemC, 3.0, 6.0));
//!
//! let report = evaluate(&request).unwrap();
//! assert_eq!(report.design_load.governing_stage, Stage::DuringPlacement);
//! assert!(report.accepted_design().is_some());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculations::{estimate_bom, validate_formwork, BillOfMaterials, FormworkDesign, FormworkInput};
use crate::errors::{CalcError, CalcResult};
use crate::loads::{
    generate_stage_combinations, select_design_load, select_for_class, ConcreteLoad, DesignLoad, LoadInputs,
    MemberClass, StageCombinations,
};
use crate::settings::EngineSettings;
use crate::systems::{FormworkSystem, SupportConfiguration};

/// Current schema version for report JSON
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Formwork system choice for an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormworkRequest {
    pub system: FormworkSystem,

    /// Mid-support arrangement (required for System A)
    #[serde(default)]
    pub support: Option<SupportConfiguration>,

    /// Bay span (m)
    pub span_m: f64,

    /// Bay width (m)
    pub width_m: f64,

    /// Check against this load instead of the governing load (kPa)
    #[serde(default)]
    pub design_load_kpa: Option<f64>,
}

impl FormworkRequest {
    /// Create a request for a system without a support arrangement
    pub fn new(system: FormworkSystem, span_m: f64, width_m: f64) -> Self {
        FormworkRequest {
            system,
            support: None,
            span_m,
            width_m,
            design_load_kpa: None,
        }
    }

    /// Set the mid-support arrangement (builder pattern)
    pub fn with_support(mut self, support: SupportConfiguration) -> Self {
        self.support = Some(support);
        self
    }

    /// Check against a fixed design load (builder pattern)
    pub fn with_design_load(mut self, design_load_kpa: f64) -> Self {
        self.design_load_kpa = Some(design_load_kpa);
        self
    }
}

/// One evaluation request.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Level 3 slab",
///   "engineer": "J. Smith",
///   "job_id": "26-014",
///   "settings": { "formulation": "Extended" },
///   "loads": {
///     "formwork_self_weight_kpa": 0.5,
///     "concrete_thickness_m": 0.2,
///     "reinforcement_pct": 1.0,
///     "during_placement": { "workers_kpa": 2.0, "stored_material_kpa": 2.5 }
///   },
///   "formwork": {
///     "system": "SystemA",
///     "support": "TripleMidSupport",
///     "span_m": 2.4,
///     "width_m": 4.0
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub engineer: String,

    #[serde(default)]
    pub job_id: String,

    #[serde(default)]
    pub settings: EngineSettings,

    pub loads: LoadInputs,

    /// Formwork check, skipped when absent
    #[serde(default)]
    pub formwork: Option<FormworkRequest>,
}

impl EvaluationRequest {
    /// Create a load-only request with default settings
    pub fn new(loads: LoadInputs) -> Self {
        EvaluationRequest {
            label: String::new(),
            engineer: String::new(),
            job_id: String::new(),
            settings: EngineSettings::default(),
            loads,
            formwork: None,
        }
    }

    /// Set the label (builder pattern)
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set engineer and job number (builder pattern)
    pub fn with_job(mut self, engineer: impl Into<String>, job_id: impl Into<String>) -> Self {
        self.engineer = engineer.into();
        self.job_id = job_id.into();
        self
    }

    /// Set engine settings (builder pattern)
    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Add a formwork check (builder pattern)
    pub fn with_formwork(mut self, formwork: FormworkRequest) -> Self {
        self.formwork = Some(formwork);
        self
    }
}

/// Report metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub id: Uuid,

    /// Schema version for compatibility checking
    pub version: String,

    pub label: String,
    pub engineer: String,
    pub job_id: String,
    pub created: DateTime<Utc>,
}

/// Outcome of the formwork check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum DesignOutcome {
    /// Every check passed
    Accepted(FormworkDesign),
    /// A design rule was violated
    Rejected { error: CalcError },
}

/// Everything one evaluation produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub meta: ReportMetadata,

    /// Settings the evaluation ran with
    pub settings: EngineSettings,

    pub concrete_load: ConcreteLoad,

    /// Every combination, per stage
    pub combinations: StageCombinations,

    /// Governing load over the critical class
    pub design_load: DesignLoad,

    /// Governing load over the non-critical class, when it was evaluated
    #[serde(default)]
    pub non_critical_design_load: Option<DesignLoad>,

    #[serde(default)]
    pub design: Option<DesignOutcome>,

    #[serde(default)]
    pub bill_of_materials: Option<BillOfMaterials>,
}

impl EvaluationReport {
    /// The accepted formwork design, if any
    pub fn accepted_design(&self) -> Option<&FormworkDesign> {
        match &self.design {
            Some(DesignOutcome::Accepted(design)) => Some(design),
            _ => None,
        }
    }

    /// The design-rule violation, if the formwork check failed
    pub fn rejection(&self) -> Option<&CalcError> {
        match &self.design {
            Some(DesignOutcome::Rejected { error }) => Some(error),
            _ => None,
        }
    }
}

/// Run the full pipeline for one request
///
/// # Returns
///
/// * `Ok(EvaluationReport)` - Load results, plus the formwork outcome when requested
/// * `Err(CalcError)` - Invalid settings, loads or formwork inputs
pub fn evaluate(request: &EvaluationRequest) -> CalcResult<EvaluationReport> {
    let settings = request.settings;
    settings.validate()?;
    request.loads.validate()?;
    request.loads.validate_formulation(&settings)?;

    let concrete = ConcreteLoad::compute(
        request.loads.concrete_thickness_m,
        request.loads.reinforcement_pct,
        &settings,
    )?;
    let combinations = generate_stage_combinations(&request.loads, &concrete, &settings);
    let design_load = select_design_load(&combinations)?;

    let has_non_critical = combinations
        .values()
        .flatten()
        .any(|c| c.member_class == MemberClass::NonCritical);
    let non_critical_design_load = if has_non_critical {
        Some(select_for_class(&combinations, MemberClass::NonCritical)?)
    } else {
        None
    };

    let (design, bill_of_materials) = match &request.formwork {
        Some(formwork) => {
            let input = FormworkInput {
                system: formwork.system,
                support: formwork.support,
                span_m: formwork.span_m,
                width_m: formwork.width_m,
                design_load_kpa: formwork.design_load_kpa.unwrap_or(design_load.value_kpa),
                concrete_thickness_m: request.loads.concrete_thickness_m,
            };
            match validate_formwork(&input) {
                Ok(accepted) => {
                    let bom = estimate_bom(&accepted);
                    (Some(DesignOutcome::Accepted(accepted)), Some(bom))
                }
                Err(error) if error.is_design_violation() => {
                    warn!(system = %formwork.system, code = error.error_code(), "formwork design rejected: {}", error);
                    (Some(DesignOutcome::Rejected { error }), None)
                }
                Err(error) => return Err(error),
            }
        }
        None => (None, None),
    };

    let report = EvaluationReport {
        meta: ReportMetadata {
            id: Uuid::new_v4(),
            version: SCHEMA_VERSION.to_string(),
            label: request.label.clone(),
            engineer: request.engineer.clone(),
            job_id: request.job_id.clone(),
            created: Utc::now(),
        },
        settings,
        concrete_load: concrete,
        combinations,
        design_load,
        non_critical_design_load,
        design,
        bill_of_materials,
    };

    info!(id = %report.meta.id, design_load_kpa = report.design_load.value_kpa, "evaluation complete");
    Ok(report)
}
