//! # calc_core - Slab Formwork Load & Capacity Engine
//!
//! `calc_core` computes factored design loads for temporary concrete-slab
//! formwork across the construction sequence, then validates a chosen
//! formwork system against the governing load. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types carrying the violated constraint
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::evaluation::{evaluate, EvaluationRequest};
//! use calc_core::loads::{ImposedLoads, LoadInputs, Stage};
//!
//! let loads = LoadInputs::new(0.5, 0.2, 1.0)
//!     .with_imposed(Stage::DuringPlacement, ImposedLoads::new(2.0, 2.5));
//!
//! let report = evaluate(&EvaluationRequest::new(loads)).unwrap();
//! assert!((report.design_load.value_kpa - 17.355).abs() < 1e-9);
//!
//! let json = serde_json::to_string_pretty(&report).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`loads`] - Stages, actions, concrete load, combinations and governing load
//! - [`systems`] - Formwork system catalog
//! - [`calculations`] - Capacity validation and bill of materials
//! - [`evaluation`] - Full pipeline for one request
//! - [`settings`] - Engine settings
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod errors;
pub mod evaluation;
pub mod loads;
pub mod settings;
pub mod systems;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{estimate_bom, validate_formwork, BillOfMaterials, FormworkDesign, FormworkInput};
pub use errors::{CalcError, CalcResult, Constraint};
pub use evaluation::{evaluate, EvaluationReport, EvaluationRequest, FormworkRequest};
pub use loads::{compute_concrete_load, generate_combinations, select_design_load, DesignLoad, Stage};
pub use settings::EngineSettings;
pub use systems::{FormworkSystem, SupportConfiguration};
