//! # Error Types
//!
//! Structured error types for calc_core. Every design-rule violation is
//! returned as a value carrying the constraint that failed, the limit and
//! the offending value, so a caller can render a precise message without
//! parsing strings.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_thickness(thickness_m: f64) -> CalcResult<()> {
//!     if thickness_m < 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "thickness_m".to_string(),
//!             value: thickness_m.to_string(),
//!             reason: "Thickness cannot be negative".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// The formwork constraint a design violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constraint {
    /// Span outside the system's admissible envelope
    SpanBounds,
    /// Slab thickness above what the system can carry
    ConcreteThickness,
    /// Design load above the resolved ultimate capacity
    VerticalCapacity,
    /// No standard joist spacing stays under the utilization ceiling
    SpacingUtilization,
}

impl Constraint {
    /// Human-readable name
    pub fn description(&self) -> &'static str {
        match self {
            Constraint::SpanBounds => "span bounds",
            Constraint::ConcreteThickness => "concrete thickness capacity",
            Constraint::VerticalCapacity => "vertical load capacity",
            Constraint::SpacingUtilization => "joist spacing utilization",
        }
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// A numeric input is outside its physically valid range
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Requested span is outside the system's admissible envelope
    #[error("Span {span_m} m is outside the {min_span_m}-{max_span_m} m range of {system}")]
    SpanOutOfRange {
        system: String,
        span_m: f64,
        min_span_m: f64,
        max_span_m: f64,
    },

    /// Design load or slab thickness exceeds the system capacity
    #[error("{system}: {constraint} exceeded ({value} > {limit})")]
    CapacityExceeded {
        system: String,
        constraint: Constraint,
        limit: f64,
        value: f64,
    },

    /// No standard joist spacing keeps utilization under the ceiling
    #[error("{system}: no standard joist spacing carries {design_load_kpa} kPa within {utilization_ceiling} utilization")]
    NoAdmissibleSpacing {
        system: String,
        design_load_kpa: f64,
        utilization_ceiling: f64,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a SpanOutOfRange error
    pub fn span_out_of_range(system: impl Into<String>, span_m: f64, min_span_m: f64, max_span_m: f64) -> Self {
        CalcError::SpanOutOfRange {
            system: system.into(),
            span_m,
            min_span_m,
            max_span_m,
        }
    }

    /// Create a CapacityExceeded error
    pub fn capacity_exceeded(system: impl Into<String>, constraint: Constraint, limit: f64, value: f64) -> Self {
        CalcError::CapacityExceeded {
            system: system.into(),
            constraint,
            limit,
            value,
        }
    }

    /// Create a NoAdmissibleSpacing error
    pub fn no_admissible_spacing(system: impl Into<String>, design_load_kpa: f64, utilization_ceiling: f64) -> Self {
        CalcError::NoAdmissibleSpacing {
            system: system.into(),
            design_load_kpa,
            utilization_ceiling,
        }
    }

    /// The formwork constraint behind this error, if it is a design-rule violation
    pub fn violated_constraint(&self) -> Option<Constraint> {
        match self {
            CalcError::SpanOutOfRange { .. } => Some(Constraint::SpanBounds),
            CalcError::CapacityExceeded { constraint, .. } => Some(*constraint),
            CalcError::NoAdmissibleSpacing { .. } => Some(Constraint::SpacingUtilization),
            _ => None,
        }
    }

    /// Whether the inputs were fine but the chosen system cannot carry them
    pub fn is_design_violation(&self) -> bool {
        self.violated_constraint().is_some()
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::SpanOutOfRange { .. } => "SPAN_OUT_OF_RANGE",
            CalcError::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            CalcError::NoAdmissibleSpacing { .. } => "NO_ADMISSIBLE_SPACING",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("thickness_m", "-0.2", "Thickness cannot be negative");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("test").error_code(), "MISSING_FIELD");
        assert_eq!(
            CalcError::span_out_of_range("System B", 5.0, 0.9, 3.0).error_code(),
            "SPAN_OUT_OF_RANGE"
        );
    }

    #[test]
    fn test_violated_constraint() {
        let err = CalcError::capacity_exceeded("System C", Constraint::ConcreteThickness, 1.0, 1.2);
        assert_eq!(err.violated_constraint(), Some(Constraint::ConcreteThickness));
        assert!(err.is_design_violation());

        let err = CalcError::no_admissible_spacing("System A", 15.0, 0.9);
        assert_eq!(err.violated_constraint(), Some(Constraint::SpacingUtilization));

        let err = CalcError::invalid_input("width_m", "0", "Width must be positive");
        assert_eq!(err.violated_constraint(), None);
        assert!(!err.is_design_violation());
    }

    #[test]
    fn test_message_carries_limits() {
        let err = CalcError::span_out_of_range("System B", 3.5, 0.9, 3.0);
        let msg = err.to_string();
        assert!(msg.contains("3.5"));
        assert!(msg.contains("System B"));
    }

    #[test]
    fn test_from_json_error() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: CalcError = parse.unwrap_err().into();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
