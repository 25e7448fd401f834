//! Concrete self-weight model
//!
//! G_c = ρ·t + k·r·t, where ρ is the concrete unit weight (kN/m³), t the
//! slab thickness (m), r the reinforcement ratio (%) and k the additional
//! weight per percent of reinforcement.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::settings::EngineSettings;
use crate::units::{KnPerM3, Meters};

/// Concrete self-weight load for one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcreteLoad {
    /// Slab thickness t (m)
    pub thickness_m: f64,

    /// Reinforcement ratio r (%)
    pub reinforcement_pct: f64,

    /// Unit weight ρ used (kN/m³)
    pub unit_weight_kn_m3: f64,

    /// G_c (kPa)
    pub value_kpa: f64,
}

impl ConcreteLoad {
    /// Compute G_c with the unit weight and reinforcement factor from `settings`
    ///
    /// # Example
    /// ```
    /// use calc_core::loads::ConcreteLoad;
    /// use calc_core::settings::EngineSettings;
    ///
    /// let gc = ConcreteLoad::compute(0.2, 1.0, &EngineSettings::default()).unwrap();
    /// // 24.5 × 0.2 + 0.5 × 1.0 × 0.2 = 4.9 + 0.1
    /// assert!((gc.value_kpa - 5.0).abs() < 1e-9);
    /// ```
    pub fn compute(thickness_m: f64, reinforcement_pct: f64, settings: &EngineSettings) -> CalcResult<Self> {
        if !(thickness_m >= 0.0) {
            return Err(CalcError::invalid_input(
                "thickness_m",
                thickness_m.to_string(),
                "Thickness cannot be negative",
            ));
        }
        if !(reinforcement_pct >= 0.0) {
            return Err(CalcError::invalid_input(
                "reinforcement_pct",
                reinforcement_pct.to_string(),
                "Reinforcement ratio cannot be negative",
            ));
        }

        let thickness = Meters(thickness_m);
        let concrete = KnPerM3(settings.concrete_unit_weight_kn_m3).over_depth(thickness);
        let reinforcement =
            KnPerM3(settings.reinforcement_weight_factor * reinforcement_pct).over_depth(thickness);

        Ok(ConcreteLoad {
            thickness_m,
            reinforcement_pct,
            unit_weight_kn_m3: settings.concrete_unit_weight_kn_m3,
            value_kpa: (concrete + reinforcement).value(),
        })
    }
}

/// Compute G_c (kPa) with the default unit weight of 24.5 kN/m³
///
/// # Example
/// ```
/// use calc_core::loads::compute_concrete_load;
///
/// let gc = compute_concrete_load(0.25, 0.0).unwrap();
/// assert!((gc - 6.125).abs() < 1e-9);
/// ```
pub fn compute_concrete_load(thickness_m: f64, reinforcement_pct: f64) -> CalcResult<f64> {
    ConcreteLoad::compute(thickness_m, reinforcement_pct, &EngineSettings::default())
        .map(|load| load.value_kpa)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_value() {
        let gc = compute_concrete_load(0.2, 1.0).unwrap();
        assert!((gc - 5.0).abs() < 1e-9, "gc = {}", gc);
    }

    #[test]
    fn test_alternate_unit_weight() {
        let settings = EngineSettings::default().with_concrete_unit_weight(24.0);
        let gc = ConcreteLoad::compute(0.2, 1.0, &settings).unwrap();
        // 24.0 × 0.2 + 0.5 × 1.0 × 0.2 = 4.8 + 0.1
        assert!((gc.value_kpa - 4.9).abs() < 1e-9);
        assert_eq!(gc.unit_weight_kn_m3, 24.0);
    }

    #[test]
    fn test_no_reinforcement() {
        let gc = compute_concrete_load(0.3, 0.0).unwrap();
        assert!((gc - 7.35).abs() < 1e-9);
    }

    #[test]
    fn test_zero_thickness_is_zero_load() {
        let gc = compute_concrete_load(0.0, 2.0).unwrap();
        assert_eq!(gc, 0.0);
    }

    #[test]
    fn test_negative_inputs_rejected() {
        assert!(compute_concrete_load(-0.1, 1.0).is_err());
        assert!(compute_concrete_load(0.2, -1.0).is_err());
    }

    #[test]
    fn test_reinforcement_scales_with_thickness() {
        let thin = compute_concrete_load(0.1, 2.0).unwrap() - compute_concrete_load(0.1, 0.0).unwrap();
        let thick = compute_concrete_load(0.4, 2.0).unwrap() - compute_concrete_load(0.4, 0.0).unwrap();
        assert!((thin - 0.1).abs() < 1e-9);
        assert!((thick - 0.4).abs() < 1e-9);
    }
}
