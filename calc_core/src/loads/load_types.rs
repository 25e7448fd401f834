//! Action (load type) definitions for slab formwork
//!
//! The actions a formwork deck sees during construction, each with the
//! symbol used in the combination equations.

use serde::{Deserialize, Serialize};

/// Actions on slab formwork
///
/// # Example
/// ```
/// use calc_core::loads::Action;
///
/// let gf = Action::FormworkSelfWeight;
/// assert_eq!(gf.code(), "G_f");
/// assert!(gf.is_permanent());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// G_f - Self-weight of the formwork
    FormworkSelfWeight,
    /// G_c - Self-weight of wet concrete and reinforcement
    ConcreteSelfWeight,
    /// Q_w - Workers, equipment and placement activity
    Workers,
    /// Q_m - Stacked or stored material
    StoredMaterial,
    /// Q_h - Horizontal imposed action
    HorizontalImposed,
    /// W_s - Service wind
    ServiceWind,
    /// W_u - Ultimate wind
    UltimateWind,
    /// F_w - Flowing water
    FlowingWater,
    /// Q_x - Other actions
    Other,
    /// P_c - Lateral concrete pressure
    LateralConcretePressure,
    /// I - Impact
    Impact,
}

impl Action {
    /// All actions in standard order
    pub const ALL: [Action; 11] = [
        Action::FormworkSelfWeight,
        Action::ConcreteSelfWeight,
        Action::Workers,
        Action::StoredMaterial,
        Action::HorizontalImposed,
        Action::ServiceWind,
        Action::UltimateWind,
        Action::FlowingWater,
        Action::Other,
        Action::LateralConcretePressure,
        Action::Impact,
    ];

    /// Actions only used by the extended formulation
    pub const SECONDARY: [Action; 7] = [
        Action::HorizontalImposed,
        Action::ServiceWind,
        Action::UltimateWind,
        Action::FlowingWater,
        Action::Other,
        Action::LateralConcretePressure,
        Action::Impact,
    ];

    /// Symbol used in combination equations
    pub fn code(&self) -> &'static str {
        match self {
            Action::FormworkSelfWeight => "G_f",
            Action::ConcreteSelfWeight => "G_c",
            Action::Workers => "Q_w",
            Action::StoredMaterial => "Q_m",
            Action::HorizontalImposed => "Q_h",
            Action::ServiceWind => "W_s",
            Action::UltimateWind => "W_u",
            Action::FlowingWater => "F_w",
            Action::Other => "Q_x",
            Action::LateralConcretePressure => "P_c",
            Action::Impact => "I",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Action::FormworkSelfWeight => "Formwork self-weight",
            Action::ConcreteSelfWeight => "Concrete self-weight",
            Action::Workers => "Workers and equipment",
            Action::StoredMaterial => "Stored material",
            Action::HorizontalImposed => "Horizontal imposed action",
            Action::ServiceWind => "Service wind",
            Action::UltimateWind => "Ultimate wind",
            Action::FlowingWater => "Flowing water",
            Action::Other => "Other actions",
            Action::LateralConcretePressure => "Lateral concrete pressure",
            Action::Impact => "Impact",
        }
    }

    /// Dead load (self-weight of formwork or concrete)
    pub fn is_permanent(&self) -> bool {
        matches!(self, Action::FormworkSelfWeight | Action::ConcreteSelfWeight)
    }

    /// Construction imposed load that varies by stage
    pub fn is_construction_imposed(&self) -> bool {
        matches!(self, Action::Workers | Action::StoredMaterial)
    }

    /// Only appears in the extended formulation
    pub fn is_secondary(&self) -> bool {
        Action::SECONDARY.contains(self)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
