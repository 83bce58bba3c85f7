//! # Distress Prediction
//!
//! Three independent closed-form predictors and the orchestration that runs
//! them together.
//!
//! | Distress | Formula | Unit |
//! |---|---|---|
//! | Fatigue cracking | Σ<sub>year, load</sub> (L·(1+g)<sup>y</sup> / E<sub>ac</sub>)<sup>3</sup> | damage (unitless) |
//! | Rutting | Σ<sub>year, load</sub> (L·(1+g)<sup>y</sup> / M<sub>r</sub>) · (rain / 1000) | mm |
//! | Thermal cracking | α · ΔT | index |
//!
//! The formulas are placeholders without calibration. They do not trap a
//! zero modulus: records built through their validating constructors cannot
//! carry one, but a record built field-by-field can, and the division then
//! yields `inf`/`NaN` which flows through to the report unchanged.
//!
//! ## Example
//!
//! ```rust
//! use pave_core::inputs::ManualInput;
//! use pave_core::pavement::PavementDesign;
//! use pave_core::performance::design_new_pavement;
//!
//! let inputs = ManualInput::default().into_inputs().unwrap();
//! let result = design_new_pavement(&PavementDesign::default(), &inputs);
//! println!("Rutting: {:.4} mm", result.rutting);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::inputs::{ClimateData, InputData, MaterialProperties, SubgradeProperties, TrafficData};
use crate::pavement::PavementDesign;

/// Named distress metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistressKind {
    FatigueCracking,
    Rutting,
    ThermalCracking,
}

impl DistressKind {
    /// Fixed report order
    pub const ALL: [DistressKind; 3] = [
        DistressKind::FatigueCracking,
        DistressKind::Rutting,
        DistressKind::ThermalCracking,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            DistressKind::FatigueCracking => "Fatigue Cracking",
            DistressKind::Rutting => "Rutting",
            DistressKind::ThermalCracking => "Thermal Cracking",
        }
    }
}

impl std::fmt::Display for DistressKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Output of one simulation run.
///
/// The key set is fixed by the type, so consumers can index it by name
/// ([`DistressResult::get`]) or by position ([`DistressResult::entries`]).
///
/// ## JSON Example
///
/// ```json
/// {
///   "Fatigue Cracking": 0.0029,
///   "Rutting": 0.9720,
///   "Thermal Cracking": 0.001
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistressResult {
    #[serde(rename = "Fatigue Cracking")]
    pub fatigue_cracking: f64,
    #[serde(rename = "Rutting")]
    pub rutting: f64,
    #[serde(rename = "Thermal Cracking")]
    pub thermal_cracking: f64,
}

impl DistressResult {
    pub fn get(&self, kind: DistressKind) -> f64 {
        match kind {
            DistressKind::FatigueCracking => self.fatigue_cracking,
            DistressKind::Rutting => self.rutting,
            DistressKind::ThermalCracking => self.thermal_cracking,
        }
    }

    /// All metrics in fixed order: fatigue, rutting, thermal
    pub fn entries(&self) -> [(DistressKind, f64); 3] {
        DistressKind::ALL.map(|kind| (kind, self.get(kind)))
    }
}

/// Total fatigue damage over the analysis period.
///
/// Each projected load contributes `(load / asphalt_modulus)^3`.
pub fn predict_fatigue_cracking(traffic: &TrafficData, materials: &MaterialProperties) -> f64 {
    let mut total_damage = 0.0;
    for (year, load) in traffic.scaled_loads() {
        let damage = (load / materials.asphalt_modulus_mpa).powi(3);
        total_damage += damage;
        debug!("Year {}, Load {} kN: Damage {}", year + 1, load, damage);
    }
    info!("Total Fatigue Damage: {}", total_damage);
    total_damage
}

/// Total rut depth (mm) over the analysis period.
///
/// Each projected load contributes `(load / subgrade_modulus) * (rainfall / 1000)`.
pub fn predict_rutting(traffic: &TrafficData, climate: &ClimateData, subgrade: &SubgradeProperties) -> f64 {
    let rain_factor = climate.rainfall_mm / 1000.0;
    let mut total_rut = 0.0;
    for (year, load) in traffic.scaled_loads() {
        let rut = (load / subgrade.modulus) * rain_factor;
        total_rut += rut;
        debug!("Year {}, Load {} kN: Rut {} mm", year + 1, load, rut);
    }
    info!("Total Rutting: {} mm", total_rut);
    total_rut
}

/// Thermal cracking index: `thermal_coeff * temperature_variation`.
pub fn predict_thermal_cracking(climate: &ClimateData, materials: &MaterialProperties) -> f64 {
    let index = materials.thermal_coeff * climate.temperature_variation_c;
    info!("Thermal Cracking Index: {}", index);
    index
}

/// Run all three predictors against one set of inputs.
///
/// The design is accepted for interface stability; the current predictors
/// do not read layer data.
pub fn design_new_pavement(_design: &PavementDesign, inputs: &InputData) -> DistressResult {
    let result = DistressResult {
        fatigue_cracking: predict_fatigue_cracking(&inputs.traffic, &inputs.materials),
        rutting: predict_rutting(&inputs.traffic, &inputs.climate, &inputs.subgrade),
        thermal_cracking: predict_thermal_cracking(&inputs.climate, &inputs.materials),
    };
    info!("Pavement design simulation completed.");
    result
}

/// Evaluate an existing pavement. Currently identical to [`design_new_pavement`].
pub fn evaluate_performance(design: &PavementDesign, inputs: &InputData) -> DistressResult {
    info!("Evaluating pavement performance.");
    design_new_pavement(design, inputs)
}
