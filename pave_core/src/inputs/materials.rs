//! Paving material inputs.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::errors::{PaveError, PaveResult};
use crate::tabular::Sheet;

/// Material properties of the paving courses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Asphalt modulus (MPa)
    pub asphalt_modulus_mpa: f64,

    /// Concrete strength (MPa)
    pub concrete_strength_mpa: f64,

    /// Thermal coefficient (1/°C)
    pub thermal_coeff: f64,
}

impl MaterialProperties {
    pub const ASPHALT_MODULUS: &'static str = "Asphalt_Modulus";
    pub const CONCRETE_STRENGTH: &'static str = "Concrete_Strength";
    pub const THERMAL_COEFF: &'static str = "Thermal_Coeff";

    pub const COLUMNS: [&'static str; 3] = [
        Self::ASPHALT_MODULUS,
        Self::CONCRETE_STRENGTH,
        Self::THERMAL_COEFF,
    ];

    pub fn new(asphalt_modulus_mpa: f64, concrete_strength_mpa: f64, thermal_coeff: f64) -> PaveResult<Self> {
        let materials = MaterialProperties {
            asphalt_modulus_mpa,
            concrete_strength_mpa,
            thermal_coeff,
        };
        materials.validate()?;
        Ok(materials)
    }

    /// Validate input parameters.
    ///
    /// The asphalt modulus divides every fatigue term, so it must be positive.
    pub fn validate(&self) -> PaveResult<()> {
        if !self.asphalt_modulus_mpa.is_finite() || self.asphalt_modulus_mpa <= 0.0 {
            return Err(PaveError::invalid_input(
                "asphalt_modulus",
                self.asphalt_modulus_mpa.to_string(),
                "Asphalt modulus must be positive",
            ));
        }
        if !self.concrete_strength_mpa.is_finite() || self.concrete_strength_mpa < 0.0 {
            return Err(PaveError::invalid_input(
                "concrete_strength",
                self.concrete_strength_mpa.to_string(),
                "Concrete strength cannot be negative",
            ));
        }
        if !self.thermal_coeff.is_finite() {
            return Err(PaveError::invalid_input(
                "thermal_coeff",
                self.thermal_coeff.to_string(),
                "Thermal coefficient must be finite",
            ));
        }
        Ok(())
    }

    /// Build from the first data row of a materials sheet.
    pub fn from_sheet(sheet: &Sheet) -> PaveResult<Self> {
        Self::read_sheet(sheet)
            .inspect(|_| info!("MaterialProperties loaded successfully from sheet '{}'.", sheet.name))
            .inspect_err(|e| error!("Error creating MaterialProperties from sheet '{}': {}", sheet.name, e))
    }

    fn read_sheet(sheet: &Sheet) -> PaveResult<Self> {
        Self::new(
            sheet.first_f64(Self::ASPHALT_MODULUS)?,
            sheet.first_f64(Self::CONCRETE_STRENGTH)?,
            sheet.first_f64(Self::THERMAL_COEFF)?,
        )
    }
}
