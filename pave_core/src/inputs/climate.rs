//! Climate inputs.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::errors::{PaveError, PaveResult};
use crate::tabular::Sheet;

/// Site climate: temperatures in °C, rainfall in mm/year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimateData {
    /// Average temperature (°C)
    pub average_temperature_c: f64,

    /// Temperature variation (°C)
    pub temperature_variation_c: f64,

    /// Annual rainfall (mm)
    pub rainfall_mm: f64,
}

impl ClimateData {
    pub const AVERAGE_TEMPERATURE: &'static str = "Average_Temperature";
    pub const TEMPERATURE_VARIATION: &'static str = "Temperature_Variation";
    pub const RAINFALL: &'static str = "Rainfall";

    pub const COLUMNS: [&'static str; 3] = [
        Self::AVERAGE_TEMPERATURE,
        Self::TEMPERATURE_VARIATION,
        Self::RAINFALL,
    ];

    pub fn new(average_temperature_c: f64, temperature_variation_c: f64, rainfall_mm: f64) -> PaveResult<Self> {
        let climate = ClimateData {
            average_temperature_c,
            temperature_variation_c,
            rainfall_mm,
        };
        climate.validate()?;
        Ok(climate)
    }

    /// Validate input parameters.
    pub fn validate(&self) -> PaveResult<()> {
        for (field, value) in [
            ("average_temperature", self.average_temperature_c),
            ("temperature_variation", self.temperature_variation_c),
        ] {
            if !value.is_finite() {
                return Err(PaveError::invalid_input(field, value.to_string(), "Value must be finite"));
            }
        }
        if !self.rainfall_mm.is_finite() || self.rainfall_mm < 0.0 {
            return Err(PaveError::invalid_input(
                "rainfall",
                self.rainfall_mm.to_string(),
                "Rainfall cannot be negative",
            ));
        }
        Ok(())
    }

    /// Build from the first data row of a climate sheet.
    pub fn from_sheet(sheet: &Sheet) -> PaveResult<Self> {
        Self::read_sheet(sheet)
            .inspect(|_| info!("ClimateData loaded successfully from sheet '{}'.", sheet.name))
            .inspect_err(|e| error!("Error creating ClimateData from sheet '{}': {}", sheet.name, e))
    }

    fn read_sheet(sheet: &Sheet) -> PaveResult<Self> {
        Self::new(
            sheet.first_f64(Self::AVERAGE_TEMPERATURE)?,
            sheet.first_f64(Self::TEMPERATURE_VARIATION)?,
            sheet.first_f64(Self::RAINFALL)?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::Cell;

    #[test]
    fn test_from_sheet_roundtrip() {
        let sheet = Sheet::new(
            "Climate",
            ClimateData::COLUMNS.iter().map(|c| c.to_string()).collect(),
            vec![vec![Cell::Number(15.0), Cell::Number(10.0), Cell::Number(500.0)]],
        );
        let climate = ClimateData::from_sheet(&sheet).unwrap();
        assert_eq!(climate, ClimateData::new(15.0, 10.0, 500.0).unwrap());
    }

    #[test]
    fn test_missing_rainfall() {
        let sheet = Sheet::new(
            "Climate",
            vec!["Average_Temperature".into(), "Temperature_Variation".into()],
            vec![vec![Cell::Number(15.0), Cell::Number(10.0)]],
        );
        assert_eq!(ClimateData::from_sheet(&sheet).unwrap_err(), PaveError::missing_field("Rainfall"));
    }

    #[test]
    fn test_negative_rainfall_rejected() {
        assert!(ClimateData::new(15.0, 10.0, -1.0).is_err());
        // Sub-zero temperatures are ordinary inputs
        assert!(ClimateData::new(-12.0, 30.0, 0.0).is_ok());
    }
}
