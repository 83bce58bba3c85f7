//! Subgrade inputs.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::errors::{PaveError, PaveResult};
use crate::tabular::Sheet;

/// Subgrade support: modulus of subgrade reaction and California Bearing Ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubgradeProperties {
    /// Modulus of subgrade reaction (kPa/m)
    pub modulus: f64,

    /// California Bearing Ratio (%)
    pub cbr: f64,
}

impl SubgradeProperties {
    pub const MODULUS: &'static str = "Modulus";
    pub const CBR: &'static str = "CBR";

    pub const COLUMNS: [&'static str; 2] = [Self::MODULUS, Self::CBR];

    pub fn new(modulus: f64, cbr: f64) -> PaveResult<Self> {
        let subgrade = SubgradeProperties { modulus, cbr };
        subgrade.validate()?;
        Ok(subgrade)
    }

    /// Validate input parameters.
    ///
    /// The modulus divides every rutting term, so it must be positive.
    pub fn validate(&self) -> PaveResult<()> {
        if !self.modulus.is_finite() || self.modulus <= 0.0 {
            return Err(PaveError::invalid_input(
                "modulus",
                self.modulus.to_string(),
                "Subgrade modulus must be positive",
            ));
        }
        if !self.cbr.is_finite() || self.cbr < 0.0 {
            return Err(PaveError::invalid_input("cbr", self.cbr.to_string(), "CBR cannot be negative"));
        }
        Ok(())
    }

    /// Build from the first data row of a subgrade sheet.
    pub fn from_sheet(sheet: &Sheet) -> PaveResult<Self> {
        Self::read_sheet(sheet)
            .inspect(|_| info!("SubgradeProperties loaded successfully from sheet '{}'.", sheet.name))
            .inspect_err(|e| error!("Error creating SubgradeProperties from sheet '{}': {}", sheet.name, e))
    }

    fn read_sheet(sheet: &Sheet) -> PaveResult<Self> {
        Self::new(sheet.first_f64(Self::MODULUS)?, sheet.first_f64(Self::CBR)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::Cell;

    #[test]
    fn test_from_sheet_roundtrip() {
        let sheet = Sheet::new(
            "Subgrade",
            vec!["Modulus".into(), "CBR".into()],
            vec![vec![Cell::Number(3000.0), Cell::Text("10".into())]],
        );
        let subgrade = SubgradeProperties::from_sheet(&sheet).unwrap();
        assert_eq!(subgrade.modulus, 3000.0);
        assert_eq!(subgrade.cbr, 10.0);
    }

    #[test]
    fn test_zero_modulus_rejected() {
        let err = SubgradeProperties::new(0.0, 10.0).unwrap_err();
        assert!(err.to_string().contains("modulus"));
    }
}
