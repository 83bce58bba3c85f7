//! # Design Inputs
//!
//! The four input records a simulation needs, and the two ways to build
//! them:
//!
//! - [`InputData::from_workbook`] - a workbook with `Traffic`, `Climate`,
//!   `Subgrade` and `Materials` sheets (or their `Sheet1`..`Sheet4` aliases)
//! - [`ManualInput::into_inputs`] - form-style values, with percentages typed
//!   as 0-100 and axle loads as a comma-separated list
//!
//! Both paths validate every record before anything is returned, so a
//! failed load never yields a partial set.
//!
//! ## Example
//!
//! ```rust
//! use pave_core::inputs::ManualInput;
//!
//! let inputs = ManualInput::default().into_inputs().unwrap();
//! assert_eq!(inputs.traffic.axle_loads_kn, vec![80.0, 100.0, 120.0]);
//! assert!((inputs.traffic.growth_rate - 0.02).abs() < 1e-12);
//! ```

pub mod climate;
pub mod materials;
pub mod subgrade;
pub mod traffic;

pub use climate::ClimateData;
pub use materials::MaterialProperties;
pub use subgrade::SubgradeProperties;
pub use traffic::{TrafficData, MAX_ANALYSIS_PERIOD_YEARS};

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{PaveError, PaveResult};
use crate::tabular::{Sheet, Workbook};
use crate::units::Percent;

/// Expected sheet names with the alias accepted in their place
pub const SHEETS: [(&str, &str); 4] = [
    ("Traffic", "Sheet1"),
    ("Climate", "Sheet2"),
    ("Subgrade", "Sheet3"),
    ("Materials", "Sheet4"),
];

/// A complete, validated set of simulation inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputData {
    pub traffic: TrafficData,
    pub climate: ClimateData,
    pub subgrade: SubgradeProperties,
    pub materials: MaterialProperties,
}

impl InputData {
    /// Build all four records from a workbook.
    ///
    /// Each sheet is looked up by its name first, then by its `SheetN` alias.
    /// A sheet missing under both names fails with
    /// [`PaveError::SheetNotFound`] naming the expected sheet.
    pub fn from_workbook(workbook: &Workbook) -> PaveResult<Self> {
        let [traffic, climate, subgrade, materials] = SHEETS;
        Ok(InputData {
            traffic: TrafficData::from_sheet(resolve_sheet(workbook, traffic)?)?,
            climate: ClimateData::from_sheet(resolve_sheet(workbook, climate)?)?,
            subgrade: SubgradeProperties::from_sheet(resolve_sheet(workbook, subgrade)?)?,
            materials: MaterialProperties::from_sheet(resolve_sheet(workbook, materials)?)?,
        })
    }

    /// Open a workbook file (or CSV directory) and build the inputs from it.
    pub fn load(path: &Path) -> PaveResult<Self> {
        let workbook = Workbook::open(path)?;
        Self::from_workbook(&workbook)
    }
}

fn resolve_sheet<'a>(workbook: &'a Workbook, (name, alias): (&str, &str)) -> PaveResult<&'a Sheet> {
    if let Some(sheet) = workbook.get(name) {
        return Ok(sheet);
    }
    match workbook.get(alias) {
        Some(sheet) => {
            warn!("Sheet '{}' not found; using '{}' in its place.", name, alias);
            Ok(sheet)
        }
        None => Err(PaveError::sheet_not_found(name)),
    }
}

/// Form-style manual entry.
///
/// Defaults match the values pre-filled in the entry form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualInput {
    /// Comma-separated axle loads in kN (e.g. "80, 100, 120")
    pub axle_loads: String,
    /// Traffic growth rate, % per annum (0-100)
    pub traffic_growth_rate_pct: Percent,
    /// Analysis period in years
    pub analysis_period_years: u32,
    pub average_temperature_c: f64,
    pub temperature_variation_c: f64,
    pub rainfall_mm: f64,
    pub subgrade_modulus: f64,
    pub cbr: f64,
    pub asphalt_modulus_mpa: f64,
    pub concrete_strength_mpa: f64,
    pub thermal_coeff: f64,
}

impl Default for ManualInput {
    fn default() -> Self {
        ManualInput {
            axle_loads: "80, 100, 120".to_string(),
            traffic_growth_rate_pct: Percent(2.0),
            analysis_period_years: 20,
            average_temperature_c: 15.0,
            temperature_variation_c: 10.0,
            rainfall_mm: 500.0,
            subgrade_modulus: 3000.0,
            cbr: 10.0,
            asphalt_modulus_mpa: 3000.0,
            concrete_strength_mpa: 30.0,
            thermal_coeff: 0.0001,
        }
    }
}

impl ManualInput {
    /// Convert the form values into validated input records.
    pub fn into_inputs(&self) -> PaveResult<InputData> {
        let growth = self
            .traffic_growth_rate_pct
            .to_fraction_checked("traffic_growth_rate")?;

        Ok(InputData {
            traffic: TrafficData::new(parse_axle_loads(&self.axle_loads)?, growth.0, self.analysis_period_years)?,
            climate: ClimateData::new(self.average_temperature_c, self.temperature_variation_c, self.rainfall_mm)?,
            subgrade: SubgradeProperties::new(self.subgrade_modulus, self.cbr)?,
            materials: MaterialProperties::new(
                self.asphalt_modulus_mpa,
                self.concrete_strength_mpa,
                self.thermal_coeff,
            )?,
        })
    }
}

/// Parse a comma-separated axle-load list. Every entry must be numeric.
pub fn parse_axle_loads(text: &str) -> PaveResult<Vec<f64>> {
    text.split(',')
        .map(|item| {
            let item = item.trim();
            item.parse::<f64>()
                .map_err(|_| PaveError::invalid_input("axle_loads", item, "Axle loads must be numeric"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::Cell;

    fn headers(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    fn sample_workbook(traffic_name: &str) -> Workbook {
        Workbook::new(vec![
            Sheet::new(
                traffic_name,
                headers(&TrafficData::COLUMNS),
                vec![
                    vec![Cell::Number(80.0), Cell::Number(0.02), Cell::Number(20.0)],
                    vec![Cell::Number(100.0), Cell::Empty, Cell::Empty],
                    vec![Cell::Number(120.0), Cell::Empty, Cell::Empty],
                ],
            ),
            Sheet::new(
                "Climate",
                headers(&ClimateData::COLUMNS),
                vec![vec![Cell::Number(15.0), Cell::Number(10.0), Cell::Number(500.0)]],
            ),
            Sheet::new(
                "Subgrade",
                headers(&SubgradeProperties::COLUMNS),
                vec![vec![Cell::Number(3000.0), Cell::Number(10.0)]],
            ),
            Sheet::new(
                "Materials",
                headers(&MaterialProperties::COLUMNS),
                vec![vec![Cell::Number(3000.0), Cell::Number(30.0), Cell::Number(0.0001)]],
            ),
        ])
    }

    #[test]
    fn test_from_workbook() {
        let inputs = InputData::from_workbook(&sample_workbook("Traffic")).unwrap();
        assert_eq!(inputs.traffic.axle_loads_kn.len(), 3);
        assert_eq!(inputs.climate.rainfall_mm, 500.0);
        assert_eq!(inputs.subgrade.modulus, 3000.0);
        assert_eq!(inputs.materials.asphalt_modulus_mpa, 3000.0);
    }

    #[test]
    fn test_sheet_alias_accepted() {
        let inputs = InputData::from_workbook(&sample_workbook("Sheet1")).unwrap();
        assert_eq!(inputs.traffic.analysis_period_years, 20);
    }

    #[test]
    fn test_missing_sheet_named() {
        let err = InputData::from_workbook(&sample_workbook("Loads")).unwrap_err();
        assert_eq!(err, PaveError::sheet_not_found("Traffic"));
    }

    #[test]
    fn test_manual_defaults_convert_percentages() {
        let inputs = ManualInput::default().into_inputs().unwrap();
        assert!((inputs.traffic.growth_rate - 0.02).abs() < 1e-12);
        assert_eq!(inputs.traffic.analysis_period_years, 20);
        assert_eq!(inputs.materials.concrete_strength_mpa, 30.0);
    }

    #[test]
    fn test_manual_bad_axle_load() {
        let manual = ManualInput {
            axle_loads: "80, heavy, 120".to_string(),
            ..ManualInput::default()
        };
        match manual.into_inputs().unwrap_err() {
            PaveError::InvalidInput { field, value, .. } => {
                assert_eq!(field, "axle_loads");
                assert_eq!(value, "heavy");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_manual_growth_out_of_range() {
        let manual = ManualInput {
            traffic_growth_rate_pct: Percent(120.0),
            ..ManualInput::default()
        };
        assert!(manual.into_inputs().is_err());
    }

    #[test]
    fn test_parse_axle_loads() {
        assert_eq!(parse_axle_loads(" 80,100 , 120.5").unwrap(), vec![80.0, 100.0, 120.5]);
        assert!(parse_axle_loads("").is_err());
    }

    fn fixture(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
    }

    fn assert_fixture_values(inputs: &InputData) {
        assert_eq!(inputs.traffic.axle_loads_kn, vec![80.0, 100.0, 120.0]);
        assert_eq!(inputs.traffic.growth_rate, 0.03);
        assert_eq!(inputs.traffic.analysis_period_years, 15);
        assert_eq!(inputs.climate.average_temperature_c, 12.5);
        assert_eq!(inputs.climate.temperature_variation_c, 8.0);
        assert_eq!(inputs.climate.rainfall_mm, 650.0);
        assert_eq!(inputs.subgrade.modulus, 2800.0);
        assert_eq!(inputs.subgrade.cbr, 7.0);
        assert_eq!(inputs.materials.asphalt_modulus_mpa, 3100.0);
        assert_eq!(inputs.materials.concrete_strength_mpa, 32.0);
        assert_eq!(inputs.materials.thermal_coeff, 0.00012);
    }

    #[test]
    fn test_load_xlsx_workbook() {
        let inputs = InputData::load(&fixture("design_inputs.xlsx")).unwrap();
        assert_fixture_values(&inputs);
    }

    #[test]
    fn test_load_xlsx_with_sheet_aliases() {
        let inputs = InputData::load(&fixture("design_inputs_aliased.xlsx")).unwrap();
        assert_fixture_values(&inputs);
    }

    #[test]
    fn test_load_csv_directory() {
        let dir = tempfile::tempdir().unwrap();
        let files = [
            ("traffic.csv", "Axle_Loads,Traffic_Growth_Rate,Analysis_Period\n80,0.03,15\n100,,\n120,,\n"),
            ("climate.csv", "Average_Temperature,Temperature_Variation,Rainfall\n12.5,8,650\n"),
            ("subgrade.csv", "Modulus,CBR\n2800,7\n"),
            ("materials.csv", "Asphalt_Modulus,Concrete_Strength,Thermal_Coeff\n3100,32,0.00012\n"),
        ];
        for (name, contents) in files {
            std::fs::write(dir.path().join(name), contents).unwrap();
        }

        let inputs = InputData::load(dir.path()).unwrap();
        assert_fixture_values(&inputs);
    }

    #[test]
    fn test_manual_period_bounded() {
        let manual = ManualInput {
            analysis_period_years: MAX_ANALYSIS_PERIOD_YEARS + 1,
            ..ManualInput::default()
        };
        assert_eq!(manual.into_inputs().unwrap_err().error_code(), "INVALID_INPUT");
    }
}
