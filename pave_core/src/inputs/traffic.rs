//! Traffic loading inputs.
//!
//! Axle loads are in kN; the growth rate is a fraction (0.02 for 2 %).

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::errors::{PaveError, PaveResult};
use crate::tabular::Sheet;

/// Longest analysis period accepted, in years
pub const MAX_ANALYSIS_PERIOD_YEARS: u32 = 100;

/// Traffic data: axle loads, annual growth and analysis period.
///
/// ## JSON Example
///
/// ```json
/// {
///   "axle_loads_kn": [80.0, 100.0, 120.0],
///   "growth_rate": 0.02,
///   "analysis_period_years": 20
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficData {
    /// Axle loads in kN, in input order
    pub axle_loads_kn: Vec<f64>,

    /// Annual traffic growth rate as a fraction
    pub growth_rate: f64,

    /// Number of years analysed
    pub analysis_period_years: u32,
}

impl TrafficData {
    pub const AXLE_LOADS: &'static str = "Axle_Loads";
    pub const GROWTH_RATE: &'static str = "Traffic_Growth_Rate";
    pub const ANALYSIS_PERIOD: &'static str = "Analysis_Period";

    /// Required sheet columns
    pub const COLUMNS: [&'static str; 3] = [Self::AXLE_LOADS, Self::GROWTH_RATE, Self::ANALYSIS_PERIOD];

    /// Create validated traffic data.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pave_core::inputs::TrafficData;
    ///
    /// let traffic = TrafficData::new(vec![80.0, 100.0], 0.02, 20).unwrap();
    /// assert_eq!(traffic.analysis_period_years, 20);
    /// assert!(TrafficData::new(vec![80.0], -0.1, 20).is_err());
    /// ```
    pub fn new(axle_loads_kn: Vec<f64>, growth_rate: f64, analysis_period_years: u32) -> PaveResult<Self> {
        let traffic = TrafficData {
            axle_loads_kn,
            growth_rate,
            analysis_period_years,
        };
        traffic.validate()?;
        Ok(traffic)
    }

    /// Validate input parameters.
    pub fn validate(&self) -> PaveResult<()> {
        if let Some(load) = self.axle_loads_kn.iter().find(|l| !l.is_finite() || **l < 0.0) {
            return Err(PaveError::invalid_input(
                "axle_loads",
                load.to_string(),
                "Axle loads must be non-negative numbers",
            ));
        }
        if !self.growth_rate.is_finite() || self.growth_rate < 0.0 {
            return Err(PaveError::invalid_input(
                "traffic_growth_rate",
                self.growth_rate.to_string(),
                "Growth rate cannot be negative",
            ));
        }
        if !(1..=MAX_ANALYSIS_PERIOD_YEARS).contains(&self.analysis_period_years) {
            return Err(PaveError::invalid_input(
                "analysis_period",
                self.analysis_period_years.to_string(),
                format!("Analysis period must be between 1 and {} years", MAX_ANALYSIS_PERIOD_YEARS),
            ));
        }
        Ok(())
    }

    /// Growth factor applied to every load in year index `year` (0-based)
    pub fn growth_factor(&self, year: u32) -> f64 {
        (1.0 + self.growth_rate).powf(f64::from(year))
    }

    /// Scaled axle loads year by year, without building the table.
    ///
    /// Yields `(year index, scaled load)` for every load in every year.
    pub fn scaled_loads(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        (0..self.analysis_period_years).flat_map(move |year| {
            let factor = self.growth_factor(year);
            self.axle_loads_kn.iter().map(move |load| (year, load * factor))
        })
    }

    /// Project the axle loads over the analysis period.
    ///
    /// Returns one row per year (year index 0 first); each row holds every
    /// axle load scaled by `(1 + growth_rate)^year`.
    pub fn projected_loads(&self) -> Vec<Vec<f64>> {
        (0..self.analysis_period_years)
            .map(|year| {
                let factor = self.growth_factor(year);
                let loads: Vec<f64> = self.axle_loads_kn.iter().map(|l| l * factor).collect();
                debug!("Year {}: {:?}", year + 1, loads);
                loads
            })
            .collect()
    }

    /// Build from a traffic sheet: the `Axle_Loads` column plus the first-row
    /// growth rate and analysis period.
    pub fn from_sheet(sheet: &Sheet) -> PaveResult<Self> {
        Self::read_sheet(sheet)
            .inspect(|_| info!("TrafficData loaded successfully from sheet '{}'.", sheet.name))
            .inspect_err(|e| error!("Error creating TrafficData from sheet '{}': {}", sheet.name, e))
    }

    fn read_sheet(sheet: &Sheet) -> PaveResult<Self> {
        let axle_loads = sheet.column_f64(Self::AXLE_LOADS)?;
        let growth_rate = sheet.first_f64(Self::GROWTH_RATE)?;
        let period = sheet.first_f64(Self::ANALYSIS_PERIOD)?;
        Self::new(axle_loads, growth_rate, whole_years(Self::ANALYSIS_PERIOD, period)?)
    }
}

/// Convert a sheet number to a positive whole year count
pub(crate) fn whole_years(field: &str, value: f64) -> PaveResult<u32> {
    if !value.is_finite() || value.fract() != 0.0 || value < 1.0 || value > u32::MAX as f64 {
        return Err(PaveError::invalid_input(
            field,
            value.to_string(),
            "Must be a whole number of years, at least 1",
        ));
    }
    Ok(value as u32)
}
