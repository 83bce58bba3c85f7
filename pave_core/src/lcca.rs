//! # Life-Cycle Cost Analysis (LCCA)
//!
//! Present value of an initial construction cost plus a sparse schedule of
//! maintenance costs:
//!
//! ```text
//! lcc = initial_cost + Σ_{year=1..period} maintenance(year) / (1 + rate)^year
//! ```
//!
//! Years absent from the schedule cost 0. Years beyond the analysis period
//! (and year 0) stay in the schedule but are never discounted into the total.
//!
//! ## Example
//!
//! ```rust
//! use pave_core::lcca::{calculate_lcca, MaintenanceSchedule};
//!
//! let schedule = MaintenanceSchedule::from_pairs([(5, 100_000.0)]);
//! let lcc = calculate_lcca(1_000_000.0, &schedule, 0.03, 5);
//! assert!((lcc - 1_086_260.88).abs() < 0.01);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{PaveError, PaveResult};
use crate::inputs::MAX_ANALYSIS_PERIOD_YEARS;
use crate::report::format_currency;
use crate::units::Percent;

/// Maintenance cost by year (1-based), sparse.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaintenanceSchedule {
    pub costs: BTreeMap<u32, f64>,
}

/// A schedule entry that was skipped while parsing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleWarning {
    pub entry: String,
    pub message: String,
}

impl MaintenanceSchedule {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u32, f64)>) -> Self {
        MaintenanceSchedule {
            costs: pairs.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    /// Cost for `year`. Default policy: a year with no entry costs 0.
    pub fn cost_in(&self, year: u32) -> f64 {
        self.costs.get(&year).copied().unwrap_or(0.0)
    }

    /// Parse `year:cost` pairs separated by commas, e.g.
    /// `"5:100000, 10:150000"`.
    ///
    /// - an entry without `:` is skipped and reported as a warning
    /// - blank entries (trailing commas, empty input) are ignored
    /// - an entry with `:` whose year or cost is not numeric fails the parse,
    ///   naming the entry
    /// - a repeated year keeps the last cost
    ///
    /// # Example
    ///
    /// ```rust
    /// use pave_core::lcca::MaintenanceSchedule;
    ///
    /// let (schedule, warnings) = MaintenanceSchedule::parse("5:100000, abc, 10:150000").unwrap();
    /// assert_eq!(schedule.cost_in(10), 150000.0);
    /// assert_eq!(warnings.len(), 1);
    /// ```
    pub fn parse(text: &str) -> PaveResult<(Self, Vec<ScheduleWarning>)> {
        let mut schedule = MaintenanceSchedule::default();
        let mut warnings = Vec::new();

        for item in text.split(',') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            let Some((year, cost)) = item.split_once(':') else {
                warn!("Ignoring invalid maintenance cost entry: '{}'", item);
                warnings.push(ScheduleWarning {
                    entry: item.to_string(),
                    message: format!("Ignoring invalid maintenance cost entry: '{}'", item),
                });
                continue;
            };
            let year: u32 = year.trim().parse().map_err(|_| {
                PaveError::invalid_input("maintenance_costs", item, "Year must be a whole number")
            })?;
            let cost: f64 = cost.trim().parse().map_err(|_| {
                PaveError::invalid_input("maintenance_costs", item, "Cost must be numeric")
            })?;
            schedule.costs.insert(year, cost);
        }
        Ok((schedule, warnings))
    }

    /// Sum of scheduled costs for years 1..=period, undiscounted
    pub fn total_within(&self, analysis_period: u32) -> f64 {
        self.costs.range(1..=analysis_period).map(|(_, c)| c).sum()
    }
}

/// Present value of the lifecycle costs.
///
/// Pure function. A discount rate of exactly -1 divides by zero and yields a
/// non-finite value; use [`LccaParameters::validate`] to reject it up front.
pub fn calculate_lcca(
    initial_cost: f64,
    maintenance: &MaintenanceSchedule,
    discount_rate: f64,
    analysis_period: u32,
) -> f64 {
    (1..=analysis_period).fold(initial_cost, |lcc, year| {
        lcc + maintenance.cost_in(year) / discount_factor(discount_rate, year)
    })
}

/// `(1 + rate)^year`
fn discount_factor(discount_rate: f64, year: u32) -> f64 {
    (1.0 + discount_rate).powf(f64::from(year))
}

/// Cumulative present value at the end of each year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyCost {
    pub year: u32,
    pub maintenance_cost: f64,
    pub discounted_cost: f64,
    pub cumulative_cost: f64,
}

/// Year-by-year discounting, one entry per year 1..=period.
pub fn cumulative_lcca(
    initial_cost: f64,
    maintenance: &MaintenanceSchedule,
    discount_rate: f64,
    analysis_period: u32,
) -> Vec<YearlyCost> {
    let mut lcc = initial_cost;
    (1..=analysis_period)
        .map(|year| {
            let maintenance_cost = maintenance.cost_in(year);
            let discounted_cost = maintenance_cost / discount_factor(discount_rate, year);
            lcc += discounted_cost;
            if maintenance_cost > 0.0 {
                debug!(
                    "Year {}: Maintenance Cost {}, Discounted Cost {}",
                    year,
                    format_currency(maintenance_cost),
                    format_currency(discounted_cost)
                );
            }
            YearlyCost {
                year,
                maintenance_cost,
                discounted_cost,
                cumulative_cost: lcc,
            }
        })
        .collect()
}

/// Inputs to a lifecycle-cost run.
///
/// Defaults match the simulation form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LccaParameters {
    /// Initial construction cost
    pub initial_cost: f64,
    pub maintenance: MaintenanceSchedule,
    /// Annual discount rate as a fraction
    pub discount_rate: f64,
    /// Lifecycle analysis period in years
    pub analysis_period_years: u32,
}

impl Default for LccaParameters {
    fn default() -> Self {
        LccaParameters {
            initial_cost: 1_000_000.0,
            maintenance: MaintenanceSchedule::from_pairs([
                (5, 100_000.0),
                (10, 150_000.0),
                (15, 200_000.0),
                (20, 250_000.0),
            ]),
            discount_rate: 0.03,
            analysis_period_years: 20,
        }
    }
}

impl LccaParameters {
    /// Build from form values: the discount rate is a 0-100 percentage.
    pub fn from_form(
        initial_cost: f64,
        maintenance: MaintenanceSchedule,
        discount_rate: Percent,
        analysis_period_years: u32,
    ) -> PaveResult<Self> {
        let params = LccaParameters {
            initial_cost,
            maintenance,
            discount_rate: discount_rate.to_fraction_checked("discount_rate")?.0,
            analysis_period_years,
        };
        params.validate()?;
        Ok(params)
    }

    /// Validate input parameters.
    pub fn validate(&self) -> PaveResult<()> {
        if !self.initial_cost.is_finite() || self.initial_cost < 0.0 {
            return Err(PaveError::invalid_input(
                "initial_cost",
                self.initial_cost.to_string(),
                "Initial cost cannot be negative",
            ));
        }
        if !self.discount_rate.is_finite() || self.discount_rate <= -1.0 {
            return Err(PaveError::invalid_input(
                "discount_rate",
                self.discount_rate.to_string(),
                "Discount rate must be greater than -100%",
            ));
        }
        if !(1..=MAX_ANALYSIS_PERIOD_YEARS).contains(&self.analysis_period_years) {
            return Err(PaveError::invalid_input(
                "analysis_period",
                self.analysis_period_years.to_string(),
                format!("Analysis period must be between 1 and {} years", MAX_ANALYSIS_PERIOD_YEARS),
            ));
        }
        if let Some((year, cost)) = self.maintenance.costs.iter().find(|(_, c)| !c.is_finite()) {
            return Err(PaveError::invalid_input(
                "maintenance_costs",
                format!("{}:{}", year, cost),
                "Cost must be finite",
            ));
        }
        Ok(())
    }
}

/// Result of a lifecycle-cost run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LccaResult {
    pub parameters: LccaParameters,
    /// Present value of all lifecycle costs
    pub total_lcc: f64,
    /// Cumulative present value per year
    pub over_time: Vec<YearlyCost>,
}

/// Run the analysis and keep the per-year series alongside the total.
pub fn perform_lcca(params: &LccaParameters) -> PaveResult<LccaResult> {
    info!("Starting Life-Cycle Cost Analysis (LCCA).");
    params.validate()?;
    info!("Initial Cost: {}", format_currency(params.initial_cost));

    let over_time = cumulative_lcca(
        params.initial_cost,
        &params.maintenance,
        params.discount_rate,
        params.analysis_period_years,
    );
    let total_lcc = over_time
        .last()
        .map(|y| y.cumulative_cost)
        .unwrap_or(params.initial_cost);

    info!("Total Lifecycle Cost (LCCA): {}", format_currency(total_lcc));
    Ok(LccaResult {
        parameters: params.clone(),
        total_lcc,
        over_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concrete_scenario() {
        let schedule = MaintenanceSchedule::from_pairs([(5, 100_000.0)]);
        let lcc = calculate_lcca(1_000_000.0, &schedule, 0.03, 5);
        let expected = 1_000_000.0 + 100_000.0 / 1.03_f64.powi(5);
        assert!((lcc - expected).abs() < 1e-6);
        assert!((lcc - 1_086_260.88).abs() < 0.01);
    }

    #[test]
    fn test_no_maintenance_equals_initial() {
        let empty = MaintenanceSchedule::default();
        for rate in [0.0, 0.03, 0.5] {
            for period in [0, 1, 20, 100] {
                assert_eq!(calculate_lcca(250_000.0, &empty, rate, period), 250_000.0);
            }
        }
    }

    #[test]
    fn test_zero_rate_is_plain_sum_within_period() {
        let schedule = MaintenanceSchedule::from_pairs([(0, 5.0), (3, 100.0), (7, 200.0), (12, 400.0)]);
        let lcc = calculate_lcca(1000.0, &schedule, 0.0, 10);
        assert_eq!(lcc, 1000.0 + schedule.total_within(10));
        assert_eq!(lcc, 1300.0);
    }

    #[test]
    fn test_parse_skips_malformed_entry() {
        let (with_bad, warnings) = MaintenanceSchedule::parse("5:100000, abc, 10:150000").unwrap();
        let (clean, none) = MaintenanceSchedule::parse("5:100000, 10:150000").unwrap();
        assert_eq!(with_bad, clean);
        assert!(none.is_empty());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].entry, "abc");
    }

    #[test]
    fn test_parse_only_malformed() {
        let (schedule, warnings) = MaintenanceSchedule::parse("abc").unwrap();
        assert!(schedule.is_empty());
        assert_eq!(warnings.len(), 1);

        let (schedule, warnings) = MaintenanceSchedule::parse("").unwrap();
        assert!(schedule.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_parse_bad_number_fails() {
        let err = MaintenanceSchedule::parse("5:lots").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(MaintenanceSchedule::parse("five:100").is_err());
    }

    #[test]
    fn test_cumulative_series() {
        let params = LccaParameters::default();
        let result = perform_lcca(&params).unwrap();
        assert_eq!(result.over_time.len(), 20);
        assert_eq!(result.over_time[0].cumulative_cost, 1_000_000.0);
        assert!(result
            .over_time
            .windows(2)
            .all(|w| w[1].cumulative_cost >= w[0].cumulative_cost));
        assert_eq!(
            result.total_lcc,
            calculate_lcca(params.initial_cost, &params.maintenance, params.discount_rate, 20)
        );
    }

    #[test]
    fn test_discount_rate_minus_one_rejected() {
        let params = LccaParameters {
            discount_rate: -1.0,
            ..LccaParameters::default()
        };
        assert!(perform_lcca(&params).is_err());

        // The raw function does not trap
        let schedule = MaintenanceSchedule::from_pairs([(1, 10.0)]);
        assert!(!calculate_lcca(0.0, &schedule, -1.0, 1).is_finite());
    }

    #[test]
    fn test_from_form_converts_percent() {
        let params = LccaParameters::from_form(1000.0, MaintenanceSchedule::default(), Percent(3.0), 20).unwrap();
        assert!((params.discount_rate - 0.03).abs() < 1e-12);
        assert!(LccaParameters::from_form(1000.0, MaintenanceSchedule::default(), Percent(3.0), 0).is_err());
    }

    #[test]
    fn test_period_upper_bound() {
        let params = LccaParameters {
            analysis_period_years: MAX_ANALYSIS_PERIOD_YEARS + 1,
            ..LccaParameters::default()
        };
        assert_eq!(perform_lcca(&params).unwrap_err().error_code(), "INVALID_INPUT");

        let params = LccaParameters {
            analysis_period_years: u32::MAX,
            ..LccaParameters::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_discount_factor_large_year() {
        assert!(discount_factor(0.03, 2_147_483_648) > 1.0);
        assert_eq!(discount_factor(0.0, u32::MAX), 1.0);
    }
}
