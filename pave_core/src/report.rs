//! # Text Report
//!
//! Fixed-template design report: header, distress values to 4 decimals,
//! total lifecycle cost as currency, and a closing statement. The same text
//! is what [`crate::pdf`] renders.

use tracing::info;

use crate::performance::DistressResult;

pub const REPORT_TITLE: &str = "Mechanistic-Empirical Pavement Design Report";

const CONCLUSION: &str =
    "The pavement design meets the required performance criteria based on the simulation results.";

/// Build the report text.
///
/// # Example
///
/// ```rust
/// use pave_core::performance::DistressResult;
/// use pave_core::report::generate_report;
///
/// let results = DistressResult { fatigue_cracking: 0.00012, rutting: 0.05, thermal_cracking: 0.001 };
/// let report = generate_report(&results, 1_086_260.878);
/// assert!(report.contains("Fatigue Cracking: 0.0001"));
/// assert!(report.contains("Total Lifecycle Cost: $1,086,260.88"));
/// ```
pub fn generate_report(results: &DistressResult, lcc: f64) -> String {
    let mut report = String::new();
    report.push_str(REPORT_TITLE);
    report.push('\n');
    report.push_str(&"=".repeat(50));
    report.push_str("\n\n");

    report.push_str("Pavement Performance Predictions:\n");
    report.push_str(&"-".repeat(30));
    report.push('\n');
    for (kind, value) in results.entries() {
        report.push_str(&format!("{}: {:.4}\n", kind.display_name(), value));
    }

    report.push_str("\nLifecycle Cost Analysis (LCCA):\n");
    report.push_str(&"-".repeat(30));
    report.push('\n');
    report.push_str(&format!("Total Lifecycle Cost: {}\n", format_currency(lcc)));

    report.push_str("\nConclusion:\n");
    report.push_str(CONCLUSION);
    report.push('\n');

    info!("Report generated successfully.");
    report
}

/// Format as dollars with thousands separators and 2 decimals: `$1,234.50`.
///
/// Negative amounts keep the sign after the symbol (`$-12.00`); non-finite
/// values are printed as-is (`$inf`, `$NaN`).
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("${}", amount);
    }
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("${}{}.{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(1_086_260.878), "$1,086,260.88");
        assert_eq!(format_currency(123.4), "$123.40");
        assert_eq!(format_currency(-4_500.0), "$-4,500.00");
        assert_eq!(format_currency(f64::INFINITY), "$inf");
    }

    #[test]
    fn test_report_layout() {
        let results = DistressResult {
            fatigue_cracking: 0.002_345_67,
            rutting: 1.5,
            thermal_cracking: 0.001,
        };
        let report = generate_report(&results, 1_000_000.0);
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], REPORT_TITLE);
        assert_eq!(lines[1], "=".repeat(50));
        assert_eq!(lines[3], "Pavement Performance Predictions:");
        assert_eq!(lines[5], "Fatigue Cracking: 0.0023");
        assert_eq!(lines[6], "Rutting: 1.5000");
        assert_eq!(lines[7], "Thermal Cracking: 0.0010");
        assert!(report.contains("Total Lifecycle Cost: $1,000,000.00"));
        assert!(report.ends_with(&format!("{}\n", CONCLUSION)));
    }

    #[test]
    fn test_non_finite_values_pass_through() {
        let results = DistressResult {
            fatigue_cracking: f64::INFINITY,
            rutting: f64::NAN,
            thermal_cracking: 0.0,
        };
        let report = generate_report(&results, f64::NAN);
        assert!(report.contains("Fatigue Cracking: inf"));
        assert!(report.contains("Rutting: NaN"));
        assert!(report.contains("Total Lifecycle Cost: $NaN"));
    }
}
