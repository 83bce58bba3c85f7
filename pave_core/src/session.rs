//! # Design Session
//!
//! `Session` holds one user's working state as the design moves through its
//! stages. Each stage output is an `Option`, filled in order:
//!
//! ```text
//! Session
//! ├── meta: SessionMetadata (id, schema version, timestamps)
//! ├── settings: DesignSettings (default costs, default LCCA parameters)
//! ├── inputs          ← load_inputs / load_manual_inputs
//! ├── design + costs  ← define_design (needs inputs)
//! ├── simulation      ← run_simulation (needs inputs and design)
//! └── lcca            ← run_simulation
//! ```
//!
//! A failed action returns an error and leaves every field as it was.
//! Replacing an earlier stage clears the outputs that were derived from it.
//!
//! Sessions serialize to `.pvd` files as JSON (see [`crate::file_io`]).
//!
//! ## Example
//!
//! ```rust
//! use pave_core::inputs::ManualInput;
//! use pave_core::lcca::LccaParameters;
//! use pave_core::pavement::{parse_layers, CostTable, PavementDesign, PavementType};
//! use pave_core::session::Session;
//!
//! let mut session = Session::new();
//! session.load_manual_inputs(&ManualInput::default()).unwrap();
//!
//! let layers = parse_layers("Asphalt:100, Base:200").unwrap();
//! session
//!     .define_design(PavementDesign::new(layers, PavementType::Flexible), CostTable::default())
//!     .unwrap();
//!
//! session.run_simulation(&LccaParameters::default()).unwrap();
//! let report = session.generate_report().unwrap();
//! assert!(report.contains("Total Lifecycle Cost"));
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::{PaveError, PaveResult};
use crate::inputs::{InputData, ManualInput};
use crate::lcca::{perform_lcca, LccaParameters, LccaResult};
use crate::pavement::{summarize_layers, CostTable, LayerDesignSummary, PavementDesign};
use crate::pdf::export_report_to_pdf;
use crate::performance::{design_new_pavement, DistressResult};
use crate::report;

/// Current schema version for .pvd files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// File extension for saved sessions
pub const SESSION_EXTENSION: &str = "pvd";

/// Session metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub id: Uuid,

    /// Schema version (for migration compatibility)
    pub version: String,

    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Per-session defaults offered to the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSettings {
    /// Cost per mm used when the user does not supply one
    pub default_costs: CostTable,

    /// Pre-filled lifecycle-cost parameters
    pub default_lcca: LccaParameters,
}

/// One design session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub meta: SessionMetadata,

    #[serde(default)]
    pub settings: DesignSettings,

    #[serde(default)]
    pub inputs: Option<InputData>,

    #[serde(default)]
    pub design: Option<PavementDesign>,

    #[serde(default)]
    pub cost_table: Option<CostTable>,

    #[serde(default)]
    pub layer_summary: Option<LayerDesignSummary>,

    #[serde(default)]
    pub simulation: Option<DistressResult>,

    #[serde(default)]
    pub lcca: Option<LccaResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::with_settings(DesignSettings::default())
    }

    pub fn with_settings(settings: DesignSettings) -> Self {
        let now = Utc::now();
        Session {
            meta: SessionMetadata {
                id: Uuid::new_v4(),
                version: SCHEMA_VERSION.to_string(),
                created: now,
                modified: now,
            },
            settings,
            inputs: None,
            design: None,
            cost_table: None,
            layer_summary: None,
            simulation: None,
            lcca: None,
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Store a validated input set. Simulation results computed from the
    /// previous inputs are discarded.
    pub fn set_inputs(&mut self, inputs: InputData) {
        self.inputs = Some(inputs);
        self.clear_results();
        self.touch();
        info!("Input data stored in session {}.", self.meta.id);
    }

    /// Read inputs from a workbook file or CSV directory.
    pub fn load_inputs(&mut self, path: &Path) -> PaveResult<&InputData> {
        let inputs = InputData::load(path)
            .inspect(|_| info!("Data loaded successfully from {}", path.display()))
            .inspect_err(|e| error!("Error loading data from {}: {}", path.display(), e))?;
        self.set_inputs(inputs);
        self.require_inputs("load inputs")
    }

    /// Build inputs from form values.
    pub fn load_manual_inputs(&mut self, manual: &ManualInput) -> PaveResult<&InputData> {
        let inputs = manual
            .into_inputs()
            .inspect_err(|e| error!("Error in manual input data: {}", e))?;
        self.set_inputs(inputs);
        info!("Manual input data processed successfully.");
        self.require_inputs("load inputs")
    }

    /// Fix the layer stack and its prices, returning the thickness/cost summary.
    ///
    /// Requires inputs. Simulation results from a previous design are discarded.
    pub fn define_design(&mut self, design: PavementDesign, costs: CostTable) -> PaveResult<&LayerDesignSummary> {
        self.require_inputs("define a pavement design")?;
        design.validate()?;
        costs.validate()?;

        let summary = summarize_layers(&design.layers, &costs);
        self.design = Some(design);
        self.cost_table = Some(costs);
        self.layer_summary = Some(summary);
        self.clear_results();
        self.touch();
        info!("Pavement design defined.");

        self.layer_summary
            .as_ref()
            .ok_or_else(|| PaveError::Internal { message: "layer summary not stored".to_string() })
    }

    /// Run the distress predictors and the lifecycle-cost analysis.
    ///
    /// Both results are stored together; if the LCCA parameters are invalid,
    /// neither is.
    pub fn run_simulation(&mut self, params: &LccaParameters) -> PaveResult<(&DistressResult, &LccaResult)> {
        let inputs = self.require_inputs("run the simulation")?;
        let design = self
            .design
            .as_ref()
            .ok_or_else(|| PaveError::stage_not_ready("run the simulation", "pavement design"))?;

        let simulation = design_new_pavement(design, inputs);
        let lcca = perform_lcca(params).inspect_err(|e| error!("Error running simulation: {}", e))?;

        self.simulation = Some(simulation);
        self.lcca = Some(lcca);
        self.touch();
        info!("Simulation completed successfully.");

        match (&self.simulation, &self.lcca) {
            (Some(simulation), Some(lcca)) => Ok((simulation, lcca)),
            _ => Err(PaveError::Internal { message: "simulation results not stored".to_string() }),
        }
    }

    /// Report text for the latest simulation.
    pub fn generate_report(&self) -> PaveResult<String> {
        let (simulation, lcca) = self.results("generate a report")?;
        Ok(report::generate_report(simulation, lcca.total_lcc))
    }

    /// Report rendered to PDF bytes.
    pub fn export_pdf(&self) -> PaveResult<Vec<u8>> {
        let text = self.generate_report()?;
        export_report_to_pdf(&text).inspect_err(|e| error!("Error exporting PDF: {}", e))
    }

    fn results(&self, action: &str) -> PaveResult<(&DistressResult, &LccaResult)> {
        match (&self.simulation, &self.lcca) {
            (Some(simulation), Some(lcca)) => Ok((simulation, lcca)),
            _ => Err(PaveError::stage_not_ready(action, "simulation results")),
        }
    }

    fn require_inputs(&self, action: &str) -> PaveResult<&InputData> {
        self.inputs
            .as_ref()
            .ok_or_else(|| PaveError::stage_not_ready(action, "input data"))
    }

    fn clear_results(&mut self) {
        self.simulation = None;
        self.lcca = None;
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pavement::{parse_layers, PavementType};

    fn design() -> PavementDesign {
        PavementDesign::new(parse_layers("Asphalt:100, Base:200").unwrap(), PavementType::Flexible)
    }

    fn ready_session() -> Session {
        let mut session = Session::new();
        session.load_manual_inputs(&ManualInput::default()).unwrap();
        session.define_design(design(), CostTable::default()).unwrap();
        session
    }

    #[test]
    fn test_new_session() {
        let session = Session::new();
        assert_eq!(session.meta.version, SCHEMA_VERSION);
        assert!(session.inputs.is_none());
        assert!(session.simulation.is_none());
    }

    #[test]
    fn test_stages_must_run_in_order() {
        let mut session = Session::new();

        let err = session.define_design(design(), CostTable::default()).unwrap_err();
        assert_eq!(err.error_code(), "STAGE_NOT_READY");

        session.load_manual_inputs(&ManualInput::default()).unwrap();
        let err = session.run_simulation(&LccaParameters::default()).unwrap_err();
        assert!(err.to_string().contains("pavement design"));

        assert!(session.generate_report().is_err());
    }

    #[test]
    fn test_design_summary() {
        let mut session = Session::new();
        session.load_manual_inputs(&ManualInput::default()).unwrap();
        let summary = session.define_design(design(), CostTable::default()).unwrap();
        assert_eq!(summary.total_thickness_mm, 300.0);
        assert_eq!(summary.total_cost, 100.0 * 50.0 + 200.0 * 40.0);
    }

    #[test]
    fn test_full_flow() {
        let mut session = ready_session();
        let (simulation, lcca) = session.run_simulation(&LccaParameters::default()).unwrap();
        assert!(simulation.fatigue_cracking > 0.0);
        assert_eq!(lcca.over_time.len(), 20);

        let report = session.generate_report().unwrap();
        assert!(report.starts_with(report::REPORT_TITLE));
    }

    #[test]
    fn test_failed_action_leaves_state_unchanged() {
        let mut session = ready_session();
        session.run_simulation(&LccaParameters::default()).unwrap();
        let before = session.lcca.clone();

        let bad = LccaParameters {
            discount_rate: -1.0,
            ..LccaParameters::default()
        };
        assert!(session.run_simulation(&bad).is_err());
        assert_eq!(session.lcca, before);
        assert!(session.simulation.is_some());

        let bad_manual = ManualInput {
            axle_loads: "80, heavy".to_string(),
            ..ManualInput::default()
        };
        assert!(session.load_manual_inputs(&bad_manual).is_err());
        assert!(session.simulation.is_some());
    }

    #[test]
    fn test_new_inputs_clear_results() {
        let mut session = ready_session();
        session.run_simulation(&LccaParameters::default()).unwrap();
        session.load_manual_inputs(&ManualInput::default()).unwrap();
        assert!(session.simulation.is_none());
        assert!(session.lcca.is_none());
        assert!(session.design.is_some());
    }

    #[test]
    fn test_missing_workbook_leaves_inputs() {
        let mut session = ready_session();
        let missing = std::env::temp_dir().join("pave_no_such_workbook.xlsx");
        assert!(session.load_inputs(&missing).is_err());
        assert!(session.inputs.is_some());
    }

    #[test]
    fn test_session_serialization() {
        let mut session = ready_session();
        session.run_simulation(&LccaParameters::default()).unwrap();

        let json = serde_json::to_string_pretty(&session).unwrap();
        let loaded: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.meta.id, session.meta.id);
        assert_eq!(loaded.simulation, session.simulation);
        assert_eq!(loaded.generate_report().unwrap(), session.generate_report().unwrap());
    }
}
