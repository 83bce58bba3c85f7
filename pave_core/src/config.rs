//! # Application Configuration
//!
//! Optional JSON file; every field has a default, so `{}` is a valid
//! configuration and a partial file only overrides what it names.
//!
//! ```json
//! {
//!   "log": { "file": "me_pavement_design.log", "level": "info", "console": true },
//!   "report": { "file_name": "pavement_design_report.pdf" },
//!   "design": { "default_costs": { "Asphalt": 55.0 } }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{PaveError, PaveResult};
use crate::pdf::{REPORT_FILE_NAME, REPORT_MIME_TYPE};
use crate::session::DesignSettings;

/// Default process log file
pub const LOG_FILE_NAME: &str = "me_pavement_design.log";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log: LogConfig,
    pub report: ReportConfig,
    /// Defaults copied into each new session
    pub design: DesignSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Append-only log file; `None` disables file logging
    pub file: Option<PathBuf>,
    /// Filter directive used when `RUST_LOG` is unset (e.g. "info", "pave_core=debug")
    pub level: String,
    /// Also log to stderr
    pub console: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            file: Some(PathBuf::from(LOG_FILE_NAME)),
            level: "info".to_string(),
            console: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub file_name: String,
    pub mime_type: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            file_name: REPORT_FILE_NAME.to_string(),
            mime_type: REPORT_MIME_TYPE.to_string(),
        }
    }
}

impl AppConfig {
    /// Read a configuration file.
    pub fn load(path: &Path) -> PaveResult<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| PaveError::file_error("read config", path.display().to_string(), e.to_string()))?;
        let config: AppConfig = serde_json::from_str(&contents).map_err(|e| PaveError::SerializationError {
            reason: format!("Invalid configuration in {}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> PaveResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> PaveResult<()> {
        if self.report.file_name.trim().is_empty() {
            return Err(PaveError::invalid_input(
                "report.file_name",
                &self.report.file_name,
                "Report file name cannot be empty",
            ));
        }
        self.design.default_costs.validate()?;
        self.design.default_lcca.validate()
    }
}
