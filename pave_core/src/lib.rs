//! # pave_core - Pavement Performance and Lifecycle-Cost Engine
//!
//! `pave_core` predicts pavement distress from traffic, climate, subgrade and
//! material inputs, prices a layer stack, discounts a maintenance schedule to
//! present value, and writes the result up as a text or PDF report. All
//! records are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Typed stages**: a [`Session`] holds each stage's output as an `Option`
//! - **Validated records**: constructors and `validate()` reject bad input
//!   with the offending field named
//! - **Raw formulas**: predictor and LCCA functions never trap, so a
//!   hand-built record with a zero modulus yields `inf` instead of an error
//!
//! ## Quick Start
//!
//! ```rust
//! use pave_core::inputs::ManualInput;
//! use pave_core::lcca::LccaParameters;
//! use pave_core::pavement::{parse_layers, CostTable, PavementDesign, PavementType};
//! use pave_core::Session;
//!
//! let mut session = Session::new();
//! session.load_manual_inputs(&ManualInput::default())?;
//! session.define_design(
//!     PavementDesign::new(parse_layers("Asphalt:100, Base:200")?, PavementType::Flexible),
//!     CostTable::default(),
//! )?;
//! session.run_simulation(&LccaParameters::default())?;
//! println!("{}", session.generate_report()?);
//! # Ok::<(), pave_core::PaveError>(())
//! ```
//!
//! ## Modules
//!
//! - [`inputs`] - Traffic, climate, subgrade and material records
//! - [`tabular`] - Workbook and CSV sheet reading
//! - [`pavement`] - Layers, cost table, layer/cost summary
//! - [`performance`] - Distress predictors
//! - [`lcca`] - Lifecycle-cost analysis
//! - [`report`] / [`pdf`] - Text report and PDF rendering
//! - [`session`] / [`file_io`] - Working state and `.pvd` persistence
//! - [`config`] / [`logging`] - Application configuration and log setup

pub mod config;
pub mod errors;
pub mod file_io;
pub mod inputs;
pub mod lcca;
pub mod logging;
pub mod pavement;
pub mod pdf;
pub mod performance;
pub mod report;
pub mod session;
pub mod tabular;
pub mod units;

pub use errors::{PaveError, PaveResult};
pub use file_io::{load_session, save_session};
pub use session::{DesignSettings, Session, SessionMetadata};
