//! # Pavement Structure
//!
//! The layered cross-section a user defines before running a simulation,
//! the cost-per-millimetre table that prices it, and the layer-design
//! preview computed from the two.
//!
//! ## Two distress paths
//!
//! [`summarize_layers`] produces *preview* distress figures that depend only
//! on total thickness. They are a separate calculation from the simulation
//! predictors in [`crate::performance`] and are never reconciled with them:
//! the preview answers "what does this layer stack look like", the
//! simulation answers "how does it perform under this traffic and climate".
//! The two sets of numbers will generally disagree.
//!
//! ## Example
//!
//! ```rust
//! use pave_core::pavement::{summarize_layers, CostTable, LayerType, PavementLayer};
//!
//! let layers = vec![
//!     PavementLayer::new(LayerType::Asphalt, 100.0).unwrap(),
//!     PavementLayer::new(LayerType::Base, 200.0).unwrap(),
//! ];
//! let summary = summarize_layers(&layers, &CostTable::default());
//! assert_eq!(summary.total_thickness_mm, 300.0);
//! assert_eq!(summary.total_cost, 100.0 * 50.0 + 200.0 * 40.0);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{PaveError, PaveResult};

/// Material category of a pavement course
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LayerType {
    Asphalt,
    Concrete,
    Base,
    #[serde(rename = "Sub-base")]
    SubBase,
}

impl LayerType {
    /// All layer types in selection order
    pub const ALL: [LayerType; 4] = [
        LayerType::Asphalt,
        LayerType::Concrete,
        LayerType::Base,
        LayerType::SubBase,
    ];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            LayerType::Asphalt => "Asphalt",
            LayerType::Concrete => "Concrete",
            LayerType::Base => "Base",
            LayerType::SubBase => "Sub-base",
        }
    }

    /// Parse from common string representations ("Sub-base", "subbase", "SUB_BASE")
    pub fn from_str_flexible(s: &str) -> PaveResult<Self> {
        match s.trim().to_lowercase().replace([' ', '_', '-'], "").as_str() {
            "asphalt" => Ok(LayerType::Asphalt),
            "concrete" => Ok(LayerType::Concrete),
            "base" => Ok(LayerType::Base),
            "subbase" => Ok(LayerType::SubBase),
            _ => Err(PaveError::invalid_input(
                "layer_type",
                s,
                "Expected one of Asphalt, Concrete, Base, Sub-base",
            )),
        }
    }
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Overall pavement classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PavementType {
    #[default]
    Flexible,
    Rigid,
    Composite,
}

impl PavementType {
    pub const ALL: [PavementType; 3] = [PavementType::Flexible, PavementType::Rigid, PavementType::Composite];

    /// Parse a pavement type name (case-insensitive)
    pub fn from_str_flexible(s: &str) -> PaveResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "flexible" => Ok(PavementType::Flexible),
            "rigid" => Ok(PavementType::Rigid),
            "composite" => Ok(PavementType::Composite),
            _ => Err(PaveError::invalid_input(
                "pavement_type",
                s,
                "Invalid pavement type. Choose from 'Flexible', 'Rigid', or 'Composite'.",
            )),
        }
    }
}

/// One course of the cross-section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PavementLayer {
    pub layer_type: LayerType,

    /// Course thickness in mm
    pub thickness_mm: f64,
}

impl PavementLayer {
    pub fn new(layer_type: LayerType, thickness_mm: f64) -> PaveResult<Self> {
        let layer = PavementLayer {
            layer_type,
            thickness_mm,
        };
        layer.validate()?;
        Ok(layer)
    }

    /// Validate input parameters.
    pub fn validate(&self) -> PaveResult<()> {
        if !self.thickness_mm.is_finite() || self.thickness_mm <= 0.0 {
            return Err(PaveError::invalid_input(
                "thickness_mm",
                self.thickness_mm.to_string(),
                "Layer thickness must be positive",
            ));
        }
        Ok(())
    }
}

/// Parse a layer list such as `"Asphalt:100, Base:200, Sub-base:150"`.
pub fn parse_layers(text: &str) -> PaveResult<Vec<PavementLayer>> {
    text.split(',')
        .filter(|item| !item.trim().is_empty())
        .map(|item| {
            let (kind, thickness) = item.split_once(':').ok_or_else(|| {
                PaveError::invalid_input("layers", item.trim(), "Expected <layer type>:<thickness mm>")
            })?;
            let thickness: f64 = thickness.trim().parse().map_err(|_| {
                PaveError::invalid_input("thickness_mm", thickness.trim(), "Thickness must be numeric")
            })?;
            PavementLayer::new(LayerType::from_str_flexible(kind)?, thickness)
        })
        .collect()
}

/// Ordered cross-section, top course first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PavementDesign {
    pub layers: Vec<PavementLayer>,
    pub pavement_type: PavementType,
}

impl PavementDesign {
    pub fn new(layers: Vec<PavementLayer>, pavement_type: PavementType) -> Self {
        PavementDesign { layers, pavement_type }
    }

    /// Validate every layer.
    pub fn validate(&self) -> PaveResult<()> {
        self.layers.iter().try_for_each(PavementLayer::validate)
    }

    /// Append a course at the bottom of the section.
    pub fn add_layer(&mut self, layer: PavementLayer) -> PaveResult<()> {
        layer.validate()?;
        self.layers.push(layer);
        debug!(
            "Added layer: {} {} mm. Total layers: {}",
            layer.layer_type,
            layer.thickness_mm,
            self.layers.len()
        );
        Ok(())
    }

    /// Remove the course at `index`.
    ///
    /// An out-of-range index is logged and ignored.
    pub fn remove_layer(&mut self, index: usize) -> Option<PavementLayer> {
        if index < self.layers.len() {
            let removed = self.layers.remove(index);
            debug!(
                "Removed layer at index {}: {} mm. Remaining layers: {}",
                index,
                removed.thickness_mm,
                self.layers.len()
            );
            Some(removed)
        } else {
            warn!("Attempted to remove non-existent layer at index {}.", index);
            None
        }
    }

    /// Set the pavement type from its name.
    pub fn set_pavement_type(&mut self, name: &str) -> PaveResult<()> {
        self.pavement_type = PavementType::from_str_flexible(name)?;
        debug!("Pavement type set to {:?}.", self.pavement_type);
        Ok(())
    }

    pub fn total_thickness_mm(&self) -> f64 {
        self.layers.iter().map(|l| l.thickness_mm).sum()
    }
}

/// Cost per millimetre of thickness, by layer type.
///
/// A layer type missing from the table costs 0 (see [`CostTable::cost_per_mm`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CostTable {
    pub costs: BTreeMap<LayerType, f64>,
}

impl Default for CostTable {
    /// Form defaults: Asphalt 50, Concrete 80, Base 40, Sub-base 30 per mm
    fn default() -> Self {
        CostTable::from_pairs([
            (LayerType::Asphalt, 50.0),
            (LayerType::Concrete, 80.0),
            (LayerType::Base, 40.0),
            (LayerType::SubBase, 30.0),
        ])
    }
}

impl CostTable {
    /// A table with no prices; every layer costs 0
    pub fn empty() -> Self {
        CostTable { costs: BTreeMap::new() }
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (LayerType, f64)>) -> Self {
        CostTable {
            costs: pairs.into_iter().collect(),
        }
    }

    /// Validate every price.
    pub fn validate(&self) -> PaveResult<()> {
        for (layer_type, cost) in &self.costs {
            if !cost.is_finite() || *cost < 0.0 {
                return Err(PaveError::invalid_input(
                    format!("cost_per_mm[{}]", layer_type),
                    cost.to_string(),
                    "Cost per mm cannot be negative",
                ));
            }
        }
        Ok(())
    }

    pub fn set(&mut self, layer_type: LayerType, cost_per_mm: f64) {
        self.costs.insert(layer_type, cost_per_mm);
    }

    /// Parse `"Asphalt:50, Base:40"`. Types not listed cost 0.
    pub fn parse(text: &str) -> PaveResult<Self> {
        let mut table = CostTable::empty();
        for item in text.split(',').filter(|item| !item.trim().is_empty()) {
            let (kind, cost) = item.split_once(':').ok_or_else(|| {
                PaveError::invalid_input("costs", item.trim(), "Expected <layer type>:<cost per mm>")
            })?;
            let cost: f64 = cost
                .trim()
                .parse()
                .map_err(|_| PaveError::invalid_input("cost_per_mm", cost.trim(), "Cost must be numeric"))?;
            table.set(LayerType::from_str_flexible(kind)?, cost);
        }
        table.validate()?;
        Ok(table)
    }

    /// Price per mm for a layer type.
    ///
    /// Default policy: a type with no entry costs 0. This is not an error.
    pub fn cost_per_mm(&self, layer_type: LayerType) -> f64 {
        self.costs.get(&layer_type).copied().unwrap_or(0.0)
    }
}

/// Preview distress figures derived from total thickness only.
///
/// Not comparable with [`crate::performance::DistressResult`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignPreview {
    /// `total_thickness * 0.05` (cracks)
    pub fatigue_cracking: f64,
    /// `total_thickness * 0.03` (mm)
    pub rutting: f64,
    /// `total_thickness * 0.02` (cracks)
    pub thermal_cracking: f64,
}

const PREVIEW_FATIGUE_PER_MM: f64 = 0.05;
const PREVIEW_RUTTING_PER_MM: f64 = 0.03;
const PREVIEW_THERMAL_PER_MM: f64 = 0.02;

/// Thickness/cost summary of a layer stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDesignSummary {
    pub total_thickness_mm: f64,
    pub total_cost: f64,
    pub preview: DesignPreview,
}

/// Summarize a layer stack against a cost table.
///
/// - total thickness = Σ thickness
/// - total cost = Σ `costs.cost_per_mm(type) * thickness` (missing types cost 0)
/// - preview distresses scale linearly with total thickness
pub fn summarize_layers(layers: &[PavementLayer], costs: &CostTable) -> LayerDesignSummary {
    let total_thickness_mm: f64 = layers.iter().map(|l| l.thickness_mm).sum();
    let total_cost: f64 = layers
        .iter()
        .map(|l| costs.cost_per_mm(l.layer_type) * l.thickness_mm)
        .sum();

    let summary = LayerDesignSummary {
        total_thickness_mm,
        total_cost,
        preview: DesignPreview {
            fatigue_cracking: total_thickness_mm * PREVIEW_FATIGUE_PER_MM,
            rutting: total_thickness_mm * PREVIEW_RUTTING_PER_MM,
            thermal_cracking: total_thickness_mm * PREVIEW_THERMAL_PER_MM,
        },
    };
    info!(
        "Layer design summary: {} layers, {} mm, cost {:.2}",
        layers.len(),
        total_thickness_mm,
        total_cost
    );
    summary
}
