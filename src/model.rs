//! Request/response data model.
//!
//! Field names mirror the wire schema of the service this crate is the
//! core of: `snake_case`, `_mm` for millimeter quantities, `_int` for
//! internal integer-scaled quantities. Unknown fields on the request
//! are rejected at the transport boundary, not here: the core receives
//! an already-parsed, already-type-checked value.

use serde::{Deserialize, Serialize};

/// Fixed unit tag accepted on a request.
pub const UNITS_MM: &str = "mm";

/// Whether an item may be rotated 90 degrees to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    /// The item must be placed in its declared orientation.
    Forbid,
    /// The item may be rotated 90 degrees.
    Allow90,
}

/// Linear pattern/grain direction constraint on an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternDirection {
    /// No pattern constraint.
    None,
    /// The longer side must run parallel to the placed width.
    AlongWidth,
    /// The longer side must run parallel to the placed height.
    AlongHeight,
}

impl PatternDirection {
    /// Returns the pattern direction as seen after a 90-degree rotation.
    pub fn rotated(self) -> PatternDirection {
        match self {
            PatternDirection::None => PatternDirection::None,
            PatternDirection::AlongWidth => PatternDirection::AlongHeight,
            PatternDirection::AlongHeight => PatternDirection::AlongWidth,
        }
    }
}

/// Optimization objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Minimize total waste area, then used-sheet count.
    MinWaste,
    /// Minimize used-sheet count, then waste area.
    MinSheets,
}

/// Cutting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Every cut must run edge-to-edge (panel-saw compatible).
    Guillotine,
    /// Cuts may start and stop mid-sheet (CNC compatible).
    Nested,
}

impl Default for Mode {
    /// Requests that omit `params.mode` are treated as `guillotine`.
    fn default() -> Self {
        Mode::Guillotine
    }
}

/// Packer family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackerKind {
    /// Guillotine splitting, BestShortSideFit choice + ShorterAxis split.
    Guillotine,
    /// MaxRects free-list, BestShortSideFit.
    MaxRects,
    /// Skyline data structure, BottomLeft.
    Skyline,
}

/// Bin-selection strategy when more than one bin can accept a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinSelect {
    /// Assign to the bin minimizing the packer heuristic's fit score.
    BestFit,
    /// Assign to the first bin that accepts the rectangle.
    FirstFit,
}

/// Instance ordering applied before packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Descending by effective area.
    AreaDesc,
    /// Descending by the longer effective side.
    MaxsideDesc,
    /// Keep the post-shuffle order.
    None,
}

/// Per-sheet edge margin removed from the usable area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trim {
    /// Margin removed from the left edge.
    pub left: f64,
    /// Margin removed from the right edge.
    pub right: f64,
    /// Margin removed from the top edge.
    pub top: f64,
    /// Margin removed from the bottom edge.
    pub bottom: f64,
}

impl Default for Trim {
    fn default() -> Self {
        Trim { left: 0.0, right: 0.0, top: 0.0, bottom: 0.0 }
    }
}

/// Caller-supplied packer/ordering overrides; any field left `None` is
/// defaulted by the engine resolution step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineOverride {
    /// Override for the packer family.
    pub packer: Option<PackerKind>,
    /// Override for the bin-selection strategy.
    pub bin_select: Option<BinSelect>,
    /// Override for the instance sort mode.
    pub sort: Option<SortMode>,
}

/// Resolved, fully-defaulted engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEngine {
    /// Packer family in use.
    pub packer: PackerKind,
    /// Bin-selection strategy in use.
    pub bin_select: BinSelect,
    /// Instance sort mode in use.
    pub sort: SortMode,
}

/// Search and geometry parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Params {
    /// Uniform inter-item spacing, in millimeters.
    pub spacing_mm: f64,
    /// Per-sheet edge trim.
    pub trim_mm: Trim,
    /// Wall-clock search budget, in milliseconds.
    pub time_limit_ms: u64,
    /// Requested number of restarts.
    pub restarts: u32,
    /// Optimization objective.
    pub objective: Objective,
    /// Deterministic base seed; if omitted, derived from wall-clock time at call entry.
    pub seed: Option<u64>,
    /// Packer/ordering overrides.
    pub engine: Option<EngineOverride>,
    /// Integer quantization scale; if omitted, `Config::default_unit_scale` is used.
    pub unit_scale: Option<i64>,
    /// Cutting mode; defaults to `Mode::Guillotine` if omitted.
    pub mode: Option<Mode>,
}

/// One stock (sheet) entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stock {
    /// Caller-assigned stock identifier.
    pub id: String,
    /// Full sheet width, in millimeters.
    pub width_mm: f64,
    /// Full sheet height, in millimeters.
    pub height_mm: f64,
    /// Number of physical sheets of this size available.
    pub qty: u32,
}

/// One item (demand piece) entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Caller-assigned item identifier.
    pub id: String,
    /// Declared width, in millimeters.
    pub width_mm: f64,
    /// Declared height, in millimeters.
    pub height_mm: f64,
    /// Number of instances of this item required.
    pub qty: u32,
    /// Rotation constraint.
    pub rotation: Rotation,
    /// Pattern/grain direction constraint.
    pub pattern_direction: PatternDirection,
}

/// Top-level optimization request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeRequest {
    /// Fixed unit tag; must equal `"mm"`.
    pub units: String,
    /// Search and geometry parameters.
    pub params: Params,
    /// Available stock sheets.
    pub stock: Vec<Stock>,
    /// Requested items.
    pub items: Vec<Item>,
}

/// One physical sheet slot, expanded from a `Stock` entry by quantity.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BinMeta {
    pub(crate) stock_index: usize,
    pub(crate) index_within_stock: u32,
    pub(crate) full_w_mm: f64,
    pub(crate) full_h_mm: f64,
    pub(crate) trim_left_mm: f64,
    pub(crate) trim_top_mm: f64,
    pub(crate) usable_w_int: i64,
    pub(crate) usable_h_int: i64,
    pub(crate) usable_w_mm: f64,
    pub(crate) usable_h_mm: f64,
}

/// One item instance materialized for a single restart.
#[derive(Debug, Clone)]
pub(crate) struct RectMeta {
    pub(crate) item_index: usize,
    pub(crate) instance_no: u32,
    pub(crate) placed_w_mm: f64,
    pub(crate) placed_h_mm: f64,
    pub(crate) rotated: bool,
    pub(crate) pattern_direction: PatternDirection,
    pub(crate) w_eff_int: i64,
    pub(crate) h_eff_int: i64,
}

/// One accepted placement from the packer adapter, in bin-local integer coordinates.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PackedRect {
    pub(crate) bin_index: usize,
    pub(crate) x_int: i64,
    pub(crate) y_int: i64,
    pub(crate) w_int: i64,
    pub(crate) h_int: i64,
    pub(crate) rect_id: u64,
}

/// One item placed on a sheet, in millimeter full-sheet coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Placement {
    /// Identifier of the originating item.
    pub item_id: String,
    /// 1-based instance number within that item.
    pub instance: u32,
    /// X of the placed rectangle's near edge, in full-sheet millimeter coordinates.
    pub x_mm: f64,
    /// Y of the placed rectangle's near edge, in full-sheet millimeter coordinates.
    pub y_mm: f64,
    /// Placed width, in millimeters.
    pub width_mm: f64,
    /// Placed height, in millimeters.
    pub height_mm: f64,
    /// Whether this placement is rotated 90 degrees from the item's declared orientation.
    pub rotated: bool,
    /// Pattern direction of the placed rectangle (post-rotation).
    pub pattern_direction: PatternDirection,
}

/// All placements on one used sheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Solution {
    /// Identifier of the stock entry this sheet came from.
    pub stock_id: String,
    /// 0-based index of this sheet within its stock entry's quantity.
    pub index: u32,
    /// Full sheet width, in millimeters.
    pub width_mm: f64,
    /// Full sheet height, in millimeters.
    pub height_mm: f64,
    /// Trim applied to this sheet.
    pub trim_mm: Trim,
    /// Placements on this sheet, in insertion order.
    pub placements: Vec<Placement>,
}

/// Resolved engine triple, as reported in a response summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSummary {
    /// Packer family used.
    pub packer: PackerKind,
    /// Bin-selection strategy used.
    pub bin_select: BinSelect,
    /// Instance sort mode used.
    pub sort: SortMode,
}

/// Summary statistics for a successful optimization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Summary {
    /// Cutting mode used.
    pub mode: Mode,
    /// Objective used.
    pub objective: Objective,
    /// Number of sheets with at least one placement.
    pub used_stock_count: usize,
    /// Total waste area over used sheets' usable area, in mm².
    pub total_waste_area_mm2: f64,
    /// Waste percent relative to used sheets' usable area.
    pub waste_percent: f64,
    /// Wall-clock search time, in milliseconds.
    pub time_ms: u64,
    /// Number of restarts actually run.
    pub restarts_used: u32,
    /// Base seed used for this search (pre-mixing).
    pub seed: u64,
    /// Resolved engine triple.
    pub engine: EngineSummary,
}

/// The core's own return value: everything computed by the packing
/// engine, excluding the externally-rendered SVG artifact.
#[derive(Debug, Clone)]
pub struct OptimizeOutput {
    /// Summary statistics.
    pub summary: Summary,
    /// Per-sheet placements.
    pub solutions: Vec<Solution>,
}

/// SVG artifact, produced by an external renderer from an `OptimizeOutput`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artifacts {
    /// UTF-8 SVG document. The core imposes no format contract beyond this.
    pub svg: String,
}

/// Full wire-compatible success response, assembled by a caller from an
/// `OptimizeOutput` plus an externally-rendered SVG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeResponse {
    /// Always `"ok"` for this type.
    pub status: String,
    /// Summary statistics.
    pub summary: Summary,
    /// Per-sheet placements.
    pub solutions: Vec<Solution>,
    /// Rendered artifacts.
    pub artifacts: Artifacts,
}

impl OptimizeResponse {
    /// Assembles a full response from the core's output and an externally-rendered SVG.
    pub fn new(output: OptimizeOutput, svg: String) -> Self {
        OptimizeResponse {
            status: "ok".to_string(),
            summary: output.summary,
            solutions: output.solutions,
            artifacts: Artifacts { svg },
        }
    }
}

/// Wire-compatible error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `"error"` for this type.
    pub status: String,
    /// Stable machine-readable error code.
    pub error_code: String,
    /// Human-readable message.
    pub message: String,
    /// Optional structured detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&crate::error::PackError> for ErrorResponse {
    fn from(err: &crate::error::PackError) -> Self {
        let details = match err {
            crate::error::PackError::Validation { details, .. } => details.clone(),
            _ => None,
        };
        ErrorResponse {
            status: "error".to_string(),
            error_code: err.error_code().to_string(),
            message: err.to_string(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_defaults_to_guillotine() {
        assert_eq!(Mode::default(), Mode::Guillotine);
    }

    #[test]
    fn pattern_direction_rotation_is_involutive() {
        for p in [PatternDirection::None, PatternDirection::AlongWidth, PatternDirection::AlongHeight] {
            assert_eq!(p.rotated().rotated(), p);
        }
    }

    #[test]
    fn serializes_with_snake_case_wire_names() {
        let value = serde_json::to_value(Rotation::Allow90).unwrap();
        assert_eq!(value, serde_json::json!("allow_90"));
        let value = serde_json::to_value(PatternDirection::AlongWidth).unwrap();
        assert_eq!(value, serde_json::json!("along_width"));
    }

    #[test]
    fn error_response_carries_validation_details() {
        let err = crate::error::PackError::validation_with_details(
            "bad",
            serde_json::json!({"field": "items[0].qty"}),
        );
        let resp: ErrorResponse = (&err).into();
        assert_eq!(resp.error_code, "VALIDATION_ERROR");
        assert!(resp.details.is_some());
    }
}
