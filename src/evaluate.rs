//! Evaluator.
//!
//! Translates a restart's packed rectangles from bin-local integer
//! coordinates back to full-sheet millimeter coordinates, groups them
//! into `Solution`s in first-seen bin order, and scores the result.

use fnv::FnvHashMap;

use crate::model::{BinMeta, OptimizeRequest, PackedRect, Placement, RectMeta, Solution};
use crate::quantize::Quantizer;

/// Score and per-sheet layout for one evaluated restart.
pub(crate) struct Evaluation {
    pub(crate) used_stock_count: usize,
    pub(crate) waste_area_mm2: f64,
    pub(crate) waste_percent: f64,
    pub(crate) placed_count: usize,
    pub(crate) solutions: Vec<Solution>,
}

/// Evaluates one restart's packed rectangles against its request and bins.
///
/// Bins are ordered by the index at which they are *first* encountered
/// while walking `packed` in the packer's own output order, not by
/// bin-array order.
pub(crate) fn evaluate(
    req: &OptimizeRequest,
    bins: &[BinMeta],
    rect_meta: &FnvHashMap<u64, RectMeta>,
    packed: &[PackedRect],
    quantizer: &Quantizer,
) -> Evaluation {
    let mut solution_index_of_bin: FnvHashMap<usize, usize> = FnvHashMap::default();
    let mut solutions: Vec<Solution> = Vec::new();
    let mut bin_index_of_solution: Vec<usize> = Vec::new();

    for rect in packed {
        let bin = &bins[rect.bin_index];
        let meta = &rect_meta[&rect.rect_id];

        let solution_idx = *solution_index_of_bin.entry(rect.bin_index).or_insert_with(|| {
            solutions.push(Solution {
                stock_id: req.stock[bin.stock_index].id.clone(),
                index: bin.index_within_stock,
                width_mm: bin.full_w_mm,
                height_mm: bin.full_h_mm,
                trim_mm: req.params.trim_mm,
                placements: Vec::new(),
            });
            bin_index_of_solution.push(rect.bin_index);
            solutions.len() - 1
        });

        let item = &req.items[meta.item_index];
        solutions[solution_idx].placements.push(Placement {
            item_id: item.id.clone(),
            instance: meta.instance_no,
            x_mm: bin.trim_left_mm + quantizer.to_mm(rect.x_int),
            y_mm: bin.trim_top_mm + quantizer.to_mm(rect.y_int),
            width_mm: meta.placed_w_mm,
            height_mm: meta.placed_h_mm,
            rotated: meta.rotated,
            pattern_direction: meta.pattern_direction,
        });
    }

    let used_stock_count = solutions.len();

    let used_area_mm2: f64 = bin_index_of_solution
        .iter()
        .map(|&bin_index| {
            let bin = &bins[bin_index];
            bin.usable_w_mm * bin.usable_h_mm
        })
        .sum();

    let item_area_mm2: f64 = solutions
        .iter()
        .flat_map(|s| s.placements.iter())
        .map(|p| p.width_mm * p.height_mm)
        .sum();

    let waste_area_mm2 = (used_area_mm2 - item_area_mm2).max(0.0);
    let waste_percent = if used_area_mm2 > 0.0 { waste_area_mm2 / used_area_mm2 * 100.0 } else { 0.0 };
    let placed_count = packed.len();

    Evaluation { used_stock_count, waste_area_mm2, waste_percent, placed_count, solutions }
}
