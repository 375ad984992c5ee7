//! Search Driver and engine resolution.
//!
//! Runs a time-budgeted multi-restart loop: each restart draws a fresh
//! deterministic seed, builds a fresh shuffled/sorted instance list,
//! packs it with the resolved packer family, and, for guillotine mode,
//! rejects any layout that isn't guillotine-separable. The best
//! feasible restart, by the request's objective, wins.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use fnv::FnvHashMap;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::bins::build_bins;
use crate::config::Config;
use crate::error::{PackError, Result};
use crate::evaluate::{evaluate, Evaluation};
use crate::guillotine_check::{is_guillotine, CheckRect};
use crate::instances::build_instances;
use crate::model::{
    BinSelect, EngineOverride, EngineSummary, Mode, Objective, OptimizeOutput, OptimizeRequest,
    PackedRect, PackerKind, ResolvedEngine, Summary,
};
use crate::packer::{guillotine::GuillotineBin, maxrects::MaxRectsBin, skyline::SkylineBin, Adapter, SingleBinPacker};
use crate::quantize::Quantizer;
use crate::rng::splitmix64;
use crate::validate::{validate_fit, validate_request};

const MIN_RESTART_SLICE_MS: u64 = 30;

/// Resolves `params.mode` and `params.engine` into their fully-defaulted
/// forms, enforcing the packer/mode pairing the two modes require.
fn resolve_mode_engine(req: &OptimizeRequest) -> Result<(Mode, ResolvedEngine)> {
    let mode = req.params.mode.unwrap_or_default();
    let default_packer = if mode == Mode::Guillotine { PackerKind::Guillotine } else { PackerKind::MaxRects };

    let engine = match req.params.engine {
        None => ResolvedEngine {
            packer: default_packer,
            bin_select: BinSelect::BestFit,
            sort: crate::model::SortMode::AreaDesc,
        },
        Some(EngineOverride { packer, bin_select, sort }) => ResolvedEngine {
            packer: packer.unwrap_or(default_packer),
            bin_select: bin_select.unwrap_or(BinSelect::BestFit),
            sort: sort.unwrap_or(crate::model::SortMode::AreaDesc),
        },
    };

    if mode == Mode::Guillotine && engine.packer != PackerKind::Guillotine {
        return Err(PackError::validation("engine.packer must be \"guillotine\" for mode=\"guillotine\""));
    }
    if mode == Mode::Nested && engine.packer == PackerKind::Guillotine {
        return Err(PackError::validation("engine.packer must not be \"guillotine\" for mode=\"nested\""));
    }

    Ok((mode, engine))
}

fn pack_instances<P: SingleBinPacker>(
    bins: &[crate::model::BinMeta],
    bin_select: BinSelect,
    instances: &[(u64, crate::model::RectMeta)],
) -> Vec<PackedRect> {
    let mut adapter = Adapter::<P>::new(bin_select);
    for bin in bins {
        adapter.add_bin(bin.usable_w_int, bin.usable_h_int);
    }
    for (rect_id, meta) in instances {
        adapter.add_rect(*rect_id, meta.w_eff_int, meta.h_eff_int);
    }
    adapter.pack();
    adapter.placed_rects()
}

fn wall_clock_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

struct Incumbent {
    used_stock_count: usize,
    waste_area_mm2: f64,
    waste_percent: f64,
    seed: u64,
    solutions: Vec<crate::model::Solution>,
}

/// is `candidate` strictly better than `incumbent` under `objective`
fn is_better(objective: Objective, candidate_used: usize, candidate_waste: f64, incumbent: &Incumbent) -> bool {
    match objective {
        Objective::MinSheets => {
            (candidate_used, candidate_waste) < (incumbent.used_stock_count, incumbent.waste_area_mm2)
        }
        Objective::MinWaste => {
            (candidate_waste, candidate_used) < (incumbent.waste_area_mm2, incumbent.used_stock_count)
        }
    }
}

/// Runs the full packing pipeline for one request: validation, bin
/// construction, the restart search, and scoring of the winning layout.
#[tracing::instrument(skip_all, fields(restarts = req.params.restarts, objective = ?req.params.objective))]
pub fn optimize(req: &OptimizeRequest, config: &Config) -> Result<OptimizeOutput> {
    let scale = req.params.unit_scale.unwrap_or(config.default_unit_scale);
    let quantizer = Quantizer::new(scale)?;

    let (mode, engine) = resolve_mode_engine(req)?;
    validate_request(req, config)?;

    let bins = build_bins(req, &quantizer);
    validate_fit(req, &bins, &quantizer)?;

    let start = Instant::now();
    let time_limit_ms = req.params.time_limit_ms;
    let restarts = req.params.restarts.max(1);

    let slice_ms = time_limit_ms / restarts as u64;
    let restarts_used = if slice_ms < MIN_RESTART_SLICE_MS {
        let by_budget = (time_limit_ms / MIN_RESTART_SLICE_MS).max(1);
        restarts.min(by_budget as u32)
    } else {
        restarts
    };

    let base_seed = req.params.seed.unwrap_or_else(wall_clock_ms);
    tracing::debug!(bins = bins.len(), restarts_used, packer = ?engine.packer, "search starting");

    let mut incumbent: Option<Incumbent> = None;

    for i in 0..restarts_used {
        let elapsed_ms = start.elapsed().as_millis() as u64;
        if elapsed_ms > time_limit_ms {
            tracing::warn!(elapsed_ms, time_limit_ms, restart = i, "time budget exceeded");
            return Err(PackError::Timeout);
        }

        let seed_i = splitmix64(base_seed.wrapping_add(i as u64));
        let mut rng = StdRng::seed_from_u64(seed_i);

        let instances = build_instances(req, &quantizer, engine.sort, &mut rng)?;

        let packed = match engine.packer {
            PackerKind::Guillotine => pack_instances::<GuillotineBin>(&bins, engine.bin_select, &instances),
            PackerKind::MaxRects => pack_instances::<MaxRectsBin>(&bins, engine.bin_select, &instances),
            PackerKind::Skyline => pack_instances::<SkylineBin>(&bins, engine.bin_select, &instances),
        };

        if packed.len() < instances.len() {
            tracing::debug!(restart = i, seed = seed_i, placed = packed.len(), requested = instances.len(), "restart rejected: incomplete packing");
            continue;
        }

        if mode == Mode::Guillotine && !all_bins_guillotine_separable(&bins, &packed) {
            tracing::debug!(restart = i, seed = seed_i, "restart rejected: not guillotine-separable");
            continue;
        }

        let rect_meta: FnvHashMap<u64, crate::model::RectMeta> =
            instances.into_iter().collect();

        let Evaluation { used_stock_count, waste_area_mm2, waste_percent, placed_count, solutions } =
            evaluate(req, &bins, &rect_meta, &packed, &quantizer);

        if placed_count < rect_meta.len() {
            tracing::debug!(restart = i, seed = seed_i, "restart rejected: evaluator dropped placements");
            continue;
        }

        let better = match &incumbent {
            None => true,
            Some(inc) => is_better(req.params.objective, used_stock_count, waste_area_mm2, inc),
        };

        if better {
            tracing::debug!(restart = i, seed = seed_i, used_stock_count, waste_area_mm2, "restart accepted as incumbent");
            incumbent = Some(Incumbent {
                used_stock_count,
                waste_area_mm2,
                waste_percent,
                seed: seed_i,
                solutions,
            });
        }
    }

    let incumbent = incumbent.ok_or_else(|| {
        tracing::warn!(restarts_used, "no feasible packing found within restart budget");
        PackError::constraint("unable to place all items with the provided stock")
    })?;

    let time_ms = start.elapsed().as_millis() as u64;

    let summary = Summary {
        mode,
        objective: req.params.objective,
        used_stock_count: incumbent.used_stock_count,
        total_waste_area_mm2: incumbent.waste_area_mm2,
        waste_percent: incumbent.waste_percent,
        time_ms,
        restarts_used,
        seed: base_seed,
        engine: EngineSummary { packer: engine.packer, bin_select: engine.bin_select, sort: engine.sort },
    };

    tracing::info!(
        used_stock_count = summary.used_stock_count,
        waste_percent = summary.waste_percent,
        time_ms,
        restarts_used,
        "optimization complete"
    );

    Ok(OptimizeOutput { summary, solutions: incumbent.solutions })
}

fn all_bins_guillotine_separable(bins: &[crate::model::BinMeta], packed: &[PackedRect]) -> bool {
    let mut by_bin: Vec<Vec<CheckRect>> = vec![Vec::new(); bins.len()];
    for rect in packed {
        by_bin[rect.bin_index].push(CheckRect { x: rect.x_int, y: rect.y_int, w: rect.w_int, h: rect.h_int });
    }

    by_bin.iter().zip(bins.iter()).all(|(rects, bin)| {
        rects.is_empty() || is_guillotine(rects, 0, 0, bin.usable_w_int, bin.usable_h_int)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EngineOverride, Item, Params, PatternDirection, Rotation, Stock, Trim};

    fn base_request() -> OptimizeRequest {
        OptimizeRequest {
            units: "mm".to_string(),
            params: Params {
                spacing_mm: 0.0,
                trim_mm: Trim::default(),
                time_limit_ms: 2000,
                restarts: 4,
                objective: Objective::MinWaste,
                seed: Some(7),
                engine: None::<EngineOverride>,
                unit_scale: Some(100),
                mode: None,
            },
            stock: vec![Stock { id: "s1".to_string(), width_mm: 1000.0, height_mm: 500.0, qty: 2 }],
            items: vec![Item {
                id: "i1".to_string(),
                width_mm: 200.0,
                height_mm: 100.0,
                qty: 4,
                rotation: Rotation::Forbid,
                pattern_direction: PatternDirection::None,
            }],
        }
    }

    #[test]
    fn defaults_mode_to_guillotine_and_packer_to_guillotine() {
        let req = base_request();
        let (mode, engine) = resolve_mode_engine(&req).unwrap();
        assert_eq!(mode, Mode::Guillotine);
        assert_eq!(engine.packer, PackerKind::Guillotine);
    }

    #[test]
    fn rejects_non_guillotine_packer_in_guillotine_mode() {
        let mut req = base_request();
        req.params.engine = Some(EngineOverride {
            packer: Some(PackerKind::MaxRects),
            bin_select: None,
            sort: None,
        });
        assert!(resolve_mode_engine(&req).is_err());
    }

    #[test]
    fn rejects_guillotine_packer_in_nested_mode() {
        let mut req = base_request();
        req.params.mode = Some(Mode::Nested);
        assert!(resolve_mode_engine(&req).is_ok());
        req.params.engine =
            Some(EngineOverride { packer: Some(PackerKind::Guillotine), bin_select: None, sort: None });
        assert!(resolve_mode_engine(&req).is_err());
    }

    #[test]
    fn packs_a_simple_request_successfully() {
        let req = base_request();
        let output = optimize(&req, &Config::default()).unwrap();
        let placed: usize = output.solutions.iter().map(|s| s.placements.len()).sum();
        assert_eq!(placed, 4);
    }

    #[test]
    fn same_seed_gives_deterministic_result() {
        let req = base_request();
        let config = Config::default();
        let a = optimize(&req, &config).unwrap();
        let b = optimize(&req, &config).unwrap();
        assert_eq!(a.summary.used_stock_count, b.summary.used_stock_count);
        assert_eq!(a.summary.total_waste_area_mm2, b.summary.total_waste_area_mm2);
        assert_eq!(a.solutions.len(), b.solutions.len());
    }

    #[test]
    fn infeasible_request_yields_constraint_error() {
        let mut req = base_request();
        req.stock = vec![Stock { id: "s1".to_string(), width_mm: 1000.0, height_mm: 500.0, qty: 1 }];
        req.items[0].qty = 100;
        req.params.restarts = 1;
        req.params.time_limit_ms = 100;
        let result = optimize(&req, &Config::default());
        assert!(result.is_err());
    }
}
