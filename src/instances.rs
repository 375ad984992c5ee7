//! Instance Builder.
//!
//! Expands each item's `qty` into individually-oriented rectangle
//! instances for one restart, then always shuffles and optionally
//! stable-sorts them before they reach the packer adapter.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::Result;
use crate::model::{OptimizeRequest, PatternDirection, RectMeta, SortMode};
use crate::orientation::resolve_orientations;
use crate::quantize::Quantizer;

/// Builds the shuffled, sorted instance list for a single restart.
///
/// Rotation is chosen uniformly at random from the allowed orientations
/// for items with more than one; `rng` is also used for the mandatory
/// post-build shuffle.
pub(crate) fn build_instances(
    req: &OptimizeRequest,
    quantizer: &Quantizer,
    sort: SortMode,
    rng: &mut StdRng,
) -> Result<Vec<(u64, RectMeta)>> {
    let spacing_int = quantizer.to_int(req.params.spacing_mm);
    let mut next_id: u64 = 0;
    let mut instances = Vec::new();

    for (item_index, item) in req.items.iter().enumerate() {
        let w_int = quantizer.to_int(item.width_mm);
        let h_int = quantizer.to_int(item.height_mm);
        let orientations =
            resolve_orientations(w_int, h_int, item.rotation, item.pattern_direction)?;

        for instance_no in 1..=item.qty {
            let orientation = if orientations.len() == 1 {
                orientations[0]
            } else {
                orientations[rng.gen_range(0..orientations.len())]
            };

            let (placed_w_mm, placed_h_mm) = if orientation.rotated {
                (item.height_mm, item.width_mm)
            } else {
                (item.width_mm, item.height_mm)
            };

            let pattern_direction = if orientation.rotated {
                item.pattern_direction.rotated()
            } else {
                item.pattern_direction
            };

            let rect_id = next_id;
            next_id += 1;

            instances.push((
                rect_id,
                RectMeta {
                    item_index,
                    instance_no,
                    placed_w_mm,
                    placed_h_mm,
                    rotated: orientation.rotated,
                    pattern_direction,
                    w_eff_int: orientation.w + spacing_int,
                    h_eff_int: orientation.h + spacing_int,
                },
            ));
        }
    }

    instances.shuffle(rng);

    match sort {
        SortMode::None => {}
        SortMode::AreaDesc => {
            instances.sort_by_key(|(_, meta)| std::cmp::Reverse(meta.w_eff_int * meta.h_eff_int));
        }
        SortMode::MaxsideDesc => {
            instances
                .sort_by_key(|(_, meta)| std::cmp::Reverse(meta.w_eff_int.max(meta.h_eff_int)));
        }
    }

    Ok(instances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EngineOverride, Item, Objective, Params, Rotation, Stock, Trim};
    use rand::SeedableRng;

    fn request(items: Vec<Item>, spacing_mm: f64) -> OptimizeRequest {
        OptimizeRequest {
            units: "mm".to_string(),
            params: Params {
                spacing_mm,
                trim_mm: Trim::default(),
                time_limit_ms: 1000,
                restarts: 1,
                objective: Objective::MinWaste,
                seed: Some(1),
                engine: None::<EngineOverride>,
                unit_scale: Some(100),
                mode: None,
            },
            stock: vec![Stock { id: "s1".to_string(), width_mm: 1000.0, height_mm: 500.0, qty: 1 }],
            items,
        }
    }

    fn item(id: &str, w: f64, h: f64, qty: u32, rotation: Rotation) -> Item {
        Item {
            id: id.to_string(),
            width_mm: w,
            height_mm: h,
            qty,
            rotation,
            pattern_direction: PatternDirection::None,
        }
    }

    #[test]
    fn expands_exact_quantity_with_unique_ids() {
        let req = request(vec![item("i1", 100.0, 50.0, 5, Rotation::Forbid)], 0.0);
        let quantizer = Quantizer::new(100).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let instances = build_instances(&req, &quantizer, SortMode::None, &mut rng).unwrap();
        assert_eq!(instances.len(), 5);
        let mut ids: Vec<u64> = instances.iter().map(|(id, _)| *id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn spacing_is_added_to_effective_dims() {
        let req = request(vec![item("i1", 100.0, 50.0, 1, Rotation::Forbid)], 2.0);
        let quantizer = Quantizer::new(100).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let instances = build_instances(&req, &quantizer, SortMode::None, &mut rng).unwrap();
        let (_, meta) = &instances[0];
        assert_eq!(meta.w_eff_int, 100_00 + 200);
        assert_eq!(meta.h_eff_int, 50_00 + 200);
    }

    #[test]
    fn area_desc_sorts_descending_by_effective_area() {
        let req = request(
            vec![
                item("small", 10.0, 10.0, 1, Rotation::Forbid),
                item("large", 90.0, 90.0, 1, Rotation::Forbid),
            ],
            0.0,
        );
        let quantizer = Quantizer::new(100).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let instances = build_instances(&req, &quantizer, SortMode::AreaDesc, &mut rng).unwrap();
        let areas: Vec<i64> = instances.iter().map(|(_, m)| m.w_eff_int * m.h_eff_int).collect();
        let mut sorted = areas.clone();
        sorted.sort_unstable_by_key(|a| std::cmp::Reverse(*a));
        assert_eq!(areas, sorted);
    }

    #[test]
    fn same_seed_gives_same_instance_order() {
        let req = request(vec![item("i1", 30.0, 80.0, 10, Rotation::Allow90)], 0.0);
        let quantizer = Quantizer::new(100).unwrap();
        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);
        let a = build_instances(&req, &quantizer, SortMode::None, &mut rng_a).unwrap();
        let b = build_instances(&req, &quantizer, SortMode::None, &mut rng_b).unwrap();
        let a_rot: Vec<bool> = a.iter().map(|(_, m)| m.rotated).collect();
        let b_rot: Vec<bool> = b.iter().map(|(_, m)| m.rotated).collect();
        assert_eq!(a_rot, b_rot);
    }
}
