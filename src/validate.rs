//! Pre-flight Validator.
//!
//! Runs entirely before any search begins. Structural checks that don't
//! need bin geometry run first; the fit check runs after `bins.rs` has
//! expanded stock, since it needs each bin's usable dimensions.

use crate::error::{PackError, Result};
use crate::model::{BinMeta, Item, OptimizeRequest, Rotation, UNITS_MM};
use crate::orientation::resolve_orientations;
use crate::quantize::Quantizer;

const MAX_STOCK_ENTRIES: usize = 50;

/// Validates request structure and static preconditions, independent of bin geometry.
///
/// Checks, in order: `units == "mm"`; total requested item quantity does
/// not exceed `min(5000, config.max_instances)`; at most 50 stock
/// entries; and for each stock entry, its trim does not consume the
/// entire sheet along either axis.
pub fn validate_request(req: &OptimizeRequest, config: &crate::config::Config) -> Result<()> {
    if req.units != UNITS_MM {
        return Err(PackError::validation(format!(
            "units must be \"mm\", got {:?}",
            req.units
        )));
    }

    let total_qty: u64 = req.items.iter().map(|i| i.qty as u64).sum();
    let limit = (config.max_instances as u64).min(5000);
    if total_qty > limit {
        return Err(PackError::validation_with_details(
            format!("total requested item quantity {} exceeds limit {}", total_qty, limit),
            serde_json::json!({"total_qty": total_qty, "limit": limit}),
        ));
    }

    if req.stock.len() > MAX_STOCK_ENTRIES {
        return Err(PackError::validation(format!(
            "at most {} stock entries are allowed, got {}",
            MAX_STOCK_ENTRIES,
            req.stock.len()
        )));
    }

    let trim = req.params.trim_mm;
    for stock in &req.stock {
        if trim.left + trim.right >= stock.width_mm {
            return Err(PackError::validation_with_details(
                format!("trim consumes stock {:?} entirely along its width", stock.id),
                serde_json::json!({"stock_id": stock.id}),
            ));
        }
        if trim.top + trim.bottom >= stock.height_mm {
            return Err(PackError::validation_with_details(
                format!("trim consumes stock {:?} entirely along its height", stock.id),
                serde_json::json!({"stock_id": stock.id}),
            ));
        }
    }

    Ok(())
}

/// Checks every item has at least one allowed orientation that fits in
/// at least one bin, after spacing is applied.
///
/// Fails with `Validation` naming the first item that fits nowhere.
pub fn validate_fit(
    req: &OptimizeRequest,
    bins: &[BinMeta],
    quantizer: &Quantizer,
) -> Result<()> {
    let spacing_int = quantizer.to_int(req.params.spacing_mm);

    for item in &req.items {
        if !item_fits_somewhere(item, bins, quantizer, spacing_int)? {
            return Err(PackError::validation_with_details(
                format!("item {:?} does not fit in any available bin", item.id),
                serde_json::json!({"item_id": item.id}),
            ));
        }
    }

    Ok(())
}

fn item_fits_somewhere(
    item: &Item,
    bins: &[BinMeta],
    quantizer: &Quantizer,
    spacing_int: i64,
) -> Result<bool> {
    let w_int = quantizer.to_int(item.width_mm);
    let h_int = quantizer.to_int(item.height_mm);
    let orientations = resolve_orientations(w_int, h_int, item.rotation, item.pattern_direction)?;

    for orientation in &orientations {
        let w_eff = orientation.w + spacing_int;
        let h_eff = orientation.h + spacing_int;
        for bin in bins {
            if w_eff <= bin.usable_w_int && h_eff <= bin.usable_h_int {
                return Ok(true);
            }
        }
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bins::build_bins;
    use crate::config::Config;
    use crate::model::{EngineOverride, Objective, Params, PatternDirection, Stock, Trim};

    fn base_request() -> OptimizeRequest {
        OptimizeRequest {
            units: "mm".to_string(),
            params: Params {
                spacing_mm: 0.0,
                trim_mm: Trim::default(),
                time_limit_ms: 1000,
                restarts: 4,
                objective: Objective::MinWaste,
                seed: Some(1),
                engine: None::<EngineOverride>,
                unit_scale: Some(100),
                mode: None,
            },
            stock: vec![Stock { id: "s1".to_string(), width_mm: 1000.0, height_mm: 500.0, qty: 2 }],
            items: vec![Item {
                id: "i1".to_string(),
                width_mm: 100.0,
                height_mm: 50.0,
                qty: 3,
                rotation: Rotation::Forbid,
                pattern_direction: PatternDirection::None,
            }],
        }
    }

    #[test]
    fn rejects_non_mm_units() {
        let mut req = base_request();
        req.units = "in".to_string();
        assert!(validate_request(&req, &Config::default()).is_err());
    }

    #[test]
    fn rejects_too_many_stock_entries() {
        let mut req = base_request();
        req.stock = (0..51)
            .map(|i| Stock { id: format!("s{}", i), width_mm: 1000.0, height_mm: 500.0, qty: 1 })
            .collect();
        assert!(validate_request(&req, &Config::default()).is_err());
    }

    #[test]
    fn rejects_quantity_over_limit() {
        let mut req = base_request();
        req.items[0].qty = 6000;
        assert!(validate_request(&req, &Config::default()).is_err());
    }

    #[test]
    fn rejects_trim_consuming_full_width() {
        let mut req = base_request();
        req.params.trim_mm = Trim { left: 600.0, right: 500.0, top: 0.0, bottom: 0.0 };
        assert!(validate_request(&req, &Config::default()).is_err());
    }

    #[test]
    fn accepts_well_formed_request() {
        let req = base_request();
        assert!(validate_request(&req, &Config::default()).is_ok());
    }

    #[test]
    fn fit_check_passes_for_item_smaller_than_bin() {
        let req = base_request();
        let quantizer = Quantizer::new(100).unwrap();
        let bins = build_bins(&req, &quantizer);
        assert!(validate_fit(&req, &bins, &quantizer).is_ok());
    }

    #[test]
    fn fit_check_fails_for_oversized_item() {
        let mut req = base_request();
        req.items[0].width_mm = 5000.0;
        let quantizer = Quantizer::new(100).unwrap();
        let bins = build_bins(&req, &quantizer);
        assert!(validate_fit(&req, &bins, &quantizer).is_err());
    }
}
