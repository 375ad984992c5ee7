//! Bin Builder.
//!
//! Expands each stock entry into one `BinMeta` per physical sheet,
//! in stock-array order then ascending `index_within_stock`, with the
//! configured trim removed from the usable area.

use crate::model::{BinMeta, OptimizeRequest};
use crate::quantize::Quantizer;

/// Expands `req.stock` into one `BinMeta` per physical sheet.
pub(crate) fn build_bins(req: &OptimizeRequest, quantizer: &Quantizer) -> Vec<BinMeta> {
    let trim = req.params.trim_mm;
    let mut bins = Vec::new();

    for (stock_index, stock) in req.stock.iter().enumerate() {
        let usable_w_mm = stock.width_mm - trim.left - trim.right;
        let usable_h_mm = stock.height_mm - trim.top - trim.bottom;
        let usable_w_int = quantizer.to_int(usable_w_mm);
        let usable_h_int = quantizer.to_int(usable_h_mm);

        for index_within_stock in 0..stock.qty {
            bins.push(BinMeta {
                stock_index,
                index_within_stock,
                full_w_mm: stock.width_mm,
                full_h_mm: stock.height_mm,
                trim_left_mm: trim.left,
                trim_top_mm: trim.top,
                usable_w_int,
                usable_h_int,
                usable_w_mm,
                usable_h_mm,
            });
        }
    }

    bins
}
