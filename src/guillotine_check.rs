//! Guillotine Checker.
//!
//! A structural post-check, independent of which packer family
//! produced the layout: a set of placements is guillotine-separable
//! only if some full-length straight cut splits it into two halves
//! that are themselves separable, recursively down to single rects.

use std::collections::BTreeSet;

/// An axis-aligned rectangle in bin-local integer coordinates.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CheckRect {
    pub(crate) x: i64,
    pub(crate) y: i64,
    pub(crate) w: i64,
    pub(crate) h: i64,
}

/// Returns whether `rects`, confined to the box `(x0, y0, w, h)`, can be
/// produced by a sequence of edge-to-edge guillotine cuts.
pub(crate) fn is_guillotine(rects: &[CheckRect], x0: i64, y0: i64, w: i64, h: i64) -> bool {
    if rects.len() <= 1 {
        return true;
    }

    let mut xs: BTreeSet<i64> = BTreeSet::new();
    for r in rects {
        xs.insert(r.x);
        xs.insert(r.x + r.w);
    }
    for x in xs {
        if x <= x0 || x >= x0 + w {
            continue;
        }
        if rects.iter().any(|r| r.x < x && x < r.x + r.w) {
            continue;
        }
        let left: Vec<CheckRect> = rects.iter().copied().filter(|r| r.x + r.w <= x).collect();
        let right: Vec<CheckRect> = rects.iter().copied().filter(|r| r.x >= x).collect();
        if is_guillotine(&left, x0, y0, x - x0, h) && is_guillotine(&right, x, y0, x0 + w - x, h) {
            return true;
        }
    }

    let mut ys: BTreeSet<i64> = BTreeSet::new();
    for r in rects {
        ys.insert(r.y);
        ys.insert(r.y + r.h);
    }
    for y in ys {
        if y <= y0 || y >= y0 + h {
            continue;
        }
        if rects.iter().any(|r| r.y < y && y < r.y + r.h) {
            continue;
        }
        let bottom: Vec<CheckRect> = rects.iter().copied().filter(|r| r.y + r.h <= y).collect();
        let top: Vec<CheckRect> = rects.iter().copied().filter(|r| r.y >= y).collect();
        if is_guillotine(&bottom, x0, y0, w, y - y0) && is_guillotine(&top, x0, y, w, y0 + h - y) {
            return true;
        }
    }

    false
}
