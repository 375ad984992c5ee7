//! Guillotine family, hardcoded to BestShortSideFit free-rect choice
//! plus a shorter-leftover-axis split ("BSSF-SAS").
//!
//! Free rects are kept disjoint: placing a rect removes the free rect it
//! was chosen from, splits the leftover space along the shorter axis,
//! then prunes any free rect fully contained in another and merges
//! adjacent free rects back together. This module only ever runs the
//! one heuristic pair its name commits to.

use super::{Placement, SingleBinPacker};

#[derive(Debug, Clone, Copy)]
struct FreeRect {
    x: i64,
    y: i64,
    w: i64,
    h: i64,
}

pub(crate) struct GuillotineBin {
    free_rects: Vec<FreeRect>,
}

impl SingleBinPacker for GuillotineBin {
    fn new(w: i64, h: i64) -> Self {
        GuillotineBin { free_rects: vec![FreeRect { x: 0, y: 0, w, h }] }
    }

    fn try_place(&self, w: i64, h: i64) -> Option<Placement> {
        best_fit(&self.free_rects, w, h).map(|(fr, score)| Placement { x: fr.x, y: fr.y, score })
    }

    fn commit(&mut self, w: i64, h: i64, placement: &Placement) {
        let index = self
            .free_rects
            .iter()
            .position(|fr| {
                fr.x == placement.x && fr.y == placement.y && fr.w >= w && fr.h >= h
            })
            .expect("commit called without a matching try_place result");

        let free_rect = self.free_rects.remove(index);
        split_and_insert(&mut self.free_rects, free_rect, w, h);
        prune_contained(&mut self.free_rects);
        merge_adjacent(&mut self.free_rects);
    }
}

fn best_fit(free_rects: &[FreeRect], w: i64, h: i64) -> Option<(FreeRect, i64)> {
    free_rects
        .iter()
        .filter(|fr| fr.w >= w && fr.h >= h)
        .map(|fr| (*fr, short_side_fit_score(fr, w, h)))
        .min_by_key(|(_, score)| *score)
}

fn short_side_fit_score(fr: &FreeRect, w: i64, h: i64) -> i64 {
    let leftover_w = fr.w - w;
    let leftover_h = fr.h - h;
    leftover_w.min(leftover_h)
}

/// Splits `free_rect` after placing `(w, h)` at its bottom-left corner,
/// choosing the classic guillotine split variant that leaves the
/// shorter leftover axis as a single piece.
fn split_and_insert(free_rects: &mut Vec<FreeRect>, free_rect: FreeRect, w: i64, h: i64) {
    let leftover_w = free_rect.w - w;
    let leftover_h = free_rect.h - h;

    let (right, top) = if leftover_w <= leftover_h {
        // Shorter axis is width: give the right leftover full height,
        // the top leftover only the placed width.
        (
            FreeRect { x: free_rect.x + w, y: free_rect.y, w: leftover_w, h: free_rect.h },
            FreeRect { x: free_rect.x, y: free_rect.y + h, w, h: leftover_h },
        )
    } else {
        // Shorter axis is height: give the top leftover full width,
        // the right leftover only the placed height.
        (
            FreeRect { x: free_rect.x + w, y: free_rect.y, w: leftover_w, h },
            FreeRect { x: free_rect.x, y: free_rect.y + h, w: free_rect.w, h: leftover_h },
        )
    };

    if right.w > 0 && right.h > 0 {
        free_rects.push(right);
    }
    if top.w > 0 && top.h > 0 {
        free_rects.push(top);
    }
}

fn prune_contained(free_rects: &mut Vec<FreeRect>) {
    let mut i = 0;
    while i < free_rects.len() {
        let a = free_rects[i];
        let contained = free_rects
            .iter()
            .enumerate()
            .any(|(j, b)| j != i && contains(b, &a));
        if contained {
            free_rects.remove(i);
        } else {
            i += 1;
        }
    }
}

fn contains(outer: &FreeRect, inner: &FreeRect) -> bool {
    inner.x >= outer.x
        && inner.y >= outer.y
        && inner.x + inner.w <= outer.x + outer.w
        && inner.y + inner.h <= outer.y + outer.h
}

fn merge_adjacent(free_rects: &mut Vec<FreeRect>) {
    let mut merged = true;
    while merged {
        merged = false;
        'outer: for i in 0..free_rects.len() {
            for j in (i + 1)..free_rects.len() {
                let a = free_rects[i];
                let b = free_rects[j];
                if a.y == b.y && a.h == b.h {
                    if a.x + a.w == b.x {
                        free_rects[i] = FreeRect { x: a.x, y: a.y, w: a.w + b.w, h: a.h };
                        free_rects.remove(j);
                        merged = true;
                        break 'outer;
                    } else if b.x + b.w == a.x {
                        free_rects[i] = FreeRect { x: b.x, y: a.y, w: a.w + b.w, h: a.h };
                        free_rects.remove(j);
                        merged = true;
                        break 'outer;
                    }
                }
                if a.x == b.x && a.w == b.w {
                    if a.y + a.h == b.y {
                        free_rects[i] = FreeRect { x: a.x, y: a.y, w: a.w, h: a.h + b.h };
                        free_rects.remove(j);
                        merged = true;
                        break 'outer;
                    } else if b.y + b.h == a.y {
                        free_rects[i] = FreeRect { x: a.x, y: b.y, w: a.w, h: a.h + b.h };
                        free_rects.remove(j);
                        merged = true;
                        break 'outer;
                    }
                }
            }
        }
    }
}
