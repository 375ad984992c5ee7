//! MaxRects family, hardcoded to BestShortSideFit.
//!
//! The free-rect list is allowed to overlap (unlike the guillotine
//! family's disjoint list): placing a rect intersects and splits every
//! free rect it overlaps, then prunes any free rect fully contained in
//! another. This module only ever runs the single BestShortSideFit
//! heuristic.

use super::{Placement, SingleBinPacker};

#[derive(Debug, Clone, Copy)]
struct FreeRect {
    x: i64,
    y: i64,
    w: i64,
    h: i64,
}

impl FreeRect {
    fn right(&self) -> i64 {
        self.x + self.w
    }
    fn top(&self) -> i64 {
        self.y + self.h
    }
}

pub(crate) struct MaxRectsBin {
    free_rects: Vec<FreeRect>,
}

impl SingleBinPacker for MaxRectsBin {
    fn new(w: i64, h: i64) -> Self {
        MaxRectsBin { free_rects: vec![FreeRect { x: 0, y: 0, w, h }] }
    }

    fn try_place(&self, w: i64, h: i64) -> Option<Placement> {
        self.free_rects
            .iter()
            .filter(|fr| fr.w >= w && fr.h >= h)
            .map(|fr| (fr, short_side_fit_score(fr, w, h)))
            .min_by_key(|(_, score)| *score)
            .map(|(fr, score)| Placement { x: fr.x, y: fr.y, score })
    }

    fn commit(&mut self, w: i64, h: i64, placement: &Placement) {
        let placed = FreeRect { x: placement.x, y: placement.y, w, h };

        let mut next = Vec::with_capacity(self.free_rects.len() + 4);
        for fr in self.free_rects.drain(..) {
            if !intersects(&fr, &placed) {
                next.push(fr);
                continue;
            }
            split_free_rect(&fr, &placed, &mut next);
        }
        self.free_rects = next;
        prune_contained(&mut self.free_rects);
    }
}

fn short_side_fit_score(fr: &FreeRect, w: i64, h: i64) -> i64 {
    (fr.w - w).min(fr.h - h)
}

fn intersects(a: &FreeRect, b: &FreeRect) -> bool {
    a.x < b.right() && b.x < a.right() && a.y < b.top() && b.y < a.top()
}

/// Splits `fr` around the overlap with `placed`, pushing up to four
/// leftover free rects (above, below, left, right of the overlap band).
fn split_free_rect(fr: &FreeRect, placed: &FreeRect, out: &mut Vec<FreeRect>) {
    if placed.x < fr.right() && fr.x < placed.right() {
        if placed.y > fr.y && placed.y < fr.top() {
            out.push(FreeRect { x: fr.x, y: fr.y, w: fr.w, h: placed.y - fr.y });
        }
        if placed.top() < fr.top() {
            out.push(FreeRect {
                x: fr.x,
                y: placed.top(),
                w: fr.w,
                h: fr.top() - placed.top(),
            });
        }
    }
    if placed.y < fr.top() && fr.y < placed.top() {
        if placed.x > fr.x && placed.x < fr.right() {
            out.push(FreeRect { x: fr.x, y: fr.y, w: placed.x - fr.x, h: fr.h });
        }
        if placed.right() < fr.right() {
            out.push(FreeRect {
                x: placed.right(),
                y: fr.y,
                w: fr.right() - placed.right(),
                h: fr.h,
            });
        }
    }
}

fn prune_contained(free_rects: &mut Vec<FreeRect>) {
    let mut i = 0;
    while i < free_rects.len() {
        let a = free_rects[i];
        let contained = free_rects.iter().enumerate().any(|(j, b)| j != i && contains(b, &a));
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
        && inner.right() <= outer.right()
        && inner.top() <= outer.top()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_single_rect_at_origin() {
        let bin = MaxRectsBin::new(100, 100);
        let placement = bin.try_place(40, 30).unwrap();
        assert_eq!((placement.x, placement.y), (0, 0));
    }

    #[test]
    fn rejects_rect_larger_than_bin() {
        let bin = MaxRectsBin::new(100, 100);
        assert!(bin.try_place(200, 10).is_none());
    }

    #[test]
    fn packs_two_rects_without_overlap() {
        let mut bin = MaxRectsBin::new(100, 50);
        let p1 = bin.try_place(60, 50).unwrap();
        bin.commit(60, 50, &p1);
        let p2 = bin.try_place(40, 50).unwrap();
        assert!(!(p2.x < p1.x + 60 && p1.x < p2.x + 40));
        bin.commit(40, 50, &p2);
        assert!(bin.try_place(1, 1).is_none());
    }

    #[test]
    fn free_list_stays_consistent_after_several_placements() {
        let mut bin = MaxRectsBin::new(200, 200);
        for _ in 0..4 {
            let p = bin.try_place(50, 50).unwrap();
            bin.commit(50, 50, &p);
        }
        assert!(bin.try_place(50, 50).is_some());
    }
}
