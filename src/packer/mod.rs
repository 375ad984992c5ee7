//! Packer Adapter.
//!
//! Each packer family (`guillotine`, `maxrects`, `skyline`) is hardcoded
//! to exactly one free-rect/placement heuristic, with no heuristic
//! enumeration at this layer. Rotation is never decided here either:
//! the orientation resolver and instance builder already picked each
//! rectangle's final `(w, h)` before it reaches `add_rect`.

pub mod guillotine;
pub mod maxrects;
pub mod skyline;

use crate::model::{BinSelect, PackedRect};

/// A single accepted placement, local to one bin, before it is
/// recorded against the adapter's running rect_id -> bin_index map.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Placement {
    pub(crate) x: i64,
    pub(crate) y: i64,
    /// Lower is better; compared across bins under `BinSelect::BestFit`.
    pub(crate) score: i64,
}

/// One bin's packing state for a single heuristic family.
pub(crate) trait SingleBinPacker: Sized {
    /// Creates an empty bin of the given usable size.
    fn new(w: i64, h: i64) -> Self;
    /// Scores a candidate placement for `(w, h)` without mutating state.
    fn try_place(&self, w: i64, h: i64) -> Option<Placement>;
    /// Commits a placement previously returned by `try_place`.
    fn commit(&mut self, w: i64, h: i64, placement: &Placement);
}

struct PendingRect {
    rect_id: u64,
    w: i64,
    h: i64,
}

/// Drives any `SingleBinPacker` family through the `add_bin` / `add_rect`
/// / `pack` / `placed_rects` contract, applying `bin_select` across bins.
pub(crate) struct Adapter<P: SingleBinPacker> {
    bin_select: BinSelect,
    bins: Vec<P>,
    pending: Vec<PendingRect>,
    placed: Vec<PackedRect>,
}

impl<P: SingleBinPacker> Adapter<P> {
    pub(crate) fn new(bin_select: BinSelect) -> Self {
        Adapter { bin_select, bins: Vec::new(), pending: Vec::new(), placed: Vec::new() }
    }

    pub(crate) fn add_bin(&mut self, w: i64, h: i64) {
        self.bins.push(P::new(w, h));
    }

    pub(crate) fn add_rect(&mut self, rect_id: u64, w: i64, h: i64) {
        self.pending.push(PendingRect { rect_id, w, h });
    }

    /// Attempts to place every pending rectangle, in insertion order.
    /// Rectangles that fit nowhere are simply omitted from
    /// `placed_rects()`; the search driver detects this by comparing
    /// counts and discards the restart.
    pub(crate) fn pack(&mut self) {
        for rect in &self.pending {
            let chosen = match self.bin_select {
                BinSelect::FirstFit => self
                    .bins
                    .iter()
                    .enumerate()
                    .find_map(|(i, bin)| bin.try_place(rect.w, rect.h).map(|p| (i, p))),
                BinSelect::BestFit => self
                    .bins
                    .iter()
                    .enumerate()
                    .filter_map(|(i, bin)| bin.try_place(rect.w, rect.h).map(|p| (i, p)))
                    .min_by_key(|(_, p)| p.score),
            };

            if let Some((bin_index, placement)) = chosen {
                self.bins[bin_index].commit(rect.w, rect.h, &placement);
                self.placed.push(PackedRect {
                    bin_index,
                    x_int: placement.x,
                    y_int: placement.y,
                    w_int: rect.w,
                    h_int: rect.h,
                    rect_id: rect.rect_id,
                });
            }
        }
    }

    pub(crate) fn placed_rects(&self) -> Vec<PackedRect> {
        self.placed.clone()
    }
}
