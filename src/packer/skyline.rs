//! Skyline family, hardcoded to BottomLeft.
//!
//! A skyline is a list of horizontal segments ordered by ascending `x`;
//! placing a rect finds the lowest-then-narrowest run of segments it
//! fits across, inserts a new segment at the placement's top edge, and
//! merges adjacent segments at equal height. There is no waste-map fast
//! path or in-packer rotation fallback: rotation is resolved upstream
//! by the orientation resolver and instance builder.

use super::{Placement, SingleBinPacker};

#[derive(Debug, Clone, Copy)]
struct Node {
    x: i64,
    y: i64,
    w: i64,
}

impl Node {
    fn right(&self) -> i64 {
        self.x + self.w
    }
}

pub(crate) struct SkylineBin {
    width: i64,
    height: i64,
    nodes: Vec<Node>,
}

impl SingleBinPacker for SkylineBin {
    fn new(w: i64, h: i64) -> Self {
        SkylineBin { width: w, height: h, nodes: vec![Node { x: 0, y: 0, w }] }
    }

    fn try_place(&self, w: i64, h: i64) -> Option<Placement> {
        self.find_bottom_left(w, h)
            .map(|(_, x, y)| Placement { x, y, score: y })
    }

    fn commit(&mut self, w: i64, h: i64, placement: &Placement) {
        let index = self
            .find_bottom_left(w, h)
            .map(|(i, _, _)| i)
            .expect("commit called without a matching try_place result");
        self.split(index, placement.x, placement.y + h, w);
        self.merge();
    }
}

impl SkylineBin {
    /// Returns `(start_node_index, x, y)` for the lowest, then
    /// narrowest, placement of a `w x h` rect.
    fn find_bottom_left(&self, w: i64, h: i64) -> Option<(usize, i64, i64)> {
        let mut best: Option<(usize, i64, i64, i64)> = None; // (index, x, y, width_at_start)

        for i in 0..self.nodes.len() {
            if let Some((x, y)) = self.fits_from(i, w, h) {
                let width_at_start = self.nodes[i].w;
                let better = match best {
                    None => true,
                    Some((_, _, best_y, best_w)) => y < best_y || (y == best_y && width_at_start < best_w),
                };
                if better {
                    best = Some((i, x, y, width_at_start));
                }
            }
        }

        best.map(|(i, x, y, _)| (i, x, y))
    }

    /// Checks whether a `w`-wide rect starting at node `i` clears the
    /// border and every node it spans, returning its placement `(x, y)`.
    fn fits_from(&self, i: usize, w: i64, h: i64) -> Option<(i64, i64)> {
        let x = self.nodes[i].x;
        if x + w > self.width {
            return None;
        }

        let mut y = self.nodes[i].y;
        let mut width_left = w;
        let mut j = i;
        loop {
            y = y.max(self.nodes[j].y);
            if y + h > self.height {
                return None;
            }
            if self.nodes[j].w >= width_left {
                return Some((x, y));
            }
            width_left -= self.nodes[j].w;
            j += 1;
            if j >= self.nodes.len() {
                return None;
            }
        }
    }

    /// Inserts a new skyline node `(x, y, w)` at `index`, where `y` is
    /// already the placed rect's top edge, then shrinks or removes any
    /// following node it now overlaps.
    fn split(&mut self, index: usize, x: i64, y: i64, w: i64) {
        self.nodes.insert(index, Node { x, y, w });

        let mut i = index + 1;
        while i < self.nodes.len() {
            let prev_right = self.nodes[i - 1].right();
            if self.nodes[i].x >= prev_right {
                break;
            }
            let shrink = prev_right - self.nodes[i].x;
            if self.nodes[i].w <= shrink {
                self.nodes.remove(i);
            } else {
                self.nodes[i].x += shrink;
                self.nodes[i].w -= shrink;
                break;
            }
        }
    }

    fn merge(&mut self) {
        let mut i = 1;
        while i < self.nodes.len() {
            if self.nodes[i - 1].y == self.nodes[i].y {
                let w = self.nodes[i].w;
                self.nodes[i - 1].w += w;
                self.nodes.remove(i);
            } else {
                i += 1;
            }
        }
    }
}
