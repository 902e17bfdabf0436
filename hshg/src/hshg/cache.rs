use super::*;

impl Hshg {
    /// Rebuilds the per-level shift chain from current level occupancy so
    /// collision and query traversals can hop over empty levels in O(1) per
    /// step. A no-op when occupancy has not changed since the last rebuild.
    ///
    /// Called implicitly by `collide()` and `query()`; must be called
    /// explicitly on the coordinating thread before `query_multithread()`.
    pub fn update_cache(&mut self) {
        if self.old_cache == self.new_cache {
            return;
        }
        self.old_cache = self.new_cache;

        for grid in &mut self.grids {
            grid.shift = 0;
        }

        let mut occupied = match self.grids.iter().position(|g| g.entities_len != 0) {
            Some(idx) => idx,
            None => return,
        };

        let mut shift = 1u8;
        for idx in occupied + 1..self.grids.len() {
            if self.grids[idx].entities_len == 0 {
                shift += 1;
                continue;
            }
            self.grids[occupied].shift = shift;
            occupied = idx;
            shift = 1;
        }
        // The topmost occupied level keeps shift 0, terminating ascent.
    }
}
