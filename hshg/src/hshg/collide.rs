use super::*;

impl Hshg {
    /// Reports `slot` against every entity in the list starting at `from`.
    #[inline(always)]
    fn loop_over<F>(&self, slot: u32, from: u32, handler: &mut F)
    where
        F: FnMut(&Sphere, u32, &Sphere, u32),
    {
        let sphere = &self.entities[slot as usize];
        let entity_ref = self.entity_refs[slot as usize];
        let mut n = from;
        while n != INVALID {
            handler(
                sphere,
                entity_ref,
                &self.entities[n as usize],
                self.entity_refs[n as usize],
            );
            n = self.nodes[n as usize].next;
        }
    }

    /// Invokes the handler for every candidate pair whose cell
    /// neighborhoods intersect; each unordered pair is reported at most
    /// once. Candidates are conservative: the handler re-checks actual
    /// sphere overlap.
    pub fn collide<F>(&mut self, mut handler: F)
    where
        F: FnMut(&Sphere, u32, &Sphere, u32),
    {
        debug_assert!(!self.calling(), "collide() may not be called from any callback");
        self.set_flag(FLAG_COLLIDING, true);
        self.update_cache();

        for slot in 0..self.entities_used {
            let i = slot as usize;
            let cell = self.entity_cells[i];
            let mut grid_idx = self.entity_levels[i] as usize;
            let grid = &self.grids[grid_idx];

            let mut cx = grid.cell_x(cell);
            let mut cy = grid.cell_y(cell);
            let mut cz = grid.cell_z(cell);

            // Half of the 26-cell neighborhood: the full 3x3 plane below,
            // this cell's list tail, the next cell in x, and the next row
            // in y. Restricting every entity to this half visits each
            // same-level pair exactly once.
            if cz != 0 {
                if cy != 0 {
                    let c = cell - grid.side_sq - grid.side;
                    if cx != 0 {
                        self.loop_over(slot, self.head(grid, c - 1), &mut handler);
                    }
                    self.loop_over(slot, self.head(grid, c), &mut handler);
                    if cx != grid.mask {
                        self.loop_over(slot, self.head(grid, c + 1), &mut handler);
                    }
                }
                {
                    let c = cell - grid.side_sq;
                    if cx != 0 {
                        self.loop_over(slot, self.head(grid, c - 1), &mut handler);
                    }
                    self.loop_over(slot, self.head(grid, c), &mut handler);
                    if cx != grid.mask {
                        self.loop_over(slot, self.head(grid, c + 1), &mut handler);
                    }
                }
                if cy != grid.mask {
                    let c = cell - grid.side_sq + grid.side;
                    if cx != 0 {
                        self.loop_over(slot, self.head(grid, c - 1), &mut handler);
                    }
                    self.loop_over(slot, self.head(grid, c), &mut handler);
                    if cx != grid.mask {
                        self.loop_over(slot, self.head(grid, c + 1), &mut handler);
                    }
                }
            }

            self.loop_over(slot, self.nodes[i].next, &mut handler);

            if cx != grid.mask {
                self.loop_over(slot, self.head(grid, cell + 1), &mut handler);
            }

            if cy != grid.mask {
                let c = cell + grid.side;
                if cx != 0 {
                    self.loop_over(slot, self.head(grid, c - 1), &mut handler);
                }
                self.loop_over(slot, self.head(grid, c), &mut handler);
                if cx != grid.mask {
                    self.loop_over(slot, self.head(grid, c + 1), &mut handler);
                }
            }

            // Ascend through the shift chain; at each coarser occupied
            // level, rescale the cell coordinates and sweep the full
            // 3x3x3 neighborhood. Only the finer entity of a cross-level
            // pair ever ascends, so pairs stay unique.
            loop {
                let shift = self.grids[grid_idx].shift;
                if shift == 0 {
                    break;
                }
                cx >>= shift;
                cy >>= shift;
                cz >>= shift;
                grid_idx += shift as usize;
                let grid = &self.grids[grid_idx];

                let min_x = if cx != 0 { cx - 1 } else { 0 };
                let min_y = if cy != 0 { cy - 1 } else { 0 };
                let min_z = if cz != 0 { cz - 1 } else { 0 };
                let max_x = if cx != grid.mask { cx + 1 } else { cx };
                let max_y = if cy != grid.mask { cy + 1 } else { cy };
                let max_z = if cz != grid.mask { cz + 1 } else { cz };

                for cur_z in min_z..=max_z {
                    for cur_y in min_y..=max_y {
                        for cur_x in min_x..=max_x {
                            let c = grid.cell_index(cur_x, cur_y, cur_z);
                            self.loop_over(slot, self.head(grid, c), &mut handler);
                        }
                    }
                }
            }
        }

        self.set_flag(FLAG_COLLIDING, false);
    }
}
