use super::*;

impl Hshg {
    /// Maps one world-space interval onto finest-level cells, accounting for
    /// the mirror tiling. An interval can land inside one tile, straddle one
    /// reflection boundary, or cover two or more boundaries, in which case
    /// it spans the whole axis.
    fn map_pos(&self, a: f32, b: f32) -> CellRange {
        let (x1, x2) = if a < 0.0 {
            // Translate forward by an even number of grid extents so the
            // fold parity is preserved.
            let periods = (-a * self.inv_grid_extent) as u32 as f32;
            let shift = (periods * 2.0 + 2.0) * self.grid_extent as f32;
            (a + shift, b + shift)
        } else {
            (a, b)
        };

        let folds = ((x2 - ((x1 * self.inv_grid_extent) as u32) as f32 * self.grid_extent as f32)
            * self.inv_grid_extent) as u32;

        let grid = &self.grids[0];
        match folds {
            0 => {
                let cell = grid.cell_1d(x1);
                let end = grid.cell_1d(x2);
                CellRange {
                    start: cell.min(end),
                    end: cell.max(end),
                }
            }
            1 => {
                // One boundary crossed: a suffix of the tile holding x1
                // joined with a prefix of the next, which side depending on
                // the parity of x1's tile.
                let cell = (x1.abs() * grid.inv_cell_size) as u32;
                let end = grid.cell_1d(x2);
                if cell & grid.side != 0 {
                    CellRange {
                        start: 0,
                        end: end.max(grid.mask - (cell & grid.mask)),
                    }
                } else {
                    CellRange {
                        start: end.min(cell & grid.mask),
                        end: grid.mask,
                    }
                }
            }
            _ => CellRange {
                start: 0,
                end: grid.mask,
            },
        }
    }

    fn query_common<F>(&self, aabb: &Aabb, handler: &mut F)
    where
        F: FnMut(&Sphere, u32),
    {
        debug_assert!(
            aabb.min_x <= aabb.max_x && aabb.min_y <= aabb.max_y && aabb.min_z <= aabb.max_z,
            "query box corners must be ordered min <= max"
        );

        let mut x = self.map_pos(aabb.min_x, aabb.max_x);
        let mut y = self.map_pos(aabb.min_y, aabb.max_y);
        let mut z = self.map_pos(aabb.min_z, aabb.max_z);

        let mut grid_idx = 0usize;
        let mut skipped = 0u32;
        loop {
            if grid_idx == self.grids.len() {
                return;
            }
            if self.grids[grid_idx].entities_len != 0 {
                break;
            }
            grid_idx += 1;
            skipped += 1;
        }

        x.start >>= skipped;
        x.end >>= skipped;
        y.start >>= skipped;
        y.end >>= skipped;
        z.start >>= skipped;
        z.end >>= skipped;

        loop {
            let grid = &self.grids[grid_idx];

            // Dilate by one cell: a sphere's level guarantees it spills at
            // most into the adjacent ring. The exact box test below prunes
            // the overshoot.
            let s_x = if x.start != 0 { x.start - 1 } else { 0 };
            let s_y = if y.start != 0 { y.start - 1 } else { 0 };
            let s_z = if z.start != 0 { z.start - 1 } else { 0 };
            let e_x = if x.end != grid.mask { x.end + 1 } else { x.end };
            let e_y = if y.end != grid.mask { y.end + 1 } else { y.end };
            let e_z = if z.end != grid.mask { z.end + 1 } else { z.end };

            for cur_z in s_z..=e_z {
                for cur_y in s_y..=e_y {
                    for cur_x in s_x..=e_x {
                        let cell = grid.cell_index(cur_x, cur_y, cur_z);
                        let mut n = self.head(grid, cell);
                        while n != INVALID {
                            let sphere = &self.entities[n as usize];
                            if sphere_aabb(sphere, aabb) {
                                handler(sphere, self.entity_refs[n as usize]);
                            }
                            n = self.nodes[n as usize].next;
                        }
                    }
                }
            }

            let shift = grid.shift;
            if shift == 0 {
                break;
            }
            x.start >>= shift;
            x.end >>= shift;
            y.start >>= shift;
            y.end >>= shift;
            z.start >>= shift;
            z.end >>= shift;
            grid_idx += shift as usize;
        }
    }

    /// Invokes the handler for every entity whose sphere bounding box
    /// intersects the given box. May be called from inside an `update()`
    /// handler only while no `remove` has happened this tick.
    pub fn query<F>(
        &mut self,
        x1: f32,
        y1: f32,
        z1: f32,
        x2: f32,
        y2: f32,
        z2: f32,
        mut handler: F,
    ) where
        F: FnMut(&Sphere, u32),
    {
        debug_assert!(
            !self.flag(FLAG_UPDATING) || !self.flag(FLAG_REMOVED),
            "remove() and query() can't be mixed in the same update() tick; call update() twice"
        );

        let was_querying = self.flag(FLAG_QUERYING);
        self.set_flag(FLAG_QUERYING, true);
        self.update_cache();
        let aabb = Aabb::new(x1, y1, z1, x2, y2, z2);
        self.query_common(&aabb, &mut handler);
        self.set_flag(FLAG_QUERYING, was_querying);
    }

    pub fn query_aabb<F>(&mut self, aabb: &Aabb, handler: F)
    where
        F: FnMut(&Sphere, u32),
    {
        self.query(
            aabb.min_x, aabb.min_y, aabb.min_z, aabb.max_x, aabb.max_y, aabb.max_z, handler,
        );
    }

    /// Read-only query for worker threads. The caller must have brought the
    /// shift chain up to date with `update_cache()` on the coordinating
    /// thread, and no entity may be mutated while queries are in flight.
    pub fn query_multithread<F>(
        &self,
        x1: f32,
        y1: f32,
        z1: f32,
        x2: f32,
        y2: f32,
        z2: f32,
        mut handler: F,
    ) where
        F: FnMut(&Sphere, u32),
    {
        debug_assert!(
            self.old_cache == self.new_cache,
            "call update_cache() before query_multithread()"
        );
        let aabb = Aabb::new(x1, y1, z1, x2, y2, z2);
        self.query_common(&aabb, &mut handler);
    }
}
