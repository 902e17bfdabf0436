use super::*;

/// Mutable view over the contiguous entity batch `[0, len())` handed to an
/// `update()` handler. Position and radius edits must be followed by
/// [`relocate`](UpdateView::relocate) / [`resize`](UpdateView::resize) for
/// the grid to notice them.
pub struct UpdateView<'a> {
    hshg: &'a mut Hshg,
}

impl UpdateView<'_> {
    pub fn len(&self) -> u32 {
        self.hshg.entities_used
    }

    pub fn is_empty(&self) -> bool {
        self.hshg.entities_used == 0
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.hshg.entities[..self.hshg.entities_used as usize]
    }

    pub fn spheres_mut(&mut self) -> &mut [Sphere] {
        &mut self.hshg.entities[..self.hshg.entities_used as usize]
    }

    pub fn refs(&self) -> &[u32] {
        &self.hshg.entity_refs[..self.hshg.entities_used as usize]
    }

    pub fn sphere(&self, slot: u32) -> &Sphere {
        &self.hshg.entities[slot as usize]
    }

    pub fn sphere_mut(&mut self, slot: u32) -> &mut Sphere {
        &mut self.hshg.entities[slot as usize]
    }

    pub fn ref_of(&self, slot: u32) -> u32 {
        self.hshg.entity_refs[slot as usize]
    }

    /// Re-cells the slot after its position changed.
    pub fn relocate(&mut self, slot: u32) {
        self.hshg.relocate_slot(slot);
    }

    /// Re-levels the slot after its radius changed.
    pub fn resize(&mut self, slot: u32) {
        self.hshg.resize_slot(slot);
    }

    /// Detaches and frees the slot. The freed slot keeps its stale data
    /// until compaction; the handler must not touch it again.
    pub fn remove(&mut self, slot: u32) {
        self.hshg.remove_slot(slot);
    }

    /// Range query from inside the update tick. Forbidden once `remove` has
    /// been called this tick, since slots are about to be compacted.
    pub fn query<F>(&mut self, x1: f32, y1: f32, z1: f32, x2: f32, y2: f32, z2: f32, handler: F)
    where
        F: FnMut(&Sphere, u32),
    {
        self.hshg.query(x1, y1, z1, x2, y2, z2, handler);
    }
}

impl Hshg {
    /// Hands the handler a view over the batch `[0, len())`, then compacts
    /// removed slots so the occupied set is a contiguous prefix again.
    pub fn update<F>(&mut self, mut handler: F)
    where
        F: FnMut(&mut UpdateView<'_>),
    {
        debug_assert!(!self.calling(), "update() may not be called from any callback");
        self.set_flag(FLAG_UPDATING, true);

        {
            let mut view = UpdateView { hshg: self };
            handler(&mut view);
        }

        // Fill each free hole with the entity at the top of the array. Holes
        // are drained highest-first so a hole above the shrunken highwater
        // mark just falls off the end.
        while let Some(free) = self.free_slots.find_upper() {
            self.free_slots.clear(free);
            self.entities_used -= 1;
            if let Some(used) = self.used_slots.find_upper() {
                if free < used {
                    self.swap_entity(free, used);
                }
            }
        }

        self.set_flag(FLAG_REMOVED, false);
        self.set_flag(FLAG_UPDATING, false);
    }

    /// Moves the entity in `used` down into the hole at `free`, patching the
    /// cell head or list neighbors that pointed at it.
    fn swap_entity(&mut self, free: u32, used: u32) {
        let node = self.nodes[used as usize];
        if node.prev != INVALID {
            self.nodes[node.prev as usize].next = free;
        } else {
            let level = self.entity_levels[used as usize] as usize;
            let offset = self.grids[level].cells_offset;
            self.cell_heads[(offset + self.entity_cells[used as usize]) as usize] = free;
        }
        if node.next != INVALID {
            self.nodes[node.next as usize].prev = free;
        }

        self.entities[free as usize] = self.entities[used as usize];
        self.nodes[free as usize] = node;
        self.entity_cells[free as usize] = self.entity_cells[used as usize];
        self.entity_levels[free as usize] = self.entity_levels[used as usize];
        self.entity_refs[free as usize] = self.entity_refs[used as usize];

        self.used_slots.clear(used);
        self.used_slots.set(free);
    }

    /// Read-only batch access for worker thread `idx` of `threads`. The
    /// batch `[0, len())` is split by integer division; the last range
    /// absorbs the remainder. Handlers must not relocate, resize, or remove.
    pub fn update_multithread<F>(&self, threads: u8, idx: u8, handler: F)
    where
        F: FnOnce(u32, u32, &[Sphere], &[u32]),
    {
        debug_assert!(threads > 0, "thread count must be non-zero");
        debug_assert!(idx < threads, "thread index out of range");

        let used = self.entities_used;
        let div = used / threads as u32;
        let begin = div * idx as u32;
        let end = begin
            + div
            + if idx as u32 + 1 == threads as u32 {
                used % threads as u32
            } else {
                0
            };
        handler(
            begin,
            end,
            &self.entities[..used as usize],
            &self.entity_refs[..used as usize],
        );
    }
}
