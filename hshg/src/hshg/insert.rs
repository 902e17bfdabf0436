use super::*;

impl Hshg {
    fn create_entity(&mut self) -> Option<u32> {
        if self.entities_used < self.entities_max {
            let slot = self.entities_used;
            self.entities_used += 1;
            self.used_slots.set(slot);
            Some(slot)
        } else {
            None
        }
    }

    fn destroy_entity(&mut self, slot: u32) {
        self.free_slots.set(slot);
        self.used_slots.clear(slot);
    }

    /// Links the slot at the head of the cell list its coordinates map to on
    /// its cached level.
    pub(crate) fn insert_into_grid(&mut self, slot: u32) {
        let i = slot as usize;
        let level = self.entity_levels[i] as usize;
        let sphere = self.entities[i];
        let grid = &self.grids[level];
        let cell = grid.cell_of(sphere.x, sphere.y, sphere.z);
        self.entity_cells[i] = cell;

        let head = (grid.cells_offset + cell) as usize;
        let next = self.cell_heads[head];
        self.nodes[i].next = next;
        if next != INVALID {
            self.nodes[next as usize].prev = slot;
        }
        self.nodes[i].prev = INVALID;
        self.cell_heads[head] = slot;

        let grid = &mut self.grids[level];
        if grid.entities_len == 0 {
            self.new_cache |= 1 << level;
        }
        grid.entities_len += 1;
    }

    /// Inserts a sphere and returns its slot, or `None` when the container
    /// is at capacity. Slots are only stable until the next `update()`.
    pub fn insert(&mut self, x: f32, y: f32, z: f32, r: f32, entity_ref: u32) -> Option<u32> {
        debug_assert!(!self.calling(), "insert() may not be called from any callback");
        debug_assert!(r >= 0.0, "radius must be non-negative");

        let slot = self.create_entity()?;
        let i = slot as usize;
        self.entities[i] = Sphere::new(x, y, z, r);
        self.nodes[i] = EntityNode::detached();
        self.entity_cells[i] = 0;
        self.entity_levels[i] = self.level_for_radius(r);
        self.entity_refs[i] = entity_ref;

        self.insert_into_grid(slot);
        Some(slot)
    }

    /// Unlinks the slot from its cell list, to be re-linked elsewhere or
    /// destroyed.
    pub(crate) fn detach_from_grid(&mut self, slot: u32) {
        let i = slot as usize;
        let node = self.nodes[i];
        let level = self.entity_levels[i] as usize;

        if node.next != INVALID {
            self.nodes[node.next as usize].prev = node.prev;
        }
        if node.prev != INVALID {
            self.nodes[node.prev as usize].next = node.next;
        } else {
            // Head of the list: the cell itself points at us.
            let offset = self.grids[level].cells_offset;
            self.cell_heads[(offset + self.entity_cells[i]) as usize] = node.next;
        }

        let grid = &mut self.grids[level];
        grid.entities_len -= 1;
        if grid.entities_len == 0 {
            // The bit is known to be set, so toggling clears it.
            self.new_cache ^= 1 << level;
        }
    }

    pub(crate) fn remove_slot(&mut self, slot: u32) {
        debug_assert!(
            self.flag(FLAG_UPDATING),
            "remove() may only be called from within update()"
        );
        debug_assert!(self.used_slots.is_set(slot), "slot removed twice");
        self.set_flag(FLAG_REMOVED, true);
        self.detach_from_grid(slot);
        self.destroy_entity(slot);
    }

    /// Re-cells the slot on its current level after a position change; a
    /// no-op when the coordinates still map to the cached cell.
    pub(crate) fn relocate_slot(&mut self, slot: u32) {
        debug_assert!(
            self.flag(FLAG_UPDATING),
            "relocate() may only be called from within update()"
        );
        let i = slot as usize;
        let sphere = self.entities[i];
        let grid = &self.grids[self.entity_levels[i] as usize];
        let new_cell = grid.cell_of(sphere.x, sphere.y, sphere.z);
        if new_cell != self.entity_cells[i] {
            self.detach_from_grid(slot);
            self.insert_into_grid(slot);
        }
    }

    /// Re-levels the slot after a radius change; a no-op when the radius
    /// still selects the cached level.
    pub(crate) fn resize_slot(&mut self, slot: u32) {
        debug_assert!(
            self.flag(FLAG_UPDATING),
            "resize() may only be called from within update()"
        );
        let i = slot as usize;
        let new_level = self.level_for_radius(self.entities[i].r);
        if self.entity_levels[i] != new_level {
            self.detach_from_grid(slot);
            self.entity_levels[i] = new_level;
            self.insert_into_grid(slot);
        }
    }
}
