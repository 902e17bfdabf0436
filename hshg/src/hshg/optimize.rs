use super::*;

impl Hshg {
    /// Rebuilds the entity arrays in cell-visitation order so entities
    /// sharing a cell become contiguous in memory, which speeds up
    /// subsequent `collide()` sweeps. List links collapse to
    /// `prev = idx - 1` / `next = idx + 1` within each cell run.
    pub fn optimize(&mut self) {
        debug_assert!(
            !self.calling(),
            "optimize() may not be called from any callback"
        );

        let max = self.entities_max as usize;
        let mut entities = vec![Sphere::default(); max];
        let mut nodes = vec![EntityNode::detached(); max];
        let mut cells = vec![0u32; max];
        let mut levels = vec![0u8; max];
        let mut refs = vec![0u32; max];

        let mut new_idx = 0u32;
        for head_idx in 0..self.cell_heads.len() {
            let mut cur = self.cell_heads[head_idx];
            if cur == INVALID {
                continue;
            }
            self.cell_heads[head_idx] = new_idx;

            let list_start = new_idx;
            loop {
                let i = new_idx as usize;
                entities[i] = self.entities[cur as usize];
                cells[i] = self.entity_cells[cur as usize];
                levels[i] = self.entity_levels[cur as usize];
                refs[i] = self.entity_refs[cur as usize];
                nodes[i].prev = if new_idx == list_start {
                    INVALID
                } else {
                    new_idx - 1
                };

                let next = self.nodes[cur as usize].next;
                new_idx += 1;
                if next == INVALID {
                    nodes[i].next = INVALID;
                    break;
                }
                nodes[i].next = new_idx;
                cur = next;
            }
        }
        debug_assert_eq!(new_idx, self.entities_used);

        self.entities = entities;
        self.nodes = nodes;
        self.entity_cells = cells;
        self.entity_levels = levels;
        self.entity_refs = refs;
    }
}
