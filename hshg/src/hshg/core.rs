use super::*;
use std::mem::size_of;

/// Number of levels for a given bottom side: halve until the side drops
/// below 2. A bottom side of 1 yields a single one-cell level.
pub(crate) fn level_count_for(bottom_side: u32) -> u8 {
    let mut side = bottom_side;
    let mut levels = 0u8;
    loop {
        levels += 1;
        side >>= 1;
        if side < 2 {
            break;
        }
    }
    levels
}

/// Total cells across all levels, or `None` when the sum does not fit the
/// u32 cell index type.
pub(crate) fn total_cells_for(bottom_side: u32) -> Option<u32> {
    let mut side = bottom_side;
    let mut total: u32 = 0;
    loop {
        let cube = side.checked_mul(side)?.checked_mul(side)?;
        total = total.checked_add(cube)?;
        side >>= 1;
        if side < 2 {
            break;
        }
    }
    Some(total)
}

impl Hshg {
    pub fn new(config: Config) -> HshgResult<Self> {
        let Config {
            bottom_side,
            bottom_cell_size,
            max_entities,
        } = config;

        if !bottom_side.is_power_of_two() {
            return Err(HshgError::SideNotPowerOfTwo { side: bottom_side });
        }
        if !bottom_cell_size.is_power_of_two() {
            return Err(HshgError::CellSizeNotPowerOfTwo {
                cell_size: bottom_cell_size,
            });
        }
        if max_entities == INVALID {
            return Err(HshgError::TooManyEntities { max_entities });
        }
        let cells_len = total_cells_for(bottom_side)
            .ok_or(HshgError::CellCountOverflow { side: bottom_side })?;
        let grid_extent = bottom_side
            .checked_mul(bottom_cell_size)
            .ok_or(HshgError::ExtentOverflow {
                side: bottom_side,
                cell_size: bottom_cell_size,
            })?;

        let levels = level_count_for(bottom_side);
        let mut grids = Vec::with_capacity(levels as usize);
        let mut offset = 0u32;
        let mut side = bottom_side;
        let mut cell_size = bottom_cell_size;
        for _ in 0..levels {
            let grid = Grid::new(offset, side, cell_size);
            offset += grid.cell_count();
            grids.push(grid);
            side >>= 1;
            cell_size <<= 1;
        }

        let max = max_entities as usize;
        Ok(Self {
            entities: vec![Sphere::default(); max],
            nodes: vec![EntityNode::detached(); max],
            entity_cells: vec![0; max],
            entity_levels: vec![0; max],
            entity_refs: vec![0; max],
            cell_heads: vec![INVALID; cells_len as usize],
            grids,
            free_slots: SlotBitmap::new(max_entities),
            used_slots: SlotBitmap::new(max_entities),
            entities_used: 0,
            entities_max: max_entities,
            old_cache: 0,
            new_cache: 0,
            flags: 0,
            cell_log: (31 - bottom_cell_size.trailing_zeros()) as u8,
            bottom_cell_size,
            grid_extent,
            inv_grid_extent: 1.0 / grid_extent as f32,
        })
    }

    /// Exact byte footprint of a container with the given parameters:
    /// entity arrays, slot bitmaps, cell heads, level metadata, and the
    /// container header. `optimize()` transiently allocates a second set of
    /// entity arrays; callers that use it should double `max_entities` here.
    pub fn memory_usage(bottom_side: u32, max_entities: u32) -> HshgResult<usize> {
        let cells_len = total_cells_for(bottom_side)
            .ok_or(HshgError::CellCountOverflow { side: bottom_side })?;
        let per_entity = size_of::<Sphere>()
            + size_of::<EntityNode>()
            + size_of::<u32>()
            + size_of::<u8>()
            + size_of::<u32>();
        let entities = per_entity * max_entities as usize;
        let bitmaps = 2 * ((max_entities as usize + 63) / 64) * size_of::<u64>();
        let cells = size_of::<u32>() * cells_len as usize;
        let grids = size_of::<Grid>() * level_count_for(bottom_side) as usize;
        Ok(entities + bitmaps + cells + grids + size_of::<Hshg>())
    }

    /// Live entity count; occupied slots are `[0, len())` at every update
    /// boundary.
    pub fn len(&self) -> u32 {
        self.entities_used
    }

    pub fn is_empty(&self) -> bool {
        self.entities_used == 0
    }

    pub fn capacity(&self) -> u32 {
        self.entities_max
    }

    pub fn level_count(&self) -> u8 {
        self.grids.len() as u8
    }

    /// Entities currently resident at the given level.
    pub fn level_len(&self, level: u8) -> u32 {
        self.grids[level as usize].entities_len
    }

    pub fn slot_sphere(&self, slot: u32) -> &Sphere {
        &self.entities[slot as usize]
    }

    pub fn slot_ref(&self, slot: u32) -> u32 {
        self.entity_refs[slot as usize]
    }

    /// Cached linear cell index of the slot within its level.
    pub fn slot_cell(&self, slot: u32) -> u32 {
        self.entity_cells[slot as usize]
    }

    pub fn slot_level(&self, slot: u32) -> u8 {
        self.entity_levels[slot as usize]
    }

    /// Linear cell index an entity at `(x, y, z)` would occupy on `level`.
    pub fn cell_of(&self, level: u8, x: f32, y: f32, z: f32) -> u32 {
        self.grids[level as usize].cell_of(x, y, z)
    }

    /// Grid level for a sphere of radius `r`, chosen so the sphere spans at
    /// most two cells per axis and touches at most the adjacent ring.
    pub fn level_for_radius(&self, r: f32) -> u8 {
        let diameter = (r + r) as u32;
        if diameter < self.bottom_cell_size {
            return 0;
        }
        let level = (self.cell_log as u32 - diameter.leading_zeros() + 1) as u8;
        level.min(self.grids.len() as u8 - 1)
    }

    #[inline(always)]
    pub(crate) fn head(&self, grid: &Grid, cell: u32) -> u32 {
        self.cell_heads[(grid.cells_offset + cell) as usize]
    }

    #[inline(always)]
    pub(crate) fn flag(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }

    #[inline(always)]
    pub(crate) fn set_flag(&mut self, flag: u8, value: bool) {
        if value {
            self.flags |= flag;
        } else {
            self.flags &= !flag;
        }
    }

    /// True while inside any bulk callback; mutating entry points are
    /// forbidden in that state.
    #[inline(always)]
    pub(crate) fn calling(&self) -> bool {
        self.flags & (FLAG_UPDATING | FLAG_COLLIDING | FLAG_QUERYING) != 0
    }
}
