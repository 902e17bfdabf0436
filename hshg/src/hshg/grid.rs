/// One uniform grid level. Level 0 is the finest; each level above halves
/// `side` and doubles the cell size.
pub(crate) struct Grid {
    /// Start of this level's cell heads inside the shared head array.
    pub(crate) cells_offset: u32,
    pub(crate) side: u32,
    /// `side * side`; the z stride of the packed cell index.
    pub(crate) side_sq: u32,
    pub(crate) mask: u32,
    pub(crate) y_shift: u8,
    pub(crate) z_shift: u8,
    /// Levels to hop to reach the next non-empty level above; 0 terminates
    /// ascent. Only meaningful right after `update_cache`.
    pub(crate) shift: u8,
    pub(crate) inv_cell_size: f32,
    pub(crate) entities_len: u32,
}

impl Grid {
    pub(crate) fn new(cells_offset: u32, side: u32, cell_size: u32) -> Self {
        let log2_side = side.trailing_zeros() as u8;
        Self {
            cells_offset,
            side,
            side_sq: side * side,
            mask: side - 1,
            y_shift: log2_side,
            z_shift: log2_side * 2,
            shift: 0,
            inv_cell_size: 1.0 / cell_size as f32,
            entities_len: 0,
        }
    }

    /// Maps one world coordinate onto this level. The grid mirror-tiles:
    /// coordinates reflect at every `side * cell_size` boundary, so any
    /// finite float lands in a valid cell without clipping.
    #[inline(always)]
    pub(crate) fn cell_1d(&self, x: f32) -> u32 {
        let cell = (x.abs() * self.inv_cell_size) as u32;
        if cell & self.side != 0 {
            self.mask - (cell & self.mask)
        } else {
            cell & self.mask
        }
    }

    #[inline(always)]
    pub(crate) fn cell_index(&self, x: u32, y: u32, z: u32) -> u32 {
        x | (y << self.y_shift) | (z << self.z_shift)
    }

    #[inline(always)]
    pub(crate) fn cell_of(&self, x: f32, y: f32, z: f32) -> u32 {
        self.cell_index(self.cell_1d(x), self.cell_1d(y), self.cell_1d(z))
    }

    #[inline(always)]
    pub(crate) fn cell_x(&self, cell: u32) -> u32 {
        cell & self.mask
    }

    #[inline(always)]
    pub(crate) fn cell_y(&self, cell: u32) -> u32 {
        (cell >> self.y_shift) & self.mask
    }

    #[inline(always)]
    pub(crate) fn cell_z(&self, cell: u32) -> u32 {
        cell >> self.z_shift
    }

    #[inline(always)]
    pub(crate) fn cell_count(&self) -> u32 {
        self.side_sq * self.side
    }
}
