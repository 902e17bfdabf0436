#[derive(Debug, Clone)]
pub struct Config {
    /// Cells along one edge of the finest grid; must be a power of two.
    pub bottom_side: u32,
    /// Finest cell size in world units; must be a power of two.
    pub bottom_cell_size: u32,
    /// Upper bound on simultaneously live entities.
    pub max_entities: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bottom_side: 32,
            bottom_cell_size: 16,
            max_entities: 4096,
        }
    }
}
