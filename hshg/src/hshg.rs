mod bitmap;
mod cache;
mod collide;
mod config;
mod core;
mod grid;
mod insert;
mod optimize;
mod query;
mod types;
mod update;

pub use common::shapes::{Aabb, Sphere};
pub use config::Config;
pub use types::INVALID;
pub use update::UpdateView;

use crate::error::{HshgError, HshgResult};
use bitmap::SlotBitmap;
use common::shapes::sphere_aabb;
use grid::Grid;
use types::{CellRange, EntityNode, FLAG_COLLIDING, FLAG_QUERYING, FLAG_REMOVED, FLAG_UPDATING};

/// Hierarchical spatial hash grid for 3D broad-phase collision detection and
/// range queries over bounded spheres.
///
/// A stack of uniform grids at doubling cell sizes; every entity lives on the
/// level its radius selects, where it spans at most two cells per axis, so a
/// sphere never overlaps more than its own cell plus the adjacent ring. World
/// coordinates are unbounded: they are mirror-tiled onto the grid rather than
/// clipped.
///
/// Entities are stored as parallel arrays indexed by dense `u32` slots, with
/// intrusive per-cell doubly linked lists threaded through the `next`/`prev`
/// arrays. `0xFFFF_FFFF` is reserved as the invalid slot/list terminator.
pub struct Hshg {
    entities: Vec<Sphere>,
    nodes: Vec<EntityNode>,
    entity_cells: Vec<u32>,
    entity_levels: Vec<u8>,
    entity_refs: Vec<u32>,

    // One allocation for every level's cell heads; each grid indexes it
    // through its own offset.
    cell_heads: Vec<u32>,
    grids: Vec<Grid>,

    free_slots: SlotBitmap,
    used_slots: SlotBitmap,
    entities_used: u32,
    entities_max: u32,

    // Bit L set means level L holds at least one entity. `new_cache` tracks
    // live occupancy; `old_cache` is what the shift chains were last built
    // from.
    old_cache: u32,
    new_cache: u32,
    flags: u8,

    cell_log: u8,
    bottom_cell_size: u32,
    grid_extent: u32,
    inv_grid_extent: f32,
}
