use ::hshg::{Config, Hshg};
use common::shapes::sphere_sphere;
use fxhash::{FxHashMap, FxHashSet};
use pyo3::exceptions::PyValueError;
use pyo3::pyclass;
use pyo3::pymethods;
use pyo3::PyResult;

#[pyclass(name = "Hshg", unsendable)]
pub struct HshgWrapper {
    hshg: Hshg,
}

#[pymethods]
impl HshgWrapper {
    #[new]
    pub fn new(bottom_side: u32, bottom_cell_size: u32, max_entities: u32) -> PyResult<Self> {
        let hshg = Hshg::new(Config {
            bottom_side,
            bottom_cell_size,
            max_entities,
        })
        .map_err(|err| PyValueError::new_err(err.to_string()))?;
        Ok(HshgWrapper { hshg })
    }

    /// Returns the slot the entity landed in, or None when the container is
    /// full. Slots are only stable until the next mutation batch; use the
    /// ref to identify entities across updates.
    pub fn insert(&mut self, x: f32, y: f32, z: f32, r: f32, entity_ref: u32) -> Option<u32> {
        self.hshg.insert(x, y, z, r, entity_ref)
    }

    /// Removes every entity whose ref is in `refs`.
    pub fn remove(&mut self, refs: Vec<u32>) {
        let doomed: FxHashSet<u32> = refs.into_iter().collect();
        self.hshg.update(|view| {
            for slot in (0..view.len()).rev() {
                if doomed.contains(&view.ref_of(slot)) {
                    view.remove(slot);
                }
            }
        });
    }

    /// Applies `(ref, x, y, z)` position updates in one batch.
    pub fn relocate_batch(&mut self, moves: Vec<(u32, f32, f32, f32)>) {
        self.hshg.update(|view| {
            let mut slot_of: FxHashMap<u32, u32> = FxHashMap::default();
            for slot in 0..view.len() {
                slot_of.insert(view.ref_of(slot), slot);
            }
            for &(entity_ref, x, y, z) in &moves {
                if let Some(&slot) = slot_of.get(&entity_ref) {
                    view.sphere_mut(slot).update(x, y, z);
                    view.relocate(slot);
                }
            }
        });
    }

    /// Applies `(ref, r)` radius updates in one batch.
    pub fn resize_batch(&mut self, sizes: Vec<(u32, f32)>) {
        self.hshg.update(|view| {
            let mut slot_of: FxHashMap<u32, u32> = FxHashMap::default();
            for slot in 0..view.len() {
                slot_of.insert(view.ref_of(slot), slot);
            }
            for &(entity_ref, r) in &sizes {
                if let Some(&slot) = slot_of.get(&entity_ref) {
                    view.sphere_mut(slot).r = r;
                    view.resize(slot);
                }
            }
        });
    }

    /// Every overlapping pair of refs, each reported once.
    pub fn collide(&mut self) -> Vec<(u32, u32)> {
        let mut pairs = Vec::new();
        self.hshg.collide(|e1, ref1, e2, ref2| {
            if sphere_sphere(e1, e2) {
                pairs.push((ref1, ref2));
            }
        });
        pairs
    }

    /// Refs of every entity whose bounding box intersects the given box.
    pub fn query(&mut self, x1: f32, y1: f32, z1: f32, x2: f32, y2: f32, z2: f32) -> Vec<u32> {
        let mut found = Vec::new();
        self.hshg.query(x1, y1, z1, x2, y2, z2, |_, entity_ref| {
            found.push(entity_ref);
        });
        found
    }

    pub fn optimize(&mut self) {
        self.hshg.optimize();
    }

    pub fn __len__(&self) -> usize {
        self.hshg.len() as usize
    }

    #[staticmethod]
    pub fn memory_usage(bottom_side: u32, max_entities: u32) -> PyResult<usize> {
        Hshg::memory_usage(bottom_side, max_entities)
            .map_err(|err| PyValueError::new_err(err.to_string()))
    }
}
