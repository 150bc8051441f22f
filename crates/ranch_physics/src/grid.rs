//! Uniform grid broad phase
//!
//! Colliders are bucketed by the X/Z cells their bounding box overlaps.
//! Queries are conservative: anything sharing a cell is a candidate, and
//! the narrow phase rejects the rest.

use crate::collider::ColliderHandle;
use ranch_math::AABB;
use std::collections::{BTreeSet, HashMap};

/// Integer cell coordinates `(floor(x / size), floor(z / size))`
pub type CellKey = (i32, i32);

/// Uniform X/Z grid of collider buckets
#[derive(Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<CellKey, BTreeSet<ColliderHandle>>,
}

impl SpatialGrid {
    /// Create a grid with the given cell size
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell containing a world X/Z coordinate
    #[inline]
    pub fn cell_key(&self, x: f32, z: f32) -> CellKey {
        ((x / self.cell_size).floor() as i32, (z / self.cell_size).floor() as i32)
    }

    /// Every cell an AABB overlaps
    pub fn cells_for(&self, aabb: &AABB) -> BTreeSet<CellKey> {
        let (min_x, min_z) = self.cell_key(aabb.min.x, aabb.min.z);
        let (max_x, max_z) = self.cell_key(aabb.max.x, aabb.max.z);
        let mut keys = BTreeSet::new();
        for x in min_x..=max_x {
            for z in min_z..=max_z {
                keys.insert((x, z));
            }
        }
        keys
    }

    /// Drop old memberships, then insert into every cell `aabb` overlaps
    ///
    /// `occupied` is the collider's cell set and is rewritten in place.
    pub fn insert_or_update(
        &mut self,
        handle: ColliderHandle,
        aabb: &AABB,
        occupied: &mut BTreeSet<CellKey>,
    ) {
        self.remove(handle, occupied);
        let keys = self.cells_for(aabb);
        for key in &keys {
            self.cells.entry(*key).or_default().insert(handle);
        }
        *occupied = keys;
    }

    /// Remove a collider from every cell it occupies
    pub fn remove(&mut self, handle: ColliderHandle, occupied: &mut BTreeSet<CellKey>) {
        for key in occupied.iter() {
            if let Some(bucket) = self.cells.get_mut(key) {
                bucket.remove(&handle);
                if bucket.is_empty() {
                    self.cells.remove(key);
                }
            }
        }
        occupied.clear();
    }

    /// Union of every collider sharing a cell with `occupied`, excluding `handle`
    pub fn query_nearby(
        &self,
        handle: ColliderHandle,
        occupied: &BTreeSet<CellKey>,
    ) -> BTreeSet<ColliderHandle> {
        let mut nearby = BTreeSet::new();
        for key in occupied {
            if let Some(bucket) = self.cells.get(key) {
                nearby.extend(bucket.iter().copied().filter(|h| *h != handle));
            }
        }
        nearby
    }

    /// Every collider in cells overlapped by `aabb`
    pub fn query_aabb(&self, aabb: &AABB) -> BTreeSet<ColliderHandle> {
        let mut found = BTreeSet::new();
        for key in self.cells_for(aabb) {
            if let Some(bucket) = self.cells.get(&key) {
                found.extend(bucket.iter().copied());
            }
        }
        found
    }

    /// Number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}
