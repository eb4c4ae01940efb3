use std::collections::HashMap;

use glam::Vec2;

use crate::ecs::components::{Tags, TAG_CREATURE, TAG_FOOD};
use crate::ecs::{Entity, EntityRegistry};

/// Start-of-tick view of one entity, so creatures sense each other the same
/// way whatever order they update in.
#[derive(Debug, Clone, Copy)]
pub struct EntitySnapshot {
    pub entity: hecs::Entity,
    pub pos: Vec2,
    pub food: bool,
    pub creature: bool,
    pub disposed: bool,
}

/// Spatial hash grid for neighbor queries.
///
/// Uses multiplicative hash for even distribution. Buckets can hold
/// entries from several cells that collide, so callers filter by distance.
pub struct SpatialHash {
    inv_cell_size: f32,
    table_size: usize,
    /// Each bucket holds snapshot indices. Pre-allocated, cleared each tick.
    buckets: Vec<Vec<u32>>,
}

impl SpatialHash {
    pub fn new(cell_size: f32, table_size: usize) -> Self {
        let table_size = table_size.max(1);
        let mut buckets = Vec::with_capacity(table_size);
        for _ in 0..table_size {
            buckets.push(Vec::with_capacity(8));
        }
        Self {
            inv_cell_size: 1.0 / cell_size.max(f32::EPSILON),
            table_size,
            buckets,
        }
    }

    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear(); // Keeps allocation.
        }
    }

    pub fn insert(&mut self, pos: Vec2, index: u32) {
        let hash = self.hash(pos);
        self.buckets[hash].push(index);
    }

    /// Every index in the cells overlapping a `radius` box around `pos`.
    /// May contain duplicates and entries outside `radius`.
    pub fn query_radius(&self, pos: Vec2, radius: f32, mut callback: impl FnMut(u32)) {
        let (cx, cy) = self.cell_coords(pos);
        let rings = (radius * self.inv_cell_size).ceil().clamp(1.0, 65_536.0) as i64;
        let side = 2 * rings + 1;
        if side * side >= self.table_size as i64 {
            // The box touches at least as many cells as there are buckets.
            for bucket in &self.buckets {
                for &index in bucket {
                    callback(index);
                }
            }
            return;
        }

        let rings = rings as i32;
        for dy in -rings..=rings {
            for dx in -rings..=rings {
                let hash = self.hash_cell(cx.wrapping_add(dx), cy.wrapping_add(dy));
                for &index in &self.buckets[hash] {
                    callback(index);
                }
            }
        }
    }

    fn cell_coords(&self, pos: Vec2) -> (i32, i32) {
        let cx = (pos.x * self.inv_cell_size).floor() as i32;
        let cy = (pos.y * self.inv_cell_size).floor() as i32;
        (cx, cy)
    }

    fn hash(&self, pos: Vec2) -> usize {
        let (cx, cy) = self.cell_coords(pos);
        self.hash_cell(cx, cy)
    }

    fn hash_cell(&self, cx: i32, cy: i32) -> usize {
        let h = (cx as u32).wrapping_mul(73856093) ^ (cy as u32).wrapping_mul(19349663);
        (h as usize) % self.table_size
    }
}

/// Snapshots plus the grid over the live ones. Rebuilt once per tick.
pub struct SpatialIndex {
    grid: SpatialHash,
    snapshots: Vec<EntitySnapshot>,
    lookup: HashMap<hecs::Entity, u32>,
}

impl SpatialIndex {
    pub fn new(cell_size: f32, table_size: usize) -> Self {
        Self {
            grid: SpatialHash::new(cell_size, table_size),
            snapshots: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    pub fn clear(&mut self) {
        self.grid.clear();
        self.snapshots.clear();
        self.lookup.clear();
    }

    /// Snapshot every `T` in the registry. Disposed ones are recorded but
    /// left out of the grid.
    pub fn add_all<T>(&mut self, registry: &EntityRegistry)
    where
        T: Entity + hecs::Component,
    {
        for (entity, (body, tags)) in registry.world().query::<(&T, &Tags)>().iter() {
            self.push(EntitySnapshot {
                entity,
                pos: body.position(),
                food: tags.has(TAG_FOOD),
                creature: tags.has(TAG_CREATURE),
                disposed: body.is_disposed(),
            });
        }
    }

    pub fn push(&mut self, snapshot: EntitySnapshot) {
        let index = self.snapshots.len() as u32;
        if !snapshot.disposed {
            self.grid.insert(snapshot.pos, index);
        }
        self.lookup.insert(snapshot.entity, index);
        self.snapshots.push(snapshot);
    }

    pub fn get(&self, entity: hecs::Entity) -> Option<&EntitySnapshot> {
        let index = *self.lookup.get(&entity)?;
        self.snapshots.get(index as usize)
    }

    pub fn snapshots(&self) -> &[EntitySnapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Live entities strictly within `radius` of `pos`, each reported once,
    /// in insertion order.
    pub fn within(&self, pos: Vec2, radius: f32) -> Vec<&EntitySnapshot> {
        let mut hits = Vec::new();
        self.grid.query_radius(pos, radius, |i| hits.push(i));
        hits.sort_unstable();
        hits.dedup();
        hits.into_iter()
            .map(|i| &self.snapshots[i as usize])
            .filter(|s| s.pos.distance(pos) < radius)
            .collect()
    }
}
