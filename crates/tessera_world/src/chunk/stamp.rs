//! # Chunk Stamping
//!
//! Writes a transformed prefab into a zone in three ordered passes:
//!
//! 1. Mark the footprint chunk-stamped and pre-clear every cell in it
//! 2. Write template walls (and register their drops)
//! 3. Force template empties back to empty
//!
//! Hand-placed cells are never written in any pass.

use tessera_procedural::Xoshiro128;

use super::template::ChunkTemplate;
use super::transform::{transform_point, transform_spawn, ChunkTransform};
use crate::zone::{Destructible, Savepoint, SpawnPoint, WorldPos, Zone};

/// What a stamp pass changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StampReport {
    /// Footprint cells inside the zone.
    pub footprint: usize,
    /// Walls written.
    pub walls: usize,
    /// Destructibles registered.
    pub destructibles: usize,
    /// Writes refused because the target was hand-placed.
    pub protected: usize,
}

/// Stamps `template` with its local origin at `(origin_x, origin_y)`.
pub fn stamp(
    template: &ChunkTemplate,
    zone: &mut Zone,
    origin_x: i32,
    origin_y: i32,
    transform: ChunkTransform,
) -> StampReport {
    let mut report = StampReport::default();
    let (w, h) = (template.width, template.height);
    // `None` when the offset target leaves the i32 range.
    let target = |x: i32, y: i32| {
        let (tx, ty) = transform_point(x, y, w, h, transform);
        Some((origin_x.checked_add(tx)?, origin_y.checked_add(ty)?))
    };

    // Pass 1: footprint
    for ly in 0..h {
        for lx in 0..w {
            let Some((x, y)) = target(lx, ly) else {
                continue;
            };
            let Some(cell) = zone.cell_mut(x, y) else {
                continue;
            };
            report.footprint += 1;
            cell.chunk_stamped = true;
            if cell.hand_placed {
                report.protected += 1;
                continue;
            }
            cell.kind = None;
            zone.remove_destructible(x, y);
        }
    }

    // Pass 2: walls
    for wall in &template.walls {
        let Some((x, y)) = target(wall.x, wall.y) else {
            continue;
        };
        if !zone.in_bounds(x, y) {
            continue;
        }
        if zone.is_hand_placed(x, y) {
            report.protected += 1;
            continue;
        }
        if zone.set_cell(x, y, Some(wall.cell_type)).is_err() {
            tracing::debug!("chunk {}: palette index {} not in zone", template.name, wall.cell_type.0);
            continue;
        }
        report.walls += 1;

        if let Some(drop_id) = &wall.drop_id {
            let record = Destructible { x, y, drop_id: drop_id.clone() };
            match zone.add_destructible(record) {
                Ok(()) => report.destructibles += 1,
                Err(err) => tracing::debug!("chunk {}: {}", template.name, err),
            }
        }
    }

    // Pass 3: carve
    for &(lx, ly) in &template.empties {
        let Some((x, y)) = target(lx, ly) else {
            continue;
        };
        let Some(cell) = zone.cell_mut(x, y) else {
            continue;
        };
        if cell.hand_placed {
            continue;
        }
        if cell.kind.take().is_some() {
            report.walls = report.walls.saturating_sub(1);
        }
        zone.remove_destructible(x, y);
    }

    report
}

/// What [`stamp_spawns`] registered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpawnStampReport {
    /// Enemy spawns appended to the zone.
    pub enemies: usize,
    /// Savepoints appended to the zone.
    pub savepoints: usize,
    /// Spawns that lost their probability roll.
    pub rolled_out: usize,
}

/// Instantiates template spawn points in corner-domain coordinates.
///
/// Each spawn survives when `rng.float() < probability`. One draw is made
/// per template spawn. Spawns landing off the corner lattice of the zone
/// are dropped. `portal` spawns are skipped (templates carry no
/// destination).
pub fn stamp_spawns(
    template: &ChunkTemplate,
    zone: &mut Zone,
    origin_x: i32,
    origin_y: i32,
    transform: ChunkTransform,
    rng: &mut Xoshiro128,
    cell_size: f64,
) -> SpawnStampReport {
    let mut report = SpawnStampReport::default();
    let last_corner = i32::try_from(zone.size()).unwrap_or(i32::MAX);

    for spawn in &template.spawns {
        let roll = rng.float();
        if roll >= spawn.probability {
            report.rolled_out += 1;
            continue;
        }

        let (tx, ty) = transform_spawn(spawn.x, spawn.y, template.width, template.height, transform);
        let (Some(x), Some(y)) = (origin_x.checked_add(tx), origin_y.checked_add(ty)) else {
            tracing::debug!("chunk {}: spawn at ({}, {}) off the grid", template.name, spawn.x, spawn.y);
            continue;
        };
        if !(0..=last_corner).contains(&x) || !(0..=last_corner).contains(&y) {
            tracing::debug!("chunk {}: spawn at ({}, {}) off the grid", template.name, x, y);
            continue;
        }
        let result = match spawn.entity_type.as_str() {
            "portal" => continue,
            "savepoint" => {
                let id = format!("{}_{}_{}", template.name, x, y);
                zone.add_savepoint(Savepoint { x, y, id }).map(|()| report.savepoints += 1)
            }
            enemy => {
                let position = WorldPos::from_grid(x, y, cell_size);
                zone.add_spawn(SpawnPoint { enemy_type: enemy.to_owned(), position })
                    .map(|_| report.enemies += 1)
            }
        };
        if let Err(err) = result {
            tracing::debug!("chunk {}: spawn dropped: {}", template.name, err);
        }
    }

    report
}
