//! # World Collaborators
//!
//! The zone model does not draw cells or simulate entities. It pushes its
//! state into two narrow sinks implemented by the renderer and the entity
//! layer:
//!
//! - [`MapSink`]: per-cell visual/collision descriptors
//! - [`EntitySink`]: enemies ("mines"), portals, savepoints
//!
//! Both must tolerate repeated calls and out-of-range coordinates.
//! [`NullSink`] and [`RecordingSink`] are headless implementations for tools
//! and tests.

use std::collections::BTreeMap;

use crate::zone::{CellType, Rgba, WorldPos};

/// What the map layer needs to draw and collide one cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellDescriptor {
    /// Fill color.
    pub primary: Rgba,
    /// Outline color.
    pub outline: Rgba,
    /// Circuit pattern (animated) vs. structural solid.
    pub circuit: bool,
}

impl From<&CellType> for CellDescriptor {
    fn from(cell_type: &CellType) -> Self {
        Self {
            primary: cell_type.primary,
            outline: cell_type.outline,
            circuit: cell_type.is_circuit(),
        }
    }
}

/// Receives grid cell updates.
pub trait MapSink {
    /// Sets the descriptor of one cell.
    fn set_cell(&mut self, x: i32, y: i32, descriptor: &CellDescriptor);
    /// Clears one cell.
    fn clear_cell(&mut self, x: i32, y: i32);
    /// Clears every cell.
    fn clear(&mut self);
}

/// Instantiates and tears down live game objects.
pub trait EntitySink {
    /// Spawns an enemy of the given type.
    fn spawn_enemy(&mut self, enemy_type: &str, position: WorldPos);
    /// Removes the enemy instantiated at `position`.
    fn remove_enemy(&mut self, position: WorldPos);
    /// Spawns a portal.
    fn spawn_portal(&mut self, position: WorldPos, id: &str, dest_zone: &str, dest_portal: &str);
    /// Spawns a savepoint.
    fn spawn_savepoint(&mut self, position: WorldPos, id: &str);
    /// Removes every object this sink instantiated.
    fn clear(&mut self);
}

/// Ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl MapSink for NullSink {
    fn set_cell(&mut self, _x: i32, _y: i32, _descriptor: &CellDescriptor) {}
    fn clear_cell(&mut self, _x: i32, _y: i32) {}
    fn clear(&mut self) {}
}

impl EntitySink for NullSink {
    fn spawn_enemy(&mut self, _enemy_type: &str, _position: WorldPos) {}
    fn remove_enemy(&mut self, _position: WorldPos) {}
    fn spawn_portal(&mut self, _position: WorldPos, _id: &str, _dest_zone: &str, _dest_portal: &str) {}
    fn spawn_savepoint(&mut self, _position: WorldPos, _id: &str) {}
    fn clear(&mut self) {}
}

/// A live portal as seen by a [`RecordingSink`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedPortal {
    /// Where it was spawned.
    pub position: WorldPos,
    /// Portal id.
    pub id: String,
    /// Destination zone path.
    pub dest_zone: String,
    /// Destination portal id.
    pub dest_portal: String,
}

/// Keeps an in-memory copy of everything pushed to it.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    /// Live cells keyed by `(x, y)`.
    pub cells: BTreeMap<(i32, i32), CellDescriptor>,
    /// Live enemies.
    pub enemies: Vec<(String, WorldPos)>,
    /// Live portals.
    pub portals: Vec<RecordedPortal>,
    /// Live savepoints.
    pub savepoints: Vec<(String, WorldPos)>,
    /// Number of full map clears received.
    pub map_clears: usize,
    /// Number of full entity clears received.
    pub entity_clears: usize,
}

impl MapSink for RecordingSink {
    fn set_cell(&mut self, x: i32, y: i32, descriptor: &CellDescriptor) {
        self.cells.insert((x, y), descriptor.clone());
    }

    fn clear_cell(&mut self, x: i32, y: i32) {
        self.cells.remove(&(x, y));
    }

    fn clear(&mut self) {
        self.cells.clear();
        self.map_clears += 1;
    }
}

impl EntitySink for RecordingSink {
    fn spawn_enemy(&mut self, enemy_type: &str, position: WorldPos) {
        self.enemies.push((enemy_type.to_owned(), position));
    }

    fn remove_enemy(&mut self, position: WorldPos) {
        if let Some(index) = self.enemies.iter().position(|(_, p)| *p == position) {
            self.enemies.remove(index);
        }
    }

    fn spawn_portal(&mut self, position: WorldPos, id: &str, dest_zone: &str, dest_portal: &str) {
        self.portals.push(RecordedPortal {
            position,
            id: id.to_owned(),
            dest_zone: dest_zone.to_owned(),
            dest_portal: dest_portal.to_owned(),
        });
    }

    fn spawn_savepoint(&mut self, position: WorldPos, id: &str) {
        self.savepoints.push((id.to_owned(), position));
    }

    fn clear(&mut self) {
        self.enemies.clear();
        self.portals.clear();
        self.savepoints.clear();
        self.entity_clears += 1;
    }
}
