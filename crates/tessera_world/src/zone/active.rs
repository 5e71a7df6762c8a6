//! # Active Zone
//!
//! The live, editable zone together with the world collaborators it feeds.
//!
//! ## Edit Contract
//!
//! Every edit (`place_cell`, `remove_cell`, `place_spawn`, `remove_spawn`)
//! follows the same steps:
//!
//! 1. Validate (loaded, bounds, palette id, capacity)
//! 2. Capture an undo entry that exactly reverses the edit
//! 3. Mutate the model
//! 4. Push the incremental delta to the collaborators
//! 5. Persist
//!
//! With [`PersistMode::Immediate`] (the default) the zone file already
//! reflects the edit when the call returns. Invalid requests are logged and
//! return `false`; nothing here propagates an error to the caller.

use std::path::Path;

use tessera_procedural::{derive_zone_seed, Xoshiro128};

use super::format::LoadReport;
use super::undo::{UndoEntry, UndoRing};
use super::{Destructible, SpawnPoint, WorldPos, Zone};
use crate::chunk::{self, ChunkTemplate, ChunkTransform};
use crate::collab::{CellDescriptor, EntitySink, MapSink};
use crate::config::{PersistMode, WorldConfig};
use crate::error::{WorldError, WorldResult};
use crate::procgen::{self, GenerationReport};

/// The loaded zone plus its renderer and entity collaborators.
#[derive(Debug)]
pub struct ActiveZone<M: MapSink, E: EntitySink> {
    zone: Zone,
    undo: UndoRing,
    map: M,
    entities: E,
    config: WorldConfig,
    dirty: bool,
    last_load: LoadReport,
}

impl<M: MapSink, E: EntitySink> ActiveZone<M, E> {
    /// Creates an unloaded handle.
    pub fn new(map: M, entities: E, config: WorldConfig) -> Self {
        Self {
            zone: Zone::default(),
            undo: UndoRing::default(),
            map,
            entities,
            config,
            dirty: false,
            last_load: LoadReport::default(),
        }
    }

    /// The zone model.
    #[inline]
    #[must_use]
    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    /// The map collaborator.
    #[inline]
    #[must_use]
    pub fn map(&self) -> &M {
        &self.map
    }

    /// The entity collaborator.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &E {
        &self.entities
    }

    /// World settings.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Edit history.
    #[inline]
    #[must_use]
    pub fn undo_ring(&self) -> &UndoRing {
        &self.undo
    }

    /// Lines skipped by the most recent load.
    #[inline]
    #[must_use]
    pub fn last_load(&self) -> &LoadReport {
        &self.last_load
    }

    /// True when the model holds edits not yet written to disk.
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Loads a zone file, replacing whatever was loaded before.
    ///
    /// The previous zone is torn down first. On a read failure the handle is
    /// left unloaded. Procedural zones are generated before being applied to
    /// the world.
    pub fn load(&mut self, path: &Path) -> bool {
        self.teardown();

        let (zone, report) = match Zone::load_file(path) {
            Ok(loaded) => loaded,
            Err(err) => {
                tracing::error!("zone load failed: {}", err);
                return false;
            }
        };

        for diagnostic in &report.diagnostics {
            tracing::warn!("{}:{}: skipped: {}", path.display(), diagnostic.line, diagnostic.reason);
        }
        if zone.size() == 0 {
            tracing::warn!("zone {} declares no grid", path.display());
        }

        self.zone = zone;
        self.last_load = report;
        if self.zone.is_procedural() {
            let generated = procgen::generate(&mut self.zone, self.config.master_seed);
            tracing::debug!("generated {} walls with seed {:#010x}", generated.walls, generated.seed);
        }
        self.apply_to_world();

        tracing::info!(
            "loaded zone '{}' from {} ({}x{}, {} cells, {} spawns, {} portals, {} savepoints)",
            self.zone.name(),
            path.display(),
            self.zone.size(),
            self.zone.size(),
            self.zone.filled_count(),
            self.zone.spawns().len(),
            self.zone.portals().len(),
            self.zone.savepoints().len()
        );
        true
    }

    /// Tears down the world objects and returns to the unloaded state.
    ///
    /// Pending deferred edits are flushed first.
    pub fn unload(&mut self) {
        if self.zone.is_loaded() {
            tracing::info!("unloading zone '{}'", self.zone.name());
        }
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.dirty {
            self.flush();
        }
        self.map.clear();
        self.entities.clear();
        self.zone = Zone::default();
        self.undo.clear();
        self.dirty = false;
        self.last_load = LoadReport::default();
    }

    /// Rebuilds the collaborators' view from the model.
    fn apply_to_world(&mut self) {
        self.map.clear();
        for (x, y, _) in self.zone.filled_cells() {
            if let Some(descriptor) = descriptor_at(&self.zone, x, y) {
                self.map.set_cell(x, y, &descriptor);
            }
        }

        let cell_size = self.config.cell_size;
        self.entities.clear();
        for spawn in self.zone.spawns() {
            self.entities.spawn_enemy(&spawn.enemy_type, spawn.position);
        }
        for portal in self.zone.portals() {
            let position = WorldPos::from_grid(portal.x, portal.y, cell_size);
            self.entities.spawn_portal(position, &portal.id, &portal.dest_zone, &portal.dest_portal);
        }
        for savepoint in self.zone.savepoints() {
            let position = WorldPos::from_grid(savepoint.x, savepoint.y, cell_size);
            self.entities.spawn_savepoint(position, &savepoint.id);
        }
    }

    fn redraw_cell(&mut self, x: i32, y: i32) {
        match descriptor_at(&self.zone, x, y) {
            Some(descriptor) => self.map.set_cell(x, y, &descriptor),
            None => self.map.clear_cell(x, y),
        }
    }

    // ---------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------

    /// Writes the zone to its file.
    pub fn save(&mut self) -> bool {
        if !self.zone.is_loaded() {
            tracing::warn!("save skipped: {}", WorldError::NotLoaded);
            return false;
        }
        match self.try_save() {
            Ok(()) => {
                self.dirty = false;
                true
            }
            Err(err) => {
                tracing::error!("zone save failed: {}", err);
                self.dirty = true;
                false
            }
        }
    }

    fn try_save(&self) -> WorldResult<()> {
        let path = Path::new(self.zone.filepath());
        self.zone.save_file(path)?;
        tracing::debug!("saved zone '{}' to {}", self.zone.name(), path.display());
        Ok(())
    }

    /// Writes pending edits, if any.
    pub fn flush(&mut self) -> bool {
        !self.dirty || self.save()
    }

    /// Applies the persistence policy after a successful mutation.
    fn persist(&mut self) {
        match self.config.persistence {
            PersistMode::Immediate => {
                self.save();
            }
            PersistMode::Deferred => self.dirty = true,
        }
    }

    /// Turns a procedural zone into a hand-authored one holding its current
    /// cells, and saves it.
    pub fn bake(&mut self) -> bool {
        if !self.zone.is_procedural() {
            tracing::warn!("zone '{}' is not procedural, nothing to bake", self.zone.name());
            return false;
        }
        self.zone.set_noise_params(None);
        self.save()
    }

    // ---------------------------------------------------------------------
    // Generation and prefabs
    // ---------------------------------------------------------------------

    /// Regenerates every non-hand-placed cell of a procedural zone.
    pub fn generate(&mut self) -> Option<GenerationReport> {
        if !self.zone.is_procedural() {
            tracing::debug!("zone '{}' is not procedural", self.zone.name());
            return None;
        }
        let report = procgen::generate(&mut self.zone, self.config.master_seed);
        self.apply_to_world();
        tracing::info!(
            "generated zone '{}': {} walls, {} hand-placed kept, seed {:#010x}",
            self.zone.name(),
            report.walls,
            report.skipped,
            report.seed
        );
        Some(report)
    }

    /// Stamps a prefab with its local origin at `(x, y)`, including its
    /// spawns, then rebuilds the world view and persists.
    ///
    /// Spawn rolls come from a stream seeded by the zone seed, the template
    /// name and the origin, so re-stamping the same prefab at the same place
    /// is reproducible.
    pub fn stamp(&mut self, template: &ChunkTemplate, x: i32, y: i32, transform: ChunkTransform) -> bool {
        if !self.zone.is_loaded() {
            tracing::warn!("stamp '{}': {}", template.name, WorldError::NotLoaded);
            return false;
        }

        let cells = chunk::stamp(template, &mut self.zone, x, y, transform);
        let stream = format!("{}#{}@{},{}", self.zone.filepath(), template.name, x, y);
        let mut rng = Xoshiro128::seed(derive_zone_seed(self.config.master_seed, &stream));
        let spawns =
            chunk::stamp_spawns(template, &mut self.zone, x, y, transform, &mut rng, self.config.cell_size);

        self.apply_to_world();
        tracing::info!(
            "stamped '{}' {} at ({}, {}): {} walls, {} protected, {} enemies, {} savepoints",
            template.name,
            transform,
            x,
            y,
            cells.walls,
            cells.protected,
            spawns.enemies,
            spawns.savepoints
        );
        self.persist();
        true
    }

    /// Exports a rectangle of the zone as a chunk template file.
    pub fn export_chunk(&self, min_x: i32, min_y: i32, max_x: i32, max_y: i32, out_path: &Path) -> bool {
        match chunk::export_region(&self.zone, min_x, min_y, max_x, max_y, out_path, self.config.cell_size) {
            Ok(_) => true,
            Err(err) => {
                tracing::error!("chunk export failed: {}", err);
                false
            }
        }
    }

    // ---------------------------------------------------------------------
    // Editing
    // ---------------------------------------------------------------------

    /// Places a hand-authored cell of palette type `cell_type_id`.
    pub fn place_cell(&mut self, x: i32, y: i32, cell_type_id: &str) -> bool {
        match self.try_place_cell(x, y, cell_type_id) {
            Ok(()) => {
                self.redraw_cell(x, y);
                self.persist();
                true
            }
            Err(err) => {
                tracing::warn!("place_cell rejected: {}", err);
                false
            }
        }
    }

    fn try_place_cell(&mut self, x: i32, y: i32, cell_type_id: &str) -> WorldResult<()> {
        self.ensure_loaded()?;
        let kind = self
            .zone
            .find_cell_type(cell_type_id)
            .ok_or_else(|| WorldError::UnknownCellType(cell_type_id.to_owned()))?;
        let entry = self.cell_entry(x, y)?;

        self.zone.set_cell(x, y, Some(kind))?;
        self.zone.set_hand_placed(x, y, true);
        self.zone.remove_destructible(x, y);
        self.undo.push(entry);
        Ok(())
    }

    /// Empties a cell and drops its destructible.
    ///
    /// On a procedural zone the empty cell is kept hand-placed, so the
    /// removal survives regeneration. Elsewhere the hand-placed flag is
    /// cleared.
    pub fn remove_cell(&mut self, x: i32, y: i32) -> bool {
        match self.try_remove_cell(x, y) {
            Ok(()) => {
                self.map.clear_cell(x, y);
                self.persist();
                true
            }
            Err(err) => {
                tracing::debug!("remove_cell rejected: {}", err);
                false
            }
        }
    }

    fn try_remove_cell(&mut self, x: i32, y: i32) -> WorldResult<()> {
        self.ensure_loaded()?;
        let entry = self.cell_entry(x, y)?;
        let procedural = self.zone.is_procedural();
        let already_empty = matches!(
            entry,
            UndoEntry::Cell { previous: None, previous_hand_placed, .. } if procedural || !previous_hand_placed
        );
        if already_empty {
            return Err(WorldError::AlreadyEmpty { x, y });
        }

        self.zone.set_cell(x, y, None)?;
        // A removed cell of a procedural zone stays authored so generation
        // does not refill it.
        self.zone.set_hand_placed(x, y, procedural);
        self.zone.remove_destructible(x, y);
        self.undo.push(entry);
        Ok(())
    }

    /// Appends an enemy spawn at a world position.
    pub fn place_spawn(&mut self, enemy_type: &str, position: WorldPos) -> bool {
        let result = self.ensure_loaded().and_then(|()| {
            self.zone.add_spawn(SpawnPoint { enemy_type: enemy_type.to_owned(), position })
        });
        match result {
            Ok(index) => {
                self.undo.push(UndoEntry::SpawnInserted { index });
                self.entities.spawn_enemy(enemy_type, position);
                self.persist();
                true
            }
            Err(err) => {
                tracing::warn!("place_spawn rejected: {}", err);
                false
            }
        }
    }

    /// Removes the spawn at `index`.
    pub fn remove_spawn(&mut self, index: usize) -> bool {
        let Some(spawn) = self.zone.remove_spawn(index) else {
            tracing::warn!("remove_spawn rejected: {}", WorldError::NoSuchSpawn(index));
            return false;
        };
        self.entities.remove_enemy(spawn.position);
        self.undo.push(UndoEntry::SpawnRemoved { index, spawn });
        self.persist();
        true
    }

    /// Reverts the most recent edit. Returns `false` when there is nothing
    /// to undo.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.undo.pop() else {
            return false;
        };

        match entry {
            UndoEntry::Cell { x, y, previous, previous_hand_placed, previous_drop } => {
                if let Err(err) = self.zone.set_cell(x, y, previous) {
                    tracing::error!("undo of cell ({}, {}) failed: {}", x, y, err);
                }
                self.zone.set_hand_placed(x, y, previous_hand_placed);
                self.zone.remove_destructible(x, y);
                if let Some(drop_id) = previous_drop {
                    if let Err(err) = self.zone.add_destructible(Destructible { x, y, drop_id }) {
                        tracing::error!("undo of drop at ({}, {}) failed: {}", x, y, err);
                    }
                }
                self.redraw_cell(x, y);
            }
            UndoEntry::SpawnInserted { index } => {
                if let Some(spawn) = self.zone.remove_spawn(index) {
                    self.entities.remove_enemy(spawn.position);
                }
            }
            UndoEntry::SpawnRemoved { index, spawn } => {
                self.entities.spawn_enemy(&spawn.enemy_type, spawn.position);
                self.zone.insert_spawn(index, spawn);
            }
        }

        self.persist();
        true
    }

    fn ensure_loaded(&self) -> WorldResult<()> {
        if self.zone.is_loaded() {
            Ok(())
        } else {
            Err(WorldError::NotLoaded)
        }
    }

    /// Snapshot of everything a cell edit at `(x, y)` can change.
    fn cell_entry(&self, x: i32, y: i32) -> WorldResult<UndoEntry> {
        self.zone.check_bounds(x, y)?;
        let state = self.zone.cell_state(x, y).unwrap_or_default();
        Ok(UndoEntry::Cell {
            x,
            y,
            previous: state.kind,
            previous_hand_placed: state.hand_placed,
            previous_drop: self.zone.destructible_at(x, y).map(|d| d.drop_id.clone()),
        })
    }
}

fn descriptor_at(zone: &Zone, x: i32, y: i32) -> Option<CellDescriptor> {
    zone.cell(x, y).and_then(|kind| zone.cell_type(kind)).map(CellDescriptor::from)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::collab::RecordingSink;
    use crate::zone::{CellTypeIndex, UNDO_CAPACITY};

    type Handle = ActiveZone<RecordingSink, RecordingSink>;

    const HUB: &str = "\
name Hub
size 32
celltype wall_a 40 40 48 255 90 90 110 255 solid
celltype wire 0 180 90 255 0 255 120 255 circuit
cell 1 1 wall_a
cell 2 1 wire drop:battery
spawn drone 3.5 4.5
portal 0 8 west zones/outer.zone east
savepoint 8 8 hub_save
";

    fn setup(text: &str, persistence: PersistMode) -> (tempfile::TempDir, PathBuf, Handle) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hub.zone");
        std::fs::write(&path, text).unwrap();

        let config = WorldConfig { persistence, ..WorldConfig::default() };
        let mut active = ActiveZone::new(RecordingSink::default(), RecordingSink::default(), config);
        assert!(active.load(&path));
        (dir, path, active)
    }

    fn on_disk(path: &Path) -> Zone {
        Zone::load_file(path).unwrap().0
    }

    #[test]
    fn test_load_applies_to_world() {
        let (_dir, _path, active) = setup(HUB, PersistMode::Immediate);

        assert_eq!(active.map().cells.len(), 2);
        assert!(active.map().cells[&(2, 1)].circuit);
        assert_eq!(active.entities().enemies.len(), 1);
        assert_eq!(active.entities().portals[0].position, WorldPos::new(0.0, 8.0));
        assert_eq!(active.entities().savepoints[0].0, "hub_save");
        assert!(active.undo_ring().is_empty());
    }

    #[test]
    fn test_failed_load_leaves_unloaded() {
        let (dir, _path, mut active) = setup(HUB, PersistMode::Immediate);

        assert!(!active.load(&dir.path().join("missing.zone")));
        assert!(!active.zone().is_loaded());
        assert_eq!(active.zone().size(), 0);
        assert!(active.map().cells.is_empty());
        assert!(active.entities().enemies.is_empty());
    }

    #[test]
    fn test_every_edit_is_on_disk_before_return() {
        let (_dir, path, mut active) = setup(HUB, PersistMode::Immediate);

        assert!(active.place_cell(5, 5, "wall_a"));
        assert_eq!(on_disk(&path).cell(5, 5), Some(CellTypeIndex(0)));

        assert!(active.remove_cell(1, 1));
        assert_eq!(on_disk(&path).cell(1, 1), None);

        assert!(active.place_spawn("turret", WorldPos::new(10.0, 10.0)));
        assert_eq!(on_disk(&path).spawns().len(), 2);

        assert!(active.remove_spawn(0));
        assert_eq!(on_disk(&path).spawns()[0].enemy_type, "turret");

        assert!(active.undo());
        assert_eq!(on_disk(&path).spawns()[0].enemy_type, "drone");
        assert!(!active.is_dirty());
    }

    #[test]
    fn test_undo_restores_empty_cell() {
        let (_dir, path, mut active) = setup(HUB, PersistMode::Immediate);

        assert!(active.place_cell(5, 5, "wall_a"));
        assert!(active.map().cells.contains_key(&(5, 5)));
        assert!(active.undo());

        assert_eq!(active.zone().cell(5, 5), None);
        assert!(!active.zone().is_hand_placed(5, 5));
        assert!(!active.map().cells.contains_key(&(5, 5)));
        assert_eq!(on_disk(&path).cell(5, 5), None);
    }

    #[test]
    fn test_undo_restores_drop() {
        let (_dir, _path, mut active) = setup(HUB, PersistMode::Immediate);

        assert!(active.remove_cell(2, 1));
        assert!(active.zone().destructible_at(2, 1).is_none());
        assert!(active.undo());

        assert_eq!(active.zone().cell(2, 1), Some(CellTypeIndex(1)));
        assert!(active.zone().is_hand_placed(2, 1));
        assert_eq!(active.zone().destructible_at(2, 1).map(|d| d.drop_id.as_str()), Some("battery"));
    }

    #[test]
    fn test_undo_history_is_bounded() {
        let (_dir, _path, mut active) = setup(HUB, PersistMode::Deferred);

        for i in 0..=UNDO_CAPACITY as i32 {
            assert!(active.place_cell(i % 32, 10 + i / 32, "wire"));
        }
        for _ in 0..UNDO_CAPACITY {
            assert!(active.undo());
        }

        assert!(!active.undo());
        assert_eq!(active.zone().cell(0, 10), Some(CellTypeIndex(1)), "First edit fell off the ring");
        assert_eq!(active.zone().cell(1, 10), None);
    }

    #[test]
    fn test_spawn_undo_restores_order() {
        let (_dir, _path, mut active) = setup(HUB, PersistMode::Immediate);
        assert!(active.place_spawn("turret", WorldPos::new(1.0, 1.0)));
        assert!(active.place_spawn("mine", WorldPos::new(2.0, 2.0)));
        let before = active.zone().spawns().to_vec();

        assert!(active.remove_spawn(1));
        assert!(active.undo());
        assert_eq!(active.zone().spawns(), &before[..]);

        assert!(active.undo());
        assert_eq!(active.zone().spawns().len(), 2);
        assert_eq!(active.entities().enemies.len(), 2);
    }

    #[test]
    fn test_invalid_edits_are_noops() {
        let (_dir, path, mut active) = setup(HUB, PersistMode::Immediate);
        let before = std::fs::read_to_string(&path).unwrap();

        assert!(!active.place_cell(5, 5, "unobtainium"));
        assert!(!active.place_cell(32, 0, "wall_a"));
        assert!(!active.remove_cell(20, 20));
        assert!(!active.remove_spawn(9));
        assert!(!active.undo());

        assert!(active.undo_ring().is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_edits_without_zone_rejected() {
        let mut active = ActiveZone::new(RecordingSink::default(), RecordingSink::default(), WorldConfig::default());
        assert!(!active.place_cell(0, 0, "wall_a"));
        assert!(!active.place_spawn("drone", WorldPos::default()));
        assert!(!active.save());
    }

    #[test]
    fn test_deferred_mode_waits_for_flush() {
        let (_dir, path, mut active) = setup(HUB, PersistMode::Deferred);

        assert!(active.place_cell(6, 6, "wall_a"));
        assert!(active.is_dirty());
        assert_eq!(on_disk(&path).cell(6, 6), None);

        assert!(active.flush());
        assert!(!active.is_dirty());
        assert_eq!(on_disk(&path).cell(6, 6), Some(CellTypeIndex(0)));
    }

    #[test]
    fn test_unload_flushes_and_tears_down() {
        let (_dir, path, mut active) = setup(HUB, PersistMode::Deferred);
        assert!(active.place_cell(7, 7, "wire"));

        active.unload();

        assert!(!active.zone().is_loaded());
        assert!(active.map().cells.is_empty());
        assert!(active.entities().portals.is_empty());
        assert_eq!(on_disk(&path).cell(7, 7), Some(CellTypeIndex(1)));
    }

    #[test]
    fn test_procedural_zone_generates_on_load() {
        let text = format!("{HUB}procgen 4 0.15 2.0 0.5 0.0\n");
        let (_dir, _path, mut active) = setup(&text, PersistMode::Immediate);

        assert!(active.zone().filled_count() > 2);
        assert_eq!(active.zone().cell(1, 1), Some(CellTypeIndex(0)));
        assert_eq!(active.map().cells.len(), active.zone().filled_count());

        let first = active.zone().clone();
        let report = active.generate().unwrap();
        assert_eq!(report.draws, 32 * 32);
        assert_eq!(active.zone(), &first);
    }

    #[test]
    fn test_stamp_and_export() {
        let (dir, path, mut active) = setup(HUB, PersistMode::Immediate);
        let mut template = ChunkTemplate::new("corner", 4, 4);
        template.walls.push(chunk::TemplateWall { x: 0, y: 0, cell_type: CellTypeIndex(0), drop_id: None });

        assert!(active.stamp(&template, 10, 10, ChunkTransform::Rot90));
        assert_eq!(active.zone().cell(13, 10), Some(CellTypeIndex(0)));
        assert!(active.map().cells.contains_key(&(13, 10)));
        assert_eq!(on_disk(&path).cell(13, 10), Some(CellTypeIndex(0)));

        let out = dir.path().join("corner_copy.chunk");
        assert!(active.export_chunk(10, 10, 13, 13, &out));
        let exported = ChunkTemplate::load(&out).unwrap();
        assert_eq!(exported.walls.len(), 1);
        assert_eq!((exported.walls[0].x, exported.walls[0].y), (3, 0));
    }

    const CAVE: &str = "\
name Cave
size 32
procgen 4 0.15 2.0 0.5 0.0
celltype rock 50 50 60 255 80 80 90 255 solid
";

    fn reloaded(path: &Path) -> Handle {
        let mut fresh = ActiveZone::new(RecordingSink::default(), RecordingSink::default(), WorldConfig::default());
        assert!(fresh.load(path));
        fresh
    }

    fn first_wall(zone: &Zone) -> (i32, i32) {
        zone.filled_cells().map(|(x, y, _)| (x, y)).next().unwrap()
    }

    #[test]
    fn test_procedural_removal_survives_reload() {
        let (_dir, path, mut active) = setup(CAVE, PersistMode::Immediate);
        let (x, y) = first_wall(active.zone());

        assert!(active.remove_cell(x, y));
        assert!(active.zone().is_hand_placed(x, y));
        assert!(!active.remove_cell(x, y), "Removing an authored empty twice");

        let fresh = reloaded(&path);
        assert_eq!(fresh.zone().cell(x, y), None);
        assert_eq!(fresh.zone().render_ascii(), active.zone().render_ascii());
    }

    #[test]
    fn test_procedural_removal_undo_regenerates() {
        let (_dir, path, mut active) = setup(CAVE, PersistMode::Immediate);
        let (x, y) = first_wall(active.zone());
        let kind = active.zone().cell(x, y);

        assert!(active.remove_cell(x, y));
        assert!(active.undo());
        assert!(!active.zone().is_hand_placed(x, y));
        assert!(!std::fs::read_to_string(&path).unwrap().contains("empty "));

        assert_eq!(reloaded(&path).zone().cell(x, y), kind);
    }

    #[test]
    fn test_procedural_stamp_survives_reload() {
        let (_dir, path, mut active) = setup(CAVE, PersistMode::Immediate);
        let mut template = ChunkTemplate::new("room", 8, 8);
        template.walls.push(chunk::TemplateWall { x: 0, y: 0, cell_type: CellTypeIndex(0), drop_id: None });
        template.walls.push(chunk::TemplateWall { x: 7, y: 7, cell_type: CellTypeIndex(0), drop_id: Some("ore".into()) });

        assert!(active.stamp(&template, 0, 0, ChunkTransform::Identity));
        assert_eq!(active.zone().cell(3, 3), None);

        let fresh = reloaded(&path);
        assert_eq!(fresh.zone().render_ascii(), active.zone().render_ascii());
        assert_eq!(fresh.zone().cell(7, 7), Some(CellTypeIndex(0)));
        assert_eq!(fresh.zone().destructible_at(7, 7).map(|d| d.drop_id.as_str()), Some("ore"));
        assert_eq!(fresh.map().cells, active.map().cells);
    }

    #[test]
    fn test_bake_keeps_generated_cells() {
        let text = format!("{HUB}procgen 4 0.15 2.0 0.5 0.0\n");
        let (_dir, path, mut active) = setup(&text, PersistMode::Immediate);
        let generated = active.zone().filled_count();

        assert!(active.bake());
        let baked = on_disk(&path);
        assert!(!baked.is_procedural());
        assert_eq!(baked.filled_count(), generated);
    }
}
