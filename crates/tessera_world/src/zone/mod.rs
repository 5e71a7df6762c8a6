//! # Zone Model
//!
//! A zone is one square, tile-based play area: a cell grid over a palette of
//! cell types, plus bounded registries of destructibles, enemy spawns,
//! portals and savepoints.
//!
//! ## Cell State
//!
//! Every grid coordinate carries three orthogonal pieces of state:
//!
//! - `kind`: a palette index, or `None` for empty
//! - `hand_placed`: authored by a person; generation and stamping never
//!   touch it
//! - `chunk_stamped`: inside the footprint of a stamped prefab (bookkeeping)
//!
//! ## Invariants
//!
//! 1. Every non-empty cell indexes an existing palette entry
//! 2. Registries never grow past their fixed capacity
//! 3. The grid is always `size * size`

mod active;
mod format;
mod records;
mod undo;

pub use active::ActiveZone;
pub use format::LoadReport;
pub use records::{
    CellType, CellTypeIndex, Destructible, Portal, Rgba, Savepoint, SpawnPoint, WorldPos,
    CIRCUIT_PATTERN, DEFAULT_PATTERN,
};
pub use undo::{UndoEntry, UndoRing, UNDO_CAPACITY};

use crate::error::{WorldError, WorldResult};
use crate::procgen::NoiseParams;

/// Largest supported zone side length.
pub const MAX_ZONE_SIZE: usize = 1024;
/// Palette capacity.
pub const MAX_CELL_TYPES: usize = 64;
/// Destructible registry capacity.
pub const MAX_DESTRUCTIBLES: usize = 1024;
/// Enemy spawn registry capacity.
pub const MAX_SPAWNS: usize = 256;
/// Portal registry capacity.
pub const MAX_PORTALS: usize = 32;
/// Savepoint registry capacity.
pub const MAX_SAVEPOINTS: usize = 32;

/// Per-coordinate grid state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    /// Palette index, `None` when empty.
    pub kind: Option<CellTypeIndex>,
    /// Immune to generation and stamping.
    pub hand_placed: bool,
    /// Covered by a stamped prefab.
    pub chunk_stamped: bool,
}

/// The authoritative layout of one zone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Zone {
    name: String,
    filepath: String,
    size: usize,
    cell_types: Vec<CellType>,
    /// Indexed as `[y * size + x]`.
    cells: Vec<Cell>,
    destructibles: Vec<Destructible>,
    spawns: Vec<SpawnPoint>,
    portals: Vec<Portal>,
    savepoints: Vec<Savepoint>,
    noise: Option<NoiseParams>,
}

impl Zone {
    /// Creates an empty zone. `size` is clamped to [`MAX_ZONE_SIZE`].
    #[must_use]
    pub fn new(name: impl Into<String>, filepath: impl Into<String>, size: usize) -> Self {
        let mut zone = Self {
            name: name.into(),
            filepath: filepath.into(),
            ..Self::default()
        };
        zone.resize(size);
        zone
    }

    /// Display name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Persistence key and zone identifier.
    #[inline]
    #[must_use]
    pub fn filepath(&self) -> &str {
        &self.filepath
    }

    /// Grid side length.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// True once the zone has a file identity.
    #[inline]
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        !self.filepath.is_empty()
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        name.clone_into(&mut self.name);
    }

    pub(crate) fn set_filepath(&mut self, filepath: &str) {
        filepath.clone_into(&mut self.filepath);
    }

    /// Replaces the grid with an empty one of the given side length.
    pub(crate) fn resize(&mut self, size: usize) {
        self.size = size.min(MAX_ZONE_SIZE);
        self.cells = vec![Cell::default(); self.size * self.size];
    }

    /// Flat index of `(x, y)`, `None` when out of bounds.
    #[inline]
    #[must_use]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        let (ux, uy) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        (ux < self.size && uy < self.size).then(|| uy * self.size + ux)
    }

    /// True when `(x, y)` lies on the grid.
    #[inline]
    #[must_use]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    pub(crate) fn check_bounds(&self, x: i32, y: i32) -> WorldResult<usize> {
        self.index(x, y).ok_or(WorldError::OutOfBounds { x, y, size: self.size })
    }

    /// Full state of one coordinate.
    #[inline]
    #[must_use]
    pub fn cell_state(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Palette index at `(x, y)`; `None` for empty or out-of-bounds cells.
    #[inline]
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<CellTypeIndex> {
        self.cell_state(x, y).and_then(|c| c.kind)
    }

    /// True when `(x, y)` is protected from generation and stamping.
    #[inline]
    #[must_use]
    pub fn is_hand_placed(&self, x: i32, y: i32) -> bool {
        self.cell_state(x, y).is_some_and(|c| c.hand_placed)
    }

    /// True when `(x, y)` is inside a stamped prefab footprint.
    #[inline]
    #[must_use]
    pub fn is_chunk_stamped(&self, x: i32, y: i32) -> bool {
        self.cell_state(x, y).is_some_and(|c| c.chunk_stamped)
    }

    pub(crate) fn cell_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        let index = self.index(x, y)?;
        Some(&mut self.cells[index])
    }

    /// Sets the palette index at `(x, y)` without touching the masks.
    ///
    /// # Errors
    ///
    /// Fails for out-of-bounds coordinates or a palette index that does not
    /// exist.
    pub fn set_cell(&mut self, x: i32, y: i32, kind: Option<CellTypeIndex>) -> WorldResult<()> {
        let index = self.check_bounds(x, y)?;
        if let Some(kind) = kind {
            if kind.get() >= self.cell_types.len() {
                return Err(WorldError::UnknownCellType(format!("#{}", kind.0)));
            }
        }
        self.cells[index].kind = kind;
        Ok(())
    }

    /// Marks or unmarks `(x, y)` as hand-placed. Out-of-bounds is a no-op.
    pub fn set_hand_placed(&mut self, x: i32, y: i32, hand_placed: bool) {
        if let Some(cell) = self.cell_mut(x, y) {
            cell.hand_placed = hand_placed;
        }
    }

    /// Iterates every cell in raster order.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        let size = self.size;
        self.cells.iter().enumerate().map(move |(i, c)| ((i % size) as i32, (i / size) as i32, *c))
    }

    /// Iterates non-empty cells in raster order.
    pub fn filled_cells(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        self.cells().filter(|(_, _, c)| c.kind.is_some())
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.kind.is_some()).count()
    }

    // ---------------------------------------------------------------------
    // Palette
    // ---------------------------------------------------------------------

    /// The palette, in declaration order.
    #[inline]
    #[must_use]
    pub fn cell_types(&self) -> &[CellType] {
        &self.cell_types
    }

    /// Palette entry at `index`.
    #[inline]
    #[must_use]
    pub fn cell_type(&self, index: CellTypeIndex) -> Option<&CellType> {
        self.cell_types.get(index.get())
    }

    /// Looks up a palette entry by id.
    #[must_use]
    pub fn find_cell_type(&self, id: &str) -> Option<CellTypeIndex> {
        self.cell_types
            .iter()
            .position(|t| t.id == id)
            .map(|i| CellTypeIndex(i as u16))
    }

    /// Adds a palette entry. Redeclaring an id replaces it in place.
    ///
    /// # Errors
    ///
    /// Fails when the palette is full.
    pub fn add_cell_type(&mut self, cell_type: CellType) -> WorldResult<CellTypeIndex> {
        if let Some(existing) = self.find_cell_type(&cell_type.id) {
            self.cell_types[existing.get()] = cell_type;
            return Ok(existing);
        }
        if self.cell_types.len() >= MAX_CELL_TYPES {
            return Err(WorldError::CapacityExceeded { what: "cell type", capacity: MAX_CELL_TYPES });
        }
        self.cell_types.push(cell_type);
        Ok(CellTypeIndex((self.cell_types.len() - 1) as u16))
    }

    // ---------------------------------------------------------------------
    // Registries
    // ---------------------------------------------------------------------

    /// Destructible wall records.
    #[inline]
    #[must_use]
    pub fn destructibles(&self) -> &[Destructible] {
        &self.destructibles
    }

    /// Drop record attached to the wall at `(x, y)`.
    #[must_use]
    pub fn destructible_at(&self, x: i32, y: i32) -> Option<&Destructible> {
        self.destructibles.iter().find(|d| d.x == x && d.y == y)
    }

    /// Registers a destructible, replacing any record at the same coordinate.
    ///
    /// # Errors
    ///
    /// Fails when the registry is full.
    pub fn add_destructible(&mut self, destructible: Destructible) -> WorldResult<()> {
        if let Some(slot) = self
            .destructibles
            .iter_mut()
            .find(|d| d.x == destructible.x && d.y == destructible.y)
        {
            *slot = destructible;
            return Ok(());
        }
        if self.destructibles.len() >= MAX_DESTRUCTIBLES {
            return Err(WorldError::CapacityExceeded { what: "destructible", capacity: MAX_DESTRUCTIBLES });
        }
        self.destructibles.push(destructible);
        Ok(())
    }

    /// Removes the destructible at `(x, y)`, keeping the others in order.
    pub fn remove_destructible(&mut self, x: i32, y: i32) -> Option<Destructible> {
        let index = self.destructibles.iter().position(|d| d.x == x && d.y == y)?;
        Some(self.destructibles.remove(index))
    }

    /// Enemy spawn points.
    #[inline]
    #[must_use]
    pub fn spawns(&self) -> &[SpawnPoint] {
        &self.spawns
    }

    /// Appends a spawn point, returning its index.
    ///
    /// # Errors
    ///
    /// Fails when the registry is full.
    pub fn add_spawn(&mut self, spawn: SpawnPoint) -> WorldResult<usize> {
        if self.spawns.len() >= MAX_SPAWNS {
            return Err(WorldError::CapacityExceeded { what: "spawn", capacity: MAX_SPAWNS });
        }
        self.spawns.push(spawn);
        Ok(self.spawns.len() - 1)
    }

    /// Reinserts a spawn at its original position (undo of a removal).
    pub(crate) fn insert_spawn(&mut self, index: usize, spawn: SpawnPoint) {
        let index = index.min(self.spawns.len());
        self.spawns.insert(index, spawn);
    }

    /// Removes the spawn at `index`, keeping the others in order.
    pub fn remove_spawn(&mut self, index: usize) -> Option<SpawnPoint> {
        (index < self.spawns.len()).then(|| self.spawns.remove(index))
    }

    /// Portals.
    #[inline]
    #[must_use]
    pub fn portals(&self) -> &[Portal] {
        &self.portals
    }

    /// Appends a portal.
    ///
    /// # Errors
    ///
    /// Fails when the registry is full.
    pub fn add_portal(&mut self, portal: Portal) -> WorldResult<()> {
        if self.portals.len() >= MAX_PORTALS {
            return Err(WorldError::CapacityExceeded { what: "portal", capacity: MAX_PORTALS });
        }
        self.portals.push(portal);
        Ok(())
    }

    /// Savepoints.
    #[inline]
    #[must_use]
    pub fn savepoints(&self) -> &[Savepoint] {
        &self.savepoints
    }

    /// Appends a savepoint.
    ///
    /// # Errors
    ///
    /// Fails when the registry is full.
    pub fn add_savepoint(&mut self, savepoint: Savepoint) -> WorldResult<()> {
        if self.savepoints.len() >= MAX_SAVEPOINTS {
            return Err(WorldError::CapacityExceeded { what: "savepoint", capacity: MAX_SAVEPOINTS });
        }
        self.savepoints.push(savepoint);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Generation settings
    // ---------------------------------------------------------------------

    /// Noise settings, present only for procedurally generated zones.
    #[inline]
    #[must_use]
    pub fn noise_params(&self) -> Option<&NoiseParams> {
        self.noise.as_ref()
    }

    /// True when `generate` fills this zone.
    #[inline]
    #[must_use]
    pub fn is_procedural(&self) -> bool {
        self.noise.is_some()
    }

    /// Flags the zone as procedural (`Some`) or hand-authored (`None`).
    pub fn set_noise_params(&mut self, params: Option<NoiseParams>) {
        self.noise = params;
    }

    /// Renders the grid as text: `#` solid, `+` circuit, `.` empty.
    #[must_use]
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity(self.size * (self.size + 1));
        for row in self.cells.chunks(self.size.max(1)) {
            for cell in row {
                out.push(match cell.kind.and_then(|k| self.cell_type(k)) {
                    Some(t) if t.is_circuit() => '+',
                    Some(_) => '#',
                    None => '.',
                });
            }
            out.push('\n');
        }
        out
    }
}
