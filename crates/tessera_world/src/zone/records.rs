//! Value records stored in a zone.

use std::fmt;

/// Pattern name that selects the circuit look.
pub const CIRCUIT_PATTERN: &str = "circuit";

/// Pattern written for cell types that do not name one.
pub const DEFAULT_PATTERN: &str = "solid";

/// Index into a zone's cell-type palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellTypeIndex(pub u16);

impl CellTypeIndex {
    /// Returns the index as `usize`.
    #[inline]
    #[must_use]
    pub const fn get(self) -> usize {
        self.0 as usize
    }
}

/// 8-bit RGBA color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba {
    /// Creates a color.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.r, self.g, self.b, self.a)
    }
}

/// One palette entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellType {
    /// Unique id referenced by `cell` lines and edits.
    pub id: String,
    /// Fill color.
    pub primary: Rgba,
    /// Outline color.
    pub outline: Rgba,
    /// `circuit` or a structural pattern name.
    pub pattern: String,
}

impl CellType {
    /// Creates a cell type.
    #[must_use]
    pub fn new(id: impl Into<String>, primary: Rgba, outline: Rgba, pattern: impl Into<String>) -> Self {
        Self { id: id.into(), primary, outline, pattern: pattern.into() }
    }

    /// Returns true for the circuit pattern.
    #[inline]
    #[must_use]
    pub fn is_circuit(&self) -> bool {
        self.pattern == CIRCUIT_PATTERN
    }
}

/// A position in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldPos {
    /// X in world units.
    pub x: f64,
    /// Y in world units.
    pub y: f64,
}

impl WorldPos {
    /// Creates a world position.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// World position of a grid lattice corner.
    #[inline]
    #[must_use]
    pub fn from_grid(x: i32, y: i32, cell_size: f64) -> Self {
        Self { x: f64::from(x) * cell_size, y: f64::from(y) * cell_size }
    }

    /// Grid cell containing this position.
    #[inline]
    #[must_use]
    pub fn to_grid(self, cell_size: f64) -> (i32, i32) {
        ((self.x / cell_size).floor() as i32, (self.y / cell_size).floor() as i32)
    }
}

/// A wall cell that drops a pickup when destroyed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Destructible {
    /// Grid X.
    pub x: i32,
    /// Grid Y.
    pub y: i32,
    /// Pickup identifier.
    pub drop_id: String,
}

/// An enemy spawn point.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnPoint {
    /// Enemy type tag.
    pub enemy_type: String,
    /// World position.
    pub position: WorldPos,
}

/// A portal to another zone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Portal {
    /// Grid X.
    pub x: i32,
    /// Grid Y.
    pub y: i32,
    /// Portal id within this zone.
    pub id: String,
    /// Path of the destination zone.
    pub dest_zone: String,
    /// Portal id within the destination zone.
    pub dest_portal: String,
}

/// A checkpoint the player can respawn at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Savepoint {
    /// Grid X.
    pub x: i32,
    /// Grid Y.
    pub y: i32,
    /// Savepoint id within this zone.
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circuit_detection() {
        let c = CellType::new("c", Rgba::default(), Rgba::default(), "circuit");
        let s = CellType::new("s", Rgba::default(), Rgba::default(), "brick");
        assert!(c.is_circuit());
        assert!(!s.is_circuit());
    }

    #[test]
    fn test_grid_conversion() {
        let p = WorldPos::from_grid(3, 4, 2.0);
        assert_eq!(p, WorldPos::new(6.0, 8.0));
        assert_eq!(WorldPos::new(6.9, 8.1).to_grid(2.0), (3, 4));
        assert_eq!(WorldPos::new(-0.5, 0.0).to_grid(1.0), (-1, 0));
    }
}
