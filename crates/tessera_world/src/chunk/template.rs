//! # Chunk Templates
//!
//! Small hand-authored prefabs loaded from text:
//!
//! ```text
//! chunk <name>
//! size <width> <height>
//! wall <x> <y> <celltype-index> [drop:<sub-id>]
//! empty <x> <y>
//! style <organic|structured>
//! spawn <x> <y> <entity-type> [<probability>]
//! ```
//!
//! Malformed lines are skipped. A template fails to load only when the file
//! cannot be read or its declared size is not positive.

use std::path::Path;

use crate::diagnostics::{drop_tag, for_each_directive, number, require, Diagnostic, LineOutcome, SkipReason};
use crate::error::{WorldError, WorldResult};
use crate::zone::CellTypeIndex;

/// Largest template side length.
pub const MAX_CHUNK_SIZE: i32 = 64;
/// Wall capacity of one template.
pub const MAX_TEMPLATE_WALLS: usize = (MAX_CHUNK_SIZE * MAX_CHUNK_SIZE) as usize;
/// Forced-empty capacity of one template.
pub const MAX_TEMPLATE_EMPTIES: usize = MAX_TEMPLATE_WALLS;
/// Spawn capacity of one template.
pub const MAX_TEMPLATE_SPAWNS: usize = 64;

/// Generation hint describing the prefab's obstacles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ObstacleStyle {
    /// Irregular, cave-like shapes.
    Organic,
    /// Rooms, corridors, straight walls.
    #[default]
    Structured,
}

impl ObstacleStyle {
    /// Name used in template files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Organic => "organic",
            Self::Structured => "structured",
        }
    }
}

/// A wall cell in template-local coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateWall {
    /// Local X.
    pub x: i32,
    /// Local Y.
    pub y: i32,
    /// Palette index in the target zone.
    pub cell_type: CellTypeIndex,
    /// Pickup dropped when destroyed.
    pub drop_id: Option<String>,
}

/// A spawn point on a template lattice corner.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateSpawn {
    /// Local corner X.
    pub x: i32,
    /// Local corner Y.
    pub y: i32,
    /// Entity type tag.
    pub entity_type: String,
    /// Chance in `[0, 1]` that the spawn is instantiated.
    pub probability: f32,
}

/// A loaded prefab.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkTemplate {
    /// Library key.
    pub name: String,
    /// Width in cells.
    pub width: i32,
    /// Height in cells.
    pub height: i32,
    /// Wall cells.
    pub walls: Vec<TemplateWall>,
    /// Cells forced empty.
    pub empties: Vec<(i32, i32)>,
    /// Spawn points.
    pub spawns: Vec<TemplateSpawn>,
    /// Obstacle style hint.
    pub style: ObstacleStyle,
}

impl ChunkTemplate {
    /// Creates an empty template.
    #[must_use]
    pub fn new(name: impl Into<String>, width: i32, height: i32) -> Self {
        Self { name: name.into(), width, height, ..Self::default() }
    }

    /// True when the local cell `(x, y)` lies inside the template.
    #[inline]
    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// Parses template text. `fallback_name` is used without a `chunk` line.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidSize`] when no positive size within
    /// [`MAX_CHUNK_SIZE`] is declared.
    pub fn parse(text: &str, fallback_name: &str) -> WorldResult<(Self, Vec<Diagnostic>)> {
        let mut template = Self::new(fallback_name, 0, 0);
        let mut declared = (0i64, 0i64);

        let mut diagnostics = for_each_directive(text, |directive, args| {
            match template.apply_directive(directive, args, &mut declared) {
                Ok(()) => LineOutcome::Applied,
                Err(reason) => LineOutcome::Skipped(reason),
            }
        });

        let (width, height) = declared;
        let max = i64::from(MAX_CHUNK_SIZE);
        if width <= 0 || height <= 0 || width > max || height > max {
            return Err(WorldError::InvalidSize { width, height });
        }
        template.width = width as i32;
        template.height = height as i32;

        // Size may be declared after the cells that need it.
        let (w, h) = (template.width, template.height);
        let outside = |x: i32, y: i32| !(x >= 0 && y >= 0 && x < w && y < h);
        template.walls.retain(|wall| {
            let out = outside(wall.x, wall.y);
            if out {
                diagnostics.push(Diagnostic {
                    line: 0,
                    reason: SkipReason::OutOfBounds(i64::from(wall.x), i64::from(wall.y)),
                });
            }
            !out
        });
        template.empties.retain(|&(x, y)| !outside(x, y));
        template.spawns.retain(|s| s.x >= 0 && s.y >= 0 && s.x <= w && s.y <= h);

        Ok((template, diagnostics))
    }

    fn apply_directive(
        &mut self,
        directive: &str,
        args: &[&str],
        declared: &mut (i64, i64),
    ) -> Result<(), SkipReason> {
        match directive {
            "chunk" => {
                require("chunk", args, 1)?;
                self.name = args[0].to_owned();
            }
            "size" => {
                require("size", args, 2)?;
                *declared = (number(args[0])?, number(args[1])?);
            }
            "wall" => {
                require("wall", args, 3)?;
                if self.walls.len() >= MAX_TEMPLATE_WALLS {
                    return Err(SkipReason::CapacityExceeded("template wall"));
                }
                self.walls.push(TemplateWall {
                    x: number(args[0])?,
                    y: number(args[1])?,
                    cell_type: CellTypeIndex(number(args[2])?),
                    drop_id: drop_tag(args.get(3)),
                });
            }
            "empty" => {
                require("empty", args, 2)?;
                if self.empties.len() >= MAX_TEMPLATE_EMPTIES {
                    return Err(SkipReason::CapacityExceeded("template empty"));
                }
                self.empties.push((number(args[0])?, number(args[1])?));
            }
            "style" => {
                require("style", args, 1)?;
                self.style = match args[0] {
                    "organic" => ObstacleStyle::Organic,
                    "structured" => ObstacleStyle::Structured,
                    other => return Err(SkipReason::UnknownDirective(format!("style {other}"))),
                };
            }
            "spawn" => {
                require("spawn", args, 3)?;
                if self.spawns.len() >= MAX_TEMPLATE_SPAWNS {
                    return Err(SkipReason::CapacityExceeded("template spawn"));
                }
                let probability = match args.get(3) {
                    Some(token) => number::<f32>(token)?.clamp(0.0, 1.0),
                    None => 1.0,
                };
                self.spawns.push(TemplateSpawn {
                    x: number(args[0])?,
                    y: number(args[1])?,
                    entity_type: args[2].to_owned(),
                    probability,
                });
            }
            other => return Err(SkipReason::UnknownDirective(other.to_owned())),
        }
        Ok(())
    }

    /// Loads a template file. The file stem names templates without a
    /// `chunk` line.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or declares a non-positive size.
    pub fn load(path: &Path) -> WorldResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| WorldError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        let (template, diagnostics) = Self::parse(&text, &stem)?;
        if !diagnostics.is_empty() {
            tracing::debug!("chunk {}: {} lines skipped", path.display(), diagnostics.len());
        }
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOM: &str = "\
# small room
chunk room_a
size 4 3
style organic
wall 0 0 0
wall 1 0 1 drop:ammo
empty 1 1
spawn 2 2 drone 0.5
spawn 4 3 savepoint
";

    #[test]
    fn test_parse_room() {
        let (t, diagnostics) = ChunkTemplate::parse(ROOM, "fallback").unwrap();

        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(t.name, "room_a");
        assert_eq!((t.width, t.height), (4, 3));
        assert_eq!(t.style, ObstacleStyle::Organic);
        assert_eq!(t.walls.len(), 2);
        assert_eq!(t.walls[1].drop_id.as_deref(), Some("ammo"));
        assert_eq!(t.walls[1].cell_type, CellTypeIndex(1));
        assert_eq!(t.empties, vec![(1, 1)]);
        assert!((t.spawns[0].probability - 0.5).abs() < f32::EPSILON);
        assert!((t.spawns[1].probability - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_fallback_name() {
        let (t, _) = ChunkTemplate::parse("size 2 2\n", "from_file").unwrap();
        assert_eq!(t.name, "from_file");
    }

    #[test]
    fn test_non_positive_size_fails() {
        assert!(matches!(ChunkTemplate::parse("size 0 4\n", "x"), Err(WorldError::InvalidSize { .. })));
        assert!(matches!(ChunkTemplate::parse("size 3 -1\n", "x"), Err(WorldError::InvalidSize { .. })));
        assert!(matches!(ChunkTemplate::parse("wall 0 0 0\n", "x"), Err(WorldError::InvalidSize { .. })));
    }

    #[test]
    fn test_malformed_lines_do_not_fail_load() {
        let text = "size 3 3\nwall a b c\nwall 0 0\nstyle fancy\nmystery\nwall 2 2 0\n";
        let (t, diagnostics) = ChunkTemplate::parse(text, "x").unwrap();
        assert_eq!(t.walls.len(), 1);
        assert_eq!(diagnostics.len(), 4);
    }

    #[test]
    fn test_out_of_bounds_cells_dropped() {
        let text = "wall 5 0 0\nsize 3 3\nwall 1 1 0\nspawn 3 3 drone\nspawn 4 0 drone\n";
        let (t, _) = ChunkTemplate::parse(text, "x").unwrap();
        assert_eq!(t.walls.len(), 1);
        assert_eq!(t.spawns.len(), 1, "Corner (3,3) is valid, (4,0) is not");
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            ChunkTemplate::load(Path::new("/nope/missing.chunk")),
            Err(WorldError::Read { .. })
        ));
    }
}
