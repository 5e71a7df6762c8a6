//! # Zone File Format
//!
//! Line-oriented text, one directive per line:
//!
//! ```text
//! name <string>
//! size <int>
//! procgen <octaves> <frequency> <lacunarity> <persistence> <wall_threshold>
//! celltype <id> <pr> <pg> <pb> <pa> <or> <og> <ob> <oa> [<pattern>]
//! cell <x> <y> <celltype-id> [drop:<sub-id>]
//! empty <x> <y>
//! spawn <enemy-type> <world_x> <world_y>
//! portal <grid_x> <grid_y> <id> <dest_zone_path> <dest_portal_id>
//! savepoint <grid_x> <grid_y> <id>
//! ```
//!
//! `cell` and `empty` lines are authored: generation never overwrites them.
//! A procedural zone saves every cell that differs from what generation
//! would produce (hand-placed and stamped cells, including empty ones); the
//! rest is regenerated from the seed on load.
//!
//! Parsing is lenient: comments, blank lines, unknown directives and
//! malformed lines are skipped. `save` followed by `load` reproduces the
//! palette (in order), the cells with their drop tags, and every registry.
//! Undo history is not persisted.

use std::fmt::Write as _;
use std::path::Path;

use super::records::{CellType, Destructible, Portal, Rgba, Savepoint, SpawnPoint, WorldPos, DEFAULT_PATTERN};
use super::{Zone, MAX_ZONE_SIZE};
use crate::diagnostics::{drop_tag, for_each_directive, number, require, Diagnostic, LineOutcome, SkipReason};
use crate::error::{WorldError, WorldResult};
use crate::procgen::NoiseParams;

/// Diagnostics from the most recent zone load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Lines that were skipped.
    pub diagnostics: Vec<Diagnostic>,
}

impl From<WorldError> for SkipReason {
    fn from(err: WorldError) -> Self {
        match err {
            WorldError::OutOfBounds { x, y, .. } => Self::OutOfBounds(i64::from(x), i64::from(y)),
            WorldError::UnknownCellType(id) => Self::UnknownCellType(id),
            WorldError::CapacityExceeded { what, .. } => Self::CapacityExceeded(what),
            WorldError::InvalidSize { .. } => Self::InvalidSize,
            other => Self::UnknownDirective(other.to_string()),
        }
    }
}

fn color(args: &[&str]) -> Result<Rgba, SkipReason> {
    Ok(Rgba::new(number(args[0])?, number(args[1])?, number(args[2])?, number(args[3])?))
}

impl Zone {
    /// Parses zone text. `filepath` becomes the zone identity.
    ///
    /// Never fails; skipped lines are returned as diagnostics.
    #[must_use]
    pub fn parse(text: &str, filepath: &str) -> (Self, LoadReport) {
        let mut zone = Self::default();
        zone.set_filepath(filepath);

        let diagnostics = for_each_directive(text, |directive, args| {
            match zone.apply_directive(directive, args) {
                Ok(()) => LineOutcome::Applied,
                Err(reason) => LineOutcome::Skipped(reason),
            }
        });

        (zone, LoadReport { diagnostics })
    }

    fn apply_directive(&mut self, directive: &str, args: &[&str]) -> Result<(), SkipReason> {
        match directive {
            "name" => {
                require("name", args, 1)?;
                self.set_name(&args.join(" "));
            }
            "size" => {
                require("size", args, 1)?;
                let size: i64 = number(args[0])?;
                if size <= 0 || size > MAX_ZONE_SIZE as i64 {
                    return Err(SkipReason::InvalidSize);
                }
                self.resize(size as usize);
            }
            "procgen" => {
                require("procgen", args, 5)?;
                self.set_noise_params(Some(NoiseParams {
                    octaves: number(args[0])?,
                    frequency: number(args[1])?,
                    lacunarity: number(args[2])?,
                    persistence: number(args[3])?,
                    wall_threshold: number(args[4])?,
                }));
            }
            "celltype" => {
                require("celltype", args, 9)?;
                let primary = color(&args[1..5])?;
                let outline = color(&args[5..9])?;
                let pattern = args.get(9).copied().unwrap_or(DEFAULT_PATTERN);
                self.add_cell_type(CellType::new(args[0], primary, outline, pattern))?;
            }
            "cell" => {
                require("cell", args, 3)?;
                let (x, y): (i32, i32) = (number(args[0])?, number(args[1])?);
                let kind = self
                    .find_cell_type(args[2])
                    .ok_or_else(|| SkipReason::UnknownCellType(args[2].to_owned()))?;
                self.set_cell(x, y, Some(kind))?;
                self.set_hand_placed(x, y, true);
                if let Some(drop_id) = drop_tag(args.get(3)) {
                    self.add_destructible(Destructible { x, y, drop_id })?;
                }
            }
            "empty" => {
                require("empty", args, 2)?;
                let (x, y): (i32, i32) = (number(args[0])?, number(args[1])?);
                self.set_cell(x, y, None)?;
                self.set_hand_placed(x, y, true);
                self.remove_destructible(x, y);
            }
            "spawn" => {
                require("spawn", args, 3)?;
                let position = WorldPos::new(number(args[1])?, number(args[2])?);
                self.add_spawn(SpawnPoint { enemy_type: args[0].to_owned(), position })?;
            }
            "portal" => {
                require("portal", args, 5)?;
                self.add_portal(Portal {
                    x: number(args[0])?,
                    y: number(args[1])?,
                    id: args[2].to_owned(),
                    dest_zone: args[3].to_owned(),
                    dest_portal: args[4].to_owned(),
                })?;
            }
            "savepoint" => {
                require("savepoint", args, 3)?;
                self.add_savepoint(Savepoint {
                    x: number(args[0])?,
                    y: number(args[1])?,
                    id: args[2].to_owned(),
                })?;
            }
            other => return Err(SkipReason::UnknownDirective(other.to_owned())),
        }
        Ok(())
    }

    /// Serializes the zone to its text form.
    ///
    /// Procedural zones write hand-placed and chunk-stamped cells, empty ones
    /// as `empty` lines; the rest is reproduced by generation. Other zones
    /// write every non-empty cell.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        let procedural = self.is_procedural();

        // Writing into a String cannot fail.
        let _ = writeln!(out, "# zone file");
        let _ = writeln!(out, "name {}", self.name());
        let _ = writeln!(out, "size {}", self.size());

        if let Some(p) = self.noise_params() {
            let _ = writeln!(
                out,
                "procgen {} {} {} {} {}",
                p.octaves, p.frequency, p.lacunarity, p.persistence, p.wall_threshold
            );
        }

        out.push('\n');
        for t in self.cell_types() {
            let _ = writeln!(out, "celltype {} {} {} {}", t.id, t.primary, t.outline, t.pattern);
        }

        out.push('\n');
        for (x, y, cell) in self.cells() {
            if procedural && !(cell.hand_placed || cell.chunk_stamped) {
                continue;
            }
            let Some(cell_type) = cell.kind.and_then(|k| self.cell_type(k)) else {
                if procedural {
                    let _ = writeln!(out, "empty {x} {y}");
                }
                continue;
            };
            let _ = write!(out, "cell {x} {y} {}", cell_type.id);
            if let Some(d) = self.destructible_at(x, y) {
                let _ = write!(out, " drop:{}", d.drop_id);
            }
            out.push('\n');
        }

        if !self.spawns().is_empty() {
            out.push('\n');
        }
        for s in self.spawns() {
            let _ = writeln!(out, "spawn {} {} {}", s.enemy_type, s.position.x, s.position.y);
        }
        for p in self.portals() {
            let _ = writeln!(out, "portal {} {} {} {} {}", p.x, p.y, p.id, p.dest_zone, p.dest_portal);
        }
        for s in self.savepoints() {
            let _ = writeln!(out, "savepoint {} {} {}", s.x, s.y, s.id);
        }

        out
    }

    /// Reads and parses a zone file.
    ///
    /// # Errors
    ///
    /// Fails only if the file cannot be read.
    pub fn load_file(path: &Path) -> WorldResult<(Self, LoadReport)> {
        let text = std::fs::read_to_string(path).map_err(|source| WorldError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text, &path.to_string_lossy()))
    }

    /// Writes the zone to `path`.
    ///
    /// The text is written to a sibling temporary file first and renamed into
    /// place, so a crash never leaves a half-written zone.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be written.
    pub fn save_file(&self, path: &Path) -> WorldResult<()> {
        let write_err = |source| WorldError::Write { path: path.to_path_buf(), source };

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        std::fs::write(&tmp, self.serialize()).map_err(write_err)?;
        std::fs::rename(&tmp, path).map_err(write_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::CellTypeIndex;

    const SAMPLE: &str = "\
# hub zone
name Central Hub
size 16

celltype wall_a 40 40 48 255 90 90 110 255 solid
celltype wire 0 180 90 255 0 255 120 255 circuit
celltype glass 200 200 255 128 255 255 255 255

cell 1 1 wall_a
cell 2 1 wire drop:battery
spawn drone 3.5 4.25
portal 0 8 west zones/outer.zone east
savepoint 8 8 hub_save
";

    #[test]
    fn test_parse_sample() {
        let (zone, report) = Zone::parse(SAMPLE, "zones/hub.zone");

        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
        assert_eq!(zone.name(), "Central Hub");
        assert_eq!(zone.size(), 16);
        assert_eq!(zone.cell_types().len(), 3);
        assert_eq!(zone.cell_types()[2].pattern, DEFAULT_PATTERN);
        assert_eq!(zone.cell(1, 1), Some(CellTypeIndex(0)));
        assert_eq!(zone.cell(2, 1), Some(CellTypeIndex(1)));
        assert!(zone.is_hand_placed(1, 1));
        assert_eq!(zone.destructible_at(2, 1).map(|d| d.drop_id.as_str()), Some("battery"));
        assert_eq!(zone.spawns()[0].position, WorldPos::new(3.5, 4.25));
        assert_eq!(zone.portals()[0].dest_zone, "zones/outer.zone");
        assert_eq!(zone.savepoints()[0].id, "hub_save");
        assert!(!zone.is_procedural());
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let text = "\
size 8
celltype w 1 2 3 4 5 6 7 8
celltype short 1 2 3
cell 1 1 w
cell 1 x w
cell 99 1 w
cell 2 2 nope
spawn drone 1.0
frobnicate 1 2 3
savepoint 1 1 ok
";
        let (zone, report) = Zone::parse(text, "z.zone");

        let lines: Vec<usize> = report.diagnostics.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![3, 5, 6, 7, 8, 9]);
        assert_eq!(zone.filled_count(), 1);
        assert_eq!(zone.savepoints().len(), 1);
        assert!(matches!(report.diagnostics[3].reason, SkipReason::UnknownCellType(_)));
    }

    #[test]
    fn test_invalid_size_skipped() {
        let (zone, report) = Zone::parse("size 0\nsize -4\nsize 5000\n", "z.zone");
        assert_eq!(zone.size(), 0);
        assert_eq!(report.diagnostics.len(), 3);
    }

    #[test]
    fn test_roundtrip() {
        let (zone, _) = Zone::parse(SAMPLE, "zones/hub.zone");
        let (reloaded, report) = Zone::parse(&zone.serialize(), "zones/hub.zone");

        assert!(report.diagnostics.is_empty());
        assert_eq!(reloaded, zone);
    }

    #[test]
    fn test_procgen_directive_roundtrip() {
        let text = "size 8\nprocgen 5 0.07 2.1 0.45 -0.2\n";
        let (zone, _) = Zone::parse(text, "p.zone");
        let params = zone.noise_params().copied().unwrap();
        assert_eq!(params.octaves, 5);
        assert!((params.wall_threshold + 0.2).abs() < 1e-12);

        let (reloaded, _) = Zone::parse(&zone.serialize(), "p.zone");
        assert_eq!(reloaded.noise_params(), zone.noise_params());
    }

    #[test]
    fn test_procedural_zone_saves_only_hand_placed() {
        let text = "size 4\nprocgen 4 0.08 2 0.5 0\ncelltype w 1 1 1 1 1 1 1 1\ncell 0 0 w\n";
        let (mut zone, _) = Zone::parse(text, "p.zone");
        zone.set_cell(3, 3, Some(CellTypeIndex(0))).unwrap();

        let saved = zone.serialize();
        assert!(saved.contains("cell 0 0 w"));
        assert!(!saved.contains("cell 3 3"));
    }

    #[test]
    fn test_procedural_zone_saves_authored_and_stamped() {
        let text = "size 4\nprocgen 4 0.08 2 0.5 0\ncelltype w 1 1 1 1 1 1 1 1\nempty 1 0\n";
        let (mut zone, report) = Zone::parse(text, "p.zone");
        assert!(report.diagnostics.is_empty());
        assert!(zone.is_hand_placed(1, 0));

        zone.set_cell(2, 2, Some(CellTypeIndex(0))).unwrap();
        zone.cell_mut(2, 2).unwrap().chunk_stamped = true;
        zone.cell_mut(3, 2).unwrap().chunk_stamped = true;

        let saved = zone.serialize();
        assert!(saved.contains("empty 1 0\n"));
        assert!(saved.contains("cell 2 2 w\n"));
        assert!(saved.contains("empty 3 2\n"));
        assert_eq!(saved.lines().filter(|l| l.starts_with("cell ") || l.starts_with("empty ")).count(), 3);

        let (reloaded, _) = Zone::parse(&saved, "p.zone");
        assert_eq!(reloaded.cell(2, 2), Some(CellTypeIndex(0)));
        assert!(reloaded.is_hand_placed(3, 2));
    }

    #[test]
    fn test_empty_directive_clears_authored_cell() {
        let text = "size 4\ncelltype w 1 1 1 1 1 1 1 1\ncell 1 1 w drop:gem\nempty 1 1\nempty 9 9\nempty 2\n";
        let (zone, report) = Zone::parse(text, "z.zone");

        assert_eq!(zone.cell(1, 1), None);
        assert!(zone.is_hand_placed(1, 1));
        assert!(zone.destructible_at(1, 1).is_none());
        let lines: Vec<usize> = report.diagnostics.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![5, 6]);
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hub.zone");
        let (zone, _) = Zone::parse(SAMPLE, &path.to_string_lossy());

        zone.save_file(&path).unwrap();
        let (loaded, _) = Zone::load_file(&path).unwrap();
        assert_eq!(loaded, zone);
        assert!(!dir.path().join("hub.zone.tmp").exists());
    }

    #[test]
    fn test_missing_file() {
        let err = Zone::load_file(Path::new("/definitely/not/here.zone")).unwrap_err();
        assert!(matches!(err, WorldError::Read { .. }));
    }
}
