//! # Region Export
//!
//! Writes a rectangle of a live zone back out as a chunk template, so rooms
//! built in the editor can be reused as prefabs. Cells keep their drop tags;
//! savepoints, portals and enemy spawns inside the rectangle become `spawn`
//! lines with probability 1.0.

use std::fmt::Write as _;
use std::path::Path;

use crate::error::{WorldError, WorldResult};
use crate::zone::Zone;

/// What an export wrote.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Template name (from the output file stem).
    pub name: String,
    /// Exported width.
    pub width: i32,
    /// Exported height.
    pub height: i32,
    /// Wall lines written.
    pub walls: usize,
    /// Spawn lines written.
    pub spawns: usize,
}

/// Inclusive grid rectangle, normalized and clamped to a zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Region {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl Region {
    /// `None` when the zone has no grid or the rectangle misses it entirely.
    fn clamped(x0: i32, y0: i32, x1: i32, y1: i32, size: usize) -> Option<Self> {
        let last = i32::try_from(size).ok()?.checked_sub(1)?;
        let (min_x, max_x) = (x0.min(x1), x0.max(x1));
        let (min_y, max_y) = (y0.min(y1), y0.max(y1));
        if last < 0 || max_x < 0 || max_y < 0 || min_x > last || min_y > last {
            return None;
        }
        Some(Self {
            min_x: min_x.max(0),
            min_y: min_y.max(0),
            max_x: max_x.min(last),
            max_y: max_y.min(last),
        })
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }
}

/// Renders the template text for a region of `zone`.
fn render(zone: &Zone, region: Region, name: &str, cell_size: f64) -> (String, ExportReport) {
    let width = region.max_x - region.min_x + 1;
    let height = region.max_y - region.min_y + 1;
    let mut report = ExportReport { name: name.to_owned(), width, height, ..ExportReport::default() };
    let mut out = String::new();

    let _ = writeln!(
        out,
        "# exported from {} ({}) region ({}, {})-({}, {})",
        zone.name(),
        zone.filepath(),
        region.min_x,
        region.min_y,
        region.max_x,
        region.max_y
    );
    let _ = writeln!(out, "chunk {name}");
    let _ = writeln!(out, "size {width} {height}");
    let _ = writeln!(out, "style structured");

    for y in region.min_y..=region.max_y {
        for x in region.min_x..=region.max_x {
            let Some(kind) = zone.cell(x, y) else {
                continue;
            };
            let _ = write!(out, "wall {} {} {}", x - region.min_x, y - region.min_y, kind.0);
            if let Some(d) = zone.destructible_at(x, y) {
                let _ = write!(out, " drop:{}", d.drop_id);
            }
            out.push('\n');
            report.walls += 1;
        }
    }

    let mut spawn = |out: &mut String, x: i32, y: i32, entity_type: &str| {
        let _ = writeln!(out, "spawn {} {} {} 1.0", x - region.min_x, y - region.min_y, entity_type);
        report.spawns += 1;
    };

    for s in zone.savepoints().iter().filter(|s| region.contains(s.x, s.y)) {
        spawn(&mut out, s.x, s.y, "savepoint");
    }
    for p in zone.portals().iter().filter(|p| region.contains(p.x, p.y)) {
        spawn(&mut out, p.x, p.y, "portal");
    }
    for s in zone.spawns() {
        let (x, y) = s.position.to_grid(cell_size);
        if region.contains(x, y) {
            spawn(&mut out, x, y, &s.enemy_type);
        }
    }

    (out, report)
}

/// Exports the rectangle spanned by two corners (any order, inclusive) to
/// `out_path`. The rectangle is clamped to the zone.
///
/// # Errors
///
/// Fails when the zone has no grid, the rectangle does not overlap it, or
/// the file cannot be written.
pub fn export_region(
    zone: &Zone,
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
    out_path: &Path,
    cell_size: f64,
) -> WorldResult<ExportReport> {
    if zone.size() == 0 {
        return Err(WorldError::NotLoaded);
    }
    let region = Region::clamped(min_x, min_y, max_x, max_y, zone.size())
        .ok_or(WorldError::RegionOutsideZone { min_x, min_y, max_x, max_y })?;
    let name = out_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "exported".to_owned());

    let (text, report) = render(zone, region, &name, cell_size);
    std::fs::write(out_path, text).map_err(|source| WorldError::Write {
        path: out_path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        "exported {}x{} region of {} to {} ({} walls, {} spawns)",
        report.width,
        report.height,
        zone.name(),
        out_path.display(),
        report.walls,
        report.spawns
    );
    Ok(report)
}
