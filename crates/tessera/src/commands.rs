//! # Zone Tool Commands
//!
//! Each command loads a zone through [`ActiveZone`], does one thing, and
//! returns the text to print. Nothing is written unless the command says so.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use thiserror::Error;

use tessera_world::chunk::{ChunkLibrary, ChunkTemplate, ChunkTransform};
use tessera_world::{ActiveZone, EntitySink, MapSink, NullSink, PersistMode, RecordingSink, WorldConfig, WorldError};

/// Errors surfaced by `zonetool`.
#[derive(Error, Debug)]
pub enum CommandError {
    /// A world-layer error (config, template, library).
    #[error(transparent)]
    World(#[from] WorldError),

    /// The zone file could not be loaded.
    #[error("could not load zone {}", .0.display())]
    LoadFailed(PathBuf),

    /// `generate` on a zone without a `procgen` line.
    #[error("zone {0} is not procedural")]
    NotProcedural(String),

    /// Chunk not found as a file or in the configured library.
    #[error("unknown chunk `{0}`")]
    UnknownChunk(String),

    /// The zone could not be written.
    #[error("could not save zone {}", .0.display())]
    SaveFailed(PathBuf),

    /// The export file could not be written.
    #[error("could not export to {}", .0.display())]
    ExportFailed(PathBuf),
}

/// Result type for commands.
pub type CommandResult<T> = Result<T, CommandError>;

/// Loads a config file, or the defaults when none is given.
///
/// # Errors
///
/// Fails if the file cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> CommandResult<WorldConfig> {
    match path {
        Some(path) => Ok(WorldConfig::load(path)?),
        None => Ok(WorldConfig::default()),
    }
}

fn open<M: MapSink, E: EntitySink>(
    zone_path: &Path,
    config: WorldConfig,
    map: M,
    entities: E,
) -> CommandResult<ActiveZone<M, E>> {
    // Tools write explicitly; edits stay in memory until asked.
    let config = WorldConfig { persistence: PersistMode::Deferred, ..config };
    let mut active = ActiveZone::new(map, entities, config);
    if active.load(zone_path) {
        Ok(active)
    } else {
        Err(CommandError::LoadFailed(zone_path.to_path_buf()))
    }
}

/// Regenerates a procedural zone and renders it. With `bake`, the generated
/// cells are written into the zone file and the zone stops being procedural.
///
/// # Errors
///
/// Fails if the zone cannot be loaded, is not procedural, or cannot be saved.
pub fn generate(zone_path: &Path, config: WorldConfig, bake: bool) -> CommandResult<String> {
    let mut active = open(zone_path, config, NullSink, NullSink)?;
    let report = active
        .generate()
        .ok_or_else(|| CommandError::NotProcedural(active.zone().name().to_owned()))?;

    if bake && !active.bake() {
        return Err(CommandError::SaveFailed(zone_path.to_path_buf()));
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "seed {:#010x}: {} walls, {} authored cells kept{}",
        report.seed,
        report.walls,
        report.skipped,
        if bake { ", baked" } else { "" }
    );
    out.push_str(&active.zone().render_ascii());
    Ok(out)
}

/// Finds a chunk by file path, then by name in the configured library.
///
/// # Errors
///
/// Fails if the file is invalid or the name is not in the library.
pub fn resolve_template(chunk: &str, config: &WorldConfig) -> CommandResult<ChunkTemplate> {
    let path = Path::new(chunk);
    if path.is_file() {
        return Ok(ChunkTemplate::load(path)?);
    }
    let Some(dir) = &config.chunk_dir else {
        return Err(CommandError::UnknownChunk(chunk.to_owned()));
    };
    let library = ChunkLibrary::load_dir(dir)?;
    library.get(chunk).cloned().ok_or_else(|| CommandError::UnknownChunk(chunk.to_owned()))
}

/// Stamps a chunk into a zone and renders the result. With `save`, the zone
/// file is rewritten.
///
/// # Errors
///
/// Fails if the zone or chunk cannot be loaded, or the zone cannot be saved.
pub fn stamp(
    zone_path: &Path,
    chunk: &str,
    x: i32,
    y: i32,
    transform: ChunkTransform,
    save: bool,
    config: WorldConfig,
) -> CommandResult<String> {
    let template = resolve_template(chunk, &config)?;
    let mut active = open(zone_path, config, NullSink, NullSink)?;

    // The zone is loaded, so stamping cannot be refused.
    active.stamp(&template, x, y, transform);
    if save && !active.flush() {
        return Err(CommandError::SaveFailed(zone_path.to_path_buf()));
    }

    let (w, h) = transform.output_size(template.width, template.height);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "stamped {} ({}x{}, {}) at ({}, {}){}",
        template.name,
        w,
        h,
        transform,
        x,
        y,
        if save { ", saved" } else { "" }
    );
    out.push_str(&active.zone().render_ascii());
    Ok(out)
}

/// Exports a rectangle of a zone as a chunk template.
///
/// # Errors
///
/// Fails if the zone cannot be loaded or the template cannot be written.
pub fn export(zone_path: &Path, corners: [i32; 4], out_path: &Path, config: WorldConfig) -> CommandResult<String> {
    let active = open(zone_path, config, NullSink, NullSink)?;
    let [min_x, min_y, max_x, max_y] = corners;
    if !active.export_chunk(min_x, min_y, max_x, max_y, out_path) {
        return Err(CommandError::ExportFailed(out_path.to_path_buf()));
    }
    Ok(format!("exported ({min_x}, {min_y})-({max_x}, {max_y}) to {}\n", out_path.display()))
}

/// Summarizes a zone: palette, registries, skipped lines, and a rendering.
///
/// # Errors
///
/// Fails if the zone cannot be loaded.
pub fn inspect(zone_path: &Path, config: WorldConfig) -> CommandResult<String> {
    let active = open(zone_path, config, RecordingSink::default(), RecordingSink::default())?;
    let zone = active.zone();
    let entities = active.entities();
    let mut out = String::new();

    let _ = writeln!(out, "zone:          {} ({})", zone.name(), zone.filepath());
    let _ = writeln!(out, "size:          {0}x{0}", zone.size());
    match zone.noise_params() {
        Some(p) => {
            let _ = writeln!(
                out,
                "procedural:    octaves {} frequency {} lacunarity {} persistence {} threshold {}",
                p.octaves, p.frequency, p.lacunarity, p.persistence, p.wall_threshold
            );
        }
        None => {
            let _ = writeln!(out, "procedural:    no");
        }
    }

    let _ = writeln!(out, "palette:");
    for (i, t) in zone.cell_types().iter().enumerate() {
        let _ = writeln!(out, "  {i:>2} {:<16} {}", t.id, t.pattern);
    }

    let authored = zone.filled_cells().filter(|(_, _, c)| c.hand_placed).count();
    let _ = writeln!(out, "cells:         {} ({} authored)", active.map().cells.len(), authored);
    let _ = writeln!(out, "destructibles: {}", zone.destructibles().len());
    let _ = writeln!(out, "spawns:        {}", entities.enemies.len());
    let _ = writeln!(out, "portals:       {}", entities.portals.len());
    let _ = writeln!(out, "savepoints:    {}", entities.savepoints.len());

    let skipped = &active.last_load().diagnostics;
    if !skipped.is_empty() {
        let _ = writeln!(out, "skipped lines:");
        for d in skipped {
            let _ = writeln!(out, "  line {}: {}", d.line, d.reason);
        }
    }

    out.push_str(&zone.render_ascii());
    Ok(out)
}
