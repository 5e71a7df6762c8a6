//! # Chunk Prefabs
//!
//! Hand-authored templates that can be stamped into a zone under any of the
//! 8 square symmetries, and exported back out of a zone.
//!
//! ## Stamping Rules
//!
//! - Cells map through the cell domain, spawns through the corner domain
//! - The footprint is cleared before walls are written
//! - Hand-placed cells are never written

mod export;
mod library;
mod stamp;
mod template;
mod transform;

pub use export::{export_region, ExportReport};
pub use library::{ChunkLibrary, CHUNK_EXTENSION};
pub use stamp::{stamp, stamp_spawns, SpawnStampReport, StampReport};
pub use template::{
    ChunkTemplate, ObstacleStyle, TemplateSpawn, TemplateWall, MAX_CHUNK_SIZE, MAX_TEMPLATE_EMPTIES,
    MAX_TEMPLATE_SPAWNS, MAX_TEMPLATE_WALLS,
};
pub use transform::{transform_point, transform_spawn, ChunkTransform, UnknownTransform};
