//! # TESSERA World Layer
//!
//! The canonical, editable record of a zone's layout.
//!
//! ## Design Principles
//!
//! 1. **Reproducible**: Same master seed and zone path = same terrain
//! 2. **Hand-placed wins**: Generation and stamping never overwrite authored cells
//! 3. **Durable edits**: Every successful edit is on disk before it returns
//! 4. **Lenient input**: Malformed lines are skipped and reported, never fatal
//!
//! ## Core Components
//!
//! - [`Zone`]: Grid, palette and registries, with a text format
//! - [`ActiveZone`]: Loaded zone + collaborators + undo + persistence
//! - [`chunk`]: Prefab templates, transforms, stamping and export
//! - [`procgen`]: Noise-driven terrain fill
//!
//! ## Example
//!
//! ```rust
//! use tessera_world::chunk::{stamp, ChunkTemplate, ChunkTransform, TemplateWall};
//! use tessera_world::zone::{CellType, CellTypeIndex, Rgba};
//! use tessera_world::Zone;
//!
//! let mut zone = Zone::new("demo", "zones/demo.zone", 32);
//! zone.add_cell_type(CellType::new("wall", Rgba::new(60, 60, 70, 255), Rgba::default(), "solid"))
//!     .unwrap();
//!
//! let mut corner = ChunkTemplate::new("corner", 4, 4);
//! corner.walls.push(TemplateWall { x: 0, y: 0, cell_type: CellTypeIndex(0), drop_id: None });
//!
//! stamp(&corner, &mut zone, 10, 10, ChunkTransform::Rot90);
//! assert_eq!(zone.cell(13, 10), Some(CellTypeIndex(0)));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod chunk;
pub mod collab;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod procgen;
pub mod zone;

pub use chunk::{ChunkLibrary, ChunkTemplate, ChunkTransform};
pub use collab::{CellDescriptor, EntitySink, MapSink, NullSink, RecordingSink};
pub use config::{PersistMode, WorldConfig};
pub use diagnostics::{Diagnostic, SkipReason};
pub use error::{WorldError, WorldResult};
pub use procgen::{generate, GenerationReport, NoiseParams};
pub use zone::{ActiveZone, Cell, LoadReport, Zone};
