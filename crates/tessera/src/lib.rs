//! # TESSERA
//!
//! Zone generation and prefab composition for a tile-based action game.
//!
//! ## Layers
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  tessera (zonetool)                                          │
//! │    generate · stamp · export · inspect                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  tessera_world                                               │
//! │    Zone · ActiveZone · undo · chunk prefabs · procgen        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  tessera_procedural                                          │
//! │    Xoshiro128 · simplex2d · fbm · derive_zone_seed           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `commands`: The `zonetool` subcommands, callable without a shell

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod commands;

pub use tessera_procedural as procedural;
pub use tessera_world as world;

pub use commands::{CommandError, CommandResult};
