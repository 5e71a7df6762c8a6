//! # World Error Types
//!
//! All errors that can occur while loading, editing or persisting a zone.
//!
//! Edit operations on [`crate::ActiveZone`] never surface these to callers;
//! they are logged and folded into a `bool` result. Loaders of standalone
//! resources (chunk templates, configuration) return them directly.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the world layer.
#[derive(Error, Debug)]
pub enum WorldError {
    /// A file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// The file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// The file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A template declared a non-positive or oversized extent.
    #[error("invalid size {width}x{height}")]
    InvalidSize {
        /// Declared width.
        width: i64,
        /// Declared height.
        height: i64,
    },

    /// The operation needs a loaded zone.
    #[error("no zone loaded")]
    NotLoaded,

    /// Coordinates outside the zone grid.
    #[error("coordinates ({x}, {y}) outside zone of size {size}")]
    OutOfBounds {
        /// Requested X.
        x: i32,
        /// Requested Y.
        y: i32,
        /// Zone side length.
        size: usize,
    },

    /// Cell type id not present in the zone palette.
    #[error("unknown cell type: {0}")]
    UnknownCellType(String),

    /// A bounded registry is full.
    #[error("{what} capacity of {capacity} reached")]
    CapacityExceeded {
        /// Which registry.
        what: &'static str,
        /// Its fixed capacity.
        capacity: usize,
    },

    /// Spawn index past the end of the spawn list.
    #[error("spawn index {0} out of range")]
    NoSuchSpawn(usize),

    /// Nothing to change at the requested cell.
    #[error("cell ({x}, {y}) is already empty")]
    AlreadyEmpty {
        /// Requested X.
        x: i32,
        /// Requested Y.
        y: i32,
    },

    /// Export rectangle does not overlap the zone grid.
    #[error("region ({min_x}, {min_y})-({max_x}, {max_y}) lies outside the zone")]
    RegionOutsideZone {
        /// Requested left edge.
        min_x: i32,
        /// Requested top edge.
        min_y: i32,
        /// Requested right edge.
        max_x: i32,
        /// Requested bottom edge.
        max_y: i32,
    },

    /// Configuration file failed to parse.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] toml::de::Error),
}

/// Result type for world operations.
pub type WorldResult<T> = Result<T, WorldError>;
