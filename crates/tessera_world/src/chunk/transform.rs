//! # Chunk Transforms
//!
//! The 8 symmetries of a square, applied to prefab coordinates.
//!
//! Each transform is tabulated as data: an optional mirror applied first,
//! then a number of clockwise quarter turns. One function maps coordinates
//! for both domains:
//!
//! - **Cell domain** ([`transform_point`]): area elements in
//!   `[0, w-1] x [0, h-1]`; reflections use `w-1-x` / `h-1-y`
//! - **Corner domain** ([`transform_spawn`]): lattice points in
//!   `[0, w] x [0, h]`; reflections use `w-x` / `h-y`
//!
//! Spawns, portals and savepoints sit on cell corners, so they must go
//! through the corner domain.

use std::fmt;
use std::str::FromStr;

/// Axis a mirror reflects across.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mirror {
    /// Flip left/right.
    Horizontal,
    /// Flip top/bottom.
    Vertical,
}

/// One of the 8 dihedral symmetries of a square.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChunkTransform {
    /// No change.
    #[default]
    Identity,
    /// Quarter turn clockwise.
    Rot90,
    /// Half turn.
    Rot180,
    /// Three quarter turns clockwise.
    Rot270,
    /// Left/right flip.
    MirrorH,
    /// Top/bottom flip.
    MirrorV,
    /// Left/right flip, then a quarter turn.
    MirrorHRot90,
    /// Top/bottom flip, then a quarter turn.
    MirrorVRot90,
}

impl ChunkTransform {
    /// Every transform.
    pub const ALL: [Self; 8] = [
        Self::Identity,
        Self::Rot90,
        Self::Rot180,
        Self::Rot270,
        Self::MirrorH,
        Self::MirrorV,
        Self::MirrorHRot90,
        Self::MirrorVRot90,
    ];

    /// Mirror applied first, then clockwise quarter turns.
    const fn parts(self) -> (Option<Mirror>, u8) {
        match self {
            Self::Identity => (None, 0),
            Self::Rot90 => (None, 1),
            Self::Rot180 => (None, 2),
            Self::Rot270 => (None, 3),
            Self::MirrorH => (Some(Mirror::Horizontal), 0),
            Self::MirrorV => (Some(Mirror::Vertical), 0),
            Self::MirrorHRot90 => (Some(Mirror::Horizontal), 1),
            Self::MirrorVRot90 => (Some(Mirror::Vertical), 1),
        }
    }

    /// The transform that undoes this one.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Rot90 => Self::Rot270,
            Self::Rot270 => Self::Rot90,
            other => other,
        }
    }

    /// True when width and height trade places.
    #[inline]
    #[must_use]
    pub const fn swaps_axes(self) -> bool {
        self.parts().1 % 2 == 1
    }

    /// Footprint `(width, height)` after transforming a `width x height` prefab.
    #[inline]
    #[must_use]
    pub const fn output_size(self, width: i32, height: i32) -> (i32, i32) {
        if self.swaps_axes() { (height, width) } else { (width, height) }
    }

    /// Canonical name used by tools and config.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Rot90 => "rot90",
            Self::Rot180 => "rot180",
            Self::Rot270 => "rot270",
            Self::MirrorH => "mirror_h",
            Self::MirrorV => "mirror_v",
            Self::MirrorHRot90 => "mirror_h_rot90",
            Self::MirrorVRot90 => "mirror_v_rot90",
        }
    }

    /// Maps `(x, y)` with the given reflective extents.
    fn map(self, x: i32, y: i32, mut max_x: i32, mut max_y: i32) -> (i32, i32) {
        let (mirror, turns) = self.parts();
        let (mut x, mut y) = match mirror {
            Some(Mirror::Horizontal) => (max_x - x, y),
            Some(Mirror::Vertical) => (x, max_y - y),
            None => (x, y),
        };
        for _ in 0..turns {
            (x, y) = (max_y - y, x);
            std::mem::swap(&mut max_x, &mut max_y);
        }
        (x, y)
    }
}

impl fmt::Display for ChunkTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognized transform name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown transform `{0}`")]
pub struct UnknownTransform(pub String);

impl FromStr for ChunkTransform {
    type Err = UnknownTransform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownTransform(s.to_owned()))
    }
}

/// Maps a cell index of a `width x height` prefab (cell domain).
#[inline]
#[must_use]
pub fn transform_point(x: i32, y: i32, width: i32, height: i32, transform: ChunkTransform) -> (i32, i32) {
    transform.map(x, y, width - 1, height - 1)
}

/// Maps a lattice corner of a `width x height` prefab (corner domain).
#[inline]
#[must_use]
pub fn transform_spawn(x: i32, y: i32, width: i32, height: i32, transform: ChunkTransform) -> (i32, i32) {
    transform.map(x, y, width, height)
}
