//! # TESSERA Procedural Math
//!
//! Deterministic building blocks for zone generation.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same zone
//! 2. **Pure**: No I/O, no shared state, no allocation in sampling
//! 3. **Reproducible**: Output is bit-exact across runs and platforms
//!
//! ## Core Components
//!
//! - `Xoshiro128`: 32-bit PRNG with a serializable four-word state
//! - `simplex2d` / `fbm`: gradient noise and its fractal summation
//! - `derive_zone_seed`: per-zone seed from a master seed and zone id
//!
//! ## Example
//!
//! ```rust
//! use tessera_procedural::{derive_zone_seed, fbm, Xoshiro128};
//!
//! let seed = derive_zone_seed(42, "zones/caverns.zone");
//! let mut rng = Xoshiro128::seed(seed);
//! let roll = rng.range(1, 6);
//! assert!((1..=6).contains(&roll));
//!
//! let v = fbm(10.0, 20.0, 4, 0.08, 2.0, 0.5, seed);
//! assert!((-1.0..=1.0).contains(&v));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod noise;
pub mod rng;
pub mod seed;

pub use noise::{fbm, simplex2d, Fbm};
pub use rng::Xoshiro128;
pub use seed::{derive_zone_seed, hash_zone_id};
