//! # Terrain Fill
//!
//! Fills a procedural zone's grid from two noise fields seeded by the zone's
//! derived seed:
//!
//! 1. **Wall field**: `fbm` below the zone's wall threshold places a wall
//! 2. **Subtype field**: an independently offset `fbm` picks between the
//!    circuit and the structural wall type, producing veins of circuitry
//!
//! ## PRNG Stream Invariant
//!
//! Exactly one PRNG draw is consumed per grid coordinate, whether or not the
//! coordinate is hand-placed. Adding or removing hand-placed overrides never
//! shifts the stream seen by any other coordinate.

use tessera_procedural::{derive_zone_seed, Fbm, Xoshiro128};

use crate::zone::{CellTypeIndex, Zone};

/// Seed offset of the subtype field.
const SUBTYPE_SEED_OFFSET: u32 = 0x51ED_270B;
/// Octaves of the subtype field.
const SUBTYPE_OCTAVES: u32 = 2;
/// Base frequency of the subtype field.
const SUBTYPE_FREQUENCY: f64 = 0.12;
/// `|subtype| < VEIN_WIDTH` selects the circuit type.
const VEIN_WIDTH: f64 = 0.18;

/// Noise settings of a procedural zone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseParams {
    /// Octave count of the wall field.
    pub octaves: u32,
    /// Base frequency of the wall field.
    pub frequency: f64,
    /// Frequency multiplier per octave.
    pub lacunarity: f64,
    /// Amplitude multiplier per octave.
    pub persistence: f64,
    /// Cells whose wall-field value falls below this become walls.
    pub wall_threshold: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            octaves: 4,
            frequency: 0.08,
            lacunarity: 2.0,
            persistence: 0.5,
            wall_threshold: -0.15,
        }
    }
}

impl NoiseParams {
    fn wall_field(&self) -> Fbm {
        Fbm {
            octaves: self.octaves,
            frequency: self.frequency,
            lacunarity: self.lacunarity,
            persistence: self.persistence,
        }
    }
}

/// What one generation pass did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Seed the fields were sampled with.
    pub seed: u32,
    /// PRNG draws consumed.
    pub draws: u64,
    /// Walls written.
    pub walls: usize,
    /// Coordinates skipped as hand-placed.
    pub skipped: usize,
}

/// Picks the structural and circuit wall types from the palette.
fn wall_types(zone: &Zone) -> (Option<CellTypeIndex>, Option<CellTypeIndex>) {
    let mut solid = None;
    let mut circuit = None;
    for (i, cell_type) in zone.cell_types().iter().enumerate() {
        let index = CellTypeIndex(i as u16);
        if cell_type.is_circuit() {
            circuit.get_or_insert(index);
        } else {
            solid.get_or_insert(index);
        }
    }
    (solid, circuit)
}

/// Fills every non-hand-placed cell of a procedural zone.
///
/// No-op (empty report) unless the zone carries noise settings. Cells that
/// fail the wall threshold are set empty.
pub fn generate(zone: &mut Zone, master_seed: u32) -> GenerationReport {
    let Some(params) = zone.noise_params().copied() else {
        return GenerationReport::default();
    };

    let seed = derive_zone_seed(master_seed, zone.filepath());
    let mut rng = Xoshiro128::seed(seed);
    let wall_field = params.wall_field();
    let subtype_field = Fbm {
        octaves: SUBTYPE_OCTAVES,
        frequency: SUBTYPE_FREQUENCY,
        lacunarity: 2.0,
        persistence: 0.5,
    };
    let subtype_seed = seed.wrapping_add(SUBTYPE_SEED_OFFSET);
    let (solid, circuit) = wall_types(zone);

    let mut report = GenerationReport { seed, ..GenerationReport::default() };
    let size = zone.size() as i32;

    for y in 0..size {
        for x in 0..size {
            // Reserved draw: keeps the stream independent of hand-placed cells.
            let _ = rng.next();
            report.draws += 1;

            let Some(cell) = zone.cell_mut(x, y) else {
                continue;
            };
            if cell.hand_placed {
                report.skipped += 1;
                continue;
            }

            let (fx, fy) = (f64::from(x), f64::from(y));
            let value = wall_field.sample(fx, fy, seed);
            cell.kind = if value < params.wall_threshold {
                match (solid, circuit) {
                    (Some(solid), Some(circuit)) => {
                        let vein = subtype_field.sample(fx, fy, subtype_seed);
                        Some(if vein.abs() < VEIN_WIDTH { circuit } else { solid })
                    }
                    (Some(only), None) | (None, Some(only)) => Some(only),
                    (None, None) => None,
                }
            } else {
                None
            };

            if cell.kind.is_some() {
                report.walls += 1;
            }
        }
    }

    tracing::debug!(
        "generated zone {} (seed {:#010x}): {} walls, {} hand-placed skipped",
        zone.filepath(),
        seed,
        report.walls,
        report.skipped
    );
    report
}
