//! # Simplex Noise
//!
//! Single-sample 2D simplex noise and fractal (fBm) summation on top of it.
//!
//! The base field is a pure function of its coordinates: there is no seed
//! inside the permutation table. Callers vary results per seed by sampling a
//! translated region of the field, which is what [`fbm`] does.
//!
//! ## Determinism Guarantee
//!
//! The permutation table is built at compile time from a fixed constant, so
//! every build samples the same field.

/// Fixed constant the permutation table is shuffled from.
const PERMUTATION_SEED: u64 = 0x5EED_7E55_E2A0_0001;

/// Skewing factor for 2D simplex grid: (sqrt(3) - 1) / 2.
const F2: f64 = 0.366_025_403_784_438_6;
/// Unskewing factor for 2D simplex grid: (3 - sqrt(3)) / 6.
const G2: f64 = 0.211_324_865_405_187_1;

/// Normalizes the summed corner contributions to roughly [-1, 1].
const OUTPUT_SCALE: f64 = 70.0;

/// 12 gradient directions for 2D simplex.
const GRADIENTS: [[i8; 2]; 12] = [
    [1, 0], [1, 1], [0, 1], [-1, 1],
    [-1, 0], [-1, -1], [0, -1], [1, -1],
    [1, 0], [0, 1], [-1, 0], [0, -1],
];

/// Doubled permutation table (avoids index wrapping).
static PERM: [u8; 512] = build_permutation(PERMUTATION_SEED);

/// Fisher-Yates shuffle of the identity permutation, driven by xorshift64.
const fn build_permutation(seed: u64) -> [u8; 512] {
    let mut perm = [0u8; 512];

    let mut i = 0;
    while i < 256 {
        perm[i] = i as u8;
        i += 1;
    }

    let mut state = seed;
    let mut i = 255;
    while i > 0 {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;

        let j = (state % (i as u64 + 1)) as usize;
        let tmp = perm[i];
        perm[i] = perm[j];
        perm[j] = tmp;
        i -= 1;
    }

    let mut i = 0;
    while i < 256 {
        perm[256 + i] = perm[i];
        i += 1;
    }

    perm
}

/// Samples 2D simplex noise at the given coordinates.
///
/// # Returns
///
/// A value in the range [-1, 1].
#[must_use]
pub fn simplex2d(x: f64, y: f64) -> f64 {
    // Skew input coordinates to simplex grid
    let skew = (x + y) * F2;
    let i = fast_floor(x + skew);
    let j = fast_floor(y + skew);

    // Unskew to get first corner in simplex
    let unskew = f64::from(i.wrapping_add(j)) * G2;
    let x0 = x - (f64::from(i) - unskew);
    let y0 = y - (f64::from(j) - unskew);

    // Upper or lower triangle
    let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

    let x1 = x0 - f64::from(i1) + G2;
    let y1 = y0 - f64::from(j1) + G2;
    let x2 = x0 - 1.0 + 2.0 * G2;
    let y2 = y0 - 1.0 + 2.0 * G2;

    let ii = (i & 255) as usize;
    let jj = (j & 255) as usize;
    let i1 = i1 as usize;
    let j1 = j1 as usize;

    let gi0 = perm(ii + perm(jj) as usize);
    let gi1 = perm(ii + i1 + perm(jj + j1) as usize);
    let gi2 = perm(ii + 1 + perm(jj + 1) as usize);

    let n0 = contribution(x0, y0, gi0);
    let n1 = contribution(x1, y1, gi1);
    let n2 = contribution(x2, y2, gi2);

    (OUTPUT_SCALE * (n0 + n1 + n2)).clamp(-1.0, 1.0)
}

#[inline]
fn perm(index: usize) -> u8 {
    PERM[index & 511]
}

/// Contribution from one corner of the simplex.
#[inline]
fn contribution(x: f64, y: f64, hash: u8) -> f64 {
    let t = 0.5 - x * x - y * y;
    if t < 0.0 {
        0.0
    } else {
        let grad = GRADIENTS[(hash % 12) as usize];
        let t2 = t * t;
        t2 * t2 * (x * f64::from(grad[0]) + y * f64::from(grad[1]))
    }
}

/// Fast floor to a lattice index.
#[inline]
fn fast_floor(x: f64) -> i32 {
    let xi = x as i32;
    if x < f64::from(xi) { xi - 1 } else { xi }
}

/// Seed-derived translation of the sample domain.
///
/// Two seeds land on unrelated regions of the same field.
#[must_use]
pub fn seed_offset(seed: u32) -> (f64, f64) {
    let hx = avalanche(seed);
    let hy = avalanche(seed ^ 0x68E3_1DA4);
    (
        f64::from(hx >> 8) / 256.0,
        f64::from(hy >> 8) / 256.0,
    )
}

#[inline]
fn avalanche(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x7FEB_352D);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846C_A68B);
    h ^ (h >> 16)
}

/// Octave layout for fractal noise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fbm {
    /// Number of noise layers.
    pub octaves: u32,
    /// Base sampling frequency.
    pub frequency: f64,
    /// Frequency multiplier per octave.
    pub lacunarity: f64,
    /// Amplitude multiplier per octave.
    pub persistence: f64,
}

impl Fbm {
    /// Samples fractal noise at `(x, y)` in the region selected by `seed`.
    ///
    /// The sum is divided by the total layer weight, so the result stays in
    /// [-1, 1] for any octave count. Zero octaves yield `0.0`.
    #[must_use]
    pub fn sample(&self, x: f64, y: f64, seed: u32) -> f64 {
        let (ox, oy) = seed_offset(seed);

        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.frequency;
        let mut weight = 0.0;

        for _ in 0..self.octaves {
            total += simplex2d(x * frequency + ox, y * frequency + oy) * amplitude;
            weight += f64::abs(amplitude);
            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }

        if weight == 0.0 {
            return 0.0;
        }
        (total / weight).clamp(-1.0, 1.0)
    }
}

/// Fractal Brownian motion over [`simplex2d`].
///
/// Layer `i` samples at `frequency * lacunarity^i`, weighted by
/// `persistence^i`, inside the region chosen by `seed`.
#[must_use]
pub fn fbm(
    x: f64,
    y: f64,
    octaves: u32,
    frequency: f64,
    lacunarity: f64,
    persistence: f64,
    seed: u32,
) -> f64 {
    Fbm { octaves, frequency, lacunarity, persistence }.sample(x, y, seed)
}
