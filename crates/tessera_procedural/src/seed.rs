//! # Zone Seed Derivation
//!
//! Every zone gets its own generation seed, derived from the world's master
//! seed and the zone's identifier. The derivation is pure: the same pair
//! always yields the same seed, and different zone identifiers diverge.

/// FNV-1a 32-bit offset basis.
const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;

/// FNV-1a 32-bit prime.
const FNV_PRIME: u32 = 0x0100_0193;

/// 2^32 / golden ratio, used by the hash-combine step.
const GOLDEN_RATIO: u32 = 0x9E37_79B9;

/// Order-sensitive byte-wise FNV-1a hash of a zone identifier.
#[must_use]
pub fn hash_zone_id(zone_id: &str) -> u32 {
    zone_id.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Derives the generation seed of one zone.
///
/// `master ^ (hash + GOLDEN_RATIO + (master << 6) + (master >> 2))`
#[must_use]
pub fn derive_zone_seed(master_seed: u32, zone_id: &str) -> u32 {
    let hash = hash_zone_id(zone_id);
    master_seed
        ^ hash
            .wrapping_add(GOLDEN_RATIO)
            .wrapping_add(master_seed << 6)
            .wrapping_add(master_seed >> 2)
}
