//! # Terrain Fill Tests
//!
//! Generation must be reproducible from the master seed and zone path, and
//! hand-authored cells must neither be overwritten nor shift the choices
//! made for any other cell.

use tessera_world::zone::{CellType, CellTypeIndex, Rgba};
use tessera_world::{generate, NoiseParams, Zone};

const MASTER: u32 = 0xC0FF_EE00;

fn procedural_zone(path: &str, size: usize) -> Zone {
    let mut zone = Zone::new("caverns", path, size);
    zone.add_cell_type(CellType::new("rock", Rgba::new(50, 50, 60, 255), Rgba::default(), "solid"))
        .unwrap();
    zone.add_cell_type(CellType::new("vein", Rgba::new(0, 200, 120, 255), Rgba::default(), "circuit"))
        .unwrap();
    zone.set_noise_params(Some(NoiseParams { wall_threshold: 0.0, ..NoiseParams::default() }));
    zone
}

/// Test: Same master seed and path produce the same grid.
#[test]
fn test_generation_reproducible() {
    let mut a = procedural_zone("zones/caverns.zone", 48);
    let mut b = procedural_zone("zones/caverns.zone", 48);

    let ra = generate(&mut a, MASTER);
    let rb = generate(&mut b, MASTER);

    assert_eq!(ra, rb);
    assert_eq!(a, b);
}

/// Test: Different zone paths produce different grids.
#[test]
fn test_zone_identity_changes_terrain() {
    let mut a = procedural_zone("zones/caverns.zone", 48);
    let mut b = procedural_zone("zones/grotto.zone", 48);

    generate(&mut a, MASTER);
    generate(&mut b, MASTER);

    assert_ne!(a.render_ascii(), b.render_ascii());
}

/// Test: Exactly S*S draws regardless of the hand-placed mask.
#[test]
fn test_draw_count_independent_of_hand_placed() {
    let size = 40;
    let mut plain = procedural_zone("zones/caverns.zone", size);
    let mut authored = procedural_zone("zones/caverns.zone", size);
    for i in 0..40 {
        authored.set_cell(i, i, Some(CellTypeIndex(0))).unwrap();
        authored.set_hand_placed(i, i, true);
        authored.set_hand_placed(i, 39 - i, true);
    }

    let plain_report = generate(&mut plain, MASTER);
    let authored_report = generate(&mut authored, MASTER);

    assert_eq!(plain_report.draws, (size * size) as u64);
    assert_eq!(authored_report.draws, (size * size) as u64);
    assert_eq!(authored_report.skipped, 80);
}

/// Test: Hand-placed overrides do not perturb any other cell.
#[test]
fn test_hand_placed_cells_do_not_shift_other_cells() {
    let mut plain = procedural_zone("zones/caverns.zone", 32);
    let mut authored = procedural_zone("zones/caverns.zone", 32);
    authored.set_hand_placed(3, 3, true);
    authored.set_cell(20, 7, Some(CellTypeIndex(1))).unwrap();
    authored.set_hand_placed(20, 7, true);

    generate(&mut plain, MASTER);
    generate(&mut authored, MASTER);

    for y in 0..32 {
        for x in 0..32 {
            if (x, y) == (3, 3) || (x, y) == (20, 7) {
                continue;
            }
            assert_eq!(plain.cell(x, y), authored.cell(x, y), "({x}, {y})");
        }
    }
    assert_eq!(authored.cell(3, 3), None);
    assert_eq!(authored.cell(20, 7), Some(CellTypeIndex(1)));
}

/// Test: Both wall types appear when the palette has a circuit type.
#[test]
fn test_subtype_field_mixes_wall_types() {
    let mut zone = procedural_zone("zones/caverns.zone", 96);
    generate(&mut zone, MASTER);

    let kinds: Vec<CellTypeIndex> = zone.filled_cells().filter_map(|(_, _, c)| c.kind).collect();
    assert!(kinds.contains(&CellTypeIndex(0)));
    assert!(kinds.contains(&CellTypeIndex(1)));
}

/// Test: Zones without noise settings are left untouched.
#[test]
fn test_non_procedural_zone_is_noop() {
    let mut zone = procedural_zone("zones/hub.zone", 16);
    zone.set_noise_params(None);
    zone.set_cell(4, 4, Some(CellTypeIndex(0))).unwrap();
    let before = zone.clone();

    let report = generate(&mut zone, MASTER);

    assert_eq!(report.draws, 0);
    assert_eq!(zone, before);
}
