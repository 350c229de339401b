//! Intact chain geometry
//!
//! Bead and strand layout for the unbroken ornament: two diagonal strands
//! crossing in an X over the heart, a short pendant drop, and the cross
//! anchor the pendant hangs from. Pure geometry in heart-local coordinates
//! (origin at the heart center), consumed by the renderer and by the
//! fracture system's spawn point for the cross.

use glam::Vec2;
use crate::map_range;

/// Bead anchors per strand (inclusive of both ends)
pub const ANCHORS_PER_STRAND: usize = 19;
/// Pendant beads hanging below the crossing point
pub const PENDANT_BEADS: usize = 5;
/// Resting position of the cross pendant
pub const CROSS_ANCHOR: Vec2 = Vec2::new(0.0, 120.0);

pub const BEAD_SIZE_LARGE: f32 = 12.0;
pub const BEAD_SIZE_SMALL: f32 = 7.0;

/// A bead resting on the intact chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeadAnchor {
    pub pos: Vec2,
    pub size: f32,
}

/// Strand polyline endpoint pairs for the chain curves, slightly outside
/// the bead line so the cord reads behind the beads.
pub fn strand_curve(strand: usize) -> (Vec2, Vec2) {
    if strand == 0 {
        (Vec2::new(-130.0, -110.0), Vec2::new(100.0, 80.0))
    } else {
        (Vec2::new(130.0, -110.0), Vec2::new(-100.0, 80.0))
    }
}

/// Bead anchors along one strand of the X. The two middle anchors are
/// pinned to the origin so the strands visually knot at the crossing.
pub fn strand_beads(strand: usize) -> Vec<BeadAnchor> {
    let n = ANCHORS_PER_STRAND - 1;
    (0..=n)
        .map(|i| {
            let t = i as f32 / n as f32;
            let pos = if i == 10 || i == 11 {
                Vec2::ZERO
            } else if strand == 0 {
                Vec2::new(
                    map_range(t, 0.0, 1.0, -120.0, 90.0),
                    map_range(t, 0.0, 1.0, -100.0, 70.0),
                )
            } else {
                Vec2::new(
                    map_range(t, 0.0, 1.0, 120.0, -90.0),
                    map_range(t, 0.0, 1.0, -100.0, 70.0),
                )
            };
            BeadAnchor {
                pos,
                size: if i % 6 == 0 { BEAD_SIZE_LARGE } else { BEAD_SIZE_SMALL },
            }
        })
        .collect()
}

/// The short run of beads from the knot down to the cross.
pub fn pendant_beads() -> Vec<BeadAnchor> {
    (0..PENDANT_BEADS)
        .map(|i| BeadAnchor {
            pos: Vec2::new(0.0, map_range(i as f32, 0.0, PENDANT_BEADS as f32, 20.0, 100.0)),
            size: if i == 0 || i == PENDANT_BEADS - 1 {
                BEAD_SIZE_LARGE
            } else {
                BEAD_SIZE_SMALL
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strand_bead_counts() {
        assert_eq!(strand_beads(0).len(), ANCHORS_PER_STRAND);
        assert_eq!(strand_beads(1).len(), ANCHORS_PER_STRAND);
        assert_eq!(pendant_beads().len(), PENDANT_BEADS);
    }

    #[test]
    fn test_strands_cross_at_origin() {
        for strand in 0..2 {
            let beads = strand_beads(strand);
            assert_eq!(beads[10].pos, Vec2::ZERO);
            assert_eq!(beads[11].pos, Vec2::ZERO);
        }
    }

    #[test]
    fn test_strands_mirror_in_x() {
        let a = strand_beads(0);
        let b = strand_beads(1);
        assert_eq!(a[0].pos.x, -b[0].pos.x);
        assert_eq!(a[0].pos.y, b[0].pos.y);
        let last = ANCHORS_PER_STRAND - 1;
        assert_eq!(a[last].pos.x, -b[last].pos.x);
    }

    #[test]
    fn test_large_bead_cadence() {
        let beads = strand_beads(0);
        for (i, bead) in beads.iter().enumerate() {
            let expected = if i % 6 == 0 { BEAD_SIZE_LARGE } else { BEAD_SIZE_SMALL };
            assert_eq!(bead.size, expected);
        }
        let pendant = pendant_beads();
        assert_eq!(pendant[0].size, BEAD_SIZE_LARGE);
        assert_eq!(pendant[PENDANT_BEADS - 1].size, BEAD_SIZE_LARGE);
        assert_eq!(pendant[2].size, BEAD_SIZE_SMALL);
    }

    #[test]
    fn test_pendant_hangs_above_cross() {
        for bead in pendant_beads() {
            assert_eq!(bead.pos.x, 0.0);
            assert!(bead.pos.y >= 20.0 && bead.pos.y < CROSS_ANCHOR.y);
        }
    }
}
