use crate::model::{Geometry, Position};

/// A closed ring has its first position repeated at the end, so a quad ring
/// holds exactly five entries.
const QUAD_RING_LEN: usize = 5;

/// Classifies a geometry as a quad and returns its four corners in ring
/// order, or `None` for anything that is not a single-ring polygon with
/// exactly four corners.
///
/// Corners come back unmodified: no reordering and no convexity or
/// simplicity check, so self-intersecting "bowtie" rings count as quads.
pub fn extract_quad(geometry: &Geometry) -> Option<[Position; 4]> {
    let Geometry::Polygon { coordinates } = geometry else {
        return None;
    };
    if coordinates.len() != 1 {
        return None;
    }
    let ring = &coordinates[0];
    if ring.len() != QUAD_RING_LEN {
        return None;
    }
    Some([ring[0], ring[1], ring[2], ring[3]])
}
