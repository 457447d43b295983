use geo::{CoordsIter, Polygon};
use nalgebra::Point2;

/// Ray-casting containment test over the exterior ring of `polygon`.
///
/// A horizontal ray is cast from the query point towards +x and edge
/// crossings are counted. The `p1y != p2y` guard keeps horizontal edges out
/// of the parity count. Boundary convention: the edge y-window is half-open
/// (`y > min`, `y <= max`) and hits at `x <= x_intersection` count, so for
/// an axis-aligned rectangle the max-x/max-y sides are inside while the
/// min-x/min-y sides are outside. Rings with fewer than 3 distinct vertices
/// contain nothing.
///
pub fn polygon_contains(x: f64, y: f64, polygon: &Polygon<f64>) -> bool {
    let mut ring = polygon.exterior_coords_iter().collect::<Vec<_>>();
    // drop the closing coordinate geo keeps at the end of the ring
    ring.pop();

    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    for i in 0..n {
        let p1 = ring[i];
        let p2 = ring[(i + 1) % n];
        if y > p1.y.min(p2.y) && y <= p1.y.max(p2.y) && x <= p1.x.max(p2.x) && p1.y != p2.y {
            let x_intersection = (y - p1.y) * (p2.x - p1.x) / (p2.y - p1.y) + p1.x;
            if p1.x == p2.x || x <= x_intersection {
                inside = !inside;
            }
        }
    }
    inside
}

/// Counter-clockwise orientation of the triple (a, b, c).
///
fn ccw(a: &Point2<f32>, b: &Point2<f32>, c: &Point2<f32>) -> bool {
    (c.y - a.y) * (b.x - a.x) > (b.y - a.y) * (c.x - a.x)
}

/// True when the open segments `a-b` and `c-d` properly intersect.
///
/// Orientation-based test: the endpoints of each segment must lie on
/// opposite sides of the other segment. Collinear overlaps and touches at
/// an endpoint do not count, which keeps a trajectory resting exactly on a
/// counting line from firing.
///
pub fn segments_intersect(
    a: &Point2<f32>,
    b: &Point2<f32>,
    c: &Point2<f32>,
    d: &Point2<f32>,
) -> bool {
    ccw(a, c, d) != ccw(b, c, d) && ccw(a, b, c) != ccw(a, b, d)
}
