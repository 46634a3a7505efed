//! Segment and polygon predicates backing sub-tile collision shapes.
//!
//! All predicates are total: degenerate input yields a defined `false` rather
//! than an error. Cross products whose magnitude falls below
//! [`COLLINEAR_EPSILON`] are treated as collinear to absorb float noise from
//! transformed sprite outlines.

use glam::Vec2;

/// Cross-product magnitude below which three points count as collinear.
pub const COLLINEAR_EPSILON: f32 = 0.001;

/// Minimum sine of the angle a probe ray keeps from edges and vertices.
const RAY_CLEARANCE: f32 = 1.0e-3;

/// Candidate probe directions, tried in order. None are axis-aligned except
/// the first, so tile outlines built from horizontal and vertical edges are
/// always probed at an angle.
const RAY_DIRECTIONS: [(f32, f32); 6] = [
    (1.0, 0.0),
    (0.957_826_3, 0.287_347_9),
    (0.8, -0.6),
    (-0.447_213_6, 0.894_427_2),
    (-0.970_142_5, -0.242_535_6),
    (0.316_227_8, -0.948_683_3),
];

/// Turn direction of an ordered point triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// The points lie on one line, within [`COLLINEAR_EPSILON`].
    Collinear,
    /// The triple turns clockwise.
    Clockwise,
    /// The triple turns counter-clockwise.
    CounterClockwise,
}

/// Classifies the turn made by travelling `p -> q -> r`.
#[must_use]
pub fn orientation(p: Vec2, q: Vec2, r: Vec2) -> Orientation {
    let value = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);

    if value.abs() < COLLINEAR_EPSILON {
        Orientation::Collinear
    } else if value > 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// Reports whether `q` lies within the bounding box spanned by `p` and `r`.
///
/// Only meaningful once the three points are known to be collinear.
#[must_use]
pub fn on_segment(p: Vec2, q: Vec2, r: Vec2) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// Reports whether segment `p1 q1` touches or crosses segment `p2 q2`.
#[must_use]
pub fn segments_intersect(p1: Vec2, q1: Vec2, p2: Vec2, q2: Vec2) -> bool {
    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == Orientation::Collinear && on_segment(p1, p2, q1))
        || (o2 == Orientation::Collinear && on_segment(p1, q2, q1))
        || (o3 == Orientation::Collinear && on_segment(p2, p1, q2))
        || (o4 == Orientation::Collinear && on_segment(p2, q1, q2))
}

/// Reports whether `point` lies inside or on the boundary of `polygon`.
///
/// The polygon is implicitly closed. Fewer than three vertices never contain
/// anything. The test casts a ray from `point` past the polygon's extent and
/// counts edge crossings; a point collinear with a crossed edge is decided by
/// whether it lies on that edge.
#[must_use]
pub fn point_in_polygon(polygon: &[Vec2], point: Vec2) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let reach = polygon
        .iter()
        .map(|vertex| vertex.distance(point))
        .fold(0.0_f32, f32::max);
    let far = point + ray_direction(polygon, point) * (reach * 2.0 + 1.0);

    let mut crossings = 0_usize;
    for (index, &start) in polygon.iter().enumerate() {
        let end = polygon[(index + 1) % polygon.len()];
        if !segments_intersect(start, end, point, far) {
            continue;
        }

        if orientation(start, point, end) == Orientation::Collinear {
            return on_segment(start, point, end);
        }
        crossings += 1;
    }

    crossings % 2 == 1
}

/// Picks a probe direction that neither runs along an edge nor grazes a vertex.
fn ray_direction(polygon: &[Vec2], point: Vec2) -> Vec2 {
    let candidates = RAY_DIRECTIONS.map(|(x, y)| Vec2::new(x, y));

    candidates
        .iter()
        .copied()
        .find(|direction| ray_is_clear(polygon, point, *direction))
        .unwrap_or(candidates[0])
}

fn ray_is_clear(polygon: &[Vec2], point: Vec2, direction: Vec2) -> bool {
    let parallel_to_edge = polygon.iter().enumerate().any(|(index, &start)| {
        let end = polygon[(index + 1) % polygon.len()];
        let edge = (end - start).normalize_or_zero();
        edge != Vec2::ZERO && direction.perp_dot(edge).abs() < RAY_CLEARANCE
    });
    if parallel_to_edge {
        return false;
    }

    !polygon.iter().any(|&vertex| {
        let to_vertex = vertex - point;
        let Some(unit) = to_vertex.try_normalize() else {
            return false;
        };
        unit.dot(direction) > 0.0 && direction.perp_dot(unit).abs() < RAY_CLEARANCE
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ]
    }

    #[test]
    fn orientation_distinguishes_turns() {
        let p = Vec2::new(0.0, 0.0);
        let q = Vec2::new(4.0, 4.0);

        assert_eq!(orientation(p, q, Vec2::new(8.0, 0.0)), Orientation::Clockwise);
        assert_eq!(orientation(p, q, Vec2::new(0.0, 8.0)), Orientation::CounterClockwise);
        assert_eq!(orientation(p, q, Vec2::new(8.0, 8.0)), Orientation::Collinear);
    }

    #[test]
    fn orientation_absorbs_float_noise() {
        let p = Vec2::new(0.0, 0.0);
        let q = Vec2::new(1.0, 0.0);
        assert_eq!(orientation(p, q, Vec2::new(2.0, 0.0004)), Orientation::Collinear);
    }

    #[test]
    fn on_segment_checks_bounding_box() {
        let p = Vec2::new(0.0, 0.0);
        let r = Vec2::new(4.0, 2.0);

        assert!(on_segment(p, Vec2::new(2.0, 1.0), r));
        assert!(on_segment(p, r, r));
        assert!(!on_segment(p, Vec2::new(5.0, 2.5), r));
    }

    #[test]
    fn crossing_diagonals_intersect() {
        assert!(segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0),
        ));
    }

    #[test]
    fn disjoint_collinear_segments_do_not_intersect() {
        assert!(!segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(3.0, 0.0),
        ));
    }

    #[test]
    fn overlapping_collinear_segments_intersect() {
        assert!(segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(3.0, 0.0),
        ));
    }

    #[test]
    fn touching_endpoint_counts_as_intersection() {
        assert!(segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(4.0, 0.0),
        ));
    }

    #[test]
    fn point_in_square() {
        let polygon = square();

        assert!(point_in_polygon(&polygon, Vec2::new(5.0, 5.0)));
        assert!(!point_in_polygon(&polygon, Vec2::new(15.0, 5.0)));
        assert!(point_in_polygon(&polygon, Vec2::new(10.0, 5.0)));
        assert!(point_in_polygon(&polygon, Vec2::new(0.0, 0.0)));
        assert!(!point_in_polygon(&polygon, Vec2::new(-0.5, 5.0)));
    }

    #[test]
    fn point_level_with_a_vertex_is_classified_correctly() {
        let diamond = [
            Vec2::new(0.0, -5.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(0.0, 5.0),
            Vec2::new(-5.0, 0.0),
        ];

        assert!(point_in_polygon(&diamond, Vec2::new(0.0, 0.0)));
        assert!(point_in_polygon(&diamond, Vec2::new(-4.0, 0.0)));
        assert!(!point_in_polygon(&diamond, Vec2::new(-6.0, 0.0)));
        assert!(!point_in_polygon(&diamond, Vec2::new(4.0, 4.0)));
    }

    #[test]
    fn concave_polygon_notch_is_outside() {
        let notched = [
            Vec2::new(0.0, 0.0),
            Vec2::new(6.0, 0.0),
            Vec2::new(6.0, 6.0),
            Vec2::new(3.0, 2.0),
            Vec2::new(0.0, 6.0),
        ];

        assert!(point_in_polygon(&notched, Vec2::new(1.0, 1.0)));
        assert!(point_in_polygon(&notched, Vec2::new(5.0, 4.0)));
        assert!(!point_in_polygon(&notched, Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn far_coordinates_do_not_break_the_probe() {
        let offset = Vec2::new(5_000.0, -3_000.0);
        let polygon: Vec<Vec2> = square().into_iter().map(|v| v + offset).collect();

        assert!(point_in_polygon(&polygon, Vec2::new(5.0, 5.0) + offset));
        assert!(!point_in_polygon(&polygon, Vec2::new(15.0, 5.0) + offset));
    }

    #[test]
    fn degenerate_polygons_contain_nothing() {
        assert!(!point_in_polygon(&[], Vec2::ZERO));
        assert!(!point_in_polygon(&[Vec2::ZERO, Vec2::ONE], Vec2::new(0.5, 0.5)));
    }
}
