use glam::Vec2;

use crate::api::NarrowphaseApi;
use crate::types::*;

/// Convex polygon in local coordinates, wound clockwise on a y-down screen.
///
/// Edges and normals are derived once at construction. Each vertex carries an
/// `internal` flag marking that the edge starting at it is shared exactly with
/// a neighbouring tile's polygon.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvexPolygon {
    points: Vec<Vec2>,
    edges: Vec<Vec2>,
    normals: Vec<Vec2>,
    internal: Vec<bool>,
}

impl ConvexPolygon {
    pub fn new(points: Vec<Vec2>) -> Self {
        let n = points.len();
        let mut edges = Vec::with_capacity(n);
        let mut normals = Vec::with_capacity(n);
        for i in 0..n {
            let p1 = points[i];
            let p2 = points[(i + 1) % n];
            let e = p2 - p1;
            edges.push(e);
            // perp of (x, y) is (y, -x); outward for clockwise winding
            normals.push(Vec2::new(e.y, -e.x).normalize_or_zero());
        }
        Self { points, edges, normals, internal: vec![false; n] }
    }

    /// Axis-aligned box with its top-left corner at the local origin.
    pub fn from_box(width: f32, height: f32) -> Self {
        Self::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(width, 0.0),
            Vec2::new(width, height),
            Vec2::new(0.0, height),
        ])
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn edges(&self) -> &[Vec2] {
        &self.edges
    }

    pub fn normals(&self) -> &[Vec2] {
        &self.normals
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_internal(&self, vertex: usize) -> bool {
        self.internal.get(vertex).copied().unwrap_or(false)
    }

    pub fn set_internal(&mut self, vertex: usize) {
        if let Some(flag) = self.internal.get_mut(vertex) {
            *flag = true;
        }
    }

    /// World-space edge `i` as (start, end) when the polygon sits at `pos`.
    pub fn world_edge(&self, pos: Vec2, i: usize) -> (Vec2, Vec2) {
        let n = self.points.len();
        (pos + self.points[i], pos + self.points[(i + 1) % n])
    }

    /// True when every turn has the same sign (collinear runs allowed).
    pub fn is_convex(&self) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let mut sign = 0.0f32;
        for i in 0..n {
            let cross = self.edges[i].perp_dot(self.edges[(i + 1) % n]);
            if cross == 0.0 {
                continue;
            }
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
        sign != 0.0
    }
}

/// SAT primitives matching the conventions of the classic SAT.js library.
pub struct Narrowphase;

impl Narrowphase {
    fn voronoi_region(line: Vec2, point: Vec2) -> i8 {
        let len2 = line.length_squared();
        let dp = point.dot(line);
        if dp < 0.0 {
            -1
        } else if dp > len2 {
            1
        } else {
            0
        }
    }
}

impl NarrowphaseApi for Narrowphase {
    fn flatten_points(points: &[Vec2], axis: Vec2) -> (f32, f32) {
        let mut min = f32::MAX;
        let mut max = -f32::MAX;
        for p in points {
            let d = p.dot(axis);
            if d < min { min = d; }
            if d > max { max = d; }
        }
        (min, max)
    }

    fn is_separating_axis(
        a_pos: Vec2,
        a_points: &[Vec2],
        b_pos: Vec2,
        b_points: &[Vec2],
        axis: Vec2,
        response: Option<&mut Response>,
    ) -> bool {
        let projected_offset = (b_pos - a_pos).dot(axis);
        let (a_min, a_max) = Self::flatten_points(a_points, axis);
        let (b_min, b_max) = Self::flatten_points(b_points, axis);
        Self::is_separating_range((a_min, a_max), (b_min + projected_offset, b_max + projected_offset), axis, response)
    }

    fn is_separating_range(
        range_a: (f32, f32),
        range_b: (f32, f32),
        axis: Vec2,
        response: Option<&mut Response>,
    ) -> bool {
        let (a_min, a_max) = range_a;
        let (b_min, b_max) = range_b;
        if a_min > b_max || b_min > a_max {
            return true;
        }
        if let Some(response) = response {
            let overlap;
            if a_min < b_min {
                response.a_in_b = false;
                if a_max < b_max {
                    overlap = a_max - b_min;
                    response.b_in_a = false;
                } else {
                    let option1 = a_max - b_min;
                    let option2 = b_max - a_min;
                    overlap = if option1 < option2 { option1 } else { -option2 };
                }
            } else {
                response.b_in_a = false;
                if a_max > b_max {
                    overlap = a_min - b_max;
                    response.a_in_b = false;
                } else {
                    let option1 = a_max - b_min;
                    let option2 = b_max - a_min;
                    overlap = if option1 < option2 { option1 } else { -option2 };
                }
            }
            let abs_overlap = overlap.abs();
            if abs_overlap < response.overlap {
                response.overlap = abs_overlap;
                response.overlap_n = if overlap < 0.0 { -axis } else { axis };
            }
        }
        false
    }

    fn test_polygon_polygon(
        a_pos: Vec2,
        a: &ConvexPolygon,
        b_pos: Vec2,
        b: &ConvexPolygon,
    ) -> Option<Response> {
        let mut response = Response::default();
        for &normal in a.normals() {
            if Self::is_separating_axis(a_pos, a.points(), b_pos, b.points(), normal, Some(&mut response)) {
                return None;
            }
        }
        for &normal in b.normals() {
            if Self::is_separating_axis(a_pos, a.points(), b_pos, b.points(), normal, Some(&mut response)) {
                return None;
            }
        }
        response.overlap_v = response.overlap_n * response.overlap;
        Some(response)
    }

    fn test_polygon_circle(
        poly_pos: Vec2,
        polygon: &ConvexPolygon,
        center: Vec2,
        radius: f32,
    ) -> Option<Response> {
        let mut response = Response::default();
        let circle_pos = center - poly_pos;
        let radius2 = radius * radius;
        let points = polygon.points();
        let edges = polygon.edges();
        let len = points.len();

        for i in 0..len {
            let next = if i == len - 1 { 0 } else { i + 1 };
            let prev = if i == 0 { len - 1 } else { i - 1 };
            let mut overlap = 0.0;
            let mut overlap_n: Option<Vec2> = None;

            let edge = edges[i];
            let point = circle_pos - points[i];
            if point.length_squared() > radius2 {
                response.a_in_b = false;
            }

            match Self::voronoi_region(edge, point) {
                -1 => {
                    let point2 = circle_pos - points[prev];
                    if Self::voronoi_region(edges[prev], point2) == 1 {
                        let dist = point.length();
                        if dist > radius {
                            return None;
                        }
                        response.b_in_a = false;
                        overlap_n = Some(point.normalize_or_zero());
                        overlap = radius - dist;
                    }
                }
                1 => {
                    let point = circle_pos - points[next];
                    if Self::voronoi_region(edges[next], point) == -1 {
                        let dist = point.length();
                        if dist > radius {
                            return None;
                        }
                        response.b_in_a = false;
                        overlap_n = Some(point.normalize_or_zero());
                        overlap = radius - dist;
                    }
                }
                _ => {
                    let normal = Vec2::new(edge.y, -edge.x).normalize_or_zero();
                    let dist = point.dot(normal);
                    if dist > 0.0 && dist.abs() > radius {
                        return None;
                    }
                    overlap_n = Some(normal);
                    overlap = radius - dist;
                    if dist >= 0.0 || overlap < 2.0 * radius {
                        response.b_in_a = false;
                    }
                }
            }

            if let Some(n) = overlap_n {
                if overlap.abs() < response.overlap.abs() {
                    response.overlap = overlap;
                    response.overlap_n = n;
                }
            }
        }

        response.overlap_v = response.overlap_n * response.overlap;
        Some(response)
    }

    fn test_circle_polygon(
        center: Vec2,
        radius: f32,
        poly_pos: Vec2,
        polygon: &ConvexPolygon,
    ) -> Option<Response> {
        let r = Self::test_polygon_circle(poly_pos, polygon, center, radius)?;
        Some(Response {
            overlap: r.overlap,
            overlap_n: -r.overlap_n,
            overlap_v: -r.overlap_v,
            a_in_b: r.b_in_a,
            b_in_a: r.a_in_b,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_box_normals_point_outwards() {
        let p = ConvexPolygon::from_box(4.0, 2.0);
        assert_eq!(p.normals()[0], Vec2::new(0.0, -1.0));
        assert_eq!(p.normals()[1], Vec2::new(1.0, 0.0));
        assert_eq!(p.normals()[2], Vec2::new(0.0, 1.0));
        assert_eq!(p.normals()[3], Vec2::new(-1.0, 0.0));
        assert!(p.is_convex());
    }

    #[test]
    fn test_polygon_polygon_vertical_overlap() {
        let body = ConvexPolygon::from_box(16.0, 24.0);
        let tile = ConvexPolygon::from_box(24.0, 24.0);
        let r = Narrowphase::test_polygon_polygon(Vec2::new(0.0, 0.0), &body, Vec2::new(0.0, 19.0), &tile).unwrap();
        assert!((r.overlap - 5.0).abs() < 1e-4);
        assert!(close(r.overlap_n, Vec2::new(0.0, 1.0)));
        assert!(close(r.overlap_v, Vec2::new(0.0, 5.0)));
    }

    #[test]
    fn test_polygon_polygon_separated() {
        let a = ConvexPolygon::from_box(10.0, 10.0);
        let b = ConvexPolygon::from_box(10.0, 10.0);
        assert!(Narrowphase::test_polygon_polygon(Vec2::ZERO, &a, Vec2::new(10.5, 0.0), &b).is_none());
    }

    #[test]
    fn test_polygon_polygon_touching_has_zero_overlap() {
        let a = ConvexPolygon::from_box(10.0, 10.0);
        let b = ConvexPolygon::from_box(10.0, 10.0);
        let r = Narrowphase::test_polygon_polygon(Vec2::ZERO, &a, Vec2::new(0.0, 10.0), &b).unwrap();
        assert_eq!(r.overlap, 0.0);
    }

    #[test]
    fn test_polygon_polygon_against_diagonal() {
        // Triangle with its hypotenuse facing up-right: (0,0) (w,h) (0,h)
        let tri = ConvexPolygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(16.0, 16.0),
            Vec2::new(0.0, 16.0),
        ]);
        let body = ConvexPolygon::from_box(4.0, 4.0);
        // Bottom-left corner of the body sits 1px below the hypotenuse
        let body_pos = Vec2::new(6.0, 3.0);
        let r = Narrowphase::test_polygon_polygon(body_pos, &body, Vec2::ZERO, &tri).unwrap();
        let d = std::f32::consts::FRAC_1_SQRT_2;
        assert!(close(r.overlap_n, Vec2::new(-d, d)));
        assert!((r.overlap - d).abs() < 1e-4);
    }

    #[test]
    fn test_circle_polygon_from_above() {
        let tile = ConvexPolygon::from_box(24.0, 24.0);
        let r = Narrowphase::test_circle_polygon(Vec2::new(12.0, -3.0), 4.0, Vec2::ZERO, &tile).unwrap();
        assert!((r.overlap - 1.0).abs() < 1e-4);
        assert!(close(r.overlap_n, Vec2::new(0.0, 1.0)));
        assert!(close(r.overlap_v, Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn test_circle_polygon_corner_miss() {
        let tile = ConvexPolygon::from_box(10.0, 10.0);
        // Near the top-left corner but outside the radius diagonally
        assert!(Narrowphase::test_circle_polygon(Vec2::new(-3.0, -3.0), 4.0, Vec2::ZERO, &tile).is_none());
    }

    #[test]
    fn test_separating_axis_single() {
        let a = ConvexPolygon::from_box(4.0, 4.0);
        let b = ConvexPolygon::from_box(4.0, 4.0);
        let mut r = Response::default();
        let sep = Narrowphase::is_separating_axis(Vec2::ZERO, a.points(), Vec2::new(3.0, 0.0), b.points(), Vec2::X, Some(&mut r));
        assert!(!sep);
        assert!((r.overlap - 1.0).abs() < 1e-5);
        assert_eq!(r.overlap_n, Vec2::X);
        assert!(Narrowphase::is_separating_axis(Vec2::ZERO, a.points(), Vec2::new(5.0, 0.0), b.points(), Vec2::X, None));
    }
}
