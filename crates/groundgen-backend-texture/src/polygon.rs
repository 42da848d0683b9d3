//! Planar polygon helpers shared by the Voronoi builder and the offset engine.
//!
//! Orientation is expressed in +y-up terms: a counter-clockwise loop has
//! positive signed area.

use crate::point::Point2;

/// Tolerance for point classification against a half-plane.
pub const EPS_CLIP: f64 = 1e-9;

/// A closed half-plane `{ p : (p - origin) . normal <= 0 }`.
#[derive(Debug, Clone, Copy)]
pub struct HalfPlane {
    pub origin: Point2,
    pub normal: Point2,
}

impl HalfPlane {
    /// The half-plane of points at least as close to `site` as to `other`.
    pub fn bisector(site: Point2, other: Point2) -> Self {
        Self {
            origin: (site + other) * 0.5,
            normal: other - site,
        }
    }

    /// Positive outside, negative inside.
    #[inline]
    pub fn signed_distance(&self, point: Point2) -> f64 {
        (point - self.origin).dot(self.normal)
    }
}

/// Shoelace signed area of an open or closed loop.
pub fn signed_area(points: &[Point2]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        twice += a.cross(b);
    }
    twice * 0.5
}

/// Clips a convex loop by a half-plane (Sutherland-Hodgman).
///
/// Returns an empty vector if nothing remains inside.
pub fn clip_half_plane(points: &[Point2], plane: &HalfPlane) -> Vec<Point2> {
    let n = points.len();
    if n == 0 {
        return Vec::new();
    }
    let scale = plane.normal.length().max(f64::MIN_POSITIVE);
    let dist: Vec<f64> = points
        .iter()
        .map(|&p| plane.signed_distance(p) / scale)
        .collect();
    if dist.iter().all(|&d| d <= EPS_CLIP) {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(n + 1);
    for i in 0..n {
        let j = (i + 1) % n;
        let (a, b) = (points[i], points[j]);
        let (da, db) = (dist[i], dist[j]);
        let a_inside = da <= EPS_CLIP;
        let b_inside = db <= EPS_CLIP;
        if a_inside {
            out.push(a);
        }
        if a_inside != b_inside {
            let t = da / (da - db);
            out.push(a + (b - a) * t);
        }
    }
    out
}

/// Removes consecutive (and wrap-around) vertices closer than `eps`.
pub fn dedup_vertices(points: &mut Vec<Point2>, eps: f64) {
    points.dedup_by(|b, a| a.distance(*b) <= eps);
    while points.len() > 1 {
        let (first, last) = (points[0], points[points.len() - 1]);
        if first.distance(last) <= eps {
            points.pop();
        } else {
            break;
        }
    }
}

/// Whether a counter-clockwise loop is convex (collinear vertices allowed).
pub fn is_convex_ccw(points: &[Point2]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let extent = points
        .iter()
        .map(|p| p.x.abs().max(p.y.abs()))
        .fold(1.0, f64::max);
    let tolerance = EPS_CLIP * extent * extent;
    (0..n).all(|i| {
        let a = points[i];
        let b = points[(i + 1) % n];
        let c = points[(i + 2) % n];
        (b - a).cross(c - b) >= -tolerance
    })
}

/// Marks the points lying on the boundary of the convex hull: hull
/// vertices and points collinear with a hull edge.
pub fn convex_hull_boundary(points: &[Point2]) -> Vec<bool> {
    let n = points.len();
    let mut on_boundary = vec![false; n];
    if n < 3 {
        on_boundary.iter_mut().for_each(|b| *b = true);
        return on_boundary;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        points[a]
            .x
            .total_cmp(&points[b].x)
            .then(points[a].y.total_cmp(&points[b].y))
    });

    // Andrew's monotone chain, dropping collinear points.
    let mut hull: Vec<usize> = Vec::with_capacity(2 * n);
    half_hull(points, order.iter().copied(), &mut hull);
    half_hull(points, order.iter().rev().copied(), &mut hull);

    let extent = points
        .iter()
        .map(|p| p.x.abs().max(p.y.abs()))
        .fold(1.0, f64::max);
    let tolerance = EPS_CLIP * extent;
    for (k, &a_idx) in hull.iter().enumerate() {
        let b_idx = hull[(k + 1) % hull.len()];
        let (a, b) = (points[a_idx], points[b_idx]);
        let edge = b - a;
        let len = edge.length();
        on_boundary[a_idx] = true;
        if len <= 0.0 {
            continue;
        }
        for (i, &p) in points.iter().enumerate() {
            if on_boundary[i] {
                continue;
            }
            let along = (p - a).dot(edge) / len;
            let off = edge.cross(p - a) / len;
            if off.abs() <= tolerance && along >= -tolerance && along <= len + tolerance {
                on_boundary[i] = true;
            }
        }
    }
    on_boundary
}

fn half_hull(points: &[Point2], indices: impl Iterator<Item = usize>, hull: &mut Vec<usize>) {
    let start = hull.len();
    for i in indices {
        while hull.len() >= start + 2 {
            let a = points[hull[hull.len() - 2]];
            let b = points[hull[hull.len() - 1]];
            if (b - a).cross(points[i] - a) <= 0.0 {
                hull.pop();
            } else {
                break;
            }
        }
        hull.push(i);
    }
    hull.pop();
}

/// Intersection of the lines `p1 + t*d1` and `p2 + s*d2`, if not parallel.
pub fn line_intersection(p1: Point2, d1: Point2, p2: Point2, d2: Point2) -> Option<Point2> {
    let denom = d1.cross(d2);
    if denom.abs() < 1e-12 {
        return None;
    }
    let t = (p2 - p1).cross(d2) / denom;
    Some(p1 + d1 * t)
}
