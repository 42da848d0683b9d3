//! Polygon offsetting with square and miter joins.
//!
//! Outward offsets emit one or two points per vertex depending on the join.
//! Inward offsets of convex loops intersect the edge half-planes shifted
//! inwards, which also detects collapse. Results are closed loops
//! (first == last) or empty.

use crate::cells::Cell;
use crate::point::{Point2, Point3};
use crate::polygon::{
    clip_half_plane, dedup_vertices, is_convex_ccw, line_intersection, signed_area, HalfPlane,
};

/// Miter joins farther than this multiple of the offset distance are squared.
pub const MITER_LIMIT: f64 = 2.0;

/// Joins at nearly straight vertices collapse to a single point.
const STRAIGHT_COS: f64 = 0.99;

/// Vertices closer than this are merged before offsetting.
const MERGE_EPS: f64 = 1e-9;

/// Corner treatment of an offset. Round joins are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    /// Convex corners are cut off at the offset distance from the vertex.
    Square,
    /// Convex corners are extended to a point, up to [`MITER_LIMIT`].
    #[default]
    Miter,
}

/// Offsets a closed loop by `distance`: positive grows, negative shrinks.
///
/// Returns an empty vector when the polygon is degenerate or collapses. The
/// output z is the mean z of the input vertices.
pub fn offset_polygon(polygon: &[Point3], distance: f64, join: JoinType) -> Vec<Point3> {
    let mut points: Vec<Point2> = polygon.iter().map(|p| p.xy()).collect();
    let extent = points
        .iter()
        .map(|p| p.x.abs().max(p.y.abs()))
        .fold(1.0, f64::max);
    dedup_vertices(&mut points, MERGE_EPS * extent);
    if points.len() < 3 {
        return Vec::new();
    }

    let area = signed_area(&points);
    if area.abs() <= MERGE_EPS * extent * extent {
        return Vec::new();
    }
    if area < 0.0 {
        points.reverse();
    }

    let z = polygon.iter().map(|p| p.z).sum::<f64>() / polygon.len() as f64;

    let mut result = if distance == 0.0 {
        points
    } else if distance < 0.0 && is_convex_ccw(&points) {
        inset_convex(&points, -distance)
    } else {
        offset_joins(&points, distance, join)
    };

    dedup_vertices(&mut result, MERGE_EPS * extent);
    if result.len() < 3 || signed_area(&result) <= MERGE_EPS * extent * extent {
        return Vec::new();
    }
    let first = result[0];
    result.push(first);
    result.into_iter().map(|p| p.with_z(z)).collect()
}

/// Applies [`offset_polygon`] to every cell in place.
pub fn offset(cells: &mut [Cell], distance: f64, join: JoinType) {
    for cell in cells.iter_mut() {
        cell.polygon = offset_polygon(&cell.polygon, distance, join);
    }
}

/// Outward normal of the edge `a -> b` of a counter-clockwise loop.
fn edge_normal(a: Point2, b: Point2) -> Point2 {
    let d = b - a;
    let len = d.length();
    Point2::new(d.y / len, -d.x / len)
}

/// Direction of the edge whose outward normal is `normal`.
fn edge_direction(normal: Point2) -> Point2 {
    Point2::new(-normal.y, normal.x)
}

fn inset_convex(points: &[Point2], inset: f64) -> Vec<Point2> {
    let n = points.len();
    let mut result = points.to_vec();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let normal = edge_normal(a, b);
        let plane = HalfPlane {
            origin: a - normal * inset,
            normal,
        };
        result = clip_half_plane(&result, &plane);
        if result.is_empty() {
            break;
        }
    }
    result
}

fn offset_joins(points: &[Point2], delta: f64, join: JoinType) -> Vec<Point2> {
    let n = points.len();
    let normals: Vec<Point2> = (0..n)
        .map(|i| edge_normal(points[i], points[(i + 1) % n]))
        .collect();
    let miter_threshold = 2.0 / (MITER_LIMIT * MITER_LIMIT);

    let mut out = Vec::with_capacity(n * 2);
    for j in 0..n {
        let k = (j + n - 1) % n;
        let p = points[j];
        let (nk, nj) = (normals[k], normals[j]);
        let sin_a = nk.cross(nj).clamp(-1.0, 1.0);
        let cos_a = nk.dot(nj);

        if sin_a * delta < 0.0 {
            // Concave corner: the shifted edges meet inside.
            let a = p + nk * delta;
            let b = p + nj * delta;
            match line_intersection(a, edge_direction(nk), b, edge_direction(nj)) {
                Some(q) => out.push(q),
                None => out.push(a),
            }
            continue;
        }
        if cos_a > STRAIGHT_COS {
            out.push(p + nk * delta);
            continue;
        }
        let r = 1.0 + cos_a;
        match join {
            JoinType::Miter if r >= miter_threshold => {
                out.push(p + (nk + nj) * (delta / r));
            }
            _ => {
                let dx = (sin_a.atan2(cos_a) / 4.0).tan();
                out.push(p + Point2::new(nk.x - nk.y * dx, nk.y + nk.x * dx) * delta);
                out.push(p + Point2::new(nj.x + nj.y * dx, nj.y - nj.x * dx) * delta);
            }
        }
    }
    out
}
