//! Bounded Voronoi cells by half-plane clipping.
//!
//! Each interior site starts from a large bounding square and is clipped by
//! the bisectors of the other sites in order of increasing distance. Clipping
//! stops once the next site is farther than twice the cell's radius, since
//! its bisector can no longer cut the cell. Sites on the convex hull of the
//! input have unbounded cells and are skipped.

use tracing::debug;

use crate::cells::Cell;
use crate::point::{Point2, Point3};
use crate::polygon::{clip_half_plane, convex_hull_boundary, dedup_vertices, HalfPlane};

/// Bounding square half-size, as a multiple of the input extent.
const BOUNDS_FACTOR: f64 = 1e4;

/// Relative tolerance for merging near-duplicate vertices.
const VERTEX_MERGE_EPS: f64 = 1e-9;

/// Why a site produced no cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFailure {
    /// The site lies on the convex hull, so its cell is unbounded.
    Unbounded,
    /// Another site coincides with this one.
    Duplicate,
    /// Fewer than three distinct vertices survived clipping.
    Degenerate,
}

/// Incremental builder for a single site's cell.
struct CellBuilder {
    site: Point2,
    vertices: Vec<Point2>,
}

impl CellBuilder {
    fn new(site: Point2, half_size: f64) -> Self {
        let h = half_size;
        let vertices = vec![
            site + Point2::new(-h, -h),
            site + Point2::new(h, -h),
            site + Point2::new(h, h),
            site + Point2::new(-h, h),
        ];
        Self { site, vertices }
    }

    fn clip(&mut self, neighbor: Point2) {
        let plane = HalfPlane::bisector(self.site, neighbor);
        self.vertices = clip_half_plane(&self.vertices, &plane);
    }

    fn radius(&self) -> f64 {
        self.vertices
            .iter()
            .map(|v| v.distance(self.site))
            .fold(0.0, f64::max)
    }

    /// No site at `neighbor_distance` or farther can cut the cell.
    fn can_terminate(&self, neighbor_distance: f64) -> bool {
        self.vertices.len() >= 3 && neighbor_distance > 2.0 * self.radius()
    }

    fn finish(mut self, merge_eps: f64) -> Result<Vec<Point2>, CellFailure> {
        dedup_vertices(&mut self.vertices, merge_eps);
        if self.vertices.len() < 3 {
            return Err(CellFailure::Degenerate);
        }
        Ok(self.vertices)
    }
}

/// Builds the cell of `sites[index]`.
fn build_cell(
    sites: &[Point2],
    index: usize,
    half_size: f64,
    merge_eps: f64,
) -> Result<Vec<Point2>, CellFailure> {
    let site = sites[index];
    let mut others: Vec<(f64, usize)> = sites
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != index)
        .map(|(i, &p)| (p.distance(site), i))
        .collect();
    others.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    if others.first().is_some_and(|&(d, _)| d <= merge_eps) {
        return Err(CellFailure::Duplicate);
    }

    let mut builder = CellBuilder::new(site, half_size);
    for &(distance, i) in &others {
        if builder.can_terminate(distance) {
            break;
        }
        builder.clip(sites[i]);
    }
    builder.finish(merge_eps)
}

/// Computes the bounded Voronoi cells of `lattice`.
///
/// Cells are returned in site order, with vertices counter-clockwise (+y up)
/// carrying the site's z. Sites with unbounded cells are discarded.
pub fn build_cells(lattice: &[Point3]) -> Vec<Cell> {
    let sites: Vec<Point2> = lattice.iter().map(|p| p.xy()).collect();
    let boundary = convex_hull_boundary(&sites);

    let extent = sites
        .iter()
        .map(|p| p.x.abs().max(p.y.abs()))
        .fold(1.0, f64::max);
    let half_size = extent * BOUNDS_FACTOR;
    let merge_eps = extent * VERTEX_MERGE_EPS;

    let mut cells = Vec::new();
    let mut skipped = 0usize;
    for (index, site) in lattice.iter().enumerate() {
        let result = if boundary[index] {
            Err(CellFailure::Unbounded)
        } else {
            build_cell(&sites, index, half_size, merge_eps)
        };
        match result {
            Ok(vertices) => {
                let polygon = vertices.into_iter().map(|v| v.with_z(site.z)).collect();
                cells.push(Cell::new(*site, polygon));
            }
            Err(CellFailure::Unbounded) => skipped += 1,
            Err(failure) => {
                debug!(index, ?failure, "site produced no cell");
                skipped += 1;
            }
        }
    }
    debug!(sites = lattice.len(), cells = cells.len(), skipped, "built voronoi cells");
    cells
}
