//! Voronoi cells and their post-processing: slant, defect removal, and
//! texture assignment.
//!
//! Wrap mirrors of a cell are found by comparing centers: a mirror's center
//! differs from the cell's by exactly the grid extent in x, y, or both.

use std::path::PathBuf;

use tracing::warn;

use crate::point::{ColorRgb, Point2, Point3};
use crate::rng::DeterministicRng;

/// Tolerance when matching wrap-mirror centers.
const MIRROR_EPSILON: f64 = 0.1;

/// Attempts at finding a visible cell before falling back to the middle one.
const MAX_REMOVAL_RETRIES: usize = 1000;

/// Texture image assigned to a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellTexture {
    pub file: PathBuf,
    /// Rotation in degrees, in [0, 360).
    pub rotation: u32,
}

/// A Voronoi cell with its rendering attributes.
///
/// The polygon has at least three distinct vertices, or is empty when the
/// cell vanished during offsetting.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub center: Point3,
    pub polygon: Vec<Point3>,
    pub is_slanted: bool,
    pub texture: Option<CellTexture>,
    pub color: Option<ColorRgb>,
}

impl Cell {
    pub fn new(center: Point3, polygon: Vec<Point3>) -> Self {
        Self {
            center,
            polygon,
            is_slanted: false,
            texture: None,
            color: None,
        }
    }

    /// Whether the cell has nothing left to render.
    pub fn is_empty(&self) -> bool {
        self.polygon.is_empty()
    }

    /// The polygon vertices with the lowest and the highest z.
    pub fn z_bounds(&self) -> Option<(Point3, Point3)> {
        let first = *self.polygon.first()?;
        let bounds = self.polygon[1..]
            .iter()
            .fold((first, first), |(min, max), &p| {
                (
                    if p.z < min.z { p } else { min },
                    if p.z > max.z { p } else { max },
                )
            });
        Some(bounds)
    }

    /// Sets z of the center and of every vertex.
    pub fn flatten_z(&mut self, z: f64) {
        self.center.z = z;
        for p in &mut self.polygon {
            p.z = z;
        }
    }
}

/// Shears a polygon in z around `center` and lifts it by `z_displace`.
///
/// `direction` is an angle in radians, counter-clockwise from +x; vertices
/// along it rise, vertices opposite it sink. If any vertex would end up below
/// zero the whole polygon is raised so the lowest vertex sits at zero.
pub fn slant_polygon(
    polygon: &[Point3],
    center: Point3,
    direction: f64,
    slant: f64,
    z_displace: f64,
) -> Vec<Point3> {
    let slant_dir = Point2::new(direction.cos(), direction.sin()) * slant;
    let slanted: Vec<Point3> = polygon
        .iter()
        .map(|&p| {
            let offset = (p.xy() - center.xy()).dot(slant_dir);
            p.with_z(p.z + offset.round())
        })
        .collect();
    let min_z = slanted.iter().map(|p| p.z).fold(f64::INFINITY, f64::min);
    let compensation = if min_z < 0.0 { -min_z } else { 0.0 };
    let lift = (z_displace + compensation).round();
    slanted.into_iter().map(|p| p.with_z(p.z + lift)).collect()
}

/// Randomly slants and lifts every cell.
///
/// Per cell, draws a direction in [0, 2pi), a slant in [0, `max_slant`), and
/// a lift in [0, `max_z_displace`).
pub fn slant_random(
    cells: &mut [Cell],
    max_slant: f64,
    max_z_displace: f64,
    rng: &mut DeterministicRng,
) {
    for cell in cells.iter_mut() {
        let direction = rng.gen_f64() * std::f64::consts::TAU;
        let amount = rng.gen_f64() * max_slant;
        let z_displace = rng.gen_f64() * max_z_displace;
        cell.polygon = slant_polygon(&cell.polygon, cell.center, direction, amount, z_displace);
        if amount > 0.0 {
            cell.is_slanted = true;
        }
    }
}

/// Whether the cell center lies strictly inside the non-padded region.
pub fn is_visible(cell: &Cell, grid_size: [usize; 2], wrap_amount: usize, scale: f64) -> bool {
    let pad = (wrap_amount / 2) as f64 * scale;
    let inside = |v: f64, size: usize| pad < v && v < (size as f64) * scale + pad;
    inside(cell.center.x, grid_size[0]) && inside(cell.center.y, grid_size[1])
}

/// Indices of the wrap mirrors of `cell` within `cells`.
pub fn wrapped_cells(cells: &[Cell], cell: &Cell, grid_size: [usize; 2], scale: f64) -> Vec<usize> {
    let extent = Point2::new(grid_size[0] as f64, grid_size[1] as f64) * scale;
    let c = cell.center.xy();
    let near = |a: f64, b: f64| (a - b).abs() < MIRROR_EPSILON;
    cells
        .iter()
        .enumerate()
        .filter(|(_, test)| {
            let t = test.center.xy();
            let x_same = near(t.x, c.x);
            let y_same = near(t.y, c.y);
            let x_shift = near(t.x, c.x + extent.x) || near(t.x, c.x - extent.x);
            let y_shift = near(t.y, c.y + extent.y) || near(t.y, c.y - extent.y);
            (x_shift && y_same) || (y_shift && x_same) || (x_shift && y_shift)
        })
        .map(|(i, _)| i)
        .collect()
}

fn pick_visible_cell(
    cells: &[Cell],
    grid_size: [usize; 2],
    wrap_amount: usize,
    scale: f64,
    rng: &mut DeterministicRng,
) -> Option<usize> {
    (0..=MAX_REMOVAL_RETRIES)
        .map(|_| rng.gen_range(0..cells.len()))
        .find(|&i| is_visible(&cells[i], grid_size, wrap_amount, scale))
}

/// Removes `count` random visible cells together with their wrap mirrors.
///
/// Returns copies of the removed cells with every z set to 0. If no visible
/// cell is found after the retry limit, the middle cell is taken.
pub fn remove_random_cells(
    cells: &mut Vec<Cell>,
    count: u32,
    grid_size: [usize; 2],
    wrap_amount: usize,
    scale: f64,
    rng: &mut DeterministicRng,
) -> Vec<Cell> {
    let mut removed = Vec::new();
    for _ in 0..count {
        if cells.is_empty() {
            warn!("no cells left to remove");
            break;
        }
        let index = match pick_visible_cell(cells, grid_size, wrap_amount, scale, rng) {
            Some(index) => index,
            None => {
                warn!(
                    cells = cells.len(),
                    "no visible cell found, removing the middle cell"
                );
                cells.len() / 2
            }
        };

        let mut group = wrapped_cells(cells, &cells[index], grid_size, scale);
        group.push(index);
        group.sort_unstable_by(|a, b| b.cmp(a));
        group.dedup();

        let mut taken: Vec<Cell> = group.into_iter().map(|i| cells.remove(i)).collect();
        taken.reverse();
        for cell in &mut taken {
            cell.flatten_z(0.0);
        }
        removed.extend(taken);
    }
    removed
}

/// Assigns a random texture and rotation to every cell, and the same
/// assignment to its wrap mirrors.
///
/// Returns `None` when `texture_images` is empty; the input cells are left
/// untouched either way.
pub fn apply_random_texture(
    cells: &[Cell],
    texture_images: &[PathBuf],
    grid_size: [usize; 2],
    scale: f64,
    rng: &mut DeterministicRng,
) -> Option<Vec<Cell>> {
    if texture_images.is_empty() {
        return None;
    }
    let mut textured = cells.to_vec();
    for i in 0..textured.len() {
        let file = rng.choose(texture_images)?.clone();
        let rotation = rng.gen_range(0..360u32);
        let texture = CellTexture { file, rotation };
        for j in wrapped_cells(&textured, &textured[i], grid_size, scale) {
            textured[j].texture = Some(texture.clone());
        }
        textured[i].texture = Some(texture);
    }
    Some(textured)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_cell(cx: f64, cy: f64, half: f64, z: f64) -> Cell {
        let polygon = vec![
            Point3::new(cx - half, cy - half, z),
            Point3::new(cx + half, cy - half, z),
            Point3::new(cx + half, cy + half, z),
            Point3::new(cx - half, cy + half, z),
        ];
        Cell::new(Point3::new(cx, cy, z), polygon)
    }

    /// One cell per grid position of a `size x size` grid plus `wrap` mirrored
    /// rows and columns, at scale 1.
    fn wrapped_grid(size: usize, wrap: usize) -> Vec<Cell> {
        let mut cells = Vec::new();
        for x in 0..size + wrap {
            for y in 0..size + wrap {
                cells.push(square_cell(x as f64 + 0.5, y as f64 + 0.5, 0.4, 10.0));
            }
        }
        cells
    }

    #[test]
    fn test_slant_polygon_compensates_negative_z() {
        let cell = square_cell(0.0, 0.0, 1.0, 0.0);
        let slanted = slant_polygon(&cell.polygon, cell.center, 0.0, 2.0, 0.0);
        let zs: Vec<f64> = slanted.iter().map(|p| p.z).collect();
        assert_eq!(zs, vec![0.0, 4.0, 4.0, 0.0]);
    }

    #[test]
    fn test_slant_polygon_lift_only() {
        let cell = square_cell(0.0, 0.0, 1.0, 5.0);
        let lifted = slant_polygon(&cell.polygon, cell.center, 1.0, 0.0, 2.4);
        assert!(lifted.iter().all(|p| p.z == 7.0));
    }

    #[test]
    fn test_slant_random_marks_slanted() {
        let mut cells = vec![square_cell(0.0, 0.0, 1.0, 0.0)];
        slant_random(&mut cells, 3.0, 10.0, &mut DeterministicRng::new(5));
        assert!(cells[0].is_slanted);
        assert!(cells[0].polygon.iter().all(|p| p.z >= 0.0));

        let mut flat = vec![square_cell(0.0, 0.0, 1.0, 0.0)];
        slant_random(&mut flat, 0.0, 10.0, &mut DeterministicRng::new(5));
        assert!(!flat[0].is_slanted);
    }

    #[test]
    fn test_visibility_band() {
        let grid = [4, 4];
        assert!(is_visible(&square_cell(2.5, 2.5, 0.4, 0.0), grid, 4, 1.0));
        assert!(!is_visible(&square_cell(1.5, 2.5, 0.4, 0.0), grid, 4, 1.0));
        assert!(!is_visible(&square_cell(2.0, 2.5, 0.4, 0.0), grid, 4, 1.0));
        assert!(!is_visible(&square_cell(6.5, 2.5, 0.4, 0.0), grid, 4, 1.0));
    }

    #[test]
    fn test_wrapped_cells_finds_all_mirrors() {
        let cells = wrapped_grid(4, 4);
        let target = cells
            .iter()
            .position(|c| c.center.x == 1.5 && c.center.y == 1.5)
            .unwrap();
        let mirrors = wrapped_cells(&cells, &cells[target], [4, 4], 1.0);
        let mut centers: Vec<(f64, f64)> = mirrors
            .iter()
            .map(|&i| (cells[i].center.x, cells[i].center.y))
            .collect();
        centers.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(centers, vec![(1.5, 5.5), (5.5, 1.5), (5.5, 5.5)]);
    }

    #[test]
    fn test_remove_random_cells_only_visible() {
        let grid = [6, 6];
        let wrap = 4;
        for seed in 0..20 {
            let mut cells = wrapped_grid(6, wrap);
            let before = cells.len();
            let mut rng = DeterministicRng::new(seed);
            let removed = remove_random_cells(&mut cells, 2, grid, wrap, 1.0, &mut rng);
            assert_eq!(before - cells.len(), removed.len());
            assert!(removed.iter().all(|c| c.center.z == 0.0));
            assert!(removed.iter().all(|c| c.polygon.iter().all(|p| p.z == 0.0)));

            let primaries: Vec<&Cell> = removed
                .iter()
                .filter(|c| is_visible(c, grid, wrap, 1.0))
                .collect();
            assert!(!primaries.is_empty());
            for cell in &removed {
                let c = cell.center;
                let pad = 2.0;
                let band = |v: f64| v <= pad || v >= 6.0 + pad;
                if band(c.x) || band(c.y) {
                    // A mirror of a removed visible cell.
                    assert!(!wrapped_cells(&removed, cell, grid, 1.0).is_empty());
                }
            }
        }
    }

    #[test]
    fn test_remove_random_cells_takes_count_visible_cells() {
        let grid = [6, 6];
        let wrap = 4;
        for seed in 0..20 {
            let mut cells = wrapped_grid(6, wrap);
            let mut rng = DeterministicRng::new(seed);
            let removed = remove_random_cells(&mut cells, 3, grid, wrap, 1.0, &mut rng);

            let (visible, mirrors): (Vec<&Cell>, Vec<&Cell>) = removed
                .iter()
                .partition(|c| is_visible(c, grid, wrap, 1.0));
            assert_eq!(visible.len(), 3, "seed {}", seed);
            let originals: Vec<Cell> = visible.iter().map(|c| (*c).clone()).collect();
            for mirror in mirrors {
                assert_eq!(
                    wrapped_cells(&originals, mirror, grid, 1.0).len(),
                    1,
                    "seed {}: {:?} mirrors no removed visible cell",
                    seed,
                    mirror.center
                );
            }
            for cell in &originals {
                assert!(wrapped_cells(&cells, cell, grid, 1.0).is_empty());
            }
        }
    }

    #[test]
    fn test_remove_random_cells_deterministic() {
        let run = |seed| {
            let mut cells = wrapped_grid(6, 4);
            remove_random_cells(&mut cells, 3, [6, 6], 4, 1.0, &mut DeterministicRng::new(seed))
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn test_remove_falls_back_to_middle() {
        // No cell is visible: everything lies in the padding band.
        let mut cells: Vec<Cell> = (0..5).map(|i| square_cell(0.5, i as f64, 0.2, 3.0)).collect();
        let removed =
            remove_random_cells(&mut cells, 1, [4, 4], 4, 1.0, &mut DeterministicRng::new(1));
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].center.y, 2.0);
        assert_eq!(cells.len(), 4);
    }

    #[test]
    fn test_apply_random_texture() {
        let cells = wrapped_grid(4, 4);
        let mut rng = DeterministicRng::new(2);
        assert!(apply_random_texture(&cells, &[], [4, 4], 1.0, &mut rng).is_none());

        let textures = vec![PathBuf::from("a.png"), PathBuf::from("b.png")];
        let textured = apply_random_texture(&cells, &textures, [4, 4], 1.0, &mut rng).unwrap();
        assert!(cells.iter().all(|c| c.texture.is_none()));
        assert!(textured.iter().all(|c| c.texture.is_some()));
        for (i, cell) in textured.iter().enumerate() {
            assert!(cell.texture.as_ref().unwrap().rotation < 360);
            for j in wrapped_cells(&textured, cell, [4, 4], 1.0) {
                assert_eq!(textured[j].texture, textured[i].texture);
            }
        }
    }
}
