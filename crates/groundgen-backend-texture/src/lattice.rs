//! Site lattice construction, jitter, height, and wrapping.
//!
//! A lattice is stored x-major: the site at grid position `(x, y)` has index
//! `x * size[1] + y`. Wrapping only appends sites, so these indices stay
//! valid after [`wrap`].

use crate::error::GenerateError;
use crate::point::{Point2, Point3};
use crate::rng::DeterministicRng;

/// Ordered sequence of sites.
pub type Lattice = Vec<Point3>;

/// Builds a regular `size[0] x size[1]` grid scaled by `scale`, with z = 0.
pub fn build_lattice(size: [usize; 2], scale: f64) -> Lattice {
    build_lattice_with_offset(size, Point2::default(), scale)
}

/// Builds a regular grid whose grid coordinates are shifted by `offset`
/// before scaling.
pub fn build_lattice_with_offset(size: [usize; 2], offset: Point2, scale: f64) -> Lattice {
    let mut lattice = Vec::with_capacity(size[0] * size[1]);
    for x in 0..size[0] {
        for y in 0..size[1] {
            lattice.push(Point3::new(
                (x as f64 + offset.x) * scale,
                (y as f64 + offset.y) * scale,
                0.0,
            ));
        }
    }
    lattice
}

/// Returns `count` offsets with components uniform in `[-scale/2, scale/2)`.
pub fn random_offsets(count: usize, scale: f64, rng: &mut DeterministicRng) -> Vec<Point2> {
    (0..count)
        .map(|_| {
            let x = (rng.gen_f64() - 0.5) * scale;
            let y = (rng.gen_f64() - 0.5) * scale;
            Point2::new(x, y)
        })
        .collect()
}

/// Moves every site by at most `scale` in x and y.
pub fn distort(lattice: &mut [Point3], scale: f64, rng: &mut DeterministicRng) {
    let offsets = random_offsets(lattice.len(), scale * 2.0, rng);
    for (site, offset) in lattice.iter_mut().zip(offsets) {
        *site += offset.with_z(0.0);
    }
}

/// Adds a random height in `[0, scale)` to every site.
pub fn displace_z(lattice: &mut [Point3], scale: f64, rng: &mut DeterministicRng) {
    for site in lattice.iter_mut() {
        site.z += rng.gen_f64() * scale;
    }
}

/// Replicates the first `amount` columns and rows (and their corner block)
/// across the far edges of the grid.
///
/// Appends, in order: the first `amount` columns shifted by `+size[0]*scale`
/// in x, the first `amount` rows shifted by `+size[1]*scale` in y, and the
/// `amount x amount` corner block shifted by both.
pub fn wrap(
    lattice: &mut Lattice,
    size: [usize; 2],
    amount: usize,
    scale: f64,
) -> Result<(), GenerateError> {
    let limit = size[0].min(size[1]);
    if amount > limit {
        return Err(GenerateError::WrapTooLarge {
            amount,
            size: limit,
        });
    }
    if lattice.len() < size[0] * size[1] {
        return Err(GenerateError::InvalidParameter(format!(
            "lattice has {} sites, expected at least {}",
            lattice.len(),
            size[0] * size[1]
        )));
    }

    let shift_x = Point3::new(size[0] as f64 * scale, 0.0, 0.0);
    let shift_y = Point3::new(0.0, size[1] as f64 * scale, 0.0);
    let at = |x: usize, y: usize| x * size[1] + y;

    lattice.reserve(amount * (size[0] + size[1] + amount));
    for y in 0..size[1] {
        for x in 0..amount {
            let site = lattice[at(x, y)] + shift_x;
            lattice.push(site);
        }
    }
    for y in 0..amount {
        for x in 0..size[0] {
            let site = lattice[at(x, y)] + shift_y;
            lattice.push(site);
        }
    }
    for y in 0..amount {
        for x in 0..amount {
            let site = lattice[at(x, y)] + shift_x + shift_y;
            lattice.push(site);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_lattice_order() {
        let lattice = build_lattice([2, 2], 1.0);
        assert_eq!(
            lattice,
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_build_lattice_len() {
        for size in [[1, 1], [3, 7], [24, 24], [10, 0]] {
            assert_eq!(build_lattice(size, 2.5).len(), size[0] * size[1]);
        }
    }

    #[test]
    fn test_build_lattice_with_offset() {
        let lattice = build_lattice_with_offset([3, 3], Point2::new(-1.0, -1.0), 2.0);
        assert_eq!(lattice[0], Point3::new(-2.0, -2.0, 0.0));
        assert_eq!(lattice[1], Point3::new(-2.0, 0.0, 0.0));
        assert_eq!(lattice[8], Point3::new(2.0, 2.0, 0.0));
    }

    #[test]
    fn test_distort_bounds_and_determinism() {
        let mut a = build_lattice([5, 5], 10.0);
        let mut b = a.clone();
        let original = a.clone();
        distort(&mut a, 3.0, &mut DeterministicRng::new(1));
        distort(&mut b, 3.0, &mut DeterministicRng::new(1));
        assert_eq!(a, b);
        for (moved, site) in a.iter().zip(&original) {
            assert!((moved.x - site.x).abs() <= 3.0);
            assert!((moved.y - site.y).abs() <= 3.0);
            assert_eq!(moved.z, 0.0);
        }
    }

    #[test]
    fn test_displace_z_range() {
        let mut lattice = build_lattice([4, 4], 1.0);
        displace_z(&mut lattice, 20.0, &mut DeterministicRng::new(3));
        assert!(lattice.iter().all(|p| (0.0..20.0).contains(&p.z)));
    }

    #[test]
    fn test_wrap_appends_mirrors() {
        let scale = 5.0;
        let mut lattice = build_lattice_with_offset([3, 2], Point2::new(1.0, 1.0), scale);
        wrap(&mut lattice, [3, 2], 1, scale).unwrap();
        let expected: Vec<Point3> = [
            (5.0, 5.0),
            (5.0, 10.0),
            (10.0, 5.0),
            (10.0, 10.0),
            (15.0, 5.0),
            (15.0, 10.0),
            (20.0, 5.0),
            (20.0, 10.0),
            (5.0, 15.0),
            (10.0, 15.0),
            (15.0, 15.0),
            (20.0, 15.0),
        ]
        .iter()
        .map(|&(x, y)| Point3::new(x, y, 0.0))
        .collect();
        assert_eq!(lattice, expected);
    }

    #[test]
    fn test_wrap_too_large() {
        let mut lattice = build_lattice([4, 4], 1.0);
        let err = wrap(&mut lattice, [4, 4], 5, 1.0).unwrap_err();
        assert!(matches!(err, GenerateError::WrapTooLarge { amount: 5, size: 4 }));
        assert_eq!(lattice.len(), 16);
    }

    #[test]
    fn test_random_offsets_range() {
        let offsets = random_offsets(50, 2.0, &mut DeterministicRng::new(9));
        assert_eq!(offsets.len(), 50);
        assert!(offsets
            .iter()
            .all(|p| (-1.0..1.0).contains(&p.x) && (-1.0..1.0).contains(&p.y)));
    }
}
