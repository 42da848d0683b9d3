//! Compass directions and the jittered quads stamped by inlays and cracks.

use crate::error::GenerateError;
use crate::point::{ColorRgb, Point2};
use crate::raster::{Pixel, RgbBuffer};
use crate::rng::DeterministicRng;

use super::AsphaltImages;

/// Opacity of the crack tint on the texture image.
const CRACK_TINT_ALPHA: u8 = 40;

/// One of the eight compass directions, in clockwise order starting at
/// north-west. Image y grows downwards, so north is `(0, -1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    NW,
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
}

/// Unit steps of the directions, indexed like [`Direction::ALL`].
pub const DIR_V: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
];

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::NW,
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
    ];

    /// Fails with [`GenerateError::InvalidDirection`] outside `0..=7`.
    pub fn from_index(index: i32) -> Result<Self, GenerateError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(GenerateError::InvalidDirection(index))
    }

    pub fn index(self) -> i32 {
        self as i32
    }

    /// Rotates by `steps` eighth turns, clockwise for positive values.
    pub fn turned(self, steps: i32) -> Self {
        Self::ALL[(self.index() + steps).rem_euclid(8) as usize]
    }

    pub fn vector(self) -> Point2 {
        let (x, y) = DIR_V[self as usize];
        Point2::new(x as f64, y as f64)
    }
}

/// `p` moved by a random offset with both components in `[min, max]`,
/// signed by `direction`.
pub fn point_randrange(
    p: Point2,
    extent: (f64, f64),
    direction: Direction,
    rng: &mut DeterministicRng,
) -> Point2 {
    let x = rng.uniform(extent.0, extent.1);
    let y = rng.uniform(extent.0, extent.1);
    p + Point2::new(x, y) * direction.vector()
}

/// A quad around `p` with corners NW, SW, SE, NE, each pushed out by a
/// random amount in `extent` and rounded to whole pixels.
pub fn random_quad(p: Point2, extent: (f64, f64), rng: &mut DeterministicRng) -> [Pixel; 4] {
    [Direction::NW, Direction::SW, Direction::SE, Direction::NE].map(|corner| {
        let v = point_randrange(p, extent, corner, rng).round();
        (v.x as i64, v.y as i64)
    })
}

/// Stamps an opaque quad of a random palette color onto the texture.
pub fn stamp_inlay(
    texture: &mut RgbBuffer,
    p: Point2,
    extent: (f64, f64),
    colors: &[[u8; 3]],
    rng: &mut DeterministicRng,
) {
    let quad = random_quad(p, extent, rng);
    if let Some(&color) = rng.choose(colors) {
        texture.fill_polygon(&quad, color);
    }
}

/// Stamps one crack quad: white on the defects mask, `grey` on the depth
/// image, and a faint brownish tint derived from `grey` on the texture.
pub fn stamp_crack(
    images: &mut AsphaltImages,
    p: Point2,
    grey: u8,
    extent: (f64, f64),
    rng: &mut DeterministicRng,
) {
    let quad = random_quad(p, extent, rng);
    images.defects.fill_polygon(&quad, [255, 255, 255]);
    images.depth.fill_polygon(&quad, [grey, grey, grey]);

    let (_, lightness, _) = ColorRgb::from_rgb8([grey, grey, grey]).to_hls();
    let hue = rng.uniform(0.02, 0.1);
    let tint = ColorRgb::from_hls(hue, lightness * 0.1 + 0.1, 0.3).to_rgb8();
    images
        .texture
        .blend_polygon(&quad, tint, CRACK_TINT_ALPHA);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_bounds() {
        assert_eq!(Direction::from_index(0).unwrap(), Direction::NW);
        assert_eq!(Direction::from_index(7).unwrap(), Direction::W);
        assert!(matches!(
            Direction::from_index(8),
            Err(GenerateError::InvalidDirection(8))
        ));
        assert!(matches!(
            Direction::from_index(-1),
            Err(GenerateError::InvalidDirection(-1))
        ));
    }

    #[test]
    fn test_direction_turns_wrap() {
        assert_eq!(Direction::NW.turned(-1), Direction::W);
        assert_eq!(Direction::W.turned(1), Direction::NW);
        assert_eq!(Direction::E.turned(3), Direction::SW);
        assert_eq!(Direction::S.vector(), Point2::new(0.0, 1.0));
    }

    #[test]
    fn test_random_quad_corners() {
        let mut rng = DeterministicRng::new(5);
        let p = Point2::new(50.0, 50.0);
        for _ in 0..100 {
            let [nw, sw, se, ne] = random_quad(p, (1.0, 3.0), &mut rng);
            assert!((47..=49).contains(&nw.0) && (47..=49).contains(&nw.1));
            assert!((47..=49).contains(&sw.0) && (51..=53).contains(&sw.1));
            assert!((51..=53).contains(&se.0) && (51..=53).contains(&se.1));
            assert!((51..=53).contains(&ne.0) && (47..=49).contains(&ne.1));
        }
    }

    #[test]
    fn test_fixed_extent_quad_is_square() {
        let mut rng = DeterministicRng::new(1);
        let quad = random_quad(Point2::new(10.0, 10.0), (2.0, 2.0), &mut rng);
        assert_eq!(quad, [(8, 8), (8, 12), (12, 12), (12, 8)]);
    }

    #[test]
    fn test_stamp_crack_writes_all_layers() {
        let mut images = AsphaltImages::new(20, 20);
        let mut rng = DeterministicRng::new(2);
        stamp_crack(&mut images, Point2::new(10.0, 10.0), 5, (2.0, 2.0), &mut rng);
        assert_eq!(images.defects.get(10, 10), [255, 255, 255]);
        assert_eq!(images.depth.get(10, 10), [5, 5, 5]);
        assert_ne!(images.texture.get(10, 10), [255, 255, 255]);
        assert_eq!(images.defects.get(0, 0), [0, 0, 0]);
        assert_eq!(images.depth.get(0, 0), [255, 255, 255]);
    }
}
