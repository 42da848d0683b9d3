//! Random-walk cracks with a width and depth profile along their length.

use tracing::trace;

use crate::error::GenerateError;
use crate::point::Point2;
use crate::rng::DeterministicRng;

use super::shapes::{stamp_crack, Direction};
use super::AsphaltImages;

/// Depth of the deepest point of a crack, in grey levels below white.
const MAX_DEPTH: f64 = 250.0;

/// Upper bound on the steps reserved up front for one crack.
const MAX_RESERVED_STEPS: u32 = 4096;

/// Width of branch cracks in pixels.
const BRANCH_WIDTH: u32 = 3;

/// Direction changes of a branch relative to its main crack.
const BRANCH_TURNS: [i32; 6] = [-3, -2, -1, 1, 2, 3];

/// Depth-image grey at step `i` of a crack of `max_steps` steps: white at
/// both ends, darkest in the middle.
pub fn depth_brightness(max_steps: u32, i: u32) -> u8 {
    let phase = std::f64::consts::TAU * i as f64 / max_steps as f64;
    let depth = ((0.5 - 0.5 * phase.cos()) * MAX_DEPTH).round();
    (255.0 - depth).clamp(0.0, 255.0) as u8
}

/// Stamps step `i` of a crack at `p`.
///
/// The first and last thirds use a fixed extent of a fifth of `max_width`;
/// the middle third swells along a sine arch up to `max_width`.
pub fn dynamic_width_crack(
    images: &mut AsphaltImages,
    p: Point2,
    max_width: u32,
    max_steps: u32,
    i: u32,
    rng: &mut DeterministicRng,
) -> Result<(), GenerateError> {
    let mid_start = max_steps as f64 / 3.0;
    let mid_end = 2.0 * mid_start;
    let max_width = max_width as f64;
    let min_width = max_width * 0.2;
    let step = i as f64;

    let extent = if step <= mid_start {
        (min_width, min_width)
    } else if step <= mid_end {
        let arch = ((step / max_steps as f64) * 3.0 - 1.0) * std::f64::consts::PI;
        let width = (arch.sin() * (max_width - min_width) + min_width).abs();
        (width, width * 0.5)
    } else if i <= max_steps {
        (min_width, min_width)
    } else {
        return Err(GenerateError::InvalidStepIndex { index: i, max_steps });
    };

    let grey = depth_brightness(max_steps, i);
    stamp_crack(images, p, grey, extent, rng);
    Ok(())
}

/// Walks a crack of `max_steps` steps from `start` and returns the visited
/// points.
///
/// Every step moves `round(0.2 * crack_width)` pixels, wraps around the
/// image edges, and stamps the crack profile. The next heading is the
/// starting direction turned by -1, 0, or +1.
pub fn draw_crack(
    images: &mut AsphaltImages,
    start: Point2,
    direction: i32,
    max_steps: u32,
    crack_width: u32,
    rng: &mut DeterministicRng,
) -> Result<Vec<Point2>, GenerateError> {
    let start_direction = Direction::from_index(direction)?;
    let step_size = (crack_width as f64 * 0.2).round();
    let bounds = Point2::new(images.width() as f64, images.height() as f64);

    let mut heading = start_direction;
    let mut p = start;
    let mut points = Vec::with_capacity(max_steps.min(MAX_RESERVED_STEPS) as usize);
    for i in 0..max_steps {
        p += heading.vector() * step_size;
        p = Point2::new(p.x.rem_euclid(bounds.x), p.y.rem_euclid(bounds.y));
        dynamic_width_crack(images, p, crack_width, max_steps, i, rng)?;
        points.push(p);
        heading = start_direction.turned(rng.gen_range(-1..=1));
    }
    Ok(points)
}

/// Draws `count` cracks, each with one to five branches.
///
/// Each crack starts on the side of the image opposite its direction so it
/// tends to run across the image.
pub fn generate_cracks(
    images: &mut AsphaltImages,
    crack_length: f64,
    crack_width: u32,
    count: u32,
    rng: &mut DeterministicRng,
) -> Result<(), GenerateError> {
    let (width, height) = (images.width() as i64, images.height() as i64);
    let max_steps = (5.0 * crack_length * width as f64 / crack_width as f64).round() as u32;

    for index in 0..count {
        let direction = rng.gen_range(0..=7);
        let vector = Direction::from_index(direction)?.vector();
        let start = Point2::new(
            (rng.gen_range(0..=width / 2) - vector.x as i64 * (width / 2)) as f64,
            (rng.gen_range(0..=height / 2) - vector.y as i64 * (height / 2)) as f64,
        );
        let points = draw_crack(images, start, direction, max_steps, crack_width, rng)?;
        trace!(index, direction, steps = max_steps, "drew crack");

        let branches: u32 = rng.gen_range(1..=5);
        for _ in 0..branches {
            let Some(&origin) = rng.choose(&points) else {
                break;
            };
            let turn = rng.choose(&BRANCH_TURNS).copied().unwrap_or(1);
            let side = (direction + turn).rem_euclid(8);
            let steps = (max_steps as f64 * (rng.gen_f64() * 0.5 + 0.1)).round() as u32;
            draw_crack(images, origin, side, steps, BRANCH_WIDTH, rng)?;
        }
        trace!(index, branches, "drew crack branches");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrapped_delta(a: f64, b: f64, size: f64) -> f64 {
        let d = (a - b).abs();
        d.min(size - d)
    }

    #[test]
    fn test_depth_brightness_bowl() {
        assert_eq!(depth_brightness(100, 0), 255);
        assert_eq!(depth_brightness(100, 50), 5);
        assert_eq!(depth_brightness(100, 100), 255);
        assert_eq!(depth_brightness(100, 25), 130);
        for i in 0..=100 {
            assert_eq!(depth_brightness(100, i), depth_brightness(100, 100 - i));
        }
        for i in 0..50 {
            assert!(depth_brightness(100, i) >= depth_brightness(100, i + 1));
        }
    }

    #[test]
    fn test_step_index_past_end() {
        let mut images = AsphaltImages::new(32, 32);
        let mut rng = DeterministicRng::new(1);
        let p = Point2::new(16.0, 16.0);
        assert!(dynamic_width_crack(&mut images, p, 10, 30, 30, &mut rng).is_ok());
        let err = dynamic_width_crack(&mut images, p, 10, 30, 31, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::InvalidStepIndex {
                index: 31,
                max_steps: 30
            }
        ));
    }

    #[test]
    fn test_crack_path_length_and_step() {
        let mut images = AsphaltImages::new(64, 48);
        let mut rng = DeterministicRng::new(17);
        let start = Point2::new(10.0, 10.0);
        let points = draw_crack(&mut images, start, 3, 120, 10, &mut rng).unwrap();
        assert_eq!(points.len(), 120);

        let mut previous = start;
        for p in &points {
            assert!((0.0..64.0).contains(&p.x) && (0.0..48.0).contains(&p.y));
            let dx = wrapped_delta(p.x, previous.x, 64.0);
            let dy = wrapped_delta(p.y, previous.y, 48.0);
            // Heading east, turned by at most one eighth: always 2 px in x.
            assert_eq!(dx, 2.0);
            assert!(dy == 0.0 || dy == 2.0);
            previous = *p;
        }
        assert!(images.defects.data.contains(&[255, 255, 255]));
    }

    #[test]
    fn test_invalid_direction() {
        let mut images = AsphaltImages::new(8, 8);
        let mut rng = DeterministicRng::new(1);
        for direction in [-1, 8, 9] {
            let err = draw_crack(
                &mut images,
                Point2::new(4.0, 4.0),
                direction,
                3,
                10,
                &mut rng,
            )
            .unwrap_err();
            assert!(matches!(err, GenerateError::InvalidDirection(d) if d == direction));
        }
    }

    #[test]
    fn test_zero_cracks_leave_mask_black() {
        let mut images = AsphaltImages::new(40, 40);
        let mut rng = DeterministicRng::new(3);
        generate_cracks(&mut images, 0.8, 10, 0, &mut rng).unwrap();
        assert!(images.defects.data.iter().all(|&p| p == [0, 0, 0]));
        assert!(images.depth.data.iter().all(|&p| p == [255, 255, 255]));
    }

    #[test]
    fn test_cracks_are_deterministic() {
        let run = |seed| {
            let mut images = AsphaltImages::new(80, 60);
            generate_cracks(&mut images, 0.5, 6, 2, &mut DeterministicRng::new(seed)).unwrap();
            images
        };
        let a = run(9);
        assert_eq!(a, run(9));
        assert!(a.defects.data.contains(&[255, 255, 255]));
    }
}
