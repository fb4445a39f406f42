//! Point sampling along the anchored edge
//!
//! Each frame the wave is reduced to `bones + 1` points spread evenly along
//! the travel axis. The perpendicular coordinate of every point is a sine of
//! the current phase, so feeding an increasing phase makes the points bob.

use std::ops::{Add, Mul, Sub};

use super::options::{Position, WaveOptions};

/// A point in container coordinates (origin top-left, y down)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
}

impl PathPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Mirror `other` through this point
    pub fn reflect(self, other: PathPoint) -> PathPoint {
        self * 2.0 - other
    }

    /// Linear interpolation toward `other`
    pub fn lerp(self, other: PathPoint, t: f64) -> PathPoint {
        self + (other - self) * t
    }
}

impl Add for PathPoint {
    type Output = PathPoint;

    fn add(self, rhs: PathPoint) -> PathPoint {
        PathPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for PathPoint {
    type Output = PathPoint;

    fn sub(self, rhs: PathPoint) -> PathPoint {
        PathPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for PathPoint {
    type Output = PathPoint;

    fn mul(self, rhs: f64) -> PathPoint {
        PathPoint::new(self.x * rhs, self.y * rhs)
    }
}

/// Measured size of the container
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Extent along the travel axis for `position`
    pub fn travel(&self, position: Position) -> f64 {
        if position.is_horizontal() {
            self.width
        } else {
            self.height
        }
    }

    /// Extent perpendicular to the travel axis for `position`
    pub fn perpendicular(&self, position: Position) -> f64 {
        if position.is_horizontal() {
            self.height
        } else {
            self.width
        }
    }
}

/// Resting perpendicular coordinate of the wave
pub fn baseline(options: &WaveOptions, size: Size) -> f64 {
    match options.position {
        Position::Top | Position::Left => options.height,
        Position::Bottom | Position::Right => size.perpendicular(options.position) - options.height,
    }
}

/// Sample the wave at `phase`
///
/// Returns exactly `bones + 1` points (with `bones` treated as at least 1),
/// with travel coordinates running from 0 to the container's extent.
///
/// The `i % bones` term offsets neighbouring points by different amounts so
/// they don't all move as one shifted sine.
pub fn sample_points(phase: f64, options: &WaveOptions, size: Size) -> Vec<PathPoint> {
    let bones = options.bones.max(1);
    let position = options.position;
    let extent = size.travel(position);
    let rest = baseline(options, size);
    let amplitude = match position {
        Position::Top | Position::Left => options.amplitude,
        Position::Bottom | Position::Right => -options.amplitude,
    };

    (0..=bones)
        .map(|i| {
            let travel = f64::from(i) / f64::from(bones) * extent;
            let seed = (phase + f64::from(i + i % bones)) * options.speed * 100.0;
            let sine = (seed / 100.0).sin();
            let displacement = sine * amplitude;
            let offset = sine * displacement + rest;

            if position.is_horizontal() {
                PathPoint::new(travel, offset)
            } else {
                PathPoint::new(offset, travel)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(position: Position, bones: u32, amplitude: f64) -> WaveOptions {
        WaveOptions {
            height: 50.0,
            amplitude,
            speed: 0.15,
            bones,
            position,
            ..Default::default()
        }
    }

    #[test]
    fn test_point_count_and_travel_range() {
        let size = Size::new(800.0, 200.0);
        for &position in Position::all() {
            for bones in 1..8 {
                let points = sample_points(1.7, &options(position, bones, 30.0), size);
                assert_eq!(points.len(), bones as usize + 1);

                let travel: Vec<f64> = points
                    .iter()
                    .map(|p| if position.is_horizontal() { p.x } else { p.y })
                    .collect();
                assert_eq!(travel[0], 0.0);
                assert!((travel[bones as usize] - size.travel(position)).abs() < 1e-9);
                assert!(travel.windows(2).all(|w| w[0] <= w[1]));
            }
        }
    }

    #[test]
    fn test_zero_amplitude_stays_on_baseline() {
        let size = Size::new(800.0, 200.0);
        for &position in Position::all() {
            let opts = options(position, 3, 0.0);
            let expected = match position {
                Position::Top | Position::Left => 50.0,
                Position::Bottom => 150.0,
                Position::Right => 750.0,
            };
            for phase in [0.0, 0.3, 12.5, 999.0 * std::f64::consts::PI] {
                for p in sample_points(phase, &opts, size) {
                    let perpendicular = if position.is_horizontal() { p.y } else { p.x };
                    assert_eq!(perpendicular, expected);
                }
            }
        }
    }

    #[test]
    fn test_bottom_baseline_at_phase_zero() {
        let size = Size::new(800.0, 200.0);
        let points = sample_points(0.0, &options(Position::Bottom, 3, 100.0), size);

        // i = 0 has a zero sine term at phase 0
        assert_eq!(points[0], PathPoint::new(0.0, 150.0));
        // Every other point is pushed up toward the top edge
        for p in &points[1..] {
            assert!(p.y < 150.0);
        }
    }

    #[test]
    fn test_displacement_direction_per_edge() {
        let size = Size::new(400.0, 400.0);
        let phase = 3.0;

        let top = sample_points(phase, &options(Position::Top, 2, 80.0), size);
        assert!(top[1].y >= 50.0);

        let left = sample_points(phase, &options(Position::Left, 2, 80.0), size);
        assert!(left[1].x >= 50.0);

        let right = sample_points(phase, &options(Position::Right, 2, 80.0), size);
        assert!(right[1].x <= 350.0);
    }

    #[test]
    fn test_matches_formula() {
        let size = Size::new(300.0, 120.0);
        let opts = options(Position::Top, 4, 20.0);
        let phase = 2.25;
        let points = sample_points(phase, &opts, size);

        let i = 3u32;
        let seed = (phase + f64::from(i + i % 4)) * 0.15 * 100.0;
        let sine = (seed / 100.0).sin();
        let expected_y = sine * sine * 20.0 + 50.0;
        assert!((points[3].y - expected_y).abs() < 1e-12);
        assert!((points[3].x - 225.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_bones_is_treated_as_one() {
        let mut opts = options(Position::Bottom, 1, 10.0);
        opts.bones = 0;
        let points = sample_points(0.5, &opts, Size::new(100.0, 100.0));
        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn test_reflect() {
        let p = PathPoint::new(2.0, 3.0);
        assert_eq!(p.reflect(PathPoint::new(1.0, 1.0)), PathPoint::new(3.0, 5.0));
    }
}
