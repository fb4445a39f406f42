//! Path construction - sampled points to a closed, fillable outline
//!
//! The sampled points are joined with cubic Bézier segments. Each segment
//! uses a single control point for both handles, and each control point is
//! the previous one mirrored through the current sample point, which keeps
//! the tangent continuous at every joint. A straight tail then runs along the
//! anchored edge so the outline encloses everything behind the wave.

use std::fmt;

use super::options::Position;
use super::sampling::{PathPoint, Size};

/// One drawing command of a wave outline
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(PathPoint),
    CubicTo {
        ctrl1: PathPoint,
        ctrl2: PathPoint,
        to: PathPoint,
    },
    LineTo(PathPoint),
    Close,
}

/// A closed wave outline
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WavePath {
    commands: Vec<PathCommand>,
}

impl WavePath {
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of cubic segments in the outline
    pub fn curve_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::CubicTo { .. }))
            .count()
    }

    /// SVG path data (the `d` attribute)
    pub fn to_svg_data(&self) -> String {
        self.to_string()
    }
}

/// Formats a coordinate the way SVG expects, never as `-0`
struct Coord(f64);

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0.0 {
            f.write_str("0")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathCommand::MoveTo(p) => write!(f, "M {} {}", Coord(p.x), Coord(p.y)),
            PathCommand::CubicTo { ctrl1, ctrl2, to } => write!(
                f,
                "C {} {} {} {} {} {}",
                Coord(ctrl1.x),
                Coord(ctrl1.y),
                Coord(ctrl2.x),
                Coord(ctrl2.y),
                Coord(to.x),
                Coord(to.y)
            ),
            PathCommand::LineTo(p) => write!(f, "L {} {}", Coord(p.x), Coord(p.y)),
            PathCommand::Close => f.write_str("Z"),
        }
    }
}

impl fmt::Display for WavePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", command)?;
        }
        Ok(())
    }
}

/// Control point of the opening segment
///
/// Along the travel axis it sits halfway between the first two points, across
/// it the second point is mirrored away from the first.
pub fn opening_control(first: PathPoint, second: PathPoint, position: Position) -> PathPoint {
    let half = (second - first) * 0.5;
    let mirrored = second.reflect(first);
    if position.is_horizontal() {
        PathPoint::new(half.x, mirrored.y)
    } else {
        PathPoint::new(mirrored.x, half.y)
    }
}

/// Control points for every segment after the first
///
/// Folds over the interior points, mirroring the running control point
/// through each of them in turn.
pub fn reflected_controls(opening: PathPoint, interior: &[PathPoint]) -> Vec<PathPoint> {
    interior
        .iter()
        .scan(opening, |control, &point| {
            *control = point.reflect(*control);
            Some(*control)
        })
        .collect()
}

/// Corners walked after the last sample point, per anchored edge
fn closing_tail(position: Position, size: Size) -> [PathPoint; 2] {
    let Size { width, height } = size;
    match position {
        Position::Right => [PathPoint::new(width, height), PathPoint::new(width, 0.0)],
        Position::Left => [PathPoint::new(0.0, height), PathPoint::new(0.0, 0.0)],
        Position::Top => [PathPoint::new(width, 0.0), PathPoint::new(0.0, 0.0)],
        Position::Bottom => [PathPoint::new(width, height), PathPoint::new(0.0, height)],
    }
}

/// Build the closed outline through `points`
///
/// Produces one cubic segment per pair of consecutive points. With fewer than
/// two points there is no curve to draw and the outline only covers the tail.
pub fn build_path(points: &[PathPoint], position: Position, size: Size) -> WavePath {
    let mut commands = Vec::with_capacity(points.len() + 3);

    if let [first, second, rest @ ..] = points {
        commands.push(PathCommand::MoveTo(*first));

        let opening = opening_control(*first, *second, position);
        commands.push(PathCommand::CubicTo {
            ctrl1: opening,
            ctrl2: opening,
            to: *second,
        });

        // Interior points are every point that starts a later segment
        let interior = &points[1..points.len() - 1];
        let controls = reflected_controls(opening, interior);
        for (control, to) in controls.into_iter().zip(rest) {
            commands.push(PathCommand::CubicTo {
                ctrl1: control,
                ctrl2: control,
                to: *to,
            });
        }
    } else if let Some(first) = points.first() {
        commands.push(PathCommand::MoveTo(*first));
    }

    if !commands.is_empty() {
        for corner in closing_tail(position, size) {
            commands.push(PathCommand::LineTo(corner));
        }
        commands.push(PathCommand::Close);
    }

    WavePath { commands }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wave::options::WaveOptions;
    use crate::wave::sampling::sample_points;

    fn pts(coords: &[(f64, f64)]) -> Vec<PathPoint> {
        coords.iter().map(|&(x, y)| PathPoint::new(x, y)).collect()
    }

    #[test]
    fn test_starts_with_move_ends_with_close() {
        let size = Size::new(800.0, 200.0);
        for &position in Position::all() {
            for bones in 1..6 {
                let options = WaveOptions {
                    bones,
                    position,
                    ..Default::default()
                };
                let points = sample_points(4.2, &options, size);
                let path = build_path(&points, position, size);

                assert_eq!(path.commands()[0], PathCommand::MoveTo(points[0]));
                assert_eq!(path.commands().last(), Some(&PathCommand::Close));
                assert_eq!(path.curve_count(), points.len() - 1);
            }
        }
    }

    #[test]
    fn test_bottom_path_string() {
        let points = pts(&[(0.0, 150.0), (100.0, 140.0), (200.0, 150.0)]);
        let path = build_path(&points, Position::Bottom, Size::new(200.0, 200.0));

        // opening control: x = 100 / 2, y = 2 * 140 - 150
        // second control: (100, 140) mirrored through (50, 130) -> (150, 150)
        assert_eq!(
            path.to_svg_data(),
            "M 0 150 C 50 130 50 130 100 140 C 150 150 150 150 200 150 \
             L 200 200 L 0 200 Z"
        );
    }

    #[test]
    fn test_vertical_opening_control() {
        let first = PathPoint::new(40.0, 0.0);
        let second = PathPoint::new(60.0, 100.0);
        assert_eq!(
            opening_control(first, second, Position::Left),
            PathPoint::new(80.0, 50.0)
        );
    }

    #[test]
    fn test_reflected_controls_chain() {
        let controls = reflected_controls(
            PathPoint::new(1.0, 1.0),
            &pts(&[(2.0, 2.0), (4.0, 2.0)]),
        );
        assert_eq!(controls, pts(&[(3.0, 3.0), (5.0, 1.0)]));
        assert!(reflected_controls(PathPoint::new(1.0, 1.0), &[]).is_empty());
    }

    #[test]
    fn test_closing_tails() {
        let size = Size::new(300.0, 100.0);
        let points = pts(&[(0.0, 10.0), (300.0, 10.0)]);

        let tail = |position| {
            let path = build_path(&points, position, size);
            let n = path.commands().len();
            path.commands()[n - 3..n - 1].to_vec()
        };

        assert_eq!(
            tail(Position::Right),
            vec![
                PathCommand::LineTo(PathPoint::new(300.0, 100.0)),
                PathCommand::LineTo(PathPoint::new(300.0, 0.0)),
            ]
        );
        assert_eq!(
            tail(Position::Left),
            vec![
                PathCommand::LineTo(PathPoint::new(0.0, 100.0)),
                PathCommand::LineTo(PathPoint::new(0.0, 0.0)),
            ]
        );
        assert_eq!(
            tail(Position::Top),
            vec![
                PathCommand::LineTo(PathPoint::new(300.0, 0.0)),
                PathCommand::LineTo(PathPoint::new(0.0, 0.0)),
            ]
        );
        assert_eq!(
            tail(Position::Bottom),
            vec![
                PathCommand::LineTo(PathPoint::new(300.0, 100.0)),
                PathCommand::LineTo(PathPoint::new(0.0, 100.0)),
            ]
        );
    }

    #[test]
    fn test_negative_zero_is_written_as_zero() {
        let points = pts(&[(-0.0, 5.0), (10.0, 5.0)]);
        let data = build_path(&points, Position::Bottom, Size::new(10.0, 10.0)).to_svg_data();
        assert!(data.starts_with("M 0 5 "));
        assert!(!data.contains("-0 "));
    }

    #[test]
    fn test_too_few_points() {
        assert!(build_path(&[], Position::Top, Size::new(1.0, 1.0)).is_empty());

        let single = build_path(&pts(&[(0.0, 0.0)]), Position::Top, Size::new(1.0, 1.0));
        assert_eq!(single.curve_count(), 0);
        assert_eq!(single.commands().last(), Some(&PathCommand::Close));
    }
}
