//! egui renderer for wave outlines
//!
//! egui only fills convex polygons, and a wave outline usually isn't one.
//! The curve part of the outline is flattened into a polyline instead, and
//! every polyline segment is filled as a quad reaching down to the anchored
//! edge. Together the quads cover exactly the region the closed outline
//! encloses.

use eframe::egui::{self, Color32, Mesh, Pos2, Rect, Stroke};

use wavify::wave::{PathCommand, PathPoint, Position, WavePath};

/// Display settings for waves
#[derive(Clone)]
pub struct WaveView {
    /// Points per cubic segment when flattening
    pub curve_samples: usize,
    /// Mark the sample points on top of the fill
    pub show_points: bool,
}

impl Default for WaveView {
    fn default() -> Self {
        Self {
            curve_samples: 24,
            show_points: false,
        }
    }
}

impl WaveView {
    /// Fill `path` inside `rect`.
    ///
    /// `position` is the edge the wave is anchored to; path coordinates are
    /// relative to the rect's top-left corner.
    pub fn paint(
        &self,
        painter: &egui::Painter,
        rect: Rect,
        path: &WavePath,
        position: Position,
        color: Color32,
    ) {
        let curve = flatten(path, self.curve_samples);
        if curve.len() < 2 {
            return;
        }

        let to_screen = |p: PathPoint| Pos2::new(rect.left() + p.x as f32, rect.top() + p.y as f32);
        let to_edge = |p: PathPoint| {
            let edge = match position {
                Position::Top => PathPoint::new(p.x, 0.0),
                Position::Bottom => PathPoint::new(p.x, f64::from(rect.height())),
                Position::Left => PathPoint::new(0.0, p.y),
                Position::Right => PathPoint::new(f64::from(rect.width()), p.y),
            };
            to_screen(edge)
        };

        let mut mesh = Mesh::default();
        for pair in curve.windows(2) {
            let base = mesh.vertices.len() as u32;
            mesh.colored_vertex(to_screen(pair[0]), color);
            mesh.colored_vertex(to_screen(pair[1]), color);
            mesh.colored_vertex(to_edge(pair[1]), color);
            mesh.colored_vertex(to_edge(pair[0]), color);
            mesh.add_triangle(base, base + 1, base + 2);
            mesh.add_triangle(base, base + 2, base + 3);
        }
        painter.add(egui::Shape::mesh(mesh));

        if self.show_points {
            let stroke = Stroke::new(1.0, Color32::from_white_alpha(180));
            for point in sample_points(path) {
                painter.circle_stroke(to_screen(point), 3.0, stroke);
            }
        }
    }
}

/// End points of the move and every cubic segment
fn sample_points(path: &WavePath) -> impl Iterator<Item = PathPoint> + '_ {
    path.commands().iter().filter_map(|command| match command {
        PathCommand::MoveTo(p) => Some(*p),
        PathCommand::CubicTo { to, .. } => Some(*to),
        _ => None,
    })
}

/// Flatten the curved part of `path` (its move and cubic commands)
pub fn flatten(path: &WavePath, samples_per_curve: usize) -> Vec<PathPoint> {
    let samples = samples_per_curve.max(1);
    let mut points: Vec<PathPoint> = Vec::new();

    for command in path.commands() {
        match *command {
            PathCommand::MoveTo(p) => points.push(p),
            PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                let Some(&start) = points.last() else {
                    continue;
                };
                for i in 1..=samples {
                    let t = i as f64 / samples as f64;
                    points.push(cubic_bezier(start, ctrl1, ctrl2, to, t));
                }
            }
            // The tail runs along the anchored edge, which the quads already cover
            PathCommand::LineTo(_) | PathCommand::Close => break,
        }
    }

    points
}

/// Evaluate a cubic Bézier curve at parameter t
fn cubic_bezier(p0: PathPoint, p1: PathPoint, p2: PathPoint, p3: PathPoint, t: f64) -> PathPoint {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let mt3 = mt2 * mt;

    p0 * mt3 + p1 * (3.0 * mt2 * t) + p2 * (3.0 * mt * t2) + p3 * t3
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavify::wave::{build_path, Size};

    #[test]
    fn test_cubic_bezier_endpoints() {
        let p0 = PathPoint::new(0.0, 0.0);
        let p1 = PathPoint::new(0.33, 1.0);
        let p2 = PathPoint::new(0.66, 1.0);
        let p3 = PathPoint::new(1.0, 0.0);

        let start = cubic_bezier(p0, p1, p2, p3, 0.0);
        assert!((start.x - 0.0).abs() < 0.001);
        assert!((start.y - 0.0).abs() < 0.001);

        let end = cubic_bezier(p0, p1, p2, p3, 1.0);
        assert!((end.x - 1.0).abs() < 0.001);
        assert!((end.y - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_flatten_stops_at_tail() {
        let points = vec![
            PathPoint::new(0.0, 150.0),
            PathPoint::new(400.0, 130.0),
            PathPoint::new(800.0, 150.0),
        ];
        let path = build_path(&points, Position::Bottom, Size::new(800.0, 200.0));
        let flat = flatten(&path, 10);

        assert_eq!(flat.len(), 1 + 2 * 10);
        assert_eq!(flat[0], points[0]);
        let last = flat[flat.len() - 1];
        assert!((last.x - 800.0).abs() < 1e-9);
        assert!((last.y - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_flatten_empty() {
        assert!(flatten(&WavePath::default(), 8).is_empty());
    }
}
