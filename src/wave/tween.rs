//! Eased redraw
//!
//! Instead of writing every frame's shape directly, the eased redraw mode
//! moves the displayed points toward a target shape over a fixed duration.
//! The outline is an affine function of the points, so easing the points is
//! the same as easing every number in the path data.

use super::sampling::PathPoint;

/// Quadratic ease-in/ease-out over `t` in [0, 1]
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// An interpolation between two point sets
#[derive(Clone, Debug)]
pub struct PathTween {
    from: Vec<PathPoint>,
    to: Vec<PathPoint>,
    start_ms: f64,
    duration_ms: f64,
}

impl PathTween {
    /// Start a tween at `start_ms`.
    ///
    /// If the two shapes don't have the same number of points (the bone count
    /// changed) there is nothing to pair up, and the tween jumps to `to`.
    pub fn new(from: Vec<PathPoint>, to: Vec<PathPoint>, start_ms: f64, duration_ms: f64) -> Self {
        let from = if from.len() == to.len() { from } else { to.clone() };
        Self {
            from,
            to,
            start_ms,
            duration_ms,
        }
    }

    /// Eased progress in [0, 1] at `now_ms`
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ease_in_out((now_ms - self.start_ms) / self.duration_ms)
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        now_ms - self.start_ms >= self.duration_ms
    }

    pub fn target(&self) -> &[PathPoint] {
        &self.to
    }

    /// Interpolated points at `now_ms`
    pub fn sample(&self, now_ms: f64) -> Vec<PathPoint> {
        let t = self.progress(now_ms);
        self.from
            .iter()
            .zip(&self.to)
            .map(|(a, b)| a.lerp(*b, t))
            .collect()
    }
}
