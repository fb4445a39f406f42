//! Wave module - sampling, outline construction and the animated widget
//!
//! This module provides:
//! - `WaveOptions` / `WaveOptionsPatch` for configuration
//! - `sample_points` to reduce the wave to a handful of points per frame
//! - `build_path` to turn those points into a closed Bézier outline
//! - `WaveWidget`, which drives the two from host frame callbacks

mod options;
mod sampling;
mod path;
mod tween;
mod widget;

pub use options::{Position, RedrawMode, WaveOptions, WaveOptionsPatch};
pub use sampling::{baseline, sample_points, PathPoint, Size};
pub use path::{build_path, opening_control, reflected_controls, PathCommand, WavePath};
pub use tween::{ease_in_out, PathTween};
pub use widget::{wavify, LoopState, Target, WaveWidget};
