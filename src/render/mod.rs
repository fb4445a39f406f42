//! Render module - egui drawing for the demo
//!
//! This module provides:
//! - Wave outline painting as a filled mesh
//! - CSS color parsing for wave fills

mod color;
mod wave_view;

pub use color::parse_color;
pub use wave_view::WaveView;
