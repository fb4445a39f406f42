//! Wave configuration
//!
//! `WaveOptions` is the full configuration of a widget. Callers never have to
//! spell it out: they pass a `WaveOptionsPatch` whose fields are all optional,
//! and it is merged field by field over either the defaults or the current
//! configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Container edge the wave is anchored to
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "UPPERCASE")]
pub enum Position {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl Position {
    /// Get all positions
    pub fn all() -> &'static [Position] {
        &[Position::Top, Position::Bottom, Position::Left, Position::Right]
    }

    /// Upper-case name, as used on input and in serialized settings
    pub fn name(&self) -> &'static str {
        match self {
            Position::Top => "TOP",
            Position::Bottom => "BOTTOM",
            Position::Left => "LEFT",
            Position::Right => "RIGHT",
        }
    }

    /// Whether sample points are spread horizontally
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Position::Top | Position::Bottom)
    }

    /// Parse a position, ignoring case.
    ///
    /// Anything unrecognized behaves like `BOTTOM`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "TOP" => Position::Top,
            "LEFT" => Position::Left,
            "RIGHT" => Position::Right,
            "BOTTOM" => Position::Bottom,
            other => {
                log::warn!("Unknown wave position {:?}, using BOTTOM", other);
                Position::Bottom
            }
        }
    }
}

impl FromStr for Position {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for Position {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for Position {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a freshly computed path reaches the scene graph
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RedrawMode {
    /// Write every frame's path as is
    #[default]
    Snap,
    /// Ease from the displayed shape toward each new one over `duration_ms`
    Eased { duration_ms: f64 },
}

impl RedrawMode {
    /// Duration used when eased redraw is switched on without one
    pub const DEFAULT_EASE_MS: f64 = 250.0;

    pub fn eased() -> Self {
        RedrawMode::Eased {
            duration_ms: Self::DEFAULT_EASE_MS,
        }
    }
}

/// Full wave configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveOptions {
    /// Offset of the wave's baseline from the anchored edge
    pub height: f64,
    /// Peak deviation perpendicular to the travel axis
    pub amplitude: f64,
    /// Phase advance multiplier
    pub speed: f64,
    /// Number of sample intervals (produces `bones + 1` points)
    pub bones: u32,
    pub position: Position,
    /// Fill color, in the host's color syntax
    pub color: String,
    /// Start animating right after construction
    pub autostart: bool,
    pub redraw: RedrawMode,
}

impl Default for WaveOptions {
    fn default() -> Self {
        Self {
            height: 200.0,
            amplitude: 100.0,
            speed: 0.15,
            bones: 3,
            position: Position::Bottom,
            color: "rgba(255,255,255, 0.20)".to_string(),
            autostart: true,
            redraw: RedrawMode::Snap,
        }
    }
}

impl WaveOptions {
    /// Defaults with `patch` applied on top
    pub fn from_patch(patch: &WaveOptionsPatch) -> Self {
        Self::default().merged(patch)
    }

    /// Copy of these options with every field set in `patch` replaced
    pub fn merged(&self, patch: &WaveOptionsPatch) -> Self {
        let mut options = self.clone();
        options.apply(patch);
        options
    }

    /// Replace every field set in `patch`, then re-validate
    pub fn apply(&mut self, patch: &WaveOptionsPatch) {
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(amplitude) = patch.amplitude {
            self.amplitude = amplitude;
        }
        if let Some(speed) = patch.speed {
            self.speed = speed;
        }
        if let Some(bones) = patch.bones {
            self.bones = bones;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(autostart) = patch.autostart {
            self.autostart = autostart;
        }
        if let Some(redraw) = patch.redraw {
            self.redraw = redraw;
        }
        self.validate();
    }

    /// Clamp fields that would produce undefined geometry
    pub fn validate(&mut self) {
        if self.bones == 0 {
            log::warn!("bones must be at least 1, clamping");
            self.bones = 1;
        }
        if let RedrawMode::Eased { duration_ms } = self.redraw {
            if !(duration_ms.is_finite() && duration_ms > 0.0) {
                log::warn!("Invalid ease duration {}, snapping instead", duration_ms);
                self.redraw = RedrawMode::Snap;
            }
        }
    }
}

/// Partial configuration; unset fields keep their current value
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveOptionsPatch {
    pub height: Option<f64>,
    pub amplitude: Option<f64>,
    pub speed: Option<f64>,
    pub bones: Option<u32>,
    pub position: Option<Position>,
    pub color: Option<String>,
    pub autostart: Option<bool>,
    pub redraw: Option<RedrawMode>,
}

impl WaveOptionsPatch {
    /// Parse a loose JSON option object
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<&WaveOptions> for WaveOptionsPatch {
    fn from(options: &WaveOptions) -> Self {
        Self {
            height: Some(options.height),
            amplitude: Some(options.amplitude),
            speed: Some(options.speed),
            bones: Some(options.bones),
            position: Some(options.position),
            color: Some(options.color.clone()),
            autostart: Some(options.autostart),
            redraw: Some(options.redraw),
        }
    }
}
