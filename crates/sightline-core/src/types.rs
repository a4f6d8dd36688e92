//! Fundamental geometric and timing types.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Platform account identifier for a player (e.g. a 64-bit Steam id).
pub type PlayerId = u64;

/// One recorded simulation step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Engine tick number. Strictly increasing within a match.
    pub index: u32,
    /// Game clock in seconds. Non-decreasing within a match.
    pub game_time: f64,
}

/// World position in engine units. z = up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// View orientation in degrees.
///
/// Pitch is positive looking down (Source engine convention), yaw is measured
/// counter-clockwise from +x. Deserialized yaw is canonicalized like
/// [`ViewAngles::new`], so parser output in [0, 360) is accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawViewAngles")]
pub struct ViewAngles {
    pub pitch: f64,
    pub yaw: f64,
}

#[derive(Deserialize)]
struct RawViewAngles {
    pitch: f64,
    yaw: f64,
}

impl From<RawViewAngles> for ViewAngles {
    fn from(raw: RawViewAngles) -> Self {
        Self::new(raw.pitch, raw.yaw)
    }
}

impl Tick {
    pub fn new(index: u32, game_time: f64) -> Self {
        Self { index, game_time }
    }
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn as_dvec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Eye position for a player standing at this origin.
    pub fn eye(&self, eye_height: f64) -> DVec3 {
        DVec3::new(self.x, self.y, self.z + eye_height)
    }

    /// Straight-line distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        self.as_dvec3().distance(other.as_dvec3())
    }
}

impl ViewAngles {
    /// Build view angles, canonicalizing yaw into [-180, 180).
    pub fn new(pitch: f64, yaw: f64) -> Self {
        Self {
            pitch,
            yaw: crate::angles::wrap_degrees(yaw),
        }
    }

    /// Unit view direction vector.
    pub fn direction(&self) -> DVec3 {
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        DVec3::new(cp * cy, cp * sy, -sp)
    }

    /// Great-circle angle in degrees between this and another view direction.
    ///
    /// Always in [0, 180] and symmetric; yaw wrap-around at ±180 has no effect.
    pub fn angular_distance(&self, other: &ViewAngles) -> f64 {
        crate::angles::angle_between_deg(self.direction(), other.direction())
    }
}
