use std::fmt;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Corner roundness chosen by the user, as a percentage of the largest
/// radius an image can take. Independent of any image's dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct RadiusPercent(u8);

impl RadiusPercent {
    pub const MIN: RadiusPercent = RadiusPercent(0);
    pub const MAX: RadiusPercent = RadiusPercent(100);
    pub const DEFAULT: RadiusPercent = RadiusPercent(50);

    /// Values above 100 are clamped to 100.
    pub fn new(percent: u8) -> Self {
        if percent > 100 {
            warn!("Radius percent {percent} is above 100, clamping");
            return Self::MAX;
        }
        Self(percent)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Pixel radius for an image of the given size.
    pub fn pixels(self, width: u32, height: u32) -> f32 {
        compute(width, height, self)
    }
}

impl Default for RadiusPercent {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for RadiusPercent {
    type Error = anyhow::Error;

    fn try_from(value: i64) -> Result<Self> {
        if !(0..=100).contains(&value) {
            bail!("Radius percent must be between 0 and 100, got {value}");
        }
        Ok(Self(value as u8))
    }
}

impl From<RadiusPercent> for u8 {
    fn from(value: RadiusPercent) -> Self {
        value.0
    }
}

impl fmt::Display for RadiusPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Largest usable corner radius: half the shortest side, which turns the
/// rounded rectangle into a circle (square images) or a stadium/oval.
pub fn max_radius(width: u32, height: u32) -> f32 {
    width.min(height) as f32 / 2.0
}

/// `(percent / 100) * (min(width, height) / 2)`. Zero-sized images give 0.
pub fn compute(width: u32, height: u32, percent: RadiusPercent) -> f32 {
    (percent.get() as f32 / 100.0) * max_radius(width, height)
}
