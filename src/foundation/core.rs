use std::time::Duration;

use crate::foundation::error::{StrobeError, StrobeResult};

/// Frame width used when a frame does not specify one.
pub const DEFAULT_FRAME_WIDTH: u32 = 640;
/// Frame height used when a frame does not specify one.
pub const DEFAULT_FRAME_HEIGHT: u32 = 480;

/// Playback rate as a rational `num / den` frames per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be > 0.
    pub den: u32,
}

impl Fps {
    /// Build a rate, rejecting zero numerator or denominator.
    pub fn new(num: u32, den: u32) -> StrobeResult<Self> {
        if den == 0 {
            return Err(StrobeError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(StrobeError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Whole frames per second.
    pub fn whole(fps: u32) -> StrobeResult<Self> {
        Self::new(fps, 1)
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Seconds each frame stays on screen.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Milliseconds each frame stays on screen (`1000 / fps`).
    pub fn frame_duration_ms(self) -> f64 {
        self.frame_duration_secs() * 1000.0
    }

    /// Per-frame suspension as a [`Duration`].
    pub fn frame_duration(self) -> Duration {
        Duration::from_secs_f64(self.frame_duration_secs())
    }

    /// Seconds covered by `frames` frames.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }
}

impl<'de> serde::Deserialize<'de> for Fps {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Whole(u32),
            Ratio { num: u32, den: u32 },
        }

        let (num, den) = match Repr::deserialize(deserializer)? {
            Repr::Whole(num) => (num, 1),
            Repr::Ratio { num, den } => (num, den),
        };
        Fps::new(num, den).map_err(serde::de::Error::custom)
    }
}
