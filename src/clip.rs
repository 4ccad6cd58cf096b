use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Fps;
use crate::foundation::error::{StrobeError, StrobeResult};
use crate::model::frame::Frame;
use crate::playback::player::Player;
use crate::playback::scheduler::Scheduler;

/// A frame sequence and its playback rate, as stored on disk.
///
/// ```json
/// { "fps": 4, "repeat": 2, "frames": [ { "width": 60, "height": 60, "colors": [[0, 0, 255]] } ] }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Clip {
    /// Playback rate.
    pub fps: Fps,
    /// Frames in order.
    pub frames: Vec<Frame>,
    /// How many times the frame list is played back to back.
    #[serde(default = "one")]
    pub repeat: u32,
}

/// Upper bound on `frames.len() * repeat`.
pub const MAX_SEQUENCE_FRAMES: usize = 1_000_000;

fn one() -> u32 {
    1
}

impl Clip {
    /// Parse a clip from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> StrobeResult<Self> {
        serde_json::from_reader(r).map_err(|e| StrobeError::serde(format!("parse clip JSON: {e}")))
    }

    /// Parse a clip from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> StrobeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StrobeError::validation(format!("open clip JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check invariants that serde alone does not enforce.
    pub fn validate(&self) -> StrobeResult<()> {
        if self.frames.is_empty() {
            return Err(StrobeError::validation("clip must contain at least one frame"));
        }
        if self.repeat == 0 {
            return Err(StrobeError::validation("clip repeat must be >= 1"));
        }
        match self.frames.len().checked_mul(self.repeat as usize) {
            Some(total) if total <= MAX_SEQUENCE_FRAMES => Ok(()),
            _ => Err(StrobeError::validation(format!(
                "clip expands to more than {MAX_SEQUENCE_FRAMES} frames ({} x {})",
                self.frames.len(),
                self.repeat
            ))),
        }
    }

    /// The expanded frame list (`frames` repeated `repeat` times).
    ///
    /// Call [`Clip::validate`] first; the size is only bounded for validated clips.
    pub fn sequence(&self) -> Vec<Frame> {
        let mut out = Vec::with_capacity(self.frames.len() * self.repeat as usize);
        for _ in 0..self.repeat {
            out.extend(self.frames.iter().cloned());
        }
        out
    }

    /// Build a player for this clip.
    pub fn player<S: Scheduler>(&self, scheduler: S) -> StrobeResult<Player<S>> {
        self.validate()?;
        Ok(Player::with_scheduler(self.sequence(), self.fps, scheduler))
    }
}
