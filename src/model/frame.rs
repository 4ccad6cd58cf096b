use serde::{Deserialize, Serialize};

use crate::foundation::core::{DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH};
use crate::foundation::error::{StrobeError, StrobeResult};
use crate::model::color::Rgb;

/// One step of a sequence: dimensions plus an ordered list of colors.
///
/// Playback paints a single representative color per frame, the first entry of `colors`, over the
/// whole `width x height` rectangle. The remaining entries are carried but not rendered.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame {
    width: u32,
    height: u32,
    colors: Vec<Rgb>,
}

impl Frame {
    /// Build a frame. Dimensions must be positive and `colors` non-empty.
    pub fn new(width: u32, height: u32, colors: Vec<Rgb>) -> StrobeResult<Self> {
        if width == 0 || height == 0 {
            return Err(StrobeError::validation(format!(
                "frame dimensions must be positive, got {width}x{height}"
            )));
        }
        if colors.is_empty() {
            return Err(StrobeError::validation("frame must carry at least one color"));
        }
        Ok(Self {
            width,
            height,
            colors,
        })
    }

    /// Single-color frame at the given size.
    pub fn solid(width: u32, height: u32, color: Rgb) -> StrobeResult<Self> {
        Self::new(width, height, vec![color])
    }

    /// Single-color frame at the default 640x480 size.
    pub fn solid_default(color: Rgb) -> Self {
        Self {
            width: DEFAULT_FRAME_WIDTH,
            height: DEFAULT_FRAME_HEIGHT,
            colors: vec![color],
        }
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// All colors carried by the frame, in order.
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// The color painted for this frame.
    pub fn fill_color(&self) -> Rgb {
        self.colors[0]
    }
}

impl<'de> Deserialize<'de> for Frame {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct FrameDef {
            #[serde(default = "default_width")]
            width: u32,
            #[serde(default = "default_height")]
            height: u32,
            colors: Vec<Rgb>,
        }

        fn default_width() -> u32 {
            DEFAULT_FRAME_WIDTH
        }

        fn default_height() -> u32 {
            DEFAULT_FRAME_HEIGHT
        }

        let def = FrameDef::deserialize(deserializer)?;
        Frame::new(def.width, def.height, def.colors).map_err(serde::de::Error::custom)
    }
}
