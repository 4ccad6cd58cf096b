use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{StrobeError, StrobeResult};
use crate::model::color::Rgb;
use crate::surface::Surface;

/// In-memory RGBA8 surface (straight alpha).
///
/// `clear` resets pixels to transparent black, `fill_rect` writes opaque pixels. Both clip to the
/// surface bounds.
#[derive(Clone, Debug)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
    fills: u64,
}

impl RasterSurface {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; buffer_len(width, height)],
            fills: 0,
        }
    }

    /// Resize the surface, discarding its contents.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(buffer_len(width, height), 0);
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.data[i..i + 4]);
        Some(px)
    }

    /// Number of `fill_rect` calls seen since creation.
    pub fn fill_count(&self) -> u64 {
        self.fills
    }

    /// Write the current contents as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> StrobeResult<()> {
        let path = path.as_ref();
        if self.width == 0 || self.height == 0 {
            return Err(StrobeError::validation(
                "cannot snapshot a zero-sized surface",
            ));
        }
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    fn write_rect(&mut self, x: u32, y: u32, width: u32, height: u32, px: [u8; 4]) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        if x >= x_end || y >= y_end {
            return;
        }
        for row in y..y_end {
            let start = self.index(x, row);
            let end = self.index(x_end, row);
            for chunk in self.data[start..end].chunks_exact_mut(4) {
                chunk.copy_from_slice(&px);
            }
        }
    }
}

fn buffer_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self, x: u32, y: u32, width: u32, height: u32) {
        self.write_rect(x, y, width, height, [0, 0, 0, 0]);
    }

    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgb) {
        self.fills += 1;
        self.write_rect(x, y, width, height, color.to_rgba8());
    }
}
