//! Paint targets for playback.

use std::cell::RefCell;
use std::rc::Rc;

use crate::model::color::Rgb;

pub(crate) mod raster;

/// Paint target contract used by the player.
///
/// The player only ever blanks a rectangle and fills a rectangle with a solid color. Coordinates
/// are in pixels; implementations clip anything outside their own bounds.
pub trait Surface {
    /// Surface width in pixels.
    fn width(&self) -> u32;
    /// Surface height in pixels.
    fn height(&self) -> u32;
    /// Blank a rectangular region.
    fn clear(&mut self, x: u32, y: u32, width: u32, height: u32);
    /// Paint a solid rectangle.
    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgb);
}

/// Caller-owned surface handle that a player keeps as its last bound target.
///
/// The player never constructs or drops the surface itself; it borrows it mutably only for the
/// span of a single clear or fill call.
pub type SharedSurface = Rc<RefCell<dyn Surface>>;

/// Wrap a surface into a [`SharedSurface`], keeping a typed handle for the caller.
///
/// ```
/// use strobe::{RasterSurface, SharedSurface, Surface, shared};
///
/// let raster = shared(RasterSurface::new(4, 4));
/// let for_player: SharedSurface = raster.clone();
/// assert_eq!(for_player.borrow().width(), 4);
/// ```
pub fn shared<S: Surface + 'static>(surface: S) -> Rc<RefCell<S>> {
    Rc::new(RefCell::new(surface))
}
