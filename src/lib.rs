//! Strobe plays precomputed sequences of solid-color frames onto a raster surface at a fixed
//! frame rate.
//!
//! The moving parts:
//!
//! - [`Rgb`] and [`Frame`]: immutable color and frame values. A frame carries a list of colors but
//!   playback paints only the first one over the whole frame rectangle.
//! - [`Player`]: the playback engine. It owns the frame list and a cursor, and drives the
//!   paint/advance/sleep loop behind `play`, `pause`, `resume` and `restart`, reporting progress
//!   through single-slot hooks.
//! - [`Surface`]: the paint target contract. [`RasterSurface`] is an in-memory RGBA8 target that
//!   can be snapshotted to PNG.
//! - [`Scheduler`]: the suspension point between frames. [`TokioScheduler`] sleeps on the tokio
//!   timer, [`ManualScheduler`] is a fake clock for tests and instant runs.
//! - [`Clip`]: frame sequences described as JSON.
//! - [`Supervisor`]: a bounded driver that plays a sequence a fixed number of times.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod clip;
mod driver;
mod foundation;
mod model;
mod playback;
mod surface;

pub use crate::clip::{Clip, MAX_SEQUENCE_FRAMES};
pub use crate::driver::{Supervisor, SupervisorOpts, SupervisorReport, demo_frames};
pub use crate::foundation::core::{DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH, Fps};
pub use crate::foundation::error::{StrobeError, StrobeResult};
pub use crate::model::color::Rgb;
pub use crate::model::frame::Frame;
pub use crate::playback::player::{PlaybackControl, PlaybackState, Player};
pub use crate::playback::scheduler::{ManualScheduler, Scheduler, TokioScheduler};
pub use crate::surface::raster::RasterSurface;
pub use crate::surface::{SharedSurface, Surface, shared};
