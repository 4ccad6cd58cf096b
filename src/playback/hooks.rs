use std::fmt;

use crate::foundation::error::StrobeError;
use crate::model::frame::Frame;
use crate::playback::player::Player;

pub(crate) type LifecycleHook<S> = Box<dyn Fn(&Player<S>)>;
pub(crate) type ErrorHook<S> = Box<dyn Fn(&Player<S>, &StrobeError, usize)>;
pub(crate) type FrameHook<S> = Box<dyn Fn(&Player<S>, usize, &Frame)>;

/// Single-slot callbacks. Assigning a slot replaces its previous handler; empty slots are no-ops.
pub(crate) struct Hooks<S> {
    pub(crate) on_play: Option<LifecycleHook<S>>,
    pub(crate) on_error: Option<ErrorHook<S>>,
    pub(crate) on_frame: Option<FrameHook<S>>,
    pub(crate) on_finish: Option<LifecycleHook<S>>,
}

impl<S> Hooks<S> {
    pub(crate) fn new() -> Self {
        Self {
            on_play: None,
            on_error: None,
            on_frame: None,
            on_finish: None,
        }
    }

    pub(crate) fn play(&self, player: &Player<S>) {
        if let Some(hook) = &self.on_play {
            hook(player);
        }
    }

    pub(crate) fn error(&self, player: &Player<S>, err: &StrobeError, frame: usize) {
        if let Some(hook) = &self.on_error {
            hook(player, err, frame);
        }
    }

    pub(crate) fn frame(&self, player: &Player<S>, index: usize, frame: &Frame) {
        if let Some(hook) = &self.on_frame {
            hook(player, index, frame);
        }
    }

    pub(crate) fn finish(&self, player: &Player<S>) {
        if let Some(hook) = &self.on_finish {
            hook(player);
        }
    }
}

impl<S> fmt::Debug for Hooks<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_play", &self.on_play.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_frame", &self.on_frame.is_some())
            .field("on_finish", &self.on_finish.is_some())
            .finish()
    }
}
