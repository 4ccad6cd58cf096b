use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::foundation::core::Fps;
use crate::foundation::error::{StrobeError, StrobeResult};
use crate::model::frame::Frame;
use crate::playback::hooks::Hooks;
use crate::playback::scheduler::{Scheduler, TokioScheduler};
use crate::surface::SharedSurface;

/// Observable playback state, derived from the player's cursor, running flag and bound surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// Never bound to a surface.
    Idle,
    /// The advance loop is running.
    Playing,
    /// Stopped before the last frame; `resume` continues from the cursor.
    Paused,
    /// Every frame has been shown; only `restart` plays again.
    Finished,
}

/// Cloneable pause switch for a player whose `play`/`resume` call is in flight.
///
/// Pausing is cooperative: the loop notices on its next wake, after the current frame's sleep.
#[derive(Clone, Debug)]
pub struct PlaybackControl {
    running: Arc<AtomicBool>,
}

impl PlaybackControl {
    /// Ask the advance loop to stop after the current frame.
    pub fn pause(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Current value of the running flag.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Fixed-rate playback engine for a sequence of solid-color frames.
///
/// `play` binds a surface, blanks it, then paints one frame per tick until the sequence ends or
/// the player is paused. The playback entry points take `&mut self`, so only one advance loop per
/// player can be in flight; hooks and [`PlaybackControl`] can still pause it.
///
/// Precondition failures never propagate out of `play`/`restart`: they go to the `on_error`
/// hook along with the current cursor and the call returns `false`. `resume` on a player that was
/// never bound to a surface is the exception and returns [`StrobeError::NeverPlayed`] directly.
///
/// `on_finish` fires once at the end of every `play`/`resume` call that ran the loop, including
/// calls that stopped early because of `pause`. Dropping an in-flight call (for example under
/// `tokio::time::timeout`) leaves the player paused at its cursor without firing `on_finish`.
///
/// ```
/// use strobe::{Fps, Frame, ManualScheduler, Player, RasterSurface, Rgb, shared};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let frames = vec![
///     Frame::solid(2, 2, Rgb::from_rgb8(255, 0, 0)).unwrap(),
///     Frame::solid(2, 2, Rgb::from_rgb8(0, 0, 255)).unwrap(),
/// ];
/// let mut player = Player::with_scheduler(frames, Fps::whole(4).unwrap(), ManualScheduler::new());
/// let surface = shared(RasterSurface::new(2, 2));
///
/// assert!(player.play(Some(surface.clone())).await);
/// assert_eq!(surface.borrow().pixel(0, 0), Some([0, 0, 255, 255]));
/// # });
/// ```
pub struct Player<S = TokioScheduler> {
    frames: Vec<Frame>,
    fps: Fps,
    cursor: usize,
    running: Arc<AtomicBool>,
    looping: Rc<Cell<bool>>,
    surface: Option<SharedSurface>,
    hooks: Hooks<S>,
    scheduler: S,
}

impl Player<TokioScheduler> {
    /// Player that sleeps on the tokio timer.
    pub fn new(frames: Vec<Frame>, fps: Fps) -> Self {
        Self::with_scheduler(frames, fps, TokioScheduler)
    }
}

impl<S: Scheduler> Player<S> {
    /// Player with an explicit scheduler.
    pub fn with_scheduler(frames: Vec<Frame>, fps: Fps, scheduler: S) -> Self {
        Self {
            frames,
            fps,
            cursor: 0,
            running: Arc::new(AtomicBool::new(false)),
            looping: Rc::new(Cell::new(false)),
            surface: None,
            hooks: Hooks::new(),
            scheduler,
        }
    }

    /// Set the hook fired after the surface is blanked and before the first frame of `play`.
    pub fn on_play(&mut self, hook: impl Fn(&Player<S>) + 'static) -> &mut Self {
        self.hooks.on_play = Some(Box::new(hook));
        self
    }

    /// Set the hook fired for precondition failures, with the cursor at the time of failure.
    pub fn on_error(
        &mut self,
        hook: impl Fn(&Player<S>, &StrobeError, usize) + 'static,
    ) -> &mut Self {
        self.hooks.on_error = Some(Box::new(hook));
        self
    }

    /// Set the hook fired after each frame is painted, with the 1-based index of that frame.
    pub fn on_frame(&mut self, hook: impl Fn(&Player<S>, usize, &Frame) + 'static) -> &mut Self {
        self.hooks.on_frame = Some(Box::new(hook));
        self
    }

    /// Set the hook fired when a `play`/`resume` call leaves the advance loop.
    pub fn on_finish(&mut self, hook: impl Fn(&Player<S>) + 'static) -> &mut Self {
        self.hooks.on_finish = Some(Box::new(hook));
        self
    }

    /// Remove every hook.
    pub fn clear_hooks(&mut self) {
        self.hooks = Hooks::new();
    }

    /// Frames in playback order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Configured rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Time each frame stays on screen.
    pub fn frame_duration(&self) -> Duration {
        self.fps.frame_duration()
    }

    /// Total playback length in seconds (0 for an empty sequence).
    pub fn length(&self) -> f64 {
        if self.frames.is_empty() {
            return 0.0;
        }
        self.fps.frames_to_secs(self.frames.len() as u64)
    }

    /// Width of the first frame (0 for an empty sequence).
    pub fn width(&self) -> u32 {
        self.frames.first().map_or(0, Frame::width)
    }

    /// Height of the first frame (0 for an empty sequence).
    pub fn height(&self) -> u32 {
        self.frames.first().map_or(0, Frame::height)
    }

    /// Index of the next frame to paint.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current value of the running flag.
    ///
    /// The flag is left set when a sequence plays to the end; use [`Player::state`] to tell a
    /// finished player from a playing one.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Derived playback state.
    pub fn state(&self) -> PlaybackState {
        if self.looping.get() {
            PlaybackState::Playing
        } else if self.surface.is_none() {
            PlaybackState::Idle
        } else if self.cursor >= self.frames.len() {
            PlaybackState::Finished
        } else {
            PlaybackState::Paused
        }
    }

    /// Last surface bound by `play`.
    pub fn surface(&self) -> Option<&SharedSurface> {
        self.surface.as_ref()
    }

    /// The scheduler used between frames.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Pause switch that can be used while a `play`/`resume` call is in flight.
    pub fn control(&self) -> PlaybackControl {
        PlaybackControl {
            running: Arc::clone(&self.running),
        }
    }

    /// Clear the running flag. The cursor is kept; calling this when not playing has no effect.
    pub fn pause(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Bind `surface`, blank it and play from the cursor.
    ///
    /// Returns `false` after reporting through `on_error` when the surface is missing, the
    /// scheduler is unavailable, or the sequence already played to the end. Otherwise returns
    /// `true` once the loop exits, either at the end of the sequence or because of a pause.
    #[tracing::instrument(level = "debug", skip_all, fields(frames = self.frames.len(), cursor = self.cursor))]
    pub async fn play(&mut self, surface: Option<SharedSurface>) -> bool {
        let Some(surface) = surface else {
            return self.reject(StrobeError::MissingSurface);
        };
        if !self.scheduler.is_available() {
            return self.reject(StrobeError::SchedulerUnavailable);
        }

        self.surface = Some(Rc::clone(&surface));
        if self.cursor >= self.frames.len() {
            return self.reject(StrobeError::AlreadyFinished);
        }

        self.running.store(true, Ordering::SeqCst);
        {
            let mut target = surface.borrow_mut();
            let (w, h) = (target.width(), target.height());
            target.clear(0, 0, w, h);
        }

        tracing::debug!(fps = self.fps.as_f64(), "playback started");
        self.hooks.play(self);
        self.advance(&surface).await;
        self.finish();
        true
    }

    /// Continue from the cursor on the last bound surface, without blanking it or firing
    /// `on_play`. Returns `Ok(true)` once the loop exits.
    #[tracing::instrument(level = "debug", skip_all, fields(cursor = self.cursor))]
    pub async fn resume(&mut self) -> StrobeResult<bool> {
        let Some(surface) = self.surface.clone() else {
            return Err(StrobeError::NeverPlayed);
        };

        self.running.store(true, Ordering::SeqCst);
        self.advance(&surface).await;
        self.finish();
        Ok(true)
    }

    /// Rewind to the first frame and `play` on the last bound surface.
    ///
    /// A player that was never bound reports [`StrobeError::MissingSurface`] exactly like
    /// `play(None)`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn restart(&mut self) -> bool {
        self.cursor = 0;
        self.running.store(false, Ordering::SeqCst);
        let surface = self.surface.clone();
        self.play(surface).await
    }

    async fn advance(&mut self, surface: &SharedSurface) {
        let duration = self.fps.frame_duration();
        let mut guard = LoopGuard::enter(&self.looping, &self.running);

        while self.is_running() && self.cursor < self.frames.len() {
            let at = self.cursor;
            self.cursor += 1;

            let frame = &self.frames[at];
            let color = frame.fill_color();
            surface
                .borrow_mut()
                .fill_rect(0, 0, self.width(), self.height(), color);
            tracing::trace!(frame = self.cursor, %color, "painted frame");

            self.hooks.frame(self, self.cursor, frame);
            self.scheduler.sleep(duration).await;
        }

        guard.completed = true;
    }

    fn finish(&self) {
        tracing::debug!(
            cursor = self.cursor,
            frames = self.frames.len(),
            completed = self.cursor >= self.frames.len(),
            "playback loop exited"
        );
        self.hooks.finish(self);
    }

    fn reject(&self, err: StrobeError) -> bool {
        debug_assert!(err.is_precondition(), "only precondition failures go to on_error");
        tracing::warn!(cursor = self.cursor, error = %err, "playback rejected");
        self.hooks.error(self, &err, self.cursor);
        false
    }
}

/// Marks the advance loop as active for as long as it lives.
///
/// A loop cut short by dropping its future also clears the running flag, so the player reads as
/// paused rather than playing.
struct LoopGuard {
    looping: Rc<Cell<bool>>,
    running: Arc<AtomicBool>,
    completed: bool,
}

impl LoopGuard {
    fn enter(looping: &Rc<Cell<bool>>, running: &Arc<AtomicBool>) -> Self {
        looping.set(true);
        Self {
            looping: Rc::clone(looping),
            running: Arc::clone(running),
            completed: false,
        }
    }
}

impl Drop for LoopGuard {
    fn drop(&mut self) {
        self.looping.set(false);
        if !self.completed {
            self.running.store(false, Ordering::SeqCst);
            tracing::debug!("playback loop dropped before exiting");
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for Player<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("frames", &self.frames.len())
            .field("fps", &self.fps)
            .field("cursor", &self.cursor)
            .field("running", &self.running.load(Ordering::SeqCst))
            .field("looping", &self.looping.get())
            .field("surface", &self.surface.is_some())
            .field("hooks", &self.hooks)
            .field("scheduler", &self.scheduler)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/player.rs"]
mod tests;
