use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Context as _;

use crate::foundation::core::Fps;
use crate::foundation::error::StrobeResult;
use crate::model::color::Rgb;
use crate::model::frame::Frame;
use crate::playback::player::Player;
use crate::playback::scheduler::Scheduler;
use crate::surface::raster::RasterSurface;
use crate::surface::{SharedSurface, Surface};

/// Colors cycled by [`demo_frames`]: blue, green, red, black.
const DEMO_PALETTE: [Rgb; 4] = [
    Rgb::from_rgb8(0, 0, 255),
    Rgb::from_rgb8(0, 255, 0),
    Rgb::from_rgb8(255, 0, 0),
    Rgb::from_rgb8(0, 0, 0),
];
const DEMO_ROUNDS: usize = 12;

/// The demo sequence: twelve rounds of blue, green, red, black at `width x height`.
pub fn demo_frames(width: u32, height: u32) -> StrobeResult<Vec<Frame>> {
    let mut frames = Vec::with_capacity(DEMO_ROUNDS * DEMO_PALETTE.len());
    for _ in 0..DEMO_ROUNDS {
        for color in DEMO_PALETTE {
            frames.push(Frame::solid(width, height, color)?);
        }
    }
    Ok(frames)
}

/// Options for [`Supervisor`].
#[derive(Clone, Debug)]
pub struct SupervisorOpts {
    /// Number of playbacks before the supervisor stops.
    pub cycles: u32,
    /// Pause between the end of one playback and the start of the next.
    pub gap: Duration,
    /// When set, the surface is written to `cycle_NNN.png` in this directory after each playback.
    pub snapshot_dir: Option<PathBuf>,
}

impl Default for SupervisorOpts {
    fn default() -> Self {
        Self {
            cycles: 1,
            gap: Duration::from_secs(1),
            snapshot_dir: None,
        }
    }
}

/// Summary of a [`Supervisor::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SupervisorReport {
    /// Playbacks attempted.
    pub cycles_run: u32,
    /// Playbacks whose `play` call returned `true`.
    pub cycles_played: u32,
    /// Frames painted across all cycles.
    pub frames_painted: u64,
}

/// Bounded driver: builds a fresh [`Player`] per cycle and plays the same sequence on one surface.
///
/// Each cycle resizes the surface to the sequence's frame size and paints it black before playing.
#[derive(Debug)]
pub struct Supervisor<S> {
    frames: Vec<Frame>,
    fps: Fps,
    scheduler: S,
    opts: SupervisorOpts,
}

impl<S: Scheduler + Clone> Supervisor<S> {
    /// Create a supervisor for `frames` at `fps`.
    pub fn new(frames: Vec<Frame>, fps: Fps, scheduler: S, opts: SupervisorOpts) -> Self {
        Self {
            frames,
            fps,
            scheduler,
            opts,
        }
    }

    /// Run every cycle, then stop.
    #[tracing::instrument(level = "info", skip_all, fields(cycles = self.opts.cycles))]
    pub async fn run(&self, surface: &Rc<RefCell<RasterSurface>>) -> StrobeResult<SupervisorReport> {
        let mut report = SupervisorReport::default();
        if let Some(dir) = &self.opts.snapshot_dir {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create snapshot dir '{}'", dir.display()))?;
        }

        for cycle in 0..self.opts.cycles {
            let mut player =
                Player::with_scheduler(self.frames.clone(), self.fps, self.scheduler.clone());
            attach_logging(&mut player, cycle);

            {
                let mut target = surface.borrow_mut();
                target.resize(player.width(), player.height());
                target.fill_rect(0, 0, player.width(), player.height(), Rgb::BLACK);
            }

            let painted_before = surface.borrow().fill_count();
            let target: SharedSurface = surface.clone();
            let played = player.play(Some(target)).await;

            report.cycles_run += 1;
            report.cycles_played += u32::from(played);
            report.frames_painted += surface.borrow().fill_count() - painted_before;

            if let Some(dir) = &self.opts.snapshot_dir {
                surface
                    .borrow()
                    .save_png(dir.join(format!("cycle_{cycle:03}.png")))?;
            }

            if cycle + 1 < self.opts.cycles {
                self.scheduler.sleep(self.opts.gap).await;
            }
        }

        tracing::info!(?report, "supervisor stopped");
        Ok(report)
    }
}

fn attach_logging<S: Scheduler>(player: &mut Player<S>, cycle: u32) {
    player
        .on_play(move |p| tracing::info!(cycle, length_secs = p.length(), "playing"))
        .on_error(move |_, err, frame| {
            tracing::warn!(cycle, frame, error = %err, "failed on frame");
        })
        .on_finish(move |p| tracing::info!(cycle, cursor = p.cursor(), "finished"));
}
