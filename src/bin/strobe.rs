use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use strobe::{
    Clip, Fps, ManualScheduler, RasterSurface, Scheduler, Supervisor, SupervisorOpts,
    TokioScheduler,
};

#[derive(Parser, Debug)]
#[command(name = "strobe", version)]
struct Cli {
    /// Log every frame (debug level).
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a clip JSON onto an in-memory surface.
    Play(PlayArgs),
    /// Play the built-in blue/green/red/black sequence a fixed number of times.
    Demo(DemoArgs),
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input clip JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Write the final surface as a PNG.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Use a virtual clock instead of sleeping between frames.
    #[arg(long, default_value_t = false)]
    instant: bool,
}

#[derive(Parser, Debug)]
struct DemoArgs {
    /// Number of playbacks.
    #[arg(long, default_value_t = 1)]
    cycles: u32,

    /// Frames per second.
    #[arg(long, default_value_t = 4)]
    fps: u32,

    /// Frame width and height in pixels.
    #[arg(long, default_value_t = 60)]
    size: u32,

    /// Pause between playbacks, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    gap_ms: u64,

    /// Write `cycle_NNN.png` snapshots into this directory.
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Use a virtual clock instead of sleeping between frames.
    #[arg(long, default_value_t = false)]
    instant: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Command::Play(args) => cmd_play(args).await,
        Command::Demo(args) => cmd_demo(args).await,
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let clip = Clip::from_path(&args.in_path)
        .with_context(|| format!("load clip '{}'", args.in_path.display()))?;
    clip.validate()?;

    if args.instant {
        play_clip(&clip, ManualScheduler::new(), args.snapshot).await
    } else {
        play_clip(&clip, TokioScheduler, args.snapshot).await
    }
}

async fn play_clip<S: Scheduler>(
    clip: &Clip,
    scheduler: S,
    snapshot: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut player = clip.player(scheduler)?;
    let surface = strobe::shared(RasterSurface::new(player.width(), player.height()));

    let failure = Rc::new(RefCell::new(None::<String>));
    let sink = failure.clone();
    player
        .on_frame(|_, frame, f| tracing::debug!(frame, color = %f.fill_color(), "frame"))
        .on_error(move |_, err, frame| {
            *sink.borrow_mut() = Some(format!("frame {frame}: {err}"));
        });

    if !player.play(Some(surface.clone())).await {
        let msg = failure.borrow_mut().take().unwrap_or_default();
        anyhow::bail!("playback failed at {msg}");
    }

    if let Some(out) = snapshot {
        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        surface.borrow().save_png(&out)?;
        eprintln!("wrote {}", out.display());
    }

    eprintln!(
        "played {} frames ({:.2}s at {} fps)",
        player.cursor(),
        player.length(),
        player.fps().as_f64()
    );
    Ok(())
}

async fn cmd_demo(args: DemoArgs) -> anyhow::Result<()> {
    let frames = strobe::demo_frames(args.size, args.size)?;
    let fps = Fps::whole(args.fps)?;
    let opts = SupervisorOpts {
        cycles: args.cycles,
        gap: Duration::from_millis(args.gap_ms),
        snapshot_dir: args.snapshot_dir.clone(),
    };
    let surface = strobe::shared(RasterSurface::new(args.size, args.size));

    let report = if args.instant {
        Supervisor::new(frames, fps, ManualScheduler::new(), opts)
            .run(&surface)
            .await?
    } else {
        Supervisor::new(frames, fps, TokioScheduler, opts)
            .run(&surface)
            .await?
    };

    eprintln!(
        "ran {} cycles ({} played, {} frames painted)",
        report.cycles_run, report.cycles_played, report.frames_painted
    );
    if let Some(dir) = args.snapshot_dir {
        eprintln!("wrote snapshots to {}", dir.display());
    }
    Ok(())
}
