use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::model::color::Rgb;
use crate::playback::scheduler::ManualScheduler;
use crate::surface::raster::RasterSurface;
use crate::surface::Surface;
use crate::surface::shared;

#[derive(Clone, Debug, PartialEq)]
enum Event {
    Play,
    Frame(usize),
    Finish,
    Error(String, usize),
}

#[derive(Clone, Default)]
struct Log(Rc<RefCell<Vec<Event>>>);

impl Log {
    fn push(&self, e: Event) {
        self.0.borrow_mut().push(e);
    }

    fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

const PALETTE: [(u8, u8, u8); 4] = [(0, 0, 255), (0, 255, 0), (255, 0, 0), (0, 0, 0)];

fn frames(n: usize) -> Vec<Frame> {
    (0..n)
        .map(|i| {
            let (r, g, b) = PALETTE[i % PALETTE.len()];
            Frame::solid(4, 4, Rgb::from_rgb8(r, g, b)).unwrap()
        })
        .collect()
}

fn player(n: usize) -> (Player<ManualScheduler>, ManualScheduler) {
    let clock = ManualScheduler::new();
    let p = Player::with_scheduler(frames(n), Fps::whole(4).unwrap(), clock.clone());
    (p, clock)
}

fn wire(p: &mut Player<ManualScheduler>, log: &Log) {
    let l = log.clone();
    p.on_play(move |_| l.push(Event::Play));
    let l = log.clone();
    p.on_frame(move |_, idx, _| l.push(Event::Frame(idx)));
    let l = log.clone();
    p.on_finish(move |_| l.push(Event::Finish));
    let l = log.clone();
    p.on_error(move |_, err, idx| l.push(Event::Error(err.to_string(), idx)));
}

fn surface() -> (Rc<RefCell<RasterSurface>>, SharedSurface) {
    let raster = shared(RasterSurface::new(4, 4));
    let dyn_surface: SharedSurface = raster.clone();
    (raster, dyn_surface)
}

#[test]
fn derived_properties() {
    let (p, _) = player(4);
    assert_eq!(p.length(), 1.0);
    assert_eq!((p.width(), p.height()), (4, 4));
    assert_eq!(p.frame_duration(), Duration::from_millis(250));
    assert_eq!(p.cursor(), 0);
    assert!(!p.is_running());
    assert_eq!(p.state(), PlaybackState::Idle);

    let (empty, _) = player(0);
    assert_eq!(empty.length(), 0.0);
    assert_eq!((empty.width(), empty.height()), (0, 0));
}

#[test]
fn length_scales_with_fps() {
    let p = Player::with_scheduler(frames(48), Fps::whole(4).unwrap(), ManualScheduler::new());
    assert_eq!(p.length(), 12.0);

    let p = Player::with_scheduler(frames(10), Fps::whole(25).unwrap(), ManualScheduler::new());
    assert!((p.length() - 0.4).abs() < 1e-9);
}

#[tokio::test]
async fn play_fires_hooks_in_order() {
    let (mut p, clock) = player(4);
    let log = Log::default();
    wire(&mut p, &log);
    let (_, s) = surface();

    assert!(p.play(Some(s)).await);
    assert_eq!(
        log.take(),
        vec![
            Event::Play,
            Event::Frame(1),
            Event::Frame(2),
            Event::Frame(3),
            Event::Frame(4),
            Event::Finish,
        ]
    );
    assert_eq!(p.cursor(), 4);
    assert_eq!(p.state(), PlaybackState::Finished);
    assert_eq!(clock.sleeps(), vec![Duration::from_millis(250); 4]);
    assert_eq!(clock.elapsed(), Duration::from_secs(1));
}

#[tokio::test]
async fn play_paints_first_color_over_frame_rect() {
    let frame = Frame::new(
        2,
        2,
        vec![Rgb::from_rgb8(10, 20, 30), Rgb::from_rgb8(99, 99, 99)],
    )
    .unwrap();
    let mut p = Player::with_scheduler(vec![frame], Fps::whole(4).unwrap(), ManualScheduler::new());
    let (raster, s) = surface();
    raster.borrow_mut().fill_rect(0, 0, 4, 4, Rgb::from_rgb8(1, 1, 1));

    assert!(p.play(Some(s)).await);

    let r = raster.borrow();
    assert_eq!(r.pixel(1, 1), Some([10, 20, 30, 255]));
    // Outside the 2x2 frame the surface was blanked on entry and never painted.
    assert_eq!(r.pixel(3, 3), Some([0, 0, 0, 0]));
}

#[tokio::test]
async fn surface_is_blank_when_on_play_fires() {
    let (mut p, _) = player(2);
    let (raster, s) = surface();
    raster.borrow_mut().fill_rect(0, 0, 4, 4, Rgb::from_rgb8(7, 7, 7));

    let seen = Rc::new(RefCell::new(None));
    let probe = raster.clone();
    let out = seen.clone();
    p.on_play(move |_| *out.borrow_mut() = probe.borrow().pixel(0, 0));

    assert!(p.play(Some(s)).await);
    assert_eq!(*seen.borrow(), Some([0, 0, 0, 0]));
}

#[tokio::test]
async fn play_without_surface_reports_error() {
    let (mut p, _) = player(4);
    let log = Log::default();
    wire(&mut p, &log);

    assert!(!p.play(None).await);
    let events = log.take();
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], Event::Error(msg, 0) if msg.contains("no surface")));
    assert_eq!(p.state(), PlaybackState::Idle);
}

#[tokio::test]
async fn play_with_unavailable_scheduler_reports_error() {
    let mut p = Player::with_scheduler(
        frames(2),
        Fps::whole(4).unwrap(),
        ManualScheduler::unavailable(),
    );
    let log = Log::default();
    wire(&mut p, &log);
    let (_, s) = surface();

    assert!(!p.play(Some(s)).await);
    assert!(matches!(&log.take()[..], [Event::Error(msg, 0)] if msg.contains("scheduler")));
    assert!(p.surface().is_none());

    p.scheduler().set_available(true);
    let (_, s) = surface();
    assert!(p.play(Some(s)).await);
}

#[tokio::test]
async fn second_play_without_restart_is_rejected() {
    let (mut p, _) = player(3);
    let log = Log::default();
    wire(&mut p, &log);
    let (_, s) = surface();

    assert!(p.play(Some(s.clone())).await);
    log.take();

    assert!(!p.play(Some(s)).await);
    assert!(matches!(&log.take()[..], [Event::Error(msg, 3)] if msg.contains("already played")));
}

#[tokio::test]
async fn empty_sequence_counts_as_finished() {
    let (mut p, _) = player(0);
    let log = Log::default();
    wire(&mut p, &log);
    let (_, s) = surface();

    assert!(!p.play(Some(s)).await);
    assert!(matches!(&log.take()[..], [Event::Error(_, 0)]));
    assert_eq!(p.state(), PlaybackState::Finished);
}

#[tokio::test]
async fn pause_from_hook_then_resume_continues() {
    let (mut p, _) = player(4);
    let log = Log::default();
    wire(&mut p, &log);
    let l = log.clone();
    p.on_frame(move |p, idx, _| {
        l.push(Event::Frame(idx));
        if idx == 2 {
            p.pause();
        }
    });
    let (_, s) = surface();

    assert!(p.play(Some(s)).await);
    assert_eq!(
        log.take(),
        vec![Event::Play, Event::Frame(1), Event::Frame(2), Event::Finish]
    );
    assert_eq!(p.cursor(), 2);
    assert_eq!(p.state(), PlaybackState::Paused);
    assert!(!p.is_running());

    assert!(p.resume().await.unwrap());
    assert_eq!(
        log.take(),
        vec![Event::Frame(3), Event::Frame(4), Event::Finish]
    );
    assert_eq!(p.state(), PlaybackState::Finished);
}

#[tokio::test]
async fn resume_keeps_surface_contents() {
    let (mut p, _) = player(2);
    p.on_frame(|p, _, _| p.pause());
    let (raster, s) = surface();

    assert!(p.play(Some(s)).await);
    assert_eq!(raster.borrow().pixel(0, 0), Some([0, 0, 255, 255]));
    assert_eq!(raster.borrow().fill_count(), 1);

    assert!(p.resume().await.unwrap());
    assert_eq!(raster.borrow().pixel(0, 0), Some([0, 255, 0, 255]));
    assert_eq!(raster.borrow().fill_count(), 2);
}

#[tokio::test]
async fn resume_before_play_fails_without_hook() {
    let (mut p, _) = player(2);
    let log = Log::default();
    wire(&mut p, &log);

    let err = p.resume().await.unwrap_err();
    assert!(matches!(err, StrobeError::NeverPlayed));
    assert!(log.take().is_empty());
}

#[tokio::test]
async fn restart_replays_from_first_frame() {
    let (mut p, clock) = player(3);
    let log = Log::default();
    wire(&mut p, &log);
    let (_, s) = surface();

    assert!(p.play(Some(s)).await);
    log.take();

    assert!(p.restart().await);
    assert_eq!(
        log.take(),
        vec![
            Event::Play,
            Event::Frame(1),
            Event::Frame(2),
            Event::Frame(3),
            Event::Finish,
        ]
    );
    assert_eq!(clock.sleeps().len(), 6);
}

#[tokio::test]
async fn restart_midway_resets_cursor() {
    let (mut p, _) = player(4);
    p.on_frame(|p, idx, _| {
        if idx == 3 {
            p.pause();
        }
    });
    let (_, s) = surface();
    assert!(p.play(Some(s)).await);
    assert_eq!(p.cursor(), 3);

    let log = Log::default();
    wire(&mut p, &log);
    assert!(p.restart().await);
    let frames: Vec<_> = log
        .take()
        .into_iter()
        .filter_map(|e| match e {
            Event::Frame(i) => Some(i),
            _ => None,
        })
        .collect();
    assert_eq!(frames, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn restart_without_surface_reports_missing_surface() {
    let (mut p, _) = player(2);
    let log = Log::default();
    wire(&mut p, &log);

    assert!(!p.restart().await);
    assert!(matches!(&log.take()[..], [Event::Error(msg, 0)] if msg.contains("no surface")));
}

#[tokio::test]
async fn hooks_replace_rather_than_chain() {
    let (mut p, _) = player(1);
    let log = Log::default();
    let l = log.clone();
    p.on_finish(move |_| l.push(Event::Error("first".into(), 0)));
    let l = log.clone();
    p.on_finish(move |_| l.push(Event::Finish));
    let (_, s) = surface();

    assert!(p.play(Some(s)).await);
    assert_eq!(log.take(), vec![Event::Finish]);

    p.clear_hooks();
    assert!(p.restart().await);
    assert!(log.take().is_empty());
}

#[tokio::test]
async fn state_is_playing_inside_frame_hook() {
    let (mut p, _) = player(2);
    let states = Rc::new(RefCell::new(Vec::new()));
    let out = states.clone();
    p.on_frame(move |p, _, _| out.borrow_mut().push(p.state()));
    let (_, s) = surface();

    assert!(p.play(Some(s)).await);
    assert_eq!(*states.borrow(), vec![PlaybackState::Playing; 2]);
}

#[test]
fn pause_is_a_no_op_when_idle() {
    let (p, _) = player(2);
    p.pause();
    p.control().pause();
    assert_eq!(p.state(), PlaybackState::Idle);
    assert_eq!(p.cursor(), 0);
}

#[test]
fn runtime_without_timers_reports_unavailable_scheduler() {
    let errors = Rc::new(RefCell::new(Vec::new()));
    let out = errors.clone();
    let mut p = Player::new(frames(2), Fps::whole(4).unwrap());
    p.on_error(move |_, err, idx| out.borrow_mut().push((err.to_string(), idx)));
    let (raster, s) = surface();

    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    assert!(!rt.block_on(p.play(Some(s))));

    let errors = errors.borrow();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].0.contains("scheduler"));
    assert_eq!(errors[0].1, 0);
    assert_eq!(raster.borrow().fill_count(), 0);
    assert_eq!(p.state(), PlaybackState::Idle);
}
