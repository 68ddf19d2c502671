//! Frame scheduling and idle handling.
//!
//! Runs the renderer at a fixed frame period. Frame rate takes priority
//! over catching up: a slow cycle is never compensated by a shorter one.
//! When nothing is fading and no command is queued the loop lowers the
//! wake signal and blocks until a producer raises it.

use embassy_time::{Duration, Instant};
use log::{debug, info, warn};

use crate::PixelSink;
use crate::color::Rgb;
use crate::power::PowerSwitch;
use crate::renderer::{RenderResult, Renderer};
use crate::snapshot::FrameHandle;
use crate::wake::WakeSignal;

/// Render loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Ticking every frame period
    Running,
    /// Blocked on the wake signal
    Idle,
}

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// Outcome of the render step
    pub render: RenderResult,
    /// Whether the frame reached the sink
    pub flushed: bool,
    /// How long to wait until the next frame (zero if the cycle overran).
    pub sleep_duration: Duration,
}

/// Time left in a frame period after `elapsed` of processing
pub fn frame_sleep(frame_duration: Duration, elapsed: Duration) -> Duration {
    frame_duration
        .checked_sub(elapsed)
        .unwrap_or(Duration::from_ticks(0))
}

/// Frame duration for `frame_rate` frames per second
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn frame_duration(frame_rate: f64) -> Duration {
    Duration::from_micros((1_000_000.0 / frame_rate) as u64)
}

/// Fixed-rate render loop
///
/// # Usage
///
/// ```ignore
/// let scheduler = FrameScheduler::new(renderer, sink, &WAKE, frame_duration(40.0));
/// std::thread::spawn(move || scheduler.run());
/// ```
pub struct FrameScheduler<'a, O: PixelSink, P: PowerSwitch, const N: usize> {
    output: O,
    renderer: Renderer<'a, P, N>,
    wake: &'a WakeSignal,
    frames: Option<FrameHandle>,
    frame_duration: Duration,
    frame: Vec<Rgb>,
    state: LoopState,
}

impl<'a, O: PixelSink, P: PowerSwitch, const N: usize> FrameScheduler<'a, O, P, N> {
    /// Create a scheduler in the running state
    pub fn new(
        renderer: Renderer<'a, P, N>,
        output: O,
        wake: &'a WakeSignal,
        frame_duration: Duration,
    ) -> Self {
        Self {
            output,
            renderer,
            wake,
            frames: None,
            frame_duration,
            frame: vec![Rgb::default(); N],
            state: LoopState::Running,
        }
    }

    /// Publish every flushed frame to `frames`
    #[must_use]
    pub fn with_frames(mut self, frames: FrameHandle) -> Self {
        self.frames = Some(frames);
        self
    }

    /// Process one frame and return timing information.
    ///
    /// This method:
    /// 1. Drains commands and advances fades
    /// 2. Writes the quantized frame to the output
    /// 3. Returns how long to sleep to hold the frame period
    pub fn tick(&mut self, started: Instant) -> FrameResult {
        let render = self.renderer.render();
        let flushed = self.flush();

        let elapsed = Instant::now()
            .checked_duration_since(started)
            .unwrap_or(Duration::from_ticks(0));

        FrameResult {
            render,
            flushed,
            sleep_duration: frame_sleep(self.frame_duration, elapsed),
        }
    }

    /// Decide the loop state after a frame
    ///
    /// With no active fades the PSU is reconciled again, which catches a
    /// fade that just finished dark. The loop only goes idle with an empty
    /// channel; the channel is checked again after lowering the signal so a
    /// command queued in between is not left waiting.
    pub fn settle(&mut self, any_active: bool) -> LoopState {
        self.state = LoopState::Running;
        if any_active {
            return self.state;
        }

        self.renderer.reconcile_power();
        if self.renderer.has_pending_commands() {
            return self.state;
        }

        self.wake.clear();
        if self.renderer.has_pending_commands() {
            return self.state;
        }

        info!("no active fades, render loop sleeping");
        self.state = LoopState::Idle;
        self.state
    }

    /// Run the loop forever on the current thread
    pub fn run(mut self) {
        info!("render loop started");
        loop {
            let started = Instant::now();
            let result = self.tick(started);
            std::thread::sleep(core::time::Duration::from_micros(
                result.sleep_duration.as_micros(),
            ));

            if self.settle(result.render.any_active) == LoopState::Idle {
                self.wake.wait();
                debug!("render loop woken");
                self.state = LoopState::Running;
            }
        }
    }

    /// Flush the current pixels to the output
    fn flush(&mut self) -> bool {
        self.renderer.pixels().fill_frame(&mut self.frame);
        if let Some(frames) = &self.frames {
            frames.publish(&self.frame);
        }
        match self.output.write(&self.frame) {
            Ok(()) => true,
            Err(err) => {
                warn!("unable to write frame: {}", err);
                false
            }
        }
    }

    pub const fn state(&self) -> LoopState {
        self.state
    }

    pub const fn renderer(&self) -> &Renderer<'a, P, N> {
        &self.renderer
    }

    pub const fn output(&self) -> &O {
        &self.output
    }
}
