//! Request surface of the bridge
//!
//! Handles conversion of client requests to queued commands. Every enqueue
//! raises the wake signal so an idle render loop picks the work up on its
//! next cycle.

use std::sync::Arc;

use crate::arbitration::Arbitration;
use crate::color::{Rgb, from_rgb};
use crate::command::{Command, CommandSender, FadeEntry};
use crate::snapshot::{FrameHandle, FrameSnapshot};
use crate::wake::WakeSignal;

/// Producer-side handle shared by request handlers
#[derive(Clone)]
pub struct Bridge<'a> {
    commands: CommandSender<'a>,
    wake: &'a WakeSignal,
    frames: FrameHandle,
    arbitration: Arc<Arbitration>,
}

impl<'a> Bridge<'a> {
    pub fn new(
        commands: CommandSender<'a>,
        wake: &'a WakeSignal,
        frames: FrameHandle,
        arbitration: Arc<Arbitration>,
    ) -> Self {
        Self {
            commands,
            wake,
            frames,
            arbitration,
        }
    }

    /// Latest frame flushed by the render loop
    pub fn pixels(&self) -> FrameSnapshot {
        self.frames.latest()
    }

    /// Queue a command and wake the render loop
    ///
    /// Blocks while the command queue is full.
    pub fn submit(&self, command: Command) {
        self.commands.send(command);
        self.wake.set();
    }

    pub fn absolute_fade(&self, color: Rgb, indices: Vec<usize>, duration: f64) {
        self.submit(Command::AbsoluteFade {
            color: from_rgb(color),
            indices,
            duration,
        });
    }

    pub fn multi_command(&self, entries: Vec<FadeEntry>) {
        self.submit(Command::MultiCommand(entries));
    }

    pub fn relative_fade(&self, magnitude: f32, indices: Vec<usize>, duration: f64) {
        self.submit(Command::RelativeFade {
            magnitude,
            indices,
            duration,
        });
    }

    /// Record `(id, address)` as the advisory owner
    pub fn claim_arbitration(&self, id: &str, address: &str) {
        self.arbitration.claim(id, address);
    }

    pub fn check_arbitration(&self, id: &str, address: &str) -> bool {
        self.arbitration.check(id, address)
    }
}
