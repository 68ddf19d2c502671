use thiserror::Error;

use crate::channel::{Channel, Receiver, Sender};
use crate::color::Color;
use crate::fade::FadeEngine;
use crate::pixel::PixelState;

/// Capacity of the command queue between producers and the render loop
pub const COMMAND_QUEUE_SIZE: usize = 100;

/// One `(indices, target, duration)` entry of a multi command
#[derive(Debug, Clone, PartialEq)]
pub struct FadeEntry {
    pub indices: Vec<usize>,
    pub color: Color,
    /// Fade duration in seconds
    pub duration: f64,
}

impl FadeEntry {
    pub fn new(indices: Vec<usize>, color: Color, duration: f64) -> Self {
        Self {
            indices,
            color,
            duration,
        }
    }
}

/// Operations accepted by the render loop
///
/// Commands are immutable once queued.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Fade `indices` to `color` over `duration` seconds
    AbsoluteFade {
        color: Color,
        indices: Vec<usize>,
        duration: f64,
    },
    /// Apply several fades in order; later entries win on shared slots
    MultiCommand(Vec<FadeEntry>),
    /// Shift the brightness of `indices` by `magnitude` peak units
    RelativeFade {
        magnitude: f32,
        indices: Vec<usize>,
        duration: f64,
    },
}

impl Command {
    /// Short name used in logs
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AbsoluteFade { .. } => "absolute_fade",
            Self::MultiCommand(_) => "multi_command",
            Self::RelativeFade { .. } => "relative_fade",
        }
    }

    /// Execute the command against the pixel state
    ///
    /// A failing command leaves `pixels` untouched.
    pub fn apply<const N: usize>(
        &self,
        fades: &FadeEngine,
        pixels: &mut PixelState<N>,
    ) -> Result<(), CommandError> {
        match self {
            Self::AbsoluteFade {
                color,
                indices,
                duration,
            } => fades.absolute_fade(pixels, *color, indices, *duration),
            Self::MultiCommand(entries) => fades.multi_command(pixels, entries),
            Self::RelativeFade {
                magnitude,
                indices,
                duration,
            } => fades.relative_fade(pixels, *magnitude, indices, *duration),
        }
    }
}

/// Reasons a command is rejected by the render loop
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CommandError {
    #[error("slot {slot} is out of range (pixel count is {count})")]
    SlotOutOfRange { slot: usize, count: usize },
    #[error("fade duration must be finite, got {0}")]
    InvalidDuration(f64),
    #[error("brightness magnitude must be finite, got {0}")]
    InvalidMagnitude(f32),
}

/// Type alias for command sender
pub type CommandSender<'a> = Sender<'a, Command, COMMAND_QUEUE_SIZE>;

/// Type alias for command receiver
pub type CommandReceiver<'a> = Receiver<'a, Command, COMMAND_QUEUE_SIZE>;

/// Type alias for the command channel
pub type CommandChannel = Channel<Command, COMMAND_QUEUE_SIZE>;
