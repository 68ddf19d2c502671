pub mod arbitration;
pub mod bridge;
pub mod channel;
pub mod color;
pub mod command;
pub mod config;
pub mod fade;
pub mod frame_scheduler;
pub mod http;
pub mod opc;
pub mod pixel;
pub mod power;
pub mod relay;
pub mod renderer;
pub mod snapshot;
pub mod startup;
pub mod wake;

pub use arbitration::{Arbitration, ArbitrationToken};
pub use bridge::Bridge;
pub use command::{Command, CommandChannel, CommandError, CommandReceiver, CommandSender, FadeEntry};
pub use config::Config;
pub use fade::FadeEngine;
pub use frame_scheduler::{FrameResult, FrameScheduler, LoopState};
pub use pixel::{FadeState, PIXEL_COUNT, PixelState};
pub use power::{PowerController, PowerState, PowerSwitch};
pub use renderer::{RenderResult, Renderer};
pub use snapshot::{FrameHandle, FrameSnapshot};
pub use wake::WakeSignal;

pub use color::{Color, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract pixel sink
///
/// Implement this trait to push frames to a downstream device.
/// The frame scheduler is generic over this trait.
pub trait PixelSink {
    type Error: core::fmt::Display;

    /// Write one full frame of colors
    ///
    /// Implementations must bound the call with a short timeout and must not
    /// retry on failure.
    fn write(&mut self, colors: &[Rgb]) -> Result<(), Self::Error>;
}
