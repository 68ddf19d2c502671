use log::{debug, warn};

use crate::command::CommandReceiver;
use crate::fade::FadeEngine;
use crate::pixel::PixelState;
use crate::power::{PowerController, PowerState, PowerSwitch};

/// Outcome of one render step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderResult {
    /// Commands dequeued this step, failed ones included
    pub commands: usize,
    /// Commands rejected with an error
    pub failed: usize,
    /// Whether any slot is still fading after the tick
    pub any_active: bool,
    /// Power state requested this step, if a check was due
    pub power: Option<PowerState>,
}

/// Renderer - owns the pixel state and applies commands to it
///
/// The renderer is the only writer of [`PixelState`]. Other threads reach
/// it exclusively through the command channel.
pub struct Renderer<'a, P: PowerSwitch, const N: usize> {
    // External dependencies and configuration
    commands: CommandReceiver<'a>,
    fades: FadeEngine,
    power: Option<PowerController<P>>,

    // Internal state
    pixels: PixelState<N>,
    power_check_due: bool,
}

impl<'a, P: PowerSwitch, const N: usize> Renderer<'a, P, N> {
    /// Create a renderer with a dark pixel buffer
    ///
    /// Without a power controller the PSU steps are skipped.
    pub fn new(
        commands: CommandReceiver<'a>,
        fades: FadeEngine,
        power: Option<PowerController<P>>,
    ) -> Self {
        Self {
            commands,
            fades,
            power,
            pixels: PixelState::new(),
            power_check_due: false,
        }
    }

    /// Process one tick
    ///
    /// Drains the command channel, advances every fade by one tick and
    /// reconciles power if a command arrived.
    pub fn render(&mut self) -> RenderResult {
        let (commands, failed) = self.process_commands();
        if commands > 0 {
            self.power_check_due = true;
        }

        let any_active = self.pixels.tick();

        let mut power = None;
        if self.power_check_due {
            power = self.reconcile_power();
            self.power_check_due = false;
        }

        RenderResult {
            commands,
            failed,
            any_active,
            power,
        }
    }

    /// Execute all pending commands (non-blocking)
    ///
    /// A failing command is logged and skipped; it never stops the drain.
    fn process_commands(&mut self) -> (usize, usize) {
        let mut processed = 0;
        let mut failed = 0;
        while let Ok(command) = self.commands.try_receive() {
            processed += 1;
            debug!("executing {}", command.name());
            if let Err(err) = command.apply(&self.fades, &mut self.pixels) {
                failed += 1;
                warn!("command {} failed: {}", command.name(), err);
            }
        }
        (processed, failed)
    }

    /// Reconcile the PSU with the current pixels
    pub fn reconcile_power(&mut self) -> Option<PowerState> {
        let power = self.power.as_mut()?;
        Some(power.reconcile(&self.pixels))
    }

    /// Check if commands are waiting in the channel
    pub fn has_pending_commands(&self) -> bool {
        !self.commands.is_empty()
    }

    pub const fn pixels(&self) -> &PixelState<N> {
        &self.pixels
    }

    pub const fn power(&self) -> Option<&PowerController<P>> {
        self.power.as_ref()
    }
}
