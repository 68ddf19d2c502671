//! PSU power management
//!
//! The relay is treated as a remote device that may have restarted at any
//! time, so no switch state is cached: every reconcile recomputes the
//! desired state from the pixels and sends it again.

use core::fmt::Display;

use log::{info, warn};

use crate::pixel::PixelState;

/// Desired state of the lighting PSU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    /// `On` if anything is lit
    pub const fn from_lit(lit: bool) -> Self {
        if lit { Self::On } else { Self::Off }
    }

    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

/// Abstract power switch
///
/// Implement this trait to drive a relay. Calls should be bounded by a short
/// timeout; failures are reported, never retried.
pub trait PowerSwitch {
    type Error: Display;

    /// Request the PSU to be switched to `state`
    fn switch(&mut self, state: PowerState) -> Result<(), Self::Error>;
}

/// Decides PSU state from pixel content
#[derive(Debug)]
pub struct PowerController<S: PowerSwitch> {
    switch: S,
}

impl<S: PowerSwitch> PowerController<S> {
    pub const fn new(switch: S) -> Self {
        Self { switch }
    }

    /// Recompute the desired power state from `pixels` and send it
    ///
    /// Returns the requested state. Switch failures are logged; the pixel
    /// state stays authoritative either way.
    pub fn reconcile<const N: usize>(&mut self, pixels: &PixelState<N>) -> PowerState {
        let state = PowerState::from_lit(pixels.is_lit());
        self.request(state);
        state
    }

    /// Send `state` to the switch, logging failures
    pub fn request(&mut self, state: PowerState) {
        match state {
            PowerState::On => info!("spinning up PSU"),
            PowerState::Off => info!("killing PSU"),
        }
        if let Err(err) = self.switch.switch(state) {
            warn!("failed to switch PSU {:?}: {}", state, err);
        }
    }

    pub const fn switch(&self) -> &S {
        &self.switch
    }
}
