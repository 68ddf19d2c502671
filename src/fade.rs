//! Fade computation
//!
//! Translates fade requests into per-slot fade parameters. Every function
//! validates its whole input before touching [`PixelState`], so a rejected
//! request never leaves a half-applied fade behind.

use log::debug;

use crate::color::{Color, shift_brightness};
use crate::command::{CommandError, FadeEntry};
use crate::pixel::PixelState;

/// Tick floor for absolute fades with a zero or sub-frame duration.
pub const MIN_ABSOLUTE_TICKS: u32 = 2;

/// Tick floor for multi command entries; they snap on the next frame.
pub const MIN_MULTI_TICKS: u32 = 1;

/// Fade engine bound to a frame rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeEngine {
    frame_rate: f64,
}

impl FadeEngine {
    /// Create a fade engine for `frame_rate` ticks per second
    pub const fn new(frame_rate: f64) -> Self {
        Self { frame_rate }
    }

    pub const fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    /// Tick count of an absolute fade lasting `duration` seconds
    ///
    /// Non-positive durations, and positive ones shorter than a frame,
    /// take [`MIN_ABSOLUTE_TICKS`].
    pub fn absolute_ticks(&self, duration: f64) -> Result<u32, CommandError> {
        let ticks = self.raw_ticks(duration)?;
        if duration <= 0.0 || ticks == 0 {
            return Ok(MIN_ABSOLUTE_TICKS);
        }
        Ok(ticks)
    }

    /// Tick count of a multi command entry lasting `duration` seconds
    pub fn multi_ticks(&self, duration: f64) -> Result<u32, CommandError> {
        Ok(self.raw_ticks(duration)?.max(MIN_MULTI_TICKS))
    }

    /// `floor(duration * frame_rate)`, saturated to `0..=u32::MAX`
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn raw_ticks(&self, duration: f64) -> Result<u32, CommandError> {
        if !duration.is_finite() {
            return Err(CommandError::InvalidDuration(duration));
        }
        Ok((duration * self.frame_rate).floor() as u32)
    }

    /// Fade every slot in `indices` to `color` over `duration` seconds
    pub fn absolute_fade<const N: usize>(
        &self,
        pixels: &mut PixelState<N>,
        color: Color,
        indices: &[usize],
        duration: f64,
    ) -> Result<(), CommandError> {
        pixels.check_slots(indices)?;
        let ticks = self.absolute_ticks(duration)?;
        debug!(
            "absolute fade of {} slots to {:?} over {} ticks",
            indices.len(),
            color,
            ticks
        );
        for &slot in indices {
            pixels.start_fade(slot, color, ticks)?;
        }
        Ok(())
    }

    /// Apply `entries` in order with the multi command tick floor
    pub fn multi_command<const N: usize>(
        &self,
        pixels: &mut PixelState<N>,
        entries: &[FadeEntry],
    ) -> Result<(), CommandError> {
        let mut ticks = Vec::with_capacity(entries.len());
        for entry in entries {
            pixels.check_slots(&entry.indices)?;
            ticks.push(self.multi_ticks(entry.duration)?);
        }

        debug!("multi command with {} entries", entries.len());
        for (entry, ticks) in entries.iter().zip(ticks) {
            for &slot in &entry.indices {
                pixels.start_fade(slot, entry.color, ticks)?;
            }
        }
        Ok(())
    }

    /// Shift the brightness of every slot in `indices` by `magnitude`
    ///
    /// Each slot gets its own target derived from its current value, then
    /// the fades run through [`FadeEngine::multi_command`].
    pub fn relative_fade<const N: usize>(
        &self,
        pixels: &mut PixelState<N>,
        magnitude: f32,
        indices: &[usize],
        duration: f64,
    ) -> Result<(), CommandError> {
        if !magnitude.is_finite() {
            return Err(CommandError::InvalidMagnitude(magnitude));
        }
        pixels.check_slots(indices)?;

        let entries: Vec<FadeEntry> = indices
            .iter()
            .filter_map(|&slot| {
                let current = pixels.value(slot)?;
                Some(FadeEntry::new(
                    vec![slot],
                    shift_brightness(current, magnitude),
                    duration,
                ))
            })
            .collect();
        self.multi_command(pixels, &entries)
    }
}
