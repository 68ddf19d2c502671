//! Authoritative pixel buffer and per-slot fade progress.

use crate::color::{BLACK, Color, Rgb, quantize};
use crate::command::CommandError;

/// Number of addressable slots driven by the bridge
pub const PIXEL_COUNT: usize = 512;

/// Fade progress of a single slot
///
/// When `remaining` is zero the slot is at rest and `delta`/`target` carry
/// no meaning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeState {
    remaining: u32,
    delta: Color,
    target: Color,
}

impl FadeState {
    /// A slot at rest
    pub const IDLE: Self = Self {
        remaining: 0,
        delta: BLACK,
        target: BLACK,
    };

    /// Ticks left until the slot reaches its target
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Per-tick increment added to the slot value
    pub const fn delta(&self) -> Color {
        self.delta
    }

    /// Value the slot snaps to on its last tick
    pub const fn target(&self) -> Color {
        self.target
    }

    /// Check if the slot is interpolating
    pub const fn is_active(&self) -> bool {
        self.remaining > 0
    }
}

impl Default for FadeState {
    fn default() -> Self {
        Self::IDLE
    }
}

/// Current pixel values plus the fade state of every slot
#[derive(Debug, Clone)]
pub struct PixelState<const N: usize> {
    values: [Color; N],
    fades: [FadeState; N],
}

impl<const N: usize> PixelState<N> {
    /// Create a dark buffer with no fades in progress
    pub const fn new() -> Self {
        Self {
            values: [BLACK; N],
            fades: [FadeState::IDLE; N],
        }
    }

    /// Number of slots
    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Current values of all slots
    pub fn values(&self) -> &[Color] {
        &self.values
    }

    pub fn value(&self, slot: usize) -> Option<Color> {
        self.values.get(slot).copied()
    }

    pub fn fade(&self, slot: usize) -> Option<&FadeState> {
        self.fades.get(slot)
    }

    /// Ensure `slot` addresses this buffer
    pub const fn check_slot(&self, slot: usize) -> Result<(), CommandError> {
        if slot < N {
            Ok(())
        } else {
            Err(CommandError::SlotOutOfRange { slot, count: N })
        }
    }

    /// Ensure every slot in `slots` addresses this buffer
    pub fn check_slots(&self, slots: &[usize]) -> Result<(), CommandError> {
        slots.iter().try_for_each(|&slot| self.check_slot(slot))
    }

    /// Set a slot value immediately, cancelling any fade on it
    pub fn set(&mut self, slot: usize, color: Color) -> Result<(), CommandError> {
        self.check_slot(slot)?;
        self.values[slot] = color;
        self.fades[slot] = FadeState::IDLE;
        Ok(())
    }

    /// Start a linear fade from the current value of `slot` to `target`
    ///
    /// Replaces any fade already running on the slot. `ticks` must be
    /// at least 1.
    #[allow(clippy::cast_precision_loss)]
    pub fn start_fade(&mut self, slot: usize, target: Color, ticks: u32) -> Result<(), CommandError> {
        self.check_slot(slot)?;
        debug_assert!(ticks > 0, "a fade needs at least one tick");
        let current = self.values[slot];
        let steps = ticks.max(1) as f32;
        self.fades[slot] = FadeState {
            remaining: ticks.max(1),
            delta: Color::new(
                (target.r - current.r) / steps,
                (target.g - current.g) / steps,
                (target.b - current.b) / steps,
            ),
            target,
        };
        Ok(())
    }

    /// Advance every active fade by one tick
    ///
    /// The last tick of a fade snaps to the target, so accumulated float
    /// error never survives the fade. Returns `true` if any slot is still
    /// fading after this pass.
    pub fn tick(&mut self) -> bool {
        let mut any_active = false;
        for (value, fade) in self.values.iter_mut().zip(self.fades.iter_mut()) {
            match fade.remaining {
                0 => {}
                1 => {
                    *value = fade.target;
                    fade.remaining = 0;
                }
                _ => {
                    value.r += fade.delta.r;
                    value.g += fade.delta.g;
                    value.b += fade.delta.b;
                    fade.remaining -= 1;
                    any_active = true;
                }
            }
        }
        any_active
    }

    /// Check if any slot is still fading
    pub fn any_active(&self) -> bool {
        self.fades.iter().any(FadeState::is_active)
    }

    /// Check if any channel of any slot is lit
    pub fn is_lit(&self) -> bool {
        self.values
            .iter()
            .any(|color| color.r > 0.0 || color.g > 0.0 || color.b > 0.0)
    }

    /// Write the quantized buffer into `frame`
    ///
    /// Copies `min(N, frame.len())` slots.
    pub fn fill_frame(&self, frame: &mut [Rgb]) {
        for (out, value) in frame.iter_mut().zip(self.values.iter()) {
            *out = quantize(*value);
        }
    }
}

impl<const N: usize> Default for PixelState<N> {
    fn default() -> Self {
        Self::new()
    }
}
