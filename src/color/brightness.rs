//! Brightness math on floating-point colours
//!
//! The peak channel is used as the brightness proxy, so scaling keeps
//! the ratio between channels (and therefore the hue) intact.

use super::Color;

const MAX_CHANNEL: f32 = 255.0;

/// Maximum channel value of a colour
#[inline]
pub fn peak(color: Color) -> f32 {
    color.r.max(color.g).max(color.b)
}

/// Scale a colour so its peak channel equals `target_peak`
///
/// A colour without a positive peak has no hue to preserve and becomes black.
pub fn set_brightness(target_peak: f32, color: Color) -> Color {
    let current = peak(color);
    let ratio = if current > 0.0 {
        target_peak / current
    } else {
        0.0
    };
    Color::new(color.r * ratio, color.g * ratio, color.b * ratio)
}

/// Shift the brightness of a colour by `magnitude` peak units
///
/// # Rules
/// * A dark colour (peak of 0) is returned unchanged.
/// * The new peak is truncated and clamped to `0..=255`.
/// * A lit colour never drops to a zero peak; the floor is 1 so it can
///   still be brightened later.
/// * Every resulting channel is clamped to `0..=255`.
#[allow(clippy::float_cmp)]
pub fn shift_brightness(color: Color, magnitude: f32) -> Color {
    let current = peak(color);
    if current <= 0.0 {
        return color;
    }

    let mut new_peak = (current + magnitude).trunc().clamp(0.0, MAX_CHANNEL);
    if new_peak == 0.0 {
        new_peak = 1.0;
    }
    if new_peak == current {
        return color;
    }

    let scaled = set_brightness(new_peak, color);
    Color::new(
        scaled.r.clamp(0.0, MAX_CHANNEL),
        scaled.g.clamp(0.0, MAX_CHANNEL),
        scaled.b.clamp(0.0, MAX_CHANNEL),
    )
}
