mod brightness;

pub use brightness::{peak, set_brightness, shift_brightness};
use smart_leds::{RGB, RGB8};

/// 8-bit colour handed to the pixel sink
pub type Rgb = RGB8;

/// Floating-point colour used for fade accumulation
pub type Color = RGB<f32>;

/// All channels off
pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

/// Convert one channel to 8 bits.
///
/// Truncates toward zero and clamps to `0..=255`. `NaN` maps to 0.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn quantize_channel(value: f32) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

/// Quantize a floating-point colour for output
#[inline]
pub fn quantize(color: Color) -> Rgb {
    Rgb {
        r: quantize_channel(color.r),
        g: quantize_channel(color.g),
        b: quantize_channel(color.b),
    }
}

/// Widen an 8-bit colour to the internal representation
#[inline]
pub fn from_rgb(rgb: Rgb) -> Color {
    Color::new(f32::from(rgb.r), f32::from(rgb.g), f32::from(rgb.b))
}
