//! Startup self-test pattern
//!
//! Blinks the whole strip red twice so an operator can see the bridge came
//! up and reaches the sink.

use std::thread;
use std::time::Duration;

use log::{info, warn};

use crate::PixelSink;
use crate::color::Rgb;

/// Colour of the "on" phase of the pattern
pub const TEST_PATTERN_COLOR: Rgb = Rgb { r: 64, g: 0, b: 0 };

/// How long each phase is held
pub const TEST_PATTERN_HOLD: Duration = Duration::from_millis(500);

const OFF: Rgb = Rgb { r: 0, g: 0, b: 0 };

/// Play red/off/red/off on `output`, holding each phase for `hold`
///
/// Each frame is written twice. Write failures are logged and the pattern
/// carries on.
pub fn play_test_pattern<O: PixelSink>(output: &mut O, count: usize, hold: Duration) {
    info!("playing startup test pattern");
    let phases = [TEST_PATTERN_COLOR, OFF, TEST_PATTERN_COLOR, OFF];
    for (phase, color) in phases.iter().enumerate() {
        let frame = vec![*color; count];
        for _ in 0..2 {
            if let Err(err) = output.write(&frame) {
                warn!("test pattern frame failed: {}", err);
            }
        }
        if phase + 1 < phases.len() {
            thread::sleep(hold);
        }
    }
}
