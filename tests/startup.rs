mod tests {
    use std::time::Duration;

    use opc_bridge::PixelSink;
    use opc_bridge::color::Rgb;
    use opc_bridge::startup::{TEST_PATTERN_COLOR, play_test_pattern};

    struct RecordingSink {
        frames: Vec<Vec<Rgb>>,
        fail: bool,
    }

    impl PixelSink for RecordingSink {
        type Error = &'static str;

        fn write(&mut self, colors: &[Rgb]) -> Result<(), Self::Error> {
            self.frames.push(colors.to_vec());
            if self.fail { Err("offline") } else { Ok(()) }
        }
    }

    #[test]
    fn test_pattern_blinks_twice() {
        let mut sink = RecordingSink {
            frames: Vec::new(),
            fail: false,
        };
        play_test_pattern(&mut sink, 6, Duration::ZERO);

        assert_eq!(sink.frames.len(), 8);
        let off = Rgb::default();
        let expected = [
            TEST_PATTERN_COLOR,
            TEST_PATTERN_COLOR,
            off,
            off,
            TEST_PATTERN_COLOR,
            TEST_PATTERN_COLOR,
            off,
            off,
        ];
        for (frame, color) in sink.frames.iter().zip(expected) {
            assert_eq!(frame.len(), 6);
            assert!(frame.iter().all(|pixel| *pixel == color));
        }
    }

    #[test]
    fn test_pattern_survives_sink_failure() {
        let mut sink = RecordingSink {
            frames: Vec::new(),
            fail: true,
        };
        play_test_pattern(&mut sink, 2, Duration::ZERO);
        assert_eq!(sink.frames.len(), 8);
    }
}
