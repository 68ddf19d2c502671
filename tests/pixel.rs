mod tests {
    use opc_bridge::color::{BLACK, Color, Rgb};
    use opc_bridge::{CommandError, PixelState};

    const WHITE: Color = Color::new(255.0, 255.0, 255.0);

    #[test]
    fn test_new_state_is_dark_and_at_rest() {
        let pixels = PixelState::<8>::new();
        assert_eq!(pixels.len(), 8);
        assert!(pixels.values().iter().all(|value| *value == BLACK));
        assert!(!pixels.any_active());
        assert!(!pixels.is_lit());
    }

    #[test]
    fn test_fade_reaches_target_exactly() {
        let mut pixels = PixelState::<4>::new();
        let start = Color::new(7.0, 250.0, 3.0);
        let target = Color::new(100.0, 37.0, 201.0);
        pixels.set(2, start).unwrap();
        pixels.start_fade(2, target, 7).unwrap();

        for _ in 0..6 {
            assert!(pixels.tick());
        }
        assert_eq!(pixels.fade(2).unwrap().remaining(), 1);
        assert_ne!(pixels.value(2), Some(target));

        assert!(!pixels.tick());
        assert_eq!(pixels.value(2), Some(target));
        assert_eq!(pixels.fade(2).unwrap().remaining(), 0);
    }

    #[test]
    fn test_fade_interpolates_linearly() {
        let mut pixels = PixelState::<1>::new();
        pixels.start_fade(0, WHITE, 4).unwrap();
        assert_eq!(pixels.fade(0).unwrap().delta(), Color::new(63.75, 63.75, 63.75));

        pixels.tick();
        assert_eq!(pixels.value(0), Some(Color::new(63.75, 63.75, 63.75)));
        pixels.tick();
        assert_eq!(pixels.value(0), Some(Color::new(127.5, 127.5, 127.5)));
    }

    #[test]
    fn test_new_fade_replaces_running_one() {
        let mut pixels = PixelState::<1>::new();
        pixels.start_fade(0, WHITE, 10).unwrap();
        pixels.tick();
        pixels.start_fade(0, BLACK, 2).unwrap();
        assert_eq!(pixels.fade(0).unwrap().remaining(), 2);
        assert_eq!(pixels.fade(0).unwrap().target(), BLACK);

        pixels.tick();
        pixels.tick();
        assert_eq!(pixels.value(0), Some(BLACK));
    }

    #[test]
    fn test_tick_at_rest_is_noop() {
        let mut pixels = PixelState::<3>::new();
        pixels.set(1, WHITE).unwrap();
        assert!(!pixels.tick());
        assert_eq!(pixels.value(1), Some(WHITE));
    }

    #[test]
    fn test_out_of_range_slot() {
        let mut pixels = PixelState::<3>::new();
        assert_eq!(
            pixels.start_fade(3, WHITE, 2),
            Err(CommandError::SlotOutOfRange { slot: 3, count: 3 })
        );
        assert_eq!(
            pixels.check_slots(&[0, 1, 7]),
            Err(CommandError::SlotOutOfRange { slot: 7, count: 3 })
        );
        assert!(pixels.check_slots(&[0, 2]).is_ok());
    }

    #[test]
    fn test_fill_frame_truncates() {
        let mut pixels = PixelState::<2>::new();
        pixels.set(0, Color::new(254.9, 0.5, 12.0)).unwrap();
        let mut frame = [Rgb::default(); 2];
        pixels.fill_frame(&mut frame);
        assert_eq!(frame[0], Rgb { r: 254, g: 0, b: 12 });
        assert_eq!(frame[1], Rgb::default());
    }

    #[test]
    fn test_is_lit() {
        let mut pixels = PixelState::<512>::new();
        assert!(!pixels.is_lit());
        pixels.set(511, Color::new(0.0, 0.0, 0.1)).unwrap();
        assert!(pixels.is_lit());
    }
}
