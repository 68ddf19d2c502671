mod tests {
    use opc_bridge::color::{BLACK, Color, peak};
    use opc_bridge::fade::{MIN_ABSOLUTE_TICKS, MIN_MULTI_TICKS};
    use opc_bridge::{Command, CommandError, FadeEngine, FadeEntry, PixelState};

    const FRAME_RATE: f64 = 16.0;
    const WHITE: Color = Color::new(255.0, 255.0, 255.0);
    const GREY: Color = Color::new(128.0, 128.0, 128.0);

    fn engine() -> FadeEngine {
        FadeEngine::new(FRAME_RATE)
    }

    #[test]
    fn test_absolute_ticks() {
        let fades = engine();
        assert_eq!(fades.absolute_ticks(0.0), Ok(MIN_ABSOLUTE_TICKS));
        assert_eq!(fades.absolute_ticks(-3.0), Ok(MIN_ABSOLUTE_TICKS));
        assert_eq!(fades.absolute_ticks(0.01), Ok(MIN_ABSOLUTE_TICKS));
        assert_eq!(fades.absolute_ticks(0.07), Ok(1));
        assert_eq!(fades.absolute_ticks(2.0), Ok(32));
        assert_eq!(fades.absolute_ticks(2.1), Ok(33));
        assert!(matches!(
            fades.absolute_ticks(f64::NAN),
            Err(CommandError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_multi_ticks() {
        let fades = engine();
        assert_eq!(fades.multi_ticks(0.0), Ok(MIN_MULTI_TICKS));
        assert_eq!(fades.multi_ticks(0.01), Ok(1));
        assert_eq!(fades.multi_ticks(-1.0), Ok(1));
        assert_eq!(fades.multi_ticks(2.0), Ok(32));
        assert!(matches!(
            fades.multi_ticks(f64::INFINITY),
            Err(CommandError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_zero_duration_floors_differ() {
        let fades = engine();
        let mut pixels = PixelState::<4>::new();
        fades.absolute_fade(&mut pixels, WHITE, &[0], 0.0).unwrap();
        fades
            .multi_command(&mut pixels, &[FadeEntry::new(vec![1], WHITE, 0.0)])
            .unwrap();
        assert_eq!(pixels.fade(0).unwrap().remaining(), 2);
        assert_eq!(pixels.fade(1).unwrap().remaining(), 1);
    }

    #[test]
    fn test_absolute_fade_sets_fade_state() {
        let fades = engine();
        let mut pixels = PixelState::<4>::new();
        fades.absolute_fade(&mut pixels, WHITE, &[1, 3], 2.0).unwrap();

        for slot in [1, 3] {
            let fade = pixels.fade(slot).unwrap();
            assert_eq!(fade.remaining(), 32);
            assert_eq!(fade.target(), WHITE);
            assert_eq!(fade.delta(), Color::new(255.0 / 32.0, 255.0 / 32.0, 255.0 / 32.0));
        }
        assert!(!pixels.fade(0).unwrap().is_active());
    }

    #[test]
    fn test_absolute_fade_completes_after_its_ticks() {
        let fades = engine();
        let mut pixels = PixelState::<4>::new();
        fades.absolute_fade(&mut pixels, WHITE, &[1], 2.0).unwrap();
        for _ in 0..32 {
            pixels.tick();
        }
        assert_eq!(pixels.value(1), Some(WHITE));
        assert!(!pixels.any_active());
    }

    #[test]
    fn test_multi_command_scenario() {
        let fades = engine();
        let mut pixels = PixelState::<4>::new();
        fades
            .multi_command(&mut pixels, &[FadeEntry::new(vec![2], GREY, 2.0)])
            .unwrap();
        let fade = pixels.fade(2).unwrap();
        assert_eq!(fade.remaining(), 32);
        assert_eq!(fade.target(), GREY);
    }

    #[test]
    fn test_multi_command_last_entry_wins() {
        let fades = engine();
        let mut pixels = PixelState::<4>::new();
        fades
            .multi_command(
                &mut pixels,
                &[
                    FadeEntry::new(vec![0, 1], WHITE, 1.0),
                    FadeEntry::new(vec![1], GREY, 0.5),
                ],
            )
            .unwrap();
        assert_eq!(pixels.fade(0).unwrap().target(), WHITE);
        assert_eq!(pixels.fade(0).unwrap().remaining(), 16);
        assert_eq!(pixels.fade(1).unwrap().target(), GREY);
        assert_eq!(pixels.fade(1).unwrap().remaining(), 8);
    }

    #[test]
    fn test_rejected_command_leaves_state_untouched() {
        let fades = engine();
        let mut pixels = PixelState::<4>::new();
        let result = fades.multi_command(
            &mut pixels,
            &[
                FadeEntry::new(vec![0], WHITE, 1.0),
                FadeEntry::new(vec![9], WHITE, 1.0),
            ],
        );
        assert_eq!(result, Err(CommandError::SlotOutOfRange { slot: 9, count: 4 }));
        assert!(!pixels.any_active());

        let result = fades.absolute_fade(&mut pixels, WHITE, &[1, 4], 1.0);
        assert!(result.is_err());
        assert!(!pixels.any_active());
    }

    #[test]
    fn test_relative_fade_on_dark_pixel_keeps_it_dark() {
        let fades = engine();
        let mut pixels = PixelState::<2>::new();
        fades.relative_fade(&mut pixels, 100.0, &[0], 1.0).unwrap();
        assert_eq!(pixels.fade(0).unwrap().target(), BLACK);
        for _ in 0..16 {
            pixels.tick();
        }
        assert_eq!(pixels.value(0), Some(BLACK));
    }

    #[test]
    fn test_relative_fade_targets_each_slot() {
        let fades = engine();
        let mut pixels = PixelState::<3>::new();
        pixels.set(0, Color::new(200.0, 100.0, 0.0)).unwrap();
        pixels.set(1, Color::new(0.0, 0.0, 50.0)).unwrap();
        fades.relative_fade(&mut pixels, -50.0, &[0, 1], 0.0).unwrap();

        assert_eq!(pixels.fade(0).unwrap().target(), Color::new(150.0, 75.0, 0.0));
        let dimmed = pixels.fade(1).unwrap().target();
        assert!((peak(dimmed) - 1.0).abs() < 1e-6);
        // Relative fades share the multi command floor
        assert_eq!(pixels.fade(0).unwrap().remaining(), MIN_MULTI_TICKS);
    }

    #[test]
    fn test_relative_fade_rejects_bad_input() {
        let fades = engine();
        let mut pixels = PixelState::<2>::new();
        assert!(matches!(
            fades.relative_fade(&mut pixels, f32::NAN, &[0], 1.0),
            Err(CommandError::InvalidMagnitude(_))
        ));
        assert_eq!(
            fades.relative_fade(&mut pixels, 10.0, &[2], 1.0),
            Err(CommandError::SlotOutOfRange { slot: 2, count: 2 })
        );
    }

    #[test]
    fn test_command_apply_dispatches() {
        let fades = engine();
        let mut pixels = PixelState::<4>::new();
        let command = Command::AbsoluteFade {
            color: WHITE,
            indices: vec![1],
            duration: 0.0,
        };
        assert_eq!(command.name(), "absolute_fade");
        command.apply(&fades, &mut pixels).unwrap();
        assert_eq!(pixels.fade(1).unwrap().remaining(), 2);

        let command = Command::MultiCommand(vec![FadeEntry::new(vec![2], GREY, 2.0)]);
        command.apply(&fades, &mut pixels).unwrap();
        assert_eq!(pixels.fade(2).unwrap().remaining(), 32);
    }
}
