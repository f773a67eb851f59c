//! Whole-simulation scenarios, run over many ticks through the public API only.
#[cfg(test)]
#[expect(clippy::indexing_slicing, reason = "Tests aren't so strict")]
mod scenarios {
    use glam::DVec2;
    use particle_field::{
        Canvas, Config, ManualClock, Mode, Particle, ParticleField, Pointer, Renderer,
    };
    use rand::{Rng as _, SeedableRng as _};

    const WIDTH: f64 = 800.0;
    const HEIGHT: f64 = 600.0;

    /// Set `RUST_LOG` to see the simulation's own logging.
    fn setup_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn seeded_field(seed: u64) -> ParticleField<ManualClock> {
        setup_logging();
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        ParticleField::with_rng(
            WIDTH,
            HEIGHT,
            Config::default(),
            ManualClock::new(0.0),
            &mut rng,
        )
        .unwrap()
    }

    fn lone_particle_field(particle: Particle) -> ParticleField<ManualClock> {
        setup_logging();
        ParticleField::from_particles(
            WIDTH,
            HEIGHT,
            Config::default(),
            ManualClock::new(0.0),
            vec![particle],
        )
        .unwrap()
    }

    #[test]
    fn particles_never_leave_the_canvas() {
        let mut field = seeded_field(1);
        let mut rng = rand::rngs::StdRng::seed_from_u64(2);

        for tick in 0..2_000_u32 {
            let pointer = Pointer::new(
                rng.gen_range(-50.0..WIDTH + 50.0),
                rng.gen_range(-50.0..HEIGHT + 50.0),
                tick % 7 != 0,
            );
            let mode = Mode::ALL[rng.gen_range(0..Mode::ALL.len())];
            field.clock_mut().advance(rng.gen_range(0.0..100.0));
            field.step(&pointer, mode, rng.gen_range(20.0..=100.0));

            let bounds = field.bounds();
            for particle in field.particles() {
                assert!(
                    bounds.contains(particle.position),
                    "tick {tick}: {:?}",
                    particle.position
                );
                assert!((0.0..360.0).contains(&particle.hue), "tick {tick}: {}", particle.hue);
                assert!(particle.trail().len() <= 8);
            }
        }
    }

    #[test]
    fn trails_fill_up_to_exactly_eight() {
        let mut field = seeded_field(3);
        for tick in 1..=20_usize {
            field.step(&Pointer::INACTIVE, Mode::Orbital, 50.0);
            for particle in field.particles() {
                assert_eq!(particle.trail().len(), tick.min(8));
            }
        }
    }

    #[test]
    fn without_a_pointer_particles_slow_to_a_stop() {
        let mut particle = Particle::new(DVec2::new(400.0, 300.0), 4.0, 1.0, 0.0, 8);
        particle.velocity = DVec2::new(3.0, -2.0);
        let mut field = lone_particle_field(particle);

        let mut speed = field.particles()[0].velocity.length();
        for _ in 0..200 {
            field.step(&Pointer::INACTIVE, Mode::Attraction, 50.0);
            let new_speed = field.particles()[0].velocity.length();
            assert!(new_speed <= speed);
            assert!((new_speed - speed * 0.95).abs() < 1e-9);
            speed = new_speed;
        }
        assert!(speed < 1e-3);
    }

    #[test]
    fn inflated_radii_relax_back_to_rest() {
        let mut particle = Particle::new(DVec2::new(400.0, 300.0), 3.0, 1.0, 0.0, 8);
        particle.radius = 9.0;
        let mut field = lone_particle_field(particle);

        let mut gap = 6.0;
        for _ in 0..150 {
            field.step(&Pointer::INACTIVE, Mode::Wave, 50.0);
            let particle = &field.particles()[0];
            let new_gap = (particle.radius - particle.base_radius).abs();
            assert!(new_gap < gap);
            gap = new_gap;
        }
        assert!(gap < 0.01);
    }

    #[test]
    fn particles_bounce_off_the_right_edge() {
        let mut particle = Particle::new(DVec2::new(WIDTH + 5.0, 300.0), 4.0, 1.0, 0.0, 8);
        particle.velocity = DVec2::new(2.0, 0.0);
        let mut field = lone_particle_field(particle);

        field.step(&Pointer::INACTIVE, Mode::Attraction, 50.0);

        let particle = &field.particles()[0];
        assert!((particle.position.x - WIDTH).abs() < f64::EPSILON);
        assert!(particle.velocity.x < 0.0);
        assert!((particle.velocity.x + 2.0 * 0.95 * 0.8).abs() < 1e-12);
    }

    #[test]
    fn repulsion_pushes_nearby_particles_away() {
        let mut field = seeded_field(4);
        let pointer = Pointer::new(400.0, 300.0, true);
        let before: Vec<Particle> = field.particles().to_vec();

        field.step(&pointer, Mode::Repulsion, 50.0);

        let mut affected = 0;
        for (old, new) in before.iter().zip(field.particles()) {
            let away = old.position - pointer.position;
            if away.length() >= 200.0 {
                continue;
            }
            affected += 1;
            let velocity_delta = new.velocity / 0.95 - old.velocity;
            assert!(
                velocity_delta.dot(away) >= -1e-9,
                "delta {velocity_delta:?} isn't away from the pointer ({away:?})"
            );
        }
        assert!(affected > 0, "no particles were near the pointer");
    }

    #[test]
    fn reset_repopulates_a_resized_canvas() {
        let mut field = seeded_field(5);
        for _ in 0..10 {
            field.step(&Pointer::new(400.0, 300.0, true), Mode::Vortex, 50.0);
        }

        field.reset(1024.0, 768.0).unwrap();

        assert_eq!(field.particles().len(), 120);
        let bounds = field.bounds();
        assert!((bounds.width - 1024.0).abs() < f64::EPSILON);
        assert!((bounds.height - 768.0).abs() < f64::EPSILON);
        for particle in field.particles() {
            assert!(bounds.contains(particle.position));
            assert!(particle.trail().is_empty());
        }
    }

    #[test]
    fn every_mode_renders_a_frame() {
        let config = Config::default();
        let renderer = Renderer::new(&config, 0.25);
        let pointer = Pointer::new(400.0, 300.0, true);

        for mode in Mode::ALL {
            let mut field = seeded_field(6);
            let mut canvas = Canvas::new(200, 150);
            for _ in 0..30 {
                field.clock_mut().advance(16.0);
                field.step(&pointer, mode, 50.0);
                renderer.render(&mut canvas, field.particles(), &pointer, mode, 50.0);
            }
            assert!(canvas.pixels().iter().all(|pixel| {
                [pixel.0, pixel.1, pixel.2, pixel.3]
                    .iter()
                    .all(|channel| channel.is_finite() && (0.0..=1.0).contains(channel))
            }));
        }
    }

    #[test]
    fn parallel_stepping_is_deterministic() {
        let mut sequential = seeded_field(9);
        let mut parallel = seeded_field(9);
        let pointer = Pointer::new(WIDTH / 2.0, HEIGHT / 2.0, true);

        for mode in Mode::ALL {
            for _ in 0..20 {
                sequential.clock_mut().advance(16.0);
                parallel.clock_mut().advance(16.0);
                sequential.step(&pointer, mode, 80.0);
                parallel.step_parallel(&pointer, mode, 80.0);
            }
        }

        assert_eq!(sequential.particles(), parallel.particles());
    }

    #[test]
    fn invalid_config_is_refused() {
        for setting in ["initial_speed", "friction", "radius_relaxation"] {
            let mut config = Config::default();
            match setting {
                "initial_speed" => config.initial_speed = f64::NAN,
                "friction" => config.friction = 1.5,
                _ => config.radius_relaxation = -1.0,
            }

            let error = ParticleField::new(WIDTH, HEIGHT, config).unwrap_err();
            assert!(error.to_string().contains(setting), "{error}");
        }
    }

    #[test]
    fn modes_can_be_matched_exhaustively() {
        let labels = Mode::ALL.map(|mode| match mode {
            Mode::Attraction => "attraction",
            Mode::Repulsion => "repulsion",
            Mode::Orbital => "orbital",
            Mode::Vortex => "vortex",
            Mode::Wave => "wave",
        });
        for (mode, label) in Mode::ALL.into_iter().zip(labels) {
            assert_eq!(mode.to_string(), label);
        }
    }
}
