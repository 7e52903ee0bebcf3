#![cfg(not(target_arch = "wasm32"))]

use promo_wasm::snow::{
    seed_from_millis, Particle, ParticleField, PARTICLE_COUNT, RECYCLE_MARGIN, RESPAWN_Y,
};

const WIDTH: f32 = 1280.0;
const HEIGHT: f32 = 720.0;

#[test]
fn population_stays_fixed() {
    let mut field = ParticleField::new(WIDTH, HEIGHT, PARTICLE_COUNT, 7);
    assert_eq!(field.particles().len(), PARTICLE_COUNT);
    for _ in 0..10_000 {
        field.advance();
    }
    assert_eq!(field.particles().len(), PARTICLE_COUNT);
}

#[test]
fn first_generation_scatters_over_surface() {
    let field = ParticleField::new(WIDTH, HEIGHT, PARTICLE_COUNT, 42);
    for p in field.particles() {
        assert!((0.0..WIDTH).contains(&p.x));
        assert!((0.0..HEIGHT).contains(&p.y));
        assert!((0.0..1.0).contains(&p.depth));
    }
}

#[test]
fn flakes_never_escape_downward() {
    // Tiny surface so recycling happens constantly.
    let mut field = ParticleField::new(200.0, 40.0, PARTICLE_COUNT, 3);
    for _ in 0..5_000 {
        field.advance();
        for p in field.particles() {
            assert!(p.y <= 40.0 + RECYCLE_MARGIN, "flake fell through: y = {}", p.y);
            assert!(p.y >= RESPAWN_Y, "flake above respawn line: y = {}", p.y);
        }
    }
}

#[test]
fn derived_properties_increase_with_depth() {
    let flake = |depth: f32| Particle {
        x: 0.0,
        y: 0.0,
        depth,
        sway_phase: 0.0,
        sway_rate: 0.0,
    };
    let near = flake(0.9);
    let far = flake(0.1);
    assert!(far.size() < near.size());
    assert!(far.fall_speed() < near.fall_speed());
    assert!(far.opacity() < near.opacity());

    // Strictly increasing across the whole depth range.
    let mut prev = flake(0.0);
    for i in 1..=100 {
        let p = flake(i as f32 / 100.0);
        assert!(prev.size() < p.size());
        assert!(prev.fall_speed() < p.fall_speed());
        assert!(prev.opacity() < p.opacity());
        prev = p;
    }
}

#[test]
fn fall_speed_is_always_positive() {
    let mut field = ParticleField::new(WIDTH, HEIGHT, PARTICLE_COUNT, 11);
    let before: Vec<f32> = field.particles().iter().map(|p| p.y).collect();
    field.advance();
    for (p, y0) in field.particles().iter().zip(before) {
        // Either fell, or was recycled to the respawn line.
        assert!(p.y > y0 || p.y == RESPAWN_Y);
    }
}

#[test]
fn wall_clock_seeds_stay_distinct() {
    // Millisecond epoch timestamps are far above u32::MAX; the seed must
    // keep the fast-moving low bits rather than saturating to a single
    // value.
    let christmas_eve_ms = 1_766_674_799_000.0;
    let day_later_ms = christmas_eve_ms + 86_400_000.0;
    assert_ne!(seed_from_millis(christmas_eve_ms), u32::MAX);
    assert_ne!(
        seed_from_millis(christmas_eve_ms),
        seed_from_millis(day_later_ms)
    );

    // Distinct seeds produce distinct fields.
    let a = ParticleField::new(WIDTH, HEIGHT, PARTICLE_COUNT, seed_from_millis(christmas_eve_ms));
    let b = ParticleField::new(WIDTH, HEIGHT, PARTICLE_COUNT, seed_from_millis(day_later_ms));
    assert!(a
        .particles()
        .iter()
        .zip(b.particles())
        .any(|(p, q)| p.x != q.x));
}

#[test]
fn resize_resets_population_to_new_bounds() {
    let mut field = ParticleField::new(WIDTH, HEIGHT, PARTICLE_COUNT, 9);
    for _ in 0..500 {
        field.advance();
    }
    field.initialize(333.0, 444.0);
    assert_eq!(field.particles().len(), PARTICLE_COUNT);
    for p in field.particles() {
        assert!((0.0..333.0).contains(&p.x));
        assert!((0.0..444.0).contains(&p.y));
    }
}
