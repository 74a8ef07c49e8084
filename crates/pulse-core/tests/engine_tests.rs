use pulse_core::color::clamp01;
use pulse_core::{
    hsv_to_rgb, point_count, wrap_hue, DrawCommand, ParamOverrides, ParameterSet, PatternEngine,
    Rgb, RingRadii, TunableField, MAX_POINTS_PER_FRAME,
};
use rand::{Rng, SeedableRng};

// ── Helpers ──────────────────────────────────────────────────────

const WIDTH: f64 = 400.0;
const HEIGHT: f64 = 400.0;

fn render(params: &ParameterSet, elapsed: f64) -> pulse_core::Frame {
    PatternEngine::new().render(params, elapsed, WIDTH, HEIGHT)
}

/// Channel-wise max/min of an RGB colour, in 0..=255.
fn channel_extremes(c: Rgb) -> (u8, u8) {
    let max = c.r.max(c.g).max(c.b);
    let min = c.r.min(c.g).min(c.b);
    (max, min)
}

// ── 1. Ring sampling ─────────────────────────────────────────────

#[test]
fn innermost_ring_has_four_points() {
    assert_eq!(point_count(5.0, 0.8), 4);
}

#[test]
fn ring_at_r_max_has_ninety_six_points() {
    assert_eq!(point_count(120.0, 0.8), 96);
}

#[test]
fn low_density_inner_ring_is_skipped() {
    assert_eq!(point_count(1.0, 0.5), 0);
}

#[test]
fn ring_radii_follow_step_grid() {
    let params = ParameterSet::baseline();
    let radii: Vec<f64> = RingRadii::new(&params).collect();
    for (k, r) in radii.iter().enumerate() {
        assert_eq!(*r, params.r_min + k as f64 * params.r_step);
        assert!(*r <= params.r_max);
    }
}

#[test]
fn baseline_frame_point_total_matches_ring_sum() {
    let params = ParameterSet::baseline();
    let expected: usize = RingRadii::new(&params)
        .map(|r| point_count(r, params.density_factor))
        .sum();
    assert_eq!(render(&params, 0.0).len(), expected);
}

// ── 2. End-to-end frame at t = 0 ─────────────────────────────────

#[test]
fn first_point_matches_direct_computation() {
    let params = ParameterSet::baseline();
    let frame = render(&params, 0.0);

    assert_eq!(frame.background, Rgb::new(5, 5, 15));
    assert_eq!(frame.width, 400.0);

    // First ring r = 5 has four points, angle 0 for the first.
    let r = 5.0;
    let ratio = r / params.r_max;
    let radius_mod = 1.0 + (r / params.radius_divisor).sin() * params.radius_amplitude;
    let modified_radius = r * radius_mod * params.breath_base;
    let modified_angle = ratio * params.rotation_base;
    let scale = (WIDTH / 400.0) * params.scale;
    let x = modified_angle.cos() * modified_radius * scale + 200.0;
    let y = modified_angle.sin() * modified_radius * scale + 200.0;

    let p = frame.points[0];
    assert!((p.x as f64 - x).abs() < 1e-3, "x: {} vs {}", p.x, x);
    assert!((p.y as f64 - y).abs() < 1e-3, "y: {} vs {}", p.y, y);

    let saturation = (params.base_saturation - ratio * params.saturation_range) / 100.0;
    let value = (params.base_lightness + ratio * params.lightness_range) / 100.0;
    assert_eq!(p.color, hsv_to_rgb(0.0, saturation, value));

    let dot = params.dot_size * (1.0 - ratio * params.dot_size_variation_factor);
    assert!((p.radius as f64 - dot).abs() < 1e-6);
}

#[test]
fn draw_commands_clear_then_fill_every_point() {
    let params = ParameterSet::baseline();
    let frame = render(&params, 0.5);
    let commands: Vec<DrawCommand> = frame.draw_commands().collect();
    assert_eq!(commands.len(), frame.len() + 1);
    assert_eq!(commands[0], DrawCommand::Clear(params.background_color));
    assert!(commands[1..]
        .iter()
        .all(|c| matches!(c, DrawCommand::FillCircle { .. })));
}

// ── 3. Determinism ───────────────────────────────────────────────

#[test]
fn same_inputs_give_identical_frames() {
    let params = ParameterSet::baseline();
    for elapsed in [0.0, 0.016, 3.7, 125.0] {
        assert_eq!(render(&params, elapsed), render(&params, elapsed));
    }
}

#[test]
fn time_moves_points() {
    let params = ParameterSet::baseline();
    let a = render(&params, 0.0);
    let b = render(&params, 1.0);
    assert_eq!(a.len(), b.len());
    assert_ne!(a.points, b.points);
}

#[test]
fn zero_speed_freezes_animation() {
    let mut params = ParameterSet::baseline();
    params.speed = 0.0;
    assert_eq!(render(&params, 0.0), render(&params, 42.0));
}

// ── 4. Colour clamping ───────────────────────────────────────────

#[test]
fn negative_saturation_clamps_to_grey() {
    let mut params = ParameterSet::baseline();
    params.base_saturation = 0.0;
    params.saturation_range = 100.0;
    let frame = render(&params, 1.0);
    for p in &frame.points {
        assert_eq!(p.color.r, p.color.g);
        assert_eq!(p.color.g, p.color.b);
    }
}

#[test]
fn lightness_above_one_hundred_clamps_to_full_value() {
    let mut params = ParameterSet::baseline();
    params.base_lightness = 200.0;
    let frame = render(&params, 0.0);
    for p in &frame.points {
        let (max, _) = channel_extremes(p.color);
        assert_eq!(max, 255);
    }
}

#[test]
fn colors_stay_within_clamped_hsv() {
    let params = ParameterSet::baseline();
    let frame = render(&params, 7.3);
    // Saturation peaks at baseSaturation on the innermost ring and falls outward.
    let max_sat = clamp01(params.base_saturation / 100.0);
    for p in &frame.points {
        let (max, min) = channel_extremes(p.color);
        if max > 0 {
            let sat = 1.0 - min as f64 / max as f64;
            assert!(sat <= max_sat + 0.02, "saturation {} too high", sat);
        }
    }
}

// ── 5. Dot radius and hue invariants ─────────────────────────────

#[test]
fn dot_radius_never_below_minimum() {
    let mut params = ParameterSet::baseline();
    params.dot_size_variation_factor = 5.0;
    let frame = render(&params, 0.0);
    assert!(frame.points.iter().all(|p| p.radius >= 0.5));
    // Outer rings hit the floor exactly.
    assert_eq!(frame.points.last().map(|p| p.radius), Some(0.5));
}

#[test]
fn smallest_dot_at_r_max_is_clamped_to_minimum() {
    let mut params = ParameterSet::baseline();
    params.dot_size = 0.5;
    params.dot_size_variation_factor = 1.0;
    params.r_min = params.r_max - params.r_step;
    let radii: Vec<f64> = RingRadii::new(&params).collect();
    assert_eq!(radii.last().copied(), Some(params.r_max));

    let frame = render(&params, 3.0);
    let outer = point_count(params.r_max, params.density_factor);
    assert_eq!(frame.len(), point_count(params.r_min, params.density_factor) + outer);
    assert!(frame.points.iter().all(|p| p.radius >= 0.5));
    // Raw radius on the rMax ring is 0.5 * (1 - 1) = 0.
    assert!(frame.points[frame.len() - outer..].iter().all(|p| p.radius == 0.5));
}

#[test]
fn hue_stays_in_range_for_any_inputs() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(360);
    for _ in 0..10_000 {
        let angle: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
        let t: f64 = rng.gen_range(-1e6..1e6);
        let hue_range: f64 = rng.gen_range(-1e5..1e5);
        let hue_speed: f64 = rng.gen_range(-1e4..1e4);
        let hue = wrap_hue((angle / std::f64::consts::TAU) * hue_range + t * hue_speed);
        assert!((0.0..360.0).contains(&hue), "hue {} out of range", hue);
    }
}

#[test]
fn points_stay_finite_for_long_runs() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let params = ParameterSet::baseline();
    for _ in 0..20 {
        let elapsed: f64 = rng.gen_range(0.0..10_000.0);
        let frame = render(&params, elapsed);
        assert!(!frame.is_empty());
        assert!(frame
            .points
            .iter()
            .all(|p| p.x.is_finite() && p.y.is_finite()));
    }
}

#[test]
fn hue_advances_with_time() {
    let params = ParameterSet::baseline();
    // t = 15 * 0.8 = 12, so the first point's hue sits at 12 * 10 = 120 (green).
    let frame = render(&params, 15.0);
    let first = frame.points[0].color;
    assert!(first.g > first.r && first.g > first.b, "{:?}", first);
}

// ── 6. Overrides flow into the frame ─────────────────────────────

#[test]
fn density_override_changes_point_total() {
    let base = ParameterSet::baseline();
    let dense = base.derive(&ParamOverrides::new().with(TunableField::DensityFactor, 2.0));
    assert!(render(&dense, 0.0).len() > render(&base, 0.0).len());
}

#[test]
fn scale_tracks_surface_width() {
    let params = ParameterSet::baseline();
    let small = PatternEngine::new().render(&params, 0.0, 400.0, 400.0);
    let large = PatternEngine::new().render(&params, 0.0, 800.0, 800.0);
    let a = small.points[0];
    let b = large.points[0];
    assert!(((b.x - 400.0) - 2.0 * (a.x - 200.0)).abs() < 1e-3);
    assert!(((b.y - 400.0) - 2.0 * (a.y - 200.0)).abs() < 1e-3);
}

// ── 7. Extreme parameters ────────────────────────────────────────

fn extreme_density() -> ParameterSet {
    ParameterSet::baseline().derive(&ParamOverrides::new().with(TunableField::DensityFactor, 1e15))
}

#[test]
fn extreme_density_is_cut_at_ceiling_without_budget() {
    let frame = render(&extreme_density(), 1.0);
    assert_eq!(frame.len(), MAX_POINTS_PER_FRAME);
    assert!(frame.points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
}

#[test]
fn extreme_density_respects_budget() {
    let frame = PatternEngine::with_point_budget(Some(1000)).render(&extreme_density(), 1.0, WIDTH, HEIGHT);
    assert_eq!(frame.len(), 1000);
}

#[test]
fn infinite_density_still_renders() {
    let mut params = ParameterSet::baseline();
    params.density_factor = f64::INFINITY;
    let frame = PatternEngine::with_point_budget(Some(64)).render(&params, 0.0, WIDTH, HEIGHT);
    assert_eq!(frame.len(), 64);
}

#[test]
fn extreme_amplitudes_give_defined_frames() {
    let params = ParameterSet::baseline().derive(
        &ParamOverrides::new()
            .with(TunableField::WaveAmplitude, 1e9)
            .with(TunableField::RotationAmplitude, -1e9)
            .with(TunableField::AngleFrequency, 1e12),
    );
    let frame = render(&params, 2.5);
    assert_eq!(frame.len(), PatternEngine::estimated_points(&params));
    assert!(frame.points.iter().all(|p| p.radius >= 0.5));
}
