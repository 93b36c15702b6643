//! Nebula clouds (stateful).
//!
//! A fixed pool of large, softly pulsing gas clouds drifts slowly across the
//! viewport. The pointer shifts each cloud by a depth-dependent parallax
//! offset, eased toward the live pointer so the clouds lag behind it. Gas
//! streaks are screened underneath and a scatter of dust motes floats on top.

use std::f32::consts::TAU;

use folio_core::{CompositeMode, GradientStop, Hsla, Paint, Path, Point, Surface, Viewport};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::effect::Effect;

/// Clouds in the pool.
pub const CLOUD_COUNT: usize = 12;

/// Fraction of the remaining distance the smoothed pointer covers each frame.
pub const POINTER_EASING: f32 = 0.05;

/// Dust motes drawn each frame.
pub const DUST_COUNT: usize = 50;

/// Gas streaks drawn each frame.
pub const STREAK_COUNT: usize = 3;

/// Parallax shift, in units, for a cloud at full pointer deflection.
pub fn parallax_strength(index: usize) -> f32 {
    30.0 + (index % 4) as f32 * 15.0
}

/// Wrap a coordinate into `[-pad, extent + pad]`, jumping to the far side.
fn wrap_padded(value: f32, extent: f32, pad: f32) -> f32 {
    if value < -pad {
        extent + pad
    } else if value > extent + pad {
        -pad
    } else {
        value
    }
}

/// A single gas cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    pub position: Point,
    pub radius: f32,
    pub hue: f32,
    /// Opacity before pulsing.
    pub opacity: f32,
    /// Drift per frame.
    pub drift: Point,
    /// Pulse angular speed, in radians per millisecond.
    pub pulse_speed: f32,
    pub pulse_phase: f32,
}

impl Cloud {
    fn random(rng: &mut StdRng, viewport: Viewport) -> Self {
        Self {
            position: Point::new(
                rng.random::<f32>() * viewport.width,
                rng.random::<f32>() * viewport.height,
            ),
            radius: 150.0 + rng.random::<f32>() * 250.0,
            hue: 260.0 + rng.random::<f32>() * 40.0,
            opacity: 0.03 + rng.random::<f32>() * 0.04,
            drift: Point::new(
                (rng.random::<f32>() - 0.5) * 0.1,
                (rng.random::<f32>() - 0.5) * 0.1,
            ),
            pulse_speed: 0.0005 + rng.random::<f32>() * 0.001,
            pulse_phase: rng.random::<f32>() * TAU,
        }
    }

    /// Pulse factor in `[0.4, 1.0]`.
    pub fn pulse_at(&self, elapsed_ms: u64) -> f32 {
        let angle = elapsed_ms as f64 * self.pulse_speed as f64 + self.pulse_phase as f64;
        angle.sin() as f32 * 0.3 + 0.7
    }

    fn drift(&mut self, viewport: Viewport) {
        self.position.x += self.drift.x;
        self.position.y += self.drift.y;
        self.position.x = wrap_padded(self.position.x, viewport.width, self.radius);
        self.position.y = wrap_padded(self.position.y, viewport.height, self.radius);
    }

    fn draw(&self, surface: &mut dyn Surface, offset: Point, elapsed_ms: u64) {
        let pulse = self.pulse_at(elapsed_ms);
        let alpha = (self.opacity * pulse).max(0.0);
        let radius = self.radius * (0.9 + pulse * 0.2);
        let center = Point::new(self.position.x + offset.x, self.position.y + offset.y);

        let paint = Paint::Radial {
            center,
            radius,
            stops: vec![
                GradientStop::new(0.0, Hsla::new(self.hue, 70.0, 60.0, alpha * 1.5)),
                GradientStop::new(0.2, Hsla::new(self.hue + 10.0, 60.0, 50.0, alpha)),
                GradientStop::new(0.5, Hsla::new(self.hue - 10.0, 50.0, 40.0, alpha * 0.6)),
                GradientStop::new(0.8, Hsla::new(self.hue + 20.0, 40.0, 30.0, alpha * 0.3)),
                GradientStop::new(1.0, Hsla::transparent()),
            ],
        };
        surface.fill_circle(center, radius, &paint);
    }
}

/// A dust mote's position, radius and alpha at a point in time.
pub fn dust_mote(index: usize, viewport: Viewport, elapsed_secs: f32) -> (Point, f32, f32) {
    let i = index as f32;
    let t = elapsed_secs;

    let base_x = viewport.width / DUST_COUNT as f32 * i;
    let base_y = viewport.height * 0.3 + (i * 0.5 + t * 0.1).sin() * 100.0;
    let x = base_x + (t * 0.05 + i).sin() * 20.0;
    let y = base_y + (t * 0.03 + i * 0.7).cos() * 30.0;
    let size = 1.0 + (t * 0.2 + i).sin() * 0.5;
    let alpha = 0.1 + (t * 0.1 + i * 0.3).sin() * 0.05;

    (Point::new(x, y), size, alpha)
}

/// Nebula state.
#[derive(Debug)]
pub struct Nebula {
    viewport: Viewport,
    clouds: Vec<Cloud>,
    /// Pointer position normalized to `[-1, 1]`, eased toward `pointer_target`.
    pointer: Point,
    pointer_target: Point,
    rng: StdRng,
}

impl Nebula {
    pub fn new(viewport: Viewport, seed: u64) -> Self {
        let mut nebula = Self {
            viewport,
            clouds: Vec::with_capacity(CLOUD_COUNT),
            pointer: Point::default(),
            pointer_target: Point::default(),
            rng: StdRng::seed_from_u64(seed),
        };
        nebula.regenerate();
        nebula
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    /// The eased pointer, normalized to `[-1, 1]` on each axis.
    pub fn smoothed_pointer(&self) -> Point {
        self.pointer
    }

    pub fn pointer_target(&self) -> Point {
        self.pointer_target
    }

    /// Draw-time offset for cloud `index` at the current smoothed pointer.
    pub fn parallax_offset(&self, index: usize) -> Point {
        let strength = parallax_strength(index);
        Point::new(self.pointer.x * strength, self.pointer.y * strength)
    }

    fn regenerate(&mut self) {
        let viewport = self.viewport;
        let rng = &mut self.rng;
        self.clouds = (0..CLOUD_COUNT)
            .map(|_| Cloud::random(rng, viewport))
            .collect();
    }

    fn draw_gas_streaks(&self, surface: &mut dyn Surface, elapsed_secs: f32) {
        let t = elapsed_secs;
        let viewport = self.viewport;

        surface.set_composite(CompositeMode::Screen);

        for index in 0..STREAK_COUNT {
            let i = index as f32;
            let start = Point::new(
                (t * 0.02 + i * 2.0).sin() * 200.0,
                viewport.height * 0.2 + i * 150.0,
            );
            let end = Point::new(
                viewport.width + (t * 0.015 + i).cos() * 100.0,
                start.y + (t * 0.01 + i).sin() * 100.0,
            );
            let control = Point::new(
                viewport.width / 2.0 + (t * 0.01 + i).sin() * 200.0,
                start.y + 100.0 + (t * 0.02 + i).cos() * 50.0,
            );

            let paint = Paint::Linear {
                from: start,
                to: end,
                stops: vec![
                    GradientStop::new(0.0, Hsla::transparent()),
                    GradientStop::new(0.3, Hsla::new(270.0 + i * 15.0, 60.0, 50.0, 0.02)),
                    GradientStop::new(0.5, Hsla::new(280.0 + i * 10.0, 70.0, 55.0, 0.03)),
                    GradientStop::new(0.7, Hsla::new(265.0 + i * 20.0, 60.0, 45.0, 0.02)),
                    GradientStop::new(1.0, Hsla::transparent()),
                ],
            };

            let mut path = Path::new();
            path.move_to(start).quad_to(control, end);
            surface.stroke_path(&path, 80.0 + i * 30.0, &paint);
        }

        surface.set_composite(CompositeMode::SourceOver);
    }

    fn draw_dust(&self, surface: &mut dyn Surface, elapsed_secs: f32) {
        for index in 0..DUST_COUNT {
            let (center, size, alpha) = dust_mote(index, self.viewport, elapsed_secs);
            let paint = Paint::Solid(Hsla::new(277.0, 80.0, 75.0, alpha));
            surface.fill_circle(center, size, &paint);
        }
    }
}

impl Effect for Nebula {
    fn name(&self) -> &'static str {
        "nebula"
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.regenerate();
    }

    fn pointer_moved(&mut self, pointer: Point) {
        if self.viewport.is_empty() {
            return;
        }
        self.pointer_target = Point::new(
            (pointer.x / self.viewport.width - 0.5) * 2.0,
            (pointer.y / self.viewport.height - 0.5) * 2.0,
        );
    }

    fn update(&mut self, _elapsed_ms: u64) {
        self.pointer.x += (self.pointer_target.x - self.pointer.x) * POINTER_EASING;
        self.pointer.y += (self.pointer_target.y - self.pointer.y) * POINTER_EASING;

        let viewport = self.viewport;
        for cloud in &mut self.clouds {
            cloud.drift(viewport);
        }
    }

    fn draw(&self, surface: &mut dyn Surface, elapsed_ms: u64) {
        let elapsed_secs = (elapsed_ms as f64 / 1000.0) as f32;

        self.draw_gas_streaks(surface, elapsed_secs);

        for (index, cloud) in self.clouds.iter().enumerate() {
            cloud.draw(surface, self.parallax_offset(index), elapsed_ms);
        }

        self.draw_dust(surface, elapsed_secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DrawCommand, RecordingSurface};

    #[test]
    fn test_pool_is_fixed_size() {
        let mut nebula = Nebula::new(Viewport::new(800.0, 600.0), 1);
        assert_eq!(nebula.clouds().len(), CLOUD_COUNT);
        nebula.resize(Viewport::new(3000.0, 2000.0));
        assert_eq!(nebula.clouds().len(), CLOUD_COUNT);
    }

    #[test]
    fn test_clouds_stay_in_padded_space() {
        let viewport = Viewport::new(300.0, 200.0);
        let mut nebula = Nebula::new(viewport, 4);
        for cloud in &mut nebula.clouds {
            cloud.drift = Point::new(cloud.drift.x * 400.0, cloud.drift.y * 400.0);
        }

        for tick in 0..5000 {
            nebula.update(tick);
            for c in nebula.clouds() {
                assert!(c.position.x >= -c.radius && c.position.x <= viewport.width + c.radius);
                assert!(c.position.y >= -c.radius && c.position.y <= viewport.height + c.radius);
            }
        }
    }

    #[test]
    fn test_wrap_padded_jumps_to_far_side() {
        assert_eq!(wrap_padded(-151.0, 800.0, 150.0), 950.0);
        assert_eq!(wrap_padded(951.0, 800.0, 150.0), -150.0);
        assert_eq!(wrap_padded(400.0, 800.0, 150.0), 400.0);
    }

    #[test]
    fn test_pointer_eases_toward_target() {
        let mut nebula = Nebula::new(Viewport::new(800.0, 600.0), 2);
        nebula.pointer_moved(Point::new(800.0, 0.0));
        assert_eq!(nebula.pointer_target(), Point::new(1.0, -1.0));

        nebula.update(0);
        let first = nebula.smoothed_pointer();
        assert!((first.x - POINTER_EASING).abs() < 1e-6);
        assert!((first.y + POINTER_EASING).abs() < 1e-6);

        let mut previous = first.x;
        for _ in 0..200 {
            nebula.update(0);
            let current = nebula.smoothed_pointer().x;
            assert!(current > previous && current <= 1.0);
            previous = current;
        }
        assert!(previous > 0.99);
    }

    #[test]
    fn test_parallax_is_not_persisted() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut nebula = Nebula::new(viewport, 8);
        nebula.pointer = Point::new(1.0, 1.0);
        let before: Vec<Point> = nebula.clouds().iter().map(|c| c.position).collect();

        let mut surface = RecordingSurface::new(viewport);
        nebula.draw(&mut surface, 1_000);

        let after: Vec<Point> = nebula.clouds().iter().map(|c| c.position).collect();
        assert_eq!(before, after);

        let centers: Vec<Point> = surface
            .circles()
            .filter(|(_, _, paint)| matches!(paint, Paint::Radial { .. }))
            .map(|(center, _, _)| center)
            .collect();
        assert_eq!(centers.len(), CLOUD_COUNT);
        for (index, center) in centers.iter().enumerate() {
            let expected = before[index].x + parallax_strength(index);
            assert!((center.x - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn test_parallax_strength_bands() {
        assert_eq!(parallax_strength(0), 30.0);
        assert_eq!(parallax_strength(1), 45.0);
        assert_eq!(parallax_strength(3), 75.0);
        assert_eq!(parallax_strength(4), 30.0);
    }

    #[test]
    fn test_streaks_use_screen_then_restore() {
        let viewport = Viewport::new(800.0, 600.0);
        let nebula = Nebula::new(viewport, 3);
        let mut surface = RecordingSurface::new(viewport);
        nebula.draw(&mut surface, 500);

        let modes: Vec<CompositeMode> = surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Composite(mode) => Some(*mode),
                _ => None,
            })
            .collect();
        assert_eq!(modes, vec![CompositeMode::Screen, CompositeMode::SourceOver]);
        assert_eq!(surface.composite(), CompositeMode::SourceOver);
        assert_eq!(surface.strokes().count(), STREAK_COUNT);
        assert_eq!(surface.circles().count(), CLOUD_COUNT + DUST_COUNT);
    }

    #[test]
    fn test_dust_is_deterministic() {
        let viewport = Viewport::new(1000.0, 800.0);
        for index in [0, 7, 49] {
            assert_eq!(
                dust_mote(index, viewport, 12.5),
                dust_mote(index, viewport, 12.5)
            );
            let (_, size, alpha) = dust_mote(index, viewport, 12.5);
            assert!(size > 0.0);
            assert!(alpha > 0.0);
        }
    }

    #[test]
    fn test_pulse_range() {
        let nebula = Nebula::new(Viewport::new(800.0, 600.0), 6);
        for cloud in nebula.clouds() {
            for ms in (0..60_000).step_by(250) {
                let pulse = cloud.pulse_at(ms);
                assert!((0.4 - 1e-6..=1.0 + 1e-6).contains(&pulse));
            }
        }
    }
}
