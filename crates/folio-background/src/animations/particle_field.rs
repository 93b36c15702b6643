//! Particle field (stateful).
//!
//! A pool of softly glowing particles drifts across the viewport, shies away
//! from the pointer and is stitched together by faint lines between close
//! neighbours. A second, much smaller pool of shooting stars streaks across
//! the upper part of the sky now and then.

use std::f32::consts::{PI, TAU};

use folio_core::{GradientStop, Hsla, Paint, Point, Surface, Viewport};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::effect::Effect;

/// Viewport area covered by each particle.
pub const AREA_PER_PARTICLE: f32 = 8000.0;

/// Particles closer than this to the pointer are pushed away.
pub const REPULSION_RADIUS: f32 = 150.0;

/// Largest push, in units per frame, right next to the pointer.
const REPULSION_STRENGTH: f32 = 0.5;

/// Particles closer than this are joined by a line.
pub const LINK_DISTANCE: f32 = 100.0;

/// Alpha of a line between two coincident particles.
const LINK_MAX_ALPHA: f32 = 0.15;

const LINK_WIDTH: f32 = 0.5;

/// How far past the viewport a shooting star may travel before it is dropped.
pub const STAR_MARGIN: f32 = 100.0;

/// Opacity lost by a shooting star every frame.
pub const STAR_FADE_PER_TICK: f32 = 0.015;

const STAR_MIN_INTERVAL_MS: f32 = 2000.0;
const STAR_INTERVAL_JITTER_MS: f32 = 3000.0;
const STAR_SPAWN_CHANCE: f64 = 0.7;

/// Fraction of the viewport height, from the top, where stars appear.
const STAR_SPAWN_BAND: f32 = 0.4;

const STAR_TAIL_WIDTH: f32 = 2.0;
const STAR_HEAD_GLOW_RADIUS: f32 = 8.0;
const STAR_CORE_RADIUS: f32 = 2.0;

/// Number of particles for a viewport: one per [`AREA_PER_PARTICLE`], rounded down.
pub fn particle_count(viewport: Viewport) -> usize {
    if viewport.is_empty() {
        return 0;
    }
    (viewport.area() / AREA_PER_PARTICLE).floor() as usize
}

/// Alpha of the line joining two particles `distance` apart.
///
/// Falls off linearly from its maximum at zero distance to nothing at
/// [`LINK_DISTANCE`] and beyond.
pub fn link_alpha(distance: f32) -> f32 {
    if distance.is_nan() || distance >= LINK_DISTANCE {
        return 0.0;
    }
    (1.0 - distance.max(0.0) / LINK_DISTANCE) * LINK_MAX_ALPHA
}

/// One-frame nudge pushing `position` away from `pointer`.
///
/// Zero outside [`REPULSION_RADIUS`] and when the two coincide (there is no
/// direction to push in).
pub fn repulsion(position: Point, pointer: Point) -> Point {
    let dx = pointer.x - position.x;
    let dy = pointer.y - position.y;
    let distance = (dx * dx + dy * dy).sqrt();

    if distance >= REPULSION_RADIUS || distance == 0.0 {
        return Point::default();
    }

    let force = (REPULSION_RADIUS - distance) / REPULSION_RADIUS * REPULSION_STRENGTH;
    Point::new(-(dx / distance) * force, -(dy / distance) * force)
}

/// Wrap a coordinate into `[0, extent)`.
fn wrap(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid rounds tiny negative values up to `extent` itself
    if wrapped >= extent { 0.0 } else { wrapped }
}

/// A single drifting particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Point,
    /// Core radius; the glow extends to three times this.
    pub size: f32,
    /// Drift per frame.
    pub velocity: Point,
    /// Opacity before twinkling.
    pub opacity: f32,
    /// Twinkle angular speed, in radians per millisecond.
    pub twinkle_speed: f32,
    pub twinkle_phase: f32,
}

impl Particle {
    fn random(rng: &mut StdRng, viewport: Viewport) -> Self {
        Self {
            position: Point::new(
                wrap(rng.random::<f32>() * viewport.width, viewport.width),
                wrap(rng.random::<f32>() * viewport.height, viewport.height),
            ),
            size: rng.random::<f32>() * 2.0 + 0.5,
            velocity: Point::new(
                (rng.random::<f32>() - 0.5) * 0.3,
                (rng.random::<f32>() - 0.5) * 0.3,
            ),
            opacity: rng.random::<f32>() * 0.5 + 0.2,
            twinkle_speed: rng.random::<f32>() * 0.02 + 0.01,
            twinkle_phase: rng.random::<f32>() * TAU,
        }
    }

    /// Rendering alpha at the given time, after twinkling.
    pub fn alpha_at(&self, elapsed_ms: u64) -> f32 {
        let angle = elapsed_ms as f64 * self.twinkle_speed as f64 + self.twinkle_phase as f64;
        let twinkle = angle.sin() as f32 * 0.3 + 0.7;
        (self.opacity * twinkle).max(0.0)
    }
}

/// A short-lived streak across the sky.
#[derive(Debug, Clone, PartialEq)]
pub struct ShootingStar {
    /// Head of the streak.
    pub position: Point,
    /// Direction of travel in radians, between 30 and 60 degrees below horizontal.
    pub angle: f32,
    /// Tail length.
    pub length: f32,
    /// Distance covered per frame.
    pub speed: f32,
    pub opacity: f32,
    pub active: bool,
}

impl ShootingStar {
    fn random(rng: &mut StdRng, viewport: Viewport) -> Self {
        Self {
            position: Point::new(
                rng.random::<f32>() * viewport.width,
                rng.random::<f32>() * viewport.height * STAR_SPAWN_BAND,
            ),
            angle: PI / 6.0 + rng.random::<f32>() * (PI / 6.0),
            length: 80.0 + rng.random::<f32>() * 60.0,
            speed: 15.0 + rng.random::<f32>() * 10.0,
            opacity: 1.0,
            active: true,
        }
    }

    /// End of the tail, opposite the direction of travel.
    pub fn tail(&self) -> Point {
        Point::new(
            self.position.x - self.angle.cos() * self.length,
            self.position.y - self.angle.sin() * self.length,
        )
    }

    /// Whether the head has left the viewport by more than [`STAR_MARGIN`].
    pub fn is_out_of_bounds(&self, viewport: Viewport) -> bool {
        self.position.x > viewport.width + STAR_MARGIN
            || self.position.y > viewport.height + STAR_MARGIN
            || self.position.x < -STAR_MARGIN
            || self.position.y < -STAR_MARGIN
    }

    /// Move one frame along the travel angle and fade.
    pub fn advance(&mut self, viewport: Viewport) {
        if !self.active {
            return;
        }

        self.position.x += self.angle.cos() * self.speed;
        self.position.y += self.angle.sin() * self.speed;
        self.opacity -= STAR_FADE_PER_TICK;

        if self.opacity <= 0.0 || self.is_out_of_bounds(viewport) {
            self.active = false;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        if !self.active {
            return;
        }

        let head_color = Hsla::new(277.0, 100.0, 95.0, self.opacity);
        let trail_color = Hsla::new(274.0, 68.0, 59.0, self.opacity);

        let tail = Paint::Linear {
            from: self.position,
            to: self.tail(),
            stops: vec![
                GradientStop::new(0.0, head_color),
                GradientStop::new(0.3, trail_color.with_alpha(self.opacity * 0.6)),
                GradientStop::new(1.0, Hsla::transparent()),
            ],
        };
        surface.stroke_line(self.position, self.tail(), STAR_TAIL_WIDTH, &tail);

        let glow = Paint::Radial {
            center: self.position,
            radius: STAR_HEAD_GLOW_RADIUS,
            stops: vec![
                GradientStop::new(0.0, head_color),
                GradientStop::new(0.5, trail_color.with_alpha(self.opacity * 0.5)),
                GradientStop::new(1.0, Hsla::transparent()),
            ],
        };
        surface.fill_circle(self.position, STAR_HEAD_GLOW_RADIUS, &glow);
        surface.fill_circle(self.position, STAR_CORE_RADIUS, &Paint::Solid(head_color));
    }
}

/// Particle field state.
#[derive(Debug)]
pub struct ParticleField {
    viewport: Viewport,
    particles: Vec<Particle>,
    stars: Vec<ShootingStar>,
    /// Last known pointer position, if the pointer has moved at all.
    pointer: Option<Point>,
    /// Time of the last shooting-star spawn check.
    last_star_check_ms: u64,
    rng: StdRng,
}

impl ParticleField {
    /// Create a field sized to `viewport`, seeding its pools from `seed`.
    pub fn new(viewport: Viewport, seed: u64) -> Self {
        let mut field = Self {
            viewport,
            particles: Vec::new(),
            stars: Vec::new(),
            pointer: None,
            last_star_check_ms: 0,
            rng: StdRng::seed_from_u64(seed),
        };
        field.regenerate();
        field
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn stars(&self) -> &[ShootingStar] {
        &self.stars
    }

    /// Launch a shooting star immediately.
    pub fn spawn_star(&mut self) {
        let star = ShootingStar::random(&mut self.rng, self.viewport);
        self.stars.push(star);
    }

    /// Pairs of particles close enough to be linked, with the line alpha.
    pub fn links(&self) -> impl Iterator<Item = (Point, Point, f32)> + '_ {
        let particles = &self.particles;
        (0..particles.len()).flat_map(move |i| {
            (i + 1..particles.len()).filter_map(move |j| {
                let a = particles[i].position;
                let b = particles[j].position;
                let alpha = link_alpha(a.distance(b));
                (alpha > 0.0).then_some((a, b, alpha))
            })
        })
    }

    /// Throw away the particle pool and build a fresh one for the viewport.
    fn regenerate(&mut self) {
        let viewport = self.viewport;
        let rng = &mut self.rng;
        self.particles = (0..particle_count(viewport))
            .map(|_| Particle::random(rng, viewport))
            .collect();
    }

    /// Every 2-5 seconds, launch a star with 70% probability.
    fn maybe_spawn_star(&mut self, elapsed_ms: u64) {
        let interval = STAR_MIN_INTERVAL_MS + self.rng.random::<f32>() * STAR_INTERVAL_JITTER_MS;
        if elapsed_ms.saturating_sub(self.last_star_check_ms) as f32 > interval {
            if self.rng.random_bool(STAR_SPAWN_CHANCE) {
                self.spawn_star();
            }
            self.last_star_check_ms = elapsed_ms;
        }
    }

    fn update_stars(&mut self) {
        let viewport = self.viewport;
        for star in &mut self.stars {
            star.advance(viewport);
        }
        self.stars.retain(|star| star.active);
    }

    fn update_particles(&mut self) {
        let viewport = self.viewport;
        let pointer = self.pointer;

        for particle in &mut self.particles {
            if let Some(pointer) = pointer {
                let push = repulsion(particle.position, pointer);
                particle.position.x += push.x;
                particle.position.y += push.y;
            }

            particle.position.x += particle.velocity.x;
            particle.position.y += particle.velocity.y;

            particle.position.x = wrap(particle.position.x, viewport.width);
            particle.position.y = wrap(particle.position.y, viewport.height);
        }
    }

    fn draw_particle(surface: &mut dyn Surface, particle: &Particle, elapsed_ms: u64) {
        let alpha = particle.alpha_at(elapsed_ms);
        let glow_radius = particle.size * 3.0;

        let glow = Paint::Radial {
            center: particle.position,
            radius: glow_radius,
            stops: vec![
                GradientStop::new(0.0, Hsla::new(274.0, 68.0, 59.0, alpha)),
                GradientStop::new(0.5, Hsla::new(274.0, 100.0, 74.0, alpha * 0.5)),
                GradientStop::new(1.0, Hsla::transparent()),
            ],
        };
        surface.fill_circle(particle.position, glow_radius, &glow);

        let core = Paint::Solid(Hsla::new(277.0, 100.0, 83.0, alpha));
        surface.fill_circle(particle.position, particle.size, &core);
    }
}

impl Effect for ParticleField {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.regenerate();
    }

    fn pointer_moved(&mut self, pointer: Point) {
        self.pointer = Some(pointer);
    }

    fn update(&mut self, elapsed_ms: u64) {
        self.maybe_spawn_star(elapsed_ms);
        self.update_stars();
        self.update_particles();
    }

    fn draw(&self, surface: &mut dyn Surface, elapsed_ms: u64) {
        for star in &self.stars {
            star.draw(surface);
        }

        for particle in &self.particles {
            Self::draw_particle(surface, particle, elapsed_ms);
        }

        for (a, b, alpha) in self.links() {
            let paint = Paint::Solid(Hsla::new(274.0, 68.0, 59.0, alpha));
            surface.stroke_line(a, b, LINK_WIDTH, &paint);
        }
    }
}
