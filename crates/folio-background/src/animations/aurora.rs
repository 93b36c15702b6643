//! Aurora bands (stateless).
//!
//! Every frame is a pure function of elapsed time and horizontal position:
//! three translucent wave bands hang from the top edge, each with a thin glow
//! along its lower edge, and a handful of faint vertical rays sway in front.

use folio_core::{GradientStop, Hsla, Paint, Path, Point, Rect, Surface, Viewport};

use crate::effect::Effect;

/// Horizontal distance between waveform samples.
pub const SAMPLE_STEP: f32 = 20.0;

/// Number of shimmer rays.
pub const RAY_COUNT: usize = 5;

const RAY_WIDTH: f32 = 80.0;
const RAY_SWAY: f32 = 30.0;

/// Fraction of the viewport height covered by the rays.
const RAY_HEIGHT: f32 = 0.35;

/// Fraction of the viewport height the band gradient spans.
const BAND_GRADIENT_HEIGHT: f32 = 0.5;

const GLOW_WIDTH: f32 = 2.0;
const GLOW_ALPHA: f32 = 0.15;

/// One wave band's fixed parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuroraLayer {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    /// Resting height of the band edge, as a fraction of the viewport height.
    pub offset: f32,
    pub amplitude: f32,
    /// Phase speed, in radians per second.
    pub speed: f32,
}

/// The three bands, back to front.
pub const LAYERS: [AuroraLayer; 3] = [
    AuroraLayer {
        hue: 274.0,
        saturation: 68.0,
        lightness: 59.0,
        offset: 0.12,
        amplitude: 40.0,
        speed: 0.15,
    },
    AuroraLayer {
        hue: 280.0,
        saturation: 80.0,
        lightness: 65.0,
        offset: 0.18,
        amplitude: 50.0,
        speed: 0.12,
    },
    AuroraLayer {
        hue: 260.0,
        saturation: 70.0,
        lightness: 55.0,
        offset: 0.08,
        amplitude: 35.0,
        speed: 0.18,
    },
];

/// Height of band `index`'s edge at horizontal position `x`.
pub fn band_edge(index: usize, x: f32, height: f32, elapsed_secs: f32) -> f32 {
    let layer = &LAYERS[index % LAYERS.len()];
    let base = height * layer.offset;
    let primary = (x * 0.002 + elapsed_secs * layer.speed).sin() * layer.amplitude;
    let secondary = (x * 0.004 + elapsed_secs * layer.speed * 0.7 + index as f32 * 2.0).sin()
        * (layer.amplitude * 0.4);
    base + primary + secondary
}

/// Horizontal center of shimmer ray `index`.
pub fn ray_center(index: usize, width: f32, elapsed_secs: f32) -> f32 {
    let base = width / (RAY_COUNT as f32 + 1.0) * (index as f32 + 1.0);
    base + (elapsed_secs * 0.3 + index as f32 * 1.5).sin() * RAY_SWAY
}

/// Peak alpha of shimmer ray `index`. Always positive.
pub fn ray_alpha(index: usize, elapsed_secs: f32) -> f32 {
    0.015 + (elapsed_secs * 0.2 + index as f32).sin() * 0.01
}

/// Append the smoothed waveform for band `index` to `path`.
///
/// Consecutive samples are joined by a quadratic curve through the previous
/// sample ending at the midpoint, which rounds off the coarse sampling.
/// A `fill` trace starts with a line from the current point and runs one
/// sample past the right edge so the band reaches it.
fn trace_edge(path: &mut Path, index: usize, viewport: Viewport, elapsed_secs: f32, fill: bool) {
    let limit = if fill {
        viewport.width + SAMPLE_STEP
    } else {
        viewport.width
    };

    let mut previous: Option<Point> = None;
    let mut x = 0.0;
    while x <= limit {
        let point = Point::new(x, band_edge(index, x, viewport.height, elapsed_secs));
        match previous {
            None if fill => {
                path.line_to(point);
            }
            None => {
                path.move_to(point);
            }
            Some(prev) => {
                let mid = Point::new((prev.x + point.x) / 2.0, (prev.y + point.y) / 2.0);
                path.quad_to(prev, mid);
            }
        }
        previous = Some(point);
        x += SAMPLE_STEP;
    }
}

/// Aurora state: only the surface dimensions.
#[derive(Debug, Clone, Default)]
pub struct Aurora {
    viewport: Viewport,
}

impl Aurora {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn draw_band(&self, surface: &mut dyn Surface, index: usize, elapsed_secs: f32) {
        let layer = &LAYERS[index];
        let viewport = self.viewport;
        let color = |alpha| Hsla::new(layer.hue, layer.saturation, layer.lightness, alpha);

        let mut band = Path::new();
        band.move_to(Point::new(0.0, 0.0));
        trace_edge(&mut band, index, viewport, elapsed_secs, true);
        band.line_to(Point::new(viewport.width, 0.0)).close();

        let fill = Paint::Linear {
            from: Point::new(0.0, 0.0),
            to: Point::new(0.0, viewport.height * BAND_GRADIENT_HEIGHT),
            stops: vec![
                GradientStop::new(0.0, Hsla::transparent()),
                GradientStop::new(0.2, color(0.02)),
                GradientStop::new(0.4, color(0.06)),
                GradientStop::new(0.6, color(0.04)),
                GradientStop::new(1.0, Hsla::transparent()),
            ],
        };
        surface.fill_path(&band, &fill);

        let mut edge = Path::new();
        trace_edge(&mut edge, index, viewport, elapsed_secs, false);
        let glow = Paint::Solid(Hsla::new(
            layer.hue,
            layer.saturation,
            layer.lightness + 20.0,
            GLOW_ALPHA,
        ));
        surface.stroke_path(&edge, GLOW_WIDTH, &glow);
    }

    fn draw_ray(&self, surface: &mut dyn Surface, index: usize, elapsed_secs: f32) {
        let x = ray_center(index, self.viewport.width, elapsed_secs);
        let alpha = ray_alpha(index, elapsed_secs);
        let height = self.viewport.height * RAY_HEIGHT;

        let paint = Paint::Linear {
            from: Point::new(x, 0.0),
            to: Point::new(x, height),
            stops: vec![
                GradientStop::new(0.0, Hsla::new(277.0, 80.0, 70.0, alpha)),
                GradientStop::new(0.5, Hsla::new(274.0, 68.0, 59.0, alpha * 0.8)),
                GradientStop::new(1.0, Hsla::transparent()),
            ],
        };
        surface.fill_rect(Rect::new(x - RAY_WIDTH / 2.0, 0.0, RAY_WIDTH, height), &paint);
    }
}

impl Effect for Aurora {
    fn name(&self) -> &'static str {
        "aurora"
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn pointer_moved(&mut self, _pointer: Point) {}

    fn update(&mut self, _elapsed_ms: u64) {}

    fn draw(&self, surface: &mut dyn Surface, elapsed_ms: u64) {
        let elapsed_secs = (elapsed_ms as f64 / 1000.0) as f32;

        for index in 0..LAYERS.len() {
            self.draw_band(surface, index, elapsed_secs);
        }
        for index in 0..RAY_COUNT {
            self.draw_ray(surface, index, elapsed_secs);
        }
    }
}
