//! Drawing commands emitted by effects.
//!
//! Effects never touch pixels directly. They describe each frame as a series
//! of calls on a [`Surface`], which a backend turns into output (a terminal
//! canvas, a browser 2D context, or a recorder in tests).

use crate::{Hsla, Point, Rect, Viewport};

/// A color stop along a gradient, `offset` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Hsla,
}

impl GradientStop {
    pub fn new(offset: f32, color: Hsla) -> Self {
        Self {
            offset: offset.clamp(0.0, 1.0),
            color,
        }
    }
}

/// How a shape is colored.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Hsla),
    /// Gradient between two points.
    Linear {
        from: Point,
        to: Point,
        stops: Vec<GradientStop>,
    },
    /// Gradient radiating from `center` out to `radius`.
    Radial {
        center: Point,
        radius: f32,
        stops: Vec<GradientStop>,
    },
}

impl Paint {
    /// The most opaque color the paint can produce.
    pub fn peak_color(&self) -> Hsla {
        match self {
            Paint::Solid(color) => *color,
            Paint::Linear { stops, .. } | Paint::Radial { stops, .. } => stops
                .iter()
                .map(|stop| stop.color)
                .fold(Hsla::transparent(), |best, c| {
                    if c.alpha > best.alpha { c } else { best }
                }),
        }
    }
}

/// How new drawing combines with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    #[default]
    SourceOver,
    /// Brightens overlaps (`screen` in canvas terms).
    Screen,
}

/// One step of a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { control: Point, to: Point },
    Close,
}

/// A sequence of path segments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, to: Point) -> &mut Self {
        self.segments.push(PathSegment::MoveTo(to));
        self
    }

    pub fn line_to(&mut self, to: Point) -> &mut Self {
        self.segments.push(PathSegment::LineTo(to));
        self
    }

    pub fn quad_to(&mut self, control: Point, to: Point) -> &mut Self {
        self.segments.push(PathSegment::QuadTo { control, to });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.segments.push(PathSegment::Close);
        self
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Approximate the path with straight polylines, one per subpath.
    ///
    /// Quadratic curves are split into `steps` line pieces.
    pub fn flatten(&self, steps: usize) -> Vec<Vec<Point>> {
        let steps = steps.max(1);
        let mut polylines: Vec<Vec<Point>> = Vec::new();
        let mut current: Vec<Point> = Vec::new();

        for segment in &self.segments {
            match *segment {
                PathSegment::MoveTo(p) => {
                    if current.len() > 1 {
                        polylines.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(p);
                }
                PathSegment::LineTo(p) => current.push(p),
                PathSegment::QuadTo { control, to } => {
                    let start = current.last().copied().unwrap_or(control);
                    for i in 1..=steps {
                        let t = i as f32 / steps as f32;
                        let mt = 1.0 - t;
                        current.push(Point::new(
                            mt * mt * start.x + 2.0 * mt * t * control.x + t * t * to.x,
                            mt * mt * start.y + 2.0 * mt * t * control.y + t * t * to.y,
                        ));
                    }
                }
                PathSegment::Close => {
                    if let Some(&first) = current.first() {
                        current.push(first);
                    }
                }
            }
        }
        if current.len() > 1 {
            polylines.push(current);
        }
        polylines
    }
}

/// A transparent overlay that effects draw onto.
pub trait Surface {
    /// Current drawing dimensions.
    fn viewport(&self) -> Viewport;

    /// Erase everything drawn so far this frame.
    fn clear(&mut self);

    fn set_composite(&mut self, mode: CompositeMode);

    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint);

    fn fill_rect(&mut self, rect: Rect, paint: &Paint);

    fn fill_path(&mut self, path: &Path, paint: &Paint);

    fn stroke_path(&mut self, path: &Path, width: f32, paint: &Paint);

    /// Straight stroked segment with round caps.
    fn stroke_line(&mut self, from: Point, to: Point, width: f32, paint: &Paint) {
        let mut path = Path::new();
        path.move_to(from).line_to(to);
        self.stroke_path(&path, width, paint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_quad_ends_on_target() {
        let mut path = Path::new();
        path.move_to(Point::new(0.0, 0.0))
            .quad_to(Point::new(10.0, 10.0), Point::new(20.0, 0.0));
        let lines = path.flatten(4);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), 5);
        assert_eq!(*lines[0].last().unwrap(), Point::new(20.0, 0.0));
    }

    #[test]
    fn test_flatten_close_returns_to_start() {
        let mut path = Path::new();
        path.move_to(Point::new(0.0, 0.0))
            .line_to(Point::new(5.0, 0.0))
            .line_to(Point::new(5.0, 5.0))
            .close();
        let lines = path.flatten(1);
        assert_eq!(lines[0].first(), lines[0].last());
    }

    #[test]
    fn test_peak_color_picks_most_opaque_stop() {
        let paint = Paint::Radial {
            center: Point::default(),
            radius: 10.0,
            stops: vec![
                GradientStop::new(0.0, Hsla::new(274.0, 68.0, 59.0, 0.4)),
                GradientStop::new(0.5, Hsla::new(274.0, 100.0, 74.0, 0.2)),
                GradientStop::new(1.0, Hsla::transparent()),
            ],
        };
        assert_eq!(paint.peak_color().alpha, 0.4);
    }
}
