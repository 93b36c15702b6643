//! Terminal backend: renders drawing commands on a braille canvas.

use folio_core::{CompositeMode, Paint, Path, Point, Rect as SurfaceRect, Surface, Viewport};
use ratatui::{
    Frame,
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::canvas::{Canvas, Circle, Line, Points},
};

use crate::color::shade;

/// Surface units covered by one terminal cell horizontally.
pub const CELL_WIDTH: f32 = 8.0;

/// Surface units covered by one terminal cell vertically.
pub const CELL_HEIGHT: f32 = 16.0;

/// Curve subdivisions when flattening paths.
const CURVE_STEPS: usize = 4;

/// Radial paints smaller than this are drawn as a single dot.
const DOT_RADIUS: f32 = 6.0;

/// Brightness boost for marks drawn in [`CompositeMode::Screen`].
const SCREEN_GAIN: f32 = 1.4;

#[derive(Debug, Clone)]
enum Mark {
    Dot { at: Point, color: Color },
    Line { from: Point, to: Point, color: Color },
    Ring { center: Point, radius: f32, color: Color },
}

/// Collects drawing commands for one frame and paints them with ratatui.
///
/// The surface is sized as if each cell were an 8x16 pixel glyph, so the
/// effects see pixel-like dimensions and keep their on-screen density.
/// Terminals cannot blend, so translucent paints are flattened to a single
/// shaded color and filled shapes are reduced to outlines.
#[derive(Debug, Clone, Default)]
pub struct TerminalSurface {
    area: Rect,
    composite: CompositeMode,
    marks: Vec<Mark>,
}

impl TerminalSurface {
    pub fn new(area: Rect) -> Self {
        Self {
            area,
            ..Self::default()
        }
    }

    /// Follow a terminal resize.
    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    /// Center of a terminal cell in surface units.
    pub fn cell_center(&self, column: u16, row: u16) -> Point {
        let column = column.saturating_sub(self.area.x) as f32;
        let row = row.saturating_sub(self.area.y) as f32;
        Point::new(
            column * CELL_WIDTH + CELL_WIDTH / 2.0,
            row * CELL_HEIGHT + CELL_HEIGHT / 2.0,
        )
    }

    /// Number of marks collected this frame.
    pub fn mark_count(&self) -> usize {
        self.marks.len()
    }

    fn color_for(&self, paint: &Paint) -> Option<Color> {
        let gain = match self.composite {
            CompositeMode::SourceOver => 1.0,
            CompositeMode::Screen => SCREEN_GAIN,
        };
        shade(paint.peak_color(), gain)
    }

    fn push_path(&mut self, path: &Path, color: Color) {
        for polyline in path.flatten(CURVE_STEPS) {
            for pair in polyline.windows(2) {
                self.marks.push(Mark::Line {
                    from: pair[0],
                    to: pair[1],
                    color,
                });
            }
        }
    }

    /// Paint the collected marks over the whole area.
    pub fn render(&self, frame: &mut Frame) {
        let viewport = self.viewport();
        let width = viewport.width as f64;
        let height = viewport.height as f64;
        // canvas y grows upward, surface y grows downward
        let flip = |y: f32| height - y as f64;

        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(|ctx| {
                for mark in &self.marks {
                    match *mark {
                        Mark::Dot { at, color } => ctx.draw(&Points {
                            coords: &[(at.x as f64, flip(at.y))],
                            color,
                        }),
                        Mark::Line { from, to, color } => ctx.draw(&Line {
                            x1: from.x as f64,
                            y1: flip(from.y),
                            x2: to.x as f64,
                            y2: flip(to.y),
                            color,
                        }),
                        Mark::Ring {
                            center,
                            radius,
                            color,
                        } => ctx.draw(&Circle {
                            x: center.x as f64,
                            y: flip(center.y),
                            radius: radius as f64,
                            color,
                        }),
                    }
                }
            });

        frame.render_widget(canvas, self.area);
    }
}

impl Surface for TerminalSurface {
    fn viewport(&self) -> Viewport {
        Viewport::new(
            self.area.width as f32 * CELL_WIDTH,
            self.area.height as f32 * CELL_HEIGHT,
        )
    }

    fn clear(&mut self) {
        self.marks.clear();
        self.composite = CompositeMode::SourceOver;
    }

    fn set_composite(&mut self, mode: CompositeMode) {
        self.composite = mode;
    }

    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint) {
        let Some(color) = self.color_for(paint) else {
            return;
        };
        match paint {
            Paint::Radial { .. } if radius > DOT_RADIUS => self.marks.push(Mark::Ring {
                center,
                // the visible body of a soft glow sits well inside its radius
                radius: radius * 0.5,
                color,
            }),
            _ => self.marks.push(Mark::Dot { at: center, color }),
        }
    }

    fn fill_rect(&mut self, rect: SurfaceRect, paint: &Paint) {
        let Some(color) = self.color_for(paint) else {
            return;
        };
        let x = rect.x + rect.width / 2.0;
        self.marks.push(Mark::Line {
            from: Point::new(x, rect.y),
            to: Point::new(x, rect.y + rect.height),
            color,
        });
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        if let Some(color) = self.color_for(paint) {
            self.push_path(path, color);
        }
    }

    fn stroke_path(&mut self, path: &Path, _width: f32, paint: &Paint) {
        if let Some(color) = self.color_for(paint) {
            self.push_path(path, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{EffectSelection, Hsla};

    use crate::BackgroundState;

    #[test]
    fn test_viewport_scales_cells() {
        let surface = TerminalSurface::new(Rect::new(0, 0, 100, 40));
        assert_eq!(surface.viewport(), Viewport::new(800.0, 640.0));
    }

    #[test]
    fn test_cell_center() {
        let surface = TerminalSurface::new(Rect::new(0, 0, 100, 40));
        assert_eq!(surface.cell_center(0, 0), Point::new(4.0, 8.0));
        assert_eq!(surface.cell_center(10, 2), Point::new(84.0, 40.0));
    }

    #[test]
    fn test_invisible_paint_adds_no_marks() {
        let mut surface = TerminalSurface::new(Rect::new(0, 0, 10, 10));
        surface.fill_circle(Point::default(), 3.0, &Paint::Solid(Hsla::transparent()));
        assert_eq!(surface.mark_count(), 0);

        surface.fill_circle(
            Point::default(),
            3.0,
            &Paint::Solid(Hsla::new(277.0, 100.0, 83.0, 0.5)),
        );
        assert_eq!(surface.mark_count(), 1);

        surface.clear();
        assert_eq!(surface.mark_count(), 0);
    }

    #[test]
    fn test_backdrop_renders_into_terminal_surface() {
        let mut surface = TerminalSurface::new(Rect::new(0, 0, 120, 40));
        let mut state = BackgroundState::with_seed(EffectSelection::All, 5);
        state.render(&mut surface, 0);
        assert!(surface.mark_count() > 0);
    }
}
