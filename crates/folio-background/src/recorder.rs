//! A surface that records drawing commands instead of rendering them.

use folio_core::{CompositeMode, Paint, Path, Point, Rect, Surface, Viewport};

/// One recorded call on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Composite(CompositeMode),
    Circle {
        center: Point,
        radius: f32,
        paint: Paint,
    },
    Rect {
        rect: Rect,
        paint: Paint,
    },
    FillPath {
        path: Path,
        paint: Paint,
    },
    StrokePath {
        path: Path,
        width: f32,
        paint: Paint,
    },
}

/// Records every drawing call in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    viewport: Viewport,
    composite: CompositeMode,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop everything recorded so far.
    pub fn reset(&mut self) {
        self.commands.clear();
        self.composite = CompositeMode::SourceOver;
    }

    /// The composite mode currently in effect.
    pub fn composite(&self) -> CompositeMode {
        self.composite
    }

    pub fn circles(&self) -> impl Iterator<Item = (Point, f32, &Paint)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Circle {
                center,
                radius,
                paint,
            } => Some((*center, *radius, paint)),
            _ => None,
        })
    }

    pub fn rects(&self) -> impl Iterator<Item = (Rect, &Paint)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Rect { rect, paint } => Some((*rect, paint)),
            _ => None,
        })
    }

    pub fn fill_paths(&self) -> impl Iterator<Item = (&Path, &Paint)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::FillPath { path, paint } => Some((path, paint)),
            _ => None,
        })
    }

    pub fn strokes(&self) -> impl Iterator<Item = (&Path, f32, &Paint)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::StrokePath { path, width, paint } => Some((path, *width, paint)),
            _ => None,
        })
    }

    /// Every alpha the recorded paints reference.
    pub fn alphas(&self) -> Vec<f32> {
        fn paint_alphas(paint: &Paint, out: &mut Vec<f32>) {
            match paint {
                Paint::Solid(c) => out.push(c.alpha),
                Paint::Linear { stops, .. } | Paint::Radial { stops, .. } => {
                    out.extend(stops.iter().map(|s| s.color.alpha))
                }
            }
        }

        let mut out = Vec::new();
        for command in &self.commands {
            match command {
                DrawCommand::Circle { paint, .. }
                | DrawCommand::Rect { paint, .. }
                | DrawCommand::FillPath { paint, .. }
                | DrawCommand::StrokePath { paint, .. } => paint_alphas(paint, &mut out),
                DrawCommand::Clear | DrawCommand::Composite(_) => {}
            }
        }
        out
    }
}

impl Surface for RecordingSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn set_composite(&mut self, mode: CompositeMode) {
        self.composite = mode;
        self.commands.push(DrawCommand::Composite(mode));
    }

    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            paint: paint.clone(),
        });
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.commands.push(DrawCommand::Rect {
            rect,
            paint: paint.clone(),
        });
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        self.commands.push(DrawCommand::FillPath {
            path: path.clone(),
            paint: paint.clone(),
        });
    }

    fn stroke_path(&mut self, path: &Path, width: f32, paint: &Paint) {
        self.commands.push(DrawCommand::StrokePath {
            path: path.clone(),
            width,
            paint: paint.clone(),
        });
    }
}
