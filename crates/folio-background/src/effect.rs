//! The interface every backdrop effect implements.

use folio_core::{Point, Surface, Viewport};

/// A decorative effect driven by the frame loop.
///
/// `update` advances the effect's private state by one frame; `draw` emits
/// that state onto a surface without mutating it.
pub trait Effect {
    /// Short identifier used in logs and the CLI.
    fn name(&self) -> &'static str;

    /// Adopt new surface dimensions, regenerating any pool.
    fn resize(&mut self, viewport: Viewport);

    /// Record the latest pointer position, consumed by the next update.
    fn pointer_moved(&mut self, pointer: Point);

    /// Advance one frame. `elapsed_ms` is time since activation.
    fn update(&mut self, elapsed_ms: u64);

    /// Emit the current frame.
    fn draw(&self, surface: &mut dyn Surface, elapsed_ms: u64);
}
