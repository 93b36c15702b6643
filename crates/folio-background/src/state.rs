//! Backdrop state management.

use folio_core::{EffectSelection, Point, Surface, Viewport};

use crate::animations::{aurora::Aurora, nebula::Nebula, particle_field::ParticleField};
use crate::effect::Effect;

/// Owns the active effects and drives them frame by frame.
///
/// Effects are layered back to front: nebula, aurora, particle field.
pub struct BackgroundState {
    /// Which effects are active.
    selection: EffectSelection,
    /// Active effects, back to front.
    effects: Vec<Box<dyn Effect>>,
    /// Last known surface dimensions.
    last_viewport: Viewport,
    /// Time of the first rendered frame, in milliseconds.
    started_at_ms: Option<u64>,
    /// Seed captured at initialization for randomness.
    init_seed: u64,
    /// Cleared by [`teardown`](Self::teardown); no frame is drawn afterwards.
    active: bool,
}

impl std::fmt::Debug for BackgroundState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundState")
            .field("selection", &self.selection)
            .field(
                "effects",
                &self.effects.iter().map(|e| e.name()).collect::<Vec<_>>(),
            )
            .field("last_viewport", &self.last_viewport)
            .field("active", &self.active)
            .finish()
    }
}

impl Default for BackgroundState {
    fn default() -> Self {
        Self::new(EffectSelection::default())
    }
}

impl BackgroundState {
    /// Create a new backdrop seeded from the clock.
    pub fn new(selection: EffectSelection) -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};

        let init_seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);

        Self::with_seed(selection, init_seed)
    }

    /// Create a new backdrop with a fixed seed, for reproducible pools.
    pub fn with_seed(selection: EffectSelection, init_seed: u64) -> Self {
        Self {
            selection,
            effects: Vec::new(),
            last_viewport: Viewport::default(),
            started_at_ms: None,
            init_seed,
            active: true,
        }
    }

    pub fn selection(&self) -> EffectSelection {
        self.selection
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Names of the effects currently mounted, back to front.
    pub fn effect_names(&self) -> Vec<&'static str> {
        self.effects.iter().map(|e| e.name()).collect()
    }

    /// Switch to a different set of effects. Pools are rebuilt on the next frame.
    pub fn set_selection(&mut self, selection: EffectSelection) {
        if selection != self.selection {
            self.selection = selection;
            self.effects.clear();
        }
    }

    /// Forward a pointer move to every effect.
    pub fn pointer_moved(&mut self, pointer: Point) {
        for effect in &mut self.effects {
            effect.pointer_moved(pointer);
        }
    }

    /// Stop animating and release every pool.
    pub fn teardown(&mut self) {
        self.active = false;
        self.effects.clear();
    }

    /// Advance and draw one frame. `now_ms` is any monotonic clock in milliseconds.
    pub fn render(&mut self, surface: &mut dyn Surface, now_ms: u64) {
        if !self.active {
            return;
        }

        let viewport = surface.viewport();
        // Nothing to draw on; stay idle rather than fail.
        if viewport.is_empty() {
            return;
        }

        if self.effects.is_empty() {
            self.mount(viewport);
        } else if viewport != self.last_viewport {
            for effect in &mut self.effects {
                effect.resize(viewport);
            }
        }
        self.last_viewport = viewport;

        let started_at = *self.started_at_ms.get_or_insert(now_ms);
        let elapsed_ms = now_ms.saturating_sub(started_at);

        surface.clear();
        for effect in &mut self.effects {
            effect.update(elapsed_ms);
            effect.draw(surface, elapsed_ms);
        }
    }

    fn mount(&mut self, viewport: Viewport) {
        let seed = self.init_seed;
        if self.selection.nebula() {
            self.effects
                .push(Box::new(Nebula::new(viewport, seed ^ 0x6e65_6275_6c61)));
        }
        if self.selection.aurora() {
            self.effects.push(Box::new(Aurora::new(viewport)));
        }
        if self.selection.particles() {
            self.effects
                .push(Box::new(ParticleField::new(viewport, seed ^ 0x7374_6172)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DrawCommand, RecordingSurface};

    #[test]
    fn test_mounts_selected_effects_in_layer_order() {
        let mut state = BackgroundState::with_seed(EffectSelection::All, 1);
        let mut surface = RecordingSurface::new(Viewport::new(800.0, 600.0));
        state.render(&mut surface, 0);
        assert_eq!(state.effect_names(), vec!["nebula", "aurora", "particles"]);

        state.set_selection(EffectSelection::Aurora);
        state.render(&mut surface, 16);
        assert_eq!(state.effect_names(), vec!["aurora"]);
    }

    #[test]
    fn test_empty_viewport_is_a_no_op() {
        let mut state = BackgroundState::with_seed(EffectSelection::All, 1);
        let mut surface = RecordingSurface::new(Viewport::new(0.0, 0.0));
        state.render(&mut surface, 0);
        assert!(surface.commands().is_empty());
        assert!(state.effect_names().is_empty());
    }

    #[test]
    fn test_frame_starts_with_clear() {
        let mut state = BackgroundState::with_seed(EffectSelection::Particles, 2);
        let mut surface = RecordingSurface::new(Viewport::new(400.0, 300.0));
        state.render(&mut surface, 100);
        assert_eq!(surface.commands().first(), Some(&DrawCommand::Clear));
    }

    #[test]
    fn test_teardown_stops_drawing() {
        let mut state = BackgroundState::with_seed(EffectSelection::All, 3);
        let mut surface = RecordingSurface::new(Viewport::new(400.0, 300.0));
        state.render(&mut surface, 0);
        assert!(!surface.commands().is_empty());

        state.teardown();
        surface.reset();
        state.render(&mut surface, 16);
        assert!(!state.is_active());
        assert!(surface.commands().is_empty());
        assert!(state.effect_names().is_empty());
    }

    #[test]
    fn test_resize_regenerates_particle_pool() {
        let mut state = BackgroundState::with_seed(EffectSelection::Particles, 4);
        let mut surface = RecordingSurface::new(Viewport::new(800.0, 600.0));
        state.render(&mut surface, 0);
        let small = surface.circles().count();
        assert_eq!(small, 60 * 2);

        surface.reset();
        surface.set_viewport(Viewport::new(1600.0, 1200.0));
        state.render(&mut surface, 16);
        assert_eq!(surface.circles().count(), 240 * 2);
    }

    #[test]
    fn test_same_seed_same_frames() {
        let viewport = Viewport::new(640.0, 480.0);
        let mut a = BackgroundState::with_seed(EffectSelection::All, 99);
        let mut b = BackgroundState::with_seed(EffectSelection::All, 99);
        let mut sa = RecordingSurface::new(viewport);
        let mut sb = RecordingSurface::new(viewport);

        for frame in 0..10u64 {
            a.render(&mut sa, frame * 16);
            b.render(&mut sb, frame * 16);
        }
        assert_eq!(sa.commands(), sb.commands());
    }
}
