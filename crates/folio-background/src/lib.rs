//! Ambient backdrop effects for the folio site.
//!
//! Three independent effects (particle field with shooting stars, aurora
//! bands, nebula clouds) each own a private pool of drifting objects and
//! redraw it every frame onto a [`Surface`](folio_core::Surface). The
//! per-frame updates are plain functions of pool state, pointer position and
//! elapsed time, so they run the same against a terminal canvas or the
//! recording surface used in tests.

mod animations;
mod color;
mod effect;
mod recorder;
mod state;
mod terminal;

pub use animations::aurora::Aurora;
pub use animations::nebula::{Cloud, Nebula};
pub use animations::particle_field::{Particle, ParticleField, ShootingStar};
pub use animations::{aurora, nebula, particle_field};
pub use color::{hsl_to_rgb, shade};
pub use effect::Effect;
pub use recorder::{DrawCommand, RecordingSurface};
pub use state::BackgroundState;
pub use terminal::TerminalSurface;
