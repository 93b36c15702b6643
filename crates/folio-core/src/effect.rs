//! Effect selection.

use serde::{Deserialize, Serialize};

/// Which backdrop effects are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectSelection {
    /// Particle field with shooting stars.
    Particles,
    /// Aurora bands and shimmer rays.
    Aurora,
    /// Drifting nebula clouds.
    Nebula,
    /// All three layered: nebula, aurora, then particles on top.
    #[default]
    All,
}

impl EffectSelection {
    /// Cycle to the next selection.
    pub fn next(self) -> Self {
        match self {
            EffectSelection::Particles => EffectSelection::Aurora,
            EffectSelection::Aurora => EffectSelection::Nebula,
            EffectSelection::Nebula => EffectSelection::All,
            EffectSelection::All => EffectSelection::Particles,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EffectSelection::Particles => "particles",
            EffectSelection::Aurora => "aurora",
            EffectSelection::Nebula => "nebula",
            EffectSelection::All => "all",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "particles" | "particle" | "stars" => Some(EffectSelection::Particles),
            "aurora" => Some(EffectSelection::Aurora),
            "nebula" => Some(EffectSelection::Nebula),
            "all" => Some(EffectSelection::All),
            _ => None,
        }
    }

    pub fn particles(self) -> bool {
        matches!(self, EffectSelection::Particles | EffectSelection::All)
    }

    pub fn aurora(self) -> bool {
        matches!(self, EffectSelection::Aurora | EffectSelection::All)
    }

    pub fn nebula(self) -> bool {
        matches!(self, EffectSelection::Nebula | EffectSelection::All)
    }
}
