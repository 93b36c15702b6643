//! Core types shared by the folio crates.
//!
//! Geometry and color primitives, the drawing-command vocabulary that
//! effects emit onto a [`Surface`], and the effect selection enum used by
//! configuration and the CLI.

mod color;
mod draw;
mod effect;
mod geometry;

pub use color::Hsla;
pub use draw::{CompositeMode, GradientStop, Paint, Path, PathSegment, Surface};
pub use effect::EffectSelection;
pub use geometry::{Point, Rect, Viewport};
