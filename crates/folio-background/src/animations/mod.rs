pub mod aurora;
pub mod nebula;
pub mod particle_field;
