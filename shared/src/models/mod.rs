//! Domain models for the rain risk service

mod observation;
mod prediction;
mod wetness;

pub use observation::*;
pub use prediction::*;
pub use wetness::*;
