//! HTTP request handlers for the rain risk API

pub mod health;
pub mod model;
pub mod prediction;
pub mod wetness;

pub use health::*;
pub use model::*;
pub use prediction::*;
pub use wetness::*;
