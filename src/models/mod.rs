//! Core data models for Swiss pairing.

mod ids;
mod match_record;
mod pairing;
mod player;
mod result;

pub use ids::*;
pub use match_record::*;
pub use pairing::*;
pub use player::*;
pub use result::*;
