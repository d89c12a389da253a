//! # Swiss Pairing
//!
//! Standings and round pairing for Swiss-system tournaments.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, standings, matches, byes, pairings)
//! - **pairing**: Bye selection and adjacent-rank pairing
//! - **tournament**: Tournament operations over an injected store
//! - **storage**: Store trait plus in-memory and JSONL backends
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod config;
pub mod models;
pub mod pairing;
pub mod storage;
pub mod tournament;

pub use models::*;
pub use tournament::{Tournament, TournamentError};
