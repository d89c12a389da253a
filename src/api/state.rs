use std::sync::Arc;

use tokio::sync::Mutex;

use crate::storage::TournamentStore;
use crate::tournament::Tournament;

/// The tournament behind a single lock. Each handler holds the lock for its
/// whole operation, so pairing never interleaves with result reporting.
pub type SharedTournament = Arc<Mutex<Tournament<Box<dyn TournamentStore>>>>;

#[derive(Clone)]
pub struct AppState {
    pub tournament: SharedTournament,
}

impl AppState {
    pub fn new(tournament: Tournament<Box<dyn TournamentStore>>) -> Self {
        Self {
            tournament: Arc::new(Mutex::new(tournament)),
        }
    }
}
