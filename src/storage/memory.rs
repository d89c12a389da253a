//! In-memory store.

use tracing::debug;

use super::{ensure_registered, StorageError, TournamentStore};
use crate::models::{
    ByeRecord, MatchId, MatchRecord, MatchReport, Player, PlayerId, RoundRecord,
};

/// Keeps a tournament in process memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    players: Vec<Player>,
    matches: Vec<MatchRecord>,
    byes: Vec<ByeRecord>,
    rounds: Vec<RoundRecord>,
    last_player_id: u64,
    last_match_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TournamentStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn register_player(&mut self, name: &str) -> Result<Player, StorageError> {
        self.last_player_id += 1;
        let player = Player::new(PlayerId::new(self.last_player_id), name.to_string());
        self.players.push(player.clone());
        debug!("Registered player {} ({})", player.id, player.name);
        Ok(player)
    }

    fn players(&self) -> Result<Vec<Player>, StorageError> {
        Ok(self.players.clone())
    }

    fn count_players(&self) -> Result<usize, StorageError> {
        Ok(self.players.len())
    }

    fn matches(&self) -> Result<Vec<MatchRecord>, StorageError> {
        Ok(self.matches.clone())
    }

    fn match_count(&self) -> Result<usize, StorageError> {
        Ok(self.matches.len())
    }

    fn record_match(&mut self, report: MatchReport) -> Result<MatchRecord, StorageError> {
        ensure_registered(
            &self.players,
            &[report.first.player_id, report.second.player_id],
        )?;

        self.last_match_id += 1;
        let record = MatchRecord::new(MatchId::new(self.last_match_id), report);
        self.matches.push(record.clone());
        Ok(record)
    }

    fn byes(&self) -> Result<Vec<ByeRecord>, StorageError> {
        Ok(self.byes.clone())
    }

    fn record_bye(&mut self, bye: ByeRecord) -> Result<(), StorageError> {
        ensure_registered(&self.players, &[bye.player_id])?;
        self.byes.push(bye);
        Ok(())
    }

    fn rounds(&self) -> Result<Vec<RoundRecord>, StorageError> {
        Ok(self.rounds.clone())
    }

    fn record_round(&mut self, round: RoundRecord) -> Result<(), StorageError> {
        self.rounds.push(round);
        Ok(())
    }

    fn delete_matches(&mut self) -> Result<(), StorageError> {
        self.matches.clear();
        self.byes.clear();
        self.rounds.clear();
        Ok(())
    }

    fn delete_players(&mut self) -> Result<(), StorageError> {
        self.delete_matches()?;
        self.players.clear();
        Ok(())
    }
}
