//! Tournament service.
//!
//! [`Tournament`] owns a store and a score table and exposes the operations a
//! driver needs: registration, standings, pairing a round and reporting
//! results. Every method that writes takes `&mut self`, so whoever owns the
//! tournament serializes pairing against result reporting.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::ScoreConfig;
use crate::models::{
    ByeRecord, MatchRecord, MatchReport, MatchResult, MatchSide, Pairing, Player, PlayerId,
    RoundPlan, RoundRecord, StandingsEntry,
};
use crate::pairing::{self, PairingError};
use crate::storage::{StorageError, TournamentStore};

/// Errors returned by tournament operations.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Invalid results: {0}")]
    InvalidResult(String),

    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Player name must not be empty")]
    InvalidName,

    #[error("Pairing contract violated: {0}")]
    PairingContractViolation(#[from] PairingError),

    #[error("Storage error: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for TournamentError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UnknownPlayer(id) => TournamentError::UnknownPlayer(id),
            other => TournamentError::Storage(other),
        }
    }
}

/// A single Swiss tournament backed by a store.
pub struct Tournament<S> {
    store: S,
    scores: ScoreConfig,
}

impl<S: TournamentStore> Tournament<S> {
    pub fn new(store: S, scores: ScoreConfig) -> Self {
        Self { store, scores }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a player. Names need not be unique.
    pub fn register_player(&mut self, name: &str) -> Result<Player, TournamentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::InvalidName);
        }

        let player = self.store.register_player(name)?;
        info!("Registered player {} ({})", player.id, player.name);
        Ok(player)
    }

    pub fn count_players(&self) -> Result<usize, TournamentError> {
        Ok(self.store.count_players()?)
    }

    /// Current standings, best first.
    pub fn standings(&self) -> Result<Vec<StandingsEntry>, TournamentError> {
        Ok(self.store.standings(&self.scores)?)
    }

    /// Pair the next round.
    ///
    /// With an odd field the bye is written to the store before pairing goes
    /// ahead. The plan is stored as well, and while the latest round still has
    /// unreported matches every call returns that stored plan unchanged: no
    /// second bye, no re-pairing against half-updated standings.
    pub fn plan_round(&mut self) -> Result<RoundPlan, TournamentError> {
        let rounds = self.store.rounds()?;
        let after_matches = self.store.match_count()?;

        if let Some(open) = rounds.last().filter(|r| r.is_open(after_matches)) {
            debug!(
                "Round {} has {} of {} results in, returning its plan",
                open.plan.round,
                after_matches.saturating_sub(open.after_matches),
                open.plan.pairings.len()
            );
            return Ok(open.plan.clone());
        }

        let standings = self.store.standings(&self.scores)?;
        let prior_byes = self.store.byes()?;

        let selection = pairing::assign_bye(standings, &prior_byes, after_matches);

        if let Some(bye) = &selection.bye {
            if selection.is_new {
                self.store
                    .record_bye(ByeRecord::new(bye.id, after_matches))?;
                info!("Bye awarded to {} ({})", bye.id, bye.name);
            } else {
                debug!("Bye for this round already held by {}", bye.id);
            }
        }

        let pairings = pairing::pair_adjacent(&selection.remaining)?;
        let plan = RoundPlan {
            round: rounds.len() as u32 + 1,
            bye: selection.bye,
            pairings,
        };

        // A round with no boards can never close, so it is not stored.
        if !plan.pairings.is_empty() {
            self.store
                .record_round(RoundRecord::new(plan.clone(), after_matches))?;
        }
        info!(
            "Round {}: paired {} matches after {} recorded results",
            plan.round,
            plan.pairings.len(),
            after_matches
        );

        Ok(plan)
    }

    /// Pair the next round and return only the pairings, highest pair first.
    pub fn compute_pairings(&mut self) -> Result<Vec<Pairing>, TournamentError> {
        Ok(self.plan_round()?.pairings)
    }

    /// Record the outcome of one match.
    ///
    /// Only (win, lose), (lose, win) and (draw, draw) are accepted. Nothing is
    /// written when validation fails.
    pub fn report_result(
        &mut self,
        first: (PlayerId, MatchResult),
        second: (PlayerId, MatchResult),
    ) -> Result<MatchRecord, TournamentError> {
        let report = MatchReport {
            first: MatchSide::new(first.0, first.1),
            second: MatchSide::new(second.0, second.1),
        };

        if !report.first.result.is_consistent_with(report.second.result) {
            return Err(TournamentError::InvalidResult(format!(
                "({}, {}) is not a valid combination",
                report.first.result, report.second.result
            )));
        }
        if report.first.player_id == report.second.player_id {
            return Err(TournamentError::InvalidResult(format!(
                "player {} cannot play against themselves",
                report.first.player_id
            )));
        }

        let record = self.store.record_match(report)?;
        info!(
            "Recorded match {}: {} {} / {} {}",
            record.id,
            record.first.player_id,
            record.first.result,
            record.second.player_id,
            record.second.result
        );
        Ok(record)
    }

    /// Award a bye by hand, outside of round pairing.
    pub fn report_bye(&mut self, player: PlayerId) -> Result<ByeRecord, TournamentError> {
        let bye = ByeRecord::new(player, self.store.match_count()?);
        self.store.record_bye(bye.clone())?;
        info!("Bye reported for {}", player);
        Ok(bye)
    }

    /// Opponents each player has met, in the order the matches were reported.
    /// Players without matches are left out.
    pub fn player_matches(&self) -> Result<BTreeMap<PlayerId, Vec<PlayerId>>, TournamentError> {
        let mut opponents: BTreeMap<PlayerId, Vec<PlayerId>> = BTreeMap::new();
        for record in self.store.matches()? {
            for side in record.sides() {
                if let Some(opponent) = record.opponent_of(side.player_id) {
                    opponents.entry(side.player_id).or_default().push(opponent);
                }
            }
        }
        Ok(opponents)
    }

    /// Clear all matches, byes and rounds, keeping registrations.
    pub fn delete_matches(&mut self) -> Result<(), TournamentError> {
        self.store.delete_matches()?;
        info!("Deleted all matches, byes and rounds");
        Ok(())
    }

    /// Clear all players along with their matches, byes and rounds.
    pub fn delete_players(&mut self) -> Result<(), TournamentError> {
        self.store.delete_players()?;
        info!("Deleted all players");
        Ok(())
    }
}
