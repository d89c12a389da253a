//! Swiss pairing engine.
//!
//! Two steps run in order for every round:
//! 1. [`assign_bye`] sets one player aside when the field is odd.
//! 2. [`pair_adjacent`] pairs what is left by neighbouring rank.
//!
//! Both are pure functions over a standings snapshot. Persisting the bye is
//! the caller's job; see `Tournament::plan_round`.

use std::collections::HashMap;

use thiserror::Error;

use crate::models::{ByeRecord, Pairing, PlayerId, StandingsEntry};

/// Broken pairing preconditions. These indicate a bug in the caller, not bad
/// user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PairingError {
    #[error("Cannot pair an odd number of players ({0})")]
    OddPlayerCount(usize),
}

/// Result of bye assignment for one round.
#[derive(Debug, Clone, PartialEq)]
pub struct ByeSelection {
    /// The player sitting out, if any
    pub bye: Option<StandingsEntry>,

    /// True if `bye` was chosen now and still has to be recorded. False when
    /// the round's bye had already been recorded by an earlier call.
    pub is_new: bool,

    /// Everyone else, still in standings order
    pub remaining: Vec<StandingsEntry>,
}

/// Pick the bye recipient among `standings` (sorted best first).
///
/// Returns the index of the chosen entry, or `None` when the field is even.
/// The recipient is the player with the fewest prior byes, and among those the
/// lowest ranked. While anyone is still bye-free this is simply the
/// lowest-ranked bye-free player. Once everyone has had one, byes keep rotating
/// through whoever has had the fewest.
pub fn select_bye(standings: &[StandingsEntry], prior_byes: &[ByeRecord]) -> Option<usize> {
    if standings.len() % 2 == 0 {
        return None;
    }

    let mut counts: HashMap<PlayerId, usize> = HashMap::new();
    for bye in prior_byes {
        *counts.entry(bye.player_id).or_insert(0) += 1;
    }

    // min_by_key keeps the first minimum, and we walk from the bottom up.
    (0..standings.len())
        .rev()
        .min_by_key(|&i| counts.get(&standings[i].id).copied().unwrap_or(0))
}

/// Set aside this round's bye recipient.
///
/// `after_matches` is the store's current match count and identifies the round.
/// If `prior_byes` already holds a bye for this round whose player is still in
/// an odd field, that player is reused and nothing new is chosen, so repeated
/// calls within one round never hand out a second bye.
pub fn assign_bye(
    standings: Vec<StandingsEntry>,
    prior_byes: &[ByeRecord],
    after_matches: usize,
) -> ByeSelection {
    let mut remaining = standings;

    if remaining.len() % 2 == 0 {
        return ByeSelection {
            bye: None,
            is_new: false,
            remaining,
        };
    }

    let pending = prior_byes
        .iter()
        .rev()
        .filter(|b| b.after_matches == after_matches)
        .find_map(|b| remaining.iter().position(|e| e.id == b.player_id));

    let choice = match pending {
        Some(index) => Some((index, false)),
        None => select_bye(&remaining, prior_byes).map(|index| (index, true)),
    };
    let Some((index, is_new)) = choice else {
        return ByeSelection {
            bye: None,
            is_new: false,
            remaining,
        };
    };

    let bye = remaining.remove(index);
    ByeSelection {
        bye: Some(bye),
        is_new,
        remaining,
    }
}

/// Pair an even, rank-sorted field: (0,1), (2,3), ...
pub fn pair_adjacent(standings: &[StandingsEntry]) -> Result<Vec<Pairing>, PairingError> {
    if standings.len() % 2 != 0 {
        return Err(PairingError::OddPlayerCount(standings.len()));
    }

    Ok(standings
        .chunks_exact(2)
        .map(|pair| Pairing::between(&pair[0], &pair[1]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn field(n: u64) -> Vec<StandingsEntry> {
        (1..=n)
            .map(|i| StandingsEntry::new(PlayerId::new(i), format!("P{}", i), (n - i) as f64, 0))
            .collect()
    }

    fn byes(ids: &[u64]) -> Vec<ByeRecord> {
        ids.iter()
            .map(|&id| ByeRecord::new(PlayerId::new(id), 0))
            .collect()
    }

    fn ids(entries: &[StandingsEntry]) -> Vec<u64> {
        entries.iter().map(|e| e.id.get()).collect()
    }

    #[test]
    fn test_no_bye_for_even_field() {
        assert_eq!(select_bye(&field(4), &[]), None);
        assert_eq!(select_bye(&[], &[]), None);
    }

    #[test]
    fn test_bye_goes_to_lowest_ranked() {
        assert_eq!(select_bye(&field(5), &[]), Some(4));
    }

    #[test]
    fn test_bye_skips_prior_recipients() {
        assert_eq!(select_bye(&field(5), &byes(&[5])), Some(3));
        assert_eq!(select_bye(&field(5), &byes(&[5, 4, 2])), Some(2));
    }

    #[test]
    fn test_bye_never_repeats_while_someone_is_bye_free() {
        let standings = field(7);
        let prior = byes(&[7, 6, 5, 4, 3, 2]);
        assert_eq!(select_bye(&standings, &prior), Some(0));
    }

    #[test]
    fn test_bye_when_everyone_has_one_goes_to_lowest_ranked() {
        assert_eq!(select_bye(&field(3), &byes(&[1, 2, 3])), Some(2));
    }

    #[test]
    fn test_bye_when_everyone_has_one_prefers_fewest_byes() {
        let prior = byes(&[1, 2, 3, 3, 2]);
        assert_eq!(select_bye(&field(3), &prior), Some(0));
    }

    #[test]
    fn test_bye_ignores_history_of_absent_players() {
        assert_eq!(select_bye(&field(3), &byes(&[42])), Some(2));
    }

    #[test]
    fn test_assign_bye_removes_recipient() {
        let selection = assign_bye(field(5), &[], 0);

        assert_eq!(selection.bye.map(|b| b.id.get()), Some(5));
        assert!(selection.is_new);
        assert_eq!(ids(&selection.remaining), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_assign_bye_even_field_passes_through() {
        let selection = assign_bye(field(4), &byes(&[1]), 0);

        assert!(selection.bye.is_none());
        assert!(!selection.is_new);
        assert_eq!(ids(&selection.remaining), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_assign_bye_reuses_this_rounds_bye() {
        let prior = vec![ByeRecord::new(PlayerId::new(2), 3)];
        let selection = assign_bye(field(3), &prior, 3);

        assert_eq!(selection.bye.map(|b| b.id.get()), Some(2));
        assert!(!selection.is_new);
        assert_eq!(ids(&selection.remaining), vec![1, 3]);
    }

    #[test]
    fn test_assign_bye_ignores_earlier_rounds() {
        let prior = vec![ByeRecord::new(PlayerId::new(3), 0)];
        let selection = assign_bye(field(3), &prior, 1);

        assert_eq!(selection.bye.map(|b| b.id.get()), Some(2));
        assert!(selection.is_new);
    }

    #[test]
    fn test_pair_adjacent_even_field() {
        let pairings = pair_adjacent(&field(4)).unwrap();

        assert_eq!(pairings.len(), 2);
        assert_eq!(
            (pairings[0].player1_id.get(), pairings[0].player2_id.get()),
            (1, 2)
        );
        assert_eq!(
            (pairings[1].player1_id.get(), pairings[1].player2_id.get()),
            (3, 4)
        );
        assert_eq!(pairings[0].player1_name, "P1");
    }

    #[test]
    fn test_pair_adjacent_covers_everyone_once() {
        let standings = field(10);
        let pairings = pair_adjacent(&standings).unwrap();

        assert_eq!(pairings.len(), 5);
        let mut seen = HashSet::new();
        for p in &pairings {
            assert_ne!(p.player1_id, p.player2_id);
            assert!(seen.insert(p.player1_id));
            assert!(seen.insert(p.player2_id));
        }
        assert_eq!(seen.len(), standings.len());
    }

    #[test]
    fn test_pair_adjacent_empty_field() {
        assert!(pair_adjacent(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_pair_adjacent_rejects_odd_field() {
        assert_eq!(
            pair_adjacent(&field(3)),
            Err(PairingError::OddPlayerCount(3))
        );
    }

    #[test]
    fn test_odd_field_pairs_after_bye() {
        let selection = assign_bye(field(7), &[], 0);
        let pairings = pair_adjacent(&selection.remaining).unwrap();

        assert_eq!(pairings.len(), 3);
        let bye = selection.bye.unwrap().id;
        assert!(pairings
            .iter()
            .all(|p| p.player1_id != bye && p.player2_id != bye));
    }
}
