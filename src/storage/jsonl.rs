//! JSONL (JSON Lines) storage.
//!
//! Each record kind lives in its own file under the data directory and each
//! line is one JSON object. Files are only ever appended to, except for the
//! reset operations which truncate them.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use super::{ensure_registered, StorageConfig, StorageError, TournamentStore};
use crate::models::{
    ByeRecord, MatchId, MatchRecord, MatchReport, Player, PlayerId, RoundRecord,
};

/// Record kinds kept on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Player,
    Match,
    Bye,
    Round,
}

impl RecordKind {
    /// Get the filename for this record kind.
    pub fn filename(&self) -> &'static str {
        match self {
            RecordKind::Player => "players.jsonl",
            RecordKind::Match => "matches.jsonl",
            RecordKind::Bye => "byes.jsonl",
            RecordKind::Round => "rounds.jsonl",
        }
    }
}

/// One history file holding records of type `T`, one per line.
///
/// Reads are strict: a line that does not parse fails the whole read with
/// [`StorageError::CorruptRecord`].
pub struct JsonlFile<T> {
    path: PathBuf,
    _record: PhantomData<T>,
}

impl<T: Serialize + DeserializeOwned> JsonlFile<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _record: PhantomData,
        }
    }

    /// Every record in file order. A missing file holds no records; blank
    /// lines are ignored.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record =
                serde_json::from_str(&line).map_err(|source| StorageError::CorruptRecord {
                    path: self.path.clone(),
                    line: index + 1,
                    source,
                })?;
            records.push(record);
        }

        debug!("Read {} records from {:?}", records.len(), self.path);
        Ok(records)
    }

    /// Append one record as a single write.
    ///
    /// If the file does not end in a newline the record starts on a fresh
    /// line, so it never merges with the previous one.
    pub fn append(&self, record: &T) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string(record)?;

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut line = String::with_capacity(json.len() + 2);
        if !ends_with_newline(&mut file)? {
            debug!("{:?} lacks a trailing newline, starting a new line", self.path);
            line.push('\n');
        }
        line.push_str(&json);
        line.push('\n');

        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Drop every record.
    pub fn clear(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            File::create(&self.path)?;
            info!("Cleared {:?}", self.path);
        }
        Ok(())
    }
}

/// True for an empty file or one whose last byte is `\n`.
fn ends_with_newline(file: &mut File) -> Result<bool, StorageError> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// A tournament persisted as JSONL files.
///
/// Nothing is cached: every read goes back to disk, so several processes
/// (for example the CLI between rounds) always see the latest history.
/// Ids continue from the highest id found in the files.
pub struct JsonlStore {
    config: StorageConfig,
}

impl JsonlStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    fn players_file(&self) -> JsonlFile<Player> {
        JsonlFile::new(self.config.players_path())
    }

    fn matches_file(&self) -> JsonlFile<MatchRecord> {
        JsonlFile::new(self.config.matches_path())
    }

    fn byes_file(&self) -> JsonlFile<ByeRecord> {
        JsonlFile::new(self.config.byes_path())
    }

    fn rounds_file(&self) -> JsonlFile<RoundRecord> {
        JsonlFile::new(self.config.rounds_path())
    }
}

impl TournamentStore for JsonlStore {
    fn name(&self) -> &'static str {
        "jsonl"
    }

    fn register_player(&mut self, name: &str) -> Result<Player, StorageError> {
        let id = self
            .players()?
            .iter()
            .map(|p| p.id)
            .max()
            .map_or_else(|| PlayerId::new(1), |last| last.next());

        let player = Player::new(id, name.to_string());
        self.players_file().append(&player)?;
        Ok(player)
    }

    fn players(&self) -> Result<Vec<Player>, StorageError> {
        self.players_file().read_all()
    }

    fn matches(&self) -> Result<Vec<MatchRecord>, StorageError> {
        self.matches_file().read_all()
    }

    fn record_match(&mut self, report: MatchReport) -> Result<MatchRecord, StorageError> {
        ensure_registered(
            &self.players()?,
            &[report.first.player_id, report.second.player_id],
        )?;

        let id = self
            .matches()?
            .iter()
            .map(|m| m.id)
            .max()
            .map_or_else(|| MatchId::new(1), |last| last.next());

        let record = MatchRecord::new(id, report);
        self.matches_file().append(&record)?;
        Ok(record)
    }

    fn byes(&self) -> Result<Vec<ByeRecord>, StorageError> {
        self.byes_file().read_all()
    }

    fn record_bye(&mut self, bye: ByeRecord) -> Result<(), StorageError> {
        ensure_registered(&self.players()?, &[bye.player_id])?;
        self.byes_file().append(&bye)
    }

    fn rounds(&self) -> Result<Vec<RoundRecord>, StorageError> {
        self.rounds_file().read_all()
    }

    fn record_round(&mut self, round: RoundRecord) -> Result<(), StorageError> {
        self.rounds_file().append(&round)
    }

    fn delete_matches(&mut self) -> Result<(), StorageError> {
        self.matches_file().clear()?;
        self.byes_file().clear()?;
        self.rounds_file().clear()
    }

    fn delete_players(&mut self) -> Result<(), StorageError> {
        self.delete_matches()?;
        self.players_file().clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoreConfig;
    use crate::models::{MatchResult, MatchSide};
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Tally {
        table: u32,
        points: u32,
    }

    fn test_store(temp_dir: &TempDir) -> JsonlStore {
        JsonlStore::new(StorageConfig::new(temp_dir.path().to_path_buf()))
    }

    fn draw(a: PlayerId, b: PlayerId) -> MatchReport {
        MatchReport {
            first: MatchSide::new(a, MatchResult::Draw),
            second: MatchSide::new(b, MatchResult::Draw),
        }
    }

    #[test]
    fn test_file_append_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let file = JsonlFile::new(temp_dir.path().join("nested").join("tally.jsonl"));

        file.append(&Tally { table: 1, points: 3 }).unwrap();
        file.append(&Tally { table: 2, points: 5 }).unwrap();

        assert_eq!(
            file.read_all().unwrap(),
            vec![Tally { table: 1, points: 3 }, Tally { table: 2, points: 5 }]
        );
    }

    #[test]
    fn test_file_missing_reads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.jsonl");
        let file: JsonlFile<Tally> = JsonlFile::new(path.clone());

        assert!(file.read_all().unwrap().is_empty());
        file.clear().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_file_ignores_blank_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blank.jsonl");
        fs::write(&path, "{\"table\":1,\"points\":1}\n\n   \n{\"table\":2,\"points\":0}\n").unwrap();

        let file: JsonlFile<Tally> = JsonlFile::new(path);
        assert_eq!(file.read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_file_corrupt_line_fails_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("corrupt.jsonl");
        fs::write(&path, "{\"table\":1,\"points\":1}\n\nnot json\n").unwrap();

        let file: JsonlFile<Tally> = JsonlFile::new(path.clone());
        match file.read_all() {
            Err(StorageError::CorruptRecord { path: bad, line, .. }) => {
                assert_eq!(bad, path);
                assert_eq!(line, 3);
            }
            other => panic!("expected a corrupt record error, got {:?}", other),
        }
    }

    #[test]
    fn test_file_append_after_missing_newline() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("unterminated.jsonl");
        fs::write(&path, "{\"table\":1,\"points\":1}").unwrap();

        let file = JsonlFile::new(path.clone());
        file.append(&Tally { table: 2, points: 4 }).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\"table\":1,\"points\":1}\n{\"table\":2,\"points\":4}\n"
        );
        assert_eq!(file.read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_store_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let (a, b) = {
            let mut store = test_store(&temp_dir);
            let a = store.register_player("Twilight Sparkle").unwrap();
            let b = store.register_player("Fluttershy").unwrap();
            store
                .record_match(MatchReport {
                    first: MatchSide::new(a.id, MatchResult::Win),
                    second: MatchSide::new(b.id, MatchResult::Lose),
                })
                .unwrap();
            (a, b)
        };

        let store = test_store(&temp_dir);
        assert_eq!(store.count_players().unwrap(), 2);
        assert_eq!(store.match_count().unwrap(), 1);

        let standings = store.standings(&ScoreConfig::default()).unwrap();
        assert_eq!(standings[0].id, a.id);
        assert_eq!(standings[0].score, 1.0);
        assert_eq!(standings[1].id, b.id);
        assert_eq!(standings[1].matches, 1);
    }

    #[test]
    fn test_store_ids_continue_from_file() {
        let temp_dir = TempDir::new().unwrap();
        test_store(&temp_dir).register_player("A").unwrap();
        let b = test_store(&temp_dir).register_player("B").unwrap();

        assert_eq!(b.id, PlayerId::new(2));
    }

    #[test]
    fn test_store_match_is_one_line() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        let a = store.register_player("A").unwrap();
        let b = store.register_player("B").unwrap();
        store.record_match(draw(a.id, b.id)).unwrap();

        let path = StorageConfig::new(temp_dir.path().to_path_buf()).matches_path();
        assert_eq!(fs::read_to_string(path).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_store_match_after_unterminated_line_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        let a = store.register_player("A").unwrap();
        let b = store.register_player("B").unwrap();
        store
            .record_match(MatchReport {
                first: MatchSide::new(a.id, MatchResult::Win),
                second: MatchSide::new(b.id, MatchResult::Lose),
            })
            .unwrap();

        let path = StorageConfig::new(temp_dir.path().to_path_buf()).matches_path();
        let contents = fs::read_to_string(&path).unwrap();
        fs::write(&path, contents.trim_end()).unwrap();

        store.record_match(draw(a.id, b.id)).unwrap();

        assert_eq!(store.match_count().unwrap(), 2);
        let standings = store.standings(&ScoreConfig::default()).unwrap();
        assert_eq!(standings[0].score, 1.5);
        assert_eq!(standings[1].score, 0.5);
        assert!(standings.iter().all(|s| s.matches == 2));
    }

    #[test]
    fn test_store_corrupt_history_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        let a = store.register_player("A").unwrap();
        let b = store.register_player("B").unwrap();
        store.record_match(draw(a.id, b.id)).unwrap();

        let path = StorageConfig::new(temp_dir.path().to_path_buf()).matches_path();
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{{\"id\":2,\"first\":").unwrap();

        assert!(matches!(
            store.matches(),
            Err(StorageError::CorruptRecord { line: 2, .. })
        ));
        assert!(store.standings(&ScoreConfig::default()).is_err());
    }

    #[test]
    fn test_store_rejects_bye_for_unknown_player() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);

        assert!(matches!(
            store.record_bye(ByeRecord::new(PlayerId::new(1), 0)),
            Err(StorageError::UnknownPlayer(_))
        ));
        assert!(!StorageConfig::new(temp_dir.path().to_path_buf())
            .byes_path()
            .exists());
    }

    #[test]
    fn test_store_delete_matches_clears_rounds() {
        use crate::models::RoundPlan;

        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        let a = store.register_player("A").unwrap();
        store
            .record_round(RoundRecord::new(
                RoundPlan {
                    round: 1,
                    bye: None,
                    pairings: Vec::new(),
                },
                0,
            ))
            .unwrap();
        store.record_bye(ByeRecord::new(a.id, 0)).unwrap();
        assert_eq!(store.rounds().unwrap().len(), 1);

        store.delete_matches().unwrap();

        assert!(store.rounds().unwrap().is_empty());
        assert!(store.byes().unwrap().is_empty());
        assert_eq!(store.count_players().unwrap(), 1);
    }

    #[test]
    fn test_store_delete_players_clears_everything() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        let a = store.register_player("A").unwrap();
        store.record_bye(ByeRecord::new(a.id, 0)).unwrap();

        store.delete_players().unwrap();

        assert_eq!(store.count_players().unwrap(), 0);
        assert!(store.byes().unwrap().is_empty());
        assert_eq!(store.match_count().unwrap(), 0);
    }
}
