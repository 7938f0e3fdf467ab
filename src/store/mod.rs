//! File-backed store for the dashboard state.
//!
//! The external exporter owns the RFI snapshot (`rfis.json`); this process
//! owns the notes file, the token bundle and the last-refresh timestamp. All
//! four live under the configured data directory.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use tokio::fs;
use tokio::sync::Mutex;

use crate::errors::AppError;
use crate::models::{RfiRow, TokenBundle};

pub const RFIS_FILE: &str = "rfis.json";
pub const NOTES_FILE: &str = "notes.json";
pub const TOKENS_FILE: &str = "tokens.json";
pub const LAST_REFRESH_FILE: &str = "last_refresh.txt";

/// Notes keyed by RFI number.
pub type NotesMap = BTreeMap<String, String>;

/// File-backed store.
///
/// Local writes are serialized behind a mutex. The exporter writes
/// `rfis.json` from outside this process and is not synchronized.
pub struct Store {
    data_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl Store {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Ensure the data directory exists.
    pub async fn init(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.data_dir).await?;
        Ok(())
    }

    fn path(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    /// Load the exporter snapshot with notes merged in.
    ///
    /// A missing snapshot (exporter never ran) yields an empty list rather
    /// than an error; the UI renders "No results".
    pub async fn load_rows(&self) -> Result<Vec<RfiRow>, AppError> {
        let raw = match fs::read(self.path(RFIS_FILE)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut rows: Vec<RfiRow> = serde_json::from_slice(&raw)?;
        let notes = self.load_notes().await?;

        for row in &mut rows {
            if let Some(note) = notes.get(&row.number) {
                row.notes = note.clone();
            }
            row.ensure_mailto_reminder();
        }

        Ok(rows)
    }

    /// Load the notes map. Missing file yields an empty map.
    pub async fn load_notes(&self) -> Result<NotesMap, AppError> {
        let raw = match fs::read(self.path(NOTES_FILE)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(NotesMap::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_slice(&raw)?)
    }

    /// Upsert the note for an RFI number. An empty note removes the entry.
    /// Last write wins; no conflict detection.
    pub async fn save_note(&self, number: &str, note: &str) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;

        let mut notes = self.load_notes().await?;
        if note.is_empty() {
            notes.remove(number);
        } else {
            notes.insert(number.to_string(), note.to_string());
        }

        self.write_notes(&notes).await
    }

    /// Remove notes whose RFI number no longer appears in the snapshot.
    /// Returns the number of entries pruned.
    pub async fn prune_notes(&self, live_rows: &[RfiRow]) -> Result<usize, AppError> {
        let _guard = self.write_lock.lock().await;

        let mut notes = self.load_notes().await?;
        let before = notes.len();
        notes.retain(|number, _| live_rows.iter().any(|row| row.number == *number));
        let pruned = before - notes.len();

        if pruned > 0 {
            self.write_notes(&notes).await?;
        }

        Ok(pruned)
    }

    async fn write_notes(&self, notes: &NotesMap) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(notes)?;
        fs::write(self.path(NOTES_FILE), json).await?;
        Ok(())
    }

    /// Overwrite the token bundle. Called only after a successful exchange,
    /// so a failed exchange leaves the previous bundle on disk.
    pub async fn save_tokens(&self, bundle: &TokenBundle) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;

        let json = serde_json::to_string_pretty(bundle)?;
        fs::write(self.path(TOKENS_FILE), json).await?;
        Ok(())
    }

    pub async fn load_tokens(&self) -> Result<Option<TokenBundle>, AppError> {
        let raw = match fs::read(self.path(TOKENS_FILE)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(serde_json::from_slice(&raw)?))
    }

    /// Record the timestamp of a successful exporter run.
    pub async fn save_last_refresh(&self, stamp: &str) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;

        fs::write(self.path(LAST_REFRESH_FILE), stamp).await?;
        Ok(())
    }

    pub async fn load_last_refresh(&self) -> Result<Option<String>, AppError> {
        match fs::read_to_string(self.path(LAST_REFRESH_FILE)).await {
            Ok(stamp) => Ok(Some(stamp.trim().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn snapshot_row(number: &str) -> serde_json::Value {
        serde_json::json!({
            "number": number,
            "subject": format!("Subject {number}"),
            "ball_in_court": "Architect",
            "due_date": "2026-09-01",
            "days_late": 3,
            "last_change_of_court": "2026-08-10",
            "days_in_court": "14",
            "link": format!("https://app.procore.com/rfi/{number}")
        })
    }

    async fn store_with_snapshot(numbers: &[&str]) -> (Store, TempDir) {
        let temp = TempDir::new().unwrap();
        let store = Store::new(temp.path());
        store.init().await.unwrap();

        let rows: Vec<_> = numbers.iter().map(|n| snapshot_row(n)).collect();
        fs::write(
            store.path(RFIS_FILE),
            serde_json::to_vec(&rows).unwrap(),
        )
        .await
        .unwrap();

        (store, temp)
    }

    #[tokio::test]
    async fn test_missing_snapshot_yields_empty_rows() {
        let temp = TempDir::new().unwrap();
        let store = Store::new(temp.path());
        store.init().await.unwrap();

        assert!(store.load_rows().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_note_upsert_and_removal() {
        let (store, _temp) = store_with_snapshot(&["101"]).await;

        store.save_note("101", "chase this on Monday").await.unwrap();
        let rows = store.load_rows().await.unwrap();
        assert_eq!(rows[0].notes, "chase this on Monday");

        // Empty note removes the entry entirely
        store.save_note("101", "").await.unwrap();
        assert!(store.load_notes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_prune_removes_orphaned_notes_only() {
        let (store, _temp) = store_with_snapshot(&["101", "102"]).await;
        store.save_note("101", "keep").await.unwrap();
        store.save_note("999", "orphan").await.unwrap();

        let rows = store.load_rows().await.unwrap();
        let pruned = store.prune_notes(&rows).await.unwrap();

        assert_eq!(pruned, 1);
        let notes = store.load_notes().await.unwrap();
        assert_eq!(notes.get("101").map(String::as_str), Some("keep"));
        assert!(!notes.contains_key("999"));
    }

    #[tokio::test]
    async fn test_token_bundle_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = Store::new(temp.path());
        store.init().await.unwrap();

        assert!(store.load_tokens().await.unwrap().is_none());

        let bundle = TokenBundle {
            access_token: "at-1".to_string(),
            refresh_token: "rt-1".to_string(),
            obtained_at: 1_756_000_000,
        };
        store.save_tokens(&bundle).await.unwrap();

        assert_eq!(store.load_tokens().await.unwrap(), Some(bundle));
    }

    #[tokio::test]
    async fn test_last_refresh_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = Store::new(temp.path());
        store.init().await.unwrap();

        assert!(store.load_last_refresh().await.unwrap().is_none());

        store.save_last_refresh("Aug 24, 2026, 9:15 AM").await.unwrap();
        assert_eq!(
            store.load_last_refresh().await.unwrap().as_deref(),
            Some("Aug 24, 2026, 9:15 AM")
        );
    }
}
