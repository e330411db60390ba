//! Date-rotated append-only JSONL store for `fraud_training_tb` (§4.9). One
//! file per UTC calendar day, named `YYYY-MM-DD.jsonl`; a new day rotates the
//! writer lazily on the next `append` rather than on a timer.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use vigil_core::TrainingRow;

use crate::error::EventError;

pub struct TrainingRowStore {
    base_path: PathBuf,
    current_file: Option<BufWriter<File>>,
    current_date: Option<String>,
}

impl TrainingRowStore {
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self, EventError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;

        Ok(Self { base_path, current_file: None, current_date: None })
    }

    /// Appends one training row. Called once per committed transaction
    /// (§4.5 step 7) — never for a reimbursement transaction (§9 open
    /// question 3).
    pub fn append(&mut self, row: &TrainingRow) -> Result<(), EventError> {
        let date = row.created_at.format("%Y-%m-%d").to_string();

        if self.current_date.as_ref() != Some(&date) {
            self.rotate_file(&date)?;
        }

        if let Some(ref mut writer) = self.current_file {
            let json = serde_json::to_string(row)?;
            writeln!(writer, "{}", json)?;
            writer.flush()?;
        }

        Ok(())
    }

    fn rotate_file(&mut self, date: &str) -> Result<(), EventError> {
        if let Some(ref mut writer) = self.current_file {
            writer.flush()?;
        }

        let file_path = self.base_path.join(format!("{}.jsonl", date));
        let file = OpenOptions::new().create(true).append(true).open(&file_path)?;

        self.current_file = Some(BufWriter::new(file));
        self.current_date = Some(date.to_string());
        tracing::debug!(file = %file_path.display(), "training row store rotated");

        Ok(())
    }

    /// Lists every JSONL file currently on disk, oldest first.
    pub fn list_files(&self) -> Result<Vec<PathBuf>, EventError> {
        let mut files = Vec::new();

        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "jsonl") {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    pub fn close(&mut self) -> Result<(), EventError> {
        if let Some(ref mut writer) = self.current_file {
            writer.flush()?;
        }
        self.current_file = None;
        self.current_date = None;
        Ok(())
    }

    /// C9 reset: truncates every rotated file. The directory itself and its
    /// rotation bookkeeping survive so the next `append` starts clean.
    pub fn clear_all(&mut self) -> Result<(), EventError> {
        self.close()?;
        for file in self.list_files()? {
            fs::remove_file(file)?;
        }
        Ok(())
    }
}

impl Drop for TrainingRowStore {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use vigil_core::{AlertKind, Decision, TransactionId};

    fn row_on(day: &str) -> TrainingRow {
        let created_at = Utc.datetime_from_str(&format!("{day} 12:00:00"), "%Y-%m-%d %H:%M:%S").unwrap();
        TrainingRow::build(TransactionId::new(), &[AlertKind::HighAmount], 20, Decision::Approved, created_at)
    }

    #[test]
    fn append_rotates_per_day_and_list_files_sees_both() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TrainingRowStore::new(dir.path()).unwrap();

        store.append(&row_on("2026-01-01")).unwrap();
        store.append(&row_on("2026-01-02")).unwrap();

        let files = store.list_files().unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn clear_all_removes_every_rotated_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TrainingRowStore::new(dir.path()).unwrap();
        store.append(&row_on("2026-01-01")).unwrap();

        store.clear_all().unwrap();

        assert!(store.list_files().unwrap().is_empty());
    }
}
