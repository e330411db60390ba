//! Sequential reader over the rotated `fraud_training_tb` files, for
//! whatever downstream export or audit job wants the full training set.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use vigil_core::TrainingRow;

use crate::error::EventError;

pub struct TrainingRowReader {
    files: Vec<std::path::PathBuf>,
}

impl TrainingRowReader {
    pub fn from_directory(path: impl AsRef<Path>) -> Result<Self, EventError> {
        let path = path.as_ref();
        let mut files = Vec::new();

        if path.exists() {
            for entry in std::fs::read_dir(path)? {
                let entry = entry?;
                let file_path = entry.path();
                if file_path.extension().map_or(false, |ext| ext == "jsonl") {
                    files.push(file_path);
                }
            }
        }

        files.sort();

        Ok(Self { files })
    }

    /// Reads every row from every rotated file, oldest file first.
    pub fn read_all(&self) -> Result<Vec<TrainingRow>, EventError> {
        let mut rows = Vec::new();

        for file_path in &self.files {
            let file = File::open(file_path)?;
            let reader = BufReader::new(file);

            for line in reader.lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                rows.push(serde_json::from_str(&line)?);
            }
        }

        Ok(rows)
    }

    pub fn count(&self) -> Result<usize, EventError> {
        let mut count = 0;

        for file_path in &self.files {
            let file = File::open(file_path)?;
            let reader = BufReader::new(file);

            for line in reader.lines() {
                let line = line?;
                if !line.trim().is_empty() {
                    count += 1;
                }
            }
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TrainingRowStore;
    use chrono::Utc;
    use vigil_core::{AlertKind, Decision, TransactionId};

    #[test]
    fn reads_back_what_the_store_wrote() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TrainingRowStore::new(dir.path()).unwrap();
        let row = TrainingRow::build(TransactionId::new(), &[AlertKind::HighAmount], 20, Decision::Approved, Utc::now());
        store.append(&row).unwrap();
        store.close().unwrap();

        let reader = TrainingRowReader::from_directory(dir.path()).unwrap();
        let rows = reader.read_all().unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transaction_id, row.transaction_id);
        assert_eq!(reader.count().unwrap(), 1);
    }

    #[test]
    fn missing_directory_reads_as_empty() {
        let reader = TrainingRowReader::from_directory("/nonexistent/path/for/vigil-events-test").unwrap();
        assert_eq!(reader.read_all().unwrap(), Vec::new());
    }
}
