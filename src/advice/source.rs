//! Advisor-record adapters: CSV files on disk and an in-memory table.

use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, Trim};

use crate::{Error, Result, advice::AdviceRecord, ports::AdvisorSource};

/// Reads advisor `i` from `<directory>/<prefix><i>.csv`.
///
/// Files have no header row; each line holds `key1,value1,key2,value2`.
/// Files are re-read on every call, so edits take effect on the next
/// decision.
#[derive(Debug, Clone)]
pub struct CsvAdvisorDirectory {
    directory: PathBuf,
    prefix: String,
}

impl CsvAdvisorDirectory {
    pub const DEFAULT_PREFIX: &'static str = "user";

    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            prefix: Self::DEFAULT_PREFIX.to_string(),
        }
    }

    /// Use `<prefix><i>.csv` instead of `user<i>.csv`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn path_for(&self, advisor: usize) -> PathBuf {
        self.directory.join(format!("{}{advisor}.csv", self.prefix))
    }
}

impl AdvisorSource for CsvAdvisorDirectory {
    fn records(&self, advisor: usize) -> Result<Vec<AdviceRecord>> {
        let file = File::open(self.path_for(advisor))
            .map_err(|source| Error::AdvisorSource { advisor, source })?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(file);

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            records.push(AdviceRecord::from_fields(advisor, row.iter())?);
        }
        Ok(records)
    }
}

/// Fixed advisor records held in memory, indexed by advisor.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAdvisorSource {
    advisors: Vec<Vec<AdviceRecord>>,
}

impl InMemoryAdvisorSource {
    pub fn new(advisors: Vec<Vec<AdviceRecord>>) -> Self {
        Self { advisors }
    }

    /// Number of advisors with records.
    pub fn len(&self) -> usize {
        self.advisors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.advisors.is_empty()
    }
}

impl AdvisorSource for InMemoryAdvisorSource {
    fn records(&self, advisor: usize) -> Result<Vec<AdviceRecord>> {
        self.advisors
            .get(advisor)
            .cloned()
            .ok_or_else(|| Error::AdvisorSource {
                advisor,
                source: io::Error::new(io::ErrorKind::NotFound, "no records for advisor"),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_csv_directory_reads_headerless_rows() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("user0.csv"), "feature, Facing-ghost ,value,2\n").unwrap();

        let source = CsvAdvisorDirectory::new(dir.path());
        let records = source.records(0).unwrap();
        assert_eq!(
            records,
            vec![AdviceRecord::new("feature", "Facing-ghost", "value", "2")]
        );
    }

    #[test]
    fn test_csv_row_with_wrong_width_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("expert1.csv"), "feature,Facing-ghost,value\n").unwrap();

        let source = CsvAdvisorDirectory::new(dir.path()).with_prefix("expert");
        let err = source.records(1).unwrap_err();
        assert!(matches!(err, Error::MalformedAdvisorRecord { advisor: 1, .. }));
    }

    #[test]
    fn test_missing_file_reports_advisor() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvAdvisorDirectory::new(dir.path()).records(4).unwrap_err();
        assert!(matches!(err, Error::AdvisorSource { advisor: 4, .. }));
    }

    #[test]
    fn test_in_memory_source_out_of_range() {
        let source = InMemoryAdvisorSource::new(vec![Vec::new()]);
        assert!(source.records(0).unwrap().is_empty());
        assert!(source.records(1).is_err());
    }
}
