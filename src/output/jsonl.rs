//! File-based sinks: JSON Lines dataset and JSON run summary

use crate::extract::ItemRecord;
use crate::output::traits::{OutputResult, RecordSink, RunSummary};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes one JSON object per accepted record, one per line
pub struct JsonLinesSink<W: Write + Send> {
    writer: W,
    written: u64,
}

impl JsonLinesSink<BufWriter<File>> {
    /// Creates (or truncates) the dataset file at `path`
    pub fn create(path: &Path) -> OutputResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of records written so far
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> RecordSink for JsonLinesSink<W> {
    fn write_record(&mut self, record: &ItemRecord) -> OutputResult<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }

    fn write_summary(&mut self, _summary: &RunSummary) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes the run summary as a pretty-printed JSON file
pub struct SummaryFileSink {
    path: PathBuf,
}

impl SummaryFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSink for SummaryFileSink {
    fn write_record(&mut self, _record: &ItemRecord) -> OutputResult<()> {
        Ok(())
    }

    fn write_summary(&mut self, summary: &RunSummary) -> OutputResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(summary)?;
        std::fs::write(&self.path, json)?;
        tracing::debug!("Summary written to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn create_test_record(title: &str) -> ItemRecord {
        ItemRecord {
            url: "https://store.example.com/app/1/".to_string(),
            item_id: Some("1".to_string()),
            title: title.to_string(),
            description: None,
            header_image: None,
            release_date: None,
            coming_soon: false,
            early_access: false,
            is_dlc: false,
            base_item_url: None,
            supported_platforms: vec![],
            features: vec![],
            genres: vec![],
            popular_tags: vec![],
            languages: BTreeMap::new(),
            price: None,
            sale: false,
            sale_percentage: None,
            sale_until: None,
            recent_reviews: None,
            all_reviews: None,
            system_requirements: BTreeMap::new(),
            developers: None,
            publishers: None,
            scraped_at: Utc::now(),
        }
    }

    fn create_test_summary() -> RunSummary {
        RunSummary {
            accepted_count: 1,
            pages_processed: 1,
            runtime_seconds: 0.5,
            success: true,
            timeout_reached: false,
            processed: 1,
            errors: 0,
            message: None,
        }
    }

    #[test]
    fn test_one_record_per_line() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.write_record(&create_test_record("First")).unwrap();
        sink.write_record(&create_test_record("Second")).unwrap();
        sink.write_summary(&create_test_summary()).unwrap();
        assert_eq!(sink.written(), 2);

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["title"], "First");
        assert_eq!(first["isDLC"], false);
        assert!(first.get("scrapedAt").is_some());
    }

    #[test]
    fn test_dataset_file_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("items.jsonl");

        let mut sink = JsonLinesSink::create(&path).unwrap();
        sink.write_record(&create_test_record("Only")).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_summary_file_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");

        let mut sink = SummaryFileSink::new(&path);
        sink.write_record(&create_test_record("Ignored")).unwrap();
        assert!(!path.exists());

        sink.write_summary(&create_test_summary()).unwrap();
        let summary: RunSummary =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(summary, create_test_summary());
    }
}
