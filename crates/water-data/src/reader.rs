//! Record file discovery and loading.
//!
//! Reads raw telemetry from `.jsonl` (one object per line) and `.json`
//! (top-level array of objects) files and converts them into [`RawRecord`]s
//! for the record filter.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use water_core::models::RawRecord;
use water_core::{Result, WaterError};

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.json` / `.jsonl` files recursively under `data_path`, sorted by
/// path.
pub fn find_record_files(data_path: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_record_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Load every raw record under `data_path`.
///
/// `data_path` may be a single file or a directory. In directory mode files
/// that cannot be read or parsed are logged and skipped; a single explicit
/// file propagates its error.
pub fn load_records(data_path: &Path) -> Result<Vec<RawRecord>> {
    if !data_path.exists() {
        return Err(WaterError::DataPathNotFound(data_path.to_path_buf()));
    }

    if data_path.is_file() {
        return process_single_file(data_path);
    }

    let files = find_record_files(data_path);
    if files.is_empty() {
        return Err(WaterError::NoDataFiles(data_path.to_path_buf()));
    }

    let mut records: Vec<RawRecord> = Vec::new();
    for file_path in &files {
        match process_single_file(file_path) {
            Ok(batch) => records.extend(batch),
            Err(e) => warn!("Skipping {}: {}", file_path.display(), e),
        }
    }

    debug!(
        "Loaded {} raw records from {} files",
        records.len(),
        files.len()
    );
    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn is_record_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == "jsonl" || ext == "json")
        .unwrap_or(false)
}

fn process_single_file(file_path: &Path) -> Result<Vec<RawRecord>> {
    let file = std::fs::File::open(file_path).map_err(|source| WaterError::FileRead {
        path: file_path.to_path_buf(),
        source,
    })?;

    let is_lines = file_path
        .extension()
        .map(|ext| ext == "jsonl")
        .unwrap_or(false);

    if is_lines {
        Ok(read_json_lines(file_path, std::io::BufReader::new(file)))
    } else {
        read_json_array(std::io::BufReader::new(file))
    }
}

fn read_json_lines(file_path: &Path, reader: impl BufRead) -> Vec<RawRecord> {
    let mut records = Vec::new();
    let mut malformed = 0u64;

    for line_result in reader.lines() {
        let line = match line_result {
            Ok(l) => l,
            Err(_) => continue,
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<RawRecord>(trimmed) {
            Ok(record) => records.push(record),
            Err(_) => malformed += 1,
        }
    }

    if malformed > 0 {
        warn!(
            "{}: skipped {} malformed lines",
            file_path.display(),
            malformed
        );
    }
    records
}

fn read_json_array(reader: impl std::io::Read) -> Result<Vec<RawRecord>> {
    let values: Vec<serde_json::Value> = serde_json::from_reader(reader)?;
    Ok(values
        .into_iter()
        .filter_map(|v| serde_json::from_value::<RawRecord>(v).ok())
        .collect())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_missing_path() {
        let tmp = TempDir::new().unwrap();
        let err = load_records(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, WaterError::DataPathNotFound(_)));
    }

    #[test]
    fn test_empty_directory() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "notes.txt", "hello");
        let err = load_records(tmp.path()).unwrap_err();
        assert!(matches!(err, WaterError::NoDataFiles(_)));
    }

    #[test]
    fn test_jsonl_skips_blank_and_malformed_lines() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            tmp.path(),
            "events.jsonl",
            concat!(
                "{\"timestamp\":\"2024-05-01T08:00:00\",\"label\":\"dus\",\"volume\":\"120\"}\n",
                "\n",
                "{broken\n",
                "{\"timestamp\":\"2024-05-01T09:00:00\",\"label\":\"toaleta\",\"volume\":6.5,\"id\":3}\n",
            ),
        );
        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].volume.as_deref(), Some("6.5"));
    }

    #[test]
    fn test_json_array_file() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            tmp.path(),
            "events.json",
            r#"[{"timestamp":"2024-05-01T08:00:00","label":"dus","volume":"1"}, 42, {"label":"x"}]"#,
        );
        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[1].timestamp.is_none());
    }

    #[test]
    fn test_single_invalid_json_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "events.json", "{\"not\": \"an array\"}");
        let err = load_records(&path).unwrap_err();
        assert!(matches!(err, WaterError::JsonParse(_)));
    }

    #[test]
    fn test_directory_is_walked_recursively_and_sorted() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "b/day2.jsonl",
            "{\"timestamp\":\"2024-05-02T08:00:00\",\"label\":\"dus\",\"volume\":\"2\"}\n",
        );
        write(
            tmp.path(),
            "a/day1.jsonl",
            "{\"timestamp\":\"2024-05-01T08:00:00\",\"label\":\"dus\",\"volume\":\"1\"}\n",
        );
        write(tmp.path(), "a/broken.json", "not json");

        let files = find_record_files(tmp.path());
        assert_eq!(files.len(), 3);

        let records = load_records(tmp.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].volume.as_deref(), Some("1"));
        assert_eq!(records[1].volume.as_deref(), Some("2"));
    }
}
