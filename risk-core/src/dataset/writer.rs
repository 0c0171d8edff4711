use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use parking_lot::Mutex;

use super::record::DatasetRecord;

const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10 MB

/// Summary of the JSONL files in a dataset directory
#[derive(Debug, Clone, serde::Serialize)]
pub struct DatasetStats {
    pub total_files: usize,
    pub total_size_mb: f32,
    pub current_file: Option<String>,
}

pub struct DatasetWriter {
    file: Mutex<Option<File>>,
    base_dir: PathBuf,
}

impl DatasetWriter {
    pub fn from_path(base_dir: impl Into<PathBuf>) -> io::Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)?;

        Ok(Self {
            file: Mutex::new(None),
            base_dir,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Append a batch of records under a single lock, rotating to a new
    /// file past `MAX_FILE_SIZE`
    pub fn append_all(&self, records: &[DatasetRecord]) -> io::Result<()> {
        let mut guard = self.file.lock();

        if guard.is_none() {
            let file = match self.find_latest_file()? {
                Some(path) if fs::metadata(&path)?.len() < MAX_FILE_SIZE => {
                    OpenOptions::new().append(true).open(&path)?
                }
                _ => self.create_new_file()?,
            };
            *guard = Some(file);
        }

        let should_rotate = match guard.as_ref() {
            Some(f) => f.metadata()?.len() >= MAX_FILE_SIZE,
            None => false,
        };
        if should_rotate {
            *guard = Some(self.create_new_file()?);
        }

        if let Some(file) = guard.as_mut() {
            let mut out = BufWriter::new(file);
            for record in records {
                serde_json::to_writer(&mut out, record)?;
                out.write_all(b"\n")?;
            }
            out.flush()?;
        }

        Ok(())
    }

    pub fn stats(&self) -> io::Result<DatasetStats> {
        let files = self.list_files()?;
        let mut size = 0u64;
        for path in &files {
            size += fs::metadata(path)?.len();
        }

        Ok(DatasetStats {
            total_files: files.len(),
            total_size_mb: size as f32 / 1024.0 / 1024.0,
            current_file: files
                .last()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
                .map(str::to_string),
        })
    }

    /// JSONL files in chronological (filename) order
    pub fn list_files(&self) -> io::Result<Vec<PathBuf>> {
        let mut paths: Vec<PathBuf> = fs::read_dir(&self.base_dir)?
            .filter_map(|res| res.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().map_or(false, |ext| ext == "jsonl"))
            .collect();
        paths.sort();
        Ok(paths)
    }

    fn create_new_file(&self) -> io::Result<File> {
        // timestamp format: YYYY-MM-DD-HHMMSS
        let filename = format!("dataset-{}.jsonl", Utc::now().format("%Y-%m-%d-%H%M%S"));
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.base_dir.join(filename))
    }

    fn find_latest_file(&self) -> io::Result<Option<PathBuf>> {
        Ok(self.list_files()?.pop())
    }
}
