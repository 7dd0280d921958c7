//! JSONL audit log - append-only writer
//!
//! Mỗi event là một dòng JSON trong file của ngày ghi trong `timestamp`
//! (`2026-10-18.jsonl`). Event id không do store cấp: business layer lấy số
//! thứ tự từ `EventSequenceRepo` rồi mới build event.

use crate::error::{PersistenceError, PersistenceResult};
use chrono::NaiveDate;
use fueleu_core::ComplianceEvent;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

pub struct EventStore {
    base_path: PathBuf,
    /// Giữ một dòng không bị xen giữa hai append trong cùng process
    append_lock: Mutex<()>,
}

impl EventStore {
    /// Mở (tạo nếu chưa có) thư mục event log
    pub fn new<P: AsRef<Path>>(base_path: P) -> PersistenceResult<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;

        Ok(Self {
            base_path,
            append_lock: Mutex::new(()),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub(crate) fn day_file(&self, day: NaiveDate) -> PathBuf {
        self.base_path.join(format!("{}.jsonl", day.format("%Y-%m-%d")))
    }

    /// Ghi event vào file của ngày event; trả về file đã ghi.
    ///
    /// Dòng được ghi bằng một lần write ở chế độ append, không buffer, nên
    /// event đã append là đọc được ngay.
    pub fn append(&self, event: &ComplianceEvent) -> PersistenceResult<PathBuf> {
        let mut line = serde_json::to_string(event)?;
        line.push('\n');

        let path = self.day_file(event.timestamp.date_naive());
        let _guard = self
            .append_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?
            .write_all(line.as_bytes())?;

        Ok(path)
    }

    /// Event ghi sau cùng: dòng cuối của file ngày mới nhất
    pub fn last_event(&self) -> PersistenceResult<Option<ComplianceEvent>> {
        let Some(path) = day_files(&self.base_path)?.pop().map(|(_, path)| path) else {
            return Ok(None);
        };

        let content = fs::read_to_string(&path)?;
        let last = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .last();

        last.map(|(index, line)| parse_event_line(&path, index + 1, line))
            .transpose()
    }
}

/// Các file `YYYY-MM-DD.jsonl` trong thư mục, ngày cũ trước.
///
/// File không đặt tên theo ngày bị bỏ qua.
pub(crate) fn day_files(base_path: &Path) -> PersistenceResult<Vec<(NaiveDate, PathBuf)>> {
    if !base_path.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(base_path)? {
        let path = entry?.path();
        if path.extension().map_or(true, |ext| ext != "jsonl") {
            continue;
        }
        let day = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok());
        if let Some(day) = day {
            files.push((day, path));
        }
    }

    files.sort();
    Ok(files)
}

/// Parse một dòng của event log; `line_no` đánh số từ 1
pub(crate) fn parse_event_line(
    path: &Path,
    line_no: usize,
    line: &str,
) -> PersistenceResult<ComplianceEvent> {
    serde_json::from_str(line).map_err(|e| PersistenceError::corrupt_event(path, line_no, e))
}
