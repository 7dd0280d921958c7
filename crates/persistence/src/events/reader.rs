//! Event Reader - read events from JSONL files
//!
//! Đọc audit events để xem history của ship hoặc một loại thao tác.

use crate::error::{PersistenceError, PersistenceResult};
use crate::events::store::{day_files, parse_event_line};
use chrono::NaiveDate;
use fueleu_core::{ComplianceEvent, EventType};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Event Reader - đọc events từ files JSONL
pub struct EventReader {
    base_path: PathBuf,
}

impl EventReader {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Đọc tất cả events từ một file; dòng hỏng trả về `CorruptEvent`
    fn read_file(&self, file_path: &Path) -> PersistenceResult<Vec<ComplianceEvent>> {
        let reader = BufReader::new(File::open(file_path)?);
        let mut events = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            events.push(parse_event_line(file_path, index + 1, &line)?);
        }

        Ok(events)
    }

    /// Đọc tất cả events, file cũ trước
    pub fn read_all(&self) -> PersistenceResult<Vec<ComplianceEvent>> {
        self.read_between(None, None)
    }

    /// Đọc events của các file ngày nằm trong `[from, to]` (YYYY-MM-DD);
    /// thiếu đầu nào thì không giới hạn đầu đó
    pub fn read_between(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> PersistenceResult<Vec<ComplianceEvent>> {
        let from = from.map(parse_date).transpose()?;
        let to = to.map(parse_date).transpose()?;

        let mut all_events = Vec::new();
        for (day, path) in day_files(&self.base_path)? {
            if from.map_or(false, |f| day < f) || to.map_or(false, |t| day > t) {
                continue;
            }
            all_events.extend(self.read_file(&path)?);
        }

        Ok(all_events)
    }
}

fn parse_date(value: &str) -> PersistenceResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| PersistenceError::InvalidDate(value.to_string()))
}

/// Event Filter - lọc events theo ship, năm, loại
#[derive(Debug, Default, Clone)]
pub struct EventFilter {
    /// Ship liên quan (kể cả là member của pool)
    pub ship_id: Option<String>,
    pub year: Option<i32>,
    pub event_types: Option<Vec<EventType>>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ship(mut self, ship_id: &str) -> Self {
        self.ship_id = Some(ship_id.to_string());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn event_types(mut self, types: Vec<EventType>) -> Self {
        self.event_types = Some(types);
        self
    }

    /// Kiểm tra event có match filter không
    pub fn matches(&self, event: &ComplianceEvent) -> bool {
        if let Some(ref ship_id) = self.ship_id {
            if !event.involves_ship(ship_id) {
                return false;
            }
        }

        if let Some(year) = self.year {
            if event.year != Some(year) {
                return false;
            }
        }

        if let Some(ref types) = self.event_types {
            if !types.contains(&event.event_type) {
                return false;
            }
        }

        true
    }

    pub fn apply(&self, events: Vec<ComplianceEvent>) -> Vec<ComplianceEvent> {
        events.into_iter().filter(|e| self.matches(e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventStore;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    #[test]
    fn test_event_reader() {
        let dir = tempdir().unwrap();
        let store = EventStore::new(dir.path()).unwrap();

        let banked = ComplianceEvent::surplus_banked("EVT_000001", "S1", 2024, dec!(100));
        let applied = ComplianceEvent::banked_applied(
            "EVT_000002",
            "S1",
            2025,
            dec!(100),
            dec!(-50),
            dec!(50),
        );
        store.append(&banked).unwrap();
        store.append(&applied).unwrap();

        let events = EventReader::new(dir.path()).read_all().unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, EventType::SurplusBanked);
        assert_eq!(events[1].event_type, EventType::BankedApplied);
    }

    #[test]
    fn test_bad_dates_rejected() {
        let dir = tempdir().unwrap();
        let reader = EventReader::new(dir.path());

        let err = reader.read_between(Some("2026-13-01"), None).unwrap_err();
        assert!(matches!(err, PersistenceError::InvalidDate(ref d) if d == "2026-13-01"));
        assert!(reader.read_between(None, Some("yesterday")).is_err());
        assert!(reader
            .read_between(Some("2026-01-01"), Some("2026-01-03"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_corrupt_line_is_located() {
        let dir = tempdir().unwrap();
        let good = serde_json::to_string(&ComplianceEvent::baseline_set("EVT_000001", "R001", 2024))
            .unwrap();
        let path = dir.path().join("2026-10-18.jsonl");
        std::fs::write(&path, format!("{}\n\n{{\"event_id\":\n", good)).unwrap();

        let err = EventReader::new(dir.path()).read_all().unwrap_err();
        assert!(matches!(err, PersistenceError::CorruptEvent { line: 3, .. }));
    }

    #[test]
    fn test_read_between_open_bounds() {
        let dir = tempdir().unwrap();
        for (day, id) in [("2026-01-01", "EVT_000001"), ("2026-01-05", "EVT_000002")] {
            let event = ComplianceEvent::surplus_banked(id, "S1", 2025, dec!(1));
            let line = serde_json::to_string(&event).unwrap();
            std::fs::write(dir.path().join(format!("{}.jsonl", day)), line + "\n").unwrap();
        }
        let reader = EventReader::new(dir.path());

        let later = reader.read_between(Some("2026-01-02"), None).unwrap();
        assert_eq!(later.len(), 1);
        assert_eq!(later[0].event_id, "EVT_000002");

        let earlier = reader.read_between(None, Some("2026-01-04")).unwrap();
        assert_eq!(earlier.len(), 1);
        assert_eq!(earlier[0].event_id, "EVT_000001");

        assert_eq!(reader.read_between(None, None).unwrap().len(), 2);
    }

    #[test]
    fn test_event_filter() {
        let events = vec![
            ComplianceEvent::surplus_banked("EVT_000001", "S1", 2024, dec!(100)),
            ComplianceEvent::surplus_banked("EVT_000002", "S2", 2025, dec!(200)),
            ComplianceEvent::pool_created("EVT_000003", 1, 2025, dec!(10), &["S1", "S3"]),
        ];

        let filtered = EventFilter::new().ship("S1").apply(events.clone());
        assert_eq!(filtered.len(), 2);

        let filtered = EventFilter::new().year(2025).apply(events.clone());
        assert_eq!(filtered.len(), 2);

        let filtered = EventFilter::new()
            .event_types(vec![EventType::PoolCreated])
            .apply(events);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].event_id, "EVT_000003");
    }
}
