//! Focus session storage
//!
//! All sessions live in one JSON array under a single key of a
//! `KeyValueStore`. The collection is append-only: `save` adds one record,
//! `clear_all` drops everything, nothing is edited in place.

use chrono::{DateTime, Duration, Local, Utc};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::kv::{FileStore, KeyValueStore};
use crate::session::{NewSession, SessionRecord};

/// Key the session list is stored under
pub const SESSIONS_KEY: &str = "focus.sessions";

/// Append-only session store
pub struct SessionStore {
    kv: Box<dyn KeyValueStore>,
    /// Held across save's read-modify-write
    write_lock: Mutex<()>,
}

impl SessionStore {
    pub fn new(kv: Box<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            write_lock: Mutex::new(()),
        }
    }

    /// Open a file-backed store in `data_dir`
    pub fn open(data_dir: &Path) -> Result<Self> {
        Ok(Self::new(Box::new(FileStore::open(data_dir)?)))
    }

    /// Append a session and return the stored record
    pub fn save(&self, session: NewSession) -> Result<SessionRecord> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Unavailable("session write lock poisoned".to_string()))?;

        // A corrupt blob is replaced rather than blocking every later save
        let mut records = self.get_all();
        let now = Utc::now();

        let record = SessionRecord {
            id: next_id(&records, now),
            category_id: session.category_id,
            duration_seconds: session.duration_seconds,
            distraction_count: session.distraction_count,
            timestamp: session.timestamp.unwrap_or(now),
        };
        records.push(record.clone());

        let blob = serde_json::to_string(&records)?;
        self.kv.set(SESSIONS_KEY, &blob)?;

        debug!(id = %record.id, total = records.len(), "Session appended");
        Ok(record)
    }

    /// Every stored session in append order
    ///
    /// Unreadable or corrupt storage reads as empty.
    pub fn get_all(&self) -> Vec<SessionRecord> {
        match self.read() {
            Ok(records) => records,
            Err(e) => {
                warn!("Failed to read sessions, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Sessions recorded on today's local calendar date
    pub fn get_today(&self) -> Vec<SessionRecord> {
        self.get_today_at(Local::now())
    }

    pub fn get_today_at(&self, now: DateTime<Local>) -> Vec<SessionRecord> {
        on_same_day(self.get_all(), now)
    }

    /// Sessions from the rolling window `[now - days, now]`
    pub fn get_last_n_days(&self, days: u32) -> Vec<SessionRecord> {
        self.get_last_n_days_at(days, Local::now())
    }

    pub fn get_last_n_days_at(&self, days: u32, now: DateTime<Local>) -> Vec<SessionRecord> {
        let cutoff = now.with_timezone(&Utc) - Duration::days(days as i64);
        self.get_all()
            .into_iter()
            .filter(|r| r.timestamp >= cutoff)
            .collect()
    }

    /// Delete every stored session
    pub fn clear_all(&self) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Unavailable("session write lock poisoned".to_string()))?;
        self.kv.remove(SESSIONS_KEY)
    }

    fn read(&self) -> Result<Vec<SessionRecord>> {
        let Some(blob) = self.kv.get(SESSIONS_KEY)? else {
            return Ok(Vec::new());
        };
        if blob.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&blob)?)
    }
}

/// Keep the records whose local calendar date matches `now`'s
pub fn on_same_day(records: Vec<SessionRecord>, now: DateTime<Local>) -> Vec<SessionRecord> {
    let today = now.date_naive();
    records
        .into_iter()
        .filter(|r| r.local_date() == today)
        .collect()
}

/// Millisecond timestamp, bumped past any id already taken
fn next_id(records: &[SessionRecord], now: DateTime<Utc>) -> String {
    let mut millis = now.timestamp_millis();
    loop {
        let candidate = millis.to_string();
        if !records.iter().any(|r| r.id == candidate) {
            return candidate;
        }
        millis += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::kv::MemoryStore;
    use chrono::{NaiveDate, TimeZone};
    use std::collections::HashSet;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn memory_store() -> SessionStore {
        SessionStore::new(Box::new(MemoryStore::new()))
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
        let naive = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap();
        Local.from_local_datetime(&naive).earliest().unwrap()
    }

    /// Backend whose writes always fail
    struct ReadOnly;

    impl KeyValueStore for ReadOnly {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(StoreError::Unavailable("read-only".to_string()))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Err(StoreError::Unavailable("read-only".to_string()))
        }
    }

    #[test]
    fn test_empty_before_first_save() {
        let store = memory_store();
        assert!(store.get_all().is_empty());
        assert!(store.get_today().is_empty());
    }

    #[test]
    fn test_save_assigns_id_and_timestamp() {
        let store = memory_store();
        let before = Utc::now();
        let saved = store.save(NewSession::new(Category::Coding, 1500, 2)).unwrap();

        let all = store.get_all();
        assert_eq!(all, vec![saved.clone()]);
        assert_eq!(saved.category_id, "coding");
        assert_eq!(saved.duration_seconds, 1500);
        assert_eq!(saved.distraction_count, 2);
        assert!(!saved.id.is_empty());
        assert!(saved.timestamp >= before);
    }

    #[test]
    fn test_save_keeps_supplied_timestamp() {
        let store = memory_store();
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let saved = store
            .save(NewSession::new(Category::Study, 60, 0).at(at))
            .unwrap();
        assert_eq!(saved.timestamp, at);
    }

    #[test]
    fn test_ids_are_unique_and_order_is_append_order() {
        let store = memory_store();
        for i in 0..20 {
            store.save(NewSession::new(Category::Other, i, 0)).unwrap();
        }

        let all = store.get_all();
        let ids: HashSet<_> = all.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids.len(), 20);
        let durations: Vec<u32> = all.iter().map(|r| r.duration_seconds).collect();
        assert_eq!(durations, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_clear_all() {
        let store = memory_store();
        store.save(NewSession::new(Category::Study, 60, 0)).unwrap();
        store.save(NewSession::new(Category::Study, 60, 0)).unwrap();

        store.clear_all().unwrap();
        assert!(store.get_all().is_empty());

        // Clearing an empty store is fine too
        store.clear_all().unwrap();
    }

    #[test]
    fn test_corrupt_blob_reads_as_empty() {
        let kv = MemoryStore::new();
        kv.set(SESSIONS_KEY, "{ definitely not a list").unwrap();
        let store = SessionStore::new(Box::new(kv));
        assert!(store.get_all().is_empty());
    }

    #[test]
    fn test_save_replaces_corrupt_blob() {
        let kv = MemoryStore::new();
        kv.set(SESSIONS_KEY, "{ definitely not a list").unwrap();
        let store = SessionStore::new(Box::new(kv));

        store.save(NewSession::new(Category::Study, 60, 0)).unwrap();
        assert_eq!(store.get_all().len(), 1);

        store.save(NewSession::new(Category::Coding, 120, 1)).unwrap();
        let all = store.get_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].category_id, "coding");
    }

    #[test]
    fn test_save_propagates_write_failure() {
        let store = SessionStore::new(Box::new(ReadOnly));
        let result = store.save(NewSession::new(Category::Study, 60, 0));
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let tmp = TempDir::new().unwrap();
        {
            let store = SessionStore::open(tmp.path()).unwrap();
            store.save(NewSession::new(Category::Reading, 900, 1)).unwrap();
        }

        let reopened = SessionStore::open(tmp.path()).unwrap();
        let all = reopened.get_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].category(), Some(Category::Reading));

        let blob = std::fs::read_to_string(tmp.path().join("focus.sessions.json")).unwrap();
        assert!(blob.contains("\"durationSeconds\":900"));
    }

    #[test]
    fn test_get_today_is_calendar_based() {
        let store = memory_store();
        let now = local(2026, 6, 15, 23, 0);

        // 22 hours ago, still today
        let early_today = local(2026, 6, 15, 1, 0);
        // 25 hours ago, yesterday
        let yesterday = local(2026, 6, 14, 22, 0);

        store
            .save(NewSession::new(Category::Study, 100, 0).at(early_today.with_timezone(&Utc)))
            .unwrap();
        store
            .save(NewSession::new(Category::Study, 200, 0).at(yesterday.with_timezone(&Utc)))
            .unwrap();

        let today = store.get_today_at(now);
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].duration_seconds, 100);
    }

    #[test]
    fn test_last_n_days_is_rolling() {
        let store = memory_store();
        let now = local(2026, 6, 15, 12, 0);

        let inside = now - Duration::days(7) + Duration::minutes(1);
        let outside = now - Duration::days(7) - Duration::minutes(1);

        store
            .save(NewSession::new(Category::Coding, 1, 0).at(inside.with_timezone(&Utc)))
            .unwrap();
        store
            .save(NewSession::new(Category::Coding, 2, 0).at(outside.with_timezone(&Utc)))
            .unwrap();

        let recent = store.get_last_n_days_at(7, now);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].duration_seconds, 1);
    }

    #[test]
    fn test_concurrent_saves_lose_nothing() {
        let store = Arc::new(memory_store());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        store.save(NewSession::new(Category::Project, 60, 0)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let all = store.get_all();
        assert_eq!(all.len(), 80);
        let ids: HashSet<_> = all.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), 80);
    }

    #[test]
    fn test_next_id_skips_taken() {
        let now = Utc.timestamp_millis_opt(1_000).unwrap();
        let taken = SessionRecord {
            id: "1000".to_string(),
            category_id: "study".to_string(),
            duration_seconds: 0,
            distraction_count: 0,
            timestamp: now,
        };
        assert_eq!(next_id(&[taken], now), "1001");
        assert_eq!(next_id(&[], now), "1000");
    }
}
