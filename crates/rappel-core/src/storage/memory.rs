//! In-memory document store.
//!
//! Implements the same repository traits as [`super::Database`] over
//! shared state. Used by tests and by CLI previews that should not
//! touch the on-disk database. Handles are cheap clones over the same
//! underlying state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};

use super::traits::{session_id, ContentStore, StreakStore};
use crate::content::{Hadith, PrayerFormula, Verse};
use crate::error::StoreError;
use crate::streak::{PrayerSessionData, StreakData};

#[derive(Default)]
struct Inner {
    formulas: Vec<PrayerFormula>,
    verses: Vec<Verse>,
    hadiths: Vec<Hadith>,
    streaks: Vec<StreakData>,
    sessions: HashMap<String, PrayerSessionData>,
    fail_reads: bool,
    fail_writes: bool,
}

/// Cloneable in-memory store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent read fail, to exercise degraded paths.
    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// Make every subsequent write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    pub fn add_formula(&self, formula: PrayerFormula) {
        let mut inner = self.lock();
        let mut formula = formula;
        if formula.id.is_none() {
            formula.id = Some(uuid::Uuid::new_v4().to_string());
        }
        inner.formulas.push(formula);
    }

    pub fn add_verse(&self, verse: Verse) {
        let mut inner = self.lock();
        let mut verse = verse;
        if verse.id.is_none() {
            verse.id = Some(uuid::Uuid::new_v4().to_string());
        }
        inner.verses.push(verse);
    }

    pub fn add_hadith(&self, hadith: Hadith) {
        let mut inner = self.lock();
        let mut hadith = hadith;
        if hadith.id.is_none() {
            hadith.id = Some(uuid::Uuid::new_v4().to_string());
        }
        inner.hadiths.push(hadith);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_read(&self, collection: &str) -> Result<(), StoreError> {
        if self.lock().fail_reads {
            Err(StoreError::read(collection, "simulated read failure"))
        } else {
            Ok(())
        }
    }

    fn check_write(&self, collection: &str) -> Result<(), StoreError> {
        if self.lock().fail_writes {
            Err(StoreError::write(collection, "simulated write failure"))
        } else {
            Ok(())
        }
    }
}

impl ContentStore for MemoryStore {
    async fn prayer_formulas(&self) -> Result<Vec<PrayerFormula>, StoreError> {
        self.check_read("prayerFormulas")?;
        let mut all = self.lock().formulas.clone();
        all.sort_by_key(|f| f.order);
        Ok(all)
    }

    async fn verses(&self) -> Result<Vec<Verse>, StoreError> {
        self.check_read("verses")?;
        let mut all = self.lock().verses.clone();
        all.sort_by_key(|v| v.order);
        Ok(all)
    }

    async fn hadiths(&self) -> Result<Vec<Hadith>, StoreError> {
        self.check_read("hadiths")?;
        let mut all = self.lock().hadiths.clone();
        all.sort_by_key(|h| h.order);
        Ok(all)
    }
}

impl StreakStore for MemoryStore {
    async fn find_streak(&self, user_id: &str) -> Result<Option<StreakData>, StoreError> {
        self.check_read("streaks")?;
        Ok(self
            .lock()
            .streaks
            .iter()
            .find(|s| s.user_id == user_id)
            .cloned())
    }

    async fn insert_streak(&self, streak: &StreakData) -> Result<String, StoreError> {
        self.check_write("streaks")?;
        let id = uuid::Uuid::new_v4().to_string();
        let mut stored = streak.clone();
        stored.id = Some(id.clone());
        self.lock().streaks.push(stored);
        Ok(id)
    }

    async fn update_streak(&self, streak: &StreakData) -> Result<(), StoreError> {
        self.check_write("streaks")?;
        let mut inner = self.lock();
        match inner.streaks.iter_mut().find(|s| s.id == streak.id) {
            Some(stored) => {
                *stored = streak.clone();
                Ok(())
            }
            None => Err(StoreError::write("streaks", "no streak with that id")),
        }
    }

    async fn upsert_session(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<PrayerSessionData, StoreError> {
        self.check_write("userPrayerSessions")?;
        let id = session_id(user_id, date);
        let now = Utc::now();
        let mut inner = self.lock();
        let session = inner
            .sessions
            .entry(id.clone())
            .and_modify(|s| {
                s.prayer_count += 1;
                s.completed = true;
                s.updated_at = now;
            })
            .or_insert_with(|| PrayerSessionData {
                id,
                user_id: user_id.to_string(),
                date,
                prayer_count: 1,
                completed: true,
                created_at: now,
                updated_at: now,
            });
        Ok(session.clone())
    }

    async fn sessions_since(
        &self,
        user_id: &str,
        since: NaiveDate,
    ) -> Result<Vec<PrayerSessionData>, StoreError> {
        self.check_read("userPrayerSessions")?;
        Ok(self
            .lock()
            .sessions
            .values()
            .filter(|s| s.user_id == user_id && s.date >= since)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_upsert_is_keyed_by_user_and_date() {
        let store = MemoryStore::new();
        let first = store.upsert_session("alice", date("2025-03-10")).await.unwrap();
        let again = store.upsert_session("alice", date("2025-03-10")).await.unwrap();
        let other = store.upsert_session("bob", date("2025-03-10")).await.unwrap();

        assert_eq!(first.id, "alice_2025-03-10");
        assert_eq!(again.prayer_count, 2);
        assert_eq!(other.prayer_count, 1);
    }

    #[tokio::test]
    async fn test_content_ordered_by_order() {
        let store = MemoryStore::new();
        for (order, translation) in [(2, "second"), (1, "first")] {
            store.add_formula(PrayerFormula {
                id: None,
                arabic: String::new(),
                transliteration: String::new(),
                translation: translation.to_string(),
                order: Some(order),
                created_at: None,
            });
        }

        let all = store.prayer_formulas().await.unwrap();
        assert_eq!(all[0].translation, "first");
        assert_eq!(all[1].translation, "second");
    }

    #[tokio::test]
    async fn test_simulated_failures_surface_as_store_errors() {
        let store = MemoryStore::new();
        store.fail_writes(true);
        let err = store
            .upsert_session("alice", date("2025-03-10"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::WriteFailed { .. }));

        store.fail_writes(false);
        store.fail_reads(true);
        let err = store.find_streak("alice").await.unwrap_err();
        assert!(matches!(err, StoreError::ReadFailed { .. }));
    }
}
