//! Document store seams.
//!
//! The surrounding app persists to a hosted document database; this
//! crate only sees these traits, so tests and the CLI can substitute
//! the bundled SQLite or in-memory implementations. Every method is a
//! suspension point and returns an explicit [`StoreError`] on failure;
//! no implementation retries.

use chrono::NaiveDate;

use crate::content::{Hadith, PrayerFormula, Verse};
use crate::error::StoreError;
use crate::streak::{PrayerSessionData, StreakData};

/// Read access to the three content collections.
///
/// Collections are seeded by an out-of-scope migration and never
/// mutated here. Reads return the full collection ordered by `order`
/// ascending.
#[allow(async_fn_in_trait)]
pub trait ContentStore: Send + Sync {
    /// All prayer formulas, ordered by `order` ascending.
    async fn prayer_formulas(&self) -> Result<Vec<PrayerFormula>, StoreError>;

    /// All verses, ordered by `order` ascending.
    async fn verses(&self) -> Result<Vec<Verse>, StoreError>;

    /// All hadiths, ordered by `order` ascending.
    async fn hadiths(&self) -> Result<Vec<Hadith>, StoreError>;
}

/// Storage for streak records and per-day prayer sessions.
#[allow(async_fn_in_trait)]
pub trait StreakStore: Send + Sync {
    /// Look up the streak record for `user_id`, if any.
    async fn find_streak(&self, user_id: &str) -> Result<Option<StreakData>, StoreError>;

    /// Insert a new streak record, returning the assigned document id.
    async fn insert_streak(&self, streak: &StreakData) -> Result<String, StoreError>;

    /// Overwrite the streak record identified by `streak.id`.
    async fn update_streak(&self, streak: &StreakData) -> Result<(), StoreError>;

    /// Create or bump the session for `(user_id, date)`.
    ///
    /// Sessions are keyed by the deterministic composite id
    /// `{user_id}_{date}`, so a second completion the same day
    /// increments `prayer_count` on the existing record instead of
    /// creating a duplicate. Implementations must make this a single
    /// upsert, not a read-then-write.
    async fn upsert_session(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<PrayerSessionData, StoreError>;

    /// All sessions for `user_id` with `date >= since`, any order.
    async fn sessions_since(
        &self,
        user_id: &str,
        since: NaiveDate,
    ) -> Result<Vec<PrayerSessionData>, StoreError>;
}

/// Composite session document id: `{user_id}_{date}`.
pub(crate) fn session_id(user_id: &str, date: NaiveDate) -> String {
    format!("{}_{}", user_id, date.format("%Y-%m-%d"))
}
