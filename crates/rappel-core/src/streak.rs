//! Consecutive-day streak and per-day session tracking.
//!
//! One streak record per user, created lazily on first read. At most
//! one session record per `(user, day)`; repeat completions the same
//! day bump `prayer_count` on the existing record so a day never earns
//! more than one day of streak credit.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::storage::StreakStore;

/// Number of trailing days kept in [`StreakData::streak_history`].
pub const HISTORY_DAYS: usize = 7;

/// One day in the trailing completion history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakDay {
    pub date: NaiveDate,
    pub completed: bool,
}

/// Durable per-user streak record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakData {
    pub id: Option<String>,
    pub user_id: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Date of the most recent completed session, `None` before the
    /// first one.
    pub last_prayer_date: Option<NaiveDate>,
    /// Trailing completion history, oldest first, capped at
    /// [`HISTORY_DAYS`] entries.
    pub streak_history: Vec<StreakDay>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StreakData {
    /// Fresh zeroed record for `user_id` with a trailing week of
    /// incomplete history ending at `today`.
    pub fn new(user_id: &str, today: NaiveDate) -> Self {
        let now = Utc::now();
        let streak_history = (0..HISTORY_DAYS as i64)
            .rev()
            .map(|back| StreakDay {
                date: today - Duration::days(back),
                completed: false,
            })
            .collect();

        Self {
            id: None,
            user_id: user_id.to_string(),
            current_streak: 0,
            longest_streak: 0,
            last_prayer_date: None,
            streak_history,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Durable session record, at most one per `(user, day)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrayerSessionData {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub prayer_count: u32,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Updated streak and session returned together so a caller can
/// reflect both without a second read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub streak: StreakData,
    pub session: PrayerSessionData,
}

/// Streak record plus month-to-date aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakStats {
    pub streak: StreakData,
    /// Sum of `prayer_count` over this month's sessions.
    pub total_prayers: u32,
    /// Completed sessions this month.
    pub sessions_this_month: u32,
}

/// Streak and session operations over a [`StreakStore`].
pub struct StreakService<S> {
    store: S,
}

impl<S: StreakStore> StreakService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The user's streak record, created zeroed on first access.
    pub async fn user_streak(&self, user_id: &str) -> Result<StreakData, StoreError> {
        self.user_streak_on(user_id, today_local()).await
    }

    /// [`Self::user_streak`] with an explicit "today".
    pub async fn user_streak_on(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<StreakData, StoreError> {
        if let Some(existing) = self.store.find_streak(user_id).await? {
            return Ok(existing);
        }

        let mut streak = StreakData::new(user_id, today);
        let id = self.store.insert_streak(&streak).await?;
        streak.id = Some(id);
        Ok(streak)
    }

    /// Record one prayer completion for today.
    ///
    /// Upserts the day's session, then advances the streak: `+1` when
    /// yesterday was the last completed day, reset to 1 when the chain
    /// is broken or this is the first session ever, unchanged on a
    /// same-day repeat.
    pub async fn record_prayer_session(
        &self,
        user_id: &str,
    ) -> Result<SessionOutcome, StoreError> {
        self.record_session_on(user_id, today_local()).await
    }

    /// [`Self::record_prayer_session`] for an explicit calendar date.
    pub async fn record_session_on(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<SessionOutcome, StoreError> {
        let session = self.store.upsert_session(user_id, today).await?;
        let streak = self.advance_streak(user_id, today).await?;
        Ok(SessionOutcome { streak, session })
    }

    /// Streak record plus aggregates over the current calendar month.
    pub async fn streak_stats(&self, user_id: &str) -> Result<StreakStats, StoreError> {
        self.streak_stats_on(user_id, today_local()).await
    }

    /// [`Self::streak_stats`] with an explicit "today".
    pub async fn streak_stats_on(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<StreakStats, StoreError> {
        let streak = self.user_streak_on(user_id, today).await?;

        let first_of_month = today.with_day(1).unwrap_or(today);
        let sessions = self.store.sessions_since(user_id, first_of_month).await?;

        let mut total_prayers = 0;
        let mut sessions_this_month = 0;
        for session in &sessions {
            total_prayers += session.prayer_count;
            if session.completed {
                sessions_this_month += 1;
            }
        }

        Ok(StreakStats {
            streak,
            total_prayers,
            sessions_this_month,
        })
    }

    async fn advance_streak(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<StreakData, StoreError> {
        let mut streak = self.user_streak_on(user_id, today).await?;
        let yesterday = today - Duration::days(1);

        if streak.last_prayer_date == Some(yesterday) {
            streak.current_streak += 1;
        } else if streak.last_prayer_date != Some(today) {
            // Broken chain or first-ever session.
            streak.current_streak = 1;
        }

        streak.longest_streak = streak.longest_streak.max(streak.current_streak);
        streak.last_prayer_date = Some(today);
        mark_completed(&mut streak.streak_history, today);
        streak.updated_at = Utc::now();

        self.store.update_streak(&streak).await?;
        Ok(streak)
    }
}

/// Mark `date` completed in the history, appending and evicting the
/// oldest entry when the cap is exceeded.
fn mark_completed(history: &mut Vec<StreakDay>, date: NaiveDate) {
    if let Some(entry) = history.iter_mut().find(|e| e.date == date) {
        entry.completed = true;
        return;
    }
    history.push(StreakDay {
        date,
        completed: true,
    });
    if history.len() > HISTORY_DAYS {
        history.remove(0);
    }
}

fn today_local() -> NaiveDate {
    Local::now().date_naive()
}
