//! SQLite-backed document store.
//!
//! Local durable implementation of the [`ContentStore`] and
//! [`StreakStore`] seams, mirroring the hosted collections:
//! `prayer_formulas`, `verses`, `hadiths`, `streaks` (one row per
//! user) and `prayer_sessions` (one row per user and day).

use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Row};

use super::traits::{session_id, ContentStore, StreakStore};
use super::data_dir;
use crate::content::{Hadith, PrayerFormula, Verse};
use crate::error::StoreError;
use crate::streak::{PrayerSessionData, StreakData};

/// SQLite database holding content and streak collections.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open the database at `~/.config/rappel/rappel.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let path = data_dir()?.join("rappel.db");
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests and previews).
    pub fn open_memory() -> Result<Self, Box<dyn std::error::Error>> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.lock().execute_batch(
            "CREATE TABLE IF NOT EXISTS prayer_formulas (
                id              TEXT PRIMARY KEY,
                arabic          TEXT NOT NULL,
                transliteration TEXT NOT NULL,
                translation     TEXT NOT NULL,
                ord             INTEGER,
                created_at      TEXT
            );

            CREATE TABLE IF NOT EXISTS verses (
                id              TEXT PRIMARY KEY,
                arabic          TEXT NOT NULL,
                transliteration TEXT NOT NULL,
                translation     TEXT NOT NULL,
                reference       TEXT NOT NULL,
                ord             INTEGER,
                created_at      TEXT
            );

            CREATE TABLE IF NOT EXISTS hadiths (
                id         TEXT PRIMARY KEY,
                text       TEXT NOT NULL,
                source     TEXT NOT NULL,
                arabic     TEXT NOT NULL,
                ord        INTEGER,
                created_at TEXT
            );

            CREATE TABLE IF NOT EXISTS streaks (
                id               TEXT PRIMARY KEY,
                user_id          TEXT NOT NULL UNIQUE,
                current_streak   INTEGER NOT NULL,
                longest_streak   INTEGER NOT NULL,
                last_prayer_date TEXT,
                streak_history   TEXT NOT NULL,
                created_at       TEXT NOT NULL,
                updated_at       TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS prayer_sessions (
                id           TEXT PRIMARY KEY,
                user_id      TEXT NOT NULL,
                date         TEXT NOT NULL,
                prayer_count INTEGER NOT NULL,
                completed    INTEGER NOT NULL,
                created_at   TEXT NOT NULL,
                updated_at   TEXT NOT NULL,
                UNIQUE(user_id, date)
            );

            -- Covers the equality/range queries used by the tracker
            CREATE INDEX IF NOT EXISTS idx_sessions_user_date
                ON prayer_sessions(user_id, date);",
        )?;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert one prayer formula, returning its assigned id.
    pub fn insert_formula(&self, formula: &PrayerFormula) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        self.lock()
            .execute(
                "INSERT INTO prayer_formulas
                 (id, arabic, transliteration, translation, ord, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    id,
                    formula.arabic,
                    formula.transliteration,
                    formula.translation,
                    formula.order,
                    formula.created_at.map(|t| t.to_rfc3339()),
                ],
            )
            .map_err(|e| StoreError::write("prayerFormulas", e))?;
        Ok(id)
    }

    /// Insert one verse, returning its assigned id.
    pub fn insert_verse(&self, verse: &Verse) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        self.lock()
            .execute(
                "INSERT INTO verses
                 (id, arabic, transliteration, translation, reference, ord, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    id,
                    verse.arabic,
                    verse.transliteration,
                    verse.translation,
                    verse.reference,
                    verse.order,
                    verse.created_at.map(|t| t.to_rfc3339()),
                ],
            )
            .map_err(|e| StoreError::write("verses", e))?;
        Ok(id)
    }

    /// Insert one hadith, returning its assigned id.
    pub fn insert_hadith(&self, hadith: &Hadith) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        self.lock()
            .execute(
                "INSERT INTO hadiths (id, text, source, arabic, ord, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    id,
                    hadith.text,
                    hadith.source,
                    hadith.arabic,
                    hadith.order,
                    hadith.created_at.map(|t| t.to_rfc3339()),
                ],
            )
            .map_err(|e| StoreError::write("hadiths", e))?;
        Ok(id)
    }

    /// Seed the bundled starter content into empty collections.
    ///
    /// Idempotent: collections that already hold documents are left
    /// untouched. Returns the number of documents inserted.
    pub fn seed_default_content(&self) -> Result<usize, StoreError> {
        let mut inserted = 0;

        let formulas: i64 = self
            .lock()
            .query_row("SELECT COUNT(*) FROM prayer_formulas", [], |r| r.get(0))
            .map_err(|e| StoreError::read("prayerFormulas", e))?;
        if formulas == 0 {
            for (order, formula) in default_formulas().iter().enumerate() {
                let mut formula = formula.clone();
                formula.order = Some(order as i64 + 1);
                self.insert_formula(&formula)?;
                inserted += 1;
            }
        }

        let verses: i64 = self
            .lock()
            .query_row("SELECT COUNT(*) FROM verses", [], |r| r.get(0))
            .map_err(|e| StoreError::read("verses", e))?;
        if verses == 0 {
            for (order, verse) in default_verses().iter().enumerate() {
                let mut verse = verse.clone();
                verse.order = Some(order as i64 + 1);
                self.insert_verse(&verse)?;
                inserted += 1;
            }
        }

        let hadiths: i64 = self
            .lock()
            .query_row("SELECT COUNT(*) FROM hadiths", [], |r| r.get(0))
            .map_err(|e| StoreError::read("hadiths", e))?;
        if hadiths == 0 {
            for (order, hadith) in default_hadiths().iter().enumerate() {
                let mut hadith = hadith.clone();
                hadith.order = Some(order as i64 + 1);
                self.insert_hadith(&hadith)?;
                inserted += 1;
            }
        }

        Ok(inserted)
    }
}

impl ContentStore for Database {
    async fn prayer_formulas(&self) -> Result<Vec<PrayerFormula>, StoreError> {
        let conn = self.lock();
        let mut stmt = conn
            .prepare(
                "SELECT id, arabic, transliteration, translation, ord, created_at
                 FROM prayer_formulas ORDER BY ord ASC",
            )
            .map_err(|e| StoreError::read("prayerFormulas", e))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(PrayerFormula {
                    id: row.get(0)?,
                    arabic: row.get(1)?,
                    transliteration: row.get(2)?,
                    translation: row.get(3)?,
                    order: row.get(4)?,
                    created_at: read_timestamp(row, 5)?,
                })
            })
            .map_err(|e| StoreError::read("prayerFormulas", e))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::read("prayerFormulas", e))
    }

    async fn verses(&self) -> Result<Vec<Verse>, StoreError> {
        let conn = self.lock();
        let mut stmt = conn
            .prepare(
                "SELECT id, arabic, transliteration, translation, reference, ord, created_at
                 FROM verses ORDER BY ord ASC",
            )
            .map_err(|e| StoreError::read("verses", e))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Verse {
                    id: row.get(0)?,
                    arabic: row.get(1)?,
                    transliteration: row.get(2)?,
                    translation: row.get(3)?,
                    reference: row.get(4)?,
                    order: row.get(5)?,
                    created_at: read_timestamp(row, 6)?,
                })
            })
            .map_err(|e| StoreError::read("verses", e))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::read("verses", e))
    }

    async fn hadiths(&self) -> Result<Vec<Hadith>, StoreError> {
        let conn = self.lock();
        let mut stmt = conn
            .prepare(
                "SELECT id, text, source, arabic, ord, created_at
                 FROM hadiths ORDER BY ord ASC",
            )
            .map_err(|e| StoreError::read("hadiths", e))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Hadith {
                    id: row.get(0)?,
                    text: row.get(1)?,
                    source: row.get(2)?,
                    arabic: row.get(3)?,
                    order: row.get(4)?,
                    created_at: read_timestamp(row, 5)?,
                })
            })
            .map_err(|e| StoreError::read("hadiths", e))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::read("hadiths", e))
    }
}

impl StreakStore for Database {
    async fn find_streak(&self, user_id: &str) -> Result<Option<StreakData>, StoreError> {
        let conn = self.lock();
        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, current_streak, longest_streak, last_prayer_date,
                        streak_history, created_at, updated_at
                 FROM streaks WHERE user_id = ?1 LIMIT 1",
            )
            .map_err(|e| StoreError::read("streaks", e))?;
        let mut rows = stmt
            .query_map(params![user_id], read_streak)
            .map_err(|e| StoreError::read("streaks", e))?;
        match rows.next() {
            Some(row) => row.map(Some).map_err(|e| StoreError::read("streaks", e)),
            None => Ok(None),
        }
    }

    async fn insert_streak(&self, streak: &StreakData) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        let history = serde_json::to_string(&streak.streak_history)
            .map_err(|e| StoreError::write("streaks", e))?;
        self.lock()
            .execute(
                "INSERT INTO streaks
                 (id, user_id, current_streak, longest_streak, last_prayer_date,
                  streak_history, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    id,
                    streak.user_id,
                    streak.current_streak,
                    streak.longest_streak,
                    streak.last_prayer_date.map(format_date),
                    history,
                    streak.created_at.to_rfc3339(),
                    streak.updated_at.to_rfc3339(),
                ],
            )
            .map_err(|e| StoreError::write("streaks", e))?;
        Ok(id)
    }

    async fn update_streak(&self, streak: &StreakData) -> Result<(), StoreError> {
        let id = streak
            .id
            .as_deref()
            .ok_or_else(|| StoreError::write("streaks", "streak has no document id"))?;
        let history = serde_json::to_string(&streak.streak_history)
            .map_err(|e| StoreError::write("streaks", e))?;
        let changed = self
            .lock()
            .execute(
                "UPDATE streaks SET current_streak = ?2, longest_streak = ?3,
                        last_prayer_date = ?4, streak_history = ?5, updated_at = ?6
                 WHERE id = ?1",
                params![
                    id,
                    streak.current_streak,
                    streak.longest_streak,
                    streak.last_prayer_date.map(format_date),
                    history,
                    streak.updated_at.to_rfc3339(),
                ],
            )
            .map_err(|e| StoreError::write("streaks", e))?;
        if changed == 0 {
            return Err(StoreError::write("streaks", "no streak with that id"));
        }
        Ok(())
    }

    async fn upsert_session(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<PrayerSessionData, StoreError> {
        let id = session_id(user_id, date);
        let now = Utc::now().to_rfc3339();
        let conn = self.lock();
        conn.execute(
            "INSERT INTO prayer_sessions
             (id, user_id, date, prayer_count, completed, created_at, updated_at)
             VALUES (?1, ?2, ?3, 1, 1, ?4, ?4)
             ON CONFLICT(id) DO UPDATE SET
                prayer_count = prayer_count + 1,
                completed = 1,
                updated_at = ?4",
            params![id, user_id, format_date(date), now],
        )
        .map_err(|e| StoreError::write("userPrayerSessions", e))?;

        conn.query_row(
            "SELECT id, user_id, date, prayer_count, completed, created_at, updated_at
             FROM prayer_sessions WHERE id = ?1",
            params![id],
            read_session,
        )
        .map_err(|e| StoreError::read("userPrayerSessions", e))
    }

    async fn sessions_since(
        &self,
        user_id: &str,
        since: NaiveDate,
    ) -> Result<Vec<PrayerSessionData>, StoreError> {
        let conn = self.lock();
        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, date, prayer_count, completed, created_at, updated_at
                 FROM prayer_sessions WHERE user_id = ?1 AND date >= ?2",
            )
            .map_err(|e| StoreError::read("userPrayerSessions", e))?;
        let rows = stmt
            .query_map(params![user_id, format_date(since)], read_session)
            .map_err(|e| StoreError::read("userPrayerSessions", e))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::read("userPrayerSessions", e))
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn read_streak(row: &Row<'_>) -> Result<StreakData, rusqlite::Error> {
    let last: Option<String> = row.get(4)?;
    let history: String = row.get(5)?;
    Ok(StreakData {
        id: row.get(0)?,
        user_id: row.get(1)?,
        current_streak: row.get(2)?,
        longest_streak: row.get(3)?,
        last_prayer_date: last.and_then(|s| s.parse().ok()),
        streak_history: serde_json::from_str(&history).unwrap_or_default(),
        created_at: read_rfc3339(row, 6)?,
        updated_at: read_rfc3339(row, 7)?,
    })
}

fn read_session(row: &Row<'_>) -> Result<PrayerSessionData, rusqlite::Error> {
    let date: String = row.get(2)?;
    Ok(PrayerSessionData {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: date.parse().map_err(|_| invalid_column(2))?,
        prayer_count: row.get(3)?,
        completed: row.get::<_, i64>(4)? != 0,
        created_at: read_rfc3339(row, 5)?,
        updated_at: read_rfc3339(row, 6)?,
    })
}

fn read_rfc3339(row: &Row<'_>, idx: usize) -> Result<DateTime<Utc>, rusqlite::Error> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| invalid_column(idx))
}

fn read_timestamp(row: &Row<'_>, idx: usize) -> Result<Option<DateTime<Utc>>, rusqlite::Error> {
    let raw: Option<String> = row.get(idx)?;
    Ok(raw
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|t| t.with_timezone(&Utc)))
}

fn invalid_column(idx: usize) -> rusqlite::Error {
    rusqlite::Error::InvalidColumnType(idx, "text".to_string(), rusqlite::types::Type::Text)
}

/// Starter prayer formulas bundled with the app.
fn default_formulas() -> Vec<PrayerFormula> {
    let entries = [
        (
            "اللَّهُمَّ اغْفِرْ لَهُ وَارْحَمْهُ وَعَافِهِ وَاعْفُ عَنْهُ",
            "Allahumma ighfir lahu warhamhu wa 'afihi wa'fu 'anhu",
            "Ô Allah, pardonne-lui, fais-lui miséricorde, accorde-lui le salut et pardonne-lui",
        ),
        (
            "اللَّهُمَّ أَكْرِمْ نُزُلَهُ وَوَسِّعْ مُدْخَلَهُ",
            "Allahumma akrim nuzulahu wa wassi' mudkhalahu",
            "Ô Allah, honore sa demeure et élargis son entrée",
        ),
        (
            "اللَّهُمَّ أَدْخِلْهُ الْجَنَّةَ وَأَعِذْهُ مِنْ عَذَابِ الْقَبْرِ",
            "Allahumma adkhilhul-jannata wa a'idhhu min 'adhabil-qabri",
            "Ô Allah, fais-le entrer au Paradis et protège-le du châtiment de la tombe",
        ),
    ];
    entries
        .iter()
        .map(|(arabic, transliteration, translation)| PrayerFormula {
            id: None,
            arabic: arabic.to_string(),
            transliteration: transliteration.to_string(),
            translation: translation.to_string(),
            order: None,
            created_at: None,
        })
        .collect()
}

/// Starter verses bundled with the app.
fn default_verses() -> Vec<Verse> {
    let entries = [
        (
            "وَبَشِّرِ الصَّابِرِينَ",
            "Wa bashshiri as-sabirin",
            "Et annonce la bonne nouvelle aux endurants",
            "Coran 2:155",
        ),
        (
            "إِنَّا لِلَّهِ وَإِنَّا إِلَيْهِ رَاجِعُونَ",
            "Inna lillahi wa inna ilayhi raji'un",
            "Certes nous sommes à Allah, et c'est à Lui que nous retournerons",
            "Coran 2:156",
        ),
    ];
    entries
        .iter()
        .map(|(arabic, transliteration, translation, reference)| Verse {
            id: None,
            arabic: arabic.to_string(),
            transliteration: transliteration.to_string(),
            translation: translation.to_string(),
            reference: reference.to_string(),
            order: None,
            created_at: None,
        })
        .collect()
}

/// Starter hadiths bundled with the app.
fn default_hadiths() -> Vec<Hadith> {
    let entries = [
        (
            "Les actes ne valent que par leurs intentions",
            "Bukhari et Muslim",
            "إِنَّمَا الأَعْمَالُ بِالنِّيَّاتِ",
        ),
        (
            "Invoquez Allah pour vos morts, car votre invocation les atteint",
            "Muslim",
            "ادْعُوا لِمَوْتَاكُمْ",
        ),
    ];
    entries
        .iter()
        .map(|(text, source, arabic)| Hadith {
            id: None,
            text: text.to_string(),
            source: source.to_string(),
            arabic: arabic.to_string(),
            order: None,
            created_at: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_session_upsert_bumps_count() {
        let db = Database::open_memory().unwrap();
        let first = db.upsert_session("alice", date("2025-03-10")).await.unwrap();
        assert_eq!(first.prayer_count, 1);
        assert!(first.completed);

        let second = db.upsert_session("alice", date("2025-03-10")).await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.prayer_count, 2);
    }

    #[tokio::test]
    async fn test_streak_round_trip() {
        let db = Database::open_memory().unwrap();
        let mut streak = StreakData::new("alice", date("2025-03-10"));
        let id = db.insert_streak(&streak).await.unwrap();
        streak.id = Some(id);

        streak.current_streak = 4;
        streak.longest_streak = 9;
        streak.last_prayer_date = Some(date("2025-03-10"));
        db.update_streak(&streak).await.unwrap();

        let loaded = db.find_streak("alice").await.unwrap().unwrap();
        assert_eq!(loaded.current_streak, 4);
        assert_eq!(loaded.longest_streak, 9);
        assert_eq!(loaded.last_prayer_date, Some(date("2025-03-10")));
        assert_eq!(loaded.streak_history.len(), streak.streak_history.len());
    }

    #[tokio::test]
    async fn test_update_unknown_streak_fails() {
        let db = Database::open_memory().unwrap();
        let mut streak = StreakData::new("alice", date("2025-03-10"));
        streak.id = Some("missing".to_string());
        let err = db.update_streak(&streak).await.unwrap_err();
        assert!(matches!(err, StoreError::WriteFailed { .. }));
    }

    #[tokio::test]
    async fn test_sessions_since_filters_by_user_and_date() {
        let db = Database::open_memory().unwrap();
        db.upsert_session("alice", date("2025-02-27")).await.unwrap();
        db.upsert_session("alice", date("2025-03-02")).await.unwrap();
        db.upsert_session("bob", date("2025-03-02")).await.unwrap();

        let sessions = db.sessions_since("alice", date("2025-03-01")).await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].date, date("2025-03-02"));
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = Database::open_memory().unwrap();
        let first = db.seed_default_content().unwrap();
        assert!(first > 0);
        assert_eq!(db.seed_default_content().unwrap(), 0);

        let formulas = db.prayer_formulas().await.unwrap();
        assert_eq!(formulas[0].order, Some(1));
    }
}
