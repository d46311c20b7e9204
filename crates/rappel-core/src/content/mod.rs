//! Content model: prayer formulas, verses and hadiths.
//!
//! The three content families are seeded once by a migration and are
//! read-only from this crate's perspective. Each document carries an
//! `order` used for stable enumeration; identity is the store-assigned
//! document id.

mod provider;

pub use provider::ContentProvider;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short prayer formula with transliteration and translation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrayerFormula {
    pub id: Option<String>,
    pub arabic: String,
    pub transliteration: String,
    pub translation: String,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A verse with its source reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verse {
    pub id: Option<String>,
    pub arabic: String,
    pub transliteration: String,
    pub translation: String,
    pub reference: String,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A hadith: narrated text plus its source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hadith {
    pub id: Option<String>,
    pub text: String,
    pub source: String,
    pub arabic: String,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Content family a reminder feed routes to.
///
/// The user-facing feed is a display label ("Feed actuel", "Mental
/// Peace", ...); routing works on this closed enum so display strings
/// and selection logic stay decoupled. `Mixed` draws uniformly among
/// the three families on every resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feed {
    Mixed,
    Formula,
    Verse,
    Hadith,
}

impl Feed {
    /// Translate a user-facing feed label (French or English) to its
    /// content family. Unknown labels route to `Mixed`, the app's
    /// default feed.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Feed actuel" | "Current feed" => Feed::Mixed,
            "Les bases" | "The basics" => Feed::Formula,
            "Paix mentale" | "Mental Peace" => Feed::Verse,
            "Feu matinal" | "Morning Fire" => Feed::Hadith,
            _ => Feed::Mixed,
        }
    }

    /// Human-readable family name.
    pub fn description(&self) -> &'static str {
        match self {
            Feed::Mixed => "mixed",
            Feed::Formula => "prayer formula",
            Feed::Verse => "verse",
            Feed::Hadith => "hadith",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_label_routing_bilingual() {
        assert_eq!(Feed::from_label("Feed actuel"), Feed::Mixed);
        assert_eq!(Feed::from_label("Current feed"), Feed::Mixed);
        assert_eq!(Feed::from_label("Les bases"), Feed::Formula);
        assert_eq!(Feed::from_label("The basics"), Feed::Formula);
        assert_eq!(Feed::from_label("Paix mentale"), Feed::Verse);
        assert_eq!(Feed::from_label("Mental Peace"), Feed::Verse);
        assert_eq!(Feed::from_label("Feu matinal"), Feed::Hadith);
        assert_eq!(Feed::from_label("Morning Fire"), Feed::Hadith);
    }

    #[test]
    fn test_unknown_label_falls_back_to_mixed() {
        assert_eq!(Feed::from_label("My favorites"), Feed::Mixed);
        assert_eq!(Feed::from_label(""), Feed::Mixed);
    }
}
