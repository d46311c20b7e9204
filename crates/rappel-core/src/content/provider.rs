//! Random content resolution over a [`ContentStore`].
//!
//! Each draw fetches the full collection and samples one element
//! uniformly, so the selection space always equals the collection at
//! call time. That re-fetch is a real per-call cost inherited from the
//! backing store's query model; it lives behind this provider so a
//! count-plus-offset single-document read can replace it later without
//! touching the scheduler.

use rand::seq::SliceRandom;
use rand::Rng;

use super::{Feed, Hadith, PrayerFormula, Verse};
use crate::error::StoreError;
use crate::storage::ContentStore;

/// Resolves reminder bodies from the content collections.
///
/// Degrades gracefully: a failed fetch or an empty collection yields
/// `None`, never an error, and the scheduler substitutes a static
/// fallback message instead.
pub struct ContentProvider<S> {
    store: S,
}

impl<S: ContentStore> ContentProvider<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Draw one prayer formula uniformly at random.
    pub async fn random_formula(&self) -> Result<Option<PrayerFormula>, StoreError> {
        let all = self.store.prayer_formulas().await?;
        Ok(pick(&all))
    }

    /// Draw one verse uniformly at random.
    pub async fn random_verse(&self) -> Result<Option<Verse>, StoreError> {
        let all = self.store.verses().await?;
        Ok(pick(&all))
    }

    /// Draw one hadith uniformly at random.
    pub async fn random_hadith(&self) -> Result<Option<Hadith>, StoreError> {
        let all = self.store.hadiths().await?;
        Ok(pick(&all))
    }

    /// Resolve a formatted reminder body for `feed`.
    ///
    /// `Mixed` picks one of the three families uniformly first. Returns
    /// `None` when the store is unreachable or the chosen collection is
    /// empty; the caller falls back to the static message bank.
    pub async fn resolve_body(&self, feed: Feed) -> Option<String> {
        let family = match feed {
            Feed::Mixed => {
                let families = [Feed::Formula, Feed::Verse, Feed::Hadith];
                families[rand::thread_rng().gen_range(0..families.len())]
            }
            other => other,
        };

        let resolved = match family {
            Feed::Formula => self
                .random_formula()
                .await
                .map(|f| f.map(format_formula)),
            Feed::Verse => self.random_verse().await.map(|v| v.map(format_verse)),
            Feed::Hadith => self.random_hadith().await.map(|h| h.map(format_hadith)),
            Feed::Mixed => unreachable!("mixed resolves to a concrete family above"),
        };

        match resolved {
            Ok(Some(body)) => Some(body),
            Ok(None) => {
                tracing::warn!(family = family.description(), "content collection is empty");
                None
            }
            Err(err) => {
                tracing::warn!(family = family.description(), %err, "content fetch failed");
                None
            }
        }
    }
}

fn pick<T: Clone>(items: &[T]) -> Option<T> {
    items.choose(&mut rand::thread_rng()).cloned()
}

fn format_formula(f: PrayerFormula) -> String {
    format!("{}\n{} ({})", f.arabic, f.translation, f.transliteration)
}

fn format_verse(v: Verse) -> String {
    format!("{}\n{} [{}]", v.arabic, v.translation, v.reference)
}

fn format_hadith(h: Hadith) -> String {
    format!("{} ({})", h.text, h.source)
}
