//! Static fallback message bank.
//!
//! Used when content resolution returns nothing, so a schedule is
//! never left partially empty because of a content-store hiccup. One
//! pre-written message per feed is chosen at random per call.

use rand::seq::SliceRandom;

use crate::content::Feed;

/// Pre-written reminder bodies for `feed`.
pub fn bank(feed: Feed) -> &'static [&'static str] {
    match feed {
        Feed::Mixed => &[
            "Il est temps de vous connecter avec votre spiritualité.",
            "Prenez un moment pour la prière et la réflexion.",
            "Votre moment de paix spirituelle vous attend.",
        ],
        Feed::Formula => &[
            "Retournez aux fondements de votre foi.",
            "Cultivez les bases de votre spiritualité.",
            "Un moment pour revenir à l'essentiel.",
        ],
        Feed::Verse => &[
            "Trouvez la paix intérieure par la prière.",
            "Accordez-vous un moment de sérénité mentale.",
            "Laissez la tranquillité envahir votre esprit.",
        ],
        Feed::Hadith => &[
            "Allumez le feu de votre spiritualité !",
            "Démarrez avec énergie et détermination.",
            "Votre flamme spirituelle brille en vous.",
        ],
    }
}

/// One fallback body for `feed`, chosen uniformly at random.
pub fn fallback_body(feed: Feed) -> String {
    bank(feed)
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("Prenez un moment pour la prière.")
        .to_string()
}
