use clap::Subcommand;
use rappel_core::content::{ContentProvider, Feed};
use rappel_core::notify::messages;
use rappel_core::storage::Database;

#[derive(Subcommand)]
pub enum ContentAction {
    /// Print a random content body for a feed
    Random {
        /// Feed label (e.g. "Feed actuel", "Paix mentale")
        #[arg(long, default_value = "Feed actuel")]
        feed: String,
    },
    /// Seed the starter content collections
    Seed,
}

pub async fn run(action: ContentAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        ContentAction::Random { feed } => {
            let feed = Feed::from_label(&feed);
            let provider = ContentProvider::new(db);
            let body = match provider.resolve_body(feed).await {
                Some(body) => body,
                None => messages::fallback_body(feed),
            };
            println!("{body}");
        }
        ContentAction::Seed => {
            let inserted = db.seed_default_content()?;
            println!("seeded {inserted} documents");
        }
    }
    Ok(())
}
