use clap::Subcommand;
use rappel_core::storage::{Config, Database};
use rappel_core::streak::StreakService;

#[derive(Subcommand)]
pub enum StreakAction {
    /// Current streak
    Show {
        /// User identifier (defaults to the configured user id)
        #[arg(long)]
        user: Option<String>,
    },
    /// Record a prayer session for today
    Record {
        /// User identifier (defaults to the configured user id)
        #[arg(long)]
        user: Option<String>,
    },
    /// Month-to-date session stats
    Stats {
        /// User identifier (defaults to the configured user id)
        #[arg(long)]
        user: Option<String>,
    },
}

pub async fn run(action: StreakAction) -> Result<(), Box<dyn std::error::Error>> {
    let service = StreakService::new(Database::open()?);

    match action {
        StreakAction::Show { user } => {
            let streak = service.user_streak(&resolve_user(user)?).await?;
            println!("{}", serde_json::to_string_pretty(&streak)?);
        }
        StreakAction::Record { user } => {
            let outcome = service.record_prayer_session(&resolve_user(user)?).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        StreakAction::Stats { user } => {
            let stats = service.streak_stats(&resolve_user(user)?).await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}

fn resolve_user(user: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(user) = user {
        return Ok(user);
    }
    match Config::load()?.user.id {
        Some(id) => Ok(id),
        None => Err("no user id configured; pass --user or set user_id".into()),
    }
}
