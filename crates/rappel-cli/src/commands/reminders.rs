use clap::Subcommand;
use rappel_core::content::ContentProvider;
use rappel_core::notify::{MemoryNotifier, ReminderScheduler};
use rappel_core::storage::{Config, Database};

#[derive(Subcommand)]
pub enum RemindersAction {
    /// Compute and print the schedule for the current config
    Preview,
    /// Schedule a test notification
    Test,
    /// Schedule a test deceased-prayer notification
    TestDeceased,
}

pub async fn run(action: RemindersAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    config.notifications.validate()?;

    let db = Database::open()?;
    db.seed_default_content()?;
    let scheduler = ReminderScheduler::new(MemoryNotifier::new(), ContentProvider::new(db));

    match action {
        RemindersAction::Preview => {
            scheduler.schedule_reminders(&config.notifications).await?;
            let scheduled = scheduler.scheduled_reminders().await?;
            println!("{}", serde_json::to_string_pretty(&scheduled)?);
        }
        RemindersAction::Test => {
            scheduler.send_test_notification().await?;
            let scheduled = scheduler.scheduled_reminders().await?;
            println!("{}", serde_json::to_string_pretty(&scheduled)?);
        }
        RemindersAction::TestDeceased => {
            scheduler.send_test_deceased_prayer_notification().await?;
            let scheduled = scheduler.scheduled_reminders().await?;
            println!("{}", serde_json::to_string_pretty(&scheduled)?);
        }
    }
    Ok(())
}
