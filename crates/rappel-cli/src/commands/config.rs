use clap::Subcommand;
use rappel_core::storage::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the current configuration
    Show,
    /// Write the default configuration file
    Init,
    /// Set a config value
    Set {
        /// Config key (e.g. "daily_count", "start_time")
        key: String,
        /// New value
        value: String,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Init => {
            let config = Config::default();
            config.save()?;
            println!("config reset to defaults");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            let n = &mut config.notifications;
            match key.as_str() {
                "enable_reminders" => n.enable_reminders = value.parse()?,
                "sound" => n.sound = value.parse()?,
                "morning_reminder" => n.morning_reminder = value.parse()?,
                "evening_reminder" => n.evening_reminder = value.parse()?,
                "enable_deceased_reminder" => n.enable_deceased_reminder = value.parse()?,
                "daily_count" => n.daily_count = value.parse()?,
                "start_time" => n.start_time = value,
                "end_time" => n.end_time = value,
                "selected_feed" => n.selected_feed = value,
                "selected_days" => {
                    let days: Vec<bool> = value
                        .split(',')
                        .map(|d| d.trim().parse())
                        .collect::<Result<_, _>>()?;
                    n.selected_days = days
                        .try_into()
                        .map_err(|_| "expected 7 comma-separated booleans (Sunday first)")?;
                }
                "user_id" => config.user.id = Some(value),
                _ => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
            config.notifications.validate()?;
            config.save()?;
            println!("ok");
        }
    }
    Ok(())
}
