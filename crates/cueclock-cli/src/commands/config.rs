use clap::Subcommand;
use cueclock_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value by dotted key
    Get { key: String },
    /// Set a value by dotted key and save
    Set { key: String, value: String },
    /// Print the whole config as JSON
    List,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load_or_default();
            match config.get(&key) {
                Some(value) => {
                    println!("{value}");
                    Ok(())
                }
                None => Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_or_default();
            config.set(&key, &value)?;
            config.save()?;
            Ok(())
        }
        ConfigAction::List => {
            let config = Config::load_or_default();
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}
