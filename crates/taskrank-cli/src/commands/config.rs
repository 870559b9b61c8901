use std::path::Path;

use clap::Subcommand;
use taskrank_core::Config;

use super::load_config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "default_strategy", "strategies.mine.effort")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List {
        /// Print as TOML instead of JSON
        #[arg(long = "toml")]
        as_toml: bool,
    },
    /// Reset config to defaults
    Reset,
    /// Print the config file location
    Path,
}

pub fn run(action: ConfigAction, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let save = |config: &Config| -> Result<(), Box<dyn std::error::Error>> {
        match config_path {
            Some(p) => config.save_to(p)?,
            None => config.save()?,
        }
        Ok(())
    };

    match action {
        ConfigAction::Get { key } => {
            let config = load_config(config_path)?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = load_config(config_path)?;
            config.set(&key, &value)?;
            save(&config)?;
            println!("ok");
        }
        ConfigAction::List { as_toml } => {
            let config = load_config(config_path)?;
            if as_toml {
                print!("{}", toml::to_string_pretty(&config)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
        ConfigAction::Reset => {
            save(&Config::default())?;
            println!("config reset to defaults");
        }
        ConfigAction::Path => {
            let path = match config_path {
                Some(p) => p.to_path_buf(),
                None => Config::path()?,
            };
            println!("{}", path.display());
        }
    }
    Ok(())
}
