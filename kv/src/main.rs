use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use kvstore::KvStore;
use kvstore::cli::{Cli, Command};
use kvstore::config::Config;

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let store_path = cli.store.unwrap_or(config.store_path);

    info!("kvstore starting at {}", store_path.display());
    let store = KvStore::open(&store_path)?;

    match cli.command {
        Command::List => {
            let keys = store.keys()?;
            if keys.is_empty() {
                println!("No keys found");
            } else {
                for key in keys {
                    println!("{}", key);
                }
            }
        }
        Command::Get { key } => match store.get(&key)? {
            Some(value) => println!("{}", value),
            None => {
                eprintln!("{} Key not found: {}", "✗".red(), key);
                std::process::exit(1);
            }
        },
        Command::Set { key, value } => {
            store.set(&key, &value)?;
            println!("{} Stored: {}", "✓".green(), key.cyan());
        }
        Command::Remove { key } => {
            if store.remove(&key)? {
                println!("{} Removed: {}", "✓".green(), key);
            } else {
                println!("Key not present: {}", key);
            }
        }
    }

    Ok(())
}
