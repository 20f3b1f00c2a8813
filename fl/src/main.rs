//! FashionLabs - outfit generator with a digital closet
//!
//! CLI entry point: interactive shell by default, one-shot subcommands for
//! scripting.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

use fashionlabs::app::{App, Outcome, open_closet};
use fashionlabs::cli::{Cli, ClosetCommand, Command, OutputFormat, get_log_path};
use fashionlabs::config::Config;
use fashionlabs::domain::{Gender, Occasion, OutfitId, Season};
use fashionlabs::recommend::{HttpRecommendationClient, RecommendationClient};
use fashionlabs::repl::{self, render};

type LogFilterHandle = reload::Handle<EnvFilter, Registry>;

fn level_filter(level: &str) -> Result<EnvFilter> {
    let level: tracing::Level = level
        .parse()
        .map_err(|_| eyre::eyre!("Invalid log level: {}", level))?;
    Ok(EnvFilter::from_default_env().add_directive(level.into()))
}

fn setup_logging(level: &str) -> Result<LogFilterHandle> {
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Write to log file, not stdout/stderr; the shell owns the terminal
    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;
    let (filter, handle) = reload::Layer::new(level_filter(level)?);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(log_file).with_ansi(false))
        .init();

    info!("Logging initialized (level: {})", level);
    Ok(handle)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging first so config fallbacks are recorded; the config file's
    // level is applied once it is known
    let handle = setup_logging(cli.log_level.as_deref().unwrap_or("info")).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    if cli.log_level.is_none()
        && let Some(level) = &config.log_level
    {
        handle
            .reload(level_filter(level)?)
            .map_err(|e| eyre::eyre!("Failed to apply log level {}: {}", level, e))?;
        info!("Log level set from config: {}", level);
    }

    info!(
        "FashionLabs loaded config: base_url={}, store={}",
        config.service.base_url,
        config.storage.store_dir.display()
    );

    match cli.command {
        None | Some(Command::Shell) => repl::run_interactive(&config).await,
        Some(Command::Generate {
            gender,
            season,
            occasion,
            style,
            save,
            format,
        }) => cmd_generate(&config, gender, season, occasion, style, save, format).await,
        Some(Command::Closet { command }) => match command {
            ClosetCommand::List { format } => cmd_closet_list(&config, format),
            ClosetCommand::Show { id, format } => cmd_closet_show(&config, id, format),
            ClosetCommand::Rename { id, name } => cmd_closet_rename(&config, id, &name),
            ClosetCommand::Delete { id } => cmd_closet_delete(&config, id),
        },
        Some(Command::Image { image, output }) => cmd_image(&config, &image, output).await,
    }
}

/// Generate one outfit, print it and optionally save it
async fn cmd_generate(
    config: &Config,
    gender: Option<Gender>,
    season: Option<Season>,
    occasion: Option<Occasion>,
    style: Option<String>,
    save: Option<Option<String>>,
    format: OutputFormat,
) -> Result<()> {
    let mut app = App::from_config(config)?;

    let mut prefs = config.defaults.preferences();
    if let Some(g) = gender {
        prefs.gender = g;
    }
    if let Some(s) = season {
        prefs.season = s;
    }
    if let Some(o) = occasion {
        prefs.occasion = o;
    }
    app.set_preferences(prefs);
    app.set_style(style);

    match app.generate().await {
        Outcome::Updated => {}
        Outcome::Notice(notice) => return Err(eyre::eyre!("{}", notice)),
        other => return Err(eyre::eyre!("Generation did not complete: {:?}", other)),
    }

    let saved_id = match save {
        Some(name) => {
            app.request_save()?;
            Some(app.confirm_save(name.as_deref().unwrap_or(""))?)
        }
        None => None,
    };

    let outfit = app
        .session()
        .outfit()
        .ok_or_else(|| eyre::eyre!("No outfit could be generated"))?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "preferences": prefs,
                "style": app.session().style(),
                "outfit": outfit,
                "saved_id": saved_id,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            println!("{}", render::preferences_line(&app));
            for line in render::outfit_lines(outfit, app.client().as_ref(), None) {
                println!("{}", line);
            }
            if let Some(id) = saved_id
                && let Some(saved) = app.closet().get(id)
            {
                println!();
                println!("{} Saved to closet: {} ({})", "✓".green(), saved.display_name().cyan(), id);
            }
        }
    }

    Ok(())
}

fn cmd_closet_list(config: &Config, format: OutputFormat) -> Result<()> {
    let closet = open_closet(&config.storage)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(closet.outfits())?),
        OutputFormat::Text => {
            for line in render::closet_lines(&closet) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn cmd_closet_show(config: &Config, id: OutfitId, format: OutputFormat) -> Result<()> {
    let closet = open_closet(&config.storage)?;
    let saved = closet
        .get(id)
        .ok_or_else(|| eyre::eyre!("No saved outfit with id {}", id))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(saved)?),
        OutputFormat::Text => {
            for line in render::saved_outfit_lines(saved, false) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn cmd_closet_rename(config: &Config, id: OutfitId, name: &str) -> Result<()> {
    let mut closet = open_closet(&config.storage)?;
    closet.rename(id, name)?;
    println!("{} Renamed {}", "✓".green(), id);
    Ok(())
}

fn cmd_closet_delete(config: &Config, id: OutfitId) -> Result<()> {
    let mut closet = open_closet(&config.storage)?;
    if closet.delete(id)? {
        println!("{} Deleted {}", "✓".green(), id);
    } else {
        println!("No saved outfit with id {}", id);
    }
    Ok(())
}

/// Download an item image to disk
async fn cmd_image(config: &Config, image: &str, output: Option<PathBuf>) -> Result<()> {
    let client = HttpRecommendationClient::from_config(&config.service)?;
    let bytes = client
        .fetch_image(image)
        .await
        .context(format!("Failed to fetch {}", client.image_url(image)))?;

    let output = output.unwrap_or_else(|| {
        Path::new(image)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("image"))
    });
    fs::write(&output, &bytes).context(format!("Failed to write {}", output.display()))?;

    println!("{} {} ({} bytes)", "✓".green(), output.display(), bytes.len());
    Ok(())
}
