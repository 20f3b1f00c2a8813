//! Text rendering of controller state
//!
//! Shared by the interactive shell and the one-shot subcommands.

use chrono::{DateTime, Local, Utc};
use colored::Colorize;

use crate::app::{App, Mode};
use crate::closet::ClosetManager;
use crate::domain::{GarmentItem, Outfit, SavedOutfit};
use crate::recommend::RecommendationClient;

/// Local calendar date, e.g. `10/17/2026`
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%-m/%-d/%Y").to_string()
}

/// Score with three decimals, or a dash for items without one
pub fn format_score(item: &GarmentItem) -> String {
    item.score.map(|s| format!("{:.3}", s)).unwrap_or_else(|| "-".to_string())
}

/// Title bar with the active view and closet size
pub fn header(app: &App) -> String {
    let (generate, closet) = match app.mode() {
        Mode::Generate => ("Create".bright_cyan().bold(), "My Closet".normal()),
        Mode::Closet => ("Create".normal(), "My Closet".bright_cyan().bold()),
    };
    format!(
        "{}  {}  {} ({})",
        "FASHION LABS".bold(),
        generate,
        closet,
        app.closet_count()
    )
}

/// Current preferences line
pub fn preferences_line(app: &App) -> String {
    let session = app.session();
    let mut line = format!("Preferences: {}", session.preferences().to_string().cyan());
    if let Some(style) = session.style() {
        line.push_str(&format!("  style: {}", style.cyan()));
    }
    line
}

/// One line per slot
pub fn outfit_lines(outfit: &Outfit, client: &dyn RecommendationClient, loading_slot: Option<&str>) -> Vec<String> {
    outfit
        .iter()
        .map(|(slot, item)| {
            let status = if loading_slot == Some(slot) {
                format!("  {}", "Loading...".yellow())
            } else {
                String::new()
            };
            format!(
                "  {:10} {}  {}{}",
                slot.bright_green(),
                item.image,
                client.image_url(&item.image).dimmed(),
                status
            )
        })
        .collect()
}

/// Numbered alternatives for `slot`, in service order
pub fn alternatives_lines(slot: &str, alternatives: &[GarmentItem], client: &dyn RecommendationClient) -> Vec<String> {
    let mut lines = vec![format!("Alternatives for {}", slot.bright_green())];
    for (i, item) in alternatives.iter().enumerate() {
        lines.push(format!(
            "  {:>2}. {}  Score: {}  {}",
            i + 1,
            item.image,
            format_score(item),
            client.image_url(&item.image).dimmed()
        ));
    }
    lines
}

/// Card for one saved outfit
pub fn saved_outfit_lines(saved: &SavedOutfit, editing: bool) -> Vec<String> {
    let name = if editing {
        format!("{} {}", saved.display_name().yellow(), "(renaming)".dimmed())
    } else {
        saved.display_name().bold().to_string()
    };

    let mut lines = vec![
        format!("{}  {}", saved.id.to_string().dimmed(), name),
        format!("    {}", saved.context),
        format!("    {}", format_date(&saved.saved_at).dimmed()),
    ];
    for (slot, item) in saved.outfit.iter() {
        lines.push(format!("    {:10} {}", slot.bright_green(), item.image));
    }
    lines
}

/// The whole closet, or the empty-state message
pub fn closet_lines(closet: &ClosetManager) -> Vec<String> {
    if closet.is_empty() {
        return vec![
            "Your closet is empty".bold().to_string(),
            "Generate and save outfits to build your digital wardrobe".dimmed().to_string(),
        ];
    }

    let editing = closet.editing_id();
    let mut lines = Vec::new();
    for saved in closet.outfits() {
        lines.extend(saved_outfit_lines(saved, editing == Some(saved.id)));
        lines.push(String::new());
    }
    lines
}

/// Everything the active view shows
pub fn view_lines(app: &App) -> Vec<String> {
    let mut lines = vec![header(app), String::new()];

    match app.mode() {
        Mode::Generate => {
            lines.push(preferences_line(app));
            let session = app.session();
            if session.is_generating() {
                lines.push("Generating...".yellow().to_string());
            }
            if let Some(outfit) = session.outfit() {
                lines.push(String::new());
                lines.push("Your Outfit".bold().to_string());
                lines.extend(outfit_lines(outfit, app.client().as_ref(), session.loading_slot()));
            }
            if let Some(slot) = session.active_slot()
                && !session.alternatives().is_empty()
            {
                lines.push(String::new());
                lines.extend(alternatives_lines(slot, session.alternatives(), app.client().as_ref()));
            }
        }
        Mode::Closet => {
            lines.push("My Digital Closet".bold().to_string());
            lines.push(String::new());
            lines.extend(closet_lines(app.closet()));
        }
    }

    lines
}
