use anyhow::Result;

use gamelog_tracker::{config, Config, Tracker};

pub fn show_status(tracker: &Tracker, config: &Config) -> Result<()> {
    let db = tracker.database();
    let games = tracker.games();
    let completed = games.iter().filter(|g| g.completion_date.is_some()).count();
    let sort = tracker.sort_preference();

    println!("\n📊 Gamelog Status\n");
    println!("  Database: {}", db.location());
    println!(
        "  Schema version: {}",
        db.schema_version()?
            .map(|v| v.to_string())
            .unwrap_or_else(|| "<none>".to_string())
    );
    println!("  Games: {} ({} completed)", games.len(), completed);
    println!("  Stored covers: {}", db.image_count()?);
    println!("  Platforms: {}", tracker.platforms().len());
    println!("  Sort: {} ({})", sort.sort_by, sort.sort_order);
    println!("  Cover size limit: {} px", config.cover_max_dimension);
    println!("  Config file: {}", config::config_file_path().display());

    if games.is_empty() {
        println!("\n  Run `gamelog add <NAME>` or `gamelog import <FILE>` to get started");
    }

    Ok(())
}
