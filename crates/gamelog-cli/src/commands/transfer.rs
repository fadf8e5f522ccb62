use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use gamelog_tracker::{export_file_name, Tracker};

pub fn export(tracker: &Tracker, path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(|| default_export_path(Utc::now()));

    let snapshot = tracker.export_snapshot()?;
    let json = snapshot.to_json()?;
    std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "✓ Exported {} games and {} platforms to {}",
        snapshot.games.len(),
        snapshot.platforms.len(),
        path.display()
    );
    Ok(())
}

pub fn import(tracker: &mut Tracker, path: &Path) -> Result<()> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let summary = tracker
        .import_snapshot(&json)
        .with_context(|| format!("Nothing was imported from {}", path.display()))?;

    println!("✓ Imported {}", path.display());
    match summary.games {
        Some(count) => println!("  Games:     {}", count),
        None => println!("  Games:     unchanged (not in file)"),
    }
    match summary.platforms {
        Some(count) => println!("  Platforms: {}", count),
        None => println!("  Platforms: unchanged (not in file)"),
    }
    if summary.covers_extracted > 0 {
        println!("  Covers moved into the image store: {}", summary.covers_extracted);
    }
    Ok(())
}

/// Export files are named after the UTC date of the export.
fn default_export_path(now: DateTime<Utc>) -> PathBuf {
    PathBuf::from(export_file_name(now.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn test_default_export_path_uses_utc_date() {
        // 01:30 on the 2nd in UTC+9 is still the 1st in UTC.
        let local = FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 2, 1, 30, 0)
            .unwrap();

        assert_eq!(
            default_export_path(local.with_timezone(&Utc)),
            PathBuf::from("game-tracker-data-2024-03-01.json")
        );
    }
}
