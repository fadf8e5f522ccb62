use anyhow::{Context, Result};

use gamelog_core::model::PlatformId;
use gamelog_tracker::Tracker;

pub fn list(tracker: &Tracker) {
    println!("\nPlatforms ({})\n", tracker.platforms().len());
    for platform in tracker.platforms() {
        println!(
            "  {:>3}  {:<24} {:<10} {}",
            platform.order, platform.id, platform.color, platform.name
        );
    }
}

/// Append a platform, then apply any name or color given.
pub fn add(tracker: &mut Tracker, name: Option<String>, color: Option<String>) -> Result<()> {
    let mut platform = tracker.add_platform()?;

    if name.is_some() || color.is_some() {
        let name = name.unwrap_or_else(|| platform.name.clone());
        let color = color.unwrap_or_else(|| platform.color.clone());
        platform = tracker.edit_platform(&platform.id, &name, &color)?;
    }

    println!("✓ Added platform {} ({})", platform.name, platform.id);
    Ok(())
}

pub fn edit(tracker: &mut Tracker, id: &str, name: Option<String>, color: Option<String>) -> Result<()> {
    let id = PlatformId::from(id);
    let current = tracker
        .platform(&id)
        .with_context(|| format!("No platform with id {}", id))?;
    let name = name.unwrap_or_else(|| current.name.clone());
    let color = color.unwrap_or_else(|| current.color.clone());

    let platform = tracker.edit_platform(&id, &name, &color)?;
    println!("✓ Updated platform {} ({}, {})", platform.id, platform.name, platform.color);
    Ok(())
}

pub fn delete(tracker: &mut Tracker, id: &str) -> Result<()> {
    let removed = tracker.delete_platform(&PlatformId::from(id))?;
    println!("✓ Deleted platform {} ({})", removed.name, removed.id);
    println!("  Games labelled {:?} keep their label.", removed.name);
    Ok(())
}

pub fn reorder(tracker: &mut Tracker, ids: &[String]) -> Result<()> {
    let ids: Vec<PlatformId> = ids.iter().map(|id| PlatformId::from(id.as_str())).collect();
    tracker
        .reorder_platforms(&ids)
        .context("Reorder rejected; run `gamelog platform list` for the current ids")?;
    println!("✓ Platform order saved");
    list(tracker);
    Ok(())
}
