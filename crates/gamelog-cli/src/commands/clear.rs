use anyhow::Result;

use gamelog_tracker::Tracker;

pub fn run(tracker: &mut Tracker, confirmed: bool) -> Result<()> {
    if !confirmed {
        anyhow::bail!(
            "This deletes every game and cover and restores the default platforms.\n\
             Export a backup first, then re-run with --yes."
        );
    }

    let games = tracker.games().len();
    tracker.clear_all_data()?;
    println!("✓ Deleted {} games and all covers", games);
    println!("  Platforms reset to the {} defaults", tracker.platforms().len());
    Ok(())
}
