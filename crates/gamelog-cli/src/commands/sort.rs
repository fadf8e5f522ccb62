use anyhow::Result;

use gamelog_core::model::{SortKey, SortOrder, SortPreference};
use gamelog_tracker::Tracker;

/// Print the sort preference, or change it when a key or order is given.
pub fn run(tracker: &mut Tracker, by: Option<String>, order: Option<String>) -> Result<()> {
    let current = tracker.sort_preference();

    if by.is_none() && order.is_none() {
        println!("Sorted by {} ({})", current.sort_by, current.sort_order);
        return Ok(());
    }

    let sort_by = match by {
        Some(value) => value.parse::<SortKey>()?,
        None => current.sort_by,
    };
    let sort_order = match order {
        Some(value) => value.parse::<SortOrder>()?,
        None => current.sort_order,
    };

    tracker.set_sort_preference(SortPreference::new(sort_by, sort_order))?;
    println!("✓ Sorting by {} ({})", sort_by, sort_order);
    Ok(())
}
