use anyhow::{Context, Result};
use std::path::Path;

use gamelog_core::model::{CoverSource, Game, GameDraft, GameId, Score};
use gamelog_tracker::{data_uri, prepare_cover, Config, Tracker};

use crate::GameFields;

/// Options accepted by `gamelog edit`.
#[derive(Debug)]
pub struct Edit {
    pub name: Option<String>,
    pub fields: GameFields,
    pub clear_date: bool,
    pub clear_score: bool,
}

pub fn add(tracker: &mut Tracker, config: &Config, name: String, fields: GameFields) -> Result<()> {
    let cover = read_cover(config, fields.cover.as_deref())?;
    let draft = apply_fields(GameDraft::new(name), fields)?;

    let game = tracker.create_game(draft, cover.as_deref())?;
    println!("✓ Added {} (id {})", game.name, game.id);
    Ok(())
}

pub fn edit(tracker: &mut Tracker, config: &Config, id: i64, edit: Edit) -> Result<()> {
    let id = GameId::new(id);
    let game = find(tracker, id)?;

    let mut draft = GameDraft {
        name: edit.name.unwrap_or_else(|| game.name.clone()),
        original_name: game.original_name.clone(),
        platform: game.platform.clone(),
        completion_date: game.completion_date,
        score: game.score.clone(),
        comment: game.comment.clone(),
    };
    if edit.clear_date {
        draft.completion_date = None;
    }
    if edit.clear_score {
        draft.score = None;
    }

    let cover = read_cover(config, edit.fields.cover.as_deref())?;
    let draft = apply_fields(draft, edit.fields)?;

    let game = tracker.update_game(id, draft, cover.as_deref())?;
    println!("✓ Updated {} (id {})", game.name, game.id);
    Ok(())
}

pub fn delete(tracker: &mut Tracker, id: i64) -> Result<()> {
    let removed = tracker.delete_game(GameId::new(id))?;
    println!("✓ Deleted {} (id {})", removed.name, removed.id);
    Ok(())
}

pub fn list(tracker: &Tracker) {
    let view = tracker.library_view();

    if view.is_empty() {
        println!("No games yet. Add one with `gamelog add <NAME>`.");
        return;
    }

    for group in &view.years {
        println!("\n{} ({})", group.year, group.games.len());
        for game in &group.games {
            println!("  {}", summary_line(tracker, game));
        }
    }

    if !view.not_completed.is_empty() {
        println!("\nNot completed ({})", view.not_completed.len());
        for game in &view.not_completed {
            println!("  {}", summary_line(tracker, game));
        }
    }
}

pub fn show(tracker: &Tracker, id: i64) -> Result<()> {
    let game = find(tracker, GameId::new(id))?;

    println!("\n{}", game.name);
    println!("{}\n", "=".repeat(game.name.chars().count().max(3)));
    println!("  Id:             {}", game.id);
    println!("  Original name:  {}", game.original_name.as_deref().unwrap_or("-"));

    let platform = match (game.platform.as_deref(), tracker.platform_for(game)) {
        (Some(label), Some(platform)) => format!("{} ({}, {})", label, platform.name, platform.color),
        (Some(label), None) => format!("{} (unknown platform)", label),
        (None, _) => "-".to_string(),
    };
    println!("  Platform:       {}", platform);
    println!(
        "  Completed:      {}",
        game.completion_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "not yet".to_string())
    );
    println!("  Score:          {}", game.score.as_ref().map(format_score).unwrap_or_else(|| "-".to_string()));
    println!("  Comment:        {}", game.comment.as_deref().unwrap_or("-"));
    println!("  Added:          {}", game.added_at.format("%Y-%m-%d %H:%M"));

    let cover = match tracker.resolve_cover_source(game)? {
        CoverSource::Blob { id, data } => format!("{} ({} bytes)", id, data.len()),
        CoverSource::Inline(_) => "inline data (re-export and import to move it into the store)".to_string(),
        CoverSource::Placeholder => "none".to_string(),
    };
    println!("  Cover:          {}", cover);

    Ok(())
}

pub fn set_cover(tracker: &mut Tracker, config: &Config, id: i64, path: &Path) -> Result<()> {
    let data = prepare_file(config, path)?;
    let game = tracker.set_cover(GameId::new(id), &data)?;
    println!("✓ Cover set for {} ({} bytes)", game.name, data.len());
    Ok(())
}

pub fn remove_cover(tracker: &mut Tracker, id: i64) -> Result<()> {
    let game = tracker.remove_cover(GameId::new(id))?;
    println!("✓ Cover removed from {}", game.name);
    Ok(())
}

pub fn save_cover(tracker: &Tracker, id: i64, path: &Path) -> Result<()> {
    let game = find(tracker, GameId::new(id))?;

    let data = match tracker.resolve_cover_source(game)? {
        CoverSource::Blob { data, .. } => data,
        CoverSource::Inline(uri) => data_uri::decode(&uri)
            .with_context(|| format!("The inline cover of {} is not a data URI", game.name))?,
        CoverSource::Placeholder => anyhow::bail!("{} has no cover", game.name),
    };

    std::fs::write(path, &data).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("✓ Wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

fn find(tracker: &Tracker, id: GameId) -> Result<&Game> {
    tracker
        .game(id)
        .with_context(|| format!("No game with id {}", id))
}

/// Read and shrink a cover image, if one was given.
fn read_cover(config: &Config, path: Option<&Path>) -> Result<Option<Vec<u8>>> {
    path.map(|path| prepare_file(config, path)).transpose()
}

fn prepare_file(config: &Config, path: &Path) -> Result<Vec<u8>> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let prepared = prepare_cover(&bytes, config.cover_max_dimension)
        .with_context(|| format!("{} is not a usable image", path.display()))?;
    log::debug!(
        "Prepared cover from {}: {} -> {} bytes",
        path.display(),
        bytes.len(),
        prepared.len()
    );
    Ok(prepared)
}

fn apply_fields(mut draft: GameDraft, fields: GameFields) -> Result<GameDraft> {
    if let Some(original_name) = fields.original_name {
        draft.original_name = Some(original_name);
    }
    if let Some(platform) = fields.platform {
        draft.platform = Some(platform);
    }
    if let Some(date) = fields.completed {
        draft.completion_date = Some(date);
    }
    if let Some(rating) = fields.rating {
        draft.score = Some(Score::rating(rating)?);
    }
    if let Some(metacritic) = fields.metacritic {
        draft.score = Some(Score::Metacritic(metacritic));
    }
    if let Some(comment) = fields.comment {
        draft.comment = Some(comment);
    }
    Ok(draft)
}

fn format_score(score: &Score) -> String {
    match score {
        Score::Rating(rating) => format!("{}/10", rating),
        Score::Metacritic(value) => format!("Metacritic {}", value),
    }
}

fn summary_line(tracker: &Tracker, game: &Game) -> String {
    let mut parts = vec![format!("[{}] {}", game.id, game.name)];
    if let Some(original) = &game.original_name {
        parts.push(format!("/ {}", original));
    }
    if let Some(platform) = &game.platform {
        parts.push(format!(" <{} {}>", platform, tracker.platform_color(game)));
    }
    if let Some(date) = game.completion_date {
        parts.push(format!(" {}", date.format("%Y-%m-%d")));
    }
    if let Some(score) = &game.score {
        parts.push(format!(" {}", format_score(score)));
    }
    if let Some(comment) = &game.comment {
        parts.push(format!(" \"{}\"", comment));
    }
    parts.join(" ")
}
