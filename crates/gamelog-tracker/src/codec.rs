//! Portable JSON snapshot of the library.
//!
//! Exports are denormalized: blob covers are inlined as data URIs so the
//! file stands alone. Imports go the other way: inline covers are decoded
//! into blobs and the records keep only an image id.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use gamelog_core::model::{
    reindex, sort_platforms, Game, GameId, ImageId, Platform, PlatformId, Score, SortKey,
    SortOrder, SortPreference, DEFAULT_COLOR,
};
use gamelog_core::{Error, Result};

use crate::data_uri;

/// A game as written to an export file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotGame {
    pub id: i64,
    pub name: String,
    pub original_name: Option<String>,
    pub platform: Option<String>,
    pub completion_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metacritic_score: Option<String>,
    pub comment: Option<String>,
    /// Resolved cover as a data URI (or a legacy inline value).
    pub cover: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl SnapshotGame {
    #[must_use]
    pub fn new(game: &Game, cover: Option<String>) -> Self {
        Self {
            id: game.id.get(),
            name: game.name.clone(),
            original_name: game.original_name.clone(),
            platform: game.platform.clone(),
            completion_date: game.completion_date,
            rating: game.rating(),
            metacritic_score: game.metacritic_score().map(str::to_string),
            comment: game.comment.clone(),
            cover,
            added_at: game.added_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotPlatform {
    pub id: String,
    pub name: String,
    pub color: String,
    pub order: u32,
}

impl From<&Platform> for SnapshotPlatform {
    fn from(platform: &Platform) -> Self {
        Self {
            id: platform.id.to_string(),
            name: platform.name.clone(),
            color: platform.color.clone(),
            order: platform.order,
        }
    }
}

/// The export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub games: Vec<SnapshotGame>,
    pub platforms: Vec<SnapshotPlatform>,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    pub export_date: DateTime<Utc>,
}

impl Snapshot {
    /// Pretty-printed JSON, as written to disk.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// `game-tracker-data-<YYYY-MM-DD>.json`
#[must_use]
pub fn export_file_name(date: NaiveDate) -> String {
    format!("game-tracker-data-{}.json", date.format("%Y-%m-%d"))
}

/// Counts reported after a successful import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub games: Option<usize>,
    pub platforms: Option<usize>,
    /// Inline covers moved into the blob store.
    pub covers_extracted: usize,
}

// Import side: every field is optional or loosely typed so that files from
// older versions load; unknown fields (such as a platform `icon`) are ignored.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportDocument {
    games: Option<Vec<ImportGame>>,
    platforms: Option<Vec<ImportPlatform>>,
    sort_by: Option<String>,
    sort_order: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportGame {
    id: Option<i64>,
    name: String,
    original_name: Option<String>,
    platform: Option<String>,
    completion_date: Option<String>,
    rating: Option<i64>,
    metacritic_score: Option<serde_json::Value>,
    comment: Option<String>,
    image_id: Option<String>,
    cover: Option<String>,
    added_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ImportPlatform {
    id: String,
    name: String,
    color: Option<String>,
    order: Option<i64>,
}

/// An import document validated and converted to store records.
#[derive(Debug, Default)]
pub(crate) struct NormalizedImport {
    pub games: Option<Vec<Game>>,
    pub platforms: Option<Vec<Platform>>,
    pub images: Vec<(ImageId, Vec<u8>)>,
    pub sort: SortPreference,
}

/// Parse and normalize an import document. Nothing is written here; any
/// problem rejects the whole document.
pub(crate) fn normalize_import(
    json: &str,
    current_sort: SortPreference,
    now: DateTime<Utc>,
) -> Result<NormalizedImport> {
    let doc: ImportDocument =
        serde_json::from_str(json).map_err(|e| Error::MalformedImport(e.to_string()))?;

    let mut normalized = NormalizedImport {
        sort: merge_sort(current_sort, doc.sort_by.as_deref(), doc.sort_order.as_deref()),
        ..NormalizedImport::default()
    };

    if let Some(games) = doc.games {
        let (games, images) = normalize_games(games, now)?;
        normalized.games = Some(games);
        normalized.images = images;
    }
    if let Some(platforms) = doc.platforms {
        normalized.platforms = Some(normalize_platforms(platforms)?);
    }
    Ok(normalized)
}

fn merge_sort(current: SortPreference, sort_by: Option<&str>, sort_order: Option<&str>) -> SortPreference {
    let mut merged = current;
    if let Some(value) = sort_by {
        match value.parse() {
            Ok(key) => merged.sort_by = key,
            Err(_) => log::warn!("Ignoring unknown sortBy {:?} in import", value),
        }
    }
    if let Some(value) = sort_order {
        match value.parse() {
            Ok(order) => merged.sort_order = order,
            Err(_) => log::warn!("Ignoring unknown sortOrder {:?} in import", value),
        }
    }
    merged
}

fn normalize_games(
    games: Vec<ImportGame>,
    now: DateTime<Utc>,
) -> Result<(Vec<Game>, Vec<(ImageId, Vec<u8>)>)> {
    let mut seen = HashSet::new();
    for id in games.iter().filter_map(|g| g.id) {
        if !seen.insert(id) {
            return Err(Error::MalformedImport(format!("duplicate game id {id}")));
        }
    }
    let mut taken: Vec<GameId> = seen.into_iter().map(GameId::new).collect();

    let mut records = Vec::with_capacity(games.len());
    let mut images = Vec::new();

    for (index, raw) in games.into_iter().enumerate() {
        let id = match raw.id {
            Some(id) => GameId::new(id),
            None => {
                let id = GameId::mint(now.timestamp_millis(), taken.iter().copied());
                taken.push(id);
                id
            }
        };

        let name = raw.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::MalformedImport(format!("game #{index} has no name")));
        }

        let mut game = Game {
            id,
            name,
            original_name: non_empty(raw.original_name),
            platform: non_empty(raw.platform),
            completion_date: parse_completion_date(non_empty(raw.completion_date), index)?,
            score: parse_score(raw.rating, raw.metacritic_score, index)?,
            comment: non_empty(raw.comment),
            image_id: non_empty(raw.image_id).map(ImageId::from),
            cover: non_empty(raw.cover),
            added_at: raw.added_at.unwrap_or(now),
        };

        if game.image_id.is_none() {
            if let Some(cover) = &game.cover {
                match data_uri::decode(cover) {
                    Some(data) => {
                        let image_id = ImageId::for_game(game.id);
                        log::debug!("Extracting inline cover of game {} into {}", game.id, image_id);
                        images.push((image_id.clone(), data));
                        game.image_id = Some(image_id);
                        game.cover = None;
                    }
                    None => log::warn!(
                        "Keeping inline cover of game {} that is not a base64 data URI",
                        game.id
                    ),
                }
            }
        }
        records.push(game);
    }
    Ok((records, images))
}

fn parse_completion_date(value: Option<String>, index: usize) -> Result<Option<NaiveDate>> {
    let Some(value) = value else {
        return Ok(None);
    };
    if let Ok(date) = NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| Some(dt.date_naive()))
        .map_err(|_| {
            Error::MalformedImport(format!(
                "game #{index} has an invalid completionDate {value:?}"
            ))
        })
}

fn parse_score(
    rating: Option<i64>,
    metacritic: Option<serde_json::Value>,
    index: usize,
) -> Result<Option<Score>> {
    if let Some(rating) = rating {
        match u8::try_from(rating).ok().filter(|r| (1..=10).contains(r)) {
            Some(rating) => return Ok(Some(Score::Rating(rating))),
            None => log::warn!("Dropping out-of-range rating {} on game #{}", rating, index),
        }
    }
    match metacritic {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(non_empty(Some(s)).map(Score::Metacritic)),
        Some(serde_json::Value::Number(n)) => Ok(Some(Score::Metacritic(n.to_string()))),
        Some(other) => Err(Error::MalformedImport(format!(
            "game #{index} has an invalid metacriticScore {other}"
        ))),
    }
}

fn normalize_platforms(platforms: Vec<ImportPlatform>) -> Result<Vec<Platform>> {
    if platforms.is_empty() {
        return Err(Error::MalformedImport(
            "at least one platform is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(platforms.len());
    for (index, raw) in platforms.into_iter().enumerate() {
        let id = raw.id.trim().to_string();
        if id.is_empty() {
            return Err(Error::MalformedImport(format!("platform #{index} has no id")));
        }
        if !seen.insert(id.clone()) {
            return Err(Error::MalformedImport(format!("duplicate platform id {id}")));
        }
        let name = raw.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::MalformedImport(format!("platform {id} has no name")));
        }
        let position = u32::try_from(index).unwrap_or(u32::MAX);
        let order = raw
            .order
            .and_then(|o| u32::try_from(o).ok())
            .unwrap_or(position);

        records.push(Platform {
            id: PlatformId::from(id),
            name,
            color: raw.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            order,
        });
    }

    sort_platforms(&mut records);
    reindex(&mut records);
    Ok(records)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
