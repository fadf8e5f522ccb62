//! The library state object and its consistency rules.

use chrono::Utc;
use std::collections::HashSet;

use gamelog_core::model::{
    platform_color, reindex, resolve_platform, sort_platforms, CoverSource, Game, GameDraft,
    GameId, ImageId, Platform, PlatformId, SortPreference, DEFAULT_COLOR,
};
use gamelog_core::schema::{Database, ImportBatch};
use gamelog_core::{Error, Result};

use crate::codec::{self, ImportSummary, Snapshot, SnapshotGame, SnapshotPlatform};
use crate::data_uri;
use crate::library::{self, LibraryView};

/// Name given to a platform created from the settings list.
pub const NEW_PLATFORM_NAME: &str = "New Platform";

/// In-memory library backed by the local store.
///
/// Built once at startup with [`Tracker::open`] and handed to whatever
/// front end drives it. Every mutation writes through to the store; the
/// in-memory lists mirror what was last persisted.
#[derive(Debug)]
pub struct Tracker {
    db: Database,
    games: Vec<Game>,
    platforms: Vec<Platform>,
    sort: SortPreference,
}

impl Tracker {
    /// Load every game and platform from an opened store.
    pub fn open(db: Database) -> Result<Self> {
        let games = db.get_all()?;
        let mut platforms: Vec<Platform> = db.get_all()?;
        sort_platforms(&mut platforms);
        let sort = db.sort_preference()?;
        log::info!(
            "Loaded {} games and {} platforms from {}",
            games.len(),
            platforms.len(),
            db.location()
        );
        Ok(Self {
            db,
            games,
            platforms,
            sort,
        })
    }

    /// Release the state and hand back the store.
    #[must_use]
    pub fn close(self) -> Database {
        self.db
    }

    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.db
    }

    #[must_use]
    pub fn games(&self) -> &[Game] {
        &self.games
    }

    /// Platforms in display order.
    #[must_use]
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    #[must_use]
    pub fn game(&self, id: GameId) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }

    #[must_use]
    pub fn platform(&self, id: &PlatformId) -> Option<&Platform> {
        self.platforms.iter().find(|p| &p.id == id)
    }

    #[must_use]
    pub const fn sort_preference(&self) -> SortPreference {
        self.sort
    }

    pub fn set_sort_preference(&mut self, sort: SortPreference) -> Result<()> {
        self.db.set_sort_preference(sort)?;
        self.sort = sort;
        Ok(())
    }

    /// The library grouped by completion year under the current sort.
    #[must_use]
    pub fn library_view(&self) -> LibraryView<'_> {
        library::group_by_year(&self.games, self.sort)
    }

    // --- Games ---

    /// Add a game. When `cover` is given, the blob is stored before the
    /// record that references it.
    pub fn create_game(&mut self, draft: GameDraft, cover: Option<&[u8]>) -> Result<Game> {
        let draft = draft.normalized()?;
        let now = Utc::now();
        let id = GameId::mint(now.timestamp_millis(), self.games.iter().map(|g| g.id));
        let mut game = Game::new(id, draft, now);

        if let Some(data) = cover {
            let image_id = ImageId::for_game(id);
            self.db.put_image(&image_id, data)?;
            game.image_id = Some(image_id);
        }

        let mut games = self.games.clone();
        games.push(game.clone());
        self.save_games(games)?;
        log::info!("Added game {} ({})", game.name, game.id);
        Ok(game)
    }

    /// Replace a game's editable fields and, optionally, its cover.
    pub fn update_game(&mut self, id: GameId, draft: GameDraft, cover: Option<&[u8]>) -> Result<Game> {
        let draft = draft.normalized()?;
        let index = self.game_index(id)?;
        let mut game = self.games[index].clone();
        game.apply(draft);

        if let Some(data) = cover {
            self.write_cover(&mut game, data)?;
        }

        let mut games = self.games.clone();
        games[index] = game.clone();
        self.save_games(games)?;
        Ok(game)
    }

    /// Store a new cover for an existing game.
    pub fn set_cover(&mut self, id: GameId, data: &[u8]) -> Result<Game> {
        let index = self.game_index(id)?;
        let mut game = self.games[index].clone();
        self.write_cover(&mut game, data)?;

        let mut games = self.games.clone();
        games[index] = game.clone();
        self.save_games(games)?;
        Ok(game)
    }

    /// Detach a game's cover. The blob itself is left in the store.
    pub fn remove_cover(&mut self, id: GameId) -> Result<Game> {
        let index = self.game_index(id)?;
        let mut games = self.games.clone();
        games[index].image_id = None;
        games[index].cover = None;
        let game = games[index].clone();
        self.save_games(games)?;
        Ok(game)
    }

    /// Delete a game. Its cover blob stays behind.
    pub fn delete_game(&mut self, id: GameId) -> Result<Game> {
        let index = self.game_index(id)?;
        let mut games = self.games.clone();
        let removed = games.remove(index);
        self.save_games(games)?;
        log::info!("Deleted game {} ({})", removed.name, removed.id);
        Ok(removed)
    }

    /// Where the cover for `game` comes from right now.
    pub fn resolve_cover_source(&self, game: &Game) -> Result<CoverSource> {
        CoverSource::resolve(game, |id| self.db.get_image(id))
    }

    /// Overwrite the game's existing blob, or mint one from its id. The
    /// record only gains the image id once the blob is written.
    fn write_cover(&self, game: &mut Game, data: &[u8]) -> Result<()> {
        let image_id = game
            .image_id
            .clone()
            .unwrap_or_else(|| ImageId::for_game(game.id));
        self.db.put_image(&image_id, data)?;
        game.image_id = Some(image_id);
        game.cover = None;
        Ok(())
    }

    fn game_index(&self, id: GameId) -> Result<usize> {
        self.games
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| Error::NotFound {
                entity: "game",
                id: id.to_string(),
            })
    }

    fn save_games(&mut self, games: Vec<Game>) -> Result<()> {
        self.db.put_all(&games)?;
        self.games = games;
        Ok(())
    }

    // --- Platforms ---

    /// The platform a game's free-text label resolves to, if any.
    #[must_use]
    pub fn platform_for(&self, game: &Game) -> Option<&Platform> {
        resolve_platform(game.platform.as_deref(), &self.platforms)
    }

    /// Badge color for a game's platform label.
    #[must_use]
    pub fn platform_color(&self, game: &Game) -> &str {
        platform_color(game.platform.as_deref(), &self.platforms)
    }

    /// Append a platform with a generated id and default look.
    pub fn add_platform(&mut self) -> Result<Platform> {
        let mut stamp = Utc::now().timestamp_millis();
        let mut id = PlatformId::generated(stamp);
        while self.platform(&id).is_some() {
            stamp += 1;
            id = PlatformId::generated(stamp);
        }

        let index = self.platforms.len();
        self.platforms
            .push(Platform::new(id, NEW_PLATFORM_NAME, DEFAULT_COLOR));
        self.save_platforms()?;
        log::info!("Added platform {}", self.platforms[index].id);
        Ok(self.platforms[index].clone())
    }

    /// Rename and recolor a platform. Games keep their labels.
    pub fn edit_platform(&mut self, id: &PlatformId, name: &str, color: &str) -> Result<Platform> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidData("platform name is required".to_string()));
        }
        let color = color.trim();
        if color.is_empty() {
            return Err(Error::InvalidData("platform color is required".to_string()));
        }
        let index = self.platform_index(id)?;
        self.platforms[index].name = name.to_string();
        self.platforms[index].color = color.to_string();
        self.save_platforms()?;
        Ok(self.platforms[index].clone())
    }

    /// Put platforms in the given order. `ids` must name every platform
    /// exactly once.
    ///
    /// On rejection or a failed write the in-memory list is reloaded from
    /// the store, discarding the attempted order.
    pub fn reorder_platforms(&mut self, ids: &[PlatformId]) -> Result<()> {
        let expected = self.platforms.len();
        let found = ids
            .iter()
            .filter(|id| self.platforms.iter().any(|p| &p.id == *id))
            .collect::<HashSet<_>>()
            .len();

        if ids.len() != expected || found != expected {
            self.reload_platforms()?;
            return Err(Error::CountMismatch { expected, found });
        }

        let mut reordered = Vec::with_capacity(expected);
        for id in ids {
            if let Some(platform) = self.platforms.iter().find(|p| &p.id == id) {
                reordered.push(platform.clone());
            }
        }
        self.platforms = reordered;
        self.save_platforms()
    }

    /// Delete a platform. The last remaining platform cannot be deleted, and
    /// games labelled with it are left alone.
    pub fn delete_platform(&mut self, id: &PlatformId) -> Result<Platform> {
        if self.platforms.len() <= 1 {
            return Err(Error::LastPlatform);
        }
        let index = self.platform_index(id)?;
        let removed = self.platforms.remove(index);
        self.save_platforms()?;
        log::info!("Deleted platform {} ({})", removed.name, removed.id);
        Ok(removed)
    }

    /// Re-read platforms from the store, replacing the in-memory list.
    pub fn reload_platforms(&mut self) -> Result<()> {
        let mut platforms: Vec<Platform> = self.db.get_all()?;
        sort_platforms(&mut platforms);
        self.platforms = platforms;
        Ok(())
    }

    fn platform_index(&self, id: &PlatformId) -> Result<usize> {
        self.platforms
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| Error::NotFound {
                entity: "platform",
                id: id.to_string(),
            })
    }

    /// Re-derive dense order from list position and persist the whole list.
    /// A failed write reloads what the store actually holds.
    fn save_platforms(&mut self) -> Result<()> {
        reindex(&mut self.platforms);
        if let Err(e) = self.db.put_all(&self.platforms) {
            log::warn!("Saving platforms failed ({}); reloading from store", e);
            self.reload_platforms()?;
            return Err(e);
        }
        Ok(())
    }

    // --- Snapshot ---

    /// Denormalized export of the whole library.
    pub fn export_snapshot(&self) -> Result<Snapshot> {
        let mut games = Vec::with_capacity(self.games.len());
        for game in &self.games {
            let cover = match self.resolve_cover_source(game)? {
                CoverSource::Blob { data, .. } => Some(data_uri::encode(&data)),
                CoverSource::Inline(cover) => Some(cover),
                CoverSource::Placeholder => None,
            };
            games.push(SnapshotGame::new(game, cover));
        }
        log::info!("Exporting {} games", games.len());
        Ok(Snapshot {
            games,
            platforms: self.platforms.iter().map(SnapshotPlatform::from).collect(),
            sort_by: self.sort.sort_by,
            sort_order: self.sort.sort_order,
            export_date: Utc::now(),
        })
    }

    /// Replace the library with the contents of an export document.
    ///
    /// The document is validated in full before anything is written, and
    /// the write is a single transaction: on any error the library is
    /// unchanged.
    pub fn import_snapshot(&mut self, json: &str) -> Result<ImportSummary> {
        let normalized = codec::normalize_import(json, self.sort, Utc::now())?;
        let summary = ImportSummary {
            games: normalized.games.as_ref().map(Vec::len),
            platforms: normalized.platforms.as_ref().map(Vec::len),
            covers_extracted: normalized.images.len(),
        };

        let batch = ImportBatch {
            images: normalized.images,
            games: normalized.games,
            platforms: normalized.platforms,
            sort: Some(normalized.sort),
        };
        self.db.import(&batch)?;

        if let Some(games) = batch.games {
            self.games = games;
        }
        if let Some(platforms) = batch.platforms {
            self.platforms = platforms;
        }
        self.sort = normalized.sort;
        log::info!(
            "Imported {:?} games and {:?} platforms ({} covers extracted)",
            summary.games,
            summary.platforms,
            summary.covers_extracted
        );
        Ok(summary)
    }

    /// Wipe games and covers and restore the default platforms.
    pub fn clear_all_data(&mut self) -> Result<()> {
        self.db.clear_all()?;
        self.games.clear();
        self.reload_platforms()
    }
}
