use crate::error::Result;
use crate::model::game::Game;
use crate::model::ids::ImageId;

/// Where a game's cover comes from at display time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverSource {
    /// Bytes stored in the blob store under the game's `image_id`.
    Blob { id: ImageId, data: Vec<u8> },
    /// Legacy inline data URI carried on the record itself.
    Inline(String),
    /// Nothing to show.
    Placeholder,
}

impl CoverSource {
    /// Resolve a game's cover: `image_id` if the blob exists, then the inline
    /// `cover`, then the placeholder.
    ///
    /// `fetch` looks a blob up by id; a missing blob is `Ok(None)` and falls
    /// through rather than failing.
    pub fn resolve<F>(game: &Game, fetch: F) -> Result<Self>
    where
        F: FnOnce(&ImageId) -> Result<Option<Vec<u8>>>,
    {
        if let Some(id) = &game.image_id {
            if let Some(data) = fetch(id)? {
                return Ok(Self::Blob {
                    id: id.clone(),
                    data,
                });
            }
            log::debug!("Cover blob {} for game {} is missing", id, game.id);
        }
        match game.cover.as_deref() {
            Some(cover) if !cover.is_empty() => Ok(Self::Inline(cover.to_string())),
            _ => Ok(Self::Placeholder),
        }
    }

    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GameDraft, GameId};
    use chrono::Utc;

    fn game() -> Game {
        Game::new(GameId::new(7), GameDraft::new("Outer Wilds"), Utc::now())
    }

    #[test]
    fn test_blob_wins_over_inline() {
        let mut game = game();
        game.image_id = Some(ImageId::for_game(game.id));
        game.cover = Some("data:image/png;base64,AAAA".to_string());

        let source = CoverSource::resolve(&game, |_| Ok(Some(vec![1, 2, 3]))).unwrap();
        assert_eq!(
            source,
            CoverSource::Blob {
                id: ImageId::for_game(game.id),
                data: vec![1, 2, 3]
            }
        );
    }

    #[test]
    fn test_missing_blob_falls_back_to_inline() {
        let mut game = game();
        game.image_id = Some(ImageId::for_game(game.id));
        game.cover = Some("data:image/png;base64,AAAA".to_string());

        let source = CoverSource::resolve(&game, |_| Ok(None)).unwrap();
        assert_eq!(source, CoverSource::Inline("data:image/png;base64,AAAA".to_string()));
    }

    #[test]
    fn test_nothing_resolves_to_placeholder() {
        let mut game = game();
        game.image_id = Some(ImageId::for_game(game.id));

        let source = CoverSource::resolve(&game, |_| Ok(None)).unwrap();
        assert!(source.is_placeholder());
    }

    #[test]
    fn test_fetch_not_called_without_image_id() {
        let game = game();
        let source = CoverSource::resolve(&game, |_| panic!("no image id to fetch")).unwrap();
        assert!(source.is_placeholder());
    }
}
