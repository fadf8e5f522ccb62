use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a game record: the creation time in milliseconds since the
/// Unix epoch, bumped past any existing id so it stays monotonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(i64);

impl GameId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Mint an id for a record created at `now_millis`, strictly greater than
    /// every id in `existing`.
    #[must_use]
    pub fn mint<I>(now_millis: i64, existing: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        let floor = existing.into_iter().map(|id| id.0 + 1).max().unwrap_or(0);
        Self(now_millis.max(floor))
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! define_key {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

define_key!(
    PlatformId,
    "Stable slug identifying a platform (`pc`, `switch`, `platform_<millis>`)."
);
define_key!(ImageId, "Key of a cover image in the blob store.");

impl PlatformId {
    /// Generated id for a user-created platform.
    #[must_use]
    pub fn generated(now_millis: i64) -> Self {
        Self(format!("platform_{now_millis}"))
    }
}

impl ImageId {
    /// The conventional blob key for a game's cover: `game_<id>_cover`.
    #[must_use]
    pub fn for_game(game: GameId) -> Self {
        Self(format!("game_{game}_cover"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_uses_clock_when_ahead() {
        let id = GameId::mint(1_000, [GameId::new(10), GameId::new(20)]);
        assert_eq!(id.get(), 1_000);
    }

    #[test]
    fn test_mint_stays_monotonic_when_clock_lags() {
        let id = GameId::mint(5, [GameId::new(10), GameId::new(20)]);
        assert_eq!(id.get(), 21);
    }

    #[test]
    fn test_image_id_convention() {
        let id = ImageId::for_game(GameId::new(1_700_000_000_000));
        assert_eq!(id.as_str(), "game_1700000000000_cover");
    }

    #[test]
    fn test_generated_platform_id() {
        assert_eq!(PlatformId::generated(42).to_string(), "platform_42");
    }
}
