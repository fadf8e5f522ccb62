pub mod cover;
pub mod game;
pub mod ids;
pub mod platform;
pub mod preference;

pub use cover::CoverSource;
pub use game::{Game, GameDraft, Score, MAX_COMMENT_CHARS};
pub use ids::{GameId, ImageId, PlatformId};
pub use platform::{
    platform_class, platform_color, reindex, resolve_platform, sort_platforms, Platform,
    DEFAULT_COLOR, NEUTRAL_COLOR, UNORDERED,
};
pub use preference::{SortKey, SortOrder, SortPreference};
