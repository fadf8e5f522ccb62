use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::ids::{GameId, ImageId};

/// Comments longer than this are rejected when a game is created or edited.
pub const MAX_COMMENT_CHARS: usize = 20;

/// How a game was scored.
///
/// Older libraries stored a Metacritic score (an integer-like string); newer
/// ones store a 1-10 heart rating. A record carries at most one of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Score {
    Rating(u8),
    Metacritic(String),
}

impl Score {
    /// A heart rating, validated to 1..=10.
    pub fn rating(value: u8) -> Result<Self> {
        if (1..=10).contains(&value) {
            Ok(Self::Rating(value))
        } else {
            Err(Error::InvalidData(format!(
                "rating must be between 1 and 10, got {value}"
            )))
        }
    }

    #[must_use]
    pub const fn rating_value(&self) -> Option<u8> {
        match self {
            Self::Rating(value) => Some(*value),
            Self::Metacritic(_) => None,
        }
    }

    #[must_use]
    pub fn metacritic_value(&self) -> Option<&str> {
        match self {
            Self::Rating(_) => None,
            Self::Metacritic(value) => Some(value),
        }
    }

    /// Numeric value used when sorting by score. A legacy score is read
    /// from its leading digits (`"87 (PC)"` sorts as 87); one without any
    /// sorts as zero.
    #[must_use]
    pub fn sort_value(&self) -> i64 {
        match self {
            Self::Rating(value) => i64::from(*value),
            Self::Metacritic(value) => leading_integer(value).unwrap_or(0),
        }
    }
}

/// The optionally signed digit run at the start of `text`, after leading
/// whitespace.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let digits = unsigned.len() - unsigned.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let sign_len = text.len() - unsigned.len();
    text[..sign_len + digits].parse().ok()
}

/// A finished (or not yet finished) game in the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub name: String,

    /// Alternate or original-language title.
    pub original_name: Option<String>,

    /// Free-text platform label. Matched loosely against platform records
    /// for display; never a strict reference.
    pub platform: Option<String>,

    /// `None` means not completed yet.
    pub completion_date: Option<NaiveDate>,

    pub score: Option<Score>,
    pub comment: Option<String>,

    /// Key of the cover in the blob store. Takes precedence over `cover`.
    pub image_id: Option<ImageId>,

    /// Legacy inline cover (a data URI).
    pub cover: Option<String>,

    pub added_at: DateTime<Utc>,
}

impl Game {
    /// Build a new record from a validated draft.
    #[must_use]
    pub fn new(id: GameId, draft: GameDraft, added_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            original_name: draft.original_name,
            platform: draft.platform,
            completion_date: draft.completion_date,
            score: draft.score,
            comment: draft.comment,
            image_id: None,
            cover: None,
            added_at,
        }
    }

    /// Replace the editable fields, keeping identity, timestamps and cover.
    pub fn apply(&mut self, draft: GameDraft) {
        self.name = draft.name;
        self.original_name = draft.original_name;
        self.platform = draft.platform;
        self.completion_date = draft.completion_date;
        self.score = draft.score;
        self.comment = draft.comment;
    }

    #[must_use]
    pub fn completion_year(&self) -> Option<i32> {
        self.completion_date.map(|date| date.year())
    }

    #[must_use]
    pub fn rating(&self) -> Option<u8> {
        self.score.as_ref().and_then(Score::rating_value)
    }

    #[must_use]
    pub fn metacritic_score(&self) -> Option<&str> {
        self.score.as_ref().and_then(Score::metacritic_value)
    }
}

/// The user-editable fields of a game, as submitted from a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDraft {
    pub name: String,
    pub original_name: Option<String>,
    pub platform: Option<String>,
    pub completion_date: Option<NaiveDate>,
    pub score: Option<Score>,
    pub comment: Option<String>,
}

impl GameDraft {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_original_name(mut self, original_name: impl Into<String>) -> Self {
        self.original_name = Some(original_name.into());
        self
    }

    #[must_use]
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    #[must_use]
    pub fn with_completion_date(mut self, date: NaiveDate) -> Self {
        self.completion_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_score(mut self, score: Score) -> Self {
        self.score = Some(score);
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Trim text fields, drop empty optionals, and check the form rules.
    pub fn normalized(mut self) -> Result<Self> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(Error::InvalidData("game name is required".to_string()));
        }
        self.original_name = non_empty(self.original_name);
        self.platform = non_empty(self.platform);
        self.comment = non_empty(self.comment);

        if let Some(Score::Rating(value)) = self.score {
            Score::rating(value)?;
        }
        if let Some(comment) = &self.comment {
            let chars = comment.chars().count();
            if chars > MAX_COMMENT_CHARS {
                return Err(Error::InvalidData(format!(
                    "comment is limited to {MAX_COMMENT_CHARS} characters, got {chars}"
                )));
            }
        }
        Ok(self)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
