use serde::{Deserialize, Serialize};

use crate::model::ids::PlatformId;

/// Order assigned to a record that has none; such records sort last.
pub const UNORDERED: u32 = 999;

/// Color used for a game whose platform label matches no platform record.
pub const NEUTRAL_COLOR: &str = "#718096";

/// Color given to newly created platforms.
pub const DEFAULT_COLOR: &str = "#667eea";

/// Substrings recognised in free-text labels written before platforms were
/// configurable, checked in this order.
const LEGACY_KEYWORDS: &[(&str, &str)] = &[
    ("pc", "pc"),
    ("ps5", "ps5"),
    ("ps4", "ps4"),
    ("xbox", "xbox"),
    ("switch", "switch"),
    ("手机", "mobile"),
];

const FALLBACK_CLASS: &str = "other";

/// A user-configurable platform entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub id: PlatformId,
    pub name: String,
    pub color: String,

    /// Dense zero-based display rank.
    pub order: u32,
}

impl Platform {
    #[must_use]
    pub fn new(id: impl Into<PlatformId>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            order: UNORDERED,
        }
    }

    #[must_use]
    pub const fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    /// The platforms seeded into a freshly created store.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        let mut platforms = vec![
            Self::new("pc", "PC", DEFAULT_COLOR),
            Self::new("ps5", "PS5", DEFAULT_COLOR),
            Self::new("ps4", "PS4", DEFAULT_COLOR),
            Self::new("xbox", "Xbox Series X", "#107c10"),
            Self::new("switch", "Nintendo Switch", "#e60012"),
            Self::new("mobile", "Mobile", "#ff6b6b"),
            Self::new("other", "Other", NEUTRAL_COLOR),
        ];
        reindex(&mut platforms);
        platforms
    }
}

/// Sort by `order`, keeping the relative position of ties.
pub fn sort_platforms(platforms: &mut [Platform]) {
    platforms.sort_by_key(|p| p.order);
}

/// Assign `order = index` across the list.
pub fn reindex(platforms: &mut [Platform]) {
    for (index, platform) in platforms.iter_mut().enumerate() {
        platform.order = u32::try_from(index).unwrap_or(UNORDERED);
    }
}

/// Classify a free-text platform label to a platform id.
///
/// Matching is case-insensitive: exact name first, then exact id, then the
/// legacy keyword table. Anything else (including no label) is `other`.
#[must_use]
pub fn platform_class(label: Option<&str>, platforms: &[Platform]) -> PlatformId {
    let Some(label) = label else {
        return PlatformId::from(FALLBACK_CLASS);
    };
    let lower = label.to_lowercase();

    if let Some(found) = platforms.iter().find(|p| p.name.to_lowercase() == lower) {
        return found.id.clone();
    }
    if let Some(found) = platforms.iter().find(|p| p.id.as_str().to_lowercase() == lower) {
        return found.id.clone();
    }

    LEGACY_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, id)| PlatformId::from(*id))
        .unwrap_or_else(|| PlatformId::from(FALLBACK_CLASS))
}

/// The platform record a game's label resolves to, if it still exists.
#[must_use]
pub fn resolve_platform<'a>(label: Option<&str>, platforms: &'a [Platform]) -> Option<&'a Platform> {
    let class = platform_class(label, platforms);
    platforms.iter().find(|p| p.id == class)
}

/// Badge color for a label: the resolved platform's color, or neutral grey.
#[must_use]
pub fn platform_color<'a>(label: Option<&str>, platforms: &'a [Platform]) -> &'a str {
    resolve_platform(label, platforms)
        .map(|p| p.color.as_str())
        .unwrap_or(NEUTRAL_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_densely_ordered() {
        let platforms = Platform::defaults();
        let orders: Vec<u32> = platforms.iter().map(|p| p.order).collect();
        assert_eq!(orders, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn test_sort_puts_unordered_last() {
        let mut platforms = vec![
            Platform::new("a", "A", DEFAULT_COLOR),
            Platform::new("b", "B", DEFAULT_COLOR).with_order(1),
            Platform::new("c", "C", DEFAULT_COLOR).with_order(0),
        ];
        sort_platforms(&mut platforms);
        let ids: Vec<&str> = platforms.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_class_prefers_name_over_id() {
        // A platform whose *name* is another platform's id wins by name.
        let platforms = vec![
            Platform::new("switch", "Nintendo Switch", "#e60012"),
            Platform::new("handheld", "Switch", "#000000"),
        ];
        assert_eq!(platform_class(Some("switch"), &platforms).as_str(), "handheld");
    }

    #[test]
    fn test_class_matches_id_case_insensitively() {
        let platforms = Platform::defaults();
        assert_eq!(platform_class(Some("XBOX"), &platforms).as_str(), "xbox");
    }

    #[test]
    fn test_class_legacy_keywords() {
        let platforms = Platform::defaults();
        assert_eq!(platform_class(Some("Steam (PC)"), &platforms).as_str(), "pc");
        assert_eq!(platform_class(Some("PS5 Pro"), &platforms).as_str(), "ps5");
        assert_eq!(platform_class(Some("我的手机"), &platforms).as_str(), "mobile");
        assert_eq!(platform_class(Some("Dreamcast"), &platforms).as_str(), "other");
        assert_eq!(platform_class(None, &platforms).as_str(), "other");
    }

    #[test]
    fn test_color_falls_back_to_neutral() {
        let platforms = vec![Platform::new("pc", "PC", "#123456")];
        assert_eq!(platform_color(Some("pc"), &platforms), "#123456");
        // Classified as `other`, which no longer exists.
        assert_eq!(platform_color(Some("Dreamcast"), &platforms), NEUTRAL_COLOR);
    }
}
