//! Year-grouped view of the library, ordered by the sort preference.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use gamelog_core::model::{Game, Score, SortKey, SortOrder, SortPreference};

/// Games completed in one calendar year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearGroup<'a> {
    pub year: i32,
    pub games: Vec<&'a Game>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryView<'a> {
    /// Newest year first.
    pub years: Vec<YearGroup<'a>>,
    /// Games without a completion date, most recently added first.
    pub not_completed: Vec<&'a Game>,
}

impl LibraryView<'_> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.years.is_empty() && self.not_completed.is_empty()
    }
}

/// Group completed games by year and sort each group by `preference`.
#[must_use]
pub fn group_by_year(games: &[Game], preference: SortPreference) -> LibraryView<'_> {
    let mut by_year: BTreeMap<i32, Vec<&Game>> = BTreeMap::new();
    let mut not_completed = Vec::new();

    for game in games {
        match game.completion_year() {
            Some(year) => by_year.entry(year).or_default().push(game),
            None => not_completed.push(game),
        }
    }

    let years = by_year
        .into_iter()
        .rev()
        .map(|(year, mut games)| {
            sort_games(&mut games, preference);
            YearGroup { year, games }
        })
        .collect();
    not_completed.sort_by(|a, b| b.added_at.cmp(&a.added_at));

    LibraryView {
        years,
        not_completed,
    }
}

/// Stable sort by the preferred key. Missing values compare as the lowest.
pub fn sort_games(games: &mut [&Game], preference: SortPreference) {
    games.sort_by(|a, b| {
        let ordering = compare(a, b, preference.sort_by);
        match preference.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn compare(a: &Game, b: &Game, key: SortKey) -> Ordering {
    match key {
        SortKey::CompletionDate => a.completion_date.cmp(&b.completion_date),
        SortKey::Platform => lower(a.platform.as_deref()).cmp(&lower(b.platform.as_deref())),
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Rating => a.rating().unwrap_or(0).cmp(&b.rating().unwrap_or(0)),
        SortKey::MetacriticScore => metacritic(a).cmp(&metacritic(b)),
    }
}

fn lower(value: Option<&str>) -> String {
    value.unwrap_or_default().to_lowercase()
}

fn metacritic(game: &Game) -> i64 {
    match &game.score {
        Some(score @ Score::Metacritic(_)) => score.sort_value(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use gamelog_core::model::{GameDraft, GameId, Score};

    fn game(id: i64, name: &str, date: Option<(i32, u32, u32)>) -> Game {
        let mut draft = GameDraft::new(name);
        if let Some((y, m, d)) = date {
            draft = draft.with_completion_date(NaiveDate::from_ymd_opt(y, m, d).unwrap());
        }
        let added = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap() + Duration::days(id);
        Game::new(GameId::new(id), draft, added)
    }

    fn names<'a>(games: &[&'a Game]) -> Vec<&'a str> {
        games.iter().map(|g| g.name.as_str()).collect()
    }

    #[test]
    fn test_groups_years_newest_first() {
        let games = vec![
            game(1, "A", Some((2022, 5, 1))),
            game(2, "B", Some((2024, 1, 1))),
            game(3, "C", None),
            game(4, "D", Some((2022, 9, 1))),
            game(5, "E", None),
        ];
        let view = group_by_year(&games, SortPreference::default());

        let years: Vec<i32> = view.years.iter().map(|g| g.year).collect();
        assert_eq!(years, vec![2024, 2022]);
        assert_eq!(names(&view.years[1].games), vec!["D", "A"]);
        // Not completed: most recently added first, regardless of preference.
        assert_eq!(names(&view.not_completed), vec!["E", "C"]);
    }

    #[test]
    fn test_sort_by_name_ascending_ignores_case() {
        let games = vec![
            game(1, "zelda", Some((2023, 1, 1))),
            game(2, "Astro Bot", Some((2023, 2, 1))),
            game(3, "metroid", Some((2023, 3, 1))),
        ];
        let pref = SortPreference::new(SortKey::Name, SortOrder::Asc);
        let view = group_by_year(&games, pref);
        assert_eq!(names(&view.years[0].games), vec!["Astro Bot", "metroid", "zelda"]);
    }

    #[test]
    fn test_sort_by_rating_descending_puts_unrated_last() {
        let mut a = game(1, "A", Some((2023, 1, 1)));
        a.score = Some(Score::Rating(6));
        let b = game(2, "B", Some((2023, 1, 2)));
        let mut c = game(3, "C", Some((2023, 1, 3)));
        c.score = Some(Score::Rating(10));
        let games = vec![a, b, c];

        let view = group_by_year(&games, SortPreference::new(SortKey::Rating, SortOrder::Desc));
        assert_eq!(names(&view.years[0].games), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_sort_by_metacritic_parses_strings() {
        let mut a = game(1, "A", Some((2019, 1, 1)));
        a.score = Some(Score::Metacritic("9".to_string()));
        let mut b = game(2, "B", Some((2019, 1, 2)));
        b.score = Some(Score::Metacritic("87".to_string()));
        let games = vec![a, b];

        let view = group_by_year(
            &games,
            SortPreference::new(SortKey::MetacriticScore, SortOrder::Desc),
        );
        assert_eq!(names(&view.years[0].games), vec!["B", "A"]);
    }

    #[test]
    fn test_sort_by_metacritic_reads_annotated_scores() {
        let mut a = game(1, "A", Some((2019, 1, 1)));
        a.score = Some(Score::Metacritic("87 (PC)".to_string()));
        let mut b = game(2, "B", Some((2019, 1, 2)));
        b.score = Some(Score::Metacritic("90".to_string()));
        let mut c = game(3, "C", Some((2019, 1, 3)));
        c.score = Some(Score::Metacritic("tbd".to_string()));
        let games = vec![c, a, b];

        let view = group_by_year(
            &games,
            SortPreference::new(SortKey::MetacriticScore, SortOrder::Desc),
        );
        assert_eq!(names(&view.years[0].games), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut a = game(1, "A", Some((2021, 1, 1)));
        a.platform = Some("PC".to_string());
        let mut b = game(2, "B", Some((2021, 1, 1)));
        b.platform = Some("pc".to_string());
        let games = vec![a, b];

        for order in [SortOrder::Asc, SortOrder::Desc] {
            let view = group_by_year(&games, SortPreference::new(SortKey::Platform, order));
            assert_eq!(names(&view.years[0].games), vec!["A", "B"]);
        }
    }

    #[test]
    fn test_empty_library() {
        assert!(group_by_year(&[], SortPreference::default()).is_empty());
    }
}
