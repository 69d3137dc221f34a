use lanota_core::search::{find_songs, MatchTier, DEFAULT_MAX_DISPLAY};
use models::{AliasTable, Category, Song};

fn song(id: u32, title: &str, chapter: &str) -> Song {
    Song {
        id,
        title: title.to_string(),
        chapter: chapter.to_string(),
        category: Category::classify(chapter),
        ..Song::default()
    }
}

fn catalog() -> Vec<Song> {
    vec![
        song(1, "Dream goes on", "0-1"),
        song(2, "cyanine", "x-1"),
        song(3, "Cyaegha", "x-2"),
        song(4, "Specta", "1-1"),
        song(5, "12", "2-1"),
    ]
}

fn aliases() -> AliasTable {
    let mut table = AliasTable::default();
    table.add("Dream goes on", "dgo");
    table.add("Dream goes on", "梦想继续");
    table.add("Cyaegha", "cya");
    table
}

#[test]
fn chapter_exact_is_case_insensitive() {
    let songs = catalog();
    let out = find_songs("X-1", &songs, &AliasTable::default(), DEFAULT_MAX_DISPLAY);
    assert_eq!(out.tier, Some(MatchTier::Chapter));
    assert_eq!(out.total, 1);
    assert_eq!(out.matches[0].id, 2);
}

#[test]
fn chapter_beats_everything_else() {
    // "2-1" is song 5's chapter; no other tier is ever consulted even
    // though fuzzy would also hit titles.
    let songs = catalog();
    let out = find_songs("2-1", &songs, &aliases(), DEFAULT_MAX_DISPLAY);
    assert_eq!(out.tier, Some(MatchTier::Chapter));
    assert_eq!(out.matches.len(), 1);
    assert_eq!(out.matches[0].id, 5);
}

#[test]
fn id_beats_title() {
    // "5" parses as an id; song 5 wins even though another song is
    // literally titled "5".
    let mut songs = catalog();
    songs.push(song(6, "5", "2-2"));
    let out = find_songs("5", &songs, &AliasTable::default(), DEFAULT_MAX_DISPLAY);
    assert_eq!(out.tier, Some(MatchTier::Id));
    assert_eq!(out.total, 1);
    assert_eq!(out.matches[0].id, 5);
}

#[test]
fn title_answers_when_no_id_matches() {
    let songs = catalog();
    let out = find_songs("12", &songs, &AliasTable::default(), DEFAULT_MAX_DISPLAY);
    assert_eq!(out.tier, Some(MatchTier::Title));
    assert_eq!(out.matches[0].id, 5);
}

#[test]
fn alias_exact_is_case_insensitive() {
    let songs = catalog();
    let out = find_songs("DGO", &songs, &aliases(), DEFAULT_MAX_DISPLAY);
    assert_eq!(out.tier, Some(MatchTier::Alias));
    assert_eq!(out.matches[0].title, "Dream goes on");
}

#[test]
fn title_exact_before_fuzzy() {
    let songs = catalog();
    let out = find_songs("CYANINE", &songs, &aliases(), DEFAULT_MAX_DISPLAY);
    assert_eq!(out.tier, Some(MatchTier::Title));
    assert_eq!(out.matches[0].id, 2);
}

#[test]
fn fuzzy_unions_titles_and_aliases() {
    let songs = catalog();
    // "cya" is a substring of "cyanine" and "Cyaegha", and an alias of
    // "Cyaegha"; the dedup keeps one entry per id, title hits first.
    let out = find_songs("cyan", &songs, &aliases(), DEFAULT_MAX_DISPLAY);
    assert_eq!(out.tier, Some(MatchTier::Fuzzy));
    assert_eq!(out.matches.iter().map(|s| s.id).collect::<Vec<_>>(), vec![2]);

    let out = find_songs("梦想", &songs, &aliases(), DEFAULT_MAX_DISPLAY);
    assert_eq!(out.tier, Some(MatchTier::Fuzzy));
    assert_eq!(out.matches[0].id, 1);
}

#[test]
fn fuzzy_dedups_by_id() {
    let songs = catalog();
    let out = find_songs("cya", &songs, &aliases(), DEFAULT_MAX_DISPLAY);
    assert_eq!(out.tier, Some(MatchTier::Fuzzy));
    let ids: Vec<u32> = out.matches.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![2, 3]);
    assert_eq!(out.total, 2);
}

#[test]
fn truncation_keeps_total() {
    let songs: Vec<Song> = (1..=25)
        .map(|id| song(id, &format!("Horizon {id}"), &format!("9-{id}")))
        .collect();
    let out = find_songs("horizon", &songs, &AliasTable::default(), DEFAULT_MAX_DISPLAY);
    assert_eq!(out.tier, Some(MatchTier::Fuzzy));
    assert_eq!(out.total, 25);
    assert_eq!(out.matches.len(), 10);
    assert_eq!(out.matches[0].id, 1);

    let out = find_songs("horizon", &songs, &AliasTable::default(), 3);
    assert_eq!(out.matches.len(), 3);
    assert_eq!(out.total, 25);
}

#[test]
fn no_match_is_empty_with_no_tier() {
    let songs = catalog();
    let out = find_songs("zzzzz", &songs, &aliases(), DEFAULT_MAX_DISPLAY);
    assert!(out.is_empty());
    assert_eq!(out.tier, None);
    assert_eq!(out.total, 0);
}
