use super::*;
use chrono::{TimeZone, Utc};

fn imdb(id: &str, title_type: &str) -> ImdbItem {
    ImdbItem::new(id, title_type)
}

fn trakt(kind: TraktItemKind, id: &str) -> TraktItem {
    TraktItem::new(
        kind,
        TraktItemSpec {
            ids: TraktIds::imdb(id),
            ..TraktItemSpec::default()
        },
    )
}

fn pair(imdb_items: Vec<ImdbItem>, trakt_items: Vec<TraktItem>) -> DataPair {
    DataPair { imdb_items, trakt_items }
}

fn ids(items: &[TraktItem]) -> Vec<&str> {
    items.iter().filter_map(TraktItem::imdb_id).collect()
}

#[test]
fn test_new_list_adds_every_item() {
    let diff = difference(&pair(vec![imdb("tt1", "movie")], vec![]));
    assert_eq!(diff.add, vec![trakt(TraktItemKind::Movie, "tt1")]);
    assert!(diff.remove.is_empty());
}

#[test]
fn test_second_run_after_apply_is_empty() {
    let first = pair(vec![imdb("tt1", "movie"), imdb("tt2", "tvSeries")], vec![]);
    let diff = difference(&first);

    let applied = pair(first.imdb_items.clone(), diff.add);
    assert!(difference(&applied).is_empty());
}

#[test]
fn test_add_and_remove_are_complete_and_disjoint() {
    let diff = difference(&pair(
        vec![imdb("tt1", "movie"), imdb("tt2", "movie"), imdb("tt3", "tvEpisode")],
        vec![
            trakt(TraktItemKind::Movie, "tt2"),
            trakt(TraktItemKind::Show, "tt4"),
            trakt(TraktItemKind::Movie, "tt5"),
        ],
    ));

    assert_eq!(ids(&diff.add), vec!["tt1", "tt3"]);
    assert_eq!(ids(&diff.remove), vec!["tt4", "tt5"]);
    for id in ids(&diff.add) {
        assert!(!ids(&diff.remove).contains(&id));
    }
}

#[test]
fn test_same_membership_ignores_other_fields() {
    let rated_at = Utc.with_ymd_and_hms(2023, 4, 1, 0, 0, 0).unwrap();
    let diff = difference(&pair(
        vec![imdb("tt1", "tvSeries").with_rating(9, rated_at)],
        // Category and rating disagree, the id does not
        vec![trakt(TraktItemKind::Movie, "tt1")],
    ));
    assert!(diff.is_empty());
}

#[test]
fn test_unknown_title_type_falls_back_to_movie() {
    let diff = difference(&pair(vec![imdb("tt7", "Video Game"), imdb("tt8", "")], vec![]));
    assert!(diff.add.iter().all(|item| item.kind() == Some(TraktItemKind::Movie)));
    assert_eq!(diff.add.len(), 2);
}

#[test]
fn test_title_types_map_to_trakt_kinds() {
    assert_eq!(trakt_kind(&TitleType::Movie), TraktItemKind::Movie);
    assert_eq!(trakt_kind(&TitleType::TvSeries), TraktItemKind::Show);
    assert_eq!(trakt_kind(&TitleType::TvMiniSeries), TraktItemKind::Show);
    assert_eq!(trakt_kind(&TitleType::TvEpisode), TraktItemKind::Episode);
    assert_eq!(trakt_kind(&TitleType::parse("TV Special")), TraktItemKind::Movie);
}

#[test]
fn test_unsupported_trakt_entries_are_skipped() {
    let person = TraktItem::Unsupported {
        kind: "person".to_string(),
    };
    let diff = difference(&pair(vec![imdb("tt1", "movie")], vec![person]));

    // Not counted as present, not removed either
    assert_eq!(ids(&diff.add), vec!["tt1"]);
    assert!(diff.remove.is_empty());
}

#[test]
fn test_trakt_entries_without_imdb_id_are_skipped() {
    let no_id = TraktItem::Movie(TraktItemSpec {
        title: Some("Unmatched".to_string()),
        ..TraktItemSpec::default()
    });
    let diff = difference(&pair(vec![], vec![no_id]));
    assert!(diff.is_empty());
}

#[test]
fn test_rated_item_carries_rating_and_watch_time() {
    let rated_at = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
    let diff = difference(&pair(vec![imdb("tt2", "movie").with_rating(8, rated_at)], vec![]));

    let spec = diff.add[0].spec().unwrap();
    assert_eq!(spec.ids.imdb.as_deref(), Some("tt2"));
    assert_eq!(spec.rating, Some(8));
    assert_eq!(spec.rated_at, Some(rated_at));
    assert_eq!(spec.watched_at, Some(rated_at));
}

#[test]
fn test_removals_keep_the_trakt_entry_unchanged() {
    let entry = TraktItem::Show(TraktItemSpec {
        ids: TraktIds {
            imdb: Some("tt9".to_string()),
            trakt: Some(1390),
            slug: Some("game-of-thrones".to_string()),
            ..TraktIds::default()
        },
        title: Some("Game of Thrones".to_string()),
        rating: Some(10),
        ..TraktItemSpec::default()
    });
    let diff = difference(&pair(vec![], vec![entry.clone()]));
    assert_eq!(diff.remove, vec![entry]);
}

#[test]
fn test_empty_pair_is_empty() {
    assert!(difference(&DataPair::default()).is_empty());
}
