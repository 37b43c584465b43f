use std::collections::HashSet;
use listsync_config::ListSelection;
use listsync_models::TraktList;

/// IMDb list ids a pass should fetch. Discovery skips the watchlist, which always gets its own pair.
pub fn selected_list_ids(selection: &ListSelection, discovered: Vec<String>, watchlist_id: &str) -> Vec<String> {
    match selection {
        ListSelection::All => discovered.into_iter().filter(|id| id != watchlist_id).collect(),
        ListSelection::Ids(ids) => ids.clone(),
    }
}

/// Trakt lists whose display name matches none of the gathered IMDb list names
pub fn orphaned_lists<'a>(trakt_lists: &'a [TraktList], names: &[String]) -> Vec<&'a TraktList> {
    let names: HashSet<&str> = names.iter().map(String::as_str).collect();
    trakt_lists
        .iter()
        .filter(|list| !names.contains(list.name.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use listsync_models::{TraktListIds, WATCHLIST_NAME};

    fn trakt_list(name: &str, slug: &str) -> TraktList {
        TraktList {
            name: name.to_string(),
            ids: TraktListIds {
                trakt: None,
                slug: slug.to_string(),
            },
        }
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_orphans_are_lists_without_an_imdb_name() {
        let gathered = names(&["Sci-Fi", WATCHLIST_NAME]);
        let trakt_lists = vec![trakt_list("Sci-Fi", "sci-fi"), trakt_list("Foo", "foo")];

        let orphans = orphaned_lists(&trakt_lists, &gathered);
        assert_eq!(orphans, vec![&trakt_lists[1]]);
    }

    #[test]
    fn test_orphan_match_is_exact() {
        let trakt_lists = vec![trakt_list("sci-fi", "sci-fi")];
        assert_eq!(orphaned_lists(&trakt_lists, &names(&["Sci-Fi"])).len(), 1);
    }

    #[test]
    fn test_orphan_match_ignores_slug() {
        let trakt_lists = vec![trakt_list("Фильмы", "list-1")];
        assert!(orphaned_lists(&trakt_lists, &names(&["Фильмы"])).is_empty());
    }

    #[test]
    fn test_discovery_skips_watchlist() {
        let discovered = vec!["ls001".to_string(), "ls999".to_string(), "ls002".to_string()];
        assert_eq!(
            selected_list_ids(&ListSelection::All, discovered, "ls999"),
            vec!["ls001", "ls002"]
        );
    }

    #[test]
    fn test_explicit_selection_ignores_discovery() {
        let selection = ListSelection::parse("ls005, ls006");
        assert_eq!(selected_list_ids(&selection, vec![], "ls999"), vec!["ls005", "ls006"]);
    }
}
