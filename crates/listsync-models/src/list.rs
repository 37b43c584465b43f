use serde::{Deserialize, Serialize};
use crate::imdb_item::ImdbItem;
use crate::trakt_item::TraktItem;

/// Display name the watchlist pair carries in place of a list name
pub const WATCHLIST_NAME: &str = "watchlist";

/// Which Trakt collection a list pair converges into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListTarget {
    Watchlist {
        imdb_list_id: String,
    },
    Custom {
        imdb_list_id: String,
        name: String,
        /// Slug Trakt assigned to the list; `None` until the list exists there
        trakt_list_id: Option<String>,
    },
}

impl ListTarget {
    pub fn watchlist(imdb_list_id: impl Into<String>) -> Self {
        ListTarget::Watchlist {
            imdb_list_id: imdb_list_id.into(),
        }
    }

    pub fn custom(imdb_list_id: impl Into<String>, name: impl Into<String>, trakt_list_id: Option<String>) -> Self {
        ListTarget::Custom {
            imdb_list_id: imdb_list_id.into(),
            name: name.into(),
            trakt_list_id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ListTarget::Watchlist { .. } => WATCHLIST_NAME,
            ListTarget::Custom { name, .. } => name,
        }
    }

    pub fn imdb_list_id(&self) -> &str {
        match self {
            ListTarget::Watchlist { imdb_list_id } | ListTarget::Custom { imdb_list_id, .. } => imdb_list_id,
        }
    }

    pub fn trakt_list_id(&self) -> Option<&str> {
        match self {
            ListTarget::Watchlist { .. } => None,
            ListTarget::Custom { trakt_list_id, .. } => trakt_list_id.as_deref(),
        }
    }

    pub fn is_watchlist(&self) -> bool {
        matches!(self, ListTarget::Watchlist { .. })
    }
}

/// Source membership next to the destination membership of the same logical collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataPair {
    pub imdb_items: Vec<ImdbItem>,
    pub trakt_items: Vec<TraktItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPair {
    pub target: ListTarget,
    pub items: DataPair,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watchlist_target_uses_sentinel_name() {
        let target = ListTarget::watchlist("ls000000001");
        assert_eq!(target.name(), WATCHLIST_NAME);
        assert!(target.is_watchlist());
        assert_eq!(target.imdb_list_id(), "ls000000001");
    }

    #[test]
    fn test_custom_target_keeps_assigned_slug() {
        let target = ListTarget::custom("ls000000002", "Фильмы", Some("filmy".to_string()));
        assert_eq!(target.name(), "Фильмы");
        assert_eq!(target.trakt_list_id(), Some("filmy"));
        assert!(!target.is_watchlist());
    }

    #[test]
    fn test_uncreated_target_has_no_slug() {
        let target = ListTarget::custom("ls000000003", "Date Night", None);
        assert_eq!(target.trakt_list_id(), None);
        assert_eq!(ListTarget::watchlist("ls000000001").trakt_list_id(), None);
    }
}
