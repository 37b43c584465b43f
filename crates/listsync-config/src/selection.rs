use serde::{Deserialize, Serialize};
use std::fmt;

/// Environment variable that overrides `imdb.lists` from the config file
pub const IMDB_LIST_IDS_ENV: &str = "IMDB_LIST_IDS";

const ALL_LISTS: &str = "all";

/// Which IMDb lists take part in a sync pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ListSelection {
    /// Every list the IMDb user owns, discovered at sync time
    All,
    /// Explicit allow-list of IMDb list ids
    Ids(Vec<String>),
}

impl ListSelection {
    /// Parse `all` or a comma-separated id list. Blank entries and repeats are dropped.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case(ALL_LISTS) {
            return ListSelection::All;
        }

        let mut ids: Vec<String> = Vec::new();
        for id in raw.split(',').map(str::trim).filter(|id| !id.is_empty()) {
            if !ids.iter().any(|seen| seen == id) {
                ids.push(id.to_string());
            }
        }
        ListSelection::Ids(ids)
    }
}

impl Default for ListSelection {
    fn default() -> Self {
        ListSelection::All
    }
}

impl From<String> for ListSelection {
    fn from(raw: String) -> Self {
        ListSelection::parse(&raw)
    }
}

impl From<ListSelection> for String {
    fn from(selection: ListSelection) -> Self {
        selection.to_string()
    }
}

impl fmt::Display for ListSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListSelection::All => write!(f, "{}", ALL_LISTS),
            ListSelection::Ids(ids) => write!(f, "{}", ids.join(",")),
        }
    }
}
