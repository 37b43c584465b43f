//! Set difference between the IMDb and Trakt sides of a pair.
//!
//! Membership is decided by IMDb id alone. Nothing here performs I/O or fails:
//! unknown IMDb title types fall back to movies and Trakt entries that are not
//! movies, shows or episodes are ignored on both sides.

use std::collections::HashSet;
use listsync_models::{DataPair, ImdbItem, TitleType, TraktIds, TraktItem, TraktItemKind, TraktItemSpec};
use serde::Serialize;
use tracing::debug;

/// Writes needed to converge the Trakt side of a pair onto the IMDb side
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Difference {
    pub add: Vec<TraktItem>,
    pub remove: Vec<TraktItem>,
}

impl Difference {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

/// Trakt category for an IMDb title type
pub fn trakt_kind(title_type: &TitleType) -> TraktItemKind {
    match title_type {
        TitleType::Movie => TraktItemKind::Movie,
        TitleType::TvSeries | TitleType::TvMiniSeries => TraktItemKind::Show,
        TitleType::TvEpisode => TraktItemKind::Episode,
        TitleType::Other(_) => TraktItemKind::Movie,
    }
}

/// Trakt-shaped copy of an IMDb item. A rated item is marked watched at its rating time.
pub fn to_trakt_item(item: &ImdbItem) -> TraktItem {
    let spec = TraktItemSpec {
        ids: TraktIds::imdb(item.id.clone()),
        rating: item.rating,
        rated_at: item.rated_at,
        watched_at: item.rated_at,
        ..TraktItemSpec::default()
    };
    TraktItem::new(trakt_kind(&item.title_type), spec)
}

/// Additions in IMDb order, removals in Trakt order
pub fn difference(pair: &DataPair) -> Difference {
    let on_trakt: HashSet<&str> = pair.trakt_items.iter().filter_map(TraktItem::imdb_id).collect();
    let add: Vec<TraktItem> = pair
        .imdb_items
        .iter()
        .filter(|item| !on_trakt.contains(item.id.as_str()))
        .map(to_trakt_item)
        .collect();

    let on_imdb: HashSet<&str> = pair.imdb_items.iter().map(|item| item.id.as_str()).collect();
    let remove: Vec<TraktItem> = pair
        .trakt_items
        .iter()
        .filter(|item| matches!(item.imdb_id(), Some(id) if !on_imdb.contains(id)))
        .cloned()
        .collect();

    debug!(
        imdb_items = pair.imdb_items.len(),
        trakt_items = pair.trakt_items.len(),
        add = add.len(),
        remove = remove.len(),
        "Computed difference"
    );

    Difference { add, remove }
}

#[cfg(test)]
mod tests;
