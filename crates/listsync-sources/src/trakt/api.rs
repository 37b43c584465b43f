//! Trakt wire format: response entries and batched sync payloads.

use chrono::{DateTime, SecondsFormat, Utc};
use listsync_models::{TraktIds, TraktItem, TraktItemKind, TraktItemSpec};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
struct TraktMedia {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    ids: TraktIds,
}

/// One entry of a list, watchlist, ratings or history response
#[derive(Debug, Deserialize)]
pub struct TraktEntry {
    #[serde(rename = "type")]
    item_type: String,
    movie: Option<TraktMedia>,
    show: Option<TraktMedia>,
    episode: Option<TraktMedia>,
    rating: Option<u8>,
    rated_at: Option<DateTime<Utc>>,
    watched_at: Option<DateTime<Utc>>,
}

impl From<TraktEntry> for TraktItem {
    fn from(entry: TraktEntry) -> Self {
        let kind = TraktItemKind::parse(&entry.item_type);
        // Episode entries also carry their show; the episode is the item
        let media = match kind {
            Some(TraktItemKind::Movie) => entry.movie,
            Some(TraktItemKind::Show) => entry.show,
            Some(TraktItemKind::Episode) => entry.episode,
            None => None,
        };

        match (kind, media) {
            (Some(kind), Some(media)) => {
                let mut ids = media.ids;
                ids.imdb = ids.imdb.map(|id| remove_slashes(&id));
                TraktItem::new(
                    kind,
                    TraktItemSpec {
                        ids,
                        title: media.title,
                        rating: entry.rating,
                        rated_at: entry.rated_at,
                        watched_at: entry.watched_at,
                    },
                )
            }
            _ => TraktItem::Unsupported {
                kind: entry.item_type,
            },
        }
    }
}

/// Trakt sometimes returns IMDb ids with slashes in them
fn remove_slashes(id: &str) -> String {
    id.replace('/', "")
}

fn timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Group items into the `movies` / `shows` / `episodes` arrays the sync endpoints expect.
///
/// Unsupported items are left out.
pub fn sync_payload(items: &[TraktItem]) -> Value {
    let mut movies = Vec::new();
    let mut shows = Vec::new();
    let mut episodes = Vec::new();

    for item in items {
        let (Some(kind), Some(spec)) = (item.kind(), item.spec()) else {
            continue;
        };

        let mut entry = json!({ "ids": spec.ids });
        if let Some(rating) = spec.rating {
            entry["rating"] = json!(rating);
        }
        if let Some(rated_at) = &spec.rated_at {
            entry["rated_at"] = json!(timestamp(rated_at));
        }
        if let Some(watched_at) = &spec.watched_at {
            entry["watched_at"] = json!(timestamp(watched_at));
        }

        match kind {
            TraktItemKind::Movie => movies.push(entry),
            TraktItemKind::Show => shows.push(entry),
            TraktItemKind::Episode => episodes.push(entry),
        }
    }

    json!({
        "movies": movies,
        "shows": shows,
        "episodes": episodes
    })
}
