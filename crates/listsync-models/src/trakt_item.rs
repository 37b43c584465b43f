use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraktIds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trakt: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvdb: Option<u32>,
}

impl TraktIds {
    pub fn imdb(id: impl Into<String>) -> Self {
        Self {
            imdb: Some(id.into()),
            ..Self::default()
        }
    }
}

/// Per-item body shared by movies, shows and episodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraktItemSpec {
    pub ids: TraktIds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watched_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraktItemKind {
    Movie,
    Show,
    Episode,
}

impl TraktItemKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "movie" => Some(TraktItemKind::Movie),
            "show" => Some(TraktItemKind::Show),
            "episode" => Some(TraktItemKind::Episode),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TraktItemKind::Movie => "movie",
            TraktItemKind::Show => "show",
            TraktItemKind::Episode => "episode",
        }
    }

    /// Collection key used by Trakt sync payloads and history paths
    pub fn plural(&self) -> &'static str {
        match self {
            TraktItemKind::Movie => "movies",
            TraktItemKind::Show => "shows",
            TraktItemKind::Episode => "episodes",
        }
    }
}

/// An entry on the Trakt side of a pair.
///
/// Trakt only tracks movies, shows and episodes. Payloads of any other type
/// (people, seasons) are kept as `Unsupported` so callers can skip them
/// without losing the entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TraktItem {
    Movie(TraktItemSpec),
    Show(TraktItemSpec),
    Episode(TraktItemSpec),
    Unsupported { kind: String },
}

impl TraktItem {
    pub fn new(kind: TraktItemKind, spec: TraktItemSpec) -> Self {
        match kind {
            TraktItemKind::Movie => TraktItem::Movie(spec),
            TraktItemKind::Show => TraktItem::Show(spec),
            TraktItemKind::Episode => TraktItem::Episode(spec),
        }
    }

    pub fn kind(&self) -> Option<TraktItemKind> {
        match self {
            TraktItem::Movie(_) => Some(TraktItemKind::Movie),
            TraktItem::Show(_) => Some(TraktItemKind::Show),
            TraktItem::Episode(_) => Some(TraktItemKind::Episode),
            TraktItem::Unsupported { .. } => None,
        }
    }

    pub fn spec(&self) -> Option<&TraktItemSpec> {
        match self {
            TraktItem::Movie(spec) | TraktItem::Show(spec) | TraktItem::Episode(spec) => Some(spec),
            TraktItem::Unsupported { .. } => None,
        }
    }

    /// IMDb id of a supported item. Empty ids count as missing.
    pub fn imdb_id(&self) -> Option<&str> {
        self.spec()
            .and_then(|spec| spec.ids.imdb.as_deref())
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraktListIds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trakt: Option<u64>,
    pub slug: String,
}

/// A list owned by the Trakt user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraktList {
    pub name: String,
    pub ids: TraktListIds,
}
