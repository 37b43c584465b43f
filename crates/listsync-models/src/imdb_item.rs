use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title classification as reported by IMDb.
///
/// Exports have used both the display labels ("TV Series") and the camel-case
/// identifiers ("tvSeries"); both spellings are accepted. Anything else is
/// preserved verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TitleType {
    Movie,
    TvSeries,
    TvMiniSeries,
    TvEpisode,
    Other(String),
}

impl TitleType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "movie" | "Movie" => TitleType::Movie,
            "tvSeries" | "TV Series" => TitleType::TvSeries,
            "tvMiniSeries" | "TV Mini Series" => TitleType::TvMiniSeries,
            "tvEpisode" | "TV Episode" => TitleType::TvEpisode,
            other => TitleType::Other(other.to_string()),
        }
    }
}

impl From<&str> for TitleType {
    fn from(raw: &str) -> Self {
        TitleType::parse(raw)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImdbItem {
    pub id: String, // tt-prefixed IMDb id, the cross-provider key
    pub title_type: TitleType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>, // 1-10
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rated_at: Option<DateTime<Utc>>,
}

impl ImdbItem {
    pub fn new(id: impl Into<String>, title_type: impl Into<TitleType>) -> Self {
        Self {
            id: id.into(),
            title_type: title_type.into(),
            rating: None,
            rated_at: None,
        }
    }

    pub fn with_rating(mut self, rating: u8, rated_at: DateTime<Utc>) -> Self {
        self.rating = Some(rating);
        self.rated_at = Some(rated_at);
        self
    }
}

/// Contents of one IMDb list (custom list or watchlist)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImdbList {
    pub id: String,
    pub name: String,
    pub items: Vec<ImdbItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_type_accepts_both_spellings() {
        assert_eq!(TitleType::parse("movie"), TitleType::Movie);
        assert_eq!(TitleType::parse("Movie"), TitleType::Movie);
        assert_eq!(TitleType::parse("TV Series"), TitleType::TvSeries);
        assert_eq!(TitleType::parse("tvMiniSeries"), TitleType::TvMiniSeries);
        assert_eq!(TitleType::parse(" tvEpisode "), TitleType::TvEpisode);
    }

    #[test]
    fn test_title_type_keeps_unknown_label() {
        assert_eq!(
            TitleType::parse("Video Game"),
            TitleType::Other("Video Game".to_string())
        );
        assert_eq!(TitleType::parse(""), TitleType::Other(String::new()));
    }
}
