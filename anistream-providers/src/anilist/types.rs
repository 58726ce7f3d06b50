//! Wire types for the AniList GraphQL API.

use anistream_core::model::{Title, TitleId};
use serde::Deserialize;

/// Generic GraphQL envelope. AniList returns `data: null` plus an
/// `errors` array on failure, with HTTP 200.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// `data` shape for listing queries (`Page.media`).
#[derive(Debug, Deserialize)]
pub struct PageData {
    #[serde(rename = "Page")]
    pub page: Page,
}

#[derive(Debug, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub media: Vec<MediaEntry>,
}

/// `data` shape for the single-title detail query.
#[derive(Debug, Deserialize)]
pub struct MediaData {
    #[serde(rename = "Media")]
    pub media: MediaEntry,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaEntry {
    pub id: i64,
    #[serde(default)]
    pub title: MediaTitle,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub cover_image: Option<CoverImage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MediaTitle {
    #[serde(default)]
    pub english: Option<String>,
    #[serde(default)]
    pub romaji: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CoverImage {
    #[serde(default)]
    pub large: Option<String>,
}

impl MediaEntry {
    /// Map into the core title model, preferring the English title over
    /// the romaji one.
    #[must_use]
    pub fn into_title(self) -> Title {
        let id = TitleId(self.id);
        let display_name = self
            .title
            .english
            .or(self.title.romaji)
            .unwrap_or_else(|| format!("Title {id}"));
        Title {
            id,
            display_name,
            episode_count_hint: self.episodes,
            cover_art: self.cover_image.and_then(|c| c.large),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_prefers_english_over_romaji() {
        let entry: MediaEntry = serde_json::from_str(
            r#"{
                "id": 21,
                "title": {"english": "One Piece", "romaji": "One Piece (romaji)"},
                "episodes": 1000,
                "coverImage": {"large": "https://img.example.com/21.jpg"}
            }"#,
        )
        .expect("valid payload");

        let title = entry.into_title();
        assert_eq!(title.id, TitleId(21));
        assert_eq!(title.display_name, "One Piece");
        assert_eq!(title.episode_count_hint, Some(1000));
        assert_eq!(
            title.cover_art.as_deref(),
            Some("https://img.example.com/21.jpg")
        );
    }

    #[test]
    fn test_title_falls_back_to_romaji_then_id() {
        let entry: MediaEntry =
            serde_json::from_str(r#"{"id": 5, "title": {"romaji": "Gintama"}}"#)
                .expect("valid payload");
        assert_eq!(entry.into_title().display_name, "Gintama");

        let entry: MediaEntry =
            serde_json::from_str(r#"{"id": 5, "title": {}}"#).expect("valid payload");
        assert_eq!(entry.into_title().display_name, "Title 5");
    }
}
