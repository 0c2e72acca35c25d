// Gateway response types. The upstream catalog owns this data model; only the
// fields the pages read are declared, and nearly all of them are optional.

use crate::error::PageError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// The `{ ok, data, pagination? }` wrapper every gateway response uses.
#[derive(Debug, Clone)]
pub struct Envelope<T> {
    pub data: T,
    pub pagination: Option<Pagination>,
}

impl<T: serde::de::DeserializeOwned> Envelope<T> {
    /// Check `ok == true` and a present `data`, then read `data` as `T`.
    pub fn from_value(value: Value) -> Result<Self, PageError> {
        let Value::Object(mut root) = value else {
            return Err(PageError::shape("response is not a JSON object"));
        };

        if root.get("ok").and_then(Value::as_bool) != Some(true) {
            return Err(PageError::shape("envelope `ok` is missing or false"));
        }

        let data = match root.remove("data") {
            Some(Value::Null) | None => return Err(PageError::shape("envelope `data` is missing")),
            Some(data) => data,
        };

        // A malformed pagination block is treated as absent rather than fatal.
        let pagination = root
            .remove("pagination")
            .filter(|p| !p.is_null())
            .and_then(|p| serde_json::from_value(p).ok());

        let data = serde_json::from_value(data)?;
        Ok(Self { data, pagination })
    }
}

/// Reads a string, number or bool as text; anything else is `None`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Like `lenient_text`, with null and unreadable values as the empty string.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

/// Reads a bool; null or any other type is `false`.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(matches!(value, Some(Value::Bool(true))))
}

/// Reads a page number that may arrive as a number, a numeric string or null.
fn lenient_page<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_page(deserializer)?.unwrap_or(0))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default, deserialize_with = "lenient_count")]
    pub current_page: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_pages: u32,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub has_prev_page: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub has_next_page: bool,
    #[serde(default, deserialize_with = "lenient_page")]
    pub prev_page: Option<u32>,
    #[serde(default, deserialize_with = "lenient_page")]
    pub next_page: Option<u32>,
}

/// Anime in a grid or list context.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeSummary {
    #[serde(default, deserialize_with = "lenient_string")]
    pub anime_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub poster: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub episodes: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub release_day: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub latest_release_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub score: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub last_release_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    #[serde(default, deserialize_with = "lenient_string")]
    pub genre_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
}

/// `data` for ongoing, completed, genre and search pages.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeListData {
    pub anime_list: Vec<AnimeSummary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeSection {
    #[serde(default)]
    pub anime_list: Vec<AnimeSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HomeData {
    pub ongoing: HomeSection,
    pub completed: HomeSection,
}

/// One alphabetical group of the all-anime index.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeGroup {
    #[serde(default, deserialize_with = "lenient_text")]
    pub start_with: Option<String>,
    #[serde(default)]
    pub anime_list: Vec<AnimeSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimeIndexData {
    pub list: Vec<AnimeGroup>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreListData {
    pub genre_list: Vec<Genre>,
}

/// Synopsis arrives either as plain text or as `{ paragraphs: [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Synopsis {
    Paragraphs {
        #[serde(default)]
        paragraphs: Vec<String>,
    },
    Text(String),
}

impl Synopsis {
    pub fn paragraphs(&self) -> Vec<&str> {
        match self {
            Synopsis::Paragraphs { paragraphs } => paragraphs
                .iter()
                .map(String::as_str)
                .filter(|p| !p.trim().is_empty())
                .collect(),
            Synopsis::Text(text) if !text.trim().is_empty() => vec![text.as_str()],
            Synopsis::Text(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeRef {
    #[serde(default, deserialize_with = "lenient_string")]
    pub episode_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeDetail {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub poster: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub japanese: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub score: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_text")]
    pub anime_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub episodes: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub aired: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub studios: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub producers: Option<String>,
    #[serde(default)]
    pub synopsis: Option<Synopsis>,
    #[serde(default)]
    pub genre_list: Vec<Genre>,
    #[serde(default)]
    pub episode_list: Vec<EpisodeRef>,
    #[serde(default)]
    pub recommended_anime_list: Vec<AnimeSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerRef {
    #[serde(default, deserialize_with = "lenient_string")]
    pub server_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerQuality {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default)]
    pub server_list: Vec<ServerRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServerGroup {
    #[serde(default)]
    pub qualities: Vec<ServerQuality>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DownloadLink {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DownloadQuality {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub size: Option<String>,
    #[serde(default)]
    pub urls: Vec<DownloadLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DownloadGroup {
    #[serde(default)]
    pub qualities: Vec<DownloadQuality>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeInfo {
    #[serde(default)]
    pub genre_list: Vec<Genre>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeData {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub anime_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub release_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub default_streaming_url: Option<String>,
    #[serde(default)]
    pub server: Option<ServerGroup>,
    #[serde(default)]
    pub download_url: Option<DownloadGroup>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub has_prev_episode: bool,
    #[serde(default)]
    pub prev_episode: Option<EpisodeRef>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub has_next_episode: bool,
    #[serde(default)]
    pub next_episode: Option<EpisodeRef>,
    #[serde(default)]
    pub info: Option<EpisodeInfo>,
}

/// `data` for `server/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerEmbed {
    #[serde(default, deserialize_with = "lenient_text")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub redirect_url: Option<String>,
}

/// Older batch payloads use `title` and `poster`; the newer names win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchData {
    #[serde(default, deserialize_with = "lenient_text")]
    pub anime_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub anime_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub poster: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(default)]
    pub synopsis: Option<Synopsis>,
    #[serde(default)]
    pub download_links: Option<BTreeMap<String, String>>,
}

impl BatchData {
    pub fn display_title(&self) -> Option<&str> {
        self.anime_title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or(self.title.as_deref())
    }

    pub fn cover(&self) -> Option<&str> {
        self.thumbnail
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or(self.poster.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_requires_ok_and_data() {
        let missing_ok = json!({ "data": { "animeList": [] } });
        assert!(Envelope::<AnimeListData>::from_value(missing_ok).is_err());

        let not_ok = json!({ "ok": false, "data": { "animeList": [] } });
        assert!(Envelope::<AnimeListData>::from_value(not_ok).is_err());

        let null_data = json!({ "ok": true, "data": null });
        assert!(Envelope::<AnimeListData>::from_value(null_data).is_err());

        let error_body = json!({ "error": "API eksternal gagal", "status": 500 });
        assert!(Envelope::<AnimeListData>::from_value(error_body).is_err());
    }

    #[test]
    fn test_missing_anime_list_is_shape_error() {
        let payload = json!({ "ok": true, "data": { "something": [] } });
        let err = Envelope::<AnimeListData>::from_value(payload).unwrap_err();
        assert!(err.is_shape());
    }

    #[test]
    fn test_lenient_fields() {
        let payload = json!({
            "ok": true,
            "data": { "animeList": [
                { "animeId": "a", "title": "A", "episodes": 12, "score": "7.5" },
                { "animeId": "b", "title": "B", "episodes": null, "poster": "" }
            ]},
            "pagination": { "currentPage": "2", "totalPages": 5, "hasPrevPage": true,
                            "prevPage": 1, "hasNextPage": true, "nextPage": "3" }
        });
        let envelope = Envelope::<AnimeListData>::from_value(payload).unwrap();
        let list = &envelope.data.anime_list;
        assert_eq!(list[0].episodes.as_deref(), Some("12"));
        assert_eq!(list[0].score.as_deref(), Some("7.5"));
        assert_eq!(list[1].episodes, None);

        let pagination = envelope.pagination.unwrap();
        assert_eq!(pagination.current_page, 2);
        assert_eq!(pagination.total_pages, 5);
        assert_eq!(pagination.next_page, Some(3));
    }

    #[test]
    fn test_null_fields_fall_back_to_defaults() {
        let payload = json!({
            "ok": true,
            "data": { "animeList": [
                { "animeId": "a", "title": "A" },
                { "animeId": "b", "title": null }
            ]}
        });
        let envelope = Envelope::<AnimeListData>::from_value(payload).unwrap();
        assert_eq!(envelope.data.anime_list.len(), 2);
        assert_eq!(envelope.data.anime_list[1].title, "");

        let episode: EpisodeData = serde_json::from_value(json!({
            "title": "Frieren Episode 1 Subtitle Indonesia",
            "hasPrevEpisode": null,
            "hasNextEpisode": true,
            "nextEpisode": { "episodeId": null, "title": "2" },
            "server": { "qualities": [{ "title": null, "serverList": [{ "serverId": "s1", "title": null }] }] }
        }))
        .unwrap();
        assert!(!episode.has_prev_episode);
        assert!(episode.has_next_episode);
        assert_eq!(episode.next_episode.unwrap().episode_id, "");
        assert_eq!(episode.anime_id, "");
    }

    #[test]
    fn test_batch_accepts_both_title_keys() {
        let payload = json!({
            "ok": true,
            "data": { "title": "Old", "animeTitle": "New", "poster": "/p.jpg", "thumbnail": "/t.jpg" }
        });
        let batch = Envelope::<BatchData>::from_value(payload).unwrap().data;
        assert_eq!(batch.display_title(), Some("New"));
        assert_eq!(batch.cover(), Some("/t.jpg"));

        let legacy: BatchData = serde_json::from_value(json!({ "title": "Old", "poster": "/p.jpg" })).unwrap();
        assert_eq!(legacy.display_title(), Some("Old"));
        assert_eq!(legacy.cover(), Some("/p.jpg"));
    }

    #[test]
    fn test_synopsis_forms() {
        let paragraphs: Synopsis =
            serde_json::from_value(json!({ "paragraphs": ["One", " ", "Two"] })).unwrap();
        assert_eq!(paragraphs.paragraphs(), vec!["One", "Two"]);

        let text: Synopsis = serde_json::from_value(json!("Plain")).unwrap();
        assert_eq!(text.paragraphs(), vec!["Plain"]);
    }
}
