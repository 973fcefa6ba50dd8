/// Jikan (unofficial MyAnimeList API) client
///
/// Only the user animelist endpoint is used:
/// `/user/{username}/animelist/completed/{page}` → `{"anime": [{"mal_id": ..}, ..]}`.
/// Jikan asks callers to wait between requests; pacing is left to the caller.
use crate::{
    error::{AppError, AppResult},
    models::{ItemId, UserId},
    services::providers::CompletedListProvider,
};
use reqwest::{Client as HttpClient, Url};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct AnimeListPage {
    #[serde(default)]
    anime: Vec<AnimeListEntry>,
}

#[derive(Debug, Deserialize)]
struct AnimeListEntry {
    mal_id: ItemId,
}

#[derive(Clone)]
pub struct JikanClient {
    http_client: HttpClient,
    api_url: String,
}

impl JikanClient {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn completed_page_url(&self, user: &UserId, page: u32) -> AppResult<Url> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| AppError::ExternalApi(format!("Invalid Jikan API URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| AppError::ExternalApi("Jikan API URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push("user")
            .push(user.as_str())
            .push("animelist")
            .push("completed")
            .push(&page.to_string());

        Ok(url)
    }
}

#[async_trait::async_trait]
impl CompletedListProvider for JikanClient {
    async fn fetch_completed_page(&self, user: &UserId, page: u32) -> AppResult<Vec<ItemId>> {
        let url = self.completed_page_url(user, page)?;
        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Jikan API returned status {}: {}",
                status, body
            )));
        }

        let page_body: AnimeListPage = response.json().await?;
        let ids: Vec<ItemId> = page_body.anime.into_iter().map(|a| a.mal_id).collect();

        tracing::debug!(
            user = %user,
            page = page,
            items = ids.len(),
            provider = "jikan",
            "Completed list page fetched"
        );

        Ok(ids)
    }

    fn name(&self) -> &'static str {
        "jikan"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_completed_page_url() {
        let client = JikanClient::new("https://api.jikan.moe/v3/".to_string());
        assert_eq!(
            client
                .completed_page_url(&UserId::from("Xinil"), 2)
                .unwrap()
                .as_str(),
            "https://api.jikan.moe/v3/user/Xinil/animelist/completed/2"
        );
    }

    #[test]
    fn test_completed_page_url_encodes_username() {
        let client = JikanClient::new("https://api.jikan.moe/v3".to_string());
        let url = client
            .completed_page_url(&UserId::from("a?b/c#d"), 1)
            .unwrap();

        assert_eq!(url.path(), "/v3/user/a%3Fb%2Fc%23d/animelist/completed/1");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[tokio::test]
    async fn test_fetch_completed_page_username_stays_in_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/a%3Fb/animelist/completed/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "anime": [{"mal_id": 21}]
            })))
            .mount(&server)
            .await;

        let client = JikanClient::new(server.uri());
        let ids = client
            .fetch_completed_page(&UserId::from("a?b"), 1)
            .await
            .unwrap();

        assert_eq!(ids, vec![21]);
    }

    #[tokio::test]
    async fn test_fetch_completed_page_parses_ids() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/Xinil/animelist/completed/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "request_hash": "request:user:abc",
                "anime": [
                    {"mal_id": 1, "title": "Cowboy Bebop", "watching_status": 2},
                    {"mal_id": 5114, "title": "Fullmetal Alchemist: Brotherhood", "watching_status": 2}
                ]
            })))
            .mount(&server)
            .await;

        let client = JikanClient::new(server.uri());
        let ids = client
            .fetch_completed_page(&UserId::from("Xinil"), 1)
            .await
            .unwrap();

        assert_eq!(ids, vec![1, 5114]);
    }

    #[tokio::test]
    async fn test_fetch_completed_page_empty_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/Xinil/animelist/completed/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "anime": [] })))
            .mount(&server)
            .await;

        let client = JikanClient::new(server.uri());
        let ids = client
            .fetch_completed_page(&UserId::from("Xinil"), 3)
            .await
            .unwrap();

        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_completed_page_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("user not found"))
            .mount(&server)
            .await;

        let client = JikanClient::new(server.uri());
        let result = client
            .fetch_completed_page(&UserId::from("nobody"), 1)
            .await;

        match result {
            Err(AppError::ExternalApi(msg)) => assert!(msg.contains("404")),
            other => panic!("expected ExternalApi error, got {:?}", other),
        }
    }
}
