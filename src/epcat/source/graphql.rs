//! GraphQL page source — fetches episode pages from a GraphQL endpoint.
//!
//! Uses `ureq` (sync) wrapped in `tokio::task::spawn_blocking` to avoid
//! blocking the async runtime.

use super::{FetchedPage, PageSource};
use crate::error::{EpcatError, Result};
use crate::model::{PageInfo, ServerEpisode};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const EPISODES_QUERY: &str = r#"
  query GetEpisodes($page: Int) {
    episodes(page: $page) {
      info {
        count
        pages
        next
        prev
      }
      results {
        id
        name
        air_date
        episode
        characters {
          id
          name
          status
          species
          image
        }
      }
    }
  }
"#;

pub struct GraphqlSource {
    url: String,
    agent: ureq::Agent,
}

impl GraphqlSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            url: url.into(),
            agent,
        }
    }

    fn request_body(page: u32) -> serde_json::Value {
        serde_json::json!({
            "query": EPISODES_QUERY,
            "variables": { "page": page },
        })
    }
}

#[async_trait]
impl PageSource for GraphqlSource {
    async fn fetch_page(&self, page: u32) -> Result<FetchedPage> {
        let url = self.url.clone();
        let agent = self.agent.clone();
        let body = Self::request_body(page);
        debug!(%url, page, "requesting episode page");

        let value = tokio::task::spawn_blocking(move || -> Result<serde_json::Value> {
            let response = agent
                .post(&url)
                .header("Content-Type", "application/json")
                .send_json(&body)
                .map_err(|e| EpcatError::Source(e.to_string()))?;

            response
                .into_body()
                .read_json()
                .map_err(|e| EpcatError::Source(format!("failed to parse response as JSON: {}", e)))
        })
        .await
        .map_err(|e| EpcatError::Source(format!("task join error: {}", e)))??;

        parse_response(value)
    }
}

#[derive(Deserialize)]
struct GraphqlResponse {
    data: Option<EpisodesData>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Deserialize)]
struct EpisodesData {
    episodes: Option<EpisodesPage>,
}

#[derive(Deserialize)]
struct EpisodesPage {
    info: WireInfo,
    #[serde(default)]
    results: Option<Vec<ServerEpisode>>,
}

#[derive(Deserialize)]
struct WireInfo {
    count: Option<u32>,
    pages: Option<u32>,
    next: Option<u32>,
    prev: Option<u32>,
}

/// Decode a GraphQL response body into a page.
pub fn parse_response(value: serde_json::Value) -> Result<FetchedPage> {
    let response: GraphqlResponse = serde_json::from_value(value)
        .map_err(|e| EpcatError::Source(format!("unexpected response shape: {}", e)))?;

    if let Some(errors) = response.errors.filter(|errs| !errs.is_empty()) {
        let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
        return Err(EpcatError::Source(messages.join("; ")));
    }

    let episodes = response
        .data
        .and_then(|d| d.episodes)
        .ok_or_else(|| EpcatError::Source("response has no episodes".to_string()))?;

    Ok(FetchedPage {
        records: episodes.results.unwrap_or_default(),
        info: PageInfo {
            total_pages: episodes.info.pages.unwrap_or(1),
            total_records: episodes.info.count.unwrap_or(0),
            has_next: episodes.info.next.is_some(),
            has_prev: episodes.info.prev.is_some(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CharacterStatus;
    use serde_json::json;

    #[test]
    fn parses_a_page_in_result_order() {
        let body = json!({
            "data": {
                "episodes": {
                    "info": { "count": 51, "pages": 3, "next": 3, "prev": 1 },
                    "results": [
                        {
                            "id": "21",
                            "name": "The Wedding Squanchers",
                            "air_date": "October 4, 2015",
                            "episode": "S02E10",
                            "characters": [
                                { "id": "1", "name": "Rick Sanchez", "status": "Alive",
                                  "species": "Human", "image": "https://example.invalid/1.jpeg" },
                                { "id": "331", "name": "Squanchy", "status": "unknown",
                                  "species": "Cat-Person", "image": "https://example.invalid/331.jpeg" }
                            ]
                        },
                        {
                            "id": "22",
                            "name": "The Rickshank Rickdemption",
                            "air_date": "April 1, 2017",
                            "episode": "S03E01",
                            "characters": []
                        }
                    ]
                }
            }
        });

        let page = parse_response(body).unwrap();
        assert_eq!(page.ids(), vec!["21", "22"]);
        assert_eq!(page.records[0].code, "S02E10");
        assert_eq!(page.records[0].characters[1].status, CharacterStatus::Unknown);
        assert_eq!(
            page.info,
            PageInfo {
                total_pages: 3,
                total_records: 51,
                has_next: true,
                has_prev: true,
            }
        );
    }

    #[test]
    fn null_links_mean_no_neighbours() {
        let body = json!({
            "data": { "episodes": {
                "info": { "count": 1, "pages": 1, "next": null, "prev": null },
                "results": []
            }}
        });
        let page = parse_response(body).unwrap();
        assert!(!page.info.has_next);
        assert!(!page.info.has_prev);
        assert!(page.records.is_empty());
    }

    #[test]
    fn graphql_errors_become_source_errors() {
        let body = json!({
            "errors": [{ "message": "page out of range" }],
            "data": { "episodes": null }
        });
        let err = parse_response(body).unwrap_err();
        assert!(matches!(err, EpcatError::Source(ref m) if m.contains("page out of range")));
    }

    #[test]
    fn missing_episodes_is_an_error() {
        let err = parse_response(json!({ "data": null })).unwrap_err();
        assert!(matches!(err, EpcatError::Source(_)));
    }

    #[test]
    fn request_body_carries_page_variable() {
        let body = GraphqlSource::request_body(4);
        assert_eq!(body["variables"]["page"], 4);
        assert!(body["query"].as_str().unwrap().contains("episodes(page: $page)"));
    }
}
