use crate::domain::model::{MovieMetadata, POSTER_SENTINEL};
use crate::domain::ports::MetadataLookup;
use crate::utils::error::Result;
use crate::utils::validation::{MAX_RATING, MIN_RATING};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_LOOKUP_ENDPOINT: &str = "http://www.omdbapi.com/";

/// Client for an OMDb-compatible movie information API.
pub struct OmdbClient {
    endpoint: String,
    api_key: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbRating {
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbResponse {
    title: Option<String>,
    year: Option<String>,
    #[serde(default)]
    ratings: Vec<OmdbRating>,
    poster: Option<String>,
    response: Option<String>,
    error: Option<String>,
}

impl OmdbClient {
    pub fn new(endpoint: String, api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint,
            api_key,
            client,
        })
    }
}

/// Years such as "2010–2012" keep their leading digits; anything else is 0.
pub(crate) fn parse_year(raw: &str) -> i32 {
    let raw = raw.trim();
    if let Ok(year) = raw.parse() {
        return year;
    }
    let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
    match digits.parse() {
        Ok(year) => year,
        Err(_) => {
            tracing::warn!("Invalid date on movie retrieval, substituted with 0: {:?}", raw);
            0
        }
    }
}

/// First rating source, value before the slash ("8.8/10"). Values outside
/// the catalog's rating scale are substituted with 0.
fn parse_rating(ratings: &[OmdbRating]) -> f64 {
    let Some(first) = ratings.first() else {
        return 0.0;
    };
    let value = first.value.split('/').next().unwrap_or_default().trim();
    match value.parse::<f64>() {
        Ok(rating) if rating.is_finite() && (MIN_RATING..=MAX_RATING).contains(&rating) => rating,
        _ => {
            tracing::warn!("Invalid rating on movie retrieval, substituted with 0: {:?}", first.value);
            0.0
        }
    }
}

#[async_trait]
impl MetadataLookup for OmdbClient {
    async fn lookup(&self, title: &str) -> Result<Option<MovieMetadata>> {
        tracing::info!("Retrieving {} from OMDB", title);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("t", title), ("apikey", self.api_key.as_str())])
            .send()
            .await?;

        tracing::debug!("OMDB response status: {}", response.status());
        let response = response.error_for_status()?;
        let body: OmdbResponse = response.json().await?;

        if body.response.as_deref() == Some("False") {
            tracing::warn!(
                "Title missing or incorrect: {} ({})",
                title,
                body.error.as_deref().unwrap_or("no error message")
            );
            return Ok(None);
        }

        let Some(found_title) = body.title.filter(|t| !t.trim().is_empty()) else {
            tracing::warn!("Title missing or incorrect: {}", title);
            return Ok(None);
        };

        let metadata = MovieMetadata {
            title: found_title,
            year: parse_year(body.year.as_deref().unwrap_or_default()),
            rating: parse_rating(&body.ratings),
            poster_url: body.poster.unwrap_or_else(|| POSTER_SENTINEL.to_string()),
        };
        tracing::info!("Movie data retrieved for {}", metadata.title);
        Ok(Some(metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> OmdbClient {
        OmdbClient::new(server.url("/"), "test-key".to_string(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_parse_year_variants() {
        assert_eq!(parse_year("2010"), 2010);
        assert_eq!(parse_year("2010–2012"), 2010);
        assert_eq!(parse_year("N/A"), 0);
        assert_eq!(parse_year(""), 0);
    }

    #[test]
    fn test_parse_rating_variants() {
        let ratings = vec![OmdbRating {
            value: "8.8/10".to_string(),
        }];
        assert_eq!(parse_rating(&ratings), 8.8);
        let broken = vec![OmdbRating {
            value: "N/A".to_string(),
        }];
        assert_eq!(parse_rating(&broken), 0.0);
        assert_eq!(parse_rating(&[]), 0.0);
    }

    #[test]
    fn test_parse_rating_out_of_scale_is_zero() {
        for raw in ["74/100", "NaN/10", "inf/10", "-1/10"] {
            let ratings = vec![OmdbRating {
                value: raw.to_string(),
            }];
            assert_eq!(parse_rating(&ratings), 0.0, "{}", raw);
        }
    }

    #[tokio::test]
    async fn test_lookup_found() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/")
                .query_param("t", "inception")
                .query_param("apikey", "test-key");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "Title": "Inception",
                    "Year": "2010",
                    "Ratings": [{"Source": "Internet Movie Database", "Value": "8.8/10"}],
                    "Poster": "https://img.example/inception.jpg",
                    "Response": "True"
                }));
        });

        let metadata = client_for(&server).lookup("inception").await.unwrap().unwrap();

        api_mock.assert();
        assert_eq!(metadata.title, "Inception");
        assert_eq!(metadata.year, 2010);
        assert_eq!(metadata.rating, 8.8);
        assert_eq!(metadata.poster_url, "https://img.example/inception.jpg");
    }

    #[tokio::test]
    async fn test_lookup_not_found() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"Response": "False", "Error": "Movie not found!"}));
        });

        let result = client_for(&server).lookup("zzzz").await.unwrap();

        api_mock.assert();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_lookup_missing_poster_uses_sentinel() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"Title": "Heat", "Year": "1995", "Response": "True"}));
        });

        let metadata = client_for(&server).lookup("heat").await.unwrap().unwrap();

        assert_eq!(metadata.poster_url, "NA");
        assert_eq!(metadata.rating, 0.0);
    }

    #[tokio::test]
    async fn test_lookup_server_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(500);
        });

        let err = client_for(&server).lookup("heat").await.unwrap_err();

        assert!(matches!(err, crate::utils::error::CatalogError::ApiError(_)));
    }
}
