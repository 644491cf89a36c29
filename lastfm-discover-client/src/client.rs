use lastfm_discover_models::{Album, Artist, Tag, Track};
use reqwest::StatusCode;
use serde_json::Value;
use snafu::prelude::*;

use crate::{
    Result,
    config::ApiConfig,
    error::{ApiSnafu, DecodeSnafu, Error, InvalidBaseUrlSnafu, TransportSnafu},
    normalize,
    operation::{MAX_TAGS, Operation},
};

/// A decoded response body, before anything is extracted from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    method: &'static str,
    body: Value,
}

impl Envelope {
    pub fn new(method: &'static str, body: Value) -> Self {
        Self { method, body }
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    pub fn body(&self) -> &Value {
        &self.body
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: url::Url,
    config: ApiConfig,
}

impl Client {
    pub fn new(config: ApiConfig) -> Result<Self> {
        config.validate()?;

        let base_url = url::Url::parse(config.base_url()).context(InvalidBaseUrlSnafu {
            url: config.base_url(),
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        tracing::debug!(base_url = %base_url, "Initialized Last.fm client");

        Ok(Self {
            http,
            base_url,
            config,
        })
    }

    /// Issues one GET and returns the envelope untouched when it is well
    /// formed and carries no embedded error. Never retries.
    #[tracing::instrument(skip_all, fields(method = operation.method()))]
    pub async fn perform_request(&self, operation: &Operation) -> Result<Envelope> {
        let mut parameters = operation.parameters();
        tracing::debug!(?parameters, "Requesting");

        parameters.push(("api_key", self.config.api_key().to_string()));
        parameters.push(("format", "json".to_string()));

        let response = self
            .http
            .get(self.base_url.clone())
            .query(&parameters)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        parse_body(operation.method(), status, &body)
    }

    pub async fn top_artists(&self, limit: u32) -> Result<Vec<Artist>> {
        let envelope = self
            .perform_request(&Operation::TopArtists { limit })
            .await?;
        normalize::top_artists(&envelope)
    }

    pub async fn top_tracks(&self, limit: u32) -> Result<Vec<Track>> {
        let envelope = self.perform_request(&Operation::TopTracks { limit }).await?;
        normalize::top_tracks(&envelope)
    }

    pub async fn search_artists(&self, query: &str, limit: u32) -> Result<Vec<Artist>> {
        let envelope = self
            .perform_request(&Operation::SearchArtists {
                query: query.to_string(),
                limit,
            })
            .await?;
        normalize::search_artists(&envelope)
    }

    pub async fn search_albums(&self, query: &str, limit: u32) -> Result<Vec<Album>> {
        let envelope = self
            .perform_request(&Operation::SearchAlbums {
                query: query.to_string(),
                limit,
            })
            .await?;
        normalize::search_albums(&envelope)
    }

    pub async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>> {
        let envelope = self
            .perform_request(&Operation::SearchTracks {
                query: query.to_string(),
                limit,
            })
            .await?;
        normalize::search_tracks(&envelope)
    }

    pub async fn artist_tags(&self, artist: &str) -> Result<Vec<Tag>> {
        let envelope = self.perform_request(&Operation::artist_tags(artist)).await?;
        normalize::top_tags(&envelope, MAX_TAGS)
    }

    pub async fn track_tags(&self, artist: &str, track: &str) -> Result<Vec<Tag>> {
        let envelope = self
            .perform_request(&Operation::track_tags(artist, track))
            .await?;
        normalize::top_tags(&envelope, MAX_TAGS)
    }
}

fn parse_body(method: &'static str, status: StatusCode, body: &str) -> Result<Envelope> {
    if !status.is_success() {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| value.get("message")?.as_str().map(str::to_string))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string()
            });

        return TransportSnafu {
            status: Some(status.as_u16()),
            message,
        }
        .fail();
    }

    let value: Value = serde_json::from_str(body).map_err(|error| Error::Decode {
        method,
        message: error.to_string(),
    })?;

    ensure!(
        value.is_object(),
        DecodeSnafu {
            method,
            message: "expected a JSON object",
        }
    );

    if let Some(code) = value.get("error").filter(|code| !code.is_null()) {
        let code = code
            .as_i64()
            .or_else(|| code.as_str().and_then(|code| code.parse().ok()))
            .unwrap_or_default();
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        return ApiSnafu { code, message }.fail();
    }

    Ok(Envelope::new(method, value))
}
