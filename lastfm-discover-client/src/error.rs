use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Network error{}: {message}", status.map(|status| format!(" {status}")).unwrap_or_default()))]
    Transport {
        status: Option<u16>,
        message: String,
    },
    #[snafu(display("Last.fm API error {code}: {message}"))]
    Api { code: i64, message: String },
    #[snafu(display("Unexpected response for {method}: {message}"))]
    Decode {
        method: &'static str,
        message: String,
    },
    #[snafu(display("Last.fm API key is not configured"))]
    MissingApiKey,
    #[snafu(display("Invalid API base url {url}: {source}"))]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
}

impl Error {
    /// True for failures detected before any request was made.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::MissingApiKey | Error::InvalidBaseUrl { .. })
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Error::Transport {
            status: error.status().map(|status| status.as_u16()),
            message: error.to_string(),
        }
    }
}

/// Why a single item of a batch was dropped. Never escapes a batch.
#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum ItemError {
    #[snafu(display("malformed item: {message}"))]
    Malformed { message: String },
    #[snafu(display("item has no name"))]
    MissingName,
    #[snafu(display("item has no artist"))]
    MissingArtist,
}
