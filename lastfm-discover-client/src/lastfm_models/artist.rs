use serde::{Deserialize, Serialize};

use super::{OneOrMany, RawImage, lenient_string, null_as_default};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawArtist {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default)]
    pub mbid: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: OneOrMany<RawImage>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub listeners: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub playcount: Option<String>,
}

/// Track payloads embed the artist either as a plain name or as a record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawArtistRef {
    Name(String),
    Record(RawArtistRecord),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawArtistRecord {
    #[serde(alias = "#text")]
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub mbid: Option<String>,
}
