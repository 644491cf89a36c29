use serde::Deserialize;

use super::{OneOrMany, RawArtistRef, RawImage, lenient_string, null_as_default};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawTrack {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    pub artist: RawArtistRef,
    #[serde(default)]
    pub mbid: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: OneOrMany<RawImage>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub listeners: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub playcount: Option<String>,
}
