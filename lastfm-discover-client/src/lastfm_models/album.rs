use serde::Deserialize;

use super::{OneOrMany, RawImage, null_as_default};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawAlbum {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artist: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default)]
    pub mbid: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: OneOrMany<RawImage>,
}
