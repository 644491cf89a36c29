use lastfm_discover_models::{Image, ImageSize};
use serde::{Deserialize, Serialize};

use super::null_as_default;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawImage {
    #[serde(rename = "#text", default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: ImageSize,
}

impl From<RawImage> for Image {
    fn from(value: RawImage) -> Self {
        Self {
            url: value.url.trim().to_string(),
            size: value.size,
        }
    }
}
