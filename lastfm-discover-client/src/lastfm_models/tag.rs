use serde::{Deserialize, Serialize};

use super::null_as_default;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTag {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}
