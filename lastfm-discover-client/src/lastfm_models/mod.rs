//! Payload shapes as Last.fm sends them. Only the normalizer reads these.

mod album;
mod artist;
mod image;
mod tag;
mod track;

pub use album::*;
pub use artist::*;
pub use image::*;
pub use tag::*;
pub use track::*;

use serde::{Deserialize, Deserializer};

/// Last.fm collapses one-element lists into a bare object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// Counters arrive as strings, occasionally as numbers, sometimes empty.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Integer(u64),
        Float(f64),
    }

    let value = Option::<StringOrNumber>::deserialize(deserializer)?;

    Ok(match value {
        Some(StringOrNumber::String(value)) => Some(value.trim().to_string()),
        Some(StringOrNumber::Integer(value)) => Some(value.to_string()),
        Some(StringOrNumber::Float(value)) => Some(value.to_string()),
        None => None,
    }
    .filter(|value| !value.is_empty()))
}

/// Display-only fields are sometimes sent as `null`; treat that like absence.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
