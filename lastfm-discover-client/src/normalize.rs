//! Reshapes decoded envelopes into display-ready entities.
//!
//! Absent containers are empty results. A bare object where a list was
//! expected is a one-element list. Items that fail to decode or lack a
//! required field are logged and skipped; the rest of the batch survives.

use lastfm_discover_models::{Album, Artist, ArtistRef, Image, Tag, Track};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    Result,
    client::Envelope,
    error::{Error, ItemError},
    lastfm_models::{RawAlbum, RawArtist, RawArtistRef, RawTag, RawTrack, non_empty},
};

pub fn top_artists(envelope: &Envelope) -> Result<Vec<Artist>> {
    normalize_batch(envelope, &["artists", "artist"], artist)
}

pub fn top_tracks(envelope: &Envelope) -> Result<Vec<Track>> {
    normalize_batch(envelope, &["tracks", "track"], track)
}

pub fn search_artists(envelope: &Envelope) -> Result<Vec<Artist>> {
    normalize_batch(envelope, &["results", "artistmatches", "artist"], artist)
}

pub fn search_albums(envelope: &Envelope) -> Result<Vec<Album>> {
    normalize_batch(envelope, &["results", "albummatches", "album"], album)
}

pub fn search_tracks(envelope: &Envelope) -> Result<Vec<Track>> {
    normalize_batch(envelope, &["results", "trackmatches", "track"], track)
}

/// Top tags of an artist or a track, at most `cap`, in API order.
pub fn top_tags(envelope: &Envelope, cap: usize) -> Result<Vec<Tag>> {
    let mut tags = normalize_batch(envelope, &["toptags", "tag"], tag)?;
    tags.truncate(cap);
    Ok(tags)
}

fn normalize_batch<R, T>(
    envelope: &Envelope,
    path: &[&str],
    convert: fn(R) -> Result<T, ItemError>,
) -> Result<Vec<T>>
where
    R: DeserializeOwned,
{
    let items = collection(envelope, path)?;

    let normalized = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let result = serde_json::from_value::<R>(item.clone())
                .map_err(|error| ItemError::Malformed {
                    message: error.to_string(),
                })
                .and_then(convert);

            match result {
                Ok(entity) => Some(entity),
                Err(error) => {
                    tracing::warn!(
                        method = envelope.method(),
                        index,
                        "Dropping item: {error}"
                    );
                    None
                }
            }
        })
        .collect();

    Ok(normalized)
}

/// Walks `path` through nested objects and returns the items at its end.
fn collection<'a>(envelope: &'a Envelope, path: &[&str]) -> Result<Vec<&'a Value>> {
    let Some((last, containers)) = path.split_last() else {
        return Ok(vec![]);
    };

    let mut current = envelope.body();
    for key in containers {
        match current.get(*key) {
            None | Some(Value::Null) => return Ok(vec![]),
            Some(value @ Value::Object(_)) => current = value,
            Some(other) => {
                return Err(Error::Decode {
                    method: envelope.method(),
                    message: format!("expected `{key}` to be an object, found {}", kind(other)),
                });
            }
        }
    }

    match current.get(*last) {
        None | Some(Value::Null) => Ok(vec![]),
        Some(Value::Array(items)) => Ok(items.iter().collect()),
        Some(item @ Value::Object(_)) => Ok(vec![item]),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(vec![]),
        Some(other) => Err(Error::Decode {
            method: envelope.method(),
            message: format!("expected `{last}` to be a list, found {}", kind(other)),
        }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn required_name(name: String) -> Result<String, ItemError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ItemError::MissingName);
    }
    Ok(name.to_string())
}

fn artist(raw: RawArtist) -> Result<Artist, ItemError> {
    Ok(Artist {
        name: required_name(raw.name)?,
        url: raw.url,
        mbid: non_empty(raw.mbid),
        images: raw.image.into_vec().into_iter().map(Image::from).collect(),
        listeners: raw.listeners,
        playcount: raw.playcount,
        tags: vec![],
    })
}

fn artist_ref(raw: RawArtistRef) -> Result<ArtistRef, ItemError> {
    let artist = match raw {
        RawArtistRef::Name(name) => ArtistRef {
            name,
            url: None,
            mbid: None,
        },
        RawArtistRef::Record(record) => ArtistRef {
            name: record.name,
            url: non_empty(record.url),
            mbid: non_empty(record.mbid),
        },
    };

    let name = artist.name.trim();
    if name.is_empty() {
        return Err(ItemError::MissingArtist);
    }

    Ok(ArtistRef {
        name: name.to_string(),
        ..artist
    })
}

fn track(raw: RawTrack) -> Result<Track, ItemError> {
    Ok(Track {
        name: required_name(raw.name)?,
        url: raw.url,
        artist: artist_ref(raw.artist)?,
        mbid: non_empty(raw.mbid),
        images: raw.image.into_vec().into_iter().map(Image::from).collect(),
        duration: raw.duration,
        listeners: raw.listeners,
        playcount: raw.playcount,
        tags: vec![],
    })
}

fn album(raw: RawAlbum) -> Result<Album, ItemError> {
    let name = required_name(raw.name)?;
    let artist = raw.artist.trim();
    if artist.is_empty() {
        return Err(ItemError::MissingArtist);
    }

    Ok(Album {
        name,
        artist: artist.to_string(),
        url: raw.url,
        mbid: non_empty(raw.mbid),
        images: raw.image.into_vec().into_iter().map(Image::from).collect(),
    })
}

fn tag(raw: RawTag) -> Result<Tag, ItemError> {
    Ok(Tag {
        name: required_name(raw.name)?,
        url: raw.url,
    })
}
