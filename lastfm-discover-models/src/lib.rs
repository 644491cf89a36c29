use std::fmt;

/// Size label Last.fm attaches to every image variant.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Small,
    Medium,
    Large,
    Extralarge,
    Mega,
    #[default]
    #[serde(rename = "", other)]
    Unknown,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Small => "small",
            ImageSize::Medium => "medium",
            ImageSize::Large => "large",
            ImageSize::Extralarge => "extralarge",
            ImageSize::Mega => "mega",
            ImageSize::Unknown => "",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Image {
    pub url: String,
    pub size: ImageSize,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Tag {
    pub name: String,
    pub url: String,
}

/// The artist a track points at. Last.fm sends either a bare name or an
/// embedded record; both end up here.
#[derive(Default, Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct ArtistRef {
    pub name: String,
    pub url: Option<String>,
    pub mbid: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Artist {
    pub name: String,
    pub url: String,
    pub mbid: Option<String>,
    pub images: Vec<Image>,
    pub listeners: Option<String>,
    pub playcount: Option<String>,
    pub tags: Vec<Tag>,
}

impl Artist {
    pub fn with_tags(self, tags: Vec<Tag>) -> Self {
        Self { tags, ..self }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Track {
    pub name: String,
    pub url: String,
    pub artist: ArtistRef,
    pub mbid: Option<String>,
    pub images: Vec<Image>,
    pub duration: Option<String>,
    pub listeners: Option<String>,
    pub playcount: Option<String>,
    pub tags: Vec<Tag>,
}

impl Track {
    pub fn artist_name(&self) -> &str {
        &self.artist.name
    }

    pub fn with_tags(self, tags: Vec<Tag>) -> Self {
        Self { tags, ..self }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Album {
    pub name: String,
    pub artist: String,
    pub url: String,
    pub mbid: Option<String>,
    pub images: Vec<Image>,
}

/// Kind of a normalized entity, used to pick placeholder schemes and labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Artist,
    Album,
    Track,
}

/// Shared read access over the three entity types.
pub trait Entity {
    const KIND: EntityKind;

    fn display_name(&self) -> &str;
    fn subtitle(&self) -> Option<&str>;
    fn url(&self) -> &str;
    fn images(&self) -> &[Image];
    fn tags(&self) -> &[Tag];
}

impl Entity for Artist {
    const KIND: EntityKind = EntityKind::Artist;

    fn display_name(&self) -> &str {
        &self.name
    }

    fn subtitle(&self) -> Option<&str> {
        None
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn images(&self) -> &[Image] {
        &self.images
    }

    fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

impl Entity for Track {
    const KIND: EntityKind = EntityKind::Track;

    fn display_name(&self) -> &str {
        &self.name
    }

    fn subtitle(&self) -> Option<&str> {
        Some(self.artist_name())
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn images(&self) -> &[Image] {
        &self.images
    }

    fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

impl Entity for Album {
    const KIND: EntityKind = EntityKind::Album;

    fn display_name(&self) -> &str {
        &self.name
    }

    fn subtitle(&self) -> Option<&str> {
        Some(&self.artist)
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn images(&self) -> &[Image] {
        &self.images
    }

    fn tags(&self) -> &[Tag] {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_size_accepts_unknown_labels() {
        let sizes: Vec<ImageSize> =
            serde_json::from_str(r#"["small", "extralarge", "", "huge"]"#).unwrap();

        assert_eq!(
            sizes,
            vec![
                ImageSize::Small,
                ImageSize::Extralarge,
                ImageSize::Unknown,
                ImageSize::Unknown
            ]
        );
    }

    #[test]
    fn with_tags_replaces_the_whole_list() {
        let track = Track {
            name: "Shadow".into(),
            tags: vec![Tag {
                name: "old".into(),
                url: String::new(),
            }],
            ..Default::default()
        };

        let tagged = track.with_tags(vec![]);

        assert_eq!(tagged.name, "Shadow");
        assert!(tagged.tags.is_empty());
    }
}
