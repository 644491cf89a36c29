use lastfm_discover_models::{Entity, EntityKind, Image, ImageSize};

/// Sizes tried in order before settling for any non-empty url.
pub const SIZE_PREFERENCE: [ImageSize; 4] = [
    ImageSize::Extralarge,
    ImageSize::Large,
    ImageSize::Medium,
    ImageSize::Small,
];

const PLACEHOLDER_HOST: &str = "https://via.placeholder.com";

/// Colour and pixel size of a generated placeholder image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    pub size: u32,
    pub background: &'static str,
    pub foreground: &'static str,
}

impl Placeholder {
    pub const ARTIST: Placeholder = Placeholder {
        size: 130,
        background: "DDDDDD",
        foreground: "808080",
    };

    pub const ALBUM: Placeholder = Placeholder {
        size: 150,
        background: "DDDDDD",
        foreground: "808080",
    };

    pub const TRACK: Placeholder = Placeholder {
        size: 64,
        background: "EEEEEE",
        foreground: "808080",
    };

    pub fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Artist => Self::ARTIST,
            EntityKind::Album => Self::ALBUM,
            EntityKind::Track => Self::TRACK,
        }
    }

    pub fn with_size(self, size: u32) -> Self {
        Self { size, ..self }
    }

    pub fn url(&self, label: &str) -> String {
        let text = urlencoding::encode(label);
        format!(
            "{PLACEHOLDER_HOST}/{}/{}/{}?text={text}",
            self.size, self.background, self.foreground
        )
    }
}

/// Picks exactly one url: the first size in `preference` that has a
/// non-empty url, else any non-empty url, else the placeholder.
pub fn resolve_image(
    images: &[Image],
    preference: &[ImageSize],
    fallback_label: &str,
    placeholder: Placeholder,
) -> String {
    let usable = |image: &&Image| !image.url.trim().is_empty();

    preference
        .iter()
        .find_map(|size| {
            images
                .iter()
                .filter(usable)
                .find(|image| image.size == *size)
        })
        .or_else(|| images.iter().find(usable))
        .map(|image| image.url.clone())
        .unwrap_or_else(|| placeholder.url(fallback_label))
}

pub fn entity_image<E: Entity>(entity: &E) -> String {
    resolve_image(
        entity.images(),
        &SIZE_PREFERENCE,
        entity.display_name(),
        Placeholder::for_kind(E::KIND),
    )
}
