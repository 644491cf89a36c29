//! Pure mapping from discovery state to what a UI should draw.

use lastfm_discover_client::image::entity_image;
use lastfm_discover_models::{Entity, EntityKind, Tag};

use crate::discovery::{DiscoveryState, Section, SectionState, View};

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Card {
    pub name: String,
    pub subtitle: Option<String>,
    pub image_url: String,
    pub link: String,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SectionBody {
    Loading { message: String },
    Error { message: String },
    Empty { message: String },
    Cards { cards: Vec<Card> },
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SectionView {
    pub section: Section,
    pub title: String,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PageView {
    pub search_enabled: bool,
    pub configuration_error: Option<String>,
    pub query: Option<String>,
    pub sections: Vec<SectionView>,
}

impl Section {
    pub fn kind(&self) -> EntityKind {
        match self {
            Section::PopularArtists | Section::SearchArtists => EntityKind::Artist,
            Section::SearchAlbums => EntityKind::Album,
            Section::PopularTracks | Section::SearchTracks => EntityKind::Track,
        }
    }

    pub fn title(&self, query: &str) -> String {
        match self {
            Section::PopularArtists => "Hot right now".to_string(),
            Section::PopularTracks => "Popular tracks".to_string(),
            Section::SearchArtists => format!("Artists found for \"{query}\""),
            Section::SearchAlbums => format!("Albums found for \"{query}\""),
            Section::SearchTracks => format!("Tracks found for \"{query}\""),
        }
    }
}

fn plural(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Artist => "artists",
        EntityKind::Album => "albums",
        EntityKind::Track => "tracks",
    }
}

pub fn card<E: Entity>(entity: &E) -> Card {
    Card {
        name: entity.display_name().to_string(),
        subtitle: entity.subtitle().map(str::to_string),
        image_url: entity_image(entity),
        link: entity.url().to_string(),
        tags: entity.tags().to_vec(),
    }
}

/// Loading wins over error, error over empty.
pub fn render_section<E: Entity>(
    section: Section,
    query: &str,
    state: &SectionState<E>,
) -> SectionView {
    let noun = plural(section.kind());

    let body = if state.loading {
        SectionBody::Loading {
            message: format!("Loading {noun}..."),
        }
    } else if let Some(error) = &state.error {
        SectionBody::Error {
            message: error.clone(),
        }
    } else if state.items.is_empty() {
        SectionBody::Empty {
            message: format!("No {noun} found."),
        }
    } else {
        SectionBody::Cards {
            cards: state.items.iter().map(card).collect(),
        }
    };

    SectionView {
        section,
        title: section.title(query),
        body,
    }
}

/// Renders one section regardless of which view is active.
pub fn render_named_section(state: &DiscoveryState, section: Section) -> SectionView {
    let query = state.search.query.as_str();

    match section {
        Section::PopularArtists => render_section(section, query, &state.popular.artists),
        Section::PopularTracks => render_section(section, query, &state.popular.tracks),
        Section::SearchArtists => render_section(section, query, &state.search.artists),
        Section::SearchAlbums => render_section(section, query, &state.search.albums),
        Section::SearchTracks => render_section(section, query, &state.search.tracks),
    }
}

/// Renders the sections of the active view.
pub fn render_page(state: &DiscoveryState) -> PageView {
    let (query, sections): (_, &[Section]) = match &state.view {
        View::Popular => (None, &Section::POPULAR),
        View::Search { query } => (Some(query.clone()), &Section::SEARCH),
    };

    PageView {
        search_enabled: state.search_enabled(),
        configuration_error: state.configuration_error.clone(),
        query,
        sections: sections
            .iter()
            .map(|section| render_named_section(state, *section))
            .collect(),
    }
}
