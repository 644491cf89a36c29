pub const POPULAR_ARTISTS_LIMIT: u32 = 12;
pub const POPULAR_TRACKS_LIMIT: u32 = 18;
pub const SEARCH_RESULTS_LIMIT: u32 = 6;
pub const MAX_TAGS: usize = 3;

/// Every API call the application makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    TopArtists {
        limit: u32,
    },
    TopTracks {
        limit: u32,
    },
    SearchArtists {
        query: String,
        limit: u32,
    },
    SearchAlbums {
        query: String,
        limit: u32,
    },
    SearchTracks {
        query: String,
        limit: u32,
    },
    ArtistTags {
        artist: String,
        autocorrect: bool,
    },
    TrackTags {
        artist: String,
        track: String,
        autocorrect: bool,
    },
}

impl Operation {
    pub fn top_artists() -> Self {
        Operation::TopArtists {
            limit: POPULAR_ARTISTS_LIMIT,
        }
    }

    pub fn top_tracks() -> Self {
        Operation::TopTracks {
            limit: POPULAR_TRACKS_LIMIT,
        }
    }

    pub fn search_artists(query: &str) -> Self {
        Operation::SearchArtists {
            query: query.to_string(),
            limit: SEARCH_RESULTS_LIMIT,
        }
    }

    pub fn search_albums(query: &str) -> Self {
        Operation::SearchAlbums {
            query: query.to_string(),
            limit: SEARCH_RESULTS_LIMIT,
        }
    }

    pub fn search_tracks(query: &str) -> Self {
        Operation::SearchTracks {
            query: query.to_string(),
            limit: SEARCH_RESULTS_LIMIT,
        }
    }

    pub fn artist_tags(artist: &str) -> Self {
        Operation::ArtistTags {
            artist: artist.to_string(),
            autocorrect: false,
        }
    }

    pub fn track_tags(artist: &str, track: &str) -> Self {
        Operation::TrackTags {
            artist: artist.to_string(),
            track: track.to_string(),
            autocorrect: false,
        }
    }

    pub fn method(&self) -> &'static str {
        match self {
            Operation::TopArtists { .. } => "chart.getTopArtists",
            Operation::TopTracks { .. } => "chart.getTopTracks",
            Operation::SearchArtists { .. } => "artist.search",
            Operation::SearchAlbums { .. } => "album.search",
            Operation::SearchTracks { .. } => "track.search",
            Operation::ArtistTags { .. } => "artist.getTopTags",
            Operation::TrackTags { .. } => "track.getTopTags",
        }
    }

    /// Method-specific query parameters, `method` first. The credential and
    /// format selector are added by the client.
    pub fn parameters(&self) -> Vec<(&'static str, String)> {
        let mut parameters = vec![("method", self.method().to_string())];

        match self {
            Operation::TopArtists { limit } | Operation::TopTracks { limit } => {
                parameters.push(("limit", limit.to_string()));
            }
            Operation::SearchArtists { query, limit } => {
                parameters.push(("artist", query.clone()));
                parameters.push(("limit", limit.to_string()));
            }
            Operation::SearchAlbums { query, limit } => {
                parameters.push(("album", query.clone()));
                parameters.push(("limit", limit.to_string()));
            }
            Operation::SearchTracks { query, limit } => {
                parameters.push(("track", query.clone()));
                parameters.push(("limit", limit.to_string()));
            }
            Operation::ArtistTags {
                artist,
                autocorrect,
            } => {
                parameters.push(("artist", artist.clone()));
                if *autocorrect {
                    parameters.push(("autocorrect", "1".to_string()));
                }
            }
            Operation::TrackTags {
                artist,
                track,
                autocorrect,
            } => {
                parameters.push(("artist", artist.clone()));
                parameters.push(("track", track.clone()));
                if *autocorrect {
                    parameters.push(("autocorrect", "1".to_string()));
                }
            }
        }

        parameters
    }
}
