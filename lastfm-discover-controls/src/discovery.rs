use std::sync::Arc;

use lastfm_discover_client::{
    ApiConfig, Client,
    operation::{POPULAR_ARTISTS_LIMIT, POPULAR_TRACKS_LIMIT, SEARCH_RESULTS_LIMIT},
};
use lastfm_discover_models::{Album, Artist, Track};
use tokio::sync::watch;

use crate::{
    NotificationReceiver, Result, StateReceiver,
    error::Error,
    notification::{Notification, NotificationBroadcast},
    tags::{EnrichmentPolicy, TagEnrichment, enrich_all},
};

type ClientResult<T> = lastfm_discover_client::Result<T>;

/// A UI slot that shows one listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    PopularArtists,
    PopularTracks,
    SearchArtists,
    SearchAlbums,
    SearchTracks,
}

impl Section {
    pub const POPULAR: [Self; 2] = [Section::PopularArtists, Section::PopularTracks];

    pub const SEARCH: [Self; 3] = [
        Section::SearchArtists,
        Section::SearchAlbums,
        Section::SearchTracks,
    ];
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SectionState<T> {
    pub loading: bool,
    pub error: Option<String>,
    pub items: Vec<T>,
}

impl<T> Default for SectionState<T> {
    fn default() -> Self {
        Self {
            loading: false,
            error: None,
            items: Vec::new(),
        }
    }
}

impl<T> SectionState<T> {
    fn loading() -> Self {
        Self {
            loading: true,
            ..Default::default()
        }
    }

    fn completed(result: ClientResult<Vec<T>>) -> Self {
        match result {
            Ok(items) => Self {
                items,
                ..Default::default()
            },
            Err(error) => Self {
                error: Some(error.to_string()),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum PopularPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum SearchPhase {
    #[default]
    Idle,
    Searching,
    Loaded,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
pub enum View {
    #[default]
    Popular,
    Search {
        query: String,
    },
}

#[derive(Debug, Default, Clone, PartialEq, serde::Serialize)]
pub struct PopularState {
    pub phase: PopularPhase,
    pub sequence: u64,
    pub artists: SectionState<Artist>,
    pub tracks: SectionState<Track>,
}

#[derive(Debug, Default, Clone, PartialEq, serde::Serialize)]
pub struct SearchState {
    pub phase: SearchPhase,
    pub sequence: u64,
    pub query: String,
    pub artists: SectionState<Artist>,
    pub albums: SectionState<Album>,
    pub tracks: SectionState<Track>,
}

#[derive(Debug, Default, Clone, PartialEq, serde::Serialize)]
pub struct DiscoveryState {
    pub view: View,
    pub popular: PopularState,
    pub search: SearchState,
    pub configuration_error: Option<String>,
}

impl DiscoveryState {
    pub fn search_enabled(&self) -> bool {
        self.configuration_error.is_none()
    }
}

/// Drives the popular and search listings and publishes their state.
///
/// Each listing stamps a sequence number into the state when it starts and
/// only writes its results back if that stamp is still current, so a
/// superseded search can never overwrite a newer one.
#[derive(Debug)]
pub struct Discovery {
    client: Option<Client>,
    policy: EnrichmentPolicy,
    state: watch::Sender<DiscoveryState>,
    broadcast: Arc<NotificationBroadcast>,
}

impl Discovery {
    pub fn new(
        config: ApiConfig,
        policy: EnrichmentPolicy,
        broadcast: Arc<NotificationBroadcast>,
    ) -> Self {
        let (state, _) = watch::channel(DiscoveryState::default());

        let client = match Client::new(config) {
            Ok(client) => Some(client),
            Err(error) => {
                let message = format!("{error}. Search is disabled.");
                tracing::error!("{message}");
                state.send_modify(|state| state.configuration_error = Some(message));
                None
            }
        };

        Self {
            client,
            policy,
            state,
            broadcast,
        }
    }

    pub fn state(&self) -> StateReceiver {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> DiscoveryState {
        self.state.borrow().clone()
    }

    pub fn notifications(&self) -> NotificationReceiver {
        self.broadcast.subscribe()
    }

    fn client(&self) -> Result<&Client> {
        self.client.as_ref().ok_or_else(|| Error::Configuration {
            message: self
                .state
                .borrow()
                .configuration_error
                .clone()
                .unwrap_or_default(),
        })
    }

    /// Loads top artists and top tracks side by side. Each section records
    /// its own failure; only a configuration failure is returned.
    pub async fn load_popular(&self) -> Result<()> {
        let client = self.client()?;

        let mut sequence = 0;
        self.state.send_modify(|state| {
            sequence = state.popular.sequence + 1;
            state.popular = PopularState {
                phase: PopularPhase::Loading,
                sequence,
                artists: SectionState::loading(),
                tracks: SectionState::loading(),
            };
        });
        tracing::info!(sequence, "Loading popular content");

        let enrichment = self.policy.popular;
        let (artists, tracks) = tokio::join!(
            popular_artists(client, enrichment),
            popular_tracks(client, enrichment),
        );

        let failures = [
            failure("popular artists", &artists),
            failure("popular tracks", &tracks),
        ];

        let applied = self.state.send_if_modified(|state| {
            if state.popular.sequence != sequence {
                return false;
            }

            state.popular.phase = PopularPhase::Loaded;
            state.popular.artists = SectionState::completed(artists);
            state.popular.tracks = SectionState::completed(tracks);
            true
        });

        if !applied {
            tracing::debug!(sequence, "Discarding superseded popular content");
            return Ok(());
        }

        self.report(failures);
        Ok(())
    }

    /// Runs the three searches for `query`. A blank query leaves search mode
    /// and reloads the popular view.
    pub async fn search(&self, query: &str) -> Result<()> {
        let client = self.client()?;
        let query = query.trim();

        if query.is_empty() {
            self.state.send_modify(|state| {
                state.view = View::Popular;
                state.search = SearchState {
                    sequence: state.search.sequence + 1,
                    ..Default::default()
                };
            });
            return self.load_popular().await;
        }

        let mut sequence = 0;
        self.state.send_modify(|state| {
            sequence = state.search.sequence + 1;
            state.view = View::Search {
                query: query.to_string(),
            };
            state.search = SearchState {
                phase: SearchPhase::Searching,
                sequence,
                query: query.to_string(),
                artists: SectionState::loading(),
                albums: SectionState::loading(),
                tracks: SectionState::loading(),
            };
        });
        tracing::info!(query, sequence, "Searching");

        let enrichment = self.policy.search;
        let (artists, albums, tracks) = tokio::join!(
            search_artists(client, query, enrichment),
            client.search_albums(query, SEARCH_RESULTS_LIMIT),
            search_tracks(client, query, enrichment),
        );

        let failures = [
            failure("artist search", &artists),
            failure("album search", &albums),
            failure("track search", &tracks),
        ];

        let applied = self.state.send_if_modified(|state| {
            if state.search.sequence != sequence {
                return false;
            }

            state.search.phase = SearchPhase::Loaded;
            state.search.artists = SectionState::completed(artists);
            state.search.albums = SectionState::completed(albums);
            state.search.tracks = SectionState::completed(tracks);
            true
        });

        if !applied {
            tracing::debug!(query, sequence, "Discarding superseded search results");
            return Ok(());
        }

        self.report(failures);
        Ok(())
    }

    fn report<const N: usize>(&self, failures: [Option<String>; N]) {
        for message in failures.into_iter().flatten() {
            tracing::error!("{message}");
            self.broadcast.send(Notification::Error(message));
        }
    }
}

fn failure<T>(listing: &str, result: &ClientResult<T>) -> Option<String> {
    result
        .as_ref()
        .err()
        .map(|error| format!("Failed to load {listing}: {error}"))
}

async fn popular_artists(client: &Client, enrichment: TagEnrichment) -> ClientResult<Vec<Artist>> {
    let artists = client.top_artists(POPULAR_ARTISTS_LIMIT).await?;
    Ok(enrich_all(client, artists, enrichment).await)
}

async fn popular_tracks(client: &Client, enrichment: TagEnrichment) -> ClientResult<Vec<Track>> {
    let tracks = client.top_tracks(POPULAR_TRACKS_LIMIT).await?;
    Ok(enrich_all(client, tracks, enrichment).await)
}

async fn search_artists(
    client: &Client,
    query: &str,
    enrichment: TagEnrichment,
) -> ClientResult<Vec<Artist>> {
    let artists = client.search_artists(query, SEARCH_RESULTS_LIMIT).await?;
    Ok(enrich_all(client, artists, enrichment).await)
}

async fn search_tracks(
    client: &Client,
    query: &str,
    enrichment: TagEnrichment,
) -> ClientResult<Vec<Track>> {
    let tracks = client.search_tracks(query, SEARCH_RESULTS_LIMIT).await?;
    Ok(enrich_all(client, tracks, enrichment).await)
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use axum::{Json, Router, extract::Query, routing::get};
    use serde_json::{Value, json};

    use super::*;
    use crate::test_support::{self, Parameters};

    async fn lastfm(Query(parameters): Query<Parameters>) -> Json<Value> {
        let body = match test_support::method(&parameters) {
            "chart.getTopArtists" => {
                let artists: Vec<Value> = (0..10)
                    .map(|index| test_support::artist(&format!("Artist {index}")))
                    .collect();
                json!({"artists": {"artist": artists}})
            }
            "chart.getTopTracks" => {
                json!({"tracks": {"track": [test_support::track("Song", "Singer")]}})
            }
            "artist.search" => {
                let query = &parameters["artist"];
                if query == "slow" {
                    tokio::time::sleep(Duration::from_millis(300)).await;
                }
                if query == "shadow" {
                    json!({"results": {"artistmatches": {"artist": []}}})
                } else {
                    json!({"results": {"artistmatches": {"artist": [test_support::artist(&format!("{query} artist"))]}}})
                }
            }
            "album.search" => {
                let query = &parameters["album"];
                if query == "shadow" {
                    json!({"results": {"albummatches": {"album": []}}})
                } else {
                    json!({"results": {"albummatches": {"album": test_support::album(&format!("{query} album"), "Someone")}}})
                }
            }
            "track.search" => {
                json!({"results": {"opensearch:totalResults": "0", "trackmatches": {"track": []}}})
            }
            "artist.getTopTags" => test_support::tags(&["rock", "indie", "pop", "jazz"]),
            "track.getTopTags" => json!({"error": 6, "message": "Track not found"}),
            _ => json!({"error": 3, "message": "Invalid Method"}),
        };

        Json(body)
    }

    async fn discovery(router: Router, policy: EnrichmentPolicy) -> Discovery {
        let config = test_support::serve(router).await;
        Discovery::new(config, policy, Arc::new(NotificationBroadcast::new()))
    }

    fn names(artists: &[Artist]) -> Vec<&str> {
        artists.iter().map(|artist| artist.name.as_str()).collect()
    }

    #[tokio::test]
    async fn popular_load_keeps_order_and_enriches() {
        let discovery = discovery(
            Router::new().route("/2.0/", get(lastfm)),
            EnrichmentPolicy::default(),
        )
        .await;

        discovery.load_popular().await.unwrap();
        let state = discovery.snapshot();

        assert_eq!(state.popular.phase, PopularPhase::Loaded);
        assert_eq!(state.popular.artists.items.len(), 10);
        assert_eq!(state.popular.artists.items[0].name, "Artist 0");
        assert_eq!(state.popular.artists.items[9].name, "Artist 9");
        assert_eq!(state.popular.artists.items[3].tags.len(), 3);
        assert_eq!(state.popular.tracks.items.len(), 1);
        assert!(state.popular.tracks.items[0].tags.is_empty());
        assert_eq!(state.popular.tracks.error, None);
    }

    #[tokio::test]
    async fn failing_section_does_not_affect_others() {
        let router = Router::new().route(
            "/2.0/",
            get(|Query(parameters): Query<Parameters>| async move {
                match test_support::method(&parameters) {
                    "chart.getTopArtists" => {
                        Json(json!({"error": 6, "message": "Artist not found"}))
                    }
                    "chart.getTopTracks" => {
                        Json(json!({"tracks": {"track": [test_support::track("Song", "Singer")]}}))
                    }
                    _ => Json(test_support::tags(&[])),
                }
            }),
        );
        let discovery = discovery(router, EnrichmentPolicy::default()).await;
        let mut notifications = discovery.notifications();

        discovery.load_popular().await.unwrap();
        let state = discovery.snapshot();

        assert_eq!(
            state.popular.artists.error.as_deref(),
            Some("Last.fm API error 6: Artist not found")
        );
        assert!(state.popular.artists.items.is_empty());
        assert_eq!(state.popular.tracks.error, None);
        assert_eq!(state.popular.tracks.items.len(), 1);
        assert_eq!(state.search, SearchState::default());

        let notification = notifications.recv().await.unwrap();
        assert!(matches!(notification, Notification::Error(message) if message.contains("error 6")));
    }

    #[tokio::test]
    async fn empty_search_results_are_not_errors() {
        let discovery = discovery(
            Router::new().route("/2.0/", get(lastfm)),
            EnrichmentPolicy::default(),
        )
        .await;

        discovery.search("  shadow ").await.unwrap();
        let state = discovery.snapshot();

        assert_eq!(
            state.view,
            View::Search {
                query: "shadow".into()
            }
        );
        assert_eq!(state.search.phase, SearchPhase::Loaded);
        assert!(state.search.tracks.items.is_empty());
        assert_eq!(state.search.tracks.error, None);
        assert!(!state.search.tracks.loading);
        assert!(state.search.artists.items.is_empty());
        assert!(state.search.albums.items.is_empty());
    }

    #[tokio::test]
    async fn search_skips_tags_when_disabled() {
        let tag_requests = Arc::new(AtomicUsize::new(0));
        let counter = tag_requests.clone();
        let router = Router::new().route(
            "/2.0/",
            get(move |query: Query<Parameters>| {
                let counter = counter.clone();
                async move {
                    if test_support::method(&query.0).ends_with("getTopTags") {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }
                    lastfm(query).await
                }
            }),
        );
        let discovery = discovery(router, EnrichmentPolicy::default()).await;

        discovery.search("muse").await.unwrap();
        let state = discovery.snapshot();

        assert_eq!(names(&state.search.artists.items), vec!["muse artist"]);
        assert!(state.search.artists.items[0].tags.is_empty());
        assert_eq!(state.search.albums.items[0].name, "muse album");
        assert_eq!(tag_requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn search_enriches_when_policy_says_so() {
        let policy = EnrichmentPolicy {
            popular: TagEnrichment::Disabled,
            search: TagEnrichment::Enabled,
        };
        let discovery = discovery(Router::new().route("/2.0/", get(lastfm)), policy).await;

        discovery.search("muse").await.unwrap();
        let state = discovery.snapshot();

        assert_eq!(
            state.search.artists.items[0]
                .tags
                .iter()
                .map(|tag| tag.name.as_str())
                .collect::<Vec<_>>(),
            vec!["rock", "indie", "pop"]
        );
    }

    #[tokio::test]
    async fn last_issued_search_wins() {
        let discovery = discovery(
            Router::new().route("/2.0/", get(lastfm)),
            EnrichmentPolicy::default(),
        )
        .await;

        let (first, second) = tokio::join!(discovery.search("slow"), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            discovery.search("fast").await
        });
        first.unwrap();
        second.unwrap();

        let state = discovery.snapshot();
        assert_eq!(state.search.query, "fast");
        assert_eq!(names(&state.search.artists.items), vec!["fast artist"]);
        assert_eq!(state.search.albums.items[0].name, "fast album");
        assert_eq!(
            state.view,
            View::Search {
                query: "fast".into()
            }
        );
    }

    #[tokio::test]
    async fn clearing_the_query_returns_to_popular() {
        let discovery = discovery(
            Router::new().route("/2.0/", get(lastfm)),
            EnrichmentPolicy::default(),
        )
        .await;

        discovery.search("muse").await.unwrap();
        discovery.search("   ").await.unwrap();
        let state = discovery.snapshot();

        assert_eq!(state.view, View::Popular);
        assert_eq!(state.search.phase, SearchPhase::Idle);
        assert!(state.search.artists.items.is_empty());
        assert_eq!(state.popular.phase, PopularPhase::Loaded);
        assert_eq!(state.popular.artists.items.len(), 10);
    }

    #[tokio::test]
    async fn clearing_discards_in_flight_search() {
        let discovery = discovery(
            Router::new().route("/2.0/", get(lastfm)),
            EnrichmentPolicy::default(),
        )
        .await;

        let (searched, cleared) = tokio::join!(discovery.search("slow"), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            discovery.search("").await
        });
        searched.unwrap();
        cleared.unwrap();

        let state = discovery.snapshot();
        assert_eq!(state.view, View::Popular);
        assert_eq!(state.search.phase, SearchPhase::Idle);
        assert!(state.search.artists.items.is_empty());
    }

    #[tokio::test]
    async fn state_receivers_observe_loading_then_results() {
        let discovery = discovery(
            Router::new().route("/2.0/", get(lastfm)),
            EnrichmentPolicy::default(),
        )
        .await;
        let mut receiver = discovery.state();

        let (result, observed) = tokio::join!(discovery.search("slow"), async {
            receiver.changed().await.unwrap();
            let searching = receiver.borrow_and_update().search.phase;
            receiver.changed().await.unwrap();
            let finished = receiver.borrow_and_update().search.phase;
            (searching, finished)
        });
        result.unwrap();

        assert_eq!(observed, (SearchPhase::Searching, SearchPhase::Loaded));
    }

    #[tokio::test]
    async fn missing_key_disables_everything_without_requests() {
        let requests = Arc::new(AtomicUsize::new(0));
        let counter = requests.clone();
        let router = Router::new().route(
            "/2.0/",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Json(json!({}))
                }
            }),
        );
        let base_url = test_support::serve(router).await.base_url().to_string();
        let config = ApiConfig::new("YOUR_API_KEY").with_base_url(base_url);

        let discovery = Discovery::new(
            config,
            EnrichmentPolicy::default(),
            Arc::new(NotificationBroadcast::new()),
        );

        let state = discovery.snapshot();
        assert!(!state.search_enabled());
        assert_eq!(
            state.configuration_error.as_deref(),
            Some("Last.fm API key is not configured. Search is disabled.")
        );

        assert!(matches!(
            discovery.search("muse").await,
            Err(Error::Configuration { .. })
        ));
        assert!(matches!(
            discovery.load_popular().await,
            Err(Error::Configuration { .. })
        ));
        assert_eq!(requests.load(Ordering::SeqCst), 0);
    }
}
