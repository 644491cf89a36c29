use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response, Sse, sse::Event},
    routing::get,
};
use futures::stream::Stream;
use lastfm_discover_controls::{
    DiscoveryState, NotificationReceiver, Result, StateReceiver,
    discovery::Discovery,
    error::Error,
    notification::Notification,
    render::render_page,
};
use serde_json::json;
use std::{convert::Infallible, sync::Arc};
use tokio::sync::broadcast::{self, Sender};
use tokio_stream::StreamExt as _;
use tokio_stream::wrappers::BroadcastStream;

use crate::{
    app_state::AppState,
    routes::{api, discover, search},
};

mod app_state;
mod routes;

pub async fn init(discovery: Arc<Discovery>, port: u16) -> Result<()> {
    let interface = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&interface)
        .await
        .or(Err(Error::PortInUse { port }))?;

    tracing::info!("Listening on {interface}");

    let router = create_router(discovery);

    axum::serve(listener, router)
        .await
        .map_err(|error| Error::Server {
            message: error.to_string(),
        })
}

fn create_router(discovery: Arc<Discovery>) -> Router {
    let (tx, _rx) = broadcast::channel::<ServerSentEvent>(100);

    tokio::spawn(background_task(
        tx.clone(),
        discovery.notifications(),
        discovery.state(),
    ));

    let shared_state = Arc::new(AppState { discovery, tx });

    axum::Router::new()
        .route("/sse", get(sse_handler))
        .merge(api::routes())
        .merge(discover::routes())
        .merge(search::routes())
        .with_state(shared_state)
}

/// Forwards state changes and notifications to connected SSE clients.
async fn background_task(
    tx: Sender<ServerSentEvent>,
    mut notifications: NotificationReceiver,
    mut state: StateReceiver,
) {
    loop {
        tokio::select! {
            Ok(_) = state.changed() => {
                let event = state_event(&state.borrow_and_update());
                if let Some(event) = event {
                    _ = tx.send(event);
                }
            },
            Ok(notification) = notifications.recv() => {
                tracing::debug!("notification: {:?}", notification);
                _ = tx.send(notification_event(notification));
            }
            else => break,
        }
    }
}

fn state_event(state: &DiscoveryState) -> Option<ServerSentEvent> {
    match serde_json::to_string(&render_page(state)) {
        Ok(data) => Some(ServerSentEvent {
            event_name: "state".into(),
            event_data: data,
        }),
        Err(error) => {
            tracing::error!("Unable to serialize state: {error}");
            None
        }
    }
}

fn notification_event(notification: Notification) -> ServerSentEvent {
    let (event_name, message) = match notification {
        Notification::Error(message) => ("error", message),
        Notification::Warning(message) => ("warn", message),
        Notification::Info(message) => ("info", message),
    };

    ServerSentEvent {
        event_name: event_name.into(),
        event_data: json!({"message": message}).to_string(),
    }
}

/// What a client that just connected needs before any live update: the
/// configuration error, if there is one, and the current state.
fn initial_events(state: &DiscoveryState) -> Vec<ServerSentEvent> {
    let configuration_error = state
        .configuration_error
        .clone()
        .map(|message| notification_event(Notification::Error(message)));

    configuration_error
        .into_iter()
        .chain(state_event(state))
        .collect()
}

async fn sse_handler(
    State(state): State<Arc<AppState>>,
) -> (
    axum::http::HeaderMap,
    Sse<impl Stream<Item = Result<Event, Infallible>>>,
) {
    let rx = state.tx.subscribe();
    let initial = tokio_stream::iter(initial_events(&state.discovery.snapshot()));
    let updates = BroadcastStream::new(rx).filter_map(|result| result.ok());
    let stream = initial.chain(updates).map(|event| {
        Ok::<_, Infallible>(
            Event::default()
                .event(event.event_name)
                .data(event.event_data),
        )
    });

    let mut headers = axum::http::HeaderMap::new();
    headers.insert(
        "X-Accel-Buffering",
        axum::http::HeaderValue::from_static("no"),
    );

    (headers, Sse::new(stream))
}

#[derive(Debug, Clone)]
pub struct ServerSentEvent {
    event_name: String,
    event_data: String,
}

type ResponseResult = std::result::Result<Response, Response>;

#[allow(clippy::result_large_err)]
fn ok_or_error_response<T>(value: Result<T>) -> std::result::Result<T, Response> {
    match value {
        Ok(value) => Ok(value),
        Err(error) => {
            let status = match error {
                Error::Configuration { .. } => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };

            Err((status, Json(json!({"error": error.to_string()}))).into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::extract::Query;
    use lastfm_discover_client::ApiConfig;
    use lastfm_discover_controls::{
        notification::NotificationBroadcast, tags::EnrichmentPolicy,
    };
    use serde_json::Value;

    use super::*;

    async fn fake_lastfm(Query(parameters): Query<HashMap<String, String>>) -> Json<Value> {
        let artist = |name: &str| {
            json!({
                "name": name,
                "url": format!("https://www.last.fm/music/{name}"),
                "image": [{"#text": format!("https://img/{name}.png"), "size": "large"}]
            })
        };

        let body = match parameters.get("method").map(String::as_str) {
            Some("chart.getTopArtists") => json!({"artists": {"artist": [artist("Chart")]}}),
            Some("chart.getTopTracks") => json!({"tracks": {"track": []}}),
            Some("artist.search") => {
                json!({"results": {"artistmatches": {"artist": artist(&parameters["artist"])}}})
            }
            Some("album.search") => json!({"results": {"albummatches": {"album": []}}}),
            Some("track.search") => json!({"error": 8, "message": "Operation failed"}),
            _ => json!({"toptags": {"tag": [{"name": "rock", "url": "https://www.last.fm/tag/rock"}]}}),
        };

        Json(body)
    }

    async fn bind(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{address}")
    }

    async fn web(config: ApiConfig) -> (String, Arc<Discovery>) {
        let discovery = Arc::new(Discovery::new(
            config,
            EnrichmentPolicy::default(),
            Arc::new(NotificationBroadcast::new()),
        ));
        let address = bind(create_router(discovery.clone())).await;
        (address, discovery)
    }

    async fn configured() -> (String, Arc<Discovery>) {
        let lastfm = bind(Router::new().route("/2.0/", get(fake_lastfm))).await;
        web(ApiConfig::new("test-key").with_base_url(format!("{lastfm}/2.0/"))).await
    }

    async fn get_json(url: String) -> (u16, Value) {
        let response = reqwest::get(url).await.unwrap();
        let status = response.status().as_u16();
        let body = response.text().await.unwrap();
        (status, serde_json::from_str(&body).unwrap())
    }

    #[tokio::test]
    async fn search_route_renders_search_sections() {
        let (address, _discovery) = configured().await;

        let (status, page) = get_json(format!("{address}/api/search?query=muse")).await;

        assert_eq!(status, 200);
        assert_eq!(page["query"], "muse");
        assert_eq!(page["sections"][0]["section"], "search-artists");
        assert_eq!(page["sections"][0]["body"]["state"], "cards");
        assert_eq!(page["sections"][0]["body"]["cards"][0]["name"], "muse");
        assert_eq!(page["sections"][1]["body"]["message"], "No albums found.");
        assert_eq!(page["sections"][2]["body"]["state"], "error");
    }

    #[tokio::test]
    async fn popular_route_loads_popular_sections() {
        let (address, _discovery) = configured().await;

        let response = reqwest::Client::new()
            .post(format!("{address}/api/popular"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        let page: Value = serde_json::from_str(&response.text().await.unwrap()).unwrap();

        assert_eq!(page["query"], Value::Null);
        assert_eq!(page["sections"][0]["title"], "Hot right now");
        assert_eq!(
            page["sections"][0]["body"]["cards"][0]["tags"][0]["name"],
            "rock"
        );
        assert_eq!(page["sections"][1]["body"]["message"], "No tracks found.");
    }

    #[tokio::test]
    async fn single_section_route() {
        let (address, discovery) = configured().await;
        discovery.search("muse").await.unwrap();

        let (status, section) = get_json(format!("{address}/api/sections/search-artists")).await;
        assert_eq!(status, 200);
        assert_eq!(section["title"], "Artists found for \"muse\"");

        let response = reqwest::get(format!("{address}/api/sections/nope")).await.unwrap();
        assert_eq!(response.status().as_u16(), 400);
    }

    #[tokio::test]
    async fn unconfigured_api_reports_and_refuses_search() {
        let (address, _discovery) = web(ApiConfig::new("")).await;

        let (status, page) = get_json(format!("{address}/api/state")).await;
        assert_eq!(status, 200);
        assert_eq!(page["search_enabled"], false);
        assert_eq!(
            page["configuration_error"],
            "Last.fm API key is not configured. Search is disabled."
        );

        let (status, body) = get_json(format!("{address}/api/search?query=muse")).await;
        assert_eq!(status, 503);
        assert!(body["error"].as_str().unwrap().contains("not configured"));
    }

    #[tokio::test]
    async fn sse_clients_learn_about_configuration_errors_on_connect() {
        let (address, _discovery) = web(ApiConfig::new("YOUR_API_KEY")).await;
        let mut response = reqwest::get(format!("{address}/sse")).await.unwrap();

        let received = tokio::time::timeout(std::time::Duration::from_secs(5), async {
            let mut received = String::new();
            while !received.contains("event: state") {
                let chunk = response.chunk().await.unwrap().unwrap();
                received.push_str(&String::from_utf8_lossy(&chunk));
            }
            received
        })
        .await
        .unwrap();

        assert!(received.contains(
            "event: error\ndata: {\"message\":\"Last.fm API key is not configured. Search is disabled.\"}"
        ));
        assert!(received.find("event: error") < received.find("event: state"));
    }

    #[test]
    fn configured_clients_only_get_the_state_on_connect() {
        let events = initial_events(&DiscoveryState::default());

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_name, "state");
        assert!(events[0].event_data.contains("\"search_enabled\":true"));
    }

    #[tokio::test]
    async fn background_task_forwards_notifications_and_state() {
        let broadcast = NotificationBroadcast::new();
        let (state_tx, state_rx) = tokio::sync::watch::channel(Default::default());
        let (tx, _) = broadcast::channel(10);
        let mut events = tx.subscribe();

        tokio::spawn(background_task(tx, broadcast.subscribe(), state_rx));

        broadcast.send(Notification::Warning("Slow network".into()));
        let event = events.recv().await.unwrap();
        assert_eq!(event.event_name, "warn");
        assert_eq!(event.event_data, r#"{"message":"Slow network"}"#);

        state_tx.send_modify(|state: &mut DiscoveryState| {
            state.configuration_error = Some("broken".into());
        });
        let event = events.recv().await.unwrap();
        assert_eq!(event.event_name, "state");
        assert!(event.event_data.contains("\"configuration_error\":\"broken\""));
    }
}
