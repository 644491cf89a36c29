use std::collections::HashMap;

use axum::Router;
use lastfm_discover_client::ApiConfig;
use serde_json::{Value, json};

pub type Parameters = HashMap<String, String>;

/// Serves `router` on an ephemeral local port and returns a config aimed at it.
pub async fn serve(router: Router) -> ApiConfig {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

    ApiConfig::new("test-key").with_base_url(format!("http://{address}/2.0/"))
}

pub fn artist(name: &str) -> Value {
    json!({
        "name": name,
        "url": format!("https://www.last.fm/music/{}", name.replace(' ', "+")),
        "listeners": "1000",
        "image": [
            {"#text": format!("https://img/{name}/s.png"), "size": "small"},
            {"#text": format!("https://img/{name}/xl.png"), "size": "extralarge"}
        ]
    })
}

pub fn track(name: &str, artist_name: &str) -> Value {
    json!({
        "name": name,
        "url": format!("https://www.last.fm/music/{artist_name}/_/{name}"),
        "duration": "180",
        "artist": {"name": artist_name, "url": format!("https://www.last.fm/music/{artist_name}")},
        "image": [{"#text": "", "size": "medium"}]
    })
}

pub fn album(name: &str, artist_name: &str) -> Value {
    json!({
        "name": name,
        "artist": artist_name,
        "url": format!("https://www.last.fm/music/{artist_name}/{name}"),
        "image": []
    })
}

pub fn tags(names: &[&str]) -> Value {
    let tags: Vec<Value> = names
        .iter()
        .map(|name| json!({"name": name, "url": format!("https://www.last.fm/tag/{name}")}))
        .collect();

    json!({"toptags": {"tag": tags}})
}

pub fn method(parameters: &Parameters) -> &str {
    parameters.get("method").map(String::as_str).unwrap_or_default()
}
