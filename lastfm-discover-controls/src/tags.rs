use std::future::Future;

use futures::future::join_all;
use lastfm_discover_client::Client;
use lastfm_discover_models::{Artist, Entity, Tag, Track};

type ClientResult<T> = lastfm_discover_client::Result<T>;

/// Whether a call site attaches tags to the entities it loads.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum TagEnrichment {
    #[default]
    Enabled,
    Disabled,
}

impl TagEnrichment {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            TagEnrichment::Enabled
        } else {
            TagEnrichment::Disabled
        }
    }
}

/// Tag enrichment per view. Search skips tags by default to keep results quick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct EnrichmentPolicy {
    pub popular: TagEnrichment,
    pub search: TagEnrichment,
}

impl Default for EnrichmentPolicy {
    fn default() -> Self {
        Self {
            popular: TagEnrichment::Enabled,
            search: TagEnrichment::Disabled,
        }
    }
}

pub trait Taggable: Entity + Sized {
    /// Top tags for this entity, already capped.
    fn fetch_tags<'a>(
        &'a self,
        client: &'a Client,
    ) -> impl Future<Output = ClientResult<Vec<Tag>>> + Send + 'a;

    fn with_tags(self, tags: Vec<Tag>) -> Self;
}

impl Taggable for Artist {
    fn fetch_tags<'a>(
        &'a self,
        client: &'a Client,
    ) -> impl Future<Output = ClientResult<Vec<Tag>>> + Send + 'a {
        client.artist_tags(&self.name)
    }

    fn with_tags(self, tags: Vec<Tag>) -> Self {
        Artist::with_tags(self, tags)
    }
}

impl Taggable for Track {
    fn fetch_tags<'a>(
        &'a self,
        client: &'a Client,
    ) -> impl Future<Output = ClientResult<Vec<Tag>>> + Send + 'a {
        client.track_tags(self.artist_name(), &self.name)
    }

    fn with_tags(self, tags: Vec<Tag>) -> Self {
        Track::with_tags(self, tags)
    }
}

/// Never fails: any error becomes an empty tag list.
pub async fn enrich_with_tags<T: Taggable>(client: &Client, entity: T) -> T {
    let tags = entity.fetch_tags(client).await;

    match tags {
        Ok(tags) => entity.with_tags(tags),
        Err(error) => {
            tracing::warn!(
                entity = entity.display_name(),
                "Could not fetch tags: {error}"
            );
            entity.with_tags(vec![])
        }
    }
}

/// Enriches every entity concurrently. Output order is input order no matter
/// which lookup finishes first.
pub async fn enrich_all<T: Taggable>(
    client: &Client,
    entities: Vec<T>,
    enrichment: TagEnrichment,
) -> Vec<T> {
    match enrichment {
        TagEnrichment::Disabled => entities,
        TagEnrichment::Enabled => {
            join_all(
                entities
                    .into_iter()
                    .map(|entity| enrich_with_tags(client, entity)),
            )
            .await
        }
    }
}
