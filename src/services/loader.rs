//! Category + channel load orchestration
//!
//! Resolves a category by slug, then pulls its playlist channels and its
//! manually stored channels concurrently. Failures in either channel branch
//! are logged and count as zero channels; only category resolution can fail
//! the load.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{LoadError, StoreQueryError};
use crate::metrics;
use crate::models::{Category, Channel};
use crate::services::playlist_fetcher::PlaylistSource;
use crate::services::playlist_parser;
use crate::services::store::{Collection, Document, DocumentStore};

/// Result of a successful load
#[derive(Debug, Clone)]
pub struct CategoryChannels {
    pub category: Category,
    /// Playlist channels (parse order) followed by stored channels (store order)
    pub channels: Vec<Channel>,
}

/// Loads categories and their channels from injected capabilities
#[derive(Clone)]
pub struct ChannelLoader {
    store: Arc<dyn DocumentStore>,
    playlists: Arc<dyn PlaylistSource>,
}

impl ChannelLoader {
    pub fn new(store: Arc<dyn DocumentStore>, playlists: Arc<dyn PlaylistSource>) -> Self {
        Self { store, playlists }
    }

    /// All categories, in store order
    pub async fn list_categories(&self) -> Result<Vec<Category>, LoadError> {
        let docs = self
            .store
            .list(Collection::Categories)
            .await
            .map_err(|e| store_failure(Collection::Categories, e))?;

        decode_all(&docs, Category::from_document).map_err(|e| store_failure(Collection::Categories, e))
    }

    /// Find the category with this slug. The first match wins if several exist.
    pub async fn resolve_category(&self, slug: &str) -> Result<Category, LoadError> {
        let docs = self
            .store
            .query_eq(Collection::Categories, "slug", slug)
            .await
            .map_err(|e| store_failure(Collection::Categories, e))?;

        let doc = docs.first().ok_or(LoadError::NotFound)?;
        if docs.len() > 1 {
            tracing::warn!(slug, matches = docs.len(), "Slug is not unique, using first category");
        }

        Category::from_document(doc).map_err(|e| store_failure(Collection::Categories, e))
    }

    /// Resolve `slug` and merge its playlist and stored channels
    pub async fn load(&self, slug: &str) -> Result<CategoryChannels, LoadError> {
        let category = match self.resolve_category(slug).await {
            Ok(category) => category,
            Err(e) => {
                let outcome = match e {
                    LoadError::NotFound => "not_found",
                    LoadError::Failed(_) => "failed",
                };
                metrics::CATEGORY_LOADS.with_label_values(&[outcome]).inc();
                return Err(e);
            }
        };

        let (from_playlist, from_store) = futures::join!(
            self.playlist_channels(&category),
            self.stored_channels(&category)
        );

        let playlist_count = from_playlist.len();
        let store_count = from_store.len();
        let channels = merge_channels(from_playlist, from_store);

        tracing::info!(
            category_id = %category.id,
            slug,
            playlist = playlist_count,
            stored = store_count,
            total = channels.len(),
            "Category channels loaded"
        );
        metrics::CATEGORY_LOADS.with_label_values(&["ok"]).inc();

        Ok(CategoryChannels { category, channels })
    }

    async fn playlist_channels(&self, category: &Category) -> Vec<Channel> {
        let Some(url) = category.m3u_url.as_deref() else {
            return Vec::new();
        };

        match self.playlists.fetch(url).await {
            Ok(text) => {
                let channels = playlist_parser::parse(&text, &category.id, &category.name);
                metrics::PLAYLIST_CHANNELS_PARSED.inc_by(channels.len() as u64);
                channels
            }
            Err(e) => {
                metrics::PLAYLIST_FETCH_FAILURES.inc();
                tracing::warn!(category_id = %category.id, "Skipping playlist {}: {}", url, e);
                Vec::new()
            }
        }
    }

    async fn stored_channels(&self, category: &Category) -> Vec<Channel> {
        let result = self
            .store
            .query_eq(Collection::Channels, "categoryId", &category.id)
            .await
            .and_then(|docs| decode_all(&docs, |doc| Channel::from_document(doc, &category.name)));

        match result {
            Ok(channels) => channels,
            Err(e) => {
                metrics::STORE_QUERY_FAILURES
                    .with_label_values(&[Collection::Channels.as_str()])
                    .inc();
                tracing::warn!(category_id = %category.id, "Skipping stored channels: {}", e);
                Vec::new()
            }
        }
    }
}

fn store_failure(collection: Collection, err: StoreQueryError) -> LoadError {
    metrics::STORE_QUERY_FAILURES
        .with_label_values(&[collection.as_str()])
        .inc();
    tracing::error!("Failed to query {}: {}", collection, err);
    LoadError::Failed(err)
}

fn decode_all<T>(
    docs: &[Document],
    decode: impl Fn(&Document) -> Result<T, StoreQueryError>,
) -> Result<Vec<T>, StoreQueryError> {
    docs.iter().map(decode).collect()
}

/// Playlist channels first, then stored ones, keeping the first of any repeated id
fn merge_channels(from_playlist: Vec<Channel>, from_store: Vec<Channel>) -> Vec<Channel> {
    let mut seen = HashSet::new();
    let mut merged = Vec::with_capacity(from_playlist.len() + from_store.len());

    for channel in from_playlist.into_iter().chain(from_store) {
        if seen.insert(channel.id.clone()) {
            merged.push(channel);
        } else {
            tracing::warn!(id = %channel.id, "Dropping channel with duplicate id");
        }
    }

    merged
}
