//! Per-client category views
//!
//! A view holds what one browser page is showing: the category it navigated
//! to, the merged channel list and the current search query. Every load is
//! stamped with a generation number and only the latest generation may commit,
//! so a slow load for an old slug can never overwrite a newer one.

use lru::LruCache;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::LoadError;
use crate::models::{Category, Channel};
use crate::services::loader::{CategoryChannels, ChannelLoader};
use crate::services::search::filter_channels;

/// Load status of a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStatus {
    Empty,
    Loading,
    Ready,
    NotFound,
    Error,
}

#[derive(Debug)]
struct ViewState {
    slug: Option<String>,
    status: ViewStatus,
    category: Option<Category>,
    channels: Vec<Channel>,
    query: String,
    error: Option<String>,
    loaded_at: Option<i64>,
}

impl ViewState {
    fn empty() -> Self {
        Self {
            slug: None,
            status: ViewStatus::Empty,
            category: None,
            channels: Vec::new(),
            query: String::new(),
            error: None,
            loaded_at: None,
        }
    }

    /// Drop everything loaded for the previous slug, keeping the query
    fn reset_for(&mut self, slug: &str) {
        self.slug = Some(slug.to_string());
        self.status = ViewStatus::Loading;
        self.category = None;
        self.channels.clear();
        self.error = None;
        self.loaded_at = None;
    }
}

/// Serializable picture of a view with the search already applied
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub view_id: String,
    pub generation: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub status: ViewStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Channels matching `query`
    pub channels: Vec<Channel>,
    /// Size of the unfiltered list
    pub total: usize,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<i64>,
}

/// Result of a navigation or reload
#[derive(Debug)]
pub enum NavigateOutcome {
    /// The load finished and is now the visible state
    Committed(ViewSnapshot),
    /// Same slug as before; nothing was reloaded
    Unchanged(ViewSnapshot),
    /// A newer navigation started while this one was in flight
    Superseded,
}

/// One client's category page
pub struct CategoryView {
    id: String,
    loader: ChannelLoader,
    generation: AtomicU64,
    state: RwLock<ViewState>,
}

impl CategoryView {
    pub fn new(id: String, loader: ChannelLoader) -> Self {
        Self {
            id,
            loader,
            generation: AtomicU64::new(0),
            state: RwLock::new(ViewState::empty()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Show `slug`. A slug equal to the current one is a no-op.
    pub async fn navigate(&self, slug: &str) -> NavigateOutcome {
        let ticket = {
            let mut state = self.state.write().await;
            if state.slug.as_deref() == Some(slug) {
                return NavigateOutcome::Unchanged(self.render(&state));
            }
            state.reset_for(slug);
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };

        self.run(ticket, slug).await
    }

    /// Re-run the load for the current slug. `None` if nothing was ever navigated to.
    pub async fn reload(&self) -> Option<NavigateOutcome> {
        let (ticket, slug) = {
            let mut state = self.state.write().await;
            let slug = state.slug.clone()?;
            state.reset_for(&slug);
            (self.generation.fetch_add(1, Ordering::SeqCst) + 1, slug)
        };

        Some(self.run(ticket, &slug).await)
    }

    /// Change the search query
    pub async fn set_query(&self, query: &str) -> ViewSnapshot {
        let mut state = self.state.write().await;
        state.query = query.to_string();
        self.render(&state)
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        let state = self.state.read().await;
        self.render(&state)
    }

    async fn run(&self, ticket: u64, slug: &str) -> NavigateOutcome {
        let result = self.loader.load(slug).await;

        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != ticket {
            tracing::debug!(view_id = %self.id, slug, ticket, "Discarding superseded load");
            return NavigateOutcome::Superseded;
        }

        match result {
            Ok(CategoryChannels { category, channels }) => {
                state.status = ViewStatus::Ready;
                state.category = Some(category);
                state.channels = channels;
                state.loaded_at = Some(chrono::Utc::now().timestamp_millis());
            }
            Err(e) => {
                state.status = match e {
                    LoadError::NotFound => ViewStatus::NotFound,
                    LoadError::Failed(_) => ViewStatus::Error,
                };
                state.error = Some(e.to_string());
            }
        }

        NavigateOutcome::Committed(self.render(&state))
    }

    fn render(&self, state: &ViewState) -> ViewSnapshot {
        let channels: Vec<Channel> = filter_channels(&state.channels, &state.query)
            .into_iter()
            .cloned()
            .collect();

        ViewSnapshot {
            view_id: self.id.clone(),
            generation: self.generation.load(Ordering::SeqCst),
            slug: state.slug.clone(),
            status: state.status,
            category: state.category.clone(),
            channels,
            total: state.channels.len(),
            query: state.query.clone(),
            error: state.error.clone(),
            loaded_at: state.loaded_at,
        }
    }
}

/// Bounded set of live views; the least recently used view is evicted first
pub struct ViewRegistry {
    loader: ChannelLoader,
    views: Mutex<LruCache<String, Arc<CategoryView>>>,
}

impl ViewRegistry {
    pub fn new(loader: ChannelLoader, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            loader,
            views: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Create and register a new empty view
    pub async fn create(&self) -> Arc<CategoryView> {
        let id = Uuid::new_v4().to_string();
        let view = Arc::new(CategoryView::new(id.clone(), self.loader.clone()));

        let mut views = self.views.lock().await;
        if let Some((evicted, _)) = views.push(id, view.clone()) {
            tracing::debug!(view_id = %evicted, "Evicted least recently used view");
        }
        view
    }

    pub async fn get(&self, id: &str) -> Option<Arc<CategoryView>> {
        self.views.lock().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.views.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::loader::testing::StubPlaylists;
    use crate::services::store::{testing::MemoryStore, Collection};
    use serde_json::json;
    use std::time::Duration;

    const PLAYLIST: &str = "#EXTINF:-1,BBC News\nhttp://s/bbc\n#EXTINF:-1,CNN\nhttp://s/cnn\n";

    fn test_loader() -> ChannelLoader {
        let store = MemoryStore::new()
            .with(
                Collection::Categories,
                "slow",
                json!({ "name": "Slow", "slug": "slow", "m3uUrl": "http://lists/slow.m3u" }),
            )
            .with(Collection::Categories, "fast", json!({ "name": "Fast", "slug": "fast" }))
            .with(
                Collection::Channels,
                "f1",
                json!({ "name": "Fast One", "streamUrl": "http://s/f1", "categoryId": "fast" }),
            );
        let playlists = StubPlaylists::new()
            .with("http://lists/slow.m3u", PLAYLIST)
            .delayed(Duration::from_millis(100));
        ChannelLoader::new(Arc::new(store), Arc::new(playlists))
    }

    fn committed(outcome: NavigateOutcome) -> ViewSnapshot {
        match outcome {
            NavigateOutcome::Committed(snapshot) => snapshot,
            other => panic!("expected committed load, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_navigate_and_search() {
        let view = CategoryView::new("v1".into(), test_loader());

        let snapshot = committed(view.navigate("slow").await);
        assert_eq!(snapshot.status, ViewStatus::Ready);
        assert_eq!(snapshot.total, 2);
        assert_eq!(snapshot.channels.len(), 2);

        let snapshot = view.set_query("news").await;
        assert_eq!(snapshot.channels.len(), 1);
        assert_eq!(snapshot.channels[0].name, "BBC News");
        assert_eq!(snapshot.total, 2);

        let snapshot = view.set_query("").await;
        assert_eq!(snapshot.channels.len(), 2);
    }

    #[tokio::test]
    async fn test_same_slug_is_unchanged() {
        let view = CategoryView::new("v1".into(), test_loader());
        committed(view.navigate("fast").await);

        let outcome = view.navigate("fast").await;
        assert!(matches!(outcome, NavigateOutcome::Unchanged(ref s) if s.generation == 1));
    }

    #[tokio::test]
    async fn test_not_found_status() {
        let view = CategoryView::new("v1".into(), test_loader());
        let snapshot = committed(view.navigate("missing").await);

        assert_eq!(snapshot.status, ViewStatus::NotFound);
        assert_eq!(snapshot.error.as_deref(), Some("Category not found"));
        assert!(snapshot.channels.is_empty());
    }

    #[tokio::test]
    async fn test_stale_load_is_superseded() {
        let view = Arc::new(CategoryView::new("v1".into(), test_loader()));

        let slow_view = view.clone();
        let slow = tokio::spawn(async move { slow_view.navigate("slow").await });
        tokio::time::sleep(Duration::from_millis(20)).await;

        let snapshot = committed(view.navigate("fast").await);
        assert_eq!(snapshot.slug.as_deref(), Some("fast"));

        let outcome = slow.await.unwrap();
        assert!(matches!(outcome, NavigateOutcome::Superseded));

        let current = view.snapshot().await;
        assert_eq!(current.slug.as_deref(), Some("fast"));
        assert_eq!(current.status, ViewStatus::Ready);
        assert_eq!(current.channels.len(), 1);
        assert_eq!(current.channels[0].id, "f1");
    }

    #[tokio::test]
    async fn test_reload_requires_slug() {
        let view = CategoryView::new("v1".into(), test_loader());
        assert!(view.reload().await.is_none());

        committed(view.navigate("fast").await);
        let snapshot = committed(view.reload().await.unwrap());
        assert_eq!(snapshot.generation, 2);
        assert_eq!(snapshot.status, ViewStatus::Ready);
    }

    #[tokio::test]
    async fn test_registry_evicts_oldest() {
        let registry = ViewRegistry::new(test_loader(), 2);
        let first = registry.create().await;
        let second = registry.create().await;
        let third = registry.create().await;

        assert_eq!(registry.len().await, 2);
        assert!(registry.get(first.id()).await.is_none());
        assert!(registry.get(second.id()).await.is_some());
        assert!(registry.get(third.id()).await.is_some());
    }
}
