//! Application state: the catalog plus every mutable collection.

use std::sync::{Mutex, MutexGuard};

use shop_cache::{Cache, Slot, CHATS_KEY, FAVORITES_KEY, STATE_KEYS, VIEWED_KEY};
use shop_commerce::{
    Catalog, CompareSelection, Product, ProductId, SearchQuery, SearchResults,
};
use tokio::task::JoinHandle;

use crate::auth::{DemoAuth, Profile};
use crate::chat::Chat;
use crate::config::AssistantConfig;
use crate::error::AssistantError;
use crate::favorites::{FavoriteAction, Favorites};
use crate::responder::Responder;
use crate::seed::AppData;
use crate::store::ChatStore;
use crate::sync::lock;
use crate::viewed::ViewedHistory;

/// Composition root built once at startup.
///
/// Each persisted slot is loaded on start; an empty slot falls back to the
/// seed data. Favorites and history writes are saved before they are
/// applied; a failed save leaves the in-memory state untouched.
pub struct AppState {
    config: AssistantConfig,
    cache: Cache,
    catalog: Catalog,
    favorites: Mutex<Favorites>,
    favorites_slot: Slot<Favorites>,
    viewed: Mutex<ViewedHistory>,
    viewed_slot: Slot<Vec<ProductId>>,
    chats: ChatStore,
    worker: JoinHandle<()>,
    auth: DemoAuth,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("products", &self.catalog.len())
            .field("chats", &self.chats.len())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Load persisted state and spawn the response worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        config: AssistantConfig,
        cache: Cache,
        seed: AppData,
    ) -> Result<Self, AssistantError> {
        let AppData {
            products,
            favorites,
            viewed,
            chats,
        } = seed;
        let catalog = Catalog::new(products)?;

        let favorites_slot: Slot<Favorites> = Slot::new(cache.clone(), FAVORITES_KEY);
        let favorites = favorites_slot.load_or_else(|| Favorites::from_ids(favorites))?;

        let viewed_slot: Slot<Vec<ProductId>> = Slot::new(cache.clone(), VIEWED_KEY);
        let viewed = viewed_slot.load_or_else(|| viewed)?;
        let viewed = ViewedHistory::from_ids(viewed, config.viewed_capacity);

        let chats_slot: Slot<Vec<Chat>> = Slot::new(cache.clone(), CHATS_KEY);
        let chats = chats_slot.load_or_else(|| chats)?;

        tracing::info!(
            products = catalog.len(),
            favorites = favorites.len(),
            viewed = viewed.len(),
            chats = chats.len(),
            "app state loaded"
        );

        let (chats, worker) = ChatStore::spawn(chats, chats_slot, Responder::new(), &config);

        Ok(Self {
            config,
            cache,
            catalog,
            favorites: Mutex::new(favorites),
            favorites_slot,
            viewed: Mutex::new(viewed),
            viewed_slot,
            chats,
            worker,
            auth: DemoAuth::new(),
        })
    }

    /// Stop accepting messages and wait for queued replies to land.
    ///
    /// Clones of [`ChatStore`] obtained from [`AppState::chats`] keep the
    /// worker alive until they are dropped too.
    pub async fn shutdown(self) {
        let Self { chats, worker, .. } = self;
        drop(chats);
        if let Err(e) = worker.await {
            tracing::warn!(error = %e, "response worker ended abnormally");
        }
        tracing::debug!("app state shut down");
    }

    /// Delete every persisted slot.
    pub fn reset(cache: &Cache) -> Result<(), AssistantError> {
        for key in STATE_KEYS {
            cache.delete(key)?;
        }
        tracing::info!("persisted state cleared");
        Ok(())
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn chats(&self) -> &ChatStore {
        &self.chats
    }

    pub fn auth(&self) -> &DemoAuth {
        &self.auth
    }

    /// The current user with favorites, viewed, and chat counts.
    pub fn profile(&self) -> Profile {
        Profile {
            user: self.auth.current_user().clone(),
            favorites: self.lock_favorites().len(),
            viewed: self.lock_viewed().len(),
            chats: self.chats.len(),
        }
    }

    /// A first-page query sized by the configured page size.
    pub fn query(&self) -> SearchQuery {
        SearchQuery::new().with_pagination(1, self.config.page_size)
    }

    pub fn search(&self, query: &SearchQuery) -> SearchResults<Product> {
        self.catalog.search(query)
    }

    // Favorites

    pub fn favorites(&self) -> Favorites {
        self.lock_favorites().clone()
    }

    pub fn is_favorite(&self, id: &ProductId) -> bool {
        self.lock_favorites().contains(id)
    }

    /// Favorited products in catalog order.
    pub fn favorite_products(&self) -> Vec<&Product> {
        self.lock_favorites().products(&self.catalog)
    }

    pub fn toggle_favorite(&self, id: &ProductId) -> Result<FavoriteAction, AssistantError> {
        let product = self.catalog.require(id)?;
        let mut favorites = self.lock_favorites();
        let mut next = favorites.clone();
        let action = next.toggle(id.clone());
        self.favorites_slot.save(&next)?;
        *favorites = next;

        tracing::info!(
            event = "favorite_toggle",
            product_id = %id,
            action = action.as_str(),
            title = %product.title,
            "favorite toggled"
        );
        Ok(action)
    }

    /// Returns false if the product was already a favorite.
    pub fn add_favorite(&self, id: &ProductId) -> Result<bool, AssistantError> {
        self.catalog.require(id)?;
        let mut favorites = self.lock_favorites();
        let mut next = favorites.clone();
        if !next.add(id.clone()) {
            return Ok(false);
        }
        self.favorites_slot.save(&next)?;
        *favorites = next;
        Ok(true)
    }

    /// Returns false if the product was not a favorite.
    pub fn remove_favorite(&self, id: &ProductId) -> Result<bool, AssistantError> {
        let mut favorites = self.lock_favorites();
        let mut next = favorites.clone();
        if !next.remove(id) {
            return Ok(false);
        }
        self.favorites_slot.save(&next)?;
        *favorites = next;
        Ok(true)
    }

    pub fn clear_favorites(&self) -> Result<(), AssistantError> {
        let mut favorites = self.lock_favorites();
        self.favorites_slot.save(&Favorites::new())?;
        favorites.clear();
        Ok(())
    }

    // Viewed history

    /// Open a product detail view, recording it in the history.
    pub fn view_product(&self, id: &ProductId) -> Result<&Product, AssistantError> {
        let product = self.catalog.require(id)?;
        let mut viewed = self.lock_viewed();
        let mut next = viewed.clone();
        next.record(id.clone());
        self.viewed_slot.save(&next.to_vec())?;
        *viewed = next;

        tracing::info!(
            event = "product_view",
            product_id = %id,
            category = %product.category,
            "product viewed"
        );
        Ok(product)
    }

    /// Viewed ids, most recent first.
    pub fn viewed(&self) -> Vec<ProductId> {
        self.lock_viewed().to_vec()
    }

    pub fn viewed_products(&self) -> Vec<&Product> {
        self.lock_viewed().products(&self.catalog)
    }

    pub fn clear_viewed(&self) -> Result<(), AssistantError> {
        let mut viewed = self.lock_viewed();
        self.viewed_slot.save(&Vec::new())?;
        viewed.clear();
        Ok(())
    }

    // Product actions

    /// Resolve 2 to 4 products for a side-by-side comparison.
    pub fn compare(&self, ids: &[ProductId]) -> Result<Vec<&Product>, AssistantError> {
        let selection = CompareSelection::from_ids(ids.iter().cloned())?;
        let products = selection.products(&self.catalog)?;

        tracing::info!(
            event = "compare_products",
            count = products.len(),
            products = ?selection.ids(),
            "products compared"
        );
        Ok(products)
    }

    /// Record an outbound purchase click and return the product.
    pub fn buy_click(&self, id: &ProductId) -> Result<&Product, AssistantError> {
        let product = self.catalog.require(id)?;
        tracing::info!(
            event = "buy_click",
            product_id = %id,
            marketplace = %product.marketplace,
            url = %product.buy_url,
            "buy clicked"
        );
        Ok(product)
    }

    fn lock_favorites(&self) -> MutexGuard<'_, Favorites> {
        lock(&self.favorites)
    }

    fn lock_viewed(&self) -> MutexGuard<'_, ViewedHistory> {
        lock(&self.viewed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::flaky_cache;
    use shop_cache::CacheError;
    use shop_commerce::CommerceError;
    use std::sync::atomic::Ordering;

    fn config() -> AssistantConfig {
        AssistantConfig::default().with_response_delay_ms(5)
    }

    fn start(cache: &Cache) -> AppState {
        AppState::start(config(), cache.clone(), AppData::bundled().unwrap()).unwrap()
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[tokio::test]
    async fn test_empty_slots_fall_back_to_seed() {
        let state = start(&Cache::open_memory());

        assert_eq!(ids(&state.favorite_products()), vec!["p1", "p5"]);
        assert_eq!(
            state.viewed(),
            vec![ProductId::new("p2"), ProductId::new("p1")]
        );
        assert_eq!(state.chats().len(), 1);
        state.shutdown().await;
    }

    #[tokio::test]
    async fn test_persisted_slots_win_over_seed() {
        let cache = Cache::open_memory();
        cache.set(FAVORITES_KEY, &vec!["p3"]).unwrap();
        cache.set(CHATS_KEY, &Vec::<Chat>::new()).unwrap();

        let state = start(&cache);
        assert_eq!(ids(&state.favorite_products()), vec!["p3"]);
        assert!(state.chats().is_empty());
        state.shutdown().await;
    }

    #[tokio::test]
    async fn test_toggle_favorite_persists() {
        let cache = Cache::open_memory();
        let state = start(&cache);

        let action = state.toggle_favorite(&"p3".into()).unwrap();
        assert_eq!(action, FavoriteAction::Add);
        let saved: Vec<String> = cache.get(FAVORITES_KEY).unwrap().unwrap();
        assert_eq!(saved, vec!["p1", "p5", "p3"]);

        assert_eq!(
            state.toggle_favorite(&"p3".into()).unwrap(),
            FavoriteAction::Remove
        );
        assert!(matches!(
            state.toggle_favorite(&"p404".into()),
            Err(AssistantError::Commerce(CommerceError::ProductNotFound(_)))
        ));
        state.shutdown().await;
    }

    #[tokio::test]
    async fn test_view_product_moves_to_front() {
        let cache = Cache::open_memory();
        let state = start(&cache);

        let product = state.view_product(&"p1".into()).unwrap();
        assert_eq!(product.id.as_str(), "p1");
        assert_eq!(ids(&state.viewed_products()), vec!["p1", "p2"]);

        let saved: Vec<String> = cache.get(VIEWED_KEY).unwrap().unwrap();
        assert_eq!(saved, vec!["p1", "p2"]);

        state.clear_viewed().unwrap();
        assert!(state.viewed().is_empty());
        state.shutdown().await;
    }

    #[tokio::test]
    async fn test_failed_save_keeps_previous_state() {
        let (cache, failing) = flaky_cache();
        let state = start(&cache);

        failing.store(true, Ordering::SeqCst);
        assert!(matches!(
            state.toggle_favorite(&"p3".into()),
            Err(AssistantError::Cache(CacheError::StoreError { .. }))
        ));
        assert!(!state.is_favorite(&"p3".into()));
        assert!(state.view_product(&"p4".into()).is_err());
        assert_eq!(
            state.viewed(),
            vec![ProductId::new("p2"), ProductId::new("p1")]
        );
        assert!(state.clear_favorites().is_err());
        assert_eq!(state.favorites().len(), 2);

        failing.store(false, Ordering::SeqCst);
        assert_eq!(
            state.toggle_favorite(&"p3".into()).unwrap(),
            FavoriteAction::Add
        );
        state.shutdown().await;
    }

    #[tokio::test]
    async fn test_profile_counts_activity() {
        let state = start(&Cache::open_memory());
        state.toggle_favorite(&"p3".into()).unwrap();

        let profile = state.profile();
        assert_eq!(profile.user.email, "guest@shopsmart.com");
        assert_eq!(profile.favorites, 3);
        assert_eq!(profile.viewed, 2);
        assert_eq!(profile.chats, 1);

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["name"], "Guest User");
        assert_eq!(json["favorites"], 3);
        state.shutdown().await;
    }

    #[tokio::test]
    async fn test_compare_needs_two_products() {
        let state = start(&Cache::open_memory());

        let products = state.compare(&["p1".into(), "p5".into()]).unwrap();
        assert_eq!(ids(&products), vec!["p1", "p5"]);

        assert!(matches!(
            state.compare(&["p1".into()]),
            Err(AssistantError::Commerce(CommerceError::CompareTooFew { .. }))
        ));
        assert!(matches!(
            state.compare(&["p1", "p2", "p3", "p4", "p5"].map(ProductId::new)),
            Err(AssistantError::Commerce(CommerceError::CompareLimitReached(4)))
        ));
        state.shutdown().await;
    }

    #[tokio::test]
    async fn test_corrupt_slot_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::open_dir(dir.path()).unwrap();
        cache.set_raw(VIEWED_KEY, "{not json").unwrap();

        let result = AppState::start(config(), cache, AppData::bundled().unwrap());
        match result {
            Err(AssistantError::Cache(CacheError::Corrupt { key, .. })) => {
                assert_eq!(key, VIEWED_KEY)
            }
            other => panic!("expected corrupt slot error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_shutdown_drains_pending_replies() {
        let cache = Cache::open_memory();
        let state = start(&cache);

        let (chat_id, _pending) = state.chats().create_chat("new running shoes").unwrap();
        state.shutdown().await;

        let chats: Vec<Chat> = cache.get(CHATS_KEY).unwrap().unwrap();
        let chat = chats.iter().find(|c| c.id == chat_id).unwrap();
        assert_eq!(chat.messages.len(), 3);
    }

    #[tokio::test]
    async fn test_reset_clears_slots() {
        let cache = Cache::open_memory();
        let state = start(&cache);
        state.toggle_favorite(&"p2".into()).unwrap();
        state.shutdown().await;

        AppState::reset(&cache).unwrap();
        for key in STATE_KEYS {
            assert!(!cache.exists(key).unwrap());
        }
    }
}
