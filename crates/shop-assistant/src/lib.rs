//! Rule-based shopping chat, favorites, and view history for ShopSmart.
//!
//! This crate provides:
//! - `Responder` - keyword matcher mapping free text to product picks
//! - `ChatStore` / `ResponseWorker` - chat list plus the delayed reply task
//! - `Favorites` / `ViewedHistory` - the two product-id collections
//! - `DemoAuth` - login surface that only ever reports demo mode
//! - `AppState` - composition root tying these to the catalog and cache
//!
//! # Example
//!
//! ```rust,no_run
//! use shop_assistant::{AppData, AppState, AssistantConfig};
//! use shop_cache::Cache;
//!
//! # async fn demo() -> Result<(), shop_assistant::AssistantError> {
//! let state = AppState::start(AssistantConfig::default(), Cache::open_memory(), AppData::bundled()?)?;
//!
//! let (chat_id, pending) = state.chats().create_chat("I need wireless earbuds")?;
//! if let Some(pending) = pending {
//!     let replies = pending.wait().await?;
//!     assert_eq!(replies.len(), 2);
//! }
//! assert!(state.chats().chat(&chat_id).is_some());
//!
//! state.shutdown().await;
//! # Ok(())
//! # }
//! ```

mod auth;
mod chat;
mod config;
mod error;
mod favorites;
mod message;
mod responder;
mod seed;
mod state;
mod store;
mod sync;
#[cfg(test)]
mod testing;
mod viewed;

pub use auth::{
    AuthNotice, DemoAuth, LoginRequest, Profile, SignupRequest, SocialProvider, User,
};
pub use chat::{derive_title, Chat, DEFAULT_TITLE};
pub use config::AssistantConfig;
pub use error::AssistantError;
pub use favorites::{FavoriteAction, Favorites};
pub use message::{Message, MessageKind, Role};
pub use responder::{found_products_text, KeywordGroup, Responder, FALLBACK_REPLIES, KEYWORD_GROUPS};
pub use seed::{AppData, BUNDLED_SEED};
pub use state::AppState;
pub use store::{ChatStore, PendingReply, ResponseWorker};
pub use viewed::{ViewedHistory, VIEWED_CAPACITY};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        AppData, AppState, AssistantConfig, AssistantError, Chat, ChatStore, FavoriteAction,
        Message, PendingReply, Responder, Role,
    };
}
