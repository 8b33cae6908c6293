//! Chat list state and the delayed reply worker.
//!
//! Sending a message appends it immediately and queues a job
//! for the [`ResponseWorker`]. Each reply is due one configured delay after
//! its own send; the worker then runs the [`Responder`] and appends the
//! replies to the chat the job was queued for.
//!
//! A mutation is saved before it is kept: if the save fails the chat list
//! is left as it was.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use shop_cache::Slot;
use shop_commerce::ChatId;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::chat::Chat;
use crate::config::AssistantConfig;
use crate::error::AssistantError;
use crate::message::Message;
use crate::responder::Responder;
use crate::sync::lock;

/// Chats plus the number of replies still pending per chat.
#[derive(Debug, Default)]
struct ChatBook {
    /// Most recently created first.
    chats: Vec<Chat>,
    in_flight: HashMap<ChatId, usize>,
}

impl ChatBook {
    fn get_mut(&mut self, id: &ChatId) -> Option<&mut Chat> {
        self.chats.iter_mut().find(|chat| &chat.id == id)
    }

    fn begin(&mut self, id: &ChatId) {
        *self.in_flight.entry(id.clone()).or_insert(0) += 1;
    }

    fn finish(&mut self, id: &ChatId) {
        if let Some(count) = self.in_flight.get_mut(id) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.in_flight.remove(id);
            }
        }
    }
}

#[derive(Debug)]
struct Shared {
    book: Mutex<ChatBook>,
    slot: Slot<Vec<Chat>>,
    title_max_chars: usize,
}

impl Shared {
    fn persist(&self, book: &ChatBook) -> Result<(), AssistantError> {
        self.slot.save(&book.chats)?;
        Ok(())
    }

    /// Append replies to the chat a job was queued for.
    fn deliver(&self, chat_id: &ChatId, replies: &[Message]) {
        let mut book = lock(&self.book);
        match book.get_mut(chat_id) {
            Some(chat) => chat.messages.extend(replies.iter().cloned()),
            None => tracing::warn!(chat_id = %chat_id, "reply for unknown chat dropped"),
        }
        book.finish(chat_id);

        if let Err(e) = self.persist(&book) {
            tracing::warn!(chat_id = %chat_id, error = %e, "failed to persist chat reply");
        }
    }
}

/// A queued reply request.
#[derive(Debug)]
struct ResponseJob {
    chat_id: ChatId,
    text: String,
    enqueued_at: Instant,
    reply: oneshot::Sender<Vec<Message>>,
}

/// Handle to a reply that has not been delivered yet.
#[derive(Debug)]
pub struct PendingReply {
    chat_id: ChatId,
    rx: oneshot::Receiver<Vec<Message>>,
}

impl PendingReply {
    /// Chat the reply will be appended to.
    pub fn chat_id(&self) -> &ChatId {
        &self.chat_id
    }

    /// Wait until the worker has appended the replies, and return them.
    pub async fn wait(self) -> Result<Vec<Message>, AssistantError> {
        self.rx.await.map_err(|_| AssistantError::WorkerStopped)
    }
}

/// The chat list.
///
/// Cheap to clone; clones share state and the job queue. The worker stops
/// once every clone is dropped and the queue is drained.
#[derive(Debug, Clone)]
pub struct ChatStore {
    shared: Arc<Shared>,
    jobs: mpsc::UnboundedSender<ResponseJob>,
}

impl ChatStore {
    /// Build a store over `chats` and the worker that answers it.
    ///
    /// The worker does nothing until [`ResponseWorker::run`] is polled.
    pub fn new(
        chats: Vec<Chat>,
        slot: Slot<Vec<Chat>>,
        responder: Responder,
        config: &AssistantConfig,
    ) -> (Self, ResponseWorker) {
        let shared = Arc::new(Shared {
            book: Mutex::new(ChatBook {
                chats,
                in_flight: HashMap::new(),
            }),
            slot,
            title_max_chars: config.title_max_chars,
        });
        let (tx, rx) = mpsc::unbounded_channel();

        let worker = ResponseWorker {
            shared: Arc::clone(&shared),
            rx,
            responder,
            delay: config.response_delay(),
            rng: StdRng::from_entropy(),
        };
        (Self { shared, jobs: tx }, worker)
    }

    /// Build a store and spawn its worker on the current tokio runtime.
    pub fn spawn(
        chats: Vec<Chat>,
        slot: Slot<Vec<Chat>>,
        responder: Responder,
        config: &AssistantConfig,
    ) -> (Self, JoinHandle<()>) {
        let (store, worker) = Self::new(chats, slot, responder, config);
        let handle = tokio::spawn(worker.run());
        (store, handle)
    }

    /// Start a chat, most recent first.
    ///
    /// Non-blank text becomes the first user message and queues a reply;
    /// blank text creates an empty "New Chat".
    pub fn create_chat(
        &self,
        text: &str,
    ) -> Result<(ChatId, Option<PendingReply>), AssistantError> {
        let text = text.trim();
        if !text.is_empty() {
            self.ensure_running()?;
        }

        let mut book = lock(&self.shared.book);
        let mut chat = Chat::new(text, self.shared.title_max_chars);
        let chat_id = chat.id.clone();
        if !text.is_empty() {
            chat.push(Message::user(text));
        }
        book.chats.insert(0, chat);
        if let Err(e) = self.shared.persist(&book) {
            book.chats.remove(0);
            return Err(e);
        }
        tracing::info!(chat_id = %chat_id, "chat created");

        if text.is_empty() {
            return Ok((chat_id, None));
        }
        let pending = self.enqueue(&mut book, &chat_id, text)?;
        Ok((chat_id, Some(pending)))
    }

    /// Append a user message to `chat_id` and queue a reply.
    pub fn send_message(&self, chat_id: &ChatId, text: &str) -> Result<PendingReply, AssistantError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AssistantError::EmptyMessage);
        }
        self.ensure_running()?;

        let mut book = lock(&self.shared.book);
        let chat = book
            .get_mut(chat_id)
            .ok_or_else(|| AssistantError::ChatNotFound(chat_id.clone()))?;
        chat.push(Message::user(text));
        if let Err(e) = self.shared.persist(&book) {
            if let Some(chat) = book.get_mut(chat_id) {
                chat.messages.pop();
            }
            return Err(e);
        }
        tracing::debug!(chat_id = %chat_id, "message sent");

        self.enqueue(&mut book, chat_id, text)
    }

    /// Send to the most recently created chat, starting one if none exist.
    pub fn send_to_latest(&self, text: &str) -> Result<(ChatId, PendingReply), AssistantError> {
        if text.trim().is_empty() {
            return Err(AssistantError::EmptyMessage);
        }
        if let Some(chat_id) = self.latest_id() {
            let pending = self.send_message(&chat_id, text)?;
            return Ok((chat_id, pending));
        }
        match self.create_chat(text)? {
            (chat_id, Some(pending)) => Ok((chat_id, pending)),
            (_, None) => Err(AssistantError::EmptyMessage),
        }
    }

    /// All chats, most recent first.
    pub fn chats(&self) -> Vec<Chat> {
        lock(&self.shared.book).chats.clone()
    }

    pub fn chat(&self, chat_id: &ChatId) -> Option<Chat> {
        lock(&self.shared.book)
            .chats
            .iter()
            .find(|chat| &chat.id == chat_id)
            .cloned()
    }

    /// The most recently created chat.
    pub fn latest(&self) -> Option<Chat> {
        lock(&self.shared.book).chats.first().cloned()
    }

    fn latest_id(&self) -> Option<ChatId> {
        lock(&self.shared.book).chats.first().map(|chat| chat.id.clone())
    }

    /// Whether a reply is still pending for `chat_id`.
    pub fn is_typing(&self, chat_id: &ChatId) -> bool {
        lock(&self.shared.book).in_flight.contains_key(chat_id)
    }

    pub fn any_typing(&self) -> bool {
        !lock(&self.shared.book).in_flight.is_empty()
    }

    pub fn len(&self) -> usize {
        lock(&self.shared.book).chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_running(&self) -> Result<(), AssistantError> {
        if self.jobs.is_closed() {
            return Err(AssistantError::WorkerStopped);
        }
        Ok(())
    }

    fn enqueue(
        &self,
        book: &mut ChatBook,
        chat_id: &ChatId,
        text: &str,
    ) -> Result<PendingReply, AssistantError> {
        let (tx, rx) = oneshot::channel();
        let job = ResponseJob {
            chat_id: chat_id.clone(),
            text: text.to_string(),
            enqueued_at: Instant::now(),
            reply: tx,
        };

        book.begin(chat_id);
        if self.jobs.send(job).is_err() {
            book.finish(chat_id);
            return Err(AssistantError::WorkerStopped);
        }

        Ok(PendingReply {
            chat_id: chat_id.clone(),
            rx,
        })
    }
}

/// Task that answers queued messages one at a time, in order.
///
/// Each reply is due one delay after its own send.
pub struct ResponseWorker {
    shared: Arc<Shared>,
    rx: mpsc::UnboundedReceiver<ResponseJob>,
    responder: Responder,
    delay: Duration,
    rng: StdRng,
}

impl std::fmt::Debug for ResponseWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseWorker")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl ResponseWorker {
    /// Replace the fallback reply randomness.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Process jobs until every [`ChatStore`] handle is dropped.
    pub async fn run(mut self) {
        tracing::debug!(delay_ms = self.delay.as_millis() as u64, "response worker started");

        while let Some(job) = self.rx.recv().await {
            tokio::time::sleep_until(job.enqueued_at + self.delay).await;

            let replies = self.responder.respond(&job.text, &mut self.rng);
            self.shared.deliver(&job.chat_id, &replies);
            tracing::info!(chat_id = %job.chat_id, replies = replies.len(), "assistant replied");

            // The caller may have stopped waiting.
            let _ = job.reply.send(replies);
        }

        tracing::debug!("response worker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;
    use crate::testing::flaky_cache;
    use shop_cache::{Cache, CacheError, CHATS_KEY};
    use shop_commerce::ProductId;
    use std::sync::atomic::Ordering;

    fn config() -> AssistantConfig {
        AssistantConfig::default().with_response_delay_ms(20)
    }

    fn spawn_store(cache: &Cache) -> (ChatStore, JoinHandle<()>) {
        let (store, worker) = ChatStore::new(
            Vec::new(),
            Slot::new(cache.clone(), CHATS_KEY),
            Responder::new(),
            &config(),
        );
        let handle = tokio::spawn(worker.with_rng(StdRng::seed_from_u64(7)).run());
        (store, handle)
    }

    #[tokio::test]
    async fn test_create_chat_gets_recommendation() {
        let cache = Cache::open_memory();
        let (store, _worker) = spawn_store(&cache);

        let (chat_id, pending) = store.create_chat("I need wireless earbuds").unwrap();
        assert!(store.is_typing(&chat_id));

        let replies = pending.unwrap().wait().await.unwrap();
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[1].recommended_ids(), &[ProductId::new("p1")]);

        let chat = store.chat(&chat_id).unwrap();
        assert_eq!(chat.title, "I need wireless earbuds");
        assert_eq!(chat.messages.len(), 3);
        assert_eq!(chat.messages[0].role, Role::User);
        assert!(!store.is_typing(&chat_id));
    }

    #[tokio::test]
    async fn test_reply_goes_to_chat_captured_at_send() {
        let cache = Cache::open_memory();
        let (store, _worker) = spawn_store(&cache);

        let (first, pending) = store.create_chat("looking for a water bottle").unwrap();
        let (second, _) = store.create_chat("").unwrap();
        assert_eq!(store.latest().unwrap().id, second);

        pending.unwrap().wait().await.unwrap();

        assert_eq!(store.chat(&first).unwrap().messages.len(), 3);
        assert!(store.chat(&second).unwrap().messages.is_empty());
        assert_eq!(store.chats()[0].id, second);
    }

    #[tokio::test]
    async fn test_typing_clears_after_last_reply() {
        let cache = Cache::open_memory();
        let (store, _worker) = spawn_store(&cache);

        let (chat_id, first) = store.create_chat("earbuds").unwrap();
        let second = store.send_message(&chat_id, "a desk keyboard").unwrap();

        first.unwrap().wait().await.unwrap();
        assert!(store.is_typing(&chat_id));

        second.wait().await.unwrap();
        assert!(!store.is_typing(&chat_id));
        assert!(!store.any_typing());
        assert_eq!(store.chat(&chat_id).unwrap().messages.len(), 6);
    }

    #[tokio::test]
    async fn test_replies_are_persisted() {
        let cache = Cache::open_memory();
        let (store, _worker) = spawn_store(&cache);

        let (chat_id, pending) = store.create_chat("hello there").unwrap();
        pending.unwrap().wait().await.unwrap();

        let slot: Slot<Vec<Chat>> = Slot::new(cache, CHATS_KEY);
        let saved = slot.load().unwrap().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id, chat_id);
        assert_eq!(saved[0].messages.len(), 2);
    }

    #[tokio::test]
    async fn test_each_reply_waits_from_its_own_send() {
        let (store, worker) = ChatStore::new(
            Vec::new(),
            Slot::new(Cache::open_memory(), CHATS_KEY),
            Responder::new(),
            &AssistantConfig::default().with_response_delay_ms(200),
        );
        tokio::spawn(worker.with_rng(StdRng::seed_from_u64(7)).run());

        let (a, _) = store.create_chat("").unwrap();
        let (b, _) = store.create_chat("").unwrap();

        let sent = std::time::Instant::now();
        let first = store.send_message(&a, "earbuds").unwrap();
        let second = store.send_message(&b, "water").unwrap();
        first.wait().await.unwrap();
        second.wait().await.unwrap();
        let elapsed = sent.elapsed();

        assert!(elapsed >= Duration::from_millis(200), "{:?}", elapsed);
        assert!(elapsed < Duration::from_millis(380), "{:?}", elapsed);
        assert_eq!(store.chat(&b).unwrap().messages.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_save_leaves_chats_unchanged() {
        let (cache, failing) = flaky_cache();
        let (store, _worker) = spawn_store(&cache);
        let (chat_id, _) = store.create_chat("").unwrap();

        failing.store(true, Ordering::SeqCst);
        assert!(matches!(
            store.send_message(&chat_id, "earbuds"),
            Err(AssistantError::Cache(CacheError::StoreError { .. }))
        ));
        assert!(store.chat(&chat_id).unwrap().messages.is_empty());
        assert!(!store.is_typing(&chat_id));

        assert!(store.create_chat("water bottle").is_err());
        assert_eq!(store.len(), 1);
        assert!(!store.any_typing());

        failing.store(false, Ordering::SeqCst);
        store.send_message(&chat_id, "earbuds").unwrap().wait().await.unwrap();
        let saved: Vec<Chat> = cache.get(CHATS_KEY).unwrap().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].messages.len(), 3);
    }

    #[tokio::test]
    async fn test_send_validation() {
        let cache = Cache::open_memory();
        let (store, _worker) = spawn_store(&cache);

        assert!(matches!(
            store.send_to_latest("   "),
            Err(AssistantError::EmptyMessage)
        ));
        assert!(matches!(
            store.send_message(&ChatId::new("c-missing"), "hi"),
            Err(AssistantError::ChatNotFound(_))
        ));

        let (created, pending) = store.send_to_latest("vacuum").unwrap();
        pending.wait().await.unwrap();
        let (reused, pending) = store.send_to_latest("and shoes").unwrap();
        pending.wait().await.unwrap();
        assert_eq!(created, reused);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_stopped_worker_is_reported() {
        let (store, worker) = ChatStore::new(
            Vec::new(),
            Slot::new(Cache::open_memory(), CHATS_KEY),
            Responder::new(),
            &config(),
        );
        drop(worker);

        assert!(matches!(
            store.create_chat("earbuds"),
            Err(AssistantError::WorkerStopped)
        ));
        assert!(!store.any_typing());
    }
}
