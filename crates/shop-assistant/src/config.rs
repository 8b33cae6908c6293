//! Assistant tuning knobs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chat::DEFAULT_TITLE_MAX_CHARS;
use crate::viewed::VIEWED_CAPACITY;
use shop_commerce::search::DEFAULT_PAGE_SIZE;

/// Configuration for the assistant state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Simulated "typing" delay before a reply, in milliseconds.
    #[serde(default = "default_response_delay_ms")]
    pub response_delay_ms: u64,

    /// Entries kept in the recently viewed list.
    #[serde(default = "default_viewed_capacity")]
    pub viewed_capacity: usize,

    /// Characters of the first message kept as the chat title.
    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,

    /// Products shown per page when browsing.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_response_delay_ms() -> u64 {
    1500
}

fn default_viewed_capacity() -> usize {
    VIEWED_CAPACITY
}

fn default_title_max_chars() -> usize {
    DEFAULT_TITLE_MAX_CHARS
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            response_delay_ms: default_response_delay_ms(),
            viewed_capacity: default_viewed_capacity(),
            title_max_chars: default_title_max_chars(),
            page_size: default_page_size(),
        }
    }
}

impl AssistantConfig {
    pub fn response_delay(&self) -> Duration {
        Duration::from_millis(self.response_delay_ms)
    }

    /// Same settings with a different reply delay.
    pub fn with_response_delay_ms(mut self, ms: u64) -> Self {
        self.response_delay_ms = ms;
        self
    }
}
