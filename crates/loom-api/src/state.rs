use std::sync::Arc;

use loom_chat::ChatService;
use loom_persist::ChatStore;

use crate::config::Config;

/// Shared application state passed to all handlers.
///
/// The store and service are constructed once at startup and injected here;
/// nothing in the handlers reaches for ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn ChatStore>,
    pub chat: Arc<ChatService>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn ChatStore>, chat: ChatService) -> Self {
        Self {
            config: Arc::new(config),
            store,
            chat: Arc::new(chat),
        }
    }
}
