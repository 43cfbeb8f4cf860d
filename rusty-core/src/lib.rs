use std::sync::Arc;

use twilight_http::Client;
use twilight_model::{
    gateway::payload::incoming::{InteractionCreate, ReactionAdd},
    id::{Id, marker::MessageMarker},
};

use rusty_interactivity::Registry;

/// Environment-driven runtime configuration.
pub mod config;

/// Tracking for spawned interactive sessions.
pub mod sessions;

pub use config::Config;
pub use sessions::SessionTasks;

/// Pending component waits, keyed by the message carrying the components.
pub type ComponentRegistry = Registry<Id<MessageMarker>, Arc<InteractionCreate>>;
/// Pending reaction waits, keyed by the reacted message.
pub type ReactionRegistry = Registry<Id<MessageMarker>, Arc<ReactionAdd>>;

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub http: Arc<Client>,
    pub components: ComponentRegistry,
    pub reactions: ReactionRegistry,
    pub sessions: SessionTasks,
    pub config: Arc<Config>,
}

impl Context {
    /// Create a new application context.
    pub fn new(http: Arc<Client>, config: Config) -> Self {
        Self {
            http,
            components: Registry::new(),
            reactions: Registry::new(),
            sessions: SessionTasks::new(),
            config: Arc::new(config),
        }
    }
}
