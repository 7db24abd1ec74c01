//! Runtime services and shared state for the offboard-bot.

use tracing::instrument;

use crate::{
    base::{
        config::Config,
        dedup::DedupCache,
        types::{Res, Void},
    },
    service::{chat::ChatClient, mail::MailClient},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the configuration, the chat and mail clients, and the
/// event deduplication cache. It is designed to be trivially cloneable,
/// allowing it to be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The chat client instance.
    pub chat: ChatClient,
    /// The mail client instance.
    pub mail: MailClient,
    /// Recently handled event ids.
    pub dedup: DedupCache,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the deduplication cache.
        let dedup = DedupCache::new(config.dedup_capacity, config.dedup_ttl());

        // Initialize the mail client.
        let mail = MailClient::smtp(&config)?;

        // Initialize the slack client.
        let chat = ChatClient::slack(&config, mail.clone(), dedup.clone()).await?;

        Ok(Self { config, chat, mail, dedup })
    }

    pub async fn start(&self) -> Void {
        self.chat.start().await
    }
}
