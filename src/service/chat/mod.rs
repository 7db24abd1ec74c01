pub mod slack;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{Res, UserProfile, Void};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines everything the offboarding flow needs from a chat
/// platform: the inbound event connection, envelope acknowledgment, the user
/// directory, and posting messages.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Get the bot user ID.
    ///
    /// Returns the unique identifier for the bot in the chat platform,
    /// which is used to ignore the bot's own messages.
    fn bot_user_id(&self) -> &str;

    /// Start the chat client listener.
    ///
    /// This opens the long-lived event connection and blocks until shutdown.
    async fn start(&self) -> Void;

    /// Acknowledge receipt of an inbound envelope.
    ///
    /// The event source redelivers any envelope it does not see acknowledged.
    async fn acknowledge(&self, envelope_id: &str) -> Void;

    /// Look up a user's directory profile.
    async fn get_user_profile(&self, user_id: &str) -> Res<UserProfile>;

    /// Post a top-level message to a channel.
    async fn post_message(&self, channel_id: &str, text: &str) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
