//! Slack integration for offboard-bot.
//!
//! This module provides the Slack implementation of `GenericChatClient`:
//! - Receiving push events over Socket Mode
//! - Resolving user profiles through `users.info`
//! - Posting confirmation messages

use crate::{
    base::{
        config::Config,
        dedup::DedupCache,
        types::{Envelope, InboundEvent, Res, UserProfile, Void},
    },
    interaction,
    runtime::Runtime,
    service::mail::MailClient,
};
use async_trait::async_trait;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use slack_morphism::prelude::*;
use tracing::{debug, info, instrument, warn};

use std::sync::Arc;

use super::{ChatClient, GenericChatClient};

// Type aliases.

type FullClient = slack_morphism::SlackClient<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;

// Extra methods on `ChatClient` applied by the slack implementation.

impl ChatClient {
    /// Creates a new Slack chat client.
    pub async fn slack(config: &Config, mail: MailClient, dedup: DedupCache) -> Res<Self> {
        let client = SlackChatClient::new(config, mail, dedup).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<SlackChatClient> for ChatClient {
    fn from(client: SlackChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Structs.

/// User state for the slack socket client.
struct SlackUserState {
    runtime: Runtime,
}

/// Slack client implementation.
#[derive(Clone)]
struct SlackChatClient {
    app_token: SlackApiToken,
    bot_token: SlackApiToken,
    bot_user_id: String,
    client: Arc<FullClient>,
    config: Config,
    mail: MailClient,
    dedup: DedupCache,
}

impl SlackChatClient {
    /// Create a new Slack chat client.
    #[instrument(name = "SlackChatClient::new", skip_all)]
    pub async fn new(config: &Config, mail: MailClient, dedup: DedupCache) -> Res<Self> {
        // Initialize tokens.

        let app_token = SlackApiToken::new(SlackApiTokenValue(config.slack_app_token.clone()));
        let bot_token = SlackApiToken::new(SlackApiTokenValue(config.slack_bot_token.clone()));

        // Initialize the Slack client.

        let https_connector = HttpsConnector::<HttpConnector>::builder().with_native_roots()?.https_only().enable_all_versions().build();
        let connector = SlackClientHyperConnector::with_connector(https_connector);
        let client = Arc::new(slack_morphism::SlackClient::new(connector));

        // Get the bot's user ID.

        let session = client.open_session(&bot_token);
        let bot_user = session.auth_test().await?;
        let bot_user_id = bot_user.user_id.0;

        info!("Slack bot user ID: {}", bot_user_id);

        Ok(Self {
            app_token,
            bot_token,
            bot_user_id,
            client,
            config: config.clone(),
            mail,
            dedup,
        })
    }
}

#[async_trait]
impl GenericChatClient for SlackChatClient {
    fn bot_user_id(&self) -> &str {
        &self.bot_user_id
    }

    async fn start(&self) -> Void {
        // Initialize the socket mode listener.

        let socket_mode_callbacks = SlackSocketModeListenerCallbacks::new().with_push_events(handle_push_event);

        // Initialize the socket mode listener environment.

        let runtime = Runtime {
            config: self.config.clone(),
            chat: ChatClient::from(self.clone()),
            mail: self.mail.clone(),
            dedup: self.dedup.clone(),
        };

        let listener_environment = Arc::new(SlackClientEventsListenerEnvironment::new(self.client.clone()).with_user_state(SlackUserState { runtime }));

        let socket_mode_listener = Arc::new(SlackClientSocketModeListener::new(
            &SlackClientSocketModeConfig::new(),
            listener_environment.clone(),
            socket_mode_callbacks,
        ));

        // Register an app token to listen for events,
        socket_mode_listener.listen_for(&self.app_token).await?;

        info!("Listening for messages in channel {} ...", self.config.monitored_channel_id);

        // Start WS connections calling Slack API to get WS url for the token,
        // and wait for Ctrl-C to shutdown.
        socket_mode_listener.serve().await;

        Ok(())
    }

    async fn acknowledge(&self, envelope_id: &str) -> Void {
        // The socket mode listener writes the ack frame itself as soon as the
        // push callback returns, and the callback never waits on processing.
        debug!("Envelope {} acknowledged by socket mode listener.", envelope_id);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_user_profile(&self, user_id: &str) -> Res<UserProfile> {
        let request = SlackApiUsersInfoRequest::new(SlackUserId(user_id.to_string()));
        let session = self.client.open_session(&self.bot_token);

        let response = session.users_info(&request).await.map_err(|e| anyhow::anyhow!("Failed to fetch user info: {}", e))?;

        let profile = response.user.profile;

        Ok(UserProfile {
            email: profile.as_ref().and_then(|p| p.email.as_ref()).map(|email| email.0.clone()),
            real_name: profile.and_then(|p| p.real_name),
        })
    }

    #[instrument(skip(self, text))]
    async fn post_message(&self, channel_id: &str, text: &str) -> Void {
        let message = SlackMessageContent::new().with_text(text.to_string());
        let request = SlackApiChatPostMessageRequest::new(SlackChannelId(channel_id.to_string()), message);

        let session = self.client.open_session(&self.bot_token);

        let _ = session.chat_post_message(&request).await.map_err(|e| anyhow::anyhow!("Failed to send message: {}", e))?;

        Ok(())
    }
}

// Socket mode listener callbacks for Slack.

/// Handles push events from Slack.
///
/// Processing is spawned so this returns (and the listener acknowledges) immediately.
#[instrument(skip_all, fields(event_id = %event_callback.event_id.0))]
async fn handle_push_event(event_callback: SlackPushEventCallback, _client: Arc<SlackHyperClient>, states: SlackClientEventsUserState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let states = states.read().await;
    let user_state = states.get_user_state::<SlackUserState>().ok_or(anyhow::anyhow!("Failed to get user state"))?;

    let envelope = match to_envelope(&event_callback) {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!("Dropping push event that could not be read: {}", err);
            return Ok(());
        }
    };

    interaction::offboarding::handle_envelope(envelope, user_state.runtime.clone());

    Ok(())
}

// Helpers.

/// Flatten a Slack push event into the bot's envelope type.
///
/// The Slack event body serializes back to its wire shape (`type`, `channel`,
/// `user`, `text`, ...), which `InboundEvent` reads directly.
fn to_envelope(event_callback: &SlackPushEventCallback) -> Res<Envelope> {
    let event_id = event_callback.event_id.0.clone();

    let value = serde_json::to_value(&event_callback.event)?;
    let mut event: InboundEvent = serde_json::from_value(value)?;
    event.event_id = event_id.clone();

    Ok(Envelope { envelope_id: event_id, event })
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    fn push_event(event: serde_json::Value) -> SlackPushEventCallback {
        serde_json::from_value(serde_json::json!({
            "team_id": "T1",
            "api_app_id": "A1",
            "event": event,
            "event_id": "Ev9",
            "event_time": 1700000000,
        }))
        .unwrap()
    }

    #[test]
    fn test_message_push_event_to_envelope() {
        let callback = push_event(serde_json::json!({
            "type": "message",
            "channel": "C1",
            "user": "U1",
            "text": "I RESIGN",
            "ts": "1700000000.000100",
        }));

        let envelope = to_envelope(&callback).unwrap();

        assert_eq!(envelope.envelope_id, "Ev9");
        assert_eq!(envelope.event.event_id, "Ev9");
        assert_eq!(envelope.event.event_type, "message");
        assert_eq!(envelope.event.channel.as_deref(), Some("C1"));
        assert_eq!(envelope.event.user.as_deref(), Some("U1"));
        assert_eq!(envelope.event.text.as_deref(), Some("I RESIGN"));
    }

    #[test]
    fn test_app_mention_push_event_keeps_its_type() {
        let callback = push_event(serde_json::json!({
            "type": "app_mention",
            "channel": "C1",
            "user": "U1",
            "text": "<@UBOT> I resign",
            "ts": "1700000000.000200",
        }));

        let envelope = to_envelope(&callback).unwrap();

        assert_eq!(envelope.event.event_id, "Ev9");
        assert_eq!(envelope.event.event_type, "app_mention");
        assert_ne!(envelope.event.event_type, crate::base::types::MESSAGE_EVENT_TYPE);
    }
}
