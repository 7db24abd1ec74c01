//! The offboarding flow: turns a "resign" message into an email and a confirmation.

use tracing::{Instrument, info, instrument, warn};

use crate::{
    base::types::{Envelope, EventOutcome, IgnoreReason, InboundEvent, MESSAGE_EVENT_TYPE},
    interaction::{directory, mailer, notifier},
    runtime::Runtime,
};

/// Handles an inbound envelope.
///
/// Processing runs as its own task, so the caller is never blocked on the
/// directory, the mail relay or the chat API.
#[instrument(skip_all, fields(event_id = %envelope.event.event_id))]
pub fn handle_envelope(envelope: Envelope, runtime: Runtime) {
    tokio::spawn(
        async move {
            let outcome = process_envelope(envelope, &runtime).await;
            info!("Event finished: {:?}", outcome);
        }
        .in_current_span(),
    );
}

/// Processes a single envelope to completion and reports how it ended.
///
/// The envelope is acknowledged before anything else happens, whatever the outcome.
#[instrument(skip_all, fields(envelope_id = %envelope.envelope_id))]
pub async fn process_envelope(envelope: Envelope, runtime: &Runtime) -> EventOutcome {
    if let Err(err) = runtime.chat.acknowledge(&envelope.envelope_id).await {
        warn!("Failed to acknowledge envelope: {}", err);
    }

    let event = envelope.event;

    if runtime.dedup.seen_or_mark(&event.event_id) {
        warn!("Duplicate event {} skipped", event.event_id);
        return EventOutcome::Duplicate;
    }

    let user_id = match check_event(&event, runtime.chat.bot_user_id(), &runtime.config.monitored_channel_id, &runtime.config.trigger_phrase) {
        Ok(user_id) => user_id,
        Err(reason) => return EventOutcome::Ignored(reason),
    };

    info!("Detected resignation message from {}", user_id);

    let (email, name) = directory::resolve_user(&runtime.chat, user_id, &runtime.config.default_display_name).await;

    let Some(email) = email else {
        warn!("Could not find an email for user {}", user_id);
        return EventOutcome::NoEmail;
    };

    // The confirmation promises an email, so it is only posted after the send.
    let email = mailer::send_offboarding_email(&runtime.mail, &runtime.config, &email, &name).await;
    let notify = notifier::notify_initiated(&runtime.chat, runtime.config.confirmation_channel(), &name).await;

    EventOutcome::Triggered { email, notify }
}

/// Decides whether `event` should start the offboarding flow.
///
/// Returns the originating user on a match, or why the event was ignored.
pub fn check_event<'a>(event: &'a InboundEvent, bot_user_id: &str, monitored_channel_id: &str, trigger_phrase: &str) -> Result<&'a str, IgnoreReason> {
    if event.event_type != MESSAGE_EVENT_TYPE {
        return Err(IgnoreReason::NotMessage);
    }

    let Some(text) = event.text.as_deref() else {
        return Err(IgnoreReason::NoText);
    };

    let user_id = match event.user.as_deref() {
        None => return Err(IgnoreReason::NoUser),
        Some(user_id) if user_id == bot_user_id => return Err(IgnoreReason::SelfMessage),
        Some(user_id) => user_id,
    };

    if event.channel.as_deref() != Some(monitored_channel_id) {
        return Err(IgnoreReason::OtherChannel);
    }

    if !contains_trigger(text, trigger_phrase) {
        return Err(IgnoreReason::NoTrigger);
    }

    Ok(user_id)
}

/// Case-insensitive substring match.
pub fn contains_trigger(text: &str, trigger_phrase: &str) -> bool {
    text.to_lowercase().contains(&trigger_phrase.to_lowercase())
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    const BOT: &str = "UBOT";
    const CHANNEL: &str = "C0MONITOR";

    fn message(user: Option<&str>, channel: Option<&str>, text: Option<&str>) -> InboundEvent {
        InboundEvent {
            event_id: "Ev1".to_string(),
            event_type: MESSAGE_EVENT_TYPE.to_string(),
            channel: channel.map(str::to_string),
            user: user.map(str::to_string),
            text: text.map(str::to_string),
        }
    }

    fn check(event: &InboundEvent) -> Result<&str, IgnoreReason> {
        check_event(event, BOT, CHANNEL, "resign")
    }

    #[test]
    fn test_trigger_is_case_insensitive() {
        assert!(contains_trigger("I want to RESIGN today", "resign"));
        assert!(contains_trigger("I have resigned.", "resign"));
        assert!(contains_trigger("my resignation letter", "Resign"));
        assert!(!contains_trigger("I want to design today", "resign"));
    }

    #[test]
    fn test_match() {
        let event = message(Some("U1"), Some(CHANNEL), Some("I want to RESIGN today"));
        assert_eq!(check(&event), Ok("U1"));
    }

    #[test]
    fn test_non_message_ignored() {
        let event = InboundEvent {
            event_type: "app_mention".to_string(),
            ..message(Some("U1"), Some(CHANNEL), Some("resign"))
        };
        assert_eq!(check(&event), Err(IgnoreReason::NotMessage));
    }

    #[test]
    fn test_missing_text_ignored() {
        let event = message(Some("U1"), Some(CHANNEL), None);
        assert_eq!(check(&event), Err(IgnoreReason::NoText));
    }

    #[test]
    fn test_missing_user_ignored() {
        let event = message(None, Some(CHANNEL), Some("resign"));
        assert_eq!(check(&event), Err(IgnoreReason::NoUser));
    }

    #[test]
    fn test_own_message_ignored() {
        let event = message(Some(BOT), Some(CHANNEL), Some("Hello there, your resignation is in progress"));
        assert_eq!(check(&event), Err(IgnoreReason::SelfMessage));
    }

    #[test]
    fn test_other_channel_ignored() {
        let event = message(Some("U1"), Some("C0OTHER"), Some("resign"));
        assert_eq!(check(&event), Err(IgnoreReason::OtherChannel));

        let event = message(Some("U1"), None, Some("resign"));
        assert_eq!(check(&event), Err(IgnoreReason::OtherChannel));
    }

    #[test]
    fn test_no_trigger_ignored() {
        let event = message(Some("U1"), Some(CHANNEL), Some("lunch anyone?"));
        assert_eq!(check(&event), Err(IgnoreReason::NoTrigger));
    }
}
