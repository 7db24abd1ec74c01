use serde::{Deserialize, Serialize};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// Event type tag for plain channel messages.
pub const MESSAGE_EVENT_TYPE: &str = "message";

/// A single inbound event, as delivered by the event source.
///
/// Only the fields the bot cares about are kept; everything else on the wire is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Delivery identifier, assumed globally unique per event.
    #[serde(default)]
    pub event_id: String,
    /// Type tag (e.g. `message`, `app_mention`).
    #[serde(rename = "type")]
    pub event_type: String,
    /// Originating channel.
    #[serde(default)]
    pub channel: Option<String>,
    /// Originating user.
    #[serde(default)]
    pub user: Option<String>,
    /// Raw text payload.
    #[serde(default)]
    pub text: Option<String>,
}

/// An inbound event wrapped with the correlation identifier that must be acknowledged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Correlation id passed to `acknowledge`.
    ///
    /// Slack's socket mode listener keeps the real envelope id and writes the
    /// ack frame itself, so Slack envelopes carry the event id here.
    pub envelope_id: String,
    pub event: InboundEvent,
}

/// Directory profile for a chat user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub email: Option<String>,
    pub real_name: Option<String>,
}

/// Body format of an outbound email.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailFormat {
    #[default]
    Html,
    Plain,
}

/// A fully rendered email, ready to hand to a mail client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub display_name: String,
    pub subject: String,
    pub body: String,
    pub format: MailFormat,
}

/// Result of one fail-soft step (mail send, confirmation post).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Sent,
    Failed(String),
}

/// Why an event was filtered out before the offboarding flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NotMessage,
    NoText,
    NoUser,
    SelfMessage,
    OtherChannel,
    NoTrigger,
}

/// How processing of a single envelope terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event id was already seen.
    Duplicate,
    /// The event was filtered out.
    Ignored(IgnoreReason),
    /// The trigger matched, but the directory returned no email.
    NoEmail,
    /// The offboarding flow ran.
    Triggered { email: StepOutcome, notify: StepOutcome },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_event_from_wire_shape() {
        let event: InboundEvent = serde_json::from_value(serde_json::json!({
            "type": "message",
            "channel": "C1",
            "user": "U1",
            "text": "hello",
            "ts": "1700000000.000100",
        }))
        .unwrap();

        assert_eq!(event.event_type, MESSAGE_EVENT_TYPE);
        assert_eq!(event.event_id, "");
        assert_eq!(event.channel.as_deref(), Some("C1"));
        assert_eq!(event.user.as_deref(), Some("U1"));
        assert_eq!(event.text.as_deref(), Some("hello"));
    }

    #[test]
    fn test_inbound_event_missing_optionals() {
        let event: InboundEvent = serde_json::from_value(serde_json::json!({ "type": "reaction_added" })).unwrap();

        assert_eq!(event.channel, None);
        assert_eq!(event.user, None);
        assert_eq!(event.text, None);
    }

    #[test]
    fn test_mail_format_lowercase() {
        let format: MailFormat = serde_json::from_value(serde_json::json!("plain")).unwrap();
        assert_eq!(format, MailFormat::Plain);
        assert_eq!(MailFormat::default(), MailFormat::Html);
    }
}
