//! SMTP mail relay integration.
//!
//! Every send opens its own implicit-TLS session to the relay, authenticates,
//! delivers one message and disconnects.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use tracing::{info, instrument};

use crate::base::{
    config::Config,
    types::{MailFormat, OutboundEmail, Res, Void},
};

use super::{GenericMailClient, MailClient};

// Extra methods on `MailClient` applied by the SMTP implementation.

impl MailClient {
    /// Creates a new SMTP mail client.
    pub fn smtp(config: &Config) -> Res<Self> {
        let client = SmtpMailClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Structs.

/// SMTP client implementation.
struct SmtpMailClient {
    sender: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailClient {
    /// Create a new SMTP client for the configured relay.
    #[instrument(name = "SmtpMailClient::new", skip_all)]
    fn new(config: &Config) -> Res<Self> {
        let sender: Mailbox = config
            .sender_address()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid sender address `{}`: {}", config.sender_address(), e))?;

        let credentials = Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        info!("SMTP relay: {}:{}", config.smtp_host, config.smtp_port);

        Ok(Self { sender, transport })
    }
}

#[async_trait]
impl GenericMailClient for SmtpMailClient {
    #[instrument(skip(self, email), fields(to = %email.to))]
    async fn send_mail(&self, email: &OutboundEmail) -> Void {
        let message = build_message(&self.sender, email)?;

        self.transport.send(message).await.map_err(|e| anyhow::anyhow!("SMTP error: {}", e))?;

        Ok(())
    }
}

// Helpers.

/// Build the MIME message for `email`, sent from `sender`.
fn build_message(sender: &Mailbox, email: &OutboundEmail) -> Res<Message> {
    let address: Address = email.to.parse().map_err(|e| anyhow::anyhow!("Invalid recipient address `{}`: {}", email.to, e))?;
    let recipient = Mailbox::new(Some(email.display_name.clone()), address);

    let content_type = match email.format {
        MailFormat::Html => ContentType::TEXT_HTML,
        MailFormat::Plain => ContentType::TEXT_PLAIN,
    };

    let message = Message::builder()
        .from(sender.clone())
        .to(recipient)
        .subject(email.subject.clone())
        .header(content_type)
        .body(email.body.clone())?;

    Ok(message)
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    fn email(to: &str, format: MailFormat) -> OutboundEmail {
        OutboundEmail {
            to: to.to_string(),
            display_name: "Alice".to_string(),
            subject: "Offboarding Instructions".to_string(),
            body: "<p>Hello Alice,</p>".to_string(),
            format,
        }
    }

    #[test]
    fn test_build_html_message() {
        let sender: Mailbox = "HR Bot <hr-bot@example.com>".parse().unwrap();
        let message = build_message(&sender, &email("alice@example.com", MailFormat::Html)).unwrap();

        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("<hr-bot@example.com>"));
        assert!(raw.contains("alice@example.com"));
        assert!(raw.contains("Subject: Offboarding Instructions"));
        assert!(raw.contains("Content-Type: text/html"));
    }

    #[test]
    fn test_build_plain_message() {
        let sender: Mailbox = "hr-bot@example.com".parse().unwrap();
        let message = build_message(&sender, &email("alice@example.com", MailFormat::Plain)).unwrap();

        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Content-Type: text/plain"));
    }

    #[test]
    fn test_invalid_recipient_is_an_error() {
        let sender: Mailbox = "hr-bot@example.com".parse().unwrap();
        let result = build_message(&sender, &email("not-an-address", MailFormat::Html));

        assert!(result.is_err());
    }
}
