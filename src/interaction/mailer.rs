//! Compose and send the offboarding instructions email.

use tracing::{error, info, instrument};

use crate::{
    base::{
        config::Config,
        templates::{self, OffboardingLinks},
        types::{OutboundEmail, StepOutcome},
    },
    service::mail::MailClient,
};

/// Renders the offboarding email for `display_name` and sends it to `to_email`.
///
/// A send failure is logged and returned as `StepOutcome::Failed`; it is never retried.
#[instrument(skip(mail, config))]
pub async fn send_offboarding_email(mail: &MailClient, config: &Config, to_email: &str, display_name: &str) -> StepOutcome {
    let email = compose_offboarding_email(config, to_email, display_name);

    match mail.send_mail(&email).await {
        Ok(()) => {
            info!("Offboarding email successfully sent to {}", to_email);
            StepOutcome::Sent
        }
        Err(err) => {
            error!("Failed to send offboarding email to {}: {}", to_email, err);
            StepOutcome::Failed(err.to_string())
        }
    }
}

/// Builds the offboarding email from configuration.
pub fn compose_offboarding_email(config: &Config, to_email: &str, display_name: &str) -> OutboundEmail {
    let links = OffboardingLinks {
        hr_contact_email: config.hr_contact_email.as_deref(),
        exit_survey_url: config.exit_survey_url.as_deref(),
    };

    OutboundEmail {
        to: to_email.to_string(),
        display_name: display_name.to_string(),
        subject: config.mail_subject.clone(),
        body: templates::render_offboarding_body(display_name, links, config.mail_format),
        format: config.mail_format,
    }
}
