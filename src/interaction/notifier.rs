//! Post the "offboarding initiated" confirmation.

use tracing::{error, info, instrument};

use crate::{
    base::{templates, types::StepOutcome},
    service::chat::ChatClient,
};

#[instrument(skip(chat))]
pub async fn notify_initiated(chat: &ChatClient, channel_id: &str, display_name: &str) -> StepOutcome {
    let text = templates::render_initiated_message(display_name);

    match chat.post_message(channel_id, &text).await {
        Ok(()) => {
            info!("Offboarding initiation message sent for {}", display_name);
            StepOutcome::Sent
        }
        Err(err) => {
            error!("Error sending offboarding initiation message: {}", err);
            StepOutcome::Failed(err.to_string())
        }
    }
}
