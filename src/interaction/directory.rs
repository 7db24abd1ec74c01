//! Resolve a chat user to an email address and a name to greet them by.

use tracing::{instrument, warn};

use crate::service::chat::ChatClient;

/// Looks up `user_id` in the chat platform's directory.
///
/// Never fails: any lookup error is logged and reported as "no email",
/// greeting the user with `default_name`. A missing or blank name also falls
/// back to `default_name`.
#[instrument(skip(chat, default_name))]
pub async fn resolve_user(chat: &ChatClient, user_id: &str, default_name: &str) -> (Option<String>, String) {
    match chat.get_user_profile(user_id).await {
        Ok(profile) => {
            let email = profile.email.filter(|e| !e.trim().is_empty());
            let name = profile.real_name.filter(|n| !n.trim().is_empty()).unwrap_or_else(|| default_name.to_string());

            (email, name)
        }
        Err(err) => {
            warn!("Error fetching user info: {}", err);
            (None, default_name.to_string())
        }
    }
}
