//! Library root for `offboard-bot`.
//!
//! Offboard-bot watches a Slack channel for people announcing their
//! resignation and:
//! - Emails them the offboarding checklist
//! - Posts a confirmation that the process has started
//!
//! The bot integrates with Slack (Socket Mode) for events, directory lookups
//! and posting, and with an SMTP relay for email. Both sit behind traits so
//! the flow can be exercised without either service.

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the offboard-bot runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with the dedup cache, mail and chat clients
/// - Starts the Socket Mode listener
pub async fn start(config: Config) -> Void {
    info!("Starting offboard-bot ...");

    // Start the crypto provider.
    crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install the rustls crypto provider."))?;

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
