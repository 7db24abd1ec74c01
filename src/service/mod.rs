//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for the services used by the offboard-bot:
//! - Chat services (e.g., Slack)
//! - Mail services (e.g., an SMTP relay)
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod chat;
pub mod mail;
