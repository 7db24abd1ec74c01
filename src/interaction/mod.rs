//! Event handling for offboard-bot.
//!
//! This module provides the offboarding flow and the steps it is built from:
//! - Filtering and deduplicating inbound events
//! - Resolving the author's email and name
//! - Sending the offboarding email and posting the confirmation

pub mod directory;
pub mod mailer;
pub mod notifier;
pub mod offboarding;
