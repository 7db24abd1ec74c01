//! Core components, types, and utilities for the offboard-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - The event deduplication cache.
//! - Email and confirmation message templates.
//! - Common types and result handling.

pub mod config;
pub mod dedup;
pub mod templates;
pub mod types;
