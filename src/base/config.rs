//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc, time::Duration};

use serde::Deserialize;

use super::types::{MailFormat, Res, Void};

/// Default SMTP port (implicit TLS).
fn default_smtp_port() -> u16 {
    465
}

/// Default subject line for the offboarding email.
fn default_mail_subject() -> String {
    "Offboarding Instructions".to_string()
}

/// Default trigger phrase.
fn default_trigger_phrase() -> String {
    "resign".to_string()
}

/// Greeting used when the directory has no name for a user.
fn default_display_name() -> String {
    "there".to_string()
}

/// Default number of event ids remembered for deduplication.
fn default_dedup_capacity() -> usize {
    10_000
}

/// Configuration for the offboard-bot application.
///
/// Cheap to clone; every clone shares the same `ConfigInner`.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// Slack app-level token used for Socket Mode (`SLACK_APP_TOKEN`).
    pub slack_app_token: String,
    /// Slack bot token used for Web API calls (`SLACK_BOT_TOKEN`).
    pub slack_bot_token: String,
    /// The single channel watched for resignation messages (`MONITORED_CHANNEL_ID`).
    pub monitored_channel_id: String,
    /// Channel the confirmation is posted to (`CONFIRMATION_CHANNEL_ID`).
    /// Falls back to the monitored channel.
    #[serde(default)]
    pub confirmation_channel_id: Option<String>,
    /// SMTP relay host (`SMTP_HOST`).
    pub smtp_host: String,
    /// SMTP relay port (`SMTP_PORT`).
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP login (`SMTP_USERNAME`).
    pub smtp_username: String,
    /// SMTP password or app password (`SMTP_PASSWORD`).
    pub smtp_password: String,
    /// Sender address (`MAIL_FROM`). Falls back to the SMTP login.
    #[serde(default)]
    pub mail_from: Option<String>,
    /// Subject of the offboarding email (`MAIL_SUBJECT`).
    #[serde(default = "default_mail_subject")]
    pub mail_subject: String,
    /// Body format, `html` or `plain` (`MAIL_FORMAT`).
    #[serde(default)]
    pub mail_format: MailFormat,
    /// HR address the resignation letter goes to (`HR_CONTACT_EMAIL`).
    #[serde(default)]
    pub hr_contact_email: Option<String>,
    /// Link to the exit survey (`EXIT_SURVEY_URL`).
    #[serde(default)]
    pub exit_survey_url: Option<String>,
    /// Case-insensitive substring that starts the flow (`TRIGGER_PHRASE`).
    #[serde(default = "default_trigger_phrase")]
    pub trigger_phrase: String,
    /// Greeting used when a user has no name on file (`DEFAULT_DISPLAY_NAME`).
    #[serde(default = "default_display_name")]
    pub default_display_name: String,
    /// How many event ids are remembered for deduplication (`DEDUP_CAPACITY`).
    #[serde(default = "default_dedup_capacity")]
    pub dedup_capacity: usize,
    /// Optional age in seconds after which a remembered event id is forgotten (`DEDUP_TTL_SECS`).
    #[serde(default)]
    pub dedup_ttl_secs: Option<u64>,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            slack_app_token: String::new(),
            slack_bot_token: String::new(),
            monitored_channel_id: String::new(),
            confirmation_channel_id: None,
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            mail_from: None,
            mail_subject: default_mail_subject(),
            mail_format: MailFormat::default(),
            hr_contact_email: None,
            exit_survey_url: None,
            trigger_phrase: default_trigger_phrase(),
            default_display_name: default_display_name(),
            dedup_capacity: default_dedup_capacity(),
            dedup_ttl_secs: None,
        }
    }
}

impl ConfigInner {
    /// Channel the confirmation message goes to.
    pub fn confirmation_channel(&self) -> &str {
        self.confirmation_channel_id.as_deref().unwrap_or(&self.monitored_channel_id)
    }

    /// Address the offboarding email is sent from.
    pub fn sender_address(&self) -> &str {
        self.mail_from.as_deref().unwrap_or(&self.smtp_username)
    }

    /// Deduplication time-to-live, if configured.
    pub fn dedup_ttl(&self) -> Option<Duration> {
        self.dedup_ttl_secs.map(Duration::from_secs)
    }
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("OFFBOARD_BOT").try_parsing(true));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Reject values the bot cannot run with.
    pub fn validate(&self) -> Void {
        let required = [
            ("slack_app_token", &self.slack_app_token),
            ("slack_bot_token", &self.slack_bot_token),
            ("monitored_channel_id", &self.monitored_channel_id),
            ("smtp_host", &self.smtp_host),
            ("smtp_username", &self.smtp_username),
            ("smtp_password", &self.smtp_password),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(anyhow::anyhow!("Configuration value `{name}` must not be empty."));
            }
        }

        if self.trigger_phrase.trim().is_empty() {
            return Err(anyhow::anyhow!("Trigger phrase must not be empty."));
        }

        if self.smtp_port == 0 {
            return Err(anyhow::anyhow!("SMTP port must be between 1 and 65535."));
        }

        if self.dedup_capacity == 0 {
            return Err(anyhow::anyhow!("Dedup capacity must be at least 1."));
        }

        if self.dedup_ttl_secs == Some(0) {
            return Err(anyhow::anyhow!("Dedup TTL must be at least 1 second when set."));
        }

        Ok(())
    }
}
