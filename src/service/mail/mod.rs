pub mod smtp;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{OutboundEmail, Void};

// Traits.

/// Generic mail trait that clients must implement.
///
/// Implementations deliver one fully rendered message per call. Delivery is
/// attempted once; retrying is up to the caller.
#[async_trait]
pub trait GenericMailClient: Send + Sync + 'static {
    /// Send a single email.
    async fn send_mail(&self, email: &OutboundEmail) -> Void;
}

// Structs.

/// Mail client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct MailClient {
    inner: Arc<dyn GenericMailClient>,
}

impl Deref for MailClient {
    type Target = dyn GenericMailClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl MailClient {
    pub fn new(inner: Arc<dyn GenericMailClient>) -> Self {
        Self { inner }
    }
}
