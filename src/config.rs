use std::time::Duration;

use crate::constants::{
    APP_STORE_PRODUCTION_URL, APP_STORE_SANDBOX_URL, DEFAULT_MAX_ATTEMPTS, SHARED_SECRET_ENV,
    VERIFICATION_ENDPOINT_ENV,
};

/// Configuration of a single `VerificationClient`.
#[derive(Debug, Clone, Default)]
pub struct VerifierConfig {
    /// verifyReceipt endpoint. Verification fails with
    /// `ReceiptError::NoVerificationEndpoint` while this is unset.
    pub verification_url: Option<String>,
    pub shared_secret: Option<String>,
    /// Applied to the whole HTTP exchange. Without one, a stalled App Store
    /// connection blocks the call indefinitely.
    pub timeout: Option<Duration>,
}

impl VerifierConfig {
    /// Reads `IAP_VERIFICATION_ENDPOINT` and `IAP_SHARED_SECRET`. Unset and
    /// empty variables both leave the value unset.
    pub fn from_env() -> Self {
        Self {
            verification_url: read_env(VERIFICATION_ENDPOINT_ENV),
            shared_secret: read_env(SHARED_SECRET_ENV),
            timeout: None,
        }
    }

    pub fn production() -> Self {
        Self {
            verification_url: Some(APP_STORE_PRODUCTION_URL.to_owned()),
            ..Self::from_env()
        }
    }

    pub fn sandbox() -> Self {
        Self {
            verification_url: Some(APP_STORE_SANDBOX_URL.to_owned()),
            ..Self::from_env()
        }
    }

    pub fn with_verification_url(mut self, url: impl Into<String>) -> Self {
        self.verification_url = Some(url.into());
        self
    }

    pub fn with_shared_secret(mut self, secret: impl Into<String>) -> Self {
        self.shared_secret = Some(secret.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Configuration of `ReceiptUtil`, which talks to both App Store
/// environments.
#[derive(Debug, Clone)]
pub struct ReceiptUtilConfig {
    pub production_url: String,
    pub sandbox_url: String,
    pub shared_secret: Option<String>,
    pub timeout: Option<Duration>,
    /// Cap on requests per `verify` call, redirects included. Values below
    /// 1 are treated as 1.
    pub max_attempts: u32,
}

impl Default for ReceiptUtilConfig {
    fn default() -> Self {
        Self {
            production_url: APP_STORE_PRODUCTION_URL.to_owned(),
            sandbox_url: APP_STORE_SANDBOX_URL.to_owned(),
            shared_secret: None,
            timeout: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl ReceiptUtilConfig {
    /// Apple's endpoints, with the shared secret taken from
    /// `IAP_SHARED_SECRET`.
    pub fn from_env() -> Self {
        Self {
            shared_secret: read_env(SHARED_SECRET_ENV),
            ..Default::default()
        }
    }

    pub fn with_shared_secret(mut self, secret: impl Into<String>) -> Self {
        self.shared_secret = Some(secret.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
