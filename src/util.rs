use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::{
    config::ReceiptUtilConfig,
    constants::{DEFAULT_MAX_ATTEMPTS, STATUS_PRODUCTION_RECEIPT, STATUS_SANDBOX_RECEIPT},
    data::{
        datasources::verify_receipt_datasource::VerifyReceiptDatasourceImpl,
        repositories::verification_client::VerificationClient,
    },
    domain::{
        entities::{receipt::Receipt, verify_options::VerifyOptions},
        repositories::receipt_repository::ReceiptRepository,
    },
    errors::Result,
};

/// Entry point for verifying receipts without knowing up front which App
/// Store environment issued them.
///
/// Receipts are first sent to production. Apple answers 21007 for sandbox
/// receipts and 21008 for production receipts sent to the sandbox; either
/// code switches the target environment and the receipt is resubmitted. The
/// number of requests per call is capped by `max_attempts`, after which the
/// last redirect error is returned.
pub struct ReceiptUtil<R: ReceiptRepository = VerificationClient> {
    production: R,
    sandbox: R,
    max_attempts: u32,
}

impl<R: ReceiptRepository> ReceiptUtil<R> {
    pub fn with_repositories(production: R, sandbox: R) -> Self {
        Self {
            production,
            sandbox,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Verifies `receipt_data` (Base64-encoded receipt), following
    /// environment redirects.
    pub async fn verify(&self, receipt_data: &str, options: &VerifyOptions) -> Result<Receipt> {
        // Both environments keep the same sticky secret, whichever one
        // ends up answering.
        if let Some(secret) = &options.shared_secret {
            self.production.set_shared_secret(Some(secret.clone()));
            self.sandbox.set_shared_secret(Some(secret.clone()));
        }
        let mut target = Target::Production;
        let mut attempt = 1;
        loop {
            let repository = match target {
                Target::Production => &self.production,
                Target::Sandbox => &self.sandbox,
            };
            tracing::debug!(environment = ?target, attempt, "verifying receipt");
            let error = match repository.verify(receipt_data, options).await {
                Ok(receipt) => return Ok(receipt),
                Err(error) => error,
            };
            let next = match error.code() {
                Some(STATUS_SANDBOX_RECEIPT) => Target::Sandbox,
                Some(STATUS_PRODUCTION_RECEIPT) => Target::Production,
                _ => return Err(error),
            };
            if attempt >= self.max_attempts {
                tracing::warn!(
                    attempts = attempt,
                    code = ?error.code(),
                    "giving up on receipt after repeated environment redirects"
                );
                return Err(error);
            }
            tracing::info!(
                from = ?target,
                to = ?next,
                code = ?error.code(),
                "redirecting receipt verification"
            );
            target = next;
            attempt += 1;
        }
    }

    /// Same as `verify`, for raw (not yet Base64-encoded) receipt bytes.
    pub async fn verify_bytes(&self, receipt: &[u8], options: &VerifyOptions) -> Result<Receipt> {
        self.verify(&STANDARD.encode(receipt), options).await
    }

    /// Non-failing variant of `verify`: any error, including transport
    /// failures, yields `None`.
    pub async fn verify_best_effort(
        &self,
        receipt_data: &str,
        options: &VerifyOptions,
    ) -> Option<Receipt> {
        self.verify(receipt_data, options)
            .await
            .inspect_err(|e| tracing::debug!(error = %e, "receipt not verified"))
            .ok()
    }
}

/// Endpoint the next attempt goes to.
#[derive(Debug, Clone, Copy)]
enum Target {
    Production,
    Sandbox,
}

impl ReceiptUtil<VerificationClient> {
    /// Builds production and sandbox clients sharing one HTTP connection
    /// pool.
    pub fn new(config: ReceiptUtilConfig) -> Result<Self> {
        let datasource = Arc::new(VerifyReceiptDatasourceImpl::new(config.timeout)?);
        Ok(Self::with_repositories(
            VerificationClient::with_datasource(
                datasource.clone(),
                Some(config.production_url),
                config.shared_secret.clone(),
            ),
            VerificationClient::with_datasource(
                datasource,
                Some(config.sandbox_url),
                config.shared_secret,
            ),
        )
        .with_max_attempts(config.max_attempts))
    }

    /// Apple's production and sandbox endpoints, shared secret from
    /// `IAP_SHARED_SECRET`.
    pub fn from_env() -> Result<Self> {
        Self::new(ReceiptUtilConfig::from_env())
    }
}
