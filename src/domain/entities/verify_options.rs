/// Per-call options for receipt verification.
#[derive(Debug, Clone, Default)]
pub struct VerifyOptions {
    /// App-specific shared secret. When set, it replaces the secret
    /// configured on the client, and keeps doing so for later calls made
    /// through the same client.
    pub shared_secret: Option<String>,
    /// Ask Apple to return only the latest renewal transaction for each
    /// subscription.
    pub exclude_old_transactions: bool,
}

impl VerifyOptions {
    pub fn with_shared_secret(shared_secret: impl Into<String>) -> Self {
        Self {
            shared_secret: Some(shared_secret.into()),
            ..Default::default()
        }
    }

    pub fn exclude_old_transactions(mut self, exclude: bool) -> Self {
        self.exclude_old_transactions = exclude;
        self
    }
}
