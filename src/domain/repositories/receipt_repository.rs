use async_trait::async_trait;

use crate::{
    domain::entities::{receipt::Receipt, verify_options::VerifyOptions},
    errors::Result,
};

#[async_trait]
pub trait ReceiptRepository: Send + Sync {
    /// Submits `receipt_data` (Base64-encoded receipt) to a single
    /// verifyReceipt endpoint and returns the parsed receipt.
    ///
    /// Statuses 0 and 21006 (valid, subscription expired) produce a receipt;
    /// every other status is returned as `ReceiptError::Verification`.
    async fn verify(&self, receipt_data: &str, options: &VerifyOptions) -> Result<Receipt>;

    /// Replaces the shared secret sent with later requests.
    fn set_shared_secret(&self, secret: Option<String>);
}
