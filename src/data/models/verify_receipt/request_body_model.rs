use serde::Serialize;

/// Body POSTed to the verifyReceipt endpoint.
///
/// https://developer.apple.com/documentation/appstorereceipts/requestbody
#[derive(Debug, Serialize)]
pub(crate) struct RequestBodyModel {
    /// The Base64-encoded receipt data.
    #[serde(rename = "receipt-data")]
    pub(crate) receipt_data: String,
    /// Your app's shared secret, required for receipts that contain
    /// auto-renewable subscriptions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) password: Option<String>,
    /// Set to true to include only the latest renewal transaction for any
    /// subscriptions.
    #[serde(
        rename = "exclude-old-transactions",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub(crate) exclude_old_transactions: bool,
}
