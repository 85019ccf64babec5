#![allow(dead_code)]

use serde::Deserialize;

use crate::data::normalize::deserialize_loose_string;

use super::in_app_receipt_model::InAppReceiptModel;

/// The `receipt` object of a verifyReceipt response.
///
/// https://developer.apple.com/documentation/appstorereceipts/responsebody/receipt
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReceiptModel {
    /// The bundle identifier for the app to which the receipt belongs.
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub(crate) bundle_id: Option<String>,
    /// The app's version number (CFBundleVersion).
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub(crate) application_version: Option<String>,
    /// The version of the app that the user originally purchased.
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub(crate) original_application_version: Option<String>,
    /// The time the App Store generated the receipt.
    pub(crate) receipt_creation_date: Option<String>,
    /// Older receipts use `creation_date` for the same value.
    pub(crate) creation_date: Option<String>,
    /// The time the receipt expires for apps purchased through the Volume
    /// Purchase Program.
    pub(crate) expiration_date: Option<String>,
    /// The time the request to the verifyReceipt endpoint was processed.
    pub(crate) request_date: Option<String>,
    /// The time of the original app purchase.
    pub(crate) original_purchase_date: Option<String>,
    /// The type of receipt generated, e.g. "Production" or
    /// "ProductionSandbox".
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub(crate) receipt_type: Option<String>,
    /// All in-app purchase transactions, in the order Apple returned them.
    #[serde(default)]
    pub(crate) in_app: Option<Vec<InAppReceiptModel>>,
}
