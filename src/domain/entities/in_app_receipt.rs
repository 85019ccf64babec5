use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::{
    data::{
        models::verify_receipt::in_app_receipt_model::InAppReceiptModel,
        normalize::serialize_http_date,
    },
    errors::{ReceiptError, Result},
};

/// One purchase or renewal event contained in a receipt.
///
/// Entries of `in_app` and of `latest_receipt_info` both map to this type.
/// Serializing it produces the canonical receipt shape, with timestamps
/// rendered as HTTP dates (`"Wed, 28 May 2014 14:47:53 GMT"`) and unset
/// values as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InAppReceipt {
    pub quantity: Option<u32>,
    pub product_id: Option<String>,
    pub transaction_id: Option<String>,
    #[serde(serialize_with = "serialize_http_date")]
    pub purchase_date: Option<DateTime<Utc>>,
    /// Only set for subscriptions.
    #[serde(serialize_with = "serialize_http_date")]
    pub expires_date: Option<DateTime<Utc>>,
    #[serde(serialize_with = "serialize_http_date")]
    pub cancellation_date: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    #[serde(serialize_with = "serialize_http_date")]
    pub original_purchase_date: Option<DateTime<Utc>>,
    /// Equal to `transaction_id` unless this transaction restores an earlier
    /// one.
    pub original_transaction_id: Option<String>,
    /// Not present for receipts created outside of production.
    pub app_item_id: Option<String>,
    pub version_external_identifier: Option<String>,
    pub web_order_line_item_id: Option<String>,
    /// `None` when Apple left the field out.
    pub is_trial_period: Option<bool>,
    pub is_in_intro_offer_period: Option<bool>,
}

impl InAppReceipt {
    /// Builds a transaction from one decoded `in_app` /
    /// `latest_receipt_info` element.
    pub fn from_json(value: Value) -> Result<Self> {
        let model: InAppReceiptModel = serde_json::from_value(value)
            .map_err(|e| ReceiptError::parse("in_app", e))?;
        Self::from_model(model)
    }

    /// Subscription transactions are exactly the ones that carry an
    /// expiration date.
    pub fn is_subscription(&self) -> bool {
        self.expires_date.is_some()
    }

    pub fn to_json_value(&self) -> Value {
        // Serializing plain strings, numbers and options cannot fail.
        serde_json::to_value(self).unwrap_or_default()
    }
}
