#![allow(dead_code)]

use serde::Deserialize;
use serde_json::Value;
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use crate::data::normalize::deserialize_loose_string;

/// One element of the `in_app` or `latest_receipt_info` arrays, as sent by
/// Apple. Both arrays share this shape.
///
/// https://developer.apple.com/documentation/appstorereceipts/responsebody/receipt/in_app
///
/// Every key is optional; which ones appear depends on the product type and
/// the environment. Dates are left as strings and normalized when the
/// domain entity is built.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub(crate) struct InAppReceiptModel {
    /// The number of consumable products purchased. Sent either as a number
    /// or as a numeric string.
    #[serde(default)]
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub(crate) quantity: Option<u32>,
    /// The unique identifier of the product purchased.
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub(crate) product_id: Option<String>,
    /// A unique identifier for a transaction such as a purchase, restore, or
    /// renewal.
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub(crate) transaction_id: Option<String>,
    /// The transaction identifier of the original purchase.
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub(crate) original_transaction_id: Option<String>,
    /// The time the App Store charged the user's account for the purchase.
    pub(crate) purchase_date: Option<String>,
    /// The time of the original in-app purchase.
    pub(crate) original_purchase_date: Option<String>,
    /// The time a subscription expires or when it will renew.
    pub(crate) expires_date: Option<String>,
    /// `expires_date` in milliseconds since the epoch.
    pub(crate) expires_date_ms: Option<String>,
    /// The time Apple customer support canceled a transaction, or the time
    /// an auto-renewable subscription plan was upgraded.
    pub(crate) cancellation_date: Option<String>,
    /// The reason for a refunded transaction: "1" for an issue within the
    /// app, "0" for another reason.
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub(crate) cancellation_reason: Option<String>,
    /// Identifies the app that created the transaction. Absent outside of
    /// production.
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub(crate) app_item_id: Option<String>,
    /// Identifies the revision of the app. Absent outside of production.
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub(crate) version_external_identifier: Option<String>,
    /// A unique identifier for purchase events across devices, including
    /// subscription-renewal events.
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub(crate) web_order_line_item_id: Option<String>,
    /// "true" if the subscription is in the free trial period.
    #[serde(default)]
    pub(crate) is_trial_period: Option<Value>,
    /// "true" if the subscription is in an introductory price period.
    #[serde(default)]
    pub(crate) is_in_intro_offer_period: Option<Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_quantity_number_or_string() {
        let m: InAppReceiptModel = serde_json::from_value(json!({ "quantity": 3 })).unwrap();
        assert_eq!(m.quantity, Some(3));
        let m: InAppReceiptModel = serde_json::from_value(json!({ "quantity": "2" })).unwrap();
        assert_eq!(m.quantity, Some(2));
        let m: InAppReceiptModel = serde_json::from_value(json!({})).unwrap();
        assert_eq!(m.quantity, None);
        assert!(serde_json::from_value::<InAppReceiptModel>(json!({ "quantity": "two" })).is_err());
        assert!(serde_json::from_value::<InAppReceiptModel>(json!({ "quantity": -1 })).is_err());
    }

    #[test]
    fn test_numeric_identifiers() {
        let m: InAppReceiptModel = serde_json::from_value(json!({
            "app_item_id": 497799835,
            "transaction_id": "1000000070107235",
            "version_external_identifier": null,
        }))
        .unwrap();
        assert_eq!(m.app_item_id.as_deref(), Some("497799835"));
        assert_eq!(m.transaction_id.as_deref(), Some("1000000070107235"));
        assert_eq!(m.version_external_identifier, None);
    }
}
