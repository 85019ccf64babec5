use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::{
    data::{models::verify_receipt::receipt_model::ReceiptModel, normalize::serialize_http_date},
    errors::{ReceiptError, Result},
};

use super::{environment::Environment, in_app_receipt::InAppReceipt};

/// A receipt that Apple's verifyReceipt service accepted.
///
/// The serialized form covers the receipt itself; `latest_receipt_info`,
/// `environment` and the original response travel alongside it but are not
/// part of that shape.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub bundle_id: Option<String>,
    pub application_version: Option<String>,
    pub original_application_version: Option<String>,
    #[serde(serialize_with = "serialize_http_date")]
    pub creation_date: Option<DateTime<Utc>>,
    /// Receipt-level expiration (Volume Purchase Program); unrelated to
    /// subscription expiry.
    #[serde(serialize_with = "serialize_http_date")]
    pub expiration_date: Option<DateTime<Utc>>,
    #[serde(serialize_with = "serialize_http_date")]
    pub request_date: Option<DateTime<Utc>>,
    #[serde(serialize_with = "serialize_http_date")]
    pub original_purchase_date: Option<DateTime<Utc>>,
    pub receipt_type: Option<String>,
    /// In the order Apple returned them, which is not necessarily
    /// chronological.
    pub in_app: Vec<InAppReceipt>,

    /// Most recent renewal state of auto-renewable subscriptions. When
    /// present it supersedes `in_app` for subscription decisions.
    #[serde(skip)]
    pub latest_receipt_info: Option<Vec<InAppReceipt>>,
    #[serde(skip)]
    pub environment: Option<Environment>,
    /// The verifyReceipt response exactly as received.
    #[serde(skip)]
    pub original_json_response: Value,
}

impl Receipt {
    /// Builds a receipt from the `receipt` object of a verifyReceipt
    /// response. `environment` and `original_json_response` are carried
    /// through untouched.
    pub fn from_json(
        receipt: Value,
        environment: Option<Environment>,
        original_json_response: Value,
    ) -> Result<Self> {
        let model: ReceiptModel =
            serde_json::from_value(receipt).map_err(|e| ReceiptError::parse("receipt", e))?;
        let mut receipt = Self::from_model(model)?;
        receipt.environment = environment;
        receipt.original_json_response = original_json_response;
        Ok(receipt)
    }

    /// The transactions to base subscription state on.
    pub fn latest_transactions(&self) -> &[InAppReceipt] {
        self.latest_receipt_info.as_deref().unwrap_or(&self.in_app)
    }

    pub fn is_sandbox(&self) -> bool {
        self.environment == Some(Environment::Sandbox)
    }

    pub fn to_json_value(&self) -> Value {
        // Serializing plain strings, numbers and options cannot fail.
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn receipt_json() -> Value {
        json!({
            "bundle_id": "com.foo.bar",
            "application_version": "2",
            "original_application_version": "1",
            "creation_date": "2014-06-04 23:20:47 Etc/GMT",
            "expiration_date": "2014-06-05 23:20:47 Etc/GMT",
            "in_app": [
                {
                    "quantity": "1",
                    "product_id": "com.foo.product2",
                    "transaction_id": "2",
                    "purchase_date": "2014-06-04 23:20:47 Etc/GMT",
                },
                {
                    "quantity": "1",
                    "product_id": "com.foo.product1",
                    "transaction_id": "1",
                    "purchase_date": "2014-05-28 14:47:53 Etc/GMT",
                },
            ],
        })
    }

    #[test]
    fn test_from_json() {
        let raw = json!({ "status": 0, "receipt": receipt_json() });
        let r = Receipt::from_json(receipt_json(), Some(Environment::Production), raw.clone())
            .unwrap();
        assert_eq!(r.bundle_id.as_deref(), Some("com.foo.bar"));
        assert_eq!(r.application_version.as_deref(), Some("2"));
        assert_eq!(r.original_application_version.as_deref(), Some("1"));
        assert_eq!(
            r.creation_date,
            Some(Utc.with_ymd_and_hms(2014, 6, 4, 23, 20, 47).unwrap())
        );
        assert_eq!(r.environment, Some(Environment::Production));
        assert_eq!(r.original_json_response, raw);

        // Order is preserved as given, not sorted by date.
        let ids: Vec<_> = r
            .in_app
            .iter()
            .map(|t| t.transaction_id.as_deref().unwrap())
            .collect();
        assert_eq!(ids, ["2", "1"]);
        assert_eq!(r.latest_transactions(), r.in_app.as_slice());
    }

    #[test]
    fn test_missing_in_app_is_empty() {
        let r = Receipt::from_json(json!({ "bundle_id": "com.foo.bar" }), None, Value::Null)
            .unwrap();
        assert!(r.in_app.is_empty());
        assert_eq!(r.creation_date, None);
        assert_eq!(r.to_json_value()["creation_date"], Value::Null);
    }

    #[test]
    fn test_receipt_creation_date_key() {
        let r = Receipt::from_json(
            json!({ "receipt_creation_date": "2014-06-04 23:20:47 Etc/GMT" }),
            None,
            Value::Null,
        )
        .unwrap();
        assert!(r.creation_date.is_some());
    }

    #[test]
    fn test_to_json_value_excludes_out_of_band_fields() {
        let mut r = Receipt::from_json(receipt_json(), Some(Environment::Sandbox), json!({}))
            .unwrap();
        r.latest_receipt_info = Some(vec![InAppReceipt::default()]);
        let out = r.to_json_value();
        let out = out.as_object().unwrap();
        assert_eq!(out["bundle_id"], "com.foo.bar");
        assert_eq!(out["creation_date"], "Wed, 04 Jun 2014 23:20:47 GMT");
        assert_eq!(out["expiration_date"], "Thu, 05 Jun 2014 23:20:47 GMT");
        assert_eq!(out["in_app"].as_array().unwrap().len(), 2);
        assert_eq!(out["in_app"][1]["purchase_date"], "Wed, 28 May 2014 14:47:53 GMT");
        assert!(!out.contains_key("latest_receipt_info"));
        assert!(!out.contains_key("environment"));
        assert!(!out.contains_key("original_json_response"));
    }

    #[test]
    fn test_bad_transaction_fails_whole_receipt() {
        let result = Receipt::from_json(
            json!({ "in_app": [{ "quantity": 1 }, { "quantity": "many" }] }),
            None,
            Value::Null,
        );
        assert!(matches!(result, Err(ReceiptError::Parse { .. })));
    }
}
