#![allow(dead_code)]

use serde::Deserialize;
use serde_json::Value;
use serde_with::{serde_as, DisplayFromStr, PickFirst};

/// JSON document returned by the verifyReceipt endpoint.
///
/// https://developer.apple.com/documentation/appstorereceipts/responsebody
///
/// The `receipt` and `latest_receipt_info` payloads are kept as raw JSON
/// here; they are only decoded once the status says the receipt is usable,
/// so that a failure status is never masked by a malformed receipt body.
#[serde_as]
#[derive(Debug, Deserialize)]
pub(crate) struct ResponseBodyModel {
    /// Either 0 if the receipt is valid, or a status code if there is an
    /// error.
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub(crate) status: i64,
    /// The environment for which the receipt was generated. Possible values:
    /// Sandbox, Production.
    #[serde(default)]
    pub(crate) environment: Option<String>,
    /// An indicator that an error occurred during the request. A value of 1
    /// indicates a temporary issue; retry validation for this receipt at a
    /// later time. A value of 0 indicates an unresolvable issue.
    #[serde(rename = "is-retryable", default)]
    #[serde_as(as = "Option<PickFirst<(_, BoolFromInt)>>")]
    pub(crate) is_retryable: Option<bool>,
    /// The JSON representation of the receipt that was sent for
    /// verification.
    #[serde(default)]
    pub(crate) receipt: Option<Value>,
    /// An array that contains all in-app purchase transactions. Only returned
    /// for receipts that contain auto-renewable subscriptions. Receipts from
    /// the iOS 6 era carry a single object here instead of an array.
    #[serde(default)]
    pub(crate) latest_receipt_info: Option<Value>,
    /// The latest Base64 encoded app receipt. Only returned for receipts that
    /// contain auto-renewable subscriptions.
    #[serde(default)]
    pub(crate) latest_receipt: Option<String>,

    /// The complete, unmodified body.
    #[serde(skip)]
    pub(crate) raw: Value,
}

impl ResponseBodyModel {
    pub(crate) fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        let mut model: Self = serde_json::from_value(raw.clone())?;
        model.raw = raw;
        Ok(model)
    }
}

serde_with::serde_conv!(
    BoolFromInt,
    bool,
    |flag: &bool| u8::from(*flag),
    |value: u8| -> Result<_, std::convert::Infallible> { Ok(value != 0) }
);
