use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;

use crate::{
    data::models::verify_receipt::{
        request_body_model::RequestBodyModel, response_body_model::ResponseBodyModel,
    },
    errors::{ReceiptError, Result},
};

#[async_trait]
pub(crate) trait VerifyReceiptDatasource: Send + Sync {
    /// verifyReceipt:
    /// https://developer.apple.com/documentation/appstorereceipts/verifyreceipt
    ///
    /// url:
    ///   Production, sandbox or overridden endpoint to POST to.
    /// body:
    ///   Receipt data and, if any, the shared secret.
    async fn verify_receipt(&self, url: &str, body: &RequestBodyModel)
        -> Result<ResponseBodyModel>;
}

pub(crate) struct VerifyReceiptDatasourceImpl {
    client: reqwest::Client,
}

#[async_trait]
impl VerifyReceiptDatasource for VerifyReceiptDatasourceImpl {
    async fn verify_receipt(
        &self,
        url: &str,
        body: &RequestBodyModel,
    ) -> Result<ResponseBodyModel> {
        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ReceiptError::Transport(format!("callout failed to send; {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReceiptError::Transport(format!(
                "callout returned with non-200 status code; {}; {}",
                status,
                response.text().await.unwrap_or_default()
            )));
        }

        let raw: Value = response.json().await.map_err(|e| {
            ReceiptError::InvalidResponse(format!("body is not valid JSON; {e}"))
        })?;
        ResponseBodyModel::from_value(raw).map_err(|e| {
            ReceiptError::InvalidResponse(format!("unexpected response shape; {e}"))
        })
    }
}

impl VerifyReceiptDatasourceImpl {
    /// Certificate validation is always on; there is no switch to turn it
    /// off.
    pub(crate) fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ReceiptError::Transport(format!("failed to build HTTP client; {e}")))?;
        Ok(Self { client })
    }
}
