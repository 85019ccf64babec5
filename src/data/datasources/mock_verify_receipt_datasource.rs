use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    data::models::verify_receipt::{
        request_body_model::RequestBodyModel, response_body_model::ResponseBodyModel,
    },
    errors::{ReceiptError, Result},
};

use super::verify_receipt_datasource::VerifyReceiptDatasource;

/// Replays scripted verifyReceipt bodies per URL and records every request.
#[derive(Default)]
pub(crate) struct MockVerifyReceiptDatasource {
    responses: Mutex<HashMap<String, VecDeque<Value>>>,
    requests: Mutex<Vec<(String, Value)>>,
}

impl MockVerifyReceiptDatasource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queues `body` as the next response for `url`.
    pub(crate) fn respond(self, url: &str, body: Value) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(url.to_owned())
            .or_default()
            .push_back(body);
        self
    }

    pub(crate) fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|(url, _)| url).collect()
    }
}

#[async_trait]
impl VerifyReceiptDatasource for MockVerifyReceiptDatasource {
    async fn verify_receipt(
        &self,
        url: &str,
        body: &RequestBodyModel,
    ) -> Result<ResponseBodyModel> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_owned(), serde_json::to_value(body).unwrap()));
        let next = self
            .responses
            .lock()
            .unwrap()
            .get_mut(url)
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| ReceiptError::Transport(format!("no scripted response for {url}")))?;
        ResponseBodyModel::from_value(next).map_err(|e| ReceiptError::InvalidResponse(e.to_string()))
    }
}
