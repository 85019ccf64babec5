use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    config::VerifierConfig,
    data::{
        datasources::verify_receipt_datasource::{
            VerifyReceiptDatasource, VerifyReceiptDatasourceImpl,
        },
        models::verify_receipt::{
            in_app_receipt_model::InAppReceiptModel, receipt_model::ReceiptModel,
            request_body_model::RequestBodyModel, response_body_model::ResponseBodyModel,
        },
        normalize::{parse_date, parse_flag},
    },
    domain::{
        entities::{
            environment::Environment, in_app_receipt::InAppReceipt, receipt::Receipt,
            verify_options::VerifyOptions,
        },
        repositories::receipt_repository::ReceiptRepository,
    },
    errors::{ReceiptError, Result, VerificationStatus},
};

/// Verifies receipts against one configured verifyReceipt endpoint.
///
/// The endpoint and shared secret can be changed after construction; a
/// shared secret passed through `VerifyOptions` is remembered for later
/// calls on the same client.
pub struct VerificationClient {
    datasource: Arc<dyn VerifyReceiptDatasource>,
    verification_url: RwLock<Option<String>>,
    shared_secret: RwLock<Option<String>>,
}

#[async_trait]
impl ReceiptRepository for VerificationClient {
    async fn verify(&self, receipt_data: &str, options: &VerifyOptions) -> Result<Receipt> {
        let url = self
            .verification_url()
            .ok_or(ReceiptError::NoVerificationEndpoint)?;
        // The per-call secret goes out as given, never read back from the
        // shared slot.
        let password = match &options.shared_secret {
            Some(secret) => {
                self.set_shared_secret(Some(secret.clone()));
                Some(secret.clone())
            }
            None => self
                .shared_secret
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        };
        let body = RequestBodyModel {
            receipt_data: receipt_data.to_owned(),
            password,
            exclude_old_transactions: options.exclude_old_transactions,
        };
        tracing::debug!(url = %url, "submitting receipt to verifyReceipt");
        let response = self.datasource.verify_receipt(&url, &body).await?;
        receipt_from_response(response)
    }

    fn set_shared_secret(&self, secret: Option<String>) {
        *self
            .shared_secret
            .write()
            .unwrap_or_else(PoisonError::into_inner) = secret;
    }
}

impl VerificationClient {
    pub fn new(config: VerifierConfig) -> Result<Self> {
        let datasource = VerifyReceiptDatasourceImpl::new(config.timeout)?;
        Ok(Self::with_datasource(
            Arc::new(datasource),
            config.verification_url,
            config.shared_secret,
        ))
    }

    /// Endpoint and secret from `IAP_VERIFICATION_ENDPOINT` and
    /// `IAP_SHARED_SECRET`.
    pub fn from_env() -> Result<Self> {
        Self::new(VerifierConfig::from_env())
    }

    pub fn production() -> Result<Self> {
        Self::new(VerifierConfig::production())
    }

    pub fn sandbox() -> Result<Self> {
        Self::new(VerifierConfig::sandbox())
    }

    pub(crate) fn with_datasource(
        datasource: Arc<dyn VerifyReceiptDatasource>,
        verification_url: Option<String>,
        shared_secret: Option<String>,
    ) -> Self {
        Self {
            datasource,
            verification_url: RwLock::new(verification_url),
            shared_secret: RwLock::new(shared_secret),
        }
    }

    /// The configured endpoint; an empty string counts as unset.
    pub fn verification_url(&self) -> Option<String> {
        self.verification_url
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .filter(|url| !url.is_empty())
    }

    pub fn set_verification_url(&self, url: Option<String>) {
        *self
            .verification_url
            .write()
            .unwrap_or_else(PoisonError::into_inner) = url;
    }
}

fn receipt_from_response(response: ResponseBodyModel) -> Result<Receipt> {
    let ResponseBodyModel {
        status,
        environment,
        is_retryable,
        receipt,
        latest_receipt_info,
        raw,
        ..
    } = response;

    if !VerificationStatus::from_code(status).is_success() {
        return Err(ReceiptError::Verification {
            code: status,
            retryable: is_retryable,
        });
    }

    let receipt = receipt.ok_or_else(|| {
        ReceiptError::InvalidResponse(format!("status {status} without a receipt object"))
    })?;
    let mut receipt = Receipt::from_json(
        receipt,
        environment.as_deref().map(Environment::from),
        raw,
    )?;
    receipt.latest_receipt_info = latest_receipt_info
        .map(latest_receipt_info_from_value)
        .transpose()?;
    Ok(receipt)
}

/// Current responses carry an array here; iOS 6 style receipts a single
/// object.
fn latest_receipt_info_from_value(value: Value) -> Result<Vec<InAppReceipt>> {
    match value {
        Value::Array(items) => items.into_iter().map(InAppReceipt::from_json).collect(),
        Value::Object(_) => Ok(vec![InAppReceipt::from_json(value)?]),
        other => Err(ReceiptError::parse(
            "latest_receipt_info",
            format!("expected an array or object, got {other}"),
        )),
    }
}

impl InAppReceipt {
    pub(crate) fn from_model(m: InAppReceiptModel) -> Result<Self> {
        let expires_date = match parse_date("expires_date", m.expires_date.as_deref())? {
            Some(date) => Some(date),
            None => parse_date("expires_date_ms", m.expires_date_ms.as_deref())?,
        };
        Ok(InAppReceipt {
            quantity: m.quantity,
            product_id: m.product_id,
            transaction_id: m.transaction_id,
            purchase_date: parse_date("purchase_date", m.purchase_date.as_deref())?,
            expires_date,
            cancellation_date: parse_date("cancellation_date", m.cancellation_date.as_deref())?,
            cancellation_reason: m.cancellation_reason,
            original_purchase_date: parse_date(
                "original_purchase_date",
                m.original_purchase_date.as_deref(),
            )?,
            original_transaction_id: m.original_transaction_id,
            app_item_id: m.app_item_id,
            version_external_identifier: m.version_external_identifier,
            web_order_line_item_id: m.web_order_line_item_id,
            is_trial_period: parse_flag(m.is_trial_period.as_ref()),
            is_in_intro_offer_period: parse_flag(m.is_in_intro_offer_period.as_ref()),
        })
    }
}

impl Receipt {
    pub(crate) fn from_model(m: ReceiptModel) -> Result<Self> {
        let creation_date = match parse_date("creation_date", m.creation_date.as_deref())? {
            Some(date) => Some(date),
            None => parse_date("receipt_creation_date", m.receipt_creation_date.as_deref())?,
        };
        Ok(Receipt {
            bundle_id: m.bundle_id,
            application_version: m.application_version,
            original_application_version: m.original_application_version,
            creation_date,
            expiration_date: parse_date("expiration_date", m.expiration_date.as_deref())?,
            request_date: parse_date("request_date", m.request_date.as_deref())?,
            original_purchase_date: parse_date(
                "original_purchase_date",
                m.original_purchase_date.as_deref(),
            )?,
            receipt_type: m.receipt_type,
            in_app: m
                .in_app
                .unwrap_or_default()
                .into_iter()
                .map(InAppReceipt::from_model)
                .collect::<Result<_>>()?,
            latest_receipt_info: None,
            environment: None,
            original_json_response: Value::Null,
        })
    }
}
