use thiserror::Error;

use crate::constants::*;

pub type Result<T> = std::result::Result<T, ReceiptError>;

#[derive(Error, Debug)]
pub enum ReceiptError {
    /// No verifyReceipt URL was configured. Raised before any request is
    /// sent.
    #[error("no verification endpoint configured")]
    NoVerificationEndpoint,

    /// Apple answered with a status other than 0 or 21006.
    #[error("receipt verification failed with status {code}: {}", describe_status(.code))]
    Verification {
        code: i64,
        /// Apple's `is-retryable` hint, if the response carried one.
        retryable: Option<bool>,
    },

    /// The request could not be delivered, or the server answered with a
    /// non-2xx HTTP status.
    #[error("callout to verifyReceipt failed: {0}")]
    Transport(String),

    /// The response body was not the JSON document we expected.
    #[error("invalid verifyReceipt response: {0}")]
    InvalidResponse(String),

    /// A field of the receipt could not be normalized.
    #[error("failed to parse '{field}': {reason}")]
    Parse { field: String, reason: String },
}

impl ReceiptError {
    pub(crate) fn parse(field: &str, reason: impl ToString) -> Self {
        ReceiptError::Parse {
            field: field.to_owned(),
            reason: reason.to_string(),
        }
    }

    /// Apple's status code, if this error came from a verification response.
    pub fn code(&self) -> Option<i64> {
        match self {
            ReceiptError::Verification { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<VerificationStatus> {
        self.code().map(VerificationStatus::from_code)
    }

    /// Apple's own retry hint. Falls back to `false` when the response did
    /// not include one.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ReceiptError::Verification {
                retryable: Some(true),
                ..
            }
        )
    }
}

/// Typed view of a verifyReceipt status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    Valid,
    BadRequest,
    MalformedReceipt,
    NotAuthenticated,
    SharedSecretMismatch,
    ServerUnavailable,
    SubscriptionExpired,
    SandboxReceiptSentToProduction,
    ProductionReceiptSentToSandbox,
    InternalDataAccessError,
    AccountNotFound,
    InternalError,
    Unknown(i64),
}

impl VerificationStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            STATUS_VALID => Self::Valid,
            STATUS_BAD_REQUEST => Self::BadRequest,
            STATUS_MALFORMED_RECEIPT => Self::MalformedReceipt,
            STATUS_NOT_AUTHENTICATED => Self::NotAuthenticated,
            STATUS_SHARED_SECRET_MISMATCH => Self::SharedSecretMismatch,
            STATUS_SERVER_UNAVAILABLE => Self::ServerUnavailable,
            STATUS_SUBSCRIPTION_EXPIRED => Self::SubscriptionExpired,
            STATUS_SANDBOX_RECEIPT => Self::SandboxReceiptSentToProduction,
            STATUS_PRODUCTION_RECEIPT => Self::ProductionReceiptSentToSandbox,
            STATUS_INTERNAL_DATA_ACCESS_ERROR => Self::InternalDataAccessError,
            STATUS_ACCOUNT_NOT_FOUND => Self::AccountNotFound,
            c if STATUS_INTERNAL_ERROR_RANGE.contains(&c) => Self::InternalError,
            c => Self::Unknown(c),
        }
    }

    /// Statuses for which the response carries a usable receipt.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Valid | Self::SubscriptionExpired)
    }

    /// Apple's documented meaning of the status.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Valid => "the receipt is valid",
            Self::BadRequest => "the request to the App Store was not made using HTTP POST",
            Self::MalformedReceipt => "the receipt data is malformed or missing",
            Self::NotAuthenticated => "the receipt could not be authenticated",
            Self::SharedSecretMismatch => {
                "the shared secret does not match the one on file for the account"
            }
            Self::ServerUnavailable => "the receipt server was temporarily unavailable",
            Self::SubscriptionExpired => {
                "the receipt is valid but the subscription has expired"
            }
            Self::SandboxReceiptSentToProduction => {
                "the receipt is from the test environment but was sent to production"
            }
            Self::ProductionReceiptSentToSandbox => {
                "the receipt is from the production environment but was sent to the test environment"
            }
            Self::InternalDataAccessError => "internal data access error",
            Self::AccountNotFound => {
                "the user account cannot be found or has been deleted"
            }
            Self::InternalError => "internal App Store error",
            Self::Unknown(_) => "unrecognized status code",
        }
    }
}

fn describe_status(code: &i64) -> &'static str {
    VerificationStatus::from_code(*code).description()
}
