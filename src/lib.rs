pub(crate) mod data {
    pub(crate) mod datasources {
        #[cfg(test)]
        pub(crate) mod mock_verify_receipt_datasource;
        pub(crate) mod verify_receipt_datasource;
    }
    pub(crate) mod models {
        pub(crate) mod verify_receipt {
            pub(crate) mod in_app_receipt_model;
            pub(crate) mod receipt_model;
            pub(crate) mod request_body_model;
            pub(crate) mod response_body_model;
        }
    }
    pub(crate) mod normalize;
    pub(crate) mod repositories {
        pub(crate) mod verification_client;
    }
}

pub mod domain {
    pub mod entities {
        pub mod environment;
        pub mod in_app_receipt;
        pub mod receipt;
        pub mod verify_options;
    }
    pub mod repositories {
        pub mod receipt_repository;
    }
}

pub mod config;
pub mod constants;
pub mod errors;
pub mod util;

pub use config::{ReceiptUtilConfig, VerifierConfig};
pub use data::repositories::verification_client::VerificationClient;
pub use domain::{
    entities::{
        environment::Environment, in_app_receipt::InAppReceipt, receipt::Receipt,
        verify_options::VerifyOptions,
    },
    repositories::receipt_repository::ReceiptRepository,
};
pub use errors::{ReceiptError, Result, VerificationStatus};
pub use util::ReceiptUtil;
