use std::time::Duration;

use app_store_receipt::{
    Environment, ReceiptError, ReceiptRepository, ReceiptUtil, ReceiptUtilConfig,
    VerificationClient, VerifierConfig, VerifyOptions,
};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::{json, Value};

const PRODUCTION_PATH: &str = "/production/verifyReceipt";
const SANDBOX_PATH: &str = "/sandbox/verifyReceipt";

fn util_for(server: &ServerGuard) -> ReceiptUtil {
    ReceiptUtil::new(ReceiptUtilConfig {
        production_url: format!("{}{}", server.url(), PRODUCTION_PATH),
        sandbox_url: format!("{}{}", server.url(), SANDBOX_PATH),
        shared_secret: Some("configured-secret".to_owned()),
        timeout: Some(Duration::from_secs(5)),
        max_attempts: 4,
    })
    .unwrap()
}

fn receipt_body(environment: &str) -> Value {
    json!({
        "status": 0,
        "environment": environment,
        "receipt": {
            "bundle_id": "com.foo.bar",
            "application_version": "2",
            "original_application_version": "1",
            "creation_date": "2014-06-04 23:20:47 Etc/GMT",
            "in_app": [
                {
                    "quantity": "1",
                    "product_id": "com.foo.product1",
                    "transaction_id": "1000000070107235",
                    "original_transaction_id": "1000000070107235",
                    "purchase_date": "2014-05-28 14:47:53 Etc/GMT",
                    "original_purchase_date": "2014-05-28 14:47:53 Etc/GMT",
                    "is_trial_period": "false",
                },
                {
                    "quantity": "1",
                    "product_id": "com.foo.monthly",
                    "transaction_id": "1000000070107236",
                    "original_transaction_id": "1000000070107236",
                    "purchase_date": "2014-05-29 10:00:00 Etc/GMT",
                    "expires_date": "2014-06-29 10:00:00 Etc/GMT",
                    "is_trial_period": "true",
                },
            ],
        },
        "latest_receipt_info": [
            {
                "quantity": "1",
                "product_id": "com.foo.monthly",
                "transaction_id": "1000000070107299",
                "original_transaction_id": "1000000070107236",
                "purchase_date": "2014-06-29 10:00:00 Etc/GMT",
                "expires_date": "2014-07-29 10:00:00 Etc/GMT",
                "is_trial_period": "false",
            },
        ],
    })
}

#[tokio::test]
async fn test_sandbox_receipt_is_redirected() {
    let mut server = Server::new_async().await;
    let production = server
        .mock("POST", PRODUCTION_PATH)
        .match_header("content-type", "application/json")
        .match_header("accept", "application/json")
        .match_body(Matcher::Json(json!({
            "receipt-data": "base64-receipt",
            "password": "configured-secret",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "status": 21007 }).to_string())
        .expect(1)
        .create_async()
        .await;
    let sandbox = server
        .mock("POST", SANDBOX_PATH)
        .match_body(Matcher::PartialJson(json!({ "receipt-data": "base64-receipt" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(receipt_body("Sandbox").to_string())
        .expect(1)
        .create_async()
        .await;

    let receipt = util_for(&server)
        .verify("base64-receipt", &VerifyOptions::default())
        .await
        .unwrap();

    production.assert_async().await;
    sandbox.assert_async().await;

    assert_eq!(receipt.environment, Some(Environment::Sandbox));
    assert_eq!(receipt.bundle_id.as_deref(), Some("com.foo.bar"));
    assert_eq!(receipt.in_app.len(), 2);
    assert!(!receipt.in_app[0].is_subscription());
    assert!(receipt.in_app[1].is_subscription());
    assert_eq!(receipt.in_app[1].is_trial_period, Some(true));
    assert_eq!(receipt.original_json_response, receipt_body("Sandbox"));

    let latest = receipt.latest_transactions();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].transaction_id.as_deref(), Some("1000000070107299"));

    let out = receipt.to_json_value();
    assert_eq!(out["creation_date"], "Wed, 04 Jun 2014 23:20:47 GMT");
    assert_eq!(out["in_app"][1]["expires_date"], "Sun, 29 Jun 2014 10:00:00 GMT");
    assert!(out.get("latest_receipt_info").is_none());
    assert!(out.get("environment").is_none());
}

#[tokio::test]
async fn test_hard_failure_is_not_retried() {
    let mut server = Server::new_async().await;
    let production = server
        .mock("POST", PRODUCTION_PATH)
        .with_status(200)
        .with_body(json!({ "status": 21000, "is-retryable": false }).to_string())
        .expect(1)
        .create_async()
        .await;
    let sandbox = server
        .mock("POST", SANDBOX_PATH)
        .expect(0)
        .create_async()
        .await;

    let error = util_for(&server)
        .verify("base64-receipt", &VerifyOptions::default())
        .await
        .unwrap_err();

    production.assert_async().await;
    sandbox.assert_async().await;
    match error {
        ReceiptError::Verification { code, retryable } => {
            assert_eq!(code, 21000);
            assert_eq!(retryable, Some(false));
        }
        other => panic!("expected verification error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_expired_subscription_status_returns_receipt() {
    let mut server = Server::new_async().await;
    let mut body = receipt_body("Production");
    body["status"] = json!(21006);
    let production = server
        .mock("POST", PRODUCTION_PATH)
        .with_status(200)
        .with_body(body.to_string())
        .expect(1)
        .create_async()
        .await;

    let receipt = util_for(&server)
        .verify("base64-receipt", &VerifyOptions::default())
        .await
        .unwrap();

    production.assert_async().await;
    assert_eq!(receipt.environment, Some(Environment::Production));
    assert_eq!(receipt.in_app.len(), 2);
}

#[tokio::test]
async fn test_http_error_is_transport_error() {
    let mut server = Server::new_async().await;
    let production = server
        .mock("POST", PRODUCTION_PATH)
        .with_status(503)
        .with_body("Service Unavailable")
        .expect(1)
        .create_async()
        .await;

    let result = util_for(&server)
        .verify("base64-receipt", &VerifyOptions::default())
        .await;

    production.assert_async().await;
    assert!(matches!(result, Err(ReceiptError::Transport(_))));
}

#[tokio::test]
async fn test_non_json_body_is_invalid_response() {
    let mut server = Server::new_async().await;
    let _production = server
        .mock("POST", PRODUCTION_PATH)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let u = util_for(&server);
    let result = u.verify("base64-receipt", &VerifyOptions::default()).await;
    assert!(matches!(result, Err(ReceiptError::InvalidResponse(_))));
    assert!(u
        .verify_best_effort("base64-receipt", &VerifyOptions::default())
        .await
        .is_none());
}

#[tokio::test]
async fn test_client_without_endpoint_sends_nothing() {
    let mut server = Server::new_async().await;
    let any = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = VerificationClient::new(VerifierConfig::default()).unwrap();
    let result = client
        .verify("base64-receipt", &VerifyOptions::default())
        .await;

    any.assert_async().await;
    assert!(matches!(result, Err(ReceiptError::NoVerificationEndpoint)));
}

#[tokio::test]
async fn test_client_options_are_sent() {
    let mut server = Server::new_async().await;
    let endpoint = server
        .mock("POST", "/verifyReceipt")
        .match_body(Matcher::Json(json!({
            "receipt-data": "base64-receipt",
            "password": "per-call-secret",
            "exclude-old-transactions": true,
        })))
        .with_status(200)
        .with_body(receipt_body("Production").to_string())
        .expect(1)
        .create_async()
        .await;

    let client = VerificationClient::new(
        VerifierConfig::default().with_verification_url(format!("{}/verifyReceipt", server.url())),
    )
    .unwrap();
    let receipt = client
        .verify(
            "base64-receipt",
            &VerifyOptions::with_shared_secret("per-call-secret").exclude_old_transactions(true),
        )
        .await
        .unwrap();

    endpoint.assert_async().await;
    assert_eq!(receipt.in_app.len(), 2);
}
