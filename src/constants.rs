/// verifyReceipt endpoint for receipts issued by the live App Store.
pub const APP_STORE_PRODUCTION_URL: &str = "https://buy.itunes.apple.com/verifyReceipt";

/// verifyReceipt endpoint for receipts issued in the sandbox (TestFlight,
/// Xcode, App Review).
pub const APP_STORE_SANDBOX_URL: &str = "https://sandbox.itunes.apple.com/verifyReceipt";

// Environment variables read by `VerifierConfig::from_env`.
pub const VERIFICATION_ENDPOINT_ENV: &str = "IAP_VERIFICATION_ENDPOINT";
pub const SHARED_SECRET_ENV: &str = "IAP_SHARED_SECRET";

/// Upper bound on requests made by a single `ReceiptUtil::verify` call,
/// counting the initial attempt and every environment redirect.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;

// verifyReceipt status codes:
// https://developer.apple.com/documentation/appstorereceipts/status
pub const STATUS_VALID: i64 = 0;
pub const STATUS_BAD_REQUEST: i64 = 21000;
pub const STATUS_MALFORMED_RECEIPT: i64 = 21002;
pub const STATUS_NOT_AUTHENTICATED: i64 = 21003;
pub const STATUS_SHARED_SECRET_MISMATCH: i64 = 21004;
pub const STATUS_SERVER_UNAVAILABLE: i64 = 21005;
pub const STATUS_SUBSCRIPTION_EXPIRED: i64 = 21006;
pub const STATUS_SANDBOX_RECEIPT: i64 = 21007;
pub const STATUS_PRODUCTION_RECEIPT: i64 = 21008;
pub const STATUS_INTERNAL_DATA_ACCESS_ERROR: i64 = 21009;
pub const STATUS_ACCOUNT_NOT_FOUND: i64 = 21010;
pub const STATUS_INTERNAL_ERROR_RANGE: std::ops::RangeInclusive<i64> = 21100..=21199;
