use serde::{Deserialize, Serialize};

/// The App Store backend a receipt was issued by, as reported in the
/// verifyReceipt response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    /// Indicates that the data applies to testing in the sandbox environment.
    Sandbox,
    /// Indicates that the data applies to the production environment.
    Production,

    #[serde(untagged)]
    Unknown(String),
}

impl From<&str> for Environment {
    fn from(value: &str) -> Self {
        match value {
            "Sandbox" => Environment::Sandbox,
            "Production" => Environment::Production,
            other => Environment::Unknown(other.to_owned()),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Sandbox => f.write_str("Sandbox"),
            Environment::Production => f.write_str("Production"),
            Environment::Unknown(other) => f.write_str(other),
        }
    }
}
