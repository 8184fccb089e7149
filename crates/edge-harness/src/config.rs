//! Configuration for the harness

use url::Url;

use crate::{
    confirm::ConfirmationPolicy,
    error::{
        HarnessError,
        Result,
    },
};

/// Default JSON-RPC endpoint of a local Polygon Edge node.
pub const DEFAULT_RPC_URL: &str = "http://localhost:10002";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// JSON-RPC endpoint shared by both client paths
    pub rpc_url: Url,
    pub confirmation: ConfirmationPolicy,
}

impl HarnessConfig {
    pub fn new(rpc_url: &str) -> Result<Self> {
        let rpc_url = Url::parse(rpc_url)
            .map_err(|e| HarnessError::InvalidConfig(format!("invalid RPC URL '{rpc_url}': {e}")))?;
        Ok(Self {
            rpc_url,
            confirmation: ConfirmationPolicy::default(),
        })
    }

    pub fn with_confirmation(mut self, confirmation: ConfirmationPolicy) -> Self {
        self.confirmation = confirmation;
        self
    }

    /// Validate the configuration
    ///
    /// The endpoint must be plain HTTP(S), since both clients speak JSON-RPC over HTTP.
    pub fn validate(&self) -> Result<()> {
        match self.rpc_url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(HarnessError::InvalidConfig(format!(
                    "RPC URL must use http:// or https://, got '{scheme}'"
                )));
            }
        }
        if self.rpc_url.host_str().is_none() {
            return Err(HarnessError::InvalidConfig(
                "RPC URL must have a host".to_string(),
            ));
        }
        self.confirmation.validate()
    }

    /// Same as `new()` but validates the configuration before returning
    pub fn new_validated(rpc_url: &str) -> Result<Self> {
        let config = Self::new(rpc_url)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_config_is_valid() {
        let config = HarnessConfig::new(DEFAULT_RPC_URL).unwrap();
        assert_eq!(config.rpc_url.as_str(), "http://localhost:10002/");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(HarnessConfig::new_validated("https://rpc.example.org").is_ok());

        let err = HarnessConfig::new_validated("ws://localhost:10002").unwrap_err();
        assert!(err.to_string().contains("http:// or https://"));

        assert!(matches!(
            HarnessConfig::new("not a url"),
            Err(HarnessError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_confirmation_policy_is_validated() {
        let config = HarnessConfig::new(DEFAULT_RPC_URL).unwrap().with_confirmation(ConfirmationPolicy {
            poll_interval: Duration::ZERO,
            timeout: Duration::from_secs(10),
        });
        assert!(config.validate().is_err());
    }
}
