use std::time::{
    Duration,
    Instant,
};

use alloy::primitives::B256;
use tracing::{
    debug,
    info,
    warn,
};

use crate::{
    error::{
        HarnessError,
        Result,
    },
    rpc::NodeClient,
};

/// How long and how often to poll for a receipt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            timeout: Duration::from_secs(120),
        }
    }
}

impl ConfirmationPolicy {
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(HarnessError::InvalidConfig(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        if self.timeout < self.poll_interval {
            return Err(HarnessError::InvalidConfig(format!(
                "confirmation timeout {:?} is shorter than the poll interval {:?}",
                self.timeout, self.poll_interval
            )));
        }
        Ok(())
    }
}

/// Poll until `hash` has a receipt attached to a block and return that block's number.
pub async fn wait_for_confirmation(
    client: &NodeClient,
    hash: B256,
    policy: ConfirmationPolicy,
) -> Result<u64> {
    policy.validate()?;
    let started = Instant::now();

    loop {
        tokio::time::sleep(policy.poll_interval).await;

        if let Some(receipt) = client.transaction_receipt(hash).await? {
            if let Some(number) = receipt.block_number()? {
                if !receipt.succeeded()? {
                    warn!(%hash, block = number, "transaction reverted");
                }
                info!(%hash, block = number, "tx confirmed");
                return Ok(number);
            }
        }

        let waited = started.elapsed();
        if waited >= policy.timeout {
            return Err(HarnessError::ConfirmationTimeout { hash, waited });
        }
        debug!(%hash, ?waited, "tx still pending");
    }
}
