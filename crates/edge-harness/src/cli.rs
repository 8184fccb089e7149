//! Command-line configuration for the harness binary.

use std::{
    path::PathBuf,
    time::Duration,
};

use alloy::primitives::Address;
use clap::{
    Parser,
    Subcommand,
};
use edge_harness::{
    ConfirmationPolicy,
    config::DEFAULT_RPC_URL,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Transaction hash checks against a Polygon Edge node", long_about = None)]
pub struct Args {
    /// JSON-RPC endpoint of the node
    #[arg(long, env = "EDGE_URL", default_value = DEFAULT_RPC_URL, global = true)]
    pub rpc_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify parent linkage and block hashes of the first blocks
    Blocks {
        #[arg(long, env = "EDGE_BLOCK_COUNT", default_value = "10")]
        count: u64,
    },
    /// Recompute every transaction hash from genesis to the latest block
    AllBlocks,
    /// Send 1 wei and verify the node hashes it like we do
    Transfer(TransferArgs),
    /// Recompute hashes of transactions stored in a JSON file
    Hash {
        /// A transaction object or a block with full transaction objects
        file: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
pub struct TransferArgs {
    /// Hex-encoded secp256k1 key of the funded sender
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    #[arg(long, env = "TO_ADDRESS")]
    pub to: Address,

    #[arg(long, env = "EDGE_POLL_INTERVAL_MS", default_value = "1000")]
    pub poll_interval_ms: u64,

    #[arg(long, env = "EDGE_CONFIRM_TIMEOUT_SECS", default_value = "120")]
    pub timeout_secs: u64,
}

impl TransferArgs {
    pub fn confirmation_policy(&self) -> ConfirmationPolicy {
        ConfirmationPolicy {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_blocks_with_default_count() {
        let args = Args::try_parse_from(["edge-harness", "--rpc-url", "http://node:8545", "blocks"])
            .unwrap();
        assert_eq!(args.rpc_url, "http://node:8545");
        assert!(matches!(args.command, Commands::Blocks { count: 10 }));
    }

    #[test]
    fn test_parses_transfer() {
        let args = Args::try_parse_from([
            "edge-harness",
            "transfer",
            "--private-key",
            "0x01",
            "--to",
            "0x1111111111111111111111111111111111111111",
            "--timeout-secs",
            "5",
        ])
        .unwrap();

        match args.command {
            Commands::Transfer(transfer) => {
                assert_eq!(transfer.to, Address::repeat_byte(0x11));
                let policy = transfer.confirmation_policy();
                assert_eq!(policy.poll_interval, Duration::from_secs(1));
                assert_eq!(policy.timeout, Duration::from_secs(5));
            }
            _ => panic!("expected transfer command"),
        }
    }

    #[test]
    fn test_parses_hash_file() {
        let args = Args::try_parse_from(["edge-harness", "hash", "block.json"]).unwrap();
        assert!(matches!(args.command, Commands::Hash { ref file } if file == &PathBuf::from("block.json")));
    }
}
