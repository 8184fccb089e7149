mod cli;

use std::path::Path;

use alloy::signers::local::PrivateKeySigner;
use anyhow::{
    Context,
    Result,
    bail,
};
use clap::Parser;
use edge_harness::{
    HarnessConfig,
    NodeClient,
    TypedClient,
    check_all_blocks,
    check_block_linkage,
    run_transfer,
};
use edge_tx_hash::{
    RpcTransaction,
    TransactionRecord,
};
use serde::Deserialize;
use tracing::{
    info,
    warn,
};
use tracing_subscriber::{
    EnvFilter,
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::cli::{
    Args,
    Commands,
    TransferArgs,
};

/// Input accepted by `hash`: a block with full transaction objects or a
/// single transaction object.
#[derive(Deserialize)]
#[serde(untagged)]
enum HashInput {
    Block { transactions: Vec<RpcTransaction> },
    Transaction(RpcTransaction),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    match args.command {
        Commands::Hash { ref file } => hash_file(file),
        Commands::Blocks { count } => {
            let (rpc, typed) = connect(&args.rpc_url, None).await?;
            let hashes = check_block_linkage(&rpc, &typed, count)
                .await
                .context("block linkage check failed")?;
            for (number, hash) in hashes.iter().enumerate() {
                println!("{number}\t{hash}");
            }
            Ok(())
        }
        Commands::AllBlocks => {
            let (rpc, typed) = connect(&args.rpc_url, None).await?;
            let reports = check_all_blocks(&rpc, &typed)
                .await
                .context("block transaction check failed")?;
            for report in &reports {
                println!(
                    "{}\t{}\tverified={}\tskipped={}",
                    report.number, report.hash, report.verified, report.skipped
                );
            }
            Ok(())
        }
        Commands::Transfer(ref transfer) => run_transfer_command(&args.rpc_url, transfer).await,
    }
}

async fn connect(
    rpc_url: &str,
    transfer: Option<&TransferArgs>,
) -> Result<(NodeClient, TypedClient)> {
    let mut config = HarnessConfig::new(rpc_url)?;
    if let Some(transfer) = transfer {
        config = config.with_confirmation(transfer.confirmation_policy());
    }
    config.validate()?;

    info!(rpc_url = %config.rpc_url, "connecting to node");
    let rpc = NodeClient::new(config.rpc_url.as_str()).context("failed to create RPC client")?;
    let typed = TypedClient::connect(config.rpc_url.as_str())
        .await
        .context("failed to connect provider")?;
    Ok((rpc, typed))
}

async fn run_transfer_command(rpc_url: &str, transfer: &TransferArgs) -> Result<()> {
    let signer: PrivateKeySigner = transfer
        .private_key
        .trim()
        .parse()
        .context("invalid private key")?;
    let (rpc, typed) = connect(rpc_url, Some(transfer)).await?;

    let report = run_transfer(
        &rpc,
        &typed,
        &signer,
        transfer.to,
        transfer.confirmation_policy(),
    )
    .await
    .context("transfer check failed")?;

    println!(
        "{}\tblock={}\tverified={}\tskipped={}",
        report.hash, report.block_number, report.block.verified, report.block.skipped
    );
    Ok(())
}

fn hash_file(path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let input: HashInput = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    let transactions = match input {
        HashInput::Block { transactions } => transactions,
        HashInput::Transaction(tx) => vec![tx],
    };

    let mut mismatches = 0usize;
    for (index, tx) in transactions.iter().enumerate() {
        let computed = TransactionRecord::try_from(tx)
            .with_context(|| format!("transaction #{index} cannot be normalized"))?
            .hash();
        match tx.hash.as_deref() {
            Some(_) => {
                let reported = tx.reported_hash()?;
                if reported == computed {
                    println!("{index}\t{computed}\tok");
                } else {
                    warn!(index, %reported, %computed, "hash mismatch");
                    println!("{index}\t{computed}\tmismatch (reported {reported})");
                    mismatches += 1;
                }
            }
            None => println!("{index}\t{computed}"),
        }
    }

    if mismatches > 0 {
        bail!("{mismatches} of {} transaction hashes did not match", transactions.len());
    }
    Ok(())
}
