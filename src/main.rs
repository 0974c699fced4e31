use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use kryptokrona::{
    cli::{Cli, Commands},
    config::{AppConfig, load_app_config},
    daemon::Daemon,
    http::{IndexesClient, NodeClient, TransactionClient},
    log::init_logging,
};
use log::{error, info, warn};
use serde::Serialize;
use tokio::{signal, sync::broadcast};

fn print_json<T: Serialize>(value: &T) -> Result<(), anyhow::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    init_logging()?;

    let mut config = load_app_config(&cli.config)?;
    config.node.apply_node(&cli.node);
    let node = config.node.to_node();
    info!(node:% = node; "Using daemon");

    match cli.command {
        Commands::Info => print_json(&NodeClient::with_config(node, &config.client)?.get_info().await?),
        Commands::Fee => print_json(&NodeClient::with_config(node, &config.client)?.get_fee().await?),
        Commands::Height => print_json(&NodeClient::with_config(node, &config.client)?.get_height().await?),
        Commands::Peers => print_json(&NodeClient::with_config(node, &config.client)?.get_peers().await?),
        Commands::OIndexes => print_json(&IndexesClient::with_config(node, &config.client)?.get_o_indexes().await?),
        Commands::GlobalIndexes {
            start: Some(start),
            end: Some(end),
        } => {
            let daemon = Daemon::with_config(node, &config.client, config.daemon.clone())?;
            print_json(&daemon.get_global_indexes_for_range(start, end).await?)
        },
        Commands::GlobalIndexes { .. } => print_json(
            &IndexesClient::with_config(node, &config.client)?
                .get_global_indexes_for_range()
                .await?,
        ),
        Commands::Transactions => print_json(
            &TransactionClient::with_config(node, &config.client)?
                .get_transactions()
                .await?,
        ),
        Commands::TransactionDetails => print_json(
            &TransactionClient::with_config(node, &config.client)?
                .get_transaction_details_by_hashes()
                .await?,
        ),
        Commands::TransactionHashes => print_json(
            &TransactionClient::with_config(node, &config.client)?
                .get_transaction_hashes_by_payment_id()
                .await?,
        ),
        Commands::TransactionsStatus => print_json(
            &TransactionClient::with_config(node, &config.client)?
                .get_transactions_status()
                .await?,
        ),
        Commands::WatchFee { interval_secs } => watch_fee(config, node, interval_secs).await,
    }
}

/// Polls the daemon's fee info and prints every published record until
/// Ctrl+C is received.
async fn watch_fee(
    config: AppConfig,
    node: kryptokrona::Node,
    interval_secs: Option<u64>,
) -> Result<(), anyhow::Error> {
    let daemon = Daemon::with_config(node, &config.client, config.daemon.clone())?;
    daemon.init().await.context("Could not connect to daemon")?;

    let period = Duration::from_secs(interval_secs.unwrap_or(config.daemon.fee_poll_interval_secs).max(1));
    let mut fees = daemon.subscribe_fee_info();
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error:% = e; "Failed to listen for shutdown signal");
        }
        info!("Received shutdown signal, stopping fee watch.");
    };
    let poller = daemon.poll_fee_info(period, shutdown);
    tokio::pin!(poller);

    info!("Watching fee info. Press Ctrl+C to stop.");
    loop {
        tokio::select! {
            _ = &mut poller => break,
            received = fees.recv() => {
                match received {
                    Ok(fee) => print_json(&fee)?,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped = skipped; "Fee watcher fell behind");
                    },
                    Err(broadcast::error::RecvError::Closed) => {
                        error!("Fee feed closed");
                        break;
                    },
                }
            }
        }
    }

    Ok(())
}
