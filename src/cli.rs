use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kryptokrona")]
#[command(about = "Kryptokrona daemon client", long_about = None)]
pub struct Cli {
    #[arg(
        short,
        long,
        help = "Path to the configuration file",
        default_value = "data/config.toml",
        global = true
    )]
    pub config: PathBuf,
    #[command(flatten)]
    pub node: NodeArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct NodeArgs {
    #[arg(long, help = "Daemon host name, overrides the configuration file", global = true)]
    pub host: Option<String>,
    #[arg(long, help = "Daemon RPC port, overrides the configuration file", global = true)]
    pub port: Option<u16>,
    #[arg(long, help = "Connect to the daemon over TLS", global = true)]
    pub tls: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show daemon information (/info)
    Info,
    /// Show the fee the daemon charges (/fee)
    Fee,
    /// Show local and network height (/height)
    Height,
    /// List the daemon's peers (/peers)
    Peers,
    /// Query /get_o_indexes
    OIndexes,
    /// Query /get_global_indexes_for_range, or /indexes/{start}/{end} when a range is given
    GlobalIndexes {
        #[arg(long, requires = "end", help = "First block height of the range")]
        start: Option<u64>,
        #[arg(long, requires = "start", help = "Last block height of the range")]
        end: Option<u64>,
    },
    /// Query /get_transactions
    Transactions,
    /// Query /get_transaction_details_by_hashes
    TransactionDetails,
    /// Query /get_transaction_hashes_by_payment_id
    TransactionHashes,
    /// Query /get_transactions_status
    TransactionsStatus,
    /// Resolve the daemon and print every fee update until Ctrl+C
    WatchFee {
        #[arg(short, long, help = "Seconds between fee polls, overrides the configuration file")]
        interval_secs: Option<u64>,
    },
}
