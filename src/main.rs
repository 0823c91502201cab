//! SolScope command-line front-end.
//!
//! ```text
//! solscope [--config PATH] [--endpoint URL] [--json] <COMMAND>
//!
//!     balance <ADDRESS>            getBalance through RpcClient::call
//!     activity <ADDRESS> [--limit] one FetchOrchestrator cycle
//!     call <METHOD> [PARAMS_JSON]  raw JSON-RPC call
//! ```

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;

use solscope::activity::{BalanceResponse, FetchOrchestrator};
use solscope::config::loader::load_or_default;
use solscope::display::{format_sol, render_activity};
use solscope::observability::logging::init_logging;
use solscope::rpc::RpcClient;

#[derive(Parser)]
#[command(name = "solscope")]
#[command(about = "Look up a Solana account's balance and recent activity", long_about = None)]
struct Cli {
    /// TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON-RPC endpoint, overrides the config file.
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the balance of an address
    Balance { address: String },
    /// Show balance and recent transaction signatures
    Activity {
        address: String,
        /// Number of signatures to request
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Send an arbitrary JSON-RPC request
    Call {
        method: String,
        /// JSON array of parameters
        #[arg(default_value = "[]")]
        params: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(endpoint) = cli.endpoint {
        config.rpc.endpoint = endpoint;
    }
    if let Commands::Activity { limit: Some(limit), .. } = &cli.command {
        config.activity.signature_limit = *limit;
    }
    solscope::config::validation::validate_config(&config)
        .map_err(solscope::config::ConfigError::Validation)?;

    init_logging(&config.observability);
    tracing::info!(endpoint = %config.rpc.endpoint, "solscope v{} starting", env!("CARGO_PKG_VERSION"));

    let client = RpcClient::new(&config.rpc)?;

    match cli.command {
        Commands::Balance { address } => {
            let address = solscope::activity::validate_address(&address)?;
            let result = client.call("getBalance", vec![Value::from(address)]).await;
            let Some(result) = result else {
                return Err(failure(&client).into());
            };
            let balance = BalanceResponse::from_result(&result)?.lamports();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&serde_json::json!({
                    "address": address,
                    "lamports": balance,
                    "sol": balance.as_sol(),
                }))?);
            } else {
                println!("Balance: {}", format_sol(balance));
            }
        }
        Commands::Activity { address, .. } => {
            let orchestrator = FetchOrchestrator::new(client, &config.activity);
            let outcome = orchestrator.fetch_data(&address).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print!("{}", render_activity(&outcome));
            }
        }
        Commands::Call { method, params } => {
            let params: Vec<Value> = serde_json::from_str(&params)
                .map_err(|e| format!("PARAMS_JSON must be a JSON array: {}", e))?;
            let Some(result) = client.call(&method, params).await else {
                return Err(failure(&client).into());
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

fn failure(client: &RpcClient) -> String {
    client
        .state()
        .error
        .unwrap_or_else(|| "An unknown error occurred".to_string())
}
