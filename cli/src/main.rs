//! chainweb3 CLI — query an Ethereum node from the terminal.
//!
//! Usage:
//! ```bash
//! # Liveness, client version and head block
//! chainweb3 status --url http://localhost:8545
//!
//! # Balance of an account
//! chainweb3 balance --address 0x407d73d8a49eeb85d32cf465507dd71d507100c1
//!
//! # Send a raw JSON-RPC call
//! chainweb3 call --method eth_getBlockByNumber --params '["latest", false]'
//! ```
//!
//! The endpoint comes from `--url`, then `CHAINWEB3_RPC_URL`, then
//! `localhost:8545`. Log verbosity follows `RUST_LOG` (default `warn`).

mod config;

use std::env;
use std::process;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use chainweb3_core::{Address, RpcTransport};
use chainweb3_eth::{BlockNumber, Web3};
use chainweb3_http::HttpProvider;

use config::{parse_flag, CliConfig, URL_ENV};

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "status" => cmd_status(&args[2..]).await,
        "balance" => cmd_balance(&args[2..]).await,
        "block" => cmd_block(&args[2..]).await,
        "call" => cmd_call(&args[2..]).await,
        "version" | "--version" | "-V" => {
            println!("chainweb3 {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn print_usage() {
    println!("chainweb3 {}", env!("CARGO_PKG_VERSION"));
    println!("Query an Ethereum node over JSON-RPC\n");
    println!("USAGE:");
    println!("    chainweb3 <COMMAND> [FLAGS]\n");
    println!("COMMANDS:");
    println!("    status     Liveness, client version and block number");
    println!("    balance    Balance of an account");
    println!("    block      Fetch a block");
    println!("    call       Send a raw JSON-RPC call");
    println!("    version    Print version");
    println!("    help       Print this help\n");
    println!("FLAGS:");
    println!("    --url <URL>            RPC endpoint  [env: {URL_ENV}, default: localhost:8545]");
    println!("    --timeout-ms <MS>      Request timeout in milliseconds");
    println!("    --address <ADDR>       Account for `balance`  [required]");
    println!("    --block <TAG>          Block for `balance` (latest, earliest, pending, number)");
    println!("    --number <TAG>         Block for `block`  [default: latest]");
    println!("    --method <NAME>        Method for `call`  [required]");
    println!("    --params <JSON>        JSON array of params for `call`  [default: []]");
}

fn connect(args: &[String]) -> Result<(CliConfig, Arc<HttpProvider>)> {
    let config = CliConfig::resolve(args, env::var(URL_ENV).ok())?;
    let provider = HttpProvider::new(&config.url, config.provider_config())
        .with_context(|| format!("cannot use endpoint {}", config.url))?;
    tracing::debug!(url = %provider.url(), "provider ready");
    Ok((config, Arc::new(provider)))
}

fn block_flag(args: &[String], flag: &str) -> Result<BlockNumber> {
    match parse_flag(args, flag) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{flag} expects a block tag or number")),
        None => Ok(BlockNumber::Latest),
    }
}

async fn cmd_status(args: &[String]) -> Result<()> {
    let (config, provider) = connect(args)?;
    let web3 = Web3::new(provider);

    println!("Checking {}...", config.url);
    let start = Instant::now();
    if !web3.is_connected().await {
        bail!("node at {} is not listening", config.url);
    }
    let latency = start.elapsed();

    let client = web3.web3.client_version().await?;
    let height = web3.eth.block_number().await?;

    println!("  Status:       listening");
    println!("  Client:       {client}");
    println!("  Block number: {} ({height})", height.as_biguint());
    println!("  Latency:      {}ms", latency.as_millis());
    Ok(())
}

async fn cmd_balance(args: &[String]) -> Result<()> {
    let raw = parse_flag(args, "--address").context("--address is required")?;
    let address: Address = raw.parse()?;
    let block = block_flag(args, "--block")?;

    let (_, provider) = connect(args)?;
    let balance = Web3::new(provider).eth.get_balance(&address, block).await?;
    println!("{} wei ({balance})", balance.as_biguint());
    Ok(())
}

async fn cmd_block(args: &[String]) -> Result<()> {
    let block = block_flag(args, "--number")?;
    let (_, provider) = connect(args)?;

    match Web3::new(provider).eth.get_block_by_number(block.clone(), false).await? {
        Some(b) => println!("{}", serde_json::to_string_pretty(&b)?),
        None => bail!("block {block} not found"),
    }
    Ok(())
}

async fn cmd_call(args: &[String]) -> Result<()> {
    let method = parse_flag(args, "--method").context("--method is required")?;
    let params = match parse_flag(args, "--params") {
        Some(raw) => match serde_json::from_str::<Value>(&raw).context("--params is not JSON")? {
            Value::Array(items) => items,
            _ => bail!("--params must be a JSON array"),
        },
        None => Vec::new(),
    };

    let (_, provider) = connect(args)?;
    let result = provider.call(&method, params).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
