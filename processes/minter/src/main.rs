//! 'main' for the minter process

use std::sync::Arc;

use anyhow::Result;
use caryatid_module_rest_server::RESTServer;
use caryatid_process::Process;
use clap::Parser;
use config::{Config, Environment, File};
use minter_common::messages::Message;
use minter_module_minter::Minter;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

#[derive(Debug, clap::Parser)]
struct Args {
    #[arg(long, value_name = "PATH", default_values_t = vec!["minter.toml".to_string()])]
    config: Vec<String>,
}

#[tokio::main]
pub async fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG sets the levels, INFO when unset
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    Registry::default().with(fmt::layer().with_filter(filter)).init();

    info!("Minter process");

    let mut builder = Config::builder();
    for file in &args.config {
        builder = builder.add_source(File::with_name(file));
    }
    let config = Arc::new(
        builder.add_source(Environment::with_prefix("MINTER").separator("__")).build()?,
    );

    let mut process = Process::<Message>::create(config).await;

    Minter::register(&mut process);
    RESTServer::<Message>::register(&mut process);

    process.run().await?;

    info!("Exiting");
    Ok(())
}
