//! Akeneo provider plugin entry point

use std::net::SocketAddr;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error, info};

use terraform_provider_akeneo::{
    init_logging_with_default, serve_on_with_options, serve_with_options, AkeneoProvider,
    ServeOptions,
};

/// Serve the Akeneo provider to an infrastructure-as-code host.
#[derive(Parser, Debug)]
#[command(name = "terraform-provider-akeneo", version, about)]
struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(long)]
    debug: bool,

    /// Registry address the provider is published under
    #[arg(long, default_value = "registry.terraform.io/0xfrej/akeneo")]
    registry: String,

    /// Listen on this address instead of a free local port
    #[arg(long, env = "AKENEO_PROVIDER_ADDRESS")]
    address: Option<SocketAddr>,

    /// Seconds to wait for in-flight requests on shutdown
    #[arg(long, default_value_t = 30)]
    shutdown_timeout: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging_with_default(if cli.debug { "debug" } else { "info" });

    info!(
        registry = %cli.registry,
        version = env!("CARGO_PKG_VERSION"),
        "Starting Akeneo provider"
    );
    debug!(?cli, "CLI args");

    let options =
        ServeOptions::new().with_shutdown_timeout(std::time::Duration::from_secs(cli.shutdown_timeout));
    let provider = AkeneoProvider::new();
    let served = match cli.address {
        Some(addr) => serve_on_with_options(provider, addr, options).await,
        None => serve_with_options(provider, options).await,
    };

    match served {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Provider server failed");
            ExitCode::FAILURE
        },
    }
}
