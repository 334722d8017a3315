//! Example client for the L2L Dispatch API.
//!
//! Runs the walkthrough against a test site. The API key is a secret: prefer passing it
//! through `DISPATCH_API_KEY` over the command line.

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use l2l_dispatch::walkthrough::{self, TracingReporter, WalkthroughOptions};
use l2l_dispatch::{api_base_url, ApiKey, DispatchClient};

/// L2L API Client
#[derive(Parser)]
#[command(name = "l2l-dispatch")]
#[command(about = "Walks through the L2L Dispatch API against a test site")]
#[command(version)]
struct Cli {
    /// Print out verbose api output for debugging
    #[arg(long)]
    dbg: bool,

    /// Specify a hostname to use as the server
    #[arg(env = "DISPATCH_SERVER")]
    server: String,

    /// Specify the site id to operate against
    #[arg(env = "DISPATCH_SITE")]
    site: i64,

    /// Specify the username for a user to use in the test
    #[arg(env = "DISPATCH_USER")]
    user: String,

    /// Specify an API key to use for authentication
    #[arg(env = "DISPATCH_API_KEY", hide_env_values = true)]
    apikey: String,

    /// Accept invalid TLS certificates
    #[arg(long)]
    insecure: bool,

    /// Request timeout in seconds
    #[arg(long, default_value = "60")]
    timeout: u64,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.dbg {
            EnvFilter::new("l2l_dispatch=debug,info")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let client = DispatchClient::builder()
        .base_url(api_base_url(&cli.server)?)
        .api_key(ApiKey::from(cli.apikey))
        .allow_insecure(cli.insecure)
        .timeout(Duration::from_secs(cli.timeout))
        .build()?;

    let options = WalkthroughOptions {
        site: cli.site,
        user: cli.user,
    };
    let mut reporter = TracingReporter { verbose: cli.dbg };

    walkthrough::run(client, &options, &mut reporter).await?;
    tracing::info!("Walkthrough finished");
    Ok(())
}
