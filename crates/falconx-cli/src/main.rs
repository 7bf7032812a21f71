/*
[INPUT]:  CLI arguments, optional YAML configuration file, OS shutdown signals
[OUTPUT]: REST or websocket example run against a FalconX host
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

mod config;
mod rest_demo;
mod stream_demo;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use falconx_adapter::{FalconxClient, FalconxSocket};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{ExampleSet, Overrides, RunnerConfig};

#[derive(Parser, Debug)]
#[command(name = "falconx", version, about = "FalconX API example runner")]
struct Cli {
    #[arg(long = "api-key", value_name = "KEY")]
    api_key: Option<String>,
    /// Base64-encoded API secret
    #[arg(long, value_name = "SECRET")]
    secret: Option<String>,
    #[arg(long, value_name = "PASSPHRASE")]
    passphrase: Option<String>,
    #[arg(long = "example-set", value_enum)]
    example_set: Option<ExampleSet>,
    /// Stream host (defaults to ws.falconx.io)
    #[arg(long, value_name = "HOST")]
    host: Option<String>,
    #[arg(long = "base-url", value_name = "URL")]
    base_url: Option<String>,
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            api_key: self.api_key.clone(),
            secret: self.secret.clone(),
            passphrase: self.passphrase.clone(),
            example_set: self.example_set,
            host: self.host.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let settings = RunnerConfig::load(args.config_path.as_deref())
        .context("load config")?
        .resolve(args.overrides())?;

    info!(
        example_set = ?settings.example_set,
        api_key = settings.credentials.api_key(),
        "starting falconx example runner"
    );

    match settings.example_set {
        ExampleSet::Rest => {
            let client = FalconxClient::with_config(settings.credentials, settings.rest)
                .context("build REST client")?;
            rest_demo::run(&client).await;
            info!("rest examples complete");
        }
        ExampleSet::Websocket => {
            let socket = FalconxSocket::with_config(settings.credentials, settings.socket);
            let shutdown = CancellationToken::new();
            setup_signal_handlers(shutdown.clone());
            stream_demo::run(&socket, shutdown).await?;
            info!("websocket examples complete");
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
