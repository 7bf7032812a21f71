/*
[INPUT]:  Optional YAML file, FALCONX_* environment variables, CLI flags
[OUTPUT]: Resolved credentials and transport configuration for the runner
[POS]:    Configuration layer - runner setup
[UPDATE]: When adding new runner options
*/

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use config::{Config, Environment, File, FileFormat};
use falconx_adapter::ws::DEFAULT_STREAM_HOST;
use falconx_adapter::{ClientConfig, Credentials, SocketConfig};
use serde::Deserialize;

/// Which example set the runner exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExampleSet {
    #[default]
    Rest,
    Websocket,
}

/// Values read from the config file and environment; every field optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub api_key: Option<String>,
    pub secret: Option<String>,
    pub passphrase: Option<String>,
    pub example_set: Option<ExampleSet>,
    /// Stream host, e.g. `ws.falconx.io`
    pub host: Option<String>,
    /// REST base URL
    pub base_url: Option<String>,
}

/// Flag values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub secret: Option<String>,
    pub passphrase: Option<String>,
    pub example_set: Option<ExampleSet>,
    pub host: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: Credentials,
    pub example_set: ExampleSet,
    pub rest: ClientConfig,
    pub socket: SocketConfig,
}

impl RunnerConfig {
    /// Load the optional YAML file, then apply `FALCONX_*` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = path.map(|path| File::from(path).format(FileFormat::Yaml));
        Self::build(file)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Self::build(Some(File::from_str(content, FileFormat::Yaml)))
    }

    fn build<S>(file: Option<S>) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let mut builder = Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(file);
        }
        builder
            .add_source(Environment::with_prefix("FALCONX"))
            .build()
            .context("read runner configuration")?
            .try_deserialize()
            .context("parse runner configuration")
    }

    /// Merge flags over file values and check that credentials are complete
    pub fn resolve(self, overrides: Overrides) -> Result<Settings> {
        let api_key = required(overrides.api_key.or(self.api_key), "api-key")?;
        let secret = required(overrides.secret.or(self.secret), "secret")?;
        let passphrase = required(overrides.passphrase.or(self.passphrase), "passphrase")?;

        let mut rest = ClientConfig::default();
        if let Some(base_url) = overrides.base_url.or(self.base_url) {
            rest = rest.with_base_url(base_url);
        }

        let host = overrides
            .host
            .or(self.host)
            .filter(|host| !host.is_empty())
            .unwrap_or_else(|| DEFAULT_STREAM_HOST.to_string());

        Ok(Settings {
            credentials: Credentials::new(api_key, secret, passphrase),
            example_set: overrides.example_set.or(self.example_set).unwrap_or_default(),
            rest,
            socket: SocketConfig::default().with_host(host),
        })
    }
}

fn required(value: Option<String>, flag: &str) -> Result<String> {
    value.filter(|value| !value.is_empty()).ok_or_else(|| {
        let key = flag.replace('-', "_");
        anyhow!(
            "missing {flag}: pass --{flag}, set FALCONX_{} or `{key}` in the config file",
            key.to_uppercase()
        )
    })
}
