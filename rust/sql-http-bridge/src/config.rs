use crate::allowlist::Allowlist;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    net::{Ipv4Addr, SocketAddr},
    path::Path,
    time::Duration,
};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub sql_server: String,
    pub database: String,
    pub allowlist: Allowlist,
    pub sqlcmd_timeout: Duration,
    /// Overrides `PATH` when locating sqlcmd.
    pub sqlcmd_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    sql_server: Option<String>,
    #[serde(default)]
    database: Option<String>,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    allowed_procs: Option<String>,
    #[serde(default)]
    sqlcmd_timeout_secs: Option<u64>,
    #[serde(default)]
    sqlcmd_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    service: RawConfig,
}

const DEFAULT_SQL_SERVER: &str = "localhost";
const DEFAULT_DATABASE: &str = "master";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

impl RawConfig {
    /// Values set in `other` take precedence.
    fn overlay(self, other: RawConfig) -> RawConfig {
        RawConfig {
            sql_server: other.sql_server.or(self.sql_server),
            database: other.database.or(self.database),
            port: other.port.or(self.port),
            allowed_procs: other.allowed_procs.or(self.allowed_procs),
            sqlcmd_timeout_secs: other.sqlcmd_timeout_secs.or(self.sqlcmd_timeout_secs),
            sqlcmd_path: other.sqlcmd_path.or(self.sqlcmd_path),
        }
    }
}

impl AppConfig {
    /// Loads the optional TOML file, then applies `SQL_HTTP_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                parse_file(&contents)
                    .with_context(|| format!("invalid config file {}", path.display()))?
            }
            None => RawConfig::default(),
        };

        let env: RawConfig = envy::prefixed("SQL_HTTP_")
            .from_env()
            .context("failed to parse SQL_HTTP_* environment variables")?;

        Ok(Self::from_raw(file.overlay(env)))
    }

    /// Builds a config from TOML text alone, without consulting the environment.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(Self::from_raw(parse_file(contents)?))
    }

    fn from_raw(raw: RawConfig) -> Self {
        let port = raw.port.unwrap_or(DEFAULT_PORT);
        let allowlist = raw
            .allowed_procs
            .as_deref()
            .map(Allowlist::parse)
            .unwrap_or_default();

        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, port)),
            sql_server: non_empty(raw.sql_server).unwrap_or_else(|| DEFAULT_SQL_SERVER.to_string()),
            database: non_empty(raw.database).unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            allowlist,
            sqlcmd_timeout: Duration::from_secs(
                raw.sqlcmd_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS).max(1),
            ),
            sqlcmd_path: non_empty(raw.sqlcmd_path),
        }
    }
}

fn parse_file(contents: &str) -> Result<RawConfig> {
    let file: ConfigFile = toml::from_str(contents).context("failed to parse TOML")?;
    Ok(file.service)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
