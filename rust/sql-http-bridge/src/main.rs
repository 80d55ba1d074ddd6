use clap::Parser;
use sql_http_bridge::telemetry;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sql-http-bridge", version, about = "Expose allowlisted stored procedures over HTTP")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(env = "SQL_HTTP_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();
    let cli = Cli::parse();
    sql_http_bridge::run(cli.config.as_deref()).await
}
