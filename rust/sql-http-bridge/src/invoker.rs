//! Runs one stored procedure through sqlcmd.

use crate::{
    config::AppConfig,
    error::{Result, ServiceError},
    locator,
    request::ProcParams,
};
use anyhow::Context;
use async_trait::async_trait;
use std::{ffi::OsString, fmt, process::Stdio, time::Duration};
use tokio::process::Command;
use tracing::debug;

/// Column delimiter requested from sqlcmd and expected by the table parser.
pub const COLUMN_DELIMITER: char = '|';

/// A single sqlcmd execution. The statement is derived only from the resolved procedure.
#[derive(Clone, PartialEq, Eq)]
pub struct ExecRequest {
    pub server: String,
    pub database: String,
    pub user: String,
    password: String,
    pub procedure: String,
}

impl ExecRequest {
    pub fn new(config: &AppConfig, params: &ProcParams, procedure: &str) -> Self {
        Self {
            server: config.sql_server.clone(),
            database: config.database.clone(),
            user: params.user.clone(),
            password: params.password.clone(),
            procedure: procedure.to_string(),
        }
    }

    pub fn statement(&self) -> String {
        format!("SET NOCOUNT ON; EXEC {}", self.procedure)
    }

    /// Arguments passed to sqlcmd, excluding the program itself.
    pub fn args(&self) -> Vec<String> {
        vec![
            "-S".to_string(),
            self.server.clone(),
            "-d".to_string(),
            self.database.clone(),
            "-U".to_string(),
            self.user.clone(),
            "-P".to_string(),
            self.password.clone(),
            "-Q".to_string(),
            self.statement(),
            "-W".to_string(),
            "-s".to_string(),
            COLUMN_DELIMITER.to_string(),
        ]
    }
}

impl fmt::Debug for ExecRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecRequest")
            .field("server", &self.server)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("procedure", &self.procedure)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResult {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl InvocationResult {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[async_trait]
pub trait ProcedureRunner: Send + Sync {
    async fn run(&self, request: &ExecRequest) -> Result<InvocationResult>;
}

/// Spawns the sqlcmd binary found on the configured search path.
#[derive(Debug, Clone)]
pub struct SqlCmdRunner {
    search_path: Option<OsString>,
    timeout: Duration,
}

impl SqlCmdRunner {
    pub fn new(search_path: Option<OsString>, timeout: Duration) -> Self {
        Self {
            search_path,
            timeout,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.sqlcmd_path.as_ref().map(OsString::from),
            config.sqlcmd_timeout,
        )
    }
}

#[async_trait]
impl ProcedureRunner for SqlCmdRunner {
    async fn run(&self, request: &ExecRequest) -> Result<InvocationResult> {
        let program = locator::locate_sqlcmd(self.search_path.as_deref())?;
        debug!(program = %program.display(), procedure = %request.procedure, "spawning sqlcmd");

        let mut cmd = Command::new(&program);
        cmd.args(request.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Dropping the output future on timeout kills the child.
        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| ServiceError::Timeout(self.timeout))?
            .with_context(|| format!("failed to run {}", program.display()))?;

        Ok(InvocationResult {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
