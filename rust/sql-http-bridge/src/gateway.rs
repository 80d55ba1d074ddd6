//! The per-request pipeline: resolve, execute, parse.

use crate::{
    error::{Result, ServiceError},
    invoker::{ExecRequest, COLUMN_DELIMITER},
    models::ProcResponse,
    request::ProcParams,
    state::AppState,
    table,
};
use tracing::{info, warn};

/// Runs the allowlisted procedure named by `params.proc_key` with the caller's credentials.
pub async fn execute(state: &AppState, params: ProcParams) -> Result<ProcResponse> {
    let sp_name = state
        .config
        .allowlist
        .resolve(&params.proc_key)
        .ok_or(ServiceError::InvalidProc)?;

    let request = ExecRequest::new(&state.config, &params, sp_name);
    info!(procedure = %sp_name, login = %params.user, "executing stored procedure");

    let result = state.runner.run(&request).await?;

    if !result.succeeded() {
        warn!(
            exit_code = ?result.exit_code,
            stderr = %result.stderr.trim(),
            "sqlcmd failed"
        );
        return Err(ServiceError::AuthOrExec);
    }

    let table = table::parse(&result.stdout, COLUMN_DELIMITER);
    Ok(ProcResponse::new(params.proc_key, sp_name, table))
}
