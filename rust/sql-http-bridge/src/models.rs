//! Response payloads for the `/api` endpoint.

use crate::table::{ResultTable, Row};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcResponse {
    /// The opaque key the client sent, echoed for correlation.
    #[serde(rename = "proc")]
    pub proc_key: String,
    pub sp_name: String,
    pub row_count: usize,
    pub rows: Vec<Row>,
}

impl ProcResponse {
    pub fn new(proc_key: impl Into<String>, sp_name: impl Into<String>, table: ResultTable) -> Self {
        Self {
            proc_key: proc_key.into(),
            sp_name: sp_name.into(),
            row_count: table.row_count(),
            rows: table.rows,
        }
    }
}
