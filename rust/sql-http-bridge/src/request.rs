//! Extraction of `proc`, `user` and `pass` from URL-encoded input.

use crate::error::{Result, ServiceError};
use std::fmt;
use tracing::debug;

/// Parameters of one `/api` call. The password never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ProcParams {
    pub proc_key: String,
    pub user: String,
    pub password: String,
}

impl ProcParams {
    /// Parses a query string or `application/x-www-form-urlencoded` body.
    ///
    /// The first non-empty occurrence of each key is kept and unknown keys are ignored.
    pub fn from_urlencoded(input: &[u8]) -> Result<Self> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(input).map_err(|err| {
            debug!(error = %err, "failed to decode request parameters");
            ServiceError::MissingParams
        })?;

        let mut proc_key = None;
        let mut user = None;
        let mut password = None;

        for (key, value) in pairs {
            if value.is_empty() {
                continue;
            }

            let slot = match key.as_str() {
                "proc" => &mut proc_key,
                "user" => &mut user,
                "pass" => &mut password,
                _ => continue,
            };

            if slot.is_none() {
                *slot = Some(value);
            }
        }

        match (proc_key, user, password) {
            (Some(proc_key), Some(user), Some(password)) => Ok(Self {
                proc_key,
                user,
                password,
            }),
            _ => Err(ServiceError::MissingParams),
        }
    }
}

impl fmt::Debug for ProcParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcParams")
            .field("proc_key", &self.proc_key)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}
