use crate::{config::AppConfig, invoker::ProcedureRunner};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub runner: Arc<dyn ProcedureRunner>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, runner: Arc<dyn ProcedureRunner>) -> Self {
        Self { config, runner }
    }
}
