use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{self, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sql_http_bridge::{
    config::AppConfig,
    error::{Result, ServiceError},
    invoker::{ExecRequest, InvocationResult, ProcedureRunner},
    server::Server,
    telemetry,
};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tower::ServiceExt;

pub const FIXTURE_CONFIG: &str = r#"
[service]
sql_server = "db01,1433"
database = "Reporting"
allowed_procs = "sales:dbo.usp_Sales, health:dbo.usp_ServerHealth"
"#;

/// What the fake runner does when invoked.
#[allow(dead_code)]
#[derive(Clone)]
pub enum Outcome {
    Exit {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    ClientNotFound,
    Timeout,
    SpawnFailure,
    Panic,
}

impl Outcome {
    #[allow(dead_code)]
    pub fn stdout(stdout: &str) -> Self {
        Outcome::Exit {
            code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }
}

/// Records every execution instead of spawning sqlcmd.
pub struct RecordingRunner {
    outcome: Outcome,
    calls: Mutex<Vec<ExecRequest>>,
}

#[async_trait]
impl ProcedureRunner for RecordingRunner {
    async fn run(&self, request: &ExecRequest) -> Result<InvocationResult> {
        self.calls
            .lock()
            .expect("runner call log poisoned")
            .push(request.clone());

        match &self.outcome {
            Outcome::Exit {
                code,
                stdout,
                stderr,
            } => Ok(InvocationResult {
                exit_code: *code,
                stdout: stdout.clone(),
                stderr: stderr.clone(),
            }),
            Outcome::ClientNotFound => Err(ServiceError::ClientNotFound),
            Outcome::Timeout => Err(ServiceError::Timeout(Duration::from_secs(60))),
            Outcome::SpawnFailure => Err(ServiceError::Internal(anyhow::anyhow!(
                "failed to run /usr/local/bin/sqlcmd: permission denied"
            ))),
            Outcome::Panic => panic!("runner exploded"),
        }
    }
}

pub struct BridgeHarness {
    router: Router,
    runner: Arc<RecordingRunner>,
}

#[allow(dead_code)]
impl BridgeHarness {
    pub fn new(outcome: Outcome) -> Self {
        telemetry::init_tracing();

        let config = AppConfig::from_toml_str(FIXTURE_CONFIG).expect("fixture config parses");
        let runner = Arc::new(RecordingRunner {
            outcome,
            calls: Mutex::new(Vec::new()),
        });
        let router = Server::with_runner(config, runner.clone()).router();

        Self { router, runner }
    }

    pub async fn get(&self, uri: &str) -> http::Response<Body> {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("failed to build GET request");
        self.send(request).await
    }

    pub async fn head(&self, uri: &str) -> http::Response<Body> {
        let request = Request::builder()
            .method("HEAD")
            .uri(uri)
            .body(Body::empty())
            .expect("failed to build HEAD request");
        self.send(request).await
    }

    pub async fn post_form(&self, uri: &str, form: &str) -> http::Response<Body> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                http::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(Body::from(form.to_string()))
            .expect("failed to build POST request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> http::Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router should handle harness request")
    }

    pub fn spawn_count(&self) -> usize {
        self.runner.calls.lock().expect("runner call log poisoned").len()
    }

    pub fn last_request(&self) -> Option<ExecRequest> {
        self.runner
            .calls
            .lock()
            .expect("runner call log poisoned")
            .last()
            .cloned()
    }
}

pub async fn read_json(response: http::Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("response body should be readable");
    let value =
        serde_json::from_slice::<Value>(&bytes).expect("response body should be valid JSON");
    (status, value)
}
