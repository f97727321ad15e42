//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Notify;
use wiremock::MockServer;

use neuro_query::client::{NeuroQueryClient, StudyBackend};
use neuro_query::config::Config;
use neuro_query::error::{ClientError, ClientResult};
use neuro_query::models::{Study, Term};

/// Client pointed at `{mock}/api`.
pub fn mock_client(server: &MockServer) -> Arc<NeuroQueryClient> {
    let config = Config::for_testing(&format!("{}/api", server.uri()));
    Arc::new(NeuroQueryClient::new(config).unwrap())
}

/// Study row JSON as the backend sends it.
pub fn study_json(year: i64, journal: &str, title: &str, authors: &str) -> Value {
    json!({"year": year, "journal": journal, "title": title, "authors": authors})
}

/// `{"results": [...]}` body.
pub fn results_body(rows: Vec<Value>) -> Value {
    json!({ "results": rows })
}

/// Study with a year and title only.
pub fn study(year: i64, title: &str) -> Study {
    Study { year: Some(year), title: Some(title.to_string()), ..Default::default() }
}

/// Let spawned tasks run for a moment.
pub async fn settle_briefly() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    tokio::time::sleep(Duration::from_millis(20)).await;
}

#[derive(Clone)]
struct Script {
    gate: Option<Arc<Notify>>,
    outcome: Result<Vec<Study>, (u16, String)>,
}

/// In-process backend with per-query answers, optionally held until released.
#[derive(Default)]
pub struct ScriptedBackend {
    terms: Vec<Term>,
    scripts: Mutex<HashMap<String, Script>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_terms(terms: &[&str]) -> Self {
        Self { terms: terms.iter().copied().map(Term::from).collect(), ..Self::default() }
    }

    /// Answer `query` with `rows` immediately.
    pub fn answer(&self, query: &str, rows: Vec<Study>) {
        self.script(query, None, Ok(rows));
    }

    /// Answer `query` with `rows` once the returned gate is notified.
    pub fn answer_gated(&self, query: &str, rows: Vec<Study>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.script(query, Some(Arc::clone(&gate)), Ok(rows));
        gate
    }

    /// Fail `query` with a status error.
    pub fn fail(&self, query: &str, status: u16, message: &str) {
        self.script(query, None, Err((status, message.to_string())));
    }

    fn script(
        &self,
        query: &str,
        gate: Option<Arc<Notify>>,
        outcome: Result<Vec<Study>, (u16, String)>,
    ) {
        self.scripts.lock().unwrap().insert(query.to_string(), Script { gate, outcome });
    }

    /// Queries fetched so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StudyBackend for ScriptedBackend {
    async fn fetch_terms(&self) -> ClientResult<Vec<Term>> {
        Ok(self.terms.clone())
    }

    async fn fetch_studies(&self, query: &str) -> ClientResult<Vec<Study>> {
        self.calls.lock().unwrap().push(query.to_string());
        let script = self.scripts.lock().unwrap().get(query).cloned();

        let Some(script) = script else {
            return Ok(Vec::new());
        };
        if let Some(gate) = script.gate {
            gate.notified().await;
        }
        script.outcome.map_err(|(status, message)| ClientError::status(status, Some(&message)))
    }
}
