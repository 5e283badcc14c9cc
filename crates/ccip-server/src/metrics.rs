//! Prometheus metrics for the gateway
//!
//! Labels carry the resolver function and outcome only, never names or addresses.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ccip_core::{LookupOutcome, NameRecordProvider};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::error::{Result, ServerError};

pub const OUTCOME_OK: &str = "ok";
pub const OUTCOME_CLIENT_ERROR: &str = "client_error";
pub const OUTCOME_SERVER_ERROR: &str = "server_error";

/// Function label for requests that never decode to a query
pub const FUNCTION_INVALID: &str = "invalid";

pub fn record_request(function: &str, outcome: &str, duration: Duration) {
    counter!("ccip_requests_total", "function" => function.to_string(), "outcome" => outcome.to_string())
        .increment(1);
    histogram!("ccip_request_duration_seconds", "function" => function.to_string(), "outcome" => outcome.to_string())
        .record(duration.as_secs_f64());
}

pub fn record_provider_lookup(outcome: &str) {
    counter!("ccip_provider_lookups_total", "outcome" => outcome.to_string()).increment(1);
}

/// Provider decorator counting lookups by outcome
pub struct MeteredProvider {
    inner: Arc<dyn NameRecordProvider>,
}

impl MeteredProvider {
    pub fn new(inner: Arc<dyn NameRecordProvider>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl NameRecordProvider for MeteredProvider {
    async fn lookup(&self, name: &str) -> LookupOutcome {
        let outcome = self.inner.lookup(name).await;
        record_provider_lookup(outcome.label());
        outcome
    }
}

pub fn init_prometheus_recorder() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::Internal(format!("failed to install Prometheus recorder: {}", e)))
}
