//! Shared state handed to every request handler

use std::sync::Arc;

use ccip_core::OffchainGateway;
use metrics_exporter_prometheus::PrometheusHandle;

pub struct GatewayState {
    pub gateway: OffchainGateway,
    /// Present when a Prometheus recorder backs `/metrics`
    pub metrics: Option<PrometheusHandle>,
}

pub type SharedState = Arc<GatewayState>;

pub fn create_shared_state(
    gateway: OffchainGateway,
    metrics: Option<PrometheusHandle>,
) -> SharedState {
    Arc::new(GatewayState { gateway, metrics })
}
