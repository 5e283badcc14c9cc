//! Gateway server implementation

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use ccip_core::{GatewayConfig, NameRecordProvider, OffchainGateway, ResponseSigner};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;

use crate::error::{Result, ServerError};
use crate::metrics::MeteredProvider;
use crate::routes::create_router;
use crate::state::{create_shared_state, SharedState};

/// Off-chain read gateway server
pub struct GatewayServer {
    state: SharedState,
    addr: SocketAddr,
}

impl GatewayServer {
    pub fn new(state: SharedState, addr: SocketAddr) -> Self {
        Self { state, addr }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Router serving this server's state
    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    /// Run the server
    pub async fn run(self) -> Result<()> {
        let router = self.router();

        tracing::info!(
            signer = %self.state.gateway.signer_address(),
            parent_domain = %self.state.gateway.config().parent_domain,
            "Starting off-chain read gateway on {}",
            self.addr
        );

        let listener = TcpListener::bind(self.addr).await?;
        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        Ok(())
    }

    /// Get the server state for testing
    pub fn state(&self) -> SharedState {
        self.state.clone()
    }
}

/// Builder for GatewayServer
pub struct ServerBuilder {
    config: GatewayConfig,
    addr: SocketAddr,
    private_key: Option<String>,
    provider: Option<Arc<dyn NameRecordProvider>>,
    metrics: Option<PrometheusHandle>,
}

impl ServerBuilder {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            addr: ([127, 0, 0, 1], 8080).into(),
            private_key: None,
            provider: None,
            metrics: None,
        }
    }

    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.addr = ([0, 0, 0, 0], port).into();
        self
    }

    /// Hex-encoded signing key
    pub fn private_key(mut self, key: impl Into<String>) -> Self {
        self.private_key = Some(key.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn NameRecordProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Serve `/metrics` from this handle
    pub fn metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn build(self) -> Result<GatewayServer> {
        let key = self
            .private_key
            .ok_or_else(|| ServerError::Internal("no signing key configured".into()))?;
        let provider = self
            .provider
            .ok_or_else(|| ServerError::Internal("no name-record provider configured".into()))?;

        let signer = ResponseSigner::from_hex(&key, self.config.ttl())?;
        let provider: Arc<dyn NameRecordProvider> = Arc::new(MeteredProvider::new(provider));
        let gateway = OffchainGateway::new(self.config, provider, signer);

        Ok(GatewayServer::new(
            create_shared_state(gateway, self.metrics),
            self.addr,
        ))
    }
}
