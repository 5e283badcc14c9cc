//! ccip-server: HTTP surface of the off-chain read gateway
//!
//! Serves EIP-3668 lookups (`GET /lookup/{sender}/{data}.json`,
//! `POST /lookup`) plus health and Prometheus endpoints.

pub mod error;
pub mod metrics;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ServerError;
pub use routes::{create_router, HealthResponse, LookupRequest, LookupResponse, SERVICE_NAME};
pub use server::{GatewayServer, ServerBuilder};
pub use state::{create_shared_state, GatewayState, SharedState};
