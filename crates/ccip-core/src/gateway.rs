//! The gateway operation: request in, signed response out

use std::sync::Arc;

use alloy_primitives::{Address, Bytes};
use tracing::debug;

use crate::config::GatewayConfig;
use crate::error::Error;
use crate::record::NameRecordProvider;
use crate::request::{decode_request, DecodedQuery, OffchainRequest};
use crate::resolver::QueryResolver;
use crate::signer::{ResponseSigner, SignedResponse};
use crate::Result;

/// Stateless request handler shared by every in-flight request
pub struct OffchainGateway {
    config: GatewayConfig,
    resolver: QueryResolver,
    signer: ResponseSigner,
}

impl OffchainGateway {
    pub fn new(
        config: GatewayConfig,
        provider: Arc<dyn NameRecordProvider>,
        signer: ResponseSigner,
    ) -> Self {
        let resolver = QueryResolver::new(&config, provider);
        Self {
            config,
            resolver,
            signer,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn signer_address(&self) -> Address {
        self.signer.address()
    }

    /// Answer a hex-encoded request with the ABI-encoded signed response
    pub async fn handle(&self, sender: &str, data: &str) -> Result<Bytes> {
        let request = OffchainRequest::parse(sender, data)?;
        let response = self.handle_request(&request).await?;
        Ok(response.abi_encode().into())
    }

    /// Decode, resolve and sign one request
    pub async fn handle_request(&self, request: &OffchainRequest) -> Result<SignedResponse> {
        let query = self.decode(request)?;
        self.respond(request, &query).await
    }

    /// Check the sender and decode the request data
    pub fn decode(&self, request: &OffchainRequest) -> Result<DecodedQuery> {
        self.check_sender(request.sender)?;

        let query = decode_request(&request.data)?;
        debug!(
            name = %query.name,
            function = query.query.function_name(),
            query = %query.query,
            "Decoded request"
        );
        Ok(query)
    }

    /// Resolve an already decoded request and sign the result
    pub async fn respond(
        &self,
        request: &OffchainRequest,
        query: &DecodedQuery,
    ) -> Result<SignedResponse> {
        let value = self.resolver.resolve(query).await?;
        let result = value.abi_encode();
        self.signer.sign(request.sender, &request.data, &result)
    }

    fn check_sender(&self, sender: Address) -> Result<()> {
        match self.config.resolver_address {
            Some(expected) if expected != sender => Err(Error::UnexpectedSender {
                sender: sender.to_string(),
                expected: expected.to_string(),
            }),
            _ => Ok(()),
        }
    }
}
