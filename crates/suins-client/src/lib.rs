//! suins-client: SuiNS name-record provider over Sui JSON-RPC

mod client;
mod config;

pub use client::{
    data_keys, parse_name_record, parse_sui_address, DomainKey, DynamicFieldName,
    DynamicFieldResponse, SuinsClient,
};
pub use config::{SuinsConfig, DEFAULT_DOMAIN_TYPE, DEFAULT_REGISTRY_TABLE_ID, DEFAULT_RPC_URL};
