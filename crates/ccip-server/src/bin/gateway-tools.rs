//! gateway-tools: operator utilities for the off-chain read gateway
//!
//! Run with:
//! ```bash
//! cargo run -p ccip-server --bin gateway-tools -- namehash bob.onsui.eth
//! ```

use std::time::Duration;

use alloy_primitives::{hex, Address};
use alloy_signer_local::PrivateKeySigner;
use ccip_core::contenthash::{decode_contenthash, encode_contenthash};
use ccip_core::dns::encode_name;
use ccip_core::{decode_request, namehash, ResponseSigner, SignedResponse};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gateway-tools")]
#[command(about = "Keys, name encodings and response decoding for the gateway")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a new signing key
    Keygen,

    /// Print the signer address of a key
    Address {
        #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
        private_key: String,
    },

    /// ENS name-hash of a name
    Namehash { name: String },

    /// DNS wire encoding of a name
    DnsEncode { name: String },

    /// Encode a CID as a contenthash value
    EncodeContenthash { cid: String },

    /// Decode a contenthash value into its namespace and CID
    DecodeContenthash { contenthash: String },

    /// Decode a signed gateway response
    DecodeResponse {
        /// 0x-hex `(bytes, uint64, bytes)` response
        response: String,

        /// Resolver contract the response was signed for
        #[arg(long, requires = "request")]
        sender: Option<Address>,

        /// 0x-hex request data the response answers
        #[arg(long, requires = "sender")]
        request: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Keygen => {
            let signer = PrivateKeySigner::random();
            println!("private key: {}", signer.to_bytes());
            println!("address:     {}", signer.address());
        }
        Command::Address { private_key } => {
            let signer = ResponseSigner::from_hex(&private_key, Duration::ZERO)?;
            println!("{}", signer.address());
        }
        Command::Namehash { name } => {
            println!("{}", namehash(&name));
        }
        Command::DnsEncode { name } => {
            println!("{}", hex::encode_prefixed(encode_name(&name)?));
        }
        Command::EncodeContenthash { cid } => {
            println!("{}", hex::encode_prefixed(encode_contenthash(&cid)?));
        }
        Command::DecodeContenthash { contenthash } => {
            let decoded = decode_contenthash(&hex::decode(contenthash.trim())?)?;
            println!("namespace: {}", decoded.namespace);
            println!("cid:       {}", decoded.cid);
            println!("uri:       {}", decoded.uri());
        }
        Command::DecodeResponse {
            response,
            sender,
            request,
        } => {
            let decoded = SignedResponse::abi_decode(&hex::decode(response.trim())?)?;
            println!("result:    {}", decoded.result);
            println!("expires:   {}", decoded.expires);
            println!("signature: {}", decoded.signature);

            if let (Some(sender), Some(request)) = (sender, request) {
                let request = hex::decode(request.trim())?;
                match decode_request(&request) {
                    Ok(query) => println!("query:     {} {}", query.name, query.query),
                    Err(e) => println!("query:     [undecodable: {}]", e),
                }
                println!("signer:    {}", decoded.recover_signer(sender, &request)?);
            }
        }
    }

    Ok(())
}
