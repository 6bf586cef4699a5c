//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod aes_value_codec;
mod file_session_vault;
mod http_auth_gateway;
mod in_memory_session_vault;

pub use aes_value_codec::AesValueCodec;
pub use file_session_vault::FileSessionVault;
pub use http_auth_gateway::{GatewayConfig, HttpAuthGateway};
pub use in_memory_session_vault::InMemorySessionVault;
