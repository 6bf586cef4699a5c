//! Application services and ports.

#![forbid(unsafe_code)]

mod auth_gateway;
mod session_service;
mod session_store;

pub use auth_gateway::{AuthGateway, LoginGrant};
pub use session_service::{SessionPhase, SessionService};
pub use session_store::{CacheKey, SessionStore, SessionVault, ValueCodec};
