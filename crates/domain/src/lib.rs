//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod enrollment;
mod permission;
mod profile;
mod role;
mod session;
mod user;

pub use enrollment::{EnrollmentRecord, NamedRef};
pub use permission::{Permission, PermissionGroup, PermissionSet};
pub use profile::ProfileRecord;
pub use role::Role;
pub use session::SessionTokens;
pub use user::UserRecord;
