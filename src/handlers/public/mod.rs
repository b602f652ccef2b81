// handlers/public/mod.rs - endpoints that never resolve an identity.
//
// Used by load balancers and uptime checks; nothing here reads tenant data.

pub mod health;

pub use health::{health, server_status};
