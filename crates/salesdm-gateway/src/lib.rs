//! salesdm-gateway: HTTP front door for the salesdm reply engine
//!
//! Exposes `POST /api/respond` for the web front-end and messaging
//! webhooks, plus small catalog routes for presets and channels.

pub mod protocol;
pub mod server;

pub use server::{GatewayServer, GatewayState};
