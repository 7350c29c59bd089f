//! salesdm-core - The reply engine behind salesdm
//!
//! This crate provides:
//! - Rule-based intent classification of inbound customer messages
//! - Persona-conditioned reply templates
//! - Channel styling for WhatsApp, Messenger and Instagram DMs
//! - The response assembler that ties them together
//!
//! Everything here is pure and synchronous: no I/O, no shared state.

pub mod assembler;
pub mod channel;
pub mod error;
pub mod intent;
pub mod presets;
pub mod template;
pub mod types;

// Re-export main types for convenience
pub use assembler::{generate_reply, generate_reply_for};
pub use error::{CoreError, Result};
pub use intent::{Classification, classify};
pub use types::{AgentPersona, AgentRequest, AgentResponse, ChannelId, Intent, PersonaOverride};
