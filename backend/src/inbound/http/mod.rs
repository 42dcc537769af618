//! HTTP inbound adapter exposing REST endpoints.

pub mod cors;
pub mod envelope;
pub mod error;
pub mod gate_pass;
pub mod health;
pub mod state;

pub use error::{ApiResult, json_config};
