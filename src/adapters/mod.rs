//! Adapters between the evaluation engine and the outside world.
//!
//! - `http`: axum server exposing `POST /evaluate-claim`
//! - `client`: reqwest client for a remote judge

pub mod client;
pub mod http;

pub use client::JudgeClient;
pub use http::{router, serve, ErrorResponse, HealthResponse, EVALUATE_PATH};
