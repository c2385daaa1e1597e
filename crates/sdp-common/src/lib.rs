//! SDP Common Library
//!
//! Shared types, payload decoding, and logging setup for the SDP workspace.
//!
//! # Overview
//!
//! This crate provides the functionality shared by all SDP workspace members:
//!
//! - **Types**: the [`types::SensorReading`] model and its payload decoder
//! - **Error Handling**: the [`error::DecodeError`] taxonomy
//! - **Logging**: tracing-based logging configuration and initialization

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::DecodeError;
pub use types::SensorReading;
